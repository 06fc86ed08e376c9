pub mod auth;
pub mod orders;
pub mod print;
pub mod urgency;
