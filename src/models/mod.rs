pub mod order;
pub mod ticket;

pub use order::{OrderKind, OrderView};
pub use ticket::{BusInfo, Passenger, Route, TicketRecord, TicketStatus};
