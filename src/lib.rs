pub mod config;
pub mod controllers;
pub mod models;
pub mod services;
pub mod ticket_client;

use std::sync::Arc;

// Shared state for the whole application
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub tickets: ticket_client::TicketClient,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        let tickets = ticket_client::TicketClient::from_config(&config.upstream);
        Arc::new(Self { config, tickets })
    }
}
