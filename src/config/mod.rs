use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub jwt: JwtConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Left as `None` when JWT_SECRET is unset; token issuance reports the
    /// configuration error at call time instead of crashing startup.
    pub secret: Option<String>,
    pub expires_in_hours: i64,
}

/// The upstream ticket store serving raw ticket rows.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .expect("PORT must be a valid number"),
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "bus_ticket_api=debug,tower_http=debug".to_string()),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").ok(),
                expires_in_hours: env::var("JWT_EXPIRES_IN_HOURS")
                    .unwrap_or_else(|_| "24".to_string())
                    .parse()
                    .expect("JWT_EXPIRES_IN_HOURS must be a valid number"),
            },
            upstream: UpstreamConfig {
                base_url: env::var("TICKET_STORE_URL").expect("TICKET_STORE_URL must be set"),
                timeout_seconds: env::var("TICKET_STORE_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("TICKET_STORE_TIMEOUT_SECONDS must be a valid number"),
            },
        }
    }
}
