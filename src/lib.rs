// Bank Account Data client - library root

pub mod api;
pub mod auth;
pub mod config;
pub mod currency;
pub mod error;
pub mod http_client;
pub mod models;
pub mod utils;

pub use auth::{AuthManager, Credentials, TokenState};
pub use error::{ClientError, Result};
pub use http_client::BankDataClient;
