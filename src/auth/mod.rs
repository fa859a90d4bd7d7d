// Authentication module
// Manages the token lifecycle: mint, cache, validate, refresh

mod clock;
mod credentials;
mod endpoint;
mod manager;
mod types;

pub use clock::{Clock, SystemClock};
pub use credentials::Credentials;
pub use endpoint::{HttpTokenEndpoint, TokenEndpoint, NEW_TOKEN_PATH, REFRESH_TOKEN_PATH};
pub use manager::AuthManager;
pub use types::{
    expiry_from_ttl, AuthDecision, NewTokenResponse, RefreshTokenResponse, TokenState,
};
