// Long-lived client credentials used to mint tokens

use std::fmt;

use crate::error::{ClientError, Result};

/// Secret pair issued in the Bank Account Data portal
///
/// Immutable once constructed. The remote service is the authority on
/// whether the pair is actually valid; construction only rejects blanks.
#[derive(Clone)]
pub struct Credentials {
    secret_id: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let secret_id = secret_id.into();
        let secret_key = secret_key.into();

        if secret_id.trim().is_empty() {
            return Err(ClientError::Config("secret_id must not be empty".to_string()));
        }
        if secret_key.trim().is_empty() {
            return Err(ClientError::Config("secret_key must not be empty".to_string()));
        }

        Ok(Self {
            secret_id,
            secret_key,
        })
    }

    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
