use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The token endpoint rejected the client credentials (401/403).
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Timeouts, connection failures and non-auth HTTP failures.
    #[error("Communication error: {0}")]
    Communication(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AuthError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    pub fn is_communication(&self) -> bool {
        matches!(self, Self::Communication(_))
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AuthError::Communication(format!("Timeout requesting token - {}", err))
        } else if err.is_connect() || err.is_request() || err.is_body() {
            AuthError::Communication(format!("Error requesting token - {}", err))
        } else if err.is_decode() {
            AuthError::Client(format!("Malformed token response - {}", err))
        } else {
            AuthError::Client(format!("Unexpected token error - {}", err))
        }
    }
}

impl From<config::ConfigError> for AuthError {
    fn from(err: config::ConfigError) -> Self {
        AuthError::Configuration(err.to_string())
    }
}
