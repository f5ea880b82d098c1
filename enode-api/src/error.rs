use crate::decode::DecodeError;
use enode_auth::AuthError;
use thiserror::Error;

/// Failures surfaced by [`crate::Client`]
#[derive(Debug, Error)]
pub enum EnodeApiError {
    /// Credentials rejected (HTTP 401/403); not retried
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Timeouts, network/DNS failures and non-auth HTTP failures
    #[error("Communication error: {0}")]
    Communication(String),

    /// Payload did not match the documented schema
    #[error(transparent)]
    Malformed(#[from] DecodeError),

    #[error("Client error: {0}")]
    Client(String),
}

/// The three-way taxonomy callers recover on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Communication,
    Client,
}

impl EnodeApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Communication(_) => ErrorKind::Communication,
            Self::Malformed(_) | Self::Client(_) => ErrorKind::Client,
        }
    }
}

impl From<AuthError> for EnodeApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Authentication(msg) => Self::Authentication(msg),
            AuthError::Communication(msg) => Self::Communication(msg),
            AuthError::Client(msg) | AuthError::Configuration(msg) => Self::Client(msg),
        }
    }
}

impl From<reqwest::Error> for EnodeApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Communication(format!("Timeout error fetching information - {}", err))
        } else if err.is_connect() || err.is_request() || err.is_body() {
            Self::Communication(format!("Error fetching information - {}", err))
        } else if err.is_decode() {
            Self::Client(format!("Response body is not valid JSON - {}", err))
        } else {
            Self::Client(format!("Something really wrong happened - {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodeErrorKind;

    #[test]
    fn auth_errors_keep_their_kind() {
        let err = EnodeApiError::from(AuthError::Authentication("bad".into()));
        assert_eq!(err.kind(), ErrorKind::Authentication);

        let err = EnodeApiError::from(AuthError::Communication("down".into()));
        assert_eq!(err.kind(), ErrorKind::Communication);

        let err = EnodeApiError::from(AuthError::Configuration("broken".into()));
        assert_eq!(err.kind(), ErrorKind::Client);
    }

    #[test]
    fn malformed_payload_is_a_client_error_with_its_path() {
        let err = EnodeApiError::from(DecodeError {
            path: "data[0].information.vin".to_string(),
            kind: DecodeErrorKind::Missing,
        });

        assert_eq!(err.kind(), ErrorKind::Client);
        assert_eq!(
            err.to_string(),
            "Malformed payload at `data[0].information.vin`: missing field"
        );
    }
}
