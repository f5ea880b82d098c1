use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};

/// Client-credentials pair supplied at configuration time
#[derive(Debug)]
pub struct Credentials {
    pub client_id: String,
    client_secret: SecretString,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        }
    }

    pub fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

/// Bearer token issued by the token endpoint.
///
/// A token is never mutated; every refresh produces a new one.
#[derive(Debug)]
pub struct Token {
    access_token: SecretString,
    pub expires_in: u32,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    pub fn issue(
        access_token: impl Into<String>,
        expires_in: u32,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            expires_in,
            issued_at,
            expires_at: issued_at + Duration::seconds(i64::from(expires_in)),
        }
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Validity left at `now`; negative once expired
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at - now
    }
}
