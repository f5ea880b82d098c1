use serde::Deserialize;

/// Body of a successful `/oauth2/token` response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u32,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Form body of the client-credentials grant
pub const CLIENT_CREDENTIALS_FORM: [(&str, &str); 1] = [("grant_type", "client_credentials")];
