// Token and credential types shared by the client and its callers
pub mod common;

mod client;
mod error;

pub use client::{needs_refresh, Settings, TokenManager, REFRESH_MARGIN, TOKEN_PATH};
pub use common::{Credentials, Token};
pub use error::AuthError;
