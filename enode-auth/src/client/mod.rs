mod config;
mod token_manager;

pub use config::Settings;
pub use token_manager::{needs_refresh, TokenManager, REFRESH_MARGIN, TOKEN_PATH};
