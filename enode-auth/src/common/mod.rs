mod models;

pub use models::{Credentials, Token};
