pub mod vehicles;

use crate::decode::nullable;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// An Enode API call: where it goes and what it decodes to
pub trait Request {
    type Query: Serialize;
    type Response: DeserializeOwned;

    fn method(&self) -> Method {
        Method::GET
    }

    fn endpoint(&self) -> Cow<'_, str>;

    fn query(&self) -> Option<&Self::Query> {
        None
    }
}

/// Cursor markers of a paginated list response
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(deserialize_with = "nullable")]
    pub after: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub before: Option<String>,
}
