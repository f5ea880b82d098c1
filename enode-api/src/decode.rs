//! Schema-checked decoding of Enode JSON payloads.
//!
//! Response models derive `Deserialize` and are decoded through
//! `serde_path_to_error`, so a payload that does not match the documented
//! shape fails with the location of the problem (`data[1].information.vin`)
//! instead of being coerced or defaulted. Keys are required unless a model
//! says otherwise; fields using [`nullable`] still require the key but accept
//! `null`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{DeserializeOwned, Error as _, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// A payload value that does not match the expected schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed payload at `{path}`: {kind}")]
pub struct DecodeError {
    pub path: String,
    pub kind: DecodeErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    #[error("missing field")]
    Missing,
    #[error("{0}")]
    WrongType(String),
    #[error("{0}")]
    Invalid(String),
}

impl DecodeError {
    fn new(path: String, kind: DecodeErrorKind) -> Self {
        Self {
            path: if path.is_empty() { "<root>".to_string() } else { path },
            kind,
        }
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for DecodeError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = match err.path().to_string() {
            root if root == "." => String::new(),
            path => path,
        };
        let message = err.inner().to_string();

        // Missing keys are reported against the enclosing object
        if let Some(field) = message
            .strip_prefix("missing field `")
            .and_then(|rest| rest.strip_suffix('`'))
        {
            let path = if path.is_empty() {
                field.to_string()
            } else {
                format!("{}.{}", path, field)
            };
            return Self::new(path, DecodeErrorKind::Missing);
        }

        let kind = if message.starts_with("invalid type: ") {
            DecodeErrorKind::WrongType(message)
        } else {
            DecodeErrorKind::Invalid(message)
        };
        Self::new(path, kind)
    }
}

/// Decode `value` into `T`, reporting failures with their field path
pub fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T, DecodeError> {
    serde_path_to_error::deserialize(value).map_err(DecodeError::from)
}

/// Key must be present; `null` reads as `None`
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// `null` reads as the default; pair with `#[serde(default)]` for absent keys
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Integer percentage in `0..=100`
pub(crate) fn percentage<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u8::deserialize(deserializer)?;
    if value > 100 {
        return Err(D::Error::invalid_value(
            Unexpected::Unsigned(value.into()),
            &"a percentage between 0 and 100",
        ));
    }
    Ok(value)
}

/// ISO-8601 timestamp; key required, `null` and `""` both read as absent
pub(crate) fn datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_datetime(&raw)
            .map_err(|e| D::Error::custom(format!("invalid datetime {:?}: {}", raw, e))),
    }
}

/// Parse an ISO-8601 timestamp into UTC.
///
/// `Z` and explicit offsets are honoured; a timestamp without an offset is
/// taken to be UTC. An empty string is absent.
pub fn parse_datetime(raw: &str) -> Result<Option<DateTime<Utc>>, chrono::ParseError> {
    if raw.is_empty() {
        return Ok(None);
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(Some(dt.with_timezone(&Utc))),
        Err(err) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Some(naive.and_utc()))
            .map_err(|_| err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Outer {
        outer: Middle,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Middle {
        inner: Named,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Named {
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct Level {
        #[serde(deserialize_with = "percentage")]
        level: u8,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Year {
        year: u16,
    }

    #[derive(Debug, Deserialize)]
    struct Rate {
        #[serde(deserialize_with = "nullable")]
        rate: Option<f64>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Lenient {
        #[serde(deserialize_with = "or_default")]
        flag: bool,
        #[serde(deserialize_with = "or_default")]
        ids: Vec<String>,
    }

    #[derive(Debug, Deserialize)]
    struct Stamp {
        #[serde(deserialize_with = "datetime")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn paths_follow_nesting() {
        let err = from_value::<Outer>(&json!({ "outer": { "inner": { "leaf": 1 } } }))
            .unwrap_err();

        assert_eq!(err.path, "outer.inner.name");
        assert_eq!(err.kind, DecodeErrorKind::Missing);
    }

    #[test]
    fn numbers_are_not_coerced_from_strings() {
        let err = from_value::<Level>(&json!({ "level": "72" })).unwrap_err();

        assert_eq!(err.path, "level");
        assert!(matches!(err.kind, DecodeErrorKind::WrongType(_)));
    }

    #[test]
    fn integers_reject_fractions() {
        let err = from_value::<Year>(&json!({ "year": 2024.5 })).unwrap_err();

        assert_eq!(err.path, "year");
        assert!(matches!(err.kind, DecodeErrorKind::WrongType(_)));
    }

    #[test]
    fn percentage_is_bounded() {
        assert_eq!(from_value::<Level>(&json!({ "level": 100 })).unwrap().level, 100);
        assert_eq!(from_value::<Level>(&json!({ "level": 0 })).unwrap().level, 0);

        for out_of_range in [json!(101), json!(-1), json!(300)] {
            let err = from_value::<Level>(&json!({ "level": out_of_range })).unwrap_err();
            assert_eq!(err.path, "level");
            assert!(matches!(err.kind, DecodeErrorKind::Invalid(_)));
        }
    }

    #[test]
    fn nullable_requires_the_key_but_accepts_null() {
        assert_eq!(from_value::<Rate>(&json!({ "rate": null })).unwrap().rate, None);
        assert_eq!(from_value::<Rate>(&json!({ "rate": 7 })).unwrap().rate, Some(7.0));

        let err = from_value::<Rate>(&json!({})).unwrap_err();
        assert_eq!(err.path, "rate");
        assert_eq!(err.kind, DecodeErrorKind::Missing);
    }

    #[test]
    fn lenient_fields_default_when_absent_or_null() {
        let lenient = from_value::<Lenient>(&json!({ "flag": null })).unwrap();

        assert!(!lenient.flag);
        assert!(lenient.ids.is_empty());
    }

    #[test]
    fn lenient_fields_still_reject_wrong_types() {
        let err = from_value::<Lenient>(&json!({ "flag": "yes" })).unwrap_err();
        assert_eq!(err.path, "flag");

        let err = from_value::<Lenient>(&json!({ "ids": [1] })).unwrap_err();
        assert_eq!(err.path, "ids[0]");
    }

    #[test]
    fn datetimes_normalise_to_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        assert_eq!(parse_datetime("2024-05-01T10:00:00Z").unwrap(), Some(expected));
        assert_eq!(parse_datetime("2024-05-01T12:00:00+02:00").unwrap(), Some(expected));
        assert_eq!(parse_datetime("2024-05-01T10:00:00.000Z").unwrap(), Some(expected));
        assert_eq!(parse_datetime("2024-05-01T10:00:00.000").unwrap(), Some(expected));
        assert_eq!(parse_datetime("").unwrap(), None);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn datetime_field_handles_null_empty_and_garbage() {
        assert_eq!(from_value::<Stamp>(&json!({ "at": null })).unwrap().at, None);
        assert_eq!(from_value::<Stamp>(&json!({ "at": "" })).unwrap().at, None);

        let err = from_value::<Stamp>(&json!({ "at": "not a date" })).unwrap_err();
        assert_eq!(err.path, "at");
        assert!(matches!(err.kind, DecodeErrorKind::Invalid(_)));

        let err = from_value::<Stamp>(&json!({ "at": 17 })).unwrap_err();
        assert!(matches!(err.kind, DecodeErrorKind::WrongType(_)));

        let err = from_value::<Stamp>(&json!({})).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Missing);
    }

    #[test]
    fn root_errors_are_labelled() {
        let err = from_value::<Rate>(&json!("not an object")).unwrap_err();
        assert_eq!(err.path, "<root>");
    }
}
