//! Response envelope and application-level validation.
//!
//! Every Snooth response is wrapped as
//! `{"meta": {"errmsg": "...", "results": n, "status": n}, "<payload>": ...}`.
//! The service reports failures inside `meta.errmsg` with HTTP 200, so a body
//! that decoded fine still has to pass [`validate`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SnoothError};
use crate::models::text;

/// Message returned for a non-numeric `mp` filter.
pub const ERR_MIN_PRICE: &str = "minimum price (mp) is not numeric";
/// Message returned for a non-numeric `xp` filter.
pub const ERR_MAX_PRICE: &str = "maximum price (xp) is not numeric";
pub const ERR_AUTH_KEY: &str = "authentication key is wrong";
pub const ERR_LOCATION: &str = "invalid location identifier.";

const LOCATION_HINT: &str = "Bad location identifier. Both country and zipcode or lat, lng are \
                             required. Countries are formatted as 2 letter codes.";

/// Counts sometimes arrive as strings.
fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// The `meta` block of an envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, deserialize_with = "text")]
    pub errmsg: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub results: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub status: Option<i64>,
}

/// A decoded response body: the meta block plus every other top-level key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub meta: Meta,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl Envelope {
    /// Decode a response body. Anything that is not a JSON object with a
    /// `meta` block is a schema error.
    pub fn from_body(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| SnoothError::schema(format!("malformed response envelope: {e}")))
    }
}

/// Which meta field signals success for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Searches and detail lookups report `meta.results`.
    Read,
    /// Account, rating and wishlist writes report `meta.status`.
    Write,
}

/// Non-fatal result of validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// A read matched nothing.
    NoMatches,
    /// A write was accepted but not applied.
    Unsuccessful,
}

/// Check the meta block for a reported error, then classify the result.
pub fn validate(envelope: &Envelope, kind: ResponseKind) -> Result<Outcome> {
    let errmsg = envelope.meta.errmsg.trim();
    if !errmsg.is_empty() {
        return Err(classify_error(errmsg));
    }

    let outcome = match kind {
        ResponseKind::Read => match envelope.meta.results {
            Some(0) => Outcome::NoMatches,
            _ => Outcome::Success,
        },
        ResponseKind::Write => match envelope.meta.status {
            Some(1) | None => Outcome::Success,
            Some(_) => Outcome::Unsuccessful,
        },
    };
    Ok(outcome)
}

fn classify_error(errmsg: &str) -> SnoothError {
    match errmsg {
        ERR_MIN_PRICE | ERR_MAX_PRICE => SnoothError::TypeValidation {
            message: "Max/min price should be numeric".into(),
        },
        ERR_AUTH_KEY => SnoothError::Authentication {
            message: "Bad API key".into(),
        },
        ERR_LOCATION => SnoothError::ValueValidation {
            message: LOCATION_HINT.into(),
        },
        other => SnoothError::Client {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> Envelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn price_errors_are_type_errors() {
        for msg in [ERR_MIN_PRICE, ERR_MAX_PRICE] {
            let env = envelope(json!({"meta": {"errmsg": msg, "results": 0}}));
            let err = validate(&env, ResponseKind::Read).unwrap_err();
            assert!(matches!(err, SnoothError::TypeValidation { .. }), "{msg}");
        }
    }

    #[test]
    fn wrong_key_is_authentication_error() {
        let env = envelope(json!({"meta": {"errmsg": "authentication key is wrong", "results": 0}}));
        let err = validate(&env, ResponseKind::Read).unwrap_err();
        assert!(matches!(err, SnoothError::Authentication { .. }));
    }

    #[test]
    fn bad_location_is_value_error() {
        let env = envelope(json!({"meta": {"errmsg": "invalid location identifier."}}));
        match validate(&env, ResponseKind::Read).unwrap_err() {
            SnoothError::ValueValidation { message } => {
                assert!(message.contains("2 letter codes"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_message_is_client_error_with_raw_text() {
        let env = envelope(json!({"meta": {"errmsg": "wine id not found", "results": 0}}));
        match validate(&env, ResponseKind::Read).unwrap_err() {
            SnoothError::Client { message } => assert_eq!(message, "wine id not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_results_is_not_an_error() {
        let env = envelope(json!({"meta": {"errmsg": "", "results": 0}}));
        assert_eq!(validate(&env, ResponseKind::Read).unwrap(), Outcome::NoMatches);
    }

    #[test]
    fn results_present_is_success() {
        let env = envelope(json!({"meta": {"errmsg": "", "results": "3"}, "wines": []}));
        assert_eq!(env.meta.results, Some(3));
        assert_eq!(validate(&env, ResponseKind::Read).unwrap(), Outcome::Success);
    }

    #[test]
    fn write_status_drives_outcome() {
        let ok = envelope(json!({"meta": {"errmsg": "", "status": 1}}));
        assert_eq!(validate(&ok, ResponseKind::Write).unwrap(), Outcome::Success);

        let failed = envelope(json!({"meta": {"errmsg": "", "status": 0}}));
        assert_eq!(
            validate(&failed, ResponseKind::Write).unwrap(),
            Outcome::Unsuccessful
        );
    }

    #[test]
    fn payload_keys_are_kept() {
        let env = Envelope::from_body(r#"{"meta":{"errmsg":""},"store":{"id":1}}"#).unwrap();
        assert_eq!(env.payload["store"]["id"], 1);
        assert_eq!(env.meta.errmsg, "");
    }

    #[test]
    fn missing_meta_is_schema_error() {
        let err = Envelope::from_body(r#"{"wines": []}"#).unwrap_err();
        assert!(matches!(err, SnoothError::Schema { .. }));
        assert!(matches!(
            Envelope::from_body("<html>").unwrap_err(),
            SnoothError::Schema { .. }
        ));
    }
}
