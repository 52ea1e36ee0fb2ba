//! Extract endpoint payloads from a validated envelope and optionally turn
//! them into value objects.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::envelope::Envelope;
use crate::error::{Result, SnoothError};
use crate::models::{Credentials, Wine, WineStore, Winery};

/// Take the value stored under the first of `keys` that is present.
///
/// A missing key means the envelope has an unexpected shape.
pub fn take_payload(envelope: &mut Envelope, keys: &[&str]) -> Result<Value> {
    keys.iter()
        .find_map(|key| envelope.payload.remove(*key))
        .ok_or_else(|| SnoothError::schema(format!("response has no \"{}\" payload", keys.join("\" or \""))))
}

/// Take a list payload, treating an absent or `null` key as an empty list.
///
/// Listings omit the key when nothing matched; a lone object is treated as a
/// one-element list.
pub fn take_list(envelope: &mut Envelope, key: &str) -> Result<Vec<Value>> {
    match envelope.payload.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(item @ Value::Object(_)) => Ok(vec![item]),
        Some(other) => Err(SnoothError::schema(format!(
            "\"{key}\" payload is not a list: {other}"
        ))),
    }
}

fn project<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| SnoothError::schema(format!("{what} record has an unexpected shape: {e}")))
}

/// Turn raw wine records into [`Wine`]s bound to `credentials`.
pub fn wineify(records: Vec<Value>, credentials: &Credentials) -> Result<Vec<Wine>> {
    records
        .into_iter()
        .map(|record| {
            let mut wine: Wine = project(record, "wine")?;
            wine.credentials = credentials.clone();
            Ok(wine)
        })
        .collect()
}

/// Turn raw store records into [`WineStore`]s.
pub fn storeify(records: Vec<Value>) -> Result<Vec<WineStore>> {
    records
        .into_iter()
        .map(|record| project(record, "store"))
        .collect()
}

pub fn store(record: Value) -> Result<WineStore> {
    project(record, "store")
}

pub fn winery(record: Value) -> Result<Winery> {
    project(record, "winery")
}
