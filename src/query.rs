//! Query building blocks shared by every endpoint.
//!
//! A [`Query`] is a flat map from short parameter codes (`q`, `f`, `n`, `mp`,
//! ...) to already-encoded values. Unset values never reach the wire: writing
//! `None` over a key removes it, so "absent" and "null" encode the same way.

use std::collections::BTreeMap;

use crate::error::{Result, SnoothError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: BTreeMap<String, String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl ToString) {
        self.params.insert(key.to_string(), value.to_string());
    }

    /// Set `key` when `value` is present, otherwise remove it.
    pub fn set_opt<T: ToString>(&mut self, key: &str, value: Option<T>) {
        match value {
            Some(v) => self.set(key, v),
            None => {
                self.params.remove(key);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Key/value pairs in a stable (sorted) order, ready for `RequestBuilder::query`.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Translate a flag argument to the service's `0`/`1` encoding.
///
/// Only a literal `false` becomes `0`. Everything else, including `0`, `""`
/// and `null`, becomes `1`.
pub fn translate_bool(value: impl Into<serde_json::Value>) -> u8 {
    match value.into() {
        serde_json::Value::Bool(false) => 0,
        _ => 1,
    }
}

/// One-indexed result offset for a page.
///
/// Without an explicit offset this yields `page * count + 1`, so page 1 with
/// 10 results per page starts at result 11.
pub fn paginate(count: u32, page: u32, first_result: Option<u32>) -> u32 {
    first_result.unwrap_or_else(|| page.saturating_mul(count).saturating_add(1))
}

/// Latitude and longitude must be given together or not at all.
pub fn check_lat_lng(lat: Option<f64>, lng: Option<f64>) -> Result<()> {
    if lat.is_some() != lng.is_some() {
        return Err(SnoothError::validation("Must pass both lat and lng"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_literal_false_translates_to_zero() {
        assert_eq!(translate_bool(false), 0);
        assert_eq!(translate_bool(true), 1);
        assert_eq!(translate_bool(0), 1);
        assert_eq!(translate_bool(""), 1);
        assert_eq!(translate_bool("false"), 1);
        assert_eq!(translate_bool(json!(null)), 1);
        assert_eq!(translate_bool(json!({"x": 1})), 1);
    }

    #[test]
    fn paginator_defaults_to_page_times_count_plus_one() {
        assert_eq!(paginate(10, 1, None), 11);
        assert_eq!(paginate(10, 0, None), 1);
        assert_eq!(paginate(25, 3, None), 76);
    }

    #[test]
    fn explicit_first_result_wins() {
        assert_eq!(paginate(10, 5, Some(1)), 1);
        assert_eq!(paginate(50, 1, Some(7)), 7);
    }

    #[test]
    fn lat_lng_pairing() {
        assert!(check_lat_lng(None, None).is_ok());
        assert!(check_lat_lng(Some(40.7), Some(-74.0)).is_ok());

        let err = check_lat_lng(Some(40.7), None).unwrap_err();
        assert!(matches!(err, SnoothError::Validation { .. }));
        assert!(check_lat_lng(None, Some(-74.0)).is_err());
    }

    #[test]
    fn set_opt_none_removes_existing_key() {
        let mut query = Query::new();
        query.set("u", "alice");
        query.set_opt::<&str>("u", None);
        assert!(!query.contains("u"));
        assert!(query.is_empty());
    }

    #[test]
    fn pairs_are_sorted() {
        let mut query = Query::new();
        query.set("q", "merlot");
        query.set("akey", "k");
        query.set("n", 10);
        assert_eq!(query.pairs(), vec![("akey", "k"), ("n", "10"), ("q", "merlot")]);
    }
}
