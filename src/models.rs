use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::client::SnoothClient;
use crate::envelope::Envelope;
use crate::error::Result;
use crate::params::{RateWineParams, WineDetailParams};

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Copy any scalar into a string; missing and `null` become `""`.
pub(crate) fn text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// `1` (or `true`) means set; anything else means unset.
fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    })
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Username/password pair used by account-bound endpoints.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Fill each unset (or empty) field from `fallback`.
    pub fn or(&self, fallback: &Credentials) -> Credentials {
        fn pick(primary: &Option<String>, fallback: &Option<String>) -> Option<String> {
            match primary {
                Some(v) if !v.is_empty() => Some(v.clone()),
                _ => fallback.clone(),
            }
        }
        Credentials {
            username: pick(&self.username, &fallback.username),
            password: pick(&self.password, &fallback.password),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Wines
// ---------------------------------------------------------------------------

/// A wine record from a search or my-wines listing.
///
/// Every descriptive field is kept as the service's text; missing fields are
/// empty strings. `credentials` is attached by
/// [`SnoothClient::wineify`] so follow-up calls act as the same account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wine {
    #[serde(default, deserialize_with = "text")]
    pub code: String,
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub winery: String,
    #[serde(default, deserialize_with = "text")]
    pub winery_id: String,
    #[serde(default, deserialize_with = "text")]
    pub vintage: String,
    #[serde(default, deserialize_with = "text")]
    pub region: String,
    #[serde(default, deserialize_with = "text")]
    pub varietal: String,
    #[serde(rename = "type", default, deserialize_with = "text")]
    pub wine_type: String,
    #[serde(default, deserialize_with = "text")]
    pub link: String,
    #[serde(default, deserialize_with = "text")]
    pub image: String,
    #[serde(default, deserialize_with = "text")]
    pub num_merchants: String,
    #[serde(default, deserialize_with = "text")]
    pub price: String,
    #[serde(default, deserialize_with = "text")]
    pub num_reviews: String,
    #[serde(default, deserialize_with = "text")]
    pub tags: String,
    #[serde(default, deserialize_with = "text")]
    pub snoothrank: String,
    #[serde(default, deserialize_with = "flag")]
    pub available: bool,
    #[serde(skip)]
    pub credentials: Credentials,
}

impl Wine {
    /// Fetch the full detail record for this wine as the bound account.
    pub fn detail(
        &self,
        client: &SnoothClient,
        params: &WineDetailParams,
    ) -> Result<serde_json::Value> {
        let mut params = params.clone();
        params.credentials = Some(match params.credentials.take() {
            Some(explicit) => explicit.or(&self.credentials),
            None => self.credentials.clone(),
        });
        client.wine_detail(&self.code, &params)
    }

    /// Rate or review this wine as the account it was projected for.
    ///
    /// Credentials in `params` take precedence over the bound ones.
    pub fn rate(&self, client: &SnoothClient, params: &RateWineParams) -> Result<Envelope> {
        let mut params = params.clone();
        params.credentials = Some(match params.credentials.take() {
            Some(explicit) => explicit.or(&self.credentials),
            None => self.credentials.clone(),
        });
        client.rate_wine(&self.code, &params)
    }

    /// Add this wine to the bound account's wishlist.
    pub fn add_to_wishlist(
        &self,
        client: &SnoothClient,
        timeout: Option<Duration>,
    ) -> Result<Envelope> {
        client.wishlist(&self.code, Some(&self.credentials), timeout)
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WineStore {
    #[serde(default, deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub address: String,
    #[serde(default, deserialize_with = "text")]
    pub city: String,
    #[serde(default, deserialize_with = "text")]
    pub state: String,
    #[serde(default, deserialize_with = "text")]
    pub country: String,
    #[serde(default, deserialize_with = "text")]
    pub zip: String,
    #[serde(default, deserialize_with = "text")]
    pub phone: String,
    #[serde(default, deserialize_with = "text")]
    pub url: String,
    #[serde(default, deserialize_with = "text")]
    pub link: String,
    #[serde(default, deserialize_with = "text")]
    pub image: String,
    #[serde(default, deserialize_with = "text")]
    pub lat: String,
    #[serde(default, deserialize_with = "text")]
    pub lng: String,
    #[serde(default, deserialize_with = "text")]
    pub rating: String,
    #[serde(default, deserialize_with = "text")]
    pub num_ratings: String,
    #[serde(default, deserialize_with = "text")]
    pub num_wines: String,
    #[serde(default, deserialize_with = "flag")]
    pub closed: bool,
}

// ---------------------------------------------------------------------------
// Wineries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Winery {
    #[serde(default, deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub address: String,
    #[serde(default, deserialize_with = "text")]
    pub city: String,
    #[serde(default, deserialize_with = "text")]
    pub region: String,
    #[serde(default, deserialize_with = "text")]
    pub country: String,
    #[serde(default, deserialize_with = "text")]
    pub zip: String,
    #[serde(default, deserialize_with = "text")]
    pub phone: String,
    #[serde(default, deserialize_with = "text")]
    pub url: String,
    #[serde(default, deserialize_with = "text")]
    pub link: String,
    #[serde(default, deserialize_with = "text")]
    pub image: String,
    #[serde(default, deserialize_with = "text")]
    pub lat: String,
    #[serde(default, deserialize_with = "text")]
    pub lng: String,
    #[serde(default, deserialize_with = "text")]
    pub num_wines: String,
    #[serde(default, deserialize_with = "text")]
    pub description: String,
}
