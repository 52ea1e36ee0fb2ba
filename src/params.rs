//! Per-operation parameters and their translation into a [`Query`].
//!
//! Defaults mirror what the service expects when an argument is left out.
//! Every `build_query` runs the client-side checks (lat/lng pairing) before
//! anything is sent.

use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, SnoothError};
use crate::models::Credentials;
use crate::query::{check_lat_lng, paginate, translate_bool, Query};
use crate::session::Session;
use crate::transport::Method;

// ---- Wine search ----------------------------------------------------------

/// Parameters for searching wines.
#[derive(Debug, Clone)]
pub struct WineSearchParams {
    pub query: String,
    pub count: u32,
    pub page: u32,
    /// Explicit one-indexed offset; when unset it is derived from `page`.
    pub first_result: Option<u32>,
    pub available: bool,
    pub product_type: Option<String>,
    pub color: Option<String>,
    pub store_id: Option<String>,
    pub country: Option<String>,
    pub zipcode: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub sort: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rank: Option<f64>,
    pub max_rank: Option<f64>,
    pub lang: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for WineSearchParams {
    fn default() -> Self {
        Self {
            query: "wine".into(),
            count: 10,
            page: 1,
            first_result: None,
            available: false,
            product_type: None,
            color: None,
            store_id: None,
            country: None,
            zipcode: None,
            lat: None,
            lng: None,
            sort: None,
            min_price: None,
            max_price: None,
            min_rank: None,
            max_rank: None,
            lang: None,
            timeout: None,
        }
    }
}

impl WineSearchParams {
    pub fn build_query(&self, session: &Session) -> Result<Query> {
        check_lat_lng(self.lat, self.lng)?;
        let mut query = session.basic_query();
        query.set("q", &self.query);
        query.set("f", paginate(self.count, self.page, self.first_result));
        query.set("n", self.count);
        query.set("a", translate_bool(self.available));
        query.set_opt("t", self.product_type.as_deref());
        query.set_opt("color", self.color.as_deref());
        query.set_opt("m", self.store_id.as_deref());
        query.set_opt("c", self.country.as_deref());
        query.set_opt("z", self.zipcode.as_deref());
        query.set_opt("lat", self.lat);
        query.set_opt("lng", self.lng);
        query.set_opt("s", self.sort.as_deref());
        query.set_opt("mp", self.min_price);
        query.set_opt("xp", self.max_price);
        query.set_opt("mr", self.min_rank);
        query.set_opt("xr", self.max_rank);
        query.set_opt("lang", self.lang.as_deref());
        Ok(query)
    }
}

// ---- Wine detail ----------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct WineDetailParams {
    /// Falls back per field to the session credentials.
    pub credentials: Option<Credentials>,
    /// Include merchant prices.
    pub price: bool,
    pub country: Option<String>,
    pub zipcode: Option<String>,
    /// Include food pairings.
    pub pairings: bool,
    pub photos: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub language: Option<String>,
    pub timeout: Option<Duration>,
}

impl WineDetailParams {
    pub fn build_query(&self, session: &Session, wine_id: &str) -> Result<Query> {
        check_lat_lng(self.lat, self.lng)?;
        let creds = session.resolve_credentials(self.credentials.as_ref());
        let mut query = session.basic_query();
        query.set("id", wine_id);
        query.set_opt("u", creds.username.as_deref());
        query.set_opt("p", creds.password.as_deref());
        query.set("i", translate_bool(self.price));
        query.set_opt("c", self.country.as_deref());
        query.set_opt("z", self.zipcode.as_deref());
        query.set("food", translate_bool(self.pairings));
        query.set("photos", translate_bool(self.photos));
        query.set_opt("lat", self.lat);
        query.set_opt("lng", self.lng);
        query.set_opt("lang", self.language.as_deref());
        Ok(query)
    }
}

// ---- My wines -------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MyWinesParams {
    pub credentials: Option<Credentials>,
    pub count: u32,
    pub page: u32,
    pub ratings: bool,
    pub wishlist: bool,
    pub cellar: bool,
    pub timeout: Option<Duration>,
}

impl Default for MyWinesParams {
    fn default() -> Self {
        Self {
            credentials: None,
            count: 10,
            page: 1,
            ratings: true,
            wishlist: true,
            cellar: true,
            timeout: None,
        }
    }
}

impl MyWinesParams {
    pub fn build_query(&self, session: &Session) -> Result<Query> {
        let creds = session.resolve_credentials(self.credentials.as_ref());
        let mut query = session.basic_query();
        query.set_opt("username", creds.username.as_deref());
        query.set_opt("password", creds.password.as_deref());
        query.set("n", self.count);
        query.set("pg", self.page);
        query.set("r", translate_bool(self.ratings));
        query.set("w", translate_bool(self.wishlist));
        query.set("c", translate_bool(self.cellar));
        Ok(query)
    }
}

// ---- Rating ---------------------------------------------------------------

/// Whether a rating creates a new review or updates an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RateMethod {
    #[default]
    Create,
    Update,
}

impl RateMethod {
    pub fn http_method(self) -> Method {
        match self {
            RateMethod::Create => Method::Post,
            RateMethod::Update => Method::Put,
        }
    }
}

impl FromStr for RateMethod {
    type Err = SnoothError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "POST" => Ok(RateMethod::Create),
            "PUT" => Ok(RateMethod::Update),
            _ => Err(SnoothError::validation(
                "Please use method=\"POST\" to create a new review or method=\"PUT\" to update a review.",
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RateWineParams {
    pub method: RateMethod,
    pub credentials: Option<Credentials>,
    pub rating: Option<u32>,
    pub review: Option<String>,
    pub private: bool,
    pub tags: Option<String>,
    pub wishlist: bool,
    pub cellar_count: Option<u32>,
    pub timeout: Option<Duration>,
}

impl RateWineParams {
    pub fn build_query(&self, session: &Session, wine_id: &str) -> Result<Query> {
        let creds = session.resolve_credentials(self.credentials.as_ref());
        let mut query = session.basic_query();
        query.set("id", wine_id);
        query.set_opt("u", creds.username.as_deref());
        query.set_opt("p", creds.password.as_deref());
        query.set_opt("r", self.rating);
        query.set_opt("b", self.review.as_deref());
        query.set("v", translate_bool(self.private));
        query.set_opt("t", self.tags.as_deref());
        query.set("w", translate_bool(self.wishlist));
        query.set_opt("c", self.cellar_count);
        Ok(query)
    }
}

// ---- Wishlist -------------------------------------------------------------

pub(crate) fn wishlist_query(
    session: &Session,
    wine_id: &str,
    credentials: Option<&Credentials>,
) -> Query {
    let creds = session.resolve_credentials(credentials);
    let mut query = session.basic_query();
    query.set("id", wine_id);
    query.set_opt("username", creds.username.as_deref());
    query.set_opt("password", creds.password.as_deref());
    query
}

// ---- Stores ---------------------------------------------------------------

/// Store lookup by country + zipcode, or by coordinates.
#[derive(Debug, Clone, Default)]
pub struct StoreSearchParams {
    /// Two-letter country code.
    pub country: Option<String>,
    pub zipcode: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub timeout: Option<Duration>,
}

impl StoreSearchParams {
    pub fn build_query(&self, session: &Session) -> Result<Query> {
        check_lat_lng(self.lat, self.lng)?;
        let mut query = session.basic_query();
        query.set_opt("c", self.country.as_deref());
        query.set_opt("z", self.zipcode.as_deref());
        query.set_opt("lat", self.lat);
        query.set_opt("lng", self.lng);
        Ok(query)
    }
}

#[derive(Debug, Clone)]
pub struct StoreDetailParams {
    pub reviews: bool,
    pub timeout: Option<Duration>,
}

impl Default for StoreDetailParams {
    fn default() -> Self {
        Self {
            reviews: true,
            timeout: None,
        }
    }
}

impl StoreDetailParams {
    pub fn build_query(&self, session: &Session, store_id: &str) -> Result<Query> {
        let mut query = session.basic_query();
        query.set("id", store_id);
        query.set("reviews", translate_bool(self.reviews));
        Ok(query)
    }
}

// ---- Accounts -------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct CreateAccountParams {
    pub email: Option<String>,
    pub screen_name: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<Duration>,
}

impl CreateAccountParams {
    pub fn build_query(&self, session: &Session) -> Result<Query> {
        let mut query = session.base_query();
        query.set_opt("e", self.email.as_deref());
        query.set_opt("s", self.screen_name.as_deref());
        query.set_opt("p", self.password.as_deref());
        Ok(query)
    }
}

// ---- User activity --------------------------------------------------------

#[derive(Debug, Clone)]
pub struct UserActivityParams {
    pub before_date: String,
    pub count: u32,
    pub page: u32,
    pub first_result: Option<u32>,
    pub timeout: Option<Duration>,
}

impl Default for UserActivityParams {
    fn default() -> Self {
        Self {
            before_date: "now".into(),
            count: 50,
            page: 1,
            first_result: Some(1),
            timeout: None,
        }
    }
}

impl UserActivityParams {
    pub fn build_query(&self, session: &Session) -> Result<Query> {
        let mut query = session.base_query();
        query.set("b", &self.before_date);
        query.set("f", paginate(self.count, self.page, self.first_result));
        query.set("n", self.count);
        Ok(query)
    }
}
