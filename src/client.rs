use std::time::Duration;

use serde_json::Value;

use crate::envelope::{validate, Envelope, Outcome, ResponseKind};
use crate::error::{Result, SnoothError};
use crate::models::{Credentials, Wine, WineStore, Winery};
use crate::params::{
    wishlist_query, CreateAccountParams, MyWinesParams, RateWineParams, StoreDetailParams,
    StoreSearchParams, UserActivityParams, WineDetailParams, WineSearchParams,
};
use crate::project;
use crate::query::Query;
use crate::session::Session;
use crate::transport::{check_status, HttpRequest, HttpTransport, Method, Transport};

pub const DEFAULT_BASE_URL: &str = "https://api.snooth.com";

const WINE_SEARCH_PATH: &str = "/wines/";
const WINE_DETAIL_PATH: &str = "/wine/";
const MY_WINES_PATH: &str = "/my-wines/";
const WINERY_DETAIL_PATH: &str = "/winery/";
const RATE_WINE_PATH: &str = "/rate/";
const WISHLIST_PATH: &str = "/wishlist/";
const STORE_SEARCH_PATH: &str = "/stores/";
const STORE_DETAIL_PATH: &str = "/store/";
const CREATE_ACCOUNT_PATH: &str = "/create-account/";
const USER_ACTIVITY_PATH: &str = "/action/";

// ---------------------------------------------------------------------------
// Internal request pipeline
// ---------------------------------------------------------------------------

/// Runs every call through the same steps: transport, status check, decode,
/// envelope validation.
struct BaseClient {
    base_url: String,
    session: Session,
    transport: Box<dyn Transport>,
}

impl BaseClient {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn call(
        &self,
        method: Method,
        path: &str,
        query: Query,
        timeout: Option<Duration>,
        kind: ResponseKind,
    ) -> Result<Envelope> {
        let request = HttpRequest {
            method,
            url: self.url(path),
            query,
            timeout: self.session.resolve_timeout(timeout),
        };
        tracing::debug!(method = method.as_str(), url = %request.url, "sending snooth request");

        let response = self.transport.execute(&request)?;
        check_status(&response)?;
        let envelope = Envelope::from_body(&response.body)?;

        match validate(&envelope, kind)? {
            Outcome::Success => {}
            Outcome::NoMatches => tracing::warn!(path, "No matches, check query"),
            Outcome::Unsuccessful => {
                tracing::warn!(path, status = ?envelope.meta.status, "request was not applied")
            }
        }
        Ok(envelope)
    }

    // ---- convenience wrappers for common HTTP verbs -----------------------

    fn get(&self, path: &str, query: Query, timeout: Option<Duration>) -> Result<Envelope> {
        self.call(Method::Get, path, query, timeout, ResponseKind::Read)
    }

    fn post(&self, path: &str, query: Query, timeout: Option<Duration>) -> Result<Envelope> {
        self.call(Method::Post, path, query, timeout, ResponseKind::Write)
    }

    fn put(&self, path: &str, query: Query, timeout: Option<Duration>) -> Result<Envelope> {
        self.call(Method::Put, path, query, timeout, ResponseKind::Write)
    }
}

// ---------------------------------------------------------------------------
// Public client
// ---------------------------------------------------------------------------

/// Main entry point for the Snooth API.
///
/// ```no_run
/// use snooth_client::{Session, SnoothClient, WineSearchParams};
///
/// let client = SnoothClient::new(Session::new("my-api-key")).unwrap();
/// let wines = client
///     .search_wines(&WineSearchParams {
///         query: "barolo".into(),
///         ..Default::default()
///     })
///     .unwrap();
/// for wine in &wines {
///     println!("{} ({})", wine.name, wine.vintage);
/// }
/// ```
pub struct SnoothClient {
    base: BaseClient,
}

impl SnoothClient {
    /// Create a client for the production service.
    pub fn new(session: Session) -> Result<Self> {
        Self::with_base_url(session, DEFAULT_BASE_URL)
    }

    /// Create a client against another root URL, e.g. a mock server.
    pub fn with_base_url(session: Session, base_url: &str) -> Result<Self> {
        Ok(Self::with_transport(session, base_url, HttpTransport::new()?))
    }

    /// Create a client that sends requests through `transport`.
    pub fn with_transport(
        session: Session,
        base_url: &str,
        transport: impl Transport + 'static,
    ) -> Self {
        Self {
            base: BaseClient {
                base_url: base_url.trim_end_matches('/').to_string(),
                session,
                transport: Box::new(transport),
            },
        }
    }

    pub fn session(&self) -> &Session {
        &self.base.session
    }

    pub fn base_url(&self) -> &str {
        &self.base.base_url
    }

    // -- wines ----------------------------------------------------------------

    /// Search wines, returning the raw records.
    pub fn wine_search(&self, params: &WineSearchParams) -> Result<Vec<Value>> {
        let query = params.build_query(self.session())?;
        let mut envelope = self.base.get(WINE_SEARCH_PATH, query, params.timeout)?;
        project::take_list(&mut envelope, "wines")
    }

    /// Search wines and project the results into [`Wine`]s bound to the
    /// session's credentials.
    pub fn search_wines(&self, params: &WineSearchParams) -> Result<Vec<Wine>> {
        let records = self.wine_search(params)?;
        self.wineify(records, None)
    }

    /// Full detail for one wine.
    pub fn wine_detail(&self, wine_id: &str, params: &WineDetailParams) -> Result<Value> {
        let query = params.build_query(self.session(), wine_id)?;
        let mut envelope = self.base.get(WINE_DETAIL_PATH, query, params.timeout)?;
        project::take_payload(&mut envelope, &["wines", "wine"])
    }

    /// Wines the account has rated, wishlisted or cellared.
    pub fn my_wines(&self, params: &MyWinesParams) -> Result<Vec<Value>> {
        let query = params.build_query(self.session())?;
        let mut envelope = self.base.get(MY_WINES_PATH, query, params.timeout)?;
        project::take_list(&mut envelope, "wines")
    }

    /// Create (POST) or update (PUT) a rating/review.
    pub fn rate_wine(&self, wine_id: &str, params: &RateWineParams) -> Result<Envelope> {
        let query = params.build_query(self.session(), wine_id)?;
        match params.method.http_method() {
            Method::Put => self.base.put(RATE_WINE_PATH, query, params.timeout),
            _ => self.base.post(RATE_WINE_PATH, query, params.timeout),
        }
    }

    /// Add a wine to the account's wishlist.
    pub fn wishlist(
        &self,
        wine_id: &str,
        credentials: Option<&Credentials>,
        timeout: Option<Duration>,
    ) -> Result<Envelope> {
        let query = wishlist_query(self.session(), wine_id, credentials);
        self.base.post(WISHLIST_PATH, query, timeout)
    }

    // -- wineries -------------------------------------------------------------

    pub fn winery_detail(&self, winery_id: &str, timeout: Option<Duration>) -> Result<Value> {
        let mut query = self.session().basic_query();
        query.set("id", winery_id);
        let mut envelope = self.base.get(WINERY_DETAIL_PATH, query, timeout)?;
        project::take_payload(&mut envelope, &["winery"])
    }

    pub fn winery(&self, winery_id: &str, timeout: Option<Duration>) -> Result<Winery> {
        project::winery(self.winery_detail(winery_id, timeout)?)
    }

    // -- stores ---------------------------------------------------------------

    pub fn store_search(&self, params: &StoreSearchParams) -> Result<Vec<Value>> {
        let query = params.build_query(self.session())?;
        let mut envelope = self.base.get(STORE_SEARCH_PATH, query, params.timeout)?;
        project::take_list(&mut envelope, "stores")
    }

    pub fn search_stores(&self, params: &StoreSearchParams) -> Result<Vec<WineStore>> {
        project::storeify(self.store_search(params)?)
    }

    pub fn store_detail(&self, store_id: &str, params: &StoreDetailParams) -> Result<Value> {
        let query = params.build_query(self.session(), store_id)?;
        let mut envelope = self.base.get(STORE_DETAIL_PATH, query, params.timeout)?;
        project::take_payload(&mut envelope, &["store"])
    }

    pub fn store(&self, store_id: &str, params: &StoreDetailParams) -> Result<WineStore> {
        project::store(self.store_detail(store_id, params)?)
    }

    // -- accounts -------------------------------------------------------------

    pub fn create_account(&self, params: &CreateAccountParams) -> Result<Envelope> {
        let query = params.build_query(self.session())?;
        self.base.post(CREATE_ACCOUNT_PATH, query, params.timeout)
    }

    /// Recent community activity.
    pub fn user_activity(&self, params: &UserActivityParams) -> Result<Vec<Value>> {
        let query = params.build_query(self.session())?;
        let mut envelope = self.base.get(USER_ACTIVITY_PATH, query, params.timeout)?;
        match project::take_payload(&mut envelope, &["actions"])? {
            Value::Array(actions) => Ok(actions),
            Value::Null => Ok(Vec::new()),
            other => Err(SnoothError::schema(format!(
                "\"actions\" payload is not a list: {other}"
            ))),
        }
    }

    // -- projections ----------------------------------------------------------

    /// Project raw wine records, binding `credentials` (or the session's).
    pub fn wineify(
        &self,
        records: Vec<Value>,
        credentials: Option<&Credentials>,
    ) -> Result<Vec<Wine>> {
        let creds = self.session().resolve_credentials(credentials);
        project::wineify(records, &creds)
    }

    pub fn storeify(&self, records: Vec<Value>) -> Result<Vec<WineStore>> {
        project::storeify(records)
    }
}
