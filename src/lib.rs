//! Snooth API client library for Rust.
//!
//! A Rust client for the Snooth wine, store and winery API. Every call goes
//! through one pipeline: parameters are built into a [`Query`], sent over a
//! [`Transport`], the HTTP status is checked, the JSON envelope is validated
//! and the endpoint's payload is extracted (optionally as typed [`Wine`],
//! [`WineStore`] or [`Winery`] values).
//!
//! # Quick Start
//!
//! ```no_run
//! use snooth_client::{SnoothClient, SnoothConfig, StoreSearchParams};
//!
//! let config = SnoothConfig::load().unwrap();
//! let client = SnoothClient::with_base_url(config.session(), &config.base_url).unwrap();
//!
//! let stores = client
//!     .search_stores(&StoreSearchParams {
//!         country: Some("US".into()),
//!         zipcode: Some("10001".into()),
//!         ..Default::default()
//!     })
//!     .unwrap();
//! for s in &stores {
//!     println!("{}: {}", s.name, s.address);
//! }
//! ```

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod models;
pub mod params;
pub mod project;
pub mod query;
pub mod session;
pub mod transport;

// Re-export the main public types at the crate root for convenience.
pub use client::{SnoothClient, DEFAULT_BASE_URL};
pub use config::SnoothConfig;
pub use envelope::{Envelope, Meta, Outcome, ResponseKind};
pub use error::{Result, SnoothError};
pub use models::{Credentials, Wine, WineStore, Winery};
pub use params::{
    CreateAccountParams, MyWinesParams, RateMethod, RateWineParams, StoreDetailParams,
    StoreSearchParams, UserActivityParams, WineDetailParams, WineSearchParams,
};
pub use query::Query;
pub use session::Session;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, Transport};
