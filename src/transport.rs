//! HTTP transport for the Snooth API.
//!
//! Requests and responses are plain data so the pipeline in
//! [`crate::client`] can run against any [`Transport`]; [`HttpTransport`] is
//! the blocking `reqwest` implementation used in production.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::error::{Result, SnoothError};
use crate::query::Query;

/// HTTP verbs used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

/// A request described as data. Parameters always travel in the query
/// string, for writes as well as reads.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Query,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Executes one request. Implementations must report a deadline overrun as
/// [`SnoothError::Timeout`]; status codes are checked by the caller.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking `reqwest` transport with TLS verification left on.
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = Client::builder()
            .default_headers(headers)
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Post => self.http.post(&request.url),
            Method::Put => self.http.put(&request.url),
        };
        let mut builder = builder.query(&request.query.pairs());
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().map_err(map_reqwest)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(map_reqwest)?;
        Ok(HttpResponse { status, body })
    }
}

fn map_reqwest(err: reqwest::Error) -> SnoothError {
    if err.is_timeout() {
        SnoothError::Timeout
    } else {
        SnoothError::RequestFailed(err)
    }
}

/// Map the HTTP status to an error. The service answers malformed queries
/// with 500, which gets its own variant.
pub fn check_status(response: &HttpResponse) -> Result<()> {
    match response.status {
        200..=299 => Ok(()),
        500 => Err(SnoothError::BadQueryParams),
        status => {
            let message = StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {status}"));
            Err(SnoothError::Http { status, message })
        }
    }
}
