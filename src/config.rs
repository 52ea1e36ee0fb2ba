//! Environment-derived configuration.
//!
//! The library core never reads the process environment; callers build a
//! [`SnoothConfig`] once (typically at startup) and turn it into a
//! [`Session`].

use std::fmt;
use std::time::Duration;

use crate::client::DEFAULT_BASE_URL;
use crate::error::{Result, SnoothError};
use crate::session::Session;

#[derive(Clone)]
pub struct SnoothConfig {
    /// `None` when no key was found; calls will then fail with an
    /// authentication error from the service.
    pub api_key: Option<String>,
    pub base_url: String,
    pub format: String,
    pub ip: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for SnoothConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnoothConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("format", &self.format)
            .field("ip", &self.ip)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SnoothConfig {
    /// Load `.env` (if any), then read the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Read configuration from variables already in the process environment.
    ///
    /// | Variable              | Default                  |
    /// |-----------------------|--------------------------|
    /// | `SNOOTH_API_KEY`      | `API_KEY`, else unset    |
    /// | `SNOOTH_BASE_URL`     | `https://api.snooth.com` |
    /// | `SNOOTH_FORMAT`       | `json`                   |
    /// | `SNOOTH_IP`           | unset                    |
    /// | `SNOOTH_USERNAME`     | unset                    |
    /// | `SNOOTH_PASSWORD`     | unset                    |
    /// | `SNOOTH_TIMEOUT_SECS` | unset (no timeout)       |
    pub fn from_env() -> Result<Self> {
        build_config(|key| std::env::var(key))
    }

    pub fn session(&self) -> Session {
        let mut session = Session::new(self.api_key.clone().unwrap_or_default())
            .with_format(self.format.clone());
        if let Some(ip) = &self.ip {
            session = session.with_ip(ip.clone());
        }
        if self.username.is_some() || self.password.is_some() {
            session = session.with_credentials(
                self.username.clone().unwrap_or_default(),
                self.password.clone().unwrap_or_default(),
            );
        }
        if let Some(timeout) = self.timeout {
            session = session.with_timeout(timeout);
        }
        session
    }
}

/// Parse configuration from an arbitrary lookup so tests need not touch the
/// real environment.
fn build_config<F>(lookup: F) -> Result<SnoothConfig>
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    let optional = |var: &str| lookup(var).ok().filter(|v| !v.trim().is_empty());
    let or_default = |var: &str, default: &str| optional(var).unwrap_or_else(|| default.to_string());

    let api_key = optional("SNOOTH_API_KEY").or_else(|| optional("API_KEY"));
    if api_key.is_none() {
        tracing::warn!(
            "no Snooth API key configured; set SNOOTH_API_KEY or pass a key to Session::new"
        );
    }

    let timeout = match optional("SNOOTH_TIMEOUT_SECS") {
        Some(raw) => {
            let secs = raw.trim().parse::<f64>().map_err(|e| SnoothError::Config {
                var: "SNOOTH_TIMEOUT_SECS".to_string(),
                reason: e.to_string(),
            })?;
            if !secs.is_finite() || secs <= 0.0 {
                return Err(SnoothError::Config {
                    var: "SNOOTH_TIMEOUT_SECS".to_string(),
                    reason: format!("must be a positive number of seconds, got {raw}"),
                });
            }
            Some(Duration::from_secs_f64(secs))
        }
        None => None,
    };

    Ok(SnoothConfig {
        api_key,
        base_url: or_default("SNOOTH_BASE_URL", DEFAULT_BASE_URL),
        format: or_default("SNOOTH_FORMAT", "json"),
        ip: optional("SNOOTH_IP"),
        username: optional("SNOOTH_USERNAME"),
        password: optional("SNOOTH_PASSWORD"),
        timeout,
    })
}
