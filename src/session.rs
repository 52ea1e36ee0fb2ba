use std::fmt;
use std::time::Duration;

use crate::models::Credentials;
use crate::query::Query;

/// Long-lived settings shared by every call made through a client.
///
/// The API key is always supplied by the caller; resolving it from the
/// environment is the job of [`crate::SnoothConfig`].
///
/// ```
/// use std::time::Duration;
/// use snooth_client::Session;
///
/// let session = Session::new("my-key")
///     .with_credentials("alice", "secret")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(session.format(), "json");
/// ```
#[derive(Clone)]
pub struct Session {
    api_key: String,
    format: String,
    ip: Option<String>,
    credentials: Credentials,
    timeout: Option<Duration>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("api_key", &"<redacted>")
            .field("format", &self.format)
            .field("ip", &self.ip)
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Session {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            format: "json".to_string(),
            ip: None,
            credentials: Credentials::default(),
            timeout: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Credentials::new(username, password);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Merge per-call credentials over the stored ones.
    ///
    /// Each of username and password falls back independently; empty strings
    /// count as unset.
    pub fn resolve_credentials(&self, explicit: Option<&Credentials>) -> Credentials {
        match explicit {
            Some(creds) => creds.or(&self.credentials),
            None => self.credentials.clone(),
        }
    }

    /// A per-call timeout wins over the session default. `None` blocks
    /// indefinitely.
    pub fn resolve_timeout(&self, explicit: Option<Duration>) -> Option<Duration> {
        explicit.or(self.timeout)
    }

    /// Parameters carried by every account-less request.
    pub(crate) fn base_query(&self) -> Query {
        let mut query = Query::new();
        query.set("akey", &self.api_key);
        query.set("format", &self.format);
        query.set_opt("ip", self.ip.as_deref());
        query
    }

    /// `base_query` plus the stored `u`/`p` credentials.
    pub(crate) fn basic_query(&self) -> Query {
        let mut query = self.base_query();
        query.set_opt("u", self.credentials.username.as_deref());
        query.set_opt("p", self.credentials.password.as_deref());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_credentials_override_session() {
        let session = Session::new("k").with_credentials("alice", "pw");
        let creds = session.resolve_credentials(Some(&Credentials::new("bob", "hunter2")));
        assert_eq!(creds.username.as_deref(), Some("bob"));
        assert_eq!(creds.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn missing_credentials_fall_back_per_field() {
        let session = Session::new("k").with_credentials("alice", "pw");
        let partial = Credentials {
            username: Some("bob".into()),
            password: Some(String::new()),
        };
        let creds = session.resolve_credentials(Some(&partial));
        assert_eq!(creds.username.as_deref(), Some("bob"));
        assert_eq!(creds.password.as_deref(), Some("pw"));
    }

    #[test]
    fn no_credentials_anywhere_stays_empty() {
        let creds = Session::new("k").resolve_credentials(None);
        assert!(creds.username.is_none());
        assert!(creds.password.is_none());
    }

    #[test]
    fn timeout_resolution() {
        let plain = Session::new("k");
        assert_eq!(plain.resolve_timeout(None), None);
        assert_eq!(
            plain.resolve_timeout(Some(Duration::from_secs(2))),
            Some(Duration::from_secs(2))
        );

        let with_default = plain.with_timeout(Duration::from_secs(9));
        assert_eq!(with_default.resolve_timeout(None), Some(Duration::from_secs(9)));
        assert_eq!(
            with_default.resolve_timeout(Some(Duration::from_secs(1))),
            Some(Duration::from_secs(1))
        );
    }

    #[test]
    fn debug_redacts_key_and_password() {
        let session = Session::new("super-secret-key").with_credentials("alice", "hunter2");
        let printed = format!("{session:?}");
        assert!(!printed.contains("super-secret-key"), "{printed}");
        assert!(!printed.contains("hunter2"), "{printed}");
        assert!(printed.contains("alice"), "{printed}");
    }

    #[test]
    fn basic_query_carries_key_format_and_credentials() {
        let session = Session::new("abc")
            .with_ip("10.0.0.1")
            .with_credentials("alice", "pw");
        let query = session.basic_query();
        assert_eq!(query.get("akey"), Some("abc"));
        assert_eq!(query.get("format"), Some("json"));
        assert_eq!(query.get("ip"), Some("10.0.0.1"));
        assert_eq!(query.get("u"), Some("alice"));
        assert_eq!(query.get("p"), Some("pw"));
    }

    #[test]
    fn unset_ip_is_omitted() {
        let query = Session::new("abc").base_query();
        assert_eq!(query.get("ip"), None);
        assert!(!query.contains("u"));
    }
}
