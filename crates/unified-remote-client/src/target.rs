//! The remote server a dispatcher talks to

use std::fmt;

/// Port the Unified Remote server listens on by default
pub const DEFAULT_PORT: u16 = 9510;

/// One Unified Remote server: address plus optional credentials
///
/// A target is fixed when the dispatcher is built and never changes.
#[derive(Clone, PartialEq, Eq)]
pub struct Target {
    host: String,
    username: Option<String>,
    password: Option<String>,
}

/// Credentials used for the password proof
///
/// Only produced when a non-empty password is configured.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub username: Option<&'a str>,
    pub password: &'a str,
}

impl Target {
    /// Create a target for `host:port`, optionally with a scheme
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: None,
            password: None,
        }
    }

    /// Create a target from separate host and port parts
    pub fn from_parts(host: &str, port: u16) -> Self {
        Self::new(format!("{}:{}", host, port))
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// The configured `host:port` address
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Credentials for the authenticate step, if a password is set
    ///
    /// An empty password counts as no password. A username without a
    /// password is ignored.
    pub fn credentials(&self) -> Option<Credentials<'_>> {
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some(Credentials {
            username: self.username.as_deref().filter(|u| !u.is_empty()),
            password,
        })
    }

    /// Base URL of the server; `http://` is assumed when no scheme is given
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        }
    }

    /// URL of an endpoint under `/client`
    pub fn client_url(&self, endpoint: &str) -> String {
        format!("{}/client/{}", self.base_url(), endpoint)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
