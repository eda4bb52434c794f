//! Login credentials and client settings.

use std::fmt;
use std::time::Duration;

use crate::error::UntisError;

/// Path of the JSON-RPC endpoint on a WebUntis server.
pub const DEFAULT_ENDPOINT_PATH: &str = "/WebUntis/jsonrpc.do";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Who to log in as, and where.
///
/// Immutable once built. `server` is either a bare host name
/// (`mese.webuntis.com`, HTTPS is implied) or a base URL with a scheme
/// (`http://127.0.0.1:8080`).
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    server: String,
    school_name: String,
    username: String,
    password: String,
    user_agent: String,
}

impl Credentials {
    pub fn new(server: &str, school_name: &str, username: &str, password: &str) -> Self {
        Self {
            server: server.trim_end_matches('/').to_string(),
            school_name: school_name.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            user_agent: String::new(),
        }
    }

    /// Sets the client name sent with `authenticate` and as `User-Agent`.
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Reads `UNTIS_SERVER`, `UNTIS_SCHOOL`, `UNTIS_USER`, `UNTIS_PASSWORD`
    /// and the optional `UNTIS_CLIENT`.
    pub fn from_env() -> Result<Self, UntisError> {
        let var = |name: &'static str| std::env::var(name).map_err(|_| UntisError::MissingEnv(name));
        let credentials = Self::new(
            &var("UNTIS_SERVER")?,
            &var("UNTIS_SCHOOL")?,
            &var("UNTIS_USER")?,
            &var("UNTIS_PASSWORD")?,
        );
        Ok(match std::env::var("UNTIS_CLIENT") {
            Ok(client) => credentials.with_user_agent(&client),
            Err(_) => credentials,
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn school_name(&self) -> &str {
        &self.school_name
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Scheme and authority of the server, without a trailing slash.
    pub fn base_url(&self) -> String {
        if self.server.contains("://") {
            self.server.clone()
        } else {
            format!("https://{}", self.server)
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("server", &self.server)
            .field("school_name", &self.school_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Transport-level settings shared by every request of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint_path: String,
    /// Upper bound for a whole round trip. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint_path(mut self, path: &str) -> Self {
        self.endpoint_path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full endpoint URL for `credentials`, without the query string.
    pub fn endpoint_url(&self, credentials: &Credentials) -> String {
        format!("{}{}", credentials.base_url(), self.endpoint_path)
    }
}
