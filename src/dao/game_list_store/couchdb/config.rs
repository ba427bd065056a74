const DEFAULT_BASE_URL: &str = "http://localhost:5984";
const DEFAULT_DB: &str = "dslist";

/// Runtime configuration describing how to reach the CouchDB game list database.
#[derive(Debug, Clone)]
pub struct CouchConfig {
    /// Server root, e.g. `http://localhost:5984`.
    pub base_url: String,
    /// Database holding the `game_list::<id>` documents.
    pub database: String,
    /// Basic-auth `(username, password)` pair, sent on every request when present.
    pub credentials: Option<(String, String)>,
}

impl CouchConfig {
    /// Point at `database` on the server rooted at `base_url`, without credentials.
    pub fn new(base_url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            database: database.into(),
            credentials: None,
        }
    }

    /// Attach basic-auth credentials to the configuration.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Read `COUCH_BASE_URL` and `COUCH_DB`, falling back to a local server.
    ///
    /// Credentials are only attached when both `COUCH_USERNAME` and `COUCH_PASSWORD` are set.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|value| !value.is_empty());

        let config = Self::new(
            var("COUCH_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            var("COUCH_DB").unwrap_or_else(|| DEFAULT_DB.into()),
        );

        match (var("COUCH_USERNAME"), var("COUCH_PASSWORD")) {
            (Some(username), Some(password)) => config.with_credentials(username, password),
            _ => config,
        }
    }
}
