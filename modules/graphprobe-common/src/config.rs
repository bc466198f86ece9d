use std::env;
use std::fmt;

use tracing::info;

use crate::ProbeError;

pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";
pub const DEFAULT_NEO4J_USER: &str = "neo4j";
pub const DEFAULT_NEO4J_PASSWORD: &str = "password";
pub const DEFAULT_DATABASE: &str = "data";

pub const NEO4J_URI_ENV: &str = "NEO4J_URI";
pub const NEO4J_USER_ENV: &str = "NEO4J_USER";
pub const NEO4J_PASSWORD_ENV: &str = "NEO4J_PASSWORD";
pub const NEO4J_DATABASE_ENV: &str = "NEO4J_DATABASE";

/// Connection settings for a single inspection run.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,

    /// Database every scoped session is bound to after the catalog listing.
    pub db_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            neo4j_uri: DEFAULT_NEO4J_URI.to_string(),
            neo4j_user: DEFAULT_NEO4J_USER.to_string(),
            neo4j_password: DEFAULT_NEO4J_PASSWORD.to_string(),
            db_name: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// local development defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            neo4j_uri: lookup(NEO4J_URI_ENV).unwrap_or(defaults.neo4j_uri),
            neo4j_user: lookup(NEO4J_USER_ENV).unwrap_or(defaults.neo4j_user),
            neo4j_password: lookup(NEO4J_PASSWORD_ENV).unwrap_or(defaults.neo4j_password),
            db_name: lookup(NEO4J_DATABASE_ENV).unwrap_or(defaults.db_name),
        }
    }

    /// Reject empty settings. Nothing else is checked until the server is contacted.
    pub fn validate(&self) -> Result<(), ProbeError> {
        let fields = [
            ("uri", &self.neo4j_uri),
            ("user", &self.neo4j_user),
            ("password", &self.neo4j_password),
            ("db_name", &self.db_name),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ProbeError::Config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn log_redacted(&self) {
        info!(
            uri = self.neo4j_uri.as_str(),
            user = self.neo4j_user.as_str(),
            db_name = self.db_name.as_str(),
            password_set = !self.neo4j_password.is_empty(),
            "Loaded config"
        );
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("neo4j_uri", &self.neo4j_uri)
            .field("neo4j_user", &self.neo4j_user)
            .field("neo4j_password", &"<redacted>")
            .field("db_name", &self.db_name)
            .finish()
    }
}
