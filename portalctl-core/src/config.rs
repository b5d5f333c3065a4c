use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{PortalError, Result};
use crate::models::{SchemaName, TicketType, DEFAULT_TICKET};

/// Env var pointing at an alternative config file
pub const CONFIG_ENV: &str = "PORTALCTL_CONFIG";

static URL_PASSWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"://([^:/@]+):([^@]*)@").expect("invalid url regex"));

/// Configuration for portalctl
///
/// Layered: built-in defaults, then the TOML file, then environment,
/// then whatever the CLI overrides last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub database: DatabaseConfig,
    pub portal: PortalSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full connection URL; wins over the discrete fields when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub schema: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5433,
            user: "postgres".to_string(),
            password: "admin".to_string(),
            dbname: "postgres".to_string(),
            schema: "public".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSection {
    /// Ticket type passed to the enrollment procedure
    pub ticket_type: String,
}

impl Default for PortalSection {
    fn default() -> Self {
        Self {
            ticket_type: DEFAULT_TICKET.to_string(),
        }
    }
}

impl PortalConfig {
    /// Load config from `explicit`, `$PORTALCTL_CONFIG`, or ~/.portalctl/config.toml,
    /// then apply environment overrides.
    ///
    /// A missing default file is fine (defaults apply); a missing file the
    /// user pointed at is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let chosen = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match chosen {
            Some(path) => {
                if !path.exists() {
                    return Err(PortalError::config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(&path)?
            }
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    tracing::debug!(path = %path.display(), "no config file, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Get default config file path: ~/.portalctl/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".portalctl/config.toml")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PortalError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| PortalError::config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PortalError::config(format!("invalid TOML: {}", e)))
    }

    /// Apply `DATABASE_URL`, `PORTALCTL_SCHEMA` and `PORTALCTL_TICKET`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(schema) = lookup("PORTALCTL_SCHEMA").filter(|v| !v.is_empty()) {
            self.database.schema = schema;
        }
        if let Some(ticket) = lookup("PORTALCTL_TICKET").filter(|v| !v.is_empty()) {
            self.portal.ticket_type = ticket;
        }
    }

    /// Validated schema for the session search path
    pub fn schema(&self) -> Result<SchemaName> {
        Ok(SchemaName::new(&self.database.schema)?)
    }

    /// Validated default ticket type
    pub fn ticket(&self) -> Result<TicketType> {
        Ok(TicketType::new(&self.portal.ticket_type)?)
    }

    /// Build sqlx connect options with `search_path` set for the session.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        let schema = self.schema()?;
        let db = &self.database;

        let options = match &db.url {
            Some(url) => PgConnectOptions::from_str(url)
                .map_err(|e| PortalError::config(format!("invalid database url: {}", e)))?,
            None => PgConnectOptions::new()
                .host(&db.host)
                .port(db.port)
                .username(&db.user)
                .password(&db.password)
                .database(&db.dbname),
        };

        Ok(options.options([("search_path", schema.as_str())]))
    }

    /// Copy with secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.database.password.is_empty() {
            copy.database.password = "****".to_string();
        }
        copy.database.url = copy
            .database
            .url
            .map(|url| URL_PASSWORD_RE.replace(&url, "://$1:****@").into_owned());
        copy
    }

    /// Where the connection goes, without credentials
    pub fn describe_target(&self) -> String {
        match &self.database.url {
            Some(_) => self.redacted().database.url.unwrap_or_default(),
            None => format!(
                "{}@{}:{}/{}",
                self.database.user, self.database.host, self.database.port, self.database.dbname
            ),
        }
    }
}
