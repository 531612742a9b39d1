use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::errors::ConnectError;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default, skip_serializing)]
    pub password: String,

    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            name: default_name(),
            user: default_user(),
            password: String::new(),
            ssl_mode: default_ssl_mode(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_name() -> String {
    "postgres".to_string()
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_ssl_mode() -> String {
    "prefer".to_string()
}

impl DatabaseConfig {
    pub fn ssl_mode(&self) -> Result<PgSslMode, ConnectError> {
        PgSslMode::from_str(self.ssl_mode.trim())
            .map_err(|_| ConnectError::InvalidSslMode(self.ssl_mode.clone()))
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, ConnectError> {
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(self.ssl_mode()?))
    }

    /// Identifier used in reports, e.g. `crm@db.internal:5432`.
    pub fn identifier(&self) -> String {
        format!("{}@{}:{}", self.name, self.host, self.port)
    }
}
