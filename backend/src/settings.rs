//! Server and database settings loaded via OrthoConfig.
//!
//! Values come from `DB_*` and `SERVER_*` environment variables (or an
//! OrthoConfig file); unset fields fall back to local development defaults.
//! The listening port is `SERVER_PORT`; a bare `PORT` is not consulted.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_NAME: &str = "email_confirmation";
const DEFAULT_CONNECTION_LIMIT: u32 = 10;
const DEFAULT_SERVER_PORT: u16 = 3000;

/// PostgreSQL connection settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DB")]
pub struct DatabaseSettings {
    pub host: Option<String>,
    #[ortho_config(default = DEFAULT_DB_PORT)]
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    /// Maximum pooled connections.
    #[ortho_config(default = DEFAULT_CONNECTION_LIMIT)]
    pub connection_limit: u32,
}

/// Errors raised while assembling the database URL.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid database url: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid database {field}")]
    Component { field: &'static str },
}

impl DatabaseSettings {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_DB_HOST)
    }

    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_DB_USER)
    }

    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_DB_NAME)
    }

    /// Pool size; zero is treated as the default.
    pub fn connection_limit(&self) -> u32 {
        match self.connection_limit {
            0 => DEFAULT_CONNECTION_LIMIT,
            limit => limit,
        }
    }

    /// Assemble a `postgres://` URL with credentials percent-encoded.
    pub fn database_url(&self) -> Result<String, SettingsError> {
        let mut url = Url::parse("postgres://localhost")?;
        url.set_host(Some(self.host()))?;
        url.set_port(Some(self.port))
            .map_err(|()| SettingsError::Component { field: "port" })?;
        url.set_username(self.user())
            .map_err(|()| SettingsError::Component { field: "user" })?;
        if !self.password().is_empty() {
            url.set_password(Some(self.password()))
                .map_err(|()| SettingsError::Component { field: "password" })?;
        }
        url.set_path(self.name());
        Ok(url.into())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SERVER")]
pub struct ServerSettings {
    pub host: Option<IpAddr>,
    #[ortho_config(default = DEFAULT_SERVER_PORT)]
    pub port: u16,
}

impl ServerSettings {
    /// Socket address to bind, `0.0.0.0:3000` unless overridden.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port,
        )
    }
}
