//! Process configuration, read once from the environment at startup.

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid BIND_ADDR `{value}`: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listen address; a local development address by default.
    pub bind_addr: SocketAddr,
    /// Backing-store connection string. Configured but not used by any endpoint.
    pub database_url: String,
}

impl AppConfig {
    pub const DEFAULT_BIND_ADDR: &'static str = "127.0.0.1:5000";
    pub const DEFAULT_DATABASE_URL: &'static str = "sqlite://app.db";

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map instead of the process env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| {
            tracing::warn!("BIND_ADDR not set; using {}", Self::DEFAULT_BIND_ADDR);
            Self::DEFAULT_BIND_ADDR.to_string()
        });
        let bind_addr = bind_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_addr.clone(),
                source,
            })?;

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            tracing::warn!("DATABASE_URL not set; using {}", Self::DEFAULT_DATABASE_URL);
            Self::DEFAULT_DATABASE_URL.to_string()
        });

        Ok(Self {
            bind_addr,
            database_url,
        })
    }

    /// `database_url` with any password replaced, safe for logs.
    pub fn redacted_database_url(&self) -> String {
        redact_password(&self.database_url)
    }
}

fn redact_password(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    let authority_end = url[authority_start..]
        .find('/')
        .map_or(url.len(), |i| authority_start + i);
    let authority = &url[authority_start..authority_end];

    let Some(at) = authority.rfind('@') else {
        return url.to_string();
    };
    let Some(colon) = authority[..at].find(':') else {
        return url.to_string();
    };

    format!(
        "{}{}:***{}",
        &url[..authority_start],
        &authority[..colon],
        &url[authority_start + at..]
    )
}
