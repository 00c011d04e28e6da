//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_PASSWORD` - Password guarding the admin API
//!
//! ## Optional
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8083)
//! - `DATA_DIR` - Catalog and cart storage directory (default: data)
//! - `STORE_NAME` - Name used in the checkout message (default: DecoFire)
//! - `CURRENCY` - Currency code appended to prices (default: MAD)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::checkout::CheckoutOptions;

const DEFAULT_PORT: u16 = 8083;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub data_dir: PathBuf,
    pub admin_password: String,
    pub store_name: String,
    pub currency: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("admin_password", &"[REDACTED]")
            .field("store_name", &self.store_name)
            .field("currency", &self.currency)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let admin_password = get("ADMIN_PASSWORD").ok_or_else(|| ConfigError::MissingEnvVar("ADMIN_PASSWORD".into()))?;
        let host = match get("HOST") {
            Some(raw) => raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidEnvVar("HOST".into(), e.to_string()))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::InvalidEnvVar("PORT".into(), e.to_string()))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host,
            port,
            data_dir: get("DATA_DIR").map_or_else(|| PathBuf::from("data"), PathBuf::from),
            admin_password,
            store_name: get("STORE_NAME").unwrap_or_else(|| "DecoFire".to_string()),
            currency: get("CURRENCY").unwrap_or_else(|| "MAD".to_string()),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }
    pub fn catalog_path(&self) -> PathBuf { self.data_dir.join("catalog.json") }
    pub fn storage_dir(&self) -> PathBuf { self.data_dir.join("storage") }

    pub fn checkout_options(&self) -> CheckoutOptions {
        CheckoutOptions { store_name: self.store_name.clone(), currency: self.currency.clone(), ..Default::default() }
    }
}
