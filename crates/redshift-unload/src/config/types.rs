//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::drivers::SslMode;
use crate::error::Result;
use crate::unload::{CredentialSet, UnloadOptions};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Redshift cluster to unload from.
    pub warehouse: WarehouseConfig,

    /// AWS credentials Redshift uses to write to S3. Read from the
    /// environment when omitted.
    #[serde(default)]
    pub credentials: Option<CredentialSet>,

    /// Default unload options; command-line flags may override them.
    #[serde(default)]
    pub unload: UnloadOptions,
}

impl Config {
    /// Credentials from the file, falling back to `AWS_*` environment variables.
    pub fn credentials(&self) -> Result<CredentialSet> {
        match &self.credentials {
            Some(credentials) => {
                credentials.validate()?;
                Ok(credentials.clone())
            }
            None => CredentialSet::from_env(),
        }
    }
}

/// Redshift connection configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Cluster endpoint host.
    pub host: String,

    /// Port (default: 5439).
    #[serde(default = "default_redshift_port")]
    pub port: u16,

    /// Database name.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// SSL mode (default: require).
    #[serde(default)]
    pub ssl_mode: SslMode,

    /// Maximum pooled sessions (default: 1).
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Connect timeout in seconds; unset waits for the OS.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl fmt::Debug for WarehouseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WarehouseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("ssl_mode", &self.ssl_mode)
            .field("pool_size", &self.pool_size)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

fn default_redshift_port() -> u16 {
    5439
}

fn default_pool_size() -> usize {
    1
}
