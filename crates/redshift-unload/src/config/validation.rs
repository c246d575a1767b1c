//! Configuration validation.

use super::Config;
use crate::error::{Result, UnloadError};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let warehouse = &config.warehouse;
    if warehouse.host.is_empty() {
        return Err(UnloadError::Config("warehouse.host is required".into()));
    }
    if warehouse.database.is_empty() {
        return Err(UnloadError::Config("warehouse.database is required".into()));
    }
    if warehouse.user.is_empty() {
        return Err(UnloadError::Config("warehouse.user is required".into()));
    }
    if warehouse.port == 0 {
        return Err(UnloadError::Config("warehouse.port must be non-zero".into()));
    }
    if warehouse.pool_size == 0 {
        return Err(UnloadError::Config(
            "warehouse.pool_size must be at least 1".into(),
        ));
    }

    // A partial credentials section is a mistake, not a request for the environment.
    if let Some(credentials) = &config.credentials {
        credentials.validate()?;
    }

    Ok(())
}
