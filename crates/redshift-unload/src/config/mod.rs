//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::UnloadError;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "warehouse:\n  host: localhost\n  database: dev\n  user: admin\n  ssl_mode: disable"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.warehouse.host, "localhost");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, UnloadError::Io(_)));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("warehouse: [").unwrap_err();
        assert!(matches!(err, UnloadError::Yaml(_)));
    }

    #[test]
    fn test_bad_ssl_mode_is_rejected() {
        let err = Config::from_yaml(
            "warehouse:\n  host: h\n  database: d\n  user: u\n  ssl_mode: sometimes\n",
        )
        .unwrap_err();
        assert!(matches!(err, UnloadError::Yaml(_)));
    }

    #[test]
    fn test_empty_host_fails_validation() {
        let err = Config::from_yaml("warehouse:\n  host: ''\n  database: d\n  user: u\n")
            .unwrap_err();
        assert!(matches!(err, UnloadError::Config(_)));
    }
}
