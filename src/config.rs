use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ip::AddressMode;
use crate::whois::DEFAULT_WHOIS_DB;

/// Environment variable enabling randomized substitution when set
pub const ENV_RANDOMIZE: &str = "PRIVEXT_ENABLE_IP_RANDOMIZATION";
/// Environment variable enabling the verification pass when set
pub const ENV_VERIFY: &str = "PRIVEXT_VERIFY_IPS";

/// Startup configuration, read once before the registry is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Whois table the substitution pools are built from
    pub whois_path: PathBuf,
    /// (Optional) Table backing by-address country lookups (default: `whois_path`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geoip_path: Option<PathBuf>,
    /// Draw a random address per lookup instead of a fixed one per country
    pub randomize: bool,
    /// Run the verification pass after the build
    pub verify: bool,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid path configuration: {0}")]
    InvalidPath(String),
}

impl Config {
    pub fn address_mode(&self) -> AddressMode {
        AddressMode::from_flag(self.randomize)
    }

    pub fn geoip_path(&self) -> &Path {
        self.geoip_path.as_deref().unwrap_or(&self.whois_path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.whois_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidPath("whois_path must not be empty".to_string()));
        }
        if matches!(&self.geoip_path, Some(path) if path.as_os_str().is_empty()) {
            return Err(ConfigError::InvalidPath("geoip_path must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            whois_path: PathBuf::from(DEFAULT_WHOIS_DB),
            geoip_path: None,
            randomize: false,
            verify: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.whois_path, PathBuf::from("GeoIPCountryWhois.csv"));
        assert_eq!(config.geoip_path(), Path::new("GeoIPCountryWhois.csv"));
        assert_eq!(config.address_mode(), AddressMode::Fixed);
        assert!(!config.verify);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("randomize: true\n").unwrap();
        assert_eq!(config.address_mode(), AddressMode::Randomized);
        assert_eq!(config.whois_path, PathBuf::from(DEFAULT_WHOIS_DB));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_yaml::from_str::<Config>("randomise: true\n").is_err());
    }

    #[test]
    fn test_empty_paths_rejected() {
        let config = Config {
            whois_path: PathBuf::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            geoip_path: Some(PathBuf::new()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
