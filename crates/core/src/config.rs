//! Build configuration supplying the default record contents.
//!
//! Loaded with figment, in order of precedence (highest first):
//! 1. Environment variables prefixed with `EEPVER_` (e.g. `EEPVER_VENDOR=N`)
//! 2. A TOML file (`eepver.toml` in the working directory unless overridden)
//! 3. Default values

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::{ProjectName, SoftwareDate, SoftwareVersion, VendorCode};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "eepver.toml";

/// Prefix of environment variables that override configuration values.
pub const ENV_PREFIX: &str = "EEPVER_";

/// Keys whose environment values are taken verbatim as text.
///
/// figment's `Env` provider parses values, so `EEPVER_SOFTWARE_VERSION=1.0`
/// would otherwise arrive as a float.
const TEXT_KEYS: [&str; 4] = ["project_name", "vendor", "software_version", "software_date"];

pub const DEFAULT_PROJECT_NAME: &str = "Unnamed Project";
pub const DEFAULT_VENDOR: &str = "M";
pub const DEFAULT_PROJECT_VERSION: u8 = 1;
pub const DEFAULT_SOFTWARE_VERSION: &str = "1.0.0";
pub const DEFAULT_SOFTWARE_DATE: &str = "January 1, 2024";

/// Values a fresh [`VersionRecord`](crate::VersionRecord) is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Project name, at most 20 bytes.
    pub project_name: String,
    /// Vendor code, a single byte.
    pub vendor: String,
    /// Project version, greater than zero.
    pub project_version: u8,
    /// Software version, at most 7 bytes.
    pub software_version: String,
    /// Final software date, at most 18 bytes.
    pub software_date: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            vendor: DEFAULT_VENDOR.to_string(),
            project_version: DEFAULT_PROJECT_VERSION,
            software_version: DEFAULT_SOFTWARE_VERSION.to_string(),
            software_date: DEFAULT_SOFTWARE_DATE.to_string(),
        }
    }
}

impl BuildConfig {
    /// Load configuration from defaults, `eepver.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; its layer is simply empty.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        let config: BuildConfig = Self::figment(&config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: &Path) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(BuildConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&TEXT_KEYS));

        for (key, value) in Env::prefixed(ENV_PREFIX).only(&TEXT_KEYS).iter() {
            let key = key.as_str().to_ascii_lowercase();
            figment = figment.merge(Serialized::default(&key, value));
        }
        figment
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a text value does not fit its record field or the
    /// project version is zero.
    pub fn validate(&self) -> Result<()> {
        fit("project_name", &self.project_name, ProjectName::CAPACITY)?;
        fit("vendor", &self.vendor, VendorCode::CAPACITY)?;
        fit("software_version", &self.software_version, SoftwareVersion::CAPACITY)?;
        fit("software_date", &self.software_date, SoftwareDate::CAPACITY)?;

        if self.project_version == 0 {
            return Err(Error::ConfigValidation {
                message: "project_version must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

fn fit(key: &str, value: &str, capacity: usize) -> Result<()> {
    if value.len() > capacity {
        return Err(Error::ConfigValidation {
            message: format!(
                "{key} ({value:?}) is {} bytes long, at most {capacity} allowed",
                value.len()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BuildConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized() {
        let config = BuildConfig {
            vendor: "MN".into(),
            ..BuildConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("vendor"));
    }

    #[test]
    fn test_validate_rejects_zero_version() {
        let config = BuildConfig {
            project_version: 0,
            ..BuildConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let config = BuildConfig::load_from(Some("nope.toml".into())).unwrap();
            assert_eq!(config, BuildConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_toml_and_env_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE_NAME,
                r#"
                    project_name = "Tank Plant"
                    vendor = "N"
                    project_version = 2
                "#,
            )?;
            jail.set_env("EEPVER_SOFTWARE_VERSION", "3.1.1");
            jail.set_env("EEPVER_VENDOR", "Q");

            let config = BuildConfig::load().unwrap();
            assert_eq!(config.project_name, "Tank Plant");
            assert_eq!(config.vendor, "Q");
            assert_eq!(config.project_version, 2);
            assert_eq!(config.software_version, "3.1.1");
            assert_eq!(config.software_date, DEFAULT_SOFTWARE_DATE);
            Ok(())
        });
    }

    #[test]
    fn test_numeric_looking_env_text_is_kept_verbatim() {
        Jail::expect_with(|jail| {
            jail.set_env("EEPVER_SOFTWARE_VERSION", "1.0");
            jail.set_env("EEPVER_PROJECT_NAME", "2024");
            jail.set_env("EEPVER_VENDOR", "7");
            jail.set_env("EEPVER_SOFTWARE_DATE", "1.10");
            jail.set_env("EEPVER_PROJECT_VERSION", "3");

            let config = BuildConfig::load().unwrap();
            assert_eq!(config.software_version, "1.0");
            assert_eq!(config.project_name, "2024");
            assert_eq!(config.vendor, "7");
            assert_eq!(config.software_date, "1.10");
            assert_eq!(config.project_version, 3);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_oversized_file_value() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE_NAME, r#"software_version = "1.0.0-rc1""#)?;
            assert!(matches!(
                BuildConfig::load(),
                Err(Error::ConfigValidation { .. })
            ));
            Ok(())
        });
    }
}
