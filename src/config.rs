//! TOML configuration: per-carrier accounts and portal profiles.
//!
//! ```toml
//! default_carrier = "three"
//! timeout_secs = 30
//!
//! [carriers.three]
//! username = "0871234567"
//!
//! [carriers.three.portal]
//! login_url = "https://portal.example/login"
//! send_url = "https://portal.example/send"
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde::de::Error as DeError;
use tracing::debug;

use crate::domain::{Carrier, ValidationError};
use crate::portal::PortalProfile;

const CONFIG_DIR_NAME: &str = "cliresms";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no portal configured for {carrier}; add a [carriers.{carrier}.portal] table")]
    MissingCarrier { carrier: Carrier },

    #[error("invalid portal for {carrier}: {source}")]
    Invalid {
        carrier: Carrier,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub default_carrier: Option<Carrier>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default, deserialize_with = "deserialize_carriers")]
    pub carriers: BTreeMap<Carrier, CarrierAccount>,
}

/// Table keys go through [`Carrier`]'s `FromStr`, so `[carriers.vf]` works too.
fn deserialize_carriers<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<Carrier, CarrierAccount>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, CarrierAccount>::deserialize(deserializer)?;
    let mut carriers = BTreeMap::new();
    for (key, account) in raw {
        let carrier = key.parse::<Carrier>().map_err(D::Error::custom)?;
        if carriers.insert(carrier, account).is_some() {
            return Err(D::Error::custom(format!(
                "carrier {carrier} is configured more than once"
            )));
        }
    }
    Ok(carriers)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CarrierAccount {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub portal: PortalProfile,
}

impl AppConfig {
    /// `<config dir>/cliresms/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Load `explicit` when given; otherwise the default path, which may be absent.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), carriers = config.carriers.len(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (carrier, account) in &self.carriers {
            account
                .portal
                .validate()
                .map_err(|source| ConfigError::Invalid {
                    carrier: *carrier,
                    source,
                })?;
        }
        Ok(())
    }

    pub fn account(&self, carrier: Carrier) -> Result<&CarrierAccount, ConfigError> {
        self.carriers
            .get(&carrier)
            .ok_or(ConfigError::MissingCarrier { carrier })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
