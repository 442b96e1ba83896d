// ABOUTME: Configuration types and loading for ~/.ec2sh.yml.
// ABOUTME: AWS profile/region and SSH defaults; a missing default file means built-in defaults.

mod init;

pub use init::{default_credentials_path, init_config, init_profile};

use crate::error::{Error, Result};
use crate::types::AddressPreference;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = ".ec2sh.yml";
pub const DEFAULT_LOGIN_NAME: &str = "ec2-user";
pub const DEFAULT_IDENTITY_FILE: &str = "~/.ssh/id_rsa";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// AWS shared-config profile for the instance directory.
    #[serde(default)]
    pub profile: Option<String>,

    /// AWS region for the instance directory.
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub ssh: SshConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SshConfig {
    #[serde(default = "default_login_name")]
    pub login_name: String,

    #[serde(default = "default_identity_file")]
    pub identity_file: String,

    #[serde(default)]
    pub address: AddressPreference,

    /// Bound on the dial step. Unset means no timeout.
    #[serde(default, with = "humantime_serde")]
    pub connect_timeout: Option<Duration>,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            login_name: default_login_name(),
            identity_file: default_identity_file(),
            address: AddressPreference::default(),
            connect_timeout: None,
        }
    }
}

fn default_login_name() -> String {
    DEFAULT_LOGIN_NAME.to_string()
}

fn default_identity_file() -> String {
    DEFAULT_IDENTITY_FILE.to_string()
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file deserializes as YAML null.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// `~/.ec2sh.yml`.
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_FILENAME))
            .ok_or(Error::HomeNotFound)
    }

    /// Load an explicit config file, or the default one if it exists.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            return Self::load(path);
        }

        let path = Self::default_path()?;
        if path.exists() {
            tracing::debug!("loading config from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
