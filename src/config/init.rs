// ABOUTME: Config scaffolding.
// ABOUTME: Writes a commented ~/.ec2sh.yml template and a placeholder AWS credentials profile.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::{DEFAULT_IDENTITY_FILE, DEFAULT_LOGIN_NAME};

const CREDENTIALS_TEMPLATE: &str = "[default]
aws_access_key_id = XXXXX
aws_secret_access_key = XXXXX
";

pub fn init_config(path: &Path, force: bool) -> Result<()> {
    write_new(path, &generate_template_yaml(), force)
}

/// Write a `[default]` profile with placeholder keys to an AWS credentials file.
pub fn init_profile(path: &Path, force: bool) -> Result<()> {
    write_new(path, CREDENTIALS_TEMPLATE, force)
}

/// `~/.aws/credentials`.
pub fn default_credentials_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".aws").join("credentials"))
        .ok_or(Error::HomeNotFound)
}

fn write_new(path: &Path, content: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::AlreadyExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, content)?;
    Ok(())
}

fn generate_template_yaml() -> String {
    format!(
        r#"# AWS profile and region used to look up instances.
# Unset values fall back to the AWS SDK defaults (AWS_PROFILE, AWS_REGION, ...).
# profile: default
# region: us-east-1

ssh:
  login_name: {DEFAULT_LOGIN_NAME}
  identity_file: {DEFAULT_IDENTITY_FILE}
  # public or private
  address: public
  # Give up dialing after this long (default: wait indefinitely)
  # connect_timeout: 10s
  #
  # Host keys are NOT verified: any server key is accepted.
"#
    )
}
