// ABOUTME: Authentication context: login name, parsed identity key, host key policy.
// ABOUTME: Built once per invocation and shared read-only by every connection.

use russh::keys::{PrivateKey, decode_secret_key};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unable to determine home directory to expand {0}")]
    HomeNotFound(String),

    #[error("unable to read private key {path}: {source}")]
    KeyUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to parse private key {path}: {source}")]
    KeyUnparseable {
        path: PathBuf,
        source: KeyFormatError,
    },
}

/// Why the contents of an identity file are not a usable key.
#[derive(Debug, Error)]
pub enum KeyFormatError {
    #[error("not a text key file: {0}")]
    NotText(#[from] std::str::Utf8Error),

    #[error(transparent)]
    Decode(#[from] russh::keys::Error),
}

/// How server host keys are verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostKeyPolicy {
    /// Accept any host key without consulting known_hosts.
    ///
    /// Connections made under this policy are open to man-in-the-middle
    /// attacks. The server key fingerprint is logged at debug level.
    #[default]
    AcceptAny,
}

/// Credentials and verification policy shared by all sessions of one run.
#[derive(Clone)]
pub struct AuthContext {
    login_name: String,
    key: Arc<PrivateKey>,
    host_key_policy: HostKeyPolicy,
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("login_name", &self.login_name)
            .field("key", &self.key.algorithm())
            .field("host_key_policy", &self.host_key_policy)
            .finish()
    }
}

impl AuthContext {
    pub fn new(login_name: impl Into<String>, key: PrivateKey) -> Self {
        Self {
            login_name: login_name.into(),
            key: Arc::new(key),
            host_key_policy: HostKeyPolicy::AcceptAny,
        }
    }

    /// Read and parse an unencrypted private key, expanding a leading `~`.
    pub fn from_identity_file(
        login_name: impl Into<String>,
        identity_file: &str,
    ) -> Result<Self, AuthError> {
        let path = expand_home(identity_file)?;

        let bytes = std::fs::read(&path).map_err(|source| AuthError::KeyUnreadable {
            path: path.clone(),
            source,
        })?;

        let key = parse_key(&bytes)
            .map_err(|source| AuthError::KeyUnparseable { path: path.clone(), source })?;

        tracing::debug!(path = %path.display(), algorithm = %key.algorithm(), "loaded identity");
        Ok(Self::new(login_name, key))
    }

    pub fn login_name(&self) -> &str {
        &self.login_name
    }

    pub fn key(&self) -> Arc<PrivateKey> {
        Arc::clone(&self.key)
    }

    pub fn host_key_policy(&self) -> HostKeyPolicy {
        self.host_key_policy
    }
}

fn parse_key(bytes: &[u8]) -> Result<PrivateKey, KeyFormatError> {
    let pem = std::str::from_utf8(bytes)?;
    Ok(decode_secret_key(pem, None)?)
}

/// Replace a leading `~` with the user's home directory.
pub fn expand_home(path: &str) -> Result<PathBuf, AuthError> {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return Ok(PathBuf::from(path)),
    };

    let home = dirs::home_dir().ok_or_else(|| AuthError::HomeNotFound(path.to_string()))?;
    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(Path::new(rest)))
    }
}
