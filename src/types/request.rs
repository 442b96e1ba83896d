// ABOUTME: The validated per-invocation session request.
// ABOUTME: Built once from CLI/config input; immutable afterwards.

use super::address::AddressPreference;
use super::filter_tag::{FilterTag, FilterTagError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error(transparent)]
    FilterTag(#[from] FilterTagError),

    #[error("login name cannot be empty")]
    EmptyLoginName,

    #[error("identity file path cannot be empty")]
    EmptyIdentityFile,
}

/// Everything one invocation needs to pick targets and open sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    filter: FilterTag,
    login_name: String,
    identity_file: String,
    address: AddressPreference,
    command: Option<String>,
}

impl SessionRequest {
    pub fn builder(filter: impl Into<String>) -> SessionRequestBuilder {
        SessionRequestBuilder {
            filter: filter.into(),
            login_name: String::new(),
            identity_file: String::new(),
            address: AddressPreference::default(),
            command: None,
        }
    }

    pub fn filter(&self) -> &FilterTag {
        &self.filter
    }

    pub fn login_name(&self) -> &str {
        &self.login_name
    }

    pub fn identity_file(&self) -> &str {
        &self.identity_file
    }

    pub fn address(&self) -> AddressPreference {
        self.address
    }

    /// The remote command, if any. Never blank.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct SessionRequestBuilder {
    filter: String,
    login_name: String,
    identity_file: String,
    address: AddressPreference,
    command: Option<String>,
}

impl SessionRequestBuilder {
    pub fn login_name(mut self, login_name: impl Into<String>) -> Self {
        self.login_name = login_name.into();
        self
    }

    pub fn identity_file(mut self, path: impl Into<String>) -> Self {
        self.identity_file = path.into();
        self
    }

    pub fn address(mut self, address: AddressPreference) -> Self {
        self.address = address;
        self
    }

    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Join command words the way a shell command line would read.
    pub fn command_words<S: AsRef<str>>(mut self, words: &[S]) -> Self {
        let joined = words
            .iter()
            .map(|w| w.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        self.command = Some(joined);
        self
    }

    pub fn build(self) -> Result<SessionRequest, RequestError> {
        let filter = FilterTag::parse(&self.filter)?;

        let login_name = self.login_name.trim().to_string();
        if login_name.is_empty() {
            return Err(RequestError::EmptyLoginName);
        }

        let identity_file = self.identity_file.trim().to_string();
        if identity_file.is_empty() {
            return Err(RequestError::EmptyIdentityFile);
        }

        let command = self.command.filter(|c| !c.trim().is_empty());

        Ok(SessionRequest {
            filter,
            login_name,
            identity_file,
            address: self.address,
            command,
        })
    }
}

/// Split `[USER@]FILTER_TAG` into its optional login and the filter tag.
///
/// A prefix containing `:` belongs to a `Key:Value` tag, so
/// `Owner:alice@example.com` is a filter tag with no login.
pub fn split_login(destination: &str) -> (Option<&str>, &str) {
    match destination.split_once('@') {
        Some((user, _)) if user.contains(':') => (None, destination),
        Some((user, rest)) if !user.is_empty() => (Some(user), rest),
        Some((_, rest)) => (None, rest),
        None => (None, destination),
    }
}
