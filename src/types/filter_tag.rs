// ABOUTME: Resource-tag filter parsing.
// ABOUTME: Accepts "Key:Value" or a bare value, which selects on the Name tag.

use std::fmt;
use thiserror::Error;

/// Tag key used when the filter has no explicit key.
pub const DEFAULT_TAG_KEY: &str = "Name";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterTagError {
    #[error("filter tag cannot be empty")]
    Empty,

    #[error("filter tag key cannot be empty: {0}")]
    EmptyKey(String),

    #[error("filter tag value cannot be empty: {0}")]
    EmptyValue(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterTag {
    key: String,
    value: String,
}

impl FilterTag {
    pub fn parse(s: &str) -> Result<Self, FilterTagError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FilterTagError::Empty);
        }

        let (key, value) = match s.split_once(':') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (DEFAULT_TAG_KEY, s),
        };

        if key.is_empty() {
            return Err(FilterTagError::EmptyKey(s.to_string()));
        }
        if value.is_empty() {
            return Err(FilterTagError::EmptyValue(s.to_string()));
        }

        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for FilterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.value)
    }
}
