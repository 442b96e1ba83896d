// ABOUTME: Public/private address selection for resolved instances.

use serde::Deserialize;
use std::fmt;

/// Which instance address to connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressPreference {
    #[default]
    Public,
    Private,
}

impl fmt::Display for AddressPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressPreference::Public => write!(f, "public"),
            AddressPreference::Private => write!(f, "private"),
        }
    }
}
