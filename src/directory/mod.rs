// ABOUTME: Instance directory capability: finds compute instances by tag.
// ABOUTME: The EC2 implementation lives in ec2.rs; tests supply in-memory fakes.

mod ec2;

pub use ec2::Ec2Directory;

use crate::types::{AddressPreference, FilterTag};
use async_trait::async_trait;

/// A compute instance as reported by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: String,
    pub public_address: Option<String>,
    pub private_address: Option<String>,
}

impl Instance {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            public_address: None,
            private_address: None,
        }
    }

    pub fn with_public_address(mut self, address: impl Into<String>) -> Self {
        self.public_address = Some(address.into());
        self
    }

    pub fn with_private_address(mut self, address: impl Into<String>) -> Self {
        self.private_address = Some(address.into());
        self
    }

    /// The address of the requested class, if the instance has one.
    pub fn address(&self, preference: AddressPreference) -> Option<&str> {
        match preference {
            AddressPreference::Public => self.public_address.as_deref(),
            AddressPreference::Private => self.private_address.as_deref(),
        }
    }
}

/// Lookup of instances matching a tag filter.
#[async_trait]
pub trait InstanceDirectory: Send + Sync {
    /// Return matching instances in directory order.
    ///
    /// With `only_running` set, stopped and terminated instances are excluded.
    async fn find(
        &self,
        filter: &FilterTag,
        only_running: bool,
    ) -> Result<Vec<Instance>, DirectoryError>;
}

/// Errors from the instance directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("instance query failed: {0}")]
    Query(String),
}
