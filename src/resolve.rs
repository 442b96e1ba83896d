// ABOUTME: Target resolution: tag filter plus address preference to connectable hosts.
// ABOUTME: All-or-nothing; a single instance without the requested address fails the whole set.

use crate::directory::{DirectoryError, Instance, InstanceDirectory};
use crate::types::{AddressPreference, FilterTag, Target};
use nonempty::NonEmpty;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no such instance: {filter}")]
    NoMatch { filter: String },

    #[error("no {preference} ip address: {instance_id}")]
    MissingAddress {
        instance_id: String,
        preference: AddressPreference,
    },

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Resolve the running instances matching `filter` into targets.
///
/// Directory order is preserved.
pub async fn resolve<D>(
    directory: &D,
    filter: &FilterTag,
    preference: AddressPreference,
) -> Result<NonEmpty<Target>, ResolveError>
where
    D: InstanceDirectory + ?Sized,
{
    let instances = find_running(directory, filter).await?;
    select_addresses(&instances, preference)
}

/// The running instances matching `filter`, failing with `NoMatch` when
/// there are none.
pub async fn find_running<D>(
    directory: &D,
    filter: &FilterTag,
) -> Result<NonEmpty<Instance>, ResolveError>
where
    D: InstanceDirectory + ?Sized,
{
    let instances = directory.find(filter, true).await?;
    let instances = NonEmpty::from_vec(instances).ok_or_else(|| ResolveError::NoMatch {
        filter: filter.to_string(),
    })?;

    tracing::debug!(%filter, count = instances.len(), "matched running instances");
    Ok(instances)
}

/// Pick the preferred address of every instance.
///
/// One instance lacking the address fails the whole set.
pub fn select_addresses(
    instances: &NonEmpty<Instance>,
    preference: AddressPreference,
) -> Result<NonEmpty<Target>, ResolveError> {
    let select = |instance: &Instance| {
        instance
            .address(preference)
            .map(Target::new)
            .ok_or_else(|| ResolveError::MissingAddress {
                instance_id: instance.id.clone(),
                preference,
            })
    };

    let mut targets = NonEmpty::new(select(instances.first())?);
    for instance in instances.iter().skip(1) {
        targets.push(select(instance)?);
    }

    tracing::debug!(%preference, count = targets.len(), "resolved targets");
    Ok(targets)
}
