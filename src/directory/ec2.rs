// ABOUTME: EC2-backed instance directory using the AWS SDK.
// ABOUTME: Translates a tag filter into DescribeInstances filters and follows pagination.

use super::{DirectoryError, Instance, InstanceDirectory};
use crate::types::FilterTag;
use async_trait::async_trait;
use aws_config::Region;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::Filter;

/// Instance directory backed by the EC2 DescribeInstances API.
#[derive(Debug, Clone)]
pub struct Ec2Directory {
    client: aws_sdk_ec2::Client,
}

impl Ec2Directory {
    /// Load AWS configuration from the default chain.
    ///
    /// An explicit region wins over the environment; an explicit profile
    /// replaces the default profile.
    pub async fn connect(profile: Option<&str>, region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = region {
            let provider =
                RegionProviderChain::first_try(Region::new(region.to_string())).or_default_provider();
            loader = loader.region(provider);
        }

        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }

        let config = loader.load().await;
        Self {
            client: aws_sdk_ec2::Client::new(&config),
        }
    }
}

/// Build the DescribeInstances filters for a tag filter.
fn build_filters(filter: &FilterTag, only_running: bool) -> Vec<Filter> {
    let mut filters = Vec::with_capacity(2);

    if only_running {
        filters.push(
            Filter::builder()
                .name("instance-state-name")
                .values("running")
                .build(),
        );
    }

    filters.push(
        Filter::builder()
            .name(format!("tag:{}", filter.key()))
            .values(filter.value())
            .build(),
    );

    filters
}

#[async_trait]
impl InstanceDirectory for Ec2Directory {
    async fn find(
        &self,
        filter: &FilterTag,
        only_running: bool,
    ) -> Result<Vec<Instance>, DirectoryError> {
        tracing::debug!(%filter, only_running, "querying EC2 instances");

        let mut pages = self
            .client
            .describe_instances()
            .set_filters(Some(build_filters(filter, only_running)))
            .into_paginator()
            .send();

        let mut instances = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page
                .map_err(|e| DirectoryError::Query(DisplayErrorContext(&e).to_string()))?;

            for reservation in page.reservations() {
                for instance in reservation.instances() {
                    instances.push(Instance {
                        id: instance.instance_id().unwrap_or("unknown").to_string(),
                        public_address: instance.public_ip_address().map(str::to_string),
                        private_address: instance.private_ip_address().map(str::to_string),
                    });
                }
            }
        }

        tracing::debug!(count = instances.len(), "EC2 instances matched");
        Ok(instances)
    }
}
