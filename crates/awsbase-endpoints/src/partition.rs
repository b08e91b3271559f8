//! Partition and region types plus region-to-partition lookup.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;

use crate::data::PARTITIONS;

/// An AWS partition.
///
/// See <https://docs.aws.amazon.com/whitepapers/latest/aws-fault-isolation-boundaries/partitions.html>.
#[derive(Debug, Clone)]
pub struct Partition {
    id: &'static str,
    name: &'static str,
    dns_suffix: &'static str,
    region_regex: Regex,
}

impl Partition {
    pub(crate) fn new(
        id: &'static str,
        name: &'static str,
        dns_suffix: &'static str,
        region_regex: Regex,
    ) -> Self {
        Self {
            id,
            name,
            dns_suffix,
            region_regex,
        }
    }

    /// Identifier of the partition, e.g. `aws-cn`.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id
    }

    /// Human readable name of the partition.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    /// Base domain name of the partition.
    #[must_use]
    pub fn dns_suffix(&self) -> &str {
        self.dns_suffix
    }

    /// Regular expression matching region IDs of the partition.
    #[must_use]
    pub fn region_regex(&self) -> &Regex {
        &self.region_regex
    }

    /// Regions of the partition, indexed by region ID.
    ///
    /// The returned map is an owned copy; mutating it does not affect the
    /// shared table.
    #[must_use]
    pub fn regions(&self) -> HashMap<String, Region> {
        PARTITIONS
            .iter()
            .find(|entry| entry.partition.id == self.id)
            .map(|entry| entry.regions.clone())
            .unwrap_or_default()
    }
}

impl PartialEq for Partition {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Partition {}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}

/// Metadata for a single region.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Region {
    id: String,
    description: String,
}

impl Region {
    pub(crate) fn new(id: &str, description: &str) -> Self {
        Self {
            id: id.to_owned(),
            description: description.to_owned(),
        }
    }

    /// Region ID, e.g. `us-west-2`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human readable description, e.g. `US West (Oregon)`.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// All known partitions, in declaration order.
#[must_use]
pub fn default_partitions() -> Vec<Partition> {
    PARTITIONS
        .iter()
        .map(|entry| entry.partition.clone())
        .collect()
}

/// Return the first partition in `partitions` that includes `region_id`.
///
/// A partition includes a region when the region is an exact key of its
/// region table, or when the ID matches its region regex. Partitions that are
/// not part of the embedded table are skipped.
#[must_use]
pub fn partition_for_region(partitions: &[Partition], region_id: &str) -> Option<Partition> {
    partitions
        .iter()
        .find(|p| {
            PARTITIONS
                .iter()
                .find(|entry| entry.partition.id == p.id)
                .is_some_and(|entry| {
                    entry.regions.contains_key(region_id)
                        || entry.partition.region_regex.is_match(region_id)
                })
        })
        .cloned()
}

/// Resolve `region_id` against [`default_partitions`].
#[must_use]
pub fn resolve_region(region_id: &str) -> Option<Partition> {
    partition_for_region(&default_partitions(), region_id)
}
