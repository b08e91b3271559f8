//! AWS partition table and region resolution for awsbase.
//!
//! A partition is an isolated group of AWS regions sharing a DNS suffix
//! (for example `aws`, `aws-cn`, `aws-us-gov`). This crate embeds the
//! partition table and answers the question "which partition does this
//! region belong to?".
//!
//! # Resolution
//!
//! Partitions are checked in declaration order. A region ID matches a
//! partition when it is a known region of that partition, or when it matches
//! the partition's region regular expression. The first match wins; unknown
//! regions resolve to `None`.
//!
//! ```
//! use awsbase_endpoints::resolve_region;
//!
//! let partition = resolve_region("eu-west-1").expect("known region");
//! assert_eq!(partition.id(), "aws");
//! assert_eq!(partition.dns_suffix(), "amazonaws.com");
//!
//! assert!(resolve_region("mars-north-1").is_none());
//! ```

mod data;
mod partition;

pub use partition::{Partition, Region, default_partitions, partition_for_region, resolve_region};
