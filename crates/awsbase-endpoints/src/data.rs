//! Embedded partition table.
//!
//! Mirrors the `partitions` section of the AWS SDK endpoints model. Order
//! matters: lookups walk the table top to bottom.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::partition::{Partition, Region};

pub(crate) struct PartitionEntry {
    pub(crate) partition: Partition,
    pub(crate) regions: HashMap<String, Region>,
}

pub(crate) static PARTITIONS: LazyLock<Vec<PartitionEntry>> = LazyLock::new(|| {
    vec![
        entry(
            "aws",
            "AWS Standard",
            "amazonaws.com",
            r"^(us|eu|ap|sa|ca|me|af|il|mx)\-\w+\-\d+$",
            &[
                ("af-south-1", "Africa (Cape Town)"),
                ("ap-east-1", "Asia Pacific (Hong Kong)"),
                ("ap-east-2", "Asia Pacific (Taipei)"),
                ("ap-northeast-1", "Asia Pacific (Tokyo)"),
                ("ap-northeast-2", "Asia Pacific (Seoul)"),
                ("ap-northeast-3", "Asia Pacific (Osaka)"),
                ("ap-south-1", "Asia Pacific (Mumbai)"),
                ("ap-south-2", "Asia Pacific (Hyderabad)"),
                ("ap-southeast-1", "Asia Pacific (Singapore)"),
                ("ap-southeast-2", "Asia Pacific (Sydney)"),
                ("ap-southeast-3", "Asia Pacific (Jakarta)"),
                ("ap-southeast-4", "Asia Pacific (Melbourne)"),
                ("ap-southeast-5", "Asia Pacific (Malaysia)"),
                ("ap-southeast-7", "Asia Pacific (Thailand)"),
                ("aws-global", "AWS Standard global region"),
                ("ca-central-1", "Canada (Central)"),
                ("ca-west-1", "Canada West (Calgary)"),
                ("eu-central-1", "Europe (Frankfurt)"),
                ("eu-central-2", "Europe (Zurich)"),
                ("eu-north-1", "Europe (Stockholm)"),
                ("eu-south-1", "Europe (Milan)"),
                ("eu-south-2", "Europe (Spain)"),
                ("eu-west-1", "Europe (Ireland)"),
                ("eu-west-2", "Europe (London)"),
                ("eu-west-3", "Europe (Paris)"),
                ("il-central-1", "Israel (Tel Aviv)"),
                ("me-central-1", "Middle East (UAE)"),
                ("me-south-1", "Middle East (Bahrain)"),
                ("mx-central-1", "Mexico (Central)"),
                ("sa-east-1", "South America (Sao Paulo)"),
                ("us-east-1", "US East (N. Virginia)"),
                ("us-east-2", "US East (Ohio)"),
                ("us-west-1", "US West (N. California)"),
                ("us-west-2", "US West (Oregon)"),
            ],
        ),
        entry(
            "aws-cn",
            "AWS China",
            "amazonaws.com.cn",
            r"^cn\-\w+\-\d+$",
            &[
                ("aws-cn-global", "AWS China global region"),
                ("cn-north-1", "China (Beijing)"),
                ("cn-northwest-1", "China (Ningxia)"),
            ],
        ),
        entry(
            "aws-us-gov",
            "AWS GovCloud (US)",
            "amazonaws.com",
            r"^us\-gov\-\w+\-\d+$",
            &[
                ("aws-us-gov-global", "AWS GovCloud (US) global region"),
                ("us-gov-east-1", "AWS GovCloud (US-East)"),
                ("us-gov-west-1", "AWS GovCloud (US-West)"),
            ],
        ),
        entry(
            "aws-iso",
            "AWS ISO (US)",
            "c2s.ic.gov",
            r"^us\-iso\-\w+\-\d+$",
            &[
                ("aws-iso-global", "AWS ISO (US) global region"),
                ("us-iso-east-1", "US ISO East"),
                ("us-iso-west-1", "US ISO WEST"),
            ],
        ),
        entry(
            "aws-iso-b",
            "AWS ISOB (US)",
            "sc2s.sgov.gov",
            r"^us\-isob\-\w+\-\d+$",
            &[
                ("aws-iso-b-global", "AWS ISOB (US) global region"),
                ("us-isob-east-1", "US ISOB East (Ohio)"),
            ],
        ),
        entry(
            "aws-iso-e",
            "AWS ISOE (Europe)",
            "cloud.adc-e.uk",
            r"^eu\-isoe\-\w+\-\d+$",
            &[
                ("aws-iso-e-global", "AWS ISOE (Europe) global region"),
                ("eu-isoe-west-1", "EU ISOE West"),
            ],
        ),
        entry(
            "aws-iso-f",
            "AWS ISOF",
            "csp.hci.ic.gov",
            r"^us\-isof\-\w+\-\d+$",
            &[
                ("aws-iso-f-global", "AWS ISOF global region"),
                ("us-isof-east-1", "US ISOF EAST"),
                ("us-isof-south-1", "US ISOF SOUTH"),
            ],
        ),
        entry(
            "aws-eusc",
            "AWS EUSC",
            "amazonaws.eu",
            r"^eusc\-(de)\-\w+\-\d+$",
            &[("eusc-de-east-1", "EU (Germany)")],
        ),
    ]
});

fn entry(
    id: &'static str,
    name: &'static str,
    dns_suffix: &'static str,
    region_regex: &str,
    regions: &[(&str, &str)],
) -> PartitionEntry {
    let regex = Regex::new(region_regex).expect("embedded partition regex is valid");
    PartitionEntry {
        partition: Partition::new(id, name, dns_suffix, regex),
        regions: regions
            .iter()
            .map(|(region_id, description)| {
                ((*region_id).to_owned(), Region::new(region_id, description))
            })
            .collect(),
    }
}
