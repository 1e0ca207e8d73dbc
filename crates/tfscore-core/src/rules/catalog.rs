use serde::{Deserialize, Serialize};

use crate::rules::matcher::Predicate;

/// Points awarded when a check's predicate holds.
pub const PASS_POINTS: u32 = 10;

/// Points awarded when a check's predicate fails or its attribute is absent.
pub const FAIL_POINTS: u32 = 5;

/// Rubric role filled by at most one declared resource per snapshot.
///
/// Variants are listed in grading order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Network,
    SubnetDatabase,
    SubnetCompute,
    SecurityGroup,
    ComputeInstance,
    ElasticIp,
    RelationalDb,
    DistributedDb,
}

impl Slot {
    pub const ALL: [Slot; 8] = [
        Slot::Network,
        Slot::SubnetDatabase,
        Slot::SubnetCompute,
        Slot::SecurityGroup,
        Slot::ComputeInstance,
        Slot::ElasticIp,
        Slot::RelationalDb,
        Slot::DistributedDb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Network => "network",
            Slot::SubnetDatabase => "subnet_database",
            Slot::SubnetCompute => "subnet_compute",
            Slot::SecurityGroup => "security_group",
            Slot::ComputeInstance => "compute_instance",
            Slot::ElasticIp => "elastic_ip",
            Slot::RelationalDb => "relational_db",
            Slot::DistributedDb => "distributed_db",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type tags recognised by the classifier.
pub mod resource_type {
    pub const VPC: &str = "huaweicloud_vpc";
    pub const SUBNET: &str = "huaweicloud_vpc_subnet";
    pub const SECGROUP: &str = "huaweicloud_networking_secgroup";
    pub const COMPUTE: &str = "huaweicloud_compute_instance";
    pub const EIP: &str = "huaweicloud_vpc_eip";
    pub const RDS: &str = "huaweicloud_rds_instance";
    pub const GAUSSDB: &str = "huaweicloud_gaussdb_mysql_instance";
}

/// Naming markers shared by the rubric and the classifier.
pub mod marker {
    pub const SUBNET: &str = "subnet";
    pub const ECS: &str = "ecs";
    pub const DB: &str = "db";
}

/// A single rubric entry: one attribute, one predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Check {
    /// Short label used in reports, usually the attribute name.
    pub name: &'static str,

    /// JSON pointer into the slot's attribute set.
    pub pointer: &'static str,

    pub predicate: Predicate,
}

impl Check {
    pub fn new(name: &'static str, pointer: &'static str, predicate: Predicate) -> Self {
        Self {
            name,
            pointer,
            predicate,
        }
    }
}
