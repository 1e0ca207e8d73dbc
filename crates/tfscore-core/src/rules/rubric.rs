//! The fixed rubric: which attributes each slot is graded on.
//!
//! Each builder returns the ordered check list for one slot, with the
//! subject suffix and upstream identifiers already bound into the
//! predicates.

use crate::rules::catalog::{Check, marker};
use crate::rules::matcher::Predicate;

pub const REGION: &str = "sa-brazil-1";
pub const COMPUTE_FLAVOR: &str = "s6.large.4";
pub const EIP_CHARGE_MODE: &str = "traffic";
pub const EIP_BANDWIDTH_SIZE: u64 = 100;
pub const EIP_STATUS: &str = "BOUND";
pub const RDS_ENGINE: &str = "MySQL";
pub const RDS_PORT: u64 = 3306;
pub const RDS_VERSION: &str = "5.7";
pub const RDS_FLAVOR: &str = "rds.mysql.n1.large.4.ha";
pub const GAUSSDB_FLAVOR: &str = "gaussdb.mysql.large.x86.4";

const PRIVATE_PREFIX: &str = "10.";

/// Naming suffix for a subject: its last two characters.
pub fn subject_suffix(subject: &str) -> &str {
    let start = subject
        .char_indices()
        .rev()
        .nth(1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &subject[start..]
}

pub fn network(suffix: &str) -> Vec<Check> {
    vec![
        Check::new("name", "/name", Predicate::affixed("vpc-", suffix)),
        Check::new("region", "/region", Predicate::equals(REGION)),
        Check::new("cidr", "/cidr", Predicate::affixed(PRIVATE_PREFIX, ".0.0/16")),
    ]
}

/// Subnet checks. The address check is coupled to the role the subnet's
/// `name` declares, so a database-named subnet with a compute address fails.
pub fn subnet(suffix: &str, network_id: Option<&str>, name: Option<&str>) -> Vec<Check> {
    let name = name.unwrap_or_default();
    let names_role = |role: &str| name.contains(marker::SUBNET) && name.contains(role);

    let mut cidr_options = Vec::new();
    if names_role(marker::ECS) {
        cidr_options.push(Predicate::affixed(PRIVATE_PREFIX, ".0.0/24"));
    }
    if names_role(marker::DB) {
        cidr_options.push(Predicate::affixed(PRIVATE_PREFIX, ".1.0/24"));
    }

    vec![
        Check::new("vpc_id", "/vpc_id", Predicate::identifier(network_id)),
        Check::new(
            "name",
            "/name",
            Predicate::AnyOf {
                options: vec![
                    Predicate::marked(&[marker::SUBNET, marker::ECS], suffix),
                    Predicate::marked(&[marker::SUBNET, marker::DB], suffix),
                ],
            },
        ),
        Check::new(
            "cidr",
            "/cidr",
            Predicate::AnyOf {
                options: cidr_options,
            },
        ),
    ]
}

/// Named checks for the security group. Ingress rules are scored
/// separately by [`crate::rules::eval::score_rules`].
pub fn security_group(suffix: &str) -> Vec<Check> {
    vec![Check::new(
        "name",
        "/name",
        Predicate::marked(&["secgroup-"], suffix),
    )]
}

pub fn compute_instance(
    suffix: &str,
    subnet_id: Option<&str>,
    security_group_id: Option<&str>,
) -> Vec<Check> {
    vec![
        Check::new(
            "network_uuid",
            "/network/0/uuid",
            Predicate::identifier(subnet_id),
        ),
        Check::new(
            "security_group_id",
            "/security_group_ids/0",
            Predicate::identifier(security_group_id),
        ),
        Check::new("hostname", "/hostname", Predicate::marked(&[marker::ECS], suffix)),
        Check::new(
            "access_ip_v4",
            "/access_ip_v4",
            Predicate::affixed(PRIVATE_PREFIX, ".0.10"),
        ),
        Check::new("flavor_id", "/flavor_id", Predicate::marked(&[COMPUTE_FLAVOR], "")),
    ]
}

pub fn elastic_ip(suffix: &str) -> Vec<Check> {
    vec![
        Check::new("bandwidth_name", "/bandwidth/0/name", Predicate::marked(&["eip"], suffix)),
        Check::new(
            "charge_mode",
            "/bandwidth/0/charge_mode",
            Predicate::equals(EIP_CHARGE_MODE),
        ),
        Check::new(
            "bandwidth_size",
            "/bandwidth/0/size",
            Predicate::equals(EIP_BANDWIDTH_SIZE),
        ),
        Check::new("status", "/status", Predicate::equals(EIP_STATUS)),
    ]
}

pub fn relational_db(
    suffix: &str,
    network_id: Option<&str>,
    subnet_id: Option<&str>,
) -> Vec<Check> {
    vec![
        Check::new("vpc_id", "/vpc_id", Predicate::identifier(network_id)),
        Check::new("subnet_id", "/subnet_id", Predicate::identifier(subnet_id)),
        Check::new("db_type", "/db/0/type", Predicate::equals(RDS_ENGINE)),
        Check::new("db_port", "/db/0/port", Predicate::equals(RDS_PORT)),
        Check::new("db_version", "/db/0/version", Predicate::equals(RDS_VERSION)),
        Check::new("name", "/name", Predicate::marked(&["rds"], suffix)),
        Check::new("flavor", "/flavor", Predicate::equals(RDS_FLAVOR)),
    ]
}

pub fn distributed_db(
    suffix: &str,
    security_group_id: Option<&str>,
    subnet_id: Option<&str>,
) -> Vec<Check> {
    vec![
        Check::new(
            "security_group_id",
            "/security_group_id",
            Predicate::identifier(security_group_id),
        ),
        Check::new("subnet_id", "/subnet_id", Predicate::identifier(subnet_id)),
        Check::new("name", "/name", Predicate::marked(&["gauss"], suffix)),
        Check::new("flavor", "/flavor", Predicate::equals(GAUSSDB_FLAVOR)),
    ]
}
