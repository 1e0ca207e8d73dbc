//! Grading orchestrator.
//!
//! A snapshot is graded by threading a [`GradeContext`] through a fixed list
//! of stages, one per rubric slot. Each stage scores its slot and records the
//! identifiers later stages compare against:
//!
//!   network ─┬─ subnet (database) ──┬─ relational db
//!            │                      └─ distributed db
//!            └─ subnet (compute) ──── compute instance
//!   security group ───────────────┬── compute instance
//!                                 └── distributed db
//!
//! Stages run strictly in order, so an identifier is always produced before
//! any stage that consumes it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MissingSlotPolicy;
use crate::error::GradeError;
use crate::grade::timestamp::{self, Timestamp};
use crate::rules::catalog::Slot;
use crate::rules::classify::{Slots, classify};
use crate::rules::eval::{CheckOutcome, run_checks, score_rules, total_points};
use crate::rules::rubric;
use crate::snapshot::model::{AttributeSet, Snapshot};

/// Final grade of one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub subject: String,
    pub score: u32,
    /// Most recent representative timestamp among graded resources.
    pub time: Timestamp,
    pub outcomes: Vec<CheckOutcome>,
}

impl Grade {
    pub fn slot_points(&self, slot: Slot) -> u32 {
        self.outcomes
            .iter()
            .filter(|o| o.slot == slot)
            .map(|o| o.points)
            .sum()
    }
}

/// State threaded through the grading stages.
#[derive(Debug)]
pub struct GradeContext {
    suffix: String,
    policy: MissingSlotPolicy,
    slots: Slots,
    network_id: Option<String>,
    subnet_database_id: Option<String>,
    subnet_compute_id: Option<String>,
    security_group_id: Option<String>,
    timestamps: Vec<(Slot, Timestamp)>,
    outcomes: Vec<CheckOutcome>,
}

impl GradeContext {
    pub fn new(subject: &str, slots: Slots, policy: MissingSlotPolicy) -> Self {
        Self {
            suffix: rubric::subject_suffix(subject).to_string(),
            policy,
            slots,
            network_id: None,
            subnet_database_id: None,
            subnet_compute_id: None,
            security_group_id: None,
            timestamps: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    fn attributes(&mut self, slot: Slot) -> Result<AttributeSet, GradeError> {
        match (self.slots.take(slot), self.policy) {
            (Some(attrs), _) => Ok(attrs),
            (None, MissingSlotPolicy::Reject) => Err(GradeError::IncompleteSnapshot { slot }),
            (None, MissingSlotPolicy::ScoreAsFailing) => {
                debug!(%slot, "slot missing; grading against empty attributes");
                Ok(AttributeSet::default())
            }
        }
    }

    fn record(&mut self, outcomes: Vec<CheckOutcome>) {
        self.outcomes.extend(outcomes);
    }

    fn stamp(&mut self, slot: Slot, attrs: &AttributeSet, fields: &[&str]) {
        if let Some(time) = timestamp::representative(attrs, fields) {
            self.timestamps.push((slot, time));
        }
    }

    fn finish(self, subject: &str) -> Grade {
        let time = self
            .timestamps
            .into_iter()
            .map(|(_, time)| time)
            .max()
            .unwrap_or_default();

        Grade {
            subject: subject.to_string(),
            score: total_points(&self.outcomes),
            time,
            outcomes: self.outcomes,
        }
    }
}

type Stage = fn(GradeContext) -> Result<GradeContext, GradeError>;

/// Grading order. Each slot appears exactly once.
const STAGES: &[(Slot, Stage)] = &[
    (Slot::Network, network),
    (Slot::SubnetDatabase, subnet_database),
    (Slot::SubnetCompute, subnet_compute),
    (Slot::SecurityGroup, security_group),
    (Slot::ComputeInstance, compute_instance),
    (Slot::ElasticIp, elastic_ip),
    (Slot::RelationalDb, relational_db),
    (Slot::DistributedDb, distributed_db),
];

fn identifier(attrs: &AttributeSet) -> Option<String> {
    attrs.lookup_str("/id").map(str::to_string)
}

fn network(mut ctx: GradeContext) -> Result<GradeContext, GradeError> {
    let attrs = ctx.attributes(Slot::Network)?;
    let outcomes = run_checks(Slot::Network, &attrs, &rubric::network(&ctx.suffix));
    ctx.record(outcomes);
    ctx.network_id = identifier(&attrs);
    Ok(ctx)
}

fn subnet(ctx: &mut GradeContext, slot: Slot) -> Result<Option<String>, GradeError> {
    let attrs = ctx.attributes(slot)?;
    let checks = rubric::subnet(
        &ctx.suffix,
        ctx.network_id.as_deref(),
        attrs.lookup_str("/name"),
    );
    ctx.record(run_checks(slot, &attrs, &checks));
    Ok(identifier(&attrs))
}

fn subnet_database(mut ctx: GradeContext) -> Result<GradeContext, GradeError> {
    ctx.subnet_database_id = subnet(&mut ctx, Slot::SubnetDatabase)?;
    Ok(ctx)
}

fn subnet_compute(mut ctx: GradeContext) -> Result<GradeContext, GradeError> {
    ctx.subnet_compute_id = subnet(&mut ctx, Slot::SubnetCompute)?;
    Ok(ctx)
}

fn security_group(mut ctx: GradeContext) -> Result<GradeContext, GradeError> {
    let slot = Slot::SecurityGroup;
    let attrs = ctx.attributes(slot)?;
    let outcomes = run_checks(slot, &attrs, &rubric::security_group(&ctx.suffix));
    ctx.record(outcomes);
    ctx.record(score_rules(slot, &attrs));
    ctx.security_group_id = identifier(&attrs);
    ctx.stamp(slot, &attrs, timestamp::UPDATED_OR_CREATED);
    Ok(ctx)
}

fn compute_instance(mut ctx: GradeContext) -> Result<GradeContext, GradeError> {
    let slot = Slot::ComputeInstance;
    let attrs = ctx.attributes(slot)?;
    let checks = rubric::compute_instance(
        &ctx.suffix,
        ctx.subnet_compute_id.as_deref(),
        ctx.security_group_id.as_deref(),
    );
    ctx.record(run_checks(slot, &attrs, &checks));
    ctx.stamp(slot, &attrs, timestamp::UPDATED_OR_CREATED);
    Ok(ctx)
}

fn elastic_ip(mut ctx: GradeContext) -> Result<GradeContext, GradeError> {
    let slot = Slot::ElasticIp;
    let attrs = ctx.attributes(slot)?;
    let outcomes = run_checks(slot, &attrs, &rubric::elastic_ip(&ctx.suffix));
    ctx.record(outcomes);
    ctx.stamp(slot, &attrs, timestamp::UPDATED_OR_CREATED);
    Ok(ctx)
}

fn relational_db(mut ctx: GradeContext) -> Result<GradeContext, GradeError> {
    let slot = Slot::RelationalDb;
    let attrs = ctx.attributes(slot)?;
    let checks = rubric::relational_db(
        &ctx.suffix,
        ctx.network_id.as_deref(),
        ctx.subnet_database_id.as_deref(),
    );
    ctx.record(run_checks(slot, &attrs, &checks));
    ctx.stamp(slot, &attrs, timestamp::CREATED);
    Ok(ctx)
}

fn distributed_db(mut ctx: GradeContext) -> Result<GradeContext, GradeError> {
    let slot = Slot::DistributedDb;
    let attrs = ctx.attributes(slot)?;
    let checks = rubric::distributed_db(
        &ctx.suffix,
        ctx.security_group_id.as_deref(),
        ctx.subnet_database_id.as_deref(),
    );
    ctx.record(run_checks(slot, &attrs, &checks));
    Ok(ctx)
}

/// Grade one snapshot for `subject`.
///
/// The snapshot is classified first, then every stage runs in order. Under
/// [`MissingSlotPolicy::Reject`] the first slot without a declared resource
/// aborts grading.
pub fn grade(
    snapshot: &Snapshot,
    subject: &str,
    policy: MissingSlotPolicy,
) -> Result<Grade, GradeError> {
    let slots = classify(snapshot);
    let missing = slots.missing();
    if !missing.is_empty() {
        debug!(subject, ?missing, ?policy, "snapshot has unfilled slots");
    }
    let ctx = GradeContext::new(subject, slots, policy);

    let ctx = STAGES.iter().try_fold(ctx, |ctx, (slot, stage)| {
        let before = total_points(&ctx.outcomes);
        let ctx = stage(ctx)?;
        debug!(subject, %slot, points = total_points(&ctx.outcomes) - before, "stage graded");
        Ok::<_, GradeError>(ctx)
    })?;

    Ok(ctx.finish(subject))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::resource_type;
    use crate::snapshot::model::{DeclaredResource, Instance};
    use serde_json::{Value, json};

    fn resource(kind: &str, attrs: Value) -> DeclaredResource {
        DeclaredResource {
            kind: kind.to_string(),
            name: None,
            instances: vec![Instance {
                attributes: AttributeSet::from(attrs),
            }],
        }
    }

    fn rule(ports: &str, protocol: &str, remote: &str) -> Value {
        json!({ "ports": ports, "protocol": protocol, "remote_ip_prefix": remote, "priority": 1 })
    }

    fn perfect_snapshot() -> Snapshot {
        Snapshot {
            resources: vec![
                resource(
                    resource_type::VPC,
                    json!({
                        "id": "vpc-id",
                        "name": "vpc-07",
                        "region": "sa-brazil-1",
                        "cidr": "10.7.0.0/16",
                    }),
                ),
                resource(
                    resource_type::SUBNET,
                    json!({
                        "id": "sn-ecs",
                        "vpc_id": "vpc-id",
                        "name": "subnet-ecs-07",
                        "cidr": "10.7.0.0/24",
                    }),
                ),
                resource(
                    resource_type::SUBNET,
                    json!({
                        "id": "sn-db",
                        "vpc_id": "vpc-id",
                        "name": "subnet-db-07",
                        "cidr": "10.7.1.0/24",
                    }),
                ),
                resource(
                    resource_type::SECGROUP,
                    json!({
                        "id": "sg-id",
                        "name": "secgroup-07",
                        "created_at": "2024-09-19T10:00:00Z",
                        "updated_at": "2024-09-19T10:05:00Z",
                        "rules": [
                            rule("3306", "tcp", "0.0.0.0/0"),
                            rule("22", "tcp", "177.1.2.3/32"),
                            rule("", "icmp", "0.0.0.0/0"),
                        ],
                    }),
                ),
                resource(
                    resource_type::COMPUTE,
                    json!({
                        "network": [{ "uuid": "sn-ecs" }],
                        "security_group_ids": ["sg-id"],
                        "hostname": "ecs-07",
                        "access_ip_v4": "10.7.0.10",
                        "flavor_id": "s6.large.4",
                        "created_at": "2024-09-19T10:12:00Z",
                    }),
                ),
                resource(
                    resource_type::EIP,
                    json!({
                        "bandwidth": [{ "name": "eip-07", "charge_mode": "traffic", "size": 100 }],
                        "status": "BOUND",
                        "created_at": "2024-09-19T10:08:00Z",
                    }),
                ),
                resource(
                    resource_type::RDS,
                    json!({
                        "vpc_id": "vpc-id",
                        "subnet_id": "sn-db",
                        "db": [{ "type": "MySQL", "port": 3306, "version": "5.7" }],
                        "name": "rds-07",
                        "flavor": "rds.mysql.n1.large.4.ha",
                        "created": "2024-09-19T10:20:00Z",
                    }),
                ),
                resource(
                    resource_type::GAUSSDB,
                    json!({
                        "security_group_id": "sg-id",
                        "subnet_id": "sn-db",
                        "name": "gauss-07",
                        "flavor": "gaussdb.mysql.large.x86.4",
                    }),
                ),
            ],
        }
    }

    #[test]
    fn perfect_snapshot_scores_every_check() {
        let grade = grade(&perfect_snapshot(), "student07", MissingSlotPolicy::Reject).unwrap();

        assert_eq!(grade.score, 330);
        assert!(grade.outcomes.iter().all(|o| o.passed));
        assert_eq!(grade.slot_points(Slot::Network), 30);
        assert_eq!(grade.slot_points(Slot::SecurityGroup), 40);
        assert_eq!(grade.slot_points(Slot::RelationalDb), 70);
        assert_eq!(grade.time, Timestamp::new("10:20:00"));
    }

    #[test]
    fn wrong_suffix_fails_every_naming_check() {
        let grade = grade(&perfect_snapshot(), "student08", MissingSlotPolicy::Reject).unwrap();

        let failed: Vec<(Slot, &str)> = grade
            .outcomes
            .iter()
            .filter(|o| !o.passed)
            .map(|o| (o.slot, o.check.as_str()))
            .collect();

        assert_eq!(
            failed,
            vec![
                (Slot::Network, "name"),
                (Slot::SubnetDatabase, "name"),
                (Slot::SubnetCompute, "name"),
                (Slot::SecurityGroup, "name"),
                (Slot::ComputeInstance, "hostname"),
                (Slot::ElasticIp, "bandwidth_name"),
                (Slot::RelationalDb, "name"),
                (Slot::DistributedDb, "name"),
            ]
        );
        assert_eq!(grade.score, 330 - 8 * 5);
    }

    #[test]
    fn identifiers_flow_into_dependent_checks() {
        let mut snapshot = perfect_snapshot();
        // Point the network at a different id: both subnets and the RDS
        // instance lose their vpc_id check.
        snapshot.resources[0] = resource(
            resource_type::VPC,
            json!({
                "id": "other",
                "name": "vpc-07",
                "region": "sa-brazil-1",
                "cidr": "10.7.0.0/16",
            }),
        );

        let grade = grade(&snapshot, "student07", MissingSlotPolicy::Reject).unwrap();

        let failed: Vec<(Slot, &str)> = grade
            .outcomes
            .iter()
            .filter(|o| !o.passed)
            .map(|o| (o.slot, o.check.as_str()))
            .collect();
        assert_eq!(
            failed,
            vec![
                (Slot::SubnetDatabase, "vpc_id"),
                (Slot::SubnetCompute, "vpc_id"),
                (Slot::RelationalDb, "vpc_id"),
            ]
        );
    }

    #[test]
    fn grading_is_deterministic() {
        let snapshot = perfect_snapshot();
        let first = grade(&snapshot, "student07", MissingSlotPolicy::Reject).unwrap();
        let second = grade(&snapshot, "student07", MissingSlotPolicy::Reject).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn resource_order_does_not_change_the_grade() {
        let forward = perfect_snapshot();
        let mut reversed = perfect_snapshot();
        reversed.resources.reverse();

        let a = grade(&forward, "student07", MissingSlotPolicy::Reject).unwrap();
        let b = grade(&reversed, "student07", MissingSlotPolicy::Reject).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_slot_is_rejected_by_default() {
        let mut snapshot = perfect_snapshot();
        snapshot.resources.retain(|r| r.kind != resource_type::EIP);

        let err = grade(&snapshot, "student07", MissingSlotPolicy::Reject).unwrap_err();
        assert_eq!(err, GradeError::IncompleteSnapshot { slot: Slot::ElasticIp });
    }

    #[test]
    fn missing_slot_scores_as_failing_when_lenient() {
        let mut snapshot = perfect_snapshot();
        snapshot.resources.retain(|r| r.kind != resource_type::EIP);

        let grade = grade(&snapshot, "student07", MissingSlotPolicy::ScoreAsFailing).unwrap();

        assert_eq!(grade.slot_points(Slot::ElasticIp), 4 * 5);
        assert_eq!(grade.score, 330 - 4 * 5);
    }

    #[test]
    fn lenient_grading_of_an_empty_snapshot() {
        let grade = grade(&Snapshot::default(), "student07", MissingSlotPolicy::ScoreAsFailing)
            .unwrap();

        // Every named check fails; absent security rules add nothing.
        assert_eq!(grade.score, 150);
        assert!(grade.time.is_empty());
        assert!(grade.outcomes.iter().all(|o| !o.passed));
    }

    #[test]
    fn time_is_the_latest_representative_timestamp() {
        let mut snapshot = perfect_snapshot();
        snapshot.resources[3] = resource(
            resource_type::SECGROUP,
            json!({
                "id": "sg-id",
                "name": "secgroup-07",
                "updated_at": "2024-09-19T23:59:59Z",
            }),
        );

        let grade = grade(&snapshot, "student07", MissingSlotPolicy::Reject).unwrap();
        assert_eq!(grade.time, Timestamp::new("23:59:59"));
    }
}
