//! Resource classifier.
//!
//! Buckets the unordered `resources[]` list of a snapshot into rubric slots.
//! Dependencies (e.g. the network) may appear anywhere relative to their
//! dependents, so grading only starts once every slot is known.
//!
//! Rules:
//!
//!   - The declared type tag selects the slot.
//!   - Subnets are split by name: an `ecs` marker wins, then `db`.
//!   - A slot keeps the last resource seen for it.
//!   - Resources with no instance, or an unknown type, are ignored.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::rules::catalog::{Slot, marker, resource_type};
use crate::snapshot::model::{AttributeSet, Snapshot};

type Selector = fn(&AttributeSet) -> Option<Slot>;

const SELECTORS: &[(&str, Selector)] = &[
    (resource_type::VPC, |_| Some(Slot::Network)),
    (resource_type::SUBNET, subnet_slot),
    (resource_type::SECGROUP, |_| Some(Slot::SecurityGroup)),
    (resource_type::COMPUTE, |_| Some(Slot::ComputeInstance)),
    (resource_type::EIP, |_| Some(Slot::ElasticIp)),
    (resource_type::RDS, |_| Some(Slot::RelationalDb)),
    (resource_type::GAUSSDB, |_| Some(Slot::DistributedDb)),
];

fn subnet_slot(attrs: &AttributeSet) -> Option<Slot> {
    let name = attrs.lookup_str("/name")?;
    if name.contains(marker::ECS) {
        Some(Slot::SubnetCompute)
    } else if name.contains(marker::DB) {
        Some(Slot::SubnetDatabase)
    } else {
        None
    }
}

fn selector_for(kind: &str) -> Option<Selector> {
    SELECTORS
        .iter()
        .find(|(tag, _)| *tag == kind)
        .map(|(_, selector)| *selector)
}

/// Attribute sets keyed by the slot they fill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slots {
    filled: BTreeMap<Slot, AttributeSet>,
}

impl Slots {
    pub fn take(&mut self, slot: Slot) -> Option<AttributeSet> {
        self.filled.remove(&slot)
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.filled.contains_key(&slot)
    }

    /// Rubric slots with no declared resource.
    pub fn missing(&self) -> Vec<Slot> {
        Slot::ALL
            .into_iter()
            .filter(|slot| !self.contains(*slot))
            .collect()
    }

    fn fill(&mut self, slot: Slot, attrs: AttributeSet) {
        if self.filled.insert(slot, attrs).is_some() {
            debug!(%slot, "slot declared more than once; keeping the last resource");
        }
    }
}

pub fn classify(snapshot: &Snapshot) -> Slots {
    let mut slots = Slots::default();

    for resource in &snapshot.resources {
        let Some(selector) = selector_for(&resource.kind) else {
            trace!(kind = %resource.kind, "resource type not graded");
            continue;
        };
        let name = resource.name.as_deref().unwrap_or("-");
        let Some(attrs) = resource.primary_attributes() else {
            debug!(kind = %resource.kind, name, "resource has no instances");
            continue;
        };
        match selector(attrs) {
            Some(slot) => {
                debug!(kind = %resource.kind, name, %slot, "resource classified");
                slots.fill(slot, attrs.clone());
            }
            None => debug!(kind = %resource.kind, name, "resource does not fill any slot"),
        }
    }

    slots
}
