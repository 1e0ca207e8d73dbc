use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rules::catalog::{Check, PASS_POINTS, Slot};
use crate::rules::matcher::{Predicate, evaluate};
use crate::snapshot::model::AttributeSet;

/// Scored result of one rubric check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub slot: Slot,
    pub check: String,
    pub passed: bool,
    pub points: u32,
}

/// Evaluate `checks` in order against one slot's attributes.
pub fn run_checks(slot: Slot, attrs: &AttributeSet, checks: &[Check]) -> Vec<CheckOutcome> {
    checks
        .iter()
        .map(|check| {
            let outcome = evaluate(attrs.lookup(check.pointer), &check.predicate);
            CheckOutcome {
                slot,
                check: check.name.to_string(),
                passed: outcome.passed,
                points: outcome.points,
            }
        })
        .collect()
}

pub fn total_points(outcomes: &[CheckOutcome]) -> u32 {
    outcomes.iter().map(|o| o.points).sum()
}

/// Expected ingress rule shapes, in crediting priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RuleShape {
    /// MySQL port open to everyone.
    DatabasePort,
    /// SSH port restricted to a declared source.
    AdminPort,
    /// ICMP open to everyone.
    Diagnostic,
}

const OPEN_TO_ALL: &str = "0.0.0.0/0";

impl RuleShape {
    pub const ALL: [RuleShape; 3] = [
        RuleShape::DatabasePort,
        RuleShape::AdminPort,
        RuleShape::Diagnostic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RuleShape::DatabasePort => "rule_database_port",
            RuleShape::AdminPort => "rule_admin_port",
            RuleShape::Diagnostic => "rule_diagnostic",
        }
    }

    pub fn matches(&self, rule: &Value) -> bool {
        let field = |key: &str| rule.get(key);
        let text = |key: &str| field(key).and_then(Value::as_str);
        let priority_one =
            || Predicate::equals(1).holds(field("priority").unwrap_or(&Value::Null));
        let open_to_all = || text("remote_ip_prefix") == Some(OPEN_TO_ALL);

        match self {
            RuleShape::DatabasePort => {
                text("ports") == Some("3306") && open_to_all() && priority_one()
            }
            RuleShape::AdminPort => {
                text("ports") == Some("22")
                    && text("remote_ip_prefix").is_some_and(|s| !s.is_empty())
                    && priority_one()
            }
            RuleShape::Diagnostic => {
                text("protocol") == Some("icmp") && open_to_all()
            }
        }
    }

    /// First shape `rule` satisfies, in priority order.
    pub fn classify(rule: &Value) -> Option<RuleShape> {
        RuleShape::ALL.into_iter().find(|shape| shape.matches(rule))
    }
}

/// Credit each expected rule shape found among the declared `rules`.
///
/// Shapes that were never found produce no outcome, so they add nothing
/// to the score rather than the usual failing points.
pub fn score_rules(slot: Slot, attrs: &AttributeSet) -> Vec<CheckOutcome> {
    let found: Vec<RuleShape> = attrs
        .lookup("/rules")
        .and_then(Value::as_array)
        .map(|rules| rules.iter().filter_map(RuleShape::classify).collect())
        .unwrap_or_default();

    RuleShape::ALL
        .into_iter()
        .filter(|shape| found.contains(shape))
        .map(|shape| CheckOutcome {
            slot,
            check: shape.label().to_string(),
            passed: true,
            points: PASS_POINTS,
        })
        .collect()
}
