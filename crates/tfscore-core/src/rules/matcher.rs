//! Pattern matcher used by every rubric check.
//!
//! A predicate is plain data so the rubric can be inspected and serialized
//! alongside the scores it produced. Evaluation never fails: an absent or
//! mistyped attribute simply does not satisfy the predicate.

use serde::Serialize;
use serde_json::Value;

use crate::rules::catalog::{FAIL_POINTS, PASS_POINTS};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Value equals `expected`. Numbers compare by numeric value.
    Equals { expected: Value },

    /// Value is the string identifier produced by a dependency slot.
    /// A missing identifier never matches.
    Identifier { expected: Option<String> },

    /// String starts with `prefix` and ends with `suffix`.
    Affixed { prefix: String, suffix: String },

    /// String contains every marker and ends with `suffix`.
    Marked { markers: Vec<String>, suffix: String },

    /// At least one option holds. An empty list never holds.
    AnyOf { options: Vec<Predicate> },
}

impl Predicate {
    pub fn equals(expected: impl Into<Value>) -> Self {
        Predicate::Equals {
            expected: expected.into(),
        }
    }

    pub fn identifier(expected: Option<&str>) -> Self {
        Predicate::Identifier {
            expected: expected.map(str::to_string),
        }
    }

    pub fn affixed(prefix: &str, suffix: &str) -> Self {
        Predicate::Affixed {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    pub fn marked(markers: &[&str], suffix: &str) -> Self {
        Predicate::Marked {
            markers: markers.iter().map(|m| m.to_string()).collect(),
            suffix: suffix.to_string(),
        }
    }

    pub fn holds(&self, value: &Value) -> bool {
        match self {
            Predicate::Equals { expected } => values_equal(expected, value),
            Predicate::Identifier { expected } => match (expected, value.as_str()) {
                (Some(expected), Some(actual)) => expected == actual,
                _ => false,
            },
            Predicate::Affixed { prefix, suffix } => value
                .as_str()
                .is_some_and(|s| s.starts_with(prefix.as_str()) && s.ends_with(suffix.as_str())),
            Predicate::Marked { markers, suffix } => value.as_str().is_some_and(|s| {
                markers.iter().all(|m| s.contains(m.as_str())) && s.ends_with(suffix.as_str())
            }),
            Predicate::AnyOf { options } => options.iter().any(|p| p.holds(value)),
        }
    }
}

fn values_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => expected == actual,
    }
}

/// Result of matching one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub passed: bool,
    pub points: u32,
}

impl Outcome {
    pub fn from_passed(passed: bool) -> Self {
        Self {
            passed,
            points: if passed { PASS_POINTS } else { FAIL_POINTS },
        }
    }
}

/// Match `value` against `predicate`. Absent values fail.
pub fn evaluate(value: Option<&Value>, predicate: &Predicate) -> Outcome {
    Outcome::from_passed(value.is_some_and(|v| predicate.holds(v)))
}
