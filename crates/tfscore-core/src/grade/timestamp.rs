use serde::{Deserialize, Serialize};

use crate::snapshot::model::AttributeSet;

/// Time-of-day portion (`HH:MM:SS`) of an ISO-8601 moment.
///
/// Ordering is lexicographic, which matches chronological order for
/// moments on the same day. The empty timestamp sorts first.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Wrap an already extracted `HH:MM:SS` value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Characters 11..19 of an ISO-8601 string. Shorter inputs yield
    /// whatever part of that window exists.
    pub fn from_iso(raw: &str) -> Self {
        Self(raw.chars().skip(11).take(8).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields carrying a resource's creation/update moment, most specific first.
pub const UPDATED_OR_CREATED: &[&str] = &["/updated_at", "/created_at"];

/// Relational database instances only expose `created`.
pub const CREATED: &[&str] = &["/created"];

/// First non-empty moment among `fields`.
pub fn representative(attrs: &AttributeSet, fields: &[&str]) -> Option<Timestamp> {
    fields
        .iter()
        .filter_map(|field| attrs.lookup_str(field))
        .find(|raw| !raw.is_empty())
        .map(Timestamp::from_iso)
}
