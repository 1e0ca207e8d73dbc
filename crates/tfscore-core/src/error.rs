use thiserror::Error;

use crate::rules::catalog::Slot;

/// Failures raised while grading a single subject.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    #[error("incomplete snapshot: no resource fills the {slot} slot")]
    IncompleteSnapshot { slot: Slot },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_snapshot_names_the_slot() {
        let err = GradeError::IncompleteSnapshot {
            slot: Slot::RelationalDb,
        };
        assert_eq!(
            err.to_string(),
            "incomplete snapshot: no resource fills the relational_db slot"
        );
    }
}
