use serde::{Deserialize, Serialize};

/// State file looked up inside every subject directory.
pub const DEFAULT_STATE_FILE: &str = "terraform.tfstate";

/// What to do when a rubric slot has no declared resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSlotPolicy {
    /// Fail the subject with an incomplete-snapshot error.
    #[default]
    Reject,
    /// Grade the slot against an empty attribute set and continue.
    ScoreAsFailing,
}

/// Positional bonus handed to the leaders after ranking.
///
/// The first row receives `budget`, each following row `step` less, until
/// the budget is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusSchedule {
    pub budget: u32,
    pub step: u32,
}

impl Default for BonusSchedule {
    fn default() -> Self {
        Self { budget: 70, step: 7 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeConfig {
    pub missing_slot: MissingSlotPolicy,
    pub bonus: BonusSchedule,
    pub state_file: String,
}

impl Default for GradeConfig {
    fn default() -> Self {
        Self {
            missing_slot: MissingSlotPolicy::default(),
            bonus: BonusSchedule::default(),
            state_file: DEFAULT_STATE_FILE.to_string(),
        }
    }
}
