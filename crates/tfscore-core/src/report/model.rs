use serde::{Deserialize, Serialize};

use crate::SCHEMA_VERSION;
use crate::config::BonusSchedule;
use crate::grade::{Grade, Timestamp};
use crate::util::deterministic;

/// Top-level audit report.
///
/// Stable JSON contract of a whole run: the ranked leaderboard, the per
/// subject breakdown in discovery order, and every subject that was skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub schema_version: String,
    pub tool: ToolInfo,
    pub leaderboard: Vec<RankedRow>,
    pub subjects: Vec<SubjectReport>,
    pub skipped: Vec<SkippedSubject>,
}

impl AuditReport {
    /// Assemble a report, ranking the graded subjects.
    ///
    /// `subjects` must be in discovery order; it is the tie-break of last
    /// resort for the leaderboard.
    pub fn new(
        tool: ToolInfo,
        subjects: Vec<SubjectReport>,
        skipped: Vec<SkippedSubject>,
        bonus: BonusSchedule,
    ) -> Self {
        let rows = subjects.iter().map(|s| ResultRow::from(&s.grade)).collect();
        let leaderboard = deterministic::rank(rows, bonus);

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            leaderboard,
            subjects,
            skipped,
        }
    }
}

/// Tool metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Identity of the state file a grade was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub path: Option<String>,
    pub size_bytes: u64,
    pub hash: SnapshotHash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotHash {
    pub algorithm: String,
    pub value: String,
}

/// Grade of one subject plus the snapshot it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectReport {
    pub snapshot: SnapshotInfo,
    pub grade: Grade,
}

/// Subject left out of the leaderboard, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSubject {
    pub subject: String,
    pub reason: String,
}

/// Pre-ranking result of one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub subject: String,
    pub score: u32,
    pub time: Timestamp,
}

impl From<&Grade> for ResultRow {
    fn from(grade: &Grade) -> Self {
        Self {
            subject: grade.subject.clone(),
            score: grade.score,
            time: grade.time.clone(),
        }
    }
}

/// Leaderboard entry. `score` is `base_score + bonus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedRow {
    /// 1-based position.
    pub rank: usize,
    pub subject: String,
    pub base_score: u32,
    pub bonus: u32,
    pub score: u32,
    pub time: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(name: &str, score: u32, time: &str) -> SubjectReport {
        SubjectReport {
            snapshot: SnapshotInfo {
                path: None,
                size_bytes: 0,
                hash: SnapshotHash {
                    algorithm: "sha256".into(),
                    value: "abc".into(),
                },
            },
            grade: Grade {
                subject: name.into(),
                score,
                time: Timestamp::new(time),
                outcomes: vec![],
            },
        }
    }

    fn tool() -> ToolInfo {
        ToolInfo {
            name: "tfscore".into(),
            version: "0.1.0".into(),
        }
    }

    #[test]
    fn report_ranks_subjects_but_keeps_discovery_order() {
        let report = AuditReport::new(
            tool(),
            vec![subject("alice01", 200, "10:00:00"), subject("bob02", 300, "11:00:00")],
            vec![],
            BonusSchedule::default(),
        );

        let leaders: Vec<&str> = report.leaderboard.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(leaders, vec!["bob02", "alice01"]);

        let discovered: Vec<&str> = report
            .subjects
            .iter()
            .map(|s| s.grade.subject.as_str())
            .collect();
        assert_eq!(discovered, vec!["alice01", "bob02"]);

        assert_eq!(report.leaderboard[0].score, 370);
        assert_eq!(report.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn time_serializes_as_plain_string() {
        let row = ResultRow {
            subject: "s".into(),
            score: 1,
            time: Timestamp::new("10:00:00"),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["time"], "10:00:00");
    }
}
