//! Batch audit over a directory of subjects.
//!
//! Every immediate subdirectory is one subject, named after the directory,
//! holding one state file. A subject that cannot be graded is logged and
//! skipped; it never aborts the run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::{GradeConfig, MissingSlotPolicy};
use crate::grade::grade;
use crate::report::model::{SkippedSubject, SubjectReport};
use crate::snapshot::read::read_snapshot;

/// Outcome of auditing a directory, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Audit {
    pub graded: Vec<SubjectReport>,
    pub skipped: Vec<SkippedSubject>,
}

/// Subject directories under `dir`, sorted by name.
pub fn discover_subjects(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }

    let mut subjects = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        subjects.push((name, entry.into_path()));
    }
    Ok(subjects)
}

/// Read and grade one subject's state file.
pub fn grade_subject(
    subject: &str,
    state_path: &Path,
    policy: MissingSlotPolicy,
) -> Result<SubjectReport> {
    let (snapshot, info) = read_snapshot(state_path)?.into_parts();
    let grade = grade(&snapshot, subject, policy)
        .with_context(|| format!("failed to grade {}", state_path.display()))?;
    Ok(SubjectReport {
        snapshot: info,
        grade,
    })
}

pub fn audit_directory(dir: &Path, config: &GradeConfig) -> Result<Audit> {
    let mut audit = Audit::default();

    for (subject, subject_dir) in discover_subjects(dir)? {
        let state_path = subject_dir.join(&config.state_file);
        if !state_path.is_file() {
            warn!(%subject, dir = %subject_dir.display(), "{} not found", config.state_file);
            audit.skipped.push(SkippedSubject {
                subject,
                reason: format!("{} not found", config.state_file),
            });
            continue;
        }

        match grade_subject(&subject, &state_path, config.missing_slot) {
            Ok(report) => audit.graded.push(report),
            Err(e) => {
                let reason = format!("{e:#}");
                warn!(%subject, %reason, "skipping subject");
                audit.skipped.push(SkippedSubject { subject, reason });
            }
        }
    }

    info!(
        graded = audit.graded.len(),
        skipped = audit.skipped.len(),
        "audit finished"
    );
    Ok(audit)
}
