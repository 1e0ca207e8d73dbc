pub mod audit;
pub mod config;
pub mod error;
pub mod grade;
pub mod report;
pub mod rules;
pub mod snapshot;
pub mod util;

use std::path::Path;

use anyhow::Result;

use crate::config::GradeConfig;
use crate::report::model::{AuditReport, ToolInfo};

pub const TOOL_NAME: &str = "tfscore";

/// JSON schema version of audit reports.
/// Bump only when the report shape changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Grade every subject under `dir` and rank the results.
pub fn run(dir: &Path, tool: ToolInfo, config: &GradeConfig) -> Result<AuditReport> {
    let audit = audit::audit_directory(dir, config)?;
    Ok(AuditReport::new(
        tool,
        audit.graded,
        audit.skipped,
        config.bonus,
    ))
}
