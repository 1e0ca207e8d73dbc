use crate::TOOL_NAME;
use crate::report::model::{AuditReport, RankedRow};

pub const CSV_HEADER: [&str; 3] = ["name", "score", "time"];

/// Leaderboard as a comma-separated table with a `name,score,time` header.
pub fn render_csv(leaderboard: &[RankedRow]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push('\n');
    for row in leaderboard {
        let fields = [
            csv_field(&row.subject),
            row.score.to_string(),
            csv_field(row.time.as_str()),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn render_text(report: &AuditReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", TOOL_NAME, report.tool.version));
    out.push_str(&format!(
        "Graded: {}  Skipped: {}\n",
        report.subjects.len(),
        report.skipped.len()
    ));
    out.push_str("Leaderboard:\n");
    for r in &report.leaderboard {
        out.push_str(&format!(
            "  {:>3}. {} {} ({} + {}) at {}\n",
            r.rank, r.subject, r.score, r.base_score, r.bonus, r.time
        ));
    }
    if !report.skipped.is_empty() {
        out.push_str("Skipped:\n");
        for s in &report.skipped {
            out.push_str(&format!("  - {}: {}\n", s.subject, s.reason));
        }
    }
    out
}
