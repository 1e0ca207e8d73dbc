use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::{fs, path::Path};

use crate::report::model::{SnapshotHash, SnapshotInfo};
use crate::snapshot::model::Snapshot;

/// A parsed snapshot together with the identity of the file it came from.
#[derive(Debug, Clone)]
pub struct SnapshotContext {
    /// Optional source path (informational only).
    pub path: Option<String>,

    pub snapshot: Snapshot,

    /// Size of the state file in bytes.
    pub size_bytes: u64,

    pub hash_alg: String,

    /// Hex-encoded hash of the state file bytes.
    pub hash_hex: String,
}

impl SnapshotContext {
    /// Split into the parsed snapshot and its report-facing metadata.
    pub fn into_parts(self) -> (Snapshot, SnapshotInfo) {
        let info = SnapshotInfo {
            path: self.path,
            size_bytes: self.size_bytes,
            hash: SnapshotHash {
                algorithm: self.hash_alg,
                value: self.hash_hex,
            },
        };
        (self.snapshot, info)
    }
}

/// Read a state file, fingerprint its bytes and parse it.
///
/// The fingerprint depends only on the file bytes, so two subjects that
/// submitted the same state file can be spotted in the report.
pub fn read_snapshot(path: &Path) -> Result<SnapshotContext> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read snapshot: {}", path.display()))?;

    let snapshot = parse_snapshot(&bytes)
        .with_context(|| format!("failed to parse snapshot: {}", path.display()))?;

    let digest = Sha256::digest(&bytes);

    Ok(SnapshotContext {
        path: Some(path.display().to_string()),
        snapshot,
        size_bytes: bytes.len() as u64,
        hash_alg: "sha256".to_string(),
        hash_hex: hex::encode(digest),
    })
}

/// Parse state document bytes into a [`Snapshot`].
pub fn parse_snapshot(bytes: &[u8]) -> Result<Snapshot> {
    Ok(serde_json::from_slice(bytes)?)
}
