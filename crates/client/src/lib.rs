//! Offline inspection of collectible save blobs.
//!
//! The blob is validated by loading it into a fresh
//! [`StateStore`](collectible_core::StateStore), so the report shows exactly
//! what a session would see after loading the same data.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use collectible_core::{
    ENTRY_TOKENS, Identity, ProgressionState, SAVE_FORMAT_VERSION, SEPARATOR, StateStore,
    StoreError,
};
use serde::Serialize;

/// One loaded entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub identity: Identity,
    pub state: ProgressionState,
}

/// Contents of a valid save blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlobReport {
    pub version: &'static str,
    /// Entries written in the blob.
    pub declared: usize,
    /// Entries the store kept, sorted by identity. Entries saved as
    /// `Uncollected` are not kept.
    pub entries: Vec<EntryView>,
}

impl BlobReport {
    pub fn collected(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.state == ProgressionState::Collected)
            .count()
    }

    /// Keeps only the entries of one container.
    pub fn retain_container(&mut self, container: &str) {
        self.entries
            .retain(|entry| entry.identity.container == container);
    }
}

/// Validates `blob` and lists its entries.
pub fn inspect(blob: &str) -> Result<BlobReport, StoreError> {
    let mut store = StateStore::new();
    store.load(Some(blob))?;

    let declared = if blob.is_empty() {
        0
    } else {
        blob.split(SEPARATOR).count().saturating_sub(1) / ENTRY_TOKENS
    };

    let mut entries: Vec<EntryView> = store
        .iter()
        .map(|(identity, state)| EntryView {
            identity: identity.clone(),
            state,
        })
        .collect();
    entries.sort_by(|a, b| a.identity.cmp(&b.identity));

    tracing::debug!(declared, kept = entries.len(), "Inspected save blob");

    Ok(BlobReport {
        version: SAVE_FORMAT_VERSION,
        declared,
        entries,
    })
}

/// Reads a blob from `path`, or from stdin when no path is given.
///
/// Trailing line breaks are stripped; save files written by text editors
/// often end with one.
pub fn read_blob(path: Option<&Path>) -> Result<String> {
    let mut blob = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read save blob: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read save blob from stdin")?;
            buf
        }
    };

    let trimmed = blob.trim_end_matches(['\r', '\n']).len();
    blob.truncate(trimmed);
    Ok(blob)
}

/// Human-readable summary grouped by container.
pub fn render_summary(report: &BlobReport) -> String {
    let mut lines = vec![
        format!("Format version: {}", report.version),
        format!(
            "Entries: {} kept of {} declared ({} collected)",
            report.entries.len(),
            report.declared,
            report.collected()
        ),
    ];

    let mut current: Option<&str> = None;
    for entry in &report.entries {
        let identity = &entry.identity;
        if current != Some(identity.container.as_str()) {
            lines.push(String::new());
            lines.push(format!("[{}]", identity.container));
            current = Some(identity.container.as_str());
        }
        lines.push(format!(
            "  {:<24} ({}, {})  {}",
            identity.local_name, identity.spawn.x, identity.spawn.y, entry.state
        ));
    }

    lines.push(String::new());
    lines.join("\n")
}

pub fn render_json(report: &BlobReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}
