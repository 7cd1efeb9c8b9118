// Collect generated files into blog records.
//
// Every `.txt` file in the output directory becomes one record: the file
// stem is the title, the trimmed contents are the body, and the file's
// modification time is the creation date. The records are exported as a
// JSON array, which `whatis serve` can load back.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default export file name, written inside the output directory.
pub const DEFAULT_EXPORT_FILE: &str = "blogs.json";

/// One generated page, ready for publishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogRecord {
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Read every `.txt` file in `dir` into a record, sorted by title.
///
/// Non-`.txt` entries and subdirectories are skipped.
pub fn collect_records(dir: &Path) -> Result<Vec<BlogRecord>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read output directory {}", dir.display()))?;

    let now = Utc::now();
    let mut records = Vec::new();

    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let Some(title) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let created_at = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or(now);

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        debug!(file = %path.display(), "Read generated file");

        records.push(BlogRecord {
            title: title.to_string(),
            content: content.trim().to_string(),
            created_at,
        });
    }

    records.sort_by(|a, b| a.title.cmp(&b.title));
    info!(count = records.len(), dir = %dir.display(), "Collected records");
    Ok(records)
}

/// Collect `dir` and write the records as pretty JSON to `export_path`.
pub fn export(dir: &Path, export_path: &Path) -> Result<(PathBuf, usize)> {
    let records = collect_records(dir)?;
    let json = serde_json::to_string_pretty(&records).context("Failed to serialize records")?;
    std::fs::write(export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;
    Ok((export_path.to_path_buf(), records.len()))
}

/// Load records previously written by [`export`].
pub fn load_export(path: &Path) -> Result<Vec<BlogRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
