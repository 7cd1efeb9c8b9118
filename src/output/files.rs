// Persistence — one text file per topic, named after the topic.
//
// Filenames are "What is <topic>.txt" with characters that Windows and most
// shells choke on stripped out. Files from earlier runs are overwritten.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Characters removed from topics before they become filenames.
pub const FORBIDDEN_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

pub const FILE_PREFIX: &str = "What is ";
pub const FILE_SUFFIX: &str = ".txt";

/// Stem used when a topic has nothing left after sanitizing.
pub const EMPTY_STEM: &str = "untitled";

/// Strip forbidden characters from a topic and trim the result.
///
/// May return an empty string (e.g. for "???"); see [`file_stem`].
pub fn sanitize_filename(topic: &str) -> String {
    topic
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// The filename stem for a topic: sanitized, or [`EMPTY_STEM`] if that
/// leaves nothing.
pub fn file_stem(topic: &str) -> String {
    let sanitized = sanitize_filename(topic);
    if sanitized.is_empty() {
        EMPTY_STEM.to_string()
    } else {
        sanitized
    }
}

/// Full filename (prefix + stem + suffix) for a topic.
pub fn file_name(topic: &str) -> String {
    format!("{FILE_PREFIX}{}{FILE_SUFFIX}", file_stem(topic))
}

/// Assign an output path to every topic in a batch, in submission order.
///
/// Topics that sanitize to the same name are disambiguated: the first keeps
/// the plain name, later ones get " (2)", " (3)", ... appended to the stem.
/// Comparison is case-insensitive so the result is safe on case-folding
/// filesystems.
pub fn plan_paths(topics: &[String], dir: &Path) -> Vec<PathBuf> {
    let mut taken: HashSet<String> = HashSet::new();

    topics
        .iter()
        .map(|topic| {
            let stem = file_stem(topic);
            let mut name = format!("{FILE_PREFIX}{stem}{FILE_SUFFIX}");
            let mut n = 1;
            while !taken.insert(name.to_lowercase()) {
                n += 1;
                name = format!("{FILE_PREFIX}{stem} ({n}){FILE_SUFFIX}");
            }
            dir.join(name)
        })
        .collect()
}

/// Write `content` to `path`, creating the parent directory first.
pub fn write_output(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    debug!(path = %path.display(), bytes = content.len(), "Wrote output file");
    Ok(())
}

/// Save one topic's content under `dir` using its derived filename.
///
/// Returns the path written. Overwrites any existing file of that name.
pub fn save(topic: &str, content: &str, dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(file_name(topic));
    write_output(&path, content)?;
    Ok(path)
}
