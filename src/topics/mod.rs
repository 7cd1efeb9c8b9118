// Topic loading — one unit of work per non-blank line of the topics file.
//
// A missing topics file is the only fatal input error: with nothing to
// process there's no batch to run.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors from reading the topics file.
#[derive(Debug, Error)]
pub enum TopicsError {
    #[error("Topics file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read topics file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Split file contents into topics: each line trimmed, blank lines dropped.
///
/// Duplicates are kept. Every non-blank line becomes its own job.
pub fn parse_topics(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read and parse the topics file at `path`.
pub fn load_topics(path: &Path) -> Result<Vec<String>, TopicsError> {
    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            TopicsError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            TopicsError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let topics = parse_topics(&contents);
    debug!(path = %path.display(), count = topics.len(), "Loaded topics");
    Ok(topics)
}
