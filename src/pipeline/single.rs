// Single-prompt mode: send one prompt verbatim and save the raw reply.
//
// No HTML wrapping and no cleaning. Whatever the model says is written to
// the output file, provided it said anything at all.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::inference::traits::TextGenerator;
use crate::output::error_chain;
use crate::output::files::write_output;

/// Default file for single-prompt output.
pub const DEFAULT_OUTPUT_FILE: &str = "ollama_output.txt";

/// Read one line of prompt text, dropping only the line terminator.
///
/// The text is otherwise passed through untouched: surrounding whitespace is
/// kept and an empty line yields an empty prompt.
pub fn read_prompt<R: BufRead>(mut reader: R) -> io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

/// Run one prompt and write the reply to `output_path`.
///
/// Returns `Ok(None)` when the generator failed or returned an empty string;
/// the failure has already been logged. Only a failed write is an error.
pub async fn run(
    generator: &dyn TextGenerator,
    prompt: &str,
    model: &str,
    output_path: &Path,
) -> Result<Option<PathBuf>> {
    let output = match generator.generate(prompt, model).await {
        Ok(text) => text,
        Err(e) => {
            warn!(kind = e.kind(), error = %error_chain(&e), "Prompt failed");
            return Ok(None);
        }
    };

    if output.is_empty() {
        return Ok(None);
    }

    write_output(output_path, &output)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    Ok(Some(output_path.to_path_buf()))
}
