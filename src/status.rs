// System status display — shows config, topic count, generated files, server reachability.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::inference::ollama::OllamaClient;
use crate::topics::{load_topics, TopicsError};

/// Display system status to the terminal.
pub async fn show(config: &Config, client: &OllamaClient) -> Result<()> {
    println!("Server: {}", config.ollama_url);
    println!("Model: {}", config.model);
    println!(
        "Workers: {} (timeout {}s)",
        config.workers,
        config.request_timeout.as_secs()
    );

    match load_topics(&config.topics_file) {
        Ok(topics) => println!(
            "Topics: {} in {}",
            topics.len(),
            config.topics_file.display()
        ),
        Err(TopicsError::Missing { path }) => {
            println!("Topics: {} not found", path.display());
            println!("  Create it with one topic per line");
        }
        Err(e) => return Err(e.into()),
    }

    match output_stats(&config.output_dir)? {
        Some((count, bytes)) => println!(
            "Generated files: {} in {} ({})",
            count,
            config.output_dir.display(),
            format_bytes(bytes)
        ),
        None => println!(
            "Generated files: none yet ({} doesn't exist)",
            config.output_dir.display()
        ),
    }

    match client.list_models().await {
        Ok(models) => {
            println!("Ollama: {}", "reachable".green());
            if models.iter().any(|m| m == &config.model) {
                println!("  Model {} is installed", config.model);
            } else {
                println!(
                    "  {} model {} not installed (have: {})",
                    "Warning:".yellow(),
                    config.model,
                    if models.is_empty() {
                        "none".to_string()
                    } else {
                        models.join(", ")
                    }
                );
                println!("  Run `ollama pull {}`", config.model);
            }
        }
        Err(e) => {
            println!("Ollama: {} ({e:#})", "unreachable".red());
            println!("  Start it with `ollama serve`");
        }
    }

    Ok(())
}

/// Count `.txt` files in `dir` and their total size. `None` if `dir` is absent.
fn output_stats(dir: &Path) -> Result<Option<(usize, u64)>> {
    if !dir.exists() {
        return Ok(None);
    }

    let mut count = 0;
    let mut bytes = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("txt") {
            count += 1;
            bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }
    Ok(Some((count, bytes)))
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
