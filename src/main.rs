use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use whatis::config::{Config, SINGLE_PROMPT_TIMEOUT_SECS};
use whatis::inference::ollama::OllamaClient;
use whatis::inference::traits::TextGenerator;

/// whatis: generate "What is ...?" explainer pages with a local LLM.
///
/// Reads topics from a file, asks an Ollama server for one self-contained
/// HTML page per topic, and saves each page to disk.
#[derive(Parser)]
#[command(name = "whatis", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one page per topic in the topics file
    Batch {
        /// Topics file, one topic per line (default: topics.txt)
        #[arg(long)]
        topics: Option<PathBuf>,

        /// Directory for generated files (default: text-files)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Number of topics to generate in parallel (default: 4)
        #[arg(long)]
        workers: Option<usize>,

        /// Model to use (default: llama3.1:8b)
        #[arg(long)]
        model: Option<String>,
    },

    /// Send a single prompt and save the raw reply
    Prompt {
        /// Prompt text; read from stdin when omitted
        text: Option<String>,

        /// Where to write the reply
        #[arg(long, default_value = whatis::pipeline::single::DEFAULT_OUTPUT_FILE)]
        output: PathBuf,

        /// Model to use (default: llama3.1:8b)
        #[arg(long)]
        model: Option<String>,
    },

    /// Export generated files as JSON blog records
    Collect {
        /// Directory of generated files (default: text-files)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Export path (default: <dir>/blogs.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show configuration, topic count, generated files and server status
    Status,

    /// Serve generated pages over a read-only JSON API
    #[cfg(feature = "web")]
    Serve {
        /// Directory of generated files (default: text-files)
        #[arg(long, conflicts_with = "json")]
        dir: Option<PathBuf>,

        /// Serve records from a previous `collect` export instead
        #[arg(long)]
        json: Option<PathBuf>,

        /// Port to listen on
        #[arg(long, default_value_t = whatis::web::DEFAULT_PORT)]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("whatis=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Batch {
            topics,
            output_dir,
            workers,
            model,
        } => {
            let mut config = Config::load()?;
            if let Some(topics) = topics {
                config.topics_file = topics;
            }
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            if let Some(workers) = workers {
                config.workers = workers;
            }
            if let Some(model) = model {
                config.model = model;
            }
            config.validate()?;

            let topics = whatis::topics::load_topics(&config.topics_file)?;
            println!(
                "Loaded {} topics from {}",
                topics.len(),
                config.topics_file.display()
            );
            println!(
                "Generating with {} ({} concurrent)...",
                config.model, config.workers
            );

            let generator: Arc<dyn TextGenerator> =
                Arc::new(OllamaClient::new(&config.ollama_url, config.request_timeout)?);

            let report = whatis::pipeline::batch::run(generator, topics, &config, true).await;
            whatis::output::terminal::display_batch_summary(&report);
        }

        Commands::Prompt {
            text,
            output,
            model,
        } => {
            let config = Config::load()?;
            let model = model.unwrap_or(config.model);

            let prompt = match text {
                Some(text) => text,
                None => read_prompt_from_stdin()?,
            };

            let client = OllamaClient::new(
                &config.ollama_url,
                Duration::from_secs(SINGLE_PROMPT_TIMEOUT_SECS),
            )?;

            match whatis::pipeline::single::run(&client, &prompt, &model, &output).await? {
                Some(path) => println!(
                    "{} Output saved to '{}'.",
                    "[✓]".green(),
                    path.display()
                ),
                None => println!("{} No output received.", "[!]".red()),
            }
        }

        Commands::Collect { dir, out } => {
            let config = Config::load()?;
            let dir = dir.unwrap_or(config.output_dir);
            let out =
                out.unwrap_or_else(|| dir.join(whatis::pipeline::collect::DEFAULT_EXPORT_FILE));

            info!(dir = %dir.display(), "Collecting generated files");
            let (path, count) = whatis::pipeline::collect::export(&dir, &out)?;

            if count == 0 {
                println!("No .txt files found in {}", dir.display());
            }
            println!(
                "{}",
                format!("Exported {count} records to {}", path.display()).bold()
            );
        }

        Commands::Status => {
            let config = Config::load()?;
            let client = OllamaClient::new(&config.ollama_url, Duration::from_secs(5))?;
            whatis::status::show(&config, &client).await?;
        }

        #[cfg(feature = "web")]
        Commands::Serve {
            dir,
            json,
            port,
            bind,
        } => {
            let records = match json {
                Some(path) => whatis::pipeline::collect::load_export(&path)?,
                None => {
                    let config = Config::load()?;
                    let dir = dir.unwrap_or(config.output_dir);
                    whatis::pipeline::collect::collect_records(&dir)?
                }
            };
            println!("Serving {} blogs", records.len());

            let catalog = whatis::catalog::Catalog::new(records);
            whatis::web::run_server(catalog, port, &bind).await?;
        }
    }

    Ok(())
}

/// Prompt on stdout and read one line from stdin.
fn read_prompt_from_stdin() -> Result<String> {
    print!("Enter your prompt: ");
    io::stdout().flush().context("Failed to flush stdout")?;

    whatis::pipeline::single::read_prompt(io::stdin().lock())
        .context("Failed to read prompt from stdin")
}
