// Batch pipeline: one generation job per topic, bounded concurrency.
//
// Each topic becomes a Job that builds its prompt, calls the generator,
// cleans the output and writes it to disk. Jobs run as tokio tasks pulled
// through `buffer_unordered`, so at most `workers` are in flight and
// outcomes arrive in completion order. A failed or panicking job is
// recorded and the rest keep going.

use std::any::Any;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{info, warn};

use crate::clean::clean;
use crate::config::Config;
use crate::inference::traits::{GenerateError, TextGenerator};
use crate::output::error_chain;
use crate::output::files::{plan_paths, write_output};
use crate::output::terminal;
use crate::prompt::build_prompt;

/// Lifecycle of a single job. No retries: Succeeded and Failed are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// Why a job ended in [`JobState::Failed`].
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// The server answered 200 with an empty completion.
    #[error("model returned no output")]
    EmptyOutput,

    #[error("failed to write {}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("job panicked: {0}")]
    Panicked(String),
}

impl JobError {
    /// Short machine-readable label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::Generate(e) => e.kind(),
            JobError::EmptyOutput => "empty_output",
            JobError::Save { .. } => "save",
            JobError::Panicked(_) => "panicked",
        }
    }
}

/// One topic's unit of work.
#[derive(Debug, Clone)]
pub struct Job {
    pub topic: String,
    /// Where the cleaned output goes if the job succeeds.
    pub path: PathBuf,
    pub state: JobState,
    /// The completion exactly as the server returned it.
    pub raw_output: Option<String>,
    /// The extracted page, once cleaning has run.
    pub cleaned_output: Option<String>,
}

impl Job {
    pub fn new(topic: String, path: PathBuf) -> Self {
        Self {
            topic,
            path,
            state: JobState::Pending,
            raw_output: None,
            cleaned_output: None,
        }
    }
}

/// Final result of a job, as harvested by the driver.
#[derive(Debug)]
pub struct JobOutcome {
    pub job: Job,
    /// The written path on success.
    pub result: Result<PathBuf, JobError>,
    pub elapsed: Duration,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything a batch run produced, in completion order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<JobOutcome>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }
}

/// Run the batch: one job per topic, at most `config.workers` at a time.
///
/// Never fails as a whole. Every topic ends up in the report as either a
/// written file or a recorded error. `show_progress` draws a progress bar
/// on stderr (hidden automatically when stderr isn't a terminal).
pub async fn run(
    generator: Arc<dyn TextGenerator>,
    topics: Vec<String>,
    config: &Config,
    show_progress: bool,
) -> BatchReport {
    let started = Instant::now();
    let workers = config.workers.max(1);

    if topics.is_empty() {
        info!("No topics to process");
        return BatchReport::default();
    }

    let paths = plan_paths(&topics, &config.output_dir);
    let jobs: Vec<Job> = topics
        .into_iter()
        .zip(paths)
        .map(|(topic, path)| Job::new(topic, path))
        .collect();

    info!(
        jobs = jobs.len(),
        workers = workers,
        model = %config.model,
        output_dir = %config.output_dir.display(),
        "Starting batch"
    );

    let pb = if show_progress {
        ProgressBar::new(jobs.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Generating [{bar:30}] {pos}/{len} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    // The closure runs lazily as buffer_unordered frees a slot, so a task is
    // only spawned once it's allowed to run.
    let mut outcomes = stream::iter(jobs.into_iter().map(|job| {
        let generator = Arc::clone(&generator);
        let model = config.model.clone();
        async move {
            let fallback = job.clone();
            let job_started = Instant::now();
            match tokio::spawn(run_job(generator, job, model)).await {
                Ok(outcome) => outcome,
                Err(e) => JobOutcome {
                    job: Job {
                        state: JobState::Failed,
                        ..fallback
                    },
                    result: Err(JobError::Panicked(join_error_message(e))),
                    elapsed: job_started.elapsed(),
                },
            }
        }
    }))
    .buffer_unordered(workers);

    let mut report = BatchReport::default();
    while let Some(outcome) = outcomes.next().await {
        match &outcome.result {
            Ok(path) => info!(
                topic = %outcome.job.topic,
                path = %path.display(),
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "Job succeeded"
            ),
            Err(e) => warn!(
                topic = %outcome.job.topic,
                kind = e.kind(),
                error = %error_chain(e),
                "Job failed"
            ),
        }
        pb.suspend(|| terminal::display_job_outcome(&outcome));
        pb.inc(1);
        report.outcomes.push(outcome);
    }
    pb.finish_and_clear();

    report.elapsed = started.elapsed();
    info!(
        succeeded = report.success_count(),
        failed = report.failure_count(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Batch complete"
    );
    report
}

/// Drive one job from Running to a final state.
async fn run_job(generator: Arc<dyn TextGenerator>, mut job: Job, model: String) -> JobOutcome {
    job.state = JobState::Running;
    let started = Instant::now();

    let result = execute(generator.as_ref(), &mut job, &model).await;

    job.state = if result.is_ok() {
        JobState::Succeeded
    } else {
        JobState::Failed
    };

    JobOutcome {
        job,
        result,
        elapsed: started.elapsed(),
    }
}

/// Generate, clean and save, recording each intermediate text on the job.
async fn execute(
    generator: &dyn TextGenerator,
    job: &mut Job,
    model: &str,
) -> Result<PathBuf, JobError> {
    let prompt = build_prompt(&job.topic);
    let raw = generator.generate(&prompt, model).await?;
    let raw = job.raw_output.insert(raw);

    // An empty completion is a protocol-level success but gives us nothing to save.
    if raw.is_empty() {
        return Err(JobError::EmptyOutput);
    }

    let cleaned = job.cleaned_output.insert(clean(raw));
    write_output(&job.path, cleaned).map_err(|source| JobError::Save {
        path: job.path.clone(),
        source,
    })?;

    Ok(job.path.clone())
}

fn join_error_message(e: JoinError) -> String {
    if e.is_panic() {
        panic_message(e.into_panic())
    } else {
        e.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
