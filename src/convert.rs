use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::discovery::{ExtensionFilter, find_matching_files};
use crate::error::{AviconvError, Result};
use crate::media::{MediaCommand, MediaCommandBuilder, Transcoder};
use crate::profile::Profile;

/// Per-file lifecycle: pending, running, then succeeded or failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Succeeded,
    Failed(String),
}

/// One input file and the AVI it becomes
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub state: JobState,
    pub elapsed: Option<Duration>,
}

impl ConversionJob {
    /// Destination is `output_dir/<stem>.avi`
    pub fn new(source_path: PathBuf, output_dir: &Path) -> Self {
        let stem = source_path
            .file_stem()
            .or_else(|| source_path.file_name())
            .map(|s| s.to_os_string())
            .unwrap_or_default();

        let mut file_name = stem;
        file_name.push(".avi");

        Self {
            destination_path: output_dir.join(file_name),
            source_path,
            state: JobState::Pending,
            elapsed: None,
        }
    }

    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Outcome of one converter run
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub started_at: DateTime<Local>,
    pub jobs: Vec<ConversionJob>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.jobs.iter().filter(|j| j.state == JobState::Succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.jobs
            .iter()
            .filter(|j| matches!(j.state, JobState::Failed(_)))
            .count()
    }
}

/// Sequential batch converter: one transcoder run per matching file, each
/// awaited before the next starts
pub struct BatchConverter {
    transcoder: Box<dyn Transcoder>,
    command_builder: MediaCommandBuilder,
    profile: Profile,
    filter: ExtensionFilter,
    dry_run: bool,
}

impl BatchConverter {
    pub fn new(
        transcoder: Box<dyn Transcoder>,
        command_builder: MediaCommandBuilder,
        profile: Profile,
        extensions: &[String],
    ) -> Self {
        Self {
            transcoder,
            command_builder,
            profile,
            filter: ExtensionFilter::case_insensitive(extensions),
            dry_run: false,
        }
    }

    /// Print commands instead of running them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// The ffmpeg invocation for `job` under the active profile
    pub fn command_for(&self, job: &ConversionJob) -> MediaCommand {
        self.command_builder
            .convert(&self.profile, &job.source_path, &job.destination_path)
    }

    /// Convert every matching file in `input_dir` into `output_dir`.
    ///
    /// A non-zero transcoder exit marks that job failed and the batch goes on.
    /// Anything else (unreadable directory, transcoder missing) aborts the run.
    /// The transcoder is only checked once there is something to convert.
    pub async fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchReport> {
        let started_at = Local::now();
        info!(
            "Converting {} -> {} with profile '{}'",
            input_dir.display(),
            output_dir.display(),
            self.profile.name
        );

        fs::create_dir_all(output_dir).await?;

        let files = find_matching_files(input_dir, &self.filter)?;
        if files.is_empty() {
            println!("No video files found in {}", input_dir.display());
            return Ok(BatchReport {
                started_at,
                jobs: Vec::new(),
            });
        }

        info!("Found {} video files to convert", files.len());

        if !self.dry_run {
            self.transcoder.check_availability().await?;
        }

        let mut jobs = Vec::with_capacity(files.len());
        for source in files {
            let mut job = ConversionJob::new(source, output_dir);
            self.process(&mut job).await?;
            jobs.push(job);
        }

        let report = BatchReport { started_at, jobs };
        println!("All conversions finished.");
        println!(
            "{} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );

        Ok(report)
    }

    async fn process(&self, job: &mut ConversionJob) -> Result<()> {
        let name = job.file_name();
        let command = self.command_for(job);

        println!("Converting {} to {}...", name, job.destination_path.display());

        if self.dry_run {
            println!("{}", command);
            return Ok(());
        }

        job.state = JobState::Running;
        let start = Instant::now();
        let result = self.transcoder.run(&command).await;
        job.elapsed = Some(start.elapsed());

        let output = result?;
        debug!("Transcoder exited with {:?} for {}", output.status, name);

        if output.success() {
            job.state = JobState::Succeeded;
            println!("Successfully converted {}", name);
        } else {
            let failure = AviconvError::TranscodeFailure {
                command: command.to_string(),
                status: output.status,
            };
            warn!("Failed to convert {}: {}", job.source_path.display(), failure);
            println!("Error converting {}: {}", name, failure);
            job.state = JobState::Failed(failure.to_string());
        }

        Ok(())
    }
}
