use std::fs;
use std::io;
use std::process::{Command, Stdio};

use camino::{Utf8Path, Utf8PathBuf};
use crossbeam_channel::{Receiver, Sender};
use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::domain::{MergeJob, ReadRole};
use crate::error::MergeError;

/// Seam for the concatenation command so the pipeline can be exercised
/// without spawning processes.
pub trait Concatenator: Send + Sync {
    /// Concatenates `inputs`, in listed order, into `output` as one
    /// sequential byte stream.
    fn concat(&self, inputs: &[Utf8PathBuf], output: &Utf8Path) -> Result<(), MergeError>;
}

/// Runs `cat` with stdout redirected into the output file. Stderr is
/// inherited for observability; the exit status is authoritative.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCat;

impl Concatenator for SystemCat {
    fn concat(&self, inputs: &[Utf8PathBuf], output: &Utf8Path) -> Result<(), MergeError> {
        let outfile = fs::File::create(output.as_std_path())
            .map_err(|err| concat_error(output, err))?;
        let status = Command::new("cat")
            .args(inputs.iter().map(|path| path.as_str()))
            .stdout(outfile)
            .stderr(Stdio::inherit())
            .status()
            .map_err(|err| concat_error(output, err))?;
        if !status.success() {
            return Err(MergeError::Concat {
                output: output.to_owned(),
                message: format!("cat exited with {status}"),
            });
        }
        Ok(())
    }
}

fn concat_error(output: &Utf8Path, err: io::Error) -> MergeError {
    MergeError::Concat {
        output: output.to_owned(),
        message: err.to_string(),
    }
}

/// What became of one dequeued job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Merged,
    Skipped,
    Failed(String),
    Interrupted,
    Drained,
}

/// Completion acknowledgement sent back to the scheduler for every
/// dequeued job, executed or not.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub group: String,
    pub role: ReadRole,
    pub output: Utf8PathBuf,
    pub outcome: JobOutcome,
}

/// Worker loop: dequeue until the channel closes, acknowledge every job.
/// Once cancellation is observed, remaining jobs are drained unexecuted.
pub fn run_loop(
    jobs: Receiver<MergeJob>,
    reports: Sender<JobReport>,
    concatenator: &dyn Concatenator,
    cancel: &CancelToken,
) {
    for job in jobs.iter() {
        let outcome = if cancel.is_cancelled() {
            JobOutcome::Drained
        } else {
            execute(&job, concatenator, cancel)
        };
        let report = JobReport {
            group: job.group,
            role: job.role,
            output: job.output,
            outcome,
        };
        if reports.send(report).is_err() {
            return;
        }
    }
}

/// Executes one job. An output that already exists as a regular file counts
/// as complete, so re-runs after a crash do no work.
fn execute(job: &MergeJob, concatenator: &dyn Concatenator, cancel: &CancelToken) -> JobOutcome {
    if job.output.as_std_path().is_file() {
        info!(group = %job.group, role = %job.role, "output present, skipping merge");
        return JobOutcome::Skipped;
    }

    info!(group = %job.group, role = %job.role, inputs = job.inputs.len(), "merging");
    match concatenator.concat(&job.inputs, &job.output) {
        Ok(()) => JobOutcome::Merged,
        Err(err) => {
            remove_partial(&job.output);
            if cancel.is_cancelled() {
                JobOutcome::Interrupted
            } else {
                JobOutcome::Failed(err.to_string())
            }
        }
    }
}

/// A half-written output must not survive to be mistaken for a merged file
/// by the next run's skip check. Removal is best-effort; a file that never
/// got created is not an error.
fn remove_partial(output: &Utf8Path) {
    match fs::remove_file(output.as_std_path()) {
        Ok(()) => warn!(%output, "removed partial output"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!(%output, %err, "could not remove partial output"),
    }
}
