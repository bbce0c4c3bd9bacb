use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;

use camino::{Utf8Path, Utf8PathBuf};
use crossbeam_channel::unbounded;
use tracing::{error, info};

use crate::cancel::CancelToken;
use crate::domain::{MergeGroup, MergeJob, ReadRole};
use crate::error::MergeError;
use crate::pairing::PairedReads;
use crate::worker::{self, Concatenator, JobOutcome, JobReport};

/// Upper bound on the pool when no explicit worker count is given; the
/// actual size never exceeds the number of enqueued jobs.
const DEFAULT_MAX_WORKERS: usize = 4;

/// Tally of a completed run, for logging and the JSON summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub merged: usize,
    pub skipped: usize,
}

/// Owns the job queue, the worker pool, and the cancellation token for one
/// run. All per-job state is built here and read-only afterwards; the
/// channels are the only shared mutable structure.
pub struct MergeScheduler<C: Concatenator + 'static> {
    concatenator: Arc<C>,
    cancel: CancelToken,
    workers: Option<usize>,
}

impl<C: Concatenator + 'static> MergeScheduler<C> {
    pub fn new(concatenator: Arc<C>, cancel: CancelToken, workers: Option<usize>) -> Self {
        Self {
            concatenator,
            cancel,
            workers,
        }
    }

    /// Builds two jobs per group (forward, reverse), dispatches them to the
    /// pool, and blocks until every job has been acknowledged. Output
    /// locations are attached to each group for the publisher.
    pub fn run(
        &self,
        base: &Utf8Path,
        groups: &mut [MergeGroup],
        pairs: &[PairedReads],
    ) -> Result<MergeSummary, MergeError> {
        let jobs = self.build_jobs(base, groups, pairs)?;
        let pool_size = self
            .workers
            .unwrap_or(DEFAULT_MAX_WORKERS)
            .min(jobs.len())
            .max(1);

        let (job_tx, job_rx) = unbounded::<MergeJob>();
        let (report_tx, report_rx) = unbounded::<JobReport>();

        let mut handles = Vec::with_capacity(pool_size);
        for n in 0..pool_size {
            let queue = job_rx.clone();
            let acks = report_tx.clone();
            let concatenator = Arc::clone(&self.concatenator);
            let cancel = self.cancel.clone();
            let handle = thread::Builder::new()
                .name(format!("merge-worker-{n}"))
                .spawn(move || worker::run_loop(queue, acks, concatenator.as_ref(), &cancel))
                .map_err(|err| MergeError::Filesystem(err.to_string()))?;
            handles.push(handle);
        }
        drop(job_rx);
        drop(report_tx);

        info!(jobs = jobs.len(), workers = pool_size, "dispatching merge jobs");
        for job in jobs {
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);

        let mut summary = MergeSummary::default();
        let mut first_failure: Option<MergeError> = None;
        for report in report_rx {
            match report.outcome {
                JobOutcome::Merged => {
                    info!(group = %report.group, role = %report.role, output = %report.output, "merged");
                    summary.merged += 1;
                }
                JobOutcome::Skipped => summary.skipped += 1,
                JobOutcome::Failed(message) => {
                    error!(group = %report.group, role = %report.role, %message, "merge failed");
                    if first_failure.is_none() {
                        first_failure = Some(MergeError::Concat {
                            output: report.output,
                            message,
                        });
                    }
                }
                JobOutcome::Interrupted | JobOutcome::Drained => {}
            }
        }

        for handle in handles {
            let _ = handle.join();
        }

        if self.cancel.is_cancelled() {
            return Err(MergeError::Interrupted);
        }
        if let Some(failure) = first_failure {
            return Err(failure);
        }
        Ok(summary)
    }

    /// Creates each group's output directory (idempotent) and derives the
    /// two output paths. Duplicate group names are rejected before any
    /// directory is created, so output paths stay unique across the run.
    fn build_jobs(
        &self,
        base: &Utf8Path,
        groups: &mut [MergeGroup],
        pairs: &[PairedReads],
    ) -> Result<Vec<MergeJob>, MergeError> {
        let mut seen = HashSet::new();
        for group in groups.iter() {
            if !seen.insert(group.name()) {
                return Err(MergeError::DuplicateGroup(group.name()));
            }
        }

        let mut jobs = Vec::with_capacity(groups.len() * 2);
        for (group, paired) in groups.iter_mut().zip(pairs) {
            let name = group.name();
            let dir = base.join(&name);
            fs::create_dir_all(dir.as_std_path())
                .map_err(|err| MergeError::Filesystem(err.to_string()))?;

            let extension = merged_extension(&paired.forward);
            let forward = dir.join(output_name(&name, ReadRole::Forward, &extension));
            let reverse = dir.join(output_name(&name, ReadRole::Reverse, &extension));

            jobs.push(MergeJob {
                group: name.clone(),
                role: ReadRole::Forward,
                inputs: paired.forward.clone(),
                output: forward.clone(),
            });
            jobs.push(MergeJob {
                group: name,
                role: ReadRole::Reverse,
                inputs: paired.reverse.clone(),
                output: reverse.clone(),
            });

            group.output_dir = Some(dir);
            group.forward_output = Some(forward);
            group.reverse_output = Some(reverse);
        }
        Ok(jobs)
    }
}

fn output_name(group: &str, role: ReadRole, extension: &str) -> String {
    format!("{group}_S1_L001_R{}_001.{extension}", role.mate_number())
}

/// The merged file keeps the inputs' extension so `.fastq.gz` inputs yield
/// a `.fastq.gz` output: everything after the first `.` of the first
/// forward input's file name.
fn merged_extension(forward: &[Utf8PathBuf]) -> String {
    forward
        .first()
        .and_then(|path| path.file_name())
        .and_then(|name| name.split_once('.'))
        .map(|(_, ext)| ext.to_string())
        .unwrap_or_else(|| "fastq".to_string())
}
