use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::cancel::CancelToken;
use crate::config::RunConfig;
use crate::error::MergeError;
use crate::pairing::{self, PairedReads};
use crate::scheduler::MergeScheduler;
use crate::worker::Concatenator;
use crate::{groups, publish, resolve};

/// Serializable account of one run, printed by `--json` mode.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub groups: Vec<GroupResult>,
    pub merged: usize,
    pub skipped: usize,
    pub published: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupResult {
    pub name: String,
    pub identifiers: Vec<String>,
    pub forward_output: String,
    pub reverse_output: String,
}

/// Orchestrates a full run: parse groups, resolve file sets, pair mates,
/// schedule the merges, then optionally publish. Resolution and pairing
/// both complete before any job is enqueued, so a bad identifier or an
/// incomplete pair aborts the run with nothing written.
pub struct App<C: Concatenator + 'static> {
    config: RunConfig,
    concatenator: Arc<C>,
    cancel: CancelToken,
}

impl<C: Concatenator + 'static> App<C> {
    pub fn new(config: RunConfig, concatenator: C, cancel: CancelToken) -> Self {
        Self {
            config,
            concatenator: Arc::new(concatenator),
            cancel,
        }
    }

    pub fn run(&self) -> Result<RunResult, MergeError> {
        let identifier_groups =
            groups::read_groups(&self.config.identifier_file, &self.config.delimiter)?;
        info!(
            groups = identifier_groups.len(),
            id_file = %self.config.identifier_file,
            "parsed seqID groups"
        );

        let mut merge_groups = resolve::resolve_groups(&self.config.working_dir, &identifier_groups)?;
        let pairs: Vec<PairedReads> = merge_groups
            .iter()
            .map(pairing::select_pairs)
            .collect::<Result<_, _>>()?;

        let scheduler = MergeScheduler::new(
            Arc::clone(&self.concatenator),
            self.cancel.clone(),
            self.config.workers,
        );
        let summary = scheduler.run(&self.config.working_dir, &mut merge_groups, &pairs)?;

        let published = match &self.config.publish {
            Some(options) => {
                publish::publish(options, &merge_groups)?;
                true
            }
            None => false,
        };

        let groups = merge_groups
            .iter()
            .map(|group| GroupResult {
                name: group.name(),
                identifiers: group.group.identifiers().to_vec(),
                forward_output: group
                    .forward_output
                    .as_ref()
                    .map(|path| path.to_string())
                    .unwrap_or_default(),
                reverse_output: group
                    .reverse_output
                    .as_ref()
                    .map(|path| path.to_string())
                    .unwrap_or_default(),
            })
            .collect();

        Ok(RunResult {
            groups,
            merged: summary.merged,
            skipped: summary.skipped,
            published,
        })
    }
}
