use std::fs::{self, OpenOptions};
use std::io::Write;

use camino::Utf8Path;
use tracing::info;

use crate::config::PublishOptions;
use crate::domain::MergeGroup;
use crate::error::MergeError;

const SAMPLE_SHEET: &str = "SampleSheet.csv";
const SAMPLE_SHEET_HEADER: &str = "[Data]\n\
Sample_ID,Sample_Name,I7_Index_ID,index,I5_Index_ID,index2,Sample_Project,Description\n";

/// Hands completed groups to the downstream processing directory: creates
/// the destination, appends manifest rows, and links each merged output in.
pub fn publish(options: &PublishOptions, groups: &[MergeGroup]) -> Result<(), MergeError> {
    let destination = options.destination.join(&options.folder);
    fs::create_dir_all(destination.as_std_path())
        .map_err(|err| MergeError::Filesystem(err.to_string()))?;

    if options.sample_sheet {
        append_sample_sheet(&destination, groups)?;
    }

    for group in groups {
        for output in [&group.forward_output, &group.reverse_output] {
            let source = output.as_ref().ok_or_else(|| {
                MergeError::Filesystem(format!("group {} was never scheduled", group.name()))
            })?;
            link_into(source, &destination)?;
        }
    }

    info!(%destination, groups = groups.len(), "published merged outputs");
    Ok(())
}

/// One manifest row per group. The sheet is append-only: the header is
/// written when the file is first created and an existing sheet is never
/// overwritten.
fn append_sample_sheet(destination: &Utf8Path, groups: &[MergeGroup]) -> Result<(), MergeError> {
    let path = destination.join(SAMPLE_SHEET);
    let existed = path.as_std_path().is_file();
    let mut sheet = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_std_path())
        .map_err(|err| MergeError::Filesystem(err.to_string()))?;
    if !existed {
        sheet
            .write_all(SAMPLE_SHEET_HEADER.as_bytes())
            .map_err(|err| MergeError::Filesystem(err.to_string()))?;
    }
    for group in groups {
        let name = group.name();
        writeln!(sheet, "{name},{name},,,,,,")
            .map_err(|err| MergeError::Filesystem(err.to_string()))?;
    }
    Ok(())
}

/// Links a merged output into the destination. An existing link is left
/// alone so re-publishing is idempotent.
fn link_into(source: &Utf8Path, destination: &Utf8Path) -> Result<(), MergeError> {
    let file_name = source
        .file_name()
        .ok_or_else(|| MergeError::Filesystem(format!("invalid output path {source}")))?;
    let target = destination.join(file_name);
    if target.as_std_path().exists() {
        return Ok(());
    }
    make_link(source, &target).map_err(|err| MergeError::Filesystem(err.to_string()))
}

#[cfg(unix)]
fn make_link(source: &Utf8Path, target: &Utf8Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source.as_std_path(), target.as_std_path())
}

#[cfg(not(unix))]
fn make_link(source: &Utf8Path, target: &Utf8Path) -> std::io::Result<()> {
    fs::copy(source.as_std_path(), target.as_std_path()).map(|_| ())
}
