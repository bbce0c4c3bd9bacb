use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::{FileSet, IdentifierGroup, MergeGroup};
use crate::error::MergeError;

/// Token that marks a directory entry as a sequence file.
const SEQUENCE_MARKER: &str = "fastq";

/// Maps every identifier of every group to its on-disk file set. Read-only;
/// an identifier with zero matches aborts the run before any merge work.
pub fn resolve_groups(
    working_dir: &Utf8Path,
    groups: &[IdentifierGroup],
) -> Result<Vec<MergeGroup>, MergeError> {
    let entries = list_sequence_files(working_dir)?;

    groups
        .iter()
        .map(|group| {
            let file_sets = group
                .identifiers()
                .iter()
                .map(|identifier| {
                    let files: Vec<Utf8PathBuf> = entries
                        .iter()
                        .filter(|path| {
                            path.file_name()
                                .map(|name| name.contains(identifier.as_str()))
                                .unwrap_or(false)
                        })
                        .cloned()
                        .collect();
                    if files.is_empty() {
                        return Err(MergeError::UnmatchedIdentifier(identifier.clone()));
                    }
                    Ok(FileSet {
                        identifier: identifier.clone(),
                        files,
                    })
                })
                .collect::<Result<Vec<_>, MergeError>>()?;
            Ok(MergeGroup::new(group.clone(), file_sets))
        })
        .collect()
}

/// Flat scan of the working path, sorted so downstream selection is
/// deterministic regardless of directory iteration order.
fn list_sequence_files(working_dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, MergeError> {
    let mut files = Vec::new();
    let entries = fs::read_dir(working_dir.as_std_path())
        .map_err(|err| MergeError::Filesystem(err.to_string()))?;
    for entry in entries {
        let entry = entry.map_err(|err| MergeError::Filesystem(err.to_string()))?;
        let path = match Utf8PathBuf::from_path_buf(entry.path()) {
            Ok(path) => path,
            Err(_) => continue,
        };
        let is_sequence = path.as_std_path().is_file()
            && path
                .file_name()
                .map(|name| name.contains(SEQUENCE_MARKER))
                .unwrap_or(false);
        if is_sequence {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
