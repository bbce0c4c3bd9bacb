use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::Delimiter;
use crate::error::MergeError;

const IDENTIFIER_EXTENSIONS: [&str; 3] = ["txt", "csv", "tsv"];

/// Everything a run needs, resolved up front so the pipeline itself never
/// touches raw CLI values.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub working_dir: Utf8PathBuf,
    pub identifier_file: Utf8PathBuf,
    pub delimiter: Delimiter,
    pub workers: Option<usize>,
    pub publish: Option<PublishOptions>,
}

#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub destination: Utf8PathBuf,
    pub folder: String,
    pub sample_sheet: bool,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(
        working_dir: Utf8PathBuf,
        id_file: Option<&str>,
        delimiter: &str,
        workers: Option<usize>,
        publish: Option<PublishOptions>,
    ) -> Result<RunConfig, MergeError> {
        if !working_dir.as_std_path().is_dir() {
            return Err(MergeError::MissingWorkingPath(working_dir));
        }

        let delimiter: Delimiter = delimiter.parse()?;
        let identifier_file = match id_file {
            Some(value) => Self::locate_explicit(&working_dir, value)?,
            None => Self::discover(&working_dir)?,
        };

        Ok(RunConfig {
            working_dir,
            identifier_file,
            delimiter,
            workers,
            publish,
        })
    }

    /// A bare file name is taken relative to the working path; anything with
    /// a directory component is used as given.
    fn locate_explicit(working_dir: &Utf8Path, value: &str) -> Result<Utf8PathBuf, MergeError> {
        let path = if value.contains('/') {
            Utf8PathBuf::from(value)
        } else {
            working_dir.join(value)
        };
        if !path.as_std_path().is_file() {
            return Err(MergeError::IdentifierFileRead(path));
        }
        Ok(path)
    }

    /// Auto-discovery: exactly one file with a recognized extension in the
    /// working path. Zero or multiple candidates is fatal.
    fn discover(working_dir: &Utf8Path) -> Result<Utf8PathBuf, MergeError> {
        let mut candidates = Vec::new();
        let entries = fs::read_dir(working_dir.as_std_path())
            .map_err(|err| MergeError::Filesystem(err.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|err| MergeError::Filesystem(err.to_string()))?;
            let path = match Utf8PathBuf::from_path_buf(entry.path()) {
                Ok(path) => path,
                Err(_) => continue,
            };
            let is_candidate = path.as_std_path().is_file()
                && path
                    .extension()
                    .map(|ext| IDENTIFIER_EXTENSIONS.contains(&ext))
                    .unwrap_or(false);
            if is_candidate {
                candidates.push(path);
            }
        }
        candidates.sort();

        match candidates.len() {
            0 => Err(MergeError::MissingIdentifierFile(working_dir.to_owned())),
            1 => Ok(candidates.remove(0)),
            count => Err(MergeError::AmbiguousIdentifierFile {
                path: working_dir.to_owned(),
                count,
            }),
        }
    }
}
