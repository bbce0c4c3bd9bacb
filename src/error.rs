use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

use crate::domain::ReadRole;

#[derive(Debug, Error, Diagnostic)]
pub enum MergeError {
    #[error("invalid delimiter: {0:?}")]
    InvalidDelimiter(String),

    #[error("no seqID file with a .txt, .csv, or .tsv extension in {0}")]
    MissingIdentifierFile(Utf8PathBuf),

    #[error("found {count} candidate seqID files in {path}; keep exactly one or pass --id-file")]
    AmbiguousIdentifierFile { path: Utf8PathBuf, count: usize },

    #[error("failed to read seqID file at {0}")]
    IdentifierFileRead(Utf8PathBuf),

    #[error("working path does not exist: {0}")]
    MissingWorkingPath(Utf8PathBuf),

    #[error("publishing requires --destination")]
    MissingDestination,

    #[error("duplicate merge group: {0}")]
    DuplicateGroup(String),

    #[error("no sequence files matching seqID {0}")]
    UnmatchedIdentifier(String),

    #[error("no {role} read file for seqID {identifier}")]
    MissingMate { identifier: String, role: ReadRole },

    #[error("merge of {output} failed: {message}")]
    Concat { output: Utf8PathBuf, message: String },

    #[error("merge interrupted")]
    Interrupted,

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
