use std::fmt;
use std::str::FromStr;

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::error::MergeError;

/// Token separator for the seqID file. `space`, `tab`, and `comma` are
/// recognized names; any other non-empty string is taken literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter(String);

impl Delimiter {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self(" ".to_string())
    }
}

impl FromStr for Delimiter {
    type Err = MergeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = match value.to_lowercase().as_str() {
            "space" => " ".to_string(),
            "tab" => "\t".to_string(),
            "comma" | "," => ",".to_string(),
            _ => value.to_string(),
        };
        if normalized.is_empty() {
            return Err(MergeError::InvalidDelimiter(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

/// One line of the seqID file: the sample identifiers merged into one output
/// sample, in the order they were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierGroup {
    identifiers: Vec<String>,
}

impl IdentifierGroup {
    pub fn new(identifiers: Vec<String>) -> Self {
        Self { identifiers }
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Output naming stem, e.g. `S1-S2` for the line `S1 S2`.
    pub fn name(&self) -> String {
        self.identifiers.join("-")
    }
}

/// Which mate of a paired-end read set a file holds, recognized by a
/// naming marker in the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadRole {
    Forward,
    Reverse,
}

impl ReadRole {
    pub fn markers(self) -> [&'static str; 2] {
        match self {
            ReadRole::Forward => ["_R1_", "_1_"],
            ReadRole::Reverse => ["_R2_", "_2_"],
        }
    }

    pub fn matches(self, file_name: &str) -> bool {
        self.markers().iter().any(|marker| file_name.contains(marker))
    }

    /// Numeral used in the Illumina-style output name (`R1`/`R2`).
    pub fn mate_number(self) -> u8 {
        match self {
            ReadRole::Forward => 1,
            ReadRole::Reverse => 2,
        }
    }
}

impl fmt::Display for ReadRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadRole::Forward => write!(f, "forward"),
            ReadRole::Reverse => write!(f, "reverse"),
        }
    }
}

/// All on-disk sequence files matched by one identifier. Never empty.
#[derive(Debug, Clone)]
pub struct FileSet {
    pub identifier: String,
    pub files: Vec<Utf8PathBuf>,
}

/// One group resolved against the working directory. Created by the
/// resolver; the scheduler attaches the output locations before building
/// jobs, and the publisher reads them afterwards.
#[derive(Debug, Clone)]
pub struct MergeGroup {
    pub group: IdentifierGroup,
    pub file_sets: Vec<FileSet>,
    pub output_dir: Option<Utf8PathBuf>,
    pub forward_output: Option<Utf8PathBuf>,
    pub reverse_output: Option<Utf8PathBuf>,
}

impl MergeGroup {
    pub fn new(group: IdentifierGroup, file_sets: Vec<FileSet>) -> Self {
        Self {
            group,
            file_sets,
            output_dir: None,
            forward_output: None,
            reverse_output: None,
        }
    }

    pub fn name(&self) -> String {
        self.group.name()
    }
}

/// One concatenation task. Immutable once enqueued.
#[derive(Debug, Clone)]
pub struct MergeJob {
    pub group: String,
    pub role: ReadRole,
    pub inputs: Vec<Utf8PathBuf>,
    pub output: Utf8PathBuf,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn delimiter_names() {
        assert_eq!("space".parse::<Delimiter>().unwrap().as_str(), " ");
        assert_eq!("tab".parse::<Delimiter>().unwrap().as_str(), "\t");
        assert_eq!("comma".parse::<Delimiter>().unwrap().as_str(), ",");
        assert_eq!(",".parse::<Delimiter>().unwrap().as_str(), ",");
        assert_eq!(";".parse::<Delimiter>().unwrap().as_str(), ";");
    }

    #[test]
    fn delimiter_rejects_empty() {
        let err = "".parse::<Delimiter>().unwrap_err();
        assert_matches!(err, MergeError::InvalidDelimiter(_));
    }

    #[test]
    fn group_name_joins_identifiers() {
        let group = IdentifierGroup::new(vec!["S1".to_string(), "S2".to_string()]);
        assert_eq!(group.name(), "S1-S2");
    }

    #[test]
    fn read_role_markers() {
        assert!(ReadRole::Forward.matches("S1_R1_.fastq"));
        assert!(ReadRole::Forward.matches("S1_1_.fastq.gz"));
        assert!(!ReadRole::Forward.matches("S1_R2_.fastq"));
        assert!(ReadRole::Reverse.matches("S1_R2_.fastq"));
    }
}
