use camino::Utf8PathBuf;

use crate::domain::{MergeGroup, ReadRole};
use crate::error::MergeError;

/// The merge input lists for one group: exactly one forward and one reverse
/// file per identifier, in group order. This order is load-bearing for the
/// merged output and must never be reordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedReads {
    pub forward: Vec<Utf8PathBuf>,
    pub reverse: Vec<Utf8PathBuf>,
}

/// Deterministic mate selection: each identifier's files are sorted
/// lexicographically and the first file carrying the role marker wins.
/// A role with no candidate for any identifier is fatal.
pub fn select_pairs(group: &MergeGroup) -> Result<PairedReads, MergeError> {
    let mut forward = Vec::with_capacity(group.file_sets.len());
    let mut reverse = Vec::with_capacity(group.file_sets.len());

    for set in &group.file_sets {
        let mut files = set.files.clone();
        files.sort();
        forward.push(pick(&files, &set.identifier, ReadRole::Forward)?);
        reverse.push(pick(&files, &set.identifier, ReadRole::Reverse)?);
    }

    Ok(PairedReads { forward, reverse })
}

fn pick(
    files: &[Utf8PathBuf],
    identifier: &str,
    role: ReadRole,
) -> Result<Utf8PathBuf, MergeError> {
    files
        .iter()
        .find(|path| {
            path.file_name()
                .map(|name| role.matches(name))
                .unwrap_or(false)
        })
        .cloned()
        .ok_or_else(|| MergeError::MissingMate {
            identifier: identifier.to_string(),
            role,
        })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use crate::domain::{FileSet, IdentifierGroup};

    use super::*;

    fn group_with(identifier: &str, files: &[&str]) -> MergeGroup {
        MergeGroup::new(
            IdentifierGroup::new(vec![identifier.to_string()]),
            vec![FileSet {
                identifier: identifier.to_string(),
                files: files.iter().map(Utf8PathBuf::from).collect(),
            }],
        )
    }

    #[test]
    fn first_sorted_match_wins() {
        let group = group_with("S1", &["S1_b_R1_.fastq", "S1_a_R1_.fastq", "S1_R2_.fastq"]);
        let pairs = select_pairs(&group).unwrap();
        assert_eq!(pairs.forward, [Utf8PathBuf::from("S1_a_R1_.fastq")]);
        assert_eq!(pairs.reverse, [Utf8PathBuf::from("S1_R2_.fastq")]);
    }

    #[test]
    fn underscore_digit_markers_recognized() {
        let group = group_with("S1", &["S1_1_.fastq.gz", "S1_2_.fastq.gz"]);
        let pairs = select_pairs(&group).unwrap();
        assert_eq!(pairs.forward, [Utf8PathBuf::from("S1_1_.fastq.gz")]);
        assert_eq!(pairs.reverse, [Utf8PathBuf::from("S1_2_.fastq.gz")]);
    }

    #[test]
    fn missing_reverse_is_fatal() {
        let group = group_with("S1", &["S1_a_R1_.fastq", "S1_b_R1_.fastq"]);
        let err = select_pairs(&group).unwrap_err();
        assert_matches!(
            err,
            MergeError::MissingMate {
                role: ReadRole::Reverse,
                ..
            }
        );
    }

    #[test]
    fn selection_is_stable() {
        let group = group_with("S1", &["S1_R1_.fastq", "S1_R2_.fastq"]);
        let first = select_pairs(&group).unwrap();
        let second = select_pairs(&group).unwrap();
        assert_eq!(first, second);
    }
}
