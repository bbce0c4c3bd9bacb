use std::fs;

use camino::Utf8Path;

use crate::domain::{Delimiter, IdentifierGroup};
use crate::error::MergeError;

/// Reads the seqID file into ordered identifier groups, one per non-empty
/// line. Line and group order determine output naming and pairing order.
pub fn read_groups(
    path: &Utf8Path,
    delimiter: &Delimiter,
) -> Result<Vec<IdentifierGroup>, MergeError> {
    let content = fs::read_to_string(path.as_std_path())
        .map_err(|_| MergeError::IdentifierFileRead(path.to_owned()))?;
    Ok(parse_groups(&content, delimiter))
}

/// Splits each line on the delimiter, trims whitespace artifacts from every
/// token, and discards empty tokens. Lines with no tokens left are skipped.
pub fn parse_groups(text: &str, delimiter: &Delimiter) -> Vec<IdentifierGroup> {
    text.lines()
        .filter_map(|line| {
            let identifiers: Vec<String> = line
                .split(delimiter.as_str())
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect();
            if identifiers.is_empty() {
                None
            } else {
                Some(IdentifierGroup::new(identifiers))
            }
        })
        .collect()
}
