use std::fs;

use assert_matches::assert_matches;
use camino::Utf8Path;

use seqmerge::domain::Delimiter;
use seqmerge::error::MergeError;
use seqmerge::groups;

#[test]
fn group_count_matches_nonempty_lines() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(temp.path()).unwrap();
    let id_file = root.join("ids.txt");
    fs::write(id_file.as_std_path(), "S1 S2\n\nS3\n").unwrap();

    let delimiter: Delimiter = "space".parse().unwrap();
    let parsed = groups::read_groups(&id_file, &delimiter).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].name(), "S1-S2");
    assert_eq!(parsed[1].name(), "S3");
}

#[test]
fn tab_delimited_file() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(temp.path()).unwrap();
    let id_file = root.join("ids.tsv");
    fs::write(id_file.as_std_path(), "S1\tS2\n").unwrap();

    let delimiter: Delimiter = "tab".parse().unwrap();
    let parsed = groups::read_groups(&id_file, &delimiter).unwrap();
    assert_eq!(parsed[0].identifiers(), ["S1", "S2"]);
}

#[test]
fn missing_file_is_a_config_error() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(temp.path()).unwrap();
    let delimiter: Delimiter = "space".parse().unwrap();

    let err = groups::read_groups(&root.join("absent.txt"), &delimiter).unwrap_err();
    assert_matches!(err, MergeError::IdentifierFileRead(_));
}
