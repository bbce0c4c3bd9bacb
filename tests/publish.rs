use std::fs;

use camino::Utf8Path;

use seqmerge::config::PublishOptions;
use seqmerge::domain::{FileSet, IdentifierGroup, MergeGroup};
use seqmerge::publish;

fn merged_group(root: &Utf8Path, name: &str) -> MergeGroup {
    let dir = root.join(name);
    fs::create_dir_all(dir.as_std_path()).unwrap();
    let forward = dir.join(format!("{name}_S1_L001_R1_001.fastq"));
    let reverse = dir.join(format!("{name}_S1_L001_R2_001.fastq"));
    fs::write(forward.as_std_path(), b"@fwd\n").unwrap();
    fs::write(reverse.as_std_path(), b"@rev\n").unwrap();

    let mut group = MergeGroup::new(
        IdentifierGroup::new(vec![name.to_string()]),
        vec![FileSet {
            identifier: name.to_string(),
            files: vec![forward.clone(), reverse.clone()],
        }],
    );
    group.output_dir = Some(dir);
    group.forward_output = Some(forward);
    group.reverse_output = Some(reverse);
    group
}

#[test]
fn links_outputs_and_writes_the_manifest_once() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(temp.path()).unwrap();
    let groups = vec![merged_group(root, "S1"), merged_group(root, "S2")];
    let options = PublishOptions {
        destination: root.join("downstream"),
        folder: "run1".to_string(),
        sample_sheet: true,
    };

    publish::publish(&options, &groups).unwrap();

    let dest = root.join("downstream/run1");
    assert!(dest.join("S1_S1_L001_R1_001.fastq").as_std_path().exists());
    assert!(dest.join("S2_S1_L001_R2_001.fastq").as_std_path().exists());
    assert_eq!(
        fs::read(dest.join("S1_S1_L001_R1_001.fastq").as_std_path()).unwrap(),
        b"@fwd\n"
    );

    let sheet = fs::read_to_string(dest.join("SampleSheet.csv").as_std_path()).unwrap();
    assert!(sheet.starts_with("[Data]\n"));
    assert_eq!(sheet.matches("[Data]").count(), 1);
    assert!(sheet.contains("S1,S1,"));
    assert!(sheet.contains("S2,S2,"));
}

#[test]
fn republishing_appends_without_overwriting() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(temp.path()).unwrap();
    let groups = vec![merged_group(root, "S1")];
    let options = PublishOptions {
        destination: root.join("downstream"),
        folder: "run1".to_string(),
        sample_sheet: true,
    };

    publish::publish(&options, &groups).unwrap();
    publish::publish(&options, &groups).unwrap();

    let sheet = fs::read_to_string(
        root.join("downstream/run1/SampleSheet.csv").as_std_path(),
    )
    .unwrap();
    // header survives, it is never rewritten
    assert_eq!(sheet.matches("[Data]").count(), 1);
    assert_eq!(sheet.matches("S1,S1,").count(), 2);
}

#[test]
fn manifest_is_optional() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(temp.path()).unwrap();
    let groups = vec![merged_group(root, "S1")];
    let options = PublishOptions {
        destination: root.join("downstream"),
        folder: "run1".to_string(),
        sample_sheet: false,
    };

    publish::publish(&options, &groups).unwrap();
    assert!(
        !root
            .join("downstream/run1/SampleSheet.csv")
            .as_std_path()
            .exists()
    );
}
