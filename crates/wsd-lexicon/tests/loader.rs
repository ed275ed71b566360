use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use wsd_lexicon::SenseInventory;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("lexicon.txt")
}

#[test]
fn loads_fixture_lexicon() {
    let inv = SenseInventory::load(fixture()).expect("load fixture");
    assert_eq!(inv.nouns().collect::<Vec<_>>(), vec!["bank", "crane", "bass"]);

    let bank = inv.get("bank").expect("bank present");
    assert_eq!(bank.plural(), Some("banks"));
    assert_eq!(bank.senses().len(), 2);
    assert!(!bank.senses()[0].words().contains("bank"));
    assert_eq!(
        bank.senses()[1].words().iter().collect::<Vec<_>>(),
        vec!["account", "finance", "loan", "money"]
    );
}

#[test]
fn normalizes_case_and_whitespace() {
    let inv = SenseInventory::load(fixture()).expect("load fixture");
    let crane = inv.get("CRANES").expect("plural lookup");
    assert_eq!(crane.noun(), "crane");
    assert!(crane.senses()[0].words().contains("feathers"));
    assert_eq!(crane.senses()[1].label(), "machine");
}

#[test]
fn unknown_forms_are_absent() {
    let inv = SenseInventory::load(fixture()).expect("load fixture");
    assert!(inv.get("shore").is_none());
    assert!(!inv.contains("basses"));
    assert!(inv.contains("Bass"));
}

#[test]
fn missing_file_names_the_path() {
    let err = SenseInventory::load("/definitely/not/here/lexicon.txt").unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here/lexicon.txt"));
}

#[test]
fn parse_errors_carry_path_and_line() {
    let mut file = NamedTempFile::new().expect("temp file");
    writeln!(file, "bank,river,shore").unwrap();
    writeln!(file, "orphan").unwrap();
    let err = SenseInventory::load(file.path()).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("line 2"), "{msg}");
    assert!(msg.contains(&file.path().display().to_string()), "{msg}");
}
