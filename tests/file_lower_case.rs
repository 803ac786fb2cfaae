use lowerfile::{FileLowerCase, Filter, FilterChain, FilterInput, LowerError};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct TestFile {
    _dir: TempDir,
    path: PathBuf,
}

fn test_file() -> TestFile {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("testfile2.txt");
    fs::write(&path, "This is a File").unwrap();
    TestFile { _dir: dir, path }
}

#[test]
fn instance_creation_and_normal_workflow() {
    let t = test_file();
    assert!(fs::read_to_string(&t.path).unwrap().contains("This is a File"));

    let filter = FileLowerCase::new();
    let returned = filter.filter(FilterInput::from(t.path.clone())).unwrap();

    assert_eq!(returned, FilterInput::from(t.path.clone()));
    assert!(fs::read_to_string(&t.path).unwrap().contains("this is a file"));
}

#[test]
fn normal_workflow_with_files_array() {
    let t = test_file();
    let files = json!({ "tmp_name": t.path.to_str().unwrap() });

    let returned = FileLowerCase::new().filter(files.clone().into()).unwrap();

    assert_eq!(serde_json::Value::from(returned), files);
    assert!(fs::read_to_string(&t.path).unwrap().contains("this is a file"));
}

#[test]
fn file_not_found() {
    let t = test_file();
    let unknown = format!("{}unknown", t.path.display());

    let err = FileLowerCase::new().filter(unknown.into()).unwrap_err();

    assert!(matches!(err, LowerError::FileNotFound(_)));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn setting_encoding_in_instance() {
    let t = test_file();
    match FileLowerCase::with_encoding("ISO-8859-1") {
        Ok(filter) => {
            filter.filter(FilterInput::from(t.path.clone())).unwrap();
            assert!(fs::read_to_string(&t.path).unwrap().contains("this is a file"));
        }
        Err(e) => assert!(e.to_string().contains("mbstring is required")),
    }
}

#[test]
fn setting_encoding_with_method() {
    let t = test_file();
    let mut filter = FileLowerCase::new();
    match filter.set_encoding(Some("ISO-8859-1")) {
        Ok(()) => {
            filter.filter(FilterInput::from(t.path.clone())).unwrap();
            assert!(fs::read_to_string(&t.path).unwrap().contains("this is a file"));
        }
        Err(e) => assert!(e.to_string().contains("mbstring is required")),
    }
}

#[test]
fn returns_unfiltered_input() {
    let dir = tempfile::tempdir().unwrap();
    let unrelated = [
        json!(null),
        json!({}),
        json!([
            dir.path().join("one.txt").to_str().unwrap(),
            dir.path().join("two.txt").to_str().unwrap(),
        ]),
    ];

    let filter = FileLowerCase::new();
    for input in unrelated {
        let returned = filter.filter(input.clone().into()).unwrap();
        assert_eq!(serde_json::Value::from(returned), input);
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn chain_with_two_lowercasers_is_idempotent() {
    let t = test_file();
    let chain = FilterChain::new()
        .attach(FileLowerCase::new())
        .attach(FileLowerCase::new());

    chain.filter(FilterInput::from(t.path.clone())).unwrap();

    assert_eq!(fs::read_to_string(&t.path).unwrap(), "this is a file");
}
