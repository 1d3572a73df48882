use std::fs;

use dashboard_engine::{ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("exports").join("today");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("resume_dashboard.csv", b"old").unwrap();
    assert_eq!(first.file_name().unwrap(), "resume_dashboard.csv");
    assert_eq!(fs::read(&first).unwrap(), b"old");

    let second = writer.write("resume_dashboard.csv", b"new").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"new");

    let leftovers = fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn output_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("resume_dashboard.pdf", b"data").is_err());
    assert!(!file_path.with_file_name("resume_dashboard.pdf").exists());
}
