use std::io::Write;
use std::path::{Path, PathBuf};

use filetime::{set_file_mtime, FileTime};

use daily_brief::config::AppConfig;
use daily_brief::notes::{filter_open_tasks, latest_export, NotesExportSource, TaskSource};
use daily_brief::source::SourceData;

fn write_docx(dir: &Path, name: &str, paragraphs: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut archive = zip::ZipWriter::new(file);
    archive
        .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let document = format!(
        "<?xml version=\"1.0\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        body
    );
    archive.write_all(document.as_bytes()).unwrap();
    archive.finish().unwrap();
    path
}

fn source_for(folder: Option<PathBuf>) -> NotesExportSource {
    let config = AppConfig {
        time_zone: "America/New_York".to_string(),
        gmail_query: "newer_than:1d in:inbox -label:trash".to_string(),
        max_emails: 50,
        notes_export_folder: folder,
        done_marker: "DONE".to_string(),
        openai_api_key: None,
        openai_model: None,
        recipient: None,
        primary_user: "Seth Benkov".to_string(),
        colleagues: "Kevin or Trent".to_string(),
        output_file: PathBuf::from("daily_brief_output.html"),
        credentials_file: PathBuf::from("credentials.json"),
        token_file: PathBuf::from("token.json"),
    };
    NotesExportSource::new(&config)
}

#[test]
fn done_and_blank_paragraphs_are_dropped() {
    let paragraphs = ["Buy milk", "DONE: old task", "  ", "done something else"];
    let tasks = filter_open_tasks(paragraphs, "DONE");
    assert_eq!(tasks, vec!["Buy milk"]);
}

#[test]
fn task_text_is_kept_verbatim_after_trimming() {
    let paragraphs = ["  [Project X] Finalize budget  ", "Donate supplies"];
    let tasks = filter_open_tasks(paragraphs, "DONE");
    // "Donate" starts with "Don", not "DONE"
    assert_eq!(tasks, vec!["[Project X] Finalize budget", "Donate supplies"]);
}

#[test]
fn most_recently_modified_export_wins() {
    let dir = tempfile::tempdir().unwrap();
    let old = write_docx(dir.path(), "old.docx", &["stale"]);
    let new = write_docx(dir.path(), "new.docx", &["fresh"]);
    set_file_mtime(&old, FileTime::from_unix_time(1_700_000_000, 0)).unwrap();
    set_file_mtime(&new, FileTime::from_unix_time(1_700_100_000, 0)).unwrap();

    assert_eq!(latest_export(dir.path()).unwrap(), new);
}

#[test]
fn equal_mtimes_break_ties_by_path_order() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_docx(dir.path(), "a.docx", &["a"]);
    let b = write_docx(dir.path(), "b.docx", &["b"]);
    let stamp = FileTime::from_unix_time(1_700_000_000, 0);
    set_file_mtime(&a, stamp).unwrap();
    set_file_mtime(&b, stamp).unwrap();

    assert_eq!(latest_export(dir.path()).unwrap(), b);
}

#[test]
fn non_docx_files_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "plain text").unwrap();

    let err = latest_export(dir.path()).unwrap_err();
    assert!(err.contains("no .docx exports"), "got: {}", err);
}

#[test]
fn fetch_parses_the_latest_export() {
    let dir = tempfile::tempdir().unwrap();
    write_docx(
        dir.path(),
        "export.docx",
        &["Buy milk", "DONE: old task", "Finish report"],
    );

    let source = source_for(Some(dir.path().to_path_buf()));
    assert_eq!(
        source.fetch(),
        SourceData::Ready(vec!["Buy milk".to_string(), "Finish report".to_string()])
    );
}

#[test]
fn all_done_document_reports_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_docx(dir.path(), "export.docx", &["DONE: a", "done: b"]);

    let source = source_for(Some(dir.path().to_path_buf()));
    assert_eq!(source.fetch(), SourceData::Empty);
}

#[test]
fn missing_folder_fails_without_panicking() {
    let source = source_for(Some(PathBuf::from("/definitely/not/a/folder")));
    match source.fetch() {
        SourceData::Failed(reason) => assert!(reason.contains("export folder not found")),
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[test]
fn unconfigured_folder_fails_without_panicking() {
    let source = source_for(None);
    match source.fetch() {
        SourceData::Failed(reason) => assert!(reason.contains("not configured")),
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[test]
fn corrupt_export_fails_with_a_descriptive_reason() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.docx"), b"not a zip archive").unwrap();

    let source = source_for(Some(dir.path().to_path_buf()));
    match source.fetch() {
        SourceData::Failed(reason) => assert!(reason.contains(".docx"), "got: {}", reason),
        other => panic!("expected Failed, got {:?}", other),
    }
}
