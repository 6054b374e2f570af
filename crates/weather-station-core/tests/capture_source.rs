use std::io::Cursor;
use std::path::PathBuf;

use weather_station_core::{CaptureLogSource, LineEvent, LineSource, SourceError};

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

#[test]
fn capture_log_source_reads_lines_from_fixture() {
    let path = repo_root()
        .join("tests")
        .join("golden")
        .join("configured_sensors")
        .join("input.log");
    let mut source = CaptureLogSource::open(&path).unwrap();

    let mut lines = Vec::new();
    while let Some(event) = source.next_line().unwrap() {
        lines.push(event);
    }

    assert_eq!(lines.len(), 12);
    assert_eq!(
        lines[0],
        LineEvent {
            line_number: 1,
            text: "ready".to_string(),
        }
    );
    assert!(lines[1].text.starts_with("RF receive 616 "));
}

#[test]
fn capture_log_source_rejects_missing_file() {
    let path = repo_root().join("tests").join("golden").join("missing.log");
    let err = match CaptureLogSource::open(&path) {
        Ok(_) => panic!("expected missing file to be rejected"),
        Err(err) => err,
    };

    assert!(matches!(err, SourceError::Io(_)));
}

#[test]
fn capture_log_source_replaces_invalid_utf8() {
    let bytes: &[u8] = b"RF receive \xff\r\nready";
    let mut source = CaptureLogSource::from_reader(Cursor::new(bytes));

    let first = source.next_line().unwrap().unwrap();
    assert_eq!(first.text, "RF receive \u{fffd}");
    let second = source.next_line().unwrap().unwrap();
    assert_eq!(second.line_number, 2);
    assert_eq!(second.text, "ready");
    assert!(source.next_line().unwrap().is_none());
}
