//! End-to-end asciicast recording against a real file on disk.

use std::io::Read;
use std::time::Duration;

use saorsa_core::ansi::Token;
use saorsa_core::pipeline::{AsciicastRecorder, WorkloadFilter};

#[test]
fn recording_writes_header_and_output_lines_to_a_real_file() {
    let file = tempfile::NamedTempFile::new().expect("create temp file");
    let path = file.path().to_path_buf();

    let mut recorder = AsciicastRecorder::new(file.reopen().expect("reopen temp file"));
    recorder.on_session_start(80, 24, Duration::ZERO);
    recorder.on_output(&[Token::Text("hello".to_string())], Duration::from_millis(10));
    recorder.on_resize(100, 30, Duration::from_millis(20));
    drop(recorder);

    let mut contents = String::new();
    std::fs::File::open(&path)
        .expect("open recorded file")
        .read_to_string(&mut contents)
        .expect("read recorded file");

    let mut lines = contents.lines();
    let header = lines.next().expect("header line present");
    assert!(header.contains("\"version\":2"));
    assert!(header.contains("\"width\":80"));
    assert!(header.contains("\"height\":24"));

    let output_line = lines.next().expect("output event line present");
    assert!(output_line.contains("\"o\""));
    assert!(output_line.contains("hello"));

    let resize_line = lines.next().expect("resize event line present");
    assert!(resize_line.contains("\"r\""));
    assert!(resize_line.contains("100x30"));
}
