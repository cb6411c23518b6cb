//! Trace Loader Tests.
//!
//! Verifies parsing of the simulator's newline-delimited JSON:
//!   1. Key renaming and register collection
//!   2. Flags accepted as integers or booleans
//!   3. Optional fields and the `hz_hz` alias
//!   4. Malformed and empty input
//!   5. Quoted captures and file loading

use std::io::Write;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use crate::common::builder::{CycleBuilder, to_json, trace_text};
use pipetrace_core::TraceError;
use pipetrace_core::trace::{load, load_file, normalize};

#[test]
fn test_load_preserves_order_and_fields() {
    let cycles = vec![
        CycleBuilder::new().pc(0x100).reg(5, 7).build(),
        CycleBuilder::new().pc(0x104).write_back(5, 9).icache_msg("miss").build(),
    ];
    let loaded = load(&trace_text(&cycles)).unwrap();
    assert_eq!(loaded, cycles);
}

#[test]
fn test_x0_is_forced_to_zero() {
    let mut record = to_json(&CycleBuilder::new().build());
    record["x0"] = json!(0xdead);
    let loaded = load(&record.to_string()).unwrap();
    assert_eq!(loaded[0].regs.read(0), 0);
}

#[rstest]
#[case(json!(1), true)]
#[case(json!(0), false)]
#[case(json!(true), true)]
#[case(json!(false), false)]
#[case(json!(2), true)]
fn test_flag_encodings(#[case] value: serde_json::Value, #[case] expected: bool) {
    let mut record = to_json(&CycleBuilder::new().build());
    record["hz_dat"] = value;
    let loaded = load(&record.to_string()).unwrap();
    assert_eq!(loaded[0].data_hazard, expected);
}

#[test]
fn test_hazard_key_alias() {
    let mut record = to_json(&CycleBuilder::new().build());
    let obj = record.as_object_mut().unwrap();
    let _ = obj.remove("hz_dat");
    let _ = obj.insert("hz_hz".to_owned(), json!(1));
    let loaded = load(&record.to_string()).unwrap();
    assert!(loaded[0].data_hazard);
}

#[test]
fn test_optional_fields_default() {
    let mut record = to_json(&CycleBuilder::new().build());
    let obj = record.as_object_mut().unwrap();
    for key in ["mem_c8", "mi", "md", "mr", "mf"] {
        let _ = obj.remove(key);
    }
    let loaded = load(&record.to_string()).unwrap();
    assert_eq!(loaded[0].mem_c8, 0);
    assert!(loaded[0].icache_msg.is_empty());
}

#[test]
fn test_blank_lines_are_skipped() {
    let line = CycleBuilder::new().json();
    let text = format!("\n{line}\n\n{line}\n\n");
    assert_eq!(load(&text).unwrap().len(), 2);
}

#[test]
fn test_malformed_line_reports_line_number() {
    let line = CycleBuilder::new().json();
    let text = format!("{line}\n{{\"if_pc\": 1\n{line}\n");
    match load(&text) {
        Err(TraceError::MalformedTrace { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected MalformedTrace, got {other:?}"),
    }
}

#[test]
fn test_missing_register_is_malformed() {
    let mut record = to_json(&CycleBuilder::new().build());
    let _ = record.as_object_mut().unwrap().remove("x17");
    let err = load(&record.to_string()).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn test_missing_signal_is_malformed() {
    let mut record = to_json(&CycleBuilder::new().build());
    let _ = record.as_object_mut().unwrap().remove("wb_wb");
    assert!(matches!(
        load(&record.to_string()),
        Err(TraceError::MalformedTrace { line: 1, .. })
    ));
}

#[rstest]
#[case("")]
#[case("\n\n")]
#[case("   \n")]
fn test_empty_trace(#[case] text: &str) {
    assert!(matches!(load(text), Err(TraceError::EmptyTrace)));
}

#[test]
fn test_byte_string_capture() {
    let line = CycleBuilder::new().pc(0x40).json();
    let captured = format!("b'{line}\\n{line}\\n'");
    let loaded = load(&normalize(&captured)).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[1].fetch_pc, 0x40);
}

#[test]
fn test_byte_string_capture_keeps_backslashes() {
    let line = CycleBuilder::new().icache_msg(r"miss at C:\tmp\n").json();
    let captured = format!("b'{}\\n'", line.replace('\\', "\\\\"));
    let loaded = load(&normalize(&captured)).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].icache_msg, r"miss at C:\tmp\n");
}

#[test]
fn test_load_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", trace_text(&[CycleBuilder::new().pc(8).build()])).unwrap();
    let loaded = load_file(file.path()).unwrap();
    assert_eq!(loaded[0].fetch_pc, 8);
}

#[test]
fn test_load_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_file(&dir.path().join("absent.jsonl")).unwrap_err();
    assert!(matches!(err, TraceError::Io { .. }));
    assert!(!err.is_malformed());
}
