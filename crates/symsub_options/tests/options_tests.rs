//! Project file parsing.

use symsub_options::*;

#[test]
fn test_parse_full_project() {
    let config = parse_config(
        r#"{
            "printer": {"indent": "\t", "newLine": "\r\n", "trailingNewline": true},
            "files": ["fun.js"],
            "input": {"a": 6, "b": 6, "c": 10}
        }"#,
    )
    .unwrap();

    let options = config.printer_options();
    assert_eq!(options.indent_str, "\t");
    assert_eq!(options.new_line, "\r\n");
    assert!(options.trailing_newline);
    assert_eq!(config.files, Some(vec!["fun.js".to_string()]));
    let input = config.input.unwrap();
    assert_eq!(input.get("c"), Some(&serde_json::json!(10)));
}

#[test]
fn test_empty_object_is_valid() {
    let config = parse_config("{}").unwrap();
    assert_eq!(config, SymsubConfig::default());
    assert!(config.resolved_files(std::path::Path::new(".")).is_empty());
}

#[test]
fn test_invalid_indent_is_rejected() {
    let error = parse_config(r#"{"printer": {"indent": "--"}}"#).unwrap_err();
    assert!(matches!(error, OptionsError::InvalidValue { option: "printer.indent", .. }));
}

#[test]
fn test_invalid_new_line_is_rejected() {
    let error = parse_config(r#"{"printer": {"newLine": "\r"}}"#).unwrap_err();
    assert_eq!(
        error.to_string(),
        r#"invalid value for 'printer.newLine': expected "\n" or "\r\n", found "\r""#
    );
}

#[test]
fn test_malformed_json() {
    let error = parse_config(r#"{"files": "#).unwrap_err();
    assert!(matches!(error, OptionsError::Json(_)));
}

#[test]
fn test_missing_file_reports_path() {
    let error = parse_config_file("does/not/exist/symsub.json").unwrap_err();
    assert!(matches!(error, OptionsError::Io { .. }));
    assert!(error.to_string().starts_with("cannot read 'does/not/exist/symsub.json'"));
}

#[test]
fn test_default_project_round_trips_through_writer() {
    let written = write_config(&SymsubConfig::default_project()).unwrap();
    assert!(written.ends_with('\n'));
    assert!(written.contains("\"trailingNewline\": false"));
    assert_eq!(parse_config(&written).unwrap(), SymsubConfig::default_project());
}
