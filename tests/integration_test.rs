// Public API tests
//
// These exercise the library the way a caller outside the crate sees it.

use ffprefs::{
    parse_prefs_js, parse_prefs_js_file, query_preferences, validate_prefs_js, DuplicateKeys,
    Error, ParseOptions, PrefKind, PrefType, PrefValue, PrefsFile, Severity,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_parse_prefs_js_basic_api() {
    let content = r#"
        user_pref("browser.startup.homepage", "https://example.com");
        user_pref("javascript.enabled", true);
        user_pref("network.proxy.type", 1);
    "#;

    let prefs = parse_prefs_js(content).expect("Failed to parse preferences");
    assert_eq!(prefs.len(), 3);

    let homepage = prefs
        .iter()
        .find(|e| e.key == "browser.startup.homepage")
        .unwrap();
    assert_eq!(homepage.value, PrefValue::from("https://example.com"));
    assert_eq!(homepage.pref_type, PrefType::User);
    assert_eq!(homepage.line, 2);

    let proxy_type = prefs
        .iter()
        .find(|e| e.key == "network.proxy.type")
        .unwrap();
    assert_eq!(proxy_type.value, PrefValue::Integer(1));
}

#[test]
fn test_parse_prefs_js_file_basic_api() {
    let prefs = parse_prefs_js_file(std::path::Path::new("tests/fixtures/kodachi-light/prefs.js"))
        .expect("Failed to parse prefs.js");

    assert_eq!(prefs.len(), 248);
    assert!(prefs.iter().all(|p| p.line > 11));
}

#[test]
fn test_query_multiple_patterns() {
    let content = r#"
        user_pref("network.proxy.type", 1);
        user_pref("browser.startup.page", 3);
        user_pref("extensions.enabled", true);
    "#;

    let prefs = parse_prefs_js(content).expect("Failed to parse");
    let results = query_preferences(&prefs, &["network.*", "browser.*"]).expect("Failed to query");
    assert_eq!(results.len(), 2);

    assert!(matches!(
        query_preferences(&prefs, &["network.[*"]),
        Err(Error::InvalidGlobPattern(_))
    ));
}

#[test]
fn test_json_serialization() {
    let prefs = parse_prefs_js(r#"lock_pref("webgl.disabled", true);"#).expect("Failed to parse");

    let json = serde_json::to_value(&prefs[0]).expect("Failed to serialize");
    assert_eq!(json["key"], "webgl.disabled");
    assert_eq!(json["value"], true);
    assert_eq!(json["type"], "locked");
    assert!(json["explanation"].is_string());
    assert!(json.get("line").is_none());
}

#[test]
fn test_error_positions() {
    let invalid = "user_pref(\"a\", 1);\nuser_pref(\"unclosed string);";

    match parse_prefs_js(invalid) {
        Err(Error::Lexer { line, column, message }) => {
            assert_eq!(line, 2);
            assert!(column > 0);
            assert!(!message.is_empty());
        }
        other => panic!("Expected lexer error for unclosed string, got {:?}", other),
    }

    match parse_prefs_js("user_pref(\"a\" 1);") {
        Err(Error::Parser { line, column, .. }) => assert_eq!((line, column), (1, 15)),
        other => panic!("Expected parser error, got {:?}", other),
    }

    // numbers outside the 32-bit range are rejected rather than truncated
    assert!(parse_prefs_js("user_pref(\"a\", 2147483648);").is_err());
    assert!(parse_prefs_js("user_pref(\"a\", -2147483648);").is_ok());
}

#[test]
fn test_duplicate_policies() {
    let content = "user_pref(\"a\", 1);\nuser_pref(\"a\", \"x\");\n";

    let prefs = PrefsFile::parse(content).unwrap();
    assert_eq!(prefs.get_value("a"), Some(&PrefValue::from("x")));
    assert_eq!(prefs.duplicates().len(), 1);
    assert_eq!(prefs.duplicates()[0].first_line, 1);

    let strict = ParseOptions {
        duplicate_keys: DuplicateKeys::Reject,
    };
    match PrefsFile::parse_with(content, &strict) {
        Err(Error::DuplicateKey { key, first_line, line }) => {
            assert_eq!((key.as_str(), first_line, line), ("a", 1, 2));
        }
        other => panic!("Expected duplicate error, got {:?}", other),
    }
}

#[test]
fn test_type_mismatch_reports_kinds() {
    let prefs = PrefsFile::parse(r#"user_pref("network.proxy.socks_port", 9050);"#).unwrap();

    match prefs.get_str("network.proxy.socks_port") {
        Err(Error::TypeMismatch { expected, found, .. }) => {
            assert_eq!(expected, PrefKind::String);
            assert_eq!(found, PrefKind::Integer);
        }
        other => panic!("Expected type mismatch, got {:?}", other),
    }
    assert_eq!(prefs.get_str("absent").unwrap(), None);
}

#[test]
fn test_validate_reports_issues() {
    let content = "pref(\"a\", 1);\nuser_pref(\"b\", 1);\nuser_pref(\"b\", true);\n";
    let issues = validate_prefs_js(content);

    assert_eq!(issues.len(), 2);
    assert!(issues.iter().all(|i| i.severity == Severity::Warning));
    assert_eq!(issues[0].line, 1);
    assert_eq!(issues[1].line, 3);

    let broken = validate_prefs_js("user_pref(\"a\", 1)\n");
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].severity, Severity::Error);
}

#[test]
fn test_new_file_gets_standard_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.js");

    let mut prefs = PrefsFile::new();
    prefs.set("privacy.resistFingerprinting", true).unwrap();
    prefs.set("browser.startup.homepage", "C:\\Users\\\"kodachi\"\n").unwrap();
    prefs.save(&path).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("// Mozilla User Preferences\n\n// DO NOT EDIT THIS FILE.\n"));
    assert!(written.ends_with(
        "\n\nuser_pref(\"browser.startup.homepage\", \"C:\\\\Users\\\\\\\"kodachi\\\"\\n\");\n\
         user_pref(\"privacy.resistFingerprinting\", true);\n"
    ));

    let reloaded = PrefsFile::load(&path).unwrap();
    assert_eq!(
        reloaded.get_str("browser.startup.homepage").unwrap(),
        Some("C:\\Users\\\"kodachi\"\n")
    );
}

#[test]
fn test_save_checked_detects_external_rewrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.js");
    fs::write(&path, "user_pref(\"a\", 1);\n").unwrap();

    let mut prefs = PrefsFile::load(&path).unwrap();
    prefs.set("a", 2).unwrap();

    let file = fs::File::options().write(true).open(&path).unwrap();
    file.set_modified(std::time::SystemTime::UNIX_EPOCH).unwrap();
    drop(file);

    assert!(matches!(prefs.save_checked(&path), Err(Error::ModifiedOnDisk(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), "user_pref(\"a\", 1);\n");
}
