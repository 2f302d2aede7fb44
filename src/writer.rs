//! Serializer for prefs.js files
//!
//! Produces the same text the browser writes on shutdown: the advisory header,
//! a blank line, then one `user_pref(...)` line per preference, sorted by key.

use crate::types::{PrefEntry, PrefValue};

/// Advisory block the browser places at the top of every prefs.js
pub const MOZILLA_HEADER: &[&str] = &[
    "// Mozilla User Preferences",
    "",
    "// DO NOT EDIT THIS FILE.",
    "//",
    "// If you make changes to this file while the application is running,",
    "// the changes will be overwritten when the application exits.",
    "//",
    "// To change a preference value, you can either:",
    "// - modify it via the UI (e.g. via about:config in the browser); or",
    "// - set it within a user.js file in your profile.",
];

/// Escape a string for use inside a double-quoted prefs.js literal
///
/// ```rust
/// use ffprefs::escape_pref_string;
///
/// assert_eq!(escape_pref_string(r#"{"a":"C:\x"}"#), r#"{\"a\":\"C:\\x\"}"#);
/// ```
pub fn escape_pref_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Render one statement, without the trailing newline
pub fn format_entry(entry: &PrefEntry) -> String {
    format_statement(entry.pref_type.function_name(), &entry.key, &entry.value)
}

fn format_statement(function: &str, key: &str, value: &PrefValue) -> String {
    format!("{}(\"{}\", {});", function, escape_pref_string(key), value)
}

/// Render a complete file
///
/// Entries are sorted by key (byte order) before writing. An empty header
/// produces a file that starts directly with the first statement.
pub fn write_prefs<'a, H, I>(header: &[H], entries: I) -> String
where
    H: AsRef<str>,
    I: IntoIterator<Item = &'a PrefEntry>,
{
    let mut sorted: Vec<&PrefEntry> = entries.into_iter().collect();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));

    let mut out = String::new();
    if !header.is_empty() {
        for line in header {
            out.push_str(line.as_ref());
            out.push('\n');
        }
        out.push('\n');
    }
    for entry in sorted {
        out.push_str(&format_entry(entry));
        out.push('\n');
    }
    out
}
