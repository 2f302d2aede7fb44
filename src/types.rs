//! Core preference types
//!
//! A preference record is a key paired with one of three primitive values.
//! String values are sometimes JSON documents in their own right; those are
//! carried as opaque strings and decoded on request via [`PrefValue::as_json`].

use serde::Serialize;
use std::fmt;

/// Value of a single preference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    /// 32-bit signed, the range the browser accepts for integer prefs
    Integer(i32),
    String(String),
}

/// The three value kinds, used when reporting type mismatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefKind {
    Bool,
    Integer,
    String,
}

impl fmt::Display for PrefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrefKind::Bool => "a boolean",
            PrefKind::Integer => "an integer",
            PrefKind::String => "a string",
        };
        f.write_str(name)
    }
}

impl PrefValue {
    /// Kind of this value
    pub fn kind(&self) -> PrefKind {
        match self {
            PrefValue::Bool(_) => PrefKind::Bool,
            PrefValue::Integer(_) => PrefKind::Integer,
            PrefValue::String(_) => PrefKind::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            PrefValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Decode a string payload as JSON
    ///
    /// Returns `None` for booleans, integers, and strings that are not JSON.
    /// Note that a string such as `"12"` is valid JSON and decodes to a number.
    ///
    /// ```rust
    /// use ffprefs::PrefValue;
    ///
    /// let value = PrefValue::from(r#"{"panelOpen":false}"#);
    /// let json = value.as_json().unwrap();
    /// assert_eq!(json["panelOpen"], serde_json::Value::Bool(false));
    /// assert!(PrefValue::from("about:blank").as_json().is_none());
    /// ```
    pub fn as_json(&self) -> Option<serde_json::Value> {
        self.as_str().and_then(|s| serde_json::from_str(s).ok())
    }
}

/// Renders the value as a prefs.js literal
impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{}", b),
            PrefValue::Integer(n) => write!(f, "{}", n),
            PrefValue::String(s) => write!(f, "\"{}\"", crate::writer::escape_pref_string(s)),
        }
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        PrefValue::Bool(value)
    }
}

impl From<i32> for PrefValue {
    fn from(value: i32) -> Self {
        PrefValue::Integer(value)
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        PrefValue::String(value.to_string())
    }
}

impl From<String> for PrefValue {
    fn from(value: String) -> Self {
        PrefValue::String(value)
    }
}

/// Which pref function a statement used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefType {
    /// `user_pref()`: what the browser writes to prefs.js
    #[default]
    User,
    /// `pref()`: application default
    Default,
    /// `lock_pref()`
    Locked,
    /// `sticky_pref()`
    Sticky,
}

impl PrefType {
    /// Statement function name for this type
    pub fn function_name(self) -> &'static str {
        match self {
            PrefType::User => "user_pref",
            PrefType::Default => "pref",
            PrefType::Locked => "lock_pref",
            PrefType::Sticky => "sticky_pref",
        }
    }

    pub(crate) fn from_function_name(name: &str) -> Option<Self> {
        match name {
            "user_pref" => Some(PrefType::User),
            "pref" => Some(PrefType::Default),
            "lock_pref" => Some(PrefType::Locked),
            "sticky_pref" => Some(PrefType::Sticky),
            _ => None,
        }
    }
}

/// A single preference statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefEntry {
    pub key: String,
    pub value: PrefValue,
    #[serde(rename = "type")]
    pub pref_type: PrefType,
    /// 1-based line where the statement started; 0 when created in memory
    #[serde(skip)]
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<&'static str>,
}

impl PrefEntry {
    /// A `user_pref` entry not tied to any source line
    pub fn new(key: impl Into<String>, value: impl Into<PrefValue>) -> Self {
        let key = key.into();
        let explanation = crate::explanations::explain(&key);
        PrefEntry {
            key,
            value: value.into(),
            pref_type: PrefType::User,
            line: 0,
            explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_accessors() {
        let b = PrefValue::Bool(true);
        let n = PrefValue::Integer(-1);
        let s = PrefValue::from("about:blank");

        assert_eq!(b.kind(), PrefKind::Bool);
        assert_eq!(n.kind(), PrefKind::Integer);
        assert_eq!(s.kind(), PrefKind::String);

        assert_eq!(b.as_bool(), Some(true));
        assert_eq!(n.as_i32(), Some(-1));
        assert_eq!(s.as_str(), Some("about:blank"));
        assert_eq!(s.as_bool(), None);
        assert_eq!(b.as_i32(), None);
        assert_eq!(n.as_str(), None);
    }

    #[test]
    fn test_display_renders_literals() {
        assert_eq!(PrefValue::Bool(false).to_string(), "false");
        assert_eq!(PrefValue::Integer(1665642828).to_string(), "1665642828");
        assert_eq!(
            PrefValue::from(r#"{"a":"b"}"#).to_string(),
            r#""{\"a\":\"b\"}""#
        );
    }

    #[test]
    fn test_as_json_on_uuid_map() {
        let value = PrefValue::from(
            r#"{"formautofill@mozilla.org":"3653b7cb-03e9-46cf-8441-94910cd09e87"}"#,
        );
        let json = value.as_json().unwrap();
        assert_eq!(
            json["formautofill@mozilla.org"],
            "3653b7cb-03e9-46cf-8441-94910cd09e87"
        );
        assert!(PrefValue::Bool(true).as_json().is_none());
    }

    #[test]
    fn test_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            PrefValue::Bool(true),
            PrefValue::Integer(3),
            PrefValue::from("x"),
        ])
        .unwrap();
        assert_eq!(json, r#"[true,3,"x"]"#);
    }

    #[test]
    fn test_function_names() {
        for t in [
            PrefType::User,
            PrefType::Default,
            PrefType::Locked,
            PrefType::Sticky,
        ] {
            assert_eq!(PrefType::from_function_name(t.function_name()), Some(t));
        }
        assert_eq!(PrefType::from_function_name("set_pref"), None);
    }

    #[test]
    fn test_entry_new_attaches_explanation() {
        let entry = PrefEntry::new("privacy.resistFingerprinting", true);
        assert_eq!(entry.pref_type, PrefType::User);
        assert_eq!(entry.line, 0);
        assert!(entry.explanation.is_some());
    }
}
