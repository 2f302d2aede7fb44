//! In-memory prefs.js document
//!
//! [`PrefsFile`] is the unit the browser itself works with: the whole file is
//! read at once, edited as a key/value map, and written back wholesale. Keys
//! are unique by construction and iteration is in key order, which is also the
//! order the browser writes.
//!
//! # Example
//!
//! ```rust
//! use ffprefs::{PrefsFile, PrefValue};
//!
//! let mut prefs = PrefsFile::parse(r#"
//!     user_pref("browser.startup.homepage", "about:blank");
//!     user_pref("webgl.disabled", true);
//! "#)?;
//!
//! assert_eq!(prefs.get_bool("webgl.disabled")?, Some(true));
//! prefs.set("network.proxy.socks_port", 9050)?;
//! assert!(prefs.to_prefs_string().contains("user_pref(\"network.proxy.socks_port\", 9050);"));
//! # Ok::<(), ffprefs::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::parser::parse_prefs_js;
use crate::types::{PrefEntry, PrefKind, PrefType, PrefValue};
use crate::writer::{write_prefs, MOZILLA_HEADER};
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;

/// What to do when a key occurs more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Keep the later value, as the browser does
    #[default]
    LastWins,
    /// Fail with [`Error::DuplicateKey`]
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub duplicate_keys: DuplicateKeys,
}

/// A key that appeared more than once in the parsed input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    pub key: String,
    pub first_line: usize,
    pub line: usize,
}

/// A prefs.js file: advisory header plus one value per key
#[derive(Debug, Clone)]
pub struct PrefsFile {
    header: Vec<String>,
    entries: BTreeMap<String, PrefEntry>,
    duplicates: Vec<Duplicate>,
    /// Modification time of the file this was loaded from
    loaded_mtime: Option<SystemTime>,
}

impl Default for PrefsFile {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefsFile {
    /// Empty document carrying the browser's standard header
    pub fn new() -> Self {
        PrefsFile {
            header: MOZILLA_HEADER.iter().map(|s| s.to_string()).collect(),
            entries: BTreeMap::new(),
            duplicates: Vec::new(),
            loaded_mtime: None,
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_with(content, &ParseOptions::default())
    }

    pub fn parse_with(content: &str, options: &ParseOptions) -> Result<Self> {
        let mut entries: BTreeMap<String, PrefEntry> = BTreeMap::new();
        let mut duplicates = Vec::new();

        for entry in parse_prefs_js(content)? {
            match entries.entry(entry.key.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
                Entry::Occupied(mut slot) => {
                    let duplicate = Duplicate {
                        key: entry.key.clone(),
                        first_line: slot.get().line,
                        line: entry.line,
                    };
                    if options.duplicate_keys == DuplicateKeys::Reject {
                        return Err(Error::DuplicateKey {
                            key: duplicate.key,
                            first_line: duplicate.first_line,
                            line: duplicate.line,
                        });
                    }
                    tracing::warn!(
                        key = %duplicate.key,
                        first_line = duplicate.first_line,
                        line = duplicate.line,
                        "duplicate preference, keeping the later value"
                    );
                    slot.insert(entry);
                    duplicates.push(duplicate);
                }
            }
        }

        Ok(PrefsFile {
            header: leading_comment_block(content),
            entries,
            duplicates,
            loaded_mtime: None,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, &ParseOptions::default())
    }

    /// Read and parse a file, remembering its modification time for
    /// [`PrefsFile::save_checked`]
    pub fn load_with(path: &Path, options: &ParseOptions) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut prefs = Self::parse_with(&content, options)?;
        prefs.loaded_mtime = fs::metadata(path)?.modified().ok();
        tracing::debug!(path = %path.display(), count = prefs.len(), "loaded preferences");
        Ok(prefs)
    }

    /// Leading `//` comment block, one element per line
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Replace the leading comment block
    ///
    /// Every line must be empty or a `//` comment so the written file still
    /// parses.
    pub fn set_header(&mut self, header: Vec<String>) -> Result<()> {
        if let Some(bad) = header.iter().find(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with("//")
        }) {
            return Err(Error::InvalidHeaderLine(bad.clone()));
        }
        self.header = header;
        Ok(())
    }

    /// Keys that were defined more than once in the parsed input
    pub fn duplicates(&self) -> &[Duplicate] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&PrefEntry> {
        self.entries.get(key)
    }

    pub fn get_value(&self, key: &str) -> Option<&PrefValue> {
        self.entries.get(key).map(|e| &e.value)
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = &PrefEntry> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.typed(key, PrefKind::Bool, PrefValue::as_bool)
    }

    pub fn get_i32(&self, key: &str) -> Result<Option<i32>> {
        self.typed(key, PrefKind::Integer, PrefValue::as_i32)
    }

    pub fn get_str(&self, key: &str) -> Result<Option<&str>> {
        self.typed(key, PrefKind::String, PrefValue::as_str)
    }

    /// Decode a string preference that holds a JSON document
    pub fn get_json(&self, key: &str) -> Result<Option<serde_json::Value>> {
        match self.get_str(key)? {
            Some(s) => serde_json::from_str(s)
                .map(Some)
                .map_err(|source| Error::Json {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: PrefKind,
        extract: impl FnOnce(&'a PrefValue) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.get_value(key) {
            None => Ok(None),
            Some(value) => extract(value).map(Some).ok_or_else(|| Error::TypeMismatch {
                key: key.to_string(),
                expected,
                found: value.kind(),
            }),
        }
    }

    /// Insert or replace a value, returning the previous one
    ///
    /// A replaced entry keeps its statement type; new entries are `user_pref`.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PrefValue>,
    ) -> Result<Option<PrefValue>> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::InvalidKey(key));
        }
        let value = value.into();
        match self.entries.entry(key) {
            Entry::Occupied(mut slot) => {
                let previous = std::mem::replace(&mut slot.get_mut().value, value);
                Ok(Some(previous))
            }
            Entry::Vacant(slot) => {
                let entry = PrefEntry::new(slot.key().clone(), value);
                slot.insert(entry);
                Ok(None)
            }
        }
    }

    /// Like [`PrefsFile::set`], but refuses to change the kind of an existing value
    pub fn update(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PrefValue>,
    ) -> Result<Option<PrefValue>> {
        let key = key.into();
        let value = value.into();
        if let Some(existing) = self.get_value(&key) {
            if existing.kind() != value.kind() {
                return Err(Error::TypeMismatch {
                    found: existing.kind(),
                    expected: value.kind(),
                    key,
                });
            }
        }
        self.set(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<PrefEntry> {
        self.entries.remove(key)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&PrefEntry) -> bool) {
        self.entries.retain(|_, entry| keep(entry));
    }

    /// Entries matching any of the glob patterns
    pub fn query(&self, patterns: &[&str]) -> Result<Vec<&PrefEntry>> {
        crate::query::query_preferences(self.iter(), patterns)
    }

    /// Serialize in the browser's canonical form
    pub fn to_prefs_string(&self) -> String {
        write_prefs(&self.header, self.entries.values())
    }

    /// Replace `path` atomically with the serialized document
    ///
    /// The new content goes to a temporary file in the same directory, is
    /// synced, and is then renamed over the target. A symlinked `path` is
    /// resolved first, so the link survives and its target is replaced.
    pub fn save(&self, path: &Path) -> Result<()> {
        let target = match fs::canonicalize(path) {
            Ok(resolved) => resolved,
            Err(err) if err.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
            Err(err) => return Err(err.into()),
        };
        let path = target.as_path();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(self.to_prefs_string().as_bytes())?;
        temp.as_file().sync_all()?;
        if let Ok(metadata) = fs::metadata(path) {
            fs::set_permissions(temp.path(), metadata.permissions())?;
        }
        temp.persist(path).map_err(|err| Error::Io(err.error))?;

        tracing::debug!(path = %path.display(), count = self.len(), "saved preferences");
        Ok(())
    }

    /// [`PrefsFile::save`], refusing when the file changed since it was loaded
    ///
    /// The browser rewrites prefs.js on exit; a save that raced with it would
    /// silently drop one side's changes.
    pub fn save_checked(&mut self, path: &Path) -> Result<()> {
        if let Some(loaded) = self.loaded_mtime {
            let current = fs::metadata(path).ok().and_then(|m| m.modified().ok());
            if current != Some(loaded) {
                return Err(Error::ModifiedOnDisk(path.to_path_buf()));
            }
        }
        self.save(path)?;
        self.loaded_mtime = fs::metadata(path)?.modified().ok();
        Ok(())
    }
}

/// Leading comment lines, verbatim, without surrounding blank lines
fn leading_comment_block(content: &str) -> Vec<String> {
    let mut header: Vec<String> = content
        .lines()
        .skip_while(|line| line.trim().is_empty())
        .take_while(|line| {
            let trimmed = line.trim();
            trimmed.is_empty() || trimmed.starts_with("//")
        })
        .map(str::to_string)
        .collect();
    while header.last().is_some_and(|line| line.trim().is_empty()) {
        header.pop();
    }
    header
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A problem found by [`validate_prefs_js`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub line: usize,
    pub message: String,
}

/// Check prefs.js content for everything a reader would trip over
///
/// A syntax error is reported alone, since nothing after it can be trusted.
/// Otherwise duplicate keys, empty keys, and statements other than
/// `user_pref` are reported in line order.
pub fn validate_prefs_js(content: &str) -> Vec<Issue> {
    let entries = match parse_prefs_js(content) {
        Ok(entries) => entries,
        Err(err) => {
            let line = match &err {
                Error::Lexer { line, .. } | Error::Parser { line, .. } => *line,
                _ => 0,
            };
            return vec![Issue {
                severity: Severity::Error,
                line,
                message: err.to_string(),
            }];
        }
    };

    let mut issues = Vec::new();
    let mut seen: HashMap<&str, &PrefEntry> = HashMap::new();

    for entry in &entries {
        if entry.key.is_empty() {
            issues.push(Issue {
                severity: Severity::Error,
                line: entry.line,
                message: "empty preference name".to_string(),
            });
        }
        if entry.pref_type != PrefType::User {
            issues.push(Issue {
                severity: Severity::Warning,
                line: entry.line,
                message: format!(
                    "'{}' uses {}(); the browser only writes user_pref() here",
                    entry.key,
                    entry.pref_type.function_name()
                ),
            });
        }
        if let Some(first) = seen.insert(&entry.key, entry) {
            let mut message = format!(
                "'{}' already defined at line {}; the later value wins",
                entry.key, first.line
            );
            if first.value.kind() != entry.value.kind() {
                message.push_str(&format!(
                    " and changes it from {} to {}",
                    first.value.kind(),
                    entry.value.kind()
                ));
            }
            issues.push(Issue {
                severity: Severity::Warning,
                line: entry.line,
                message,
            });
        }
    }

    issues
}
