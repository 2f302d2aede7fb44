//! Comparison of two preference snapshots
//!
//! Typical use is comparing a profile before and after a browser session, or
//! two differently hardened profiles against each other.

use crate::document::PrefsFile;
use crate::types::{PrefEntry, PrefValue};
use serde::Serialize;
use std::fmt;

/// A preference present on both sides with different values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedPref {
    pub key: String,
    pub old: PrefValue,
    pub new: PrefValue,
}

/// Differences between two snapshots, each list sorted by key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrefsDiff {
    /// Only in the new snapshot
    pub added: Vec<PrefEntry>,
    /// Only in the old snapshot
    pub removed: Vec<PrefEntry>,
    pub changed: Vec<ChangedPref>,
}

impl PrefsDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Total number of differing keys
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }
}

/// Compare two documents by key and value
///
/// Statement type and line positions are ignored; a value that changes kind
/// (for example integer to string) counts as changed.
///
/// ```rust
/// use ffprefs::{diff_prefs, PrefsFile};
///
/// let old = PrefsFile::parse(r#"user_pref("a", 1); user_pref("b", true);"#)?;
/// let new = PrefsFile::parse(r#"user_pref("a", 2); user_pref("c", "x");"#)?;
/// let diff = diff_prefs(&old, &new);
///
/// assert_eq!(diff.added[0].key, "c");
/// assert_eq!(diff.removed[0].key, "b");
/// assert_eq!(diff.changed[0].key, "a");
/// # Ok::<(), ffprefs::Error>(())
/// ```
pub fn diff_prefs(old: &PrefsFile, new: &PrefsFile) -> PrefsDiff {
    let mut diff = PrefsDiff::default();

    for entry in old.iter() {
        match new.get_value(&entry.key) {
            None => diff.removed.push(entry.clone()),
            Some(value) if *value != entry.value => diff.changed.push(ChangedPref {
                key: entry.key.clone(),
                old: entry.value.clone(),
                new: value.clone(),
            }),
            Some(_) => {}
        }
    }

    diff.added = new
        .iter()
        .filter(|entry| !old.contains_key(&entry.key))
        .cloned()
        .collect();

    diff
}

/// Unified-diff style listing: `-` removed, `+` added, `~` changed
impl fmt::Display for PrefsDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.removed {
            writeln!(f, "- {} = {}", entry.key, entry.value)?;
        }
        for entry in &self.added {
            writeln!(f, "+ {} = {}", entry.key, entry.value)?;
        }
        for change in &self.changed {
            writeln!(f, "~ {} = {} -> {}", change.key, change.old, change.new)?;
        }
        Ok(())
    }
}
