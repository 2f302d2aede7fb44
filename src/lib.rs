//! # ffprefs - Firefox prefs.js reader and writer
//!
//! `prefs.js` is the snapshot of non-default preferences a Firefox-derived
//! browser writes into its profile on every shutdown. This library parses it,
//! lets you query and edit it as a key/value map, and writes it back in the
//! exact form the browser produces.
//!
//! ## Features
//!
//! - Parse prefs.js with full JavaScript escape sequence support and
//!   line/column error reporting
//! - Edit a snapshot as a map with typed access (`bool`, `i32`, string, and
//!   embedded JSON payloads)
//! - Write files byte-for-byte the way the browser does: advisory header,
//!   sorted `user_pref` lines, standard escaping, atomic replacement
//! - Detect duplicate keys, type changes, and concurrent rewrites by a running
//!   browser
//! - Query preferences using glob patterns (e.g. `"network.*"`)
//! - Diff two snapshots, scan directory trees for snapshots, and locate
//!   profiles through profiles.ini
//!
//! ## Quick Start
//!
//! ```rust
//! use ffprefs::{PrefsFile, PrefValue};
//!
//! let content = r#"// Mozilla User Preferences
//!
//! user_pref("browser.startup.homepage", "about:blank");
//! user_pref("privacy.resistFingerprinting", true);
//! "#;
//!
//! let mut prefs = PrefsFile::parse(content)?;
//! assert_eq!(prefs.get_str("browser.startup.homepage")?, Some("about:blank"));
//!
//! prefs.set("webgl.disabled", true)?;
//! let written = prefs.to_prefs_string();
//! assert!(written.ends_with("user_pref(\"webgl.disabled\", true);\n"));
//! # Ok::<(), ffprefs::Error>(())
//! ```
//!
//! ### Statement-level parsing
//!
//! ```rust
//! use ffprefs::{parse_prefs_js, PrefType, PrefValue};
//!
//! let prefs = parse_prefs_js(r#"lock_pref("app.update.auto", false);"#)?;
//! assert_eq!(prefs[0].pref_type, PrefType::Locked);
//! assert_eq!(prefs[0].value, PrefValue::Bool(false));
//! # Ok::<(), ffprefs::Error>(())
//! ```
//!
//! ### Working with Profiles
//!
//! ```rust,no_run
//! use ffprefs::{find_profile_path, get_prefs_path, is_profile_in_use, PrefsFile};
//!
//! let profile = find_profile_path("default", None)?;
//! if is_profile_in_use(&profile) {
//!     eprintln!("browser is running; changes would be overwritten on exit");
//! }
//! let prefs = PrefsFile::load(&get_prefs_path(&profile))?;
//! println!("{} preferences", prefs.len());
//! # Ok::<(), ffprefs::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All functions return [`Result<T, Error>`]:
//!
//! ```rust
//! use ffprefs::{parse_prefs_js, Error};
//!
//! match parse_prefs_js("user_pref(invalid syntax") {
//!     Ok(_) => println!("Parsed successfully"),
//!     Err(Error::Parser { line, column, message }) => {
//!         eprintln!("Parse error at {}:{}: {}", line, column, message);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

pub use types::{PrefEntry, PrefKind, PrefType, PrefValue};

pub use error::{Error, Result};

pub use document::{
    validate_prefs_js, Duplicate, DuplicateKeys, Issue, ParseOptions, PrefsFile, Severity,
};

pub use parser::{parse_prefs_js, parse_prefs_js_file};
pub use writer::{escape_pref_string, format_entry, write_prefs, MOZILLA_HEADER};

pub use diff::{diff_prefs, ChangedPref, PrefsDiff};
pub use query::query_preferences;
pub use scan::{find_prefs_files, PREFS_FILE_NAME};

pub use profile::{
    find_profile_path, get_prefs_path, get_profiles_directory, is_profile_in_use, list_profiles,
    ProfileInfo, PROFILES_DIR_ENV,
};

pub use explanations::explain;

mod diff;
mod document;
mod error;
mod explanations;
mod lexer;
mod parser;
mod profile;
mod query;
mod scan;
mod types;
mod writer;
