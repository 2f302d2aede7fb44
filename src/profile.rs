//! Profile discovery
//!
//! Profiles are listed in `profiles.ini` inside the profiles directory. Kodachi
//! and other distributions also ship profile directories that follow the
//! `<salt>.<name>` convention without a matching ini entry, so lookups fall
//! back to scanning the directory.

use crate::error::{Error, Result};
use configparser::ini::Ini;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable overriding the platform profiles directory
pub const PROFILES_DIR_ENV: &str = "MOZ_PROFILES_DIR";

/// Profile section of profiles.ini
#[derive(Debug, Clone)]
struct IniProfile {
    name: String,
    path: PathBuf,
    is_relative: bool,
    is_default: bool,
}

impl IniProfile {
    fn full_path(&self, profiles_dir: &Path) -> PathBuf {
        if self.is_relative {
            profiles_dir.join(&self.path)
        } else {
            self.path.clone()
        }
    }
}

/// Public profile information for listing
#[derive(Debug, Clone, Serialize)]
pub struct ProfileInfo {
    pub name: String,
    /// Absolute location of the profile directory
    pub path: PathBuf,
    pub is_default: bool,
    pub is_relative: bool,
    /// Install section that selects this profile as its default
    pub locked_to_install: Option<String>,
    /// Whether a browser currently holds the profile lock
    pub in_use: bool,
}

/// Find a profile directory by name
///
/// Lookup order:
/// 1. exact `Name=` match in profiles.ini
/// 2. for `"default"`: the default of an `[Install…]` section, then the
///    profile marked `Default=1`
/// 3. a directory named exactly `name`, or `<salt>.<name>`
pub fn find_profile_path(profile_name: &str, profiles_dir_opt: Option<&Path>) -> Result<PathBuf> {
    let profiles_dir = get_profiles_directory(profiles_dir_opt)?;
    let profiles_ini = profiles_dir.join("profiles.ini");

    if profiles_ini.exists() {
        match read_ini(&profiles_ini) {
            Ok(ini) => {
                let profiles = ini_profiles(&ini);

                if let Some(profile) = profiles.iter().find(|p| p.name == profile_name) {
                    let full_path = profile.full_path(&profiles_dir);
                    if full_path.exists() {
                        return Ok(full_path);
                    }
                }

                if profile_name == "default" {
                    if let Some(path) = default_profile(&ini, &profiles, &profiles_dir) {
                        return Ok(path);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable profiles.ini, scanning directory");
            }
        }
    }

    scan_profiles_directory(&profiles_dir, profile_name)
}

fn read_ini(ini_path: &Path) -> Result<Ini> {
    let content = std::fs::read_to_string(ini_path)?;
    let mut ini = Ini::new();
    ini.read(content).map_err(Error::ProfilesIniParse)?;
    Ok(ini)
}

/// `[ProfileN]` sections; configparser lowercases section names
fn ini_profiles(ini: &Ini) -> Vec<IniProfile> {
    let mut profiles = Vec::new();

    for sec_name in ini.sections() {
        if !sec_name.starts_with("profile") {
            continue;
        }
        let name = ini.get(&sec_name, "Name").unwrap_or_default();
        let path = ini.get(&sec_name, "Path").unwrap_or_default();
        let is_relative = ini
            .getuint(&sec_name, "IsRelative")
            .ok()
            .flatten()
            .unwrap_or(1)
            == 1;
        let is_default = ini
            .getuint(&sec_name, "Default")
            .ok()
            .flatten()
            .unwrap_or(0)
            == 1;

        if !name.is_empty() && !path.is_empty() {
            profiles.push(IniProfile {
                name,
                path: PathBuf::from(path),
                is_relative,
                is_default,
            });
        }
    }

    profiles.sort_by(|a, b| a.name.cmp(&b.name));
    profiles
}

/// Install sections (`[Install<hash>]` and older bare-hash sections) mapped
/// to the profile path each one defaults to
fn ini_installs(ini: &Ini) -> HashMap<String, String> {
    ini.sections()
        .into_iter()
        .filter(|sec| !sec.starts_with("profile") && sec != "general")
        .filter_map(|sec| {
            let default = ini.get(&sec, "Default")?;
            let hash = sec.strip_prefix("install").unwrap_or(&sec).to_uppercase();
            Some((hash, default))
        })
        .collect()
}

fn default_profile(ini: &Ini, profiles: &[IniProfile], profiles_dir: &Path) -> Option<PathBuf> {
    let mut install_defaults: Vec<String> = ini_installs(ini).into_values().collect();
    install_defaults.sort();

    let from_install = install_defaults.iter().find_map(|default_path| {
        let full_path = match profiles
            .iter()
            .find(|p| p.path.to_string_lossy() == default_path.as_str())
        {
            Some(profile) => profile.full_path(profiles_dir),
            None => profiles_dir.join(default_path),
        };
        full_path.exists().then_some(full_path)
    });

    from_install.or_else(|| {
        profiles
            .iter()
            .filter(|p| p.is_default)
            .map(|p| p.full_path(profiles_dir))
            .find(|path| path.exists())
    })
}

/// Match directory names: exact, then `<salt>.<name>`
fn scan_profiles_directory(profiles_dir: &Path, profile_name: &str) -> Result<PathBuf> {
    let mut candidates = Vec::new();
    for dir in [profiles_dir.to_path_buf(), profiles_dir.join("Profiles")] {
        if dir.is_dir() {
            collect_matches(&dir, profile_name, &mut candidates)?;
        }
    }

    if let Some(exact) = candidates
        .iter()
        .find(|p| p.file_name().and_then(|s| s.to_str()) == Some(profile_name))
    {
        return Ok(exact.clone());
    }

    match candidates.len() {
        0 => Err(Error::ProfileNotFound {
            name: profile_name.to_string(),
            directory: profiles_dir.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(Error::AmbiguousProfile {
            name: profile_name.to_string(),
            candidates: candidates
                .iter()
                .filter_map(|p| p.file_name().and_then(|s| s.to_str()))
                .map(str::to_string)
                .collect(),
        }),
    }
}

fn collect_matches(dir: &Path, profile_name: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    let suffix = format!(".{}", profile_name);
    let mut matches: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .filter(|path| {
            let dir_name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
            dir_name == profile_name || dir_name.ends_with(&suffix)
        })
        .collect();
    matches.sort();
    out.extend(matches);
    Ok(())
}

/// List all profiles recorded in profiles.ini
pub fn list_profiles(profiles_dir_opt: Option<&Path>) -> Result<Vec<ProfileInfo>> {
    let profiles_dir = get_profiles_directory(profiles_dir_opt)?;
    let profiles_ini = profiles_dir.join("profiles.ini");

    if !profiles_ini.exists() {
        return Err(Error::ProfilesIniParse(format!(
            "profiles.ini not found at {}",
            profiles_ini.display()
        )));
    }

    let ini = read_ini(&profiles_ini)?;
    let installs = ini_installs(&ini);

    Ok(ini_profiles(&ini)
        .into_iter()
        .map(|p| {
            let path_string = p.path.to_string_lossy().to_string();
            let locked_to_install = installs
                .iter()
                .filter(|(_, default_path)| **default_path == path_string)
                .map(|(hash, _)| hash.clone())
                .min();
            let path = p.full_path(&profiles_dir);
            ProfileInfo {
                in_use: is_profile_in_use(&path),
                name: p.name,
                path,
                is_default: p.is_default,
                is_relative: p.is_relative,
                locked_to_install,
            }
        })
        .collect())
}

/// Get the profiles directory path from a parameter, env var, or auto-detection
///
/// Priority:
/// 1. Path passed in (from the CLI)
/// 2. `MOZ_PROFILES_DIR` environment variable
/// 3. Platform default
pub fn get_profiles_directory(manual_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = manual_path {
        return validate_profiles_dir(path);
    }

    if let Ok(env_path) = std::env::var(PROFILES_DIR_ENV) {
        return validate_profiles_dir(Path::new(&env_path));
    }

    validate_profiles_dir(&auto_detect_profiles_directory()?)
}

fn validate_profiles_dir(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(Error::InvalidProfileDirectory(format!(
            "{} does not exist",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(Error::InvalidProfileDirectory(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

fn auto_detect_profiles_directory() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").map_err(|_| {
            Error::InvalidProfileDirectory("HOME environment variable not set".to_string())
        })?;
        Ok(PathBuf::from(home).join(".mozilla/firefox"))
    }

    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME").map_err(|_| {
            Error::InvalidProfileDirectory("HOME environment variable not set".to_string())
        })?;
        Ok(PathBuf::from(home).join("Library/Application Support/Firefox"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA").map_err(|_| {
            Error::InvalidProfileDirectory("APPDATA environment variable not set".to_string())
        })?;
        Ok(PathBuf::from(appdata).join("Mozilla/Firefox"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        Err(Error::InvalidProfileDirectory(
            "no default profiles directory on this platform".to_string(),
        ))
    }
}

/// Get the path to prefs.js for a given profile
pub fn get_prefs_path(profile_path: &Path) -> PathBuf {
    profile_path.join(crate::scan::PREFS_FILE_NAME)
}

/// Whether a running browser holds this profile
///
/// The browser rewrites prefs.js when it exits, so edits made meanwhile are
/// lost. On unix the lock is a `lock` symlink that only exists while the
/// browser runs; on Windows it is `parent.lock`.
pub fn is_profile_in_use(profile_path: &Path) -> bool {
    #[cfg(unix)]
    {
        profile_path.join("lock").symlink_metadata().is_ok()
    }

    #[cfg(not(unix))]
    {
        profile_path.join("parent.lock").exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PROFILES_INI: &str = r#"
[General]
StartWithLastProfile=1
Version=2

[Profile1]
Name=KodachiBrowserLight
IsRelative=1
Path=y19yqyp3.KodachiBrowserLight

[Profile0]
Name=KodachiBrowserGhacks
IsRelative=1
Path=2083wll8.KodachiBrowserGhacks
Default=1

[Install4F96D1932A9F858E]
Default=y19yqyp3.KodachiBrowserLight
Locked=1
"#;

    fn fixture_dir(with_ini: bool) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("2083wll8.KodachiBrowserGhacks")).unwrap();
        fs::create_dir(dir.path().join("y19yqyp3.KodachiBrowserLight")).unwrap();
        if with_ini {
            fs::write(dir.path().join("profiles.ini"), PROFILES_INI).unwrap();
        }
        dir
    }

    #[test]
    fn test_get_prefs_path() {
        let profile_path = PathBuf::from("/home/kodachi/.mozilla/firefox/2083wll8.KodachiBrowserGhacks");
        assert_eq!(
            get_prefs_path(&profile_path),
            PathBuf::from("/home/kodachi/.mozilla/firefox/2083wll8.KodachiBrowserGhacks/prefs.js")
        );
    }

    #[test]
    fn test_list_profiles() {
        let dir = fixture_dir(true);
        let profiles = list_profiles(Some(dir.path())).unwrap();
        assert_eq!(profiles.len(), 2);

        let ghacks = &profiles[0];
        assert_eq!(ghacks.name, "KodachiBrowserGhacks");
        assert!(ghacks.is_default);
        assert_eq!(ghacks.path, dir.path().join("2083wll8.KodachiBrowserGhacks"));
        assert_eq!(ghacks.locked_to_install, None);
        assert!(!ghacks.in_use);

        let light = &profiles[1];
        assert_eq!(
            light.locked_to_install.as_deref(),
            Some("4F96D1932A9F858E")
        );
    }

    #[test]
    fn test_find_by_ini_name() {
        let dir = fixture_dir(true);
        let path = find_profile_path("KodachiBrowserGhacks", Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("2083wll8.KodachiBrowserGhacks"));
    }

    #[test]
    fn test_find_default_prefers_install_section() {
        let dir = fixture_dir(true);
        let path = find_profile_path("default", Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("y19yqyp3.KodachiBrowserLight"));
    }

    #[test]
    fn test_find_default_without_install_section() {
        let dir = fixture_dir(false);
        let ini: String = PROFILES_INI
            .split("[Install")
            .next()
            .unwrap()
            .to_string();
        fs::write(dir.path().join("profiles.ini"), ini).unwrap();
        let path = find_profile_path("default", Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("2083wll8.KodachiBrowserGhacks"));
    }

    #[test]
    fn test_find_by_directory_suffix_without_ini() {
        let dir = fixture_dir(false);
        let path = find_profile_path("KodachiBrowserLight", Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("y19yqyp3.KodachiBrowserLight"));

        let exact = find_profile_path("2083wll8.KodachiBrowserGhacks", Some(dir.path())).unwrap();
        assert_eq!(exact, dir.path().join("2083wll8.KodachiBrowserGhacks"));
    }

    #[test]
    fn test_find_ambiguous_and_missing() {
        let dir = fixture_dir(false);
        fs::create_dir(dir.path().join("abcdefgh.KodachiBrowserLight")).unwrap();

        match find_profile_path("KodachiBrowserLight", Some(dir.path())) {
            Err(Error::AmbiguousProfile { candidates, .. }) => assert_eq!(candidates.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            find_profile_path("nope", Some(dir.path())),
            Err(Error::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn test_list_profiles_requires_ini() {
        let dir = fixture_dir(false);
        assert!(matches!(
            list_profiles(Some(dir.path())),
            Err(Error::ProfilesIniParse(_))
        ));
    }

    #[test]
    fn test_profiles_dir_validation() {
        let missing = get_profiles_directory(Some(Path::new("/nonexistent/path")));
        assert!(missing.unwrap_err().to_string().contains("does not exist"));

        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let file = get_profiles_directory(Some(temp_file.path()));
        assert!(file.unwrap_err().to_string().contains("not a directory"));

        let temp_dir = TempDir::new().unwrap();
        assert_eq!(
            get_profiles_directory(Some(temp_dir.path())).unwrap(),
            temp_dir.path()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_is_profile_in_use_dangling_lock() {
        let dir = TempDir::new().unwrap();
        assert!(!is_profile_in_use(dir.path()));
        // The browser's lock is a symlink to "<ip>:+<pid>", which never resolves
        std::os::unix::fs::symlink("127.0.1.1:+4242", dir.path().join("lock")).unwrap();
        assert!(is_profile_in_use(dir.path()));
    }
}
