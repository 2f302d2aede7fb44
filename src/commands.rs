use crate::cli::{DiffOutput, OutputType, Source, ValueType};
use anyhow::{bail, Context};
use ffprefs::{
    diff_prefs, find_prefs_files, find_profile_path, get_prefs_path, is_profile_in_use,
    list_profiles as list_profiles_impl, validate_prefs_js, write_prefs, PrefEntry, PrefValue,
    PrefsFile, Severity,
};
use std::path::{Path, PathBuf};

/// prefs.js location resolved from `--file` / `--profile`
#[derive(Debug)]
struct Target {
    prefs_path: PathBuf,
    profile_dir: Option<PathBuf>,
}

fn resolve(source: &Source, profiles_dir: Option<&Path>) -> anyhow::Result<Target> {
    if let Some(file) = &source.file {
        return Ok(Target {
            prefs_path: file.clone(),
            profile_dir: file.parent().map(Path::to_path_buf),
        });
    }

    let profile_name = source.profile.as_deref().unwrap_or("default");
    let profile_dir = find_profile_path(profile_name, profiles_dir).with_context(|| {
        format!(
            "Failed to find profile '{}'. Use 'ffprefs profile' to see available profiles, \
             or pass --file",
            profile_name
        )
    })?;

    Ok(Target {
        prefs_path: get_prefs_path(&profile_dir),
        profile_dir: Some(profile_dir),
    })
}

fn load(path: &Path) -> anyhow::Result<PrefsFile> {
    PrefsFile::load(path).with_context(|| format!("Failed to read prefs.js at {}", path.display()))
}

/// Refuse to edit a profile the browser holds, unless forced
fn ensure_not_in_use(target: &Target, force: bool) -> anyhow::Result<()> {
    let Some(profile_dir) = &target.profile_dir else {
        return Ok(());
    };
    if !is_profile_in_use(profile_dir) {
        return Ok(());
    }
    if force {
        tracing::warn!(
            profile = %profile_dir.display(),
            "profile is in use; the browser will overwrite this change when it exits"
        );
        return Ok(());
    }
    bail!(
        "Profile {} is in use by a running browser, which rewrites prefs.js on exit. \
         Close the browser first or pass --force.",
        profile_dir.display()
    )
}

/// List all profiles as JSON
pub fn list_profiles(profiles_dir: Option<&Path>) -> anyhow::Result<()> {
    let profiles = list_profiles_impl(profiles_dir).context("Failed to list profiles")?;
    println!("{}", serde_json::to_string_pretty(&profiles)?);
    Ok(())
}

/// Print a snapshot, optionally filtered
pub fn show(
    source: &Source,
    profiles_dir: Option<&Path>,
    query: &[String],
    output: OutputType,
) -> anyhow::Result<()> {
    let target = resolve(source, profiles_dir)?;
    let prefs = load(&target.prefs_path)?;
    print!("{}", render(&prefs, query, output)?);
    Ok(())
}

fn render(prefs: &PrefsFile, query: &[String], output: OutputType) -> anyhow::Result<String> {
    let entries: Vec<&PrefEntry> = if query.is_empty() {
        prefs.iter().collect()
    } else {
        let patterns: Vec<&str> = query.iter().map(String::as_str).collect();
        prefs.query(&patterns).context("Failed to apply query")?
    };

    let text = match output {
        OutputType::JsonObject => {
            let mut object = serde_json::Map::new();
            for entry in &entries {
                object.insert(entry.key.clone(), serde_json::to_value(&entry.value)?);
            }
            format!("{}\n", serde_json::to_string_pretty(&object)?)
        }
        OutputType::JsonArray => format!("{}\n", serde_json::to_string_pretty(&entries)?),
        OutputType::Prefs => write_prefs(prefs.header(), entries),
    };
    Ok(text)
}

/// Print a single preference value in raw format (no JSON wrapping)
pub fn get_value(
    source: &Source,
    profiles_dir: Option<&Path>,
    key: &str,
    json: bool,
) -> anyhow::Result<()> {
    let target = resolve(source, profiles_dir)?;
    let prefs = load(&target.prefs_path)?;
    println!("{}", raw_value(&prefs, key, json)?);
    Ok(())
}

fn raw_value(prefs: &PrefsFile, key: &str, json: bool) -> anyhow::Result<String> {
    if json {
        return match prefs.get_json(key)? {
            Some(value) => Ok(serde_json::to_string_pretty(&value)?),
            None => bail!("Preference '{}' not found", key),
        };
    }
    match prefs.get_value(key) {
        Some(PrefValue::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => bail!("Preference '{}' not found", key),
    }
}

/// Interpret a command-line value
pub fn parse_cli_value(raw: &str, value_type: ValueType) -> anyhow::Result<PrefValue> {
    let value = match value_type {
        ValueType::Auto => match raw {
            "true" => PrefValue::Bool(true),
            "false" => PrefValue::Bool(false),
            _ => raw
                .parse::<i32>()
                .map(PrefValue::Integer)
                .unwrap_or_else(|_| PrefValue::String(raw.to_string())),
        },
        ValueType::Bool => PrefValue::Bool(
            raw.parse()
                .with_context(|| format!("'{}' is not true or false", raw))?,
        ),
        ValueType::Int => PrefValue::Integer(
            raw.parse()
                .with_context(|| format!("'{}' is not a 32-bit integer", raw))?,
        ),
        ValueType::String => PrefValue::String(raw.to_string()),
    };
    Ok(value)
}

/// Set one preference and save
pub fn set_value(
    source: &Source,
    profiles_dir: Option<&Path>,
    key: &str,
    raw: &str,
    value_type: ValueType,
    force: bool,
) -> anyhow::Result<()> {
    let target = resolve(source, profiles_dir)?;
    ensure_not_in_use(&target, force)?;

    let value = parse_cli_value(raw, value_type)?;
    let mut prefs = if target.prefs_path.exists() {
        load(&target.prefs_path)?
    } else {
        tracing::info!(path = %target.prefs_path.display(), "creating new prefs.js");
        PrefsFile::new()
    };

    let previous = if force {
        prefs.set(key, value.clone())?
    } else {
        prefs
            .update(key, value.clone())
            .context("Use --force to change the type of an existing preference")?
    };
    prefs.save_checked(&target.prefs_path)?;

    match previous {
        Some(old) => tracing::info!(key, %old, new = %value, "updated preference"),
        None => tracing::info!(key, new = %value, "added preference"),
    }
    Ok(())
}

/// Remove one preference and save
pub fn unset_value(
    source: &Source,
    profiles_dir: Option<&Path>,
    key: &str,
    force: bool,
) -> anyhow::Result<()> {
    let target = resolve(source, profiles_dir)?;
    ensure_not_in_use(&target, force)?;

    let mut prefs = load(&target.prefs_path)?;
    if prefs.remove(key).is_none() {
        bail!("Preference '{}' not found", key);
    }
    prefs.save_checked(&target.prefs_path)?;
    tracing::info!(key, "removed preference");
    Ok(())
}

/// Validate a file; fails when any issue is an error
pub fn check(source: &Source, profiles_dir: Option<&Path>) -> anyhow::Result<()> {
    let target = resolve(source, profiles_dir)?;
    let path = &target.prefs_path;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let issues = validate_prefs_js(&content);
    for issue in &issues {
        let severity = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("{}:{}: {}: {}", path.display(), issue.line, severity, issue.message);
    }

    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    if errors > 0 {
        bail!("{} error(s) in {}", errors, path.display());
    }
    Ok(())
}

/// Rewrite a file canonically, or with `check_only` report whether it already is
pub fn format_file(
    source: &Source,
    profiles_dir: Option<&Path>,
    check_only: bool,
) -> anyhow::Result<()> {
    let target = resolve(source, profiles_dir)?;
    let path = &target.prefs_path;
    let original = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut prefs = load(path)?;

    if prefs.to_prefs_string() == original {
        tracing::debug!(path = %path.display(), "already canonical");
        return Ok(());
    }
    if check_only {
        bail!("{} is not in canonical form", path.display());
    }

    ensure_not_in_use(&target, false)?;
    prefs.save_checked(path)?;
    tracing::info!(path = %path.display(), "rewrote file");
    Ok(())
}

/// Compare two files
pub fn diff_files(old: &Path, new: &Path, output: DiffOutput) -> anyhow::Result<()> {
    let diff = diff_prefs(&load(old)?, &load(new)?);
    match output {
        DiffOutput::Text => print!("{}", diff),
        DiffOutput::Json => println!("{}", serde_json::to_string_pretty(&diff)?),
    }
    Ok(())
}

/// List prefs.js files below `root`
pub fn scan(root: &Path, max_depth: Option<usize>) -> anyhow::Result<()> {
    let found = find_prefs_files(root, max_depth)
        .with_context(|| format!("Failed to scan {}", root.display()))?;
    for path in found {
        println!("{}", path.display());
    }
    Ok(())
}
