use crate::error::{Error, Result};
use crate::types::PrefEntry;
use glob::Pattern;

/// Query preferences by glob patterns (OR logic)
///
/// Returns the entries whose key matches any of the patterns, in input order.
///
/// ```rust
/// use ffprefs::{parse_prefs_js, query_preferences};
///
/// let prefs = parse_prefs_js(r#"
///     user_pref("network.proxy.socks_remote_dns", true);
///     user_pref("network.dns.disablePrefetch", true);
///     user_pref("webgl.disabled", true);
/// "#)?;
///
/// let network = query_preferences(&prefs, &["network.*"])?;
/// assert_eq!(network.len(), 2);
/// # Ok::<(), ffprefs::Error>(())
/// ```
pub fn query_preferences<'a, I>(entries: I, patterns: &[&str]) -> Result<Vec<&'a PrefEntry>>
where
    I: IntoIterator<Item = &'a PrefEntry>,
{
    // Compile all patterns first to fail fast on invalid patterns
    let compiled_patterns: Vec<Pattern> = patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::InvalidGlobPattern(format!("'{}': {}", p, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(entries
        .into_iter()
        .filter(|entry| {
            compiled_patterns
                .iter()
                .any(|pattern| pattern.matches(&entry.key))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entries() -> Vec<PrefEntry> {
        vec![
            PrefEntry::new("network.proxy.type", 1),
            PrefEntry::new("network.cookie.cookieBehavior", 1),
            PrefEntry::new("browser.startup.homepage", "about:blank"),
            PrefEntry::new("browser.search.region", "DE"),
            PrefEntry::new("privacy.resistFingerprinting", true),
        ]
    }

    fn keys(found: &[&PrefEntry]) -> Vec<String> {
        found.iter().map(|e| e.key.clone()).collect()
    }

    #[test]
    fn test_query_single_pattern() {
        let entries = create_test_entries();
        let found = query_preferences(&entries, &["network.*"]).unwrap();
        assert_eq!(
            keys(&found),
            vec!["network.proxy.type", "network.cookie.cookieBehavior"]
        );
    }

    #[test]
    fn test_query_multiple_patterns_or_logic() {
        let entries = create_test_entries();
        let found =
            query_preferences(&entries, &["network.*", "privacy.resistFingerprinting"]).unwrap();
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_query_middle_wildcard() {
        let entries = create_test_entries();
        let found = query_preferences(&entries, &["browser.*.region"]).unwrap();
        assert_eq!(keys(&found), vec!["browser.search.region"]);
    }

    #[test]
    fn test_query_no_matches() {
        let entries = create_test_entries();
        assert!(query_preferences(&entries, &["nonexistent.*"])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_query_no_patterns_matches_nothing() {
        let entries = create_test_entries();
        assert!(query_preferences(&entries, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_query_invalid_pattern() {
        let entries = create_test_entries();
        assert!(matches!(
            query_preferences(&entries, &["[invalid"]),
            Err(Error::InvalidGlobPattern(_))
        ));
    }
}
