//! Short descriptions of privacy and hardening preferences
//!
//! Hardened profiles are mostly made of a few dozen switches that are hard to
//! read by name alone. The table below covers the common ones; everything else
//! gets no explanation.

use std::collections::HashMap;
use std::sync::OnceLock;

static PREF_EXPLANATIONS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

/// Look up the explanation for a preference key
pub fn explain(key: &str) -> Option<&'static str> {
    PREF_EXPLANATIONS
        .get_or_init(|| {
            HashMap::from([
                (
                    "javascript.enabled",
                    "Master switch for JavaScript in web content. false disables all page scripts \
                     and breaks most interactive sites.",
                ),
                (
                    "privacy.resistFingerprinting",
                    "Makes the browser report uniform values for time zone, screen size, fonts, \
                     user agent and other fingerprintable properties.",
                ),
                (
                    "privacy.resistFingerprinting.letterboxing",
                    "Rounds the content area to fixed size steps so window dimensions do not \
                     identify the user. Requires privacy.resistFingerprinting.",
                ),
                (
                    "privacy.resistFingerprinting.block_mozAddonManager",
                    "Hides the add-on manager API from Mozilla web pages so they cannot list \
                     installed extensions.",
                ),
                (
                    "privacy.trackingprotection.enabled",
                    "Blocks requests to known trackers in all windows, not only private ones.",
                ),
                (
                    "privacy.donottrackheader.enabled",
                    "Sends the DNT: 1 header with every request.",
                ),
                (
                    "privacy.sanitize.sanitizeOnShutdown",
                    "Clears the data selected under privacy.clearOnShutdown.* when the browser exits.",
                ),
                (
                    "privacy.firstparty.isolate",
                    "First-party isolation: cookies, cache and other state are keyed by the \
                     top-level site, which stops cross-site tracking through shared storage.",
                ),
                (
                    "privacy.userContext.enabled",
                    "Enables container tabs, which keep cookies and storage separate per container.",
                ),
                (
                    "webgl.disabled",
                    "Disables WebGL. Removes a large GPU fingerprinting surface and some attack \
                     surface; 3D content on pages stops working.",
                ),
                (
                    "media.peerconnection.enabled",
                    "Master switch for WebRTC. false prevents WebRTC from leaking local and public \
                     IP addresses, including behind a proxy or VPN.",
                ),
                (
                    "media.peerconnection.ice.default_address_only",
                    "Limits WebRTC ICE candidates to the default route instead of every local \
                     interface.",
                ),
                (
                    "media.peerconnection.ice.no_host",
                    "Stops WebRTC from offering host candidates that contain the local IP address.",
                ),
                (
                    "media.navigator.enabled",
                    "Exposes navigator.mediaDevices to pages. false hides camera and microphone \
                     enumeration.",
                ),
                (
                    "network.proxy.socks_remote_dns",
                    "Resolves host names through the SOCKS proxy instead of the local resolver, \
                     which prevents DNS leaks when routing through Tor.",
                ),
                (
                    "network.proxy.failover_direct",
                    "When false, a failing proxy does not fall back to a direct connection.",
                ),
                (
                    "network.proxy.type",
                    "Proxy mode: 0 direct, 1 manual, 2 automatic (PAC), 4 auto-detect, 5 system.",
                ),
                (
                    "network.dns.disablePrefetch",
                    "Stops the browser from resolving host names of links before they are clicked.",
                ),
                (
                    "network.dns.disableIPv6",
                    "Disables IPv6 name resolution, which can leak around IPv4-only tunnels.",
                ),
                (
                    "network.prefetch-next",
                    "Controls link prefetching of pages marked rel=next or rel=prefetch.",
                ),
                (
                    "network.predictor.enabled",
                    "Network predictor that opens speculative connections to sites the user may \
                     visit next.",
                ),
                (
                    "network.http.speculative-parallel-limit",
                    "Number of speculative connections opened when hovering links. 0 disables them.",
                ),
                (
                    "network.http.referer.XOriginPolicy",
                    "When to send a Referer header cross-origin: 0 always, 1 same base domain, \
                     2 same host only.",
                ),
                (
                    "network.IDN_show_punycode",
                    "Shows internationalized domain names as punycode, exposing look-alike \
                     phishing domains.",
                ),
                (
                    "network.captive-portal-service.enabled",
                    "Background checks for captive portals, which contact a Mozilla endpoint.",
                ),
                (
                    "network.cookie.cookieBehavior",
                    "Cookie acceptance: 0 all, 1 first-party only, 2 none, 3 visited sites, \
                     4 block trackers, 5 total cookie protection.",
                ),
                (
                    "geo.enabled",
                    "Master switch for the Geolocation API.",
                ),
                (
                    "geo.provider.network.url",
                    "Location service queried for network-based geolocation.",
                ),
                (
                    "beacon.enabled",
                    "navigator.sendBeacon, used by sites to send analytics as a page unloads.",
                ),
                (
                    "dom.serviceWorkers.enabled",
                    "Service workers, which let sites run background code and cache content \
                     beyond the page lifetime.",
                ),
                (
                    "dom.push.enabled",
                    "Web push notifications, which require a persistent connection to a push \
                     server.",
                ),
                (
                    "dom.security.https_only_mode",
                    "Upgrades every connection to HTTPS and warns before loading plain HTTP.",
                ),
                (
                    "browser.cache.disk.enable",
                    "Disk cache. false keeps the cache in memory only, leaving no browsing traces \
                     on disk.",
                ),
                (
                    "browser.sessionstore.privacy_level",
                    "Which sites get form data and scroll positions saved in the session: \
                     0 all, 1 unencrypted only, 2 none.",
                ),
                (
                    "browser.safebrowsing.downloads.remote.enabled",
                    "Sends metadata about downloaded files to Google Safe Browsing for checking.",
                ),
                (
                    "browser.search.suggest.enabled",
                    "Sends what is typed in the search and address bars to the search engine for \
                     suggestions.",
                ),
                (
                    "browser.startup.homepage",
                    "Page or pages opened at startup and by the Home button, separated by |.",
                ),
                (
                    "keyword.enabled",
                    "Sends text that is not a URL from the address bar to the default search engine.",
                ),
                (
                    "datareporting.healthreport.uploadEnabled",
                    "Uploads technical and interaction data to Mozilla.",
                ),
                (
                    "toolkit.telemetry.enabled",
                    "Extended telemetry collection.",
                ),
                (
                    "app.normandy.enabled",
                    "Normandy, the remote service that can change preferences and run studies.",
                ),
                (
                    "app.shield.optoutstudies.enabled",
                    "Allows Mozilla to install and run studies without asking.",
                ),
                (
                    "security.OCSP.require",
                    "Treats an unreachable OCSP responder as a certificate failure (hard-fail).",
                ),
                (
                    "security.cert_pinning.enforcement_level",
                    "Public key pinning: 0 off, 1 allow user MITM (antivirus), 2 strict.",
                ),
                (
                    "signon.rememberSignons",
                    "Offers to save passwords in the built-in password manager.",
                ),
                (
                    "_user.js.parrot",
                    "Marker written by ghacks-style user.js files; its value shows how far the \
                     file was applied before an error stopped it.",
                ),
            ])
        })
        .get(key)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys() {
        assert!(explain("privacy.resistFingerprinting")
            .unwrap()
            .contains("fingerprint"));
        assert!(explain("network.proxy.socks_remote_dns")
            .unwrap()
            .contains("SOCKS"));
    }

    #[test]
    fn test_unknown_key() {
        assert!(explain("browser.laterrun.bookkeeping.sessionCount").is_none());
        assert!(explain("").is_none());
    }
}
