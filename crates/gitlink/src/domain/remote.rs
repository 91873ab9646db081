//! Git remote URL parsing.
//!
//! Three URL shapes are recognized, tried in this order:
//!
//! - `http(s)://<domain>/<owner...>/<repo>[.git]`
//! - `git@<domain>:<owner...>/<repo>[.git]`
//! - `ssh://git@<domain>/<owner...>/<repo>[.git]`
//!
//! Everything between the domain and the last path segment becomes the owner,
//! so nested groups such as `group/subgroup` survive intact.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::model::RemoteInfo;

static REMOTE_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"^https?://([^/]+)/(.+?)/([^/]+?)(?:\.git)?$").expect("valid https pattern"),
        Regex::new(r"^git@([^:]+):(.+?)/([^/]+?)(?:\.git)?$").expect("valid scp pattern"),
        Regex::new(r"^ssh://git@([^/]+)/(.+?)/([^/]+?)(?:\.git)?$").expect("valid ssh pattern"),
    ]
});

/// Parse a remote URL into its domain, owner path, and repository name.
///
/// Returns `None` when no supported shape matches; callers report that as an
/// unsupported remote rather than an error in parsing.
pub fn parse_remote_url(remote_url: &str) -> Option<RemoteInfo> {
    let remote_url = remote_url.trim();

    REMOTE_PATTERNS.iter().find_map(|pattern| {
        let captures = pattern.captures(remote_url)?;
        Some(RemoteInfo::new(&captures[1], &captures[2], &captures[3]))
    })
}
