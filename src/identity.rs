//! Resolution of the configured primary player ("me") against the players
//! present in a replay. Platform ids win over display names; an ambiguous or
//! absent identity resolves to nothing rather than guessing.

use crate::config::IdentityConfig;
use crate::header::PlayerInfo;

/// Returns the canonical id of the configured player if exactly one of the
/// configured platform ids, or else exactly one casefolded display name,
/// matches a player in the replay.
pub fn resolve_me<'a>(
    identity: &IdentityConfig,
    players: &'a [PlayerInfo],
) -> Option<&'a PlayerInfo> {
    for configured in &identity.platform_ids {
        let mut matches = players
            .iter()
            .filter(|p| p.canonical_id.eq_ignore_ascii_case(configured));
        if let Some(found) = matches.next() {
            if matches.next().is_none() {
                return Some(found);
            }
            return None;
        }
    }

    for configured in &identity.display_names {
        let folded = casefold(configured);
        let mut matches = players
            .iter()
            .filter(|p| casefold(&p.display_name) == folded);
        if let Some(found) = matches.next() {
            if matches.next().is_none() {
                return Some(found);
            }
            return None;
        }
    }

    None
}

/// True when the resolved "me" matches one of the configured exclusions.
pub fn is_excluded(me: &PlayerInfo, excluded_names: &[String]) -> bool {
    excluded_names
        .iter()
        .any(|n| casefold(n) == casefold(&me.display_name))
}

fn casefold(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Sanitize a display name into the `slug:` fallback id space.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = false;
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash && !slug.is_empty() {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("unknown");
    }
    slug
}
