//! Field normalization shared by both extraction pipelines.
//!
//! Pure functions: list splitting, keyword-based type and status mapping,
//! and identifier slugging. Every raw substring matched by a pattern in
//! the structural or freeform extractor passes through here before it
//! lands in a record field.

use crate::actor::{ActorStatus, ActorType};

/// Split a raw captured span on commas, semicolons, or pipes; trim each
/// piece and drop empties, preserving order.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', ';', '|'])
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}

/// Map free text onto the closed actor-type enumeration by
/// case-insensitive substring, in fixed priority order. Unmatched input
/// falls back to eCrime.
pub fn map_type(raw: &str) -> ActorType {
    let lower = raw.to_lowercase();
    if lower.contains("apt") || lower.contains("advanced") {
        ActorType::Apt
    } else if lower.contains("ransom") {
        ActorType::Ransomware
    } else if lower.contains("crime") || lower.contains("criminal") {
        ActorType::ECrime
    } else if lower.contains("nation") || lower.contains("state") {
        ActorType::NationState
    } else if lower.contains("hack") || lower.contains("activist") {
        ActorType::Hacktivist
    } else {
        ActorType::ECrime
    }
}

/// Map free text onto a status. "inactive" and "dormant" are checked
/// before "active" so that "inactive" does not satisfy the substring
/// test for Active.
pub fn map_status(raw: &str) -> ActorStatus {
    let lower = raw.to_lowercase();
    if lower.contains("inactive") || lower.contains("dormant") {
        ActorStatus::Inactive
    } else if lower.contains("active") {
        ActorStatus::Active
    } else {
        ActorStatus::Unknown
    }
}

/// Derive an identifier slug from a display name: lowercase, every run
/// of non-alphanumeric characters collapsed to one hyphen, no leading or
/// trailing hyphen. Idempotent, and deterministic per name; distinct
/// names may still collide.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("Zeppelin, Rhysida; SystemBC | LockBit"),
            vec!["Zeppelin", "Rhysida", "SystemBC", "LockBit"]
        );
        assert_eq!(split_list("  , ; "), Vec::<String>::new());
        assert_eq!(split_list(""), Vec::<String>::new());
    }

    #[test]
    fn test_map_type_priority() {
        assert_eq!(map_type("apt"), ActorType::Apt);
        assert_eq!(map_type("Advanced Persistent Threat"), ActorType::Apt);
        assert_eq!(map_type("Ransomware operator"), ActorType::Ransomware);
        assert_eq!(map_type("organized crime"), ActorType::ECrime);
        assert_eq!(map_type("nation-state"), ActorType::NationState);
        assert_eq!(map_type("hacktivist collective"), ActorType::Hacktivist);
    }

    #[test]
    fn test_map_type_default() {
        assert_eq!(map_type("something-unrecognized"), ActorType::ECrime);
        assert_eq!(map_type(""), ActorType::ECrime);
    }

    #[test]
    fn test_map_status() {
        assert_eq!(map_status("Currently Active"), ActorStatus::Active);
        assert_eq!(map_status("inactive since 2020"), ActorStatus::Inactive);
        assert_eq!(map_status("dormant"), ActorStatus::Inactive);
        assert_eq!(map_status("unclear"), ActorStatus::Unknown);
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("APT29"), "apt29");
        assert_eq!(slug("VICE SPIDER"), "vice-spider");
        assert_eq!(slug("  Fancy--Bear!! "), "fancy-bear");
        assert_eq!(slug("___"), "");
    }

    #[test]
    fn test_slug_idempotent() {
        let once = slug("Lazarus Group (DPRK)");
        assert_eq!(slug(&once), once);
    }
}
