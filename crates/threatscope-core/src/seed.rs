//! Bundled starter dataset for the catalog.

use crate::actor::{ActorStatus, ActorType, ThreatActor};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// A small, fully populated sample the list view can render before any
/// extraction or import has happened.
#[must_use]
pub fn default_actors() -> Vec<ThreatActor> {
    let mut vice = ThreatActor::new("VICE SPIDER")
        .with_type(ActorType::ECrime)
        .with_status(ActorStatus::Active)
        .with_aliases(strings(&["Vice Society", "DEV-0832", "Vanilla Tempest"]));
    vice.first_seen = "May 2021".into();
    vice.last_seen = "Aug 2025".into();
    vice.motivation = "Criminal".into();
    vice.description = "VICE SPIDER is an eCrime adversary that has conducted ransomware \
                        operations since at least April 2021, moving from the commodity \
                        Zeppelin ransomware through LockBit and RedAlertLocker before \
                        adopting the private Rhysida ransomware as their main payload."
        .into();
    vice.malware_used = strings(&["Zeppelin", "Rhysida", "DeathKitty", "LockBit", "SystemBC"]);
    vice.target_industries = strings(&[
        "Local Government",
        "Academic",
        "Healthcare",
        "Manufacturing",
    ]);
    vice.target_countries = strings(&["United States", "United Kingdom", "Germany", "Spain"]);
    vice.techniques = strings(&["T1021.001", "T1059.001", "T1486", "T1566.001"]);
    vice.intel_reports = 24;
    vice.vulnerabilities = 31;

    let mut punk = ThreatActor::new("PUNK SPIDER")
        .with_type(ActorType::ECrime)
        .with_status(ActorStatus::Active)
        .with_aliases(strings(&["Akira", "Storm-1567", "REDBIKE"]));
    punk.first_seen = "Mar 2023".into();
    punk.last_seen = "Aug 2025".into();
    punk.motivation = "Criminal".into();
    punk.description = "PUNK SPIDER is a financially motivated group operating the Akira \
                        ransomware, active since early 2023 and targeting a broad range of \
                        industries through opportunistic attacks."
        .into();
    punk.malware_used = strings(&["Akira Ransomware", "Cobalt Strike", "SystemBC"]);
    punk.target_industries = strings(&[
        "Healthcare",
        "Manufacturing",
        "Education",
        "Financial Services",
    ]);
    punk.target_countries = strings(&["United States", "Canada", "United Kingdom", "Japan"]);
    punk.techniques = strings(&["T1486", "T1059.001", "T1021.001", "T1082"]);
    punk.intel_reports = 24;
    punk.vulnerabilities = 32;

    let mut traveling = ThreatActor::new("TRAVELING SPIDER")
        .with_type(ActorType::ECrime)
        .with_status(ActorStatus::Active)
        .with_aliases(strings(&["Nemty", "Nefilim", "Nokoyawa", "INC", "Lynx"]));
    traveling.origin = "Eastern Europe".into();
    traveling.first_seen = "Feb 2019".into();
    traveling.last_seen = "Aug 2025".into();
    traveling.motivation = "Criminal".into();
    traveling.description = "TRAVELING SPIDER is a prolific ransomware-as-a-service operation \
                             that has cycled through multiple ransomware families, adapting \
                             payloads to the threat landscape."
        .into();
    traveling.malware_used = strings(&["Nemty", "Nefilim", "Nokoyawa", "INC Ransomware", "Lynx"]);
    traveling.target_industries = strings(&[
        "Healthcare",
        "Manufacturing",
        "Technology",
        "Government",
    ]);
    traveling.target_countries = strings(&["United States", "Canada", "United Kingdom"]);
    traveling.techniques = strings(&["T1486", "T1059.001", "T1047", "T1082"]);
    traveling.intel_reports = 9;
    traveling.vulnerabilities = 28;

    vec![vice, punk, traveling]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::slug;

    #[test]
    fn test_seed_records_are_valid_with_slug_ids() {
        let actors = default_actors();

        assert!(!actors.is_empty());
        for actor in &actors {
            assert!(actor.is_valid());
            assert_eq!(actor.id, slug(&actor.name));
        }
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let actors = default_actors();
        let ids: std::collections::HashSet<_> = actors.iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids.len(), actors.len());
    }

    #[test]
    fn test_seed_records_fully_populated() {
        for actor in default_actors() {
            assert!(!actor.aliases.is_empty());
            assert!(!actor.malware_used.is_empty());
            assert!(!actor.techniques.is_empty());
            assert!(!actor.description.is_empty());
            assert_eq!(actor.status, ActorStatus::Active);
        }
    }
}
