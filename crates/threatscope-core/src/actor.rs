use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::extract::slug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorType {
    #[serde(rename = "APT")]
    Apt,
    Ransomware,
    #[serde(rename = "eCrime")]
    ECrime,
    #[serde(rename = "Nation State")]
    NationState,
    Hacktivist,
}

impl ActorType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apt => "APT",
            Self::Ransomware => "Ransomware",
            Self::ECrime => "eCrime",
            Self::NationState => "Nation State",
            Self::Hacktivist => "Hacktivist",
        }
    }
}

impl Default for ActorType {
    fn default() -> Self {
        Self::ECrime
    }
}

impl std::fmt::Display for ActorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActorType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APT" => Ok(Self::Apt),
            "Ransomware" => Ok(Self::Ransomware),
            "eCrime" => Ok(Self::ECrime),
            "Nation State" => Ok(Self::NationState),
            "Hacktivist" => Ok(Self::Hacktivist),
            _ => Err(crate::Error::InvalidActorType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorStatus {
    Active,
    Inactive,
    Unknown,
}

impl ActorStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Unknown => "Unknown",
        }
    }
}

impl Default for ActorStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for ActorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActorStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            "Unknown" => Ok(Self::Unknown),
            _ => Err(crate::Error::InvalidActorStatus(s.to_string())),
        }
    }
}

/// A catalog entry for one adversary group.
///
/// Serializes with the camelCase field names used by the catalog's JSON
/// interchange format, so records written by one tool round-trip through
/// the importer of another.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatActor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(rename = "type")]
    pub actor_type: ActorType,
    pub origin: String,
    pub first_seen: String,
    pub last_seen: String,
    pub motivation: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub malware_used: Vec<String>,
    #[serde(default)]
    pub target_industries: Vec<String>,
    #[serde(default)]
    pub target_countries: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    pub status: ActorStatus,
    pub intel_reports: u32,
    pub vulnerabilities: u32,
}

impl ThreatActor {
    /// Create a record with the given display name, a slug id derived
    /// from it, and every other field at its documented default.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: slug(&name),
            name,
            aliases: Vec::new(),
            actor_type: ActorType::default(),
            origin: "Unknown".into(),
            first_seen: "Unknown".into(),
            last_seen: "Unknown".into(),
            motivation: "Unknown".into(),
            description: String::new(),
            malware_used: Vec::new(),
            target_industries: Vec::new(),
            target_countries: Vec::new(),
            techniques: Vec::new(),
            status: ActorStatus::default(),
            intel_reports: filler_report_count(),
            vulnerabilities: filler_vulnerability_count(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, actor_type: ActorType) -> Self {
        self.actor_type = actor_type;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ActorStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Records without a display name are never emitted by the extractors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.id.is_empty()
    }
}

/// Placeholder report count for records whose source carries none.
/// Cosmetic filler, not telemetry; callers must not assert on it.
pub(crate) fn filler_report_count() -> u32 {
    rand::rng().random_range(1..=50)
}

pub(crate) fn filler_vulnerability_count() -> u32 {
    rand::rng().random_range(1..=100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_actor_defaults() {
        let actor = ThreatActor::new("APT29");

        assert_eq!(actor.id, "apt29");
        assert_eq!(actor.actor_type, ActorType::ECrime);
        assert_eq!(actor.status, ActorStatus::Unknown);
        assert_eq!(actor.origin, "Unknown");
        assert!(actor.description.is_empty());
        assert!(actor.is_valid());
        assert!((1..=50).contains(&actor.intel_reports));
        assert!((1..=100).contains(&actor.vulnerabilities));
    }

    #[test]
    fn test_actor_type_round_trip() {
        for ty in [
            ActorType::Apt,
            ActorType::Ransomware,
            ActorType::ECrime,
            ActorType::NationState,
            ActorType::Hacktivist,
        ] {
            assert_eq!(ActorType::from_str(ty.as_str()).unwrap(), ty);
        }
        assert!(ActorType::from_str("Botnet").is_err());
    }

    #[test]
    fn test_camel_case_serialization() {
        let actor = ThreatActor::new("Lazarus Group").with_type(ActorType::NationState);
        let json = serde_json::to_value(&actor).unwrap();

        assert_eq!(json["name"], "Lazarus Group");
        assert_eq!(json["type"], "Nation State");
        assert!(json.get("firstSeen").is_some());
        assert!(json.get("malwareUsed").is_some());
        assert!(json.get("intelReports").is_some());
    }
}
