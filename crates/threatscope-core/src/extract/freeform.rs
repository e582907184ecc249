//! Freeform extraction: a pattern sweep over unstructured prose.
//!
//! Unlike the structural pipeline this never produces records directly —
//! it assembles exactly one best-effort intelligence summary per call,
//! with a coarse count-based confidence rating, and leaves merging the
//! result into a record to the editor.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sentinel actor name when no known-group pattern matches.
pub const UNKNOWN_ACTOR: &str = "Unknown Actor";

const MAX_ALIASES: usize = 5;
const MAX_MALWARE: usize = 10;
const MAX_TECHNIQUES: usize = 15;
const MAX_INDUSTRIES: usize = 10;
const MAX_COUNTRIES: usize = 10;
const MAX_INDICATORS: usize = 20;
const SUMMARY_CHARS: usize = 300;

// Ordered: the first pattern with any match names the actor.
static ACTOR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)apt[- ]?\d+",
        r"(?i)lazarus",
        r"(?i)fancy bear",
        r"(?i)cozy bear",
        r"(?i)carbanak",
        r"(?i)equation",
        r"(?i)turla",
        r"(?i)kimsuky",
        r"(?i)darkhydrus",
        r"(?i)fin\d+",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static ALIAS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:also known as|aka|alias(?:es)?)[:\s]*([^.]{1,100})").unwrap());

static MALWARE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)trojan",
        r"(?i)backdoor",
        r"(?i)ransomware",
        r"(?i)loader",
        r"(?i)stealer",
        r"(?i)rat\b",
        r"(?i)rootkit",
        r"(?i)botnet",
        r"(?i)wiper",
        r"(?i)downloader",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static TECHNIQUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"T\d{4}(?:\.\d{3})?").unwrap());

static INDUSTRY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)financial",
        r"(?i)healthcare",
        r"(?i)government",
        r"(?i)defense",
        r"(?i)energy",
        r"(?i)manufacturing",
        r"(?i)retail",
        r"(?i)education",
        r"(?i)technology",
        r"(?i)telecommunications",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static COUNTRY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)united states",
        r"(?i)russia",
        r"(?i)china",
        r"(?i)north korea",
        r"(?i)iran",
        r"(?i)ukraine",
        r"(?i)germany",
        r"(?i)france",
        r"(?i)japan",
        r"(?i)south korea",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// IPv4 dotted quads, MD5/SHA1/SHA256-shaped hex runs, domain-shaped tokens.
static IOC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?:\d{1,3}\.){3}\d{1,3}\b",
        r"\b[a-fA-F0-9]{32}\b",
        r"\b[a-fA-F0-9]{40}\b",
        r"\b[a-fA-F0-9]{64}\b",
        r"\b[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    fn from_score(score: usize) -> Self {
        if score > 10 {
            Self::High
        } else if score > 5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Confidence {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Self::High),
            "Medium" => Ok(Self::Medium),
            "Low" => Ok(Self::Low),
            _ => Err(crate::Error::InvalidConfidence(s.to_string())),
        }
    }
}

/// One best-effort summary of a prose intelligence source. Constructed
/// fresh per sweep; carries no identity and is never persisted by the
/// core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedIntel {
    pub actor_name: String,
    pub aliases: Vec<String>,
    pub malware: Vec<String>,
    pub techniques: Vec<String>,
    pub industries: Vec<String>,
    pub countries: Vec<String>,
    pub indicators: Vec<String>,
    pub summary: String,
    pub confidence: Confidence,
}

/// Sweep unstructured prose and assemble exactly one summary.
///
/// Never fails and never returns more than one object; a text with no
/// recognizable content yields the sentinel actor name, empty lists, and
/// Low confidence. `source` is a locator for logging only — it carries
/// no semantic weight in the sweep.
#[must_use]
pub fn extract_freeform(text: &str, source: Option<&str>) -> ExtractedIntel {
    if let Some(source) = source {
        tracing::debug!(%source, "freeform sweep");
    }

    let actor_name = ACTOR_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(text))
        .map_or_else(|| UNKNOWN_ACTOR.to_string(), |m| m.as_str().to_string());

    let aliases = ALIAS_RE
        .captures(text)
        .map(|caps| {
            caps[1]
                .split([',', ';'])
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let malware = sweep(text, &MALWARE_PATTERNS);
    let techniques: Vec<String> = TECHNIQUE_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    let industries = sweep(text, &INDUSTRY_PATTERNS);
    let countries = sweep(text, &COUNTRY_PATTERNS);
    let indicators = sweep(text, &IOC_PATTERNS);

    let aliases = dedup_capped(aliases, MAX_ALIASES);
    let malware = dedup_capped(malware, MAX_MALWARE);
    let techniques = dedup_capped(techniques, MAX_TECHNIQUES);
    let industries = dedup_capped(industries, MAX_INDUSTRIES);
    let countries = dedup_capped(countries, MAX_COUNTRIES);
    let indicators = dedup_capped(indicators, MAX_INDICATORS);

    let score = malware.len() + techniques.len() + industries.len() + countries.len();
    let confidence = Confidence::from_score(score);

    ExtractedIntel {
        actor_name,
        aliases,
        malware,
        techniques,
        industries,
        countries,
        indicators,
        summary: summarize(text),
        confidence,
    }
}

fn sweep(text: &str, patterns: &[Regex]) -> Vec<String> {
    patterns
        .iter()
        .flat_map(|pattern| pattern.find_iter(text).map(|m| m.as_str().to_string()))
        .collect()
}

/// Case-sensitive dedup preserving first-seen order, then cap.
fn dedup_capped(items: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect();
    unique.truncate(cap);
    unique
}

fn summarize(text: &str) -> String {
    let mut summary: String = text.chars().take(SUMMARY_CHARS).collect();
    if text.chars().count() > SUMMARY_CHARS {
        summary.push_str("...");
    }
    summary
}
