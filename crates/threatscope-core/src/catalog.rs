//! In-memory actor catalog: the dataset the extraction engine feeds.
//!
//! The catalog owns no storage and no network; it is the list the
//! presentation layer renders and the editor mutates. Import merges are
//! id-based and skip-on-conflict, which is deliberately independent of
//! the per-call name deduplication inside the structural extractor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actor::ThreatActor;
use crate::extract::{slug, ExtractedIntel, UNKNOWN_ACTOR};

/// Record of one import batch applied to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportLog {
    pub id: Uuid,
    pub source: String,
    pub imported_at: DateTime<Utc>,
    pub imported: u32,
    pub skipped: u32,
}

impl ImportLog {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            imported_at: Utc::now(),
            imported: 0,
            skipped: 0,
        }
    }

    #[must_use]
    pub fn with_counts(mut self, imported: u32, skipped: u32) -> Self {
        self.imported = imported;
        self.skipped = skipped;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ImportReport {
    pub imported: Vec<String>,
    pub skipped: Vec<String>,
    pub log: ImportLog,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    actors: Vec<ThreatActor>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-populated with the bundled starter dataset.
    #[must_use]
    pub fn with_seed() -> Self {
        Self {
            actors: crate::seed::default_actors(),
        }
    }

    #[must_use]
    pub fn from_actors(actors: Vec<ThreatActor>) -> Self {
        Self { actors }
    }

    #[must_use]
    pub fn actors(&self) -> &[ThreatActor] {
        &self.actors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ThreatActor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    /// Replace the entry with the same id, or append a new one.
    pub fn add_or_update(&mut self, actor: ThreatActor) {
        match self.actors.iter_mut().find(|existing| existing.id == actor.id) {
            Some(existing) => *existing = actor,
            None => self.actors.push(actor),
        }
    }

    /// Merge an extracted batch into the catalog, skipping records whose
    /// id already exists. Returns which ids went where plus a log entry.
    pub fn import(&mut self, incoming: Vec<ThreatActor>, source: &str) -> ImportReport {
        let mut imported = Vec::new();
        let mut skipped = Vec::new();

        for actor in incoming {
            if !actor.is_valid() || self.get(&actor.id).is_some() {
                skipped.push(actor.id);
                continue;
            }
            imported.push(actor.id.clone());
            self.actors.push(actor);
        }

        tracing::info!(
            imported = imported.len(),
            skipped = skipped.len(),
            source,
            "catalog import"
        );

        let log = ImportLog::new(source)
            .with_counts(imported.len() as u32, skipped.len() as u32);
        ImportReport {
            imported,
            skipped,
            log,
        }
    }

    /// Case-insensitive substring search across the fields the list view
    /// filters on. An empty query returns everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ThreatActor> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.actors.iter().collect();
        }

        self.actors
            .iter()
            .filter(|actor| matches_query(actor, &needle))
            .collect()
    }
}

fn matches_query(actor: &ThreatActor, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);

    contains(&actor.name)
        || actor.aliases.iter().any(|alias| contains(alias))
        || contains(&actor.description)
        || actor.malware_used.iter().any(|m| contains(m))
        || actor.target_industries.iter().any(|i| contains(i))
        || actor.target_countries.iter().any(|c| contains(c))
        || contains(&actor.origin)
        || contains(&actor.motivation)
        || contains(actor.actor_type.as_str())
}

/// Editor merge: fold a freeform summary into a draft record. List
/// fields are appended (per-field duplicates are tolerated at this
/// stage); scalar fields only fill holes, never overwrite.
pub fn apply_intel(actor: &mut ThreatActor, intel: &ExtractedIntel) {
    if actor.name.trim().is_empty() && intel.actor_name != UNKNOWN_ACTOR {
        actor.name = intel.actor_name.clone();
        actor.id = slug(&actor.name);
    }

    actor.aliases.extend(intel.aliases.iter().cloned());
    actor.malware_used.extend(intel.malware.iter().cloned());
    actor
        .target_industries
        .extend(intel.industries.iter().cloned());
    actor
        .target_countries
        .extend(intel.countries.iter().cloned());
    actor.techniques.extend(intel.techniques.iter().cloned());

    if actor.description.is_empty() {
        actor.description = intel.summary.clone();
    }
}
