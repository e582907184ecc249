//! Candidate deduplication for the structural pipeline.

use std::collections::HashSet;

use crate::actor::ThreatActor;

/// Reduce a concatenated candidate sequence to at most one record per
/// case-insensitive name, keeping the first occurrence. Because the
/// structural strategies append in a fixed order, a table-derived record
/// outranks a container-derived one for the same name, and so on down
/// the cascade.
pub fn dedup_by_name(actors: Vec<ThreatActor>) -> Vec<ThreatActor> {
    let mut seen = HashSet::new();
    actors
        .into_iter()
        .filter(|actor| seen.insert(actor.name.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let mut first = ThreatActor::new("Lazarus");
        first.origin = "North Korea".into();
        let mut second = ThreatActor::new("LAZARUS");
        second.origin = "Unknown".into();

        let unique = dedup_by_name(vec![first, second, ThreatActor::new("Turla")]);

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].name, "Lazarus");
        assert_eq!(unique[0].origin, "North Korea");
        assert_eq!(unique[1].name, "Turla");
    }

    #[test]
    fn test_empty_input() {
        assert!(dedup_by_name(Vec::new()).is_empty());
    }
}
