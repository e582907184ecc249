//! Structural extraction: markup in, candidate actor records out.
//!
//! Four strategies run against the same document in a fixed order —
//! tables, labeled containers, list items, embedded JSON-LD — and their
//! outputs are concatenated before name-level deduplication. Each
//! strategy only knows how to locate a name; everything else is derived
//! from the element's flattened text through the shared labeled-field
//! pattern table and [`normalize`](super::normalize).

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::dedup::dedup_by_name;
use super::normalize;
use crate::actor::{filler_report_count, filler_vulnerability_count, ThreatActor};

static TABLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static ROW_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").unwrap());
static CONTAINER_SEL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[class*="threat"], div[class*="actor"], div[class*="apt"]"#).unwrap()
});
static TITLE_SEL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[class*="name"], [class*="title"], h1, h2, h3, strong"#).unwrap()
});
static LIST_ITEM_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("ul li, ol li").unwrap());
static PARAGRAPH_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static EMBEDDED_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

// Labeled-field patterns: `Label: value`, value running to the next
// period. Labels match case-insensitively; the synonym lists are fixed.
static NAME_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Name|Actor|Group|APT)[:\s]*([A-Z][A-Za-z0-9\s\-_]+)").unwrap());
static ALIAS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Alias(?:es)?|AKA|Also known as)[:\s]*([^.]+)").unwrap());
static TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Type|Category)[:\s]*([^.]+)").unwrap());
static ORIGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Origin|Country|Region)[:\s]*([^.]+)").unwrap());
static FIRST_SEEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:First seen|Active since|Since)[:\s]*([^.]+)").unwrap());
static LAST_SEEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Last seen|Recent)[:\s]*([^.]+)").unwrap());
static MOTIVATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Motivation|Intent|Goal)[:\s]*([^.]+)").unwrap());
static MALWARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Malware|Tools|Software)[:\s]*([^.]+)").unwrap());
static INDUSTRIES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Industries|Sectors|Targets)[:\s]*([^.]+)").unwrap());
static COUNTRIES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Countries|Regions|Geography)[:\s]*([^.]+)").unwrap());
static TECHNIQUES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Techniques|TTPs|MITRE)[:\s]*([^.]+)").unwrap());
static STATUS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Status|State)[:\s]*([^.]+)").unwrap());

// A run of tokens that each start with a capital, anchored at the start
// of a list item. Deliberately case-sensitive: the run ends at the first
// lowercase word ("APT41 is a ..." names only APT41).
static LEADING_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][A-Za-z0-9\-_]*(?:[ \t]+[A-Z][A-Za-z0-9\-_]*)*)").unwrap());

/// Extract zero or more candidate records from a markup document.
///
/// Never fails: malformed markup, unparsable embedded blocks, and
/// nameless candidates are all absorbed locally, and the worst case is
/// an empty vec.
#[must_use]
pub fn extract_structured(markup: &str) -> Vec<ThreatActor> {
    let doc = Html::parse_document(markup);

    let mut candidates = Vec::new();
    candidates.extend(from_tables(&doc));
    candidates.extend(from_containers(&doc));
    candidates.extend(from_lists(&doc));
    candidates.extend(from_embedded(&doc));

    let unique = dedup_by_name(candidates);
    tracing::debug!(records = unique.len(), "structural extraction complete");
    unique
}

fn from_tables(doc: &Html) -> Vec<ThreatActor> {
    let mut actors = Vec::new();

    for table in doc.select(&TABLE_SEL) {
        let rows: Vec<ElementRef<'_>> = table.select(&ROW_SEL).collect();
        let Some((header_row, data_rows)) = rows.split_first() else {
            continue;
        };

        let headers: Vec<String> = header_row
            .select(&CELL_SEL)
            .map(|cell| element_text(cell).trim().to_lowercase())
            .collect();

        for row in data_rows {
            let cells: Vec<String> = row
                .select(&CELL_SEL)
                .map(|cell| element_text(cell).trim().to_string())
                .collect();
            if cells.is_empty() {
                continue;
            }

            // Key each cell by its header, or a synthetic colN key when
            // the header row is missing or short.
            let fields: Vec<(String, String)> = cells
                .into_iter()
                .enumerate()
                .map(|(i, value)| {
                    let key = headers
                        .get(i)
                        .filter(|h| !h.is_empty())
                        .cloned()
                        .unwrap_or_else(|| format!("col{i}"));
                    (key, value)
                })
                .collect();

            if let Some(actor) = actor_from_row(&fields) {
                actors.push(actor);
            }
        }
    }

    actors
}

fn actor_from_row(fields: &[(String, String)]) -> Option<ThreatActor> {
    let lookup = |keys: &[&str]| -> Option<&str> {
        keys.iter().find_map(|key| {
            fields
                .iter()
                .find(|(header, value)| header == key && !value.is_empty())
                .map(|(_, value)| value.as_str())
        })
    };

    let name = lookup(&["name", "actor", "group"])
        .or_else(|| fields.first().map(|(_, value)| value.as_str()))?
        .trim()
        .to_string();
    if name.chars().count() < 2 {
        return None;
    }

    let mut actor = ThreatActor::new(&name);
    if let Some(raw) = lookup(&["type", "category"]) {
        actor.actor_type = normalize::map_type(raw);
    }
    if let Some(raw) = lookup(&["origin", "country"]) {
        actor.origin = raw.to_string();
    }
    if let Some(raw) = lookup(&["firstseen", "first seen"]) {
        actor.first_seen = raw.to_string();
    }
    if let Some(raw) = lookup(&["lastseen", "last seen"]) {
        actor.last_seen = raw.to_string();
    }
    if let Some(raw) = lookup(&["motivation", "intent"]) {
        actor.motivation = raw.to_string();
    }
    actor.description = lookup(&["description", "summary"])
        .map_or_else(|| name.clone(), String::from);
    actor.aliases = lookup(&["aliases", "aka"]).map(normalize::split_list).unwrap_or_default();
    actor.malware_used = lookup(&["malware", "tools"])
        .map(normalize::split_list)
        .unwrap_or_default();
    actor.target_industries = lookup(&["industries", "targets"])
        .map(normalize::split_list)
        .unwrap_or_default();
    actor.target_countries = lookup(&["countries", "regions"])
        .map(normalize::split_list)
        .unwrap_or_default();
    actor.techniques = lookup(&["techniques", "ttps"])
        .map(normalize::split_list)
        .unwrap_or_default();
    if let Some(raw) = lookup(&["status"]) {
        actor.status = normalize::map_status(raw);
    }
    actor.intel_reports = lookup(&["reports"])
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or_else(filler_report_count);
    actor.vulnerabilities = lookup(&["vulnerabilities", "cves"])
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or_else(filler_vulnerability_count);

    Some(actor)
}

fn from_containers(doc: &Html) -> Vec<ThreatActor> {
    let mut actors = Vec::new();

    for container in doc.select(&CONTAINER_SEL) {
        let text = element_text(container);
        let name = title_text(container)
            .or_else(|| extract_labeled(&text, &NAME_LABEL_RE));

        let Some(name) = name else {
            tracing::debug!("skipping container without a resolvable name");
            continue;
        };

        actors.push(actor_from_element(container, &text, &name));
    }

    actors
}

fn from_lists(doc: &Html) -> Vec<ThreatActor> {
    let mut actors = Vec::new();

    for item in doc.select(&LIST_ITEM_SEL) {
        let text = element_text(item);
        let Some(caps) = LEADING_NAME_RE.captures(text.trim_start()) else {
            continue;
        };
        let name = caps[1].trim().to_string();
        if name.chars().count() < 3 {
            continue;
        }

        actors.push(actor_from_element(item, &text, &name));
    }

    actors
}

fn from_embedded(doc: &Html) -> Vec<ThreatActor> {
    let mut actors = Vec::new();

    for script in doc.select(&EMBEDDED_SEL) {
        let raw: String = script.text().collect();
        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(%err, "skipping unparsable embedded data block");
                continue;
            }
        };

        if let Some(actor) = actor_from_value(&value) {
            actors.push(actor);
        }
    }

    actors
}

fn actor_from_value(value: &serde_json::Value) -> Option<ThreatActor> {
    let declared = value.get("@type").and_then(serde_json::Value::as_str);
    let plain = value.get("type").and_then(serde_json::Value::as_str);
    if declared != Some("ThreatActor") && plain != Some("threat-actor") {
        return None;
    }

    let name = value
        .get("name")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())?;

    let text_field = |key: &str| -> Option<String> {
        value
            .get(key)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    };

    let mut actor = ThreatActor::new(name);
    actor.actor_type = normalize::map_type(&text_field("type").unwrap_or_default());
    if let Some(origin) = text_field("origin") {
        actor.origin = origin;
    }
    if let Some(first_seen) = text_field("firstSeen") {
        actor.first_seen = first_seen;
    }
    if let Some(last_seen) = text_field("lastSeen") {
        actor.last_seen = last_seen;
    }
    if let Some(motivation) = text_field("motivation") {
        actor.motivation = motivation;
    }
    actor.description = text_field("description").unwrap_or_else(|| name.to_string());
    actor.aliases = string_array(value, "aliases");
    actor.malware_used = string_array(value, "malware");
    actor.target_industries = string_array(value, "industries");
    actor.target_countries = string_array(value, "countries");
    actor.techniques = string_array(value, "techniques");
    actor.status = normalize::map_status(&text_field("status").unwrap_or_default());
    if let Some(reports) = value.get("reports").and_then(serde_json::Value::as_u64) {
        actor.intel_reports = u32::try_from(reports).unwrap_or(u32::MAX);
    }
    if let Some(vulns) = value.get("vulnerabilities").and_then(serde_json::Value::as_u64) {
        actor.vulnerabilities = u32::try_from(vulns).unwrap_or(u32::MAX);
    }

    Some(actor)
}

/// Arrays are copied as-is; any other value shape is treated as absent.
fn string_array(value: &serde_json::Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Build a record from any element once a name has been located: every
/// other field comes from the shared labeled-field patterns over the
/// element's flattened text.
fn actor_from_element(element: ElementRef<'_>, text: &str, name: &str) -> ThreatActor {
    let mut actor = ThreatActor::new(name);
    actor.aliases = extract_labeled(text, &ALIAS_RE)
        .map(|raw| normalize::split_list(&raw))
        .unwrap_or_default();
    actor.actor_type = normalize::map_type(&extract_labeled(text, &TYPE_RE).unwrap_or_default());
    if let Some(origin) = extract_labeled(text, &ORIGIN_RE) {
        actor.origin = origin;
    }
    if let Some(first_seen) = extract_labeled(text, &FIRST_SEEN_RE) {
        actor.first_seen = first_seen;
    }
    if let Some(last_seen) = extract_labeled(text, &LAST_SEEN_RE) {
        actor.last_seen = last_seen;
    }
    if let Some(motivation) = extract_labeled(text, &MOTIVATION_RE) {
        actor.motivation = motivation;
    }
    actor.description = description_for(element, text);
    actor.malware_used = extract_labeled(text, &MALWARE_RE)
        .map(|raw| normalize::split_list(&raw))
        .unwrap_or_default();
    actor.target_industries = extract_labeled(text, &INDUSTRIES_RE)
        .map(|raw| normalize::split_list(&raw))
        .unwrap_or_default();
    actor.target_countries = extract_labeled(text, &COUNTRIES_RE)
        .map(|raw| normalize::split_list(&raw))
        .unwrap_or_default();
    actor.techniques = extract_labeled(text, &TECHNIQUES_RE)
        .map(|raw| normalize::split_list(&raw))
        .unwrap_or_default();
    actor.status = normalize::map_status(&extract_labeled(text, &STATUS_RE).unwrap_or_default());
    actor
}

/// Longest paragraph-like sub-block, else the first 200 characters of
/// the flattened text.
fn description_for(element: ElementRef<'_>, text: &str) -> String {
    element
        .select(&PARAGRAPH_SEL)
        .map(|p| element_text(p).trim().to_string())
        .filter(|t| !t.is_empty())
        .max_by_key(String::len)
        .unwrap_or_else(|| text.trim().chars().take(200).collect())
}

fn title_text(element: ElementRef<'_>) -> Option<String> {
    element
        .select(&TITLE_SEL)
        .next()
        .map(|el| element_text(el).trim().to_string())
        .filter(|t| !t.is_empty())
}

fn extract_labeled(text: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|v| !v.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorStatus, ActorType};

    #[test]
    fn test_no_recognizable_structure_yields_nothing() {
        let markup = "<html><body><span>nothing to see here</span></body></html>";
        assert!(extract_structured(markup).is_empty());
    }

    #[test]
    fn test_garbage_input_yields_nothing() {
        assert!(extract_structured("<<<%%% not even close to html").is_empty());
        assert!(extract_structured("").is_empty());
    }

    #[test]
    fn test_table_strategy() {
        let markup = r"
            <table>
                <tr><th>Name</th><th>Type</th><th>Origin</th><th>Malware</th></tr>
                <tr><td>APT29</td><td>apt</td><td>Russia</td><td>WellMess, WellMail</td></tr>
            </table>
        ";

        let actors = extract_structured(markup);

        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "APT29");
        assert_eq!(actors[0].id, "apt29");
        assert_eq!(actors[0].actor_type, ActorType::Apt);
        assert_eq!(actors[0].origin, "Russia");
        assert_eq!(actors[0].malware_used, vec!["WellMess", "WellMail"]);
    }

    #[test]
    fn test_table_first_column_fallback_and_short_names() {
        let markup = r"
            <table>
                <tr><th>Group</th><th>Status</th></tr>
                <tr><td>Turla</td><td>active</td></tr>
                <tr><td>X</td><td>active</td></tr>
            </table>
        ";

        let actors = extract_structured(markup);

        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "Turla");
        assert_eq!(actors[0].status, ActorStatus::Active);
    }

    #[test]
    fn test_table_explicit_report_counts() {
        let markup = r"
            <table>
                <tr><th>Name</th><th>Reports</th><th>CVEs</th></tr>
                <tr><td>Carbanak</td><td>12</td><td>7</td></tr>
            </table>
        ";

        let actors = extract_structured(markup);

        assert_eq!(actors[0].intel_reports, 12);
        assert_eq!(actors[0].vulnerabilities, 7);
    }

    #[test]
    fn test_container_strategy() {
        let markup = r#"
            <div class="threat-actor-card">
                <h3>FANCY BEAR</h3>
                <p>Motivation: Espionage. Origin: Russia. Status: Active.</p>
                <p>A long-running intrusion set attributed to a military intelligence service.</p>
            </div>
        "#;

        let actors = extract_structured(markup);

        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "FANCY BEAR");
        assert_eq!(actors[0].id, "fancy-bear");
        assert_eq!(actors[0].motivation, "Espionage");
        assert_eq!(actors[0].origin, "Russia");
        assert_eq!(actors[0].status, ActorStatus::Active);
        assert!(actors[0].description.contains("intrusion set"));
    }

    #[test]
    fn test_container_without_name_is_skipped() {
        let markup = r#"<div class="threat-summary">Nothing labeled in here; just prose.</div>"#;
        assert!(extract_structured(markup).is_empty());
    }

    #[test]
    fn test_container_labeled_name_fallback() {
        let markup = r#"
            <div class="apt-profile">
                Actor: Lazarus. Motivation: Financial gain. Techniques: T1486, T1059.
            </div>
        "#;

        let actors = extract_structured(markup);

        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "Lazarus");
        assert_eq!(actors[0].techniques, vec!["T1486", "T1059"]);
    }

    #[test]
    fn test_list_strategy_leading_capitalized_run() {
        let markup = "<ul><li>APT41 is a Chinese state-sponsored group</li></ul>";

        let actors = extract_structured(markup);

        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "APT41");
        assert_eq!(actors[0].id, "apt41");
    }

    #[test]
    fn test_list_strategy_skips_short_and_lowercase_items() {
        let markup = "<ul><li>no capital here</li><li>AB</li><li>Cozy Bear targets governments</li></ul>";

        let actors = extract_structured(markup);

        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "Cozy Bear");
    }

    #[test]
    fn test_embedded_data_strategy() {
        let markup = r#"
            <script type="application/ld+json">
            {
                "@type": "ThreatActor",
                "name": "Kimsuky",
                "type": "nation state",
                "origin": "North Korea",
                "aliases": ["Velvet Chollima"],
                "techniques": ["T1566.001"],
                "status": "active",
                "reports": 9,
                "vulnerabilities": 3
            }
            </script>
        "#;

        let actors = extract_structured(markup);

        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "Kimsuky");
        assert_eq!(actors[0].actor_type, ActorType::NationState);
        assert_eq!(actors[0].aliases, vec!["Velvet Chollima"]);
        assert_eq!(actors[0].techniques, vec!["T1566.001"]);
        assert_eq!(actors[0].status, ActorStatus::Active);
        assert_eq!(actors[0].intel_reports, 9);
        assert_eq!(actors[0].vulnerabilities, 3);
    }

    #[test]
    fn test_embedded_data_ignores_other_types_and_bad_json() {
        let markup = r#"
            <script type="application/ld+json">{ "@type": "Article", "name": "Weekly roundup" }</script>
            <script type="application/ld+json">{ not json at all</script>
            <script type="application/ld+json">{ "type": "threat-actor", "name": "DarkHydrus" }</script>
        "#;

        let actors = extract_structured(markup);

        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "DarkHydrus");
    }

    #[test]
    fn test_embedded_data_non_array_lists_treated_as_absent() {
        let markup = r#"
            <script type="application/ld+json">
            { "@type": "ThreatActor", "name": "Equation", "malware": "not-an-array" }
            </script>
        "#;

        let actors = extract_structured(markup);

        assert!(actors[0].malware_used.is_empty());
    }

    #[test]
    fn test_dedup_prefers_earliest_strategy() {
        let markup = r#"
            <table>
                <tr><th>Name</th><th>Origin</th></tr>
                <tr><td>Lazarus</td><td>North Korea</td></tr>
            </table>
            <div class="threat-profile">Actor: Lazarus. Origin: Unattributed.</div>
            <ul><li>Lazarus runs financially motivated intrusions</li></ul>
        "#;

        let actors = extract_structured(markup);
        let lazarus: Vec<_> = actors
            .iter()
            .filter(|a| a.name.eq_ignore_ascii_case("lazarus"))
            .collect();

        assert_eq!(lazarus.len(), 1);
        assert_eq!(lazarus[0].origin, "North Korea");
    }
}
