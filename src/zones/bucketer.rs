//! Free-text location → zone bucketing.
//!
//! Flow: empty text → Unmatched; otherwise zones in declared order, first
//! one whose name, alias, or (loose rule) first name token occurs in the
//! text wins. Matching is a case-sensitive substring test, same as the
//! `LIKE '%…%'` filters the dashboard queries were built on.

use super::types::{MatchRule, Zone, ZoneBucket};

/// True when `zone` claims `text` under `rule`.
pub fn zone_matches(zone: &Zone, text: &str, rule: MatchRule) -> bool {
    let contains = |needle: &str| !needle.is_empty() && text.contains(needle);

    if contains(&zone.name) || zone.aliases.iter().any(|a| contains(a)) {
        return true;
    }
    match rule {
        MatchRule::NameOrFirstToken => contains(zone.first_token()),
        MatchRule::NameOnly => false,
    }
}

/// Index of the first zone that claims `free_text`, if any.
pub fn bucket_index(free_text: Option<&str>, zones: &[Zone], rule: MatchRule) -> Option<usize> {
    let text = free_text.filter(|t| !t.is_empty())?;
    zones.iter().position(|zone| zone_matches(zone, text, rule))
}

/// Assign a free-text location to the first matching zone.
///
/// Loose matching on the first token is a known approximation: "San Rafael"
/// claims any text containing "San". Existing reports were bucketed this
/// way, so it is kept as is.
pub fn bucket_location<'a>(
    free_text: Option<&str>,
    zones: &'a [Zone],
    rule: MatchRule,
) -> ZoneBucket<'a> {
    match bucket_index(free_text, zones, rule) {
        Some(idx) => ZoneBucket::Matched(&zones[idx]),
        None => ZoneBucket::Unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::builtin::builtin_zones;

    fn synthetic() -> Vec<Zone> {
        vec![
            Zone::new("Alupidian"),
            Zone::new("San Rafael"),
            Zone::new("Sipitan"),
            Zone::with_aliases("Barangay 1 (Poblacion)", ["Poblacion"]),
        ]
    }

    #[test]
    fn test_purok_in_alupidian() {
        let zones = synthetic();
        let b = bucket_location(Some("Purok 3, Alupidian, Tigbauan"), &zones, MatchRule::default());
        assert_eq!(b.name(), Some("Alupidian"));
    }

    #[test]
    fn test_empty_and_none_unmatched() {
        let zones = synthetic();
        assert_eq!(bucket_location(Some(""), &zones, MatchRule::default()), ZoneBucket::Unmatched);
        assert_eq!(bucket_location(None, &zones, MatchRule::default()), ZoneBucket::Unmatched);
    }

    #[test]
    fn test_nowhere_unmatched() {
        let zones = builtin_zones();
        let b = bucket_location(Some("Nowhereville"), &zones, MatchRule::NameOrFirstToken);
        assert!(!b.is_matched());
        assert_eq!(b.name(), None);
    }

    #[test]
    fn test_case_sensitive() {
        let zones = synthetic();
        let b = bucket_location(Some("purok 3, alupidian"), &zones, MatchRule::default());
        assert_eq!(b, ZoneBucket::Unmatched);
    }

    #[test]
    fn test_first_token_fallback() {
        let zones = synthetic();
        let loose = bucket_location(Some("San Miguel road"), &zones, MatchRule::NameOrFirstToken);
        assert_eq!(loose.name(), Some("San Rafael"));

        let strict = bucket_location(Some("San Miguel road"), &zones, MatchRule::NameOnly);
        assert_eq!(strict, ZoneBucket::Unmatched);
    }

    #[test]
    fn test_first_match_wins() {
        let zones = synthetic();
        // Mentions two zones; Alupidian is declared first.
        let b = bucket_location(Some("Sipitan near Alupidian"), &zones, MatchRule::default());
        assert_eq!(b.name(), Some("Alupidian"));
    }

    #[test]
    fn test_alias() {
        let zones = synthetic();
        let b = bucket_location(Some("Poblacion market"), &zones, MatchRule::NameOnly);
        assert_eq!(b.name(), Some("Barangay 1 (Poblacion)"));
    }

    #[test]
    fn test_builtin_poblacion_numbers() {
        let zones = builtin_zones();
        let strict = bucket_location(Some("Barangay 5, Tigbauan"), &zones, MatchRule::NameOnly);
        assert_eq!(strict.name(), Some("Barangay 5 (Poblacion)"));

        // "Barangay" is the first token of every Poblacion zone, so the loose
        // rule lands on the earliest one.
        let loose = bucket_location(Some("Barangay 5, Tigbauan"), &zones, MatchRule::NameOrFirstToken);
        assert_eq!(loose.name(), Some("Barangay 1 (Poblacion)"));
    }

    #[test]
    fn test_builtin_namucon_spelling() {
        let zones = builtin_zones();
        let b = bucket_location(Some("Sitio Ilaya, Namucon"), &zones, MatchRule::NameOnly);
        assert_eq!(b.name(), Some("Namocon"));
    }

    #[test]
    fn test_blank_zone_never_matches() {
        let zones = vec![Zone::new(""), Zone::new("Taro")];
        let b = bucket_location(Some("Taro proper"), &zones, MatchRule::default());
        assert_eq!(b.name(), Some("Taro"));
        let b = bucket_location(Some("somewhere"), &zones, MatchRule::default());
        assert_eq!(b, ZoneBucket::Unmatched);
    }

    #[test]
    fn test_bucket_index() {
        let zones = synthetic();
        assert_eq!(bucket_index(Some("Sipitan"), &zones, MatchRule::default()), Some(2));
        assert_eq!(bucket_index(Some(""), &zones, MatchRule::default()), None);
    }

    #[test]
    fn test_idempotent() {
        let zones = builtin_zones();
        let text = Some("Brgy. Parara Sur, Tigbauan, Iloilo");
        let a = bucket_location(text, &zones, MatchRule::default());
        let b = bucket_location(text, &zones, MatchRule::default());
        assert_eq!(a, b);
        assert_eq!(a.name(), Some("Parara Norte"));
    }
}
