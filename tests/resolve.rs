// Integration tests for boundary-name resolution against score keys,
// covering every stage of the 1:1 cascade and the 1:N jurisdiction scan.

use precinct_atlas::{build_index, normalize, JurisdictionType, NameResolver, ResolvedMatch, ScoreIndex, ScoreRecord};

fn ingham_keys() -> Vec<&'static str> {
    vec![
        "Alaiedon Township Precinct 1",
        "Alaiedon Township Precinct 2",
        "East Lansing Precinct 2",
        "East Lansing Precinct 3",
        "Mason Precinct 1",
        "Meridian Charter Township Precinct 4",
        "Williamstown Township Precinct 1",
    ]
}

fn resolver() -> NameResolver {
    NameResolver::new(ingham_keys())
}

#[test]
fn exact_keys_resolve_to_themselves() {
    let r = resolver();
    for key in ingham_keys() {
        assert_eq!(r.resolve_one(key), Some(key));
    }
}

#[test]
fn city_of_with_comma_precinct() {
    assert_eq!(resolver().resolve_one("City of East Lansing, Precinct 2"), Some("East Lansing Precinct 2"));
}

#[test]
fn township_with_comma_precinct() {
    assert_eq!(resolver().resolve_one("Williamstown Township, Precinct 1"), Some("Williamstown Township Precinct 1"));
}

#[test]
fn resolve_many_township_example() {
    let keys = ["Alaiedon Township Precinct 1", "Alaiedon Township Precinct 2", "Mason Precinct 1"];
    let r = NameResolver::new(keys);
    assert_eq!(
        r.resolve_many("Alaiedon", &JurisdictionType::Township),
        vec!["Alaiedon Township Precinct 1", "Alaiedon Township Precinct 2"],
    );
}

#[test]
fn resolve_many_charter_township() {
    let r = resolver();
    assert_eq!(
        r.resolve_many("Meridian Charter Township", &JurisdictionType::Township),
        vec!["Meridian Charter Township Precinct 4"],
    );
}

#[test]
fn resolve_many_unknown_is_empty() {
    assert!(resolver().resolve_many("Bunker Hill", &JurisdictionType::Township).is_empty());
}

#[test]
fn resolver_from_score_index_uses_sorted_keys() {
    let scores: ScoreIndex = [
        ("Mason Precinct 2", ScoreRecord::default()),
        ("Mason Precinct 1", ScoreRecord::default()),
    ].into_iter().collect();
    let r = NameResolver::from_scores(&scores);
    assert_eq!(r.keys(), ["Mason Precinct 1", "Mason Precinct 2"]);
    assert_eq!(
        r.resolve("Mason", &JurisdictionType::City),
        ResolvedMatch::Many(vec!["Mason Precinct 1".into(), "Mason Precinct 2".into()]),
    );
}

#[test]
fn resolution_does_not_depend_on_prior_calls() {
    let r = resolver();
    let first = r.resolve_one("City of East Lansing, Precinct 3");
    let _ = r.resolve_one("Mason Precinct 1");
    let _ = r.resolve_many("Alaiedon", &JurisdictionType::Township);
    assert_eq!(r.resolve_one("City of East Lansing, Precinct 3"), first);
}

#[test]
fn index_agrees_with_normalize() {
    let index = build_index(ingham_keys());
    let spelling = normalize("City of East Lansing, Precinct 2").to_lowercase();
    assert_eq!(index.get(&spelling), Some("East Lansing Precinct 2"));
}
