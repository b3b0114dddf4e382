mod common;

use common::fixture_graph;
use skyroute_lib::resolver::fuzzy_place_matches;
use skyroute_lib::{cheapest_route, resolve_place, Error};

#[test]
fn fuzzy_matches_returns_similar_names() {
    let graph = fixture_graph();

    let exact = fuzzy_place_matches(&graph, "Porto", 3);
    assert_eq!(exact.first().map(String::as_str), Some("Porto"));

    let typo = fuzzy_place_matches(&graph, "Zagrab", 3);
    assert!(typo.contains(&"Zagreb".to_string()), "got {typo:?}");

    let lowercase = fuzzy_place_matches(&graph, "cakovek", 3);
    assert!(lowercase.contains(&"Cakovec".to_string()), "got {lowercase:?}");
}

#[test]
fn fuzzy_matches_respects_limit() {
    let graph = fixture_graph();
    let matches = fuzzy_place_matches(&graph, "a", 2);
    assert!(matches.len() <= 2);
}

#[test]
fn fuzzy_matches_filters_low_similarity() {
    let graph = fixture_graph();
    let matches = fuzzy_place_matches(&graph, "qqqqqqqq", 5);
    assert!(matches.is_empty(), "got {matches:?}");
}

#[test]
fn unknown_place_includes_suggestions() {
    let graph = fixture_graph();
    let err = resolve_place(&graph, "Lisbonn").unwrap_err();
    match &err {
        Error::UnknownPlace { suggestions, .. } => {
            assert!(suggestions.contains(&"Lisbon".to_string()));
        }
        other => panic!("expected UnknownPlace, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("unknown place: Lisbonn"));
    assert!(message.contains("Did you mean"));
    assert!(message.contains("Lisbon"));
}

#[test]
fn route_with_typo_fails_cleanly() {
    let graph = fixture_graph();
    let err = cheapest_route(&graph, "Zagreb", "Portto", 1).unwrap_err();
    assert!(matches!(err, Error::UnknownPlace { .. }));
    assert!(err.to_string().contains("Porto"));
}
