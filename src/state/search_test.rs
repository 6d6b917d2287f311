use super::*;

fn results(names: &[&str]) -> Vec<UserSearchResult> {
    names.iter().map(|n| UserSearchResult::new(n)).collect()
}

#[test]
fn blank_term_clears_without_a_request() {
    let mut state = SearchState::default();
    let seq = state.begin("bo").unwrap();
    assert!(state.finish(seq, results(&["bob"])));

    assert!(state.begin("   ").is_none());
    assert!(state.results.is_empty());
    assert!(!state.searching);
}

#[test]
fn stale_response_is_dropped() {
    let mut state = SearchState::default();
    let first = state.begin("b").unwrap();
    let second = state.begin("bo").unwrap();

    assert!(state.finish(second, results(&["bob"])));
    assert!(!state.finish(first, results(&["bea", "bob", "bud"])));
    assert_eq!(state.results, results(&["bob"]));
}

#[test]
fn clear_invalidates_in_flight_search() {
    let mut state = SearchState::default();
    let seq = state.begin("al").unwrap();
    state.clear();
    assert!(!state.finish(seq, results(&["alice"])));
    assert!(state.term.is_empty());
    assert!(state.results.is_empty());
}
