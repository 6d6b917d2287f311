use super::*;

fn cards(names: &[&str]) -> Vec<UserCard> {
    names.iter().map(|n| UserCard::new(n)).collect()
}

fn names(list: &[UserCard]) -> Vec<&str> {
    list.iter().map(|u| u.username.as_str()).collect()
}

#[test]
fn take_then_restore_keeps_original_position() {
    let mut state = ConnectionsState::default();
    state.replace_pending(cards(&["amy", "bob", "cat"]));

    let removed = state.take_request("bob").unwrap();
    assert_eq!(removed.index, 1);
    assert_eq!(names(&state.pending), ["amy", "cat"]);

    state.restore_request(removed);
    assert_eq!(names(&state.pending), ["amy", "bob", "cat"]);
}

#[test]
fn take_missing_entry_returns_none() {
    let mut state = ConnectionsState::default();
    state.replace_pending(cards(&["amy"]));
    assert!(state.take_request("zed").is_none());
    assert_eq!(state.pending.len(), 1);
}

#[test]
fn restore_clamps_index_when_list_shrank() {
    let mut state = ConnectionsState::default();
    state.replace_connections(cards(&["amy", "bob", "cat"]));
    let removed = state.take_connection("cat").unwrap();
    state.replace_connections(cards(&["amy"]));

    state.restore_connection(removed);
    assert_eq!(names(&state.connections), ["amy", "cat"]);
}

#[test]
fn restore_is_skipped_when_entry_already_present() {
    let mut state = ConnectionsState::default();
    state.replace_pending(cards(&["amy", "bob"]));
    let removed = state.take_request("bob").unwrap();
    state.replace_pending(cards(&["amy", "bob"]));

    state.restore_request(removed);
    assert_eq!(names(&state.pending), ["amy", "bob"]);
}

#[test]
fn new_connections_prune_matching_requests() {
    let mut state = ConnectionsState::default();
    state.replace_pending(cards(&["bob", "cat"]));
    state.replace_connections(cards(&["bob"]));

    assert!(state.has_connection("bob"));
    assert!(!state.has_request("bob"));
    assert!(state.has_request("cat"));
}
