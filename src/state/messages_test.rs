use super::*;

fn summary(id: i64, sender: &str, unread: bool) -> MessageSummary {
    MessageSummary {
        id,
        sender: sender.to_owned(),
        sender_name: None,
        sender_photo: None,
        preview: String::new(),
        timestamp: None,
        unread,
    }
}

#[test]
fn badge_counts_unread_only() {
    let mut state = MessagesState::default();
    assert!(!state.loaded);
    state.replace(vec![summary(1, "bob", true), summary(2, "carol", false), summary(3, "dan", true)]);
    assert!(state.loaded);
    assert_eq!(state.unread_count(), 2);
    assert_eq!(state.badge(), "2");
    assert!(state.show_badge());
}

#[test]
fn mark_read_touches_exactly_one_item() {
    let mut state = MessagesState::default();
    state.replace(vec![summary(1, "bob", true), summary(2, "bob", true)]);

    assert!(state.mark_read_local(1));
    assert!(!state.get(1).unwrap().unread);
    assert!(state.get(2).unwrap().unread);
    assert_eq!(state.badge(), "1");
}

#[test]
fn mark_read_never_goes_negative() {
    let mut state = MessagesState::default();
    state.replace(vec![summary(1, "bob", true)]);
    assert!(state.mark_read_local(1));
    assert!(!state.mark_read_local(1));
    assert!(!state.mark_read_local(99));
    assert_eq!(state.unread_count(), 0);
    assert_eq!(state.badge(), "0");
    assert!(!state.show_badge());
}

#[test]
fn unread_ids_filter_by_sender() {
    let mut state = MessagesState::default();
    state.replace(vec![summary(1, "bob", true), summary(2, "carol", true), summary(3, "bob", false)]);
    assert_eq!(state.unread_ids_from("bob"), vec![1]);
    assert!(state.unread_ids_from("zoe").is_empty());
}
