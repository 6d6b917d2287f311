use super::*;

#[test]
fn parse_json_decodes_message_list() {
    let json = r#"[
        {"id": 1, "sender": "bob", "senderName": "Bob", "preview": "hi", "timestamp": "2025-03-01T10:00:00", "unread": true},
        {"id": 2, "sender": "carol", "preview": "yo", "unread": false}
    ]"#;
    let messages: Vec<MessageSummary> = parse_json(json).unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].unread);
    assert_eq!(messages[1].sender, "carol");
}

#[test]
fn parse_json_reports_shape_mismatch() {
    let err = parse_json::<Vec<MessageSummary>>(r#"{"error": "nope"}"#).unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
    assert_eq!(err.error_code(), "E_PARSE");
}

#[test]
fn parse_json_decodes_upload_responses() {
    let file: FileUrlResponse = parse_json(r#"{"fileUrl": "/uploads/cover.png"}"#).unwrap();
    assert_eq!(file.file_url, "/uploads/cover.png");
    let url: UrlResponse = parse_json(r#"{"url": "http://localhost:8080/uploads/a.png"}"#).unwrap();
    assert_eq!(url.url, "http://localhost:8080/uploads/a.png");
}

#[test]
fn new_keeps_configured_base_url() {
    let config = ClientConfig::default().with_base_url("http://campus.test:9000/");
    let backend = HttpBackend::new(&config).unwrap();
    assert_eq!(backend.base_url(), "http://campus.test:9000");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Port 9 (discard) on localhost is closed in test environments.
    let config = ClientConfig::default().with_base_url("http://127.0.0.1:9");
    let backend = HttpBackend::new(&config).unwrap();
    let err = backend.fetch_recent_messages("alice").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert!(err.is_remote());
}
