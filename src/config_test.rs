use super::*;

/// # Safety
/// Tests touching the process environment must not run concurrently with
/// other env readers; every test here clears what it sets.
unsafe fn clear_client_env() {
    unsafe {
        std::env::remove_var("AUCONNECT_BASE_URL");
        std::env::remove_var("AUCONNECT_MESSAGE_POLL_MS");
        std::env::remove_var("AUCONNECT_REQUEST_POLL_MS");
        std::env::remove_var("AUCONNECT_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("AUCONNECT_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("AUCONNECT_SESSION_FILE");
    }
}

static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[test]
fn from_env_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_client_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.message_poll, Duration::from_millis(5000));
    assert!(cfg.request_poll.is_none());
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_client_env();
        std::env::set_var("AUCONNECT_BASE_URL", "http://campus.test:9000/");
        std::env::set_var("AUCONNECT_MESSAGE_POLL_MS", "250");
        std::env::set_var("AUCONNECT_REQUEST_POLL_MS", "1000");
        std::env::set_var("AUCONNECT_REQUEST_TIMEOUT_SECS", "7");
        std::env::set_var("AUCONNECT_CONNECT_TIMEOUT_SECS", "2");
        std::env::set_var("AUCONNECT_SESSION_FILE", "/tmp/session.json");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "http://campus.test:9000");
    assert_eq!(cfg.message_poll, Duration::from_millis(250));
    assert_eq!(cfg.request_poll, Some(Duration::from_millis(1000)));
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 7, connect_secs: 2 });
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/session.json"));

    unsafe { clear_client_env() };
}

#[test]
fn from_env_rejects_zero_message_poll() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_client_env();
        std::env::set_var("AUCONNECT_MESSAGE_POLL_MS", "0");
    }

    let err = ClientConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("AUCONNECT_MESSAGE_POLL_MS"));

    unsafe { clear_client_env() };
}

#[test]
fn from_env_zero_request_poll_disables_timer() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_client_env();
        std::env::set_var("AUCONNECT_REQUEST_POLL_MS", "0");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert!(cfg.request_poll.is_none());

    unsafe { clear_client_env() };
}

#[test]
fn from_env_garbage_numbers_fall_back_to_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_client_env();
        std::env::set_var("AUCONNECT_MESSAGE_POLL_MS", "soon");
        std::env::set_var("AUCONNECT_REQUEST_TIMEOUT_SECS", "-1");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.message_poll, Duration::from_millis(DEFAULT_MESSAGE_POLL_MS));
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);

    unsafe { clear_client_env() };
}

#[test]
fn builder_overrides_normalize_base_url() {
    let cfg = ClientConfig::default()
        .with_base_url("  http://example.test/// ")
        .with_session_file("custom-session");
    assert_eq!(cfg.base_url, "http://example.test");
    assert_eq!(cfg.session_file, PathBuf::from("custom-session"));
}
