use super::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> impl Fn(&Value) + Send + Sync + 'static {
    let log = Arc::clone(log);
    move |payload| log.lock().unwrap().push(format!("{name}:{payload}"))
}

#[test]
fn publish_without_subscribers_is_a_no_op() {
    let notifier = Notifier::new();
    assert_eq!(notifier.publish(MESSAGES_READ, &json!({ "sender": "bob" })), 0);
}

#[test]
fn handlers_run_in_registration_order() {
    let notifier = Notifier::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    notifier.subscribe(MESSAGES_READ, recorder(&log, "first"));
    notifier.subscribe(MESSAGES_READ, recorder(&log, "second"));
    notifier.subscribe(CONNECTIONS_CHANGED, recorder(&log, "other"));

    let delivered = notifier.publish(MESSAGES_READ, &json!(1));
    assert_eq!(delivered, 2);
    assert_eq!(*log.lock().unwrap(), vec!["first:1".to_owned(), "second:1".to_owned()]);
}

#[test]
fn each_publish_calls_each_handler_once() {
    let notifier = Notifier::new();
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    notifier.subscribe(MESSAGES_READ, move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    notifier.publish(MESSAGES_READ, &Value::Null);
    notifier.publish(MESSAGES_READ, &Value::Null);
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn double_unsubscribe_is_harmless_and_leaves_others() {
    let notifier = Notifier::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = notifier.subscribe(MESSAGES_READ, recorder(&log, "a"));
    notifier.subscribe(MESSAGES_READ, recorder(&log, "b"));

    assert!(notifier.unsubscribe(a));
    assert!(!notifier.unsubscribe(a));
    assert_eq!(notifier.subscriber_count(MESSAGES_READ), 1);

    notifier.publish(MESSAGES_READ, &json!("x"));
    assert_eq!(*log.lock().unwrap(), vec![r#"b:"x""#.to_owned()]);
}

#[test]
fn panicking_handler_does_not_block_the_rest() {
    let notifier = Notifier::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    notifier.subscribe(MESSAGES_READ, |_| panic!("handler failure"));
    notifier.subscribe(MESSAGES_READ, recorder(&log, "after"));

    assert_eq!(notifier.publish(MESSAGES_READ, &json!(true)), 2);
    assert_eq!(*log.lock().unwrap(), vec!["after:true".to_owned()]);

    // The registry stays usable after a panic.
    notifier.publish(MESSAGES_READ, &json!(false));
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn handler_may_unsubscribe_itself_during_publish() {
    let notifier = Arc::new(Notifier::new());
    let count = Arc::new(AtomicUsize::new(0));
    let slot: Arc<Mutex<Option<SubscriptionHandle>>> = Arc::new(Mutex::new(None));

    let handle = {
        let notifier = Arc::clone(&notifier);
        let count = Arc::clone(&count);
        let slot = Arc::clone(&slot);
        notifier.clone().subscribe(MESSAGES_READ, move |_| {
            count.fetch_add(1, Ordering::SeqCst);
            if let Some(h) = *slot.lock().unwrap() {
                notifier.unsubscribe(h);
            }
        })
    };
    *slot.lock().unwrap() = Some(handle);

    notifier.publish(MESSAGES_READ, &Value::Null);
    notifier.publish(MESSAGES_READ, &Value::Null);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(notifier.subscriber_count(MESSAGES_READ), 0);
}
