use super::*;

use serde_json::json;

// =========================================================
// 辅助函数
// =========================================================

/// 记录 (新值, 旧值) 通知的共享日志
fn recorder() -> (
    Arc<Mutex<Vec<(Value, Option<Value>)>>>,
    impl Fn(&Value, Option<&Value>) + Send + Sync + 'static,
) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let listener = move |new: &Value, prev: Option<&Value>| {
        if let Ok(mut entries) = sink.lock() {
            entries.push((new.clone(), prev.cloned()));
        }
    };
    (log, listener)
}

fn entries(log: &Arc<Mutex<Vec<(Value, Option<Value>)>>>) -> Vec<(Value, Option<Value>)> {
    log.lock().map(|e| e.clone()).unwrap_or_default()
}

// =========================================================
// 读写测试
// =========================================================

#[test]
fn test_get_returns_stored_value() {
    let store = StateStore::new();
    assert!(store.get("missing").is_none());

    store.set("count", json!(3));
    assert_eq!(store.get("count"), Some(json!(3)));
}

#[test]
fn test_get_or_falls_back_to_default() {
    let store = StateStore::new();
    assert_eq!(store.get_or("missing", json!("default")), json!("default"));

    store.set("present", json!(1));
    assert_eq!(store.get_or("present", json!(0)), json!(1));
}

#[test]
fn test_set_overwrites_previous_value() {
    let store = StateStore::new();
    store.set("k", json!("a"));
    store.set("k", json!("b"));
    assert_eq!(store.get("k"), Some(json!("b")));
}

// =========================================================
// 订阅通知测试
// =========================================================

#[test]
fn test_subscriber_receives_new_and_previous() {
    let store = StateStore::new();
    let (log, listener) = recorder();
    let _keep = store.subscribe("k", listener);

    store.set("k", json!(1));
    store.set("k", json!(2));

    assert_eq!(
        entries(&log),
        vec![(json!(1), None), (json!(2), Some(json!(1)))]
    );
}

#[test]
fn test_notification_is_scoped_to_key() {
    let store = StateStore::new();
    let (log, listener) = recorder();
    let _keep = store.subscribe("watched", listener);

    store.set("other", json!(true));
    assert!(entries(&log).is_empty());
}

#[test]
fn test_multiple_subscribers_all_notified() {
    let store = StateStore::new();
    let (first_log, first) = recorder();
    let (second_log, second) = recorder();
    let _a = store.subscribe("k", first);
    let _b = store.subscribe("k", second);

    store.set("k", json!("x"));

    assert_eq!(entries(&first_log).len(), 1);
    assert_eq!(entries(&second_log).len(), 1);
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let store = StateStore::new();
    let (log, listener) = recorder();
    let unsubscribe = store.subscribe("k", listener);

    store.set("k", json!(1));
    unsubscribe();
    store.set("k", json!(2));

    assert_eq!(entries(&log).len(), 1);
}

#[test]
fn test_unsubscribe_only_removes_its_own_listener() {
    let store = StateStore::new();
    let (kept_log, kept) = recorder();
    let (dropped_log, dropped) = recorder();
    let _keep = store.subscribe("k", kept);
    let unsubscribe = store.subscribe("k", dropped);

    unsubscribe();
    store.set("k", json!(1));

    assert_eq!(entries(&kept_log).len(), 1);
    assert!(entries(&dropped_log).is_empty());
}

#[test]
fn test_listener_may_write_back_into_store() {
    // 订阅者回调中再次写入同一仓库（另一键）不应死锁
    let store = StateStore::new();
    let echo = store.clone();
    let _keep = store.subscribe("source", move |new, _| {
        echo.set("mirror", new.clone());
    });

    store.set("source", json!(42));
    assert_eq!(store.get("mirror"), Some(json!(42)));
}

// =========================================================
// 删除与清空测试
// =========================================================

#[test]
fn test_remove_drops_value_and_subscribers() {
    let store = StateStore::new();
    let (log, listener) = recorder();
    let _keep = store.subscribe("k", listener);
    store.set("k", json!(1));

    store.remove("k");

    assert!(store.get("k").is_none());
    store.set("k", json!(2));
    // remove 之后旧订阅者不再收到通知
    assert_eq!(entries(&log).len(), 1);
}

#[test]
fn test_clear_empties_everything() {
    let store = StateStore::new();
    let (log, listener) = recorder();
    let _keep = store.subscribe("a", listener);
    store.set("a", json!(1));
    store.set("b", json!(2));

    store.clear();

    assert!(store.get("a").is_none());
    assert!(store.get("b").is_none());
    store.set("a", json!(3));
    assert_eq!(entries(&log).len(), 1);
}
