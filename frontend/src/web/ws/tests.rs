use super::*;

use maxtrace_shared::protocol::LiveMessage;

// =========================================================
// 退避曲线测试
// =========================================================

#[test]
fn test_backoff_doubles_from_one_second() {
    assert_eq!(backoff_delay_ms(0), 1_000);
    assert_eq!(backoff_delay_ms(1), 2_000);
    assert_eq!(backoff_delay_ms(2), 4_000);
    assert_eq!(backoff_delay_ms(3), 8_000);
    assert_eq!(backoff_delay_ms(4), 16_000);
}

#[test]
fn test_backoff_caps_at_thirty_seconds() {
    assert_eq!(backoff_delay_ms(5), 30_000);
    assert_eq!(backoff_delay_ms(6), 30_000);
    assert_eq!(backoff_delay_ms(u32::MAX), 30_000);
}

// =========================================================
// 地址选择测试
// =========================================================

#[test]
fn test_ws_host_alternates_between_candidates() {
    let host = "app.maxtrace.io";
    assert_eq!(config::ws_host_for(host, 0), config::WS_HOSTS[0]);
    assert_eq!(config::ws_host_for(host, 1), config::WS_HOSTS[1]);
    assert_eq!(config::ws_host_for(host, 2), config::WS_HOSTS[0]);
    assert_eq!(config::ws_host_for(host, 3), config::WS_HOSTS[1]);
}

#[test]
fn test_local_host_never_alternates() {
    for attempt in 0..4 {
        assert_eq!(
            config::ws_host_for("localhost", attempt),
            config::LOCAL_WS_HOST
        );
        assert_eq!(
            config::ws_host_for("127.0.0.1", attempt),
            config::LOCAL_WS_HOST
        );
    }
}

#[test]
fn test_ws_url_matches_page_protocol() {
    assert_eq!(
        config::ws_url_for(true, "api.maxtrace.io", "tok"),
        "wss://api.maxtrace.io/ws/dashboard?token=tok"
    );
    assert_eq!(
        config::ws_url_for(false, "localhost:8000", "tok"),
        "ws://localhost:8000/ws/dashboard?token=tok"
    );
}

#[test]
fn test_api_origin_by_host() {
    assert_eq!(config::api_origin_for("localhost"), config::LOCAL_API_ORIGIN);
    assert_eq!(config::api_origin_for("127.0.0.1"), config::LOCAL_API_ORIGIN);
    assert_eq!(
        config::api_origin_for("app.maxtrace.io"),
        config::PRODUCTION_API_ORIGIN
    );
}

// =========================================================
// 消息解析测试
// =========================================================

#[test]
fn test_live_message_with_snapshot() {
    let raw = r#"{
        "success": true,
        "data": {
            "kpis": {"total_cells": 120},
            "recent_activity": [],
            "stage_breakdown": {},
            "todays_output": 12
        }
    }"#;
    let message: LiveMessage = serde_json::from_str(raw).unwrap();
    assert!(message.success);
    let snapshot = message.data.unwrap();
    assert_eq!(snapshot.kpis["total_cells"], 120);
    assert_eq!(snapshot.todays_output, serde_json::json!(12));
}

#[test]
fn test_live_message_failure_has_no_data() {
    let message: LiveMessage = serde_json::from_str(r#"{"success":false}"#).unwrap();
    assert!(!message.success);
    assert!(message.data.is_none());
}
