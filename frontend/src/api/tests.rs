use super::*;

use std::cell::{Cell, RefCell};

use serde_json::json;

// =========================================================
// 辅助函数
// =========================================================

/// 记录副作用调用的 mock
#[derive(Default)]
struct RecordingEffects {
    expired: Cell<u32>,
    forbidden: Cell<u32>,
    notices: RefCell<Vec<String>>,
}

impl AuthEffects for RecordingEffects {
    fn on_session_expired(&self) {
        self.expired.set(self.expired.get() + 1);
    }

    fn on_forbidden(&self) {
        self.forbidden.set(self.forbidden.get() + 1);
    }

    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }
}

// =========================================================
// normalize_ok 测试
// =========================================================

#[test]
fn test_enveloped_success_unwraps_data() {
    let body = r#"{"success":true,"data":{"id":1}}"#;
    assert_eq!(normalize_ok(200, body).unwrap(), json!({"id":1}));
}

#[test]
fn test_enveloped_success_without_data_is_null() {
    let body = r#"{"success":true}"#;
    assert_eq!(normalize_ok(200, body).unwrap(), Value::Null);
}

#[test]
fn test_bare_payload_passes_through() {
    let body = r#"{"token":"abc","user":{"id":1}}"#;
    let value = normalize_ok(200, body).unwrap();
    assert_eq!(value["token"], "abc");
    // success 字段缺失时不做信封解释
    assert_eq!(value["user"]["id"], 1);
}

#[test]
fn test_bare_array_passes_through() {
    let value = normalize_ok(200, "[1,2,3]").unwrap();
    assert_eq!(value, json!([1, 2, 3]));
}

#[test]
fn test_no_content_and_empty_body_are_null() {
    assert_eq!(normalize_ok(204, "").unwrap(), Value::Null);
    assert_eq!(normalize_ok(200, "   ").unwrap(), Value::Null);
}

#[test]
fn test_envelope_failure_on_2xx_maps_to_http_error() {
    let body = r#"{"success":false,"message":"序列号已存在"}"#;
    let error = normalize_ok(200, body).unwrap_err();
    assert_eq!(error.kind, ApiErrorKind::Http);
    assert_eq!(error.kind.code(), "HTTP_ERROR");
    assert_eq!(error.status, Some(200));
    assert_eq!(error.message.as_deref(), Some("序列号已存在"));
}

#[test]
fn test_invalid_json_maps_to_parse_error() {
    let error = normalize_ok(200, "<html>gateway</html>").unwrap_err();
    assert_eq!(error.kind, ApiErrorKind::Parse);
    assert_eq!(error.kind.code(), "PARSE_ERROR");
}

// =========================================================
// classify_failure 测试
// =========================================================

#[test]
fn test_401_is_unauthenticated() {
    let error = classify_failure(401, "{}");
    assert_eq!(error.kind, ApiErrorKind::Unauthenticated);
    assert_eq!(error.kind.code(), "UNAUTHENTICATED");
    assert_eq!(error.status, Some(401));
}

#[test]
fn test_403_is_forbidden() {
    let error = classify_failure(403, "");
    assert_eq!(error.kind, ApiErrorKind::Forbidden);
    assert_eq!(error.kind.code(), "FORBIDDEN");
}

#[test]
fn test_422_extracts_detail_with_precedence() {
    // detail 优先
    let error = classify_failure(422, r#"{"detail":"工号不存在","errors":["x"]}"#);
    assert_eq!(error.kind, ApiErrorKind::Validation);
    assert_eq!(error.detail, Some(json!("工号不存在")));

    // 没有 detail 时取 errors
    let error = classify_failure(422, r#"{"errors":{"password":["太短"]}}"#);
    assert_eq!(error.detail, Some(json!({"password":["太短"]})));

    // 最后退到 message
    let error = classify_failure(422, r#"{"message":"校验失败"}"#);
    assert_eq!(error.detail, Some(json!("校验失败")));
}

#[test]
fn test_422_without_body_keeps_kind() {
    let error = classify_failure(422, "not json");
    assert_eq!(error.kind, ApiErrorKind::Validation);
    assert_eq!(error.kind.code(), "VALIDATION_ERROR");
    assert!(error.detail.is_none());
}

#[test]
fn test_5xx_is_server_error() {
    for status in [500, 502, 503] {
        let error = classify_failure(status, "");
        assert_eq!(error.kind, ApiErrorKind::Server);
        assert_eq!(error.status, Some(status));
    }
    assert_eq!(classify_failure(500, "").kind.code(), "SERVER_ERROR");
}

#[test]
fn test_other_4xx_keeps_message_and_detail() {
    let error = classify_failure(404, r#"{"message":"不存在","detail":{"id":9}}"#);
    assert_eq!(error.kind, ApiErrorKind::Http);
    assert_eq!(error.message.as_deref(), Some("不存在"));
    assert_eq!(error.detail, Some(json!({"id":9})));
}

#[test]
fn test_other_4xx_with_plain_body_uses_raw_text() {
    let error = classify_failure(409, "conflict");
    assert_eq!(error.kind, ApiErrorKind::Http);
    assert_eq!(error.message.as_deref(), Some("conflict"));
}

// =========================================================
// 副作用分发测试
// =========================================================

#[test]
fn test_401_triggers_session_expired_once() {
    let effects = RecordingEffects::default();
    let error = classify_failure(401, "");

    dispatch_side_effects(&error, &effects);

    assert_eq!(effects.expired.get(), 1);
    assert_eq!(effects.forbidden.get(), 0);
    assert!(effects.notices.borrow().is_empty());
}

#[test]
fn test_403_triggers_forbidden() {
    let effects = RecordingEffects::default();
    dispatch_side_effects(&classify_failure(403, ""), &effects);

    assert_eq!(effects.forbidden.get(), 1);
    assert_eq!(effects.expired.get(), 0);
}

#[test]
fn test_server_and_network_errors_notify() {
    let effects = RecordingEffects::default();
    dispatch_side_effects(&classify_failure(500, ""), &effects);
    dispatch_side_effects(&ApiError::network("dns"), &effects);

    assert_eq!(effects.notices.borrow().len(), 2);
    assert_eq!(effects.expired.get(), 0);
    assert_eq!(effects.forbidden.get(), 0);
}

#[test]
fn test_validation_errors_stay_local() {
    // 422 属于表单局部状态，不触发任何全局副作用
    let effects = RecordingEffects::default();
    dispatch_side_effects(&classify_failure(422, r#"{"detail":"x"}"#), &effects);

    assert_eq!(effects.expired.get(), 0);
    assert_eq!(effects.forbidden.get(), 0);
    assert!(effects.notices.borrow().is_empty());
}

#[test]
fn test_http_and_parse_errors_have_no_side_effects() {
    let effects = RecordingEffects::default();
    dispatch_side_effects(&classify_failure(404, ""), &effects);
    dispatch_side_effects(&ApiError::parse("bad json"), &effects);

    assert_eq!(effects.expired.get(), 0);
    assert_eq!(effects.forbidden.get(), 0);
    assert!(effects.notices.borrow().is_empty());
}

// =========================================================
// 错误展示测试
// =========================================================

#[test]
fn test_error_display_includes_code_and_status() {
    let error = classify_failure(401, "");
    assert_eq!(error.to_string(), "UNAUTHENTICATED (401)");

    let error = ApiError::network("连接被拒绝");
    assert_eq!(error.to_string(), "NETWORK_ERROR: 连接被拒绝");
}
