//! API 客户端模块
//!
//! 所有出站请求的唯一通道：注入 Bearer 认证头、归一化响应信封、
//! 并在认证类失败时触发全局副作用。
//!
//! 每个调用都解析为 [`ApiResult`]，网络或解析异常永远不会逃逸到
//! 调用方——调用方只需对结果分支，无需捕获任何东西。

use futures::channel::oneshot;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{FormData, ProgressEvent, XmlHttpRequest};

use maxtrace_shared::protocol::{ApiRequest, HttpMethod as ProtocolMethod};
use maxtrace_shared::{BEARER_PREFIX, HEADER_AUTHORIZATION};

use crate::web::{HttpBody, HttpClient, HttpMethod, HttpRequestBuilder};

// =========================================================
// 错误分类
// =========================================================

/// 错误分类枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 传输层失败（DNS、连接拒绝、CORS）
    Network,
    /// 401：会话失效
    Unauthenticated,
    /// 403：权限不足
    Forbidden,
    /// 422：表单校验失败，携带结构化细节
    Validation,
    /// 5xx：服务端错误
    Server,
    /// 其他非 2xx
    Http,
    /// 2xx 但响应体不可解析
    Parse,
}

impl ApiErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorKind::Network => "NETWORK_ERROR",
            ApiErrorKind::Unauthenticated => "UNAUTHENTICATED",
            ApiErrorKind::Forbidden => "FORBIDDEN",
            ApiErrorKind::Validation => "VALIDATION_ERROR",
            ApiErrorKind::Server => "SERVER_ERROR",
            ApiErrorKind::Http => "HTTP_ERROR",
            ApiErrorKind::Parse => "PARSE_ERROR",
        }
    }
}

/// 归一化后的失败结果
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: Option<String>,
    pub detail: Option<Value>,
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message: Some(message.into()),
            detail: None,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            status: None,
            message: Some(message.into()),
            detail: None,
        }
    }

    fn with_status(kind: ApiErrorKind, status: u16) -> Self {
        Self {
            kind,
            status: Some(status),
            message: None,
            detail: None,
        }
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.kind.code())?;
        if let Some(status) = self.status {
            write!(f, " ({})", status)?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

// =========================================================
// 注入的接缝
// =========================================================

/// Bearer 令牌来源
pub trait TokenSource {
    fn bearer_token(&self) -> Option<String>;
}

/// 认证类失败的全局副作用
///
/// 401/403/5xx/网络失败的处理集中在客户端层，
/// 各页面无需重复实现。
pub trait AuthEffects {
    /// 401：提示并清除会话（跳转由路由器的认证监听完成）
    fn on_session_expired(&self);
    /// 403：跳转到无权限说明页
    fn on_forbidden(&self);
    /// 瞬态错误提示（网络 / 服务端）
    fn notify(&self, message: &str);
}

// =========================================================
// 归一化（纯函数，可本地测试）
// =========================================================

/// 2xx 响应体归一化
///
/// 后端不统一：部分端点返回 `{success, data}` 信封，部分返回裸负载。
/// 两种都接受，对调用方透明。
pub(crate) fn normalize_ok(status: u16, body: &str) -> ApiResult<Value> {
    if status == 204 || body.trim().is_empty() {
        return Ok(Value::Null);
    }

    let parsed: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::parse(format!("响应体不是合法 JSON: {}", e)))?;

    match parsed.get("success").and_then(|v| v.as_bool()) {
        Some(true) => Ok(parsed.get("data").cloned().unwrap_or(Value::Null)),
        Some(false) => {
            // 2xx 状态码携带 success:false 的信封，按 HTTP_ERROR 归类
            let message = parsed
                .get("message")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            Err(ApiError {
                kind: ApiErrorKind::Http,
                status: Some(status),
                message,
                detail: None,
            })
        }
        None => Ok(parsed),
    }
}

/// 非 2xx 状态码的固定映射
pub(crate) fn classify_failure(status: u16, body: &str) -> ApiError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    match status {
        401 => ApiError::with_status(ApiErrorKind::Unauthenticated, status),
        403 => ApiError::with_status(ApiErrorKind::Forbidden, status),
        422 => {
            // detail / errors / message，先到先得
            let detail = parsed.as_ref().and_then(|v| {
                v.get("detail")
                    .or_else(|| v.get("errors"))
                    .or_else(|| v.get("message"))
                    .cloned()
            });
            ApiError {
                kind: ApiErrorKind::Validation,
                status: Some(status),
                message: None,
                detail,
            }
        }
        s if s >= 500 => ApiError::with_status(ApiErrorKind::Server, status),
        _ => {
            let message = parsed
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()));
            let detail = parsed.as_ref().and_then(|v| v.get("detail").cloned());
            ApiError {
                kind: ApiErrorKind::Http,
                status: Some(status),
                message,
                detail,
            }
        }
    }
}

/// 按错误分类触发副作用
///
/// 422 刻意不在这里处理——校验错误属于表单局部状态，
/// 由调用方就地展示。
pub(crate) fn dispatch_side_effects<E: AuthEffects>(error: &ApiError, effects: &E) {
    match error.kind {
        ApiErrorKind::Unauthenticated => effects.on_session_expired(),
        ApiErrorKind::Forbidden => effects.on_forbidden(),
        ApiErrorKind::Server => effects.notify("服务器异常，请稍后重试"),
        ApiErrorKind::Network => effects.notify("网络连接失败，请检查网络"),
        ApiErrorKind::Validation | ApiErrorKind::Http | ApiErrorKind::Parse => {}
    }
}

fn into_data<R: DeserializeOwned>(value: Value) -> ApiResult<R> {
    serde_json::from_value(value).map_err(|e| ApiError::parse(format!("数据反序列化失败: {}", e)))
}

// =========================================================
// 客户端
// =========================================================

/// API 客户端
///
/// 令牌来源与副作用通过泛型注入，测试时替换为 mock。
pub struct ApiClient<T: TokenSource, E: AuthEffects> {
    base_url: String,
    tokens: T,
    effects: E,
}

impl<T: TokenSource, E: AuthEffects> ApiClient<T, E> {
    pub fn new(base_url: impl Into<String>, tokens: T, effects: E) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            tokens,
            effects,
        }
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        for (i, (key, value)) in query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            let encoded = js_sys::encode_uri_component(value);
            url.push_str(&format!("{}{}={}", sep, key, String::from(encoded)));
        }
        url
    }

    fn builder(&self, method: HttpMethod, url: &str) -> HttpRequestBuilder {
        let builder = match method {
            HttpMethod::Get => HttpClient::get(url),
            HttpMethod::Post => HttpClient::post(url),
            HttpMethod::Put => HttpClient::put(url),
            HttpMethod::Delete => HttpClient::delete(url),
        };
        // 令牌存在即附加认证头，任何端点都不豁免
        match self.tokens.bearer_token() {
            Some(token) => builder.header(
                HEADER_AUTHORIZATION,
                &format!("{}{}", BEARER_PREFIX, token),
            ),
            None => builder,
        }
    }

    /// 核心请求管线：构建 -> 发送 -> 归一化 -> 副作用
    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, &str)],
        body: Option<HttpBody>,
    ) -> ApiResult<Value> {
        let url = self.url(path, query);
        let mut builder = self.builder(method, &url);

        builder = match body {
            // 只为 JSON 体设置 Content-Type；multipart 交给传输层生成边界
            Some(HttpBody::Json(json)) => builder
                .header("Content-Type", "application/json")
                .body(HttpBody::Json(json)),
            Some(form @ HttpBody::Form(_)) => builder.body(form),
            None => builder,
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                web_sys::console::warn_1(&format!("[Api] 传输失败: {}", e).into());
                let error = ApiError::network(e.to_string());
                dispatch_side_effects(&error, &self.effects);
                return Err(error);
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        self.conclude(status, &body)
    }

    /// 状态码与响应体 -> 归一化结果，并触发副作用
    fn conclude(&self, status: u16, body: &str) -> ApiResult<Value> {
        if (200..300).contains(&status) {
            normalize_ok(status, body)
        } else {
            let error = classify_failure(status, body);
            dispatch_side_effects(&error, &self.effects);
            Err(error)
        }
    }

    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<R> {
        let value = self.execute(HttpMethod::Get, path, query, None).await?;
        into_data(value)
    }

    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<R> {
        let json = serde_json::to_string(body)
            .map_err(|e| ApiError::parse(format!("请求体序列化失败: {}", e)))?;
        let value = self
            .execute(HttpMethod::Post, path, &[], Some(HttpBody::Json(json)))
            .await?;
        into_data(value)
    }

    pub async fn put<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<R> {
        let json = serde_json::to_string(body)
            .map_err(|e| ApiError::parse(format!("请求体序列化失败: {}", e)))?;
        let value = self
            .execute(HttpMethod::Put, path, &[], Some(HttpBody::Json(json)))
            .await?;
        into_data(value)
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        let value = self.execute(HttpMethod::Delete, path, &[], None).await?;
        into_data(value)
    }

    /// 按协议定义发送类型化请求
    pub async fn send<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        match R::METHOD {
            ProtocolMethod::Get => self.get(R::PATH, &[]).await,
            ProtocolMethod::Post => self.post(R::PATH, request).await,
            ProtocolMethod::Put | ProtocolMethod::Patch => self.put(R::PATH, request).await,
            ProtocolMethod::Delete => self.delete(R::PATH).await,
        }
    }

    /// 带进度回调的文件上传
    ///
    /// fetch 不暴露上传进度，这条路径走 XMLHttpRequest；
    /// 状态码映射与主管线保持一致。进度回调收到 0–100 的整数百分比。
    #[allow(dead_code)]
    pub async fn upload_with_progress(
        &self,
        path: &str,
        form: FormData,
        on_progress: impl Fn(u8) + 'static,
    ) -> ApiResult<Value> {
        let url = self.url(path, &[]);
        let xhr = XmlHttpRequest::new()
            .map_err(|_| ApiError::network("XMLHttpRequest 创建失败"))?;
        xhr.open("POST", &url)
            .map_err(|_| ApiError::network("请求打开失败"))?;

        if let Some(token) = self.tokens.bearer_token() {
            let _ = xhr.set_request_header(
                HEADER_AUTHORIZATION,
                &format!("{}{}", BEARER_PREFIX, token),
            );
        }

        let progress_cb = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
            if event.length_computable() && event.total() > 0.0 {
                let percent = ((event.loaded() / event.total()) * 100.0) as u8;
                on_progress(percent.min(100));
            }
        });
        if let Ok(upload) = xhr.upload() {
            upload.set_onprogress(Some(progress_cb.as_ref().unchecked_ref()));
        }

        let (sender, receiver) = oneshot::channel::<Result<(u16, String), String>>();
        let sender = std::rc::Rc::new(std::cell::RefCell::new(Some(sender)));

        let load_sender = sender.clone();
        let xhr_for_load = xhr.clone();
        let load_cb = Closure::<dyn FnMut()>::new(move || {
            let status = xhr_for_load.status().unwrap_or(0);
            let body = xhr_for_load
                .response_text()
                .ok()
                .flatten()
                .unwrap_or_default();
            if let Some(tx) = load_sender.borrow_mut().take() {
                let _ = tx.send(Ok((status, body)));
            }
        });
        xhr.set_onload(Some(load_cb.as_ref().unchecked_ref()));

        let error_sender = sender.clone();
        let error_cb = Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = error_sender.borrow_mut().take() {
                let _ = tx.send(Err("上传传输失败".to_string()));
            }
        });
        xhr.set_onerror(Some(error_cb.as_ref().unchecked_ref()));

        xhr.send_with_opt_form_data(Some(&form))
            .map_err(|_| ApiError::network("上传发送失败"))?;

        let outcome = receiver
            .await
            .map_err(|_| ApiError::network("上传通道中断"))?;

        match outcome {
            Ok((status, body)) => self.conclude(status, &body),
            Err(message) => {
                let error = ApiError::network(message);
                dispatch_side_effects(&error, &self.effects);
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests;
