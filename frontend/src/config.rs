//! 环境配置模块
//!
//! 根据页面所在主机选择后端地址：本地开发主机映射到本地后端端口，
//! 其他任何主机一律指向固定的生产源。

pub const LOCAL_API_ORIGIN: &str = "http://localhost:8000";
pub const PRODUCTION_API_ORIGIN: &str = "https://api.maxtrace.io";

/// WebSocket 候选主机，重连时交替尝试
pub const WS_HOSTS: [&str; 2] = ["api.maxtrace.io", "ws.maxtrace.io"];
pub const LOCAL_WS_HOST: &str = "localhost:8000";
pub const WS_DASHBOARD_PATH: &str = "/ws/dashboard";

fn is_local_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1")
}

/// 主机名 -> REST 后端源
pub fn api_origin_for(host: &str) -> &'static str {
    if is_local_host(host) {
        LOCAL_API_ORIGIN
    } else {
        PRODUCTION_API_ORIGIN
    }
}

/// 主机名 + 重连次数 -> WebSocket 主机
///
/// 生产环境在两个候选主机之间交替，提高单点故障时的恢复概率。
pub fn ws_host_for(page_host: &str, attempt: u32) -> &'static str {
    if is_local_host(page_host) {
        LOCAL_WS_HOST
    } else {
        WS_HOSTS[(attempt % 2) as usize]
    }
}

/// 拼接 WebSocket 地址，协议与页面协议保持一致（wss/ws），
/// 令牌以查询参数传递。
pub fn ws_url_for(secure: bool, host: &str, token: &str) -> String {
    let scheme = if secure { "wss" } else { "ws" };
    format!("{scheme}://{host}{WS_DASHBOARD_PATH}?token={token}")
}

fn window() -> Option<web_sys::Window> {
    web_sys::window()
}

/// 当前页面主机名
pub fn page_hostname() -> String {
    window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default()
}

/// 当前页面是否为 https
pub fn page_is_secure() -> bool {
    window()
        .and_then(|w| w.location().protocol().ok())
        .map(|p| p == "https:")
        .unwrap_or(false)
}

/// 当前环境下的 REST 后端源
pub fn api_base_url() -> String {
    api_origin_for(&page_hostname()).to_string()
}

/// 当前环境下第 `attempt` 次连接应使用的 WebSocket 地址
pub fn ws_url(attempt: u32, token: &str) -> String {
    ws_url_for(page_is_secure(), ws_host_for(&page_hostname(), attempt), token)
}
