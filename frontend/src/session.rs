//! 会话管理模块
//!
//! 令牌与用户档案成对存取于标签页级存储（sessionStorage），
//! 关闭标签页即失效，绝不落入跨会话的持久化存储。
//!
//! 客户端的过期检查只解码 JWT 的 exp 声明，不验证签名：
//! 这是纯粹的用户体验优化，权威校验由后端在每次调用时完成。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use leptos::prelude::*;
use maxtrace_shared::{Role, UserProfile};

use crate::web::TabStorage;

const TOKEN_KEY: &str = "maxtrace_token";
const USER_KEY: &str = "maxtrace_user";

/// 会话存储介质抽象
///
/// 生产实现为 [`TabStorage`]，测试注入内存实现。
pub trait SessionMedium {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> bool;
    fn erase(&self, key: &str) -> bool;
}

/// 令牌解码失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// 不是三段式 JWT
    Malformed,
    /// 负载不是可解析的 Base64/JSON
    InvalidClaims,
}

impl core::fmt::Display for TokenError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "令牌格式错误"),
            TokenError::InvalidClaims => write!(f, "令牌声明不可解析"),
        }
    }
}

/// 解码 JWT 负载中的 exp 声明（Unix 秒）
///
/// - `Ok(Some(exp))`: 负载可解码且带 exp
/// - `Ok(None)`: 负载可解码但没有 exp —— 视为长期有效
/// - `Err(_)`: 令牌不可解码
pub fn decode_expiry(token: &str) -> Result<Option<i64>, TokenError> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(TokenError::Malformed),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::InvalidClaims)?;
    let claims: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|_| TokenError::InvalidClaims)?;

    Ok(claims.get("exp").and_then(|v| v.as_i64()))
}

/// 当前 Unix 秒
pub fn now_epoch_secs() -> i64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Date::now() / 1000.0) as i64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// 会话存储
///
/// 令牌与用户档案总是成对写入、成对清除。
#[derive(Clone)]
pub struct SessionStore<M: SessionMedium> {
    medium: M,
}

impl<M: SessionMedium> SessionStore<M> {
    pub fn new(medium: M) -> Self {
        Self { medium }
    }

    /// 持久化令牌与用户档案
    pub fn login(&self, token: &str, user: &UserProfile) {
        let encoded = match serde_json::to_string(user) {
            Ok(json) => json,
            Err(_) => return,
        };
        self.medium.write(TOKEN_KEY, token);
        self.medium.write(USER_KEY, &encoded);
    }

    /// 清除会话，幂等
    pub fn logout(&self) {
        self.medium.erase(TOKEN_KEY);
        self.medium.erase(USER_KEY);
    }

    pub fn token(&self) -> Option<String> {
        self.medium.read(TOKEN_KEY)
    }

    /// 存储内容损坏时返回 None，而不是抛出错误
    pub fn user(&self) -> Option<UserProfile> {
        let raw = self.medium.read(USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }

    /// 角色白名单检查：空白名单表示无限制
    pub fn is_authorized(&self, allowed: &[Role]) -> bool {
        if allowed.is_empty() {
            return true;
        }
        match self.role() {
            Some(role) => allowed.contains(&role),
            None => false,
        }
    }

    /// 权威检查：过期或不可解码的令牌会被清除
    ///
    /// exp 严格早于 `now_secs` 视为过期。
    pub fn authenticated_at(&self, now_secs: i64) -> bool {
        if self.check_at(now_secs) {
            return true;
        }
        if self.token().is_some() {
            self.logout();
        }
        false
    }

    /// 只读检查，无任何副作用（供响应式派生使用）
    pub fn peek_authenticated(&self, now_secs: i64) -> bool {
        self.check_at(now_secs)
    }

    fn check_at(&self, now_secs: i64) -> bool {
        let Some(token) = self.token() else {
            return false;
        };
        match decode_expiry(&token) {
            Ok(Some(exp)) => exp >= now_secs,
            Ok(None) => true,
            Err(_) => false,
        }
    }
}

/// 会话服务
///
/// 在 [`SessionStore`] 之上叠加一个版本信号，令路由器可以
/// 观察登录/登出而无需与存储层耦合。
pub struct SessionService {
    store: SessionStore<TabStorage>,
    version: RwSignal<u64>,
}

impl SessionService {
    pub fn new() -> Self {
        Self {
            store: SessionStore::new(TabStorage),
            version: RwSignal::new(0),
        }
    }

    fn bump(&self) {
        self.version.update(|v| *v += 1);
    }

    pub fn login(&self, token: &str, user: &UserProfile) {
        self.store.login(token, user);
        self.bump();
    }

    /// 幂等；路由器监听认证信号后负责跳转到登录页
    pub fn logout(&self) {
        self.store.logout();
        self.bump();
    }

    /// 导航守卫使用的权威检查：本地过期即清除会话
    pub fn is_authenticated(&self) -> bool {
        let had_token = self.store.token().is_some();
        let ok = self.store.authenticated_at(now_epoch_secs());
        if had_token && !ok {
            self.bump();
        }
        ok
    }

    /// 认证状态信号（只读探测，由版本信号驱动更新）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let version = self.version;
        let store = self.store.clone();
        Signal::derive(move || {
            version.get();
            store.peek_authenticated(now_epoch_secs())
        })
    }

    pub fn token(&self) -> Option<String> {
        self.store.token()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.store.user()
    }

    pub fn role(&self) -> Option<Role> {
        self.store.role()
    }

    #[allow(dead_code)]
    pub fn is_authorized(&self, allowed: &[Role]) -> bool {
        self.store.is_authorized(allowed)
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new()
    }
}
