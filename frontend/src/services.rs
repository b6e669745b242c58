//! 服务集合
//!
//! 会话、API 客户端、状态仓库与通知仓库在此装配成一个可克隆的
//! 句柄，由 App 根部注入 Context，组件按需取用。

use std::sync::Arc;

use leptos::prelude::*;

use maxtrace_shared::protocol::DashboardSnapshot;

use crate::api::{ApiClient, AuthEffects, TokenSource};
use crate::components::toast::ToastStore;
use crate::config;
use crate::session::SessionService;
use crate::store::StateStore;
use crate::web::route;

/// 会话令牌桥接：API 客户端从会话服务取 Bearer 令牌
pub struct SessionTokens(Arc<SessionService>);

impl TokenSource for SessionTokens {
    fn bearer_token(&self) -> Option<String> {
        self.0.token()
    }
}

/// 认证类失败的全局处理
pub struct AppEffects {
    session: Arc<SessionService>,
    state: StateStore,
    toasts: ToastStore,
}

impl AuthEffects for AppEffects {
    fn on_session_expired(&self) {
        self.toasts.warning("登录已过期，请重新登录");
        self.session.logout();
        self.state.clear();
        // 跳转由路由器的认证监听完成
    }

    fn on_forbidden(&self) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_hash(route::PATH_UNAUTHORIZED);
        }
    }

    fn notify(&self, message: &str) {
        self.toasts.error(message);
    }
}

/// 装配完成的 API 客户端类型
pub type AppApi = ApiClient<SessionTokens, AppEffects>;

/// 全局服务句柄
#[derive(Clone)]
pub struct Services {
    pub session: Arc<SessionService>,
    pub api: Arc<AppApi>,
    pub state: StateStore,
    pub toasts: ToastStore,
    /// 仪表盘实时快照信号（由仪表盘页面的初始化钩子喂入）
    pub live_dashboard: RwSignal<Option<DashboardSnapshot>>,
}

impl Services {
    pub fn new() -> Self {
        let session = Arc::new(SessionService::new());
        let state = StateStore::new();
        let toasts = ToastStore::new();

        let api = Arc::new(ApiClient::new(
            config::api_base_url(),
            SessionTokens(session.clone()),
            AppEffects {
                session: session.clone(),
                state: state.clone(),
                toasts,
            },
        ));

        Self {
            session,
            api,
            state,
            toasts,
            live_dashboard: RwSignal::new(None),
        }
    }

    /// 用户主动登出：清会话、清共享状态
    pub fn sign_out(&self) {
        self.session.logout();
        self.state.clear();
        self.live_dashboard.set(None);
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取服务句柄
pub fn use_services() -> Services {
    use_context::<Services>()
        .expect("Services not found in context. Ensure App provides them.")
}
