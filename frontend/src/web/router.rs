//! 路由服务模块 - 核心引擎
//!
//! 封装基于 hash 的导航：所有对 location.hash / History API 的操作
//! 都集中在此模块。实现"清理 -> 验证 -> 加载 -> 渲染 -> 初始化"
//! 的导航流程。
//!
//! 并发说明：每次导航持有一个单调递增的序号，加载完成时序号
//! 已过期的结果直接丢弃，内容区永远反映最近一次触发。

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;

use crate::pages::{PageCleanup, PageModule};
use crate::services::Services;

use super::{guard, route};

// =========================================================
// 浏览器原语
// =========================================================

/// 当前 hash 路径（去掉前导 '#'，空 hash 视为根路径）
fn current_hash_path() -> String {
    let hash = web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default();
    let path = hash.trim_start_matches('#');
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// 推入新 hash（产生历史记录，触发 hashchange）
fn push_hash(path: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_hash(path);
    }
}

/// 替换当前 hash（用于重定向，不产生历史记录，也不触发事件）
fn replace_hash(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(
                &JsValue::NULL,
                "",
                Some(&format!("#{}", path)),
            );
        }
    }
}

fn set_document_title(title: &str) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(&format!("{} · MaxTrace", title));
    }
}

// =========================================================
// 导航生命周期状态
// =========================================================

/// 导航序号与待执行的页面清理回调
///
/// 任一时刻最多挂起一个清理回调；它总是在下一个页面的内容
/// 替换内容区之前被执行。
pub(crate) struct NavLifecycle {
    seq: Cell<u64>,
    pending_cleanup: RefCell<Option<PageCleanup>>,
}

impl NavLifecycle {
    pub(crate) fn new() -> Self {
        Self {
            seq: Cell::new(0),
            pending_cleanup: RefCell::new(None),
        }
    }

    /// 开始一次导航：执行上一页的清理回调，返回新序号
    pub(crate) fn begin(&self) -> u64 {
        if let Some(cleanup) = self.pending_cleanup.borrow_mut().take() {
            cleanup();
        }
        let seq = self.seq.get() + 1;
        self.seq.set(seq);
        seq
    }

    /// 序号是否仍是最新一次导航
    pub(crate) fn is_current(&self, seq: u64) -> bool {
        self.seq.get() == seq
    }

    /// 完成一次导航：仅当序号仍最新时记录清理回调
    pub(crate) fn finish(&self, seq: u64, cleanup: Option<PageCleanup>) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        *self.pending_cleanup.borrow_mut() = cleanup;
        true
    }
}

// =========================================================
// 路由服务
// =========================================================

/// 内容区状态
pub enum OutletState {
    /// 页面模块加载中
    Loading,
    /// 加载或初始化失败
    Failed { path: String },
    /// 渲染就绪
    Ready(Arc<dyn Fn() -> AnyView + Send + Sync>),
}

/// 组件侧的路由句柄（通过 Context 共享）
#[derive(Clone, Copy)]
pub struct RouterHandle {
    current_path: RwSignal<String>,
    outlet: RwSignal<OutletState>,
}

impl RouterHandle {
    /// 当前路径信号（用于导航高亮）
    pub fn current_path(&self) -> ReadSignal<String> {
        self.current_path.read_only()
    }

    /// 程序化导航（推入历史记录）
    pub fn navigate(&self, path: &str) {
        push_hash(path);
    }
}

/// 路由器服务
///
/// 持有导航生命周期状态，只存活于事件监听闭包中；
/// 组件通过 [`RouterHandle`] 交互。
#[derive(Clone)]
pub struct RouterService {
    handle: RouterHandle,
    services: Services,
    lifecycle: Rc<NavLifecycle>,
}

impl RouterService {
    fn new(services: Services) -> Self {
        Self {
            handle: RouterHandle {
                current_path: RwSignal::new(current_hash_path()),
                outlet: RwSignal::new(OutletState::Loading),
            },
            services,
            lifecycle: Rc::new(NavLifecycle::new()),
        }
    }

    /// 重定向：替换 hash 后直接重入生命周期
    /// （replaceState 不触发 hashchange）
    fn redirect(&self, path: &str) {
        replace_hash(path);
        self.handle_navigation(path);
    }

    /// **核心方法：导航生命周期**
    fn handle_navigation(&self, path: &str) {
        // 根路径按角色解析默认落地页
        if path.is_empty() || path == "/" {
            let role = if self.services.session.is_authenticated() {
                self.services.session.role()
            } else {
                None
            };
            self.redirect(route::default_route(role));
            return;
        }

        // --- Step 1: 上一页清理 ---
        let seq = self.lifecycle.begin();

        // --- Step 2: 守卫 ---
        let authenticated = self.services.session.is_authenticated();
        let role = if authenticated {
            self.services.session.role()
        } else {
            None
        };
        let access = guard::check(path, authenticated, role);
        if !access.is_allowed() {
            let target = access.redirect().unwrap_or(route::PATH_LOGIN);
            web_sys::console::log_1(
                &format!("[Router] 拒绝访问 {} ({:?})，重定向到 {}", path, access, target)
                    .into(),
            );
            self.redirect(target);
            return;
        }

        let Some(descriptor) = route::find(path) else {
            // 守卫放行过的路径必然在表内；防御性兜底
            self.redirect(route::PATH_LOGIN);
            return;
        };

        // --- Step 3: 通知监听者，更新标题 ---
        self.handle.current_path.set(path.to_string());
        set_document_title(descriptor.title);

        // --- Step 4: 加载占位 -> 异步加载 -> 渲染 -> init ---
        self.handle.outlet.set(OutletState::Loading);

        let outlet = self.handle.outlet;
        let services = self.services.clone();
        let lifecycle = self.lifecycle.clone();
        let loader = descriptor.loader;
        let path = path.to_string();
        spawn_local(async move {
            let result = loader().await;

            if !lifecycle.is_current(seq) {
                web_sys::console::log_1(
                    &format!("[Router] 丢弃过期的页面加载: {}", path).into(),
                );
                return;
            }

            match result {
                Ok(module) => {
                    let PageModule { render, init } = module;
                    outlet.set(OutletState::Ready(render));
                    let cleanup = init(&services);
                    lifecycle.finish(seq, cleanup);
                }
                Err(e) => {
                    web_sys::console::error_1(
                        &format!("[Router] 页面加载失败 {}: {}", path, e).into(),
                    );
                    outlet.set(OutletState::Failed { path });
                }
            }
        });
    }

    /// 初始化 hashchange 监听（所有导航统一汇入一个处理器）
    fn init_hashchange_listener(&self) {
        let router = self.clone();
        let closure = Closure::<dyn Fn()>::new(move || {
            router.handle_navigation(&current_hash_path());
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let router = self.clone();
        let is_authenticated = self.services.session.is_authenticated_signal();
        let current_path = self.handle.current_path;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let path = current_path.get_untracked();

            if is_auth {
                // 刚登录：离开登录页，进入角色落地页
                if path == route::PATH_LOGIN || path == "/" {
                    let target = route::default_route(router.services.session.role());
                    web_sys::console::log_1(
                        &format!("[Router] 已登录，跳转 {}", target).into(),
                    );
                    router.handle.navigate(target);
                }
            } else {
                // 刚登出：受保护页面一律回登录页
                let on_protected = route::find(&path)
                    .map(|r| !r.roles.is_empty())
                    .unwrap_or(false);
                if on_protected {
                    web_sys::console::log_1(&"[Router] 已登出，回到登录页".into());
                    router.redirect(route::PATH_LOGIN);
                }
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(services: Services) -> RouterHandle {
    let router = RouterService::new(services);
    let handle = router.handle;

    router.init_hashchange_listener();
    router.setup_auth_redirect();

    // 初始加载
    router.handle_navigation(&current_hash_path());

    provide_context(handle);
    handle
}

/// 从 Context 获取路由句柄
pub fn use_router() -> RouterHandle {
    use_context::<RouterHandle>()
        .expect("RouterHandle not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 服务集合（会话、API、状态仓库）
    services: Services,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(services);

    children()
}

/// 路由出口组件
///
/// 根据内容区状态渲染加载占位、错误页或页面视图。
#[component]
pub fn RouterOutlet() -> impl IntoView {
    let router = use_router();
    let outlet = router.outlet;

    move || {
        outlet.with(|state| match state {
            OutletState::Loading => view! {
                <div class="flex items-center justify-center min-h-[50vh]">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any(),
            OutletState::Failed { path } => {
                let path = path.clone();
                view! {
                    <div class="flex items-center justify-center min-h-[50vh]">
                        <div class="card bg-base-100 shadow-xl max-w-md">
                            <div class="card-body text-center">
                                <h2 class="card-title justify-center text-error">"页面加载失败"</h2>
                                <p class="text-base-content/70 font-mono text-sm">{path}</p>
                                <div class="card-actions justify-center mt-4">
                                    <a href="#/" class="btn btn-primary">"返回首页"</a>
                                </div>
                            </div>
                        </div>
                    </div>
                }
                .into_any()
            }
            OutletState::Ready(render) => render(),
        })
    }
}

#[cfg(test)]
mod tests;
