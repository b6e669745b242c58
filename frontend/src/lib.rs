//! MaxTrace 前端应用
//!
//! 电池制造追溯平台的单页前端，采用 Context-Driven 的分层架构：
//! - `web::route`: 路由表（领域模型）
//! - `web::router`: 路由服务（核心引擎，hash 导航 + 守卫）
//! - `session`: 会话管理
//! - `api`: API 客户端（信封归一化 + 认证副作用）
//! - `store`: 键控可观察状态仓库
//! - `pages`: 页面模块层（render/init 能力接口）
//! - `components`: UI 组件层

mod api;
mod cache;
mod config;
mod pages;
mod services;
mod session;
mod store;

mod components {
    pub mod icons;
    pub mod shell;
    pub mod toast;
}

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod guard;
    mod http;
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;
    pub mod ws;

    pub use http::{HttpBody, HttpClient, HttpMethod, HttpRequestBuilder};
    pub use storage::{DurableStorage, TabStorage};
}

use leptos::prelude::*;

use crate::components::shell::AppShell;
use crate::components::toast::ToastHost;
use crate::services::Services;
use crate::web::router::{Router, RouterOutlet};

#[component]
pub fn App() -> impl IntoView {
    // 1. 装配全局服务并注入 Context
    let services = Services::new();
    provide_context(services.clone());

    view! {
        // 2. 路由器组件：持有服务集合实现守卫与页面初始化
        <Router services=services>
            <ToastHost />
            <AppShell>
                <RouterOutlet />
            </AppShell>
        </Router>
    }
}
