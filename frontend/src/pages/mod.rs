//! 页面模块层
//!
//! 每个页面实现固定的 render/init 能力接口：`render` 产出视图，
//! `init` 在渲染后执行副作用（可返回清理回调，由路由器在下一次
//! 导航前调用）。加载器是异步的，保留按需加载的形态。

use std::sync::Arc;

use futures::future::LocalBoxFuture;
use leptos::prelude::*;

use crate::services::Services;

mod dashboard;
mod login;
mod station;
mod unauthorized;

/// 页面清理回调：在下一个页面替换内容区之前执行
pub type PageCleanup = Box<dyn FnOnce()>;

/// 页面模块：渲染函数 + 初始化钩子
pub struct PageModule {
    pub render: Arc<dyn Fn() -> AnyView + Send + Sync>,
    pub init: Box<dyn FnOnce(&Services) -> Option<PageCleanup>>,
}

impl PageModule {
    /// 纯视图页面（无初始化副作用）
    pub fn view(render: impl Fn() -> AnyView + Send + Sync + 'static) -> Self {
        Self {
            render: Arc::new(render),
            init: Box::new(|_| None),
        }
    }

    /// 附加初始化钩子
    pub fn with_init(
        mut self,
        init: impl FnOnce(&Services) -> Option<PageCleanup> + 'static,
    ) -> Self {
        self.init = Box::new(init);
        self
    }
}

/// 页面加载失败
#[derive(Debug)]
pub enum PageError {
    LoadFailed(String),
}

impl core::fmt::Display for PageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PageError::LoadFailed(msg) => write!(f, "页面加载失败: {}", msg),
        }
    }
}

/// 页面加载器：路由表中的延迟加载入口
pub type PageLoader = fn() -> LocalBoxFuture<'static, Result<PageModule, PageError>>;

type LoadResult = LocalBoxFuture<'static, Result<PageModule, PageError>>;

// =========================================================
// 加载器
// =========================================================

pub fn load_login() -> LoadResult {
    Box::pin(async {
        Ok(PageModule::view(|| {
            view! { <login::LoginPage /> }.into_any()
        }))
    })
}

pub fn load_unauthorized() -> LoadResult {
    Box::pin(async {
        Ok(PageModule::view(|| {
            view! { <unauthorized::UnauthorizedPage /> }.into_any()
        }))
    })
}

pub fn load_dashboard() -> LoadResult {
    Box::pin(async {
        Ok(PageModule::view(|| {
            view! { <dashboard::DashboardPage /> }.into_any()
        })
        .with_init(dashboard::init))
    })
}

pub fn load_cell_registration() -> LoadResult {
    station::module("/production/cell-registration")
}

pub fn load_cell_grading() -> LoadResult {
    station::module("/production/cell-grading")
}

pub fn load_cell_sorting() -> LoadResult {
    station::module("/production/cell-sorting")
}

pub fn load_battery_assembly() -> LoadResult {
    station::module("/production/battery-assembly")
}

pub fn load_welding() -> LoadResult {
    station::module("/production/welding")
}

pub fn load_bms_mounting() -> LoadResult {
    station::module("/production/bms-mounting")
}

pub fn load_pack_grading() -> LoadResult {
    station::module("/production/pack-grading")
}

pub fn load_pdi_inspection() -> LoadResult {
    station::module("/production/pdi-inspection")
}

pub fn load_dispatch() -> LoadResult {
    station::module("/production/dispatch")
}

pub fn load_cell_inventory() -> LoadResult {
    station::module("/admin/cell-inventory")
}

pub fn load_traceability() -> LoadResult {
    station::module("/admin/traceability")
}
