//! 工位页面外壳
//!
//! 生产工位与后台查询页共用的页面骨架：面包屑、标题、工位信息。
//! 具体的业务表单（注册、焊接参数、发货单等）由各工位的业务模块
//! 挂载，不属于本层。

use futures::future::LocalBoxFuture;
use leptos::prelude::*;

use crate::web::route;

use super::{PageError, PageModule};

/// 按路径构建工位页面模块
pub fn module(path: &'static str) -> LocalBoxFuture<'static, Result<PageModule, PageError>> {
    Box::pin(async move {
        if route::find(path).is_none() {
            return Err(PageError::LoadFailed(format!("未注册的工位路径: {}", path)));
        }
        Ok(PageModule::view(move || {
            view! { <StationPage path=path /> }.into_any()
        }))
    })
}

#[component]
fn StationPage(
    /// 路由表中的工位路径
    path: &'static str,
) -> impl IntoView {
    let descriptor = route::find(path);
    let title = descriptor.map(|d| d.title).unwrap_or("未知工位");
    let section = descriptor.and_then(|d| d.section).unwrap_or("");

    view! {
        <div class="max-w-5xl mx-auto space-y-6">
            <div class="breadcrumbs text-sm">
                <ul>
                    <li>{section}</li>
                    <li class="font-medium">{title}</li>
                </ul>
            </div>

            <div class="navbar bg-base-100 rounded-box shadow-xl">
                <div class="flex-1">
                    <span class="btn btn-ghost text-xl">{title}</span>
                </div>
                <div class="flex-none">
                    <span class="badge badge-outline font-mono text-xs">{path}</span>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body items-center text-center py-16">
                    <span class="loading loading-ring loading-lg text-primary"></span>
                    <p class="text-base-content/60 mt-4">
                        "工位表单由对应业务模块提供，正在等待挂载。"
                    </p>
                </div>
            </div>
        </div>
    }
}
