//! 无权访问说明页
//!
//! 授权失败不在页面内联报错，而是导航到这里统一解释。

use leptos::prelude::*;

use crate::components::icons::NavIcon;
use crate::services::use_services;
use crate::web::route;
use crate::web::router::use_router;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    let services = use_services();
    let router = use_router();

    let go_back = move |_| {
        let role = services.session.role();
        router.navigate(route::default_route(role));
    };

    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card bg-base-100 shadow-xl max-w-md">
                <div class="card-body items-center text-center">
                    <div class="p-3 bg-error/10 rounded-2xl text-error">
                        <NavIcon name="shield" class="h-10 w-10" />
                    </div>
                    <h2 class="card-title mt-2">"无权访问"</h2>
                    <p class="text-base-content/70">
                        "当前账号的角色没有访问该页面的权限。如有疑问请联系管理员。"
                    </p>
                    <div class="card-actions mt-4">
                        <button on:click=go_back class="btn btn-primary">
                            "返回工作台"
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
