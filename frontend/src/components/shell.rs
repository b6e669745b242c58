//! 应用外壳组件
//!
//! 已认证页面的侧边导航：按角色过滤路由表、按分组渲染、
//! 高亮当前路径。公开路由（登录/无权限页）不显示外壳。

use leptos::prelude::*;

use crate::components::icons::NavIcon;
use crate::services::use_services;
use crate::web::route::{self, RouteDescriptor, SECTION_ADMIN, SECTION_PRODUCTION};
use crate::web::router::use_router;

#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let services = use_services();
    let router = use_router();
    let current_path = router.current_path();
    let is_authenticated = services.session.is_authenticated_signal();

    let chrome = Signal::derive(move || {
        is_authenticated.get()
            && route::find(&current_path.get())
                .map(|r| !r.roles.is_empty())
                .unwrap_or(false)
    });

    let content = children();

    view! {
        <div class="min-h-screen bg-base-200">
            <Show when=move || chrome.get()>
                <SideNav />
            </Show>
            <main class=move || {
                if chrome.get() { "lg:pl-64 p-4 md:p-8" } else { "" }
            }>{content}</main>
        </div>
    }
}

/// 一个导航分组
fn nav_section(
    label: &'static str,
    items: Vec<&'static RouteDescriptor>,
    current_path: ReadSignal<String>,
) -> impl IntoView {
    view! {
        <li class="menu-title mt-2">{label}</li>
        {items
            .into_iter()
            .map(|descriptor| {
                let path = descriptor.path;
                view! {
                    <li>
                        <a
                            href=format!("#{}", path)
                            class=move || {
                                if current_path.get() == path { "active" } else { "" }
                            }
                        >
                            <NavIcon name=descriptor.icon class="h-4 w-4" />
                            {descriptor.title}
                        </a>
                    </li>
                }
            })
            .collect_view()}
    }
}

#[component]
fn SideNav() -> impl IntoView {
    let services = use_services();
    let router = use_router();
    let current_path = router.current_path();

    let user_name = {
        let services = services.clone();
        move || {
            services
                .session
                .user()
                .map(|u| if u.name.is_empty() { u.role.as_str().to_string() } else { u.name })
                .unwrap_or_default()
        }
    };

    let sections = {
        let services = services.clone();
        move || {
            let Some(role) = services.session.role() else {
                return Vec::new();
            };
            let visible = route::nav_routes(role);
            [SECTION_PRODUCTION, SECTION_ADMIN]
                .into_iter()
                .filter_map(|label| {
                    let items: Vec<_> = visible
                        .iter()
                        .copied()
                        .filter(|r| r.section == Some(label))
                        .collect();
                    if items.is_empty() { None } else { Some((label, items)) }
                })
                .collect::<Vec<_>>()
        }
    };

    let on_logout = {
        let services = services.clone();
        move |_| services.sign_out()
    };

    view! {
        <aside class="fixed inset-y-0 left-0 w-64 bg-base-100 shadow-xl hidden lg:flex flex-col z-40">
            <div class="p-4 flex items-center gap-2 border-b border-base-200">
                <NavIcon name="battery" class="h-7 w-7 text-primary" />
                <div>
                    <div class="font-bold text-lg">"MaxTrace"</div>
                    <div class="text-xs text-base-content/60">"电池制造追溯平台"</div>
                </div>
            </div>

            <ul class="menu flex-1 overflow-y-auto px-2">
                {move || {
                    sections()
                        .into_iter()
                        .map(|(label, items)| nav_section(label, items, current_path))
                        .collect_view()
                }}
            </ul>

            <div class="p-4 border-t border-base-200 flex items-center justify-between">
                <span class="text-sm font-medium truncate">{user_name}</span>
                <button on:click=on_logout class="btn btn-ghost btn-sm text-error gap-1">
                    <NavIcon name="logout" class="h-4 w-4" />
                    "登出"
                </button>
            </div>
        </aside>
    }
}
