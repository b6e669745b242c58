//! 管理员仪表盘
//!
//! 数据链路：实时通道 -> 状态仓库 -> 桥接订阅 -> 响应式信号 -> 视图。
//! init 钩子负责建立通道与订阅，cleanup 负责拆除；
//! 上次快照缓存在 localStorage，进入页面先铺底再等实时覆盖。

use leptos::prelude::*;
use serde_json::Value;

use maxtrace_shared::protocol::DashboardSnapshot;

use crate::cache::RefCache;
use crate::pages::PageCleanup;
use crate::services::{Services, use_services};
use crate::web::ws::LiveSocket;

/// 状态仓库中的快照键
pub const KEY_DASHBOARD_SNAPSHOT: &str = "dashboard.snapshot";

const CACHE_KEY: &str = "dashboard_snapshot";

/// 页面初始化：缓存铺底 + 桥接订阅 + 实时通道
pub fn init(services: &Services) -> Option<PageCleanup> {
    let live = services.live_dashboard;

    // 先订阅再铺底，铺底写入也会流入信号
    let unsubscribe = services
        .state
        .subscribe(KEY_DASHBOARD_SNAPSHOT, move |new, _| {
            if let Ok(snapshot) = serde_json::from_value::<DashboardSnapshot>(new.clone()) {
                live.set(Some(snapshot));
            }
        });

    match services.state.get(KEY_DASHBOARD_SNAPSHOT) {
        Some(value) => {
            if let Ok(snapshot) = serde_json::from_value::<DashboardSnapshot>(value) {
                live.set(Some(snapshot));
            }
        }
        None => {
            if let Some(snapshot) = RefCache::get::<DashboardSnapshot>(CACHE_KEY) {
                if let Ok(value) = serde_json::to_value(&snapshot) {
                    services.state.set(KEY_DASHBOARD_SNAPSHOT, value);
                }
            }
        }
    }

    let token = services.session.token().unwrap_or_default();
    let state = services.state.clone();
    let socket = LiveSocket::connect(token, move |snapshot| {
        RefCache::set(CACHE_KEY, &snapshot);
        if let Ok(value) = serde_json::to_value(&snapshot) {
            state.set(KEY_DASHBOARD_SNAPSHOT, value);
        }
    });

    Some(Box::new(move || {
        socket.close();
        unsubscribe();
    }))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let snapshot = use_services().live_dashboard;

    let kpis = move || {
        snapshot
            .get()
            .map(|s| match s.kpis {
                Value::Object(map) => map
                    .into_iter()
                    .map(|(label, value)| (label, display_value(&value)))
                    .collect::<Vec<_>>(),
                _ => Vec::new(),
            })
            .unwrap_or_default()
    };

    let stage_breakdown = move || {
        snapshot
            .get()
            .map(|s| match s.stage_breakdown {
                Value::Object(map) => map
                    .into_iter()
                    .map(|(stage, count)| (stage, display_value(&count)))
                    .collect::<Vec<_>>(),
                _ => Vec::new(),
            })
            .unwrap_or_default()
    };

    let todays_output = move || {
        snapshot
            .get()
            .map(|s| display_value(&s.todays_output))
            .unwrap_or_else(|| "-".to_string())
    };

    let activity = move || {
        snapshot
            .get()
            .map(|s| s.recent_activity)
            .unwrap_or_default()
    };

    view! {
        <div class="max-w-7xl mx-auto space-y-8">
            <div class="navbar bg-base-100 rounded-box shadow-xl">
                <div class="flex-1 gap-2">
                    <a class="btn btn-ghost text-xl">"生产仪表盘"</a>
                    <span class=move || {
                        if snapshot.get().is_some() {
                            "badge badge-success hidden md:inline-flex"
                        } else {
                            "badge badge-neutral hidden md:inline-flex"
                        }
                    }>
                        {move || if snapshot.get().is_some() { "实时" } else { "等待数据" }}
                    </span>
                </div>
                <div class="flex-none">
                    <div class="stat-value text-primary text-2xl">{todays_output}</div>
                    <span class="text-sm text-base-content/60 ml-2 self-end">"今日产出"</span>
                </div>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <For
                    each=kpis
                    key=|(label, _)| label.clone()
                    children=move |(label, value)| {
                        view! {
                            <div class="stat">
                                <div class="stat-title">{label}</div>
                                <div class="stat-value text-primary text-2xl">{value}</div>
                            </div>
                        }
                    }
                />
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"工序分布"</h3>
                    <div class="flex flex-wrap gap-2">
                        <For
                            each=stage_breakdown
                            key=|(stage, _)| stage.clone()
                            children=move |(stage, count)| {
                                view! {
                                    <div class="badge badge-accent badge-outline gap-1">
                                        {stage} ": " {count}
                                    </div>
                                }
                            }
                        />
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="p-6 pb-2">
                        <h3 class="card-title">"最近动态"</h3>
                        <p class="text-base-content/70 text-sm">"各工位最新上报记录。"</p>
                    </div>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"工序"</th>
                                    <th>"序列号"</th>
                                    <th class="hidden md:table-cell">"操作员"</th>
                                    <th>"时间"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || activity().is_empty()>
                                    <tr>
                                        <td colspan="4" class="text-center py-8 text-base-content/50">
                                            "暂无动态。"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=activity
                                    key=|a| format!("{}@{}", a.serial, a.at)
                                    children=move |entry| {
                                        view! {
                                            <tr>
                                                <td>
                                                    <span class="badge badge-neutral">{entry.stage}</span>
                                                </td>
                                                <td class="font-mono text-sm">{entry.serial}</td>
                                                <td class="hidden md:table-cell">{entry.operator}</td>
                                                <td class="text-sm opacity-70">
                                                    {entry.at.format("%m-%d %H:%M:%S").to_string()}
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </div>
    }
}
