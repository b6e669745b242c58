//! 瞬态通知组件
//!
//! 网络/服务端错误以 toast 形式浮现，3 秒后自动消失。
//! 校验错误不走这里——那是表单的局部状态。

use leptos::prelude::*;
use std::time::Duration;

const DISMISS_AFTER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

impl ToastLevel {
    fn alert_class(&self) -> &'static str {
        match self {
            ToastLevel::Info => "alert alert-success shadow-lg",
            ToastLevel::Warning => "alert alert-warning shadow-lg",
            ToastLevel::Error => "alert alert-error shadow-lg",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
}

/// 通知仓库（信号驱动，Copy 句柄）
#[derive(Clone, Copy)]
pub struct ToastStore {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl ToastStore {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn push(&self, level: ToastLevel, message: impl Into<String>) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        let toast = Toast {
            id,
            level,
            message: message.into(),
        };
        self.toasts.update(|list| list.push(toast));

        let toasts = self.toasts;
        set_timeout(
            move || toasts.update(|list| list.retain(|t| t.id != id)),
            DISMISS_AFTER,
        );
    }

    #[allow(dead_code)]
    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(ToastLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new()
    }
}

/// 通知宿主组件，置于 App 根部
#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = crate::services::use_services().toasts.toasts;

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    view! {
                        <div class=toast.level.alert_class()>
                            <span>{toast.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}
