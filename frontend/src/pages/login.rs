//! 登录页
//!
//! 提交凭据换取令牌；校验错误（422）就地展示。
//! 登录成功后的跳转由路由器的认证监听自动完成。

use leptos::prelude::*;
use leptos::task::spawn_local;

use maxtrace_shared::protocol::LoginRequest;

use crate::api::ApiErrorKind;
use crate::cache::RefCache;
use crate::components::icons::NavIcon;
use crate::services::use_services;

/// 工号记忆键：只缓存工号方便下次输入，密码绝不落盘
const CACHE_LAST_EMPLOYEE: &str = "last_employee_id";

#[component]
pub fn LoginPage() -> impl IntoView {
    let services = use_services();

    let (employee_id, set_employee_id) =
        signal(RefCache::get::<String>(CACHE_LAST_EMPLOYEE).unwrap_or_default());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if employee_id.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("请输入工号和密码".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let services = services.clone();
        spawn_local(async move {
            let request = LoginRequest {
                employee_id: employee_id.get_untracked(),
                password: password.get_untracked(),
            };
            match services.api.send(&request).await {
                Ok(response) => {
                    RefCache::set(CACHE_LAST_EMPLOYEE, &request.employee_id);
                    services.session.login(&response.token, &response.user);
                    // 跳转由路由器监听认证状态完成
                }
                Err(e) => {
                    let message = match e.kind {
                        ApiErrorKind::Validation => e
                            .detail
                            .as_ref()
                            .and_then(|d| d.as_str().map(str::to_string))
                            .unwrap_or_else(|| "提交内容未通过校验".to_string()),
                        ApiErrorKind::Unauthenticated | ApiErrorKind::Http => {
                            "工号或密码错误".to_string()
                        }
                        _ => e.to_string(),
                    };
                    set_error_msg.set(Some(message));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <NavIcon name="battery" class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"MaxTrace"</h1>
                        <p class="text-base-content/70">"电池制造追溯平台"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="employee-id">
                                <span class="label-text">"工号"</span>
                            </label>
                            <input
                                id="employee-id"
                                type="text"
                                placeholder="EMP-00000"
                                on:input=move |ev| set_employee_id.set(event_target_value(&ev))
                                prop:value=employee_id
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"密码"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || {
                                    if is_submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "登录中..."
                                        }
                                            .into_any()
                                    } else {
                                        "登录".into_any()
                                    }
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
