//! 仪表盘实时通道
//!
//! 封装 `web_sys::WebSocket`：连接断开或构建失败时按指数退避重连，
//! 1 秒起步、逐次翻倍、30 秒封顶，并在两个候选主机间交替。
//! 令牌以查询参数携带，协议随页面协议（wss/ws）。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use maxtrace_shared::protocol::{DashboardSnapshot, LiveMessage};

use crate::config;

use super::timer::Timeout;

/// 第 `attempt` 次重连前的等待毫秒数
pub(crate) fn backoff_delay_ms(attempt: u32) -> u32 {
    (1000u32 << attempt.min(5)).min(30_000)
}

struct SocketState {
    token: String,
    on_snapshot: Box<dyn Fn(DashboardSnapshot)>,
    attempts: Cell<u32>,
    socket: RefCell<Option<WebSocket>>,
    retry: RefCell<Option<Timeout>>,
    closed: Cell<bool>,
    // 闭包必须与连接同寿命，否则 JS 侧回调悬空
    on_open: RefCell<Option<Closure<dyn FnMut(Event)>>>,
    on_message: RefCell<Option<Closure<dyn FnMut(MessageEvent)>>>,
    on_close: RefCell<Option<Closure<dyn FnMut(CloseEvent)>>>,
    on_error: RefCell<Option<Closure<dyn FnMut(Event)>>>,
}

/// 实时通道句柄
///
/// 页面的 init 钩子创建，cleanup 钩子调用 [`LiveSocket::close`]。
/// 仅 drop 句柄不会停止重连。
pub struct LiveSocket {
    state: Rc<SocketState>,
}

impl LiveSocket {
    pub fn connect(token: String, on_snapshot: impl Fn(DashboardSnapshot) + 'static) -> Self {
        let state = Rc::new(SocketState {
            token,
            on_snapshot: Box::new(on_snapshot),
            attempts: Cell::new(0),
            socket: RefCell::new(None),
            retry: RefCell::new(None),
            closed: Cell::new(false),
            on_open: RefCell::new(None),
            on_message: RefCell::new(None),
            on_close: RefCell::new(None),
            on_error: RefCell::new(None),
        });
        Self::open(state.clone());
        Self { state }
    }

    fn open(state: Rc<SocketState>) {
        if state.closed.get() {
            return;
        }

        let url = config::ws_url(state.attempts.get(), &state.token);
        let socket = match WebSocket::new(&url) {
            Ok(socket) => socket,
            Err(e) => {
                web_sys::console::warn_1(
                    &format!("[Live] WebSocket 构建失败: {:?}", e).into(),
                );
                Self::schedule_retry(state);
                return;
            }
        };

        let opened = state.clone();
        let on_open = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            web_sys::console::log_1(&"[Live] 已连接".into());
            opened.attempts.set(0);
        });
        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));

        let receiver = state.clone();
        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let Some(text) = event.data().as_string() else {
                return;
            };
            match serde_json::from_str::<LiveMessage>(&text) {
                Ok(message) if message.success => {
                    if let Some(snapshot) = message.data {
                        (receiver.on_snapshot)(snapshot);
                    }
                }
                Ok(_) => {
                    web_sys::console::warn_1(&"[Live] 忽略 success!=true 的消息".into());
                }
                Err(e) => {
                    web_sys::console::warn_1(&format!("[Live] 消息解析失败: {}", e).into());
                }
            }
        });
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        let closing = state.clone();
        let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            if closing.closed.get() {
                return;
            }
            web_sys::console::warn_1(
                &format!("[Live] 连接断开 (code={})", event.code()).into(),
            );
            Self::schedule_retry(closing.clone());
        });
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        let on_error = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            // 错误事件之后必然跟随 close 事件，重连统一在 onclose 触发
            web_sys::console::warn_1(&"[Live] 连接错误".into());
        });
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        *state.on_open.borrow_mut() = Some(on_open);
        *state.on_message.borrow_mut() = Some(on_message);
        *state.on_close.borrow_mut() = Some(on_close);
        *state.on_error.borrow_mut() = Some(on_error);
        *state.socket.borrow_mut() = Some(socket);
    }

    fn schedule_retry(state: Rc<SocketState>) {
        if state.closed.get() {
            return;
        }

        let attempt = state.attempts.get();
        let delay = backoff_delay_ms(attempt);
        state.attempts.set(attempt.saturating_add(1));
        web_sys::console::log_1(&format!("[Live] {}ms 后重连", delay).into());

        let reopening = state.clone();
        let timeout = Timeout::new(delay, move || {
            reopening.retry.borrow_mut().take();
            Self::open(reopening.clone());
        });
        *state.retry.borrow_mut() = timeout;
    }

    /// 停止重连并关闭当前连接
    pub fn close(&self) {
        self.state.closed.set(true);
        self.state.retry.borrow_mut().take();
        if let Some(socket) = self.state.socket.borrow_mut().take() {
            let _ = socket.close();
        }
    }
}

#[cfg(test)]
mod tests;
