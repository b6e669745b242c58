//! 可观察状态仓库
//!
//! 键控的发布/订阅缓存，用于跨组件共享数据。
//! 写入同步通知该键的所有订阅者，通知参数为 (新值, 旧值)。
//!
//! 运行时为单线程事件循环；这里用 `Arc<Mutex<..>>` 只是为了
//! 满足响应式闭包的 Send 约束，不存在真正的竞争。

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use serde_json::Value;

type Listener = Arc<dyn Fn(&Value, Option<&Value>) + Send + Sync>;

/// 订阅解除函数；调用后移除对应的订阅者
pub type Unsubscribe = Box<dyn FnOnce() + Send>;

struct Subscriber {
    id: u64,
    listener: Listener,
}

#[derive(Default)]
struct StoreInner {
    values: Mutex<HashMap<String, Value>>,
    subscribers: Mutex<HashMap<String, Vec<Subscriber>>>,
    next_id: AtomicU64,
}

/// 键控状态仓库
#[derive(Clone, Default)]
pub struct StateStore {
    inner: Arc<StoreInner>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入并同步通知该键的全部订阅者
    ///
    /// 通知在快照上进行：通知期间订阅/退订不会影响本轮分发，
    /// 订阅者回调中再次写入同一仓库也是安全的。
    pub fn set(&self, key: &str, value: Value) {
        let previous = self
            .inner
            .values
            .lock()
            .map(|mut values| values.insert(key.to_string(), value.clone()))
            .unwrap_or(None);

        let listeners: Vec<Listener> = self
            .inner
            .subscribers
            .lock()
            .map(|subs| {
                subs.get(key)
                    .map(|list| list.iter().map(|s| s.listener.clone()).collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default();

        for listener in listeners {
            listener(&value, previous.as_ref());
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner
            .values
            .lock()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }

    /// 返回存储值，键不存在时返回给定默认值
    #[allow(dead_code)]
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// 注册订阅者，返回解除函数
    ///
    /// 最后一个订阅者退订时释放该键的订阅者集合（存储值保留）。
    pub fn subscribe(
        &self,
        key: &str,
        listener: impl Fn(&Value, Option<&Value>) + Send + Sync + 'static,
    ) -> Unsubscribe {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut subs) = self.inner.subscribers.lock() {
            subs.entry(key.to_string()).or_default().push(Subscriber {
                id,
                listener: Arc::new(listener),
            });
        }

        let inner = self.inner.clone();
        let key = key.to_string();
        Box::new(move || {
            if let Ok(mut subs) = inner.subscribers.lock() {
                if let Some(list) = subs.get_mut(&key) {
                    list.retain(|s| s.id != id);
                    if list.is_empty() {
                        subs.remove(&key);
                    }
                }
            }
        })
    }

    /// 删除键的存储值及其订阅者集合
    #[allow(dead_code)]
    pub fn remove(&self, key: &str) {
        if let Ok(mut values) = self.inner.values.lock() {
            values.remove(key);
        }
        if let Ok(mut subs) = self.inner.subscribers.lock() {
            subs.remove(key);
        }
    }

    /// 清空全部内容（登出时调用，避免跨会话残留）
    pub fn clear(&self) {
        if let Ok(mut values) = self.inner.values.lock() {
            values.clear();
        }
        if let Ok(mut subs) = self.inner.subscribers.lock() {
            subs.clear();
        }
    }
}

#[cfg(test)]
mod tests;
