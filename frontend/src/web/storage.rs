//! 浏览器存储封装模块
//!
//! 两种介质，两种用途：
//! - `DurableStorage` (localStorage)：跨会话的参考数据缓存
//! - `TabStorage` (sessionStorage)：标签页级会话凭据，关闭即清除

use crate::session::SessionMedium;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.session_storage().ok()?
}

/// localStorage 封装
pub struct DurableStorage;

impl DurableStorage {
    /// 获取存储的字符串值；键不存在或发生错误时返回 None
    pub fn get(key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok()?
    }

    /// 设置存储值，返回操作是否成功
    pub fn set(key: &str, value: &str) -> bool {
        local_storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除存储的键值对，返回操作是否成功
    pub fn delete(key: &str) -> bool {
        local_storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// sessionStorage 封装
#[derive(Clone, Copy, Default)]
pub struct TabStorage;

impl SessionMedium for TabStorage {
    fn read(&self, key: &str) -> Option<String> {
        session_storage()?.get_item(key).ok()?
    }

    fn write(&self, key: &str, value: &str) -> bool {
        session_storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn erase(&self, key: &str) -> bool {
        session_storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
