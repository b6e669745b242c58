//! 参考数据缓存
//!
//! localStorage 上的 JSON 缓存，存放可随时从后端重建的参考数据
//! （最近注册记录、型号定义、仪表盘快照等）。只是缓存，
//! 永远不是数据源——凭据一律不经过这里。

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::web::DurableStorage;

const CACHE_PREFIX: &str = "maxtrace_cache:";

fn cache_key(key: &str) -> String {
    format!("{}{}", CACHE_PREFIX, key)
}

pub struct RefCache;

impl RefCache {
    /// 读取缓存；缺失或内容损坏时返回 None
    pub fn get<T: DeserializeOwned>(key: &str) -> Option<T> {
        let raw = DurableStorage::get(&cache_key(key))?;
        serde_json::from_str(&raw).ok()
    }

    /// 写入缓存，返回操作是否成功
    pub fn set<T: Serialize>(key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(json) => DurableStorage::set(&cache_key(key), &json),
            Err(_) => false,
        }
    }

    /// 作废缓存条目
    #[allow(dead_code)]
    pub fn invalidate(key: &str) -> bool {
        DurableStorage::delete(&cache_key(key))
    }
}
