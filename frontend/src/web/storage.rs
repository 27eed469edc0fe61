//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 实现 [`KeyValueStore`]，替代 `gloo-storage`。
//! 任何错误（无痕模式、配额已满等）都按“不存在 / 失败”处理。

use admirror_shared::session::KeyValueStore;

/// 浏览器 LocalStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        let ok = Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some();
        if !ok {
            tracing::warn!(key, "failed to write local storage");
        }
        ok
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
