//! 会话模块
//!
//! token 与 role 保存在持久化键值存储中（浏览器下是 LocalStorage）。
//! 存在 token 并不代表会话有效，有效性只能由后端的响应确认。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::protocol::LoginRequest;
use crate::request::HttpTransport;
use crate::{Role, STORAGE_ROLE_KEY, STORAGE_TOKEN_KEY};

/// 持久化键值存储
///
/// 接口与浏览器 LocalStorage 保持一致：读取失败视为不存在，
/// 写入 / 删除返回是否成功。
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

/// 内存实现，克隆后共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}

/// 会话快照，供路由守卫使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    pub authenticated: bool,
    pub role: Option<Role>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(role: Role) -> Self {
        Self {
            authenticated: true,
            role: Some(role),
        }
    }

    /// 未记录角色时按普通用户处理
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or_default()
    }
}

/// 会话存储
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        self.store
            .get(STORAGE_TOKEN_KEY)
            .filter(|t| !t.is_empty())
    }

    pub fn role(&self) -> Option<Role> {
        self.store
            .get(STORAGE_ROLE_KEY)
            .map(|r| Role::from_claim(&r))
    }

    pub fn snapshot(&self) -> Session {
        Session {
            authenticated: self.token().is_some(),
            role: self.role(),
        }
    }

    /// 登录成功后写入 token 和 role
    pub fn begin(&self, token: &str, role: Role) -> Session {
        self.store.set(STORAGE_TOKEN_KEY, token);
        self.store.set(STORAGE_ROLE_KEY, role.as_str());
        tracing::info!(role = role.as_str(), "session started");
        Session::signed_in(role)
    }

    /// 后端返回 401：只丢弃 token
    pub fn expire(&self) {
        self.store.delete(STORAGE_TOKEN_KEY);
        tracing::warn!("session token discarded after 401");
    }

    /// 主动退出：清空 token 和 role
    pub fn end(&self) {
        self.store.delete(STORAGE_TOKEN_KEY);
        self.store.delete(STORAGE_ROLE_KEY);
        tracing::info!("session ended");
    }
}

// =========================================================
// 登录流程
// =========================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoginError {
    /// 后端拒绝或请求失败
    #[error(transparent)]
    Request(#[from] ApiError),
    /// 响应中没有 access_token
    #[error("login response did not include an access token")]
    MissingToken,
}

/// 提交凭据并在成功时写入会话
pub async fn login<T, S>(
    client: &ApiClient<T>,
    session: &SessionStore<S>,
    username: &str,
    password: &str,
) -> Result<Session, LoginError>
where
    T: HttpTransport,
    S: KeyValueStore,
{
    let resp = client
        .send(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await?;

    let token = resp
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or(LoginError::MissingToken)?;

    Ok(session.begin(&token, resp.role.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_then_end_round_trip() {
        let session = SessionStore::new(MemoryStore::new());
        assert_eq!(session.snapshot(), Session::anonymous());

        let started = session.begin("tok-1", Role::Admin);
        assert_eq!(started, Session::signed_in(Role::Admin));
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert_eq!(session.snapshot(), started);

        session.end();
        assert_eq!(session.token(), None);
        assert_eq!(session.role(), None);
    }

    #[test]
    fn expire_keeps_role_hint() {
        let store = MemoryStore::new();
        let session = SessionStore::new(store.clone());
        session.begin("tok-2", Role::User);

        session.expire();

        assert_eq!(store.get(STORAGE_TOKEN_KEY), None);
        assert_eq!(store.get(STORAGE_ROLE_KEY).as_deref(), Some("user"));
        assert!(!session.snapshot().authenticated);
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let store = MemoryStore::new();
        store.set(STORAGE_TOKEN_KEY, "");
        let session = SessionStore::new(store);
        assert_eq!(session.token(), None);
    }

    #[test]
    fn unknown_stored_role_reads_as_user() {
        let store = MemoryStore::new();
        store.set(STORAGE_ROLE_KEY, "superuser");
        let session = SessionStore::new(store);
        assert_eq!(session.role(), Some(Role::User));
        assert_eq!(Session::anonymous().effective_role(), Role::User);
    }
}
