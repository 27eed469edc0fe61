//! 认证模块
//!
//! 管理会话状态，与路由系统解耦。
//! 持久化的 token / role 由 [`SessionStore`] 负责，这里只维护界面使用的信号；
//! 路由服务通过注入的会话信号执行守卫。

use admirror_shared::session::{self, LoginError, Session, SessionStore};
use leptos::prelude::*;

use crate::api;
use crate::web::LocalStorage;

/// 基于 LocalStorage 的会话存储
pub fn session_store() -> SessionStore<LocalStorage> {
    SessionStore::new(LocalStorage)
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 当前会话（只读）
    pub session: ReadSignal<Session>,
    set_session: WriteSignal<Session>,
}

impl AuthContext {
    /// 从 LocalStorage 恢复上次的会话
    pub fn new() -> Self {
        let (session, set_session) = signal(session_store().snapshot());
        Self {
            session,
            set_session,
        }
    }

    /// 会话信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Session> {
        let session = self.session;
        Signal::derive(move || session.get())
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 登录并保存会话
///
/// 成功后返回新会话，落地页由调用方根据角色决定。
pub async fn login(ctx: AuthContext, email: String, password: String) -> Result<Session, LoginError> {
    let client = api::client();
    let started = session::login(&client, &session_store(), &email, &password).await?;
    ctx.set_session.set(started);
    Ok(started)
}

/// 注销并清除 token 与 role
///
/// 导航由路由服务的会话监听自动处理。
pub fn logout(ctx: &AuthContext) {
    session_store().end();
    ctx.set_session.set(Session::anonymous());
}
