//! 路由服务模块 - 核心引擎
//!
//! 封装 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 导航流程为“请求 -> 守卫 -> 写入地址栏 -> 加载”，守卫本身在
//! `admirror_shared::route` 中实现。

use admirror_shared::route::{self, AppRoute, Resolution};
use admirror_shared::session::Session;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
pub fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 整页跳转，绕过应用内的路由状态
pub fn hard_navigate(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(path) {
            tracing::error!(path, error = ?e, "full page navigation failed");
        }
    }
}

fn log_redirect(requested: &str, resolution: Resolution) {
    if resolution.redirected {
        tracing::info!(requested, to = %resolution.route, "navigation redirected by guard");
    }
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；会话状态由外部注入，与认证模块解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    session: Signal<Session>,
}

impl RouterService {
    fn new(session: Signal<Session>) -> Self {
        let path = current_path();
        let resolution = route::resolve(&path, session.get_untracked());
        log_redirect(&path, resolution);
        if resolution.redirected {
            replace_history_state(resolution.route.to_path());
        }

        let (current_route, set_route) = signal(resolution.route);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn go(&self, target: AppRoute) {
        let resolution = route::guard(Some(target), self.session.get_untracked());
        log_redirect(target.to_path(), resolution);

        push_history_state(resolution.route.to_path());
        self.set_route.set(resolution.route);
    }

    /// 浏览器后退/前进时重新执行守卫
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let session = self.session;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            let resolution = route::resolve(&path, session.get_untracked());
            log_redirect(&path, resolution);
            if resolution.redirected {
                replace_history_state(resolution.route.to_path());
            }
            set_route.set(resolution.route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化（登出）后，当前页面若不再被允许则重定向
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let session = self.session;

        Effect::new(move |_| {
            let session = session.get();
            let route = current_route.get_untracked();

            let resolution = route::guard(Some(route), session);
            if resolution.redirected {
                tracing::info!(from = %route, to = %resolution.route, "session changed, leaving page");
                push_history_state(resolution.route.to_path());
                set_route.set(resolution.route);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<Session>) -> RouterService {
    let router = RouterService::new(session);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 会话信号
    session: Signal<Session>,
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 应用内链接，点击时不刷新页面
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.go(to);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
