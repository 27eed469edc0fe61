//! AdMirror 前端应用
//!
//! 采用 Context-Driven 的架构：
//! - `web::router`: 路由服务（守卫逻辑在 `admirror_shared::route`）
//! - `auth`: 会话状态管理
//! - `api`: 带拦截器的客户端工厂
//! - `components`: UI 组件层

mod api;
mod auth;
pub mod config;
pub mod logging;

mod components {
    pub mod ad_card;
    pub mod ads;
    pub mod analytics;
    mod create_user_dialog;
    pub mod dashboard;
    pub mod generate;
    pub mod icons;
    pub mod layout;
    pub mod login;
    pub mod settings;
    pub mod user_ads;
    pub mod user_dashboard;
    pub mod users;
}

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod dialog;
    mod http;
    pub mod router;
    mod storage;

    pub use http::FetchTransport;
    pub use storage::LocalStorage;
}

use admirror_shared::route::AppRoute;
use leptos::prelude::*;

use crate::auth::AuthContext;
use crate::components::ads::AdListPage;
use crate::components::analytics::AnalyticsPage;
use crate::components::dashboard::DashboardPage;
use crate::components::generate::GeneratePage;
use crate::components::layout::{AdminLayout, UserLayout};
use crate::components::login::LoginPage;
use crate::components::settings::SettingsPage;
use crate::components::user_ads::{MyAdsPage, UserAdsPage};
use crate::components::user_dashboard::UserDashboardPage;
use crate::components::users::UsersPage;
use crate::web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 返回对应的视图组件；管理员页面包在侧边栏布局里。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <AdminLayout><DashboardPage /></AdminLayout> }.into_any(),
        AppRoute::AllAds | AppRoute::AdsLibrary => view! {
            <AdminLayout><AdListPage title=route.title() /></AdminLayout>
        }
        .into_any(),
        AppRoute::GenerateAd => view! { <AdminLayout><GeneratePage /></AdminLayout> }.into_any(),
        AppRoute::Analytics => view! { <AdminLayout><AnalyticsPage /></AdminLayout> }.into_any(),
        AppRoute::Settings => view! { <AdminLayout><SettingsPage /></AdminLayout> }.into_any(),
        AppRoute::Users => view! { <AdminLayout><UsersPage /></AdminLayout> }.into_any(),
        AppRoute::UserDashboard => {
            view! { <UserLayout><UserDashboardPage /></UserLayout> }.into_any()
        }
        AppRoute::UserGenerate => view! { <UserLayout><GeneratePage /></UserLayout> }.into_any(),
        AppRoute::UserAds => view! { <UserLayout><UserAdsPage /></UserLayout> }.into_any(),
        AppRoute::UserMyAds => view! { <UserLayout><MyAdsPage /></UserLayout> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文（从 LocalStorage 恢复会话）
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 获取会话信号，用于注入路由服务
    let session = auth_ctx.session_signal();

    view! {
        <Router session=session>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
