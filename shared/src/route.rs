//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑，不依赖 DOM。
//! 定义应用的全部路由、所属视图树，以及导航守卫。

use std::fmt::Display;

use crate::Role;
use crate::session::Session;

/// 视图树
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTree {
    Login,
    /// 管理员面板（带侧边栏）
    Admin,
    /// 普通用户面板
    User,
}

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由，也是未匹配路径的落点)
    #[default]
    Login,
    Dashboard,
    AllAds,
    AdsLibrary,
    GenerateAd,
    Analytics,
    Settings,
    Users,
    UserDashboard,
    UserGenerate,
    UserAds,
    UserMyAds,
}

impl AppRoute {
    /// 侧边栏中的管理员页面，按显示顺序
    pub const ADMIN_NAV: [AppRoute; 7] = [
        AppRoute::Dashboard,
        AppRoute::AllAds,
        AppRoute::AdsLibrary,
        AppRoute::GenerateAd,
        AppRoute::Analytics,
        AppRoute::Settings,
        AppRoute::Users,
    ];

    /// 将 URL path 解析为路由，未匹配返回 `None`
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        let route = match path {
            "" | "/login" => Self::Login,
            "/dashboard" => Self::Dashboard,
            "/dashboard/all-ads" => Self::AllAds,
            "/dashboard/ads-library" => Self::AdsLibrary,
            "/dashboard/generate-ad" => Self::GenerateAd,
            "/dashboard/analytics" => Self::Analytics,
            "/dashboard/settings" => Self::Settings,
            "/dashboard/users" => Self::Users,
            "/user-dashboard" => Self::UserDashboard,
            "/user-dashboard/generate" => Self::UserGenerate,
            "/user-dashboard/ads" => Self::UserAds,
            "/user-dashboard/my-ads" => Self::UserMyAds,
            _ => return None,
        };
        Some(route)
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::AllAds => "/dashboard/all-ads",
            Self::AdsLibrary => "/dashboard/ads-library",
            Self::GenerateAd => "/dashboard/generate-ad",
            Self::Analytics => "/dashboard/analytics",
            Self::Settings => "/dashboard/settings",
            Self::Users => "/dashboard/users",
            Self::UserDashboard => "/user-dashboard",
            Self::UserGenerate => "/user-dashboard/generate",
            Self::UserAds => "/user-dashboard/ads",
            Self::UserMyAds => "/user-dashboard/my-ads",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Dashboard => "Dashboard",
            Self::AllAds => "All Ads",
            Self::AdsLibrary => "Ads Library",
            Self::GenerateAd => "Generate Ad",
            Self::Analytics => "Analytics",
            Self::Settings => "Settings",
            Self::Users => "Users",
            Self::UserDashboard => "My Dashboard",
            Self::UserGenerate => "Generate Ad",
            Self::UserAds => "My Ads",
            Self::UserMyAds => "My Generated Ads",
        }
    }

    pub fn tree(&self) -> ViewTree {
        match self {
            Self::Login => ViewTree::Login,
            Self::Dashboard
            | Self::AllAds
            | Self::AdsLibrary
            | Self::GenerateAd
            | Self::Analytics
            | Self::Settings
            | Self::Users => ViewTree::Admin,
            Self::UserDashboard | Self::UserGenerate | Self::UserAds | Self::UserMyAds => {
                ViewTree::User
            }
        }
    }

    /// 定义该路由是否需要认证
    pub fn requires_auth(&self) -> bool {
        self.tree() != ViewTree::Login
    }

    /// 登录成功后的落地页：admin 进入管理员面板，其余角色进入用户面板
    pub fn landing(role: Role) -> Self {
        match role {
            Role::Admin => Self::Dashboard,
            Role::User => Self::UserDashboard,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 导航守卫
// =========================================================

/// 守卫的裁决结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub route: AppRoute,
    /// 与请求的目标不同，需要用 replaceState 改写地址栏
    pub redirected: bool,
}

/// 解析路径并执行守卫
pub fn resolve(path: &str, session: Session) -> Resolution {
    guard(AppRoute::from_path(path), session)
}

/// 核心守卫逻辑
///
/// 1. 未匹配的路径落到登录页；
/// 2. 未认证访问受保护页面落到登录页；
/// 3. 普通用户进入管理员视图树时，重定向到用户面板。
///
/// 这只是界面上的分区，真正的权限校验由后端负责。
pub fn guard(target: Option<AppRoute>, session: Session) -> Resolution {
    let Some(target) = target else {
        return Resolution {
            route: AppRoute::Login,
            redirected: true,
        };
    };

    let route = if target.requires_auth() && !session.authenticated {
        AppRoute::Login
    } else if target.tree() == ViewTree::Admin && !session.effective_role().is_admin() {
        AppRoute::landing(Role::User)
    } else {
        target
    };

    Resolution {
        route,
        redirected: route != target,
    }
}

/// 会话失效时是否需要整页跳转到登录页
///
/// 已经停留在登录页（包括未匹配路径落到的登录页）时只清除 token，
/// 页面上的登录错误提示得以保留。
pub fn forces_login_reload(current_path: &str) -> bool {
    AppRoute::from_path(current_path).unwrap_or_default() != AppRoute::Login
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_round_trips_through_its_path() {
        let all = [
            AppRoute::Login,
            AppRoute::Dashboard,
            AppRoute::AllAds,
            AppRoute::AdsLibrary,
            AppRoute::GenerateAd,
            AppRoute::Analytics,
            AppRoute::Settings,
            AppRoute::Users,
            AppRoute::UserDashboard,
            AppRoute::UserGenerate,
            AppRoute::UserAds,
            AppRoute::UserMyAds,
        ];
        for route in all {
            assert_eq!(AppRoute::from_path(route.to_path()), Some(route));
        }
    }

    #[test]
    fn path_normalisation() {
        assert_eq!(AppRoute::from_path("/"), Some(AppRoute::Login));
        assert_eq!(AppRoute::from_path(""), Some(AppRoute::Login));
        assert_eq!(
            AppRoute::from_path("/dashboard/users/"),
            Some(AppRoute::Users)
        );
        assert_eq!(
            AppRoute::from_path("/dashboard?tab=1#top"),
            Some(AppRoute::Dashboard)
        );
        assert_eq!(AppRoute::from_path("/nope"), None);
    }

    #[test]
    fn views_partition_into_trees() {
        assert!(
            AppRoute::ADMIN_NAV
                .iter()
                .all(|r| r.tree() == ViewTree::Admin)
        );
        assert_eq!(AppRoute::UserGenerate.tree(), ViewTree::User);
        assert_eq!(AppRoute::Login.tree(), ViewTree::Login);
        assert!(!AppRoute::Login.requires_auth());
    }

    #[test]
    fn landing_depends_on_role() {
        assert_eq!(AppRoute::landing(Role::Admin), AppRoute::Dashboard);
        assert_eq!(AppRoute::landing(Role::User), AppRoute::UserDashboard);
        assert_eq!(
            AppRoute::landing(Role::from_claim("marketing")),
            AppRoute::UserDashboard
        );
    }

    #[test]
    fn unauthenticated_and_unmatched_go_to_login() {
        let anon = Session::anonymous();
        assert_eq!(resolve("/dashboard", anon).route, AppRoute::Login);
        assert_eq!(resolve("/user-dashboard/ads", anon).route, AppRoute::Login);
        assert_eq!(
            resolve("/login", anon),
            Resolution {
                route: AppRoute::Login,
                redirected: false
            }
        );

        let admin = Session::signed_in(Role::Admin);
        assert_eq!(
            resolve("/does/not/exist", admin),
            Resolution {
                route: AppRoute::Login,
                redirected: true
            }
        );
    }

    #[test]
    fn user_sessions_are_kept_out_of_admin_tree() {
        let user = Session::signed_in(Role::User);
        assert_eq!(
            resolve("/dashboard/users", user),
            Resolution {
                route: AppRoute::UserDashboard,
                redirected: true
            }
        );
        assert_eq!(
            resolve("/user-dashboard/generate", user).route,
            AppRoute::UserGenerate
        );
    }

    #[test]
    fn admin_sessions_reach_both_trees() {
        let admin = Session::signed_in(Role::Admin);
        assert_eq!(resolve("/dashboard/analytics", admin).route, AppRoute::Analytics);
        assert_eq!(resolve("/user-dashboard", admin).route, AppRoute::UserDashboard);
    }

    #[test]
    fn login_page_stays_reachable_with_a_token() {
        let admin = Session::signed_in(Role::Admin);
        assert_eq!(resolve("/login", admin).route, AppRoute::Login);
    }

    #[test]
    fn expired_session_reloads_only_outside_login() {
        assert!(forces_login_reload("/dashboard"));
        assert!(forces_login_reload("/user-dashboard/my-ads"));
        assert!(!forces_login_reload("/login"));
        assert!(!forces_login_reload("/login?next=%2Fusers"));
        assert!(!forces_login_reload("/"));
        assert!(!forces_login_reload("/no-such-page"));
    }
}
