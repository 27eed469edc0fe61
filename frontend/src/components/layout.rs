//! 页面布局
//!
//! 管理员视图树使用侧边栏布局，普通用户视图树使用顶部导航栏。
//! 两者都提供退出按钮。

use admirror_shared::route::AppRoute;
use leptos::prelude::*;

use crate::auth::{logout, use_auth};
use crate::components::icons::{LogOut, Sparkles};
use crate::web::router::{Link, use_router};

/// 用户面板顶部导航中的页面
const USER_NAV: [AppRoute; 4] = [
    AppRoute::UserDashboard,
    AppRoute::UserGenerate,
    AppRoute::UserAds,
    AppRoute::UserMyAds,
];

#[component]
fn LogoutButton(#[prop(optional, into)] class: String) -> impl IntoView {
    let auth = use_auth();
    let on_logout = move |_| logout(&auth);

    view! {
        <button on:click=on_logout class=format!("btn btn-outline btn-error gap-2 {}", class)>
            <LogOut attr:class="h-4 w-4" /> "Logout"
        </button>
    }
}

#[component]
pub fn AdminLayout(children: Children) -> impl IntoView {
    let router = use_router();

    view! {
        <div class="flex min-h-screen bg-base-200 font-sans">
            <aside class="w-64 shrink-0 bg-base-100 shadow-xl flex flex-col">
                <div class="flex items-center gap-2 p-6">
                    <Sparkles attr:class="h-6 w-6 text-primary" />
                    <span class="text-xl font-bold">"AdMirror"</span>
                </div>
                <ul class="menu flex-1 px-4 gap-1">
                    {AppRoute::ADMIN_NAV
                        .into_iter()
                        .map(move |route| {
                            let class = move || {
                                if router.current_route().get() == route { "active" } else { "" }
                            };
                            view! {
                                <li>
                                    <a
                                        href=route.to_path()
                                        class=class
                                        on:click=move |ev: web_sys::MouseEvent| {
                                            ev.prevent_default();
                                            router.go(route);
                                        }
                                    >
                                        {route.title()}
                                    </a>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
                <div class="p-4">
                    <LogoutButton class="w-full" />
                </div>
            </aside>
            <main class="flex-1 p-4 md:p-8 overflow-y-auto">{children()}</main>
        </div>
    }
}

#[component]
pub fn UserLayout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-6xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Sparkles attr:class="text-primary h-6 w-6" />
                        <span class="text-xl font-bold px-2">"AdMirror"</span>
                        {USER_NAV
                            .into_iter()
                            .map(|route| {
                                view! {
                                    <Link to=route class="btn btn-ghost btn-sm">
                                        {route.title()}
                                    </Link>
                                }
                            })
                            .collect_view()}
                    </div>
                    <div class="flex-none">
                        <LogoutButton />
                    </div>
                </div>
                {children()}
            </div>
        </div>
    }
}
