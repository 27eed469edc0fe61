use admirror_shared::UserStats;
use admirror_shared::date::format_date;
use admirror_shared::protocol::GetUserStats;
use admirror_shared::route::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::icons::{BarChart, ShieldCheck, Sparkles};
use crate::web::router::use_router;

#[component]
pub fn UserDashboardPage() -> impl IntoView {
    let router = use_router();

    let (stats, set_stats) = signal(Option::<UserStats>::None);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    spawn_local(async move {
        match api::client().send(&GetUserStats).await {
            Ok(data) => set_stats.set(Some(data)),
            Err(e) => {
                tracing::error!(error = %e, "failed to load user stats");
                set_error_msg.set(Some(e.user_message("An error occurred while loading your data.")));
            }
        }
        set_loading.set(false);
    });

    view! {
        <Show
            when=move || !loading.get()
            fallback=|| view! {
                <p class="text-center py-8 text-base-content/50">
                    <span class="loading loading-spinner loading-md"></span> " Loading your data..."
                </p>
            }
        >
            {move || match stats.get() {
                None => view! {
                    <p class="text-center py-8 text-error">{move || error_msg.get().unwrap_or_default()}</p>
                }
                .into_any(),
                Some(s) => view! {
                    <div class="space-y-8">
                        <div>
                            <h1 class="text-3xl font-bold">
                                {s.full_name.clone().unwrap_or_else(|| "User Dashboard".to_string())}
                            </h1>
                            <p class="text-base-content/70">{s.email.clone()}</p>
                        </div>

                        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                            <div class="stat">
                                <div class="stat-title">"Joined"</div>
                                <div class="stat-value text-2xl">{format_date(s.joined.as_deref())}</div>
                            </div>
                            <div class="stat">
                                <div class="stat-figure text-primary">
                                    <BarChart attr:class="h-8 w-8" />
                                </div>
                                <div class="stat-title">"Total Ads"</div>
                                <div class="stat-value text-primary">{s.total_ads}</div>
                            </div>
                            <div class="stat">
                                <div class="stat-figure text-secondary">
                                    <ShieldCheck attr:class="h-8 w-8" />
                                </div>
                                <div class="stat-title">"Role"</div>
                                <div class="stat-value text-secondary text-2xl">{s.role.as_str()}</div>
                            </div>
                        </div>

                        <div class="flex flex-wrap gap-4">
                            <button class="btn btn-primary gap-2" on:click=move |_| router.go(AppRoute::UserGenerate)>
                                <Sparkles attr:class="h-4 w-4" /> "Create New Ad"
                            </button>
                            <button class="btn btn-outline" on:click=move |_| router.go(AppRoute::UserAds)>
                                "My Ads"
                            </button>
                        </div>
                    </div>
                }
                .into_any(),
            }}
        </Show>
    }
}
