use admirror_shared::protocol::{GetAdStats, GetLatestAd};
use admirror_shared::route::AppRoute;
use admirror_shared::{DashboardStats, LatestAd};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::ad_card::AdCard;
use crate::components::icons::{BarChart, Plus, Sparkles};
use crate::web::router::use_router;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let router = use_router();

    let (stats, set_stats) = signal(DashboardStats::default());
    let (latest, set_latest) = signal(Option::<LatestAd>::None);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (latest_error, set_latest_error) = signal(Option::<String>::None);

    // 统计与最新广告并发请求，全部完成后统一渲染
    spawn_local(async move {
        let client = api::client();
        let (stats_res, latest_res) =
            futures::join!(client.send(&GetAdStats), client.send(&GetLatestAd));

        match stats_res {
            Ok(data) => set_stats.set(data),
            Err(e) => {
                tracing::error!(error = %e, "failed to load dashboard stats");
                set_error_msg.set(Some(e.user_message("Failed to load dashboard data")));
            }
        }
        match latest_res {
            Ok(resp) => set_latest.set(resp.into_option()),
            Err(e) => {
                tracing::error!(error = %e, "failed to load latest ad");
                set_latest_error.set(Some(e.user_message("Failed to load the latest ad")));
            }
        }
        set_loading.set(false);
    });

    let cards = move || {
        let s = stats.get();
        [
            ("Total Ads", s.total_ads),
            ("Analyzed Ads", s.analyzed_ads),
            ("Generated Ads", s.generated_ads),
        ]
    };

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Dashboard Overview"</h1>
                <button class="btn btn-primary gap-2" on:click=move |_| router.go(AppRoute::GenerateAd)>
                    <Plus attr:class="h-4 w-4" /> "Create New Ad"
                </button>
            </div>

            <Show when=move || error_msg.get().is_some()>
                <p class="text-error">{move || error_msg.get().unwrap_or_default()}</p>
            </Show>

            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <p class="text-center text-base-content/50 py-8">
                        <span class="loading loading-spinner loading-md"></span> " Loading dashboard..."
                    </p>
                }
            >
                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    {move || cards()
                        .into_iter()
                        .map(|(title, value)| view! {
                            <div class="stat">
                                <div class="stat-figure text-primary">
                                    <BarChart attr:class="h-8 w-8" />
                                </div>
                                <div class="stat-title">{title}</div>
                                <div class="stat-value text-primary">{value}</div>
                            </div>
                        })
                        .collect_view()}
                </div>

                {move || match (latest.get(), latest_error.get()) {
                    (_, Some(msg)) => view! { <p class="text-center text-error">{msg}</p> }.into_any(),
                    (Some(ad), None) => {
                        let platform = ad.platform();
                        view! {
                            <div class="flex flex-col items-center gap-4">
                                <h2 class="text-xl font-semibold flex items-center gap-2">
                                    <Sparkles attr:class="h-5 w-5 text-primary" /> "Latest Ad"
                                </h2>
                                <AdCard
                                    image=api::image_src(ad.image.as_deref())
                                    text=ad.text.unwrap_or_default()
                                    score=ad.score
                                    platform=platform
                                />
                            </div>
                        }
                        .into_any()
                    }
                    (None, None) => view! {
                        <p class="text-center text-base-content/50">"No ads published yet."</p>
                    }
                    .into_any(),
                }}
            </Show>
        </div>
    }
}
