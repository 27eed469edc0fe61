use admirror_shared::AnalyticsResult;
use admirror_shared::date::format_datetime;
use admirror_shared::protocol::ListAnalytics;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::ad_card::score_label;
use crate::components::icons::BarChart;

#[component]
pub fn AnalyticsPage() -> impl IntoView {
    let (results, set_results) = signal(Vec::<AnalyticsResult>::new());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    spawn_local(async move {
        match api::client().send(&ListAnalytics).await {
            Ok(data) => set_results.set(data),
            Err(e) => {
                tracing::error!(error = %e, "failed to load analytics");
                set_error_msg.set(Some(e.user_message("Failed to load analytics")));
            }
        }
        set_loading.set(false);
    });

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">"Ad Performance Analytics"</h1>

            <Show when=move || error_msg.get().is_some()>
                <p class="text-error">{move || error_msg.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || loading.get()>
                <p class="text-center py-8 text-base-content/50">
                    <span class="loading loading-spinner loading-md"></span> " Loading analytics..."
                </p>
            </Show>
            <Show when=move || !loading.get() && error_msg.get().is_none() && results.with(|r| r.is_empty())>
                <p class="text-center py-8 text-base-content/50">"No analytics available yet."</p>
            </Show>

            <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-6">
                <For
                    each=move || results.get().into_iter().enumerate()
                    key=|(i, r)| (*i, r.key().to_string())
                    children=move |(_, r)| {
                        let image = api::image_src(r.image_url.as_deref());
                        let has_image = !image.is_empty();
                        let text_analysis = r
                            .text_analysis
                            .and_then(|t| t.analysis)
                            .unwrap_or_else(|| "No text analysis".to_string());
                        let visual_analysis = r.image_analysis.and_then(|i| i.visual_analysis);
                        view! {
                            <div class="card bg-base-100 shadow-xl">
                                <Show when=move || has_image>
                                    <figure>
                                        <img src=image.clone() alt="Ad" class="w-full h-48 object-cover" />
                                    </figure>
                                </Show>
                                <div class="card-body space-y-2">
                                    <div class="flex items-center gap-2 font-semibold text-primary">
                                        <BarChart attr:class="h-5 w-5" />
                                        <span>"Score: " {score_label(r.score)}</span>
                                    </div>
                                    <p class="text-sm line-clamp-3">{r.text}</p>
                                    <p class="text-sm text-base-content/70">{text_analysis}</p>
                                    {visual_analysis.map(|v| view! {
                                        <p class="text-sm text-base-content/70 italic">{v}</p>
                                    })}
                                    <p class="text-xs text-base-content/50">
                                        {format_datetime(r.created_at.as_deref())}
                                    </p>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
}
