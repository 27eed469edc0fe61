use admirror_shared::protocol::GenerateAdRequest;
use admirror_shared::{GeneratedAd, Platform};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::ad_card::AdCard;
use crate::components::icons::Sparkles;

/// 广告生成页，管理员和普通用户共用
#[component]
pub fn GeneratePage() -> impl IntoView {
    let (text, set_text) = signal(String::new());
    let (platform, set_platform) = signal(Platform::default());
    let (loading, set_loading) = signal(false);
    let (result, set_result) = signal(Option::<GeneratedAd>::None);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_generate = move |_| {
        let ad_text = text.get();
        if ad_text.trim().is_empty() {
            set_error_msg.set(Some("Please enter the ad text first.".to_string()));
            return;
        }

        set_error_msg.set(None);
        set_result.set(None);
        set_loading.set(true);

        let req = GenerateAdRequest {
            text: ad_text,
            platform: platform.get(),
        };
        spawn_local(async move {
            match api::client().send(&req).await {
                Ok(ad) => set_result.set(Some(ad)),
                Err(e) => {
                    tracing::error!(error = %e, "ad generation failed");
                    set_error_msg.set(Some(
                        e.user_message("An unexpected error occurred during generation."),
                    ));
                }
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="space-y-6">
            <div>
                <h1 class="text-3xl font-bold flex items-center gap-2">
                    <Sparkles attr:class="h-7 w-7 text-primary" /> "Generate a Professional Ad"
                </h1>
                <p class="text-base-content/70">
                    "Use AI to create ad copy and visuals ready to publish."
                </p>
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-8">
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body space-y-4">
                        <div class="form-control">
                            <label class="label" for="ad_text">
                                <span class="label-text">"Ad text"</span>
                            </label>
                            <textarea
                                id="ad_text"
                                rows="5"
                                class="textarea textarea-bordered"
                                placeholder="Describe your product, offer or campaign..."
                                on:input=move |ev| set_text.set(event_target_value(&ev))
                                prop:value=text
                            ></textarea>
                        </div>

                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Platform"</span>
                            </label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| set_platform.set(Platform::parse(&event_target_value(&ev)))
                            >
                                {Platform::ALL
                                    .into_iter()
                                    .map(|p| view! {
                                        <option value=p.as_str() selected=move || platform.get() == p>
                                            {p.as_str()}
                                        </option>
                                    })
                                    .collect_view()}
                            </select>
                        </div>

                        <Show when=move || error_msg.get().is_some()>
                            <p class="text-error text-sm">{move || error_msg.get().unwrap_or_default()}</p>
                        </Show>

                        <button class="btn btn-primary" on:click=on_generate disabled=move || loading.get()>
                            {move || if loading.get() {
                                view! { <span class="loading loading-spinner"></span> "Generating..." }.into_any()
                            } else {
                                "Generate Ad".into_any()
                            }}
                        </button>
                    </div>
                </div>

                <div class="flex justify-center items-start">
                    {move || match result.get() {
                        Some(ad) => view! {
                            <AdCard
                                image=api::image_src(ad.image_url.as_deref())
                                text=ad.text.unwrap_or_default()
                                score=ad.score
                                platform=platform.get_untracked()
                            />
                        }
                        .into_any(),
                        None => view! {
                            <p class="text-base-content/50 py-16">"The generated ad will appear here."</p>
                        }
                        .into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}
