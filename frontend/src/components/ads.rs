//! 广告列表（All Ads / Ads Library）
//!
//! 删除采用乐观更新：先从列表移除（同一 id 的所有行），请求失败再放回原位置并弹窗提示。
//! 同一广告可能有多条结果行，列表按行号加 id 做 key。

use admirror_shared::optimistic::Removal;
use admirror_shared::protocol::{DeleteAd, ListAds};
use admirror_shared::Ad;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::ad_card::AdCard;
use crate::components::icons::{RefreshCw, Trash2};
use crate::web::dialog;

#[component]
pub fn AdListPage(title: &'static str) -> impl IntoView {
    let (ads, set_ads) = signal(Vec::<Ad>::new());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let load_ads = move || {
        set_loading.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            match api::client().send(&ListAds).await {
                Ok(listing) => set_ads.set(listing.into_vec()),
                Err(e) => {
                    tracing::error!(error = %e, "failed to load ads");
                    set_error_msg.set(Some(e.user_message("Failed to load ads")));
                }
            }
            set_loading.set(false);
        });
    };

    load_ads();

    let handle_delete = move |id: String| {
        if !dialog::confirm("Are you sure you want to delete this ad?") {
            return;
        }

        let mut removal = None;
        set_ads.update(|list| removal = Removal::take(list, &id));
        let Some(removal) = removal else {
            return;
        };

        spawn_local(async move {
            match api::client().send(&DeleteAd { id }).await {
                Ok(_) => {
                    let id = removal.id().to_string();
                    let rows = removal.commit().len();
                    tracing::info!(%id, rows, "ad deleted");
                }
                Err(e) => {
                    tracing::warn!(id = %removal.id(), error = %e, "delete failed, restoring ad");
                    set_ads.update(|list| removal.rollback(list));
                    dialog::alert(&e.user_message("An error occurred while deleting the ad"));
                }
            }
        });
    };

    let is_empty = move || ads.with(|a| a.is_empty());

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">{title}</h1>
                <button on:click=move |_| load_ads() disabled=move || loading.get() class="btn btn-ghost btn-circle">
                    <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                </button>
            </div>

            <Show when=move || error_msg.get().is_some()>
                <p class="text-error">{move || error_msg.get().unwrap_or_default()}</p>
            </Show>

            <Show when=move || loading.get() && is_empty()>
                <p class="text-center py-8 text-base-content/50">
                    <span class="loading loading-spinner loading-md"></span> " Loading ads..."
                </p>
            </Show>
            <Show when=move || !loading.get() && is_empty() && error_msg.get().is_none()>
                <p class="text-center py-8 text-base-content/50">"No ads yet."</p>
            </Show>

            <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-6 justify-items-center">
                <For
                    each=move || ads.get().into_iter().enumerate()
                    key=|(i, ad)| (*i, ad.id.clone())
                    children=move |(_, ad)| {
                        let id = ad.id.clone();
                        view! {
                            <AdCard
                                image=api::image_src(ad.image_url.as_deref())
                                text=ad.text
                                score=ad.score
                            >
                                <button
                                    class="btn btn-error btn-sm gap-2"
                                    on:click=move |_| handle_delete(id.clone())
                                >
                                    <Trash2 attr:class="h-4 w-4" /> "Delete"
                                </button>
                            </AdCard>
                        }
                    }
                />
            </div>
        </div>
    }
}
