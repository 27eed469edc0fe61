//! 普通用户的广告列表
//!
//! `/ads-library/user` 与 `/users/my-ads` 返回的结构不同，
//! 统一转换为 [`GalleryItem`] 后用同一个网格展示。

use admirror_shared::date::format_date;
use admirror_shared::protocol::{ListMyAds, ListUserAds};
use admirror_shared::{Ad, ApiResult, UserAd};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::ad_card::score_label;

#[derive(Debug, Clone, PartialEq)]
struct GalleryItem {
    id: String,
    image: String,
    text: String,
    score: Option<f64>,
    created_at: Option<String>,
}

impl From<UserAd> for GalleryItem {
    fn from(ad: UserAd) -> Self {
        Self {
            image: api::image_src(ad.design_url.as_deref()),
            id: ad.id,
            text: ad.ad_text,
            score: ad.score,
            created_at: ad.created_at,
        }
    }
}

impl From<Ad> for GalleryItem {
    fn from(ad: Ad) -> Self {
        Self {
            image: api::image_src(ad.image_url.as_deref()),
            id: ad.id,
            text: ad.text,
            score: ad.score,
            created_at: ad.created_at,
        }
    }
}

/// 加载状态：`None` 表示请求尚未完成
type Loaded = Option<Result<Vec<GalleryItem>, String>>;

fn finish<T: Into<GalleryItem>>(result: ApiResult<Vec<T>>, fallback: &str) -> Result<Vec<GalleryItem>, String> {
    result
        .map(|ads| ads.into_iter().map(Into::into).collect())
        .map_err(|e| {
            tracing::error!(error = %e, "failed to fetch ads");
            e.user_message(fallback)
        })
}

#[component]
fn Gallery(title: &'static str, empty_text: &'static str, state: ReadSignal<Loaded>) -> impl IntoView {
    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">{title}</h1>
            {move || match state.get() {
                None => view! {
                    <p class="text-center py-8 text-base-content/50">
                        <span class="loading loading-spinner loading-md"></span> " Loading ads..."
                    </p>
                }
                .into_any(),
                Some(Err(msg)) => view! { <p class="text-center py-8 text-error">{msg}</p> }.into_any(),
                Some(Ok(items)) if items.is_empty() => view! {
                    <p class="text-center py-8 text-base-content/50">{empty_text}</p>
                }
                .into_any(),
                Some(Ok(items)) => view! {
                    <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-6">
                        {items
                            .into_iter()
                            .map(|item| {
                                let has_image = !item.image.is_empty();
                                view! {
                                    <div class="card bg-base-100 shadow-xl">
                                        {has_image.then(|| view! {
                                            <figure>
                                                <img src=item.image alt="Ad" class="w-full h-56 object-cover" />
                                            </figure>
                                        })}
                                        <div class="card-body">
                                            <p class="whitespace-pre-line">{item.text}</p>
                                            <div class="flex justify-between text-sm text-base-content/60">
                                                <span>{format_date(item.created_at.as_deref())}</span>
                                                {item.score.map(|s| view! { <span>"Score: " {score_label(Some(s))}</span> })}
                                            </div>
                                        </div>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}

#[component]
pub fn UserAdsPage() -> impl IntoView {
    let (state, set_state) = signal(Loaded::None);

    spawn_local(async move {
        let result = api::client().send(&ListUserAds).await;
        set_state.set(Some(finish(result, "An error occurred while fetching your ads.")));
    });

    view! { <Gallery title="My Ads" empty_text="No ads yet." state=state /> }
}

#[component]
pub fn MyAdsPage() -> impl IntoView {
    let (state, set_state) = signal(Loaded::None);

    spawn_local(async move {
        let result = api::client().send(&ListMyAds).await;
        set_state.set(Some(finish(result, "An error occurred while fetching your ads.")));
    });

    view! {
        <Gallery
            title="My Generated Ads"
            empty_text="You haven't created any ads yet."
            state=state
        />
    }
}
