use admirror_shared::Platform;
use admirror_shared::date::PLACEHOLDER;
use leptos::prelude::*;

/// 评分显示，缺失时显示占位符
pub fn score_label(score: Option<f64>) -> String {
    match score {
        Some(s) if s.fract() == 0.0 => format!("{:.0}", s),
        Some(s) => format!("{:.1}", s),
        None => PLACEHOLDER.to_string(),
    }
}

/// 模拟社交平台帖子样式的广告卡片
///
/// `image` 须是已归一化的地址，空字符串表示没有图片。
#[component]
pub fn AdCard(
    #[prop(into)] image: String,
    #[prop(into)] text: String,
    score: Option<f64>,
    #[prop(optional)] platform: Platform,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    let badge = match platform {
        Platform::Instagram => "badge badge-secondary",
        Platform::Facebook => "badge badge-info",
    };
    let has_image = !image.is_empty();

    view! {
        <div class="card bg-base-100 shadow-xl w-full max-w-md">
            <div class="flex items-center justify-between px-6 pt-4">
                <span class="font-semibold">"AdMirror"</span>
                <span class=badge>{platform.as_str()}</span>
            </div>
            <Show when=move || has_image>
                <figure class="mt-4">
                    <img src=image.clone() alt="Ad visual" class="w-full object-cover" />
                </figure>
            </Show>
            <div class="card-body">
                <p class="whitespace-pre-line">{text}</p>
                <div class="badge badge-accent badge-outline">
                    "Score: " {score_label(score)}
                </div>
                {children.map(|c| view! { <div class="card-actions justify-end">{c()}</div> })}
            </div>
        </div>
    }
}
