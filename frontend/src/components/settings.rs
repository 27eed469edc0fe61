//! 生成器设置页
//!
//! 设置只保存在浏览器本地，保存后显示 2 秒的提示。

use std::time::Duration;

use admirror_shared::settings::{GeneratorSettings, IMAGE_SIZES, MODELS};
use leptos::prelude::*;

use crate::web::LocalStorage;

const SAVED_FLASH: Duration = Duration::from_secs(2);

#[component]
pub fn SettingsPage() -> impl IntoView {
    let initial = GeneratorSettings::load(&LocalStorage);

    let openai_key = RwSignal::new(initial.openai_key);
    let model = RwSignal::new(initial.model);
    let image_size = RwSignal::new(initial.image_size);
    let (saved, set_saved) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_save = move |_| {
        let settings = GeneratorSettings {
            openai_key: openai_key.get(),
            model: model.get(),
            image_size: image_size.get(),
        };

        if settings.save(&LocalStorage) {
            tracing::info!(model = %settings.model, size = %settings.image_size, "settings saved");
            set_error_msg.set(None);
            set_saved.set(true);
            set_timeout(move || set_saved.set(false), SAVED_FLASH);
        } else {
            set_error_msg.set(Some("Could not save settings in this browser.".to_string()));
        }
    };

    view! {
        <div class="flex justify-center">
            <div class="card bg-base-100 shadow-xl w-full max-w-3xl">
                <div class="card-body space-y-4">
                    <h1 class="text-3xl font-bold text-center mb-4">"System Settings"</h1>

                    <div class="form-control">
                        <label class="label" for="openai_key">
                            <span class="label-text">"OpenAI API Key"</span>
                        </label>
                        <input
                            id="openai_key"
                            type="password"
                            placeholder="sk-********************************"
                            class="input input-bordered w-full"
                            on:input=move |ev| openai_key.set(event_target_value(&ev))
                            prop:value=move || openai_key.get()
                        />
                    </div>

                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"AI Model"</span>
                        </label>
                        <select
                            class="select select-bordered w-full"
                            on:change=move |ev| model.set(event_target_value(&ev))
                        >
                            {MODELS
                                .into_iter()
                                .map(|(value, label)| view! {
                                    <option value=value selected=move || model.get() == value>{label}</option>
                                })
                                .collect_view()}
                        </select>
                    </div>

                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"Image Size"</span>
                        </label>
                        <select
                            class="select select-bordered w-full"
                            on:change=move |ev| image_size.set(event_target_value(&ev))
                        >
                            {IMAGE_SIZES
                                .into_iter()
                                .map(|(value, label)| view! {
                                    <option value=value selected=move || image_size.get() == value>{label}</option>
                                })
                                .collect_view()}
                        </select>
                    </div>

                    <div class="flex justify-center mt-6">
                        <button class="btn btn-primary" on:click=on_save>"Save Settings"</button>
                    </div>

                    <Show when=move || saved.get()>
                        <p class="text-center text-success">"Settings saved successfully!"</p>
                    </Show>
                    <Show when=move || error_msg.get().is_some()>
                        <p class="text-center text-error">{move || error_msg.get().unwrap_or_default()}</p>
                    </Show>
                </div>
            </div>
        </div>
    }
}
