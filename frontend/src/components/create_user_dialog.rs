mod form_state;

use admirror_shared::{Role, UserRow};
use leptos::prelude::*;
use leptos::task::spawn_local;

use self::form_state::FormState;
use crate::api;
use crate::components::icons::Plus;
use crate::web::dialog;

/// 新建用户的模态框
///
/// 自行提交请求；成功后关闭、重置并通过 `on_created` 通知父组件，
/// 失败时弹窗提示且保持打开。
#[component]
pub fn CreateUserDialog(#[prop(into)] on_created: Callback<UserRow>) -> impl IntoView {
    let (open, set_open) = signal(false);
    let (loading, set_loading) = signal(false);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    let state = FormState::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_loading.set(true);

        let req = state.to_request();
        spawn_local(async move {
            match api::client().send(&req).await {
                Ok(user) => {
                    tracing::info!(email = %user.email, role = user.role.as_str(), "user created");
                    set_open.set(false);
                    state.reset();
                    on_created.run(user);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "create user failed");
                    dialog::alert(&e.user_message("Failed to create user"));
                }
            }
            set_loading.set(false);
        });
    };

    view! {
        <button class="btn btn-primary gap-2" on:click=move |_| set_open.set(true)>
            <Plus attr:class="h-4 w-4" /> "Add User"
        </button>

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"New User"</h3>

                <form on:submit=on_submit class="space-y-4 mt-4">
                    <input
                        required
                        type="text"
                        placeholder="Full name"
                        class="input input-bordered w-full"
                        on:input=move |ev| state.full_name.set(event_target_value(&ev))
                        prop:value=move || state.full_name.get()
                    />
                    <input
                        required
                        type="email"
                        placeholder="Email"
                        class="input input-bordered w-full"
                        on:input=move |ev| state.email.set(event_target_value(&ev))
                        prop:value=move || state.email.get()
                    />
                    <input
                        required
                        type="password"
                        placeholder="Password"
                        class="input input-bordered w-full"
                        on:input=move |ev| state.password.set(event_target_value(&ev))
                        prop:value=move || state.password.get()
                    />
                    <select
                        class="select select-bordered w-full"
                        on:change=move |ev| state.role.set(Role::from_claim(&event_target_value(&ev)))
                    >
                        <option value="user" selected=move || state.role.get() == Role::User>"User"</option>
                        <option value="admin" selected=move || state.role.get() == Role::Admin>"Admin"</option>
                    </select>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| set_open.set(false)>
                            "Cancel"
                        </button>
                        <button type="submit" disabled=move || loading.get() class="btn btn-primary">
                            {move || if loading.get() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else {
                                "Save".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
