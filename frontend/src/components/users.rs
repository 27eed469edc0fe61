//! 用户管理页
//!
//! 列表过滤在本地完成；新建成功后重新拉取列表，删除采用乐观更新。

use admirror_shared::date::{PLACEHOLDER, format_date};
use admirror_shared::optimistic::Removal;
use admirror_shared::protocol::{DeleteUser, ListUsers};
use admirror_shared::{Role, UserRow};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::create_user_dialog::CreateUserDialog;
use crate::components::icons::{ShieldCheck, Trash2};
use crate::web::dialog;

#[component]
pub fn UsersPage() -> impl IntoView {
    let (rows, set_rows) = signal(Vec::<UserRow>::new());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (query, set_query) = signal(String::new());
    let (role_filter, set_role_filter) = signal(Option::<Role>::None);

    let fetch_users = move || {
        set_loading.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            match api::client().send(&ListUsers).await {
                Ok(users) => set_rows.set(users),
                Err(e) => {
                    tracing::error!(error = %e, "failed to fetch users");
                    set_rows.set(Vec::new());
                    set_error_msg.set(Some(e.user_message("Failed to load users")));
                }
            }
            set_loading.set(false);
        });
    };

    fetch_users();

    let on_created = move |_: UserRow| {
        fetch_users();
        dialog::alert("User created successfully");
    };

    let handle_delete = move |id: String| {
        if !dialog::confirm("Are you sure you want to delete this user?") {
            return;
        }

        let mut removal = None;
        set_rows.update(|list| removal = Removal::take(list, &id));
        let Some(removal) = removal else {
            return;
        };

        spawn_local(async move {
            match api::client().send(&DeleteUser { id }).await {
                Ok(_) => {
                    let id = removal.id().to_string();
                    for user in removal.commit() {
                        tracing::info!(%id, email = %user.email, "user deleted");
                    }
                }
                Err(e) => {
                    tracing::warn!(id = %removal.id(), error = %e, "delete user failed, restoring row");
                    set_rows.update(|list| removal.rollback(list));
                    dialog::alert(&e.user_message("Failed to delete user"));
                }
            }
        });
    };

    let filtered = Memo::new(move |_| {
        let q = query.get();
        let role = role_filter.get();
        rows.with(|list| {
            list.iter()
                .filter(|u| u.matches(&q, role))
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    view! {
        <div class="space-y-6">
            <div class="flex flex-col sm:flex-row items-center justify-between gap-4">
                <h1 class="text-3xl font-bold">"Users Management"</h1>
                <CreateUserDialog on_created=on_created />
            </div>

            <div class="flex flex-col sm:flex-row items-center gap-4">
                <input
                    type="search"
                    placeholder="Search by email or name..."
                    class="input input-bordered w-full sm:w-1/2"
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                    prop:value=query
                />
                <select
                    class="select select-bordered"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        set_role_filter.set(match value.as_str() {
                            "all" => None,
                            other => Some(Role::from_claim(other)),
                        });
                    }
                >
                    <option value="all">"All roles"</option>
                    <option value="admin">"Admins"</option>
                    <option value="user">"Users"</option>
                </select>
            </div>

            <Show when=move || error_msg.get().is_some()>
                <p class="text-error">{move || error_msg.get().unwrap_or_default()}</p>
            </Show>

            <div class="card bg-base-100 shadow-xl">
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Name"</th>
                                <th>"Email"</th>
                                <th>"Role"</th>
                                <th>"Status"</th>
                                <th>"Created"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || loading.get()>
                                <tr>
                                    <td colspan="6" class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span> " Loading..."
                                    </td>
                                </tr>
                            </Show>
                            <Show when=move || {
                                !loading.get() && error_msg.get().is_none() && filtered.with(|f| f.is_empty())
                            }>
                                <tr>
                                    <td colspan="6" class="text-center py-8 text-base-content/50">"No results"</td>
                                </tr>
                            </Show>
                            <For
                                each=move || filtered.get().into_iter().enumerate()
                                key=|(i, u)| (*i, u.id.clone())
                                children=move |(_, user)| {
                                    let id = user.id.clone();
                                    let (status_class, status) = if user.is_active {
                                        ("badge badge-success badge-outline", "Active")
                                    } else {
                                        ("badge badge-error badge-outline", "Inactive")
                                    };
                                    view! {
                                        <tr>
                                            <td>{user.full_name.clone().unwrap_or_else(|| PLACEHOLDER.to_string())}</td>
                                            <td>{user.email.clone()}</td>
                                            <td>
                                                {if user.role.is_admin() {
                                                    view! {
                                                        <span class="inline-flex items-center gap-1 text-primary">
                                                            <ShieldCheck attr:class="h-4 w-4" /> "Admin"
                                                        </span>
                                                    }
                                                    .into_any()
                                                } else {
                                                    "User".into_any()
                                                }}
                                            </td>
                                            <td><span class=status_class>{status}</span></td>
                                            <td>{format_date(user.created_at.as_deref())}</td>
                                            <td class="text-right">
                                                <button
                                                    class="btn btn-ghost btn-sm text-error"
                                                    on:click=move |_| handle_delete(id.clone())
                                                >
                                                    <Trash2 attr:class="h-4 w-4" />
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
