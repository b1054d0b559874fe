//! 管理员账户管理（仅超级管理员）

use crate::services::AdminService;
use crate::session::use_session;
use crate::validation;
use crate::web::router::Link;
use bookstore_shared::{CreateAdminRequest, User};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn AdminsPage() -> impl IntoView {
    let session = use_session();
    let api = AdminService::new(session.client());

    let (admins, set_admins) = signal(Vec::<User>::new());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let (email, set_email) = signal(String::new());
    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());
    let (is_superuser, set_is_superuser) = signal(false);

    {
        let api = api.clone();
        spawn_local(async move {
            match api.list(None).await {
                Ok(page) => set_admins.set(page.results),
                Err(e) => set_notification.set(Some((e.user_message(), true))),
            }
            set_loading.set(false);
        });
    }

    let on_create = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let req = CreateAdminRequest {
                email: email.get().trim().to_string(),
                first_name: first_name.get().trim().to_string(),
                last_name: last_name.get().trim().to_string(),
                is_superuser: is_superuser.get(),
            };
            if let Err(e) = validation::email(&req.email) {
                set_notification.set(Some((e.to_string(), true)));
                return;
            }

            let api = api.clone();
            spawn_local(async move {
                match api.create(&req).await {
                    Ok(user) => {
                        set_notification.set(Some((
                            format!("Invitation envoyée à {}", user.email),
                            false,
                        )));
                        set_admins.update(|list| list.push(user));
                        set_email.set(String::new());
                        set_first_name.set(String::new());
                        set_last_name.set(String::new());
                        set_is_superuser.set(false);
                    }
                    Err(e) => set_notification.set(Some((e.user_message(), true))),
                }
            });
        }
    };

    let handle_delete = move |id: i64| {
        let api = api.clone();
        spawn_local(async move {
            match api.delete(id).await {
                Ok(()) => {
                    set_admins.update(|list| list.retain(|u| u.id != id));
                    set_notification.set(Some(("Administrateur supprimé".to_string(), false)));
                }
                Err(e) => set_notification.set(Some((e.user_message(), true))),
            }
        });
    };

    let current_id = move || session.state.with(|s| s.user.as_ref().map(|u| u.id));

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-5xl mx-auto space-y-6">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Link to="/admin" class="btn btn-ghost">"← Tableau de bord"</Link>
                        <span class="text-xl font-bold">"Administrateurs"</span>
                    </div>
                </div>

                <Show when=move || notification.get().is_some()>
                    <div role="alert" class=move || {
                        if notification.get().is_some_and(|(_, is_err)| is_err) {
                            "alert alert-error"
                        } else {
                            "alert alert-success"
                        }
                    }>
                        <span>{move || notification.get().map(|(msg, _)| msg).unwrap_or_default()}</span>
                    </div>
                </Show>

                <div class="card bg-base-100 shadow-xl">
                    <form class="card-body grid md:grid-cols-2 gap-4" on:submit=on_create>
                        <h3 class="card-title md:col-span-2">"Inviter un administrateur"</h3>
                        <input
                            type="email"
                            placeholder="Email"
                            class="input input-bordered"
                            prop:value=email
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                        <label class="label cursor-pointer justify-start gap-2">
                            <input
                                type="checkbox"
                                class="checkbox"
                                prop:checked=is_superuser
                                on:change=move |ev| set_is_superuser.set(event_target_checked(&ev))
                            />
                            <span class="label-text">"Super-administrateur"</span>
                        </label>
                        <input
                            type="text"
                            placeholder="Prénom"
                            class="input input-bordered"
                            prop:value=first_name
                            on:input=move |ev| set_first_name.set(event_target_value(&ev))
                        />
                        <input
                            type="text"
                            placeholder="Nom"
                            class="input input-bordered"
                            prop:value=last_name
                            on:input=move |ev| set_last_name.set(event_target_value(&ev))
                        />
                        <button class="btn btn-primary md:col-span-2">"Envoyer l'invitation"</button>
                    </form>
                </div>

                <div class="card bg-base-100 shadow-xl overflow-x-auto">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Nom"</th>
                                <th>"Email"</th>
                                <th>"Rôle"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || loading.get()>
                                <tr>
                                    <td colspan="4" class="text-center py-8">
                                        <span class="loading loading-spinner loading-md"></span>
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || admins.get()
                                key=|u| u.id
                                children=move |user| {
                                    let id = user.id;
                                    let handle_delete = handle_delete.clone();
                                    let role = if user.is_superuser { "Super-admin" } else { "Staff" };
                                    view! {
                                        <tr>
                                            <td>{user.display_name()}</td>
                                            <td class="font-mono text-sm">{user.email}</td>
                                            <td><span class="badge badge-outline">{role}</span></td>
                                            <td>
                                                // 不能删除自己
                                                <Show when=move || current_id() != Some(id)>
                                                    <button
                                                        class="btn btn-ghost btn-sm text-error"
                                                        on:click={
                                                            let handle_delete = handle_delete.clone();
                                                            move |_| handle_delete(id)
                                                        }
                                                    >
                                                        "Supprimer"
                                                    </button>
                                                </Show>
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
