use crate::services::ContactService;
use crate::session::use_session;
use crate::web::router::Link;
use bookstore_shared::ContactMessage;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn MessagesPage() -> impl IntoView {
    let session = use_session();
    let api = ContactService::new(session.client());

    let (messages, set_messages) = signal(Vec::<ContactMessage>::new());
    let (only_unread, set_only_unread) = signal(false);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            let filter = only_unread.get_untracked().then_some(false);
            set_loading.set(true);
            spawn_local(async move {
                match api.list(filter, None).await {
                    Ok(page) => {
                        set_messages.set(page.results);
                        set_error_msg.set(None);
                    }
                    Err(e) => set_error_msg.set(Some(e.user_message())),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let replace = move |updated: ContactMessage| {
        set_messages.update(|list| {
            if let Some(m) = list.iter_mut().find(|m| m.id == updated.id) {
                *m = updated;
            }
        });
    };

    let mark_read = {
        let api = api.clone();
        move |id: i64| {
            let api = api.clone();
            spawn_local(async move {
                match api.mark_as_read(id).await {
                    Ok(updated) => replace(updated),
                    Err(e) => set_error_msg.set(Some(e.user_message())),
                }
            });
        }
    };

    let mark_replied = {
        let api = api.clone();
        move |id: i64| {
            let api = api.clone();
            spawn_local(async move {
                match api.mark_as_replied(id).await {
                    Ok(updated) => replace(updated),
                    Err(e) => set_error_msg.set(Some(e.user_message())),
                }
            });
        }
    };

    let mark_all_read = {
        let load = load.clone();
        move |_: leptos::ev::MouseEvent| {
            let ids: Vec<i64> = messages.with_untracked(|list| {
                list.iter().filter(|m| !m.is_read).map(|m| m.id).collect()
            });
            if ids.is_empty() {
                return;
            }
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                match api.bulk_mark_as_read(ids).await {
                    Ok(_) => load(),
                    Err(e) => set_error_msg.set(Some(e.user_message())),
                }
            });
        }
    };

    let toggle_filter = {
        let load = load.clone();
        move |ev: leptos::ev::Event| {
            set_only_unread.set(event_target_checked(&ev));
            load();
        }
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-5xl mx-auto space-y-6">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Link to="/admin" class="btn btn-ghost">"← Tableau de bord"</Link>
                        <span class="text-xl font-bold">"Messages"</span>
                    </div>
                    <div class="flex-none gap-4">
                        <label class="label cursor-pointer gap-2">
                            <span class="label-text">"Non lus uniquement"</span>
                            <input type="checkbox" class="toggle" prop:checked=only_unread on:change=toggle_filter />
                        </label>
                        <button class="btn btn-primary btn-sm" on:click=mark_all_read>
                            "Tout marquer comme lu"
                        </button>
                    </div>
                </div>

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <Show when=move || loading.get() && messages.with(Vec::is_empty)>
                    <div class="flex justify-center py-8">
                        <span class="loading loading-spinner loading-md"></span>
                    </div>
                </Show>
                <Show when=move || !loading.get() && messages.with(Vec::is_empty)>
                    <p class="text-center py-8 text-base-content/50">"Aucun message."</p>
                </Show>

                <For
                    each=move || messages.get()
                    key=|m| (m.id, m.is_read, m.is_replied)
                    children=move |msg| {
                        let id = msg.id;
                        let (is_read, is_replied) = (msg.is_read, msg.is_replied);
                        let mark_read = mark_read.clone();
                        let mark_replied = mark_replied.clone();
                        let card_class = if is_read {
                            "card bg-base-100 shadow"
                        } else {
                            "card bg-base-100 shadow border-l-4 border-primary"
                        };
                        view! {
                            <div class=card_class>
                                <div class="card-body">
                                    <div class="flex justify-between items-start">
                                        <div>
                                            <h3 class="card-title">{msg.subject}</h3>
                                            <p class="text-sm text-base-content/70">
                                                {format!("{} <{}>", msg.name, msg.email)}
                                            </p>
                                        </div>
                                        {is_replied.then(|| view! {
                                            <span class="badge badge-success">"Répondu"</span>
                                        })}
                                    </div>
                                    <p class="whitespace-pre-line">{msg.message}</p>
                                    <div class="card-actions justify-end">
                                        {(!is_read).then(|| view! {
                                            <button class="btn btn-sm" on:click=move |_| mark_read(id)>
                                                "Marquer comme lu"
                                            </button>
                                        })}
                                        {(!is_replied).then(|| view! {
                                            <button class="btn btn-sm btn-outline" on:click=move |_| mark_replied(id)>
                                                "Marquer comme répondu"
                                            </button>
                                        })}
                                    </div>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
}
