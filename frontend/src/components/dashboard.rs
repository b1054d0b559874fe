use crate::services::{ContactService, OrderService};
use crate::session::use_session;
use crate::web::router::Link;
use bookstore_shared::money::display_euros;
use bookstore_shared::{ContactStatistics, Order, OrderFilters, OrderStatistics, OrderStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();
    let orders_api = OrderService::new(session.client());
    let contact_api = ContactService::new(session.client());

    let (orders, set_orders) = signal(Vec::<Order>::new());
    let (order_stats, set_order_stats) = signal(OrderStatistics::default());
    let (contact_stats, set_contact_stats) = signal(ContactStatistics::default());
    let (loading_orders, set_loading_orders) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    let load = {
        let orders_api = orders_api.clone();
        move || {
            let orders_api = orders_api.clone();
            let contact_api = contact_api.clone();
            set_loading_orders.set(true);
            spawn_local(async move {
                let filters = OrderFilters {
                    ordering: Some("-created_at".into()),
                    ..Default::default()
                };
                match orders_api.list(&filters).await {
                    Ok(page) => set_orders.set(page.results),
                    Err(e) => set_notification.set(Some((
                        format!("Impossible de charger les commandes : {}", e.user_message()),
                        true,
                    ))),
                }
                set_loading_orders.set(false);

                // 统计失败不影响列表展示
                if let Ok(stats) = orders_api.statistics().await {
                    set_order_stats.set(stats);
                }
                if let Ok(stats) = contact_api.statistics().await {
                    set_contact_stats.set(stats);
                }
            });
        }
    };

    // 初始加载
    load();

    let handle_status = move |id: i64, status: OrderStatus| {
        let orders_api = orders_api.clone();
        spawn_local(async move {
            match orders_api.update_status(id, status).await {
                Ok(updated) => {
                    set_orders.update(|list| {
                        if let Some(order) = list.iter_mut().find(|o| o.id == updated.id) {
                            *order = updated;
                        }
                    });
                    set_notification.set(Some(("Statut mis à jour".to_string(), false)));
                }
                Err(e) => set_notification.set(Some((e.user_message(), true))),
            }
        });
    };

    // 导航由路由服务监听会话变化自动完成
    let on_logout = move |_| session.logout();

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    let user_name = move || {
        session
            .state
            .with(|s| s.user.as_ref().map(|u| u.display_name()).unwrap_or_default())
    };
    let is_superuser = move || session.state.with(|s| s.is_superuser());

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                // 通知提示框
                <Show when=move || notification.get().is_some()>
                    <div class="toast toast-top toast-end z-50">
                        <div class=move || {
                            if notification.get().is_some_and(|(_, is_err)| is_err) {
                                "alert alert-error shadow-lg"
                            } else {
                                "alert alert-success shadow-lg"
                            }
                        }>
                            <span>{move || notification.get().map(|(msg, _)| msg).unwrap_or_default()}</span>
                        </div>
                    </div>
                </Show>

                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <span class="btn btn-ghost text-xl">"Tableau de bord"</span>
                        <span class="badge badge-neutral hidden md:inline-flex">{user_name}</span>
                    </div>
                    <div class="flex-none gap-2">
                        <Link to="/admin/messages" class="btn btn-ghost">"Messages"</Link>
                        <Show when=is_superuser>
                            <Link to="/admin/admins" class="btn btn-ghost">"Administrateurs"</Link>
                        </Show>
                        <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                            "Déconnexion"
                        </button>
                    </div>
                </div>

                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Commandes"</div>
                        <div class="stat-value text-primary">{move || order_stats.get().total_orders}</div>
                        <div class="stat-desc">
                            {move || format!("{} en attente", order_stats.get().pending_orders)}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Chiffre d'affaires"</div>
                        <div class="stat-value text-success text-2xl">
                            {move || display_euros(order_stats.get().total_revenue)}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Messages non lus"</div>
                        <div class="stat-value text-secondary">{move || contact_stats.get().unread}</div>
                        <div class="stat-desc">
                            {move || format!("{} au total", contact_stats.get().total)}
                        </div>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="flex items-center justify-between p-6 pb-2">
                            <div>
                                <h3 class="card-title">"Commandes récentes"</h3>
                                <p class="text-base-content/70 text-sm">"Suivez et mettez à jour les commandes."</p>
                            </div>
                            <button on:click=move |_| load() disabled=move || loading_orders.get() class="btn btn-ghost btn-sm">
                                "Actualiser"
                            </button>
                        </div>

                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"N°"</th>
                                        <th>"Client"</th>
                                        <th class="hidden md:table-cell">"Total"</th>
                                        <th>"Statut"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <Show when=move || orders.with(Vec::is_empty) && !loading_orders.get()>
                                        <tr>
                                            <td colspan="4" class="text-center py-8 text-base-content/50">
                                                "Aucune commande pour le moment."
                                            </td>
                                        </tr>
                                    </Show>
                                    <Show when=move || loading_orders.get() && orders.with(Vec::is_empty)>
                                        <tr>
                                            <td colspan="4" class="text-center py-8 text-base-content/50">
                                                <span class="loading loading-spinner loading-md"></span> " Chargement..."
                                            </td>
                                        </tr>
                                    </Show>
                                    <For
                                        each=move || orders.get()
                                        key=|o| (o.id, o.status)
                                        children=move |order| {
                                            let id = order.id;
                                            let current = order.status;
                                            let handle_status = handle_status.clone();
                                            view! {
                                                <tr>
                                                    <td class="font-mono text-sm">
                                                        {order.order_number.clone().unwrap_or_else(|| format!("#{}", id))}
                                                    </td>
                                                    <td>{order.customer_email.clone()}</td>
                                                    <td class="hidden md:table-cell">{display_euros(order.total)}</td>
                                                    <td>
                                                        <select
                                                            class="select select-bordered select-sm"
                                                            disabled={current.is_final()}
                                                            on:change=move |ev| {
                                                                let value = event_target_value(&ev);
                                                                if let Some(status) = OrderStatus::ALL
                                                                    .into_iter()
                                                                    .find(|s| s.as_str() == value)
                                                                {
                                                                    handle_status(id, status);
                                                                }
                                                            }
                                                        >
                                                            {OrderStatus::ALL
                                                                .into_iter()
                                                                .map(|s| view! {
                                                                    <option value=s.as_str() selected={s == current}>
                                                                        {s.label()}
                                                                    </option>
                                                                })
                                                                .collect_view()}
                                                        </select>
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
            </div>
        </div>
    }
}
