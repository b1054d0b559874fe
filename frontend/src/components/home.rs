//! 店铺首页：精选图书、购物车与结算

use crate::cart::{Cart, ShippingCountry, use_cart};
use crate::services::{BookService, ContactService, CountryService, PaymentService};
use crate::session::use_session;
use crate::validation::{self, ValidationError};
use crate::web::router::Link;
use bookstore_shared::money::display_euros;
use bookstore_shared::{Book, BookFilters, Country, NewContactMessage};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn validate_contact(msg: &NewContactMessage) -> Result<(), ValidationError> {
    validation::required("Nom", &msg.name)?;
    validation::email(&msg.email)?;
    validation::required("Sujet", &msg.subject)?;
    validation::required("Message", &msg.message)
}

#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_session();
    let cart_ctx = use_cart();
    let cart = cart_ctx.cart;
    let item_count = cart_ctx.item_count();

    let (books, set_books) = signal(Vec::<Book>::new());
    let (countries, set_countries) = signal(Vec::<Country>::new());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (checking_out, set_checking_out) = signal(false);

    {
        let books_api = BookService::new(session.client());
        let countries_api = CountryService::new(session.client());
        spawn_local(async move {
            match books_api.list(&BookFilters::featured()).await {
                Ok(page) => set_books.set(page.results),
                Err(e) => set_error_msg.set(Some(e.user_message())),
            }
            set_loading.set(false);
            match countries_api.list().await {
                Ok(list) => set_countries.set(list),
                Err(e) => log_warn!("[Home] countries unavailable: {}", e),
            }
        });
    }

    let on_country = move |ev: leptos::ev::Event| {
        let selected = event_target_value(&ev).parse::<i64>().ok();
        let country = selected.and_then(|id| {
            countries.with_untracked(|list| list.iter().find(|c| c.id == id).map(ShippingCountry::from))
        });
        cart.update(|c| c.set_shipping_country(country));
    };

    let on_checkout = move |_: leptos::ev::MouseEvent| {
        let Some(req) = cart.with_untracked(|c| c.to_checkout_request(None)) else {
            set_error_msg.set(Some("Choisissez un pays de livraison.".to_string()));
            return;
        };
        set_checking_out.set(true);
        let payments = PaymentService::new(session.client());
        spawn_local(async move {
            match payments.create_checkout(&req).await {
                Ok(checkout) => {
                    log_info!("[Home] redirecting to checkout {}", checkout.session_id);
                    if window().location().set_href(&checkout.url).is_err() {
                        set_error_msg.set(Some("Redirection vers le paiement impossible.".to_string()));
                    }
                }
                Err(e) => set_error_msg.set(Some(e.user_message())),
            }
            set_checking_out.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <div class="navbar bg-base-100 shadow">
                <div class="flex-1">
                    <span class="btn btn-ghost text-xl">"Librairie"</span>
                </div>
                <div class="flex-none gap-2">
                    <span class="badge badge-primary">
                        {move || format!("Panier : {}", item_count.get())}
                    </span>
                    <Link to="/login" class="btn btn-ghost btn-sm">"Espace admin"</Link>
                </div>
            </div>

            <div class="max-w-6xl mx-auto p-4 md:p-8 grid gap-8 lg:grid-cols-3">
                <section class="lg:col-span-2 space-y-4">
                    <h2 class="text-2xl font-bold">"Nos coups de cœur"</h2>
                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>
                    <Show when=move || loading.get()>
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </Show>
                    <div class="grid gap-4 md:grid-cols-2">
                        <For
                            each=move || books.get()
                            key=|b| b.id
                            children=move |book| {
                                let available = book.in_stock();
                                let price = display_euros(book.price);
                                let title = book.title.clone();
                                let author = book.author.clone();
                                view! {
                                    <div class="card bg-base-100 shadow">
                                        <div class="card-body">
                                            <h3 class="card-title">{title}</h3>
                                            <p class="text-sm text-base-content/70">{author}</p>
                                            <div class="card-actions items-center justify-between">
                                                <span class="font-bold">{price}</span>
                                                <button
                                                    class="btn btn-primary btn-sm"
                                                    disabled={!available}
                                                    on:click=move |_| cart_ctx.add_book(&book)
                                                >
                                                    {if available { "Ajouter au panier" } else { "Épuisé" }}
                                                </button>
                                            </div>
                                        </div>
                                    </div>
                                }
                            }
                        />
                    </div>
                </section>

                <aside class="space-y-4">
                    <CartSummary cart=cart />
                    <select class="select select-bordered w-full" on:change=on_country>
                        <option value="">"Pays de livraison"</option>
                        <For
                            each=move || countries.get()
                            key=|c| c.id
                            children=move |c| view! {
                                <option value={c.id.to_string()}>
                                    {format!("{} ({})", c.name, display_euros(c.shipping_cost))}
                                </option>
                            }
                        />
                    </select>
                    <button
                        class="btn btn-primary w-full"
                        disabled=move || checking_out.get() || cart.with(Cart::is_empty)
                        on:click=on_checkout
                    >
                        "Passer commande"
                    </button>
                    <ContactForm />
                </aside>
            </div>
        </div>
    }
}

/// 购物车明细与合计
#[component]
fn CartSummary(cart: RwSignal<Cart>) -> impl IntoView {
    let line = |label: &'static str, value: String| {
        view! {
            <div class="flex justify-between">
                <span>{label}</span>
                <span>{value}</span>
            </div>
        }
    };

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body space-y-2">
                <h3 class="card-title">"Votre panier"</h3>
                <Show
                    when=move || !cart.with(Cart::is_empty)
                    fallback=|| view! { <p class="text-base-content/50">"Votre panier est vide."</p> }
                >
                    <For
                        each=move || cart.with(|c| c.items().to_vec())
                        key=|i| (i.book_id, i.quantity)
                        children=move |item| {
                            let book_id = item.book_id;
                            view! {
                                <div class="flex items-center justify-between gap-2">
                                    <span class="flex-1 truncate">{item.title.clone()}</span>
                                    <input
                                        type="number"
                                        min="0"
                                        class="input input-bordered input-xs w-16"
                                        prop:value={item.quantity.to_string()}
                                        on:change=move |ev| {
                                            let quantity = event_target_value(&ev).parse::<i64>().unwrap_or(0);
                                            cart.update(|c| c.set_quantity(book_id, quantity));
                                        }
                                    />
                                    <span>{display_euros(item.line_total_cents())}</span>
                                </div>
                            }
                        }
                    />
                    <div class="divider my-1"></div>
                    {move || cart.with(|c| {
                        view! {
                            <div class="space-y-1 text-sm">
                                {line("Sous-total", display_euros(c.subtotal_cents()))}
                                {line("TVA (20 %)", display_euros(c.tax_cents()))}
                                {line("Livraison", display_euros(c.shipping_cents()))}
                                <div class="flex justify-between font-bold">
                                    <span>"Total"</span>
                                    <span>{display_euros(c.total_cents())}</span>
                                </div>
                            </div>
                        }
                    })}
                </Show>
            </div>
        </div>
    }
}

/// 访客留言表单
#[component]
fn ContactForm() -> impl IntoView {
    let session = use_session();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (subject, set_subject) = signal(String::new());
    let (message, set_message) = signal(String::new());
    let (status, set_status) = signal(Option::<(String, bool)>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let msg = NewContactMessage {
            name: name.get().trim().to_string(),
            email: email.get().trim().to_string(),
            subject: subject.get().trim().to_string(),
            message: message.get(),
        };
        if let Err(e) = validate_contact(&msg) {
            set_status.set(Some((e.to_string(), true)));
            return;
        }
        let api = ContactService::new(session.client());
        spawn_local(async move {
            match api.send(&msg).await {
                Ok(_) => {
                    set_status.set(Some(("Message envoyé, merci !".to_string(), false)));
                    set_subject.set(String::new());
                    set_message.set(String::new());
                }
                Err(e) => set_status.set(Some((e.user_message(), true))),
            }
        });
    };

    view! {
        <form class="card bg-base-100 shadow" on:submit=on_submit>
            <div class="card-body space-y-2">
                <h3 class="card-title">"Nous contacter"</h3>
                <Show when=move || status.get().is_some()>
                    <div class=move || {
                        if status.get().is_some_and(|(_, is_err)| is_err) {
                            "alert alert-error text-sm py-2"
                        } else {
                            "alert alert-success text-sm py-2"
                        }
                    }>
                        <span>{move || status.get().map(|(msg, _)| msg).unwrap_or_default()}</span>
                    </div>
                </Show>
                <input type="text" placeholder="Nom" class="input input-bordered input-sm"
                    prop:value=name on:input=move |ev| set_name.set(event_target_value(&ev)) />
                <input type="email" placeholder="Email" class="input input-bordered input-sm"
                    prop:value=email on:input=move |ev| set_email.set(event_target_value(&ev)) />
                <input type="text" placeholder="Sujet" class="input input-bordered input-sm"
                    prop:value=subject on:input=move |ev| set_subject.set(event_target_value(&ev)) />
                <textarea placeholder="Message" class="textarea textarea-bordered"
                    prop:value=message on:input=move |ev| set_message.set(event_target_value(&ev))></textarea>
                <button class="btn btn-outline btn-sm">"Envoyer"</button>
            </div>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_validation() {
        let msg = NewContactMessage {
            name: "Jean".into(),
            email: "jean@exemple.fr".into(),
            subject: "Commande".into(),
            message: "Bonjour".into(),
        };
        assert!(validate_contact(&msg).is_ok());

        let bad_email = NewContactMessage {
            email: "jean".into(),
            ..msg.clone()
        };
        assert_eq!(validate_contact(&bad_email), Err(ValidationError::InvalidEmail));

        let empty = NewContactMessage {
            message: "   ".into(),
            ..msg
        };
        assert_eq!(validate_contact(&empty), Err(ValidationError::Required("Message")));
    }
}
