use crate::services::{AuthService, LoginOutcome};
use crate::session::use_session;
use crate::validation;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    // 强制登出的提示先于表单错误显示
    let (error_msg, set_error_msg) = signal(session.state.get_untracked().error);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let (email, password) = (email.get(), password.get());
        let checked = validation::required("Email", &email)
            .and_then(|_| validation::email(&email))
            .and_then(|_| validation::required("Mot de passe", &password));
        if let Err(e) = checked {
            set_error_msg.set(Some(e.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);
        session.clear_error();

        let auth = AuthService::new(session.client());
        spawn_local(async move {
            let result = auth.login(email.trim(), &password).await;
            set_is_submitting.set(false);
            match result {
                // 路由服务监听会话变化，自动跳转到后台
                Ok(LoginOutcome::Authenticated {
                    user,
                    access,
                    refresh,
                }) => session.login(user, access, refresh),
                Ok(LoginOutcome::FirstLogin { email, .. }) => {
                    log_info!("[Login] first login for {}", email);
                    router.navigate(&AppRoute::set_password_path(&email));
                }
                Err(e) => set_error_msg.set(Some(e.user_message())),
            }
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Librairie · Administration"</h1>
                    <p class="text-base-content/70">
                        "Connectez-vous pour accéder au back-office"
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="admin@librairie.fr"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Mot de passe"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Connexion..." }.into_any()
                                } else {
                                    "Se connecter".into_any()
                                }}
                            </button>
                        </div>
                        <Link to="/" class="link link-hover text-sm text-center mt-2">
                            "Retour à la boutique"
                        </Link>
                    </form>
                </div>
            </div>
        </div>
    }
}
