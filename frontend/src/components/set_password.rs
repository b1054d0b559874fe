//! 受邀管理员首次登录：设置密码后直接进入后台

use crate::services::AuthService;
use crate::session::use_session;
use crate::validation::{self, ValidationError};
use crate::web::router::{Link, current_query_param};
use bookstore_shared::SetPasswordRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

fn validate(req: &SetPasswordRequest) -> Result<(), ValidationError> {
    validation::email(&req.email)?;
    validation::required("Prénom", &req.first_name)?;
    validation::required("Nom", &req.last_name)?;
    validation::new_password(&req.password, &req.password_confirm)
}

#[component]
pub fn SetPasswordPage() -> impl IntoView {
    let session = use_session();

    let (email, set_email) = signal(current_query_param("email").unwrap_or_default());
    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (password_confirm, set_password_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let req = SetPasswordRequest {
            email: email.get().trim().to_string(),
            password: password.get(),
            password_confirm: password_confirm.get(),
            first_name: first_name.get().trim().to_string(),
            last_name: last_name.get().trim().to_string(),
        };
        if let Err(e) = validate(&req) {
            set_error_msg.set(Some(e.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let auth = AuthService::new(session.client());
        spawn_local(async move {
            let result = auth.set_password(&req).await;
            set_is_submitting.set(false);
            match result {
                Ok(resp) => session.login(resp.user, resp.tokens.access, resp.tokens.refresh),
                Err(e) => set_error_msg.set(Some(e.user_message())),
            }
        });
    };

    let text_input = move |id: &'static str,
                           label: &'static str,
                           kind: &'static str,
                           value: ReadSignal<String>,
                           setter: WriteSignal<String>| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    on:input=move |ev| setter.set(event_target_value(&ev))
                    prop:value=value
                    class="input input-bordered"
                />
            </div>
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Première connexion"</h1>
                    <p class="text-base-content/70">
                        "Choisissez votre mot de passe pour activer votre compte"
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        {text_input("email", "Email", "email", email, set_email)}
                        {text_input("first_name", "Prénom", "text", first_name, set_first_name)}
                        {text_input("last_name", "Nom", "text", last_name, set_last_name)}
                        {text_input("password", "Mot de passe", "password", password, set_password)}
                        {text_input(
                            "password_confirm",
                            "Confirmation",
                            "password",
                            password_confirm,
                            set_password_confirm,
                        )}

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Enregistrement..." }.into_any()
                                } else {
                                    "Définir le mot de passe".into_any()
                                }}
                            </button>
                        </div>
                        <Link to="/login" class="link link-hover text-sm text-center mt-2">
                            "Retour à la connexion"
                        </Link>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SetPasswordRequest {
        SetPasswordRequest {
            email: "invite@librairie.fr".into(),
            password: "motdepasse1".into(),
            password_confirm: "motdepasse1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        }
    }

    #[test]
    fn test_validate_rejects_before_network() {
        assert!(validate(&request()).is_ok());

        let mismatch = SetPasswordRequest {
            password_confirm: "autre-chose".into(),
            ..request()
        };
        assert_eq!(validate(&mismatch), Err(ValidationError::PasswordMismatch));

        let missing = SetPasswordRequest {
            last_name: " ".into(),
            ..request()
        };
        assert_eq!(validate(&missing), Err(ValidationError::Required("Nom")));
    }
}
