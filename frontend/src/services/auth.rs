//! 认证服务
//!
//! 收到 token 的服务负责把 token 与用户写入持久化存储，
//! 会话上下文只维护内存状态。

use crate::api::{ApiBody, ApiClient, ApiErrorCode, ClientError, ClientResult, RequestOptions};
use bookstore_shared::{
    ChangePasswordRequest, InvalidateSessionRequest, LoginRequest, LoginResponse, MessageResponse,
    PasswordResetConfirm, PasswordResetRequest, RefreshRequest, RefreshResponse,
    SetPasswordRequest, SetPasswordResponse, User, UserSession,
};

/// 登录结果
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// 登录成功，token 与用户已持久化
    Authenticated {
        user: User,
        access: String,
        refresh: String,
    },
    /// 受邀管理员首次登录，需要先设置密码
    FirstLogin { email: String, message: String },
}

#[derive(Clone, Debug)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/login/`
    ///
    /// 首次登录既可能以 2xx 载荷返回，也可能以结构化错误返回，两种都视为 `FirstLogin`。
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginOutcome> {
        let body = ApiBody::json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;

        let resp: LoginResponse = match self
            .client
            .post("/auth/login/", body, &RequestOptions::none())
            .await
        {
            Ok(resp) => resp,
            Err(ClientError::Api(e)) if e.code() == Some(ApiErrorCode::FirstLogin) => {
                return Ok(LoginOutcome::FirstLogin {
                    email: e.data_str("email").unwrap_or(email).to_string(),
                    message: e.data_str("message").unwrap_or(e.message.as_str()).to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        if resp.error.as_deref().map(ApiErrorCode::parse) == Some(ApiErrorCode::FirstLogin) {
            return Ok(LoginOutcome::FirstLogin {
                email: resp.email.unwrap_or_else(|| email.to_string()),
                message: resp.message.unwrap_or_default(),
            });
        }

        match (resp.user, resp.access, resp.refresh) {
            (Some(user), Some(access), Some(refresh)) => {
                self.client.persist_session(&user, &access, &refresh)?;
                Ok(LoginOutcome::Authenticated {
                    user,
                    access,
                    refresh,
                })
            }
            _ => Err(ClientError::Decode(
                "login response is missing user or tokens".to_string(),
            )),
        }
    }

    /// `POST /auth/set-password/`，成功后持久化返回的 token 与用户
    pub async fn set_password(&self, req: &SetPasswordRequest) -> ClientResult<SetPasswordResponse> {
        let resp: SetPasswordResponse = self
            .client
            .post("/auth/set-password/", ApiBody::json(req)?, &RequestOptions::none())
            .await?;
        self.client
            .persist_session(&resp.user, &resp.tokens.access, &resp.tokens.refresh)?;
        Ok(resp)
    }

    pub async fn request_password_reset(&self, email: &str) -> ClientResult<MessageResponse> {
        let body = ApiBody::json(&PasswordResetRequest {
            email: email.to_string(),
        })?;
        self.client
            .post("/auth/password-reset/request/", body, &RequestOptions::none())
            .await
    }

    /// 可能失败于 `token_expired` / `invalid_token`
    pub async fn confirm_password_reset(&self, req: &PasswordResetConfirm) -> ClientResult<MessageResponse> {
        self.client
            .post("/auth/password-reset/confirm/", ApiBody::json(req)?, &RequestOptions::none())
            .await
    }

    /// 旧密码错误时失败于 `invalid_password`
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> ClientResult<MessageResponse> {
        let body = ApiBody::json(&ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        })?;
        self.client
            .post("/auth/admins/change_password/", body, &RequestOptions::none())
            .await
    }

    pub async fn me(&self) -> ClientResult<User> {
        self.client
            .get("/auth/admins/me/", &RequestOptions::none())
            .await
    }

    pub async fn sessions(&self) -> ClientResult<Vec<UserSession>> {
        self.client
            .get("/auth/sessions/", &RequestOptions::none())
            .await
    }

    pub async fn invalidate_session(&self, session_id: &str) -> ClientResult<MessageResponse> {
        let body = ApiBody::json(&InvalidateSessionRequest {
            session_id: session_id.to_string(),
        })?;
        self.client
            .post("/auth/sessions/", body, &RequestOptions::none())
            .await
    }

    pub async fn invalidate_all_sessions(&self) -> ClientResult<MessageResponse> {
        self.client
            .delete("/auth/sessions/", &RequestOptions::none())
            .await
    }

    /// `POST /auth/token/refresh/`，由调用方主动发起
    ///
    /// 没有已保存的 refresh token 时返回 `Ok(None)`；
    /// 成功后新的 access token 与原 refresh token 一起写回存储。
    pub async fn refresh_token(&self) -> ClientResult<Option<String>> {
        let Some(tokens) = self.client.tokens() else {
            return Ok(None);
        };
        let body = ApiBody::json(&RefreshRequest {
            refresh: tokens.refresh.clone(),
        })?;
        let resp: RefreshResponse = self
            .client
            .post("/auth/token/refresh/", body, &RequestOptions::none())
            .await?;
        self.client.set_tokens(&resp.access, &tokens.refresh)?;
        Ok(Some(resp.access))
    }
}
