//! API 客户端错误类型
//!
//! - `ClientError::Network`: 没有收到响应（离线、DNS、CORS …）
//! - `ClientError::Api`: 收到非 2xx 响应，携带状态码、消息与原始错误体
//! - `ClientError::Encode` / `ClientError::Decode`: 本地序列化失败
//! - `ClientError::Storage`: token 或用户未能写入持久化存储

use crate::web::HttpError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

// =========================================================
// 机器可读错误码
// =========================================================

/// 服务端 `data.error` 字段的已知取值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// 受邀管理员尚未设置密码
    FirstLogin,
    TokenExpired,
    InvalidToken,
    InvalidCredentials,
    PasswordAlreadySet,
    InvalidPassword,
    Unknown(String),
}

impl ApiErrorCode {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "first_login" => Self::FirstLogin,
            "token_expired" => Self::TokenExpired,
            "invalid_token" => Self::InvalidToken,
            "invalid_credentials" => Self::InvalidCredentials,
            "password_already_set" => Self::PasswordAlreadySet,
            "invalid_password" => Self::InvalidPassword,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::FirstLogin => "first_login",
            Self::TokenExpired => "token_expired",
            Self::InvalidToken => "invalid_token",
            Self::InvalidCredentials => "invalid_credentials",
            Self::PasswordAlreadySet => "password_already_set",
            Self::InvalidPassword => "invalid_password",
            Self::Unknown(raw) => raw,
        }
    }

    /// 面向用户的提示文字；未知错误码返回 `None`，由调用方回退到服务端消息
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::FirstLogin => Some("Première connexion : veuillez définir votre mot de passe."),
            Self::TokenExpired => Some("Ce lien a expiré. Veuillez refaire une demande."),
            Self::InvalidToken => Some("Ce lien n'est pas valide."),
            Self::InvalidCredentials => Some("Email ou mot de passe incorrect."),
            Self::PasswordAlreadySet => {
                Some("Un mot de passe a déjà été défini pour ce compte. Connectez-vous.")
            }
            Self::InvalidPassword => Some("L'ancien mot de passe est incorrect."),
            Self::Unknown(_) => None,
        }
    }
}

// =========================================================
// ApiError
// =========================================================

/// 非 2xx 响应
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    /// 解析后的错误体（字段校验错误、错误码等）
    pub data: Option<Value>,
}

impl ApiError {
    /// 从响应状态码和原始响应体构造
    ///
    /// 消息优先取 `detail`，其次 `message`，否则为 `"Erreur <status>"`。
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let data = serde_json::from_slice::<Value>(body)
            .ok()
            .filter(|v| !v.is_null());

        let message = data
            .as_ref()
            .and_then(|d| {
                ["detail", "message"]
                    .iter()
                    .find_map(|key| d.get(*key).and_then(Value::as_str))
            })
            .map(str::to_string)
            .unwrap_or_else(|| format!("Erreur {}", status));

        Self {
            status,
            message,
            data,
        }
    }

    /// 解码 `data.error`
    pub fn code(&self) -> Option<ApiErrorCode> {
        self.data
            .as_ref()?
            .get("error")?
            .as_str()
            .map(ApiErrorCode::parse)
    }

    /// 从 `data` 中读取任意字符串字段（如首次登录时的 `email`）
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.as_ref()?.get(key)?.as_str()
    }

    /// 字段级校验错误 `{ "field": ["msg", ...] }`
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let mut errors = BTreeMap::new();
        let Some(Value::Object(map)) = &self.data else {
            return errors;
        };
        for (field, value) in map {
            let messages: Vec<String> = match value {
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                _ => continue,
            };
            if !messages.is_empty() {
                errors.insert(field.clone(), messages);
            }
        }
        errors
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

// =========================================================
// ClientError
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    Network(HttpError),
    Api(ApiError),
    Encode(String),
    Decode(String),
    Storage(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// HTTP 状态码；网络错误等没有状态码
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(e) => Some(e.status),
            _ => None,
        }
    }

    pub fn api(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<ApiErrorCode> {
        self.api().and_then(ApiError::code)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// 组件直接展示的文字
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api(e) => e
                .code()
                .and_then(|c| c.user_message())
                .map(str::to_string)
                .unwrap_or_else(|| e.message.clone()),
            ClientError::Network(_) => {
                "Impossible de joindre le serveur. Vérifiez votre connexion.".to_string()
            }
            ClientError::Encode(_) => "Requête invalide.".to_string(),
            ClientError::Decode(_) => "Réponse inattendue du serveur.".to_string(),
            ClientError::Storage(_) => {
                "Impossible d'enregistrer la session dans le navigateur.".to_string()
            }
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(e) => write!(f, "{}", e),
            ClientError::Api(e) => write!(f, "{}", e),
            ClientError::Encode(msg) => write!(f, "encode error: {}", msg),
            ClientError::Decode(msg) => write!(f, "decode error: {}", msg),
            ClientError::Storage(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Network(e) => Some(e),
            ClientError::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HttpError> for ClientError {
    fn from(e: HttpError) -> Self {
        ClientError::Network(e)
    }
}

impl From<ApiError> for ClientError {
    fn from(e: ApiError) -> Self {
        ClientError::Api(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_prefers_detail() {
        let err = ApiError::from_response(400, br#"{"detail":"X","message":"Y"}"#);
        assert_eq!(err.message, "X");
        let err = ApiError::from_response(400, br#"{"message":"Y"}"#);
        assert_eq!(err.message, "Y");
    }

    #[test]
    fn test_message_falls_back_on_non_json() {
        let err = ApiError::from_response(502, b"<html>Bad Gateway</html>");
        assert_eq!(err.message, "Erreur 502");
        assert!(err.data.is_none());

        let err = ApiError::from_response(500, b"");
        assert_eq!(err.message, "Erreur 500");

        let err = ApiError::from_response(400, br#"{"email":["Ce champ est obligatoire."]}"#);
        assert_eq!(err.message, "Erreur 400");
        assert!(err.data.is_some());
    }

    #[test]
    fn test_error_code_decoding() {
        let err = ApiError::from_response(400, r#"{"error":"token_expired","detail":"Lien expiré"}"#.as_bytes());
        assert_eq!(err.code(), Some(ApiErrorCode::TokenExpired));

        let err = ApiError::from_response(400, br#"{"error":"quota_exceeded"}"#);
        assert_eq!(err.code(), Some(ApiErrorCode::Unknown("quota_exceeded".into())));
        assert_eq!(err.code().map(|c| c.as_str().to_string()), Some("quota_exceeded".into()));

        let err = ApiError::from_response(404, br#"{"detail":"Not found."}"#);
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_field_errors() {
        let err = ApiError::from_response(
            400,
            r#"{"title":["Obligatoire."],"price":["Invalide.","Trop élevé."],"detail":"x"}"#.as_bytes(),
        );
        let fields = err.field_errors();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["price"], vec!["Invalide.", "Trop élevé."]);
    }

    #[test]
    fn test_user_message_translation() {
        let known = ClientError::Api(ApiError::from_response(
            401,
            br#"{"error":"invalid_credentials","detail":"Invalid credentials"}"#,
        ));
        assert_eq!(known.user_message(), "Email ou mot de passe incorrect.");

        let unknown = ClientError::Api(ApiError::from_response(409, br#"{"detail":"Stock insuffisant"}"#));
        assert_eq!(unknown.user_message(), "Stock insuffisant");

        let network = ClientError::from(HttpError::NetworkError("offline".into()));
        assert_eq!(network.status(), None);
        assert!(network.api().is_none());
    }
}
