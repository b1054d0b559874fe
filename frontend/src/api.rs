//! API 客户端
//!
//! 所有出站请求的唯一出口：
//! - 有 access token 时附加 `Authorization: Bearer <token>`
//! - 默认 JSON 请求体；multipart 请求体原样透传且不设置 `Content-Type`
//! - 401 时先广播 unauthorized 信号再返回错误；不做自动刷新、不重试
//! - token 与用户对象持久化在 `KeyValueStore` 中

mod error;
mod signal;

pub use error::{ApiError, ApiErrorCode, ClientError, ClientResult};
pub use signal::{ListenerId, UnauthorizedSignal};

use crate::config::{AppConfig, StorageKeys};
use crate::web::{
    FetchTransport, HttpMethod, HttpRequest, HttpResponse, KeyValueStore, LocalStorage,
    MultipartForm, RequestBody, Transport,
};
use bookstore_shared::{BEARER_PREFIX, HEADER_AUTHORIZATION, QueryParams, TokenPair, User};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

// =========================================================
// 请求选项
// =========================================================

/// API 请求体
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ApiBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// 调用方自行构造，客户端不做任何修改
    Multipart(MultipartForm),
}

impl ApiBody {
    pub fn json<B: Serialize + ?Sized>(body: &B) -> ClientResult<Self> {
        serde_json::to_value(body)
            .map(ApiBody::Json)
            .map_err(|e| ClientError::Encode(e.to_string()))
    }
}

/// 单次请求的附加选项
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub query: Vec<(&'static str, String)>,
}

impl RequestOptions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_query(params: &impl QueryParams) -> Self {
        Self {
            query: params.query_pairs(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }
}

// =========================================================
// ApiClient
// =========================================================

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    keys: StorageKeys,
    transport: Arc<dyn Transport>,
    storage: Arc<dyn KeyValueStore>,
    unauthorized: UnauthorizedSignal,
}

impl ApiClient {
    pub fn new(
        config: &AppConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            keys: config.storage_keys(),
            transport,
            storage,
            unauthorized: UnauthorizedSignal::new(),
        }
    }

    /// 浏览器环境：fetch + LocalStorage
    pub fn browser(config: &AppConfig) -> Self {
        Self::new(config, Arc::new(FetchTransport), Arc::new(LocalStorage))
    }

    /// 401 广播信号
    pub fn unauthorized(&self) -> &UnauthorizedSignal {
        &self.unauthorized
    }

    fn url(&self, path: &str, query: &[(&'static str, String)]) -> String {
        let mut url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        if !query.is_empty() {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
                .finish();
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&encoded);
        }
        url
    }

    // --- HTTP verbs ---

    pub async fn get<T: DeserializeOwned>(&self, path: &str, opts: &RequestOptions) -> ClientResult<T> {
        let resp = self.send(HttpMethod::Get, path, ApiBody::Empty, opts).await?;
        decode_json(&resp)
    }

    /// 以原始字节返回响应体（发票 PDF 等）
    pub async fn get_blob(&self, path: &str, opts: &RequestOptions) -> ClientResult<Vec<u8>> {
        let resp = self.send(HttpMethod::Get, path, ApiBody::Empty, opts).await?;
        Ok(resp.body)
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: ApiBody,
        opts: &RequestOptions,
    ) -> ClientResult<T> {
        let resp = self.send(HttpMethod::Post, path, body, opts).await?;
        decode_json(&resp)
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: ApiBody,
        opts: &RequestOptions,
    ) -> ClientResult<T> {
        let resp = self.send(HttpMethod::Put, path, body, opts).await?;
        decode_json(&resp)
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: ApiBody,
        opts: &RequestOptions,
    ) -> ClientResult<T> {
        let resp = self.send(HttpMethod::Patch, path, body, opts).await?;
        decode_json(&resp)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str, opts: &RequestOptions) -> ClientResult<T> {
        let resp = self.send(HttpMethod::Delete, path, ApiBody::Empty, opts).await?;
        decode_json(&resp)
    }

    /// 发送请求并把非 2xx 转换为 `ApiError`
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: ApiBody,
        opts: &RequestOptions,
    ) -> ClientResult<HttpResponse> {
        let mut req = HttpRequest::new(&self.url(path, &opts.query), method)
            .with_header("Accept", "application/json");

        if let Some(tokens) = self.tokens() {
            req = req.with_header(
                HEADER_AUTHORIZATION,
                &format!("{}{}", BEARER_PREFIX, tokens.access),
            );
        }

        req = match body {
            ApiBody::Empty => req,
            ApiBody::Json(value) => req
                .with_header("Content-Type", "application/json")
                .with_body(RequestBody::Json(value.to_string())),
            ApiBody::Multipart(form) => req.with_body(RequestBody::Multipart(form)),
        };

        let resp = match self.transport.send(req).await {
            Ok(resp) => resp,
            Err(e) => {
                log_error!("[Api] {} {} failed: {}", method.as_str(), path, e);
                return Err(ClientError::Network(e));
            }
        };

        if resp.ok() {
            return Ok(resp);
        }

        if resp.status == 401 {
            log_warn!("[Api] {} {} -> 401, broadcasting unauthorized", method.as_str(), path);
            self.unauthorized.notify();
        }

        Err(ClientError::Api(ApiError::from_response(resp.status, &resp.body)))
    }

    // --- Durable storage: tokens & user ---

    /// 按顺序写入多个键，要么全部成功，要么恢复写入前的内容
    ///
    /// 恢复也失败时清除全部会话数据，存储中不会留下新旧混合的 token 对。
    fn write_all(&self, entries: &[(&str, &str)]) -> ClientResult<()> {
        let previous: Vec<Option<String>> =
            entries.iter().map(|(key, _)| self.storage.get(key)).collect();

        for (i, (key, value)) in entries.iter().enumerate() {
            if self.storage.set(key, value) {
                continue;
            }
            log_warn!("[Api] failed to persist {}, rolling back", key);
            let restored = entries[..i].iter().zip(&previous).all(|((k, _), old)| match old {
                Some(v) => self.storage.set(k, v),
                None => self.storage.delete(k),
            });
            if !restored {
                log_error!("[Api] rollback failed, clearing session storage");
                self.logout();
            }
            return Err(ClientError::Storage(format!("failed to persist {}", key)));
        }
        Ok(())
    }

    /// 同时写入 access / refresh token
    pub fn set_tokens(&self, access: &str, refresh: &str) -> ClientResult<()> {
        self.write_all(&[
            (self.keys.access_token.as_str(), access),
            (self.keys.refresh_token.as_str(), refresh),
        ])
    }

    /// 登录成功后一次性写入 token 与用户
    pub fn persist_session(&self, user: &User, access: &str, refresh: &str) -> ClientResult<()> {
        let json = serde_json::to_string(user).map_err(|e| ClientError::Encode(e.to_string()))?;
        self.write_all(&[
            (self.keys.access_token.as_str(), access),
            (self.keys.refresh_token.as_str(), refresh),
            (self.keys.user.as_str(), json.as_str()),
        ])
    }

    /// 读取 token 对；任何一个缺失都视为没有 token
    pub fn tokens(&self) -> Option<TokenPair> {
        let access = self.storage.get(&self.keys.access_token)?;
        let refresh = self.storage.get(&self.keys.refresh_token)?;
        Some(TokenPair { access, refresh })
    }

    pub fn set_user(&self, user: &User) -> ClientResult<()> {
        let json = serde_json::to_string(user).map_err(|e| ClientError::Encode(e.to_string()))?;
        self.write_all(&[(self.keys.user.as_str(), json.as_str())])
    }

    /// 读取缓存的用户；JSON 损坏时视为不存在
    pub fn user(&self) -> Option<User> {
        let raw = self.storage.get(&self.keys.user)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log_warn!("[Api] stored user is unreadable: {}", e);
                None
            }
        }
    }

    /// 同步清除 token 与用户，不负责导航
    pub fn logout(&self) {
        self.storage.delete(&self.keys.access_token);
        self.storage.delete(&self.keys.refresh_token);
        self.storage.delete(&self.keys.user);
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens().is_some() && self.user().is_some()
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// 解析 JSON 响应体；空响应体（如 204）按 `null` 处理
fn decode_json<T: DeserializeOwned>(resp: &HttpResponse) -> ClientResult<T> {
    let body: &[u8] = if resp.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &resp.body
    };
    serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
}
