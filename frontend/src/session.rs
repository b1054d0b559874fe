//! 会话模块
//!
//! 管理 "当前标签页是谁在使用"，与路由系统解耦：
//! 路由服务只读取注入的会话信号。
//!
//! - `SessionState`: 纯状态机，包含全部状态转换逻辑，不依赖响应式运行时
//! - `SessionContext`: Leptos 上下文，持有状态信号与 `ApiClient`
//!
//! 状态：`Hydrating -> {Unauthenticated, Authenticated}`。
//! 角色（client / staff）与超级管理员只是派生视图，不是独立状态。

use crate::api::{ApiClient, ClientResult, ListenerId};
use bookstore_shared::{TokenPair, User};
use leptos::prelude::*;

pub const SESSION_EXPIRED_MESSAGE: &str = "Votre session a expiré, veuillez vous reconnecter.";

// =========================================================
// 角色 (Role)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Public,
    Client,
    Staff,
}

impl Role {
    /// `Staff` 满足任何角色要求；`Public` 要求任何人都满足
    pub fn satisfies(&self, required: Role) -> bool {
        match (self, required) {
            (Role::Staff, _) | (_, Role::Public) => true,
            (current, required) => *current == required,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Hydrating,
    Unauthenticated,
    Authenticated,
}

// =========================================================
// 状态机 (SessionState)
// =========================================================

/// 会话状态
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// 仅在启动时从持久化存储恢复期间为 `true`
    pub loading: bool,
    /// 强制登出时设置的提示
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::hydrating()
    }
}

impl SessionState {
    pub fn hydrating() -> Self {
        Self {
            user: None,
            access_token: None,
            refresh_token: None,
            loading: true,
            error: None,
        }
    }

    /// 根据持久化存储的内容完成恢复
    ///
    /// 用户与 token 同时存在时原样采用（不向服务端重新校验），否则为未登录。
    pub fn hydrated(user: Option<User>, tokens: Option<TokenPair>) -> Self {
        match (user, tokens) {
            (Some(user), Some(tokens)) => Self {
                user: Some(user),
                access_token: Some(tokens.access),
                refresh_token: Some(tokens.refresh),
                loading: false,
                error: None,
            },
            _ => Self {
                loading: false,
                ..Self::hydrating()
            },
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Hydrating
        } else if self.is_authenticated() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.access_token.is_some()
    }

    pub fn role(&self) -> Role {
        match &self.user {
            Some(user) if self.is_authenticated() && user.is_staff => Role::Staff,
            Some(_) if self.is_authenticated() => Role::Client,
            _ => Role::Public,
        }
    }

    pub fn is_staff(&self) -> bool {
        self.is_authenticated() && self.user.as_ref().is_some_and(|u| u.is_staff)
    }

    pub fn is_superuser(&self) -> bool {
        self.is_authenticated() && self.user.as_ref().is_some_and(|u| u.is_superuser)
    }

    /// 采用新的身份（持久化由认证服务负责）
    pub fn login(&mut self, user: User, access_token: String, refresh_token: String) {
        self.user = Some(user);
        self.access_token = Some(access_token);
        self.refresh_token = Some(refresh_token);
        self.loading = false;
        self.error = None;
    }

    /// 回到未登录状态，返回此前是否已登录；可重复调用
    pub fn logout(&mut self) -> bool {
        let was_authenticated = self.is_authenticated();
        self.clear_identity();
        self.error = None;
        was_authenticated
    }

    /// 401 导致的强制登出
    ///
    /// 仅在已登录时生效并返回 `true`；之后重复的信号都是空操作。
    pub fn expire(&mut self, message: &str) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        self.clear_identity();
        self.error = Some(message.to_string());
        true
    }

    /// 更新当前用户资料；未登录时忽略
    pub fn update_user(&mut self, user: User) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        self.user = Some(user);
        true
    }

    /// 手动刷新 token 后替换 access token；未登录时忽略
    pub fn replace_access_token(&mut self, access_token: String) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        self.access_token = Some(access_token);
        true
    }

    fn clear_identity(&mut self) {
        self.user = None;
        self.access_token = None;
        self.refresh_token = None;
        self.loading = false;
    }
}

// =========================================================
// Leptos 上下文 (SessionContext)
// =========================================================

/// 会话上下文
///
/// 由 `App` 显式构造并注入，组件通过 `use_session()` 获取。
#[derive(Clone, Copy)]
pub struct SessionContext {
    /// 会话状态（只读）
    pub state: ReadSignal<SessionState>,
    set_state: WriteSignal<SessionState>,
    client: StoredValue<ApiClient>,
    /// unauthorized 订阅，`init` 只注册一次
    listener: StoredValue<Option<ListenerId>>,
}

impl SessionContext {
    /// 创建新的会话上下文（处于 Hydrating 状态）
    pub fn new(client: ApiClient) -> Self {
        let (state, set_state) = signal(SessionState::hydrating());
        Self {
            state,
            set_state,
            client: StoredValue::new(client),
            listener: StoredValue::new(None),
        }
    }

    pub fn client(&self) -> ApiClient {
        self.client.get_value()
    }

    /// 从持久化存储恢复，并订阅 unauthorized 信号
    pub fn init(&self) {
        let client = self.client();
        let restored = SessionState::hydrated(client.user(), client.tokens());
        log_info!(
            "[Session] hydrated: {}",
            if restored.is_authenticated() { "authenticated" } else { "anonymous" }
        );
        self.set_state.set(restored);

        if self.listener.with_value(Option::is_some) {
            return;
        }

        // 监听者只持有 arena 句柄，不持有 ApiClient
        let set_state = self.set_state;
        let stored_client = self.client;
        let id = client.unauthorized().subscribe(move || {
            let expired = set_state
                .try_update(|state| state.expire(SESSION_EXPIRED_MESSAGE))
                .unwrap_or(false);
            stored_client.try_with_value(|client| client.logout());
            if expired {
                log_warn!("[Session] unauthorized response, session expired");
            }
        });
        self.listener.set_value(Some(id));
    }

    pub fn login(&self, user: User, access_token: String, refresh_token: String) {
        self.set_state
            .update(|state| state.login(user, access_token, refresh_token));
    }

    /// 注销并清除持久化数据
    ///
    /// 导航由路由服务监听会话变化自动完成。
    pub fn logout(&self) {
        self.set_state.update(|state| {
            state.logout();
        });
        self.client.with_value(|client| client.logout());
    }

    /// 更新当前用户并写回存储；未登录时返回 `Ok(false)` 且不写入
    pub fn update_user(&self, user: User) -> ClientResult<bool> {
        if !self.state.with_untracked(SessionState::is_authenticated) {
            return Ok(false);
        }
        self.client.with_value(|client| client.set_user(&user))?;
        self.set_state.update(|state| {
            state.update_user(user);
        });
        Ok(true)
    }

    pub fn replace_access_token(&self, access_token: String) {
        self.set_state.update(|state| {
            state.replace_access_token(access_token);
        });
    }

    /// 清除登录页上保留的提示
    pub fn clear_error(&self) {
        self.set_state.update(|state| state.error = None);
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{MockTransport, client_with, staff_user};
    use crate::api::RequestOptions;
    use crate::web::{HttpMethod, MemoryStorage};
    use leptos::reactive::owner::Owner;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client_user() -> User {
        User {
            is_staff: false,
            ..staff_user()
        }
    }

    fn tokens() -> TokenPair {
        TokenPair {
            access: "t1".into(),
            refresh: "r1".into(),
        }
    }

    #[test]
    fn test_hydration_phases() {
        assert_eq!(SessionState::hydrating().phase(), SessionPhase::Hydrating);
        assert_eq!(
            SessionState::hydrated(None, Some(tokens())).phase(),
            SessionPhase::Unauthenticated
        );
        assert_eq!(
            SessionState::hydrated(Some(staff_user()), None).phase(),
            SessionPhase::Unauthenticated
        );

        let restored = SessionState::hydrated(Some(staff_user()), Some(tokens()));
        assert_eq!(restored.phase(), SessionPhase::Authenticated);
        assert_eq!(restored.access_token.as_deref(), Some("t1"));
        assert_eq!(restored.refresh_token.as_deref(), Some("r1"));
    }

    #[test]
    fn test_role_derivation_ignores_superuser() {
        let mut state = SessionState::hydrated(None, None);
        assert_eq!(state.role(), Role::Public);

        for (is_staff, is_superuser, expected) in [
            (true, false, Role::Staff),
            (true, true, Role::Staff),
            (false, true, Role::Client),
            (false, false, Role::Client),
        ] {
            let user = User {
                is_staff,
                is_superuser,
                ..staff_user()
            };
            state.login(user, "t".into(), "r".into());
            assert_eq!(state.role(), expected);
        }

        state.logout();
        assert_eq!(state.role(), Role::Public);
    }

    #[test]
    fn test_role_satisfaction() {
        assert!(Role::Staff.satisfies(Role::Client));
        assert!(Role::Staff.satisfies(Role::Staff));
        assert!(Role::Client.satisfies(Role::Client));
        assert!(Role::Client.satisfies(Role::Public));
        assert!(!Role::Client.satisfies(Role::Staff));
        assert!(!Role::Public.satisfies(Role::Client));
    }

    #[test]
    fn test_login_clears_error_and_logout_is_idempotent() {
        let mut state = SessionState::hydrated(None, None);
        state.error = Some("old".into());

        state.login(client_user(), "t1".into(), "r1".into());
        assert!(state.is_authenticated());
        assert_eq!(state.role(), Role::Client);
        assert!(state.error.is_none());

        assert!(state.logout());
        let once = state.clone();
        assert!(!state.logout());
        assert_eq!(state, once);
        assert_eq!(state.phase(), SessionPhase::Unauthenticated);
    }

    #[test]
    fn test_expire_transitions_only_once() {
        let mut state = SessionState::hydrated(Some(staff_user()), Some(tokens()));

        assert!(state.expire(SESSION_EXPIRED_MESSAGE));
        assert!(!state.is_authenticated());
        assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));

        assert!(!state.expire(SESSION_EXPIRED_MESSAGE));
        assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
    }

    #[test]
    fn test_replace_access_token_requires_session() {
        let mut anonymous = SessionState::hydrated(None, None);
        assert!(!anonymous.replace_access_token("t2".into()));
        assert!(anonymous.access_token.is_none());

        let mut state = SessionState::hydrated(Some(staff_user()), Some(tokens()));
        assert!(state.replace_access_token("t2".into()));
        assert_eq!(state.access_token.as_deref(), Some("t2"));
        assert!(state.refresh_token.is_some());
    }

    #[test]
    fn test_scenario_b_login_then_authenticated() {
        let (client, _) = client_with(MockTransport::new());
        let mut state = SessionState::hydrated(client.user(), client.tokens());

        // 认证服务负责持久化，上下文只更新内存
        let user = staff_user();
        client.set_tokens("t1", "r1").unwrap();
        client.set_user(&user).unwrap();
        state.login(user.clone(), "t1".into(), "r1".into());

        assert!(client.is_authenticated());
        assert!(state.is_authenticated());
        assert_eq!(state.role() == Role::Staff, user.is_staff);
    }

    #[test]
    fn test_update_user_ignored_when_anonymous() {
        let mut state = SessionState::hydrated(None, None);
        assert!(!state.update_user(staff_user()));
        assert!(state.user.is_none());

        let mut state = SessionState::hydrated(Some(staff_user()), Some(tokens()));
        assert!(state.update_user(client_user()));
        assert_eq!(state.role(), Role::Client);
    }

    /// 在独立的 Owner 下构造已登录的会话上下文
    fn authenticated_context() -> (Owner, SessionContext, Arc<MockTransport>, Arc<MemoryStorage>) {
        let owner = Owner::new();
        owner.set();
        let transport = MockTransport::new();
        let (client, storage) = client_with(transport.clone());
        client.persist_session(&staff_user(), "t1", "r1").unwrap();
        let session = SessionContext::new(client);
        session.init();
        (owner, session, transport, storage)
    }

    #[tokio::test]
    async fn test_init_hydrates_and_401_expires_session() {
        let (_owner, session, transport, storage) = authenticated_context();
        assert!(session.state.get_untracked().is_authenticated());

        transport.mock(HttpMethod::Get, "http://api.test/auth/admins/me/", 401, json!({"detail": "expired"}));
        let err = session
            .client()
            .get::<Value>("/auth/admins/me/", &RequestOptions::none())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));

        let state = session.state.get_untracked();
        assert!(!state.is_authenticated());
        assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
        assert!(storage.is_empty());
    }

    /// N 个并发请求同时收到 401：信号触发 N 次，但状态只转换一次
    #[tokio::test]
    async fn test_concurrent_401_forces_single_logout() {
        const N: usize = 5;
        let owner = Owner::new();
        owner.set();
        let transport = MockTransport::new();
        transport.mock(HttpMethod::Get, "http://api.test/orders/", 401, json!({"detail": "expired"}));
        let (client, storage) = client_with(transport);
        client.persist_session(&staff_user(), "t1", "r1").unwrap();
        let session = SessionContext::new(client.clone());

        // 先于会话订阅，观察每次信号到达时会话是否仍处于登录状态
        let signals = Arc::new(AtomicUsize::new(0));
        let transitions = Arc::new(AtomicUsize::new(0));
        {
            let signals = Arc::clone(&signals);
            let transitions = Arc::clone(&transitions);
            let state = session.state;
            client.unauthorized().subscribe(move || {
                signals.fetch_add(1, Ordering::SeqCst);
                if state.with_untracked(SessionState::is_authenticated) {
                    transitions.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
        session.init();

        let opts = RequestOptions::none();
        let calls = (0..N).map(|_| client.get::<Value>("/orders/", &opts));
        let results = futures::future::join_all(calls).await;

        assert!(results.iter().all(|r| r.as_ref().err().and_then(|e| e.status()) == Some(401)));
        assert_eq!(signals.load(Ordering::SeqCst), N);
        assert_eq!(transitions.load(Ordering::SeqCst), 1);

        let state = session.state.get_untracked();
        assert!(!state.is_authenticated());
        assert!(state.error.is_some());
        assert!(storage.is_empty());
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_init_subscribes_once() {
        let (_owner, session, _, _) = authenticated_context();
        session.init();
        assert_eq!(session.client().unauthorized().listener_count(), 1);
    }

    #[test]
    fn test_update_user_writes_storage_only_when_authenticated() {
        let (_owner, session, _, _) = authenticated_context();
        let renamed = User {
            first_name: "Augusta".into(),
            ..staff_user()
        };
        assert_eq!(session.update_user(renamed.clone()), Ok(true));
        assert_eq!(session.client().user(), Some(renamed.clone()));
        assert_eq!(session.state.get_untracked().user, Some(renamed.clone()));

        session.logout();
        assert_eq!(session.update_user(renamed), Ok(false));
        assert!(session.client().user().is_none());
    }

    #[test]
    fn test_logout_clears_state_and_storage() {
        let (_owner, session, _, storage) = authenticated_context();
        session.logout();

        let state = session.state.get_untracked();
        assert_eq!(state.phase(), SessionPhase::Unauthenticated);
        assert!(state.error.is_none());
        assert!(storage.is_empty());

        session.logout();
        assert!(storage.is_empty());
    }
}
