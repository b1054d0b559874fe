//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 守卫 -> 处理 -> 加载"的导航流程。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::guard::{self, Resolution};
use super::route::AppRoute;
use crate::session::SessionState;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 读取当前 URL 的查询参数
pub fn current_query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    url::form_urlencoded::parse(search.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于守卫重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 会话状态以只读信号注入，与会话实现解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    session: ReadSignal<SessionState>,
}

impl RouterService {
    fn new(session: ReadSignal<SessionState>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 会话状态信号（供出口组件判断是否仍在恢复）
    pub fn session(&self) -> ReadSignal<SessionState> {
        self.session
    }

    /// **核心方法：导航与守卫**
    ///
    /// `path` 可以带查询字符串（如设置密码页的 `?email=`）。
    pub fn navigate(&self, path: &str) {
        let target = AppRoute::from_path(path);
        let resolution = self.session.with_untracked(|s| guard::resolve(target, s));

        if resolution.redirected {
            log_info!("[Router] {} -> {} (guard)", target, resolution.route);
            self.apply(resolution, resolution.route.to_path());
        } else {
            push_history_state(path);
            self.set_route.set(resolution.route);
        }
    }

    pub fn navigate_to(&self, route: AppRoute) {
        self.navigate(route.to_path());
    }

    /// 写入 History 并更新路由信号
    fn apply(&self, resolution: Resolution, path: &str) {
        if resolution.replace {
            replace_history_state(path);
        } else {
            push_history_state(path);
        }
        self.set_route.set(resolution.route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let session = self.session;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            let resolution = session.with_untracked(|s| guard::resolve(target, s));
            if resolution.redirected {
                replace_history_state(resolution.route.to_path());
            }
            set_route.set(resolution.route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化（恢复完成、登录、登出、强制登出）时重新评估当前路由
    fn setup_session_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let resolution = router.session.with(|s| {
                guard::resolve(router.current_route.get_untracked(), s)
            });

            if resolution.redirected {
                log_info!(
                    "[Router] session changed, redirecting to {}",
                    resolution.route
                );
                router.apply(resolution, resolution.route.to_path());
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: ReadSignal<SessionState>) -> RouterService {
    let router = RouterService::new(session);

    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 会话状态信号
    session: ReadSignal<SessionState>,
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 会话恢复期间显示加载状态，不做重定向决定。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        let pending = router
            .session()
            .with(|s| guard::evaluate(current.guard(), s) == guard::GuardDecision::Pending);
        if pending {
            view! {
                <div class="flex items-center justify-center min-h-screen">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any()
        } else {
            matcher(current)
        }
    }
}

/// 站内链接，拦截点击改为路由导航
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let target = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
