//! 书店前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `api`: HTTP 客户端、错误类型与 401 广播
//! - `services`: 按资源划分的领域服务
//! - `session`: 会话状态机
//! - `web::route` / `web::guard`: 路由与守卫（纯逻辑）
//! - `web::router`: 路由服务（核心引擎）
//! - `components`: UI 组件层

#[macro_use]
mod log;

pub mod api;
pub mod cart;
mod components {
    pub mod admins;
    pub mod dashboard;
    pub mod home;
    pub mod login;
    pub mod messages;
    pub mod set_password;
}
pub mod config;
pub mod services;
pub mod session;
pub mod validation;

use crate::api::ApiClient;
use crate::cart::CartContext;
use crate::components::admins::AdminsPage;
use crate::components::dashboard::DashboardPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::messages::MessagesPage;
use crate::components::set_password::SetPasswordPage;
use crate::config::AppConfig;
use crate::session::SessionContext;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 直接基于 web_sys，传输层与存储层通过 trait 注入，便于在原生环境下测试。
pub mod web {
    pub mod guard;
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::{
        FetchTransport, FilePart, FormValue, HttpError, HttpMethod, HttpRequest, HttpResponse,
        MultipartForm, RequestBody, Transport,
    };
    pub use storage::{KeyValueStore, LocalStorage, MemoryStorage};
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::SetPassword => view! { <SetPasswordPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Messages => view! { <MessagesPage /> }.into_any(),
        AppRoute::Admins => view! { <AdminsPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page introuvable"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 构造 API 客户端（fetch + LocalStorage）
    let config = AppConfig::from_env();
    log_info!("[App] API base: {}", config.api_base_url);
    let client = ApiClient::browser(&config);

    // 2. 创建会话上下文并从持久化存储恢复
    let session = SessionContext::new(client);
    session.init();
    provide_context(session);

    // 3. 购物车只存在于内存中
    provide_context(CartContext::new());

    view! {
        // 4. 路由器组件：注入会话信号实现守卫
        <Router session=session.state>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
