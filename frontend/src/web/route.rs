//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其守卫。

use super::guard::GuardKind;
use crate::session::Role;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 店铺首页 (默认路由)
    #[default]
    Home,
    /// 后台登录
    Login,
    /// 首次登录设置密码
    SetPassword,
    /// 后台控制面板
    Dashboard,
    /// 留言管理
    Messages,
    /// 管理员账户（仅超级管理员）
    Admins,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举（忽略查询字符串与结尾斜杠）
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("/");
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match path {
            "/" => Self::Home,
            "/login" => Self::Login,
            "/set-password" => Self::SetPassword,
            "/admin" => Self::Dashboard,
            "/admin/messages" => Self::Messages,
            "/admin/admins" => Self::Admins,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::SetPassword => "/set-password",
            Self::Dashboard => "/admin",
            Self::Messages => "/admin/messages",
            Self::Admins => "/admin/admins",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫定义：每个路由对应的守卫**
    pub fn guard(&self) -> GuardKind {
        match self {
            Self::Home | Self::NotFound => GuardKind::Open,
            Self::Login | Self::SetPassword => GuardKind::PublicOnly,
            Self::Dashboard => GuardKind::Authenticated {
                superuser_only: false,
            },
            Self::Messages => GuardKind::Role(Role::Staff),
            Self::Admins => GuardKind::Authenticated {
                superuser_only: true,
            },
        }
    }

    /// 未登录时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 已登录用户的默认落地页
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }

    /// 首次登录跳转地址，携带邮箱
    pub fn set_password_path(email: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("email", email)
            .finish();
        format!("{}?{}", Self::SetPassword.to_path(), query)
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_roundtrip() {
        for route in [
            AppRoute::Home,
            AppRoute::Login,
            AppRoute::SetPassword,
            AppRoute::Dashboard,
            AppRoute::Messages,
            AppRoute::Admins,
        ] {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }

    #[test]
    fn test_path_normalization() {
        assert_eq!(AppRoute::from_path("/admin/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/set-password?email=a%40b.com"), AppRoute::SetPassword);
        assert_eq!(AppRoute::from_path(""), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn test_set_password_path_encodes_email() {
        assert_eq!(AppRoute::set_password_path("a+b@c.fr"), "/set-password?email=a%2Bb%40c.fr");
    }
}
