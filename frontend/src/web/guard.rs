//! 路由守卫
//!
//! 只根据会话的派生状态做导航决定，属于体验层面的便利；
//! 真正的权限校验由服务端完成。

use super::route::AppRoute;
use crate::session::{Role, SessionState};

/// 守卫种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    /// 无限制
    Open,
    /// 需要登录且为 staff / superuser；`superuser_only` 时还要求超级管理员
    Authenticated { superuser_only: bool },
    /// 仅未登录用户（登录页等）
    PublicOnly,
    /// 需要指定角色，`Staff` 满足任何要求
    Role(Role),
}

/// 守卫决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 会话仍在恢复，暂不决定（避免刷新时闪跳到登录页）
    Pending,
    Render,
    /// `replace` 为 true 时替换历史记录，后退无法回到被拦截的页面
    Redirect { to: AppRoute, replace: bool },
}

/// 对当前会话评估单个守卫
pub fn evaluate(kind: GuardKind, session: &SessionState) -> GuardDecision {
    if matches!(kind, GuardKind::Open) {
        return GuardDecision::Render;
    }
    if session.loading {
        return GuardDecision::Pending;
    }

    let redirect = |to: AppRoute| GuardDecision::Redirect { to, replace: true };

    match kind {
        GuardKind::Open => GuardDecision::Render,
        GuardKind::Authenticated { superuser_only } => {
            if !session.is_authenticated() {
                redirect(AppRoute::auth_failure_redirect())
            } else if !session.is_staff() && !session.is_superuser() {
                redirect(AppRoute::Home)
            } else if superuser_only && !session.is_superuser() {
                redirect(AppRoute::auth_success_redirect())
            } else {
                GuardDecision::Render
            }
        }
        GuardKind::PublicOnly => {
            if session.is_authenticated() {
                redirect(AppRoute::auth_success_redirect())
            } else {
                GuardDecision::Render
            }
        }
        GuardKind::Role(required) => {
            if !session.is_authenticated() {
                redirect(AppRoute::auth_failure_redirect())
            } else if session.role().satisfies(required) {
                GuardDecision::Render
            } else {
                redirect(AppRoute::Home)
            }
        }
    }
}

/// 导航解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub route: AppRoute,
    /// 会话仍在恢复
    pub pending: bool,
    pub redirected: bool,
    pub replace: bool,
}

const MAX_REDIRECTS: usize = 4;

/// 沿守卫重定向链解析最终路由
///
/// 例如：普通客户访问登录页 -> 面板 -> 首页。
pub fn resolve(target: AppRoute, session: &SessionState) -> Resolution {
    let mut resolution = Resolution {
        route: target,
        pending: false,
        redirected: false,
        replace: false,
    };

    for _ in 0..MAX_REDIRECTS {
        match evaluate(resolution.route.guard(), session) {
            GuardDecision::Render => return resolution,
            GuardDecision::Pending => {
                resolution.pending = true;
                return resolution;
            }
            GuardDecision::Redirect { to, replace } => {
                resolution.route = to;
                resolution.redirected = true;
                resolution.replace |= replace;
            }
        }
    }

    // 配置错误导致的循环：退回首页
    resolution.route = AppRoute::Home;
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::staff_user;
    use bookstore_shared::{TokenPair, User};

    fn session_with(is_staff: bool, is_superuser: bool) -> SessionState {
        let user = User {
            is_staff,
            is_superuser,
            ..staff_user()
        };
        SessionState::hydrated(
            Some(user),
            Some(TokenPair {
                access: "t".into(),
                refresh: "r".into(),
            }),
        )
    }

    fn anonymous() -> SessionState {
        SessionState::hydrated(None, None)
    }

    const AUTH: GuardKind = GuardKind::Authenticated {
        superuser_only: false,
    };
    const SUPER: GuardKind = GuardKind::Authenticated {
        superuser_only: true,
    };

    #[test]
    fn test_pending_while_hydrating() {
        let loading = SessionState::hydrating();
        assert_eq!(evaluate(AUTH, &loading), GuardDecision::Pending);
        assert_eq!(evaluate(GuardKind::PublicOnly, &loading), GuardDecision::Pending);
        assert_eq!(evaluate(GuardKind::Role(Role::Staff), &loading), GuardDecision::Pending);
        assert_eq!(evaluate(GuardKind::Open, &loading), GuardDecision::Render);
    }

    #[test]
    fn test_authenticated_guard() {
        assert_eq!(
            evaluate(AUTH, &anonymous()),
            GuardDecision::Redirect {
                to: AppRoute::Login,
                replace: true
            }
        );
        assert_eq!(
            evaluate(AUTH, &session_with(false, false)),
            GuardDecision::Redirect {
                to: AppRoute::Home,
                replace: true
            }
        );
        assert_eq!(evaluate(AUTH, &session_with(true, false)), GuardDecision::Render);
        assert_eq!(evaluate(AUTH, &session_with(false, true)), GuardDecision::Render);
    }

    #[test]
    fn test_superuser_only_guard() {
        assert_eq!(
            evaluate(SUPER, &session_with(true, false)),
            GuardDecision::Redirect {
                to: AppRoute::Dashboard,
                replace: true
            }
        );
        assert_eq!(evaluate(SUPER, &session_with(true, true)), GuardDecision::Render);
    }

    #[test]
    fn test_public_only_guard() {
        assert_eq!(evaluate(GuardKind::PublicOnly, &anonymous()), GuardDecision::Render);
        assert_eq!(
            evaluate(GuardKind::PublicOnly, &session_with(true, false)),
            GuardDecision::Redirect {
                to: AppRoute::Dashboard,
                replace: true
            }
        );
    }

    #[test]
    fn test_role_guard_staff_is_superset() {
        let client_guard = GuardKind::Role(Role::Client);
        assert_eq!(evaluate(client_guard, &session_with(true, false)), GuardDecision::Render);
        assert_eq!(evaluate(client_guard, &session_with(false, false)), GuardDecision::Render);
        assert_eq!(
            evaluate(GuardKind::Role(Role::Staff), &session_with(false, true)),
            GuardDecision::Redirect {
                to: AppRoute::Home,
                replace: true
            }
        );
    }

    #[test]
    fn test_resolve_follows_redirect_chain() {
        // 普通客户：登录页 -> 面板 -> 首页
        let r = resolve(AppRoute::Login, &session_with(false, false));
        assert_eq!(r.route, AppRoute::Home);
        assert!(r.redirected && r.replace);

        let r = resolve(AppRoute::Admins, &anonymous());
        assert_eq!(r.route, AppRoute::Login);

        let r = resolve(AppRoute::Admins, &session_with(true, false));
        assert_eq!(r.route, AppRoute::Dashboard);

        let r = resolve(AppRoute::Dashboard, &session_with(true, false));
        assert_eq!(r.route, AppRoute::Dashboard);
        assert!(!r.redirected);

        let r = resolve(AppRoute::Dashboard, &SessionState::hydrating());
        assert!(r.pending);
        assert_eq!(r.route, AppRoute::Dashboard);
    }
}
