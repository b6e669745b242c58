//! 路由守卫模块
//!
//! (路径, 会话) -> 访问裁决 的纯函数。未知路径一律拒绝（fail closed）。

use maxtrace_shared::Role;

use super::route;

/// 单次导航的裁决结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// 路径不在注册表中
    NotFound,
    /// 公开路由，无需会话检查
    Public,
    /// 需要登录但当前未认证
    Unauthenticated,
    /// 已认证但角色不在白名单
    Unauthorized,
    /// 放行
    Allowed,
}

impl RouteAccess {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RouteAccess::Public | RouteAccess::Allowed)
    }

    /// 被拒绝时的重定向目标
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            RouteAccess::NotFound | RouteAccess::Unauthenticated => Some(route::PATH_LOGIN),
            RouteAccess::Unauthorized => Some(route::PATH_UNAUTHORIZED),
            RouteAccess::Public | RouteAccess::Allowed => None,
        }
    }
}

/// 守卫检查，按固定顺序，先命中先裁决：
/// 未知路径 -> 公开路由 -> 认证 -> 授权。
///
/// 顺序不可调换：认证先于授权，公开路由完全绕过会话检查，
/// 否则登录页自身在未登录时不可达。
pub fn check(path: &str, authenticated: bool, role: Option<Role>) -> RouteAccess {
    let Some(descriptor) = route::find(path) else {
        return RouteAccess::NotFound;
    };

    if descriptor.roles.is_empty() {
        return RouteAccess::Public;
    }

    if !authenticated {
        return RouteAccess::Unauthenticated;
    }

    match role {
        Some(role) if descriptor.roles.contains(&role) => RouteAccess::Allowed,
        _ => RouteAccess::Unauthorized,
    }
}

#[cfg(test)]
mod tests;
