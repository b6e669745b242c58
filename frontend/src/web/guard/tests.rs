use super::*;

use crate::web::route::{PATH_ADMIN_DASHBOARD, PATH_LOGIN, PATH_PRODUCTION_HOME, PATH_UNAUTHORIZED};

// =========================================================
// 裁决顺序测试
// =========================================================

#[test]
fn test_unknown_path_fails_closed() {
    // 即便已认证为管理员，未知路径也不放行
    let access = check("/no/such/page", true, Some(Role::Admin));
    assert_eq!(access, RouteAccess::NotFound);
    assert!(!access.is_allowed());
    assert_eq!(access.redirect(), Some(PATH_LOGIN));
}

#[test]
fn test_public_routes_bypass_session_checks() {
    for path in [PATH_LOGIN, PATH_UNAUTHORIZED] {
        let access = check(path, false, None);
        assert_eq!(access, RouteAccess::Public);
        assert!(access.is_allowed());
        assert!(access.redirect().is_none());
    }
    // 已认证时同样可达
    assert_eq!(check(PATH_LOGIN, true, Some(Role::Admin)), RouteAccess::Public);
}

#[test]
fn test_authentication_checked_before_authorization() {
    // 未认证时即便路径要求管理员，也报未认证而非未授权
    let access = check(PATH_ADMIN_DASHBOARD, false, None);
    assert_eq!(access, RouteAccess::Unauthenticated);
    assert_eq!(access.redirect(), Some(PATH_LOGIN));
}

#[test]
fn test_authenticated_wrong_role_is_unauthorized() {
    let access = check(PATH_ADMIN_DASHBOARD, true, Some(Role::Operator));
    assert_eq!(access, RouteAccess::Unauthorized);
    assert_eq!(access.redirect(), Some(PATH_UNAUTHORIZED));
}

#[test]
fn test_authenticated_without_role_is_unauthorized() {
    // 会话存在但用户档案损坏（取不到角色）时按未授权处理
    let access = check(PATH_ADMIN_DASHBOARD, true, None);
    assert_eq!(access, RouteAccess::Unauthorized);
}

#[test]
fn test_matching_role_is_allowed() {
    let access = check(PATH_ADMIN_DASHBOARD, true, Some(Role::Admin));
    assert_eq!(access, RouteAccess::Allowed);
    assert!(access.is_allowed());
    assert!(access.redirect().is_none());
}

#[test]
fn test_staff_routes_admit_both_roles() {
    for role in [Role::Admin, Role::Operator] {
        assert_eq!(
            check(PATH_PRODUCTION_HOME, true, Some(role)),
            RouteAccess::Allowed
        );
    }
}

// =========================================================
// 全表扫描：每条路由的裁决结果自洽
// =========================================================

#[test]
fn test_every_route_decision_is_consistent() {
    for descriptor in route::routes() {
        for (authenticated, role) in [
            (false, None),
            (true, Some(Role::Operator)),
            (true, Some(Role::Admin)),
        ] {
            let access = check(descriptor.path, authenticated, role);
            let expected = if descriptor.roles.is_empty() {
                RouteAccess::Public
            } else if !authenticated {
                RouteAccess::Unauthenticated
            } else if role.map(|r| descriptor.roles.contains(&r)).unwrap_or(false) {
                RouteAccess::Allowed
            } else {
                RouteAccess::Unauthorized
            };
            assert_eq!(access, expected, "路径 {} 的裁决不一致", descriptor.path);
        }
    }
}
