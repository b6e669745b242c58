use super::*;

use std::collections::HashSet;

// =========================================================
// 路由表结构测试
// =========================================================

#[test]
fn test_paths_are_unique() {
    let mut seen = HashSet::new();
    for descriptor in routes() {
        assert!(
            seen.insert(descriptor.path),
            "重复的路由路径: {}",
            descriptor.path
        );
    }
}

#[test]
fn test_public_routes_have_no_section() {
    for descriptor in routes() {
        if descriptor.roles.is_empty() {
            assert!(descriptor.section.is_none(), "公开路由不应参与导航分组");
        } else {
            assert!(descriptor.section.is_some(), "受保护路由必须有导航分组");
        }
    }
}

#[test]
fn test_find_matches_exact_path() {
    assert!(find(PATH_LOGIN).is_some());
    assert_eq!(find(PATH_ADMIN_DASHBOARD).map(|r| r.title), Some("仪表盘"));
    assert!(find("/nonexistent").is_none());
    // 不做前缀匹配
    assert!(find("/admin").is_none());
}

// =========================================================
// 导航过滤测试
// =========================================================

#[test]
fn test_nav_routes_exclude_public_entries() {
    for role in [Role::Admin, Role::Operator] {
        for descriptor in nav_routes(role) {
            assert!(!descriptor.roles.is_empty());
        }
    }
}

#[test]
fn test_operator_sees_production_only() {
    let visible = nav_routes(Role::Operator);
    assert!(!visible.is_empty());
    for descriptor in &visible {
        assert_eq!(descriptor.section, Some(SECTION_PRODUCTION));
    }
}

#[test]
fn test_admin_sees_production_and_admin_panel() {
    let visible = nav_routes(Role::Admin);
    let sections: HashSet<_> = visible.iter().filter_map(|r| r.section).collect();
    assert!(sections.contains(SECTION_PRODUCTION));
    assert!(sections.contains(SECTION_ADMIN));
}

// =========================================================
// 默认落地页测试
// =========================================================

#[test]
fn test_default_route_by_role() {
    assert_eq!(default_route(Some(Role::Admin)), PATH_ADMIN_DASHBOARD);
    assert_eq!(default_route(Some(Role::Operator)), PATH_PRODUCTION_HOME);
    assert_eq!(default_route(None), PATH_LOGIN);
}

#[test]
fn test_default_routes_are_registered() {
    // 落地页必须在路由表内，否则守卫会陷入重定向循环
    assert!(find(default_route(Some(Role::Admin))).is_some());
    assert!(find(default_route(Some(Role::Operator))).is_some());
    assert!(find(default_route(None)).is_some());
}

#[test]
fn test_default_routes_are_reachable_by_their_role() {
    for role in [Role::Admin, Role::Operator] {
        let descriptor = find(default_route(Some(role))).unwrap();
        assert!(descriptor.roles.contains(&role));
    }
    // 未认证的落地页必须是公开路由
    let login = find(default_route(None)).unwrap();
    assert!(login.roles.is_empty());
}
