//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 静态路由表在进程启动时定义，此后不可变。

use maxtrace_shared::Role;

use crate::pages::{self, PageLoader};

// =========================================================
// 路径与分组常量
// =========================================================

pub const PATH_LOGIN: &str = "/login";
pub const PATH_UNAUTHORIZED: &str = "/unauthorized";
pub const PATH_ADMIN_DASHBOARD: &str = "/admin/dashboard";
/// 非管理员角色的默认落地页
pub const PATH_PRODUCTION_HOME: &str = "/production/cell-registration";

pub const SECTION_PRODUCTION: &str = "Production";
pub const SECTION_ADMIN: &str = "Admin Panel";

const PUBLIC: &[Role] = &[];
const STAFF: &[Role] = &[Role::Operator, Role::Admin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// 路由描述符
///
/// `roles` 为空表示公开路由：总是可达，且永远不出现在
/// 按角色过滤的导航列表中。
pub struct RouteDescriptor {
    pub path: &'static str,
    pub title: &'static str,
    pub roles: &'static [Role],
    pub section: Option<&'static str>,
    pub icon: &'static str,
    pub loader: PageLoader,
}

static ROUTES: [RouteDescriptor; 14] = [
    RouteDescriptor {
        path: PATH_LOGIN,
        title: "登录",
        roles: PUBLIC,
        section: None,
        icon: "shield",
        loader: pages::load_login,
    },
    RouteDescriptor {
        path: PATH_UNAUTHORIZED,
        title: "无权访问",
        roles: PUBLIC,
        section: None,
        icon: "shield",
        loader: pages::load_unauthorized,
    },
    RouteDescriptor {
        path: "/production/cell-registration",
        title: "电芯注册",
        roles: STAFF,
        section: Some(SECTION_PRODUCTION),
        icon: "battery",
        loader: pages::load_cell_registration,
    },
    RouteDescriptor {
        path: "/production/cell-grading",
        title: "电芯分容",
        roles: STAFF,
        section: Some(SECTION_PRODUCTION),
        icon: "gauge",
        loader: pages::load_cell_grading,
    },
    RouteDescriptor {
        path: "/production/cell-sorting",
        title: "电芯分选",
        roles: STAFF,
        section: Some(SECTION_PRODUCTION),
        icon: "layers",
        loader: pages::load_cell_sorting,
    },
    RouteDescriptor {
        path: "/production/battery-assembly",
        title: "电池组装",
        roles: STAFF,
        section: Some(SECTION_PRODUCTION),
        icon: "cube",
        loader: pages::load_battery_assembly,
    },
    RouteDescriptor {
        path: "/production/welding",
        title: "焊接参数",
        roles: STAFF,
        section: Some(SECTION_PRODUCTION),
        icon: "bolt",
        loader: pages::load_welding,
    },
    RouteDescriptor {
        path: "/production/bms-mounting",
        title: "BMS 安装",
        roles: STAFF,
        section: Some(SECTION_PRODUCTION),
        icon: "chip",
        loader: pages::load_bms_mounting,
    },
    RouteDescriptor {
        path: "/production/pack-grading",
        title: "电池包测试",
        roles: STAFF,
        section: Some(SECTION_PRODUCTION),
        icon: "gauge",
        loader: pages::load_pack_grading,
    },
    RouteDescriptor {
        path: "/production/pdi-inspection",
        title: "PDI 检验",
        roles: STAFF,
        section: Some(SECTION_PRODUCTION),
        icon: "clipboard",
        loader: pages::load_pdi_inspection,
    },
    RouteDescriptor {
        path: "/production/dispatch",
        title: "发货",
        roles: STAFF,
        section: Some(SECTION_PRODUCTION),
        icon: "truck",
        loader: pages::load_dispatch,
    },
    RouteDescriptor {
        path: PATH_ADMIN_DASHBOARD,
        title: "仪表盘",
        roles: ADMIN_ONLY,
        section: Some(SECTION_ADMIN),
        icon: "chart",
        loader: pages::load_dashboard,
    },
    RouteDescriptor {
        path: "/admin/cell-inventory",
        title: "电芯库存",
        roles: ADMIN_ONLY,
        section: Some(SECTION_ADMIN),
        icon: "layers",
        loader: pages::load_cell_inventory,
    },
    RouteDescriptor {
        path: "/admin/traceability",
        title: "追溯查询",
        roles: ADMIN_ONLY,
        section: Some(SECTION_ADMIN),
        icon: "search",
        loader: pages::load_traceability,
    },
];

/// 完整路由表
pub fn routes() -> &'static [RouteDescriptor] {
    &ROUTES
}

/// 按路径查找路由
pub fn find(path: &str) -> Option<&'static RouteDescriptor> {
    routes().iter().find(|r| r.path == path)
}

/// 角色可见的导航路由（公开路由不参与导航列表）
pub fn nav_routes(role: Role) -> Vec<&'static RouteDescriptor> {
    routes()
        .iter()
        .filter(|r| !r.roles.is_empty() && r.roles.contains(&role))
        .collect()
}

/// 角色相关的默认落地页
///
/// 管理员进仪表盘，其他已认证角色进生产首站，未认证进登录页。
pub fn default_route(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => PATH_ADMIN_DASHBOARD,
        Some(_) => PATH_PRODUCTION_HOME,
        None => PATH_LOGIN,
    }
}

#[cfg(test)]
mod tests;
