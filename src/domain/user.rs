// ==========================================
// 制衣生产跟踪系统 - 用户 (鉴权主体)
// ==========================================
// 仅承载管理员角色校验所需的最小字段;
// 用户管理本身不在系统范围内
// ==========================================

use crate::domain::types::UserRole;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,     // 用户ID
    pub username: String,    // 用户名 (唯一)
    pub user_type: UserRole, // 角色
}
