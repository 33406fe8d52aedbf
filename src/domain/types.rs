// ==========================================
// 制衣生产跟踪系统 - 共享领域类型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// UserRole - 用户角色
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    /// 管理员（导入/提交工序/录入产能）
    Admin,
    /// 普通用户（只读）
    Staff,
}

impl UserRole {
    /// 与存储层字符串互转（users.user_type 列）
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Staff => "Staff",
        }
    }

    pub fn parse(s: &str) -> Option<UserRole> {
        match s {
            "Admin" => Some(UserRole::Admin),
            "Staff" => Some(UserRole::Staff),
            _ => None,
        }
    }
}

// ==========================================
// RateLookup - 产能查询结果
// ==========================================
// 三态: 从未登记 / 已登记但未测定(null) / 已测定
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateLookup {
    /// (工序, 尺码) 组合从未出现过
    Missing,
    /// 已登记缺口，产能尚未测定
    Unmeasured,
    /// 已测定: 每台机每日产量
    Measured(f64),
}

impl RateLookup {
    /// 折算为工序实例的初始产能字段（未测定/缺失 → None）
    pub fn to_rate(&self) -> Option<f64> {
        match self {
            RateLookup::Measured(v) => Some(*v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_roundtrip() {
        assert_eq!(UserRole::parse("Admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("Staff"), Some(UserRole::Staff));
        assert_eq!(UserRole::parse("Boss"), None);
        assert_eq!(UserRole::Admin.as_str(), "Admin");
    }

    #[test]
    fn test_rate_lookup_to_rate() {
        assert_eq!(RateLookup::Missing.to_rate(), None);
        assert_eq!(RateLookup::Unmeasured.to_rate(), None);
        assert_eq!(RateLookup::Measured(12.0).to_rate(), Some(12.0));
    }
}
