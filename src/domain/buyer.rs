// ==========================================
// 制衣生产跟踪系统 - 买家名录
// ==========================================

use serde::{Deserialize, Serialize};

/// 买家 (名称唯一, 去首尾空白后精确匹配)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Buyer {
    pub name: String,
}
