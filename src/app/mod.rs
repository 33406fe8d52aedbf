// ==========================================
// 制衣生产跟踪系统 - 应用层
// ==========================================
// 职责: 装配仓储/引擎/API, 供传输层取用
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
