// ==========================================
// 制衣生产跟踪系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite (文档式存储)
// 系统定位: 订单导入 → 工序排期 → 日产量登记 → 完成度汇总
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据 (Excel/CSV)
pub mod importer;

// 鉴权层 - 管理员校验
pub mod auth;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{RateLookup, UserRole};

// 领域实体
pub use domain::{
    Buyer, ImportOutcome, MissingRate, Order, OrderProduct, PendingProduct, Process,
    ProcessInstance, Product, ProductionEntry, ProductionRate, RawProductRecord, SizeRate, Style,
    StyleSubmission, User,
};

// 引擎
pub use engine::{CompletionEngine, ImportService, ImportWorkflow, RateBackfillReport, ScheduleError};

// API
pub use api::{BuyerApi, ProductApi, ProductionApi, StyleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "制衣生产跟踪系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
