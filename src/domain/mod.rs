// ==========================================
// 制衣生产跟踪系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod buyer;
pub mod import;
pub mod order;
pub mod product;
pub mod production;
pub mod style;
pub mod types;
pub mod user;

// 重导出核心类型
pub use buyer::Buyer;
pub use import::{
    ImportOutcome, ImportRowError, MissingRate, PendingProduct, RawProductRecord, StyleSubmission,
};
pub use order::{Order, OrderProduct};
pub use product::{Process, ProcessInstance, Product, ProductionEntry};
pub use production::{ProductionRate, SizeRate};
pub use style::Style;
pub use types::{RateLookup, UserRole};
pub use user::User;
