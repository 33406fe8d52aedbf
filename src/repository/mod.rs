// ==========================================
// 制衣生产跟踪系统 - 数据仓储层
// ==========================================
// 职责: 各集合的查/插/改/upsert/批量 upsert
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod buyer_repo;
pub mod error;
pub mod order_repo;
pub mod pending_import_repo;
pub mod product_repo;
pub mod production_rate_repo;
pub mod style_repo;
pub mod user_repo;

pub use buyer_repo::BuyerRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use order_repo::OrderRepository;
pub use pending_import_repo::PendingImportRepository;
pub use product_repo::ProductRepository;
pub use production_rate_repo::ProductionRateRepository;
pub use style_repo::StyleRepository;
pub use user_repo::UserRepository;
