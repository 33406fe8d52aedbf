// ==========================================
// 制衣生产跟踪系统 - API 层
// ==========================================
// 职责: 提供业务接口, 供传输层 (HTTP 等, 系统范围外) 调用
// ==========================================

pub mod buyer_api;
pub mod error;
pub mod product_api;
pub mod production_api;
pub mod style_api;

// 重导出核心类型
pub use buyer_api::BuyerApi;
pub use error::{ApiError, ApiResult};
pub use product_api::ProductApi;
pub use production_api::ProductionApi;
pub use style_api::StyleApi;
