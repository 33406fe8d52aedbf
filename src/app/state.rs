// ==========================================
// 制衣生产跟踪系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 所有仓储共享同一把连接 (单写者, 与存储层并发模型一致)
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{BuyerApi, ProductApi, ProductionApi, StyleApi};
use crate::auth::AuthGate;
use crate::db;
use crate::engine::{CompletionEngine, ImportService, ImportWorkflow};
use crate::repository::{
    BuyerRepository, OrderRepository, PendingImportRepository, ProductRepository,
    ProductionRateRepository, StyleRepository, UserRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 产品/订单 API
    pub product_api: Arc<ProductApi>,

    /// 产量/完成度 API
    pub production_api: Arc<ProductionApi>,

    /// 款式 API
    pub style_api: Arc<StyleApi>,

    /// 买家 API
    pub buyer_api: Arc<BuyerApi>,

    /// 管理员闸口
    pub auth_gate: Arc<AuthGate>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径 (schema 自动初始化)
    pub fn new(db_path: &str) -> anyhow::Result<AppState> {
        let conn = db::open_and_init(db_path)?;
        let conn = Arc::new(Mutex::new(conn));

        // 仓储层
        let style_repo = Arc::new(StyleRepository::from_connection(Arc::clone(&conn)));
        let rate_repo = Arc::new(ProductionRateRepository::from_connection(Arc::clone(&conn)));
        let product_repo = Arc::new(ProductRepository::from_connection(Arc::clone(&conn)));
        let order_repo = Arc::new(OrderRepository::from_connection(Arc::clone(&conn)));
        let buyer_repo = Arc::new(BuyerRepository::from_connection(Arc::clone(&conn)));
        let pending_repo = Arc::new(PendingImportRepository::from_connection(Arc::clone(&conn)));
        let user_repo = Arc::new(UserRepository::from_connection(Arc::clone(&conn)));

        // 引擎层
        let completion_engine = Arc::new(CompletionEngine::new(
            Arc::clone(&product_repo),
            Arc::clone(&order_repo),
        ));
        let workflow = Arc::new(ImportWorkflow::new(
            Arc::clone(&style_repo),
            Arc::clone(&rate_repo),
            Arc::clone(&product_repo),
            Arc::clone(&order_repo),
            Arc::clone(&buyer_repo),
            Arc::clone(&pending_repo),
        ));

        // API 层
        let product_api = Arc::new(ProductApi::new(
            Arc::clone(&product_repo),
            Arc::clone(&order_repo),
            Arc::clone(&workflow) as Arc<dyn ImportService>,
        ));
        let production_api = Arc::new(ProductionApi::new(
            Arc::clone(&completion_engine),
            Arc::clone(&rate_repo),
            Arc::clone(&product_repo),
        ));
        let style_api = Arc::new(StyleApi::new(Arc::clone(&style_repo), Arc::clone(&workflow)));
        let buyer_api = Arc::new(BuyerApi::new(Arc::clone(&buyer_repo)));
        let auth_gate = Arc::new(AuthGate::new(Arc::clone(&user_repo)));

        Ok(AppState {
            db_path: db_path.to_string(),
            product_api,
            production_api,
            style_api,
            buyer_api,
            auth_gate,
        })
    }
}
