// ==========================================
// 制衣生产跟踪系统 - 买家 API
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::buyer::Buyer;
use crate::repository::error::RepositoryError;
use crate::repository::BuyerRepository;
use std::sync::Arc;

/// 买家名录 API
pub struct BuyerApi {
    buyer_repo: Arc<BuyerRepository>,
}

impl BuyerApi {
    pub fn new(buyer_repo: Arc<BuyerRepository>) -> Self {
        Self { buyer_repo }
    }

    /// 列出全部买家
    pub fn list_buyers(&self) -> ApiResult<Vec<Buyer>> {
        Ok(self.buyer_repo.list_all()?)
    }

    /// 新增买家 (已存在时报业务错误)
    pub fn add_buyer(&self, name: &str) -> ApiResult<Buyer> {
        match self.buyer_repo.insert(name) {
            Ok(buyer) => Ok(buyer),
            Err(RepositoryError::UniqueConstraintViolation(_)) => Err(
                ApiError::BusinessRuleViolation(format!("买家已存在: {}", name.trim())),
            ),
            Err(e) => Err(e.into()),
        }
    }
}
