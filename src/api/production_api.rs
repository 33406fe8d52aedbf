// ==========================================
// 制衣生产跟踪系统 - 产量/完成度 API
// ==========================================
// 覆盖: 产品查询 / 日产量录入 / 产能登记与回填 /
//       产品与订单完成度重算
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::product::Product;
use crate::domain::production::ProductionRate;
use crate::engine::{CompletionEngine, RateBackfillReport};
use crate::repository::{ProductRepository, ProductionRateRepository};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 产量/完成度 API
pub struct ProductionApi {
    engine: Arc<CompletionEngine>,
    rate_repo: Arc<ProductionRateRepository>,
    product_repo: Arc<ProductRepository>,
}

impl ProductionApi {
    pub fn new(
        engine: Arc<CompletionEngine>,
        rate_repo: Arc<ProductionRateRepository>,
        product_repo: Arc<ProductRepository>,
    ) -> Self {
        Self {
            engine,
            rate_repo,
            product_repo,
        }
    }

    /// 列出全部产品
    pub fn list_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self.product_repo.list_all()?)
    }

    /// 按ID查询产品
    pub fn get_product(&self, product_id: &str) -> ApiResult<Product> {
        self.product_repo
            .find_by_id(product_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Product(id={})不存在", product_id)))
    }

    /// 录入某产品某工序的单日产量 (同日覆盖)
    pub fn record_entry(
        &self,
        product_id: &str,
        process_id: &str,
        date: NaiveDate,
        quantity: i64,
    ) -> ApiResult<Product> {
        if quantity < 0 {
            return Err(ApiError::InvalidInput("产量不能为负".to_string()));
        }
        Ok(self.engine.record_entry(product_id, process_id, date, quantity)?)
    }

    /// 登记某工序的一组尺码产能, 并逐尺码回填存量工序实例
    ///
    /// # 返回
    /// 每个尺码一份回填报告 (更新清单 + 失败清单, 不回滚)
    pub fn set_production_rates(
        &self,
        process_name: &str,
        rates: BTreeMap<String, f64>,
    ) -> ApiResult<Vec<RateBackfillReport>> {
        if process_name.trim().is_empty() {
            return Err(ApiError::InvalidInput("工序名缺失".to_string()));
        }

        let process_name = process_name.trim();
        let mut reports = Vec::with_capacity(rates.len());
        for (size, value) in rates {
            self.rate_repo.set_rate(process_name, &size, value)?;
            let report = self.engine.apply_measured_rate(process_name, &size, value)?;
            reports.push(report);
        }
        Ok(reports)
    }

    /// 列出全部产能文档
    pub fn list_production_rates(&self) -> ApiResult<Vec<ProductionRate>> {
        Ok(self.rate_repo.list_all()?)
    }

    /// 重算产品完成度并向订单传播
    pub fn update_process_status(&self, product_id: &str) -> ApiResult<bool> {
        Ok(self.engine.recalculate_product_completion(product_id)?)
    }

    /// 重算订单完成度 (按产品反查)
    pub fn update_order_status(&self, product_id: &str) -> ApiResult<bool> {
        Ok(self.engine.recalculate_order_completion(product_id)?)
    }
}
