// ==========================================
// 制衣生产跟踪系统 - 产品/订单 API
// ==========================================
// 覆盖: 单品新增 / 表格导入 / 待定款式解析 /
//       订单新增与查询 / 产品明细批查
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::import::{ImportOutcome, StyleSubmission};
use crate::domain::order::{Order, OrderProduct};
use crate::domain::product::Product;
use crate::engine::ImportService;
use crate::repository::{OrderRepository, ProductRepository};
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;

/// 产品/订单 API
pub struct ProductApi {
    product_repo: Arc<ProductRepository>,
    order_repo: Arc<OrderRepository>,
    workflow: Arc<dyn ImportService>,
}

impl ProductApi {
    pub fn new(
        product_repo: Arc<ProductRepository>,
        order_repo: Arc<OrderRepository>,
        workflow: Arc<dyn ImportService>,
    ) -> Self {
        Self {
            product_repo,
            order_repo,
            workflow,
        }
    }

    /// 新增单个产品
    pub fn add_product(&self, product: &Product) -> ApiResult<()> {
        self.product_repo.insert(product)?;
        Ok(())
    }

    /// 从表格文件导入产品并折入订单
    ///
    /// # 返回
    /// ImportOutcome: 含未知款式清单时, 调用方需携带 batch_id
    /// 走 resolve_pending_styles 完成建档
    pub async fn import_file(
        &self,
        file_path: &Path,
        import_date: NaiveDate,
    ) -> ApiResult<ImportOutcome> {
        let outcome = self.workflow.import_file(file_path, import_date).await?;
        Ok(outcome)
    }

    /// 导入已解析的候选产品行 (传输层自带解析时的入口)
    pub async fn import_records(
        &self,
        records: Vec<crate::domain::import::RawProductRecord>,
        import_date: NaiveDate,
    ) -> ApiResult<ImportOutcome> {
        let outcome = self.workflow.import_records(records, import_date).await?;
        Ok(outcome)
    }

    /// 为未知款式提交工序, 推进批次暂存行
    pub async fn resolve_pending_styles(
        &self,
        batch_id: &str,
        submissions: Vec<StyleSubmission>,
        import_date: NaiveDate,
    ) -> ApiResult<ImportOutcome> {
        if submissions.is_empty() {
            return Err(ApiError::InvalidInput("工序提交列表为空".to_string()));
        }
        let outcome = self
            .workflow
            .resolve_pending_styles(batch_id, submissions, import_date)
            .await?;
        Ok(outcome)
    }

    /// 新增或扩充订单 (按 sr_no 匹配)
    ///
    /// 所有被引用的产品必须已建档。
    pub fn add_order(
        &self,
        sr_no: &str,
        buyer: &str,
        products: Vec<OrderProduct>,
    ) -> ApiResult<Order> {
        let product_ids: Vec<String> = products.iter().map(|p| p.product_id.clone()).collect();
        let found = self.product_repo.find_by_ids(&product_ids)?;
        if found.len() != product_ids.len() {
            return Err(ApiError::InvalidInput("部分产品不存在".to_string()));
        }

        match self.order_repo.find_by_sr_no(sr_no)? {
            Some(mut order) => {
                order.products.extend(products);
                self.order_repo.update(&order)?;
                Ok(order)
            }
            None => {
                let mut order = Order::new(sr_no, buyer, "", None);
                order.products = products;
                self.order_repo.insert(&order)?;
                Ok(order)
            }
        }
    }

    /// 列出全部订单
    pub fn list_orders(&self) -> ApiResult<Vec<Order>> {
        Ok(self.order_repo.list_all()?)
    }

    /// 按出厂日升序列出订单
    pub fn list_orders_sorted(&self) -> ApiResult<Vec<Order>> {
        Ok(self.order_repo.list_sorted_by_ex_factory()?)
    }

    /// 批量查询产品明细 (订单详情页展开产品引用)
    pub fn get_product_details(&self, product_ids: &[String]) -> ApiResult<Vec<Product>> {
        Ok(self.product_repo.find_by_ids(product_ids)?)
    }
}
