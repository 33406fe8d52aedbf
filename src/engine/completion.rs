// ==========================================
// 制衣生产跟踪系统 - 产量台账与完成度引擎
// ==========================================
// 职责:
// 1. 日产量录入 (同日覆盖) 并重算工序累计/完成
// 2. 完成度自下而上传播: 工序 → 产品 → 订单
// 3. 产能测定值的存量回填 (跨产品扇出)
// 红线: 跨文档扇出不做整体回滚, 单文档内 all-or-nothing
// ==========================================

use crate::domain::product::Product;
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::{OrderRepository, ProductRepository};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// RateBackfillReport - 回填结果报告
// ==========================================
// 至少一次语义: 已落盘的部分更新不回滚, 失败逐文档列出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateBackfillReport {
    pub process_name: String,
    pub size: String,
    pub value: f64,
    /// 实际更新的 (产品ID, 工序实例ID)
    pub updated: Vec<(String, String)>,
    /// 持久化失败的产品与原因
    pub failed: Vec<(String, String)>,
}

// ==========================================
// CompletionEngine - 完成度引擎
// ==========================================
pub struct CompletionEngine {
    product_repo: Arc<ProductRepository>,
    order_repo: Arc<OrderRepository>,
}

impl CompletionEngine {
    pub fn new(product_repo: Arc<ProductRepository>, order_repo: Arc<OrderRepository>) -> Self {
        Self {
            product_repo,
            order_repo,
        }
    }

    /// 录入单日产量
    ///
    /// 同一日历日已有条目则覆盖数量, 否则追加;
    /// 随后重算 total_production 与工序 completed 并持久化。
    ///
    /// # 返回
    /// - Ok(Product): 更新后的产品
    /// - Err(NotFound): 产品或工序实例不存在
    pub fn record_entry(
        &self,
        product_id: &str,
        process_id: &str,
        date: NaiveDate,
        quantity: i64,
    ) -> EngineResult<Product> {
        let mut product =
            self.product_repo
                .find_by_id(product_id)?
                .ok_or_else(|| EngineError::NotFound {
                    entity: "Product".to_string(),
                    id: product_id.to_string(),
                })?;

        let required = product.quantity;
        let process =
            product
                .find_process_mut(process_id)
                .ok_or_else(|| EngineError::NotFound {
                    entity: "ProcessInstance".to_string(),
                    id: process_id.to_string(),
                })?;

        // 先追加/覆盖, 再重算 —— 两步顺序不可交换
        process.upsert_entry(date, quantity);
        process.recompute(required);

        self.product_repo.update(&product)?;
        Ok(product)
    }

    /// 重算产品完成度并向订单传播
    ///
    /// 产品 completed ⇔ 全部工序实例 completed。
    /// 完成时在所属订单的产品列表里镜像该标志 (显式双边更新);
    /// 找不到所属订单时记日志放行, 不向调用方报错。
    pub fn recalculate_product_completion(&self, product_id: &str) -> EngineResult<bool> {
        let mut product =
            self.product_repo
                .find_by_id(product_id)?
                .ok_or_else(|| EngineError::NotFound {
                    entity: "Product".to_string(),
                    id: product_id.to_string(),
                })?;

        let all_completed = product.all_processes_completed();
        product.completed = all_completed;
        self.product_repo.update(&product)?;

        if all_completed {
            match self.order_repo.find_containing_product(product_id)? {
                Some(mut order) => {
                    for entry in &mut order.products {
                        if entry.product_id == product_id {
                            entry.completed = true;
                        }
                    }
                    self.order_repo.update(&order)?;
                    tracing::info!(
                        order_id = %order.order_id,
                        product_id = %product_id,
                        "产品完成, 已镜像到订单"
                    );
                }
                None => {
                    // 现行为: 记日志放行 (是否应硬报错待产品侧定夺)
                    tracing::warn!(product_id = %product_id, "未找到包含该产品的订单");
                }
            }
        }

        Ok(all_completed)
    }

    /// 重算订单完成度 (按产品ID反查订单)
    ///
    /// 订单 completed ⇔ 产品列表所有条目 completed。
    /// 读后写, 对并发产品更新不保证原子。
    pub fn recalculate_order_completion(&self, product_id: &str) -> EngineResult<bool> {
        let order = match self.order_repo.find_containing_product(product_id)? {
            Some(order) => order,
            None => {
                tracing::warn!(product_id = %product_id, "未找到包含该产品的订单");
                return Ok(false);
            }
        };

        if order.all_products_completed() {
            let mut order = order;
            order.completed = true;
            self.order_repo.update(&order)?;
            tracing::info!(order_id = %order.order_id, "订单已全部完成");
            return Ok(true);
        }

        Ok(false)
    }

    /// 产能测定值的存量回填
    ///
    /// 对所有尺码匹配的产品, 把名称匹配且产能为 null 的工序实例
    /// 填为测定值; 已有测定值的不动。逐文档持久化 (单条 UPDATE),
    /// 跨文档不回滚, 失败逐条记入报告。
    pub fn apply_measured_rate(
        &self,
        process_name: &str,
        size: &str,
        value: f64,
    ) -> EngineResult<RateBackfillReport> {
        let mut report = RateBackfillReport {
            process_name: process_name.to_string(),
            size: size.to_string(),
            value,
            updated: Vec::new(),
            failed: Vec::new(),
        };

        let products = self.product_repo.find_by_size(size)?;
        for mut product in products {
            let mut touched = Vec::new();
            for process in &mut product.processes {
                if process.process_name == process_name
                    && process.production_per_day_per_machine.is_none()
                {
                    process.production_per_day_per_machine = Some(value);
                    touched.push(process.process_id.clone());
                }
            }

            if touched.is_empty() {
                continue;
            }

            match self.product_repo.update(&product) {
                Ok(()) => {
                    for process_id in touched {
                        report.updated.push((product.product_id.clone(), process_id));
                    }
                }
                Err(e) => {
                    tracing::error!(
                        product_id = %product.product_id,
                        error = %e,
                        "产能回填写入失败, 继续处理剩余产品"
                    );
                    report.failed.push((product.product_id.clone(), e.to_string()));
                }
            }
        }

        tracing::info!(
            process_name = %process_name,
            size = %size,
            updated = report.updated.len(),
            failed = report.failed.len(),
            "产能回填完成"
        );
        Ok(report)
    }
}
