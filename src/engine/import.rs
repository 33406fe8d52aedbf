// ==========================================
// 制衣生产跟踪系统 - 导入/建档工作流
// ==========================================
// 状态机 (按行): Parsed → StyleResolved → Scheduled → Persisted
//                └→ PendingStyle (款式未知, 按批次暂存)
// 职责:
// 1. 原始行 → 候选产品 (去空白/日期归一/空白数量记0)
// 2. 款式解析: 已有款式拷贝工序模板; 未知款式暂存并上报
// 3. 产能解析: (工序,尺码) 无记录时登记缺口并列入报告
// 4. 排期 → 建档 → 按 sr_no 折入订单 (追加并重置订单完成标志)
// 5. 解析步骤: 凭 batch_id 提交工序, 推进暂存行;
//    未覆盖款式的暂存行保留 (不整体清空)
// 红线: 行级校验失败只中止该行, 批次其余行继续
// ==========================================

use crate::domain::import::{
    ImportOutcome, ImportRowError, MissingRate, RawProductRecord, StyleSubmission,
};
use crate::domain::order::{Order, OrderProduct};
use crate::domain::product::{ProcessInstance, Product};
use crate::domain::style::Style;
use crate::domain::types::RateLookup;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::import_service::ImportService;
use crate::engine::scheduler::schedule_processes;
use crate::importer::spreadsheet;
use crate::repository::{
    BuyerRepository, OrderRepository, PendingImportRepository, ProductRepository,
    ProductionRateRepository, StyleRepository,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

// ==========================================
// StyleRebuildReport - 款式工序重建报告
// ==========================================
// submit_style_processes 对已建档产品的整体重建结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleRebuildReport {
    pub style_name: String,
    pub updated_products: Vec<String>,
    pub missing_production_data: Vec<MissingRate>,
    pub errors: Vec<ImportRowError>,
}

// ==========================================
// ImportWorkflow - 导入工作流引擎
// ==========================================
pub struct ImportWorkflow {
    style_repo: Arc<StyleRepository>,
    rate_repo: Arc<ProductionRateRepository>,
    product_repo: Arc<ProductRepository>,
    order_repo: Arc<OrderRepository>,
    buyer_repo: Arc<BuyerRepository>,
    pending_repo: Arc<PendingImportRepository>,
}

impl ImportWorkflow {
    pub fn new(
        style_repo: Arc<StyleRepository>,
        rate_repo: Arc<ProductionRateRepository>,
        product_repo: Arc<ProductRepository>,
        order_repo: Arc<OrderRepository>,
        buyer_repo: Arc<BuyerRepository>,
        pending_repo: Arc<PendingImportRepository>,
    ) -> Self {
        Self {
            style_repo,
            rate_repo,
            product_repo,
            order_repo,
            buyer_repo,
            pending_repo,
        }
    }

    /// 提交款式工序并重建该款全部已建档产品
    ///
    /// 款式目录整体替换后, 每个产品的工序实例列表重新生成
    /// (空台账) 并重新排期; 产能缺口照常登记与上报。
    pub async fn submit_style_processes(
        &self,
        style_name: &str,
        process_names: &[String],
        import_date: NaiveDate,
    ) -> EngineResult<StyleRebuildReport> {
        if style_name.trim().is_empty() || process_names.is_empty() {
            return Err(EngineError::Validation("款名或工序列表缺失".to_string()));
        }

        let style = Style::from_process_names(style_name, process_names);
        self.style_repo.upsert(&style)?;

        let products = self.product_repo.find_by_style(&style.style_name)?;
        if products.is_empty() {
            return Err(EngineError::NotFound {
                entity: "Product".to_string(),
                id: format!("style={}", style.style_name),
            });
        }

        let mut report = StyleRebuildReport {
            style_name: style.style_name.clone(),
            updated_products: Vec::new(),
            missing_production_data: Vec::new(),
            errors: Vec::new(),
        };

        for mut product in products {
            let instances =
                self.build_process_instances(&style, &product.size, &mut report.missing_production_data)?;

            match schedule_processes(&instances, product.ex_factory_date, import_date, &product.sr_no)
            {
                Ok(scheduled) => {
                    product.processes = scheduled;
                    product.completed = false;
                    self.product_repo.update(&product)?;
                    report.updated_products.push(product.product_id.clone());
                }
                Err(e) => {
                    report.errors.push(ImportRowError {
                        sr_no: product.sr_no.clone(),
                        style_name: product.style_name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

#[async_trait]
impl ImportService for ImportWorkflow {
    /// 从表格文件导入 (主入口)
    ///
    /// # 流程
    /// 1. 解析 Excel/CSV → 原始行
    /// 2. 交由 import_records 走建档状态机
    async fn import_file(
        &self,
        file_path: &Path,
        import_date: NaiveDate,
    ) -> EngineResult<ImportOutcome> {
        let records = spreadsheet::parse_file(file_path)?;
        tracing::info!(file = %file_path.display(), rows = records.len(), "表格解析完成");
        self.import_records(records, import_date).await
    }

    /// 导入一批候选产品行
    ///
    /// # 返回
    /// ImportOutcome: 批次ID + 建档产品 + 未知款式 + 缺产能清单 + 行级失败
    async fn import_records(
        &self,
        records: Vec<RawProductRecord>,
        import_date: NaiveDate,
    ) -> EngineResult<ImportOutcome> {
        let batch_id = Uuid::new_v4().to_string();
        let mut outcome = ImportOutcome::new(batch_id.clone());
        let mut unknown_styles = BTreeSet::new();
        let mut buyers = BTreeSet::new();
        let mut persisted_products = Vec::new();

        for mut record in records {
            // === Parsed: 字段去空白 ===
            record.trim_fields();
            if !record.buyer.is_empty() {
                buyers.insert(record.buyer.clone());
            }

            // === StyleResolved: 款式目录查找 ===
            let style = self.style_repo.find_by_name(&record.style_name)?;
            match style {
                Some(style) => {
                    match self.advance_to_persisted(&record, &style, import_date, &mut outcome)? {
                        Some(product) => persisted_products.push(product),
                        None => {} // 行级失败已记入 outcome.errors
                    }
                }
                None => {
                    // === PendingStyle: 按批次暂存, 不建档 ===
                    self.pending_repo.stage(&batch_id, &record)?;
                    unknown_styles.insert(record.style_name.clone());
                }
            }
        }

        // 买家名录 insert-if-absent
        let buyer_names: Vec<String> = buyers.into_iter().collect();
        self.buyer_repo.bulk_upsert(&buyer_names)?;

        // 按 sr_no 折入订单
        for product in &persisted_products {
            self.fold_into_order(product)?;
        }

        outcome.persisted_products = persisted_products
            .into_iter()
            .map(|p| p.product_id)
            .collect();
        outcome.unknown_styles = unknown_styles.into_iter().collect();

        if outcome.needs_style_resolution() {
            tracing::info!(
                batch_id = %outcome.batch_id,
                styles = ?outcome.unknown_styles,
                "检测到未知款式, 等待工序提交"
            );
        }
        if !outcome.missing_production_data.is_empty() {
            tracing::warn!(
                missing = outcome.missing_production_data.len(),
                "部分 (工序, 尺码) 缺产能数据, 已登记缺口"
            );
        }

        Ok(outcome)
    }

    /// 解析步骤: 为未知款式提交工序, 推进本批次暂存行
    ///
    /// 提交覆盖到的暂存产品走 StyleResolved → Scheduled → Persisted;
    /// 未覆盖款式的暂存行保留在批次内, 随结果一并报告。
    async fn resolve_pending_styles(
        &self,
        batch_id: &str,
        submissions: Vec<StyleSubmission>,
        import_date: NaiveDate,
    ) -> EngineResult<ImportOutcome> {
        let mut outcome = ImportOutcome::new(batch_id.to_string());

        // 款式目录整体替换 (sequence_index 重排 1..N)
        for submission in &submissions {
            if submission.style_name.trim().is_empty() || submission.process_names.is_empty() {
                return Err(EngineError::Validation(
                    "款名或工序列表缺失".to_string(),
                ));
            }
            let style =
                Style::from_process_names(&submission.style_name, &submission.process_names);
            self.style_repo.upsert(&style)?;
        }

        let staged = self.pending_repo.list_by_batch(batch_id)?;
        let mut persisted_products = Vec::new();

        for pending in staged {
            let style = match self.style_repo.find_by_name(&pending.style_name)? {
                Some(style) => style,
                // 本次提交未覆盖的款式: 保留暂存
                None => continue,
            };

            match self.advance_to_persisted(&pending.record, &style, import_date, &mut outcome)? {
                Some(product) => {
                    persisted_products.push(product);
                    self.pending_repo.remove(&pending.pending_id)?;
                }
                None => {
                    // 校验失败的行永远无法建档, 不再滞留暂存区
                    self.pending_repo.remove(&pending.pending_id)?;
                }
            }
        }

        for product in &persisted_products {
            self.fold_into_order(product)?;
        }

        outcome.persisted_products = persisted_products
            .into_iter()
            .map(|p| p.product_id)
            .collect();
        outcome.unknown_styles = self.pending_repo.distinct_styles(batch_id)?;

        Ok(outcome)
    }
}

// ==========================================
// 内部步骤
// ==========================================
impl ImportWorkflow {
    /// StyleResolved → Scheduled → Persisted
    ///
    /// 行级校验失败 (如缺出厂日) 记入 outcome.errors 并返回 None。
    fn advance_to_persisted(
        &self,
        record: &RawProductRecord,
        style: &Style,
        import_date: NaiveDate,
        outcome: &mut ImportOutcome,
    ) -> EngineResult<Option<Product>> {
        let instances = self.build_process_instances(
            style,
            &record.size,
            &mut outcome.missing_production_data,
        )?;

        let scheduled =
            match schedule_processes(&instances, record.ex_factory_date, import_date, &record.sr_no)
            {
                Ok(scheduled) => scheduled,
                Err(e) => {
                    tracing::warn!(sr_no = %record.sr_no, error = %e, "行级校验失败, 跳过该行");
                    outcome.errors.push(ImportRowError {
                        sr_no: record.sr_no.clone(),
                        style_name: record.style_name.clone(),
                        reason: e.to_string(),
                    });
                    return Ok(None);
                }
            };

        let product = Product {
            product_id: Uuid::new_v4().to_string(),
            image: record.image.clone(),
            sr_no: record.sr_no.clone(),
            buyer: record.buyer.clone(),
            buyer_po: record.buyer_po.clone(),
            color: record.color.clone(),
            ex_factory_date: record.ex_factory_date,
            style_name: record.style_name.clone(),
            size: record.size.clone(),
            quantity: record.quantity,
            completed: false,
            processes: scheduled,
        };
        self.product_repo.insert(&product)?;

        Ok(Some(product))
    }

    /// 由款式模板生成全新工序实例, 逐工序解析 (工序, 尺码) 产能
    ///
    /// 从未登记的组合: 幂等登记缺口并列入 missing 清单;
    /// 已登记未测定的组合: 实例产能为 None, 不再重复上报。
    fn build_process_instances(
        &self,
        style: &Style,
        size: &str,
        missing: &mut Vec<MissingRate>,
    ) -> EngineResult<Vec<ProcessInstance>> {
        let mut instances = Vec::with_capacity(style.processes.len());
        for template in &style.processes {
            let lookup = self.rate_repo.get_rate(&template.process_name, size)?;
            if lookup == RateLookup::Missing {
                self.rate_repo.record_gap(&template.process_name, size)?;
                let gap = MissingRate {
                    process_name: template.process_name.clone(),
                    size: size.to_string(),
                };
                if !missing.contains(&gap) {
                    missing.push(gap);
                }
            }
            instances.push(ProcessInstance::from_template(template, lookup.to_rate()));
        }
        Ok(instances)
    }

    /// 将建档产品折入其 sr_no 对应的订单
    ///
    /// 已有订单: 追加产品条目并重置 completed=false;
    /// 无订单: 以该产品为蓝本新建, 周次由出厂日派生。
    fn fold_into_order(&self, product: &Product) -> EngineResult<()> {
        let entry = OrderProduct {
            product_id: product.product_id.clone(),
            quantity: product.quantity,
            completed: false,
        };

        match self.order_repo.find_by_sr_no(&product.sr_no)? {
            Some(mut order) => {
                order.products.push(entry);
                order.completed = false;
                self.order_repo.update(&order)?;
            }
            None => {
                let mut order = Order::new(
                    &product.sr_no,
                    &product.buyer,
                    &product.buyer_po,
                    product.ex_factory_date,
                );
                order.products.push(entry);
                self.order_repo.insert(&order)?;
            }
        }
        Ok(())
    }
}
