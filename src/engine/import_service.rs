// ==========================================
// 制衣生产跟踪系统 - 导入服务 Trait
// ==========================================
// 职责: 定义表格导入与款式解析接口 (不包含实现)
// 实现者: ImportWorkflow
// ==========================================

use crate::domain::import::{ImportOutcome, RawProductRecord, StyleSubmission};
use crate::engine::error::EngineResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;

// ==========================================
// ImportService Trait
// ==========================================
// 用途: 产品建档主接口, API 层经由该接口驱动导入
#[async_trait]
pub trait ImportService: Send + Sync {
    /// 从表格文件导入产品数据
    ///
    /// # 参数
    /// - file_path: 表格文件路径 (.xlsx / .xls / .csv)
    /// - import_date: 导入日 (无出厂日时排期的正排锚点)
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 批次ID + 建档产品 + 未知款式 + 缺产能清单 + 行级失败
    /// - Err: 文件解析错误、数据库错误等
    async fn import_file(
        &self,
        file_path: &Path,
        import_date: NaiveDate,
    ) -> EngineResult<ImportOutcome>;

    /// 导入已解析的候选产品行
    ///
    /// # 参数
    /// - records: 原始候选产品行 (传输层自带解析时的入口)
    /// - import_date: 导入日
    async fn import_records(
        &self,
        records: Vec<RawProductRecord>,
        import_date: NaiveDate,
    ) -> EngineResult<ImportOutcome>;

    /// 为未知款式提交工序, 推进指定批次的暂存行
    ///
    /// # 参数
    /// - batch_id: 导入批次ID (import_file/import_records 的返回值携带)
    /// - submissions: 款式 → 有序工序名列表
    /// - import_date: 排期正排锚点 (与导入入口同义)
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 本次推进建档的产品 + 仍未覆盖的款式
    async fn resolve_pending_styles(
        &self,
        batch_id: &str,
        submissions: Vec<StyleSubmission>,
        import_date: NaiveDate,
    ) -> EngineResult<ImportOutcome>;
}
