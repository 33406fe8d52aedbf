// ==========================================
// 制衣生产跟踪系统 - 款式 API
// ==========================================
// 覆盖: 款式工序提交 (整体替换 + 存量产品重建) / 款式查询
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::style::Style;
use crate::engine::{ImportWorkflow, StyleRebuildReport};
use crate::repository::StyleRepository;
use chrono::NaiveDate;
use std::sync::Arc;

/// 款式 API
pub struct StyleApi {
    style_repo: Arc<StyleRepository>,
    workflow: Arc<ImportWorkflow>,
}

impl StyleApi {
    pub fn new(style_repo: Arc<StyleRepository>, workflow: Arc<ImportWorkflow>) -> Self {
        Self {
            style_repo,
            workflow,
        }
    }

    /// 提交款式工序并重建该款全部已建档产品
    ///
    /// 工序列表整体替换 (sequence_index 重排 1..N),
    /// 产品工序实例重新生成并重新排期。
    pub async fn submit_processes(
        &self,
        style_name: &str,
        process_names: &[String],
        import_date: NaiveDate,
    ) -> ApiResult<StyleRebuildReport> {
        if style_name.trim().is_empty() || process_names.is_empty() {
            return Err(ApiError::InvalidInput("款名或工序列表缺失".to_string()));
        }
        let report = self
            .workflow
            .submit_style_processes(style_name, process_names, import_date)
            .await?;
        Ok(report)
    }

    /// 按款名查询
    pub fn get_style(&self, style_name: &str) -> ApiResult<Style> {
        self.style_repo
            .find_by_name(style_name)?
            .ok_or_else(|| ApiError::NotFound(format!("Style(name={})不存在", style_name)))
    }

    /// 列出全部款式
    pub fn list_styles(&self) -> ApiResult<Vec<Style>> {
        Ok(self.style_repo.list_all()?)
    }
}
