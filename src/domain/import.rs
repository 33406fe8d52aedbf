// ==========================================
// 制衣生产跟踪系统 - 导入领域模型
// ==========================================
// 原始导入行、批次暂存、导入结果报告
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// RawProductRecord - 原始导入行
// ==========================================
// 表格解析后的一行候选产品: 字符串已去首尾空白,
// 出厂日已归一为日期,空白数量记 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProductRecord {
    pub image: Option<String>,
    pub sr_no: String,
    pub buyer: String,
    pub buyer_po: String,
    pub color: String,
    pub ex_factory_date: Option<NaiveDate>,
    pub style_name: String,
    pub size: String,
    pub quantity: i64,
    pub processes: Vec<String>,
}

impl RawProductRecord {
    /// 去除所有字符串字段的首尾空白
    pub fn trim_fields(&mut self) {
        self.sr_no = self.sr_no.trim().to_string();
        self.buyer = self.buyer.trim().to_string();
        self.buyer_po = self.buyer_po.trim().to_string();
        self.color = self.color.trim().to_string();
        self.style_name = self.style_name.trim().to_string();
        self.size = self.size.trim().to_string();
        for p in &mut self.processes {
            *p = p.trim().to_string();
        }
    }
}

// ==========================================
// PendingProduct - 暂存的待定款式产品
// ==========================================
// 款式未知的导入行按批次隔离暂存, 待工序提交后再建档
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingProduct {
    pub pending_id: String,       // 暂存记录ID
    pub batch_id: String,         // 导入批次ID (作用域键)
    pub style_name: String,       // 待定款名
    pub record: RawProductRecord, // 原始行快照
}

// ==========================================
// StyleSubmission - 款式工序提交
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleSubmission {
    pub style_name: String,
    pub process_names: Vec<String>,
}

// ==========================================
// MissingRate - 缺失产能记录
// ==========================================
// 导入时发现 (工序, 尺码) 无产能数据; 登记缺口后随报告返回
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingRate {
    pub process_name: String,
    pub size: String,
}

// ==========================================
// ImportRowError - 单行导入失败
// ==========================================
// 行级校验失败只中止该行, 批次其余行继续处理
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRowError {
    pub sr_no: String,
    pub style_name: String,
    pub reason: String,
}

// ==========================================
// ImportOutcome - 批次导入结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// 批次ID; 存在未知款式时, 解析步骤需回传此ID
    pub batch_id: String,
    /// 已建档产品ID
    pub persisted_products: Vec<String>,
    /// 需要提交工序的未知款名 (去重)
    pub unknown_styles: Vec<String>,
    /// 缺失产能数据清单
    pub missing_production_data: Vec<MissingRate>,
    /// 行级失败清单
    pub errors: Vec<ImportRowError>,
}

impl ImportOutcome {
    pub fn new(batch_id: String) -> ImportOutcome {
        ImportOutcome {
            batch_id,
            persisted_products: Vec::new(),
            unknown_styles: Vec::new(),
            missing_production_data: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// 是否还有未知款式等待工序提交
    pub fn needs_style_resolution(&self) -> bool {
        !self.unknown_styles.is_empty()
    }
}
