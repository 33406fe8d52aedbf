// ==========================================
// 制衣生产跟踪系统 - 产品领域模型
// ==========================================
// 产品 = 订单内一条款式/尺码/颜色行项
// 工序实例在建档时从款式模板拷贝,不回指款式 (非活引用)
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Process - 工序模板 (款式内)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    pub process_name: String, // 工序名
    pub sequence_index: i32,  // 序号 (1..N, 款式内连续)
}

// ==========================================
// ProductionEntry - 单日产量条目
// ==========================================
// 不变式: 同一工序实例内每个日历日至多一条 (重复录入为覆盖)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionEntry {
    pub date: NaiveDate, // 生产日期
    pub quantity: i64,   // 当日产量
}

// ==========================================
// ProcessInstance - 工序实例 (嵌入产品)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInstance {
    pub process_id: String,             // 实例ID
    pub process_name: String,           // 工序名
    pub sequence_index: i32,            // 序号 (拷贝自款式模板)
    pub entries: Vec<ProductionEntry>,  // 日产量台账
    pub completed: bool,                // 完成标志 (total_production >= 产品需求量)
    pub start_date: Option<NaiveDate>,  // 排期开工日
    pub end_date: Option<NaiveDate>,    // 排期完工日
    pub total_production: i64,          // 累计产量 (= entries.quantity 之和)
    pub production_per_day_per_machine: Option<f64>, // 每台机每日产能 (null = 缺口)
}

impl ProcessInstance {
    /// 从款式工序模板生成全新实例: 空台账、零累计、未完成、未排期
    pub fn from_template(template: &Process, rate: Option<f64>) -> ProcessInstance {
        ProcessInstance {
            process_id: Uuid::new_v4().to_string(),
            process_name: template.process_name.clone(),
            sequence_index: template.sequence_index,
            entries: Vec::new(),
            completed: false,
            start_date: None,
            end_date: None,
            total_production: 0,
            production_per_day_per_machine: rate,
        }
    }

    /// 以累计产量对照需求量重算 total_production 与 completed
    ///
    /// 每次条目变更后必须调用，保持不变式成立。
    pub fn recompute(&mut self, required_quantity: i64) {
        self.total_production = self.entries.iter().map(|e| e.quantity).sum();
        self.completed = self.total_production >= required_quantity;
    }

    /// 录入单日产量: 同日覆盖,异日追加
    pub fn upsert_entry(&mut self, date: NaiveDate, quantity: i64) {
        match self.entries.iter_mut().find(|e| e.date == date) {
            Some(entry) => entry.quantity = quantity,
            None => self.entries.push(ProductionEntry { date, quantity }),
        }
    }
}

// ==========================================
// Product - 产品
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,                 // 产品ID
    pub image: Option<String>,              // 图片 (导入表可选列)
    pub sr_no: String,                      // 订单序号 (与订单共享键)
    pub buyer: String,                      // 买家
    pub buyer_po: String,                   // 买家PO
    pub color: String,                      // 颜色
    pub ex_factory_date: Option<NaiveDate>, // 出厂日 (排期硬性前提)
    pub style_name: String,                 // 款名
    pub size: String,                       // 尺码
    pub quantity: i64,                      // 需求量
    pub completed: bool,                    // 完成标志 (派生)
    pub processes: Vec<ProcessInstance>,    // 有序工序实例
}

impl Product {
    /// 按实例ID查找工序（可变）
    pub fn find_process_mut(&mut self, process_id: &str) -> Option<&mut ProcessInstance> {
        self.processes.iter_mut().find(|p| p.process_id == process_id)
    }

    /// 全部工序均已完成?
    pub fn all_processes_completed(&self) -> bool {
        !self.processes.is_empty() && self.processes.iter().all(|p| p.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_upsert_entry_overwrites_same_date() {
        let template = Process {
            process_name: "Sew".to_string(),
            sequence_index: 2,
        };
        let mut inst = ProcessInstance::from_template(&template, None);

        inst.upsert_entry(day(5), 40);
        inst.recompute(100);
        assert_eq!(inst.total_production, 40);

        // 同日重复录入 → 覆盖而非累加
        inst.upsert_entry(day(5), 60);
        inst.recompute(100);
        assert_eq!(inst.entries.len(), 1);
        assert_eq!(inst.total_production, 60);
        assert!(!inst.completed);

        inst.upsert_entry(day(6), 40);
        inst.recompute(100);
        assert_eq!(inst.total_production, 100);
        assert!(inst.completed);
    }

    #[test]
    fn test_all_processes_completed_requires_nonempty() {
        let product = Product {
            product_id: "p1".to_string(),
            image: None,
            sr_no: "SR-1".to_string(),
            buyer: "ACME".to_string(),
            buyer_po: "".to_string(),
            color: "Blue".to_string(),
            ex_factory_date: None,
            style_name: "ABC".to_string(),
            size: "M".to_string(),
            quantity: 100,
            completed: false,
            processes: Vec::new(),
        };
        assert!(!product.all_processes_completed());
    }
}
