// ==========================================
// 制衣生产跟踪系统 - 产能表领域模型
// ==========================================
// (工序名, 尺码) → 每台机每日产量
// null 产能 = 已知缺口 (登记过但尚未测定)
// 不变式: 同一工序内每个尺码至多一条
// ==========================================

use crate::domain::types::RateLookup;
use serde::{Deserialize, Serialize};

// ==========================================
// SizeRate - 单尺码产能
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeRate {
    pub size: String,                                // 尺码
    pub production_per_day_per_machine: Option<f64>, // 产能 (None = 缺口)
}

// ==========================================
// ProductionRate - 工序产能表
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRate {
    pub process_name: String, // 工序名 (唯一键)
    pub sizes: Vec<SizeRate>, // 尺码产能列表
}

impl ProductionRate {
    pub fn new(process_name: &str) -> ProductionRate {
        ProductionRate {
            process_name: process_name.trim().to_string(),
            sizes: Vec::new(),
        }
    }

    /// 查询尺码产能三态
    pub fn lookup(&self, size: &str) -> RateLookup {
        match self.sizes.iter().find(|s| s.size == size) {
            None => RateLookup::Missing,
            Some(entry) => match entry.production_per_day_per_machine {
                None => RateLookup::Unmeasured,
                Some(v) => RateLookup::Measured(v),
            },
        }
    }

    /// 幂等登记缺口: 尺码不存在时补一条 null 产能
    ///
    /// 返回是否实际新增。
    pub fn record_gap(&mut self, size: &str) -> bool {
        if self.sizes.iter().any(|s| s.size == size) {
            return false;
        }
        self.sizes.push(SizeRate {
            size: size.to_string(),
            production_per_day_per_machine: None,
        });
        true
    }

    /// 登记测定产能: 已有条目更新,否则新增
    pub fn set_rate(&mut self, size: &str, value: f64) {
        match self.sizes.iter_mut().find(|s| s.size == size) {
            Some(entry) => entry.production_per_day_per_machine = Some(value),
            None => self.sizes.push(SizeRate {
                size: size.to_string(),
                production_per_day_per_machine: Some(value),
            }),
        }
    }
}
