// ==========================================
// 制衣生产跟踪系统 - 订单领域模型
// ==========================================
// 订单按 sr_no 聚合产品; products 列表持有产品完成标志的
// 反规范化副本,产品侧变更需显式双边更新 (见完成度引擎)
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// OrderProduct - 订单内产品引用
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProduct {
    pub product_id: String, // 产品ID引用
    pub quantity: i64,      // 需求量快照
    pub completed: bool,    // 完成标志 (反规范化副本)
}

// ==========================================
// Order - 订单
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,                   // 订单ID
    pub sr_no: String,                      // 订单序号 (唯一键)
    pub buyer: String,                      // 买家
    pub buyer_po: String,                   // 买家PO
    pub ex_factory_date: Option<NaiveDate>, // 出厂日
    pub week: Option<u32>,                  // 周次 (由出厂日派生)
    pub completed: bool,                    // 完成标志 (按需重算,非触发器维护)
    pub products: Vec<OrderProduct>,        // 产品列表
}

impl Order {
    /// 以首个产品为蓝本新建订单
    pub fn new(
        sr_no: &str,
        buyer: &str,
        buyer_po: &str,
        ex_factory_date: Option<NaiveDate>,
    ) -> Order {
        Order {
            order_id: Uuid::new_v4().to_string(),
            sr_no: sr_no.to_string(),
            buyer: buyer.to_string(),
            buyer_po: buyer_po.to_string(),
            ex_factory_date,
            week: ex_factory_date.map(week_number),
            completed: false,
            products: Vec::new(),
        }
    }

    /// 全部产品条目均已完成? (空列表视为未完成)
    pub fn all_products_completed(&self) -> bool {
        !self.products.is_empty() && self.products.iter().all(|p| p.completed)
    }
}

/// 由日期派生周次 (ISO 周)
pub fn week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_number_from_ex_factory_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let order = Order::new("SR-1", "ACME", "PO-9", Some(date));
        assert_eq!(order.week, Some(2));
        assert!(!order.completed);
    }

    #[test]
    fn test_all_products_completed() {
        let mut order = Order::new("SR-1", "ACME", "", None);
        assert!(!order.all_products_completed());

        order.products.push(OrderProduct {
            product_id: "p1".to_string(),
            quantity: 100,
            completed: true,
        });
        order.products.push(OrderProduct {
            product_id: "p2".to_string(),
            quantity: 50,
            completed: false,
        });
        assert!(!order.all_products_completed());

        order.products[1].completed = true;
        assert!(order.all_products_completed());
    }
}
