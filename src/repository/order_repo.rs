// ==========================================
// 制衣生产跟踪系统 - 订单仓储
// ==========================================
// 集合: orders (sr_no 唯一 + 产品引用列表 JSON 文档列)
// 嵌套数组元素匹配 (含某产品ID的订单) 走 json_each
// ==========================================

use crate::domain::order::{Order, OrderProduct};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str =
    "order_id, sr_no, buyer, buyer_po, ex_factory_date, week, completed, products_json";

/// 订单仓储
pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
    /// 从共享连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn row_to_order(row: &Row<'_>) -> rusqlite::Result<(Order, String)> {
        let products_json: String = row.get(7)?;
        let order = Order {
            order_id: row.get(0)?,
            sr_no: row.get(1)?,
            buyer: row.get(2)?,
            buyer_po: row.get(3)?,
            ex_factory_date: row.get(4)?,
            week: row.get::<_, Option<i64>>(5)?.map(|w| w as u32),
            completed: row.get::<_, i64>(6)? != 0,
            products: Vec::new(),
        };
        Ok((order, products_json))
    }

    fn decode(pair: (Order, String)) -> RepositoryResult<Order> {
        let (mut order, products_json) = pair;
        let products: Vec<OrderProduct> = serde_json::from_str(&products_json)?;
        order.products = products;
        Ok(order)
    }

    /// 插入新订单
    pub fn insert(&self, order: &Order) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let products_json = serde_json::to_string(&order.products)?;
        conn.execute(
            r#"
            INSERT INTO orders (
                order_id, sr_no, buyer, buyer_po, ex_factory_date, week,
                completed, products_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                order.order_id,
                order.sr_no,
                order.buyer,
                order.buyer_po,
                order.ex_factory_date,
                order.week.map(|w| w as i64),
                order.completed as i64,
                products_json,
            ],
        )?;
        Ok(())
    }

    /// 整文档覆盖更新
    pub fn update(&self, order: &Order) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let products_json = serde_json::to_string(&order.products)?;
        let affected = conn.execute(
            r#"
            UPDATE orders SET
                sr_no = ?2, buyer = ?3, buyer_po = ?4, ex_factory_date = ?5,
                week = ?6, completed = ?7, products_json = ?8
            WHERE order_id = ?1
            "#,
            params![
                order.order_id,
                order.sr_no,
                order.buyer,
                order.buyer_po,
                order.ex_factory_date,
                order.week.map(|w| w as i64),
                order.completed as i64,
                products_json,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Order".to_string(),
                id: order.order_id.clone(),
            });
        }
        Ok(())
    }

    /// 按订单序号查询
    pub fn find_by_sr_no(&self, sr_no: &str) -> RepositoryResult<Option<Order>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {SELECT_COLUMNS} FROM orders WHERE sr_no = ?1");
        let pair = conn
            .query_row(&sql, params![sr_no], Self::row_to_order)
            .optional()?;
        pair.map(Self::decode).transpose()
    }

    /// 查找产品列表中含指定产品ID的订单
    ///
    /// 等价于文档库的嵌套数组元素匹配 ("products.productId")。
    pub fn find_containing_product(&self, product_id: &str) -> RepositoryResult<Option<Order>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM orders
            WHERE EXISTS (
                SELECT 1 FROM json_each(orders.products_json) je
                WHERE json_extract(je.value, '$.product_id') = ?1
            )
            LIMIT 1
            "#
        );
        let pair = conn
            .query_row(&sql, params![product_id], Self::row_to_order)
            .optional()?;
        pair.map(Self::decode).transpose()
    }

    /// 列出全部订单
    pub fn list_all(&self) -> RepositoryResult<Vec<Order>> {
        self.list_ordered("order_id")
    }

    /// 按出厂日升序列出订单
    pub fn list_sorted_by_ex_factory(&self) -> RepositoryResult<Vec<Order>> {
        self.list_ordered("ex_factory_date")
    }

    fn list_ordered(&self, order_by: &str) -> RepositoryResult<Vec<Order>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {SELECT_COLUMNS} FROM orders ORDER BY {order_by}");
        let mut stmt = conn.prepare(&sql)?;
        let pairs = stmt
            .query_map([], Self::row_to_order)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        pairs.into_iter().map(Self::decode).collect()
    }
}
