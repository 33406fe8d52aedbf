// ==========================================
// 制衣生产跟踪系统 - 产品仓储
// ==========================================
// 集合: products (标量键列 + 工序实例 JSON 文档列)
// 每次写入为整文档覆盖 (单文档内 all-or-nothing)
// ==========================================

use crate::domain::product::{ProcessInstance, Product};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = "product_id, image, sr_no, buyer, buyer_po, color, \
     ex_factory_date, style_name, size, quantity, completed, processes_json";

/// 产品仓储
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 从共享连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn row_to_product(row: &Row<'_>) -> rusqlite::Result<(Product, String)> {
        let processes_json: String = row.get(11)?;
        let product = Product {
            product_id: row.get(0)?,
            image: row.get(1)?,
            sr_no: row.get(2)?,
            buyer: row.get(3)?,
            buyer_po: row.get(4)?,
            color: row.get(5)?,
            ex_factory_date: row.get(6)?,
            style_name: row.get(7)?,
            size: row.get(8)?,
            quantity: row.get(9)?,
            completed: row.get::<_, i64>(10)? != 0,
            processes: Vec::new(),
        };
        Ok((product, processes_json))
    }

    fn decode(pair: (Product, String)) -> RepositoryResult<Product> {
        let (mut product, processes_json) = pair;
        let processes: Vec<ProcessInstance> = serde_json::from_str(&processes_json)?;
        product.processes = processes;
        Ok(product)
    }

    /// 插入新产品
    pub fn insert(&self, product: &Product) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let processes_json = serde_json::to_string(&product.processes)?;
        conn.execute(
            r#"
            INSERT INTO products (
                product_id, image, sr_no, buyer, buyer_po, color,
                ex_factory_date, style_name, size, quantity, completed, processes_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                product.product_id,
                product.image,
                product.sr_no,
                product.buyer,
                product.buyer_po,
                product.color,
                product.ex_factory_date,
                product.style_name,
                product.size,
                product.quantity,
                product.completed as i64,
                processes_json,
            ],
        )?;
        Ok(())
    }

    /// 整文档覆盖更新 (单条 UPDATE, 文档内原子)
    pub fn update(&self, product: &Product) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let processes_json = serde_json::to_string(&product.processes)?;
        let affected = conn.execute(
            r#"
            UPDATE products SET
                image = ?2, sr_no = ?3, buyer = ?4, buyer_po = ?5, color = ?6,
                ex_factory_date = ?7, style_name = ?8, size = ?9, quantity = ?10,
                completed = ?11, processes_json = ?12
            WHERE product_id = ?1
            "#,
            params![
                product.product_id,
                product.image,
                product.sr_no,
                product.buyer,
                product.buyer_po,
                product.color,
                product.ex_factory_date,
                product.style_name,
                product.size,
                product.quantity,
                product.completed as i64,
                processes_json,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Product".to_string(),
                id: product.product_id.clone(),
            });
        }
        Ok(())
    }

    /// 按ID查询产品
    pub fn find_by_id(&self, product_id: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {SELECT_COLUMNS} FROM products WHERE product_id = ?1");
        let pair = conn
            .query_row(&sql, params![product_id], Self::row_to_product)
            .optional()?;

        pair.map(Self::decode).transpose()
    }

    /// 按ID集合查询产品
    pub fn find_by_ids(&self, product_ids: &[String]) -> RepositoryResult<Vec<Product>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let placeholders = (1..=product_ids.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql =
            format!("SELECT {SELECT_COLUMNS} FROM products WHERE product_id IN ({placeholders})");

        let mut stmt = conn.prepare(&sql)?;
        let pairs = stmt
            .query_map(rusqlite::params_from_iter(product_ids), Self::row_to_product)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        pairs.into_iter().map(Self::decode).collect()
    }

    /// 按款名查询产品列表
    pub fn find_by_style(&self, style_name: &str) -> RepositoryResult<Vec<Product>> {
        self.find_filtered("style_name = ?1", params![style_name])
    }

    /// 按尺码查询产品列表 (产能回填的扇出目标集)
    pub fn find_by_size(&self, size: &str) -> RepositoryResult<Vec<Product>> {
        self.find_filtered("size = ?1", params![size])
    }

    /// 列出全部产品
    pub fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        self.find_filtered("1 = 1", [])
    }

    fn find_filtered<P: rusqlite::Params>(
        &self,
        where_clause: &str,
        params: P,
    ) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {SELECT_COLUMNS} FROM products WHERE {where_clause}");
        let mut stmt = conn.prepare(&sql)?;
        let pairs = stmt
            .query_map(params, Self::row_to_product)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        pairs.into_iter().map(Self::decode).collect()
    }
}
