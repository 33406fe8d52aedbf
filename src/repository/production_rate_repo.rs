// ==========================================
// 制衣生产跟踪系统 - 产能表仓储
// ==========================================
// 集合: production_rates (process_name → 尺码产能列表 JSON)
// ==========================================

use crate::domain::production::{ProductionRate, SizeRate};
use crate::domain::types::RateLookup;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

/// 产能表仓储
pub struct ProductionRateRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionRateRepository {
    /// 从共享连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按工序名查询产能文档
    pub fn find_by_process(&self, process_name: &str) -> RepositoryResult<Option<ProductionRate>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                "SELECT process_name, sizes_json FROM production_rates WHERE process_name = ?1",
                params![process_name],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((process_name, sizes_json)) => {
                let sizes: Vec<SizeRate> = serde_json::from_str(&sizes_json)?;
                Ok(Some(ProductionRate {
                    process_name,
                    sizes,
                }))
            }
            None => Ok(None),
        }
    }

    /// upsert 产能文档 (尺码列表整体覆盖)
    pub fn upsert(&self, rate: &ProductionRate) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let sizes_json = serde_json::to_string(&rate.sizes)?;
        conn.execute(
            r#"
            INSERT INTO production_rates (process_name, sizes_json, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(process_name)
            DO UPDATE SET sizes_json = excluded.sizes_json,
                          updated_at = excluded.updated_at
            "#,
            params![rate.process_name, sizes_json],
        )?;
        Ok(())
    }

    /// 查询 (工序, 尺码) 产能三态
    ///
    /// # 返回
    /// - Missing: 组合从未出现
    /// - Unmeasured: 登记过缺口, 尚未测定
    /// - Measured(v): 已测定
    pub fn get_rate(&self, process_name: &str, size: &str) -> RepositoryResult<RateLookup> {
        match self.find_by_process(process_name)? {
            None => Ok(RateLookup::Missing),
            Some(doc) => Ok(doc.lookup(size)),
        }
    }

    /// 幂等登记缺口: 确保 (工序, 尺码) 存在一条 null 产能记录
    pub fn record_gap(&self, process_name: &str, size: &str) -> RepositoryResult<()> {
        let mut doc = self
            .find_by_process(process_name)?
            .unwrap_or_else(|| ProductionRate::new(process_name));
        if doc.record_gap(size) {
            self.upsert(&doc)?;
        }
        Ok(())
    }

    /// 登记测定产能 (upsert)
    ///
    /// 注意: 跨产品的存量回填由完成度引擎的 apply_measured_rate
    /// 负责, 本方法只写产能集合。
    pub fn set_rate(&self, process_name: &str, size: &str, value: f64) -> RepositoryResult<()> {
        let mut doc = self
            .find_by_process(process_name)?
            .unwrap_or_else(|| ProductionRate::new(process_name));
        doc.set_rate(size, value);
        self.upsert(&doc)
    }

    /// 列出全部产能文档
    pub fn list_all(&self) -> RepositoryResult<Vec<ProductionRate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT process_name, sizes_json FROM production_rates ORDER BY process_name",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut rates = Vec::with_capacity(rows.len());
        for (process_name, sizes_json) in rows {
            let sizes: Vec<SizeRate> = serde_json::from_str(&sizes_json)?;
            rates.push(ProductionRate {
                process_name,
                sizes,
            });
        }
        Ok(rates)
    }
}
