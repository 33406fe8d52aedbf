// ==========================================
// 制衣生产跟踪系统 - 待定款式暂存仓储
// ==========================================
// 集合: pending_imports (batch_id 作用域)
// 取代进程级单例暂存区: 并发导入互不干扰,
// 解析步骤凭 batch_id 取回本批次的暂存行
// ==========================================

use crate::domain::import::{PendingProduct, RawProductRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// 待定款式暂存仓储
pub struct PendingImportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PendingImportRepository {
    /// 从共享连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 暂存一条款式未知的导入行
    pub fn stage(&self, batch_id: &str, record: &RawProductRecord) -> RepositoryResult<String> {
        let pending_id = Uuid::new_v4().to_string();
        let conn = self.get_conn()?;
        let product_json = serde_json::to_string(record)?;
        conn.execute(
            r#"
            INSERT INTO pending_imports (pending_id, batch_id, style_name, product_json)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![pending_id, batch_id, record.style_name, product_json],
        )?;
        Ok(pending_id)
    }

    /// 取回批次内全部暂存行
    pub fn list_by_batch(&self, batch_id: &str) -> RepositoryResult<Vec<PendingProduct>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT pending_id, batch_id, style_name, product_json
            FROM pending_imports
            WHERE batch_id = ?1
            ORDER BY created_at, pending_id
            "#,
        )?;

        let rows = stmt
            .query_map(params![batch_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut pending = Vec::with_capacity(rows.len());
        for (pending_id, batch_id, style_name, product_json) in rows {
            let record: RawProductRecord = serde_json::from_str(&product_json)?;
            pending.push(PendingProduct {
                pending_id,
                batch_id,
                style_name,
                record,
            });
        }
        Ok(pending)
    }

    /// 删除单条暂存行 (对应产品完成建档后)
    pub fn remove(&self, pending_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "DELETE FROM pending_imports WHERE pending_id = ?1",
            params![pending_id],
        )?;
        Ok(())
    }

    /// 批次内仍在等待的未知款名 (去重)
    pub fn distinct_styles(&self, batch_id: &str) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT style_name FROM pending_imports
            WHERE batch_id = ?1
            ORDER BY style_name
            "#,
        )?;
        let styles = stmt
            .query_map(params![batch_id], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(styles)
    }
}
