// ==========================================
// 制衣生产跟踪系统 - 买家名录仓储
// ==========================================
// 集合: buyers (名称唯一, insert-if-absent)
// ==========================================

use crate::domain::buyer::Buyer;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

/// 买家名录仓储
pub struct BuyerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BuyerRepository {
    /// 从共享连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增买家; 已存在时报唯一约束违反
    pub fn insert(&self, name: &str) -> RepositoryResult<Buyer> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::ValidationError(
                "买家名称不能为空".to_string(),
            ));
        }

        let conn = self.get_conn()?;
        conn.execute("INSERT INTO buyers (name) VALUES (?1)", params![name])?;
        Ok(Buyer {
            name: name.to_string(),
        })
    }

    /// 批量 insert-if-absent (导入时去重后的买家集合)
    ///
    /// 大小写敏感, 名称去首尾空白后精确匹配; 空名跳过。
    pub fn bulk_upsert(&self, names: &[String]) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("INSERT OR IGNORE INTO buyers (name) VALUES (?1)")?;
        for name in names {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                continue;
            }
            stmt.execute(params![trimmed])?;
        }
        Ok(())
    }

    /// 列出全部买家
    pub fn list_all(&self) -> RepositoryResult<Vec<Buyer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT name FROM buyers ORDER BY name")?;
        let buyers = stmt
            .query_map([], |row| {
                Ok(Buyer {
                    name: row.get(0)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(buyers)
    }
}
