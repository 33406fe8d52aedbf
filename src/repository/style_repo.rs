// ==========================================
// 制衣生产跟踪系统 - 款式仓储
// ==========================================
// 集合: styles (style_name → 有序工序列表 JSON)
// ==========================================

use crate::domain::product::Process;
use crate::domain::style::Style;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

/// 款式仓储
pub struct StyleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StyleRepository {
    /// 从共享连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按款名查询款式
    ///
    /// # 返回
    /// - Ok(Some(Style)): 找到款式
    /// - Ok(None): 未找到
    pub fn find_by_name(&self, style_name: &str) -> RepositoryResult<Option<Style>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                "SELECT style_name, processes_json FROM styles WHERE style_name = ?1",
                params![style_name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((style_name, processes_json)) => {
                let processes: Vec<Process> = serde_json::from_str(&processes_json)?;
                Ok(Some(Style {
                    style_name,
                    processes,
                }))
            }
            None => Ok(None),
        }
    }

    /// upsert 款式: 工序列表整体覆盖
    pub fn upsert(&self, style: &Style) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let processes_json = serde_json::to_string(&style.processes)?;
        conn.execute(
            r#"
            INSERT INTO styles (style_name, processes_json, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(style_name)
            DO UPDATE SET processes_json = excluded.processes_json,
                          updated_at = excluded.updated_at
            "#,
            params![style.style_name, processes_json],
        )?;
        Ok(())
    }

    /// 列出全部款式
    pub fn list_all(&self) -> RepositoryResult<Vec<Style>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT style_name, processes_json FROM styles ORDER BY style_name")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut styles = Vec::with_capacity(rows.len());
        for (style_name, processes_json) in rows {
            let processes: Vec<Process> = serde_json::from_str(&processes_json)?;
            styles.push(Style {
                style_name,
                processes,
            });
        }
        Ok(styles)
    }
}
