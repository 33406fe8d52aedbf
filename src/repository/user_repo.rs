// ==========================================
// 制衣生产跟踪系统 - 用户仓储
// ==========================================
// 集合: users (鉴权闸口的主体查询)
// ==========================================

use crate::domain::types::UserRole;
use crate::domain::user::User;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// 用户仓储
pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    /// 从共享连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
        let user_type: String = row.get(2)?;
        Ok(User {
            user_id: row.get(0)?,
            username: row.get(1)?,
            user_type: UserRole::parse(&user_type).unwrap_or(UserRole::Staff),
        })
    }

    /// 按ID查询用户
    pub fn find_by_id(&self, user_id: &str) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let user = conn
            .query_row(
                "SELECT user_id, username, user_type FROM users WHERE user_id = ?1",
                params![user_id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// 插入用户 (测试与初始化用)
    pub fn insert(&self, user: &User) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO users (user_id, username, user_type) VALUES (?1, ?2, ?3)",
            params![user.user_id, user.username, user.user_type.as_str()],
        )?;
        Ok(())
    }

    /// 按凭证解析用户ID (闸口第一跳)
    pub fn resolve_token(&self, token: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let user_id = conn
            .query_row(
                "SELECT user_id FROM auth_tokens WHERE token = ?1",
                params![token],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(user_id)
    }

    /// 签发凭证 (测试与初始化用)
    pub fn issue_token(&self, token: &str, user_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO auth_tokens (token, user_id) VALUES (?1, ?2)",
            params![token, user_id],
        )?;
        Ok(())
    }
}
