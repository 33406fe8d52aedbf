// ==========================================
// 制衣生产跟踪系统 - 鉴权闸口
// ==========================================
// 职责: bearer 凭证 → 主体 → 管理员角色校验
// 语义对照 HTTP: 缺失/无效凭证 401, 角色不足 403,
//                主体记录消失 404
// 凭证解析为存储查询 (auth_tokens → users), 不在此层
// 约定签发机制
// ==========================================

use crate::domain::types::UserRole;
use crate::domain::user::User;
use crate::repository::error::RepositoryError;
use crate::repository::UserRepository;
use std::sync::Arc;
use thiserror::Error;

/// 鉴权错误
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("未提供凭证")]
    MissingToken,

    #[error("凭证无效")]
    InvalidToken,

    #[error("用户不存在")]
    UserNotFound,

    #[error("无管理员权限")]
    NotAuthorized,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// 对应的 HTTP 状态码 (供传输层映射)
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken => 401,
            AuthError::NotAuthorized => 403,
            AuthError::UserNotFound => 404,
            AuthError::Repository(_) => 500,
        }
    }
}

/// 管理员闸口
pub struct AuthGate {
    user_repo: Arc<UserRepository>,
}

impl AuthGate {
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// 校验 Authorization 头并解析管理员主体
    ///
    /// # 参数
    /// - authorization: "Bearer <token>" 形式的头部原文 (可缺失)
    ///
    /// # 返回
    /// - Ok(User): 已验证的管理员
    /// - Err(AuthError): 按 401/403/404 语义分类的拒绝
    pub async fn verify_admin(&self, authorization: Option<&str>) -> Result<User, AuthError> {
        let token = authorization
            .and_then(|header| header.split_whitespace().nth(1))
            .ok_or(AuthError::MissingToken)?;

        let user_id = self
            .user_repo
            .resolve_token(token)?
            .ok_or(AuthError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(&user_id)?
            .ok_or(AuthError::UserNotFound)?;

        if user.user_type != UserRole::Admin {
            tracing::warn!(username = %user.username, "非管理员请求被拒绝");
            return Err(AuthError::NotAuthorized);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn setup() -> AuthGate {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let repo = Arc::new(UserRepository::from_connection(conn));

        repo.insert(&User {
            user_id: "u1".to_string(),
            username: "planner".to_string(),
            user_type: UserRole::Admin,
        })
        .unwrap();
        repo.insert(&User {
            user_id: "u2".to_string(),
            username: "viewer".to_string(),
            user_type: UserRole::Staff,
        })
        .unwrap();
        repo.issue_token("tok-admin", "u1").unwrap();
        repo.issue_token("tok-staff", "u2").unwrap();
        repo.issue_token("tok-ghost", "u404").unwrap();

        AuthGate::new(repo)
    }

    #[tokio::test]
    async fn test_admin_passes() {
        let gate = setup();
        let user = gate.verify_admin(Some("Bearer tok-admin")).await.unwrap();
        assert_eq!(user.username, "planner");
    }

    #[tokio::test]
    async fn test_rejection_status_codes() {
        let gate = setup();

        let err = gate.verify_admin(None).await.unwrap_err();
        assert_eq!(err.status_code(), 401);

        let err = gate.verify_admin(Some("Bearer nope")).await.unwrap_err();
        assert_eq!(err.status_code(), 401);

        let err = gate.verify_admin(Some("Bearer tok-staff")).await.unwrap_err();
        assert_eq!(err.status_code(), 403);

        // 凭证有效但主体记录已消失
        let err = gate.verify_admin(Some("Bearer tok-ghost")).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
