// ==========================================
// 制衣生产跟踪系统 - 配置层
// ==========================================
// 职责: 数据库路径等进程级配置
// 优先级: 环境变量 > 用户数据目录默认值
// ==========================================

use std::path::PathBuf;

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 数据库文件路径
    pub db_path: String,
}

impl AppConfig {
    /// 从环境变量装配配置
    pub fn from_env() -> AppConfig {
        AppConfig {
            db_path: default_db_path(),
        }
    }
}

/// 解析默认数据库路径
///
/// # 环境变量
/// - GARMENT_APS_DB: 显式指定 DB 路径（便于调试/测试/CI）
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var("GARMENT_APS_DB") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 先给一个默认回退值，拿得到用户数据目录时再覆盖
    let mut path = PathBuf::from("./garment_aps.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("garment-aps");
        std::fs::create_dir_all(&dir).ok();
        path = dir.join("garment_aps.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_db_path_not_empty() {
        let path = default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }
}
