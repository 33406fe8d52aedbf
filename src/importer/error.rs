// ==========================================
// 制衣生产跟踪系统 - 导入层错误类型
// ==========================================

use thiserror::Error;

/// 表格解析错误
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("不支持的文件格式: {0}")]
    UnsupportedFormat(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(#[from] csv::Error),

    #[error("文件读取失败: {0}")]
    IoError(#[from] std::io::Error),
}
