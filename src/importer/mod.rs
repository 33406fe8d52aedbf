// ==========================================
// 制衣生产跟踪系统 - 导入层 (表格解析)
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 产出: 原始候选产品行 (字符串去空白, 日期归一,
//       空白单元格归空串/零而非缺失)
// ==========================================

pub mod error;
pub mod spreadsheet;

pub use error::ImportError;
pub use spreadsheet::parse_file;
