// ==========================================
// 制衣生产跟踪系统 - 表格解析器
// ==========================================
// 列名约定 (与导入模板一致):
//   Image / SR NO. / BUYER / BUYER PO / COLOUR /
//   EX-FECT / ARTICLE / SIZE / QTY / PROCESSES
// 日期归一: Excel 序列数按 1899-12-30 纪元折算;
//           字符串尝试常见书写格式
// ==========================================

use crate::domain::import::RawProductRecord;
use crate::importer::error::ImportError;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// 导入模板列名
const COL_IMAGE: &str = "Image";
const COL_SR_NO: &str = "SR NO.";
const COL_BUYER: &str = "BUYER";
const COL_BUYER_PO: &str = "BUYER PO";
const COL_COLOR: &str = "COLOUR";
const COL_EX_FACTORY: &str = "EX-FECT";
const COL_STYLE: &str = "ARTICLE";
const COL_SIZE: &str = "SIZE";
const COL_QTY: &str = "QTY";
const COL_PROCESSES: &str = "PROCESSES";

/// 解析表格文件为原始候选产品行
///
/// 按扩展名分派 Excel/CSV; 空白单元格归空串/零。
pub fn parse_file(file_path: &Path) -> Result<Vec<RawProductRecord>, ImportError> {
    if !file_path.exists() {
        return Err(ImportError::FileNotFound(
            file_path.display().to_string(),
        ));
    }

    let ext = file_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xls" => parse_excel(file_path),
        "csv" => parse_csv(file_path),
        other => Err(ImportError::UnsupportedFormat(other.to_string())),
    }
}

// ==========================================
// Excel 解析 (calamine)
// ==========================================
fn parse_excel(file_path: &Path) -> Result<Vec<RawProductRecord>, ImportError> {
    let mut workbook =
        open_workbook_auto(file_path).map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(ImportError::ExcelParseError("Excel 文件无工作表".to_string()));
    }

    // 逐工作表解析, 所有 sheet 的行拼为一个批次
    let mut records = Vec::new();
    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row.iter().map(|c| cell_to_string(c)).collect(),
            None => continue,
        };

        for row in rows {
            let mut cells: HashMap<&str, &Data> = HashMap::new();
            for (idx, cell) in row.iter().enumerate() {
                if let Some(header) = headers.get(idx) {
                    cells.insert(header.as_str(), cell);
                }
            }

            let record = row_to_record(&cells);
            if is_blank_record(&record) {
                continue;
            }
            records.push(record);
        }
    }

    Ok(records)
}

fn row_to_record(cells: &HashMap<&str, &Data>) -> RawProductRecord {
    let text = |col: &str| -> String {
        cells.get(col).map(|c| cell_to_string(c)).unwrap_or_default()
    };

    let image = {
        let s = text(COL_IMAGE);
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    };

    let ex_factory_date = cells.get(COL_EX_FACTORY).and_then(|c| parse_date_cell(c));

    let quantity = cells
        .get(COL_QTY)
        .and_then(|c| cell_to_quantity(c))
        .unwrap_or(0);

    let processes = split_processes(&text(COL_PROCESSES));

    RawProductRecord {
        image,
        sr_no: text(COL_SR_NO),
        buyer: text(COL_BUYER),
        buyer_po: text(COL_BUYER_PO),
        color: text(COL_COLOR),
        ex_factory_date,
        style_name: text(COL_STYLE),
        size: text(COL_SIZE),
        quantity,
        processes,
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // 整数值去掉小数点尾巴 (如 SR NO. 列为数字)
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn cell_to_quantity(cell: &Data) -> Option<i64> {
    match cell {
        Data::Int(i) => Some(*i),
        Data::Float(f) => Some(*f as i64),
        Data::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn parse_date_cell(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::Int(i) => excel_serial_to_date(*i as f64),
        Data::Float(f) => excel_serial_to_date(*f),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()),
        Data::DateTimeIso(s) => parse_date_str(s),
        Data::String(s) => parse_date_str(s),
        _ => None,
    }
}

/// Excel 序列日期 → 日历日 (纪元 1899-12-30)
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if serial <= 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    Some(epoch + Duration::days(serial as i64))
}

/// 字符串日期归一: 依次尝试常见书写格式
fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    // ISO 带时间的取日期部分
    let date_part = s.split(['T', ' ']).next().unwrap_or(s);
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, fmt) {
            return Some(date);
        }
    }
    None
}

fn split_processes(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// 全字段空白的行直接跳过
fn is_blank_record(record: &RawProductRecord) -> bool {
    record.sr_no.is_empty()
        && record.buyer.is_empty()
        && record.style_name.is_empty()
        && record.size.is_empty()
        && record.quantity == 0
}

// ==========================================
// CSV 解析
// ==========================================
fn parse_csv(file_path: &Path) -> Result<Vec<RawProductRecord>, ImportError> {
    let file = File::open(file_path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let mut cells: HashMap<&str, String> = HashMap::new();
        for (idx, value) in row.iter().enumerate() {
            if let Some(header) = headers.get(idx) {
                cells.insert(header.as_str(), value.trim().to_string());
            }
        }

        let text = |col: &str| -> String { cells.get(col).cloned().unwrap_or_default() };

        let image = {
            let s = text(COL_IMAGE);
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        };

        let quantity = text(COL_QTY).parse::<i64>().unwrap_or(0);

        let record = RawProductRecord {
            image,
            sr_no: text(COL_SR_NO),
            buyer: text(COL_BUYER),
            buyer_po: text(COL_BUYER_PO),
            color: text(COL_COLOR),
            ex_factory_date: parse_date_str(&text(COL_EX_FACTORY)),
            style_name: text(COL_STYLE),
            size: text(COL_SIZE),
            quantity,
            processes: split_processes(&text(COL_PROCESSES)),
        };

        if is_blank_record(&record) {
            continue;
        }
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_excel_serial_epoch() {
        // Excel 序列 1 = 1899-12-31, 45000 = 2023-03-15
        assert_eq!(
            excel_serial_to_date(1.0),
            NaiveDate::from_ymd_opt(1899, 12, 31)
        );
        assert_eq!(
            excel_serial_to_date(45000.0),
            NaiveDate::from_ymd_opt(2023, 3, 15)
        );
        assert_eq!(excel_serial_to_date(0.0), None);
    }

    #[test]
    fn test_parse_date_str_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 2, 7);
        assert_eq!(parse_date_str("2025-02-07"), expected);
        assert_eq!(parse_date_str("02/07/2025"), expected);
        assert_eq!(parse_date_str("07-02-2025"), expected);
        assert_eq!(parse_date_str("2025-02-07T00:00:00"), expected);
        assert_eq!(parse_date_str("not a date"), None);
        assert_eq!(parse_date_str(""), None);
    }

    #[test]
    fn test_split_processes() {
        assert_eq!(
            split_processes("Cut, Sew ,Pack"),
            vec!["Cut".to_string(), "Sew".to_string(), "Pack".to_string()]
        );
        assert!(split_processes("  ").is_empty());
    }

    #[test]
    fn test_parse_csv_blank_cells_and_rows() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "SR NO.,BUYER,BUYER PO,COLOUR,EX-FECT,ARTICLE,SIZE,QTY,PROCESSES"
        )
        .unwrap();
        writeln!(file, "SR-1,ACME,PO-9,Blue,2025-02-07,ABC,M,100,\"Cut,Sew\"").unwrap();
        // 空白数量记 0, 缺日期记 None
        writeln!(file, "SR-2, ACME ,,Red,,ABC,L,,").unwrap();
        writeln!(file, ",,,,,,,,").unwrap(); // 全空行跳过
        file.flush().unwrap();

        let records = parse_file(file.path()).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].sr_no, "SR-1");
        assert_eq!(
            records[0].ex_factory_date,
            NaiveDate::from_ymd_opt(2025, 2, 7)
        );
        assert_eq!(records[0].quantity, 100);
        assert_eq!(records[0].processes, vec!["Cut", "Sew"]);

        assert_eq!(records[1].buyer, "ACME"); // 去首尾空白
        assert_eq!(records[1].buyer_po, "");
        assert_eq!(records[1].ex_factory_date, None);
        assert_eq!(records[1].quantity, 0);
        assert!(records[1].processes.is_empty());
    }

    #[test]
    fn test_unsupported_format() {
        let file = Builder::new().suffix(".pdf").tempfile().unwrap();
        let err = parse_file(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_file(Path::new("/nonexistent/orders.xlsx")).unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }
}
