// ==========================================
// 制衣生产跟踪系统 - 款式领域模型
// ==========================================
// 款式 = 款名 + 有序工序模板列表
// 不变式: sequence_index 在款式内唯一且连续 (1..N)
// ==========================================

use crate::domain::product::Process;
use serde::{Deserialize, Serialize};

// ==========================================
// Style - 款式
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub style_name: String,      // 款名 (唯一键)
    pub processes: Vec<Process>, // 有序工序模板
}

impl Style {
    /// 由有序工序名列表构建款式，sequence_index 按提交顺序取 1..N
    ///
    /// 每次提交整体替换，不做增量合并。
    pub fn from_process_names<S: AsRef<str>>(style_name: &str, process_names: &[S]) -> Style {
        let processes = process_names
            .iter()
            .enumerate()
            .map(|(idx, name)| Process {
                process_name: name.as_ref().trim().to_string(),
                sequence_index: (idx + 1) as i32,
            })
            .collect();

        Style {
            style_name: style_name.trim().to_string(),
            processes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_index_contiguous() {
        let style = Style::from_process_names("ABC", &["Cut", " Sew ", "Pack"]);
        let indexes: Vec<i32> = style.processes.iter().map(|p| p.sequence_index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
        assert_eq!(style.processes[1].process_name, "Sew");
    }

    #[test]
    fn test_full_replace_semantics() {
        // 重复提交以新列表为准
        let style = Style::from_process_names("ABC", &["Cut", "Sew", "Pack", "Ship"]);
        let replaced = Style::from_process_names("ABC", &["Cut", "Pack"]);
        assert_eq!(style.processes.len(), 4);
        assert_eq!(replaced.processes.len(), 2);
        assert_eq!(replaced.processes[1].sequence_index, 2);
    }
}
