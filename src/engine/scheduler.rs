// ==========================================
// 制衣生产跟踪系统 - 工序排期引擎
// ==========================================
// 给定出厂日与导入日, 为产品的有序工序分配起止日期:
// - 完工日: 自出厂日起按序号倒序回推, 每步 -5 天
// - 开工日: 自导入日起按序号正序前推, 每步 +5 天
// 固定 5 天间隔是排期占位策略, 与产能数据无关
// ==========================================

use crate::domain::product::ProcessInstance;
use chrono::{Duration, NaiveDate};
use thiserror::Error;

/// 相邻工序间的固定间隔天数
pub const PROCESS_GAP_DAYS: i64 = 5;

/// 排期错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// 出厂日缺失是该产品排期的硬性错误
    #[error("产品缺少出厂日: sr_no={sr_no}")]
    MissingShipDate { sr_no: String },
}

/// 为一组工序实例分配起止日期
///
/// 在副本上执行两个独立的纯函数遍历 (倒序定完工日, 正序定开工日),
/// 返回按 sequence_index 升序的新列表; 不修改入参。
/// 相同输入重复调用产生相同日期 (幂等)。
pub fn schedule_processes(
    processes: &[ProcessInstance],
    ex_factory_date: Option<NaiveDate>,
    import_date: NaiveDate,
    sr_no: &str,
) -> Result<Vec<ProcessInstance>, ScheduleError> {
    let ex_factory_date = ex_factory_date.ok_or_else(|| ScheduleError::MissingShipDate {
        sr_no: sr_no.to_string(),
    })?;

    let scheduled = assign_end_dates(processes.to_vec(), ex_factory_date);
    let mut scheduled = assign_start_dates(scheduled, import_date);
    scheduled.sort_by_key(|p| p.sequence_index);
    Ok(scheduled)
}

/// 完工日遍历: 按序号倒序, 末道工序落在出厂日, 逐道 -5 天
fn assign_end_dates(
    mut processes: Vec<ProcessInstance>,
    ex_factory_date: NaiveDate,
) -> Vec<ProcessInstance> {
    processes.sort_by_key(|p| std::cmp::Reverse(p.sequence_index));

    let mut cursor = ex_factory_date;
    for process in &mut processes {
        process.end_date = Some(cursor);
        cursor -= Duration::days(PROCESS_GAP_DAYS);
    }
    processes
}

/// 开工日遍历: 按序号正序, 首道工序落在导入日, 逐道 +5 天
fn assign_start_dates(
    mut processes: Vec<ProcessInstance>,
    import_date: NaiveDate,
) -> Vec<ProcessInstance> {
    processes.sort_by_key(|p| p.sequence_index);

    let mut cursor = import_date;
    for process in &mut processes {
        process.start_date = Some(cursor);
        cursor += Duration::days(PROCESS_GAP_DAYS);
    }
    processes
}
