// ==========================================
// 制衣生产跟踪系统 - 引擎层
// ==========================================
// 职责: 业务规则 (排期 / 产量台账与完成度 / 导入工作流)
// 红线: 所有数据访问经由 Repository
// ==========================================

pub mod completion;
pub mod error;
pub mod import;
pub mod import_service;
pub mod scheduler;

pub use completion::{CompletionEngine, RateBackfillReport};
pub use error::{EngineError, EngineResult};
pub use import::{ImportWorkflow, StyleRebuildReport};
pub use import_service::ImportService;
pub use scheduler::{schedule_processes, ScheduleError, PROCESS_GAP_DAYS};
