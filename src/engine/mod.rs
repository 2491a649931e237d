// ==========================================
// 餐饮人力排班系统 - 引擎层
// ==========================================
// 职责: 排班决策流水线各阶段，纯计算不做 I/O
// 红线: 不拼 SQL；不可行与违规作为数据返回，只有输入校验失败会中止
// ==========================================

pub mod aggregator;
pub mod brigade;
pub mod compliance;
pub mod error;
pub mod events;
pub mod forecast;
pub mod forecast_orchestrator;
pub mod gate;
pub mod input_validator;
pub mod kernel;
pub mod optimizer;
pub mod position_matrix;
pub mod theory_cost;

// 重导出核心引擎
pub use aggregator::{
    BanquetAggregator, DemandAggregator, PastryAggregator, ProductionAggregator,
    RestaurantAggregator,
};
pub use brigade::BrigadeSkillAllocator;
pub use compliance::{split_weekly_hours, ComplianceKernel};
pub use error::{
    AggregateError, FieldViolation, PipelineError, PipelineResult, ValidationError,
};
pub use events::{
    NoOpEventPublisher, OptionalEventPublisher, ScheduleEvent, ScheduleEventPublisher,
    ScheduleEventType,
};
pub use forecast::{ForecastEngine, ForecastSignal};
pub use forecast_orchestrator::GlobalForecastOrchestrator;
pub use gate::PhoenixGate;
pub use input_validator::ScheduleInputValidator;
pub use kernel::SchedulerKernel;
pub use optimizer::OptimizationSolver;
pub use position_matrix::PositionMatrixEngine;
pub use theory_cost::TheoryCost;
