// ==========================================
// 餐饮人力排班系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、配置模型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod demand;
pub mod employee;
pub mod input;
pub mod rules;
pub mod schedule;
pub mod staffing;
pub mod types;
pub mod workload;

// 重导出核心类型
pub use demand::{
    BeoInput, DemandBundle, PastryDemand, PastryItemSpec, PastryStageSpec, ProductionOrder,
    ReoInput,
};
pub use employee::{Employee, Preferences, TimeWindow};
pub use input::ScheduleInput;
pub use rules::{ComplexityFactors, GatePolicy, RuleSet, SolverTuning};
pub use schedule::{
    ComplianceReport, CostLine, Forecast, GateEntry, GateOutcome, IdealShortfall, LaborCost,
    ScheduleChecked, ScheduleDraft, ScheduleResult, Shift, StaffingGap, Violation, WeeklyHours,
};
pub use staffing::{ForecastTier, RoleRequirement};
pub use types::{DemandSource, GateCheck, MenuComplexity, Severity, ViolationKind};
pub use workload::{
    AggregatorFailure, DayWorkload, PartialWorkload, PastryBatch, StageAssignment,
    UnifiedWorkload, WorkloadBuilder,
};
