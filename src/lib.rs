// ==========================================
// 餐饮人力排班系统 - 核心库
// ==========================================
// 技术栈: Rust + Tokio + SQLite
// 系统定位: 排班决策流水线（预测 → 档位 → 求解 → 合规 → 成本 → 发布闸门）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 流水线各阶段
pub mod engine;

// 导入层 - CRM 订单
pub mod importer;

// 配置层 - 规则与策略
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::types::{DemandSource, GateCheck, MenuComplexity, Severity, ViolationKind};

pub use domain::{
    Employee, ForecastTier, RuleSet, ScheduleDraft, ScheduleInput, ScheduleResult, Shift,
    UnifiedWorkload,
};

pub use engine::{
    ComplianceKernel, GlobalForecastOrchestrator, OptimizationSolver, PhoenixGate,
    PipelineError, PositionMatrixEngine, SchedulerKernel, TheoryCost, ValidationError,
};

pub use api::{ScheduleApi, ScheduleRequest};

// ==========================================
// 常量定义
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "餐饮人力排班系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
