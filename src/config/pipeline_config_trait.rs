// ==========================================
// 餐饮人力排班系统 - 流水线配置读取 Trait
// ==========================================
// 职责: 定义排班流水线所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::rules::{ComplexityFactors, GatePolicy, RuleSet, SolverTuning};
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// PipelineConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait PipelineConfigReader: Send + Sync {
    /// 获取劳动合规规则
    ///
    /// # 默认值
    /// - overtime_after_hours: 40
    /// - doubletime_after_hours: 60
    /// - min_turnaround_hours: 8
    /// - max_days_per_week: 6
    /// - meal_break_every_hours: 5
    async fn get_rule_set(&self) -> Result<RuleSet, Box<dyn Error + Send + Sync>>;

    /// 获取发布闸门策略
    ///
    /// # 默认值
    /// - max_labor_pct: 35
    /// - block_on_staffing_gaps: false
    async fn get_gate_policy(&self) -> Result<GatePolicy, Box<dyn Error + Send + Sync>>;

    /// 获取每位客人备餐工时系数（小时）
    ///
    /// # 默认值
    /// - low: 0.02 / medium: 0.03 / high: 0.05
    async fn get_complexity_factors(&self) -> Result<ComplexityFactors, Box<dyn Error + Send + Sync>>;

    /// 获取求解器调参
    ///
    /// # 默认值
    /// - preferred_role_bonus: 5.0
    /// - avoid_day_penalty: 10.0
    async fn get_solver_tuning(&self) -> Result<SolverTuning, Box<dyn Error + Send + Sync>>;
}
