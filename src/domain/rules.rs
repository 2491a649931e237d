// ==========================================
// 餐饮人力排班系统 - 规则与策略配置模型
// ==========================================
// 职责: 劳动合规规则 (RuleSet)、发布策略 (GatePolicy)、
//       需求工时系数 (ComplexityFactors)、求解器调参 (SolverTuning)
// 红线: 显式类型化字段，随调用链传入，禁止进程级全局状态
// ==========================================

use crate::domain::types::MenuComplexity;
use serde::{Deserialize, Serialize};

// ==========================================
// RuleSet - 劳动合规规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// 周工时超过该值计加班（恰好等于计正常工时）
    pub overtime_after_hours: f64,
    /// 周工时超过该值计双倍工资
    pub doubletime_after_hours: f64,
    /// 两班最小间隔（小时）
    pub min_turnaround_hours: f64,
    /// 每周最多出勤天数
    pub max_days_per_week: u32,
    /// 连续工作达到该时长必须含用餐休息
    pub meal_break_every_hours: f64,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            overtime_after_hours: 40.0,
            doubletime_after_hours: 60.0,
            min_turnaround_hours: 8.0,
            max_days_per_week: 6,
            meal_break_every_hours: 5.0,
        }
    }
}

// ==========================================
// GatePolicy - 发布闸门策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GatePolicy {
    /// 人工成本占预测营收上限（百分比）
    pub max_labor_pct: f64,
    /// 最低编制缺口是否阻断发布
    #[serde(default)]
    pub block_on_staffing_gaps: bool,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            max_labor_pct: 35.0,
            block_on_staffing_gaps: false,
        }
    }
}

// ==========================================
// ComplexityFactors - 每位客人备餐工时（小时）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityFactors {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl ComplexityFactors {
    pub fn hours_per_guest(&self, complexity: MenuComplexity) -> f64 {
        match complexity {
            MenuComplexity::Low => self.low,
            MenuComplexity::Medium => self.medium,
            MenuComplexity::High => self.high,
        }
    }
}

impl Default for ComplexityFactors {
    fn default() -> Self {
        Self {
            low: 0.02,
            medium: 0.03,
            high: 0.05,
        }
    }
}

// ==========================================
// SolverTuning - 求解器偏好权重
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverTuning {
    /// 偏好岗位的成本奖励
    pub preferred_role_bonus: f64,
    /// 命中回避日的成本惩罚
    pub avoid_day_penalty: f64,
}

impl Default for SolverTuning {
    fn default() -> Self {
        Self {
            preferred_role_bonus: 5.0,
            avoid_day_penalty: 10.0,
        }
    }
}
