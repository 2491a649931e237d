// ==========================================
// 餐饮人力排班系统 - 领域类型定义
// ==========================================
// 职责: 枚举型领域类型（菜单复杂度、违规等级、闸门检查项等）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 菜单复杂度 (Menu Complexity)
// ==========================================
// 用途: 宴会/餐厅订单的每位客人备餐工时系数索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuComplexity {
    Low,    // 简单
    Medium, // 常规
    High,   // 复杂
}

impl fmt::Display for MenuComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuComplexity::Low => write!(f, "low"),
            MenuComplexity::Medium => write!(f, "medium"),
            MenuComplexity::High => write!(f, "high"),
        }
    }
}

// ==========================================
// 需求来源 (Demand Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DemandSource {
    Banquet,    // BEO 宴会订单
    Restaurant, // REO 餐厅/门店活动
    Pastry,     // 西点生产
    Production, // 通用生产单
}

impl fmt::Display for DemandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandSource::Banquet => write!(f, "BANQUET"),
            DemandSource::Restaurant => write!(f, "RESTAURANT"),
            DemandSource::Pastry => write!(f, "PASTRY"),
            DemandSource::Production => write!(f, "PRODUCTION"),
        }
    }
}

// ==========================================
// 违规等级 (Severity)
// ==========================================
// hard: 阻断发布; soft: 仅提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Soft,
    Hard,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Soft => write!(f, "soft"),
            Severity::Hard => write!(f, "hard"),
        }
    }
}

// ==========================================
// 违规类型 (Violation Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Overtime,   // 周工时超过加班阈值
    Doubletime, // 周工时超过双倍工资阈值
    MaxDays,    // 周出勤天数超限
    Turnaround, // 两班间隔不足
    MealBreak,  // 连续工作段缺少用餐休息
    Overlap,    // 同一员工班次重叠
}

impl ViolationKind {
    /// 该类违规的固定等级
    pub fn severity(&self) -> Severity {
        match self {
            ViolationKind::Overtime | ViolationKind::Doubletime | ViolationKind::MaxDays => {
                Severity::Soft
            }
            ViolationKind::Turnaround | ViolationKind::MealBreak | ViolationKind::Overlap => {
                Severity::Hard
            }
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Overtime => write!(f, "overtime"),
            ViolationKind::Doubletime => write!(f, "doubletime"),
            ViolationKind::MaxDays => write!(f, "max_days"),
            ViolationKind::Turnaround => write!(f, "turnaround"),
            ViolationKind::MealBreak => write!(f, "meal_break"),
            ViolationKind::Overlap => write!(f, "overlap"),
        }
    }
}

// ==========================================
// 发布闸门检查项 (Gate Check)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateCheck {
    ComplianceHardViolations, // 硬性合规违规数
    LaborCostPct,             // 人工成本占比
    StaffingGaps,             // 最低编制缺口
}

impl fmt::Display for GateCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateCheck::ComplianceHardViolations => write!(f, "compliance_hard_violations"),
            GateCheck::LaborCostPct => write!(f, "labor_cost_pct"),
            GateCheck::StaffingGaps => write!(f, "staffing_gaps"),
        }
    }
}
