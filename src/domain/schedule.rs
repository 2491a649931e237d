// ==========================================
// 餐饮人力排班系统 - 排班结果领域模型
// ==========================================
// 链路: ScheduleDraft → ScheduleChecked → ScheduleResult
// 红线: 每一级只追加字段（compliance → costs/publishable/gate_report），
//       不修改求解器已排定的班次
// ==========================================

use crate::domain::staffing::ForecastTier;
use crate::domain::types::{GateCheck, Severity, ViolationKind};
use crate::domain::workload::PastryBatch;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Forecast - 客流与营收预测
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub covers: u32,
    pub sales: f64,
}

// ==========================================
// Shift - 班次
// ==========================================
// 红线: 同一员工的班次在 [start, end) 上不得重叠
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: String,
    pub employee_id: String,
    pub role: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub outlet_id: String,
    /// 班次内含用餐休息
    #[serde(default)]
    pub meal_break: bool,
    /// 人工锁定班次（求解器原样保留）
    #[serde(default)]
    pub locked: bool,
}

impl Shift {
    pub fn hours(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 3600.0
    }

    /// 排班日（按上班时间归属）
    pub fn service_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end
    }
}

// ==========================================
// 求解缺口
// ==========================================

/// 最低编制缺口（不可行但非致命）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingGap {
    pub date: NaiveDate,
    pub role: String,
    pub required_min: u32,
    pub assigned: u32,
    pub short_by: u32,
}

/// 理想编制差额（提示）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdealShortfall {
    pub date: NaiveDate,
    pub role: String,
    pub ideal: u32,
    pub assigned: u32,
}

// ==========================================
// ScheduleDraft - 求解器草案
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    pub outlet_id: String,
    pub tier_used: ForecastTier,
    pub forecast: Forecast,
    pub shifts: Vec<Shift>,
    pub gaps: Vec<StaffingGap>,
    pub ideal_shortfalls: Vec<IdealShortfall>,
    /// 西点批次工序分配（BrigadeSkillAllocator 填写）
    #[serde(default)]
    pub brigade: Vec<PastryBatch>,
}

impl ScheduleDraft {
    pub fn shifts_for(&self, employee_id: &str) -> impl Iterator<Item = &Shift> {
        let employee_id = employee_id.to_string();
        self.shifts.iter().filter(move |s| s.employee_id == employee_id)
    }
}

// ==========================================
// 合规报告
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub employee_id: String,
    pub kind: ViolationKind,
    pub severity: Severity,
    pub detail: String,
}

/// 员工 ISO 周工时分解
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyHours {
    pub employee_id: String,
    pub iso_year: i32,
    pub iso_week: u32,
    pub total_hours: f64,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub doubletime_hours: f64,
    pub days_worked: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub violations: Vec<Violation>,
    pub weekly_hours: Vec<WeeklyHours>,
}

impl ComplianceReport {
    pub fn hard_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Hard)
            .count()
    }

    pub fn soft_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Soft)
            .count()
    }

    pub fn weekly_for(&self, employee_id: &str) -> Vec<&WeeklyHours> {
        self.weekly_hours
            .iter()
            .filter(|w| w.employee_id == employee_id)
            .collect()
    }
}

// ==========================================
// ScheduleChecked - 已合规校验
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleChecked {
    #[serde(flatten)]
    pub draft: ScheduleDraft,
    pub compliance: ComplianceReport,
}

// ==========================================
// 理论人工成本
// ==========================================

/// 单班次成本明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub shift_id: String,
    pub employee_id: String,
    pub role: String,
    pub base_rate: f64,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub doubletime_hours: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaborCost {
    pub total: f64,
    /// 占预测营收百分比；营收为 0 时显式为 0
    pub pct: f64,
    #[serde(default)]
    pub lines: Vec<CostLine>,
}

// ==========================================
// 发布闸门
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateEntry {
    pub check: GateCheck,
    pub ok: bool,
    /// 不通过时是否阻断发布
    pub blocking: bool,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOutcome {
    pub ok: bool,
    pub report: Vec<GateEntry>,
}

// ==========================================
// ScheduleResult - 最终排班结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    #[serde(flatten)]
    pub checked: ScheduleChecked,
    pub costs: LaborCost,
    pub publishable: bool,
    pub gate_report: Vec<GateEntry>,
}

impl ScheduleResult {
    pub fn shifts(&self) -> &[Shift] {
        &self.checked.draft.shifts
    }

    pub fn gaps(&self) -> &[StaffingGap] {
        &self.checked.draft.gaps
    }

    pub fn violations(&self) -> &[Violation] {
        &self.checked.compliance.violations
    }

    pub fn gate_entry(&self, check: GateCheck) -> Option<&GateEntry> {
        self.gate_report.iter().find(|e| e.check == check)
    }
}
