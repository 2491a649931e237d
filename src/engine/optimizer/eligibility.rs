// ==========================================
// 排班求解器 - 资格判定与分配簿
// ==========================================
// 资格: 具备岗位 + 有该岗位时薪 + 可用时段覆盖班次 + 无兼职冲突
//       + 当日未被分配 + 与已有班次不重叠
// ==========================================

use crate::domain::employee::Employee;
use crate::domain::schedule::Shift;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// 不具备资格的原因（仅用于调试日志）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
    MissingRole,
    MissingWage,
    Unavailable,
    OtherJob,
    AlreadyAssignedToday,
    Overlap,
}

impl fmt::Display for Ineligible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligible::MissingRole => write!(f, "MISSING_ROLE"),
            Ineligible::MissingWage => write!(f, "MISSING_WAGE"),
            Ineligible::Unavailable => write!(f, "UNAVAILABLE"),
            Ineligible::OtherJob => write!(f, "OTHER_JOB_BLOCK"),
            Ineligible::AlreadyAssignedToday => write!(f, "ALREADY_ASSIGNED_TODAY"),
            Ineligible::Overlap => write!(f, "SHIFT_OVERLAP"),
        }
    }
}

// ==========================================
// AssignmentBook - 单次求解的可变分配状态
// ==========================================
// 求解器单线程持有；跨门店共享员工需另加锁或二次对账
#[derive(Debug, Default)]
pub struct AssignmentBook {
    intervals: HashMap<String, Vec<(NaiveDateTime, NaiveDateTime)>>,
    assigned_days: HashSet<(String, NaiveDate)>,
    role_counts: HashMap<(NaiveDate, String), u32>,
}

impl AssignmentBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记班次（锁定班次或新排班次）
    pub fn record(&mut self, shift: &Shift) {
        self.intervals
            .entry(shift.employee_id.clone())
            .or_default()
            .push((shift.start, shift.end));
        self.assigned_days
            .insert((shift.employee_id.clone(), shift.service_date()));
        *self
            .role_counts
            .entry((shift.service_date(), shift.role.clone()))
            .or_insert(0) += 1;
    }

    pub fn count(&self, date: NaiveDate, role: &str) -> u32 {
        self.role_counts
            .get(&(date, role.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_assigned_on(&self, employee_id: &str, date: NaiveDate) -> bool {
        self.assigned_days
            .contains(&(employee_id.to_string(), date))
    }

    pub fn overlaps(&self, employee_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.intervals
            .get(employee_id)
            .map(|list| list.iter().any(|(s, e)| *s < end && start < *e))
            .unwrap_or(false)
    }
}

/// 判定员工对 (role, [start, end)) 的资格
pub fn check_eligibility(
    employee: &Employee,
    role: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    book: &AssignmentBook,
) -> Result<(), Ineligible> {
    if !employee.has_role(role) {
        return Err(Ineligible::MissingRole);
    }
    if employee.wage_for(role).is_none() {
        return Err(Ineligible::MissingWage);
    }
    if !employee.is_available(start, end) {
        return Err(Ineligible::Unavailable);
    }
    if employee.has_other_job_conflict(start, end) {
        return Err(Ineligible::OtherJob);
    }
    if book.is_assigned_on(&employee.id, start.date()) {
        return Err(Ineligible::AlreadyAssignedToday);
    }
    if book.overlaps(&employee.id, start, end) {
        return Err(Ineligible::Overlap);
    }
    Ok(())
}
