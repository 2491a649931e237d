// ==========================================
// 餐饮人力排班系统 - 员工领域模型
// ==========================================
// 职责: 员工岗位资质、分岗时薪、可用时段、兼职占用、偏好
// 红线: 对排班求解器只读
// ==========================================

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// TimeWindow - 半开时间区间 [start, end)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// 本区间是否完整覆盖 [start, end)
    pub fn covers(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start <= start && self.end >= end
    }

    /// 与 [start, end) 是否有交集
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end
    }
}

// ==========================================
// Preferences - 员工偏好
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// 偏好岗位（命中时给予成本奖励）
    #[serde(default)]
    pub preferred_roles: BTreeSet<String>,
    /// 希望避开的星期（命中时成本惩罚）
    #[serde(default)]
    pub avoid_weekdays: Vec<Weekday>,
}

// ==========================================
// Employee - 员工
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub roles: BTreeSet<String>,
    pub wage_by_role: BTreeMap<String, f64>,
    /// 可用时段；为空表示不受限
    #[serde(default)]
    pub availability: Vec<TimeWindow>,
    /// 其他工作占用时段
    #[serde(default)]
    pub other_job_blocks: Vec<TimeWindow>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Employee {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn wage_for(&self, role: &str) -> Option<f64> {
        self.wage_by_role.get(role).copied()
    }

    /// 可用时段是否覆盖整个班次
    pub fn is_available(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.availability.is_empty() || self.availability.iter().any(|w| w.covers(start, end))
    }

    /// 是否与其他工作占用冲突
    pub fn has_other_job_conflict(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.other_job_blocks.iter().any(|b| b.overlaps(start, end))
    }

    pub fn prefers_role(&self, role: &str) -> bool {
        self.preferences.preferred_roles.contains(role)
    }

    pub fn avoids_day(&self, start: NaiveDateTime) -> bool {
        self.preferences.avoid_weekdays.contains(&start.weekday())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_time_window_half_open() {
        let w = TimeWindow::new(at(2, 9), at(2, 17));
        assert!(w.covers(at(2, 9), at(2, 17)));
        assert!(!w.covers(at(2, 8), at(2, 17)));
        assert!(w.overlaps(at(2, 16), at(2, 20)));
        // 首尾相接不算重叠
        assert!(!w.overlaps(at(2, 17), at(2, 20)));
    }

    #[test]
    fn test_empty_availability_is_unrestricted() {
        let e = Employee {
            id: "E1".to_string(),
            roles: BTreeSet::from(["server".to_string()]),
            wage_by_role: BTreeMap::from([("server".to_string(), 20.0)]),
            availability: vec![],
            other_job_blocks: vec![TimeWindow::new(at(3, 8), at(3, 12))],
            preferences: Preferences::default(),
        };
        assert!(e.is_available(at(2, 9), at(2, 17)));
        assert!(e.has_other_job_conflict(at(3, 10), at(3, 18)));
        assert!(!e.has_other_job_conflict(at(2, 10), at(2, 18)));
    }
}
