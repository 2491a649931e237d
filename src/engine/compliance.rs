// ==========================================
// 餐饮人力排班系统 - 劳动合规内核
// ==========================================
// 职责: 按劳动规则校验排班草案，产出违规清单与周工时分解
// 规则:
// 1) ISO 周工时: 超过 overtime_after_hours 计加班，超过 doubletime_after_hours
//    计双倍；阈值包含在正常工时内（恰好等于不算加班） [soft]
// 2) 每周出勤天数超过 max_days_per_week [soft]
// 3) 相邻班次间隔 < min_turnaround_hours [hard]（首尾相接视为同一连续工作段；
//    间隔 > 0 即按两段工作计，拆分班次中间的短暂离岗同样须满足最小间隔）
//    间隔从已排班次中最晚的下班时间起算，嵌套班次不截断外层班次
// 4) 连续工作段 >= meal_break_every_hours 且段内无用餐休息 [hard]
// 5) 同一员工班次重叠 [hard]
// 红线: 违规永不抛出，只以数据形式返回；不修改任何班次
// ==========================================

use crate::domain::rules::RuleSet;
use crate::domain::schedule::{ComplianceReport, ScheduleChecked, ScheduleDraft, Shift, Violation, WeeklyHours};
use crate::domain::types::ViolationKind;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument};

/// 周工时分解结果 (regular, overtime, doubletime)
pub fn split_weekly_hours(total: f64, rules: &RuleSet) -> (f64, f64, f64) {
    let ot_after = rules.overtime_after_hours;
    let dt_after = rules.doubletime_after_hours.max(ot_after);

    let regular = total.min(ot_after);
    let overtime = if total > ot_after {
        total.min(dt_after) - ot_after
    } else {
        0.0
    };
    let doubletime = if total > dt_after { total - dt_after } else { 0.0 };
    (regular, overtime, doubletime)
}

fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_seconds() as f64 / 3600.0
}

// ==========================================
// ComplianceKernel
// ==========================================
pub struct ComplianceKernel;

impl ComplianceKernel {
    pub fn new() -> Self {
        Self
    }

    /// 校验排班草案
    #[instrument(skip(self, draft, rules), fields(
        outlet_id = %draft.outlet_id,
        shifts = draft.shifts.len()
    ))]
    pub fn validate(&self, draft: ScheduleDraft, rules: &RuleSet) -> ScheduleChecked {
        let mut by_employee: BTreeMap<&str, Vec<&Shift>> = BTreeMap::new();
        for shift in &draft.shifts {
            by_employee
                .entry(shift.employee_id.as_str())
                .or_default()
                .push(shift);
        }

        let mut violations = Vec::new();
        let mut weekly_hours = Vec::new();

        for (employee_id, mut shifts) in by_employee {
            shifts.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));

            self.check_weekly(employee_id, &shifts, rules, &mut violations, &mut weekly_hours);
            self.check_sequence(employee_id, &shifts, rules, &mut violations);
            self.check_meal_breaks(employee_id, &shifts, rules, &mut violations);
        }

        let compliance = ComplianceReport {
            violations,
            weekly_hours,
        };

        info!(
            hard = compliance.hard_count(),
            soft = compliance.soft_count(),
            "合规校验完成"
        );

        ScheduleChecked { draft, compliance }
    }

    // ==========================================
    // 周工时 / 出勤天数
    // ==========================================

    fn check_weekly(
        &self,
        employee_id: &str,
        shifts: &[&Shift],
        rules: &RuleSet,
        violations: &mut Vec<Violation>,
        weekly_hours: &mut Vec<WeeklyHours>,
    ) {
        let mut weeks: BTreeMap<(i32, u32), (f64, BTreeSet<NaiveDate>)> = BTreeMap::new();
        for shift in shifts {
            let week = shift.service_date().iso_week();
            let entry = weeks
                .entry((week.year(), week.week()))
                .or_insert((0.0, BTreeSet::new()));
            entry.0 += shift.hours();
            entry.1.insert(shift.service_date());
        }

        for ((iso_year, iso_week), (total, days)) in weeks {
            let (regular, overtime, doubletime) = split_weekly_hours(total, rules);
            let days_worked = days.len() as u32;

            if overtime > 0.0 {
                push(
                    violations,
                    employee_id,
                    ViolationKind::Overtime,
                    format!(
                        "OVERTIME: {}-W{:02} total={:.2}h > {:.2}h, overtime={:.2}h",
                        iso_year, iso_week, total, rules.overtime_after_hours, overtime
                    ),
                );
            }
            if doubletime > 0.0 {
                push(
                    violations,
                    employee_id,
                    ViolationKind::Doubletime,
                    format!(
                        "DOUBLETIME: {}-W{:02} total={:.2}h > {:.2}h, doubletime={:.2}h",
                        iso_year, iso_week, total, rules.doubletime_after_hours, doubletime
                    ),
                );
            }
            if days_worked > rules.max_days_per_week {
                push(
                    violations,
                    employee_id,
                    ViolationKind::MaxDays,
                    format!(
                        "MAX_DAYS: {}-W{:02} days_worked={} > {}",
                        iso_year, iso_week, days_worked, rules.max_days_per_week
                    ),
                );
            }

            weekly_hours.push(WeeklyHours {
                employee_id: employee_id.to_string(),
                iso_year,
                iso_week,
                total_hours: total,
                regular_hours: regular,
                overtime_hours: overtime,
                doubletime_hours: doubletime,
                days_worked,
            });
        }
    }

    // ==========================================
    // 班次间隔 / 重叠
    // ==========================================

    fn check_sequence(
        &self,
        employee_id: &str,
        shifts: &[&Shift],
        rules: &RuleSet,
        violations: &mut Vec<Violation>,
    ) {
        let Some(first) = shifts.first() else { return };

        // 已处理班次中下班最晚者
        let mut latest = *first;

        for next in shifts.iter().skip(1).copied() {
            let gap = hours_between(latest.end, next.start);

            if gap < 0.0 {
                let overlap = hours_between(next.start, latest.end.min(next.end));
                push(
                    violations,
                    employee_id,
                    ViolationKind::Overlap,
                    format!("OVERLAP: {} overlaps {} by {:.2}h", latest.id, next.id, overlap),
                );
            } else if gap > 0.0 && gap < rules.min_turnaround_hours {
                debug!(employee_id, prev = %latest.id, next = %next.id, gap, "班次间隔不足");
                push(
                    violations,
                    employee_id,
                    ViolationKind::Turnaround,
                    format!(
                        "TURNAROUND: {} → {} rest={:.2}h < {:.2}h",
                        latest.id, next.id, gap, rules.min_turnaround_hours
                    ),
                );
            }

            if next.end > latest.end {
                latest = next;
            }
        }
    }

    // ==========================================
    // 用餐休息
    // ==========================================

    fn check_meal_breaks(
        &self,
        employee_id: &str,
        shifts: &[&Shift],
        rules: &RuleSet,
        violations: &mut Vec<Violation>,
    ) {
        let Some(first) = shifts.first() else { return };

        // 当前连续工作段: (开始, 结束, 是否含休息, 首班次 id)
        let mut block = (first.start, first.end, first.meal_break, first.id.as_str());
        let mut blocks = Vec::new();

        for shift in shifts.iter().skip(1) {
            if shift.start <= block.1 {
                block.1 = block.1.max(shift.end);
                block.2 |= shift.meal_break;
            } else {
                blocks.push(block);
                block = (shift.start, shift.end, shift.meal_break, shift.id.as_str());
            }
        }
        blocks.push(block);

        for (start, end, has_break, first_id) in blocks {
            let span = hours_between(start, end);
            if span >= rules.meal_break_every_hours && !has_break {
                push(
                    violations,
                    employee_id,
                    ViolationKind::MealBreak,
                    format!(
                        "MEAL_BREAK: block from {} ({}) spans {:.2}h >= {:.2}h without break",
                        first_id, start, span, rules.meal_break_every_hours
                    ),
                );
            }
        }
    }
}

impl Default for ComplianceKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn push(violations: &mut Vec<Violation>, employee_id: &str, kind: ViolationKind, detail: String) {
    violations.push(Violation {
        employee_id: employee_id.to_string(),
        kind,
        severity: kind.severity(),
        detail,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::Forecast;
    use crate::domain::staffing::ForecastTier;
    use crate::domain::types::Severity;
    use chrono::Duration;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn shift(id: &str, employee_id: &str, start: NaiveDateTime, end: NaiveDateTime, meal_break: bool) -> Shift {
        Shift {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            role: "server".to_string(),
            start,
            end,
            outlet_id: "OUT1".to_string(),
            meal_break,
            locked: false,
        }
    }

    fn draft(shifts: Vec<Shift>) -> ScheduleDraft {
        ScheduleDraft {
            outlet_id: "OUT1".to_string(),
            tier_used: ForecastTier {
                id: "A".to_string(),
                outlet_id: "OUT1".to_string(),
                covers_min: 0,
                covers_max: 100,
                roles: vec![],
            },
            forecast: Forecast {
                covers: 10,
                sales: 100.0,
            },
            shifts,
            gaps: vec![],
            ideal_shortfalls: vec![],
            brigade: vec![],
        }
    }

    fn kinds(checked: &ScheduleChecked) -> Vec<ViolationKind> {
        checked.compliance.violations.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn test_split_weekly_hours_threshold_is_inclusive() {
        let rules = RuleSet::default();
        assert_eq!(split_weekly_hours(40.0, &rules), (40.0, 0.0, 0.0));

        let (regular, ot, dt) = split_weekly_hours(40.01, &rules);
        assert_eq!(regular, 40.0);
        assert!((ot - 0.01).abs() < 1e-9);
        assert_eq!(dt, 0.0);

        let (regular, ot, dt) = split_weekly_hours(65.0, &rules);
        assert_eq!((regular, ot, dt), (40.0, 20.0, 5.0));
    }

    #[test]
    fn test_exactly_forty_hours_has_no_overtime() {
        // 周一至周五 5 × 8h = 40h（2026-03-02 ~ 03-06 同一 ISO 周）
        let shifts = (2..=6)
            .map(|d| shift(&format!("S{}", d), "E1", at(d, 9), at(d, 17), true))
            .collect();
        let checked = ComplianceKernel::new().validate(draft(shifts), &RuleSet::default());

        assert!(checked.compliance.violations.is_empty());
        let week = &checked.compliance.weekly_hours[0];
        assert_eq!(week.total_hours, 40.0);
        assert_eq!(week.overtime_hours, 0.0);
        assert_eq!(week.days_worked, 5);
    }

    #[test]
    fn test_forty_point_zero_one_hours_yields_overtime() {
        let mut shifts: Vec<Shift> = (2..=6)
            .map(|d| shift(&format!("S{}", d), "E1", at(d, 9), at(d, 17), true))
            .collect();
        // 最后一班多 36 秒 = 0.01h
        shifts[4].end = shifts[4].end + Duration::seconds(36);

        let checked = ComplianceKernel::new().validate(draft(shifts), &RuleSet::default());
        let week = &checked.compliance.weekly_hours[0];
        assert!((week.overtime_hours - 0.01).abs() < 1e-9);
        assert_eq!(kinds(&checked), vec![ViolationKind::Overtime]);
        assert_eq!(checked.compliance.violations[0].severity, Severity::Soft);
    }

    #[test]
    fn test_turnaround_violation_is_hard() {
        // 16:00-23:00 后次日 06:00 上班，间隔 7h < 8h
        let shifts = vec![
            shift("S1", "E1", at(2, 16), at(2, 23), true),
            shift("S2", "E1", at(3, 6), at(3, 12), true),
        ];
        let checked = ComplianceKernel::new().validate(draft(shifts), &RuleSet::default());

        assert_eq!(kinds(&checked), vec![ViolationKind::Turnaround]);
        assert_eq!(checked.compliance.hard_count(), 1);
    }

    #[test]
    fn test_turnaround_exactly_at_minimum_is_allowed() {
        let shifts = vec![
            shift("S1", "E1", at(2, 14), at(2, 22), true),
            shift("S2", "E1", at(3, 6), at(3, 12), true),
        ];
        let checked = ComplianceKernel::new().validate(draft(shifts), &RuleSet::default());
        assert!(checked.compliance.violations.is_empty());
    }

    #[test]
    fn test_max_days_per_week_violation() {
        let shifts = (2..=8)
            .map(|d| shift(&format!("S{}", d), "E1", at(d, 10), at(d, 14), false))
            .collect();
        let checked = ComplianceKernel::new().validate(draft(shifts), &RuleSet::default());

        // 7 天 × 4h = 28h，无加班；7 > 6 天
        assert_eq!(kinds(&checked), vec![ViolationKind::MaxDays]);
        assert_eq!(checked.compliance.hard_count(), 0);
    }

    #[test]
    fn test_meal_break_required_for_long_block() {
        let shifts = vec![shift("S1", "E1", at(2, 9), at(2, 15), false)];
        let checked = ComplianceKernel::new().validate(draft(shifts), &RuleSet::default());
        assert_eq!(kinds(&checked), vec![ViolationKind::MealBreak]);
    }

    #[test]
    fn test_adjacent_shifts_form_one_block() {
        // 两个 3h 班次首尾相接 = 6h 连续工作段，其中一个含休息即可
        let no_break = vec![
            shift("S1", "E1", at(2, 9), at(2, 12), false),
            shift("S2", "E1", at(2, 12), at(2, 15), false),
        ];
        let checked = ComplianceKernel::new().validate(draft(no_break), &RuleSet::default());
        assert_eq!(kinds(&checked), vec![ViolationKind::MealBreak]);

        let with_break = vec![
            shift("S1", "E1", at(2, 9), at(2, 12), false),
            shift("S2", "E1", at(2, 12), at(2, 15), true),
        ];
        let checked = ComplianceKernel::new().validate(draft(with_break), &RuleSet::default());
        assert!(checked.compliance.violations.is_empty());
    }

    #[test]
    fn test_overlap_is_reported() {
        let shifts = vec![
            shift("S1", "E1", at(2, 9), at(2, 13), false),
            shift("S2", "E1", at(2, 12), at(2, 14), false),
        ];
        let checked = ComplianceKernel::new().validate(draft(shifts), &RuleSet::default());
        assert!(kinds(&checked).contains(&ViolationKind::Overlap));
    }

    #[test]
    fn test_nested_shift_measured_against_enclosing_shift() {
        // A 09-18 内嵌 B 10-11、C 12-13：两次各 1h 重叠，员工仍在岗，不算间隔不足
        let shifts = vec![
            shift("A", "E1", at(2, 9), at(2, 18), true),
            shift("B", "E1", at(2, 10), at(2, 11), true),
            shift("C", "E1", at(2, 12), at(2, 13), true),
        ];
        let checked = ComplianceKernel::new().validate(draft(shifts), &RuleSet::default());

        assert_eq!(kinds(&checked), vec![ViolationKind::Overlap, ViolationKind::Overlap]);
        let details: Vec<&str> = checked
            .compliance
            .violations
            .iter()
            .map(|v| v.detail.as_str())
            .collect();
        assert_eq!(
            details,
            vec!["OVERLAP: A overlaps B by 1.00h", "OVERLAP: A overlaps C by 1.00h"]
        );
    }

    #[test]
    fn test_partial_overlap_reports_overlapping_span() {
        let shifts = vec![
            shift("S1", "E1", at(2, 9), at(2, 13), false),
            shift("S2", "E1", at(2, 12), at(2, 14), false),
        ];
        let checked = ComplianceKernel::new().validate(draft(shifts), &RuleSet::default());
        let overlap = checked
            .compliance
            .violations
            .iter()
            .find(|v| v.kind == ViolationKind::Overlap)
            .unwrap();
        assert_eq!(overlap.detail, "OVERLAP: S1 overlaps S2 by 1.00h");
    }

    #[test]
    fn test_split_shift_short_gap_is_turnaround() {
        // 09:00-13:00 与 13:30-17:30：间隔 0.5h > 0，按两段工作计
        let shifts = vec![
            shift("S1", "E1", at(2, 9), at(2, 13), false),
            shift(
                "S2",
                "E1",
                at(2, 13) + Duration::minutes(30),
                at(2, 17) + Duration::minutes(30),
                false,
            ),
        ];
        let checked = ComplianceKernel::new().validate(draft(shifts), &RuleSet::default());

        assert_eq!(kinds(&checked), vec![ViolationKind::Turnaround]);
        assert_eq!(checked.compliance.violations[0].severity, Severity::Hard);
        assert_eq!(
            checked.compliance.violations[0].detail,
            "TURNAROUND: S1 → S2 rest=0.50h < 8.00h"
        );
    }

    #[test]
    fn test_does_not_modify_shifts() {
        let shifts = vec![
            shift("S1", "E1", at(2, 16), at(2, 23), true),
            shift("S2", "E1", at(3, 6), at(3, 12), true),
        ];
        let original = draft(shifts);
        let checked = ComplianceKernel::new().validate(original.clone(), &RuleSet::default());
        assert_eq!(checked.draft, original);
    }
}
