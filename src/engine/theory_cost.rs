// ==========================================
// 餐饮人力排班系统 - 理论人工成本
// ==========================================
// 职责: 按岗位时薪与加班倍率计算班次成本及人工成本率
// 规则:
// - 员工按 ISO 周累计工时，班次按时间顺序计入
// - 累计超过 overtime_after_hours 的部分 × 1.5
// - 累计超过 doubletime_after_hours 的部分 × 2.0
// - pct = total / sales × 100；sales 为 0 时 pct 显式为 0
// 红线: 缺失岗位时薪按 0 计并告警，不中止
// ==========================================

use crate::domain::employee::Employee;
use crate::domain::rules::RuleSet;
use crate::domain::schedule::{CostLine, LaborCost, ScheduleChecked, Shift};
use chrono::Datelike;
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

pub const OVERTIME_MULTIPLIER: f64 = 1.5;
pub const DOUBLETIME_MULTIPLIER: f64 = 2.0;

pub struct TheoryCost {
    rules: RuleSet,
}

impl TheoryCost {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// 计算排班理论人工成本
    #[instrument(skip(self, checked, employees), fields(
        outlet_id = %checked.draft.outlet_id,
        shifts = checked.draft.shifts.len()
    ))]
    pub fn compute(&self, checked: &ScheduleChecked, employees: &[Employee], forecast_sales: f64) -> LaborCost {
        let ot_after = self.rules.overtime_after_hours;
        let dt_after = self.rules.doubletime_after_hours.max(ot_after);

        // (员工, ISO 年, ISO 周) → 班次
        let mut buckets: BTreeMap<(&str, i32, u32), Vec<&Shift>> = BTreeMap::new();
        for shift in &checked.draft.shifts {
            let week = shift.service_date().iso_week();
            buckets
                .entry((shift.employee_id.as_str(), week.year(), week.week()))
                .or_default()
                .push(shift);
        }

        let mut lines = Vec::with_capacity(checked.draft.shifts.len());
        for ((employee_id, _, _), mut shifts) in buckets {
            shifts.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));

            let employee = employees.iter().find(|e| e.id == employee_id);
            let mut cumulative = 0.0;

            for shift in shifts {
                let base_rate = match employee.and_then(|e| e.wage_for(&shift.role)) {
                    Some(rate) => rate,
                    None => {
                        warn!(
                            employee_id,
                            role = %shift.role,
                            shift_id = %shift.id,
                            "缺失岗位时薪，按 0 计算"
                        );
                        0.0
                    }
                };

                let hours = shift.hours();
                let from = cumulative;
                let to = cumulative + hours;
                cumulative = to;

                let regular_hours = span_within(from, to, 0.0, ot_after);
                let overtime_hours = span_within(from, to, ot_after, dt_after);
                let doubletime_hours = span_within(from, to, dt_after, f64::INFINITY);

                let cost = base_rate
                    * (regular_hours
                        + overtime_hours * OVERTIME_MULTIPLIER
                        + doubletime_hours * DOUBLETIME_MULTIPLIER);

                lines.push(CostLine {
                    shift_id: shift.id.clone(),
                    employee_id: employee_id.to_string(),
                    role: shift.role.clone(),
                    base_rate,
                    regular_hours,
                    overtime_hours,
                    doubletime_hours,
                    cost,
                });
            }
        }

        let total: f64 = lines.iter().map(|l| l.cost).sum();
        let pct = if forecast_sales > 0.0 {
            total / forecast_sales * 100.0
        } else {
            0.0
        };

        info!(total, pct, lines = lines.len(), "理论人工成本计算完成");

        LaborCost { total, pct, lines }
    }
}

/// [from, to) 与 [lo, hi) 的交集长度
fn span_within(from: f64, to: f64, lo: f64, hi: f64) -> f64 {
    (to.min(hi) - from.max(lo)).max(0.0)
}
