// ==========================================
// 餐饮人力排班系统 - 排班输入校验器
// ==========================================
// 职责: 内核运行前对 ScheduleInput 做结构化校验
// 红线: 收集全部违规字段后一次性返回，不在第一个错误处中止
// ==========================================

use crate::domain::input::ScheduleInput;
use crate::domain::rules::{GatePolicy, RuleSet, SolverTuning};
use crate::domain::staffing::ForecastTier;
use crate::engine::error::{FieldViolation, ValidationError};
use std::collections::HashSet;

// ==========================================
// ScheduleInputValidator
// ==========================================
pub struct ScheduleInputValidator {
    violations: Vec<FieldViolation>,
}

impl ScheduleInputValidator {
    /// 校验排班输入
    ///
    /// # 返回
    /// - Ok(()): 全部通过
    /// - Err(ValidationError): 含全部违规字段
    pub fn validate(input: &ScheduleInput) -> Result<(), ValidationError> {
        let mut v = Self {
            violations: Vec::new(),
        };

        v.check_outlet_and_dates(input);
        v.check_tiers(input);
        v.check_employees(input);
        v.check_forecast(input);
        v.check_rules(&input.rules);
        if let Some(policies) = &input.policies {
            v.check_policies(policies);
        }
        if let Some(tuning) = &input.solver {
            v.check_solver(tuning);
        }
        v.check_locked_shifts(input);

        if v.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: v.violations,
            })
        }
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }

    fn check_non_negative(&mut self, field: &str, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.push(field, format!("必须为非负有限数，实际 {}", value));
        }
    }

    fn check_positive(&mut self, field: &str, value: f64) {
        if !value.is_finite() || value <= 0.0 {
            self.push(field, format!("必须为正数，实际 {}", value));
        }
    }

    // ==========================================
    // 门店与营业日
    // ==========================================

    fn check_outlet_and_dates(&mut self, input: &ScheduleInput) {
        if input.outlet_id.trim().is_empty() {
            self.push("outlet_id", "不能为空");
        }

        if input.service_dates.is_empty() {
            self.push("service_dates", "至少需要一个营业日");
        }
        let mut seen = HashSet::new();
        for (i, date) in input.service_dates.iter().enumerate() {
            if !seen.insert(*date) {
                self.push(format!("service_dates[{}]", i), format!("日期重复: {}", date));
            }
        }
    }

    // ==========================================
    // 编制档位
    // ==========================================

    fn check_tiers(&mut self, input: &ScheduleInput) {
        if input.tiers.is_empty() {
            self.push("tiers", "至少需要一个档位");
            return;
        }

        if !input.tiers.iter().any(|t| t.outlet_id == input.outlet_id) {
            self.push(
                "tiers",
                format!("门店 {} 没有任何档位", input.outlet_id),
            );
        }

        for (i, tier) in input.tiers.iter().enumerate() {
            self.check_tier(i, tier);
        }
    }

    fn check_tier(&mut self, i: usize, tier: &ForecastTier) {
        if tier.id.trim().is_empty() {
            self.push(format!("tiers[{}].id", i), "不能为空");
        }
        if tier.covers_min > tier.covers_max {
            self.push(
                format!("tiers[{}].covers_min", i),
                format!(
                    "covers_min ({}) 不能大于 covers_max ({})",
                    tier.covers_min, tier.covers_max
                ),
            );
        }

        let mut keys = HashSet::new();
        for (j, role) in tier.roles.iter().enumerate() {
            let path = format!("tiers[{}].roles[{}]", i, j);
            if role.key.trim().is_empty() {
                self.push(format!("{}.key", path), "不能为空");
            } else if !keys.insert(role.key.as_str()) {
                self.push(format!("{}.key", path), format!("岗位重复: {}", role.key));
            }
            if let Some(ideal) = role.ideal {
                if ideal < role.min {
                    self.push(
                        format!("{}.ideal", path),
                        format!("ideal ({}) 不能小于 min ({})", ideal, role.min),
                    );
                }
            }
            if role.default_in == role.default_out {
                self.push(format!("{}.default_out", path), "上下班时间不能相同");
            }
        }
    }

    // ==========================================
    // 员工
    // ==========================================

    fn check_employees(&mut self, input: &ScheduleInput) {
        let mut ids = HashSet::new();
        for (i, employee) in input.employees.iter().enumerate() {
            let path = format!("employees[{}]", i);
            if employee.id.trim().is_empty() {
                self.push(format!("{}.id", path), "不能为空");
            } else if !ids.insert(employee.id.as_str()) {
                self.push(format!("{}.id", path), format!("员工重复: {}", employee.id));
            }

            for (role, wage) in &employee.wage_by_role {
                self.check_non_negative(&format!("{}.wage_by_role.{}", path, role), *wage);
            }

            for (k, window) in employee.availability.iter().enumerate() {
                if window.end <= window.start {
                    self.push(
                        format!("{}.availability[{}]", path, k),
                        "结束时间必须晚于开始时间",
                    );
                }
            }
            for (k, block) in employee.other_job_blocks.iter().enumerate() {
                if block.end <= block.start {
                    self.push(
                        format!("{}.other_job_blocks[{}]", path, k),
                        "结束时间必须晚于开始时间",
                    );
                }
            }
        }
    }

    // ==========================================
    // 预测与营收
    // ==========================================

    fn check_forecast(&mut self, input: &ScheduleInput) {
        self.check_non_negative("forecast.sales", input.forecast.sales);
        self.check_non_negative("sales_forecast", input.sales_forecast);
        if let Some(avg_check) = input.avg_check_per_cover {
            self.check_positive("avg_check_per_cover", avg_check);
        }
    }

    // ==========================================
    // 规则与策略
    // ==========================================

    fn check_rules(&mut self, rules: &RuleSet) {
        self.check_positive("rules.overtime_after_hours", rules.overtime_after_hours);
        self.check_positive("rules.doubletime_after_hours", rules.doubletime_after_hours);
        if rules.doubletime_after_hours < rules.overtime_after_hours {
            self.push(
                "rules.doubletime_after_hours",
                format!(
                    "不能小于 overtime_after_hours ({})",
                    rules.overtime_after_hours
                ),
            );
        }
        self.check_non_negative("rules.min_turnaround_hours", rules.min_turnaround_hours);
        if rules.max_days_per_week == 0 || rules.max_days_per_week > 7 {
            self.push(
                "rules.max_days_per_week",
                format!("必须在 1..=7 之间，实际 {}", rules.max_days_per_week),
            );
        }
        self.check_positive("rules.meal_break_every_hours", rules.meal_break_every_hours);
    }

    fn check_policies(&mut self, policies: &GatePolicy) {
        self.check_positive("policies.max_labor_pct", policies.max_labor_pct);
    }

    fn check_solver(&mut self, tuning: &SolverTuning) {
        self.check_non_negative("solver.preferred_role_bonus", tuning.preferred_role_bonus);
        self.check_non_negative("solver.avoid_day_penalty", tuning.avoid_day_penalty);
    }

    // ==========================================
    // 锁定班次
    // ==========================================

    fn check_locked_shifts(&mut self, input: &ScheduleInput) {
        let mut ids = HashSet::new();
        for (i, shift) in input.locked_shifts.iter().enumerate() {
            let path = format!("locked_shifts[{}]", i);
            if !ids.insert(shift.id.as_str()) {
                self.push(format!("{}.id", path), format!("班次重复: {}", shift.id));
            }
            if shift.end <= shift.start {
                self.push(format!("{}.end", path), "结束时间必须晚于开始时间");
            }
            match input.find_employee(&shift.employee_id) {
                None => self.push(
                    format!("{}.employee_id", path),
                    format!("员工不存在: {}", shift.employee_id),
                ),
                Some(employee) => {
                    if !employee.has_role(&shift.role) {
                        self.push(
                            format!("{}.role", path),
                            format!("员工 {} 不具备岗位 {}", employee.id, shift.role),
                        );
                    } else if employee.wage_for(&shift.role).is_none() {
                        self.push(
                            format!("{}.role", path),
                            format!("员工 {} 缺少岗位 {} 的时薪", employee.id, shift.role),
                        );
                    }
                }
            }
        }
    }
}
