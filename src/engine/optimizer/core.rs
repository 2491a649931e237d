use super::eligibility::{check_eligibility, AssignmentBook};
use crate::domain::employee::Employee;
use crate::domain::input::ScheduleInput;
use crate::domain::rules::SolverTuning;
use crate::domain::schedule::{Forecast, IdealShortfall, ScheduleDraft, Shift, StaffingGap};
use crate::domain::staffing::{ForecastTier, RoleRequirement};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

// ==========================================
// OptimizationSolver - 排班求解器
// ==========================================
// 单门店单线程求解；多门店可按 outlet_id 拆分后各自调用 solve
// （基础模型中门店之间不共享员工）
pub struct OptimizationSolver;

/// 单个需求槽位的时间窗
#[derive(Debug, Clone, Copy)]
struct SlotWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl SlotWindow {
    fn for_role(date: NaiveDate, role: &RoleRequirement) -> Self {
        let start = date.and_time(role.default_in);
        let end_date = if role.is_overnight() {
            date + Duration::days(1)
        } else {
            date
        };
        Self {
            start,
            end: end_date.and_time(role.default_out),
        }
    }
}

impl OptimizationSolver {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 求解排班草案
    ///
    /// 规则:
    /// 1) 锁定班次原样保留，计入当日岗位人数
    /// 2) 第一轮: 岗位按 min 升序（最受约束优先），逐槽位分配成本最低的合格员工，
    ///    成本相同按员工 id 决胜；无人可排 → 记录缺口，不中止
    /// 3) 第二轮: 用剩余人力向 ideal 补齐，缺额最大的岗位优先
    ///
    /// combinable_with 不参与求解：员工按求解顺序首个命中的岗位排班
    #[instrument(skip(self, input, tier), fields(
        outlet_id = %input.outlet_id,
        tier_id = %tier.id,
        dates = input.service_dates.len(),
        employees = input.employees.len(),
        locked = input.locked_shifts.len()
    ))]
    pub fn solve(&self, input: &ScheduleInput, tier: &ForecastTier, forecast: Forecast) -> ScheduleDraft {
        let tuning = input.solver_or_default();
        let meal_break_hours = input.rules.meal_break_every_hours;

        let mut book = AssignmentBook::new();
        let mut shifts: Vec<Shift> = Vec::new();
        let mut gaps = Vec::new();
        let mut ideal_shortfalls = Vec::new();

        for locked in &input.locked_shifts {
            book.record(locked);
            shifts.push(locked.clone());
        }

        let roles = ordered_roles(tier);

        let mut dates = input.service_dates.clone();
        dates.sort();
        dates.dedup();

        for date in dates {
            // ===== 第一轮: 满足 min =====
            for role in &roles {
                while book.count(date, &role.key) < role.min {
                    match self.assign_one(input, &tuning, meal_break_hours, date, role, &mut book) {
                        Some(shift) => shifts.push(shift),
                        None => {
                            let assigned = book.count(date, &role.key);
                            debug!(date = %date, role = %role.key, assigned, min = role.min, "最低编制不可满足");
                            gaps.push(StaffingGap {
                                date,
                                role: role.key.clone(),
                                required_min: role.min,
                                assigned,
                                short_by: role.min - assigned,
                            });
                            break;
                        }
                    }
                }
            }

            // ===== 第二轮: 向 ideal 补齐 =====
            let mut exhausted: HashSet<&str> = HashSet::new();
            loop {
                let next = roles
                    .iter()
                    .filter(|r| !exhausted.contains(r.key.as_str()))
                    .filter(|r| book.count(date, &r.key) < r.ideal_count())
                    .max_by(|a, b| {
                        let deficit_a = a.ideal_count() - book.count(date, &a.key);
                        let deficit_b = b.ideal_count() - book.count(date, &b.key);
                        // 缺额相同时保持岗位顺序（max_by 取最后一个，因此反向比较顺序）
                        deficit_a.cmp(&deficit_b).then_with(|| {
                            role_order(b).cmp(&role_order(a))
                        })
                    });

                let Some(role) = next else { break };

                match self.assign_one(input, &tuning, meal_break_hours, date, role, &mut book) {
                    Some(shift) => shifts.push(shift),
                    None => {
                        exhausted.insert(role.key.as_str());
                    }
                }
            }

            for role in &roles {
                let assigned = book.count(date, &role.key);
                if assigned < role.ideal_count() {
                    ideal_shortfalls.push(IdealShortfall {
                        date,
                        role: role.key.clone(),
                        ideal: role.ideal_count(),
                        assigned,
                    });
                }
            }
        }

        shifts.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| a.role.cmp(&b.role))
                .then_with(|| a.employee_id.cmp(&b.employee_id))
        });

        info!(
            shifts = shifts.len(),
            gaps = gaps.len(),
            ideal_shortfalls = ideal_shortfalls.len(),
            "排班求解完成"
        );

        ScheduleDraft {
            outlet_id: input.outlet_id.clone(),
            tier_used: tier.clone(),
            forecast,
            shifts,
            gaps,
            ideal_shortfalls,
            brigade: Vec::new(),
        }
    }

    // ==========================================
    // 内部方法
    // ==========================================

    /// 为 (date, role) 分配一个成本最低的合格员工
    fn assign_one(
        &self,
        input: &ScheduleInput,
        tuning: &SolverTuning,
        meal_break_hours: f64,
        date: NaiveDate,
        role: &RoleRequirement,
        book: &mut AssignmentBook,
    ) -> Option<Shift> {
        let window = SlotWindow::for_role(date, role);

        let best = input
            .employees
            .iter()
            .filter_map(|employee| {
                match check_eligibility(employee, &role.key, window.start, window.end, book) {
                    Ok(()) => Some((assignment_cost(employee, role, &window, tuning), employee)),
                    Err(reason) => {
                        debug!(employee_id = %employee.id, role = %role.key, reason = %reason, "员工不合格");
                        None
                    }
                }
            })
            .min_by(|(cost_a, a), (cost_b, b)| {
                cost_a.total_cmp(cost_b).then_with(|| a.id.cmp(&b.id))
            })?;

        let (cost, employee) = best;
        let seq = book.count(date, &role.key) + 1;
        let shift = Shift {
            id: format!(
                "S-{}-{}-{}-{:02}",
                input.outlet_id,
                date.format("%Y%m%d"),
                role.key,
                seq
            ),
            employee_id: employee.id.clone(),
            role: role.key.clone(),
            start: window.start,
            end: window.end,
            outlet_id: input.outlet_id.clone(),
            meal_break: role.shift_hours() >= meal_break_hours,
            locked: false,
        };
        book.record(&shift);

        debug!(
            date = %date,
            role = %role.key,
            employee_id = %employee.id,
            cost,
            "分配班次"
        );
        Some(shift)
    }
}

impl Default for OptimizationSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// 岗位求解顺序键: (min, key)
fn role_order(role: &RoleRequirement) -> (u32, &str) {
    (role.min, role.key.as_str())
}

fn ordered_roles(tier: &ForecastTier) -> Vec<&RoleRequirement> {
    let mut roles: Vec<&RoleRequirement> = tier.roles.iter().collect();
    roles.sort_by(|a, b| role_order(a).cmp(&role_order(b)));
    roles
}

/// 分配成本 = 岗位时薪 × 班次时长 - 偏好奖励 + 回避日惩罚
fn assignment_cost(
    employee: &Employee,
    role: &RoleRequirement,
    window: &SlotWindow,
    tuning: &SolverTuning,
) -> f64 {
    let wage = employee.wage_for(&role.key).unwrap_or(0.0);
    let mut cost = wage * role.shift_hours();
    if employee.prefers_role(&role.key) {
        cost -= tuning.preferred_role_bonus;
    }
    if employee.avoids_day(window.start) {
        cost += tuning.avoid_day_penalty;
    }
    cost
}
