use super::OptimizationSolver;
use crate::domain::employee::{Employee, Preferences, TimeWindow};
use crate::domain::input::ScheduleInput;
use crate::domain::rules::RuleSet;
use crate::domain::schedule::{Forecast, Shift};
use crate::domain::staffing::{ForecastTier, RoleRequirement};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use std::collections::BTreeSet;

// ==========================================
// 测试辅助函数
// ==========================================

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
    d(day).and_hms_opt(hour, 0, 0).unwrap()
}

fn role(key: &str, min: u32, ideal: Option<u32>, start: u32, end: u32) -> RoleRequirement {
    RoleRequirement {
        key: key.to_string(),
        min,
        ideal,
        default_in: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
        default_out: NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
        combinable_with: vec![],
    }
}

fn tier(roles: Vec<RoleRequirement>) -> ForecastTier {
    ForecastTier {
        id: "A".to_string(),
        outlet_id: "OUT1".to_string(),
        covers_min: 0,
        covers_max: 50,
        roles,
    }
}

fn employee(id: &str, wages: &[(&str, f64)]) -> Employee {
    Employee {
        id: id.to_string(),
        roles: wages.iter().map(|(r, _)| r.to_string()).collect(),
        wage_by_role: wages.iter().map(|(r, w)| (r.to_string(), *w)).collect(),
        availability: vec![],
        other_job_blocks: vec![],
        preferences: Preferences::default(),
    }
}

fn input(dates: Vec<NaiveDate>, tier: &ForecastTier, employees: Vec<Employee>) -> ScheduleInput {
    ScheduleInput {
        outlet_id: "OUT1".to_string(),
        service_dates: dates,
        tiers: vec![tier.clone()],
        employees,
        forecast: Forecast {
            covers: 30,
            sales: 2000.0,
        },
        rules: RuleSet::default(),
        sales_forecast: 2000.0,
        policies: None,
        avg_check_per_cover: None,
        locked_shifts: vec![],
        pastry_batches: vec![],
        solver: None,
    }
}

fn forecast() -> Forecast {
    Forecast {
        covers: 30,
        sales: 2000.0,
    }
}

fn assert_no_overlaps(shifts: &[Shift]) {
    for (i, a) in shifts.iter().enumerate() {
        for b in shifts.iter().skip(i + 1) {
            if a.employee_id == b.employee_id {
                assert!(
                    !(a.start < b.end && b.start < a.end),
                    "员工 {} 班次重叠: {} / {}",
                    a.employee_id,
                    a.id,
                    b.id
                );
            }
        }
    }
}

// ==========================================
// 正常案例
// ==========================================

#[test]
fn test_single_eligible_employee_leaves_gap() {
    let t = tier(vec![role("server", 2, None, 10, 16)]);
    let inp = input(vec![d(2)], &t, vec![employee("E1", &[("server", 20.0)])]);

    let draft = OptimizationSolver::new().solve(&inp, &t, forecast());

    assert_eq!(draft.shifts.len(), 1);
    assert_eq!(draft.shifts[0].employee_id, "E1");
    assert_eq!(draft.gaps.len(), 1);
    assert_eq!(draft.gaps[0].role, "server");
    assert_eq!(draft.gaps[0].assigned, 1);
    assert_eq!(draft.gaps[0].short_by, 1);
}

#[test]
fn test_lowest_cost_employee_wins_and_ties_break_by_id() {
    let t = tier(vec![role("server", 1, None, 10, 16)]);
    let inp = input(
        vec![d(2)],
        &t,
        vec![
            employee("E3", &[("server", 18.0)]),
            employee("E2", &[("server", 15.0)]),
            employee("E1", &[("server", 15.0)]),
        ],
    );

    let draft = OptimizationSolver::new().solve(&inp, &t, forecast());
    assert_eq!(draft.shifts.len(), 1);
    assert_eq!(draft.shifts[0].employee_id, "E1");
    assert!(draft.gaps.is_empty());
}

#[test]
fn test_preference_bonus_can_flip_choice() {
    let t = tier(vec![role("server", 1, None, 10, 16)]);
    let mut fan = employee("E2", &[("server", 16.0)]);
    fan.preferences.preferred_roles = BTreeSet::from(["server".to_string()]);
    // E1: 15*6 = 90; E2: 16*6 - 5 = 91 → E1
    let inp = input(vec![d(2)], &t, vec![employee("E1", &[("server", 15.0)]), fan.clone()]);
    let draft = OptimizationSolver::new().solve(&inp, &t, forecast());
    assert_eq!(draft.shifts[0].employee_id, "E1");

    // 加大奖励后翻转
    let mut inp = input(vec![d(2)], &t, vec![employee("E1", &[("server", 15.0)]), fan]);
    inp.solver = Some(crate::domain::rules::SolverTuning {
        preferred_role_bonus: 20.0,
        avoid_day_penalty: 10.0,
    });
    let draft = OptimizationSolver::new().solve(&inp, &t, forecast());
    assert_eq!(draft.shifts[0].employee_id, "E2");
}

#[test]
fn test_avoid_day_penalty_applies_on_matching_weekday() {
    let t = tier(vec![role("server", 1, None, 10, 16)]);
    let mut reluctant = employee("E1", &[("server", 15.0)]);
    // 2026-03-02 是周一
    reluctant.preferences.avoid_weekdays = vec![Weekday::Mon];
    let inp = input(vec![d(2)], &t, vec![reluctant, employee("E2", &[("server", 16.0)])]);

    let draft = OptimizationSolver::new().solve(&inp, &t, forecast());
    // E1: 90 + 10 = 100; E2: 96
    assert_eq!(draft.shifts[0].employee_id, "E2");
}

#[test]
fn test_availability_and_other_jobs_exclude_employees() {
    let t = tier(vec![role("cook", 3, None, 8, 14)]);
    let mut narrow = employee("E1", &[("cook", 10.0)]);
    narrow.availability = vec![TimeWindow::new(at(2, 9), at(2, 14))];
    let mut moonlighter = employee("E2", &[("cook", 10.0)]);
    moonlighter.other_job_blocks = vec![TimeWindow::new(at(2, 13), at(2, 18))];
    let mut wide = employee("E3", &[("cook", 30.0)]);
    wide.availability = vec![TimeWindow::new(at(2, 6), at(2, 22))];

    let inp = input(vec![d(2)], &t, vec![narrow, moonlighter, wide]);
    let draft = OptimizationSolver::new().solve(&inp, &t, forecast());

    assert_eq!(draft.shifts.len(), 1);
    assert_eq!(draft.shifts[0].employee_id, "E3");
    assert_eq!(draft.gaps[0].short_by, 2);
}

#[test]
fn test_most_constrained_role_is_filled_first() {
    // E1 对两个岗位都最便宜；按 min 升序，E1 先被 host (min=1) 占用
    let t = tier(vec![role("server", 2, None, 10, 16), role("host", 1, None, 10, 16)]);
    let inp = input(
        vec![d(2)],
        &t,
        vec![
            employee("E1", &[("server", 10.0), ("host", 10.0)]),
            employee("E2", &[("server", 20.0)]),
            employee("E3", &[("server", 21.0)]),
        ],
    );

    let draft = OptimizationSolver::new().solve(&inp, &t, forecast());
    let host: Vec<_> = draft.shifts.iter().filter(|s| s.role == "host").collect();
    let servers: Vec<_> = draft.shifts.iter().filter(|s| s.role == "server").collect();

    assert_eq!(host.len(), 1);
    assert_eq!(host[0].employee_id, "E1");
    assert_eq!(servers.len(), 2);
    assert!(draft.gaps.is_empty());
}

#[test]
fn test_second_pass_raises_toward_ideal_most_understaffed_first() {
    let t = tier(vec![
        role("server", 1, Some(4), 10, 16),
        role("busser", 1, Some(2), 10, 16),
    ]);
    let employees = (1..=4)
        .map(|i| employee(&format!("E{}", i), &[("server", 15.0), ("busser", 15.0)]))
        .collect();
    let inp = input(vec![d(2)], &t, employees);

    let draft = OptimizationSolver::new().solve(&inp, &t, forecast());
    let count = |r: &str| draft.shifts.iter().filter(|s| s.role == r).count();

    // 第一轮: busser 1, server 1; 第二轮: server 缺 3 > busser 缺 1 → server 连补两人
    assert_eq!(count("server"), 3);
    assert_eq!(count("busser"), 1);
    assert!(draft.gaps.is_empty());
    assert_eq!(draft.ideal_shortfalls.len(), 2);
}

#[test]
fn test_one_shift_per_employee_per_day_across_multiple_days() {
    let t = tier(vec![role("server", 2, Some(3), 10, 16), role("cook", 1, None, 7, 15)]);
    let employees = vec![
        employee("E1", &[("server", 15.0), ("cook", 18.0)]),
        employee("E2", &[("server", 16.0)]),
        employee("E3", &[("cook", 17.0), ("server", 14.0)]),
    ];
    let inp = input(vec![d(4), d(2), d(3)], &t, employees);

    let draft = OptimizationSolver::new().solve(&inp, &t, forecast());

    for day in [d(2), d(3), d(4)] {
        let on_day: Vec<_> = draft
            .shifts
            .iter()
            .filter(|s| s.service_date() == day)
            .collect();
        let people: BTreeSet<_> = on_day.iter().map(|s| s.employee_id.as_str()).collect();
        assert_eq!(on_day.len(), people.len(), "同一天员工不得重复排班");
        assert_eq!(on_day.len(), 3);
    }
    assert_no_overlaps(&draft.shifts);
    assert!(draft.shifts.iter().all(|s| t.role(&s.role).is_some()));
}

#[test]
fn test_overnight_locked_shift_blocks_next_morning_overlap() {
    let t = tier(vec![role("baker", 1, None, 4, 12)]);
    let mut inp = input(
        vec![d(3)],
        &t,
        vec![
            employee("E1", &[("baker", 10.0)]),
            employee("E2", &[("baker", 25.0)]),
        ],
    );
    // E1 前一晚 22:00 → 次日 06:00 的锁定班次
    inp.locked_shifts = vec![Shift {
        id: "L1".to_string(),
        employee_id: "E1".to_string(),
        role: "baker".to_string(),
        start: at(2, 22),
        end: at(3, 6),
        outlet_id: "OUT1".to_string(),
        meal_break: true,
        locked: true,
    }];

    let draft = OptimizationSolver::new().solve(&inp, &t, forecast());
    let new_shift = draft.shifts.iter().find(|s| !s.locked).unwrap();

    assert_eq!(new_shift.employee_id, "E2");
    assert!(draft.shifts.iter().any(|s| s.id == "L1"));
    assert_no_overlaps(&draft.shifts);
}

#[test]
fn test_locked_shift_counts_toward_role_minimum() {
    let t = tier(vec![role("server", 1, None, 10, 16)]);
    let mut inp = input(vec![d(2)], &t, vec![employee("E1", &[("server", 20.0)])]);
    inp.locked_shifts = vec![Shift {
        id: "L1".to_string(),
        employee_id: "E1".to_string(),
        role: "server".to_string(),
        start: at(2, 10),
        end: at(2, 16),
        outlet_id: "OUT1".to_string(),
        meal_break: true,
        locked: true,
    }];

    let draft = OptimizationSolver::new().solve(&inp, &t, forecast());
    assert_eq!(draft.shifts.len(), 1);
    assert!(draft.shifts[0].locked);
    assert!(draft.gaps.is_empty());
}

#[test]
fn test_meal_break_flag_follows_rule_threshold() {
    let t = tier(vec![role("server", 1, None, 10, 16), role("host", 1, None, 11, 15)]);
    let inp = input(
        vec![d(2)],
        &t,
        vec![employee("E1", &[("server", 20.0)]), employee("E2", &[("host", 20.0)])],
    );
    let draft = OptimizationSolver::new().solve(&inp, &t, forecast());

    let server = draft.shifts.iter().find(|s| s.role == "server").unwrap();
    let host = draft.shifts.iter().find(|s| s.role == "host").unwrap();
    assert!(server.meal_break, "6 小时班次应含用餐休息");
    assert!(!host.meal_break, "4 小时班次无需用餐休息");
}

#[test]
fn test_solver_is_deterministic() {
    let t = tier(vec![role("server", 2, Some(3), 10, 16)]);
    let employees: Vec<Employee> = (1..=5)
        .map(|i| employee(&format!("E{}", i), &[("server", 15.0)]))
        .collect();
    let inp = input(vec![d(2), d(3)], &t, employees);

    let a = OptimizationSolver::new().solve(&inp, &t, forecast());
    let b = OptimizationSolver::new().solve(&inp, &t, forecast());
    assert_eq!(a, b);
}
