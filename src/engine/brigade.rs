// ==========================================
// 餐饮人力排班系统 - 西点班组技能分配
// ==========================================
// 职责: 对西点批次的每道工序，标注当日已排班且技能匹配的员工
// 规则: 员工岗位 ∩ 工序 skill_tags 非空即视为合格；
//       工序未声明 skill_tags 时当日在岗员工均合格
// 红线: 不新增、不删除班次，只写 ScheduleDraft.brigade
// 红线: 无人合格的工序标记 unassigned，不得静默丢弃
// ==========================================

use crate::domain::employee::Employee;
use crate::domain::schedule::ScheduleDraft;
use crate::domain::workload::PastryBatch;
use std::collections::BTreeSet;
use tracing::{info, warn};

pub struct BrigadeSkillAllocator;

impl BrigadeSkillAllocator {
    pub fn new() -> Self {
        Self
    }

    /// 为草案标注西点工序分配
    pub fn annotate(
        &self,
        mut draft: ScheduleDraft,
        batches: &[PastryBatch],
        employees: &[Employee],
    ) -> ScheduleDraft {
        let mut annotated = Vec::with_capacity(batches.len());
        let mut unassigned_stages = 0usize;

        for batch in batches {
            let on_duty: BTreeSet<&str> = draft
                .shifts
                .iter()
                .filter(|s| s.service_date() == batch.date)
                .map(|s| s.employee_id.as_str())
                .collect();

            let mut batch = batch.clone();
            for stage in &mut batch.stage_breakdown {
                let qualified: Vec<String> = employees
                    .iter()
                    .filter(|e| on_duty.contains(e.id.as_str()))
                    .filter(|e| stage.skill_tags.is_empty() || !e.roles.is_disjoint(&stage.skill_tags))
                    .map(|e| e.id.clone())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();

                stage.unassigned = qualified.is_empty();
                if stage.unassigned {
                    unassigned_stages += 1;
                    warn!(
                        demand_id = %batch.demand_id,
                        stage = %stage.stage,
                        date = %batch.date,
                        "西点工序无合格在岗员工"
                    );
                }
                stage.assigned_to = qualified;
            }
            annotated.push(batch);
        }

        info!(
            batches = annotated.len(),
            unassigned_stages,
            "西点班组分配完成"
        );

        draft.brigade = annotated;
        draft
    }
}

impl Default for BrigadeSkillAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::Preferences;
    use crate::domain::schedule::{Forecast, Shift};
    use crate::domain::staffing::ForecastTier;
    use crate::domain::workload::StageAssignment;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn employee(id: &str, roles: &[&str]) -> Employee {
        Employee {
            id: id.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            wage_by_role: BTreeMap::new(),
            availability: vec![],
            other_job_blocks: vec![],
            preferences: Preferences::default(),
        }
    }

    fn shift(employee_id: &str, role: &str) -> Shift {
        let start = date().and_hms_opt(5, 0, 0).unwrap();
        Shift {
            id: format!("S-{}", employee_id),
            employee_id: employee_id.to_string(),
            role: role.to_string(),
            start,
            end: start + chrono::Duration::hours(8),
            outlet_id: "OUT1".to_string(),
            meal_break: true,
            locked: false,
        }
    }

    fn stage(name: &str, tags: &[&str]) -> StageAssignment {
        StageAssignment {
            stage: name.to_string(),
            skill_tags: tags.iter().map(|t| t.to_string()).collect(),
            active_minutes: 30.0,
            passive_minutes: 0.0,
            assigned_to: vec![],
            unassigned: false,
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

    #[test]
    fn test_assigns_only_scheduled_and_skilled_employees() {
        let employees = vec![
            employee("E1", &["pastry", "viennoiserie"]),
            employee("E2", &["pastry"]),
            employee("E3", &["viennoiserie"]), // 未排班
        ];
        let batches = vec![PastryBatch {
            demand_id: "P1".to_string(),
            item_id: "croissant".to_string(),
            date: date(),
            batch_count: 2,
            stage_breakdown: vec![
                stage("lamination", &["viennoiserie"]),
                stage("decorate", &["chocolatier"]),
                stage("cool", &[]),
            ],
        }];
        let draft = draft(vec![shift("E1", "pastry"), shift("E2", "pastry")]);
        let shift_count = draft.shifts.len();

        let result = BrigadeSkillAllocator::new().annotate(draft, &batches, &employees);

        assert_eq!(result.shifts.len(), shift_count, "不得增删班次");
        let stages = &result.brigade[0].stage_breakdown;
        assert_eq!(stages[0].assigned_to, vec!["E1".to_string()]);
        assert!(!stages[0].unassigned);
        assert!(stages[1].assigned_to.is_empty());
        assert!(stages[1].unassigned, "无人合格的工序必须标记");
        assert_eq!(stages[2].assigned_to, vec!["E1".to_string(), "E2".to_string()]);
    }
}
