// ==========================================
// 餐饮人力排班系统 - 发布闸门 (Phoenix Gate)
// ==========================================
// 职责: 综合合规与成本策略给出是否可发布的最终判定
// 检查项:
// 1) compliance_hard_violations: hard 违规数为 0       (阻断)
// 2) labor_cost_pct: 成本率 <= max_labor_pct           (阻断)
// 3) staffing_gaps: 最低编制缺口                        (按策略决定是否阻断)
// 红线: 每项检查都必须出现在 report 中，不得只返回布尔值
// ==========================================

use crate::domain::rules::GatePolicy;
use crate::domain::schedule::{GateEntry, GateOutcome, LaborCost, ScheduleChecked};
use crate::domain::types::GateCheck;
use tracing::{info, instrument};

pub struct PhoenixGate;

impl PhoenixGate {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, fields(outlet_id = %checked.draft.outlet_id))]
    pub fn evaluate(&self, checked: &ScheduleChecked, costs: &LaborCost, policies: &GatePolicy) -> GateOutcome {
        let hard = checked.compliance.hard_count();
        let soft = checked.compliance.soft_count();
        let short_by: u32 = checked.draft.gaps.iter().map(|g| g.short_by).sum();

        let report = vec![
            GateEntry {
                check: GateCheck::ComplianceHardViolations,
                ok: hard == 0,
                blocking: true,
                detail: format!("hard={} soft={}", hard, soft),
            },
            GateEntry {
                check: GateCheck::LaborCostPct,
                ok: costs.pct <= policies.max_labor_pct,
                blocking: true,
                detail: format!(
                    "pct={:.2}% max={:.2}% total={:.2}",
                    costs.pct, policies.max_labor_pct, costs.total
                ),
            },
            GateEntry {
                check: GateCheck::StaffingGaps,
                ok: checked.draft.gaps.is_empty(),
                blocking: policies.block_on_staffing_gaps,
                detail: format!("gaps={} short_by={}", checked.draft.gaps.len(), short_by),
            },
        ];

        let ok = report.iter().all(|e| e.ok || !e.blocking);

        info!(
            ok,
            failed = report.iter().filter(|e| !e.ok).count(),
            "发布闸门判定完成"
        );

        GateOutcome { ok, report }
    }
}

impl Default for PhoenixGate {
    fn default() -> Self {
        Self::new()
    }
}
