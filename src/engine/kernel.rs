// ==========================================
// 餐饮人力排班系统 - 排班内核
// ==========================================
// 用途: 按固定顺序串联各阶段，产出 ScheduleResult
// 流程: 输入校验 → 预测 → 档位解析 → 求解 → 西点班组 → 合规 → 成本 → 闸门
// 红线: 输入校验失败整体中止，不返回部分结果
// 红线: 求解不可行、合规与成本问题一律作为数据返回
// ==========================================

use crate::domain::input::ScheduleInput;
use crate::domain::schedule::ScheduleResult;
use crate::engine::brigade::BrigadeSkillAllocator;
use crate::engine::compliance::ComplianceKernel;
use crate::engine::error::{PipelineError, PipelineResult};
use crate::engine::forecast::{ForecastEngine, ForecastSignal};
use crate::engine::gate::PhoenixGate;
use crate::engine::input_validator::ScheduleInputValidator;
use crate::engine::optimizer::OptimizationSolver;
use crate::engine::position_matrix::PositionMatrixEngine;
use crate::engine::theory_cost::TheoryCost;
use tracing::{debug, info, instrument};

// ==========================================
// SchedulerKernel - 排班内核
// ==========================================
// 无状态；每次 run 独立，可在多个任务间共享
pub struct SchedulerKernel {
    forecast: ForecastEngine,
    matrix: PositionMatrixEngine,
    solver: OptimizationSolver,
    brigade: BrigadeSkillAllocator,
    compliance: ComplianceKernel,
    gate: PhoenixGate,
}

impl SchedulerKernel {
    pub fn new() -> Self {
        Self {
            forecast: ForecastEngine::new(),
            matrix: PositionMatrixEngine::new(),
            solver: OptimizationSolver::new(),
            brigade: BrigadeSkillAllocator::new(),
            compliance: ComplianceKernel::new(),
            gate: PhoenixGate::new(),
        }
    }

    /// 执行一次完整排班
    ///
    /// # 返回
    /// - `Ok(ScheduleResult)`: 含缺口、违规与闸门报告的完整结果
    /// - `Err(PipelineError::Validation)`: 输入不合法（列出全部违规字段）
    #[instrument(skip(self, input), fields(
        outlet_id = %input.outlet_id,
        dates = input.service_dates.len()
    ))]
    pub fn run(&self, input: &ScheduleInput) -> PipelineResult<ScheduleResult> {
        info!(
            tiers = input.tiers.len(),
            employees = input.employees.len(),
            locked_shifts = input.locked_shifts.len(),
            "开始执行排班流程"
        );

        // ==========================================
        // 步骤0: 输入校验
        // ==========================================
        ScheduleInputValidator::validate(input)?;

        // ==========================================
        // 步骤1: Forecast Engine - 客流预测
        // ==========================================
        debug!("步骤1: 计算客流预测");
        let forecast = self.forecast.compute(&ForecastSignal {
            guest_count: u64::from(input.forecast.covers),
            sales: input.forecast.sales,
            avg_check_per_cover: input.avg_check_per_cover,
        });
        info!(covers = forecast.covers, sales = forecast.sales, "客流预测完成");

        // ==========================================
        // 步骤2: Position Matrix Engine - 档位解析
        // ==========================================
        debug!("步骤2: 解析编制档位");
        let outlet_tiers = input.outlet_tiers();
        let tier = self
            .matrix
            .resolve(forecast.covers, &outlet_tiers)
            .cloned()
            .ok_or_else(|| PipelineError::NoTier {
                outlet_id: input.outlet_id.clone(),
            })?;
        info!(tier_id = %tier.id, roles = tier.roles.len(), "编制档位解析完成");

        // ==========================================
        // 步骤3: Optimization Solver - 排班求解
        // ==========================================
        debug!("步骤3: 执行排班求解");
        let draft = self.solver.solve(input, &tier, forecast);

        // ==========================================
        // 步骤4: Brigade Skill Allocator - 西点工序标注
        // ==========================================
        debug!("步骤4: 标注西点工序");
        let draft = self
            .brigade
            .annotate(draft, &input.pastry_batches, &input.employees);

        // ==========================================
        // 步骤5: Compliance Kernel - 合规校验
        // ==========================================
        debug!("步骤5: 执行合规校验");
        let checked = self.compliance.validate(draft, &input.rules);

        // ==========================================
        // 步骤6: Theory Cost - 理论人工成本
        // ==========================================
        debug!("步骤6: 计算理论人工成本");
        let costs = TheoryCost::new(input.rules).compute(&checked, &input.employees, input.sales_forecast);

        // ==========================================
        // 步骤7: Phoenix Gate - 发布判定
        // ==========================================
        debug!("步骤7: 执行发布判定");
        let outcome = self.gate.evaluate(&checked, &costs, &input.policies_or_default());

        info!(
            shifts = checked.draft.shifts.len(),
            gaps = checked.draft.gaps.len(),
            violations = checked.compliance.violations.len(),
            pct = costs.pct,
            publishable = outcome.ok,
            "排班流程完成"
        );

        Ok(ScheduleResult {
            checked,
            costs,
            publishable: outcome.ok,
            gate_report: outcome.report,
        })
    }
}

impl Default for SchedulerKernel {
    fn default() -> Self {
        Self::new()
    }
}
