// ==========================================
// 餐饮人力排班系统 - 排班输入契约
// ==========================================
// 职责: ScheduleInput，内核运行前需通过 ScheduleInputValidator 校验
// ==========================================

use crate::domain::employee::Employee;
use crate::domain::rules::{GatePolicy, RuleSet, SolverTuning};
use crate::domain::schedule::{Forecast, Shift};
use crate::domain::staffing::ForecastTier;
use crate::domain::workload::PastryBatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub outlet_id: String,
    /// 需要排班的营业日（至少一天）
    pub service_dates: Vec<NaiveDate>,
    pub tiers: Vec<ForecastTier>,
    pub employees: Vec<Employee>,
    pub forecast: Forecast,
    pub rules: RuleSet,
    /// 成本占比的分母（预测营收）
    pub sales_forecast: f64,
    #[serde(default)]
    pub policies: Option<GatePolicy>,
    /// 历史客单价，用于由营收反推客流下限
    #[serde(default)]
    pub avg_check_per_cover: Option<f64>,
    /// 人工锁定班次
    #[serde(default)]
    pub locked_shifts: Vec<Shift>,
    /// 西点批次（由 PastryAggregator 产出）
    #[serde(default)]
    pub pastry_batches: Vec<PastryBatch>,
    #[serde(default)]
    pub solver: Option<SolverTuning>,
}

impl ScheduleInput {
    pub fn policies_or_default(&self) -> GatePolicy {
        self.policies.unwrap_or_default()
    }

    pub fn solver_or_default(&self) -> SolverTuning {
        self.solver.unwrap_or_default()
    }

    /// 本门店的档位
    pub fn outlet_tiers(&self) -> Vec<ForecastTier> {
        self.tiers
            .iter()
            .filter(|t| t.outlet_id == self.outlet_id)
            .cloned()
            .collect()
    }

    pub fn find_employee(&self, employee_id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == employee_id)
    }
}
