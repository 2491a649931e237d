// ==========================================
// 餐饮人力排班系统 - 排班 API
// ==========================================
// 职责: 串联 CRM 取数 → 需求聚合 → 客流预测 → 排班内核 → 事件发布
// 说明: CRM 拉取在流水线之外完成；内核本身为纯计算
// 红线: 输入校验失败直接返回 ApiError::Validation，不产出部分结果
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::PipelineConfigReader;
use crate::domain::demand::{DemandBundle, PastryDemand, PastryItemSpec, ProductionOrder};
use crate::domain::employee::Employee;
use crate::domain::input::ScheduleInput;
use crate::domain::schedule::{Forecast, ScheduleResult, Shift};
use crate::domain::staffing::ForecastTier;
use crate::domain::workload::{AggregatorFailure, UnifiedWorkload};
use crate::engine::events::{OptionalEventPublisher, ScheduleEvent, ScheduleEventPublisher};
use crate::engine::forecast::ForecastEngine;
use crate::engine::forecast_orchestrator::GlobalForecastOrchestrator;
use crate::engine::kernel::SchedulerKernel;
use crate::importer::CrmClient;

// ==========================================
// 请求/响应
// ==========================================

/// 排班请求（CRM 订单由 ScheduleApi 自行拉取）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub outlet_id: String,
    pub service_dates: Vec<NaiveDate>,
    pub tiers: Vec<ForecastTier>,
    pub employees: Vec<Employee>,
    /// 排班周期预测营收（成本率分母）
    pub sales_forecast: f64,
    #[serde(default)]
    pub avg_check_per_cover: Option<f64>,
    #[serde(default)]
    pub locked_shifts: Vec<Shift>,
    #[serde(default)]
    pub pastry: Vec<PastryDemand>,
    #[serde(default)]
    pub pastry_specs: Vec<PastryItemSpec>,
    #[serde(default)]
    pub production: Vec<ProductionOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub run_id: String,
    pub result: ScheduleResult,
    /// 降级的聚合器（零贡献）
    pub aggregator_failures: Vec<AggregatorFailure>,
}

// ==========================================
// ScheduleApi
// ==========================================
pub struct ScheduleApi<S, C>
where
    S: CrmClient,
    C: PipelineConfigReader,
{
    crm: Arc<S>,
    config: Arc<C>,
    kernel: SchedulerKernel,
    forecast: ForecastEngine,
    event_publisher: OptionalEventPublisher,
}

impl<S, C> ScheduleApi<S, C>
where
    S: CrmClient,
    C: PipelineConfigReader,
{
    pub fn new(crm: Arc<S>, config: Arc<C>, event_publisher: Option<Arc<dyn ScheduleEventPublisher>>) -> Self {
        let event_publisher = match event_publisher {
            Some(p) => OptionalEventPublisher::with_publisher(p),
            None => OptionalEventPublisher::none(),
        };
        Self {
            crm,
            config,
            kernel: SchedulerKernel::new(),
            forecast: ForecastEngine::new(),
            event_publisher,
        }
    }

    /// 生成排班
    ///
    /// # 流程
    /// 1. 并发拉取 BEO / REO（REO 只保留本门店）
    /// 2. 读取规则、策略、工时系数、求解器调参
    /// 3. 全局预测编排器聚合四类需求
    /// 4. 取排班周期内客流峰值日作为预测
    /// 5. 组装 ScheduleInput 并运行排班内核
    /// 6. 发布 ScheduleEvaluated 事件（失败只告警）
    #[instrument(skip(self, request), fields(
        outlet_id = %request.outlet_id,
        dates = request.service_dates.len()
    ))]
    pub async fn build_schedule(&self, request: ScheduleRequest) -> ApiResult<ScheduleResponse> {
        if request.service_dates.is_empty() {
            return Err(ApiError::InvalidInput("service_dates 不能为空".to_string()));
        }

        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, "开始生成排班");

        // ===== 1. CRM 取数 =====
        let (beos, reos) = tokio::try_join!(self.crm.fetch_beos(), self.crm.fetch_reos())?;
        let reos: Vec<_> = reos
            .into_iter()
            .filter(|r| r.outlet_id == request.outlet_id)
            .collect();

        // ===== 2. 配置 =====
        let factors = self.config.get_complexity_factors().await?;
        let rules = self.config.get_rule_set().await?;
        let policies = self.config.get_gate_policy().await?;
        let solver = self.config.get_solver_tuning().await?;

        // ===== 3. 需求聚合 =====
        let demand = DemandBundle {
            beos,
            reos,
            pastry: request.pastry,
            pastry_specs: request.pastry_specs,
            production: request.production,
        };
        let workload = GlobalForecastOrchestrator::new(factors).run(demand).await;
        if workload.is_degraded() {
            warn!(failures = workload.failures().len(), "部分聚合器降级为零工作量");
        }

        // ===== 4. 客流预测 =====
        let forecast = self.peak_forecast(
            &workload,
            &request.service_dates,
            request.sales_forecast,
            request.avg_check_per_cover,
        );

        let pastry_batches = workload
            .pastry_batches()
            .iter()
            .filter(|b| request.service_dates.contains(&b.date))
            .cloned()
            .collect();

        // ===== 5. 排班内核 =====
        let input = ScheduleInput {
            outlet_id: request.outlet_id,
            service_dates: request.service_dates,
            tiers: request.tiers,
            employees: request.employees,
            forecast,
            rules,
            sales_forecast: request.sales_forecast,
            policies: Some(policies),
            avg_check_per_cover: request.avg_check_per_cover,
            locked_shifts: request.locked_shifts,
            pastry_batches,
            solver: Some(solver),
        };
        let result = self.kernel.run(&input)?;

        // ===== 6. 事件发布 =====
        let date_range = match (input.service_dates.iter().min(), input.service_dates.iter().max()) {
            (Some(from), Some(to)) => Some((*from, *to)),
            _ => None,
        };
        let event = ScheduleEvent::evaluated(
            run_id.clone(),
            input.outlet_id.clone(),
            date_range,
            result.publishable,
            result.checked.compliance.hard_count(),
            result.gaps().len(),
        );
        if let Err(e) = self.event_publisher.publish(event) {
            warn!(run_id = %run_id, error = %e, "排班事件发布失败");
        }

        info!(run_id = %run_id, publishable = result.publishable, "排班生成完成");

        Ok(ScheduleResponse {
            run_id,
            result,
            aggregator_failures: workload.failures().to_vec(),
        })
    }

    /// 排班周期内客流峰值日的预测（营收按天均摊用于客流下限）
    fn peak_forecast(
        &self,
        workload: &UnifiedWorkload,
        dates: &[NaiveDate],
        sales_forecast: f64,
        avg_check_per_cover: Option<f64>,
    ) -> Forecast {
        let daily_sales = sales_forecast / dates.len().max(1) as f64;
        dates
            .iter()
            .map(|date| {
                self.forecast
                    .compute_from_workload(workload, *date, daily_sales, avg_check_per_cover)
            })
            .max_by_key(|f| f.covers)
            .unwrap_or(Forecast {
                covers: 0,
                sales: daily_sales,
            })
    }
}
