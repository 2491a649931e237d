// ==========================================
// 餐饮人力排班系统 - 全局预测编排器
// ==========================================
// 职责: 并发运行各需求聚合器（fan-out），按日期求和合并（fan-in）
// 红线: 单个聚合器失败不影响其他聚合器，失败来源记零贡献并记录原因
// ==========================================

use crate::domain::demand::DemandBundle;
use crate::domain::rules::ComplexityFactors;
use crate::domain::workload::{UnifiedWorkload, WorkloadBuilder};
use crate::engine::aggregator::{
    BanquetAggregator, DemandAggregator, PastryAggregator, ProductionAggregator,
    RestaurantAggregator,
};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// GlobalForecastOrchestrator
// ==========================================
pub struct GlobalForecastOrchestrator {
    aggregators: Vec<Arc<dyn DemandAggregator>>,
}

impl GlobalForecastOrchestrator {
    /// 使用四个标准聚合器创建编排器
    pub fn new(factors: ComplexityFactors) -> Self {
        Self::with_aggregators(vec![
            Arc::new(BanquetAggregator::new(factors)),
            Arc::new(RestaurantAggregator::new(factors)),
            Arc::new(PastryAggregator::new()),
            Arc::new(ProductionAggregator::new()),
        ])
    }

    /// 使用自定义聚合器集合创建编排器
    pub fn with_aggregators(aggregators: Vec<Arc<dyn DemandAggregator>>) -> Self {
        Self { aggregators }
    }

    /// 并发聚合全部需求，返回冻结的 UnifiedWorkload
    ///
    /// 聚合器之间不共享可写状态；结果按来源固定顺序合并，
    /// 同一输入多次运行得到完全一致的输出。
    #[instrument(skip(self, demand), fields(
        aggregators = self.aggregators.len(),
        beos = demand.beos.len(),
        reos = demand.reos.len(),
        pastry = demand.pastry.len(),
        production = demand.production.len()
    ))]
    pub async fn run(&self, demand: DemandBundle) -> UnifiedWorkload {
        let demand = Arc::new(demand);

        let tasks = self.aggregators.iter().map(|aggregator| {
            let aggregator = Arc::clone(aggregator);
            let demand = Arc::clone(&demand);
            let source = aggregator.source();
            let handle = tokio::spawn(async move { aggregator.aggregate(&demand) });
            async move { (source, handle.await) }
        });

        let results = join_all(tasks).await;

        let mut builder = WorkloadBuilder::new();
        for (source, joined) in results {
            match joined {
                Ok(Ok(partial)) => {
                    info!(
                        source = %source,
                        records = demand.record_count(source),
                        days = partial.days.len(),
                        "聚合器完成"
                    );
                    builder.push(partial);
                }
                Ok(Err(e)) => {
                    warn!(source = %source, error = %e, "聚合器失败，按零工作量降级");
                    builder.record_failure(source, e.to_string());
                }
                Err(join_err) => {
                    warn!(source = %source, error = %join_err, "聚合器任务异常终止，按零工作量降级");
                    builder.record_failure(source, format!("聚合任务异常终止: {}", join_err));
                }
            }
        }

        let workload = builder.build();
        info!(
            days = workload.days().len(),
            pastry_batches = workload.pastry_batches().len(),
            failures = workload.failures().len(),
            "全局工作量合并完成"
        );
        workload
    }
}
