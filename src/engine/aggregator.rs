// ==========================================
// 餐饮人力排班系统 - 需求聚合器
// ==========================================
// 职责: 将单一需求来源归一化为按日期的工作量
// 输入: DemandBundle 中本来源的切片（只读）
// 输出: PartialWorkload（独立结果，合并在编排器中完成）
// 红线: 任一记录格式错误 → 本聚合器整体失败，由编排器降级为零贡献
// ==========================================

use crate::domain::demand::{DemandBundle, PastryDemand};
use crate::domain::rules::ComplexityFactors;
use crate::domain::types::{DemandSource, MenuComplexity};
use crate::domain::workload::{PartialWorkload, PastryBatch, StageAssignment};
use crate::engine::error::AggregateError;
use chrono::NaiveDate;
use std::collections::BTreeSet;

// ==========================================
// DemandAggregator Trait
// ==========================================
pub trait DemandAggregator: Send + Sync {
    /// 需求来源
    fn source(&self) -> DemandSource;

    /// 聚合本来源的需求记录
    fn aggregate(&self, demand: &DemandBundle) -> Result<PartialWorkload, AggregateError>;
}

fn malformed(source: DemandSource, record_id: &str, message: impl Into<String>) -> AggregateError {
    AggregateError::MalformedRecord {
        origin: source,
        record_id: record_id.to_string(),
        message: message.into(),
    }
}

/// 宴会/餐厅订单的公共累加逻辑
fn accumulate_guest_event(
    partial: &mut PartialWorkload,
    factors: &ComplexityFactors,
    date: NaiveDate,
    guest_count: u32,
    complexity: MenuComplexity,
    skills: &BTreeSet<String>,
) {
    let day = partial.day_mut(date);
    day.guest_count += u64::from(guest_count);
    day.hours_active += f64::from(guest_count) * factors.hours_per_guest(complexity);
    for skill in skills {
        *day.roles_required.entry(skill.clone()).or_insert(0) += 1;
    }
    day.skill_tags.extend(skills.iter().cloned());
}

// ==========================================
// BanquetAggregator - BEO 宴会订单
// ==========================================
pub struct BanquetAggregator {
    factors: ComplexityFactors,
}

impl BanquetAggregator {
    pub fn new(factors: ComplexityFactors) -> Self {
        Self { factors }
    }
}

impl DemandAggregator for BanquetAggregator {
    fn source(&self) -> DemandSource {
        DemandSource::Banquet
    }

    fn aggregate(&self, demand: &DemandBundle) -> Result<PartialWorkload, AggregateError> {
        let mut partial = PartialWorkload::empty(self.source());
        for beo in &demand.beos {
            if beo.id.trim().is_empty() {
                return Err(malformed(self.source(), &beo.id, "id 为空"));
            }
            accumulate_guest_event(
                &mut partial,
                &self.factors,
                beo.date,
                beo.guest_count,
                beo.menu_complexity,
                &beo.required_skills,
            );
        }
        Ok(partial)
    }
}

// ==========================================
// RestaurantAggregator - REO 餐厅/门店活动
// ==========================================
pub struct RestaurantAggregator {
    factors: ComplexityFactors,
}

impl RestaurantAggregator {
    pub fn new(factors: ComplexityFactors) -> Self {
        Self { factors }
    }
}

impl DemandAggregator for RestaurantAggregator {
    fn source(&self) -> DemandSource {
        DemandSource::Restaurant
    }

    fn aggregate(&self, demand: &DemandBundle) -> Result<PartialWorkload, AggregateError> {
        let mut partial = PartialWorkload::empty(self.source());
        for reo in &demand.reos {
            if reo.id.trim().is_empty() {
                return Err(malformed(self.source(), &reo.id, "id 为空"));
            }
            if reo.outlet_id.trim().is_empty() {
                return Err(malformed(self.source(), &reo.id, "outlet_id 为空"));
            }
            accumulate_guest_event(
                &mut partial,
                &self.factors,
                reo.date,
                reo.guest_count,
                reo.menu_complexity,
                &reo.required_skills,
            );
        }
        Ok(partial)
    }
}

// ==========================================
// PastryAggregator - 西点生产
// ==========================================
// 批次数 = ceil(qty / yield_per_batch)，按工序展开主动/被动工时
pub struct PastryAggregator;

impl PastryAggregator {
    pub fn new() -> Self {
        Self
    }

    fn expand(
        &self,
        demand: &PastryDemand,
        bundle: &DemandBundle,
    ) -> Result<Option<PastryBatch>, AggregateError> {
        let source = DemandSource::Pastry;
        if demand.id.trim().is_empty() {
            return Err(malformed(source, &demand.id, "id 为空"));
        }

        let spec = bundle
            .find_pastry_spec(&demand.item_id)
            .ok_or_else(|| AggregateError::MissingPastrySpec {
                demand_id: demand.id.clone(),
                item_id: demand.item_id.clone(),
            })?;

        if spec.yield_per_batch == 0 {
            return Err(malformed(
                source,
                &demand.id,
                format!("品项 {} 的 yield_per_batch 为 0", spec.item_id),
            ));
        }

        let complexity = demand.complexity_factor.unwrap_or(1.0);
        if !complexity.is_finite() || complexity <= 0.0 {
            return Err(malformed(
                source,
                &demand.id,
                format!("complexity_factor 非法: {}", complexity),
            ));
        }

        let batch_count = demand.qty.div_ceil(spec.yield_per_batch);
        if batch_count == 0 {
            return Ok(None);
        }

        let mut stage_breakdown = Vec::with_capacity(spec.stages.len());
        for stage in &spec.stages {
            let minutes_valid = stage.active_minutes.is_finite()
                && stage.passive_minutes.is_finite()
                && stage.active_minutes >= 0.0
                && stage.passive_minutes >= 0.0;
            if !minutes_valid {
                return Err(malformed(
                    source,
                    &demand.id,
                    format!("工序 {} 工时非法", stage.name),
                ));
            }

            stage_breakdown.push(StageAssignment {
                stage: stage.name.clone(),
                skill_tags: stage.skill_tags.clone(),
                active_minutes: stage.active_minutes * f64::from(batch_count) * complexity,
                passive_minutes: stage.passive_minutes * f64::from(batch_count),
                assigned_to: Vec::new(),
                unassigned: false,
            });
        }

        Ok(Some(PastryBatch {
            demand_id: demand.id.clone(),
            item_id: demand.item_id.clone(),
            date: demand.date,
            batch_count,
            stage_breakdown,
        }))
    }
}

impl Default for PastryAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl DemandAggregator for PastryAggregator {
    fn source(&self) -> DemandSource {
        DemandSource::Pastry
    }

    fn aggregate(&self, demand: &DemandBundle) -> Result<PartialWorkload, AggregateError> {
        let mut partial = PartialWorkload::empty(self.source());
        for row in &demand.pastry {
            let Some(batch) = self.expand(row, demand)? else {
                continue;
            };

            let day = partial.day_mut(batch.date);
            for stage in &batch.stage_breakdown {
                day.hours_active += stage.active_minutes / 60.0;
                day.hours_passive += stage.passive_minutes / 60.0;
                day.skill_tags.extend(stage.skill_tags.iter().cloned());
            }
            partial.pastry_batches.push(batch);
        }
        Ok(partial)
    }
}

// ==========================================
// ProductionAggregator - 通用生产单
// ==========================================
pub struct ProductionAggregator;

impl ProductionAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProductionAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl DemandAggregator for ProductionAggregator {
    fn source(&self) -> DemandSource {
        DemandSource::Production
    }

    fn aggregate(&self, demand: &DemandBundle) -> Result<PartialWorkload, AggregateError> {
        let mut partial = PartialWorkload::empty(self.source());
        for order in &demand.production {
            if order.id.trim().is_empty() {
                return Err(malformed(self.source(), &order.id, "id 为空"));
            }
            if !order.minutes_per_unit.is_finite() || order.minutes_per_unit < 0.0 {
                return Err(malformed(
                    self.source(),
                    &order.id,
                    format!("minutes_per_unit 非法: {}", order.minutes_per_unit),
                ));
            }
            if !order.complexity_factor.is_finite() || order.complexity_factor <= 0.0 {
                return Err(malformed(
                    self.source(),
                    &order.id,
                    format!("complexity_factor 非法: {}", order.complexity_factor),
                ));
            }

            let day = partial.day_mut(order.date);
            day.hours_active +=
                f64::from(order.qty) * order.minutes_per_unit / 60.0 * order.complexity_factor;
            for skill in &order.required_skills {
                *day.roles_required.entry(skill.clone()).or_insert(0) += 1;
            }
            day.skill_tags.extend(order.required_skills.iter().cloned());
        }
        Ok(partial)
    }
}
