// ==========================================
// 餐饮人力排班系统 - 工作量领域模型
// ==========================================
// 职责: 聚合器局部结果 (PartialWorkload) 与全局工作量 (UnifiedWorkload)
// 红线: UnifiedWorkload 只追加构建，build() 之后不可变
// ==========================================

use crate::domain::types::DemandSource;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// DayWorkload - 单日工作量
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayWorkload {
    pub guest_count: u64,
    pub hours_active: f64,
    pub hours_passive: f64,
    pub roles_required: BTreeMap<String, u32>,
    pub skill_tags: BTreeSet<String>,
}

impl DayWorkload {
    /// 按日期键求和合并（交换律成立）
    pub fn absorb(&mut self, other: &DayWorkload) {
        self.guest_count += other.guest_count;
        self.hours_active += other.hours_active;
        self.hours_passive += other.hours_passive;
        for (role, count) in &other.roles_required {
            *self.roles_required.entry(role.clone()).or_insert(0) += count;
        }
        self.skill_tags.extend(other.skill_tags.iter().cloned());
    }
}

// ==========================================
// 西点批次工序分解
// ==========================================

/// 单条西点需求展开后的批次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastryBatch {
    pub demand_id: String,
    pub item_id: String,
    pub date: NaiveDate,
    pub batch_count: u32,
    pub stage_breakdown: Vec<StageAssignment>,
}

/// 工序分配（由 BrigadeSkillAllocator 填写 assigned_to）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageAssignment {
    pub stage: String,
    pub skill_tags: BTreeSet<String>,
    pub active_minutes: f64,
    pub passive_minutes: f64,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub unassigned: bool,
}

// ==========================================
// PartialWorkload - 单个聚合器输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialWorkload {
    pub source: DemandSource,
    pub days: BTreeMap<NaiveDate, DayWorkload>,
    pub pastry_batches: Vec<PastryBatch>,
}

impl PartialWorkload {
    /// 零工作量（聚合器失败时的降级贡献）
    pub fn empty(source: DemandSource) -> Self {
        Self {
            source,
            days: BTreeMap::new(),
            pastry_batches: Vec::new(),
        }
    }

    pub fn day_mut(&mut self, date: NaiveDate) -> &mut DayWorkload {
        self.days.entry(date).or_default()
    }
}

/// 聚合器失败记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorFailure {
    pub source: DemandSource,
    pub reason: String,
}

// ==========================================
// UnifiedWorkload - 全局工作量（冻结）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnifiedWorkload {
    days: BTreeMap<NaiveDate, DayWorkload>,
    pastry_batches: Vec<PastryBatch>,
    failures: Vec<AggregatorFailure>,
}

impl UnifiedWorkload {
    pub fn days(&self) -> &BTreeMap<NaiveDate, DayWorkload> {
        &self.days
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayWorkload> {
        self.days.get(&date)
    }

    pub fn pastry_batches(&self) -> &[PastryBatch] {
        &self.pastry_batches
    }

    pub fn failures(&self) -> &[AggregatorFailure] {
        &self.failures
    }

    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

// ==========================================
// WorkloadBuilder - 追加式构建器
// ==========================================
// 合并顺序按来源固定，浮点求和结果与聚合器完成顺序无关
#[derive(Debug, Default)]
pub struct WorkloadBuilder {
    partials: Vec<PartialWorkload>,
    failures: Vec<AggregatorFailure>,
}

impl WorkloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, partial: PartialWorkload) -> &mut Self {
        self.partials.push(partial);
        self
    }

    pub fn record_failure(&mut self, source: DemandSource, reason: impl Into<String>) -> &mut Self {
        self.failures.push(AggregatorFailure {
            source,
            reason: reason.into(),
        });
        self
    }

    pub fn build(mut self) -> UnifiedWorkload {
        self.partials.sort_by_key(|p| p.source);
        self.failures
            .sort_by(|a, b| a.source.cmp(&b.source).then_with(|| a.reason.cmp(&b.reason)));

        let mut days: BTreeMap<NaiveDate, DayWorkload> = BTreeMap::new();
        let mut pastry_batches = Vec::new();

        for partial in self.partials {
            for (date, day) in &partial.days {
                days.entry(*date).or_default().absorb(day);
            }
            pastry_batches.extend(partial.pastry_batches);
        }

        pastry_batches.sort_by(|a: &PastryBatch, b: &PastryBatch| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.demand_id.cmp(&b.demand_id))
        });

        UnifiedWorkload {
            days,
            pastry_batches,
            failures: self.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(guests: u64, active: f64, role: &str) -> DayWorkload {
        let mut d = DayWorkload {
            guest_count: guests,
            hours_active: active,
            ..Default::default()
        };
        d.roles_required.insert(role.to_string(), 1);
        d
    }

    fn partial(source: DemandSource, date: NaiveDate, d: DayWorkload) -> PartialWorkload {
        let mut p = PartialWorkload::empty(source);
        p.days.insert(date, d);
        p
    }

    #[test]
    fn test_merge_is_order_independent() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let a = partial(DemandSource::Banquet, date, day(100, 3.1, "cook"));
        let b = partial(DemandSource::Restaurant, date, day(40, 0.7, "server"));
        let c = partial(DemandSource::Production, date, day(0, 2.35, "cook"));

        let mut forward = WorkloadBuilder::new();
        forward.push(a.clone()).push(b.clone()).push(c.clone());
        let mut backward = WorkloadBuilder::new();
        backward.push(c).push(b).push(a);

        let f = forward.build();
        let r = backward.build();
        assert_eq!(f, r);

        let merged = f.day(date).unwrap();
        assert_eq!(merged.guest_count, 140);
        assert_eq!(merged.roles_required.get("cook"), Some(&2));
        assert_eq!(merged.roles_required.get("server"), Some(&1));
    }

    #[test]
    fn test_failures_are_recorded() {
        let mut builder = WorkloadBuilder::new();
        builder.record_failure(DemandSource::Pastry, "bad spec");
        let workload = builder.build();
        assert!(workload.is_degraded());
        assert_eq!(workload.failures()[0].source, DemandSource::Pastry);
        assert!(workload.days().is_empty());
    }
}
