// ==========================================
// 餐饮人力排班系统 - 需求记录领域模型
// ==========================================
// 职责: 宴会/餐厅/西点/生产四类需求记录
// 来源: CRM 协作方拉取，导入后不可变，每次排班运行消费一次
// ==========================================

use crate::domain::types::{DemandSource, MenuComplexity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// BeoInput - 宴会订单 (Banquet Event Order)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeoInput {
    pub id: String,
    pub date: NaiveDate,
    pub guest_count: u32,
    pub menu_complexity: MenuComplexity,
    #[serde(default)]
    pub required_skills: BTreeSet<String>,
}

// ==========================================
// ReoInput - 餐厅/门店活动 (Restaurant Event Order)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReoInput {
    pub id: String,
    pub outlet_id: String,
    pub date: NaiveDate,
    pub guest_count: u32,
    pub menu_complexity: MenuComplexity,
    #[serde(default)]
    pub required_skills: BTreeSet<String>,
}

// ==========================================
// 西点品项规格 (Pastry Item Spec)
// ==========================================
// 每批产出 yield_per_batch 件，按工序展开主动/被动工时
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastryItemSpec {
    pub item_id: String,
    pub yield_per_batch: u32,
    pub stages: Vec<PastryStageSpec>,
}

/// 西点工序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastryStageSpec {
    pub name: String,
    /// 每批主动工时（需人工在岗）
    pub active_minutes: f64,
    /// 每批被动工时（醒发/烘烤/冷却）
    pub passive_minutes: f64,
    #[serde(default)]
    pub skill_tags: BTreeSet<String>,
}

// ==========================================
// PastryDemand - 西点生产需求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastryDemand {
    pub id: String,
    pub date: NaiveDate,
    pub item_id: String,
    pub qty: u32,
    /// 复杂度系数（放大主动工时），缺省 1.0
    #[serde(default)]
    pub complexity_factor: Option<f64>,
}

// ==========================================
// ProductionOrder - 通用生产单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrder {
    pub id: String,
    pub date: NaiveDate,
    pub qty: u32,
    /// 单件标准工时（分钟）
    pub minutes_per_unit: f64,
    pub complexity_factor: f64,
    #[serde(default)]
    pub required_skills: BTreeSet<String>,
}

// ==========================================
// DemandBundle - 单次排班运行的全部需求
// ==========================================
// 各聚合器只读取自己的切片
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemandBundle {
    #[serde(default)]
    pub beos: Vec<BeoInput>,
    #[serde(default)]
    pub reos: Vec<ReoInput>,
    #[serde(default)]
    pub pastry: Vec<PastryDemand>,
    #[serde(default)]
    pub pastry_specs: Vec<PastryItemSpec>,
    #[serde(default)]
    pub production: Vec<ProductionOrder>,
}

impl DemandBundle {
    /// 指定来源的记录数
    pub fn record_count(&self, source: DemandSource) -> usize {
        match source {
            DemandSource::Banquet => self.beos.len(),
            DemandSource::Restaurant => self.reos.len(),
            DemandSource::Pastry => self.pastry.len(),
            DemandSource::Production => self.production.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.beos.is_empty()
            && self.reos.is_empty()
            && self.pastry.is_empty()
            && self.production.is_empty()
    }

    pub fn find_pastry_spec(&self, item_id: &str) -> Option<&PastryItemSpec> {
        self.pastry_specs.iter().find(|s| s.item_id == item_id)
    }
}
