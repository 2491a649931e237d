// ==========================================
// 餐饮人力排班系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类:
// 1) 输入校验错误: 致命，整次运行中止，列出全部失败字段
// 2) 求解不可行: 非致命，作为缺口记录在草案中（不在此处）
// 3) 合规/成本失败: 永不抛出，以数据形式返回（不在此处）
// ==========================================

use crate::domain::types::DemandSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ==========================================
// FieldViolation - 字段校验违规
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// 字段路径（如 tiers[0].roles[1].min）
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// ==========================================
// ValidationError - 输入校验错误（全量违规列表）
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("输入校验失败: {} 个字段违规 [{}]", .violations.len(), summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

// ==========================================
// PipelineError - 排班内核错误
// ==========================================
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 档位解析无候选（校验通过后理论上不可达）
    #[error("门店 {outlet_id} 没有可用编制档位")]
    NoTier { outlet_id: String },
}

impl PipelineError {
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            PipelineError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

// ==========================================
// AggregateError - 聚合器错误（不向外传播）
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("{origin} 记录格式错误 (id={record_id}): {message}")]
    MalformedRecord {
        origin: DemandSource,
        record_id: String,
        message: String,
    },

    #[error("西点品项规格缺失 (demand_id={demand_id}, item_id={item_id})")]
    MissingPastrySpec { demand_id: String, item_id: String },
}
