// ==========================================
// 餐饮人力排班系统 - API 层错误类型
// ==========================================
// 职责: 汇总流水线/导入/配置错误，面向调用方输出可解释原因
// ==========================================

use crate::engine::error::{PipelineError, ValidationError};
use crate::importer::error::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与流水线错误
    // ==========================================
    #[error(transparent)]
    Validation(ValidationError),

    #[error("门店 {0} 没有可用编制档位")]
    NoTier(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 外部协作方错误
    // ==========================================
    #[error("订单导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(v) => ApiError::Validation(v),
            PipelineError::NoTier { outlet_id } => ApiError::NoTier(outlet_id),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for ApiError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl ApiError {
    /// 输入校验失败时返回全部违规字段
    pub fn validation_fields(&self) -> Vec<&str> {
        match self {
            ApiError::Validation(v) => v.fields(),
            _ => Vec::new(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
