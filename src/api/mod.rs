// ==========================================
// 餐饮人力排班系统 - API 层
// ==========================================
// 职责: 对外业务接口，组合导入、配置与引擎
// ==========================================

pub mod error;
pub mod schedule_api;

pub use error::{ApiError, ApiResult};
pub use schedule_api::{ScheduleApi, ScheduleRequest, ScheduleResponse};
