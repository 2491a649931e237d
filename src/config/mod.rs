// ==========================================
// 餐饮人力排班系统 - 配置层
// ==========================================
// 职责: 规则/策略/系数配置管理，支持组织级覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod pipeline_config_trait;

pub use config_manager::{config_keys, ConfigManager, GLOBAL_SCOPE};
pub use pipeline_config_trait::PipelineConfigReader;
