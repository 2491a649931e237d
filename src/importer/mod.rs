// ==========================================
// 餐饮人力排班系统 - 订单导入层
// ==========================================
// 职责: 从上游 CRM 拉取宴会/餐厅订单
// 红线: 只负责取数与解析，不做工时换算
// ==========================================

pub mod crm_client;
pub mod error;

pub use crm_client::{CrmClient, CrmExport, JsonFileCrmClient, StaticCrmClient};
pub use error::{ImportError, ImportResult};
