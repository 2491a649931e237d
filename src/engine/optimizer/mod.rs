// ==========================================
// 餐饮人力排班系统 - 排班优化求解器
// ==========================================
// 模型: (日期, 岗位, 槽位) 需求单元 与 合格员工 的加权二部分配
// 成本: 岗位时薪 × 班次时长 - 偏好奖励
// 算法: 贪心最小成本匹配，岗位按 min 升序处理，员工 id 决胜
// ==========================================
// 输入: ScheduleInput + 已解析的 ForecastTier
// 输出: ScheduleDraft（班次 + 最低编制缺口 + 理想差额）
// 红线: 同一员工班次不得重叠；产出班次的岗位必属于该档位
// 红线: 不可行不抛错，作为缺口记录
// 用餐休息: 求解器排出的班次时长 >= meal_break_every_hours 时一律标记含休息，
//          合规内核的用餐休息检查只会被锁定班次或外部传入的班次触发
// ==========================================

mod core;
mod eligibility;

#[cfg(test)]
mod tests;

pub use self::core::OptimizationSolver;
pub use self::eligibility::{check_eligibility, AssignmentBook, Ineligible};
