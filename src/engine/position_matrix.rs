// ==========================================
// 餐饮人力排班系统 - 编制矩阵引擎
// ==========================================
// 职责: covers → ForecastTier
// 规则:
// 1) 选取 [covers_min, covers_max] 包含 covers 的档位
// 2) 无命中（低于最低档或高于最高档）→ 回落到 covers_min 最小的档位，不报错
// 3) 多个命中 → 按 (covers_min, covers_max, id) 取第一个，区间相同时 id 小者胜
// ==========================================

use crate::domain::staffing::ForecastTier;
use tracing::{debug, warn};

pub struct PositionMatrixEngine;

impl PositionMatrixEngine {
    pub fn new() -> Self {
        Self
    }

    /// 解析客流对应的编制档位
    ///
    /// # 返回
    /// - Some(tier): 命中或回落档位
    /// - None: 档位列表为空
    pub fn resolve<'a>(&self, covers: u32, tiers: &'a [ForecastTier]) -> Option<&'a ForecastTier> {
        let matched = tiers
            .iter()
            .filter(|t| t.contains(covers))
            .min_by(|a, b| {
                a.covers_min
                    .cmp(&b.covers_min)
                    .then_with(|| a.covers_max.cmp(&b.covers_max))
                    .then_with(|| a.id.cmp(&b.id))
            });

        if let Some(tier) = matched {
            debug!(covers, tier_id = %tier.id, "命中编制档位");
            return Some(tier);
        }

        let fallback = tiers
            .iter()
            .min_by(|a, b| a.covers_min.cmp(&b.covers_min).then_with(|| a.id.cmp(&b.id)));

        if let Some(tier) = fallback {
            warn!(
                covers,
                tier_id = %tier.id,
                covers_min = tier.covers_min,
                "客流不在任何档位区间内，回落到最低档"
            );
        }
        fallback
    }
}

impl Default for PositionMatrixEngine {
    fn default() -> Self {
        Self::new()
    }
}
