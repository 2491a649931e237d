// ==========================================
// 餐饮人力排班系统 - 编制档位领域模型
// ==========================================
// 职责: ForecastTier（客流区间 → 岗位编制）与 RoleRequirement
// 红线: 同一门店的档位按客流轴无缝划分；min <= ideal
// ==========================================

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// ==========================================
// RoleRequirement - 岗位编制要求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRequirement {
    /// 岗位键（如 server / line_cook / pastry）
    pub key: String,
    /// 最低人数
    pub min: u32,
    /// 理想人数（缺省等于 min）
    #[serde(default)]
    pub ideal: Option<u32>,
    /// 默认上班时间
    pub default_in: NaiveTime,
    /// 默认下班时间（<= default_in 表示跨午夜）
    pub default_out: NaiveTime,
    /// 可合并兼任的岗位
    #[serde(default)]
    pub combinable_with: Vec<String>,
}

impl RoleRequirement {
    /// 理想人数，未配置时回落到最低人数
    pub fn ideal_count(&self) -> u32 {
        self.ideal.unwrap_or(self.min).max(self.min)
    }

    /// 是否跨午夜
    pub fn is_overnight(&self) -> bool {
        self.default_out <= self.default_in
    }

    /// 班次时长（小时）
    pub fn shift_hours(&self) -> f64 {
        let minutes = (self.default_out - self.default_in).num_minutes();
        let minutes = if minutes <= 0 { minutes + 24 * 60 } else { minutes };
        minutes as f64 / 60.0
    }
}

// ==========================================
// ForecastTier - 客流编制档位
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastTier {
    pub id: String,
    pub outlet_id: String,
    /// 客流下限（含）
    pub covers_min: u32,
    /// 客流上限（含）
    pub covers_max: u32,
    pub roles: Vec<RoleRequirement>,
}

impl ForecastTier {
    /// covers 是否落在 [covers_min, covers_max]
    pub fn contains(&self, covers: u32) -> bool {
        covers >= self.covers_min && covers <= self.covers_max
    }

    pub fn role(&self, key: &str) -> Option<&RoleRequirement> {
        self.roles.iter().find(|r| r.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(min: u32, ideal: Option<u32>, start: (u32, u32), end: (u32, u32)) -> RoleRequirement {
        RoleRequirement {
            key: "server".to_string(),
            min,
            ideal,
            default_in: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            default_out: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            combinable_with: vec![],
        }
    }

    #[test]
    fn test_shift_hours_same_day_and_overnight() {
        let day = role(1, None, (9, 0), (17, 30));
        assert!(!day.is_overnight());
        assert!((day.shift_hours() - 8.5).abs() < 1e-9);

        let night = role(1, None, (18, 0), (2, 0));
        assert!(night.is_overnight());
        assert!((night.shift_hours() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_ideal_count_falls_back_to_min() {
        assert_eq!(role(2, None, (9, 0), (17, 0)).ideal_count(), 2);
        assert_eq!(role(2, Some(4), (9, 0), (17, 0)).ideal_count(), 4);
    }
}
