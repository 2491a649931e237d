// ==========================================
// 餐饮人力排班系统 - 预测引擎
// ==========================================
// 职责: 将当日聚合信号归约为 {covers, sales}
// 规则: covers = max(显式客数合计, 营收 / 历史客单价 向上取整)
// 红线: 纯函数，无 I/O，同输入同输出
// ==========================================

use crate::domain::schedule::Forecast;
use crate::domain::workload::UnifiedWorkload;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 预测输入信号
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSignal {
    /// 显式客数合计（订单 guest_count 求和）
    pub guest_count: u64,
    /// 预测营收
    pub sales: f64,
    /// 历史客单价（营收/客数）
    pub avg_check_per_cover: Option<f64>,
}

// ==========================================
// ForecastEngine
// ==========================================
pub struct ForecastEngine;

impl ForecastEngine {
    pub fn new() -> Self {
        Self
    }

    /// 计算客流与营收预测
    pub fn compute(&self, signal: &ForecastSignal) -> Forecast {
        let sales = if signal.sales.is_finite() && signal.sales > 0.0 {
            signal.sales
        } else {
            0.0
        };
        let avg_check = signal
            .avg_check_per_cover
            .filter(|v| v.is_finite() && *v > 0.0);

        let covers_floor = match avg_check {
            Some(avg) if sales > 0.0 => (sales / avg).ceil() as u64,
            _ => 0,
        };
        let covers = signal.guest_count.max(covers_floor).min(u64::from(u32::MAX)) as u32;

        // 无营收数据时由客数 × 客单价回推
        let sales = match avg_check {
            Some(avg) if sales == 0.0 => f64::from(covers) * avg,
            _ => sales,
        };

        Forecast { covers, sales }
    }

    /// 从全局工作量中取指定日期的客数构造信号后计算
    pub fn compute_from_workload(
        &self,
        workload: &UnifiedWorkload,
        date: NaiveDate,
        sales: f64,
        avg_check_per_cover: Option<f64>,
    ) -> Forecast {
        let guest_count = workload.day(date).map(|d| d.guest_count).unwrap_or(0);
        self.compute(&ForecastSignal {
            guest_count,
            sales,
            avg_check_per_cover,
        })
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new()
    }
}
