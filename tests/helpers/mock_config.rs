// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================
#![allow(dead_code)]

use async_trait::async_trait;
use std::error::Error;
use workforce_aps::config::PipelineConfigReader;
use workforce_aps::domain::{ComplexityFactors, GatePolicy, RuleSet, SolverTuning};

/// Mock 配置结构
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub rules: RuleSet,
    pub policy: GatePolicy,
    pub factors: ComplexityFactors,
    pub tuning: SolverTuning,
    /// 置位时所有读取都返回错误
    pub fail: bool,
}

impl MockConfig {
    /// 成本上限收紧的配置
    pub fn with_max_labor_pct(pct: f64) -> Self {
        let mut config = Self::default();
        config.policy.max_labor_pct = pct;
        config
    }

    /// 缺编即阻断发布的配置
    pub fn strict_staffing() -> Self {
        let mut config = Self::default();
        config.policy.block_on_staffing_gaps = true;
        config
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.fail {
            Err("mock 配置读取失败".into())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PipelineConfigReader for MockConfig {
    async fn get_rule_set(&self) -> Result<RuleSet, Box<dyn Error + Send + Sync>> {
        self.check()?;
        Ok(self.rules)
    }

    async fn get_gate_policy(&self) -> Result<GatePolicy, Box<dyn Error + Send + Sync>> {
        self.check()?;
        Ok(self.policy)
    }

    async fn get_complexity_factors(&self) -> Result<ComplexityFactors, Box<dyn Error + Send + Sync>> {
        self.check()?;
        Ok(self.factors)
    }

    async fn get_solver_tuning(&self) -> Result<SolverTuning, Box<dyn Error + Send + Sync>> {
        self.check()?;
        Ok(self.tuning)
    }
}
