// ==========================================
// 餐饮人力排班系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 作用域: 组织 scope_id 优先，未配置的键回落到 'global'
// 红线: 缺失键取默认值；无法解析的值告警后取默认值，不中止
// ==========================================

use crate::config::pipeline_config_trait::PipelineConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::rules::{ComplexityFactors, GatePolicy, RuleSet, SolverTuning};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

pub const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Clone)]
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
    scope_id: String,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（global 作用域）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let conn = open_sqlite_connection(db_path)?;
        let manager = Self {
            conn: Arc::new(Mutex::new(conn)),
            scope_id: GLOBAL_SCOPE.to_string(),
        };
        manager.ensure_schema()?;
        Ok(manager)
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error + Send + Sync>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self {
            conn,
            scope_id: GLOBAL_SCOPE.to_string(),
        })
    }

    /// 切换到指定组织作用域（共享同一连接）
    pub fn with_scope(&self, scope_id: &str) -> Self {
        let scope_id = scope_id.trim();
        Self {
            conn: self.conn.clone(),
            scope_id: if scope_id.is_empty() {
                GLOBAL_SCOPE.to_string()
            } else {
                scope_id.to_string()
            },
        }
    }

    pub fn scope_id(&self) -> &str {
        &self.scope_id
    }

    /// 创建 config_scope / config_kv 表（幂等）
    pub fn ensure_schema(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_scope (
                scope_id TEXT PRIMARY KEY,
                scope_type TEXT NOT NULL,
                scope_key TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE(scope_type, scope_key)
            );
            INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
            VALUES ('global', 'GLOBAL', 'global');
            CREATE TABLE IF NOT EXISTS config_kv (
                scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    /// 写入配置值（UPSERT），组织作用域不存在时自动登记
    pub fn set_config_value(
        &self,
        scope_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        if scope_id != GLOBAL_SCOPE {
            conn.execute(
                "INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key) VALUES (?1, 'ORG', ?1)",
                params![scope_id],
            )?;
        }

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![scope_id, key, value],
        )?;

        tracing::debug!(scope_id, key, value, "配置已写入");
        Ok(())
    }

    /// 读取单个作用域的配置值
    fn get_scoped_value(&self, scope_id: &str, key: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![scope_id, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取配置值：当前作用域优先，回落到 global
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 两级都未配置
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        if self.scope_id != GLOBAL_SCOPE {
            if let Some(value) = self.get_scoped_value(&self.scope_id, key)? {
                return Ok(Some(value));
            }
        }
        self.get_scoped_value(GLOBAL_SCOPE, key)
    }

    /// 读取并解析配置值，缺失或格式错误时使用默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error + Send + Sync>>
    where
        T: FromStr + Display,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };
        match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置值格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 读取非负有限浮点配置
    fn get_f64_or_default(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error + Send + Sync>> {
        let value = self.get_parsed_or_default(key, default)?;
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            tracing::warn!(config_key = key, value, default, "配置值超出范围，使用默认值");
            Ok(default)
        }
    }

    fn get_bool_or_default(&self, key: &str, default: bool) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };
        match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => {
                tracing::warn!(config_key = key, raw_value = %raw, default, "布尔配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }
}

// ==========================================
// PipelineConfigReader Trait 实现
// ==========================================
#[async_trait]
impl PipelineConfigReader for ConfigManager {
    async fn get_rule_set(&self) -> Result<RuleSet, Box<dyn Error + Send + Sync>> {
        let d = RuleSet::default();
        Ok(RuleSet {
            overtime_after_hours: self.get_f64_or_default(config_keys::OVERTIME_AFTER_HOURS, d.overtime_after_hours)?,
            doubletime_after_hours: self
                .get_f64_or_default(config_keys::DOUBLETIME_AFTER_HOURS, d.doubletime_after_hours)?,
            min_turnaround_hours: self.get_f64_or_default(config_keys::MIN_TURNAROUND_HOURS, d.min_turnaround_hours)?,
            max_days_per_week: self.get_parsed_or_default(config_keys::MAX_DAYS_PER_WEEK, d.max_days_per_week)?,
            meal_break_every_hours: self
                .get_f64_or_default(config_keys::MEAL_BREAK_EVERY_HOURS, d.meal_break_every_hours)?,
        })
    }

    async fn get_gate_policy(&self) -> Result<GatePolicy, Box<dyn Error + Send + Sync>> {
        let d = GatePolicy::default();
        Ok(GatePolicy {
            max_labor_pct: self.get_f64_or_default(config_keys::MAX_LABOR_PCT, d.max_labor_pct)?,
            block_on_staffing_gaps: self
                .get_bool_or_default(config_keys::BLOCK_ON_STAFFING_GAPS, d.block_on_staffing_gaps)?,
        })
    }

    async fn get_complexity_factors(&self) -> Result<ComplexityFactors, Box<dyn Error + Send + Sync>> {
        let d = ComplexityFactors::default();
        Ok(ComplexityFactors {
            low: self.get_f64_or_default(config_keys::COMPLEXITY_LOW, d.low)?,
            medium: self.get_f64_or_default(config_keys::COMPLEXITY_MEDIUM, d.medium)?,
            high: self.get_f64_or_default(config_keys::COMPLEXITY_HIGH, d.high)?,
        })
    }

    async fn get_solver_tuning(&self) -> Result<SolverTuning, Box<dyn Error + Send + Sync>> {
        let d = SolverTuning::default();
        Ok(SolverTuning {
            preferred_role_bonus: self.get_f64_or_default(config_keys::PREFERRED_ROLE_BONUS, d.preferred_role_bonus)?,
            avoid_day_penalty: self.get_f64_or_default(config_keys::AVOID_DAY_PENALTY, d.avoid_day_penalty)?,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 劳动合规
    pub const OVERTIME_AFTER_HOURS: &str = "overtime_after_hours";
    pub const DOUBLETIME_AFTER_HOURS: &str = "doubletime_after_hours";
    pub const MIN_TURNAROUND_HOURS: &str = "min_turnaround_hours";
    pub const MAX_DAYS_PER_WEEK: &str = "max_days_per_week";
    pub const MEAL_BREAK_EVERY_HOURS: &str = "meal_break_every_hours";

    // 发布闸门
    pub const MAX_LABOR_PCT: &str = "max_labor_pct";
    pub const BLOCK_ON_STAFFING_GAPS: &str = "block_on_staffing_gaps";

    // 需求工时系数（小时/客）
    pub const COMPLEXITY_LOW: &str = "complexity_low_hours_per_guest";
    pub const COMPLEXITY_MEDIUM: &str = "complexity_medium_hours_per_guest";
    pub const COMPLEXITY_HIGH: &str = "complexity_high_hours_per_guest";

    // 求解器
    pub const PREFERRED_ROLE_BONUS: &str = "preferred_role_bonus";
    pub const AVOID_DAY_PENALTY: &str = "avoid_day_penalty";
}
