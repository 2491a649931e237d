// ==========================================
// 餐饮人力排班系统 - SQLite 连接初始化
// ==========================================
// 目标: 所有 Connection::open 统一 PRAGMA 与 busy_timeout
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// foreign_keys 与 busy_timeout 都需要每个连接单独设置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认数据库路径
///
/// 优先级: 环境变量 WORKFORCE_APS_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("WORKFORCE_APS_DB_PATH") {
        if !path.trim().is_empty() {
            return path;
        }
    }

    match dirs::data_dir() {
        Some(dir) => {
            let app_dir = dir.join("workforce-aps");
            if let Err(e) = std::fs::create_dir_all(&app_dir) {
                tracing::warn!(path = %app_dir.display(), error = %e, "创建数据目录失败，使用当前目录");
                return "./workforce_aps.db".to_string();
            }
            app_dir.join("workforce_aps.db").to_string_lossy().to_string()
        }
        None => "./workforce_aps.db".to_string(),
    }
}
