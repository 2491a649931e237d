// ==========================================
// 餐饮人力排班系统 - 命令行入口
// ==========================================
// 用法: workforce-aps <schedule_input.json> [scope_id]
// - 指定 scope_id 时，rules 与 policies 以配置库中该组织的配置替换
// - 结果 JSON 输出到 stdout，日志输出到 stderr
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use workforce_aps::config::{ConfigManager, PipelineConfigReader};
use workforce_aps::db::get_default_db_path;
use workforce_aps::domain::ScheduleInput;
use workforce_aps::engine::SchedulerKernel;
use workforce_aps::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input_path, scope_id) = match args.as_slice() {
        [path] => (path.clone(), None),
        [path, scope] => (path.clone(), Some(scope.clone())),
        _ => bail!("用法: workforce-aps <schedule_input.json> [scope_id]"),
    };

    tracing::info!("{} v{}", workforce_aps::APP_NAME, workforce_aps::VERSION);

    let raw = tokio::fs::read_to_string(&input_path)
        .await
        .with_context(|| format!("无法读取输入文件: {}", input_path))?;
    let mut input: ScheduleInput =
        serde_json::from_str(&raw).with_context(|| format!("输入文件 JSON 解析失败: {}", input_path))?;

    if let Some(scope_id) = scope_id {
        let db_path = get_default_db_path();
        tracing::info!(db_path = %db_path, scope_id = %scope_id, "从配置库加载规则与策略");

        let config = ConfigManager::new(&db_path).map_err(|e| anyhow!(e))?.with_scope(&scope_id);
        input.rules = config.get_rule_set().await.map_err(|e| anyhow!(e))?;
        input.policies = Some(config.get_gate_policy().await.map_err(|e| anyhow!(e))?);
    }

    let result = SchedulerKernel::new().run(&input)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
