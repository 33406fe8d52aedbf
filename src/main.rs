// ==========================================
// 制衣生产跟踪系统 - 服务入口
// ==========================================
// 初始化日志与存储, 装配应用状态。
// HTTP 传输层在系统范围外, 由部署方挂接。
// ==========================================

use garment_aps::app::AppState;
use garment_aps::config::AppConfig;
use garment_aps::logging;

fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", garment_aps::APP_NAME);
    tracing::info!("系统版本: {}", garment_aps::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::from_env();
    tracing::info!("使用数据库: {}", config.db_path);

    let _state = AppState::new(&config.db_path)?;
    tracing::info!("应用状态初始化成功, 等待传输层接入");

    Ok(())
}
