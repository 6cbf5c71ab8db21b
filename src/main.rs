use anyhow::Result;
use consulting_report::utils::logging;
use consulting_report::{App, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 설정 로드 (로그 수준이 설정에 들어 있어 먼저 읽는다)
    let config = Config::from_env()?;

    logging::init(config.verbose_logging);

    config.validate()?;

    let stats = App::initialize(config).await?.run().await?;
    info!("처리 종료: 성공 {} / 실패 {}", stats.success, stats.failed);

    Ok(())
}
