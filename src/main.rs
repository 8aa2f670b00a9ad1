use lifetracker::config::AppConfig;
use tracing::Level;

#[cfg(not(target_arch = "wasm32"))]
fn init_logging(level: Level) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))
}

#[cfg(target_arch = "wasm32")]
fn init_logging(level: Level) -> anyhow::Result<()> {
    dioxus::logger::init(level).map_err(|err| anyhow::anyhow!("failed to init logger: {err}"))
}

fn main() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    lifetracker::config::load_dotenv();

    // Validate before anything renders; the app reads its own copy from context.
    let config = AppConfig::load()?;
    init_logging(config.log_level)?;
    tracing::info!(api_base = %config.api_base, "starting life tracker");

    dioxus::launch(lifetracker::ui::App);
    Ok(())
}
