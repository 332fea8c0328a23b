use anyhow::Context;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use seeit_eval_lib::EvalConfig;

fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    // first argument, else the default config path
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(EvalConfig::default_path);

    let config = EvalConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to read config {}", config_path.display()))?;
    config.display();

    seeit_eval_lib::run(&config)?;
    Ok(())
}
