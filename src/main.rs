use anyhow::{Context, Result};
use strata::config::Config;
use strata::platform::{HeadlessPlatform, Platform};

fn main() -> Result<()> {
    // Set default log level to info
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,strata=debug");
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_ansi(false)
        .init();

    let config = Config::load().context("loading configuration")?;
    let compositor_config = config.compositor_config().context("resolving configuration")?;

    let mut app = HeadlessPlatform::new(compositor_config);
    app.initialize()?;
    app.run()?;

    Ok(())
}
