use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{App, Context};
use crate::settings::Settings;

mod cli;
mod settings;
mod ui;

fn main() -> anyhow::Result<()> {
    let app = App::parse();

    let settings = Settings::load(&app.config)
        .with_context(|| format!("failed to load settings from {}", app.config.display()))?;
    init_tracing(&settings.log_level);
    tracing::debug!(
        config = %app.config.display(),
        root = %settings.deploy.root.display(),
        sites = settings.assignments.len(),
        "loaded settings"
    );

    let ctx = Context::new(settings, app.json)?;
    app.cmd.run(&ctx)
}

/// `RUST_LOG` wins over the configured level. Logs go to stderr so stdout
/// carries only command output.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
