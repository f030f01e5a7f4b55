use anyhow::Context;
use clap::Parser;

use crate::engine::config::Config;
use crate::engine::logging::{init_logging, LoggingConfig};
use crate::engine::renderer::Renderer;

mod engine;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(LoggingConfig::with_filter(config.log_filter.clone()));

    let mut renderer = Renderer::new(&config).context("failed to open the triangle window")?;
    renderer.set_clear_color(0.2, 0.3, 0.3, 1.0);

    renderer.run() // blocks until the window closes
}
