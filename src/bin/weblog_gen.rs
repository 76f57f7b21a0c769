//! Entry point for the synthetic web access log traffic generator

use clap::Parser;
use log::info;
use weblog_gen::{Coordinator, RunConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = RunConfig::parse();
    config.validate()?;

    if !config.silent {
        info!("Starting traffic generator with config: {}", config);
    }

    let silent = config.silent;
    let coordinator = Coordinator::new(config);
    let summary = coordinator.run().await?;

    if !silent {
        info!(
            "Published {} events ({} publish errors)",
            summary.events, summary.publish_errors
        );
    }

    Ok(())
}
