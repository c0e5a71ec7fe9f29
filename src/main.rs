use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing::instrument::WithSubscriber;

use tollgate::cli;
use tollgate::logging;
use tollgate::replay;
use tollgate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args and env vars
    let args = cli::Cli::parse();
    let settings = args.into_settings().context("invalid configuration")?;

    let dispatch = logging::dispatch(&settings.log);
    run(settings).with_subscriber(dispatch).await
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let limiter = settings.limiter.build()?;
    info!(
        strategy = %settings.limiter.strategy,
        capacity = settings.limiter.capacity,
        window_size_seconds = settings.limiter.window_size_seconds,
        refill_rate_per_second = settings.limiter.refill_rate_per_second,
        "Starting tollgate"
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    replay::replay(limiter.as_ref(), stdin, &mut stdout, replay::wall_clock)
        .await
        .context("replay failed")?;
    Ok(())
}
