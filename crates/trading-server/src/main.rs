mod config;
mod wiring;

use anyhow::{anyhow, Context};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    runtime::init_tracing(runtime::DEFAULT_LOG_FILTER).map_err(|err| anyhow!(err))?;

    let config = config::Config::from_env().context("invalid server configuration")?;
    let market = wiring::build_market(&config);
    let symbol = core_sim::lock_market(&market).symbol().to_owned();
    let (app, state) = wiring::build_app(market.clone());
    let ticker = runtime::spawn_ticker(market, state, config.tick_period);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(
        addr = %config.listen_addr,
        %symbol,
        tick_ms = config.tick_period.as_millis() as u64,
        "server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    ticker.stop();
    let ticks = ticker.task.await.context("price ticker panicked")?;
    info!(ticks, "server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "ctrl-c handler unavailable; running until killed");
        std::future::pending::<()>().await;
    }
}
