use std::time::Duration;

use core_sim::{lock_market, EventSink, MarketEvent, PriceUpdate, SharedMarket};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, trace};

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Advances the shared market once per period and publishes each new quote.
pub struct PriceTicker<S> {
    market: SharedMarket,
    sink: S,
    tick: u64,
}

impl<S: EventSink> PriceTicker<S> {
    pub fn new(market: SharedMarket, sink: S) -> Self {
        Self {
            market,
            sink,
            tick: 0,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn step_once(&mut self) -> PriceUpdate {
        let update = lock_market(&self.market).advance();
        self.tick += 1;
        trace!(tick = self.tick, price = %update.price, change = %update.change, "price tick");

        self.sink.publish(MarketEvent::StockUpdate(update.clone()));
        update
    }

    /// Ticks until `shutdown` flips to `true` or its sender is dropped.
    /// Returns the number of ticks taken.
    pub async fn run(mut self, period: Duration, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut ticks = interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; the first price move lands one period in.
        ticks.tick().await;

        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    self.step_once();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!(ticks = self.tick, "price ticker stopped");
                        return self.tick;
                    }
                }
            }
        }
    }
}

pub struct TickerHandle {
    pub task: JoinHandle<u64>,
    shutdown: watch::Sender<bool>,
}

impl TickerHandle {
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }
}

pub fn spawn_ticker<S>(market: SharedMarket, sink: S, period: Duration) -> TickerHandle
where
    S: EventSink + 'static,
{
    let (shutdown, shutdown_rx) = watch::channel(false);
    let ticker = PriceTicker::new(market, sink);
    let task = tokio::spawn(ticker.run(period, shutdown_rx));

    TickerHandle { task, shutdown }
}
