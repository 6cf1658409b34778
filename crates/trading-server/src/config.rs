use std::{
    env,
    net::{AddrParseError, SocketAddr},
    time::Duration,
};

use core_sim::{SimConfig, DEFAULT_SYMBOL};
use rust_decimal::Decimal;
use thiserror::Error;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TICK_MS: u64 = 1_000;
const MAX_VOLATILITY_PCT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

const ENV_ADDR: &str = "TRADING_SERVER_ADDR";
const ENV_SYMBOL: &str = "TRADING_SYMBOL";
const ENV_START_PRICE: &str = "TRADING_START_PRICE";
const ENV_STARTING_CASH: &str = "TRADING_STARTING_CASH";
const ENV_VOLATILITY_PCT: &str = "TRADING_VOLATILITY_PCT";
const ENV_HISTORY_CAPACITY: &str = "TRADING_HISTORY_CAPACITY";
const ENV_TICK_MS: &str = "TRADING_TICK_MS";
const ENV_SEED: &str = "TRADING_SEED";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub sim: SimConfig,
    pub tick_period: Duration,
    /// Fixed seed for a reproducible price walk; entropy when unset.
    pub seed: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TRADING_SERVER_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(#[source] AddrParseError),
    #[error("TRADING_SYMBOL must not be empty or whitespace")]
    InvalidSymbol,
    #[error("TRADING_START_PRICE must be a decimal greater than 0")]
    InvalidStartPrice,
    #[error("TRADING_STARTING_CASH must be a decimal of at least 0")]
    InvalidStartingCash,
    #[error("TRADING_VOLATILITY_PCT must be a percentage above 0 and below 50")]
    InvalidVolatilityPct,
    #[error("TRADING_HISTORY_CAPACITY must be a positive integer")]
    InvalidHistoryCapacity,
    #[error("TRADING_TICK_MS must be a positive integer")]
    InvalidTickMs,
    #[error("TRADING_SEED must be an unsigned 64-bit integer")]
    InvalidSeed,
    #[error("{key} contains non-unicode data")]
    NonUnicode { key: &'static str },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = SimConfig::default();

        let listen_addr = match read_env(ENV_ADDR)? {
            Some(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            None => DEFAULT_LISTEN_ADDR
                .parse()
                .map_err(ConfigError::InvalidListenAddr)?,
        };

        let symbol = match read_env(ENV_SYMBOL)? {
            Some(value) if value.trim().is_empty() => return Err(ConfigError::InvalidSymbol),
            Some(value) => value.trim().to_owned(),
            None => DEFAULT_SYMBOL.to_owned(),
        };

        let start_price = match read_env(ENV_START_PRICE)? {
            Some(value) => parse_decimal(&value)
                .filter(|price| *price > Decimal::ZERO)
                .ok_or(ConfigError::InvalidStartPrice)?,
            None => defaults.start_price,
        };

        let starting_cash = match read_env(ENV_STARTING_CASH)? {
            Some(value) => parse_decimal(&value)
                .filter(|cash| *cash >= Decimal::ZERO)
                .ok_or(ConfigError::InvalidStartingCash)?,
            None => defaults.starting_cash,
        };

        let volatility = match read_env(ENV_VOLATILITY_PCT)? {
            Some(value) => parse_decimal(&value)
                .filter(|pct| *pct > Decimal::ZERO && *pct < MAX_VOLATILITY_PCT)
                .map(|pct| pct / Decimal::ONE_HUNDRED)
                .ok_or(ConfigError::InvalidVolatilityPct)?,
            None => defaults.volatility,
        };

        let history_capacity = match read_env(ENV_HISTORY_CAPACITY)? {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|capacity| *capacity > 0)
                .ok_or(ConfigError::InvalidHistoryCapacity)?,
            None => defaults.history_capacity,
        };

        let tick_ms = match read_env(ENV_TICK_MS)? {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidTickMs)?,
            None => DEFAULT_TICK_MS,
        };

        let seed = match read_env(ENV_SEED)? {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed)?,
            ),
            None => None,
        };

        Ok(Self {
            listen_addr,
            sim: SimConfig {
                symbol,
                start_price,
                starting_cash,
                volatility,
                history_capacity,
                ..defaults
            },
            tick_period: Duration::from_millis(tick_ms),
            seed,
        })
    }
}

fn read_env(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode { key }),
    }
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    value.trim().parse::<Decimal>().ok()
}
