use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::security_headers;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_LOCK_WAIT_MS: u64 = 500;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;

pub struct Config {
    pub bind_addr: SocketAddr,
    /// How long a request may wait for a venue or booking lock before it is
    /// rejected with `Busy`.
    pub lock_wait: Duration,
    /// Cadence of the completion sweep that promotes elapsed confirmed
    /// bookings to `completed`.
    pub sweep_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env_parsed("PORT", DEFAULT_PORT);
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            lock_wait: Duration::from_millis(env_parsed("LOCK_WAIT_MS", DEFAULT_LOCK_WAIT_MS)),
            sweep_interval: Duration::from_secs(env_parsed(
                "SWEEP_INTERVAL_SECS",
                DEFAULT_SWEEP_INTERVAL_SECS,
            )),
        }
    }
}

fn env_parsed<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!("Config: invalid {key}, using default");
            default
        }),
        Err(_) => default,
    }
}
