// src/config.rs
use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:9090";
const DEFAULT_UPLOAD_ENDPOINT: &str = "http://localhost:3000/api/files";
// One tick can at most take a job from 0 to done
const MAX_PROGRESS_STEP: u32 = 100;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub upload_endpoint: String,
    pub upload_timeout: Duration,
    pub progress: ProgressConfig,
    pub current_user_id: String,
}

// Knobs for the cosmetic progress timer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressConfig {
    pub step: u32,
    pub interval: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            step: 2,
            interval: Duration::from_millis(300),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            upload_endpoint: DEFAULT_UPLOAD_ENDPOINT.to_string(),
            upload_timeout: Duration::from_secs(60),
            progress: ProgressConfig::default(),
            current_user_id: "1".to_string(),
        }
    }
}

impl ServiceConfig {
    // Load configuration from the environment, reading .env first when present
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout_secs = parse_or(&lookup, "UPLOAD_TIMEOUT_SECS", 60u64);
        let step = parse_or(&lookup, "PROGRESS_STEP", defaults.progress.step);
        let interval_ms = parse_or(&lookup, "PROGRESS_INTERVAL_MS", 300u64);

        Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            upload_endpoint: lookup("UPLOAD_ENDPOINT").unwrap_or(defaults.upload_endpoint),
            upload_timeout: Duration::from_secs(timeout_secs),
            progress: ProgressConfig {
                step: step.clamp(1, MAX_PROGRESS_STEP),
                interval: Duration::from_millis(interval_ms.max(1)),
            },
            current_user_id: lookup("CURRENT_USER_ID").unwrap_or(defaults.current_user_id),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("⚠️ Ignoring invalid value for {}: {:?}", key, raw);
            default
        }),
        None => default,
    }
}
