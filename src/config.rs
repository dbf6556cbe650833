use std::env;
use std::time::Duration;

const DEFAULT_REMOTE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATUS_INTERVAL_SECS: u64 = 60;
const DEFAULT_RETRAIN_DELAY_SECS: u64 = 3;
const HAPTIC_PULSE_MILLIS: u64 = 15;

/// Timing knobs of the sync layer.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub status_interval: Duration,
    pub retrain_delay: Duration,
    pub haptic_pulse: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            status_interval: Duration::from_secs(DEFAULT_STATUS_INTERVAL_SECS),
            retrain_delay: Duration::from_secs(DEFAULT_RETRAIN_DELAY_SECS),
            haptic_pulse: Duration::from_millis(HAPTIC_PULSE_MILLIS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub remote_url: String,
    pub port: u16,
    pub sync: SyncSettings,
}

impl Settings {
    pub fn from_env() -> Self {
        let remote_url = env::var("SHOP_REMOTE_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_REMOTE_URL.to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let status_interval = seconds_from_env("SHOP_STATUS_INTERVAL_SECS")
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_STATUS_INTERVAL_SECS);
        let retrain_delay =
            seconds_from_env("SHOP_RETRAIN_DELAY_SECS").unwrap_or(DEFAULT_RETRAIN_DELAY_SECS);

        Self {
            remote_url,
            port,
            sync: SyncSettings {
                status_interval: Duration::from_secs(status_interval),
                retrain_delay: Duration::from_secs(retrain_delay),
                ..SyncSettings::default()
            },
        }
    }
}

fn seconds_from_env(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}
