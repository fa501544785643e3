use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,
    pub engine: EngineConfig,
}

/// Tuning knobs for the attendance engine.
///
/// Passed explicitly into the classifier/recalc engine instead of being read
/// from an ambient settings row.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// A completed day whose worked hours fall below this fraction of the
    /// scheduled shift duration is classified as a half day.
    pub half_day_ratio: f64,
    /// Local time of day after which "today" counts as finalized.
    pub daily_cutoff: NaiveTime,
    /// Carry-forward balances expiring within this many days are flagged.
    pub expiry_warning_days: i64,
    /// Minimum available leave days to qualify for encashment.
    pub encashment_min_days: f64,
    /// Entitlement utilization below this ratio raises a high-unused alert.
    pub low_utilization_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            half_day_ratio: 0.5,
            // The nightly settlement job historically ran at 23:30.
            daily_cutoff: NaiveTime::from_hms_opt(23, 30, 0).unwrap(),
            expiry_warning_days: 30,
            encashment_min_days: 5.0,
            low_utilization_ratio: 0.25,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = EngineConfig::default();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
            engine: EngineConfig {
                half_day_ratio: env::var("HALF_DAY_RATIO")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.half_day_ratio),
                daily_cutoff: env::var("DAILY_CUTOFF")
                    .ok()
                    .and_then(|v| NaiveTime::parse_from_str(&v, "%H:%M").ok())
                    .unwrap_or(defaults.daily_cutoff),
                expiry_warning_days: env::var("EXPIRY_WARNING_DAYS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.expiry_warning_days),
                encashment_min_days: env::var("ENCASHMENT_MIN_DAYS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.encashment_min_days),
                low_utilization_ratio: env::var("LOW_UTILIZATION_RATIO")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.low_utilization_ratio),
            },
        }
    }
}
