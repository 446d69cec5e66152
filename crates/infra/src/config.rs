use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// First hour of the day (inclusive, local time) reminders may go out
    pub business_hour_start: u32,
    /// Last hour of the day (inclusive, local time) reminders may go out
    pub business_hour_end: u32,
    /// How often the scheduler wakes up to run a reminder pass
    pub poll_interval: Duration,
    /// How many days before the due day the `DueSoon` reminder fires
    pub reminder_days_before: u32,
    /// How many days after the due day the `Overdue` reminder fires
    pub reminder_days_after: u32,
    /// Pacing delay between consecutive gateway calls within one pass.
    /// Keeps the scheduler inside the gateway's rate limits.
    pub inter_message_delay: Duration,
    /// Endpoint of the external SMS gateway
    pub sms_gateway_url: String,
    pub sms_gateway_api_key: String,
}

impl Config {
    pub fn new() -> Self {
        let sms_gateway_url = std::env::var("SMS_GATEWAY_URL").unwrap_or_else(|_| {
            let default_url = "http://localhost:9090/v1/messaging".to_string();
            info!(
                "Did not find SMS_GATEWAY_URL environment variable. Falling back to: {}",
                default_url
            );
            default_url
        });
        let sms_gateway_api_key = match std::env::var("SMS_GATEWAY_API_KEY") {
            Ok(key) => key,
            Err(_) => {
                warn!("SMS_GATEWAY_API_KEY environment variable is not set. The gateway will reject messages until it is provided.");
                String::new()
            }
        };

        Self {
            business_hour_start: parse_env_var("BUSINESS_HOUR_START", 8),
            business_hour_end: parse_env_var("BUSINESS_HOUR_END", 18),
            poll_interval: Duration::from_millis(parse_env_var(
                "POLL_INTERVAL_MILLIS",
                1000 * 60 * 60, // hourly
            )),
            reminder_days_before: parse_env_var("REMINDER_DAYS_BEFORE", 3),
            reminder_days_after: parse_env_var("REMINDER_DAYS_AFTER", 3),
            inter_message_delay: Duration::from_millis(parse_env_var(
                "INTER_MESSAGE_DELAY_MILLIS",
                200,
            )),
            sms_gateway_url,
            sms_gateway_api_key,
        }
    }
}

fn parse_env_var<T: FromStr + Display + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    key, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
