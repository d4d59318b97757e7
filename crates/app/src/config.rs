//! Start-up configuration from environment variables.

use chrono::format::{Item, StrftimeItems};

use stockkeeper_observability::LogFormat;

use crate::view::{DEFAULT_TIME_FORMAT, TimeDisplay, TimeZoneChoice};

pub const LOG_FORMAT_VAR: &str = "STOCKKEEPER_LOG_FORMAT";
pub const TIME_FORMAT_VAR: &str = "STOCKKEEPER_TIME_FORMAT";
pub const UTC_VAR: &str = "STOCKKEEPER_UTC";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub log_format: LogFormat,
    pub time: TimeDisplay,
    /// Problems found while reading the environment. Logged once tracing is up.
    pub warnings: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        let log_format = match lookup(LOG_FORMAT_VAR) {
            None => LogFormat::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warnings.push(format!("{LOG_FORMAT_VAR}: {e}"));
                LogFormat::default()
            }),
        };

        let time_format = match lookup(TIME_FORMAT_VAR) {
            Some(raw) if valid_time_format(&raw) => raw,
            Some(raw) => {
                warnings.push(format!("{TIME_FORMAT_VAR}: invalid strftime pattern {raw:?}"));
                DEFAULT_TIME_FORMAT.to_string()
            }
            None => DEFAULT_TIME_FORMAT.to_string(),
        };

        let zone = match lookup(UTC_VAR).as_deref().map(str::trim) {
            None | Some("") => TimeZoneChoice::Local,
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => TimeZoneChoice::Utc,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") => TimeZoneChoice::Local,
            Some(v) => {
                warnings.push(format!("{UTC_VAR}: expected true/false, got {v:?}"));
                TimeZoneChoice::Local
            }
        };

        Self {
            log_format,
            time: TimeDisplay::new(time_format, zone),
            warnings,
        }
    }
}

/// A pattern chrono can render without failing.
pub fn valid_time_format(pattern: &str) -> bool {
    !pattern.is_empty() && !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}
