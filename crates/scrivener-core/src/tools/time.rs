//! Clock lookup for an IANA timezone name

use crate::ToolError;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// 12-hour clock, meridiem, zone abbreviation ("09:05 PM IST")
const TIME_FORMAT: &str = "%I:%M %p %Z";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TimeResult {
    Success { city: String, time: String },
    Error { error: String },
}

impl TimeResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TimeResult::Success { .. })
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, ToolError> {
    name.parse::<Tz>()
        .map_err(|_| ToolError::InvalidTimezone(name.to_string()))
}

/// Format `now` in the named zone. Unknown zones come back as an error result.
pub fn current_time_at(city: &str, now: DateTime<Utc>) -> TimeResult {
    match parse_timezone(city) {
        Ok(tz) => TimeResult::Success {
            city: city.to_string(),
            time: now.with_timezone(&tz).format(TIME_FORMAT).to_string(),
        },
        Err(e) => TimeResult::Error {
            error: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 15, 35, 0).unwrap()
    }

    fn looks_like_12h_clock(time: &str) -> bool {
        let mut parts = time.splitn(3, ' ');
        let clock = parts.next().unwrap_or("");
        let meridiem = parts.next().unwrap_or("");
        let zone = parts.next().unwrap_or("");
        let (h, m) = clock.split_once(':').unwrap_or(("", ""));
        let hour: u32 = h.parse().unwrap_or(0);
        h.len() == 2
            && m.len() == 2
            && (1..=12).contains(&hour)
            && m.chars().all(|c| c.is_ascii_digit())
            && (meridiem == "AM" || meridiem == "PM")
            && !zone.is_empty()
    }

    #[test]
    fn test_kolkata() {
        let result = current_time_at("Asia/Kolkata", instant());
        assert_eq!(
            result,
            TimeResult::Success {
                city: "Asia/Kolkata".to_string(),
                time: "09:05 PM IST".to_string(),
            }
        );
    }

    #[test]
    fn test_valid_zones_use_12h_clock() {
        for zone in ["UTC", "America/New_York", "Europe/Paris", "Asia/Tokyo", "Australia/Sydney"] {
            match current_time_at(zone, instant()) {
                TimeResult::Success { city, time } => {
                    assert_eq!(city, zone);
                    assert!(looks_like_12h_clock(&time), "{zone}: {time}");
                }
                other => panic!("{zone} failed: {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_zone_is_error_result() {
        match current_time_at("Not/AZone", instant()) {
            TimeResult::Error { error } => {
                assert!(!error.is_empty());
                assert!(error.contains("Not/AZone"));
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert!(!current_time_at("", instant()).is_success());
    }

    #[test]
    fn test_serialized_shape() {
        let ok = serde_json::to_value(current_time_at("UTC", instant())).unwrap();
        assert_eq!(ok["status"], "success");
        assert_eq!(ok["time"], "03:35 PM UTC");

        let err = serde_json::to_value(current_time_at("Not/AZone", instant())).unwrap();
        assert_eq!(err["status"], "error");
        assert!(err.get("time").is_none());
    }
}
