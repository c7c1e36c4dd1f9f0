//! Time-of-day wire format
//!
//! Accepts `H:MM`, `HH:MM`, `HH:MM:SS` and `HH:MM:SS.ffffff`. Writes
//! `HH:MM:SS`, or `HH:MM:SS.ffffff` when the time carries a fraction.
//! Precision is microseconds; further digits are truncated on input.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

const OUTPUT_FORMAT: &str = "%H:%M:%S";
const FRACTIONAL_OUTPUT_FORMAT: &str = "%H:%M:%S%.6f";
const INPUT_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Parse a time of day from any accepted input format
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();

    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .and_then(|time| time.with_nanosecond(time.nanosecond() / 1_000 * 1_000))
}

/// Render a time of day in the output format
pub fn format_time_of_day(time: &NaiveTime) -> String {
    let format = if time.nanosecond() == 0 {
        OUTPUT_FORMAT
    } else {
        FRACTIONAL_OUTPUT_FORMAT
    };

    time.format(format).to_string()
}

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_time_of_day(time))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_time_of_day(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid time '{}': use one of the formats hh:mm[:ss[.uuuuuu]]",
            raw
        ))
    })
}

/// Same format for optional fields (partial updates)
pub mod option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse_time_of_day(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "invalid time '{}': use one of the formats hh:mm[:ss[.uuuuuu]]",
                    raw
                ))
            }),
            None => Ok(None),
        }
    }
}
