use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::macros::{date, format_description};
use time::{Date, Duration};

use crate::ValidationError;

/// Earliest date the dataset covers.
pub const MIN_DATE: Date = date!(2020 - 01 - 01);
/// Latest date the dataset covers.
pub const MAX_DATE: Date = date!(2025 - 08 - 31);

/// Parse a `YYYY-MM-DD` date.
pub fn parse_iso_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        ValidationError::InvalidDate {
            value: input.to_owned(),
        }
    })
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_iso_date(value: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        value.year(),
        u8::from(value.month()),
        value.day()
    )
}

/// Constrain a date to `[MIN_DATE, MAX_DATE]`.
pub fn clamp_date(value: Date) -> Date {
    value.clamp(MIN_DATE, MAX_DATE)
}

/// Inclusive date range inside the allowed window with `start <= end`.
///
/// Every constructor corrects its input instead of failing, so a value of
/// this type is always safe to send to the data endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(rename = "start_date", with = "iso_date")]
    start: Date,
    #[serde(rename = "end_date", with = "iso_date")]
    end: Date,
}

impl DateRange {
    /// Clamp both ends independently, then pull `start` back to `end` if they crossed.
    pub fn clamp(start: Date, end: Date) -> Self {
        let start = clamp_date(start);
        let end = clamp_date(end);
        Self {
            start: start.min(end),
            end,
        }
    }

    /// Build a range from raw form values.
    ///
    /// An unparseable start falls back to [`MIN_DATE`] and an unparseable end
    /// to [`MAX_DATE`].
    pub fn from_inputs(start: &str, end: &str) -> Self {
        let start = parse_iso_date(start).unwrap_or(MIN_DATE);
        let end = parse_iso_date(end).unwrap_or(MAX_DATE);
        Self::clamp(start, end)
    }

    /// The trailing `days` ending at `today`, clamped.
    pub fn trailing_days(today: Date, days: i64) -> Self {
        let start = today
            .checked_sub(Duration::days(days))
            .unwrap_or(MIN_DATE);
        Self::clamp(start, today)
    }

    pub const fn start(&self) -> Date {
        self.start
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, value: Date) -> bool {
        self.start <= value && value <= self.end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: MIN_DATE,
            end: MAX_DATE,
        }
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            format_iso_date(self.start),
            format_iso_date(self.end)
        )
    }
}

mod iso_date {
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S>(value: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso_date(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        super::parse_iso_date(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dates() -> Vec<Date> {
        vec![
            date!(1999 - 12 - 31),
            date!(2019 - 12 - 31),
            MIN_DATE,
            date!(2022 - 06 - 15),
            MAX_DATE,
            date!(2025 - 09 - 01),
            date!(2031 - 01 - 01),
        ]
    }

    #[test]
    fn clamp_stays_in_window_and_is_idempotent() {
        for value in sample_dates() {
            let clamped = clamp_date(value);
            assert!((MIN_DATE..=MAX_DATE).contains(&clamped), "{value} escaped");
            assert_eq!(clamp_date(clamped), clamped);
        }
    }

    #[test]
    fn start_never_exceeds_end() {
        for start in sample_dates() {
            for end in sample_dates() {
                let range = DateRange::clamp(start, end);
                assert!(range.start() <= range.end(), "{start} / {end}");
            }
        }
    }

    #[test]
    fn crossed_range_collapses_onto_end() {
        let range = DateRange::clamp(date!(2024 - 05 - 10), date!(2023 - 01 - 02));
        assert_eq!(range.start(), date!(2023 - 01 - 02));
        assert_eq!(range.end(), date!(2023 - 01 - 02));
    }

    #[test]
    fn early_start_clamps_to_minimum() {
        let range = DateRange::from_inputs("2019-01-01", "2024-01-31");
        assert_eq!(format_iso_date(range.start()), "2020-01-01");
        assert_eq!(format_iso_date(range.end()), "2024-01-31");
    }

    #[test]
    fn unparseable_inputs_fall_back_to_bounds() {
        let range = DateRange::from_inputs("yesterday", "");
        assert_eq!(range, DateRange::default());
    }

    #[test]
    fn trailing_days_clamps_future_today() {
        let range = DateRange::trailing_days(date!(2026 - 10 - 14), 30);
        assert_eq!(range.start(), MAX_DATE);
        assert_eq!(range.end(), MAX_DATE);
    }

    #[test]
    fn serializes_with_request_field_names() {
        let range = DateRange::clamp(date!(2021 - 03 - 04), date!(2021 - 04 - 05));
        let value = serde_json::to_value(range).expect("serializes");
        assert_eq!(
            value,
            serde_json::json!({"start_date": "2021-03-04", "end_date": "2021-04-05"})
        );
    }
}
