//! Daily grouping of the 3-hourly forecast.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeZone, Timelike};

use crate::types::{ForecastSample, DEFAULT_ICON};

/// Number of days kept for display, today included
pub const FORECAST_DAYS: usize = 5;

/// Local hour whose reading represents the day
const REPRESENTATIVE_HOUR: u32 = 12;

/// All samples that fall on one calendar date
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub date_key: NaiveDate,
    pub temps_min: Vec<f64>,
    pub temps_max: Vec<f64>,
    pub icon: String,
    pub description: String,
    pub representative_timestamp: i64,
}

impl DayBucket {
    fn start(date_key: NaiveDate, sample: &ForecastSample) -> Self {
        Self {
            date_key,
            temps_min: Vec::new(),
            temps_max: Vec::new(),
            icon: condition_text(&sample.icon)
                .unwrap_or(DEFAULT_ICON)
                .to_string(),
            description: condition_text(&sample.description)
                .unwrap_or_default()
                .to_string(),
            representative_timestamp: sample.timestamp_unix,
        }
    }

    /// Lowest minimum across the day, in Celsius
    pub fn min_temp(&self) -> f64 {
        self.temps_min.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Highest maximum across the day, in Celsius
    pub fn max_temp(&self) -> f64 {
        self.temps_max.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

fn condition_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Group samples by their calendar date in `tz`.
///
/// The first sample of a date supplies the icon and description until a
/// noon sample replaces them. A noon sample without a condition keeps the
/// earlier values. Buckets come back ordered by representative
/// timestamp and cut to [`FORECAST_DAYS`].
pub fn group_by_day<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<DayBucket> {
    let mut buckets: Vec<DayBucket> = Vec::new();
    let mut by_date: HashMap<NaiveDate, usize> = HashMap::new();

    for sample in samples {
        let Some(utc) = DateTime::from_timestamp(sample.timestamp_unix, 0) else {
            tracing::debug!("Skipping forecast sample with bad timestamp {}", sample.timestamp_unix);
            continue;
        };
        let local = utc.with_timezone(tz);
        let date_key = local.date_naive();

        let index = *by_date.entry(date_key).or_insert_with(|| {
            buckets.push(DayBucket::start(date_key, sample));
            buckets.len() - 1
        });
        let bucket = &mut buckets[index];

        bucket.temps_min.push(sample.temp_min_c);
        bucket.temps_max.push(sample.temp_max_c);

        if local.hour() == REPRESENTATIVE_HOUR {
            if let Some(icon) = condition_text(&sample.icon) {
                bucket.icon = icon.to_string();
            }
            if let Some(description) = condition_text(&sample.description) {
                bucket.description = description.to_string();
            }
            bucket.representative_timestamp = sample.timestamp_unix;
        }
    }

    buckets.sort_by_key(|b| b.representative_timestamp);
    buckets.truncate(FORECAST_DAYS);
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    const HOUR: i64 = 3600;

    /// 2024-03-01T00:00:00Z
    const MARCH_1: i64 = 1_709_251_200;

    fn sample(ts: i64, min: f64, max: f64, icon: &str) -> ForecastSample {
        ForecastSample {
            timestamp_unix: ts,
            temp_min_c: min,
            temp_max_c: max,
            icon: Some(icon.to_string()),
            description: Some(format!("desc {}", icon)),
        }
    }

    #[test]
    fn test_groups_eight_samples_into_two_days() {
        // 00,06,12,18 on two consecutive days
        let temps = [
            (4.0, 6.0),
            (2.5, 5.0),
            (7.0, 11.4),
            (5.0, 8.0),
            (1.0, 3.0),
            (-0.6, 2.0),
            (6.0, 9.0),
            (3.0, 12.6),
        ];
        let samples: Vec<_> = temps
            .iter()
            .enumerate()
            .map(|(i, (min, max))| sample(MARCH_1 + i as i64 * 6 * HOUR, *min, *max, "02d"))
            .collect();

        let days = group_by_day(&samples, &Utc);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date_key, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(days[0].temps_min.len(), 4);
        assert_eq!(days[0].min_temp(), 2.5);
        assert_eq!(days[0].max_temp(), 11.4);
        assert_eq!(days[1].min_temp(), -0.6);
        assert_eq!(days[1].max_temp(), 12.6);
    }

    #[test]
    fn test_noon_sample_wins_icon() {
        let samples = vec![
            sample(MARCH_1 + 9 * HOUR, 5.0, 6.0, "03d"),
            sample(MARCH_1 + 12 * HOUR, 7.0, 9.0, "01d"),
            sample(MARCH_1 + 15 * HOUR, 6.0, 8.0, "03d"),
        ];

        let days = group_by_day(&samples, &Utc);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].icon, "01d");
        assert_eq!(days[0].description, "desc 01d");
        assert_eq!(days[0].representative_timestamp, MARCH_1 + 12 * HOUR);
    }

    #[test]
    fn test_noon_without_condition_keeps_earlier_values() {
        let api: crate::types::ApiForecast = serde_json::from_value(serde_json::json!({
            "list": [
                {
                    "dt": MARCH_1 + 9 * HOUR,
                    "main": { "temp_min": 5.0, "temp_max": 6.0 },
                    "weather": [{ "icon": "03d", "description": "clouds" }]
                },
                {
                    "dt": MARCH_1 + 12 * HOUR,
                    "main": { "temp_min": 7.0, "temp_max": 9.0 },
                    "weather": [{ "icon": "", "description": "" }]
                }
            ]
        }))
        .unwrap();
        let forecast = crate::types::Forecast::from(api);

        let days = group_by_day(&forecast.samples, &Utc);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].icon, "03d");
        assert_eq!(days[0].description, "clouds");
        assert_eq!(days[0].representative_timestamp, MARCH_1 + 12 * HOUR);
        assert_eq!(days[0].max_temp(), 9.0);
    }

    #[test]
    fn test_first_sample_without_condition_uses_default_icon() {
        let mut first = sample(MARCH_1 + 15 * HOUR, 5.0, 6.0, "unused");
        first.icon = None;
        first.description = None;

        let days = group_by_day(&[first], &Utc);

        assert_eq!(days[0].icon, DEFAULT_ICON);
        assert_eq!(days[0].description, "");
    }

    #[test]
    fn test_without_noon_first_sample_wins() {
        let samples = vec![
            sample(MARCH_1 + 15 * HOUR, 5.0, 6.0, "10d"),
            sample(MARCH_1 + 18 * HOUR, 4.0, 5.0, "04n"),
        ];

        let days = group_by_day(&samples, &Utc);

        assert_eq!(days[0].icon, "10d");
        assert_eq!(days[0].representative_timestamp, MARCH_1 + 15 * HOUR);
    }

    #[test]
    fn test_noon_is_local_hour() {
        // 12:00 at UTC+2 is 10:00Z
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let samples = vec![
            sample(MARCH_1 + 4 * HOUR, 5.0, 6.0, "03d"),
            sample(MARCH_1 + 10 * HOUR, 7.0, 9.0, "01d"),
            sample(MARCH_1 + 12 * HOUR, 7.0, 9.0, "09d"),
        ];

        let days = group_by_day(&samples, &tz);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].icon, "01d");
    }

    #[test]
    fn test_date_boundary_follows_timezone() {
        // 23:00Z is already the next day at UTC+3
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let samples = vec![
            sample(MARCH_1 + 20 * HOUR, 5.0, 6.0, "01n"),
            sample(MARCH_1 + 23 * HOUR, 4.0, 5.0, "01n"),
        ];

        let days = group_by_day(&samples, &tz);

        assert_eq!(days.len(), 2);
        assert_eq!(days[1].date_key, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn test_truncates_to_five_days() {
        let samples: Vec<_> = (0..7)
            .map(|day| sample(MARCH_1 + day * 24 * HOUR + 9 * HOUR, 1.0, 2.0, "01d"))
            .collect();

        let days = group_by_day(&samples, &Utc);

        assert_eq!(days.len(), FORECAST_DAYS);
        assert_eq!(days[0].date_key, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(days[4].date_key, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_buckets_sorted_chronologically() {
        let samples = vec![
            sample(MARCH_1 + 2 * 24 * HOUR, 1.0, 2.0, "01d"),
            sample(MARCH_1, 1.0, 2.0, "01d"),
            sample(MARCH_1 + 24 * HOUR, 1.0, 2.0, "01d"),
        ];

        let days = group_by_day(&samples, &Utc);
        let dates: Vec<_> = days.iter().map(|d| d.date_key.format("%d").to_string()).collect();

        assert_eq!(dates, vec!["01", "02", "03"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_day(&[], &Utc).is_empty());
    }
}
