//! Integration tests for the forecast fetch and daily grouping.

use chrono::{NaiveDate, Utc};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skycast_weather::{group_by_day, WeatherClient, WeatherEndpoints, FORECAST_DAYS};

/// 2024-03-01T09:00:00Z
const FIRST_SAMPLE: i64 = 1_709_283_600;

/// Helper to create a five-day, three-hourly forecast body (40 samples)
fn five_day_forecast() -> serde_json::Value {
    let list: Vec<serde_json::Value> = (0..40i64)
        .map(|i| {
            let dt = FIRST_SAMPLE + i * 3 * 3600;
            let at_noon = (dt % 86_400) == 12 * 3600;
            serde_json::json!({
                "dt": dt,
                "main": { "temp_min": i as f64, "temp_max": i as f64 + 10.0 },
                "weather": [{
                    "icon": if at_noon { "01d" } else { "10n" },
                    "description": if at_noon { "clear sky" } else { "light rain" }
                }]
            })
        })
        .collect();
    serde_json::json!({ "cod": "200", "cnt": 40, "list": list })
}

#[tokio::test]
async fn test_forecast_groups_into_five_noon_days() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Lisbon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(five_day_forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let client = WeatherClient::new(WeatherEndpoints {
        api_key: "test_key".to_string(),
        base_url: server.uri(),
        geo_base_url: server.uri(),
        suggestion_limit: 5,
    })
    .unwrap();

    let forecast = client.forecast("Lisbon").await.unwrap();
    assert_eq!(forecast.samples.len(), 40);

    // Samples span March 1st to 6th; only the first five days are kept
    let days = group_by_day(&forecast.samples, &Utc);
    assert_eq!(days.len(), FORECAST_DAYS);

    let dates: Vec<NaiveDate> = days.iter().map(|d| d.date_key).collect();
    let expected: Vec<NaiveDate> = (1..=5)
        .map(|day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap())
        .collect();
    assert_eq!(dates, expected);

    for day in &days {
        assert_eq!(day.icon, "01d");
        assert_eq!(day.description, "clear sky");
    }

    // March 1st holds samples 0..=4 (09:00 through 21:00)
    assert_eq!(days[0].min_temp(), 0.0);
    assert_eq!(days[0].max_temp(), 14.0);
}
