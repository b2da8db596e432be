use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::{
    error::FetchError,
    model::{Condition, DayForecast, ResolvedPlace, WeatherSnapshot},
};

use super::FORECAST_DAYS;

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weather_code";

/// Request builder and parser for the weather-forecast endpoint.
#[derive(Debug, Clone)]
pub struct ForecastApi {
    endpoint: Url,
}

impl ForecastApi {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }

    fn located(&self, place: &ResolvedPlace) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &place.latitude.to_string())
            .append_pair("longitude", &place.longitude.to_string());
        url
    }

    /// Current conditions at `place`.
    pub fn current_url(&self, place: &ResolvedPlace) -> Url {
        let mut url = self.located(place);
        url.query_pairs_mut()
            .append_pair("current", CURRENT_FIELDS)
            .append_pair("wind_speed_unit", "ms")
            .append_pair("timezone", "auto");
        url
    }

    /// Daily aggregates for the next five days, starting today.
    pub fn daily_url(&self, place: &ResolvedPlace) -> Url {
        let days = FORECAST_DAYS.to_string();
        let mut url = self.located(place);
        url.query_pairs_mut()
            .append_pair("daily", DAILY_FIELDS)
            .append_pair("timezone", "auto")
            .append_pair("forecast_days", &days);
        url
    }
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Option<CurrentBlock>,
}

/// Temperature and weather code are required; without them there is nothing to show.
#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    #[serde(default)]
    apparent_temperature: f64,
    #[serde(default)]
    relative_humidity_2m: f64,
    #[serde(default)]
    wind_speed_10m: f64,
    weather_code: u32,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    daily: Option<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    weather_code: Vec<Option<u32>>,
}

/// Parse a current-conditions body into a snapshot labelled `city`.
pub fn parse_current(body: &str, city: &str) -> Result<WeatherSnapshot, FetchError> {
    let parsed: CurrentResponse = serde_json::from_str(body)?;
    let current = parsed
        .current
        .ok_or_else(|| FetchError::Parse("missing `current` object".into()))?;

    Ok(WeatherSnapshot {
        city: city.to_string(),
        temperature_c: current.temperature_2m,
        feels_like_c: current.apparent_temperature,
        humidity_pct: current.relative_humidity_2m.round().clamp(0.0, 100.0) as u8,
        wind_speed_ms: current.wind_speed_10m,
        weather_code: current.weather_code,
        description: Condition::classify(current.weather_code),
    })
}

/// Parse the daily arrays into days, in the order the API returned them.
///
/// Rows with an unparseable date or a missing value are skipped.
pub fn parse_daily(body: &str) -> Result<Vec<DayForecast>, FetchError> {
    let parsed: DailyResponse = serde_json::from_str(body)?;
    let daily = parsed
        .daily
        .ok_or_else(|| FetchError::Parse("missing `daily` object".into()))?;

    let days = daily
        .time
        .iter()
        .enumerate()
        .filter_map(|(i, time)| {
            let date = NaiveDate::parse_from_str(time, "%Y-%m-%d").ok();
            let max = daily.temperature_2m_max.get(i).copied().flatten();
            let min = daily.temperature_2m_min.get(i).copied().flatten();
            let code = daily.weather_code.get(i).copied().flatten();

            match (date, max, min, code) {
                (Some(date), Some(temp_max_c), Some(temp_min_c), Some(weather_code)) => {
                    Some(DayForecast {
                        date,
                        temp_max_c,
                        temp_min_c,
                        weather_code,
                        description: Condition::classify(weather_code),
                    })
                }
                _ => {
                    debug!(index = i, time = %time, "Skipping incomplete forecast row");
                    None
                }
            }
        })
        .collect();

    Ok(days)
}
