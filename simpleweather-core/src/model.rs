use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Free text typed by the user, as handed to search or suggestion lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery {
    pub raw_text: String,
}

impl PlaceQuery {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self { raw_text: raw_text.into() }
    }

    pub fn trimmed(&self) -> &str {
        self.raw_text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

/// Best geocoding match for a place name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ResolvedPlace {
    /// `"name, country"`, the key used for favorites, the active city and re-lookup.
    pub fn display_identity(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Recover the bare place name from a display identity (`"Paris, France"` -> `"Paris"`).
pub fn bare_place_name(identity: &str) -> &str {
    identity.split_once(", ").map_or(identity, |(name, _)| name)
}

/// Weather category derived from the provider's numeric weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Thunderstorm,
}

impl Condition {
    /// Map a weather code onto a category.
    ///
    /// The bands follow the provider's code table and drive icon selection:
    /// `0` clear, `1..=3` cloudy, `4..=67` rain, `68..=77` snow, above that thunderstorm.
    pub fn classify(code: u32) -> Self {
        match code {
            0 => Condition::Clear,
            1..=3 => Condition::Cloudy,
            4..=67 => Condition::Rain,
            68..=77 => Condition::Snow,
            _ => Condition::Thunderstorm,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "clear",
            Condition::Cloudy => "cloudy",
            Condition::Rain => "rain",
            Condition::Snow => "snow",
            Condition::Thunderstorm => "thunderstorm",
        }
    }

    /// Localization key for the human-readable description.
    pub fn translation_key(&self) -> &'static str {
        match self {
            Condition::Clear => "WeatherConditions/clear",
            Condition::Cloudy => "WeatherConditions/cloudy",
            Condition::Rain => "WeatherConditions/rain",
            Condition::Snow => "WeatherConditions/snow",
            Condition::Thunderstorm => "WeatherConditions/thunderstorm",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Condition::Clear => "☀️",
            Condition::Cloudy => "☁️",
            Condition::Rain => "🌧️",
            Condition::Snow => "❄️",
            Condition::Thunderstorm => "⛈️",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current conditions for one city, in metric units as delivered by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_ms: f64,
    pub weather_code: u32,
    pub description: Condition,
}

/// One day of the multi-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub temp_max_c: f64,
    pub temp_min_c: f64,
    pub weather_code: u32,
    pub description: Condition,
}

/// Display unit system. Data is always stored metric and converted on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Units {
    const MS_TO_MPH: f64 = 2.237;

    pub fn toggled(self) -> Self {
        match self {
            Units::Celsius => Units::Fahrenheit,
            Units::Fahrenheit => Units::Celsius,
        }
    }

    pub fn convert_temp(self, celsius: f64) -> f64 {
        match self {
            Units::Celsius => celsius,
            Units::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn convert_speed(self, meters_per_second: f64) -> f64 {
        match self {
            Units::Celsius => meters_per_second,
            Units::Fahrenheit => meters_per_second * Self::MS_TO_MPH,
        }
    }

    pub fn temp_symbol(self) -> &'static str {
        match self {
            Units::Celsius => "°C",
            Units::Fahrenheit => "°F",
        }
    }

    /// Localization key for the wind speed label.
    pub fn speed_key(self) -> &'static str {
        match self {
            Units::Celsius => "Weather/speed_ms",
            Units::Fahrenheit => "Weather/speed_mph",
        }
    }
}
