//! What the UI layer receives: display-ready views and notices.
//!
//! Views are rebuilt from the retained snapshots on every unit or language
//! change, so descriptions always come from the stored weather code.

use chrono::NaiveDate;

use crate::{
    i18n::Localizer,
    model::{Condition, DayForecast, Units, WeatherSnapshot},
};

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_unit: &'static str,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub speed_unit: String,
    pub condition: Condition,
    pub description: String,
    pub icon: &'static str,
}

impl WeatherView {
    pub fn render(snapshot: &WeatherSnapshot, units: Units, l10n: &Localizer) -> Self {
        let condition = Condition::classify(snapshot.weather_code);
        Self {
            city: snapshot.city.clone(),
            temperature: units.convert_temp(snapshot.temperature_c),
            feels_like: units.convert_temp(snapshot.feels_like_c),
            temp_unit: units.temp_symbol(),
            humidity_pct: snapshot.humidity_pct,
            wind_speed: units.convert_speed(snapshot.wind_speed_ms),
            speed_unit: l10n.tr(units.speed_key()),
            condition,
            description: l10n.tr(condition.translation_key()),
            icon: condition.icon(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    pub temp_unit: &'static str,
    pub condition: Condition,
    pub description: String,
    pub icon: &'static str,
}

impl DayView {
    pub fn render(day: &DayForecast, units: Units, l10n: &Localizer) -> Self {
        let condition = Condition::classify(day.weather_code);
        Self {
            date: day.date,
            temp_max: units.convert_temp(day.temp_max_c),
            temp_min: units.convert_temp(day.temp_min_c),
            temp_unit: units.temp_symbol(),
            condition,
            description: l10n.tr(condition.translation_key()),
            icon: condition.icon(),
        }
    }

    pub fn render_all(days: &[DayForecast], units: Units, l10n: &Localizer) -> Vec<Self> {
        days.iter().map(|day| Self::render(day, units, l10n)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// A blocking message for the user, already localized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn warning(l10n: &Localizer, title_key: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            title: l10n.tr(title_key),
            message: message.into(),
        }
    }

    pub fn info(l10n: &Localizer, title_key: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: l10n.tr(title_key),
            message: message.into(),
        }
    }
}

/// "Data changed" notifications, in the order the state changed.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    ActiveCity(String),
    Weather(WeatherView),
    Forecast(Vec<DayView>),
    Suggestions(Vec<String>),
    Favorites(Vec<String>),
    Language(String),
    Units(Units),
    Notice(Notice),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            city: "Oslo, Norway".into(),
            temperature_c: 20.0,
            feels_like_c: 18.0,
            humidity_pct: 40,
            wind_speed_ms: 10.0,
            weather_code: 71,
            description: Condition::Snow,
        }
    }

    #[test]
    fn renders_metric() {
        let view = WeatherView::render(&snapshot(), Units::Celsius, &Localizer::new("en"));

        assert_eq!(view.temperature, 20.0);
        assert_eq!(view.temp_unit, "°C");
        assert_eq!(view.speed_unit, "m/s");
        assert_eq!(view.description, "Snow");
        assert_eq!(view.icon, "❄️");
    }

    #[test]
    fn renders_imperial() {
        let view = WeatherView::render(&snapshot(), Units::Fahrenheit, &Localizer::new("en"));

        assert_eq!(view.temperature, 68.0);
        assert!((view.feels_like - 64.4).abs() < 1e-9);
        assert!((view.wind_speed - 22.37).abs() < 1e-9);
        assert_eq!(view.temp_unit, "°F");
        assert_eq!(view.speed_unit, "mph");
    }

    #[test]
    fn description_follows_code_not_stored_text() {
        let mut snap = snapshot();
        // A stale category must not leak into the view.
        snap.description = Condition::Clear;

        let view = WeatherView::render(&snap, Units::Celsius, &Localizer::new("ru"));
        assert_eq!(view.condition, Condition::Snow);
        assert_eq!(view.description, "Снег");
    }
}
