//! Plain-text rendering of core updates.

use simpleweather_core::{DayView, Localizer, Notice, Severity, UiUpdate, Units, WeatherView};

pub fn weather(view: &WeatherView, l10n: &Localizer) -> String {
    format!(
        "{icon} {city}: {temp:.1}{unit}, {desc}\n   {feels}{feels_like:.1}{unit} | {humidity}{hum}% | {wind}{speed:.1} {speed_unit}",
        icon = view.icon,
        city = view.city,
        temp = view.temperature,
        unit = view.temp_unit,
        desc = view.description,
        feels = l10n.tr("Weather/feels_like"),
        feels_like = view.feels_like,
        humidity = l10n.tr("Weather/humidity"),
        hum = view.humidity_pct,
        wind = l10n.tr("Weather/wind"),
        speed = view.wind_speed,
        speed_unit = view.speed_unit,
    )
}

pub fn day(view: &DayView) -> String {
    format!(
        "{date}  {icon}  {max:.0}{unit} / {min:.0}{unit}  {desc}",
        date = view.date.format("%a %d.%m"),
        icon = view.icon,
        max = view.temp_max,
        min = view.temp_min,
        unit = view.temp_unit,
        desc = view.description,
    )
}

pub fn forecast(days: &[DayView], l10n: &Localizer) -> String {
    let mut out = l10n.tr("Forecast/title");
    for view in days {
        out.push_str("\n   ");
        out.push_str(&day(view));
    }
    out
}

pub fn notice(notice: &Notice) -> String {
    let tag = match notice.severity {
        Severity::Info => "info",
        Severity::Warning => "warning",
    };
    format!("[{tag}] {}: {}", notice.title, notice.message)
}

pub fn list(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        return format!("{title}: -");
    }
    format!("{title}: {}", items.join("; "))
}

pub fn units(units: Units) -> &'static str {
    match units {
        Units::Celsius => "celsius",
        Units::Fahrenheit => "fahrenheit",
    }
}

/// One line (or block) per update, as `watch` prints them.
pub fn update(update: &UiUpdate, l10n: &Localizer) -> String {
    match update {
        UiUpdate::ActiveCity(city) => format!("> {city}"),
        UiUpdate::Weather(view) => weather(view, l10n),
        UiUpdate::Forecast(days) => forecast(days, l10n),
        UiUpdate::Suggestions(names) => list("?", names),
        UiUpdate::Favorites(names) => list(&l10n.tr("Favorites/title"), names),
        UiUpdate::Language(code) => format!("language: {code}"),
        UiUpdate::Units(u) => format!("units: {}", units(*u)),
        UiUpdate::Notice(n) => notice(n),
    }
}
