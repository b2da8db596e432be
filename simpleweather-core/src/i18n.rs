//! Localized strings keyed by `"Section/key"`.
//!
//! A [`Localizer`] is owned by whoever renders text and is switched explicitly;
//! nothing here is global.

use std::collections::HashMap;

use tracing::warn;

use crate::config::DEFAULT_LANGUAGE;

pub const SUPPORTED_LANGUAGES: &[&str] = &["ru", "en"];

const EN: &[(&str, &str)] = &[
    ("General/app_title", "Weather"),
    ("General/select_city", "Select a city"),
    ("Search/placeholder", "Enter a city name..."),
    ("Search/button", "Search"),
    ("Search/error_title", "Error"),
    ("Search/error_empty", "Please enter a city name"),
    ("Search/network_error", "Network error"),
    ("Search/failed_to_find", "Failed to find the city: "),
    ("Search/city_not_found", "City not found"),
    ("Favorites/title", "Favorites"),
    ("Favorites/info_title", "Information"),
    ("Favorites/select_first", "Select a city first"),
    ("Favorites/already_added", "This city is already in favorites"),
    ("Favorites/remove_button", "Remove"),
    ("Forecast/title", "5-day forecast"),
    ("Weather/feels_like", "Feels like: "),
    ("Weather/humidity", "Humidity: "),
    ("Weather/wind", "Wind: "),
    ("Weather/speed_ms", "m/s"),
    ("Weather/speed_mph", "mph"),
    ("WeatherConditions/clear", "Clear"),
    ("WeatherConditions/cloudy", "Cloudy"),
    ("WeatherConditions/rain", "Rain"),
    ("WeatherConditions/snow", "Snow"),
    ("WeatherConditions/thunderstorm", "Thunderstorm"),
];

const RU: &[(&str, &str)] = &[
    ("General/app_title", "Погода"),
    ("General/select_city", "Выберите город"),
    ("Search/placeholder", "Введите название города..."),
    ("Search/button", "Поиск"),
    ("Search/error_title", "Ошибка"),
    ("Search/error_empty", "Введите название города"),
    ("Search/network_error", "Ошибка сети"),
    ("Search/failed_to_find", "Не удалось найти город: "),
    ("Search/city_not_found", "Город не найден"),
    ("Favorites/title", "Избранное"),
    ("Favorites/info_title", "Информация"),
    ("Favorites/select_first", "Сначала выберите город"),
    ("Favorites/already_added", "Этот город уже в избранном"),
    ("Favorites/remove_button", "Удалить"),
    ("Forecast/title", "Прогноз на 5 дней"),
    ("Weather/feels_like", "Ощущается как: "),
    ("Weather/humidity", "Влажность: "),
    ("Weather/wind", "Ветер: "),
    ("Weather/speed_ms", "м/с"),
    ("Weather/speed_mph", "миль/ч"),
    ("WeatherConditions/clear", "Ясно"),
    ("WeatherConditions/cloudy", "Облачно"),
    ("WeatherConditions/rain", "Дождь"),
    ("WeatherConditions/snow", "Снег"),
    ("WeatherConditions/thunderstorm", "Гроза"),
];

type Catalog = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct Localizer {
    language: String,
    catalogs: HashMap<String, Catalog>,
}

impl Localizer {
    /// Built-in `ru` and `en` catalogs, starting in `language`.
    ///
    /// Falls back to [`DEFAULT_LANGUAGE`] when no catalog exists for `language`.
    pub fn new(language: &str) -> Self {
        let mut localizer = Self {
            language: DEFAULT_LANGUAGE.to_string(),
            catalogs: HashMap::new(),
        };
        localizer.insert_catalog("en", EN.iter().copied());
        localizer.insert_catalog("ru", RU.iter().copied());

        if !localizer.set_language(language) {
            warn!(language, fallback = DEFAULT_LANGUAGE, "No catalog for language");
            localizer.language = DEFAULT_LANGUAGE.to_string();
        }

        localizer
    }

    /// Add or replace the catalog for `language`.
    pub fn insert_catalog<K, V>(&mut self, language: &str, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let catalog = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.catalogs.insert(language.to_string(), catalog);
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn has_catalog(&self, language: &str) -> bool {
        self.catalogs.contains_key(language)
    }

    /// Switch language. Returns `false` when no catalog is loaded for it; the
    /// switch still happens and lookups then fall back to the literal key.
    pub fn set_language(&mut self, language: &str) -> bool {
        self.language = language.to_string();
        self.has_catalog(language)
    }

    /// The other of the two built-in languages.
    pub fn toggled_language(&self) -> &'static str {
        if self.language == "ru" { "en" } else { "ru" }
    }

    /// Look up `"Section/key"`; unresolved keys come back unchanged.
    pub fn tr(&self, key: &str) -> String {
        match self
            .catalogs
            .get(&self.language)
            .and_then(|catalog| catalog.get(key))
        {
            Some(value) => value.clone(),
            None => {
                warn!(key, language = %self.language, "Translation key not found");
                key.to_string()
            }
        }
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}
