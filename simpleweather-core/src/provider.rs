//! Open-Meteo endpoints: geocoding and forecast.
//!
//! Each submodule builds request URLs and parses response bodies; neither
//! performs I/O on its own except [`GeocodeResolver::resolve`].

use url::Url;

use crate::config::NetworkConfig;

pub mod forecast;
pub mod geocoding;

pub use forecast::ForecastApi;
pub use geocoding::GeocodeResolver;

/// Result-count cap for an explicit search and for pipeline geocoding.
pub const SEARCH_RESULT_COUNT: u8 = 1;
/// Result-count cap for suggestion lookups.
pub const SUGGESTION_RESULT_COUNT: u8 = 10;
pub const FORECAST_DAYS: u8 = 5;

/// Parsed base URLs of the two endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub geocoding: Url,
    pub forecast: Url,
}

impl Endpoints {
    pub fn from_config(config: &NetworkConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            geocoding: Url::parse(&config.geocoding_url)?,
            forecast: Url::parse(&config.forecast_url)?,
        })
    }

    pub fn is_geocoding(&self, url: &Url) -> bool {
        same_endpoint(&self.geocoding, url)
    }

    pub fn is_forecast(&self, url: &Url) -> bool {
        same_endpoint(&self.forecast, url)
    }
}

fn same_endpoint(base: &Url, url: &Url) -> bool {
    base.scheme() == url.scheme()
        && base.host_str() == url.host_str()
        && base.port_or_known_default() == url.port_or_known_default()
        && base.path() == url.path()
}

/// Value of the first `key` query parameter, if present.
pub(crate) fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
