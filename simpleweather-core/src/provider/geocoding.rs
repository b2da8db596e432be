use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::{
    error::{FetchError, TransportError},
    model::ResolvedPlace,
    transport::Transport,
};

use super::{SEARCH_RESULT_COUNT, SUGGESTION_RESULT_COUNT};

/// Turns free text into coordinates via the geocoding endpoint.
#[derive(Debug, Clone)]
pub struct GeocodeResolver {
    endpoint: Url,
}

impl GeocodeResolver {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }

    /// Single best match for `name`, localized for `language`.
    pub fn place_url(&self, name: &str, language: &str) -> Url {
        let count = SEARCH_RESULT_COUNT.to_string();
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("count", &count)
            .append_pair("language", language)
            .append_pair("format", "json");
        url
    }

    /// Up to ten candidates for the suggestion list.
    pub fn suggestions_url(&self, text: &str, language: &str) -> Url {
        let count = SUGGESTION_RESULT_COUNT.to_string();
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("name", text)
            .append_pair("count", &count)
            .append_pair("language", language);
        url
    }

    /// Resolve `name` with one round trip through `transport`.
    pub async fn resolve(
        &self,
        transport: &dyn Transport,
        name: &str,
        language: &str,
    ) -> Result<ResolvedPlace, FetchError> {
        let url = self.place_url(name, language);
        debug!(%url, "Geocoding");
        let body = transport.get(&url).await?;
        best_match(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Vec<GeoResult>,
}

/// Candidates without a name or coordinates are dropped individually.
#[derive(Debug, Deserialize)]
struct GeoResult {
    name: Option<String>,
    #[serde(default)]
    country: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl GeoResult {
    fn into_place(self) -> Option<ResolvedPlace> {
        Some(ResolvedPlace {
            name: self.name?,
            country: self.country,
            latitude: self.latitude?,
            longitude: self.longitude?,
        })
    }
}

/// All usable candidates in API order. An absent `results` array is an empty list.
pub fn parse_places(body: &str) -> Result<Vec<ResolvedPlace>, FetchError> {
    let parsed: GeoResponse = serde_json::from_str(body)?;
    Ok(parsed
        .results
        .into_iter()
        .enumerate()
        .filter_map(|(i, result)| {
            let place = result.into_place();
            if place.is_none() {
                debug!(index = i, "Skipping incomplete geocoding result");
            }
            place
        })
        .collect())
}

/// First candidate only; further candidates are discarded.
pub fn best_match(body: &str) -> Result<ResolvedPlace, FetchError> {
    parse_places(body)?
        .into_iter()
        .next()
        .ok_or(FetchError::NotFound)
}

/// Outcome of a completed geocoding request.
pub fn finish(result: Result<String, TransportError>) -> Result<ResolvedPlace, FetchError> {
    best_match(&result?)
}
