//! Two-stage fetch chains: geocode the display identity, then request
//! current conditions or the daily forecast for the resolved coordinates.
//!
//! Stage one is tracked here by request id and consumed before the response
//! classifier sees it. Stage two goes through the classifier like any other
//! completion; only the display identity it was issued for is remembered.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    error::FetchError,
    model::{ResolvedPlace, bare_place_name},
    provider::{Endpoints, ForecastApi, GeocodeResolver, geocoding},
    transport::{Completion, Dispatcher, RequestId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Current,
    Forecast,
}

#[derive(Debug, Clone)]
struct Chain {
    kind: PipelineKind,
    identity: String,
}

#[derive(Debug)]
pub struct Pipelines {
    geocoder: GeocodeResolver,
    api: ForecastApi,
    geocoding: HashMap<RequestId, Chain>,
    fetching: HashMap<RequestId, String>,
    /// Display identity -> coordinates; `None` when caching is disabled.
    places: Option<HashMap<String, ResolvedPlace>>,
}

impl Pipelines {
    pub fn new(endpoints: &Endpoints, cache_places: bool) -> Self {
        Self {
            geocoder: GeocodeResolver::new(endpoints.geocoding.clone()),
            api: ForecastApi::new(endpoints.forecast.clone()),
            geocoding: HashMap::new(),
            fetching: HashMap::new(),
            places: cache_places.then(HashMap::new),
        }
    }

    pub fn geocoder(&self) -> &GeocodeResolver {
        &self.geocoder
    }

    /// Begin a chain for `identity`. Returns the id of the first request issued.
    pub fn start(
        &mut self,
        kind: PipelineKind,
        identity: &str,
        language: &str,
        dispatcher: &mut Dispatcher,
    ) -> RequestId {
        if let Some(place) = self.cached(identity).cloned() {
            debug!(identity, ?kind, "Using cached coordinates");
            return self.issue_data(kind, identity, &place, dispatcher);
        }

        let url = self.geocoder.place_url(bare_place_name(identity), language);
        let id = dispatcher.issue(url);
        self.geocoding.insert(
            id,
            Chain {
                kind,
                identity: identity.to_string(),
            },
        );
        id
    }

    /// Whether `id` is the geocoding stage of a chain.
    pub fn owns(&self, id: RequestId) -> bool {
        self.geocoding.contains_key(&id)
    }

    /// Finish stage one with `completion`. On a match, issues stage two and
    /// returns its id; otherwise the chain ends quietly.
    pub fn advance(
        &mut self,
        completion: Completion,
        dispatcher: &mut Dispatcher,
    ) -> Option<RequestId> {
        let chain = self.geocoding.remove(&completion.id)?;

        match geocoding::finish(completion.result) {
            Ok(place) => {
                debug!(
                    identity = %chain.identity,
                    lat = place.latitude,
                    lon = place.longitude,
                    "Resolved coordinates"
                );
                self.remember(&chain.identity, place.clone());
                Some(self.issue_data(chain.kind, &chain.identity, &place, dispatcher))
            }
            Err(FetchError::NotFound) => {
                debug!(identity = %chain.identity, "No geocoding results, chain ends");
                None
            }
            Err(err) => {
                warn!(identity = %chain.identity, error = %err, "Background geocoding failed");
                None
            }
        }
    }

    /// Display identity a stage-two request was issued for.
    pub fn take_origin(&mut self, id: RequestId) -> Option<String> {
        self.fetching.remove(&id)
    }

    pub fn remember(&mut self, identity: &str, place: ResolvedPlace) {
        if let Some(places) = self.places.as_mut() {
            places.insert(identity.to_string(), place);
        }
    }

    pub fn cached(&self, identity: &str) -> Option<&ResolvedPlace> {
        self.places.as_ref()?.get(identity)
    }

    fn issue_data(
        &mut self,
        kind: PipelineKind,
        identity: &str,
        place: &ResolvedPlace,
        dispatcher: &mut Dispatcher,
    ) -> RequestId {
        let url = match kind {
            PipelineKind::Current => self.api.current_url(place),
            PipelineKind::Forecast => self.api.daily_url(place),
        };
        let id = dispatcher.issue(url);
        self.fetching.insert(id, identity.to_string());
        id
    }
}
