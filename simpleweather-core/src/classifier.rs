//! Routes completed responses to a handler by looking at the request URL.
//!
//! Completions carry no operation tag, so the route is inferred from the
//! endpoint and its query shape. This is only sound while every kind of
//! request that can be in flight at the same time has a distinct shape:
//! an explicit search and a suggestion lookup both hit the geocoding
//! endpoint and are told apart by [`PendingSearchSet`] membership and the
//! result-count parameter respectively.

use std::collections::HashSet;

use url::Url;

use crate::{
    provider::{Endpoints, SUGGESTION_RESULT_COUNT, query_param},
    transport::RequestId,
};

/// In-flight requests issued by an explicit search.
#[derive(Debug, Clone, Default)]
pub struct PendingSearchSet {
    ids: HashSet<RequestId>,
}

impl PendingSearchSet {
    pub fn insert(&mut self, id: RequestId) {
        self.ids.insert(id);
    }

    pub fn remove(&mut self, id: RequestId) -> bool {
        self.ids.remove(&id)
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SearchResult,
    Suggestions,
    CurrentWeather,
    Forecast,
    Discard,
}

#[derive(Debug, Clone)]
pub struct ResponseClassifier {
    endpoints: Endpoints,
}

impl ResponseClassifier {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    /// Decide where the completion of request `id` for `url` goes.
    ///
    /// First match wins. A search hit is removed from `pending`.
    pub fn route(&self, id: RequestId, url: &Url, pending: &mut PendingSearchSet) -> Route {
        if self.endpoints.is_geocoding(url) {
            if pending.remove(id) {
                return Route::SearchResult;
            }
            let suggestion_count = SUGGESTION_RESULT_COUNT.to_string();
            if query_param(url, "count").as_deref() == Some(suggestion_count.as_str()) {
                return Route::Suggestions;
            }
            return Route::Discard;
        }

        if self.endpoints.is_forecast(url) {
            if query_param(url, "current").is_some() {
                return Route::CurrentWeather;
            }
            if query_param(url, "daily").is_some() {
                return Route::Forecast;
            }
        }

        Route::Discard
    }
}
