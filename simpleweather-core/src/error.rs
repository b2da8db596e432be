//! Error types shared by the request pipelines and the orchestrator.

use thiserror::Error;

/// Failure reported by a [`Transport`](crate::transport::Transport) for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection, TLS or body-read failure.
    #[error("request failed: {0}")]
    Request(String),
}

/// Outcome of a geocoding or forecast stage that did not produce data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The geocoding endpoint returned no results.
    #[error("no place matched the query")]
    NotFound,

    /// The transport reported a failure; carries its error text for display.
    #[error("{0}")]
    Transport(String),

    /// The body was not the JSON shape we expect.
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        FetchError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// Rejected user input, reported before any request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("search text is empty")]
    EmptySearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FavoriteError {
    /// There is no active city to add.
    #[error("no city is currently selected")]
    NoActiveCity,
}
