//! HTTP transport and request dispatch.
//!
//! Requests are fire-and-forget: [`Dispatcher::issue`] returns a [`RequestId`]
//! immediately and the outcome later arrives as a [`Completion`] on a single
//! channel shared by every request. A completion carries only the id and the
//! URL, never the operation that caused it.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::debug;
use url::Url;

use crate::{config::NetworkConfig, error::TransportError};

const MAX_ERROR_BODY: usize = 200;

#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// GET `url` and return the response body of a successful response.
    async fn get(&self, url: &Url) -> Result<String, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(config: &NetworkConfig) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            // Certificate errors are ignored for every request.
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(TransportError::from)?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String, TransportError> {
        let res = self.http.get(url.clone()).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub(crate) u64);

impl RequestId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A finished request as seen by the event loop.
#[derive(Debug, Clone)]
pub struct Completion {
    pub id: RequestId,
    pub url: Url,
    pub result: Result<String, TransportError>,
}

/// Issues requests on the tokio runtime and funnels their completions into one channel.
#[derive(Debug)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    completions: mpsc::UnboundedSender<Completion>,
    next_id: u64,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            transport,
            completions: tx,
            next_id: 0,
        };
        (dispatcher, rx)
    }

    /// Start a GET for `url`. Must be called from within a tokio runtime.
    pub fn issue(&mut self, url: Url) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);

        debug!(%id, %url, "Issuing request");

        let transport = Arc::clone(&self.transport);
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let result = transport.get(&url).await;
            // The receiver is gone only when the session has shut down.
            let _ = tx.send(Completion { id, url, result });
        });

        id
    }

    /// Number of requests issued so far.
    pub fn issued(&self) -> u64 {
        self.next_id
    }
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
