//! HTTP client that exposes response bodies as byte streams.

use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use log::debug;
use reqwest::Client;
use std::pin::Pin;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("bin-shim/", env!("BIN_SHIM_VERSION"));

/// Response body as a stream of chunks. Transport errors surface as
/// `std::io::Error` so the stream can feed an `AsyncRead` adapter.
pub type BodyStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// HTTP client for downloading release archives.
///
/// There is no retry and no timeout: a failed request ends the run and a
/// stalled connection stalls it.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a client identifying itself with [`USER_AGENT`].
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::new(client))
    }

    /// Performs a GET request and returns the body without buffering it.
    /// Non-success statuses are errors.
    #[tracing::instrument(skip(self))]
    pub async fn get_stream(&self, url: &str) -> Result<BodyStream, reqwest::Error> {
        debug!("GET {}...", url);

        let response = self.client.get(url).send().await?.error_for_status()?;

        debug!(
            "{} responded {} (content-length: {:?})",
            url,
            response.status(),
            response.content_length()
        );

        Ok(Box::pin(
            response.bytes_stream().map_err(std::io::Error::other),
        ))
    }
}
