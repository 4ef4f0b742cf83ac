use std::future::Future;

use crate::core::LookupRequest;
use crate::data::RateHeaders;

/// What the verifier needs from one HTTP exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupResponse {
    pub status: u16,
    pub rate:   RateHeaders,
    pub body:   String,
}

impl LookupResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            rate: RateHeaders::default(),
            body: body.into(),
        }
    }

    pub fn with_rate(mut self, rate: RateHeaders) -> Self {
        self.rate = rate;
        self
    }
}

/// Asynchronous client for the remote digest catalog.
///
/// Implementations report every HTTP status as an `Ok` response; only
/// transport failures (DNS, connect, timeout, reading the body) are errors.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Scripted clients in tests
pub trait LookupClient: Send + Sync {
    /// Error type for transport failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send one bulk lookup for the digests in `request`.
    fn lookup(
        &self,
        request: &LookupRequest,
    ) -> impl Future<Output = std::result::Result<LookupResponse, Self::Error>> + Send;

    /// Issue a cheap read whose only purpose is to observe the rate headers.
    fn probe(&self) -> impl Future<Output = std::result::Result<LookupResponse, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use reqwest::header::{HeaderMap, USER_AGENT};

    use crate::data::ClientOptions;
    use crate::error::{LookupError, Result};

    /// Production lookup client using reqwest.
    pub struct ReqwestClient {
        client:  reqwest::Client,
        options: ClientOptions,
    }

    impl ReqwestClient {
        /// Build a client with the timeouts and user agent in `options`.
        pub fn new(options: ClientOptions) -> Result<Self> {
            let client = reqwest::Client::builder()
                .connect_timeout(options.connect_timeout)
                .timeout(options.request_timeout)
                .build()
                .map_err(|e| LookupError::Client(e.to_string()))?;
            Ok(Self { client, options })
        }

        pub fn options(&self) -> &ClientOptions { &self.options }

        async fn into_response(response: reqwest::Response) -> std::result::Result<LookupResponse, reqwest::Error> {
            let status = response.status().as_u16();
            let rate = rate_headers(response.headers());
            let body = response.text().await?;
            Ok(LookupResponse { status, rate, body })
        }
    }

    fn rate_headers(headers: &HeaderMap) -> RateHeaders {
        RateHeaders::from_pairs(
            headers
                .iter()
                .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v))),
        )
    }

    impl LookupClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn lookup(&self, request: &LookupRequest) -> std::result::Result<LookupResponse, Self::Error> {
            let response = self
                .client
                .post(&self.options.endpoint)
                .header(USER_AGENT, &self.options.user_agent)
                .json(request)
                .send()
                .await?;
            Self::into_response(response).await
        }

        async fn probe(&self) -> std::result::Result<LookupResponse, Self::Error> {
            let response = self
                .client
                .get(&self.options.probe_url)
                .header(USER_AGENT, &self.options.user_agent)
                .send()
                .await?;
            Self::into_response(response).await
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
