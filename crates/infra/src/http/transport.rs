//! Transport factory
//!
//! Builds immutable `reqwest` clients bound to one bearer token. A token
//! change produces a new [`ApiTransport`] that replaces the current one
//! atomically; requests already built keep the transport they started with.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder};
use tracing::{debug, info};
use trainhub_domain::{ApiConfig, AuthToken, RequestParams, Result, TrainHubError};
use url::Url;

use crate::errors::InfraError;

/// An HTTP client configured for the TrainHub API and one token
#[derive(Debug)]
pub struct ApiTransport {
    client: ReqwestClient,
    base_url: Url,
    token: AuthToken,
}

impl ApiTransport {
    /// Request against `path`, resolved relative to the base URL.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path.trim_start_matches('/'));
        self.client.request(method, url)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    /// POST with the flat string map as JSON body.
    pub fn post(&self, path: &str, params: &RequestParams) -> RequestBuilder {
        self.request(Method::POST, path).json(params)
    }

    pub fn put(&self, path: &str, params: &RequestParams) -> RequestBuilder {
        self.request(Method::PUT, path).json(params)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::DELETE, path)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Produces transports and holds the current one
#[derive(Debug)]
pub struct TransportFactory {
    base_url: Url,
    connect_timeout: Duration,
    read_timeout: Duration,
    request_timeout: Duration,
    user_agent: String,
    current: RwLock<Arc<ApiTransport>>,
}

impl TransportFactory {
    /// Validate the API settings and build the first transport.
    ///
    /// # Errors
    /// `TrainHubError::Config` for an unusable base URL or timeouts whose sum
    /// does not fit in a `Duration`, `TrainHubError::Internal` if the HTTP
    /// client cannot be constructed.
    pub fn new(config: &ApiConfig, token: AuthToken) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;

        let connect_timeout = config.connect_timeout();
        let read_timeout = config.read_timeout();
        // reqwest has no separate write timeout; it is folded into the
        // per-request budget.
        let request_timeout = connect_timeout
            .checked_add(read_timeout)
            .and_then(|sum| sum.checked_add(config.write_timeout()))
            .ok_or_else(|| {
                TrainHubError::Config(format!(
                    "API timeouts overflow: connect {}s + read {}s + write {}s",
                    config.connect_timeout_secs, config.read_timeout_secs, config.write_timeout_secs
                ))
            })?;

        let initial = build_transport(
            &base_url,
            connect_timeout,
            read_timeout,
            request_timeout,
            &config.user_agent,
            token,
        )?;

        info!(base_url = %base_url, authenticated = initial.is_authenticated(), "Transport factory ready");

        Ok(Self {
            base_url,
            connect_timeout,
            read_timeout,
            request_timeout,
            user_agent: config.user_agent.clone(),
            current: RwLock::new(Arc::new(initial)),
        })
    }

    /// Build a transport for `token` without installing it.
    ///
    /// A non-empty token adds `Authorization: Bearer <token>` to every
    /// request; an empty one sends no authorization header.
    pub fn build(&self, token: AuthToken) -> Result<ApiTransport> {
        build_transport(
            &self.base_url,
            self.connect_timeout,
            self.read_timeout,
            self.request_timeout,
            &self.user_agent,
            token,
        )
    }

    /// The transport new requests should use.
    pub fn current(&self) -> Arc<ApiTransport> {
        Arc::clone(&*self.current.read())
    }

    /// Build a transport for `token` and make it current.
    pub fn rebuild(&self, token: AuthToken) -> Result<Arc<ApiTransport>> {
        let transport = Arc::new(self.build(token)?);
        *self.current.write() = Arc::clone(&transport);
        debug!(authenticated = transport.is_authenticated(), "Transport replaced");
        Ok(transport)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Overall per-attempt budget (connect + read + write).
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| TrainHubError::Config(format!("Invalid API base URL '{raw}': {e}")))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(TrainHubError::Config(format!("API base URL must be http(s): {raw}")));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn build_transport(
    base_url: &Url,
    connect_timeout: Duration,
    read_timeout: Duration,
    request_timeout: Duration,
    user_agent: &str,
    token: AuthToken,
) -> Result<ApiTransport> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if !token.is_empty() {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .map_err(|_| TrainHubError::Auth("token contains invalid header characters".into()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
    }

    let client = ReqwestClient::builder()
        .connect_timeout(connect_timeout)
        .read_timeout(read_timeout)
        .timeout(request_timeout)
        .user_agent(user_agent)
        .default_headers(headers)
        .build()
        .map_err(|err| TrainHubError::from(InfraError::from(err)))?;

    Ok(ApiTransport { client, base_url: base_url.clone(), token })
}
