//! Client configuration and the top-level [`MomoClient`].

use crate::error::ClientError;
use crate::groups::{
    AdminGroup, ConversationsGroup, DocumentsGroup, GraphGroup, HealthGroup, MemoriesGroup,
    ProfileGroup, SearchGroup,
};
use crate::middleware::{ApiKeyProvider, AuthMiddleware, EnvelopeMiddleware};
use crate::raw::RawClient;
use std::fmt;
use std::sync::Arc;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Connection settings for a [`MomoClient`].
#[derive(Clone)]
pub struct MomoClientConfig {
    /// Base URL of the Momo server (e.g. `http://localhost:3000`).
    pub base_url: String,
    /// Static API key.
    pub api_key: Option<String>,
    /// Per-request key source; takes precedence over `api_key` when set.
    pub key_provider: Option<Arc<dyn ApiKeyProvider>>,
    /// Applied to calls that accept a container tag when the caller gives none.
    pub default_container_tag: Option<String>,
    /// Custom HTTP client (proxies, TLS settings, connection pool sharing).
    pub http_client: Option<reqwest::Client>,
}

impl MomoClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            key_provider: None,
            default_container_tag: None,
            http_client: None,
        }
    }

    /// Read `MOMO_BASE_URL`, `MOMO_API_KEY` and `MOMO_CONTAINER_TAG`.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("MOMO_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url);
        config.api_key = std::env::var("MOMO_API_KEY").ok();
        config.default_container_tag = std::env::var("MOMO_CONTAINER_TAG").ok();
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_key_provider<P: ApiKeyProvider + 'static>(mut self, provider: P) -> Self {
        self.key_provider = Some(Arc::new(provider));
        self
    }

    pub fn with_default_container_tag(mut self, tag: impl Into<String>) -> Self {
        self.default_container_tag = Some(tag.into());
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// `explicit`, else the default container tag.
    pub(crate) fn container_tag(&self, explicit: Option<String>) -> Option<String> {
        explicit.or_else(|| self.default_container_tag.clone())
    }
}

impl fmt::Debug for MomoClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MomoClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("key_provider", &self.key_provider.is_some())
            .field("default_container_tag", &self.default_container_tag)
            .finish()
    }
}

/// Typed client for the Momo v1 API.
///
/// Every call goes through the auth hook (bearer token) and the envelope hook
/// (unwraps `data`, converts error envelopes into [`crate::MomoError`]).
#[derive(Debug, Clone)]
pub struct MomoClient {
    raw: RawClient,
    config: Arc<MomoClientConfig>,
}

impl MomoClient {
    pub fn new(config: MomoClientConfig) -> Result<Self, ClientError> {
        if config.base_url.is_empty() {
            return Err(ClientError::Config("MomoClient requires a base_url".to_string()));
        }
        let http = config.http_client.clone().unwrap_or_default();
        let config = Arc::new(config);
        let raw = RawClient::new(&config.base_url, http)?
            .with_middleware(Arc::new(AuthMiddleware::new(Arc::clone(&config))))
            .with_middleware(Arc::new(EnvelopeMiddleware));
        Ok(Self { raw, config })
    }

    /// Escape hatch: the underlying transport with both hooks installed.
    pub fn raw(&self) -> &RawClient {
        &self.raw
    }

    pub fn config(&self) -> &MomoClientConfig {
        &self.config
    }

    pub fn documents(&self) -> DocumentsGroup<'_> {
        DocumentsGroup::new(&self.raw, &self.config)
    }

    pub fn memories(&self) -> MemoriesGroup<'_> {
        MemoriesGroup::new(&self.raw, &self.config)
    }

    pub fn search(&self) -> SearchGroup<'_> {
        SearchGroup::new(&self.raw, &self.config)
    }

    pub fn graph(&self) -> GraphGroup<'_> {
        GraphGroup::new(&self.raw)
    }

    pub fn conversations(&self) -> ConversationsGroup<'_> {
        ConversationsGroup::new(&self.raw, &self.config)
    }

    pub fn profile(&self) -> ProfileGroup<'_> {
        ProfileGroup::new(&self.raw, &self.config)
    }

    pub fn admin(&self) -> AdminGroup<'_> {
        AdminGroup::new(&self.raw)
    }

    pub fn health(&self) -> HealthGroup<'_> {
        HealthGroup::new(&self.raw)
    }
}
