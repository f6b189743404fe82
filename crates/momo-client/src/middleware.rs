//! Auth injection and envelope normalization hooks.

use crate::client::MomoClientConfig;
use crate::error::{ClientError, MomoError};
use crate::raw::{Middleware, RawResponse, RequestInfo};
use async_trait::async_trait;
use momo_types::{Envelope, ErrorBody, ErrorCode};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// Supplies an API key per request (e.g. from a token cache or keychain).
#[async_trait]
pub trait ApiKeyProvider: Send + Sync {
    async fn api_key(&self) -> Option<String>;
}

#[async_trait]
impl<F, Fut> ApiKeyProvider for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Option<String>> + Send + 'static,
{
    async fn api_key(&self) -> Option<String> {
        (self)().await
    }
}

/// Provider result when one is configured, otherwise the static key. Empty keys count as none.
pub async fn resolve_api_key(config: &MomoClientConfig) -> Option<String> {
    let key = match config.key_provider {
        Some(ref provider) => provider.api_key().await,
        None => config.api_key.clone(),
    };
    key.filter(|k| !k.is_empty())
}

pub(crate) fn bearer(key: &str) -> Result<HeaderValue, ClientError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", key))
        .map_err(|e| ClientError::Config(format!("API key is not a valid header value: {}", e)))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Sets `Authorization: Bearer <key>` when a key resolves.
pub struct AuthMiddleware {
    config: Arc<MomoClientConfig>,
}

impl AuthMiddleware {
    pub fn new(config: Arc<MomoClientConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Middleware for AuthMiddleware {
    async fn on_request(&self, request: &mut reqwest::Request) -> Result<(), ClientError> {
        if let Some(key) = resolve_api_key(&self.config).await {
            request.headers_mut().insert(AUTHORIZATION, bearer(&key)?);
        }
        Ok(())
    }
}

/// Turns error envelopes into [`MomoError`] and strips the `data` wrapper from successes.
pub struct EnvelopeMiddleware;

#[async_trait]
impl Middleware for EnvelopeMiddleware {
    async fn on_response(
        &self,
        info: &RequestInfo,
        response: RawResponse,
    ) -> Result<RawResponse, ClientError> {
        normalize_response(info, response)
    }
}

/// Build the normalized error for a failed call.
pub(crate) fn api_error(info: &RequestInfo, response: &RawResponse, body: Option<ErrorBody>) -> MomoError {
    let status = response.status.as_u16();
    let body = body.unwrap_or_default();
    let code = body
        .code
        .as_deref()
        .and_then(|c| c.parse::<ErrorCode>().ok())
        .unwrap_or_else(|| ErrorCode::from_status(status));
    let message = body
        .message
        .unwrap_or_else(|| response.status_text().to_string());
    let err = MomoError {
        status,
        code,
        message,
        path: info.path.clone(),
        method: info.method.to_string(),
    };
    warn!(status = err.status, code = %err.code, method = %err.method, path = %err.path, "request failed");
    err
}

/// Apply the envelope rules to one response.
///
/// Non-2xx always fails: with the envelope's code/message when the body is an
/// error envelope, otherwise with the status-derived code and reason phrase.
/// On 2xx a `data` envelope is replaced by its value; anything else passes through.
pub fn normalize_response(
    info: &RequestInfo,
    response: RawResponse,
) -> Result<RawResponse, ClientError> {
    let envelope = Envelope::parse(&response.body);
    if !response.status.is_success() {
        let body = match envelope {
            Some(Envelope::Error(body)) => Some(body),
            _ => None,
        };
        return Err(api_error(info, &response, body).into());
    }
    match envelope {
        Some(Envelope::Data(data)) => {
            let body = serde_json::to_vec(&data)?;
            Ok(RawResponse { body, ..response })
        }
        _ => Ok(response),
    }
}
