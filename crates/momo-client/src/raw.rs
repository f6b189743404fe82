//! Raw REST transport: request building, middleware chain, cancellation.
//!
//! This is the layer the resource groups sit on. It is public so callers can
//! reach endpoints the groups do not wrap.

use crate::error::ClientError;
use crate::options::RequestOptions;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Method and path of the request a response belongs to.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub path: String,
}

/// A fully-read response, as seen by response hooks.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Canonical reason phrase for the status (empty when unknown).
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }
}

/// Hook pair run around every request sent through a [`RawClient`].
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn on_request(&self, _request: &mut reqwest::Request) -> Result<(), ClientError> {
        Ok(())
    }

    async fn on_response(
        &self,
        _info: &RequestInfo,
        response: RawResponse,
    ) -> Result<RawResponse, ClientError> {
        Ok(response)
    }
}

/// Bytes left literal in query names and values: `A-Za-z0-9-_.!~*()`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// Query pairs. Lists are encoded as repeated `name[]=value`; `None` is skipped.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opt<V: ToString>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.pairs.push((name.to_string(), v.to_string()));
        }
        self
    }

    pub fn list<V: ToString>(mut self, name: &str, values: Option<&[V]>) -> Self {
        if let Some(values) = values {
            let key = format!("{}[]", name);
            for v in values {
                self.pairs.push((key.clone(), v.to_string()));
            }
        }
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `name=value` joined by `&`, percent-encoded (space is `%20`), with a
    /// list suffix `[]` kept literal.
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(name, value)| {
                let (base, suffix) = match name.strip_suffix("[]") {
                    Some(base) => (base, "[]"),
                    None => (name.as_str(), ""),
                };
                format!(
                    "{}{}={}",
                    utf8_percent_encode(base, QUERY_COMPONENT),
                    suffix,
                    utf8_percent_encode(value, QUERY_COMPONENT)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Method, path segments, query and optional JSON body.
#[derive(Debug, Clone)]
pub struct RawRequest {
    pub method: Method,
    segments: Vec<String>,
    query: Query,
    body: Option<serde_json::Value>,
}

impl RawRequest {
    /// `path` is split on `/`; use [`RawRequest::segment`] for caller-supplied ids.
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: Query::new(),
            body: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: &str) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one path segment; it is percent-encoded, so `/` stays inside it.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn json<B: serde::Serialize>(mut self, body: &B) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    fn url(&self, base: &Url) -> Result<Url, ClientError> {
        let mut url = base.clone();
        {
            let mut segs = url
                .path_segments_mut()
                .map_err(|_| ClientError::Config(format!("base URL cannot be a base: {}", base)))?;
            segs.pop_if_empty();
            segs.extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.set_query(Some(&self.query.encode()));
        }
        Ok(url)
    }
}

/// Thin reqwest wrapper that runs a middleware chain on every call.
#[derive(Clone)]
pub struct RawClient {
    http: reqwest::Client,
    base_url: Url,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl std::fmt::Debug for RawClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawClient")
            .field("base_url", &self.base_url.as_str())
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

impl RawClient {
    pub fn new(base_url: &str, http: reqwest::Client) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL {:?}: {}", base_url, e)))?;
        Ok(Self {
            http,
            base_url,
            middleware: Vec::new(),
        })
    }

    /// Append a hook. Request hooks run in registration order, response hooks in reverse.
    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Build the absolute URL for a request (used by the multipart path too).
    pub fn url_for(&self, request: &RawRequest) -> Result<Url, ClientError> {
        request.url(&self.base_url)
    }

    /// Send through the middleware chain and return the (possibly rewritten) response.
    pub async fn send(
        &self,
        request: RawRequest,
        opts: &RequestOptions,
    ) -> Result<RawResponse, ClientError> {
        let url = request.url(&self.base_url)?;
        let mut builder = self.http.request(request.method.clone(), url);
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }
        let mut req = builder.build()?;
        apply_options(&mut req, opts)?;

        for m in &self.middleware {
            m.on_request(&mut req).await?;
        }

        let info = RequestInfo {
            method: req.method().clone(),
            path: req.url().path().to_string(),
        };
        debug!(method = %info.method, path = %info.path, "sending request");

        let http = self.http.clone();
        let mut response = with_cancel(opts, async move {
            let res = http.execute(req).await?;
            read_response(res).await
        })
        .await?;
        debug!(method = %info.method, path = %info.path, status = response.status.as_u16(), "received response");

        for m in self.middleware.iter().rev() {
            response = m.on_response(&info, response).await?;
        }
        Ok(response)
    }

    /// Send and decode the body as `T`.
    pub async fn json<T: DeserializeOwned>(
        &self,
        request: RawRequest,
        opts: &RequestOptions,
    ) -> Result<T, ClientError> {
        let response = self.send(request, opts).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }
}

/// Attach per-call headers and timeout to a built request.
pub(crate) fn apply_options(
    req: &mut reqwest::Request,
    opts: &RequestOptions,
) -> Result<(), ClientError> {
    for (name, value) in &opts.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::Config(format!("invalid header name {:?}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ClientError::Config(format!("invalid header value: {}", e)))?;
        req.headers_mut().append(name, value);
    }
    if let Some(timeout) = opts.timeout {
        *req.timeout_mut() = Some(timeout);
    }
    Ok(())
}

pub(crate) async fn read_response(res: reqwest::Response) -> Result<RawResponse, ClientError> {
    let status = res.status();
    let headers = res.headers().clone();
    let body = res.bytes().await?.to_vec();
    Ok(RawResponse {
        status,
        headers,
        body,
    })
}

/// Race the exchange against the caller's cancellation token, if any.
pub(crate) async fn with_cancel<T, F>(opts: &RequestOptions, fut: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match opts.cancel {
        Some(ref token) => {
            tokio::select! {
                res = fut => res,
                _ = token.cancelled() => Err(ClientError::Cancelled),
            }
        }
        None => fut.await,
    }
}
