use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

// ============================================
// Transport seam
// ============================================

#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request and returns whatever the server answered. Only failures to
/// get a response at all are errors here; status handling is the client's job.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

// ============================================
// Token seam
// ============================================

/// Whatever the auth provider hands out: a bearer token, or nothing when
/// signed out.
#[async_trait(?Send)]
pub trait TokenSource {
    async fn token(&self) -> Option<String>;
}

/// Fixed token from configuration.
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token)
    }
}

#[async_trait(?Send)]
impl TokenSource for StaticToken {
    async fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

// ============================================
// Client facade
// ============================================

#[derive(Clone, Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn json<B: Serialize + ?Sized>(method: Method, body: &B) -> ApiResult<Self> {
        Ok(Self {
            method,
            body: Some(serde_json::to_string(body)?),
            headers: Vec::new(),
        })
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Authenticated JSON access to the tracker backend. One attempt per call, no
/// retries and no timeout.
#[derive(Clone)]
pub struct ApiClient {
    base: String,
    transport: Arc<dyn Transport>,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
            && Arc::ptr_eq(&self.transport, &other.transport)
            && match (&self.tokens, &other.tokens) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl ApiClient {
    pub fn new(
        base: impl Into<String>,
        transport: Arc<dyn Transport>,
        tokens: Option<Arc<dyn TokenSource>>,
    ) -> Self {
        Self {
            base: base.into(),
            transport,
            tokens,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenSource> = Arc::new(StaticToken::new(config.api_token.clone()));
        Self::new(
            config.api_base.clone(),
            Arc::new(ReqwestTransport::new()),
            None,
        )
        .with_token_source(tokens)
    }

    /// Register (or replace) the token getter of the auth provider.
    pub fn with_token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        for (name, value) in options.headers {
            set_header(&mut headers, name, value);
        }

        if let Some(tokens) = &self.tokens
            && let Some(token) = tokens.token().await
            && !has_header(&headers, "authorization")
        {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let method = options.method;
        debug!(%method, endpoint, "api request");
        let request = HttpRequest {
            method: method.clone(),
            url: format!("{}{}", self.base, endpoint),
            headers,
            body: options.body,
        };

        let response = self.transport.send(request).await.inspect_err(|err| {
            warn!(%method, endpoint, error = %err, "api request failed without response");
        })?;

        match response.status {
            200..=299 => serde_json::from_str(&response.body).map_err(|err| {
                warn!(%method, endpoint, error = %err, "api response did not decode");
                ApiError::from(err)
            }),
            401 => {
                warn!(%method, endpoint, "api request unauthorized");
                Err(ApiError::Unauthorized)
            }
            status => {
                warn!(%method, endpoint, status, "api request failed");
                Err(ApiError::Status(status))
            }
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.request(endpoint, RequestOptions::default()).await
    }

    pub async fn post_json<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, RequestOptions::json(Method::POST, body)?)
            .await
    }

    pub async fn put_json<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, RequestOptions::json(Method::PUT, body)?)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.request(endpoint, RequestOptions::method(Method::DELETE))
            .await
    }
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(key, _)| key.eq_ignore_ascii_case(name))
}

fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers
        .iter_mut()
        .find(|(key, _)| key.eq_ignore_ascii_case(&name))
    {
        Some(existing) => *existing = (name, value),
        None => headers.push((name, value)),
    }
}

/// Encoded `?a=b&c=d` suffix; empty when there are no pairs.
pub fn query_string(pairs: &[(&str, &str)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let mut url = match reqwest::Url::parse("http://localhost/") {
        Ok(url) => url,
        Err(_) => return String::new(),
    };
    url.query_pairs_mut().extend_pairs(pairs.iter().copied());
    url.query().map(|query| format!("?{query}")).unwrap_or_default()
}
