//! GitLab API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Endpoint methods (`client.user(..)`, `client.project(..)`) and
//! pagination are layered on top of [`Client::request`].

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::auth::{self, Credentials};
use crate::config::{ClientConfig, Options};
use crate::error::{ApiError, FoxkitError, Result};
use crate::request::{with_api_prefix, RequestOptions, RequestSpec};
use crate::response::ResponseEnvelope;

/// Low-level GitLab API client.
///
/// Holds one immutable [`ClientConfig`] snapshot and the credentials chosen
/// for it. This struct is cheaply cloneable; clones share the connection
/// pool and the [`last_response`](Client::last_response) slot.
///
/// # Example
///
/// ```no_run
/// use foxkit::{Client, Options};
///
/// # async fn example() -> foxkit::Result<()> {
/// // Configure from FOXKIT_* environment variables
/// let client = Client::from_env()?;
///
/// // Or configure explicitly (environment still fills the gaps)
/// let client = Client::new(Options {
///     api_endpoint: Some("https://gitlab.example.com".to_string()),
///     private_token: Some("glpat-123".to_string()),
///     ..Default::default()
/// })?;
/// let me = client.get("user", Default::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    api_endpoint: Url,
    credentials: Credentials,
    last_response: Mutex<Option<Arc<ResponseEnvelope>>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_endpoint", &self.inner.api_endpoint.as_str())
            .field("credentials", &self.inner.credentials)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client from environment variables alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved endpoint or proxy is not a valid URL.
    pub fn from_env() -> Result<Self> {
        Self::new(Options::default())
    }

    /// Create a client from explicit options layered over the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved endpoint or proxy is not a valid URL.
    pub fn new(options: Options) -> Result<Self> {
        Self::from_config(ClientConfig::from_env(&options))
    }

    /// Create a client from a fully resolved configuration.
    ///
    /// When the config carries no credentials and `.netrc` lookup is on,
    /// the credentials file is read here, once.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint or proxy is not a valid URL, or a
    /// configured header is not a valid HTTP header.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let config = auth::login_from_netrc(config);
        let api_endpoint = Url::parse(&config.api_endpoint)?;
        let credentials = Credentials::select(&config);

        let connection = &config.connection_options;
        let mut builder = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .danger_accept_invalid_certs(connection.accept_invalid_certs);
        if let Some(timeout) = connection.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = connection.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }
        let http = builder.build().map_err(FoxkitError::HttpError)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                api_endpoint,
                credentials,
                last_response: Mutex::new(None),
            }),
        })
    }

    /// Replace the configuration snapshot.
    ///
    /// The mutator sees every current setting; the client is rebuilt from
    /// the result as a whole.
    ///
    /// # Errors
    ///
    /// Returns an error if the new configuration cannot build a client, in
    /// which case `self` is left unchanged.
    pub fn configure<F>(&mut self, mutator: F) -> Result<()>
    where
        F: FnOnce(&mut Options),
    {
        let mut options = self.inner.config.to_options();
        mutator(&mut options);
        *self = Self::from_config(ClientConfig::from_options(options))?;
        Ok(())
    }

    /// The resolved configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The api endpoint URL.
    pub fn api_endpoint(&self) -> &Url {
        &self.inner.api_endpoint
    }

    /// The credential strategy in use.
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    /// True when requests carry any credentials.
    pub fn is_authenticated(&self) -> bool {
        self.inner.credentials.is_authenticated()
    }

    /// True when requests use basic authentication.
    pub fn is_basic_authenticated(&self) -> bool {
        self.inner.credentials.is_basic()
    }

    /// True when requests carry a private token.
    pub fn is_token_authenticated(&self) -> bool {
        self.inner.credentials.is_token()
    }

    /// The most recent response seen by this client (or any clone of it).
    ///
    /// A convenience for sequential use only. Concurrent calls race on this
    /// slot; use the envelope returned by [`Client::request`] instead.
    pub fn last_response(&self) -> Option<Arc<ResponseEnvelope>> {
        self.inner
            .last_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolve a path (or absolute URL) against the api endpoint.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        Ok(self
            .inner
            .api_endpoint
            .join(&with_api_prefix(path, &self.inner.config.api_version))?)
    }

    /// Perform one exchange and return the full envelope.
    ///
    /// # Errors
    ///
    /// Returns [`FoxkitError::Api`] for a 4xx/5xx status, or a transport,
    /// URL or header error.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Arc<ResponseEnvelope>> {
        self.execute(RequestSpec::build(method, path, options)).await
    }

    /// Perform one exchange described by a lifted [`RequestSpec`].
    #[tracing::instrument(skip(self, spec), fields(method = %spec.method, path = %spec.path))]
    pub async fn execute(&self, spec: RequestSpec) -> Result<Arc<ResponseEnvelope>> {
        let mut url = self.url_for(&spec.path)?;
        if !spec.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&spec.query);
        }

        let mut request = self
            .inner
            .http
            .request(spec.method.clone(), url)
            .headers(self.headers_for(&spec)?);
        request = self.inner.credentials.apply(request);
        if let Some(body) = &spec.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await.map_err(FoxkitError::HttpError)?;
        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let bytes = response.bytes().await.map_err(FoxkitError::HttpError)?;

        tracing::debug!(status = status.as_u16(), url = %final_url, "exchange complete");

        let envelope = Arc::new(ResponseEnvelope::new(
            spec.method,
            final_url,
            status,
            headers,
            bytes,
        ));
        *self
            .inner
            .last_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&envelope));

        if let Some(err) =
            ApiError::from_response(&envelope.method, &envelope.url, envelope.status, &envelope.body)
        {
            return Err(err.into());
        }
        Ok(envelope)
    }

    fn headers_for(&self, spec: &RequestSpec) -> Result<HeaderMap> {
        let config = &self.inner.config;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value(&config.default_media_type)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let extra = config
            .connection_options
            .headers
            .iter()
            .chain(spec.headers.iter().map(|(k, v)| (k, v)));
        for (name, value) in extra {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FoxkitError::InvalidConfig(format!("header '{name}': {e}")))?;
            headers.insert(name, header_value(value)?);
        }
        Ok(headers)
    }

    /// GET `path` and return the decoded body.
    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.body(Method::GET, path, options).await
    }

    /// POST to `path` and return the decoded body.
    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.body(Method::POST, path, options).await
    }

    /// PUT to `path` and return the decoded body.
    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.body(Method::PUT, path, options).await
    }

    /// PATCH `path` and return the decoded body.
    pub async fn patch(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.body(Method::PATCH, path, options).await
    }

    /// DELETE `path` and return the decoded body.
    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.body(Method::DELETE, path, options).await
    }

    /// HEAD `path`. The body is always `Value::Null`.
    pub async fn head(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.body(Method::HEAD, path, options).await
    }

    async fn body(&self, method: Method, path: &str, options: RequestOptions) -> Result<Value> {
        let envelope = self.request(method, path, options).await?;
        Ok(envelope.body.clone())
    }

    /// Perform an exchange and report whether it succeeded with 204.
    ///
    /// A NotFound answer is `Ok(false)`; any other failure is returned.
    pub async fn boolean_from_response(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<bool> {
        match self.request(method, path, options).await {
            Ok(envelope) => Ok(envelope.status == reqwest::StatusCode::NO_CONTENT),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| FoxkitError::InvalidConfig(format!("header value '{value}': {e}")))
}

/// Reuses one client while the requested configuration stays the same.
///
/// Owned by the caller; nothing is cached globally.
#[derive(Debug, Default)]
pub struct ClientCache {
    cached: Mutex<Option<(ClientConfig, Client)>>,
}

impl ClientCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached client if it was built from an equal config, else a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if a new client has to be built and cannot be.
    pub fn get_or_build(&self, config: &ClientConfig) -> Result<Client> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((requested, client)) = cached.as_ref() {
            if requested.same_config(config) {
                return Ok(client.clone());
            }
        }
        let client = Client::from_config(config.clone())?;
        *cached = Some((config.clone(), client.clone()));
        Ok(client)
    }

    /// Drop the cached client.
    pub fn clear(&self) {
        *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(options: Options) -> Client {
        Client::from_config(ClientConfig::from_options(options)).unwrap()
    }

    #[test]
    fn test_client_debug() {
        let client = client(Options {
            private_token: Some("test-token".to_string()),
            ..Default::default()
        });
        let debug = format!("{:?}", client);
        assert!(debug.contains("Client"));
        assert!(debug.contains("api_endpoint"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_api_endpoint_trailing_slash() {
        let a = client(Options {
            api_endpoint: Some("https://gitlab.example.com".to_string()),
            ..Default::default()
        });
        let b = client(Options {
            api_endpoint: Some("https://gitlab.example.com/".to_string()),
            ..Default::default()
        });
        assert_eq!(a.api_endpoint().as_str(), b.api_endpoint().as_str());
    }

    #[test]
    fn test_url_for_prefixes_and_encodes() {
        let client = client(Options {
            api_endpoint: Some("https://gitlab.example.com".to_string()),
            ..Default::default()
        });
        assert_eq!(
            client.url_for("/projects/1").unwrap().as_str(),
            "https://gitlab.example.com/api/v3/projects/1"
        );
        assert_eq!(
            client.url_for("api/v3/user").unwrap().as_str(),
            "https://gitlab.example.com/api/v3/user"
        );
        assert_eq!(
            client.url_for("projects/1/repository/files/my file.rb").unwrap().as_str(),
            "https://gitlab.example.com/api/v3/projects/1/repository/files/my%20file.rb"
        );
        assert_eq!(
            client
                .url_for("https://other.example.com/api/v3/users?page=2")
                .unwrap()
                .as_str(),
            "https://other.example.com/api/v3/users?page=2"
        );
    }

    #[test]
    fn test_auth_predicates() {
        let anonymous = client(Options::default());
        assert!(!anonymous.is_authenticated());

        let basic = client(Options {
            login: Some("william".to_string()),
            password: Some("il0veruby".to_string()),
            ..Default::default()
        });
        assert!(basic.is_authenticated());
        assert!(basic.is_basic_authenticated());
        assert!(!basic.is_token_authenticated());
    }

    #[test]
    fn test_configure_replaces_snapshot() {
        let mut client = client(Options {
            per_page: Some(10),
            ..Default::default()
        });
        client
            .configure(|options| {
                options.private_token = Some("glpat-1".to_string());
                options.api_version = Some("v4".to_string());
            })
            .unwrap();

        assert!(client.is_token_authenticated());
        assert_eq!(client.config().api_version, "v4");
        assert_eq!(client.config().per_page, Some(10));
    }

    #[test]
    fn test_configure_failure_keeps_client() {
        let mut client = client(Options::default());
        let result = client.configure(|options| {
            options.api_endpoint = Some("not a url".to_string());
        });
        assert!(result.is_err());
        assert_eq!(client.api_endpoint().as_str(), "https://gitlab.com/");
    }

    #[test]
    fn test_cache_reuses_equal_configs() {
        let cache = ClientCache::new();
        let config = ClientConfig::from_options(Options {
            private_token: Some("glpat-1".to_string()),
            ..Default::default()
        });

        let a = cache.get_or_build(&config).unwrap();
        let b = cache.get_or_build(&config.clone()).unwrap();
        assert!(Arc::ptr_eq(&a.inner, &b.inner));

        let mut other = config.clone();
        other.per_page = Some(5);
        let c = cache.get_or_build(&other).unwrap();
        assert!(!Arc::ptr_eq(&a.inner, &c.inner));

        cache.clear();
        let d = cache.get_or_build(&other).unwrap();
        assert!(!Arc::ptr_eq(&c.inner, &d.inner));
    }
}
