//! Client configuration.
//!
//! Settings are resolved once per client from up to three [`Options`]
//! layers (explicit, caller-held defaults, environment) and then the
//! hardcoded constants below. The result is an immutable [`ClientConfig`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default API endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "https://gitlab.com/";

/// Default web endpoint, used to build browser URLs for projects.
pub const DEFAULT_WEB_ENDPOINT: &str = "https://gitlab.com/";

/// Default API version path segment.
pub const DEFAULT_API_VERSION: &str = "v3";

/// Default `Accept` media type.
pub const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// Default `User-Agent` header.
pub const USER_AGENT: &str = concat!("foxkit/", env!("CARGO_PKG_VERSION"));

/// Page size used when auto-pagination is on and no page size is set.
pub const AUTO_PAGINATE_PER_PAGE: u32 = 100;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Transport-level settings handed to the HTTP client builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Total request timeout.
    pub timeout: Option<Duration>,
    /// TCP connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Extra headers sent with every request.
    pub headers: BTreeMap<String, String>,
    /// Skip TLS certificate verification (self-hosted instances only).
    pub accept_invalid_certs: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            connect_timeout: None,
            headers: BTreeMap::new(),
            accept_invalid_certs: false,
        }
    }
}

/// One layer of partially specified settings.
///
/// Every field is optional; unset fields fall through to the next layer.
///
/// # Example
///
/// ```
/// use foxkit::Options;
///
/// let options = Options {
///     private_token: Some("glpat-123".to_string()),
///     per_page: Some(50),
///     ..Default::default()
/// };
/// assert_eq!(options.per_page, Some(50));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Base URL for API requests.
    pub api_endpoint: Option<String>,
    /// Base URL for browser links.
    pub web_endpoint: Option<String>,
    /// API version segment, e.g. `v3`.
    pub api_version: Option<String>,
    /// Username for basic authentication.
    pub login: Option<String>,
    /// Password for basic authentication.
    pub password: Option<String>,
    /// Private token for token authentication.
    pub private_token: Option<String>,
    /// Page size for list endpoints.
    pub per_page: Option<u32>,
    /// Follow `next` links automatically.
    pub auto_paginate: Option<bool>,
    /// Stop auto-pagination after this many pages.
    pub max_pages: Option<u32>,
    /// Proxy URL.
    pub proxy: Option<String>,
    /// `User-Agent` header.
    pub user_agent: Option<String>,
    /// `Accept` header sent by default.
    pub default_media_type: Option<String>,
    /// Read credentials from a `.netrc` file when none are configured.
    pub netrc: Option<bool>,
    /// Path of the `.netrc` file.
    pub netrc_file: Option<PathBuf>,
    /// Suppress non-fatal configuration warnings.
    pub silent: Option<bool>,
    /// Transport settings.
    pub connection_options: Option<ConnectionOptions>,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("api_endpoint", &self.api_endpoint)
            .field("api_version", &self.api_version)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "*******"))
            .field("private_token", &self.private_token.as_ref().map(|_| "*******"))
            .field("per_page", &self.per_page)
            .field("auto_paginate", &self.auto_paginate)
            .finish_non_exhaustive()
    }
}

impl Options {
    /// Read the `FOXKIT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a layer from an arbitrary variable lookup.
    ///
    /// Unparsable numbers are ignored. Flags are true for any non-empty
    /// value other than `0`, `false`, `no` or `off`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let number = |key: &str| text(key).and_then(|v| v.trim().parse::<u32>().ok());
        let flag = |key: &str| text(key).map(|v| is_truthy(&v));

        Self {
            api_endpoint: text("FOXKIT_API_ENDPOINT"),
            web_endpoint: text("FOXKIT_WEB_ENDPOINT"),
            api_version: text("FOXKIT_API_VERSION"),
            login: text("FOXKIT_LOGIN"),
            password: text("FOXKIT_PASSWORD"),
            private_token: text("FOXKIT_PRIVATE_TOKEN"),
            per_page: number("FOXKIT_PER_PAGE"),
            auto_paginate: flag("FOXKIT_AUTO_PAGINATE"),
            max_pages: number("FOXKIT_MAX_PAGES"),
            proxy: text("FOXKIT_PROXY"),
            user_agent: text("FOXKIT_USER_AGENT"),
            default_media_type: text("FOXKIT_DEFAULT_MEDIA_TYPE"),
            netrc: flag("FOXKIT_NETRC"),
            netrc_file: text("FOXKIT_NETRC_FILE").map(PathBuf::from),
            silent: flag("FOXKIT_SILENT"),
            connection_options: None,
        }
    }

    /// Fill every unset field from `fallback`.
    #[must_use]
    pub fn or(self, fallback: &Options) -> Options {
        Options {
            api_endpoint: self.api_endpoint.or_else(|| fallback.api_endpoint.clone()),
            web_endpoint: self.web_endpoint.or_else(|| fallback.web_endpoint.clone()),
            api_version: self.api_version.or_else(|| fallback.api_version.clone()),
            login: self.login.or_else(|| fallback.login.clone()),
            password: self.password.or_else(|| fallback.password.clone()),
            private_token: self.private_token.or_else(|| fallback.private_token.clone()),
            per_page: self.per_page.or(fallback.per_page),
            auto_paginate: self.auto_paginate.or(fallback.auto_paginate),
            max_pages: self.max_pages.or(fallback.max_pages),
            proxy: self.proxy.or_else(|| fallback.proxy.clone()),
            user_agent: self.user_agent.or_else(|| fallback.user_agent.clone()),
            default_media_type: self
                .default_media_type
                .or_else(|| fallback.default_media_type.clone()),
            netrc: self.netrc.or(fallback.netrc),
            netrc_file: self.netrc_file.or_else(|| fallback.netrc_file.clone()),
            silent: self.silent.or(fallback.silent),
            connection_options: self
                .connection_options
                .or_else(|| fallback.connection_options.clone()),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

fn with_trailing_slash(url: String) -> String {
    if url.ends_with('/') {
        url
    } else {
        format!("{url}/")
    }
}

fn default_netrc_file() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".netrc"))
        .unwrap_or_else(|| PathBuf::from(".netrc"))
}

/// The resolved settings of one client.
///
/// Never modified after construction; reconfiguring a client replaces the
/// whole snapshot. Two configs are equal iff every field is equal.
#[derive(Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ClientConfig {
    /// Base URL for API requests, always ending in `/`.
    pub api_endpoint: String,
    /// Base URL for browser links, always ending in `/`.
    pub web_endpoint: String,
    /// API version segment.
    pub api_version: String,
    /// Username for basic authentication.
    pub login: Option<String>,
    /// Password for basic authentication.
    pub password: Option<String>,
    /// Private token for token authentication.
    pub private_token: Option<String>,
    /// Page size for list endpoints.
    pub per_page: Option<u32>,
    /// Follow `next` links automatically.
    pub auto_paginate: bool,
    /// Stop auto-pagination after this many pages.
    pub max_pages: Option<u32>,
    /// Proxy URL.
    pub proxy: Option<String>,
    /// `User-Agent` header.
    pub user_agent: String,
    /// `Accept` header sent by default.
    pub default_media_type: String,
    /// Read credentials from a `.netrc` file when none are configured.
    pub netrc: bool,
    /// Path of the `.netrc` file.
    pub netrc_file: PathBuf,
    /// Suppress non-fatal configuration warnings.
    pub silent: bool,
    /// Transport settings.
    pub connection_options: ConnectionOptions,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_endpoint", &self.api_endpoint)
            .field("web_endpoint", &self.web_endpoint)
            .field("api_version", &self.api_version)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "*******"))
            .field("private_token", &self.private_token.as_ref().map(|_| "*******"))
            .field("per_page", &self.per_page)
            .field("auto_paginate", &self.auto_paginate)
            .field("max_pages", &self.max_pages)
            .field("proxy", &self.proxy)
            .field("user_agent", &self.user_agent)
            .field("netrc", &self.netrc)
            .finish_non_exhaustive()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_options(Options::default())
    }
}

impl ClientConfig {
    /// Resolve explicit options over caller-held defaults over the environment.
    pub fn resolve(explicit: &Options, defaults: &Options, env: &Options) -> Self {
        Self::from_options(explicit.clone().or(defaults).or(env))
    }

    /// Resolve explicit options over the process environment.
    pub fn from_env(explicit: &Options) -> Self {
        Self::from_options(explicit.clone().or(&Options::from_env()))
    }

    /// Apply the hardcoded defaults to whatever is still unset.
    pub fn from_options(options: Options) -> Self {
        Self {
            api_endpoint: with_trailing_slash(
                options
                    .api_endpoint
                    .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
            ),
            web_endpoint: with_trailing_slash(
                options
                    .web_endpoint
                    .unwrap_or_else(|| DEFAULT_WEB_ENDPOINT.to_string()),
            ),
            api_version: options
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            login: options.login,
            password: options.password,
            private_token: options.private_token,
            per_page: options.per_page,
            auto_paginate: options.auto_paginate.unwrap_or(false),
            max_pages: options.max_pages,
            proxy: options.proxy,
            user_agent: options.user_agent.unwrap_or_else(|| USER_AGENT.to_string()),
            default_media_type: options
                .default_media_type
                .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string()),
            netrc: options.netrc.unwrap_or(false),
            netrc_file: options.netrc_file.unwrap_or_else(default_netrc_file),
            silent: options.silent.unwrap_or(false),
            connection_options: options.connection_options.unwrap_or_default(),
        }
    }

    /// Every field as an explicit option, for round-tripping through a mutator.
    pub fn to_options(&self) -> Options {
        Options {
            api_endpoint: Some(self.api_endpoint.clone()),
            web_endpoint: Some(self.web_endpoint.clone()),
            api_version: Some(self.api_version.clone()),
            login: self.login.clone(),
            password: self.password.clone(),
            private_token: self.private_token.clone(),
            per_page: self.per_page,
            auto_paginate: Some(self.auto_paginate),
            max_pages: self.max_pages,
            proxy: self.proxy.clone(),
            user_agent: Some(self.user_agent.clone()),
            default_media_type: Some(self.default_media_type.clone()),
            netrc: Some(self.netrc),
            netrc_file: Some(self.netrc_file.clone()),
            silent: Some(self.silent),
            connection_options: Some(self.connection_options.clone()),
        }
    }

    /// True when a cached client built from `other` may be reused for `self`.
    pub fn same_config(&self, other: &ClientConfig) -> bool {
        self == other
    }

    /// The `api/<version>/` path prefix.
    pub fn api_prefix(&self) -> String {
        format!("api/{}/", self.api_version)
    }
}
