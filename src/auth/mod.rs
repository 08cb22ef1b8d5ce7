//! Authentication selection and request decoration.
//!
//! A client authenticates with exactly one strategy, chosen in priority
//! order: private token, then basic login/password, then none. When nothing
//! is configured and `.netrc` lookup is enabled, the credentials file is
//! consulted once while the client is built.

mod netrc;

pub use netrc::{Netrc, NetrcEntry, NetrcSyntaxError};

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::RequestBuilder;
use thiserror::Error;
use url::Url;

use crate::config::ClientConfig;

/// Header carrying the private token.
pub const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// The credential strategy of a client.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No credentials; requests are anonymous.
    None,
    /// HTTP basic authentication.
    Basic {
        /// Username.
        login: String,
        /// Password.
        password: String,
    },
    /// Private token sent in the `PRIVATE-TOKEN` header.
    Token(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Basic { login, .. } => f
                .debug_struct("Basic")
                .field("login", login)
                .field("password", &"*******")
                .finish(),
            Self::Token(_) => f.debug_tuple("Token").field(&"*******").finish(),
        }
    }
}

impl Credentials {
    /// Pick the strategy for a config: token > basic > none.
    pub fn select(config: &ClientConfig) -> Self {
        if let Some(token) = &config.private_token {
            return Self::Token(token.clone());
        }
        match (&config.login, &config.password) {
            (Some(login), Some(password)) => Self::Basic {
                login: login.clone(),
                password: password.clone(),
            },
            _ => Self::None,
        }
    }

    /// True for any strategy other than `None`.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// True for basic authentication.
    pub fn is_basic(&self) -> bool {
        matches!(self, Self::Basic { .. })
    }

    /// True for token authentication.
    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token(_))
    }

    /// Attach the authentication header to an outgoing request.
    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::None => request,
            Self::Basic { login, password } => request.basic_auth(login, Some(password)),
            Self::Token(token) => request.header(PRIVATE_TOKEN_HEADER, token),
        }
    }
}

/// Why credentials could not be loaded from the credentials file.
///
/// Never returned as an error from client construction; it is logged and
/// the client stays unauthenticated.
#[derive(Debug, Clone, Error)]
pub enum CredentialsWarning {
    /// The file could not be read.
    #[error("could not read {}: {source}", .path.display())]
    Unreadable {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: Arc<std::io::Error>,
    },
    /// The file is not valid `.netrc` syntax.
    #[error("could not parse {}: {source}", .path.display())]
    Malformed {
        /// File path.
        path: PathBuf,
        /// Syntax error.
        source: NetrcSyntaxError,
    },
    /// The api endpoint has no host to look up.
    #[error("api endpoint '{0}' has no host")]
    NoHost(String),
    /// No entry (or an entry without login and password) for the host.
    #[error("no credentials for {host} in {}", .path.display())]
    NoEntry {
        /// Looked-up host.
        host: String,
        /// File path.
        path: PathBuf,
    },
}

/// Look up login and password for the api endpoint's host.
pub fn netrc_credentials(config: &ClientConfig) -> Result<(String, String), CredentialsWarning> {
    let host = Url::parse(&config.api_endpoint)
        .ok()
        .and_then(|url| url.host_str().map(ToOwned::to_owned))
        .ok_or_else(|| CredentialsWarning::NoHost(config.api_endpoint.clone()))?;

    let netrc = Netrc::read(&config.netrc_file)?;
    match netrc.get(&host) {
        Some(NetrcEntry {
            login: Some(login),
            password: Some(password),
            ..
        }) => Ok((login.clone(), password.clone())),
        _ => Err(CredentialsWarning::NoEntry {
            host,
            path: config.netrc_file.clone(),
        }),
    }
}

/// Fill login and password from `.netrc` when the config has no credentials.
///
/// Failures degrade to an unauthenticated config and emit a warning unless
/// the config is silent.
pub(crate) fn login_from_netrc(mut config: ClientConfig) -> ClientConfig {
    if !config.netrc || Credentials::select(&config).is_authenticated() {
        return config;
    }

    match netrc_credentials(&config) {
        Ok((login, password)) => {
            tracing::debug!(login = %login, "loaded credentials from netrc");
            config.login = Some(login);
            config.password = Some(password);
        }
        Err(warning) => {
            if !config.silent {
                tracing::warn!(
                    "Error loading credentials from netrc file for {}: {warning}",
                    config.api_endpoint
                );
            }
        }
    }
    config
}
