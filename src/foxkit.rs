//! Caller-owned entry point holding shared defaults.

use crate::client::{Client, ClientCache};
use crate::config::{ClientConfig, Options};
use crate::error::Result;

/// Holds defaults shared by every client it hands out.
///
/// Replaces a process-wide singleton: create one, keep it where your
/// application keeps shared state, and ask it for clients. A client is
/// rebuilt only when the resolved configuration changes.
///
/// # Example
///
/// ```no_run
/// use foxkit::Foxkit;
///
/// # async fn example() -> foxkit::Result<()> {
/// let mut foxkit = Foxkit::new();
/// foxkit.configure(|defaults| {
///     defaults.private_token = Some("glpat-123".to_string());
///     defaults.auto_paginate = Some(true);
/// });
///
/// let client = foxkit.client()?;
/// let users = client.paginate("users", Default::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Foxkit {
    defaults: Options,
    env: Options,
    cache: ClientCache,
}

impl Foxkit {
    /// Start with no defaults, reading the process environment.
    pub fn new() -> Self {
        Self::with_env(Options::from_env())
    }

    /// Start with no defaults and the given environment layer.
    pub fn with_env(env: Options) -> Self {
        Self {
            defaults: Options::default(),
            env,
            cache: ClientCache::new(),
        }
    }

    /// Change the shared defaults.
    pub fn configure<F>(&mut self, mutator: F)
    where
        F: FnOnce(&mut Options),
    {
        mutator(&mut self.defaults);
    }

    /// Drop every default and re-read the environment.
    pub fn reset(&mut self) {
        self.defaults = Options::default();
        self.env = Options::from_env();
        self.cache.clear();
    }

    /// The current shared defaults.
    pub fn defaults(&self) -> &Options {
        &self.defaults
    }

    /// The configuration a client built now would get.
    pub fn config(&self) -> ClientConfig {
        self.config_with(&Options::default())
    }

    /// The configuration for explicit options layered over the defaults.
    pub fn config_with(&self, explicit: &Options) -> ClientConfig {
        ClientConfig::resolve(explicit, &self.defaults, &self.env)
    }

    /// A client for the current defaults, reused while they do not change.
    ///
    /// # Errors
    ///
    /// Returns an error if a new client has to be built and cannot be.
    pub fn client(&self) -> Result<Client> {
        self.cache.get_or_build(&self.config())
    }

    /// A client for explicit options layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a new client has to be built and cannot be.
    pub fn client_with(&self, explicit: &Options) -> Result<Client> {
        self.cache.get_or_build(&self.config_with(explicit))
    }
}
