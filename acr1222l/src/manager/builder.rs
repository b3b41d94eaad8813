// acr1222l-rs/acr1222l/src/manager/builder.rs

use crate::config::{InterfaceMatcher, ReaderConfig};
use crate::manager::ReaderManager;
use crate::transport::Backend;
use crate::{Error, Result};

/// Helper to construct a ReaderManager with optional configuration.
pub struct ReaderManagerBuilder<B> {
    backend: Option<B>,
    config: ReaderConfig,
}

impl<B: Backend> Default for ReaderManagerBuilder<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> ReaderManagerBuilder<B> {
    pub fn new() -> Self {
        Self {
            backend: None,
            config: ReaderConfig::default(),
        }
    }

    /// Provide the platform backend (e.g. MockBackend, PcscBackend)
    pub fn with_backend(mut self, backend: B) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the reader name fragments used for discovery
    pub fn with_matcher(mut self, matcher: InterfaceMatcher) -> Self {
        self.config.matcher = matcher;
        self
    }

    pub fn with_reinitialize_on_removal(mut self, enabled: bool) -> Self {
        self.config.reinitialize_on_removal = enabled;
        self
    }

    /// Consume the builder. Requires a backend; otherwise returns
    /// NotInitialized.
    pub fn build(self) -> Result<ReaderManager<B>> {
        match self.backend {
            Some(b) => Ok(ReaderManager::new(b, self.config)),
            None => Err(Error::NotInitialized),
        }
    }
}

#[cfg(feature = "pcsc")]
impl ReaderManagerBuilder<crate::transport::PcscBackend> {
    /// Builder preloaded with the PC/SC backend
    pub fn pcsc() -> Self {
        Self::new().with_backend(crate::transport::PcscBackend::new())
    }
}
