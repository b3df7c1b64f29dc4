//! Dependencies injected into a query.

use crate::config::QueryConfig;
use crate::kind::QueryKind;
use crate::service::ServiceFactory;
use autocomplete_core::environment::{Clock, SystemClock};
use std::fmt;
use std::sync::Arc;

/// Environment of [`QueryReducer`](crate::QueryReducer)
pub struct QueryEnvironment<K: QueryKind> {
    /// Creates the service handle on mount
    pub services: Arc<dyn ServiceFactory<K::Service>>,
    /// Stamps accepted responses
    pub clock: Arc<dyn Clock>,
    /// Per-query settings
    pub config: QueryConfig,
}

impl<K: QueryKind> QueryEnvironment<K> {
    /// Environment using the system clock and default settings
    #[must_use]
    pub fn new(services: impl ServiceFactory<K::Service> + 'static) -> Self {
        Self {
            services: Arc::new(services),
            clock: Arc::new(SystemClock),
            config: QueryConfig::default(),
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replace the settings
    #[must_use]
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }
}

impl<K: QueryKind> Clone for QueryEnvironment<K> {
    fn clone(&self) -> Self {
        Self {
            services: Arc::clone(&self.services),
            clock: Arc::clone(&self.clock),
            config: self.config,
        }
    }
}

impl<K: QueryKind> fmt::Debug for QueryEnvironment<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryEnvironment")
            .field("query", &K::NAME)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
