//! Ties a query to the lifetime of its owner.
//!
//! Mounting creates the store and acquires the service handle. Unmounting, or
//! dropping the binding, releases the handle and moves the epoch forward so
//! that any response still in flight is discarded.

use crate::action::QueryAction;
use crate::environment::QueryEnvironment;
use crate::kind::QueryKind;
use crate::reducer::QueryReducer;
use crate::state::{QueryPhase, QueryRequest, QuerySnapshot, QueryState};
use autocomplete_runtime::{EffectHandle, Store, StoreConfig, StoreError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Store running one query of kind `K`
pub type QueryStore<K> =
    Store<QueryState<K>, QueryAction<K>, QueryEnvironment<K>, QueryReducer<K>>;

/// A mounted query
///
/// ```ignore
/// let query = QueryBinding::<PlacePredictions>::mount(environment).await?;
/// query.update("Sea".into(), PlaceOptions::default()).await?;
/// let snapshot = query.settled(Duration::from_secs(2)).await?;
/// query.unmount().await?;
/// ```
pub struct QueryBinding<K: QueryKind> {
    store: QueryStore<K>,
    mounted: bool,
}

impl<K: QueryKind> QueryBinding<K> {
    /// Create the query and acquire its service handle
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the mount action is rejected.
    pub async fn mount(environment: QueryEnvironment<K>) -> Result<Self, StoreError> {
        Self::mount_with_config(environment, StoreConfig::default()).await
    }

    /// [`QueryBinding::mount`] with custom store settings
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the mount action is rejected.
    pub async fn mount_with_config(
        environment: QueryEnvironment<K>,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        let state = QueryState::new(environment.config.debounce_or(K::DEFAULT_DEBOUNCE));
        let store = Store::with_config(state, QueryReducer::new(), environment, config);
        store.send(QueryAction::Mount).await?;

        tracing::debug!(query = K::NAME, "Mounted");
        Ok(Self {
            store,
            mounted: true,
        })
    }

    /// Report new input and options
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn update(
        &self,
        input: K::Input,
        options: K::Options,
    ) -> Result<EffectHandle, StoreError> {
        self.store
            .send(QueryAction::InputChanged { input, options })
            .await
    }

    /// Report new input, keeping the current options
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn set_input(&self, input: K::Input) -> Result<EffectHandle, StoreError> {
        let options = self.store.state(|s| s.options().clone()).await;
        self.update(input, options).await
    }

    /// Dispatch `request` right away, bypassing the debounce
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn dispatch(&self, request: QueryRequest<K>) -> Result<EffectHandle, StoreError> {
        self.store.send(QueryAction::Dispatch(request)).await
    }

    /// What callers read right now
    pub async fn snapshot(&self) -> QuerySnapshot<K::Data, K::Status> {
        self.store.state(QueryState::snapshot).await
    }

    /// Current phase
    pub async fn phase(&self) -> QueryPhase {
        self.store.state(QueryState::phase).await
    }

    /// Wait until no input change and no dispatch is outstanding
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: still busy after `timeout`, for example
    ///   because the service never answered
    /// - [`StoreError::ChannelClosed`]: the store went away
    pub async fn settled(
        &self,
        timeout: Duration,
    ) -> Result<QuerySnapshot<K::Data, K::Status>, StoreError> {
        let mut actions = self.store.subscribe_actions();

        let wait = async {
            loop {
                let (busy, snapshot) = self.store.state(|s| (s.is_busy(), s.snapshot())).await;
                if !busy {
                    return Ok(snapshot);
                }

                match actions.recv().await {
                    Ok(_) | Err(RecvError::Lagged(_)) => {},
                    Err(RecvError::Closed) => return Err(StoreError::ChannelClosed),
                }
            }
        };

        tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_| StoreError::Timeout)?
    }

    /// Actions produced by timers and service responses
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<QueryAction<K>> {
        self.store.subscribe_actions()
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &QueryStore<K> {
        &self.store
    }

    /// Release the service handle and discard whatever is in flight
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn unmount(mut self) -> Result<(), StoreError> {
        self.mounted = false;
        self.store.send(QueryAction::Unmount).await?;
        tracing::debug!(query = K::NAME, "Unmounted");
        Ok(())
    }
}

impl<K: QueryKind> Drop for QueryBinding<K> {
    fn drop(&mut self) {
        if !self.mounted {
            return;
        }

        // Outside a runtime there is nothing left that could deliver a response
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let store = self.store.clone();
        runtime.spawn(async move {
            if let Err(error) = store.send(QueryAction::Unmount).await {
                tracing::warn!(query = K::NAME, %error, "Teardown on drop failed");
            }
        });
    }
}

impl<K: QueryKind> std::fmt::Debug for QueryBinding<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBinding")
            .field("query", &K::NAME)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}
