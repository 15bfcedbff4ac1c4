//! The shared client handle.
//!
//! Every read, write, and provisioning call receives a [`ClientHandle`]. The
//! handle starts empty and must be initialized (or given an executor) before
//! use; calls made through an empty handle fail with a configuration error.

use std::sync::{Arc, PoisonError, RwLock};

use dynamap_core::{Error, Result, StoreExecutor};

use crate::config::Config;
use crate::dynamodb::DynamoDbExecutor;

/// Cheaply cloneable handle to the active store executor.
///
/// Clones share the same slot, so initializing one clone initializes all of
/// them. Re-initializing replaces the executor for subsequent calls.
#[derive(Clone, Default)]
pub struct ClientHandle {
    executor: Arc<RwLock<Option<Arc<dyn StoreExecutor>>>>,
}

impl ClientHandle {
    /// Creates an uninitialized handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle with `executor` already installed.
    pub fn with_executor(executor: impl StoreExecutor + 'static) -> Self {
        let handle = Self::new();
        handle.set(executor);
        handle
    }

    /// Installs `executor`, replacing any previous one.
    pub fn set(&self, executor: impl StoreExecutor + 'static) {
        self.set_shared(Arc::new(executor));
    }

    /// Installs an executor that is already shared elsewhere.
    pub fn set_shared(&self, executor: Arc<dyn StoreExecutor>) {
        let mut slot = self
            .executor
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(executor);
    }

    /// Connects to DynamoDB with `config` and installs the executor.
    pub async fn initialize(&self, config: &Config) {
        let executor = DynamoDbExecutor::connect(config).await;
        tracing::debug!(endpoint = %config.target_display(), "Client handle initialized");
        self.set(executor);
    }

    /// Returns true once an executor has been installed.
    pub fn is_initialized(&self) -> bool {
        self.executor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Returns the active executor.
    pub fn executor(&self) -> Result<Arc<dyn StoreExecutor>> {
        self.executor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| Error::Configuration("client handle not initialized".to_string()))
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmemory::InMemoryExecutor;

    #[test]
    fn test_uninitialized_handle_fails() {
        let handle = ClientHandle::new();

        assert!(!handle.is_initialized());
        assert_eq!(
            handle.executor().err(),
            Some(Error::Configuration(
                "client handle not initialized".to_string()
            ))
        );
    }

    #[test]
    fn test_clones_share_the_executor() {
        let handle = ClientHandle::new();
        let clone = handle.clone();

        handle.set(InMemoryExecutor::new());

        assert!(clone.is_initialized());
        assert!(clone.executor().is_ok());
    }

    #[test]
    fn test_set_replaces_executor() {
        let first = InMemoryExecutor::new();
        let handle = ClientHandle::with_executor(first);
        let before = handle.executor().unwrap();

        handle.set(InMemoryExecutor::new());
        let after = handle.executor().unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_debug_reports_state() {
        assert_eq!(
            format!("{:?}", ClientHandle::new()),
            "ClientHandle { initialized: false }"
        );
    }
}
