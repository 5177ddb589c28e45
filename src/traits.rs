//! Lifecycle hook trait
//!
//! This trait defines the contract for behavior that participates in the
//! module tree's initialization and teardown sequencing.

use crate::error::Result;
use async_trait::async_trait;

/// Overridable lifecycle behavior attached to a module.
///
/// Both hooks default to no-ops, so an implementation only overrides the
/// phases it cares about. Errors returned here propagate up the sequencing
/// call chain and abort the boot or shutdown in progress; they are never
/// turned into `error` events.
///
/// # Example
///
/// ```rust,ignore
/// use arbor::{Lifecycle, Result, async_trait};
///
/// struct Database {
///     pool: Option<Pool>,
/// }
///
/// #[async_trait]
/// impl Lifecycle for Database {
///     async fn init(&mut self) -> Result<()> {
///         self.pool = Some(Pool::connect(&self.url).await
///             .map_err(|e| LifecycleError::init_failed(e.to_string()))?);
///         Ok(())
///     }
///
///     async fn destroy(&mut self) -> Result<()> {
///         if let Some(pool) = self.pool.take() {
///             pool.close().await;
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Called once the module's children have finished initializing.
    ///
    /// Use this hook to:
    /// - Open database connections
    /// - Warm up caches
    /// - Subscribe to message queues
    /// - Bind listeners
    async fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called before the module's children are destroyed.
    ///
    /// Use this hook to:
    /// - Close connections
    /// - Flush buffers
    /// - Release acquired resources
    async fn destroy(&mut self) -> Result<()> {
        Ok(())
    }
}
