//! # Arbor
//!
//! An async module-tree lifecycle framework for Rust.
//!
//! Arbor composes an application out of modules arranged in a tree. Booting
//! the tree initializes every module depth-first (children before the
//! parent that owns them, siblings in attachment order) and shutting it
//! down runs the mirror image. Each module carries a notification channel;
//! runtime errors emitted by a module bubble up to the application root.
//!
//! ## Features
//!
//! - **Composable modules**: build the tree with `mount`, nest as deep as
//!   the application needs
//! - **Deterministic ordering**: strictly sequential init/destroy with
//!   children-before-parent guarantees
//! - **Async lifecycle hooks**: override `init`/`destroy` on the modules
//!   that need them, skip the rest
//! - **Lifecycle events**: `init`, `destroy`, `error` per module, plus
//!   `online`/`offline` on the root
//! - **Error bubbling**: descendant error events are forwarded to ancestors
//!   without aborting anything
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arbor::{App, Lifecycle, Module, Result, async_trait};
//!
//! struct Database;
//!
//! #[async_trait]
//! impl Lifecycle for Database {
//!     async fn init(&mut self) -> Result<()> {
//!         // open the connection pool
//!         Ok(())
//!     }
//!
//!     async fn destroy(&mut self) -> Result<()> {
//!         // drain and close it
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut app = App::builder()
//!         .module(Module::named("database").with_lifecycle(Database))
//!         .build();
//!
//!     app.boot().await?;
//!     // ... serve ...
//!     app.shutdown().await
//! }
//! ```

pub mod app;
pub mod error;
pub mod event;
pub mod module;
pub mod shutdown;
pub mod traits;

// Re-export core types
pub use app::{App, AppBuilder};
pub use error::{LifecycleError, Result};
pub use event::{Emitter, ErrorPayload, Event, EventKind, Listener};
pub use module::Module;
pub use shutdown::shutdown_signal;
pub use traits::Lifecycle;

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;

/// Prelude module for convenient imports
///
/// ```
/// use arbor::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::{App, AppBuilder};
    pub use crate::error::{LifecycleError, Result};
    pub use crate::event::{Emitter, Event, EventKind};
    pub use crate::module::Module;
    pub use crate::shutdown::shutdown_signal;
    pub use crate::traits::Lifecycle;
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
