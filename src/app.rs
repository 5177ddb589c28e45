//! Application root
//!
//! Provides the distinguished root of a module tree, with public
//! `boot`/`shutdown` entry points wrapping the recursive init/destroy
//! protocol and the `Online`/`Offline` completion events.

use crate::error::Result;
use crate::event::{Emitter, Event, EventKind};
use crate::module::Module;
use crate::shutdown::shutdown_signal;
use crate::traits::Lifecycle;

/// The root module of a composed application.
///
/// An `App` is a [`Module`] with no extra persistent state: it sequences the
/// inherited init/destroy protocol and emits `Online` after booting and
/// `Offline` after shutting down.
///
/// # Example
///
/// ```rust,ignore
/// use arbor::{App, Module};
///
/// #[tokio::main]
/// async fn main() -> arbor::Result<()> {
///     let mut app = App::builder()
///         .module(Module::named("database").with_lifecycle(Database::new()))
///         .module(Module::named("http").with_lifecycle(HttpServer::new()))
///         .build();
///
///     app.boot().await?;
///     // ... serve ...
///     app.shutdown().await
/// }
/// ```
pub struct App {
    root: Module,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an application with an empty root named `app`.
    pub fn new() -> Self {
        Self {
            root: Module::named("app"),
        }
    }

    /// Create an application builder.
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    /// The root module of the tree.
    pub fn root(&self) -> &Module {
        &self.root
    }

    /// Mount a top-level module; attachment order is initialization order.
    pub fn mount(&mut self, child: Module) -> &mut Module {
        self.root.mount(child)
    }

    /// Subscribe to an event on the root channel.
    ///
    /// Besides the root's own `Init`/`Destroy`, this channel receives
    /// `Online`/`Offline` and every module error that bubbles up the tree.
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: FnMut(&Event) + Send + Sync + 'static,
    {
        self.root.on(kind, listener);
    }

    /// A clone of the root channel handle.
    pub fn emitter(&self) -> Emitter {
        self.root.emitter()
    }

    /// Visit every module in the tree, pre-order.
    pub fn traverse<F>(&self, visit: F)
    where
        F: FnMut(&Module),
    {
        self.root.traverse(visit);
    }

    /// Initialize the whole tree, then emit `Online`.
    pub async fn boot(&mut self) -> Result<()> {
        tracing::info!("Booting application...");

        self.root.call_init().await?;
        self.root.emit(Event::Online);

        tracing::info!("Application online");
        Ok(())
    }

    /// Tear the whole tree down, then emit `Offline`.
    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application...");

        self.root.call_destroy().await?;
        self.root.emit(Event::Offline);

        tracing::info!("Application offline");
        Ok(())
    }

    /// Boot, block until SIGTERM or Ctrl+C, then shut down.
    pub async fn run(&mut self) -> Result<()> {
        self.boot().await?;
        shutdown_signal().await;
        self.shutdown().await
    }
}

/// Builder for [`App`]
///
/// Assembly only: [`build`](AppBuilder::build) wires the tree together and
/// [`App::boot`] remains the explicit entry point.
pub struct AppBuilder {
    name: String,
    hooks: Option<Box<dyn Lifecycle>>,
    modules: Vec<Module>,
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppBuilder {
    /// Create a new application builder.
    pub fn new() -> Self {
        Self {
            name: "app".to_string(),
            hooks: None,
            modules: Vec::new(),
        }
    }

    /// Name used for the root module in logs and errors.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Lifecycle behavior for the root module itself.
    pub fn lifecycle(mut self, hooks: impl Lifecycle + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }

    /// Mount a top-level module; attachment order is initialization order.
    pub fn module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    /// Assemble the application.
    pub fn build(self) -> App {
        let mut root = Module::named(self.name);
        if let Some(hooks) = self.hooks {
            root.set_boxed_lifecycle(hooks);
        }
        for module in self.modules {
            root.mount(module);
        }
        App { root }
    }
}
