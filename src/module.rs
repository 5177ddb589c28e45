//! Module tree and lifecycle sequencing
//!
//! A [`Module`] is a node in a composition tree: an ordered list of child
//! modules, a notification channel, and an overridable pair of async hooks.
//! Initialization runs depth-first with children before their parent and
//! siblings in attachment order; destruction is the mirror image, parent
//! before children with siblings reversed.

use crate::error::{LifecycleError, Result};
use crate::event::{Emitter, Event, EventKind};
use crate::traits::Lifecycle;
use std::future::Future;
use std::pin::Pin;

/// Behavior of a module constructed without its own hooks.
struct Noop;

impl Lifecycle for Noop {}

/// A node in the composition tree.
///
/// Modules are assembled with [`mount`](Module::mount) and driven by
/// [`call_init`](Module::call_init) / [`call_destroy`](Module::call_destroy),
/// usually through [`App::boot`](crate::App::boot) and
/// [`App::shutdown`](crate::App::shutdown) on the root.
pub struct Module {
    name: String,
    hooks: Box<dyn Lifecycle>,
    children: Vec<Module>,
    emitter: Emitter,
}

impl Default for Module {
    fn default() -> Self {
        Self::new()
    }
}

impl Module {
    /// Create an anonymous module with no-op hooks.
    pub fn new() -> Self {
        Self::named("module")
    }

    /// Create a module whose name appears in log output and hook errors.
    ///
    /// Names are diagnostic only; nothing requires them to be unique.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hooks: Box::new(Noop),
            children: Vec::new(),
            emitter: Emitter::new(),
        }
    }

    /// Attach lifecycle behavior to this module.
    pub fn with_lifecycle(mut self, hooks: impl Lifecycle + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub(crate) fn set_boxed_lifecycle(&mut self, hooks: Box<dyn Lifecycle>) {
        self.hooks = hooks;
    }

    /// The module's diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Children in attachment order.
    pub fn children(&self) -> &[Module] {
        &self.children
    }

    /// A clone of this module's notification channel handle.
    ///
    /// The handle stays valid after the module is mounted into a tree, which
    /// is how hook implementations and background tasks hold on to their own
    /// module's channel.
    pub fn emitter(&self) -> Emitter {
        self.emitter.clone()
    }

    /// Subscribe to an event on this module's channel.
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: FnMut(&Event) + Send + Sync + 'static,
    {
        self.emitter.on(kind, listener);
    }

    /// Emit an event on this module's channel.
    pub fn emit(&self, event: Event) {
        self.emitter.emit(event);
    }

    /// Append `child` to this module's child sequence.
    ///
    /// Returns the freshly attached child so trees can be built fluently:
    /// `app.mount(api).mount(router)` nests `router` under `api`. No
    /// validation is performed; attaching the same subtree twice is caller
    /// responsibility.
    pub fn mount(&mut self, child: Module) -> &mut Module {
        let index = self.children.len();
        self.children.push(child);
        &mut self.children[index]
    }

    /// Visit this module, then every descendant, pre-order and depth-first
    /// with siblings in attachment order.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(&Module),
    {
        self.traverse_with(&mut visit);
    }

    fn traverse_with(&self, visit: &mut dyn FnMut(&Module)) {
        visit(self);
        for child in &self.children {
            child.traverse_with(visit);
        }
    }

    /// Initialize this module's subtree.
    ///
    /// Each child subtree is initialized to completion, in attachment order,
    /// before the next one starts; once a child subtree is up, its `error`
    /// events are permanently forwarded to this module's channel. After all
    /// children finish, this module's own `init` hook runs, and the `Init`
    /// event is emitted once it resolves.
    ///
    /// A hook error aborts the sequence for the whole ancestor chain;
    /// already-initialized modules stay initialized, with no compensating
    /// teardown.
    ///
    /// There is no re-entrancy guard: calling this twice re-runs every hook
    /// and installs a second forwarding subscription per child. Not intended
    /// as a public entry point on the root, which goes through
    /// [`App::boot`](crate::App::boot), but parents invoke it on their
    /// children.
    pub fn call_init(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            for child in &mut self.children {
                child.call_init().await?;

                let parent = self.emitter.clone();
                child
                    .emitter
                    .on(EventKind::Error, move |event| parent.emit(event.clone()));
            }

            tracing::debug!("Initializing module: {}", self.name);
            self.hooks.init().await.map_err(|e| {
                tracing::error!("Init hook failed for {}: {}", self.name, e);
                LifecycleError::hook_failed(&self.name, e.to_string())
            })?;
            self.emitter.emit(Event::Init);
            tracing::debug!("Initialized module: {}", self.name);

            Ok(())
        })
    }

    /// Destroy this module's subtree.
    ///
    /// The `Destroy` event is emitted first, before any teardown work, then
    /// this module's own `destroy` hook runs, then each child subtree is
    /// destroyed in reverse attachment order. A hook error aborts the
    /// sequence; like [`call_init`](Module::call_init), there is no
    /// idempotence guard.
    pub fn call_destroy(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.emitter.emit(Event::Destroy);

            tracing::debug!("Destroying module: {}", self.name);
            self.hooks.destroy().await.map_err(|e| {
                tracing::error!("Destroy hook failed for {}: {}", self.name, e);
                LifecycleError::hook_failed(&self.name, e.to_string())
            })?;

            for child in self.children.iter_mut().rev() {
                child.call_destroy().await?;
            }
            tracing::debug!("Destroyed module: {}", self.name);

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    type CallLog = Arc<Mutex<Vec<String>>>;

    struct Probe {
        name: &'static str,
        log: CallLog,
        delay: Option<Duration>,
        fail_init: bool,
    }

    impl Probe {
        fn new(name: &'static str, log: &CallLog) -> Self {
            Self {
                name,
                log: Arc::clone(log),
                delay: None,
                fail_init: false,
            }
        }

        fn with_delay(name: &'static str, log: &CallLog, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::new(name, log)
            }
        }

        fn failing(name: &'static str, log: &CallLog) -> Self {
            Self {
                fail_init: true,
                ..Self::new(name, log)
            }
        }
    }

    #[async_trait]
    impl Lifecycle for Probe {
        async fn init(&mut self) -> Result<()> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_init {
                return Err(LifecycleError::init_failed("probe refused to start"));
            }
            self.log.lock().unwrap().push(format!("init:{}", self.name));
            Ok(())
        }

        async fn destroy(&mut self) -> Result<()> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.log
                .lock()
                .unwrap()
                .push(format!("destroy:{}", self.name));
            Ok(())
        }
    }

    fn probed(name: &'static str, log: &CallLog) -> Module {
        Module::named(name).with_lifecycle(Probe::new(name, log))
    }

    fn log_entries(log: &CallLog) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn composing_modules_preserves_attachment_order() {
        let mut a = Module::named("a");
        a.mount(Module::named("b"));
        a.mount(Module::named("c"));

        let names: Vec<&str> = a.children().iter().map(Module::name).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn mount_returns_the_attached_child() {
        let mut a = Module::named("a");
        a.mount(Module::named("b")).mount(Module::named("c"));

        assert_eq!(a.children()[0].name(), "b");
        assert_eq!(a.children()[0].children()[0].name(), "c");
    }

    #[test]
    fn traverses_the_whole_tree_pre_order() {
        let mut a = Module::named("a");
        let b = a.mount(Module::named("b"));
        b.mount(Module::named("c"));
        a.mount(Module::named("d"));

        let mut visited = Vec::new();
        a.traverse(|module| visited.push(module.name().to_string()));

        assert_eq!(visited, vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn default_hooks_complete_without_error() {
        let mut module = Module::new();

        module.call_init().await.unwrap();
        module.call_destroy().await.unwrap();
    }

    #[tokio::test]
    async fn initializes_children_before_parents_in_attachment_order() {
        let log = CallLog::default();

        let mut a = probed("a", &log);
        let mut b = probed("b", &log);
        let mut d = probed("d", &log);

        b.mount(probed("c", &log));
        d.mount(probed("e", &log));
        a.mount(b);
        a.mount(d);

        a.call_init().await.unwrap();

        assert_eq!(
            log_entries(&log),
            vec!["init:c", "init:b", "init:e", "init:d", "init:a"]
        );
    }

    #[tokio::test]
    async fn destroys_parents_first_with_siblings_reversed() {
        let log = CallLog::default();

        let mut a = probed("a", &log);
        let mut b = probed("b", &log);
        let mut d = probed("d", &log);

        b.mount(probed("c", &log));
        d.mount(probed("e", &log));
        a.mount(b);
        a.mount(d);

        a.call_destroy().await.unwrap();

        assert_eq!(
            log_entries(&log),
            vec![
                "destroy:a",
                "destroy:d",
                "destroy:e",
                "destroy:b",
                "destroy:c"
            ]
        );
    }

    #[tokio::test]
    async fn bubbles_descendant_errors_exactly_once() {
        let mut a = Module::named("a");
        let mut b = Module::named("b");
        let c = Module::named("c");
        let c_events = c.emitter();

        b.mount(c);
        a.mount(b);

        let seen = CallLog::default();
        let sink = Arc::clone(&seen);
        a.on(EventKind::Error, move |event| {
            if let Some(err) = event.error() {
                sink.lock().unwrap().push(err.to_string());
            }
        });

        a.call_init().await.unwrap();

        c_events.emit(Event::Error(Arc::new(LifecycleError::init_failed(
            "disk offline",
        ))));

        assert_eq!(
            log_entries(&seen),
            vec!["Initialization failed: disk offline".to_string()]
        );
    }

    #[tokio::test]
    async fn bubbling_is_not_established_before_init() {
        let mut a = Module::named("a");
        let b = Module::named("b");
        let b_events = b.emitter();
        a.mount(b);

        let seen = CallLog::default();
        let sink = Arc::clone(&seen);
        a.on(EventKind::Error, move |event| {
            if let Some(err) = event.error() {
                sink.lock().unwrap().push(err.to_string());
            }
        });

        b_events.emit(Event::Error(Arc::new(LifecycleError::init_failed("early"))));
        assert!(log_entries(&seen).is_empty());

        a.call_init().await.unwrap();

        b_events.emit(Event::Error(Arc::new(LifecycleError::init_failed("late"))));
        assert_eq!(
            log_entries(&seen),
            vec!["Initialization failed: late".to_string()]
        );
    }

    #[tokio::test]
    async fn emits_init_only_after_the_hook_resolves() {
        let log = CallLog::default();

        let mut a = Module::named("a").with_lifecycle(Probe::with_delay(
            "a",
            &log,
            Duration::from_millis(10),
        ));
        let sink = Arc::clone(&log);
        a.on(EventKind::Init, move |_| {
            sink.lock().unwrap().push("event:init".to_string());
        });

        a.call_init().await.unwrap();

        assert_eq!(log_entries(&log), vec!["init:a", "event:init"]);
    }

    #[tokio::test]
    async fn emits_destroy_before_the_hook_resolves() {
        let log = CallLog::default();

        let mut a = Module::named("a").with_lifecycle(Probe::with_delay(
            "a",
            &log,
            Duration::from_millis(10),
        ));
        let sink = Arc::clone(&log);
        a.on(EventKind::Destroy, move |_| {
            sink.lock().unwrap().push("event:destroy".to_string());
        });

        a.call_destroy().await.unwrap();

        assert_eq!(log_entries(&log), vec!["event:destroy", "destroy:a"]);
    }

    #[tokio::test]
    async fn hook_errors_abort_the_sequence() {
        let log = CallLog::default();

        let mut a = probed("a", &log);
        a.mount(Module::named("b").with_lifecycle(Probe::failing("b", &log)));

        let init_events = CallLog::default();
        let sink = Arc::clone(&init_events);
        a.on(EventKind::Init, move |_| {
            sink.lock().unwrap().push("init".to_string());
        });

        let err = a.call_init().await.unwrap_err();

        match err {
            LifecycleError::HookFailed { module, message } => {
                assert_eq!(module, "b");
                assert!(message.contains("probe refused to start"));
            }
            other => panic!("expected HookFailed, got {other}"),
        }

        // The parent's hook never ran and its Init event never fired.
        assert!(log_entries(&log).is_empty());
        assert!(log_entries(&init_events).is_empty());
    }

    #[tokio::test]
    async fn repeated_call_init_reruns_hooks_and_duplicates_forwarding() {
        let log = CallLog::default();

        let mut a = probed("a", &log);
        let b = probed("b", &log);
        let b_events = b.emitter();
        a.mount(b);

        a.call_init().await.unwrap();
        a.call_init().await.unwrap();

        assert_eq!(
            log_entries(&log),
            vec!["init:b", "init:a", "init:b", "init:a"]
        );

        // Each pass installed its own forwarding subscription.
        let seen = CallLog::default();
        let sink = Arc::clone(&seen);
        a.on(EventKind::Error, move |event| {
            if let Some(err) = event.error() {
                sink.lock().unwrap().push(err.to_string());
            }
        });

        b_events.emit(Event::Error(Arc::new(LifecycleError::init_failed("again"))));
        assert_eq!(log_entries(&seen).len(), 2);
    }
}
