//! Per-module notification channel
//!
//! Every module owns a named-event channel. Subscribers are plain callbacks,
//! dispatched synchronously in subscription order; events emitted before a
//! subscription exists are not buffered.

use dashmap::DashMap;
use std::error::Error as StdError;
use std::sync::Arc;

/// Payload carried by an [`Event::Error`] notification.
pub type ErrorPayload = Arc<dyn StdError + Send + Sync + 'static>;

/// Names of the events a module can emit.
///
/// `Init`, `Destroy` and `Error` are emitted by every module; `Online` and
/// `Offline` only appear on the application root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The module's `init` hook has completed
    Init,
    /// The module's teardown is about to begin
    Destroy,
    /// A module reported a runtime error
    Error,
    /// The whole tree finished booting
    Online,
    /// The whole tree finished shutting down
    Offline,
}

/// An emitted event together with its payload.
#[derive(Clone, Debug)]
pub enum Event {
    /// The module's `init` hook has completed
    Init,
    /// The module's teardown is about to begin
    Destroy,
    /// A module reported a runtime error
    Error(ErrorPayload),
    /// The whole tree finished booting
    Online,
    /// The whole tree finished shutting down
    Offline,
}

impl Event {
    /// The name this event is dispatched under.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Init => EventKind::Init,
            Event::Destroy => EventKind::Destroy,
            Event::Error(_) => EventKind::Error,
            Event::Online => EventKind::Online,
            Event::Offline => EventKind::Offline,
        }
    }

    /// The error payload, if this is an `Error` event.
    pub fn error(&self) -> Option<&ErrorPayload> {
        match self {
            Event::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// A subscriber callback.
pub type Listener = Box<dyn FnMut(&Event) + Send + Sync + 'static>;

/// A cheaply cloneable handle to a module's notification channel.
///
/// Clones refer to the same channel, so a handle taken before a module is
/// mounted into a tree remains valid afterwards. This is how hooks and
/// background tasks report runtime errors on their own module's channel.
///
/// # Example
///
/// ```rust,ignore
/// let module = Module::named("database");
/// let events = module.emitter();
/// app.mount(module);
///
/// // later, from anywhere:
/// events.emit(Event::Error(Arc::new(err)));
/// ```
#[derive(Clone)]
pub struct Emitter {
    listeners: Arc<DashMap<EventKind, Vec<Listener>>>,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    /// Create a channel with no subscribers.
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(DashMap::new()),
        }
    }

    /// Subscribe to an event name.
    ///
    /// Listeners for one name are dispatched in subscription order. A
    /// listener must not subscribe to or emit on the channel it is being
    /// dispatched from; emitting on a *different* module's channel is fine
    /// and is how error bubbling works.
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: FnMut(&Event) + Send + Sync + 'static,
    {
        self.listeners
            .entry(kind)
            .or_default()
            .push(Box::new(listener));
    }

    /// Emit an event, synchronously invoking every subscriber of its name.
    ///
    /// An `Error` event with no subscriber is logged at `error` level and
    /// dropped; every other unsubscribed event is dropped silently.
    pub fn emit(&self, event: Event) {
        if let Some(mut subscribers) = self.listeners.get_mut(&event.kind()) {
            if !subscribers.is_empty() {
                for listener in subscribers.iter_mut() {
                    listener(&event);
                }
                return;
            }
        }
        if let Event::Error(err) = &event {
            tracing::error!("Unhandled error event: {}", err);
        }
    }

    /// Number of subscribers for an event name.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, |subscribers| subscribers.len())
    }
}
