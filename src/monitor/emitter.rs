//! Lifecycle event emission with initialization gating.
//!
//! Holds at most one subscriber per event kind and drops message events
//! that arrive before WhatsApp has fully initialized, since the log
//! produces message-shaped records during startup replay.

use std::fmt;

/// Zero-argument subscriber callback.
pub type EventCallback = Box<dyn FnMut() + Send>;

/// Emits `FullInit` and `MessageReceived` events to registered subscribers.
///
/// Callbacks are invoked synchronously on the scanner's task; a callback
/// that blocks, blocks scanning.
#[derive(Default)]
pub struct EventEmitter {
    full_init_seen: bool,
    on_full_init: Option<EventCallback>,
    on_message_received: Option<EventCallback>,
}

impl EventEmitter {
    /// Create an emitter with no subscribers and the init flag clear.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the `FullInit` subscriber. Replaces any previous one.
    pub fn on_full_init(&mut self, callback: impl FnMut() + Send + 'static) {
        if self.on_full_init.is_some() {
            tracing::debug!("Replacing existing FullInit subscriber");
        }
        self.on_full_init = Some(Box::new(callback));
    }

    /// Register the `MessageReceived` subscriber. Replaces any previous one.
    pub fn on_message_received(&mut self, callback: impl FnMut() + Send + 'static) {
        if self.on_message_received.is_some() {
            tracing::debug!("Replacing existing MessageReceived subscriber");
        }
        self.on_message_received = Some(Box::new(callback));
    }

    /// Whether a `FullInit` marker has been classified at least once.
    ///
    /// Set permanently on the first `FullInit`, never reset — it gates
    /// message emission for the rest of the process lifetime.
    #[must_use]
    pub fn is_fully_initialized(&self) -> bool {
        self.full_init_seen
    }

    /// Emit `FullInit`: set the init flag, then invoke the subscriber
    /// unconditionally if one is registered.
    pub fn emit_full_init(&mut self) {
        self.full_init_seen = true;
        if let Some(callback) = &mut self.on_full_init {
            callback();
        } else {
            tracing::trace!("FullInit with no subscriber, dropped");
        }
    }

    /// Emit `MessageReceived`, but only once `FullInit` has been seen.
    ///
    /// Message-shaped records observed before full init are false
    /// positives from startup replay and are dropped.
    pub fn emit_message_received(&mut self) {
        if !self.full_init_seen {
            tracing::trace!("MessageReceived before full init, dropped");
            return;
        }
        if let Some(callback) = &mut self.on_message_received {
            callback();
        } else {
            tracing::trace!("MessageReceived with no subscriber, dropped");
        }
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("full_init_seen", &self.full_init_seen)
            .field("on_full_init", &self.on_full_init.is_some())
            .field("on_message_received", &self.on_message_received.is_some())
            .finish()
    }
}
