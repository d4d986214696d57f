//! # Typed channels

use crate::bus::{Bus, Envelope, OwnerId};
use crate::error::TypeMismatch;
use parking_lot::Mutex;
use std::any::{self, Any};
use std::sync::Arc;

#[cfg(test)]
mod test;

/// Opaque sender identity attached to every delivery from a channel.
///
/// Purely informational context for the handler; never type-checked.
pub type SenderRef = Arc<dyn Any + Send + Sync>;

/// Callback receiving each delivered value and the channel's sender.
pub type Handler<T> = Box<dyn FnMut(T, Option<&SenderRef>) + Send>;

/// Hook receiving every [TypeMismatch] detected on a channel's delivery path.
pub type MismatchHook = Arc<dyn Fn(TypeMismatch) + Send + Sync>;

/// A named notification topic with a statically declared payload type.
///
/// Implemented by the unit types the [declare](crate::declare) macro
/// generates.
pub trait Topic: Sized + 'static {
    /// Bus key shared by every channel of this topic.
    const NAME: &'static str;

    /// Payload type carried on this topic.
    type Payload: Clone + Send + 'static;
}

/// A typed channel over a name-keyed broadcast [Bus].
///
/// The name is the real topic key: every channel instance with the same name
/// on the same bus belongs to one logical topic, and a [post](Channel::post)
/// from any of them reaches the handlers of all of them. Each instance holds
/// at most one handler, set by [subscribe](Channel::subscribe) and cleared
/// by [unsubscribe](Channel::unsubscribe) or drop.
///
/// A payload whose runtime type does not match `T` is never delivered to the
/// handler; it is reported as a [TypeMismatch] through the channel's
/// mismatch hook. The default hook panics in debug builds and logs through
/// [log::error] in release builds; replace it with
/// [with_mismatch_hook](Channel::with_mismatch_hook) to observe mismatches
/// directly.
pub struct Channel<T> {
    name: String,
    owner: OwnerId,
    bus: Arc<Bus>,
    sender: Option<SenderRef>,
    handler: Arc<Mutex<Option<Handler<T>>>>,
    on_mismatch: MismatchHook,
}

impl<T> Channel<T> {
    /// Creates an inactive channel for `name` on the global bus.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "channel name must be non-empty");
        Self {
            name,
            owner: OwnerId::next(),
            bus: Bus::global(),
            sender: None,
            handler: Arc::new(Mutex::new(None)),
            on_mismatch: Arc::new(default_mismatch_hook),
        }
    }

    /// Attaches a sender reference passed to the handler with every delivery.
    pub fn with_sender(mut self, sender: SenderRef) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Binds the channel to `bus` instead of the global one.
    pub fn with_bus(mut self, bus: Arc<Bus>) -> Self {
        self.bus = bus;
        self
    }

    /// Replaces the default mismatch hook.
    pub fn with_mismatch_hook(
        mut self,
        hook: impl Fn(TypeMismatch) + Send + Sync + 'static,
    ) -> Self {
        self.on_mismatch = Arc::new(hook);
        self
    }

    /// The channel's topic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a handler is currently set.
    pub fn is_subscribed(&self) -> bool {
        self.handler.lock().is_some()
    }

    /// Clears the handler and removes the bus registration.
    ///
    /// Safe to call at any time; on an inactive channel it is a no-op.
    pub fn unsubscribe(&mut self) {
        self.handler.lock().take();
        self.bus.remove_listener(self.owner);
    }
}

impl<T: Any + Clone + Send> Channel<T> {
    /// Sets `handler` as the channel's single handler and registers the
    /// channel on the bus.
    ///
    /// Any previous handler and registration are dropped first, so repeated
    /// calls replace rather than accumulate. Passing `None` acts as
    /// [unsubscribe](Channel::unsubscribe).
    ///
    /// The handler runs while the channel's handler slot is locked: it may
    /// subscribe, unsubscribe, or post on *other* channels, but a
    /// synchronous [post](Channel::post) back to its own channel name
    /// deadlocks.
    pub fn subscribe(&mut self, handler: Option<Handler<T>>) {
        self.unsubscribe();
        let handler = match handler {
            Some(handler) => handler,
            None => return,
        };
        *self.handler.lock() = Some(handler);

        let slot = Arc::clone(&self.handler);
        let sender = self.sender.clone();
        let channel = self.name.clone();
        let on_mismatch = Arc::clone(&self.on_mismatch);
        self.bus
            .add_listener(self.owner, &self.name, move |envelope| {
                match envelope.open::<T>() {
                    Some(value) => {
                        // the slot is empty when an unsubscribe raced this delivery
                        if let Some(handler) = slot.lock().as_mut() {
                            handler(value.clone(), sender.as_ref());
                        }
                    }
                    None => on_mismatch(TypeMismatch {
                        channel: channel.clone(),
                        expected: any::type_name::<T>(),
                        actual: envelope.type_name(),
                    }),
                }
            });
    }

    /// Posts `value` to every listener of the channel's name.
    ///
    /// Delivery is synchronous on the calling thread. Posting with no
    /// subscribers is a no-op, not an error. Must not be called from a
    /// handler subscribed to the same name: that handler's slot is still
    /// locked, and relocking it deadlocks.
    pub fn post(&self, value: T) {
        self.bus.publish(&self.name, Envelope::new(value));
    }
}

impl<T> Drop for Channel<T> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

fn default_mismatch_hook(error: TypeMismatch) {
    if cfg!(debug_assertions) {
        panic!("{}", error);
    }
    log::error!("{}", error);
}
