//! # Broadcast bus
//!
//! A name-keyed publish/subscribe registry with synchronous same-thread
//! fan-out: [publish](Bus::publish) invokes every listener registered for a
//! topic before it returns. Channels normally go through the process-wide
//! [global](Bus::global) bus; tests create their own with [Bus::new] to keep
//! topic names isolated.

use crate::common::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

mod envelope;


pub use envelope::*;

type Listener = Arc<dyn Fn(&Envelope) + Send + Sync>;

struct Registration {
    owner: OwnerId,
    listener: Listener,
}

/// Identity of the holder of listener registrations.
///
/// Removal is by owner, so an owner going away takes all of its
/// registrations with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Mints a process-unique identity.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Name-keyed broadcast registry shared by any number of channels.
pub struct Bus {
    topics: RwLock<HashMap<String, Vec<Registration>>>,
}

impl Bus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// The default process-wide bus.
    pub fn global() -> Arc<Self> {
        static GLOBAL: Lazy<Arc<Bus>> = Lazy::new(|| Arc::new(Bus::new()));

        Arc::clone(GLOBAL.get())
    }

    /// Registers `listener` for `topic` on behalf of `owner`.
    pub fn add_listener(
        &self,
        owner: OwnerId,
        topic: &str,
        listener: impl Fn(&Envelope) + Send + Sync + 'static,
    ) {
        let mut topics = self.topics.write();
        topics.entry(topic.to_owned()).or_default().push(Registration {
            owner,
            listener: Arc::new(listener),
        });
    }

    /// Drops every registration held by `owner`.
    ///
    /// Unknown owners are a no-op. Topics left without listeners are removed
    /// from the map.
    pub fn remove_listener(&self, owner: OwnerId) {
        let mut topics = self.topics.write();
        topics.retain(|_, registrations| {
            registrations.retain(|registration| registration.owner != owner);
            !registrations.is_empty()
        });
    }

    /// Synchronously fans `envelope` out to every listener of `topic`.
    ///
    /// Publishing on a topic without listeners does nothing.
    pub fn publish(&self, topic: &str, envelope: Envelope) {
        // listeners run with the lock released, so they may re-enter the bus
        let listeners: Vec<Listener> = {
            let topics = self.topics.read();
            match topics.get(topic) {
                Some(registrations) => registrations
                    .iter()
                    .map(|registration| Arc::clone(&registration.listener))
                    .collect(),
                None => return,
            }
        };
        for listener in listeners {
            listener(&envelope);
        }
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
