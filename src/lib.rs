#![warn(missing_docs)]
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::missing_panics_doc)]

//! Typed publish/subscribe notification channels.
//!
//! A [`Channel<T>`](Channel) is a named broadcast topic: producers call
//! [`post`](Channel::post) and the channel's single subscribed handler (if
//! any) receives the value together with an optional sender reference.
//! Values travel through a name-keyed [`Bus`] as untyped [`Envelope`]s and
//! are checked against the channel's declared payload type on delivery, so a
//! misrouted payload becomes a [`TypeMismatch`] report instead of a
//! wrong-typed delivery.
//!
//! Channel identity is the name, not the object: several channel instances
//! sharing one name form one logical topic, while each instance holds at
//! most one handler of its own.
//!
//! ```rust
//! use notibus::Channel;
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let mut channel = Channel::<i32>::new("download-progress");
//! channel.subscribe(Some(Box::new(move |value, _sender| {
//!     sink.lock().unwrap().push(value);
//! })));
//!
//! channel.post(25);
//! channel.post(50);
//! assert_eq!(*seen.lock().unwrap(), vec![25, 50]);
//! ```

mod common;

pub mod bus;
pub mod channel;

mod error;

pub use bus::{Bus, Envelope, OwnerId};
pub use channel::{Channel, Handler, MismatchHook, SenderRef, Topic};
pub use error::TypeMismatch;

#[doc(hidden)]
pub use doc_comment::doc_comment as __doc_comment;

/// Declare named topics with statically known payload types
///
/// ## Syntax
///
/// `<visibility>? channel <name>(<payload type>);`
///
/// Each entry expands to a unit struct implementing
/// [Topic](crate::channel::Topic), with the struct's identifier as the topic
/// name, and a `channel()` constructor returning a
/// [Channel](crate::channel::Channel) for that topic on the global bus.
///
/// ## Example
///
/// ```rust
/// notibus::declare! {
///     /// Download progress in percent
///     channel Progress(u8);
///     /// Lines typed into the chat box
///     pub(crate) channel ChatLine(String);
/// }
///
/// let mut channel = Progress::channel();
/// channel.subscribe(Some(Box::new(|value, _sender| {
///     assert_eq!(value, 40);
/// })));
///
/// // any instance with the same name reaches the subscribed one
/// Progress::channel().post(40);
/// ```
#[macro_export]
macro_rules! declare {
    () => {};

    (
        $(#[$attr:meta])*
        $v:vis channel $name:ident ($payload:ty);
        $($next:tt)*
    ) => {
        $(#[$attr])*
        $v struct $name;

        impl $crate::Topic for $name {
            type Payload = $payload;
            const NAME: &'static str = stringify!($name);
        }

        impl $name {
            $crate::__doc_comment! {
                concat!("Creates a typed channel for ", stringify!($name), " on the global bus"),
                $v fn channel() -> $crate::Channel<$payload> {
                    $crate::Channel::new(<$name as $crate::Topic>::NAME)
                }
            }
        }

        $crate::declare!($($next)*);
    };
}
