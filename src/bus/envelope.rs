use std::any::{self, Any};
use std::fmt;

/// Type-preserving container carrying one value through the untyped bus.
///
/// Created by the posting side, consumed by the delivery callback. The
/// wrapped value is set at construction and never mutated; its type name is
/// recorded so a receiver that expected something else can say what it
/// actually got.
pub struct Envelope {
    value: Box<dyn Any + Send>,
    type_name: &'static str,
}

impl Envelope {
    /// Wraps `value`, recording its type name for diagnostics.
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: any::type_name::<T>(),
        }
    }

    /// Borrows the wrapped value when it really is a `T`.
    ///
    /// Returns `None` on a type mismatch instead of guessing.
    pub fn open<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// Name of the wrapped value's type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("type_name", &self.type_name)
            .finish()
    }
}
