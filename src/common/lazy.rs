use parking_lot::Once;
use std::{cell::UnsafeCell, mem::MaybeUninit};

/// Lazily initialized static value with a fixed initializer.
pub(crate) struct Lazy<T> {
    once: Once,
    init: fn() -> T,
    value: UnsafeCell<MaybeUninit<T>>,
}

// call_once serializes the single write; every later access is a shared
// reference to the initialized value
unsafe impl<T: Send + Sync> Sync for Lazy<T> {}

impl<T> Lazy<T> {
    pub(crate) const fn new(init: fn() -> T) -> Self {
        Self {
            once: Once::new(),
            init,
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    pub(crate) fn get(&self) -> &T {
        self.once.call_once(|| {
            let value = (self.init)();
            unsafe { &mut *self.value.get() }.write(value);
        });
        unsafe { (&*self.value.get()).assume_init_ref() }
    }
}
