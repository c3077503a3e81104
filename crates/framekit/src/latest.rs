use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use framekit_core::remember_latest;

/// Single-slot holder that every render overwrites. Handles stay valid across
/// renders, so closures created once can still reach the newest value.
pub struct Latest<T>(Rc<RefCell<T>>);

impl<T> Latest<T> {
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }

    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> Latest<T> {
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T> Clone for Latest<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: fmt::Debug> fmt::Debug for Latest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Latest").field(&*self.0.borrow()).finish()
    }
}

/// Returns the same holder on every render, refreshed with `value`.
pub fn use_latest<T: 'static>(value: T) -> Latest<T> {
    Latest(remember_latest(value))
}
