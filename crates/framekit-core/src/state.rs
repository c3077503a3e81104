use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::remember;
use crate::runtime::{Invalidator, current_invalidator};

/// A state transition: replace with a value, or derive from the previous one.
pub enum SetStateAction<T> {
    Value(T),
    Update(Box<dyn FnOnce(&T) -> T>),
}

impl<T> SetStateAction<T> {
    pub fn update(f: impl FnOnce(&T) -> T + 'static) -> Self {
        SetStateAction::Update(Box::new(f))
    }

    pub fn apply(self, prev: &T) -> T {
        match self {
            SetStateAction::Value(v) => v,
            SetStateAction::Update(f) => f(prev),
        }
    }
}

impl<T> From<T> for SetStateAction<T> {
    fn from(value: T) -> Self {
        SetStateAction::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for SetStateAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetStateAction::Value(v) => f.debug_tuple("Value").field(v).finish(),
            SetStateAction::Update(_) => f.write_str("Update(..)"),
        }
    }
}

/// Setter half of `use_state`. Same identity across renders of one component.
pub struct SetState<T: 'static> {
    cell: Weak<RefCell<T>>,
    invalidator: Option<Invalidator>,
}

impl<T: Clone + 'static> SetState<T> {
    pub fn set(&self, value: T) {
        self.dispatch(SetStateAction::Value(value));
    }

    pub fn update(&self, f: impl FnOnce(&T) -> T + 'static) {
        self.dispatch(SetStateAction::update(f));
    }

    /// Applies `action` to the stored value and marks the owner for re-render.
    /// Ignored once the owning component has unmounted.
    pub fn dispatch(&self, action: SetStateAction<T>) {
        let alive = self.invalidator.as_ref().is_none_or(Invalidator::is_alive);
        let cell = match self.cell.upgrade() {
            Some(cell) if alive => cell,
            _ => {
                log::debug!("set_state: owner unmounted; update ignored");
                return;
            }
        };

        // No borrow is held while the updater runs; it may dispatch again.
        let prev = cell.borrow().clone();
        let next = action.apply(&prev);
        *cell.borrow_mut() = next;

        if let Some(invalidator) = &self.invalidator {
            invalidator.invalidate();
        }
    }
}

impl<T: 'static> SetState<T> {
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.cell.ptr_eq(&other.cell)
    }
}

impl<T: 'static> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            invalidator: self.invalidator.clone(),
        }
    }
}

impl<T: 'static> PartialEq for SetState<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: 'static> fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetState")
            .field("alive", &(self.cell.strong_count() > 0))
            .finish()
    }
}

struct StateSlot<T: 'static> {
    value: Rc<RefCell<T>>,
    setter: SetState<T>,
}

/// State container; `init` is evaluated once, on the first render.
///
/// # Panics
///
/// Panics when called outside of a component render.
pub fn use_state_with<T: Clone + 'static>(init: impl FnOnce() -> T) -> (T, SetState<T>) {
    let slot = remember(|| {
        let value = Rc::new(RefCell::new(init()));
        let setter = SetState {
            cell: Rc::downgrade(&value),
            invalidator: current_invalidator(),
        };
        StateSlot { value, setter }
    });
    let current = slot.value.borrow().clone();
    (current, slot.setter.clone())
}

/// State container seeded with `value`. Later renders ignore the argument.
pub fn use_state<T: Clone + 'static>(value: T) -> (T, SetState<T>) {
    use_state_with(move || value)
}
