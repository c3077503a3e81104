use std::fmt;

use framekit_core::{SetStateAction, use_state_with};

use crate::{FrameSlot, use_frame_slot};

/// Setter returned by [`use_raf_state`]. Updates land on the next frame; only
/// the last one requested before that frame is applied.
pub struct RafSetState<T: 'static> {
    slot: FrameSlot<SetStateAction<T>>,
}

impl<T: 'static> RafSetState<T> {
    pub fn set(&self, value: T) {
        self.dispatch(SetStateAction::Value(value));
    }

    /// `f` sees the state as committed when the frame runs. It is never
    /// called if a later request replaces it first.
    pub fn update(&self, f: impl FnOnce(&T) -> T + 'static) {
        self.dispatch(SetStateAction::update(f));
    }

    pub fn dispatch(&self, action: SetStateAction<T>) {
        self.slot.schedule(action);
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_pending()
    }
}

impl<T: 'static> Clone for RafSetState<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: 'static> PartialEq for RafSetState<T> {
    fn eq(&self, other: &Self) -> bool {
        self.slot.ptr_eq(&other.slot)
    }
}

impl<T: 'static> fmt::Debug for RafSetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RafSetState")
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Frame-deferred state; `init` is evaluated once, on the first render.
pub fn use_raf_state_with<T: Clone + 'static>(
    init: impl FnOnce() -> T,
) -> (T, RafSetState<T>) {
    let (state, set_state) = use_state_with(init);
    let slot = use_frame_slot(move |action: SetStateAction<T>| set_state.dispatch(action));
    (state, RafSetState { slot })
}

/// Frame-deferred state seeded with `value`.
///
/// ```
/// use framekit::use_raf_state;
/// use framekit_core::testing::render_hook;
///
/// let mut hook = render_hook(|| use_raf_state(0)).unwrap();
/// hook.act(|(_, set)| set.set(1)).unwrap();
/// assert_eq!(hook.result().0, 0);
/// hook.advance_frame().unwrap();
/// assert_eq!(hook.result().0, 1);
/// ```
pub fn use_raf_state<T: Clone + 'static>(value: T) -> (T, RafSetState<T>) {
    use_raf_state_with(move || value)
}
