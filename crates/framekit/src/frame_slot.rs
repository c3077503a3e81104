use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use framekit_core::{FrameHandle, cancel_frame, on_unmount, remember, request_frame};

use crate::use_mount;

enum SlotState<P> {
    Idle,
    Pending { ticket: FrameHandle, payload: P },
}

struct SlotInner<P> {
    state: RefCell<SlotState<P>>,
    closed: Cell<bool>,
    handler: Box<dyn Fn(P)>,
}

/// Coalesces requests to at most one delivery per frame.
///
/// Holds at most one pending frame ticket. Scheduling while one is pending
/// cancels it and replaces the payload, so the handler only ever sees the
/// last payload of a frame.
pub struct FrameSlot<P: 'static> {
    inner: Rc<SlotInner<P>>,
}

impl<P: 'static> FrameSlot<P> {
    pub fn new(handler: impl Fn(P) + 'static) -> Self {
        Self {
            inner: Rc::new(SlotInner {
                state: RefCell::new(SlotState::Idle),
                closed: Cell::new(false),
                handler: Box::new(handler),
            }),
        }
    }

    /// Replaces any pending payload with `payload`. A no-op once closed.
    pub fn schedule(&self, payload: P) {
        if self.inner.closed.get() {
            log::debug!("frame slot: closed; schedule ignored");
            return;
        }

        let prev = self.inner.state.replace(SlotState::Idle);
        if let SlotState::Pending { ticket, .. } = prev {
            cancel_frame(ticket);
            log::trace!("frame slot: {ticket:?} superseded");
        }

        let weak: Weak<SlotInner<P>> = Rc::downgrade(&self.inner);
        let ticket = request_frame(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.fire();
            }
        });
        *self.inner.state.borrow_mut() = SlotState::Pending { ticket, payload };
    }

    /// Drops the pending payload, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.inner.state.replace(SlotState::Idle) {
            SlotState::Pending { ticket, .. } => {
                cancel_frame(ticket);
                log::trace!("frame slot: {ticket:?} canceled");
                true
            }
            SlotState::Idle => false,
        }
    }

    /// Cancels the pending payload and refuses every later `schedule`.
    pub fn close(&self) {
        self.inner.closed.set(true);
        self.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.inner.state.borrow(), SlotState::Pending { .. })
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<P> SlotInner<P> {
    fn fire(&self) {
        // State is back to Idle before the handler runs, so it may reschedule.
        if let SlotState::Pending { ticket, payload } = self.state.replace(SlotState::Idle) {
            log::trace!("frame slot: {ticket:?} fired");
            (self.handler)(payload);
        }
    }
}

impl<P: 'static> Clone for FrameSlot<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: 'static> PartialEq for FrameSlot<P> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<P: 'static> fmt::Debug for FrameSlot<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameSlot")
            .field("pending", &self.is_pending())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// A `FrameSlot` owned by the current component and closed when it
/// unmounts, so handles kept past teardown never deliver. Only the first render's `handler` is kept; read values that
/// change between renders through [`use_latest`](crate::use_latest).
pub fn use_frame_slot<P: 'static>(handler: impl Fn(P) + 'static) -> FrameSlot<P> {
    let slot = (*remember(|| FrameSlot::new(handler))).clone();
    use_mount({
        let slot = slot.clone();
        move || {
            on_unmount(move || slot.close())
        }
    });
    slot
}
