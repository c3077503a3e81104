//! Display-refresh scheduling.
//!
//! The frame queue stands in for the platform's "call me before the next
//! repaint" primitive. A platform loop calls [`run_frame`] once per refresh;
//! hooks call [`request_frame`] / [`cancel_frame`].
//!
//! Everything here is thread-local: a frame requested on one thread only runs
//! when that thread drives its own queue.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use web_time::Instant;

new_key_type! {
    /// Ticket for one pending frame callback.
    pub struct FrameHandle;
}

// Animation clock
pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A test clock you can drive deterministically.
#[derive(Clone)]
pub struct TestClock {
    pub t: Instant,
}
impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.t
    }
}

type FrameCallback = Box<dyn FnOnce(Instant)>;

struct FrameQueue {
    callbacks: SlotMap<FrameHandle, FrameCallback>,
    order: Vec<FrameHandle>,
    frames: u64,
    clock: Option<Box<dyn Clock>>,
    on_request: Option<Rc<dyn Fn()>>,
}

impl FrameQueue {
    fn new() -> Self {
        Self {
            callbacks: SlotMap::with_key(),
            order: Vec::new(),
            frames: 0,
            clock: None,
            on_request: None,
        }
    }
}

thread_local! {
    static FRAMES: RefCell<FrameQueue> = RefCell::new(FrameQueue::new());
}

/// Install this thread's frame clock. Platform sets this to SystemClock; tests
/// can set TestClock.
pub fn set_clock(clock: Box<dyn Clock>) {
    FRAMES.with(|q| q.borrow_mut().clock = Some(clock));
}

pub fn now() -> Instant {
    FRAMES
        .with(|q| q.borrow().clock.as_ref().map(|c| c.now()))
        .unwrap_or_else(Instant::now)
}

/// Called whenever the next frame goes from empty to non-empty, so a platform
/// runner can ask its window for a redraw. Requests made while a frame runs
/// count toward the following frame.
pub fn set_frame_requested_hook(hook: impl Fn() + 'static) {
    FRAMES.with(|q| q.borrow_mut().on_request = Some(Rc::new(hook)));
}

pub fn clear_frame_requested_hook() {
    FRAMES.with(|q| q.borrow_mut().on_request = None);
}

/// Schedules `f` for the next frame.
pub fn request_frame(f: impl FnOnce(Instant) + 'static) -> FrameHandle {
    let (handle, notify) = FRAMES.with(|q| {
        let mut q = q.borrow_mut();
        // `order` only holds the next frame; the running batch was taken out.
        let was_idle = q.order.is_empty();
        let handle = q.callbacks.insert(Box::new(f));
        q.order.push(handle);
        let notify = if was_idle { q.on_request.clone() } else { None };
        (handle, notify)
    });
    log::trace!("frame: requested {handle:?}");

    if let Some(notify) = notify {
        notify();
    }
    handle
}

/// Cancels a pending callback. Returns false if it already ran or was
/// canceled.
pub fn cancel_frame(handle: FrameHandle) -> bool {
    let removed = FRAMES.with(|q| {
        let mut q = q.borrow_mut();
        let removed = q.callbacks.remove(handle);
        if removed.is_some() {
            q.order.retain(|h| *h != handle);
        }
        removed
    });
    match removed {
        Some(cb) => {
            log::trace!("frame: canceled {handle:?}");
            drop(cb);
            true
        }
        None => false,
    }
}

pub fn is_frame_pending(handle: FrameHandle) -> bool {
    FRAMES.with(|q| q.borrow().callbacks.contains_key(handle))
}

pub fn pending_frames() -> usize {
    FRAMES.with(|q| q.borrow().callbacks.len())
}

/// Number of frames run so far on this thread.
pub fn frame_count() -> u64 {
    FRAMES.with(|q| q.borrow().frames)
}

/// Runs every callback requested before this call, in request order, stamped
/// with the clock's current time. Returns how many ran.
pub fn run_frame() -> usize {
    run_frame_at(now())
}

/// Like [`run_frame`] with an explicit timestamp. Callbacks requested while
/// the frame runs wait for the next one.
pub fn run_frame_at(timestamp: Instant) -> usize {
    let batch = FRAMES.with(|q| {
        let mut q = q.borrow_mut();
        q.frames += 1;
        std::mem::take(&mut q.order)
    });

    let mut ran = 0;
    for handle in batch {
        // Removed one at a time: an earlier callback may cancel a later one.
        let cb = FRAMES.with(|q| q.borrow_mut().callbacks.remove(handle));
        if let Some(cb) = cb {
            cb(timestamp);
            ran += 1;
        }
    }

    log::trace!("frame: ran {ran} callback(s)");
    ran
}
