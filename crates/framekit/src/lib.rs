//! # Framekit hooks
//!
//! Small utility hooks on top of `framekit-core`:
//!
//! - [`merge_refs`] / [`merge_refs!`]: one reference callback feeding many
//!   handles.
//! - [`use_mount`]: an effect that runs once on attach, torn down on detach.
//! - [`use_raf_callback`]: a callback coalesced to one run per frame.
//! - [`use_raf_state`]: state whose updates are coalesced to one per frame.
//!
//! The two frame-deferred hooks share [`FrameSlot`], a single-ticket
//! coalescer, and [`use_latest`], which lets a closure created once read
//! values from the newest render.
//!
//! ```rust
//! use framekit::*;
//! use framekit_core::testing::render_hook;
//!
//! let mut hook = render_hook(|| {
//!     let (pos, set_pos) = use_raf_state((0, 0));
//!     let on_move = use_raf_callback(move |p: (i32, i32)| set_pos.set(p), ());
//!     (pos, on_move)
//! })
//! .unwrap();
//!
//! hook.act(|(_, on_move)| {
//!     on_move.emit((1, 1));
//!     on_move.emit((4, 2));
//! })
//! .unwrap();
//! hook.advance_frame().unwrap(); // callback runs, schedules the state update
//! hook.advance_frame().unwrap(); // state update lands
//! assert_eq!(hook.result().0, (4, 2));
//! ```

pub mod frame_slot;
pub mod latest;
pub mod mount;
pub mod raf_callback;
pub mod raf_state;
pub mod refs;
mod tests;

pub use frame_slot::{FrameSlot, use_frame_slot};
pub use latest::{Latest, use_latest};
pub use mount::use_mount;
pub use raf_callback::use_raf_callback;
pub use raf_state::{RafSetState, use_raf_state, use_raf_state_with};
pub use refs::{IntoRef, NodeRef, Ref, RefCallback, merge_refs, use_node_ref};

pub use framekit_core::{Callback, Dispose, SetStateAction, on_unmount};
