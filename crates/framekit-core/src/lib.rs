//! # Components, Slots, and Frames
//!
//! `framekit-core` is the small host runtime that the `framekit` hooks are
//! built on. There are four main pieces:
//!
//! - `Component`: one mounted instance, with its slots, its scope, its lifecycle.
//! - `remember*`: per-component storage, addressed by call order.
//! - `use_effect` / `use_state` / `use_callback`: the hook primitives.
//! - the frame queue: `request_frame` / `cancel_frame` / `run_frame`.
//!
//! ## Rendering
//!
//! A render pass installs the component as current, runs the body, then
//! commits: effects queued during the pass run after it returns.
//!
//! ```rust
//! use framekit_core::*;
//!
//! let component = Component::new();
//! let count = component
//!     .render(|| {
//!         let (count, _set_count) = use_state(0);
//!         count
//!     })
//!     .unwrap();
//! assert_eq!(count, 0);
//! component.unmount();
//! ```
//!
//! - `remember` is order‑based: the Nth call in a render always refers to the
//!   Nth stored value, so hooks must run in the same order every render.
//! - Calling a hook outside of `Component::render` panics.
//!
//! ## Effects and cleanup
//!
//! ```rust
//! use framekit_core::*;
//!
//! let component = Component::new();
//! component
//!     .render(|| {
//!         use_effect((), || {
//!             log::info!("mounted");
//!             on_unmount(|| log::info!("unmounted"))
//!         });
//!     })
//!     .unwrap();
//! component.unmount();
//! ```
//!
//! ## Frames
//!
//! The platform loop calls `run_frame()` once per display refresh. Anything
//! requested with `request_frame` before that call runs in it; a handle can be
//! canceled until then.

pub mod effects;
pub mod error;
pub mod frame;
pub mod memo;
pub mod prelude;
pub mod runtime;
pub mod scope;
pub mod state;
pub mod testing;

pub use effects::*;
pub use error::*;
pub use frame::*;
pub use memo::*;
pub use runtime::*;
pub use scope::*;
pub use state::*;
