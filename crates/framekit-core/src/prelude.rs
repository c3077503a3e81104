pub use crate::effects::{Dispose, IntoDispose, effect, on_unmount, use_effect};
pub use crate::error::RuntimeError;
pub use crate::frame::{
    Clock, FrameHandle, SystemClock, TestClock, cancel_frame, request_frame, run_frame, set_clock,
};
pub use crate::memo::{Callback, use_callback, use_memo};
pub use crate::runtime::{Component, remember, remember_latest, remember_state};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::state::{SetState, SetStateAction, use_state, use_state_with};
