use std::rc::Rc;

use framekit_core::{Callback, use_callback};

use crate::{use_frame_slot, use_latest};

/// Wraps `callback` so it runs on the next display-refresh frame.
///
/// Emitting the returned [`Callback`] several times before the frame runs the
/// callback once, with the last argument. The callback invoked is always the
/// one passed on the most recent render; `deps` only decides when the returned
/// `Callback` gets a new identity. A pending run is canceled on unmount.
///
/// Use a tuple for `A` to forward several arguments.
pub fn use_raf_callback<A, D>(callback: impl Fn(A) + 'static, deps: D) -> Callback<A>
where
    A: 'static,
    D: PartialEq + 'static,
{
    let latest = use_latest(Rc::new(callback) as Rc<dyn Fn(A)>);
    let slot = use_frame_slot(move |args: A| {
        let callback = latest.get();
        callback(args);
    });
    use_callback(deps, move |args: A| slot.schedule(args))
}
