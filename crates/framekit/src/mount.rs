use framekit_core::{IntoDispose, use_effect};

/// Runs `effect` once, after the first render commits. A returned teardown
/// (`Dispose` or `Some(Dispose)`) runs once, on unmount.
pub fn use_mount<C: IntoDispose>(effect: impl FnOnce() -> C + 'static) {
    use_effect((), effect);
}
