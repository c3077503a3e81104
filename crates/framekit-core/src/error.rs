use thiserror::Error;

/// Misuse of the component runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("hook called outside of a component render")]
    NoActiveComponent,
    #[error("component is already rendering")]
    AlreadyRendering,
    #[error("component has been unmounted")]
    Unmounted,
}
