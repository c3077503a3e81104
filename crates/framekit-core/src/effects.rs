use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::remember;
use crate::runtime::queue_effect;
use crate::scope::current_scope;

#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        // Release the borrow before running so the cleanup may touch this handle.
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }

    pub fn is_spent(&self) -> bool {
        self.0.borrow().is_none()
    }
}

impl fmt::Debug for Dispose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispose")
            .field("spent", &self.is_spent())
            .finish()
    }
}

/// Helper to register cleanup inside effect.
pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}

/// What an effect may hand back as its teardown.
pub trait IntoDispose {
    fn into_dispose(self) -> Option<Dispose>;
}

impl IntoDispose for () {
    fn into_dispose(self) -> Option<Dispose> {
        None
    }
}

impl IntoDispose for Dispose {
    fn into_dispose(self) -> Option<Dispose> {
        Some(self)
    }
}

impl IntoDispose for Option<Dispose> {
    fn into_dispose(self) -> Option<Dispose> {
        self
    }
}

/// Runs `f()` immediately and returns its `Dispose`.
pub fn effect<F>(f: F) -> Dispose
where
    F: FnOnce() -> Dispose + 'static,
{
    let d = f();

    // auto-register cleanup in the current scope if one exists
    if let Some(scope) = current_scope() {
        let d2 = d.clone();
        scope.add_disposer(move || d2.run());
    }

    d
}

struct EffectSlot<D> {
    last_deps: RefCell<Option<D>>,
    cleanup: Rc<RefCell<Option<Dispose>>>,
    installed: RefCell<bool>,
}

/// Runs `effect` after the render commits whenever `deps` differs from the
/// previous render's value. The previous teardown runs before each re-run, and
/// the last one runs when the component unmounts.
///
/// # Panics
///
/// Panics when called outside of a component render.
pub fn use_effect<D, C>(deps: D, effect: impl FnOnce() -> C + 'static)
where
    D: PartialEq + 'static,
    C: IntoDispose,
{
    let slot = remember(|| EffectSlot::<D> {
        last_deps: RefCell::new(None),
        cleanup: Rc::new(RefCell::new(None)),
        installed: RefCell::new(false),
    });

    // Install a single unmount disposer for this callsite.
    if !*slot.installed.borrow() {
        *slot.installed.borrow_mut() = true;
        if let Some(scope) = current_scope() {
            let cleanup = slot.cleanup.clone();
            scope.add_disposer(move || {
                let d = cleanup.borrow_mut().take();
                if let Some(d) = d {
                    d.run();
                }
            });
        }
    }

    let changed = slot.last_deps.borrow().as_ref() != Some(&deps);
    if !changed {
        return;
    }
    *slot.last_deps.borrow_mut() = Some(deps);

    let cleanup = slot.cleanup.clone();
    queue_effect(move || {
        let prev = cleanup.borrow_mut().take();
        if let Some(prev) = prev {
            prev.run();
        }
        let next = effect().into_dispose();
        *cleanup.borrow_mut() = next;
    });
}
