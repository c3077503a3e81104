use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::RuntimeError;
use crate::scope::Scope;

thread_local! {
    static CURRENT: RefCell<Option<Rc<ComponentInner>>> = const { RefCell::new(None) };
}

/// Per-component slot table for order-based `remember`.
#[derive(Default)]
pub struct Composer {
    slots: Vec<Box<dyn Any>>,
    cursor: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Rendering,
    Unmounted,
}

struct ComponentInner {
    composer: RefCell<Composer>,
    scope: Scope,
    effects: RefCell<Vec<Box<dyn FnOnce()>>>,
    phase: Cell<Phase>,
    dirty: Cell<bool>,
    renders: Cell<u64>,
}

/// A mounted instance: its remembered slots, its scope, and its lifecycle.
///
/// The first successful `render` attaches the component; `unmount` detaches
/// it and runs every teardown registered in its scope.
#[derive(Clone)]
pub struct Component {
    inner: Rc<ComponentInner>,
}

impl Component {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ComponentInner {
                composer: RefCell::new(Composer::default()),
                scope: Scope::new(),
                effects: RefCell::new(Vec::new()),
                phase: Cell::new(Phase::Idle),
                dirty: Cell::new(false),
                renders: Cell::new(0),
            }),
        }
    }

    /// Runs one render pass with this component installed as current, then
    /// commits the effects queued during it.
    pub fn render<R>(&self, f: impl FnOnce() -> R) -> Result<R, RuntimeError> {
        match self.inner.phase.get() {
            Phase::Unmounted => return Err(RuntimeError::Unmounted),
            Phase::Rendering => return Err(RuntimeError::AlreadyRendering),
            Phase::Idle => {}
        }

        let out = {
            let _guard = RenderGuard::enter(&self.inner);
            self.inner.scope.run(f)
        };

        let renders = self.inner.renders.get() + 1;
        self.inner.renders.set(renders);
        {
            let c = self.inner.composer.borrow();
            if renders > 1 && c.cursor != c.slots.len() {
                log::warn!(
                    "render: {} slots used, {} remembered; hooks must run in the same order every render",
                    c.cursor,
                    c.slots.len()
                );
            }
        }

        self.commit();
        Ok(out)
    }

    fn commit(&self) {
        loop {
            if self.inner.phase.get() == Phase::Unmounted {
                return;
            }
            let effects = std::mem::take(&mut *self.inner.effects.borrow_mut());
            if effects.is_empty() {
                return;
            }
            log::trace!("commit: running {} effect(s)", effects.len());
            self.inner.scope.run(|| {
                for effect in effects {
                    effect();
                }
            });
        }
    }

    /// Detaches the component. Idempotent.
    pub fn unmount(&self) {
        if self.inner.phase.replace(Phase::Unmounted) == Phase::Unmounted {
            return;
        }
        log::debug!(
            "unmount: component after {} render(s)",
            self.inner.renders.get()
        );
        self.inner.effects.borrow_mut().clear();
        self.inner.scope.dispose();

        let slots = std::mem::take(&mut self.inner.composer.borrow_mut().slots);
        drop(slots);
    }

    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.renders.get() > 0 && self.inner.phase.get() != Phase::Unmounted
    }

    /// True when state owned by this component changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.get()
    }

    pub fn render_count(&self) -> u64 {
        self.inner.renders.get()
    }

    pub fn scope(&self) -> &Scope {
        &self.inner.scope
    }

    pub fn invalidator(&self) -> Invalidator {
        Invalidator {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl Default for Component {
    fn default() -> Self {
        Self::new()
    }
}

struct RenderGuard {
    inner: Rc<ComponentInner>,
    prev: Option<Rc<ComponentInner>>,
}

impl RenderGuard {
    fn enter(inner: &Rc<ComponentInner>) -> Self {
        inner.phase.set(Phase::Rendering);
        inner.dirty.set(false);
        inner.composer.borrow_mut().cursor = 0;
        let prev = CURRENT.with(|c| c.replace(Some(inner.clone())));
        Self {
            inner: inner.clone(),
            prev,
        }
    }
}

impl Drop for RenderGuard {
    fn drop(&mut self) {
        let prev = self.prev.take();
        CURRENT.with(|c| *c.borrow_mut() = prev);
        if self.inner.phase.get() == Phase::Rendering {
            self.inner.phase.set(Phase::Idle);
        }
    }
}

/// Weak handle that marks its component for re-render.
#[derive(Clone)]
pub struct Invalidator {
    inner: Weak<ComponentInner>,
}

impl Invalidator {
    /// Returns false when the component is gone or unmounted.
    pub fn invalidate(&self) -> bool {
        match self.inner.upgrade() {
            Some(inner) if inner.phase.get() != Phase::Unmounted => {
                inner.dirty.set(true);
                true
            }
            _ => false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.phase.get() != Phase::Unmounted)
    }
}

fn current_component() -> Result<Rc<ComponentInner>, RuntimeError> {
    CURRENT
        .with(|c| c.borrow().clone())
        .ok_or(RuntimeError::NoActiveComponent)
}

pub fn current_invalidator() -> Option<Invalidator> {
    current_component().ok().map(|inner| Invalidator {
        inner: Rc::downgrade(&inner),
    })
}

/// Queues `f` to run once the current render commits. Outside a render it
/// runs immediately.
pub(crate) fn queue_effect(f: impl FnOnce() + 'static) {
    match current_component() {
        Ok(inner) => inner.effects.borrow_mut().push(Box::new(f)),
        Err(_) => {
            log::debug!("queue_effect: no active component; running immediately");
            f()
        }
    }
}

/// Claims the next slot. Returns its index and the stored value when the slot
/// already holds a `T`. A fresh slot gets a placeholder so nested calls made
/// by an initializer do not take its index.
fn next_slot<T: 'static>(inner: &ComponentInner) -> (usize, Option<T>)
where
    T: Clone,
{
    let mut c = inner.composer.borrow_mut();
    let cursor = c.cursor;
    c.cursor += 1;

    if cursor >= c.slots.len() {
        c.slots.push(Box::new(()));
        return (cursor, None);
    }

    match c.slots[cursor].downcast_ref::<T>() {
        Some(existing) => (cursor, Some(existing.clone())),
        None => {
            log::warn!(
                "remember: slot {} type changed; replacing. \
                 Hooks must be called in the same order on every render.",
                cursor
            );
            (cursor, None)
        }
    }
}

fn fill_slot<T: 'static>(inner: &ComponentInner, cursor: usize, value: T) {
    let mut c = inner.composer.borrow_mut();
    if let Some(slot) = c.slots.get_mut(cursor) {
        *slot = Box::new(value);
    }
}

/// Slot-based remember; `init` runs only when the slot is first created.
pub fn try_remember<T: 'static>(init: impl FnOnce() -> T) -> Result<Rc<T>, RuntimeError> {
    let inner = current_component()?;
    let (cursor, existing) = next_slot::<Rc<T>>(&inner);
    if let Some(rc) = existing {
        return Ok(rc);
    }

    let rc = Rc::new(init());
    fill_slot(&inner, cursor, rc.clone());
    Ok(rc)
}

/// Slot-based remember (sequential composition only).
///
/// # Panics
///
/// Panics when called outside of a component render.
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    match try_remember(init) {
        Ok(rc) => rc,
        Err(err) => panic!("remember: {err}"),
    }
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

/// Stores `value` in this slot on every render, returning the same cell each
/// time.
///
/// # Panics
///
/// Panics when called outside of a component render.
pub fn remember_latest<T: 'static>(value: T) -> Rc<RefCell<T>> {
    let inner = match current_component() {
        Ok(inner) => inner,
        Err(err) => panic!("remember_latest: {err}"),
    };
    let (cursor, existing) = next_slot::<Rc<RefCell<T>>>(&inner);
    if let Some(cell) = existing {
        *cell.borrow_mut() = value;
        return cell;
    }

    let cell = Rc::new(RefCell::new(value));
    fill_slot(&inner, cursor, cell.clone());
    cell
}
