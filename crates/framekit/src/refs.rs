use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use framekit_core::{Dispose, IntoDispose, remember};
use smallvec::SmallVec;

/// Cell-style reference handle: a shared, settable `current`.
pub struct NodeRef<T>(Rc<RefCell<Option<T>>>);

impl<T> NodeRef<T> {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    pub fn set(&self, value: Option<T>) {
        *self.0.borrow_mut() = value;
    }

    pub fn take(&self) -> Option<T> {
        self.0.borrow_mut().take()
    }

    pub fn is_set(&self) -> bool {
        self.0.borrow().is_some()
    }

    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.0.borrow().as_ref())
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> NodeRef<T> {
    pub fn current(&self) -> Option<T> {
        self.0.borrow().clone()
    }
}

impl<T> Clone for NodeRef<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for NodeRef<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PartialEq for NodeRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&*self.0.borrow()).finish()
    }
}

/// Callback-style reference handle. The callback may hand back a cleanup.
pub struct RefCallback<T: 'static>(Rc<dyn Fn(T) -> Option<Dispose>>);

impl<T: 'static> RefCallback<T> {
    pub fn new<C: IntoDispose>(f: impl Fn(T) -> C + 'static) -> Self {
        Self(Rc::new(move |value| f(value).into_dispose()))
    }

    pub fn call(&self, value: T) -> Option<Dispose> {
        (self.0)(value)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: 'static> Clone for RefCallback<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: 'static> fmt::Debug for RefCallback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefCallback({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// A reference handle: either a cell or a callback.
pub enum Ref<T: 'static> {
    Cell(NodeRef<T>),
    Callback(RefCallback<T>),
}

impl<T: 'static> Clone for Ref<T> {
    fn clone(&self) -> Self {
        match self {
            Ref::Cell(cell) => Ref::Cell(cell.clone()),
            Ref::Callback(cb) => Ref::Callback(cb.clone()),
        }
    }
}

impl<T: 'static> From<NodeRef<T>> for Ref<T> {
    fn from(cell: NodeRef<T>) -> Self {
        Ref::Cell(cell)
    }
}

impl<T: 'static> From<RefCallback<T>> for Ref<T> {
    fn from(cb: RefCallback<T>) -> Self {
        Ref::Callback(cb)
    }
}

/// Anything that can stand in a `merge_refs` argument list, absent or not.
pub trait IntoRef<T: 'static> {
    fn into_ref(self) -> Option<Ref<T>>;
}

impl<T: 'static> IntoRef<T> for Ref<T> {
    fn into_ref(self) -> Option<Ref<T>> {
        Some(self)
    }
}

impl<T: 'static> IntoRef<T> for NodeRef<T> {
    fn into_ref(self) -> Option<Ref<T>> {
        Some(Ref::Cell(self))
    }
}

impl<T: 'static> IntoRef<T> for &NodeRef<T> {
    fn into_ref(self) -> Option<Ref<T>> {
        Some(Ref::Cell(self.clone()))
    }
}

impl<T: 'static> IntoRef<T> for RefCallback<T> {
    fn into_ref(self) -> Option<Ref<T>> {
        Some(Ref::Callback(self))
    }
}

impl<T: 'static> IntoRef<T> for &RefCallback<T> {
    fn into_ref(self) -> Option<Ref<T>> {
        Some(Ref::Callback(self.clone()))
    }
}

impl<T: 'static, R: IntoRef<T>> IntoRef<T> for Option<R> {
    fn into_ref(self) -> Option<Ref<T>> {
        self.and_then(IntoRef::into_ref)
    }
}

enum RefCleanup<T: 'static> {
    Run(Dispose),
    Reset(NodeRef<T>),
}

/// Combines several reference handles into one callback.
///
/// Calling the result with a value hands a clone of it to every present
/// handle, in order: callbacks are invoked, cells get `current = Some(value)`.
/// The returned cleanup runs the callbacks' own cleanups and resets the cells
/// to `None`. Absent handles are skipped.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use framekit::{NodeRef, RefCallback, merge_refs};
///
/// let cell = NodeRef::<u32>::new();
/// let seen = Rc::new(Cell::new(0u32));
/// let seen_c = seen.clone();
/// let callback = RefCallback::new(move |v: u32| seen_c.set(v));
/// let merged = merge_refs!(&cell, callback, None::<NodeRef<u32>>);
///
/// let cleanup = merged.call(7).unwrap();
/// assert_eq!((cell.current(), seen.get()), (Some(7), 7));
/// cleanup.run();
/// assert_eq!(cell.current(), None);
/// ```
pub fn merge_refs<T, I>(refs: I) -> RefCallback<T>
where
    T: Clone + 'static,
    I: IntoIterator,
    I::Item: IntoRef<T>,
{
    let refs: Rc<[Ref<T>]> = refs.into_iter().filter_map(IntoRef::into_ref).collect();

    RefCallback(Rc::new(move |value: T| {
        let mut cleanups: SmallVec<[RefCleanup<T>; 4]> = SmallVec::new();
        for r in refs.iter() {
            match r {
                Ref::Callback(cb) => {
                    if let Some(d) = cb.call(value.clone()) {
                        cleanups.push(RefCleanup::Run(d));
                    }
                }
                Ref::Cell(cell) => {
                    cell.set(Some(value.clone()));
                    cleanups.push(RefCleanup::Reset(cell.clone()));
                }
            }
        }
        log::trace!("merge_refs: attached to {} handle(s)", refs.len());

        Some(Dispose::new(move || {
            for cleanup in cleanups {
                match cleanup {
                    RefCleanup::Run(d) => d.run(),
                    RefCleanup::Reset(cell) => cell.set(None),
                }
            }
        }))
    }))
}

/// Variadic form of [`merge_refs`]. Accepts `NodeRef`, `&NodeRef`,
/// `RefCallback`, `Ref`, or an `Option` of any of those.
#[macro_export]
macro_rules! merge_refs {
    ($($r:expr),* $(,)?) => {
        $crate::refs::merge_refs([$($crate::refs::IntoRef::into_ref($r)),*])
    };
}

/// A `NodeRef` kept for the lifetime of the component.
pub fn use_node_ref<T: 'static>() -> NodeRef<T> {
    (*remember(NodeRef::<T>::new)).clone()
}
