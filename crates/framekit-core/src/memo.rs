use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::remember;

/// Shared `Fn(A)` whose equality is identity.
pub struct Callback<A: 'static>(Rc<dyn Fn(A)>);

impl<A: 'static> Callback<A> {
    pub fn new(f: impl Fn(A) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn emit(&self, args: A) {
        (self.0)(args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<A: 'static> Clone for Callback<A> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<A: 'static> PartialEq for Callback<A> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<A: 'static> fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// Recomputes only when `deps` differs from the previous render's value.
pub fn use_memo<D, T>(deps: D, compute: impl FnOnce(&D) -> T) -> T
where
    D: PartialEq + 'static,
    T: Clone + 'static,
{
    let memo = remember(|| RefCell::new(None::<(D, T)>));
    let mut memo = memo.borrow_mut();
    match memo.as_ref() {
        Some((prev, value)) if *prev == deps => value.clone(),
        _ => {
            let value = compute(&deps);
            *memo = Some((deps, value.clone()));
            value
        }
    }
}

/// `Callback` that keeps its identity until `deps` changes.
pub fn use_callback<A, D>(deps: D, f: impl Fn(A) + 'static) -> Callback<A>
where
    A: 'static,
    D: PartialEq + 'static,
{
    use_memo(deps, move |_| Callback::new(f))
}
