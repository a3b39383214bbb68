//! Edge weight sharing between the two records of an edge.
//!
//! [`Independent`] stores a copy of the weight in each record. [`Shared`]
//! stores one reference-counted cell that both records point to; this is the
//! only place where two locations in a graph alias mutable state. Handles of
//! either policy compare by value.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::config::SharingKind;

pub trait WeightPolicy: 'static {
    type Weight;
    type Handle: Clone + fmt::Debug + PartialEq;

    const KIND: SharingKind;

    fn make(weight: Self::Weight) -> Self::Handle;

    /// Handle for the partner record of `handle`.
    fn reciprocal(handle: &Self::Handle) -> Self::Handle;

    /// A handle that shares nothing with `handle`.
    fn deep_clone(handle: &Self::Handle) -> Self::Handle;

    fn same_instance(a: &Self::Handle, b: &Self::Handle) -> bool;

    /// Address of the shared instance, `None` for by-value handles.
    fn identity(handle: &Self::Handle) -> Option<usize>;

    fn read<R>(handle: &Self::Handle, f: impl FnOnce(&Self::Weight) -> R) -> R;

    fn write<R>(handle: &mut Self::Handle, f: impl FnOnce(&mut Self::Weight) -> R) -> R;
}

/// Each record owns its own copy of the weight.
pub struct Independent<W>(PhantomData<fn() -> W>);

/// Both records of an edge point at one `Rc<RefCell<W>>`.
pub struct Shared<W>(PhantomData<fn() -> W>);

impl<W: Clone + fmt::Debug + PartialEq + 'static> WeightPolicy for Independent<W> {
    type Weight = W;
    type Handle = W;

    const KIND: SharingKind = SharingKind::Independent;

    fn make(weight: W) -> W {
        weight
    }

    fn reciprocal(handle: &W) -> W {
        handle.clone()
    }

    fn deep_clone(handle: &W) -> W {
        handle.clone()
    }

    fn same_instance(a: &W, b: &W) -> bool {
        a == b
    }

    fn identity(_handle: &W) -> Option<usize> {
        None
    }

    fn read<R>(handle: &W, f: impl FnOnce(&W) -> R) -> R {
        f(handle)
    }

    fn write<R>(handle: &mut W, f: impl FnOnce(&mut W) -> R) -> R {
        f(handle)
    }
}

impl<W: Clone + fmt::Debug + PartialEq + 'static> WeightPolicy for Shared<W> {
    type Weight = W;
    type Handle = SharedWeight<W>;

    const KIND: SharingKind = SharingKind::Shared;

    fn make(weight: W) -> SharedWeight<W> {
        SharedWeight::new(weight)
    }

    fn reciprocal(handle: &SharedWeight<W>) -> SharedWeight<W> {
        handle.clone()
    }

    fn deep_clone(handle: &SharedWeight<W>) -> SharedWeight<W> {
        SharedWeight::new(handle.get().clone())
    }

    fn same_instance(a: &SharedWeight<W>, b: &SharedWeight<W>) -> bool {
        a.ptr_eq(b)
    }

    fn identity(handle: &SharedWeight<W>) -> Option<usize> {
        Some(Rc::as_ptr(&handle.0) as *const () as usize)
    }

    fn read<R>(handle: &SharedWeight<W>, f: impl FnOnce(&W) -> R) -> R {
        f(&handle.get())
    }

    fn write<R>(handle: &mut SharedWeight<W>, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut handle.get_mut())
    }
}

/// Cloning the handle shares the weight; use [`WeightPolicy::deep_clone`]
/// for a detached copy.
pub struct SharedWeight<W>(Rc<RefCell<W>>);

impl<W> SharedWeight<W> {
    pub fn new(weight: W) -> Self {
        Self(Rc::new(RefCell::new(weight)))
    }

    /// Borrows the weight. Writing through any graph that aliases this
    /// handle while the guard is alive panics, so keep it short-lived.
    pub fn get(&self) -> Ref<'_, W> {
        self.0.borrow()
    }

    /// Writes go through [`WeightPolicy::write`], which never overlaps
    /// another borrow taken inside the crate.
    pub(crate) fn get_mut(&self) -> RefMut<'_, W> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<W> Clone for SharedWeight<W> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<W: PartialEq> PartialEq for SharedWeight<W> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.get() == *other.get()
    }
}

impl<W: fmt::Debug> fmt::Debug for SharedWeight<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.get(), f)
    }
}
