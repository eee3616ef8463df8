//! Scoped backend state
//!
//! Some instruction sets need per-call register setup before the first
//! vector operation and a matching release afterwards. [`VecScope`] runs
//! [`Vector::declare`] on construction and [`Vector::cleanup`] on drop, so
//! the release happens on every exit path. A scope is bound to the thread
//! that created it.

use super::Vector;
use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Scope guard for one kernel invocation.
pub struct VecScope<V: Vector> {
    _backend: PhantomData<V>,
    // Not Send or Sync
    _thread: PhantomData<*const ()>,
}

impl<V: Vector> VecScope<V> {
    /// Enter a vector scope.
    pub fn enter() -> Self {
        V::declare();
        DEPTH.with(|d| d.set(d.get() + 1));
        VecScope {
            _backend: PhantomData,
            _thread: PhantomData,
        }
    }

    /// Number of scopes currently open on this thread.
    pub fn depth() -> usize {
        DEPTH.with(|d| d.get())
    }
}

impl<V: Vector> Drop for VecScope<V> {
    fn drop(&mut self) {
        DEPTH.with(|d| d.set(d.get() - 1));
        V::cleanup();
    }
}
