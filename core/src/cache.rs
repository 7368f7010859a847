//! Compute-on-read, invalidate-on-write caching for typed projections.
//!
//! # Design
//! Fields are read far more often than written, so projections are cached in
//! an owned slot. Every write path must call [`CacheSlot::invalidate`];
//! reads then recompute, so a stale projection is never observable. Failed
//! computations are not cached.

use std::cell::RefCell;
use std::fmt;

pub struct CacheSlot<T> {
    slot: RefCell<Option<T>>,
}

impl<T> CacheSlot<T> {
    pub fn new() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }

    /// Drop the cached value; the next read recomputes.
    pub fn invalidate(&self) {
        *self.slot.borrow_mut() = None;
    }
}

impl<T: Clone> CacheSlot<T> {
    /// Return the cached value, computing and storing it first if absent.
    pub fn get_or_try_compute<E>(&self, compute: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        if let Some(cached) = self.slot.borrow().as_ref() {
            return Ok(cached.clone());
        }
        let value = compute()?;
        *self.slot.borrow_mut() = Some(value.clone());
        Ok(value)
    }
}

impl<T> Default for CacheSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for CacheSlot<T> {
    fn clone(&self) -> Self {
        Self {
            slot: RefCell::new(self.slot.borrow().clone()),
        }
    }
}

impl<T> fmt::Debug for CacheSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheSlot")
            .field("filled", &self.slot.borrow().is_some())
            .finish()
    }
}
