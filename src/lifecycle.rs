//! Scoped resource release.
//!
//! A `Disposable` is anything that can be torn down exactly once. The
//! `DisposableStore` groups several of them so they can be released together,
//! which is how per-container listeners are bound to the container's lifetime.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub trait Disposable {
    /// Release the resource. Calling this more than once must be a no-op.
    fn dispose(&mut self);
}

impl<F: FnOnce()> Disposable for Option<F> {
    fn dispose(&mut self) {
        if let Some(f) = self.take() {
            f();
        }
    }
}

/// Wrap a closure so it runs once when disposed.
pub fn to_disposable<F: FnOnce() + 'static>(f: F) -> Box<dyn Disposable> {
    Box::new(Some(f))
}

#[derive(Default)]
struct StoreInner {
    items: Vec<Box<dyn Disposable>>,
    disposed: bool,
}

/// Shared collection of disposables released together.
///
/// Clones refer to the same store. Items added after the store has been
/// disposed are released immediately instead of leaking.
#[derive(Clone, Default)]
pub struct DisposableStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl DisposableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<D: Disposable + 'static>(&self, mut item: D) {
        let mut inner = self.inner.borrow_mut();
        if inner.disposed {
            drop(inner);
            tracing::trace!("disposable added to released store; disposing now");
            item.dispose();
            return;
        }
        inner.items.push(Box::new(item));
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().disposed
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release every item in insertion order. Subsequent calls do nothing.
    pub fn dispose(&self) {
        // Take the items out first so a disposable that touches this store
        // (e.g. adds another item) does not hit an outstanding borrow.
        let items = {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return;
            }
            inner.disposed = true;
            std::mem::take(&mut inner.items)
        };
        for mut item in items {
            item.dispose();
        }
    }
}

impl Disposable for Box<dyn Disposable> {
    fn dispose(&mut self) {
        (**self).dispose();
    }
}

impl Disposable for DisposableStore {
    fn dispose(&mut self) {
        DisposableStore::dispose(self);
    }
}

impl fmt::Debug for DisposableStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("DisposableStore")
            .field("items", &inner.items.len())
            .field("disposed", &inner.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn store_releases_in_order_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let store = DisposableStore::new();
        for n in 0..3 {
            let log = log.clone();
            store.add(to_disposable(move || log.borrow_mut().push(n)));
        }
        assert_eq!(store.len(), 3);
        store.dispose();
        store.dispose();
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert!(store.is_disposed());
        assert!(store.is_empty());
    }

    #[test]
    fn add_after_dispose_runs_immediately() {
        let hits = Rc::new(Cell::new(0));
        let store = DisposableStore::new();
        store.dispose();
        let h = hits.clone();
        store.add(to_disposable(move || h.set(h.get() + 1)));
        assert_eq!(hits.get(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn nested_store_is_released_with_parent() {
        let hits = Rc::new(Cell::new(0));
        let parent = DisposableStore::new();
        let child = DisposableStore::new();
        let h = hits.clone();
        child.add(to_disposable(move || h.set(h.get() + 1)));
        parent.add(child.clone());
        parent.dispose();
        assert!(child.is_disposed());
        assert_eq!(hits.get(), 1);
    }
}
