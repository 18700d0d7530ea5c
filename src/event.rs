//! Typed observer lists with synchronous, ordered delivery.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::lifecycle::Disposable;

type Listener<T> = Rc<dyn Fn(&T)>;

struct ListenerSlot<T> {
    id: u64,
    listener: Listener<T>,
}

type ListenerList<T> = RefCell<Vec<ListenerSlot<T>>>;

/// Source of one notification stream.
///
/// Listeners run in subscription order on the thread calling [`Emitter::fire`].
/// The list is copied before delivery, so a listener that subscribes or
/// unsubscribes during an emission only affects the next one.
pub struct Emitter<T> {
    listeners: Rc<ListenerList<T>>,
    next_id: Cell<u64>,
}

impl<T: 'static> Emitter<T> {
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        self.listeners.borrow_mut().push(ListenerSlot {
            id,
            listener: Rc::new(listener),
        });
        let weak: Weak<ListenerList<T>> = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(list) = weak.upgrade() {
                list.borrow_mut().retain(|slot| slot.id != id);
            }
        })
    }

    pub fn fire(&self, event: &T) {
        let snapshot: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|slot| slot.listener.clone())
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn has_listeners(&self) -> bool {
        self.listener_count() > 0
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

/// Handle to one registered listener. Dropping or disposing it detaches the
/// listener; detaching twice is harmless.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new<F: FnOnce() + 'static>(detach: F) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.detach.is_some()
    }
}

impl Disposable for Subscription {
    fn dispose(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
