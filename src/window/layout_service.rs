use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::{Container, WindowId};
use crate::error::LayoutError;
use crate::event::{Emitter, Subscription};
use crate::layout::{Dimension, OffsetInfo};
use crate::lifecycle::{Disposable, DisposableStore};

/// Collaborator that moves keyboard focus to the primary component of a
/// container.
pub trait FocusHandler {
    fn focus(&self, container: &Container);
}

impl<F: Fn(&Container)> FocusHandler for F {
    fn focus(&self, container: &Container) {
        self(container)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFocus;

impl FocusHandler for NoopFocus {
    fn focus(&self, _container: &Container) {}
}

/// Payload of the generic "container laid out" stream.
#[derive(Debug, Clone)]
pub struct ContainerLayout {
    pub container: Container,
    pub dimension: Dimension,
}

/// Payload of the "container added" stream. Anything put in `disposables` is
/// released when the container is unregistered.
#[derive(Debug, Clone)]
pub struct ContainerAdded {
    pub container: Container,
    pub disposables: DisposableStore,
}

struct Registry {
    // registration order; main is always first
    containers: Vec<Container>,
    main: Container,
    active: Container,
}

impl Registry {
    fn find(&self, window: WindowId) -> Option<&Container> {
        self.containers.iter().find(|c| c.window() == window)
    }

    fn contains(&self, container: &Container) -> bool {
        self.containers.iter().any(|c| c.same(container))
    }
}

#[derive(Default)]
struct LayoutEvents {
    did_layout_container: Emitter<ContainerLayout>,
    did_layout_main_container: Emitter<Dimension>,
    did_layout_active_container: Emitter<Dimension>,
    did_add_container: Emitter<ContainerAdded>,
    did_change_active_container: Emitter<()>,
}

struct Shared {
    registry: RefCell<Registry>,
    events: LayoutEvents,
    focus: Box<dyn FocusHandler>,
}

/// Registry of every window's root container plus the layout notifications
/// derived from them.
///
/// The service is a cheap handle: clones share the same registry. It is
/// single-threaded; every mutation and every notification runs synchronously
/// on the caller's thread, and no internal borrow is held while listeners run,
/// so listeners may read the service (or even mutate it) freely.
#[derive(Clone)]
pub struct LayoutService {
    shared: Rc<Shared>,
}

impl LayoutService {
    /// Create the registry around the startup window's container. It starts
    /// out as both main and active.
    pub fn new<F: FocusHandler + 'static>(main: Container, focus: F) -> Self {
        tracing::debug!(window = %main.window(), dimension = %main.dimension(), "main container registered");
        let registry = Registry {
            containers: vec![main.clone()],
            main: main.clone(),
            active: main,
        };
        Self {
            shared: Rc::new(Shared {
                registry: RefCell::new(registry),
                events: LayoutEvents::default(),
                focus: Box::new(focus),
            }),
        }
    }

    pub fn without_focus(main: Container) -> Self {
        Self::new(main, NoopFocus)
    }

    // --- notification streams ---

    /// Any container was laid out.
    pub fn on_did_layout_container<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ContainerLayout) + 'static,
    {
        self.shared.events.did_layout_container.subscribe(listener)
    }

    /// The main container was laid out.
    pub fn on_did_layout_main_container<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Dimension) + 'static,
    {
        self.shared
            .events
            .did_layout_main_container
            .subscribe(listener)
    }

    /// The active container was laid out.
    pub fn on_did_layout_active_container<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Dimension) + 'static,
    {
        self.shared
            .events
            .did_layout_active_container
            .subscribe(listener)
    }

    /// A secondary container was registered.
    pub fn on_did_add_container<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ContainerAdded) + 'static,
    {
        self.shared.events.did_add_container.subscribe(listener)
    }

    /// The active container changed. Listeners re-read
    /// [`LayoutService::active_container`] for the new value.
    pub fn on_did_change_active_container<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.shared
            .events
            .did_change_active_container
            .subscribe(move |_: &()| listener())
    }

    // --- queries ---

    pub fn get_container(&self, window: WindowId) -> Result<Container, LayoutError> {
        self.shared
            .registry
            .borrow()
            .find(window)
            .cloned()
            .ok_or(LayoutError::NotFound { window })
    }

    /// Snapshot of the registered containers in registration order. Call again
    /// to observe later additions or removals.
    pub fn containers(&self) -> Containers {
        Containers {
            inner: self.shared.registry.borrow().containers.clone().into_iter(),
        }
    }

    pub fn container_count(&self) -> usize {
        self.shared.registry.borrow().containers.len()
    }

    pub fn main_container(&self) -> Container {
        self.shared.registry.borrow().main.clone()
    }

    pub fn active_container(&self) -> Container {
        self.shared.registry.borrow().active.clone()
    }

    pub fn main_container_dimension(&self) -> Dimension {
        self.shared.registry.borrow().main.dimension()
    }

    pub fn active_container_dimension(&self) -> Dimension {
        self.shared.registry.borrow().active.dimension()
    }

    pub fn main_container_offset(&self) -> OffsetInfo {
        self.shared.registry.borrow().main.offset()
    }

    pub fn active_container_offset(&self) -> OffsetInfo {
        self.shared.registry.borrow().active.offset()
    }

    // --- mutation ---

    /// Register the container of a newly opened window.
    ///
    /// The returned scope owns the registration: releasing it removes the
    /// container and disposes every listener bound to it.
    pub fn add_container(&self, container: Container) -> Result<ContainerScope, LayoutError> {
        let window = container.window();
        {
            let mut registry = self.shared.registry.borrow_mut();
            if registry.find(window).is_some() {
                return Err(LayoutError::DuplicateRegistration { window });
            }
            registry.containers.push(container.clone());
        }
        tracing::debug!(window = %window, dimension = %container.dimension(), "container added");

        let disposables = DisposableStore::new();
        self.shared.events.did_add_container.fire(&ContainerAdded {
            container: container.clone(),
            disposables: disposables.clone(),
        });

        Ok(ContainerScope {
            shared: Rc::downgrade(&self.shared),
            container,
            disposables,
            released: false,
        })
    }

    /// Record a new size for `container` and notify observers.
    ///
    /// The generic stream always fires first, then the main stream and the
    /// active stream when the container held that role at the time of the
    /// call and is still registered. Reports for containers that are not
    /// registered are dropped.
    pub fn report_layout(&self, container: &Container, dimension: impl Into<Dimension>) {
        let dimension = dimension.into();
        let (is_main, is_active) = {
            let registry = self.shared.registry.borrow();
            if !registry.contains(container) {
                tracing::trace!(window = %container.window(), "layout for unregistered container dropped");
                return;
            }
            (
                registry.main.same(container),
                registry.active.same(container),
            )
        };
        container.set_dimension(dimension);
        tracing::trace!(window = %container.window(), %dimension, is_main, is_active, "container laid out");

        let events = &self.shared.events;
        events.did_layout_container.fire(&ContainerLayout {
            container: container.clone(),
            dimension,
        });
        // A generic listener may have released the container; a removed
        // container gets no further notifications.
        if is_main && self.contains(container) {
            events.did_layout_main_container.fire(&dimension);
        }
        if is_active && self.contains(container) {
            events.did_layout_active_container.fire(&dimension);
        }
    }

    fn contains(&self, container: &Container) -> bool {
        self.shared.registry.borrow().contains(container)
    }

    /// Same as [`LayoutService::report_layout`], addressed by window.
    pub fn report_window_layout(
        &self,
        window: WindowId,
        dimension: impl Into<Dimension>,
    ) -> Result<(), LayoutError> {
        let container = self.get_container(window)?;
        self.report_layout(&container, dimension);
        Ok(())
    }

    /// Focus moved to `window`. Returns `true` when the active container
    /// actually changed; unknown windows are ignored.
    pub fn set_active_window(&self, window: WindowId) -> bool {
        {
            let mut registry = self.shared.registry.borrow_mut();
            let Some(next) = registry.find(window).cloned() else {
                tracing::trace!(window = %window, "focus change for unknown window ignored");
                return false;
            };
            if registry.active.same(&next) {
                return false;
            }
            tracing::debug!(from = %registry.active.window(), to = %window, "active container changed");
            registry.active = next;
        }
        self.shared.events.did_change_active_container.fire(&());
        true
    }

    /// Store the chrome offsets for a window's container. Returns `false` if
    /// the window is not registered.
    pub fn set_container_offset(&self, window: WindowId, offset: OffsetInfo) -> bool {
        match self.shared.registry.borrow().find(window) {
            Some(container) => {
                container.set_offset(offset);
                true
            }
            None => false,
        }
    }

    /// Focus the primary component of the active container.
    pub fn focus(&self) {
        let active = self.active_container();
        self.shared.focus.focus(&active);
    }
}

impl fmt::Debug for LayoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.shared.registry.borrow();
        f.debug_struct("LayoutService")
            .field("containers", &registry.containers.len())
            .field("main", &registry.main.window())
            .field("active", &registry.active.window())
            .finish()
    }
}

/// Snapshot iterator returned by [`LayoutService::containers`].
#[derive(Debug, Clone)]
pub struct Containers {
    inner: std::vec::IntoIter<Container>,
}

impl Iterator for Containers {
    type Item = Container;

    fn next(&mut self) -> Option<Container> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Containers {}

/// Registration of a secondary container.
///
/// Releasing it (explicitly or by drop) unregisters the container and disposes
/// its listener store in one step. If the container was active, the main
/// container becomes active again and observers are told.
#[must_use = "dropping a ContainerScope immediately unregisters the container"]
pub struct ContainerScope {
    shared: Weak<Shared>,
    container: Container,
    disposables: DisposableStore,
    released: bool,
}

impl ContainerScope {
    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn window(&self) -> WindowId {
        self.container.window()
    }

    /// Store for resources that must live exactly as long as the container.
    pub fn disposables(&self) -> &DisposableStore {
        &self.disposables
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let Some(shared) = self.shared.upgrade() else {
            self.disposables.dispose();
            return;
        };
        let active_changed = {
            let mut registry = shared.registry.borrow_mut();
            registry.containers.retain(|c| !c.same(&self.container));
            if registry.active.same(&self.container) {
                registry.active = registry.main.clone();
                true
            } else {
                false
            }
        };
        tracing::debug!(window = %self.container.window(), active_changed, "container removed");

        self.disposables.dispose();
        if active_changed {
            shared.events.did_change_active_container.fire(&());
        }
    }
}

impl Disposable for ContainerScope {
    fn dispose(&mut self) {
        self.release();
    }
}

impl Drop for ContainerScope {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ContainerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerScope")
            .field("window", &self.container.window())
            .field("released", &self.released)
            .finish()
    }
}
