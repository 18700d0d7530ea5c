pub mod decorator;
pub mod signals;

mod layout_service;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::layout::{Dimension, OffsetInfo};

pub use layout_service::{
    ContainerAdded, ContainerLayout, ContainerScope, Containers, FocusHandler, LayoutService,
    NoopFocus,
};

static NEXT_WINDOW_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one application window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u64);

impl WindowId {
    /// Mint a process-unique id.
    pub fn next() -> Self {
        Self(NEXT_WINDOW_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct ContainerInner {
    window: WindowId,
    dimension: Cell<Dimension>,
    offset: Cell<OffsetInfo>,
}

/// Root rendering surface of one window.
///
/// A `Container` is a handle: clones point at the same surface and equality
/// is identity, so two containers built with identical values are still
/// different containers.
#[derive(Clone)]
pub struct Container {
    inner: Rc<ContainerInner>,
}

impl Container {
    pub fn new(window: WindowId, dimension: Dimension) -> Self {
        Self {
            inner: Rc::new(ContainerInner {
                window,
                dimension: Cell::new(dimension),
                offset: Cell::new(OffsetInfo::default()),
            }),
        }
    }

    /// A container whose size is not known yet; reports zero until laid out.
    pub fn unmeasured(window: WindowId) -> Self {
        Self::new(window, Dimension::ZERO)
    }

    pub fn window(&self) -> WindowId {
        self.inner.window
    }

    pub fn dimension(&self) -> Dimension {
        self.inner.dimension.get()
    }

    pub fn offset(&self) -> OffsetInfo {
        self.inner.offset.get()
    }

    pub fn same(&self, other: &Container) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // Only the registry writes these; observers read them.
    pub(crate) fn set_dimension(&self, dimension: Dimension) {
        self.inner.dimension.set(dimension);
    }

    pub(crate) fn set_offset(&self, offset: OffsetInfo) {
        self.inner.offset.set(offset);
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Container {}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("window", &self.window())
            .field("dimension", &self.dimension())
            .field("offset", &self.offset())
            .finish()
    }
}
