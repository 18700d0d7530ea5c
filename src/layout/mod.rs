//! Geometry values shared by the registry and its observers.

use std::fmt;

use ratatui::layout::{Rect, Size};

/// Size of a container in terminal cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub width: u16,
    pub height: u16,
}

impl Dimension {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Rect anchored at the origin with this size.
    pub const fn to_rect(self) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }
}

impl From<Rect> for Dimension {
    fn from(rect: Rect) -> Self {
        Self::new(rect.width, rect.height)
    }
}

impl From<Size> for Dimension {
    fn from(size: Size) -> Self {
        Self::new(size.width, size.height)
    }
}

impl From<(u16, u16)> for Dimension {
    fn from((width, height): (u16, u16)) -> Self {
        Self::new(width, height)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rows reserved at the top of a container for chrome.
///
/// `top` is the generic offset (title bar plus any banner); `quick_pick_top`
/// is where quick-pick style overlays should start, which may differ because
/// those overlays are allowed to cover the banner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OffsetInfo {
    pub top: u16,
    pub quick_pick_top: u16,
}

impl OffsetInfo {
    pub const fn new(top: u16, quick_pick_top: u16) -> Self {
        Self {
            top,
            quick_pick_top,
        }
    }

    /// Area left for an overlay placed below the quick-pick offset.
    pub fn quick_pick_area(&self, container: Rect) -> Rect {
        let top = self.quick_pick_top.min(container.height);
        Rect {
            x: container.x,
            y: container.y.saturating_add(top),
            width: container.width,
            height: container.height - top,
        }
    }

    /// Area below all reserved chrome.
    pub fn content_area(&self, container: Rect) -> Rect {
        let top = self.top.min(container.height);
        Rect {
            x: container.x,
            y: container.y.saturating_add(top),
            width: container.width,
            height: container.height - top,
        }
    }
}
