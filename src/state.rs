use crate::constants::{DEFAULT_BANNER_HEIGHT, DEFAULT_TITLE_BAR_HEIGHT};
use crate::layout::OffsetInfo;

/// Chrome shown above a window's content, and the offsets it implies.
#[derive(Debug, Clone, Copy)]
pub struct ChromeState {
    title_bar_visible: bool,
    title_bar_height: u16,
    banner_visible: bool,
    banner_height: u16,
    offset_dirty: bool,
}

impl Default for ChromeState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChromeState {
    pub fn new() -> Self {
        Self {
            title_bar_visible: true,
            title_bar_height: DEFAULT_TITLE_BAR_HEIGHT,
            banner_visible: false,
            banner_height: DEFAULT_BANNER_HEIGHT,
            // report the initial offsets on the first take
            offset_dirty: true,
        }
    }

    pub fn with_heights(title_bar_height: u16, banner_height: u16) -> Self {
        Self {
            title_bar_height,
            banner_height,
            ..Self::new()
        }
    }

    pub fn title_bar_visible(&self) -> bool {
        self.title_bar_visible
    }

    pub fn set_title_bar_visible(&mut self, visible: bool) {
        if self.title_bar_visible == visible {
            return;
        }
        self.title_bar_visible = visible;
        self.offset_dirty = true;
    }

    pub fn toggle_title_bar(&mut self) {
        let visible = !self.title_bar_visible;
        self.set_title_bar_visible(visible);
    }

    pub fn title_bar_height(&self) -> u16 {
        self.title_bar_height
    }

    pub fn set_title_bar_height(&mut self, height: u16) {
        if self.title_bar_height == height {
            return;
        }
        self.title_bar_height = height;
        self.offset_dirty |= self.title_bar_visible;
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_visible
    }

    pub fn set_banner_visible(&mut self, visible: bool) {
        if self.banner_visible == visible {
            return;
        }
        self.banner_visible = visible;
        self.offset_dirty = true;
    }

    pub fn toggle_banner(&mut self) {
        let visible = !self.banner_visible;
        self.set_banner_visible(visible);
    }

    pub fn banner_height(&self) -> u16 {
        self.banner_height
    }

    /// Quick picks sit directly under the title bar and may cover the banner.
    pub fn offset_info(&self) -> OffsetInfo {
        let title = if self.title_bar_visible {
            self.title_bar_height
        } else {
            0
        };
        let banner = if self.banner_visible {
            self.banner_height
        } else {
            0
        };
        OffsetInfo::new(title.saturating_add(banner), title)
    }

    /// Offsets for a window that carries the title bar but never the banner.
    pub fn window_offset_info(&self) -> OffsetInfo {
        let title = if self.title_bar_visible {
            self.title_bar_height
        } else {
            0
        };
        OffsetInfo::new(title, title)
    }

    pub fn take_offset_change(&mut self) -> Option<OffsetInfo> {
        if self.offset_dirty {
            self.offset_dirty = false;
            Some(self.offset_info())
        } else {
            None
        }
    }
}
