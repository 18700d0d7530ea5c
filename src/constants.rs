//! Shared crate-wide constants.

/// Rows taken by the default window chrome: the top border plus the header
/// line drawn by `DefaultDecorator`.
pub const DEFAULT_TITLE_BAR_HEIGHT: u16 = 2;

/// Rows taken by a notification banner shown under the title bar.
///
/// Quick-pick overlays are allowed to cover the banner, so this only affects
/// the generic `top` offset.
pub const DEFAULT_BANNER_HEIGHT: u16 = 1;

/// Poll interval of the demo event loop, in milliseconds.
pub const DEFAULT_POLL_MS: u64 = 16;
