//! Contract violations raised by the container registry.
//!
//! Both variants indicate a caller bug elsewhere in the application (asking
//! about a window that was never registered, or registering the same window
//! twice). Resize and focus traffic never produces an error.

use thiserror::Error;

use crate::window::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("no container registered for window {window}")]
    NotFound { window: WindowId },
    #[error("window {window} already has a registered container")]
    DuplicateRegistration { window: WindowId },
}
