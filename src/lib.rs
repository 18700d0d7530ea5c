//! Container registry and layout notifier for multi-window terminal
//! applications.
//!
//! [`LayoutService`](window::LayoutService) tracks the root container of every
//! open window, which one is the main (startup) container and which belongs to
//! the focused window, and republishes resize signals as per-container,
//! main-only and active-only notification streams.

pub mod constants;
pub mod drivers;
pub mod error;
pub mod event;
pub mod event_loop;
pub mod layout;
pub mod lifecycle;
pub mod state;
pub mod tracing_sub;
pub mod window;

pub use error::LayoutError;
pub use layout::{Dimension, OffsetInfo};
pub use window::{Container, ContainerScope, LayoutService, WindowId};
