//! Routes raw terminal signals for one window into the layout service.

use crossterm::event::Event;

use super::{LayoutService, WindowId};
use crate::error::LayoutError;

/// What a terminal event meant for the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSignal {
    Resized,
    Focused,
    Ignored,
}

/// Binds one window to the registry so its terminal's resize and focus
/// events update the window's container.
#[derive(Debug, Clone)]
pub struct WindowSignals {
    window: WindowId,
    service: LayoutService,
}

impl WindowSignals {
    pub fn new(window: WindowId, service: LayoutService) -> Self {
        Self { window, service }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    /// Translate a terminal event. Fails only if the window has already been
    /// unregistered and the event was a resize.
    pub fn handle_event(&self, event: &Event) -> Result<LayoutSignal, LayoutError> {
        match *event {
            Event::Resize(cols, rows) => {
                self.service.report_window_layout(self.window, (cols, rows))?;
                Ok(LayoutSignal::Resized)
            }
            Event::FocusGained => {
                self.service.set_active_window(self.window);
                Ok(LayoutSignal::Focused)
            }
            _ => Ok(LayoutSignal::Ignored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Dimension;
    use crate::window::Container;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn resize_and_focus_are_forwarded() {
        let main = Container::new(WindowId::next(), Dimension::new(80, 24));
        let svc = LayoutService::without_focus(main.clone());
        let other = Container::unmeasured(WindowId::next());
        let _scope = svc.add_container(other.clone()).unwrap();

        let signals = WindowSignals::new(other.window(), svc.clone());
        assert_eq!(
            signals.handle_event(&Event::Resize(120, 40)),
            Ok(LayoutSignal::Resized)
        );
        assert_eq!(other.dimension(), Dimension::new(120, 40));

        assert_eq!(
            signals.handle_event(&Event::FocusGained),
            Ok(LayoutSignal::Focused)
        );
        assert_eq!(svc.active_container(), other);

        let key = Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(signals.handle_event(&key), Ok(LayoutSignal::Ignored));
    }

    #[test]
    fn resize_after_close_reports_not_found() {
        let main = Container::unmeasured(WindowId::next());
        let svc = LayoutService::without_focus(main);
        let other = Container::unmeasured(WindowId::next());
        let scope = svc.add_container(other.clone()).unwrap();
        let signals = WindowSignals::new(other.window(), svc.clone());
        drop(scope);

        assert_eq!(
            signals.handle_event(&Event::Resize(1, 1)),
            Err(LayoutError::NotFound {
                window: other.window()
            })
        );
        assert_eq!(
            signals.handle_event(&Event::FocusGained),
            Ok(LayoutSignal::Focused)
        );
        assert_eq!(svc.container_count(), 1);
    }
}
