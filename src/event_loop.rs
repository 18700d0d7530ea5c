use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;
use crate::window::signals::{LayoutSignal, WindowSignals};

pub enum ControlFlow {
    Continue,
    Quit,
}

/// Input pump for one window.
///
/// Every event read from the driver is first routed through the window's
/// [`WindowSignals`], so the registry has already seen a resize or focus change
/// by the time the handler runs. The handler is also called with `None` each
/// time the poll interval elapses without input, which is where callers redraw.
pub struct EventLoop<D> {
    driver: D,
    signals: WindowSignals,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, signals: WindowSignals, poll_interval: Duration) -> Self {
        Self {
            driver,
            signals,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn signals(&self) -> &WindowSignals {
        &self.signals
    }

    /// Read and route a single event, if one is ready.
    pub fn pump_once(&mut self) -> io::Result<Option<(Event, LayoutSignal)>> {
        if !self.driver.poll(self.poll_interval)? {
            return Ok(None);
        }
        let event = self.driver.read()?;
        let signal = self.route(&event);
        Ok(Some((event, signal)))
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(Option<&Event>, LayoutSignal) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(None, LayoutSignal::Ignored)? {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain whatever is queued so a burst of input does not fall
                // behind the redraw cadence.
                loop {
                    let event = self.driver.read()?;
                    let signal = self.route(&event);
                    if let ControlFlow::Quit = handler(Some(&event), signal)? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn route(&self, event: &Event) -> LayoutSignal {
        match self.signals.handle_event(event) {
            Ok(signal) => signal,
            Err(err) => {
                tracing::warn!(%err, "layout signal for closed window");
                LayoutSignal::Ignored
            }
        }
    }
}
