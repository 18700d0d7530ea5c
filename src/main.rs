use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use indoc::indoc;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use tracing::Level;

use layout_registry::constants::{DEFAULT_BANNER_HEIGHT, DEFAULT_POLL_MS, DEFAULT_TITLE_BAR_HEIGHT};
use layout_registry::drivers::OutputDriver;
use layout_registry::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use layout_registry::event::Subscription;
use layout_registry::event_loop::{ControlFlow, EventLoop};
use layout_registry::state::ChromeState;
use layout_registry::tracing_sub;
use layout_registry::window::decorator::{DefaultDecorator, WindowDecorator};
use layout_registry::window::signals::WindowSignals;
use layout_registry::{Container, ContainerScope, Dimension, LayoutService, WindowId};

const ACTIVITY_LINES: usize = 8;

const KEY_HELP: &str = indoc! {"
    n  open a secondary window      x  close the newest secondary window
    f  focus the next window        t  toggle the title bar
    b  toggle the banner            Tab  focus the active window's content
    q / Ctrl-C  quit
"};

#[derive(Parser, Debug)]
#[command(
    name = "layout-registry",
    version = env!("CARGO_PKG_VERSION"),
    about = "Live view of the container registry for the current terminal"
)]
struct Cli {
    /// Rows reserved by the title bar.
    #[arg(long, value_name = "ROWS", default_value_t = DEFAULT_TITLE_BAR_HEIGHT)]
    title_bar_height: u16,

    /// Rows reserved by the banner when it is shown.
    #[arg(long, value_name = "ROWS", default_value_t = DEFAULT_BANNER_HEIGHT)]
    banner_height: u16,

    /// Start with the title bar hidden.
    #[arg(long)]
    hide_title_bar: bool,

    /// Event poll interval.
    #[arg(long, value_name = "MILLIS", default_value_t = DEFAULT_POLL_MS)]
    poll_ms: u64,

    /// Append debug logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

type Activity = Rc<RefCell<VecDeque<String>>>;

fn push_activity(activity: &Activity, line: String) {
    let mut lines = activity.borrow_mut();
    if lines.len() == ACTIVITY_LINES {
        lines.pop_front();
    }
    lines.push_back(line);
}

struct App {
    service: LayoutService,
    chrome: ChromeState,
    decorator: DefaultDecorator,
    secondary: Vec<ContainerScope>,
    activity: Activity,
    _subscriptions: Vec<Subscription>,
}

impl App {
    fn new(main: Container, chrome: ChromeState) -> Self {
        let activity: Activity = Rc::new(RefCell::new(VecDeque::new()));
        let focus_log = activity.clone();
        let service = LayoutService::new(main, move |c: &Container| {
            push_activity(&focus_log, format!("focus -> window {}", c.window()));
        });

        let mut subscriptions = Vec::new();
        let log = activity.clone();
        subscriptions.push(service.on_did_layout_container(move |e| {
            push_activity(&log, format!("layout {} {}", e.container.window(), e.dimension));
        }));
        let log = activity.clone();
        subscriptions.push(service.on_did_layout_main_container(move |d| {
            push_activity(&log, format!("main layout {d}"));
        }));
        let log = activity.clone();
        subscriptions.push(service.on_did_layout_active_container(move |d| {
            push_activity(&log, format!("active layout {d}"));
        }));
        let log = activity.clone();
        let reader = service.clone();
        subscriptions.push(service.on_did_change_active_container(move || {
            push_activity(
                &log,
                format!("active -> window {}", reader.active_container().window()),
            );
        }));
        let log = activity.clone();
        subscriptions.push(service.on_did_add_container(move |added| {
            push_activity(&log, format!("added window {}", added.container.window()));
            let log = log.clone();
            let window = added.container.window();
            added
                .disposables
                .add(layout_registry::lifecycle::to_disposable(move || {
                    push_activity(&log, format!("removed window {window}"));
                }));
        }));

        let mut app = Self {
            service,
            chrome,
            decorator: DefaultDecorator,
            secondary: Vec::new(),
            activity,
            _subscriptions: subscriptions,
        };
        app.sync_offsets();
        app
    }

    fn sync_offsets(&mut self) {
        if let Some(offset) = self.chrome.take_offset_change() {
            let main = self.service.main_container().window();
            self.service.set_container_offset(main, offset);
            let window_offset = self.chrome.window_offset_info();
            for scope in &self.secondary {
                self.service.set_container_offset(scope.window(), window_offset);
            }
        }
    }

    fn open_secondary(&mut self) {
        let main = self.service.main_container_dimension();
        let container = Container::unmeasured(WindowId::next());
        match self.service.add_container(container.clone()) {
            Ok(scope) => {
                self.service
                    .set_container_offset(container.window(), self.chrome.window_offset_info());
                self.service.report_layout(
                    &container,
                    Dimension::new(main.width / 2, main.height / 2),
                );
                self.secondary.push(scope);
            }
            Err(err) => tracing::error!(%err, "failed to register secondary window"),
        }
    }

    fn focus_next(&mut self) {
        let containers: Vec<Container> = self.service.containers().collect();
        let active = self.service.active_container();
        let idx = containers.iter().position(|c| *c == active).unwrap_or(0);
        if let Some(next) = containers.get((idx + 1) % containers.len().max(1)) {
            self.service.set_active_window(next.window());
        }
    }

    /// Secondary windows follow the main window at half its size.
    fn relayout_secondary(&self, dimension: Dimension) {
        let half = Dimension::new(dimension.width / 2, dimension.height / 2);
        for scope in &self.secondary {
            self.service.report_layout(scope.container(), half);
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> ControlFlow {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return ControlFlow::Quit;
            }
            KeyCode::Char('q') => return ControlFlow::Quit,
            KeyCode::Char('n') => self.open_secondary(),
            KeyCode::Char('x') => {
                // dropping the scope unregisters the window
                drop(self.secondary.pop());
            }
            KeyCode::Char('f') => self.focus_next(),
            KeyCode::Char('t') => self.chrome.toggle_title_bar(),
            KeyCode::Char('b') => self.chrome.toggle_banner(),
            KeyCode::Tab => self.service.focus(),
            _ => {}
        }
        self.sync_offsets();
        ControlFlow::Continue
    }

    fn render(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let offset = self.service.main_container_offset();
        if self.chrome.title_bar_visible() {
            let focused = self.service.active_container() == self.service.main_container();
            self.decorator
                .render_chrome(frame.buffer_mut(), area, "layout-registry", focused);
        }
        if self.chrome.banner_visible() {
            let banner = Rect {
                x: area.x,
                y: area.y.saturating_add(offset.quick_pick_top),
                width: area.width,
                height: self.chrome.banner_height().min(area.height),
            };
            frame.render_widget(
                Paragraph::new(" banner: quick picks may cover this row")
                    .style(Style::default().bg(Color::Yellow).fg(Color::Black)),
                banner,
            );
        }

        let mut inner = offset.content_area(area);
        if self.chrome.title_bar_visible() {
            // keep the side borders visible
            inner.x = inner.x.saturating_add(1);
            inner.width = inner.width.saturating_sub(2);
            inner.height = inner.height.saturating_sub(1);
        }

        let main = self.service.main_container();
        let active = self.service.active_container();
        let mut lines = vec![Line::from(format!(
            "main {}  active {}  offsets top={} quick_pick_top={}",
            self.service.main_container_dimension(),
            self.service.active_container_dimension(),
            offset.top,
            offset.quick_pick_top,
        ))];
        for container in self.service.containers() {
            let mut tags = Vec::new();
            if container == main {
                tags.push("main");
            }
            if container == active {
                tags.push("active");
            }
            lines.push(Line::from(format!(
                "  window {} {} [{}]",
                container.window(),
                container.dimension(),
                tags.join(", ")
            )));
        }
        lines.push(Line::from(""));
        lines.extend(self.activity.borrow().iter().map(|l| Line::from(l.clone())));
        lines.push(Line::from(""));
        lines.extend(KEY_HELP.lines().map(Line::from));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    match &cli.log_file {
        Some(path) => tracing_sub::init_with_file(path, Level::DEBUG)?,
        None => tracing_sub::init_stderr(Level::WARN),
    }

    let mut output = ConsoleOutputDriver::new()?;
    let initial = Dimension::from(output.size()?);
    let main_window = WindowId::next();
    let mut chrome = ChromeState::with_heights(cli.title_bar_height, cli.banner_height);
    chrome.set_title_bar_visible(!cli.hide_title_bar);
    let mut app = App::new(Container::new(main_window, initial), chrome);

    let reader = app.service.clone();
    let _main_resized = app.service.on_did_layout_main_container(move |d| {
        tracing::debug!(dimension = %d, containers = reader.container_count(), "main resized");
    });

    output.enter()?;
    let signals = WindowSignals::new(main_window, app.service.clone());
    let mut event_loop = EventLoop::new(
        ConsoleInputDriver::new(),
        signals,
        Duration::from_millis(cli.poll_ms),
    );

    let result = event_loop.run(|event, _signal| {
        match event {
            None => {
                output.draw(|frame| app.render(frame))?;
            }
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if let ControlFlow::Quit = app.handle_key(key.code, key.modifiers) {
                    return Ok(ControlFlow::Quit);
                }
            }
            Some(Event::Resize(cols, rows)) => {
                app.relayout_secondary(Dimension::new(*cols, *rows));
            }
            Some(_) => {}
        }
        Ok(ControlFlow::Continue)
    });

    output.exit()?;
    result
}
