use std::cell::RefCell;
use std::rc::Rc;

use layout_registry::window::ContainerLayout;
use layout_registry::{Container, Dimension, LayoutError, LayoutService, WindowId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Seen {
    Generic(WindowId, Dimension),
    Main(Dimension),
    Active(Dimension),
    ActiveChanged(WindowId),
}

/// Records every notification the service emits, in delivery order.
fn record(svc: &LayoutService) -> (Rc<RefCell<Vec<Seen>>>, Vec<layout_registry::event::Subscription>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut subs = Vec::new();
    let l = log.clone();
    subs.push(svc.on_did_layout_container(move |e: &ContainerLayout| {
        l.borrow_mut()
            .push(Seen::Generic(e.container.window(), e.dimension));
    }));
    let l = log.clone();
    subs.push(svc.on_did_layout_main_container(move |d| {
        l.borrow_mut().push(Seen::Main(*d));
    }));
    let l = log.clone();
    subs.push(svc.on_did_layout_active_container(move |d| {
        l.borrow_mut().push(Seen::Active(*d));
    }));
    let l = log.clone();
    let reader = svc.clone();
    subs.push(svc.on_did_change_active_container(move || {
        l.borrow_mut()
            .push(Seen::ActiveChanged(reader.active_container().window()));
    }));
    (log, subs)
}

#[test]
fn secondary_and_main_layout_scenario() {
    // Main container M at 100x50, secondary S added for window W2.
    let m = Container::new(WindowId::next(), Dimension::new(100, 50));
    let svc = LayoutService::without_focus(m.clone());
    let w2 = WindowId::next();
    let s = Container::unmeasured(w2);
    let _scope = svc.add_container(s.clone()).unwrap();
    let (log, _subs) = record(&svc);

    svc.report_layout(&s, Dimension::new(300, 200));
    assert_eq!(
        *log.borrow(),
        vec![Seen::Generic(w2, Dimension::new(300, 200))]
    );

    log.borrow_mut().clear();
    svc.report_layout(&m, Dimension::new(120, 60));
    // generic first, then main, then active (M is still active)
    assert_eq!(
        *log.borrow(),
        vec![
            Seen::Generic(m.window(), Dimension::new(120, 60)),
            Seen::Main(Dimension::new(120, 60)),
            Seen::Active(Dimension::new(120, 60)),
        ]
    );
    assert_eq!(svc.main_container_dimension(), Dimension::new(120, 60));
}

#[test]
fn focus_move_scenario() {
    let m = Container::new(WindowId::next(), Dimension::new(100, 50));
    let svc = LayoutService::without_focus(m.clone());
    let w2 = WindowId::next();
    let s = Container::unmeasured(w2);
    let _scope = svc.add_container(s.clone()).unwrap();
    svc.report_layout(&s, Dimension::new(300, 200));
    let (log, _subs) = record(&svc);

    assert!(svc.set_active_window(w2));
    assert_eq!(*log.borrow(), vec![Seen::ActiveChanged(w2)]);
    assert_eq!(svc.active_container(), s);
    assert_eq!(svc.active_container_dimension(), Dimension::new(300, 200));

    // Refocusing the same window is not a change.
    assert!(!svc.set_active_window(w2));
    assert_eq!(log.borrow().len(), 1);

    // Moving back to main fires again even though main == active now.
    assert!(svc.set_active_window(m.window()));
    assert_eq!(
        *log.borrow(),
        vec![Seen::ActiveChanged(w2), Seen::ActiveChanged(m.window())]
    );
}

#[test]
fn active_only_stream_follows_focus() {
    let m = Container::new(WindowId::next(), Dimension::new(10, 10));
    let svc = LayoutService::without_focus(m.clone());
    let s = Container::unmeasured(WindowId::next());
    let _scope = svc.add_container(s.clone()).unwrap();
    svc.set_active_window(s.window());
    let (log, _subs) = record(&svc);

    svc.report_layout(&s, Dimension::new(40, 20));
    svc.report_layout(&m, Dimension::new(11, 11));
    assert_eq!(
        *log.borrow(),
        vec![
            Seen::Generic(s.window(), Dimension::new(40, 20)),
            Seen::Active(Dimension::new(40, 20)),
            Seen::Generic(m.window(), Dimension::new(11, 11)),
            Seen::Main(Dimension::new(11, 11)),
        ]
    );
}

#[test]
fn main_dimension_survives_unrelated_reports() {
    let m = Container::new(WindowId::next(), Dimension::new(1, 1));
    let svc = LayoutService::without_focus(m.clone());
    let others: Vec<_> = (0..3)
        .map(|_| {
            let c = Container::unmeasured(WindowId::next());
            (c.clone(), svc.add_container(c).unwrap())
        })
        .collect();

    svc.report_layout(&m, Dimension::new(64, 32));
    for (i, (c, _)) in others.iter().enumerate() {
        svc.report_layout(c, Dimension::new(i as u16, i as u16));
    }
    assert_eq!(svc.main_container_dimension(), Dimension::new(64, 32));
}

#[test]
fn role_is_decided_before_listeners_run() {
    let m = Container::new(WindowId::next(), Dimension::new(5, 5));
    let svc = LayoutService::without_focus(m.clone());
    let s = Container::unmeasured(WindowId::next());
    let _scope = svc.add_container(s.clone()).unwrap();

    // A generic listener moves focus away from M mid-report.
    let mover = svc.clone();
    let target = s.window();
    let _move_focus = svc.on_did_layout_container(move |_| {
        mover.set_active_window(target);
    });
    let (log, _subs) = record(&svc);

    svc.report_layout(&m, Dimension::new(6, 6));
    // the focus mover was subscribed first, so its change lands before the
    // recorder's generic entry; M was active when the report started
    assert_eq!(
        *log.borrow(),
        vec![
            Seen::ActiveChanged(s.window()),
            Seen::Generic(m.window(), Dimension::new(6, 6)),
            Seen::Main(Dimension::new(6, 6)),
            Seen::Active(Dimension::new(6, 6)),
        ]
    );
}

#[test]
fn unknown_window_is_not_found() {
    let svc = LayoutService::without_focus(Container::unmeasured(WindowId::next()));
    let stranger = WindowId::next();
    assert_eq!(
        svc.get_container(stranger),
        Err(LayoutError::NotFound { window: stranger })
    );
    assert!(!svc.set_active_window(stranger));
    assert!(svc.report_window_layout(stranger, (1, 1)).is_err());
}
