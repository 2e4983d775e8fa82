use super::*;
use glam::Vec2;
use winit::event::MouseButton;

fn press() -> PointerEvent {
    PointerEvent::Pressed { position: Vec2::ZERO, button: MouseButton::Left }
}

fn release() -> PointerEvent {
    PointerEvent::Released { position: Vec2::ZERO, button: MouseButton::Left }
}

#[test]
fn test_pointer_held_is_interacting() {
    let start = Instant::now();
    let mut tracker = InteractionTracker::new(Duration::from_millis(180));
    assert!(!tracker.is_interacting(start));

    tracker.observe(&press(), start);
    assert_eq!(tracker.update(start), InteractionEdge::Started);
    assert_eq!(tracker.update(start + Duration::from_secs(5)), InteractionEdge::Unchanged);

    tracker.observe(&release(), start);
    assert_eq!(tracker.update(start), InteractionEdge::Ended);
}

#[test]
fn test_wheel_idle_window() {
    let start = Instant::now();
    let mut tracker = InteractionTracker::new(Duration::from_millis(180));
    tracker.observe(&PointerEvent::Wheel { delta: 1.0 }, start);

    assert!(tracker.is_interacting(start + Duration::from_millis(179)));
    assert!(!tracker.is_interacting(start + Duration::from_millis(180)));

    assert_eq!(tracker.update(start + Duration::from_millis(100)), InteractionEdge::Started);
    assert_eq!(tracker.update(start + Duration::from_millis(200)), InteractionEdge::Ended);
}

#[test]
fn test_new_wheel_extends_window() {
    let start = Instant::now();
    let mut tracker = InteractionTracker::new(Duration::from_millis(180));
    tracker.observe(&PointerEvent::Wheel { delta: 1.0 }, start);
    tracker.observe(&PointerEvent::Wheel { delta: 1.0 }, start + Duration::from_millis(150));
    assert!(tracker.is_interacting(start + Duration::from_millis(300)));
}

#[test]
fn test_leaving_viewport_releases_buttons() {
    let now = Instant::now();
    let mut tracker = InteractionTracker::new(Duration::from_millis(180));
    tracker.observe(&press(), now);
    tracker.observe(&press(), now);
    tracker.observe(&release(), now);
    assert!(tracker.is_pointer_down());
    tracker.observe(&PointerEvent::Left, now);
    assert!(!tracker.is_pointer_down());
    tracker.observe(&release(), now);
    assert!(!tracker.is_pointer_down());
}
