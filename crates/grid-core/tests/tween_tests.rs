use grid_core::{CardAction, CellCoord, Ease, LensDistortion, Timeline, Tween, TweenSlot};

#[test]
fn eases_hit_their_endpoints() {
    for ease in [Ease::Linear, Ease::Power2In, Ease::Power2Out, Ease::Power2InOut] {
        assert_eq!(ease.apply(0.0), 0.0, "{:?}", ease);
        assert_eq!(ease.apply(1.0), 1.0, "{:?}", ease);
        // out-of-range progress is clamped
        assert_eq!(ease.apply(-1.0), 0.0, "{:?}", ease);
        assert_eq!(ease.apply(2.0), 1.0, "{:?}", ease);
    }
}

#[test]
fn eases_are_monotonic() {
    for ease in [Ease::Linear, Ease::Power2In, Ease::Power2Out, Ease::Power2InOut] {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease.apply(i as f32 / 100.0);
            assert!(v >= prev, "{:?} dipped at {}", ease, i);
            prev = v;
        }
    }
}

#[test]
fn ease_shapes() {
    // decelerating curves are ahead of linear, accelerating ones behind
    assert!(Ease::Power2Out.apply(0.5) > 0.5);
    assert!(Ease::Power2In.apply(0.5) < 0.5);
    assert!((Ease::Power2InOut.apply(0.5) - 0.5).abs() < 1e-6);
    assert!((Ease::Power2Out.apply(0.5) - 0.875).abs() < 1e-6);
}

#[test]
fn tween_samples_between_endpoints() {
    let tween = Tween {
        from: 2.0,
        to: 4.0,
        start_ms: 100.0,
        duration_ms: 200.0,
        ease: Ease::Linear,
    };
    assert_eq!(tween.sample(0.0), 2.0);
    assert_eq!(tween.sample(100.0), 2.0);
    assert_eq!(tween.sample(200.0), 3.0);
    assert_eq!(tween.sample(300.0), 4.0);
    assert_eq!(tween.sample(1000.0), 4.0);
    assert!(!tween.is_finished(299.0));
    assert!(tween.is_finished(300.0));
}

#[test]
fn zero_duration_tween_finishes_immediately() {
    let tween = Tween {
        from: 1.0,
        to: 0.0,
        start_ms: 50.0,
        duration_ms: 0.0,
        ease: Ease::Power2Out,
    };
    assert!(tween.is_finished(50.0));
    assert_eq!(tween.sample(50.0), 0.0);
}

#[test]
fn slot_yields_final_value_once() {
    let mut slot = TweenSlot::default();
    assert_eq!(slot.advance(0.0), None);

    slot.retarget(0.0, 1.0, 100.0, Ease::Linear, 0.0);
    assert!(slot.is_running());
    assert_eq!(slot.target(), Some(1.0));
    assert_eq!(slot.advance(50.0), Some(0.5));
    assert_eq!(slot.advance(150.0), Some(1.0));
    assert!(!slot.is_running());
    assert_eq!(slot.advance(200.0), None);
}

#[test]
fn retarget_replaces_in_flight_tween() {
    let mut slot = TweenSlot::default();
    slot.retarget(0.0, 1.0, 100.0, Ease::Linear, 0.0);
    let current = slot.advance(50.0).unwrap();

    slot.retarget(current, 0.0, 100.0, Ease::Linear, 50.0);
    assert_eq!(slot.target(), Some(0.0));
    // starts where the old one left off, not at the old target
    assert_eq!(slot.advance(50.0), Some(0.5));
    assert_eq!(slot.advance(100.0), Some(0.25));
    assert_eq!(slot.advance(150.0), Some(0.0));

    slot.retarget(0.0, 1.0, 100.0, Ease::Linear, 200.0);
    slot.cancel();
    assert_eq!(slot.advance(250.0), None);
}

#[test]
fn timeline_drains_in_due_then_insertion_order() {
    let mut timeline = Timeline::default();
    let a = CellCoord::new(0, 0);
    let b = CellCoord::new(1, 0);
    let c = CellCoord::new(2, 0);
    timeline.schedule(30.0, a, CardAction::Show);
    timeline.schedule(10.0, b, CardAction::Hide);
    timeline.schedule(10.0, c, CardAction::Show);
    timeline.schedule(99.0, a, CardAction::Hide);
    assert_eq!(timeline.len(), 4);
    assert_eq!(timeline.next_due(), Some(10.0));

    assert!(timeline.drain_due(5.0).is_empty());
    let due = timeline.drain_due(30.0);
    let cells: Vec<_> = due.iter().map(|s| (s.cell, s.action)).collect();
    assert_eq!(
        cells,
        vec![
            (b, CardAction::Hide),
            (c, CardAction::Show),
            (a, CardAction::Show)
        ]
    );
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline.next_due(), Some(99.0));

    timeline.clear();
    assert!(timeline.is_empty());
    assert_eq!(timeline.next_due(), None);
}

#[test]
fn lens_distortion_eases_toward_streamed_value() {
    let mut lens = LensDistortion::new();
    assert_eq!(lens.uniform(1.5), [0.0, 0.0]);

    lens.set_target(0.08, 0.0);
    assert_eq!(lens.target(), 0.08);
    let halfway = lens.advance(500.0);
    assert!(halfway > 0.0 && halfway < 0.08);
    assert_eq!(lens.advance(1000.0), 0.08);

    let [x, y] = lens.uniform(2.0);
    assert!((x - 0.16).abs() < 1e-6);
    assert_eq!(y, 0.08);

    // no running tween: the value holds
    assert_eq!(lens.advance(5000.0), 0.08);
    assert_eq!(lens.intensity(), 0.08);
}

#[test]
fn lens_distortion_retargets_from_current_value() {
    let mut lens = LensDistortion::new();
    lens.set_target(0.08, 0.0);
    let mid = lens.advance(300.0);
    lens.set_target(0.0, 300.0);
    let next = lens.advance(400.0);
    assert!(next < mid);
    assert_eq!(lens.advance(1300.0), 0.0);
}
