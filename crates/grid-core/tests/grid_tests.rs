use glam::Vec2;
use grid_core::{
    Camera, CameraHandle, CardAction, CellCoord, GridConfig, GridError, ManualClock, Orientation,
    SpatialCardGrid, Visibility,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

struct Harness {
    grid: SpatialCardGrid<ManualClock>,
    clock: ManualClock,
    seen: Rc<RefCell<Vec<f32>>>,
    camera: CameraHandle,
}

fn harness(config: GridConfig) -> Harness {
    let clock = ManualClock::new(0.0);
    let camera = Camera::default().shared();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let grid = SpatialCardGrid::with_config(
        config,
        camera.clone(),
        move |v| sink.borrow_mut().push(v),
        clock.clone(),
    )
    .expect("config is valid");
    Harness {
        grid,
        clock,
        seen,
        camera,
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

fn approx_vec(a: Vec2, b: Vec2) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y)
}

#[test]
fn initial_block_is_centered_7_by_5() {
    let h = harness(GridConfig::default());
    assert_eq!(h.grid.card_count(), 35);
    assert!(h.grid.card_at(CellCoord::new(-3, -2)).is_some());
    assert!(h.grid.card_at(CellCoord::new(3, 2)).is_some());
    assert!(h.grid.card_at(CellCoord::new(4, 0)).is_none());
    assert!(h.grid.card_at(CellCoord::new(0, 3)).is_none());

    // x-major materialization order
    let first = &h.grid.cards()[0];
    assert_eq!(first.id, 0);
    assert_eq!(first.cell, CellCoord::new(-3, -2));
    assert_eq!(h.grid.cards()[1].cell, CellCoord::new(-3, -1));

    // everything starts hidden and collapsed
    for card in h.grid.cards() {
        assert_eq!(card.visibility, Visibility::Hidden);
        assert!(!card.enabled);
        assert_eq!(card.scale_y, 0.0);
        assert_eq!(card.opacity, 0.0);
    }
}

#[test]
fn create_uses_default_layout() {
    let camera = Camera::default().shared();
    let grid = SpatialCardGrid::create(camera, |_| {});
    assert_eq!(grid.card_count(), 35);
    assert_eq!(grid.config().spacing, 8.0);
}

#[test]
fn card_positions_follow_spacing() {
    let h = harness(GridConfig::default());
    let card = h.grid.card_at(CellCoord::new(-2, 1)).unwrap();
    assert_eq!(card.position.x, -16.0);
    assert_eq!(card.position.y, 8.0);
    assert_eq!(card.position.z, 0.0);
}

#[test]
fn orientation_alternates_including_negative_cells() {
    assert_eq!(Orientation::for_cell(CellCoord::new(0, 0)), Orientation::Portrait);
    assert_eq!(Orientation::for_cell(CellCoord::new(1, 0)), Orientation::Landscape);
    assert_eq!(Orientation::for_cell(CellCoord::new(-1, 0)), Orientation::Landscape);
    assert_eq!(Orientation::for_cell(CellCoord::new(-1, -1)), Orientation::Portrait);
    assert_eq!(Orientation::for_cell(CellCoord::new(-3, 2)), Orientation::Landscape);
}

#[test]
fn layout_is_deterministic_after_exploring() {
    let mut h = harness(GridConfig::default());
    h.grid.on_pointer_down(0.0, 0.0);
    for step in 1..=40 {
        let x = step as f32 * 150.0;
        let y = step as f32 * -70.0;
        h.grid.on_pointer_move(x, y, 800.0, 600.0);
        h.clock.advance(16.0);
        h.grid.update();
    }
    h.grid.on_pointer_up();
    assert!(h.grid.card_count() > 35);

    let pool = h.grid.config().content.len();
    for card in h.grid.cards() {
        assert_eq!(card.orientation, Orientation::for_cell(card.cell));
        assert_eq!(card.content_index, card.id as usize % pool);
        assert_eq!(h.grid.content_for(card), h.grid.config().content[card.content_index]);
    }
}

#[test]
fn first_update_at_origin_creates_nothing_new() {
    let mut h = harness(GridConfig::default());
    h.grid.update();
    assert_eq!(h.grid.card_count(), 35);
    assert_eq!(h.grid.pending_timers(), 0);
}

#[test]
fn cells_are_unique_and_never_recreated() {
    let mut h = harness(GridConfig::default());
    h.grid.on_pointer_down(400.0, 300.0);
    let mut ids_by_cell = std::collections::HashMap::new();
    // sweep right, then back left past the origin
    let path: Vec<f32> = (0..30)
        .map(|i| 400.0 + i as f32 * 200.0)
        .chain((0..60).map(|i| 6200.0 - i as f32 * 200.0))
        .collect();
    for x in path {
        h.grid.on_pointer_move(x, 300.0, 800.0, 600.0);
        h.clock.advance(16.0);
        h.grid.update();
        for card in h.grid.cards() {
            let id = *ids_by_cell.entry(card.cell).or_insert(card.id);
            assert_eq!(id, card.id, "cell {:?} was recreated", card.cell);
        }
    }

    let cells: HashSet<CellCoord> = h.grid.cards().iter().map(|c| c.cell).collect();
    assert_eq!(cells.len(), h.grid.card_count());
    for (slot, card) in h.grid.cards().iter().enumerate() {
        assert_eq!(card.id as usize, slot);
    }
}

#[test]
fn drag_frame_applies_exactly_the_drag_delta() {
    let mut h = harness(GridConfig::default());
    h.grid.on_pointer_down(100.0, 100.0);
    h.grid.on_pointer_move(150.0, 80.0, 800.0, 600.0);

    let delta = h.grid.drag_delta();
    assert!(approx_vec(delta, Vec2::new(0.5, 0.2)));
    assert!(approx_vec(h.grid.velocity(), Vec2::new(0.25, 0.1)));

    let before = h.grid.position_offset();
    h.grid.update();
    assert_eq!(h.grid.position_offset() - before, delta);
    assert_eq!(h.grid.drag_delta(), Vec2::ZERO);

    // no new input: coast by the velocity only
    let before = h.grid.position_offset();
    let velocity = h.grid.velocity();
    h.clock.advance(16.0);
    h.grid.update();
    assert!(approx_vec(h.grid.position_offset() - before, velocity));
}

#[test]
fn moves_within_one_frame_accumulate() {
    let mut h = harness(GridConfig::default());
    h.grid.on_pointer_down(0.0, 0.0);
    h.grid.on_pointer_move(10.0, 0.0, 800.0, 600.0);
    h.grid.on_pointer_move(30.0, 0.0, 800.0, 600.0);
    assert!(approx_vec(h.grid.drag_delta(), Vec2::new(0.3, 0.0)));
    // velocity is seeded by the latest move only
    assert!(approx_vec(h.grid.velocity(), Vec2::new(0.1, 0.0)));
}

#[test]
fn move_without_drag_only_updates_cursor() {
    let mut h = harness(GridConfig::default());
    h.grid.on_pointer_move(800.0, 0.0, 800.0, 600.0);
    assert_eq!(h.grid.drag_delta(), Vec2::ZERO);
    assert_eq!(h.grid.cursor_uv(), Vec2::new(1.0, 1.0));
    assert!(approx_vec(h.grid.ambient_parallax(), Vec2::new(0.1, 0.1)));

    h.grid.update();
    assert_eq!(h.grid.position_offset(), Vec2::ZERO);
    assert!(approx(h.grid.position().x, 0.1));
    assert!(approx(h.grid.position().y, 0.1));
}

#[test]
fn zero_viewport_keeps_previous_cursor() {
    let mut h = harness(GridConfig::default());
    h.grid.on_pointer_move(10.0, 10.0, 0.0, 0.0);
    assert_eq!(h.grid.cursor_uv(), Vec2::splat(0.5));
    assert_eq!(h.grid.ambient_parallax(), Vec2::ZERO);
}

#[test]
fn parallax_never_changes_occupancy() {
    let mut a = harness(GridConfig::default());
    let mut b = harness(GridConfig::default());
    b.grid.on_pointer_move(0.0, 600.0, 800.0, 600.0);
    for _ in 0..5 {
        a.grid.update();
        b.grid.update();
    }
    assert_eq!(a.grid.card_count(), b.grid.card_count());
    assert_eq!(a.grid.visible_cell_bounds(), b.grid.visible_cell_bounds());
    assert_ne!(a.grid.position(), b.grid.position());
}

#[test]
fn velocity_decays_geometrically_after_release() {
    let mut h = harness(GridConfig::default());
    h.grid.on_pointer_down(100.0, 100.0);
    h.grid.on_pointer_move(150.0, 80.0, 800.0, 600.0);
    h.grid.update();
    h.grid.on_pointer_up();

    let mut prev = h.grid.velocity().length();
    assert!(prev > 0.0);
    let mut frames = 0;
    while h.grid.velocity().length() >= 1e-3 {
        h.clock.advance(16.0);
        h.grid.update();
        let now = h.grid.velocity().length();
        assert!(now < prev);
        assert!((now / prev - 0.9).abs() < 1e-3);
        prev = now;
        frames += 1;
        assert!(frames < 100, "velocity never settled");
    }
    // |v0| = 0.9 * |(0.25, 0.1)|, so about ln(1e-3 / |v0|) / ln(0.9) frames
    assert!(frames <= 54, "took {} frames", frames);
}

#[test]
fn expansion_covers_the_visible_rectangle() {
    let mut h = harness(GridConfig::default());
    h.grid.on_pointer_down(0.0, 0.0);
    h.grid.on_pointer_move(3730.0, 2190.0, 800.0, 600.0);
    h.grid.update();

    let offset = h.grid.position_offset();
    assert!(approx_vec(offset, Vec2::new(37.3, -21.9)));
    let s = 8.0_f32;
    let min_x = ((-offset.x - 20.0) / s).floor() as i32;
    let max_x = ((-offset.x + 20.0) / s).ceil() as i32;
    let min_y = ((-offset.y - 15.0) / s).floor() as i32;
    let max_y = ((-offset.y + 15.0) / s).ceil() as i32;
    for x in min_x..=max_x {
        for y in min_y..=max_y {
            assert!(
                h.grid.card_at(CellCoord::new(x, y)).is_some(),
                "missing ({}, {})",
                x,
                y
            );
        }
    }
    assert_eq!(
        h.grid.visible_cell_bounds(),
        (CellCoord::new(min_x, min_y), CellCoord::new(max_x, max_y))
    );
}

#[test]
fn lazily_created_cards_reveal_after_short_delay() {
    let mut h = harness(GridConfig::default());
    h.grid.on_pointer_down(0.0, 0.0);
    h.grid.on_pointer_move(-2000.0, 0.0, 800.0, 600.0);
    h.grid.update();
    h.grid.on_pointer_up();

    // offset.x = -20 -> the column at x = 5 is new
    let cell = CellCoord::new(5, 0);
    assert!(h.grid.card_at(cell).is_some());
    assert!(h
        .grid
        .scheduled()
        .any(|s| s.cell == cell && s.action == CardAction::Show && s.due_ms == 50.0));

    h.clock.set(49.0);
    h.grid.update();
    assert_eq!(h.grid.card_at(cell).unwrap().visibility, Visibility::Hidden);

    h.clock.set(50.0);
    h.grid.update();
    let card = h.grid.card_at(cell).unwrap();
    assert_eq!(card.visibility, Visibility::Appearing);
    assert!(card.enabled);

    h.clock.set(850.0);
    h.grid.update();
    let card = h.grid.card_at(cell).unwrap();
    assert_eq!(card.visibility, Visibility::Visible);
    assert_eq!(card.scale_y, 1.0);
    assert_eq!(card.opacity, 1.0);
}

#[test]
fn stagger_spreads_ten_cards_over_two_seconds() {
    // one seed card, then a drag that materializes cells x = 1..=9 on row 0
    let config = GridConfig {
        cols: 1,
        rows: 1,
        view_margin: Vec2::new(32.0, 0.0),
        expand_reveal_delay_ms: 1e6,
        ..GridConfig::default()
    };
    let mut h = harness(config);
    assert_eq!(h.grid.card_count(), 1);
    h.grid.on_pointer_down(0.0, 0.0);
    h.grid.on_pointer_move(-3600.0, 0.0, 800.0, 600.0);
    h.grid.update();
    h.grid.on_pointer_up();
    assert_eq!(h.grid.card_count(), 10);

    let already = h.grid.pending_timers();
    h.grid.show_initial_cards(0.0);
    let staggered: Vec<_> = h.grid.scheduled().skip(already).copied().collect();
    assert_eq!(staggered.len(), 10);
    for (i, s) in staggered.iter().enumerate() {
        assert_eq!(s.action, CardAction::Show);
        assert_eq!(s.cell, h.grid.cards()[i].cell);
        assert!((s.due_ms - i as f64 * 200.0).abs() < 1e-9);
    }

    h.grid.update();
    assert_eq!(
        h.grid.card_at(CellCoord::new(0, 0)).unwrap().visibility,
        Visibility::Appearing
    );
    let last = h.grid.cards()[9].cell;
    h.clock.set(1799.0);
    h.grid.update();
    assert_eq!(h.grid.card_at(last).unwrap().visibility, Visibility::Hidden);
    h.clock.set(1800.0);
    h.grid.update();
    assert_eq!(h.grid.card_at(last).unwrap().visibility, Visibility::Appearing);
}

#[test]
fn stagger_honours_the_initial_delay() {
    let mut h = harness(GridConfig::default());
    h.clock.set(1000.0);
    h.grid.show_initial_cards(300.0);
    let dues: Vec<f64> = h.grid.scheduled().map(|s| s.due_ms).collect();
    assert_eq!(dues.len(), 35);
    assert_eq!(dues[0], 1300.0);
    let step = 2000.0 / 35.0;
    assert!((dues[34] - (1300.0 + 34.0 * step)).abs() < 1e-9);
}

#[test]
fn hide_all_disables_cards_once_faded() {
    let mut h = harness(GridConfig::default());
    h.grid.show_initial_cards(0.0);
    h.clock.set(3000.0);
    h.grid.update();
    h.clock.set(4000.0);
    h.grid.update();
    assert!(h
        .grid
        .cards()
        .iter()
        .all(|c| c.visibility == Visibility::Visible));

    h.grid.hide_all_cards(0.0);
    h.grid.update();
    let first = &h.grid.cards()[0];
    assert_eq!(first.visibility, Visibility::Disappearing);
    assert!(first.enabled);

    h.clock.set(10_000.0);
    h.grid.update();
    h.clock.set(11_000.0);
    h.grid.update();
    for card in h.grid.cards() {
        assert_eq!(card.visibility, Visibility::Hidden);
        assert!(!card.enabled);
        assert_eq!(card.opacity, 0.0);
        assert_eq!(card.scale_y, 0.0);
    }
    // disabled, not destroyed
    assert_eq!(h.grid.card_count(), 35);
}

#[test]
fn visible_cards_float_hidden_cards_do_not() {
    let mut h = harness(GridConfig::default());
    let shown = CellCoord::new(-3, -2); // id 0, first in the stagger
    let hidden = CellCoord::new(3, 2); // id 34, last in the stagger
    h.grid.show_initial_cards(0.0);
    h.clock.set(500.0);
    h.grid.update();

    let card = h.grid.card_at(shown).unwrap();
    let expected = card.position.y + ((0.5_f64 + card.id as f64).sin() as f32) * 0.001;
    assert!(approx(card.render_y, expected));

    let card = h.grid.card_at(hidden).unwrap();
    assert_eq!(card.visibility, Visibility::Hidden);
    assert_eq!(card.render_y, card.position.y);
}

#[test]
fn end_to_end_drag_gesture() {
    let mut h = harness(GridConfig::default());
    assert_eq!(h.grid.card_count(), 35);

    h.grid.on_pointer_down(100.0, 100.0);
    assert!(h.grid.is_dragging());
    assert_eq!(h.grid.distortion_target(), Some(0.08));

    h.grid.on_pointer_move(150.0, 80.0, 800.0, 600.0);
    assert!(approx_vec(h.grid.drag_delta(), Vec2::new(0.5, 0.2)));

    // distortion and camera ease in over the next frames
    for _ in 0..70 {
        h.clock.advance(16.0);
        h.grid.update();
    }
    {
        let seen = h.seen.borrow();
        assert!(seen.len() > 10);
        assert!(seen.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(*seen.last().unwrap(), 0.08);
    }
    assert_eq!(h.camera.borrow().eye.z, 12.5);

    h.grid.on_pointer_up();
    assert!(!h.grid.is_dragging());
    assert_eq!(h.grid.distortion_target(), Some(0.0));
    assert_eq!(h.grid.drag_delta(), Vec2::ZERO);

    h.seen.borrow_mut().clear();
    for _ in 0..80 {
        h.clock.advance(16.0);
        h.grid.update();
    }
    {
        let seen = h.seen.borrow();
        assert!(seen.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(*seen.last().unwrap(), 0.0);
    }
    assert_eq!(h.grid.distortion_intensity(), 0.0);
    assert_eq!(h.camera.borrow().eye.z, 12.0);
}

#[test]
fn release_coasts_until_velocity_is_negligible() {
    let mut h = harness(GridConfig::default());
    h.grid.on_pointer_down(100.0, 100.0);
    h.grid.on_pointer_move(150.0, 80.0, 800.0, 600.0);
    h.grid.on_pointer_up();
    // release before the frame: the drag delta is dropped, velocity remains
    assert!(h.grid.velocity().length() > 0.0);

    let start = h.grid.position_offset();
    h.grid.update();
    assert!(approx_vec(h.grid.position_offset() - start, Vec2::new(0.25, 0.1)));
    for _ in 0..200 {
        h.grid.update();
    }
    assert!(h.grid.velocity().length() < 1e-3);
    // geometric series: total travel is 10x the initial velocity
    assert!((h.grid.position_offset() - Vec2::new(2.5, 1.0)).length() < 1e-4);
}

#[test]
fn pointer_up_without_drag_is_ignored() {
    let mut h = harness(GridConfig::default());
    h.grid.on_pointer_up();
    h.clock.advance(100.0);
    h.grid.update();
    assert!(h.seen.borrow().is_empty());
    assert_eq!(h.grid.distortion_target(), None);
}

#[test]
fn new_press_supersedes_release_animation() {
    let mut h = harness(GridConfig::default());
    h.grid.on_pointer_down(0.0, 0.0);
    h.clock.set(400.0);
    h.grid.update();
    h.grid.on_pointer_up();
    h.clock.set(500.0);
    h.grid.update();
    let mid = h.grid.distortion_intensity();
    assert!(mid > 0.0 && mid < 0.08);

    h.grid.on_pointer_down(0.0, 0.0);
    assert_eq!(h.grid.distortion_target(), Some(0.08));
    h.clock.set(600.0);
    h.grid.update();
    assert!(h.grid.distortion_intensity() > mid);
}

#[test]
fn content_aspect_resizes_cards() {
    let mut h = harness(GridConfig::default());
    let portrait = h.grid.card_at(CellCoord::new(0, 0)).unwrap().size;
    assert_eq!(portrait, Vec2::new(3.5, 4.5));
    let landscape = h.grid.card_at(CellCoord::new(1, 0)).unwrap().size;
    assert_eq!(landscape, Vec2::new(4.5, 3.5));

    h.grid.set_content_aspect(2, 1.5);
    for card in h.grid.cards() {
        if card.content_index == 2 {
            assert_eq!(card.size, Vec2::new(6.0, 4.0));
        } else {
            assert_eq!(card.size, card.orientation.default_size());
        }
    }

    h.grid.set_content_aspect(3, f32::NAN);
    h.grid.set_content_aspect(3, 0.0);
    assert!(h
        .grid
        .cards()
        .iter()
        .filter(|c| c.content_index == 3)
        .all(|c| c.size == c.orientation.default_size()));

    // cards created later pick the recorded aspect up as well
    h.grid.on_pointer_down(0.0, 0.0);
    h.grid.on_pointer_move(-4000.0, 0.0, 800.0, 600.0);
    h.grid.update();
    assert!(h
        .grid
        .cards()
        .iter()
        .filter(|c| c.content_index == 2)
        .all(|c| c.size == Vec2::new(6.0, 4.0)));
}

#[test]
fn cancel_animations_releases_everything() {
    let mut h = harness(GridConfig::default());
    h.grid.show_initial_cards(0.0);
    h.grid.on_pointer_down(0.0, 0.0);
    h.clock.set(100.0);
    h.grid.update();
    assert!(h.grid.is_animating());

    h.grid.cancel_animations();
    assert_eq!(h.grid.pending_timers(), 0);
    assert!(!h.grid.is_animating());

    let values = h.seen.borrow().len();
    h.clock.set(5000.0);
    h.grid.update();
    assert_eq!(h.seen.borrow().len(), values);
}

#[test]
fn invalid_configs_are_rejected() {
    let camera = Camera::default().shared();
    let clock = ManualClock::new(0.0);
    let build = |config: GridConfig| {
        SpatialCardGrid::with_config(config, camera.clone(), |_| {}, clock.clone()).err()
    };

    assert_eq!(
        build(GridConfig {
            spacing: 0.0,
            ..GridConfig::default()
        }),
        Some(GridError::InvalidSpacing(0.0))
    );
    assert_eq!(
        build(GridConfig {
            cols: 0,
            ..GridConfig::default()
        }),
        Some(GridError::EmptyInitialBlock { cols: 0, rows: 5 })
    );
    assert_eq!(
        build(GridConfig {
            view_margin: Vec2::new(-1.0, 2.0),
            ..GridConfig::default()
        }),
        Some(GridError::InvalidMargin { x: -1.0, y: 2.0 })
    );
    assert_eq!(
        build(GridConfig {
            content: Vec::new(),
            ..GridConfig::default()
        }),
        Some(GridError::EmptyContentPool)
    );
    assert!(GridConfig::default().validate().is_ok());
}
