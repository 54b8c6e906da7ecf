use crate::dom::{self, Listener};
use crate::input::PointerSample;
use grid_core::SpatialCardGrid;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct PointerWiring {
    pub canvas: web::HtmlCanvasElement,
    pub grid: Rc<RefCell<SpatialCardGrid>>,
}

/// Attach move/down/up/leave handlers to the canvas. The returned listeners
/// stay attached for as long as they are alive.
pub fn wire_pointer_handlers(w: &PointerWiring) -> Vec<Listener> {
    vec![
        wire_pointermove(w),
        wire_pointerdown(w),
        wire_pointerup(w, "pointerup"),
        // leaving the canvas ends a drag like a release does
        wire_pointerup(w, "pointerleave"),
    ]
}

#[inline]
fn pointer_sample(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> PointerSample {
    let rect = canvas.get_bounding_client_rect();
    PointerSample::from_client(
        ev.client_x() as f32,
        ev.client_y() as f32,
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

fn wire_pointermove(w: &PointerWiring) -> Listener {
    let w = w.clone();
    let target = w.canvas.clone();
    dom::listen(&target, "pointermove", move |ev: web::Event| {
        let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        let s = pointer_sample(ev, &w.canvas);
        w.grid
            .borrow_mut()
            .on_pointer_move(s.x, s.y, s.width, s.height);
    })
}

fn wire_pointerdown(w: &PointerWiring) -> Listener {
    let w = w.clone();
    let target = w.canvas.clone();
    dom::listen(&target, "pointerdown", move |ev: web::Event| {
        let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        let p = pointer_sample(ev, &w.canvas).local();
        w.grid.borrow_mut().on_pointer_down(p.x, p.y);
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        log::debug!("[input] drag start at ({:.0}, {:.0})", p.x, p.y);
        ev.prevent_default();
    })
}

fn wire_pointerup(w: &PointerWiring, kind: &'static str) -> Listener {
    let w = w.clone();
    let target = w.canvas.clone();
    dom::listen(&target, kind, move |ev: web::Event| {
        let mut grid = w.grid.borrow_mut();
        if !grid.is_dragging() {
            return;
        }
        grid.on_pointer_up();
        if let Some(ev) = ev.dyn_ref::<web::PointerEvent>() {
            _ = w.canvas.release_pointer_capture(ev.pointer_id());
        }
        log::debug!(
            "[input] drag end ({}), velocity=({:.3}, {:.3})",
            kind,
            grid.velocity().x,
            grid.velocity().y
        );
    })
}
