#![cfg(target_arch = "wasm32")]
use grid_core::{Camera, Clock, GridConfig, LensDistortion, SpatialCardGrid, SystemClock};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod instances;
mod render;

use constants::{CANVAS_ID, INITIAL_REVEAL_DELAY_MS};

/// Everything that must be torn down when the page goes away.
struct Mount {
    grid: Rc<RefCell<SpatialCardGrid>>,
    running: Rc<Cell<bool>>,
    _listeners: Vec<dom::Listener>,
}

impl Mount {
    fn unmount(self) {
        self.running.set(false);
        self.grid.borrow_mut().cancel_animations();
        log::info!(
            "[grid] unmounted with {} cards",
            self.grid.borrow().card_count()
        );
        // listeners detach on drop
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("works-grid starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, CANVAS_ID)?;

    let mut listeners = Vec::new();
    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    listeners.extend(dom::wire_canvas_resize(&canvas));

    let clock = SystemClock::new();
    let camera = Camera::default().shared();
    camera
        .borrow_mut()
        .set_viewport(canvas.width(), canvas.height());
    let lens = Rc::new(RefCell::new(LensDistortion::new()));

    let lens_sink = lens.clone();
    let sink_clock = clock.clone();
    let grid = SpatialCardGrid::with_config(
        GridConfig::default(),
        camera.clone(),
        move |v| lens_sink.borrow_mut().set_target(v, sink_clock.now_ms()),
        clock.clone(),
    )?;
    let grid = Rc::new(RefCell::new(grid));
    grid.borrow_mut().show_initial_cards(INITIAL_REVEAL_DELAY_MS);

    listeners.extend(events::wire_pointer_handlers(&events::PointerWiring {
        canvas: canvas.clone(),
        grid: grid.clone(),
    }));

    // The loop runs before the GPU is ready so reveal timers keep their stagger
    let running = Rc::new(Cell::new(true));
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        grid: grid.clone(),
        camera,
        lens,
        clock,
        canvas: canvas.clone(),
        gpu: None,
        instances: Vec::new(),
    }));
    frame::start_loop(frame_ctx.clone(), running.clone());

    let mount = Rc::new(RefCell::new(Some(Mount {
        grid,
        running,
        _listeners: listeners,
    })));
    let pagehide = dom::listen(&window, "pagehide", move |_| {
        if let Some(m) = mount.borrow_mut().take() {
            m.unmount();
        }
    });
    // lives for the rest of the page
    std::mem::forget(pagehide);

    let gpu = frame::init_gpu(&canvas).await;
    if gpu.is_none() {
        log::warn!("[gpu] renderer unavailable; grid runs without drawing");
    }
    frame_ctx.borrow_mut().gpu = gpu;
    Ok(())
}
