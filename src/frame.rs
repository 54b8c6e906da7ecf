use crate::input;
use crate::instances::{self, CardInstance};
use crate::render;
use grid_core::{CameraHandle, Clock, LensDistortion, SpatialCardGrid, SystemClock};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub grid: Rc<RefCell<SpatialCardGrid>>,
    pub camera: CameraHandle,
    pub lens: Rc<RefCell<LensDistortion>>,
    pub clock: SystemClock,

    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub instances: Vec<CardInstance>,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let width = self.canvas.width();
        let height = self.canvas.height();
        self.camera.borrow_mut().set_viewport(width, height);

        // The grid streams distortion into the lens from inside update(),
        // so no lens borrow may be alive here.
        self.grid.borrow_mut().update();

        let now = self.clock.now_ms();
        let distortion = {
            let mut lens = self.lens.borrow_mut();
            lens.advance(now);
            lens.uniform(input::aspect_ratio(width, height))
        };

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let grid_offset = {
            let grid = self.grid.borrow();
            instances::collect_instances(&*grid, &mut self.instances);
            grid.position()
        };
        gpu.resize_if_needed(width, height);
        gpu.set_scene(self.camera.borrow().view_projection(), grid_offset);
        gpu.set_lens(distortion);
        gpu.upload_cards(&self.instances);
        if let Err(e) = gpu.render() {
            match e {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    gpu.resize_if_needed(width, height);
                }
                wgpu::SurfaceError::OutOfMemory => {
                    log::error!("[gpu] out of memory; dropping renderer");
                    self.gpu = None;
                }
                other => log::warn!("[gpu] frame skipped: {:?}", other),
            }
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

type TickHandle = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(tick: &TickHandle) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Drive `frame_ctx` from requestAnimationFrame until `running` is cleared.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>, running: Rc<Cell<bool>>) {
    let tick: TickHandle = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !running.get() {
            log::info!("[frame] loop stopped");
            return;
        }
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
