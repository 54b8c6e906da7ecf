use crate::constants::{CLEAR_COLOR, EDGE_DARKEN};
use crate::instances::CardInstance;
use glam::{Mat4, Vec3};
use web_sys as web;

mod cards;
mod helpers;
mod post;

use cards::{CardResources, CardUniforms};
use post::LensResources;

// Shaders bundled as string constants
pub static CARDS_WGSL: &str = include_str!("../shaders/cards.wgsl");
pub static LENS_WGSL: &str = include_str!("../shaders/lens.wgsl");

const SCENE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    // Cards are drawn into the offscreen scene target, then lensed to the surface
    cards: CardResources,
    instance_count: u32,
    _scene_tex: wgpu::Texture,
    scene_view: wgpu::TextureView,
    linear_sampler: wgpu::Sampler,
    lens: LensResources,
    lens_bg: wgpu::BindGroup,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    view_proj: Mat4,
    grid_offset: Vec3,
    distortion: [f32; 2],
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (scene_tex, scene_view) = helpers::create_color_texture(
            &device,
            "scene_tex",
            width,
            height,
            SCENE_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );

        let cards_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cards_shader"),
            source: wgpu::ShaderSource::Wgsl(CARDS_WGSL.into()),
        });
        let cards = cards::create_card_resources(&device, &cards_shader, SCENE_FORMAT);

        let lens_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lens_shader"),
            source: wgpu::ShaderSource::Wgsl(LENS_WGSL.into()),
        });
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let lens = post::create_lens_resources(&device, &lens_shader, format);
        let lens_bg = post::lens_bind_group(&device, &lens, &scene_view, &linear_sampler);

        log::info!("[gpu] ready {}x{} surface={:?}", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            cards,
            instance_count: 0,
            _scene_tex: scene_tex,
            scene_view,
            linear_sampler,
            lens,
            lens_bg,
            width,
            height,
            clear_color: wgpu::Color {
                r: CLEAR_COLOR[0],
                g: CLEAR_COLOR[1],
                b: CLEAR_COLOR[2],
                a: CLEAR_COLOR[3],
            },
            view_proj: Mat4::IDENTITY,
            grid_offset: Vec3::ZERO,
            distortion: [0.0, 0.0],
        })
    }

    pub fn set_scene(&mut self, view_proj: Mat4, grid_offset: Vec3) {
        self.view_proj = view_proj;
        self.grid_offset = grid_offset;
    }

    pub fn set_lens(&mut self, distortion: [f32; 2]) {
        self.distortion = distortion;
    }

    pub fn upload_cards(&mut self, instances: &[CardInstance]) {
        self.cards.ensure_capacity(&self.device, instances.len());
        if !instances.is_empty() {
            self.queue.write_buffer(
                &self.cards.instance_buffer,
                0,
                bytemuck::cast_slice(instances),
            );
        }
        self.instance_count = instances.len() as u32;
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);

            let (tex, view) = helpers::create_color_texture(
                &self.device,
                "scene_tex",
                width,
                height,
                SCENE_FORMAT,
                wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            );
            self.lens_bg =
                post::lens_bind_group(&self.device, &self.lens, &view, &self.linear_sampler);
            self._scene_tex = tex;
            self.scene_view = view;
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        let u = CardUniforms {
            view_proj: self.view_proj.to_cols_array_2d(),
            grid_offset: self.grid_offset.extend(0.0).to_array(),
        };
        self.queue
            .write_buffer(&self.cards.uniform_buffer, 0, bytemuck::bytes_of(&u));

        // Pass 1: cards -> scene target
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cards_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.scene_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if self.instance_count > 0 {
                rpass.set_pipeline(&self.cards.pipeline);
                rpass.set_bind_group(0, &self.cards.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.cards.instance_buffer.slice(..));
                rpass.draw(0..6, 0..self.instance_count);
            }
        }

        // Pass 2: lens distortion -> swapchain
        post::write_lens_uniforms(
            &self.queue,
            &self.lens.uniform_buffer,
            self.distortion,
            [self.width as f32, self.height as f32],
            EDGE_DARKEN,
        );
        post::blit(
            &mut encoder,
            "lens_pass",
            &view,
            self.clear_color,
            &self.lens.pipeline,
            &self.lens_bg,
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
