//! Windowed gallery: winit event loop plus a wgpu texture blit.
//!
//! The gallery is rasterized on the CPU into one frame-sized canvas, uploaded
//! as a texture and drawn with a fullscreen triangle.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::audio::AudioController;
use crate::canvas::Canvas;
use crate::error::{GalleryError, Result};
use crate::gallery::Gallery;
use crate::params::RenderConfig;

/// Pixels scrolled per mouse-wheel line
const WHEEL_LINE_PX: f32 = 60.0;

fn render_error(context: &str, err: impl std::fmt::Display) -> GalleryError {
    GalleryError::Render(format!("{}: {}", context, err))
}

/// wgpu device, surface and the texture holding the composed frame
pub struct Presenter {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    frame: Option<FrameTexture>,
}

struct FrameTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

impl Presenter {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| render_error("failed to create surface", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| GalleryError::ResourceUnavailable("no suitable GPU adapter".into()))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Gallery Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| render_error("failed to request device", e))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .ok_or_else(|| GalleryError::Render("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("blit.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Frame Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            bind_group_layout,
            sampler,
            frame: None,
        })
    }

    /// Reconfigure the surface; zero sizes (minimized window) are skipped
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// (Re)allocate the frame texture when the canvas size changes
    fn ensure_frame_texture(&mut self, size: (u32, u32)) {
        if self.frame.as_ref().is_some_and(|f| f.size == size) {
            return;
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Gallery Frame"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.frame = Some(FrameTexture {
            texture,
            bind_group,
            size,
        });
    }

    /// Upload `canvas` and draw it over the whole surface
    pub fn present(&mut self, canvas: &Canvas) -> Result<()> {
        let size = (canvas.width(), canvas.height());
        let pixels = canvas.to_rgba_bytes();
        self.ensure_frame_texture(size);
        let Some(frame) = &self.frame else {
            return Ok(());
        };
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &frame.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.0),
                rows_per_image: Some(size.1),
            },
            wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
        );

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(render_error("failed to acquire frame", e)),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Blit Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blit Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &frame.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Window application state
struct Viewer {
    gallery: Gallery,
    audio: Option<Rc<AudioController>>,
    config: RenderConfig,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    frame: Option<Canvas>,
    cursor: (f32, f32),
    start: Instant,
    failure: Option<GalleryError>,
}

impl Viewer {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: GalleryError) {
        error!(error = %err, "viewer stopped");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(presenter) = &mut self.presenter {
            presenter.resize(width, height);
        }
        self.gallery.resize(width, height);
        match Canvas::with_dimensions(width, height) {
            Ok(canvas) => self.frame = Some(canvas),
            Err(err) => warn!(error = %err, "could not resize frame"),
        }
    }

    fn toggle_music(&self) {
        let Some(audio) = &self.audio else {
            warn!("no audio track loaded");
            return;
        };
        match audio.toggle() {
            Ok(playing) => info!(playing, "music toggled"),
            Err(err) => warn!(error = %err, "could not toggle music"),
        }
    }

    fn randomize_hovered(&self) {
        let Some(id) = self.gallery.card_at(self.cursor.0, self.cursor.1) else {
            return;
        };
        if let Err(err) = self.gallery.randomize(id) {
            warn!(artwork = id, error = %err, "randomize ignored");
        }
    }

    fn show_hovered_details(&self) {
        let Some(id) = self.gallery.card_at(self.cursor.0, self.cursor.1) else {
            return;
        };
        match self.gallery.show_details(id) {
            Ok(details) => {
                println!(
                    "\n{}\n\n{}\n\n{}\n",
                    details.title, details.description, details.source_text
                );
            }
            Err(err) => warn!(artwork = id, error = %err, "details unavailable"),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyC => {
                self.gallery.toggle_color_mode();
            }
            KeyCode::KeyM | KeyCode::Space => self.toggle_music(),
            KeyCode::KeyR => self.randomize_hovered(),
            KeyCode::KeyI => self.show_hovered_details(),
            _ => {}
        }
    }

    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        self.gallery.scheduler().tick(self.start.elapsed());
        self.gallery.observe();

        let (Some(presenter), Some(frame)) = (&mut self.presenter, &mut self.frame) else {
            return;
        };
        self.gallery.compose(frame);
        if let Err(err) = presenter.present(frame) {
            self.fail(event_loop, err);
        }
    }
}

impl ApplicationHandler for Viewer {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Fractal Garden")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, render_error("failed to create window", e)),
        };

        let presenter = match pollster::block_on(Presenter::new(Arc::clone(&window))) {
            Ok(presenter) => presenter,
            Err(err) => return self.fail(event_loop, err),
        };
        let size = window.inner_size();
        self.window = Some(window);
        self.presenter = Some(presenter);
        self.resize(size.width, size.height);

        info!("gallery is running: C colorize, M music, R randomize, I info, Esc quit");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, lines) => -lines * WHEEL_LINE_PX,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                self.gallery.layout().scroll_by(dy);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

/// Open the window and run the gallery until it closes
pub fn run(
    gallery: Gallery,
    audio: Option<Rc<AudioController>>,
    config: RenderConfig,
) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|e| render_error("failed to create event loop", e))?;
    let mut viewer = Viewer {
        gallery,
        audio,
        config,
        window: None,
        presenter: None,
        frame: None,
        cursor: (0.0, 0.0),
        start: Instant::now(),
        failure: None,
    };
    event_loop
        .run_app(&mut viewer)
        .map_err(|e| render_error("event loop failed", e))?;
    viewer.gallery.destroy();

    match viewer.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
