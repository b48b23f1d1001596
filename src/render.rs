use crate::loader::{MeshUpload, SpriteImage};
use glam::{Mat4, Vec3};
use scene_core::camera::Camera;
use scene_core::constants::{ambient_linear, srgb8_to_linear, BACKGROUND_SRGB};
use scene_core::scene::SceneGraph;
use web_sys as web;

mod helpers;
mod mesh;
mod sprite;

pub use mesh::MeshVertex;
use mesh::{create_mesh_resources, Globals, GpuMesh, MeshResources, ModelUniform};
use sprite::{create_sprite_resources, SpriteResources, SpriteUniforms};

/// Indicator sprite for one frame; `opacity` 0 skips the draw.
#[derive(Clone, Copy, Debug)]
pub struct SpriteParams {
    pub position: Vec3,
    pub size: f32,
    pub opacity: f32,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth: (wgpu::Texture, wgpu::TextureView),
    mesh: MeshResources,
    meshes: Vec<GpuMesh>,
    sprite: SpriteResources,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    ambient: [f32; 4],
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
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
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
        log::info!("[gpu] surface {}x{} {:?}", width, height, format);

        let depth = helpers::create_depth_texture(&device, width, height);
        let mesh = create_mesh_resources(&device, format);
        let sprite = create_sprite_resources(&device, format);

        let [r, g, b] = srgb8_to_linear(BACKGROUND_SRGB);
        let [ar, ag, ab] = ambient_linear();
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth,
            mesh,
            meshes: Vec::new(),
            sprite,
            width,
            height,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
            ambient: [ar, ag, ab, 1.0],
        })
    }

    pub fn upload_mesh(&mut self, upload: &MeshUpload) {
        let gpu_mesh = self
            .mesh
            .upload(&self.device, upload.node, &upload.vertices, &upload.indices);
        self.meshes.push(gpu_mesh);
    }

    pub fn upload_sprite(&mut self, image: &SpriteImage) {
        self.sprite
            .upload_texture(&self.device, &self.queue, image.width, image.height, &image.rgba);
        log::info!("[gpu] indicator sprite {}x{}", image.width, image.height);
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
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
            self.depth = helpers::create_depth_texture(&self.device, width, height);
        }
    }

    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(
        &mut self,
        camera: &Camera,
        scene: &SceneGraph,
        sprite: SpriteParams,
    ) -> Result<(), wgpu::SurfaceError> {
        let view_proj = camera.view_projection();
        self.write_uniforms(view_proj, camera, scene, sprite);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.1,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_pipeline(&self.mesh.pipeline);
            rpass.set_bind_group(0, &self.mesh.globals_bind_group, &[]);
            for m in &self.meshes {
                rpass.set_bind_group(1, &m.model_bind_group, &[]);
                rpass.set_vertex_buffer(0, m.vertex_buffer.slice(..));
                rpass.set_index_buffer(m.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..m.index_count, 0, 0..1);
            }

            if let Some(bg) = &self.sprite.bind_group {
                if sprite.opacity > 0.0 {
                    rpass.set_pipeline(&self.sprite.pipeline);
                    rpass.set_bind_group(0, bg, &[]);
                    rpass.draw(0..6, 0..1);
                }
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn write_uniforms(
        &self,
        view_proj: Mat4,
        camera: &Camera,
        scene: &SceneGraph,
        sprite: SpriteParams,
    ) {
        let globals = Globals {
            view_proj: view_proj.to_cols_array_2d(),
            ambient: self.ambient,
        };
        self.queue
            .write_buffer(&self.mesh.globals_buffer, 0, bytemuck::bytes_of(&globals));

        // idle spin moves nodes every frame
        for m in &self.meshes {
            let model = ModelUniform {
                world: scene.world_matrix(m.node).to_cols_array_2d(),
            };
            self.queue
                .write_buffer(&m.model_buffer, 0, bytemuck::bytes_of(&model));
        }

        let view_inv = camera.view_matrix().inverse();
        let right = view_inv.x_axis.truncate();
        let up = view_inv.y_axis.truncate();
        let s = SpriteUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            cam_right: right.extend(0.0).to_array(),
            cam_up: up.extend(0.0).to_array(),
            center_size: sprite.position.extend(sprite.size).to_array(),
            tint: [1.0, 1.0, 1.0, sprite.opacity.clamp(0.0, 1.0)],
        };
        self.queue
            .write_buffer(&self.sprite.uniform_buffer, 0, bytemuck::bytes_of(&s));
    }
}
