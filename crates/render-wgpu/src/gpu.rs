use crate::packing::{
    Draw, Globals, InstanceData, MaterialUniform, Pass, Vertex, build_draws, fits_texture_limit,
    material_uniforms, mesh_vertices,
};
use crate::shaders;
use bubbletext_common::{HdrImage, TextureImage};
use bubbletext_materials::{MaterialId, MaterialRegistry};
use bubbletext_render::{RenderView, Renderer};
use bubbletext_scene::{GeometryHandle, SceneGraph};
use bytemuck::Zeroable;
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const ENV_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;
const MATCAP_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

/// Vertex and index buffers of one scene geometry. Empty meshes keep no
/// buffers.
struct GpuMesh {
    buffers: Option<(wgpu::Buffer, wgpu::Buffer)>,
    index_count: u32,
}

struct GpuMaterial {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// What one frame submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub draw_calls: u32,
    pub instances: u32,
    pub triangles: u64,
    pub background: bool,
}

/// wgpu scene renderer: environment background, text and instanced bubbles.
///
/// GPU copies of scene geometry, the environment map and the matcap
/// texture are kept in sync with the scene lazily, once per frame.
pub struct WgpuRenderer {
    background_pipeline: wgpu::RenderPipeline,
    solid_pipeline: wgpu::RenderPipeline,
    translucent_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_layout: wgpu::BindGroupLayout,
    globals_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    materials: BTreeMap<MaterialId, GpuMaterial>,
    env_sampler: wgpu::Sampler,
    env_view: wgpu::TextureView,
    env_revision: u64,
    env_resident: bool,
    matcap_sampler: wgpu::Sampler,
    matcap_view: wgpu::TextureView,
    matcap_revision: u64,
    /// False while the matcap material's texture could not be uploaded.
    matcap_resident: bool,
    meshes: BTreeMap<GeometryHandle, GpuMesh>,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u32,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_buffer"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                    count: None,
                },
            ],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let env_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("env_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });
        let matcap_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("matcap_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let env_view = upload_env(device, queue, &HdrImage::solid([0.0, 0.0, 0.0, 1.0]));
        let matcap_view = upload_matcap(device, queue, &TextureImage::solid([255; 4]));

        let globals_bind_group =
            create_globals_bind_group(device, &globals_layout, &globals_buffer, &env_view, &env_sampler);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &material_layout],
            push_constant_ranges: &[],
        });
        let background_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("background_pipeline_layout"),
            bind_group_layouts: &[&globals_layout],
            push_constant_ranges: &[],
        });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::mesh_shader().into()),
        });
        let background_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("background_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::background_shader().into()),
        });

        let background_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("background_pipeline"),
            layout: Some(&background_layout),
            vertex: wgpu::VertexState {
                module: &background_shader,
                entry_point: Some("vs_background"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &background_shader,
                entry_point: Some("fs_background"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let mesh_pipeline = |label: &str, pass: Pass| {
            let (cull_mode, depth_write_enabled) = match pass {
                Pass::Solid => (None, true),
                Pass::Translucent => (Some(wgpu::Face::Back), false),
            };
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &mesh_shader,
                    entry_point: Some("vs_mesh"),
                    compilation_options: Default::default(),
                    buffers: &[
                        wgpu::VertexBufferLayout {
                            array_stride: std::mem::size_of::<Vertex>() as u64,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &wgpu::vertex_attr_array![
                                0 => Float32x3,
                                1 => Float32x3,
                            ],
                        },
                        wgpu::VertexBufferLayout {
                            array_stride: std::mem::size_of::<InstanceData>() as u64,
                            step_mode: wgpu::VertexStepMode::Instance,
                            attributes: &wgpu::vertex_attr_array![
                                2 => Float32x4,
                                3 => Float32x4,
                                4 => Float32x4,
                                5 => Float32x4,
                            ],
                        },
                    ],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &mesh_shader,
                    entry_point: Some("fs_mesh"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        };
        let solid_pipeline = mesh_pipeline("solid_pipeline", Pass::Solid);
        let translucent_pipeline = mesh_pipeline("translucent_pipeline", Pass::Translucent);

        let instance_capacity = 1024;
        let instance_buffer = create_instance_buffer(device, instance_capacity);
        let depth_texture = create_depth_texture(device, width, height);

        let mut renderer = Self {
            background_pipeline,
            solid_pipeline,
            translucent_pipeline,
            globals_buffer,
            globals_layout,
            globals_bind_group,
            material_layout,
            materials: BTreeMap::new(),
            env_sampler,
            env_view,
            env_revision: 0,
            env_resident: false,
            matcap_sampler,
            matcap_view,
            matcap_revision: 0,
            matcap_resident: false,
            meshes: BTreeMap::new(),
            instance_buffer,
            instance_capacity,
            depth_texture,
        };
        renderer.rebuild_material_bind_groups(device);
        renderer
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = create_depth_texture(device, width, height);
    }

    /// Bind a frame target. The returned value implements [`Renderer`].
    pub fn frame<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        target: &'a wgpu::TextureView,
    ) -> WgpuFrame<'a> {
        WgpuFrame {
            renderer: self,
            device,
            queue,
            target,
        }
    }

    fn rebuild_material_bind_groups(&mut self, device: &wgpu::Device) {
        for id in [MaterialId::Physical, MaterialId::Bubble, MaterialId::Normal, MaterialId::Matcap] {
            let buffer = match self.materials.remove(&id) {
                Some(existing) => existing.buffer,
                None => device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("material_buffer"),
                    contents: bytemuck::bytes_of(&MaterialUniform::zeroed()),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                }),
            };
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("material_bind_group"),
                layout: &self.material_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&self.matcap_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&self.matcap_sampler),
                    },
                ],
            });
            self.materials.insert(id, GpuMaterial { buffer, bind_group });
        }
    }

    /// Upload new geometry and drop GPU copies of released geometry.
    fn sync_meshes(&mut self, device: &wgpu::Device, scene: &SceneGraph) {
        let live = scene.geometries();
        self.meshes.retain(|handle, _| live.contains_key(handle));
        for (handle, mesh) in live {
            if self.meshes.contains_key(handle) {
                continue;
            }
            let buffers = (!mesh.is_empty()).then(|| {
                let vertices = mesh_vertices(mesh);
                let vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_vertex_buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_index_buffer"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                (vb, ib)
            });
            tracing::trace!(handle = handle.0, triangles = mesh.triangle_count(), "geometry uploaded");
            self.meshes.insert(
                *handle,
                GpuMesh {
                    buffers,
                    index_count: mesh.index_count() as u32,
                },
            );
        }
    }

    fn sync_environment(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &SceneGraph) {
        if scene.environment_revision() == self.env_revision {
            return;
        }
        self.env_revision = scene.environment_revision();
        self.env_resident = false;
        let Some(image) = scene.environment() else {
            return;
        };
        let max = device.limits().max_texture_dimension_2d;
        if !fits_texture_limit(image.width, image.height, max) {
            tracing::warn!(width = image.width, height = image.height, max, "environment map too large, ignored");
            return;
        }
        self.env_view = upload_env(device, queue, image);
        self.env_resident = true;
        self.globals_bind_group = create_globals_bind_group(
            device,
            &self.globals_layout,
            &self.globals_buffer,
            &self.env_view,
            &self.env_sampler,
        );
        tracing::debug!(width = image.width, height = image.height, "environment map uploaded");
    }

    fn sync_matcap(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, materials: &MaterialRegistry) {
        if materials.matcap.revision() == self.matcap_revision {
            return;
        }
        self.matcap_revision = materials.matcap.revision();
        let max = device.limits().max_texture_dimension_2d;
        let texture = materials.matcap.texture().filter(|t| {
            let fits = fits_texture_limit(t.image.width, t.image.height, max);
            if !fits {
                tracing::warn!(
                    index = t.index,
                    width = t.image.width,
                    height = t.image.height,
                    max,
                    "matcap texture too large, ignored"
                );
            }
            fits
        });
        self.matcap_resident = texture.is_some();
        self.matcap_view = match texture {
            Some(texture) => upload_matcap(device, queue, &texture.image),
            None => upload_matcap(device, queue, &TextureImage::solid([255; 4])),
        };
        self.rebuild_material_bind_groups(device);
        tracing::debug!(
            revision = self.matcap_revision,
            resident = self.matcap_resident,
            "matcap texture uploaded"
        );
    }

    fn ensure_instance_capacity(&mut self, device: &wgpu::Device, needed: u32) {
        if needed <= self.instance_capacity {
            return;
        }
        self.instance_capacity = needed.next_power_of_two();
        self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
    }

    fn draw_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        scene: &SceneGraph,
        materials: &MaterialRegistry,
        view: &RenderView,
    ) -> DrawStats {
        self.sync_meshes(device, scene);
        self.sync_environment(device, queue, scene);
        self.sync_matcap(device, queue, materials);

        let has_env = self.env_resident;
        let globals = Globals {
            view_proj: view.view_projection.to_cols_array_2d(),
            view: view.view.to_cols_array_2d(),
            inv_view_proj: view.view_projection.inverse().to_cols_array_2d(),
            eye: [view.eye.x, view.eye.y, view.eye.z, if has_env { 1.0 } else { 0.0 }],
        };
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        for (id, uniform) in material_uniforms(materials, self.matcap_resident) {
            if let Some(gpu) = self.materials.get(&id) {
                queue.write_buffer(&gpu.buffer, 0, bytemuck::bytes_of(&uniform));
            }
        }

        let (instances, draws) = build_draws(scene);
        self.ensure_instance_capacity(device, instances.len() as u32);
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut stats = DrawStats {
            background: has_env,
            ..DrawStats::default()
        };
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if has_env {
                pass.set_pipeline(&self.background_pipeline);
                pass.set_bind_group(0, &self.globals_bind_group, &[]);
                pass.draw(0..3, 0..1);
                stats.draw_calls += 1;
            }

            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            for draw in &draws {
                let Draw {
                    geometry,
                    material,
                    first_instance,
                    instance_count,
                    pass: kind,
                } = draw;
                let (Some(mesh), Some(gpu_material)) =
                    (self.meshes.get(geometry), self.materials.get(material))
                else {
                    continue;
                };
                let Some((vb, ib)) = &mesh.buffers else {
                    continue;
                };
                pass.set_pipeline(match kind {
                    Pass::Solid => &self.solid_pipeline,
                    Pass::Translucent => &self.translucent_pipeline,
                });
                pass.set_bind_group(1, &gpu_material.bind_group, &[]);
                pass.set_vertex_buffer(0, vb.slice(..));
                pass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(
                    0..mesh.index_count,
                    0,
                    *first_instance..first_instance + instance_count,
                );
                stats.draw_calls += 1;
                stats.instances += instance_count;
                stats.triangles += (mesh.index_count / 3) as u64 * *instance_count as u64;
            }
        }
        queue.submit(std::iter::once(encoder.finish()));
        stats
    }
}

/// A [`WgpuRenderer`] bound to one surface texture.
pub struct WgpuFrame<'a> {
    renderer: &'a mut WgpuRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    target: &'a wgpu::TextureView,
}

impl Renderer for WgpuFrame<'_> {
    type Output = DrawStats;

    fn render(
        &mut self,
        scene: &SceneGraph,
        materials: &MaterialRegistry,
        view: &RenderView,
    ) -> DrawStats {
        self.renderer
            .draw_frame(self.device, self.queue, self.target, scene, materials, view)
    }
}

fn create_globals_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    env_view: &wgpu::TextureView,
    env_sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("globals_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(env_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(env_sampler),
            },
        ],
    })
}

fn create_instance_buffer(device: &wgpu::Device, capacity: u32) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instance_buffer"),
        size: capacity as u64 * std::mem::size_of::<InstanceData>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    format: wgpu::TextureFormat,
    (width, height): (u32, u32),
    bytes_per_row: u32,
    data: &[u8],
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: width.max(1),
        height: height.max(1),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(bytes_per_row),
            rows_per_image: Some(size.height),
        },
        size,
    );
    texture.create_view(&Default::default())
}

fn upload_env(device: &wgpu::Device, queue: &wgpu::Queue, image: &HdrImage) -> wgpu::TextureView {
    upload_texture(
        device,
        queue,
        "environment_map",
        ENV_FORMAT,
        (image.width, image.height),
        image.bytes_per_row(),
        bytemuck::cast_slice(&image.rgba),
    )
}

fn upload_matcap(device: &wgpu::Device, queue: &wgpu::Queue, image: &TextureImage) -> wgpu::TextureView {
    upload_texture(
        device,
        queue,
        "matcap_texture",
        MATCAP_FORMAT,
        (image.width, image.height),
        image.bytes_per_row(),
        &image.rgba,
    )
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}
