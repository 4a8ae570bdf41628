use anyhow::{ensure, Context, Result};
use glam::Mat4;
use wgpu::util::DeviceExt;

use hollow_engine::render::{RenderCtx, RenderTarget};

use crate::geometry::{Mesh, Vertex};
use crate::program::{Program, UniformSlot};
use crate::uniforms::matrix_bytes;

const MATRIX_SIZE: u64 = std::mem::size_of::<Mat4>() as u64;

/// GPU resources for the hollow cube: one pipeline, the uploaded mesh and one
/// uniform buffer per matrix.
///
/// Vertex and index data are uploaded once at creation and never change.
pub struct CubeRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,

    model: UniformSlot,
    view: UniformSlot,
    projection: UniformSlot,
    uniform_buffers: Vec<(UniformSlot, wgpu::Buffer)>,
}

impl CubeRenderer {
    /// Builds the pipeline from a linked program and uploads `mesh`.
    ///
    /// With `depth_format` set, fragments are depth-tested with `Less` and write depth.
    pub fn new(
        ctx: &RenderCtx<'_>,
        depth_format: Option<wgpu::TextureFormat>,
        program: &Program,
        mesh: Mesh,
    ) -> Result<Self> {
        let device = ctx.device;

        let model = slot(program, "model")?;
        let view = slot(program, "view")?;
        let projection = slot(program, "projection")?;
        ensure!(
            [model, view, projection].iter().all(|s| s.group == 0),
            "cube uniforms must all live in bind group 0"
        );

        let position = program
            .attribute("position")
            .context("program has no `position` attribute")?;
        let color = program
            .attribute("color")
            .context("program has no `color` attribute")?;

        let (vs, fs) = program.create_modules(device);

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(MATRIX_SIZE),
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("hollow cube bgl"),
            entries: &[
                uniform_entry(model.binding),
                uniform_entry(view.binding),
                uniform_entry(projection.binding),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("hollow cube pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let (attributes, stride) = Vertex::layout(position.location, color.location);

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("hollow cube pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(program.vertex().kind().entry_point()),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: stride,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(program.fragment().kind().entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Both windings are drawn; the far faces show through the holes.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hollow cube vbo"),
            contents: bytemuck::cast_slice(mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hollow cube ibo"),
            contents: bytemuck::cast_slice(mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffers: Vec<(UniformSlot, wgpu::Buffer)> = [
            (model, "hollow cube model ubo"),
            (view, "hollow cube view ubo"),
            (projection, "hollow cube projection ubo"),
        ]
        .into_iter()
        .map(|(slot, label)| {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: MATRIX_SIZE,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            (slot, buffer)
        })
        .collect();

        let entries: Vec<wgpu::BindGroupEntry<'_>> = uniform_buffers
            .iter()
            .map(|(slot, buffer)| wgpu::BindGroupEntry {
                binding: slot.binding,
                resource: buffer.as_entire_binding(),
            })
            .collect();

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("hollow cube bind group"),
            layout: &bind_group_layout,
            entries: &entries,
        });

        log::debug!(
            "cube renderer ready ({} vertices, {} indices, depth {:?})",
            mesh.vertices.len(),
            mesh.index_count(),
            depth_format
        );

        Ok(Self {
            pipeline,
            bind_group,
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
            model,
            view,
            projection,
            uniform_buffers,
        })
    }

    /// Overwrites the matrix bound at `slot`.
    ///
    /// Slots the pipeline does not bind are ignored with a warning.
    pub fn write_uniform(&self, queue: &wgpu::Queue, slot: UniformSlot, matrix: &Mat4) {
        match self.uniform_buffers.iter().find(|(s, _)| *s == slot) {
            Some((_, buffer)) => queue.write_buffer(buffer, 0, matrix_bytes(matrix)),
            None => log::warn!("no uniform buffer bound at {slot:?}"),
        }
    }

    pub fn write_model(&self, queue: &wgpu::Queue, model: &Mat4) {
        self.write_uniform(queue, self.model, model);
    }

    pub fn write_view(&self, queue: &wgpu::Queue, view: &Mat4) {
        self.write_uniform(queue, self.view, view);
    }

    pub fn write_projection(&self, queue: &wgpu::Queue, projection: &Mat4) {
        self.write_uniform(queue, self.projection, projection);
    }

    /// Records one indexed draw of the whole mesh into `target`.
    ///
    /// The target has already been cleared; color and depth are loaded.
    pub fn draw(&self, target: &mut RenderTarget<'_>) {
        let depth_stencil_attachment = target.depth_attachment();

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("hollow cube pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

fn slot(program: &Program, name: &str) -> Result<UniformSlot> {
    program
        .uniform(name)
        .with_context(|| format!("program has no `{name}` uniform"))
}
