//! Planar shadow pipeline, behind the `planar-shadows` feature.
//!
//! Ported from an unfinished upstream experiment: each mesh is flattened
//! onto the map plane by a shadow projection matrix and drawn as a flat
//! translucent dark shape before the main pass. Depth-tested but not
//! depth-written. Best-effort; nothing else depends on it.

use bytemuck::{Pod, Zeroable};

use crate::pipelines::mesh::{mk_render_pipeline, position_layout};

/// Per-mesh shadow uniform: the flattening projection matrix.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ShadowUniform {
    pub matrix: [[f32; 4]; 4],
}

impl ShadowUniform {
    pub fn new(matrix: [[f32; 4]; 4]) -> Self {
        Self { matrix }
    }
}

/// Bind group layout plus the ccw/cw pipeline pair.
pub fn mk_shadow_pipelines(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
) -> (wgpu::BindGroupLayout, wgpu::RenderPipeline, wgpu::RenderPipeline) {
    let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("shadow_bind_group_layout"),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Shadow Pipeline Layout"),
        bind_group_layouts: &[Some(&bind_layout)],
        immediate_size: 0,
    });

    let shader = || wgpu::ShaderModuleDescriptor {
        label: Some("Shadow Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shadow_shader.wgsl").into()),
    };

    let buffers = [position_layout()];

    let ccw = mk_render_pipeline(
        device,
        &layout,
        color_format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        depth_format,
        false,
        &buffers,
        shader(),
        wgpu::FrontFace::Ccw,
    );
    let cw = mk_render_pipeline(
        device,
        &layout,
        color_format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        depth_format,
        false,
        &buffers,
        shader(),
        wgpu::FrontFace::Cw,
    );

    (bind_layout, ccw, cw)
}
