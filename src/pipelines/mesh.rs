//! The main mesh pipelines: textured, optionally diffuse-lit.
//!
//! Meshes bind three tightly packed attribute streams (position, texture
//! coordinate, normal) as separate vertex buffers sliced out of one packed
//! buffer. Assets without normals use the unlit variants, which only read
//! the first two streams.

use bytemuck::{Pod, Zeroable};

/// Per-mesh uniform: the combined projection-world-model matrix and the
/// frame's light direction.
///
/// The matrix is computed in double precision and truncated here, at the
/// upload boundary.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct MeshUniform {
    pub matrix: [[f32; 4]; 4],
    pub light_dir: [f32; 3],
    pub _padding: f32,
}

impl MeshUniform {
    pub fn new(matrix: [[f32; 4]; 4], light_dir: [f32; 3]) -> Self {
        Self {
            matrix,
            light_dir,
            _padding: 0.0,
        }
    }
}

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 0,
    format: wgpu::VertexFormat::Float32x3,
}];

const TEX_COORD_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 1,
    format: wgpu::VertexFormat::Float32x2,
}];

const NORMAL_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 2,
    format: wgpu::VertexFormat::Float32x3,
}];

/// Vertex buffer slot 0: positions.
pub fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION_ATTRIBUTES,
    }
}

/// Vertex buffer slot 1: texture coordinates.
pub fn tex_coord_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &TEX_COORD_ATTRIBUTES,
    }
}

/// Vertex buffer slot 2: normals, lit pipelines only.
pub fn normal_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &NORMAL_ATTRIBUTES,
    }
}

/// Bind group layout shared by every mesh: diffuse texture, sampler, and
/// the per-mesh uniform.
pub fn mesh_bind_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
        label: Some("mesh_bind_group_layout"),
    })
}

/// Build the four main pipeline variants: lit/unlit x ccw/cw front faces.
pub fn mk_mesh_pipelines(
    device: &wgpu::Device,
    mesh_bind_layout: &wgpu::BindGroupLayout,
    color_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
) -> [wgpu::RenderPipeline; 4] {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Mesh Pipeline Layout"),
        bind_group_layouts: &[Some(mesh_bind_layout)],
        immediate_size: 0,
    });

    let lit = || wgpu::ShaderModuleDescriptor {
        label: Some("Mesh Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("mesh_shader.wgsl").into()),
    };
    let unlit = || wgpu::ShaderModuleDescriptor {
        label: Some("Unlit Mesh Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("mesh_unlit_shader.wgsl").into()),
    };

    let lit_buffers = [position_layout(), tex_coord_layout(), normal_layout()];
    let unlit_buffers = [position_layout(), tex_coord_layout()];

    [
        mk_render_pipeline(
            device,
            &layout,
            color_format,
            Some(wgpu::BlendState {
                alpha: wgpu::BlendComponent::REPLACE,
                color: wgpu::BlendComponent::REPLACE,
            }),
            depth_format,
            true,
            &lit_buffers,
            lit(),
            wgpu::FrontFace::Ccw,
        ),
        mk_render_pipeline(
            device,
            &layout,
            color_format,
            Some(wgpu::BlendState {
                alpha: wgpu::BlendComponent::REPLACE,
                color: wgpu::BlendComponent::REPLACE,
            }),
            depth_format,
            true,
            &lit_buffers,
            lit(),
            wgpu::FrontFace::Cw,
        ),
        mk_render_pipeline(
            device,
            &layout,
            color_format,
            Some(wgpu::BlendState {
                alpha: wgpu::BlendComponent::REPLACE,
                color: wgpu::BlendComponent::REPLACE,
            }),
            depth_format,
            true,
            &unlit_buffers,
            unlit(),
            wgpu::FrontFace::Ccw,
        ),
        mk_render_pipeline(
            device,
            &layout,
            color_format,
            Some(wgpu::BlendState {
                alpha: wgpu::BlendComponent::REPLACE,
                color: wgpu::BlendComponent::REPLACE,
            }),
            depth_format,
            true,
            &unlit_buffers,
            unlit(),
            wgpu::FrontFace::Cw,
        ),
    ]
}

/// Shared pipeline constructor; every variant differs only in shader,
/// vertex streams, winding, blending, and depth behavior.
#[allow(clippy::too_many_arguments)]
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    depth_write_enabled: bool,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
    front_face: wgpu::FrontFace,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Mesh Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: Some(depth_write_enabled),
            depth_compare: Some(wgpu::CompareFunction::Less),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}
