//! The mesh data model: parsed assets, placed instances, GPU residency.
//!
//! A [`MeshAsset`] is the CPU-side result of parsing one glTF primitive. A
//! [`Model`] anchors that asset at a geographic coordinate and carries its
//! derived transform plus whatever GPU state is currently resident. GPU
//! residency is an [`Option<GpuMesh>`]: culling evicts it, the next visible
//! frame rebuilds it from the retained asset without touching the disk.

use bytemuck::Zeroable;
use cgmath::{Deg, Matrix4, Point2, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        layout::PackedLayout,
        texture::Texture,
    },
    error::BuildError,
    geo::{self, LatLng},
    pipelines::{Pipelines, mesh::MeshUniform},
};

/// Parsed CPU-side geometry and texture data for one 3D object.
///
/// Invariants the loader guarantees: `positions` is non-empty,
/// `tex_coords.len() == positions.len()`, and indices (when present) all
/// reference valid vertices.
#[derive(Clone, Debug)]
pub struct MeshAsset {
    pub positions: Vec<[f32; 3]>,
    pub indices: Option<Vec<u16>>,
    pub tex_coords: Vec<[f32; 2]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub image: Option<image::RgbaImage>,
    /// Bounding sphere in model-local space.
    pub bounds_center: [f64; 3],
    pub bounds_radius: f64,
}

impl MeshAsset {
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.as_ref().map_or(0, |i| i.len() as u32)
    }

    /// Whether the lit pipeline can shade this asset.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }
}

/// A loaded asset placed on the map.
#[derive(Debug)]
pub struct Model {
    /// Retained parsed asset; reload after eviction never re-reads the file.
    pub asset: MeshAsset,
    pub lat_lng: LatLng,
    /// Normalized Mercator position, derived once at placement.
    pub world_pos: Point2<f64>,
    /// Latitude prescale composed with the local rotation; zoom-independent.
    pub model_matrix: Matrix4<f64>,
    /// The asset was authored with clockwise front faces.
    pub cw_orient: bool,
    gpu: Option<GpuMesh>,
}

impl Model {
    pub fn new(asset: MeshAsset) -> Self {
        Self {
            asset,
            lat_lng: LatLng::default(),
            world_pos: Point2::new(0.0, 0.0),
            model_matrix: Matrix4::identity(),
            cw_orient: false,
            gpu: None,
        }
    }

    /// Anchor the mesh at a geographic coordinate.
    ///
    /// Resets the model matrix to the latitude prescale, so any rotation has
    /// to be applied afterwards. Applied once at placement, never per frame.
    pub fn set_coordinates(&mut self, latitude: f64, longitude: f64) {
        self.lat_lng = LatLng::new(latitude, longitude);
        let prescale = geo::mercator_prescale(latitude);
        self.model_matrix = Matrix4::from_nonuniform_scale(prescale, prescale, 1.0);
        self.world_pos = geo::project(self.lat_lng);
    }

    /// Post-multiply a local rotation, degrees per axis, X then Y then Z.
    ///
    /// The order is fixed; rotations do not commute.
    pub fn rotate(&mut self, euler: Vector3<f64>) {
        self.model_matrix = self.model_matrix * Matrix4::from_angle_x(Deg(euler.x));
        self.model_matrix = self.model_matrix * Matrix4::from_angle_y(Deg(euler.y));
        self.model_matrix = self.model_matrix * Matrix4::from_angle_z(Deg(euler.z));
    }

    pub fn is_loaded(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn gpu(&self) -> Option<&GpuMesh> {
        self.gpu.as_ref()
    }

    /// Release GPU data only; placement, transform, and the parsed asset
    /// survive so the mesh can come back without re-reading its file.
    pub fn unload_gpu_data(&mut self) {
        if self.gpu.take().is_some() {
            log::debug!(
                "evicted gpu data for mesh at ({}, {})",
                self.lat_lng.latitude,
                self.lat_lng.longitude
            );
        }
    }

    /// Ensure GPU data is resident, rebuilding it from the retained asset.
    ///
    /// No-op when already loaded; rebuilding yields a buffer with identical
    /// offsets since the layout is deterministic per asset.
    pub fn load_and_bind_gpu_data(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipelines: &Pipelines,
    ) -> Result<&GpuMesh, BuildError> {
        if self.gpu.is_none() {
            self.gpu = Some(GpuMesh::upload(device, queue, &self.asset, pipelines)?);
        }
        Ok(self.gpu.as_ref().expect("just ensured residency"))
    }
}

/// GPU residency of one mesh: the packed buffer, diffuse texture, per-mesh
/// uniform, and the bind group tying them together.
///
/// Every handle is exclusively owned; dropping the struct is the single
/// release of all of them.
#[derive(Debug)]
pub struct GpuMesh {
    /// One buffer holding all attribute streams at the layout's offsets.
    pub buffer: wgpu::Buffer,
    pub layout: PackedLayout,
    pub texture: Texture,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    #[cfg(feature = "planar-shadows")]
    pub shadow_uniform_buffer: wgpu::Buffer,
    #[cfg(feature = "planar-shadows")]
    pub shadow_bind_group: wgpu::BindGroup,
    pub num_vertices: u32,
    pub num_indices: u32,
}

impl GpuMesh {
    /// Pack the asset's attribute streams into one buffer and upload it
    /// together with the diffuse texture and a fresh per-mesh uniform.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        asset: &MeshAsset,
        pipelines: &Pipelines,
    ) -> Result<Self, BuildError> {
        let layout = PackedLayout::for_asset(asset);
        let packed = layout.pack(asset);

        let max = device.limits().max_buffer_size;
        if packed.len() as u64 > max {
            return Err(BuildError::BufferTooLarge {
                size: packed.len() as u64,
                max,
            });
        }

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh packed buffer"),
            contents: &packed,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::INDEX,
        });

        let texture = match &asset.image {
            Some(rgba) => Texture::from_rgba(device, queue, rgba, "mesh diffuse"),
            None => Texture::create_default_diffuse(device, queue),
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh uniform buffer"),
            contents: bytemuck::cast_slice(&[MeshUniform::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &pipelines.mesh_bind_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
            label: Some("mesh bind group"),
        });

        #[cfg(feature = "planar-shadows")]
        let (shadow_uniform_buffer, shadow_bind_group) = {
            use crate::pipelines::shadow::ShadowUniform;

            let shadow_uniform_buffer =
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh shadow uniform buffer"),
                    contents: bytemuck::cast_slice(&[ShadowUniform::zeroed()]),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
            let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &pipelines.shadow_bind_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: shadow_uniform_buffer.as_entire_binding(),
                }],
                label: Some("mesh shadow bind group"),
            });
            (shadow_uniform_buffer, shadow_bind_group)
        };

        Ok(Self {
            buffer,
            layout,
            texture,
            uniform_buffer,
            bind_group,
            #[cfg(feature = "planar-shadows")]
            shadow_uniform_buffer,
            #[cfg(feature = "planar-shadows")]
            shadow_bind_group,
            num_vertices: asset.vertex_count(),
            num_indices: asset.index_count(),
        })
    }
}
