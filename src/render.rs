//! Per-mesh frame rendering: transform derivation, culling, draw submission.
//!
//! Every mesh gets its own draw call. One packed buffer per mesh keeps this
//! simple, and with the visibility test evicting everything off-screen the
//! instance count stays small enough that batching would buy nothing.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::{
    camera::CameraFrame,
    culling,
    data_structures::{layout::Segment, model::Model},
    geo,
    pipelines::{Pipelines, mesh::MeshUniform},
};

/// Fixed light direction for diffuse shading, matching the shader ramp.
pub const LIGHT_DIR: [f32; 3] = [0.5, 0.5, -1.0];

/// Fixed light position the planar shadow is projected from.
#[cfg(feature = "planar-shadows")]
pub const SHADOW_LIGHT_POS: [f64; 3] = [0.0, 0.0, 200.0];

/// World matrix for one mesh at the current zoom: the unit square scaled to
/// world size, translated to the mesh's Mercator position.
pub fn world_matrix(frame: &CameraFrame, model: &Model) -> Matrix4<f64> {
    let world_size = geo::world_size(frame.zoom);
    Matrix4::from_nonuniform_scale(world_size, world_size, 1.0)
        * Matrix4::from_translation(Vector3::new(model.world_pos.x, model.world_pos.y, 0.0))
}

/// Cull or draw one mesh.
///
/// Culling evicts the mesh's GPU data eagerly; a mesh re-entering the
/// frustum is rebuilt synchronously from its retained asset right here,
/// which can stall the frame on large meshes. A rebuild failure is logged
/// and skips the mesh for this frame only.
pub(crate) fn render_model(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    render_pass: &mut wgpu::RenderPass<'_>,
    pipelines: &Pipelines,
    model: &mut Model,
    frame: &CameraFrame,
) {
    let world_matrix = world_matrix(frame, model);
    let result_matrix = frame.projection * world_matrix * model.model_matrix;

    // The visibility test wants the frustum in the mesh's local space.
    match result_matrix.invert().map(|inv| culling::frustum_planes(&inv)) {
        Some(Some(planes)) => {
            if !culling::sphere_visible(
                &planes,
                model.asset.bounds_center,
                model.asset.bounds_radius,
            ) {
                model.unload_gpu_data();
                return;
            }
        }
        // Unprojectable camera; draw rather than flicker the mesh away.
        _ => log::debug!("combined matrix not invertible, skipping visibility test"),
    }

    let lit = model.asset.has_normals();
    let cw_orient = model.cw_orient;

    #[cfg(feature = "planar-shadows")]
    let shadow_matrix = {
        let light_projection = planar_shadow_matrix(SHADOW_LIGHT_POS);
        frame.projection * world_matrix * light_projection * model.model_matrix
    };

    let gpu = match model.load_and_bind_gpu_data(device, queue, pipelines) {
        Ok(gpu) => gpu,
        Err(err) => {
            log::error!("can't rebuild gpu data, skipping mesh this frame: {err}");
            return;
        }
    };

    let positions = gpu
        .layout
        .range(Segment::Positions)
        .expect("positions are always packed");
    let tex_coords = gpu
        .layout
        .range(Segment::TexCoords)
        .expect("tex coords are always packed");

    #[cfg(feature = "planar-shadows")]
    {
        use crate::pipelines::shadow::ShadowUniform;

        queue.write_buffer(
            &gpu.shadow_uniform_buffer,
            0,
            bytemuck::cast_slice(&[ShadowUniform::new(to_gpu_matrix(&shadow_matrix))]),
        );
        render_pass.set_pipeline(pipelines.shadow(cw_orient));
        render_pass.set_bind_group(0, &gpu.shadow_bind_group, &[]);
        render_pass.set_vertex_buffer(0, gpu.buffer.slice(positions.clone()));
        draw(render_pass, gpu);
    }

    queue.write_buffer(
        &gpu.uniform_buffer,
        0,
        bytemuck::cast_slice(&[MeshUniform::new(to_gpu_matrix(&result_matrix), LIGHT_DIR)]),
    );

    render_pass.set_pipeline(pipelines.mesh(lit, cw_orient));
    render_pass.set_bind_group(0, &gpu.bind_group, &[]);
    render_pass.set_vertex_buffer(0, gpu.buffer.slice(positions));
    render_pass.set_vertex_buffer(1, gpu.buffer.slice(tex_coords));
    if lit {
        let normals = gpu
            .layout
            .range(Segment::Normals)
            .expect("lit meshes pack normals");
        render_pass.set_vertex_buffer(2, gpu.buffer.slice(normals));
    }
    draw(render_pass, gpu);
}

/// Indexed draw when the asset brought indices, flat triangle list
/// otherwise.
fn draw(render_pass: &mut wgpu::RenderPass<'_>, gpu: &crate::data_structures::model::GpuMesh) {
    if gpu.num_indices == 0 {
        render_pass.draw(0..gpu.num_vertices, 0..1);
    } else {
        let indices = gpu
            .layout
            .range(Segment::Indices)
            .expect("indexed meshes pack indices");
        render_pass.set_index_buffer(gpu.buffer.slice(indices), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..gpu.num_indices, 0, 0..1);
    }
}

/// Truncate a double-precision matrix for the uniform upload.
fn to_gpu_matrix(matrix: &Matrix4<f64>) -> [[f32; 4]; 4] {
    let columns: [[f64; 4]; 4] = (*matrix).into();
    columns.map(|column| column.map(|v| v as f32))
}

/// Projection flattening geometry onto the map plane away from a light.
///
/// Direct port of the upstream experiment; column-major element order.
#[cfg(feature = "planar-shadows")]
pub fn planar_shadow_matrix(light: [f64; 3]) -> Matrix4<f64> {
    let l = light;
    let n = [0.0, 0.0, -1.0];
    let e = [0.0, 0.0, -1.0];

    let d = n[0] * l[0] + n[1] * l[1] + n[2] * l[2];
    let c = e[0] * n[0] + e[1] * n[1] + e[2] * n[2] - d;

    #[rustfmt::skip]
    let matrix = Matrix4::new(
        l[0] * n[0] + c,  n[0] * l[1],      n[0] * l[2],      n[0],
        n[1] * l[0],      l[1] * n[1] + c,  n[1] * l[2],      n[1],
        n[2] * l[0],      n[2] * l[1],      l[2] * n[2] + c,  n[2],
        -l[0] * c - l[0] * d, -l[1] * c - l[1] * d, -l[2] * c - l[2] * d, -d,
    );
    matrix
}
