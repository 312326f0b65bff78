//! Render pipeline definitions for the mesh overlay.
//!
//! Front-face winding and lighting capability are pipeline state in WGPU,
//! so the layer builds one pipeline per combination up front and picks per
//! mesh at draw time: lit/unlit crossed with counter-clockwise/clockwise
//! front faces, plus the optional planar shadow pair.

pub mod mesh;
#[cfg(feature = "planar-shadows")]
pub mod shadow;

/// All pipelines and bind group layouts the layer needs, built once at
/// initialization against the host's target formats.
#[derive(Debug)]
pub struct Pipelines {
    /// Diffuse texture + sampler + per-mesh uniform.
    pub mesh_bind_layout: wgpu::BindGroupLayout,
    pub lit_ccw: wgpu::RenderPipeline,
    pub lit_cw: wgpu::RenderPipeline,
    pub unlit_ccw: wgpu::RenderPipeline,
    pub unlit_cw: wgpu::RenderPipeline,
    #[cfg(feature = "planar-shadows")]
    pub shadow_bind_layout: wgpu::BindGroupLayout,
    #[cfg(feature = "planar-shadows")]
    pub shadow_ccw: wgpu::RenderPipeline,
    #[cfg(feature = "planar-shadows")]
    pub shadow_cw: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        let mesh_bind_layout = mesh::mesh_bind_layout(device);
        let [lit_ccw, lit_cw, unlit_ccw, unlit_cw] =
            mesh::mk_mesh_pipelines(device, &mesh_bind_layout, color_format, depth_format);

        #[cfg(feature = "planar-shadows")]
        let (shadow_bind_layout, shadow_ccw, shadow_cw) =
            shadow::mk_shadow_pipelines(device, color_format, depth_format);

        Self {
            mesh_bind_layout,
            lit_ccw,
            lit_cw,
            unlit_ccw,
            unlit_cw,
            #[cfg(feature = "planar-shadows")]
            shadow_bind_layout,
            #[cfg(feature = "planar-shadows")]
            shadow_ccw,
            #[cfg(feature = "planar-shadows")]
            shadow_cw,
        }
    }

    /// Pick the main pipeline for a mesh's capabilities and winding.
    pub fn mesh(&self, lit: bool, cw_orient: bool) -> &wgpu::RenderPipeline {
        match (lit, cw_orient) {
            (true, false) => &self.lit_ccw,
            (true, true) => &self.lit_cw,
            (false, false) => &self.unlit_ccw,
            (false, true) => &self.unlit_cw,
        }
    }

    /// Pick the shadow pipeline for a mesh's winding.
    #[cfg(feature = "planar-shadows")]
    pub fn shadow(&self, cw_orient: bool) -> &wgpu::RenderPipeline {
        if cw_orient {
            &self.shadow_cw
        } else {
            &self.shadow_ccw
        }
    }
}
