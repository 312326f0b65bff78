//! The host-facing custom layer: lifecycle contract and its mesh overlay
//! implementation.
//!
//! The map host drives everything from its rendering thread, strictly
//! initialize, then render once per frame, then deinitialize. Nothing here
//! is re-entrant and nothing suspends; a slow asset load blocks
//! initialization by design.

use std::path::PathBuf;

use crate::{
    camera::CameraFrame,
    config::ModelsConfig,
    data_structures::model::Model,
    error::LayerError,
    pipelines::Pipelines,
    render,
    resources,
};

/// The three-operation contract a map host drives a custom layer through.
pub trait CustomLayerHost {
    /// Build GPU pipelines and load every configured mesh. Any failure is
    /// fatal; whatever was created before the failure is released when the
    /// partial state drops.
    fn initialize(&mut self, ctx: &LayerContext<'_>) -> Result<(), LayerError>;

    /// Draw all visible meshes into the host's render pass. Never fails; a
    /// per-mesh problem is logged and that mesh skipped for the frame.
    fn render(
        &mut self,
        ctx: &LayerContext<'_>,
        render_pass: &mut wgpu::RenderPass<'_>,
        frame: &CameraFrame,
    );

    /// Release every GPU resource the layer owns.
    fn deinitialize(&mut self);
}

/// What the host lends the layer for a lifecycle call.
#[derive(Clone, Copy, Debug)]
pub struct LayerContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Format of the host's color target the layer renders into.
    pub color_format: wgpu::TextureFormat,
    /// Format of the host's depth attachment, if it has one.
    pub depth_format: Option<wgpu::TextureFormat>,
}

/// A custom layer rendering geo-referenced glTF meshes over the map.
#[derive(Debug, Default)]
pub struct MeshLayer {
    config_path: PathBuf,
    models: Vec<Model>,
    pipelines: Option<Pipelines>,
}

impl MeshLayer {
    /// Layer reading its models config from `config_path` at initialization.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            models: Vec::new(),
            pipelines: None,
        }
    }

    /// The placed models in load order, which is also draw order.
    pub fn models(&self) -> &[Model] {
        &self.models
    }
}

impl CustomLayerHost for MeshLayer {
    fn initialize(&mut self, ctx: &LayerContext<'_>) -> Result<(), LayerError> {
        let pipelines = Pipelines::new(ctx.device, ctx.color_format, ctx.depth_format);

        let config = ModelsConfig::from_path(&self.config_path)?;
        let mut models = resources::load_models(&config)?;
        // Upload everything up front; culling will evict what the first
        // frame doesn't need.
        for model in &mut models {
            model.load_and_bind_gpu_data(ctx.device, ctx.queue, &pipelines)?;
        }

        log::info!("mesh layer initialized with {} models", models.len());
        self.models = models;
        self.pipelines = Some(pipelines);
        Ok(())
    }

    fn render(
        &mut self,
        ctx: &LayerContext<'_>,
        render_pass: &mut wgpu::RenderPass<'_>,
        frame: &CameraFrame,
    ) {
        let Some(pipelines) = &self.pipelines else {
            log::warn!("render called before initialize, drawing nothing");
            return;
        };

        // Depth test, depth writes, and back-face culling are baked into the
        // pipelines. The depth range cap is per frame: the host's depth
        // epsilon is too tight for meshes standing well above the map plane.
        render_pass.set_viewport(
            0.0,
            0.0,
            frame.width as f32,
            frame.height as f32,
            0.0,
            frame.depth_min,
        );

        // Every model in its own draw call, in load order. One buffer per
        // mesh is plenty while the visibility test keeps the resident set
        // small.
        for model in &mut self.models {
            render::render_model(ctx.device, ctx.queue, render_pass, pipelines, model, frame);
        }
    }

    fn deinitialize(&mut self) {
        for model in &mut self.models {
            model.unload_gpu_data();
        }
        self.pipelines = None;
        log::info!("mesh layer deinitialized");
    }
}
