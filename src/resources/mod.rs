//! Loading mesh assets from glTF files and building placed models.
//!
//! One call parses one file into a [`MeshAsset`]: the first primitive of the
//! selected mesh, its mandatory positions, optional 16-bit indices, texture
//! coordinates, optional normals, the material's base-color image decoded to
//! RGBA, and a model-local bounding sphere. Binary `.glb` files carry their
//! buffers in the embedded blob; textual `.gltf` files reference sibling
//! files which are resolved relative to the document. Nothing here touches
//! the GPU, so the whole parse path tests without a device.

use std::{
    io::{BufReader, Cursor},
    path::Path,
};

use cgmath::Vector3;

use crate::{
    config::ModelsConfig,
    data_structures::model::{MeshAsset, Model},
    error::{AssetError, LayerError},
};

/// Parse one glTF file into a CPU-side mesh asset.
///
/// `mesh_index` selects which mesh of the container to read; only its first
/// primitive is used, multi-primitive meshes are unsupported. `flip_y`
/// replaces every texture V with `1.0 - V`, once, here.
///
/// Returns a distinct [`AssetError`] per failure mode and never a partial
/// asset.
pub fn load_mesh_asset(
    path: impl AsRef<Path>,
    flip_y: bool,
    mesh_index: usize,
) -> Result<MeshAsset, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let gltf_cursor = Cursor::new(bytes);
    let gltf_reader = BufReader::new(gltf_cursor);
    let gltf = gltf::Gltf::from_reader(gltf_reader)?;

    // Load buffers: the GLB blob for binary files, sibling files for
    // textual ones.
    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                if let Some(blob) = gltf.blob.as_deref() {
                    buffer_data.push(blob.into());
                }
            }
            gltf::buffer::Source::Uri(uri) => {
                buffer_data.push(read_relative(path, uri)?);
            }
        }
    }

    let mesh = gltf
        .meshes()
        .nth(mesh_index)
        .ok_or(AssetError::MissingMesh { index: mesh_index })?;
    let primitive = mesh
        .primitives()
        .next()
        .ok_or(AssetError::MissingPositions)?;
    let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or(AssetError::MissingPositions)?
        .collect();
    if positions.is_empty() {
        return Err(AssetError::MissingPositions);
    }

    let indices = reader
        .read_indices()
        .map(|read| {
            read.into_u32()
                .map(|index| {
                    let index =
                        u16::try_from(index).map_err(|_| AssetError::OversizedIndex { index })?;
                    if (index as usize) < positions.len() {
                        Ok(index)
                    } else {
                        Err(AssetError::IndexOutOfBounds {
                            index,
                            vertices: positions.len(),
                        })
                    }
                })
                .collect::<Result<Vec<u16>, AssetError>>()
        })
        .transpose()?;

    let image = load_base_color_image(path, &primitive, &buffer_data)?;

    let mut tex_coords: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
        Some(read) => read.into_f32().collect(),
        // UVs are mandatory once the asset ships an image; without one the
        // packed layout still wants a stream, so zero-fill it.
        None if image.is_some() => return Err(AssetError::MissingTexCoords),
        None => vec![[0.0, 0.0]; positions.len()],
    };
    if tex_coords.len() != positions.len() {
        return Err(AssetError::AttributeCountMismatch {
            attribute: "TEXCOORD_0",
            expected: positions.len(),
            actual: tex_coords.len(),
        });
    }
    if flip_y {
        for uv in &mut tex_coords {
            uv[1] = 1.0 - uv[1];
        }
    }

    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|read| read.collect());
    if let Some(normals) = &normals
        && normals.len() != positions.len()
    {
        return Err(AssetError::AttributeCountMismatch {
            attribute: "NORMAL",
            expected: positions.len(),
            actual: normals.len(),
        });
    }

    let (bounds_center, bounds_radius) = bounding_sphere(&primitive, &positions);

    log::info!(
        "loaded mesh {} ({} vertices, {} indices, image: {})",
        path.display(),
        positions.len(),
        indices.as_ref().map_or(0, Vec::len),
        image.is_some(),
    );

    Ok(MeshAsset {
        positions,
        indices,
        tex_coords,
        normals,
        image,
        bounds_center,
        bounds_radius,
    })
}

/// Build placed [`Model`]s for every config entry, in config order.
///
/// The first failing entry aborts the whole load with its path attached;
/// already-built models are dropped by the caller. CPU-only: GPU residency
/// comes later, per frame.
pub fn load_models(config: &ModelsConfig) -> Result<Vec<Model>, LayerError> {
    let mut models = Vec::with_capacity(config.models.len());
    for entry in &config.models {
        let asset = load_mesh_asset(&entry.path, entry.flip_y, entry.model_index).map_err(
            |source| LayerError::Asset {
                path: entry.path.clone(),
                source,
            },
        )?;
        let mut model = Model::new(asset);
        model.cw_orient = entry.cw_orient;
        model.set_coordinates(entry.latitude, entry.longitude);
        if let Some(rotation) = entry.rotation {
            model.rotate(Vector3::new(rotation.x, rotation.y, rotation.z));
        }
        models.push(model);
    }
    Ok(models)
}

/// Read a buffer or image referenced by URI, relative to the document.
fn read_relative(document: &Path, uri: &str) -> Result<Vec<u8>, AssetError> {
    if uri.contains("://") || uri.starts_with("data:") {
        return Err(AssetError::UnsupportedUri {
            uri: uri.to_string(),
        });
    }
    let resolved = document.parent().unwrap_or(Path::new(".")).join(uri);
    std::fs::read(&resolved).map_err(|source| AssetError::Io {
        path: resolved,
        source,
    })
}

/// Decode the primitive's base-color texture to RGBA, if it has one.
fn load_base_color_image(
    path: &Path,
    primitive: &gltf::Primitive,
    buffer_data: &[Vec<u8>],
) -> Result<Option<image::RgbaImage>, AssetError> {
    let Some(info) = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_texture()
    else {
        return Ok(None);
    };

    let decoded = match info.texture().source().source() {
        gltf::image::Source::View { view, mime_type } => {
            let buffer = buffer_data
                .get(view.buffer().index())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let start = view.offset();
            let end = start + view.length();
            let bytes = buffer
                .get(start..end)
                .ok_or(AssetError::ImageViewOutOfBounds)?;
            decode_image(bytes, mime_type.split('/').next_back())?
        }
        gltf::image::Source::Uri { uri, mime_type } => {
            let bytes = read_relative(path, uri)?;
            decode_image(&bytes, mime_type.and_then(|m| m.split('/').next_back()))?
        }
    };
    Ok(Some(decoded.to_rgba8()))
}

fn decode_image(
    bytes: &[u8],
    extension: Option<&str>,
) -> Result<image::DynamicImage, AssetError> {
    let format = extension.and_then(image::ImageFormat::from_extension);
    let decoded = match format {
        Some(format) => image::load_from_memory_with_format(bytes, format)?,
        // No usable mime type, let the decoder sniff it.
        None => image::load_from_memory(bytes)?,
    };
    Ok(decoded)
}

/// Bounding sphere from the accessor's declared extents, or from the
/// positions themselves when the accessor stays silent.
fn bounding_sphere(primitive: &gltf::Primitive, positions: &[[f32; 3]]) -> ([f64; 3], f64) {
    let declared = primitive
        .get(&gltf::Semantic::Positions)
        .and_then(|accessor| Some((json_vec3(&accessor.min()?)?, json_vec3(&accessor.max()?)?)));

    let (min, max) = declared.unwrap_or_else(|| {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for position in positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(position[axis] as f64);
                max[axis] = max[axis].max(position[axis] as f64);
            }
        }
        (min, max)
    });

    let center = [
        (min[0] + max[0]) / 2.0,
        (min[1] + max[1]) / 2.0,
        (min[2] + max[2]) / 2.0,
    ];
    let radius = ((max[0] - center[0]).powi(2)
        + (max[1] - center[1]).powi(2)
        + (max[2] - center[2]).powi(2))
    .sqrt();
    (center, radius)
}

fn json_vec3(value: &serde_json::Value) -> Option<[f64; 3]> {
    let array = value.as_array()?;
    Some([
        array.first()?.as_f64()?,
        array.get(1)?.as_f64()?,
        array.get(2)?.as_f64()?,
    ])
}
