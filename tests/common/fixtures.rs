//! Synthesized glTF fixtures.
//!
//! Tests build tiny but complete glTF assets in memory instead of committing
//! binary files: a GLB container (JSON chunk + BIN chunk) or a textual
//! `.gltf` document with a sibling `.bin`, with every stream optional so
//! each loader failure mode can be produced on purpose.

use std::{
    io::Cursor,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU32, Ordering},
};

use serde_json::json;

const GLB_MAGIC: u32 = 0x4654_6C67;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

/// Component type constants from the glTF spec.
const FLOAT: u32 = 5126;
const UNSIGNED_SHORT: u32 = 5123;
const UNSIGNED_INT: u32 = 5125;

/// A configurable single-primitive glTF asset.
pub struct GltfFixture {
    pub positions: Vec<[f32; 3]>,
    pub indices: Option<Vec<u16>>,
    /// Force 32-bit indices to provoke the oversized-index error path.
    pub wide_indices: Option<Vec<u32>>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub with_image: bool,
    /// Declare accessor min/max extents for positions.
    pub declare_extents: bool,
    /// Drop the POSITION attribute entirely.
    pub omit_positions: bool,
    /// How many copies of the mesh the container declares.
    pub mesh_count: usize,
}

impl Default for GltfFixture {
    fn default() -> Self {
        Self::triangle()
    }
}

impl GltfFixture {
    /// One indexed, textured, lit triangle with declared extents.
    pub fn triangle() -> Self {
        Self {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            indices: Some(vec![0, 1, 2]),
            wide_indices: None,
            tex_coords: Some(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
            normals: Some(vec![[0.0, 0.0, 1.0]; 3]),
            with_image: true,
            declare_extents: true,
            omit_positions: false,
            mesh_count: 1,
        }
    }

    /// Two triangles sharing four vertices; even index count.
    pub fn quad() -> Self {
        Self {
            positions: vec![
                [-1.0, -1.0, 0.0],
                [1.0, -1.0, 0.0],
                [1.0, 1.0, 0.0],
                [-1.0, 1.0, 0.0],
            ],
            indices: Some(vec![0, 1, 2, 0, 2, 3]),
            tex_coords: Some(vec![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]),
            normals: Some(vec![[0.0, 0.0, 1.0]; 4]),
            ..Self::triangle()
        }
    }

    /// Serialize as a binary GLB container.
    pub fn to_glb(&self) -> Vec<u8> {
        let (mut document, bin) = self.build(None);
        document["buffers"] = json!([{ "byteLength": bin.len() }]);

        let mut json_chunk = serde_json::to_vec(&document).expect("fixture json serializes");
        while json_chunk.len() % 4 != 0 {
            json_chunk.push(b' ');
        }
        let mut bin_chunk = bin;
        while bin_chunk.len() % 4 != 0 {
            bin_chunk.push(0);
        }

        let total = 12 + 8 + json_chunk.len() + 8 + bin_chunk.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        glb.extend_from_slice(&json_chunk);
        glb.extend_from_slice(&(bin_chunk.len() as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        glb.extend_from_slice(&bin_chunk);
        glb
    }

    /// Serialize as a textual `.gltf` document plus its sibling buffer.
    pub fn to_gltf_pair(&self, bin_name: &str) -> (String, Vec<u8>) {
        let (mut document, bin) = self.build(Some(bin_name));
        document["buffers"] = json!([{ "uri": bin_name, "byteLength": bin.len() }]);
        let text = serde_json::to_string_pretty(&document).expect("fixture json serializes");
        (text, bin)
    }

    /// Write a `.glb` into `dir` and return its path.
    pub fn write_glb(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.to_glb()).expect("fixture written");
        path
    }

    /// Write a `.gltf` + `.bin` pair into `dir` and return the `.gltf` path.
    pub fn write_gltf(&self, dir: &Path, name: &str, bin_name: &str) -> PathBuf {
        let (text, bin) = self.to_gltf_pair(bin_name);
        let path = dir.join(name);
        std::fs::write(&path, text).expect("fixture written");
        std::fs::write(dir.join(bin_name), bin).expect("fixture buffer written");
        path
    }

    /// Build the JSON document (without `buffers`) and the binary payload.
    fn build(&self, _bin_name: Option<&str>) -> (serde_json::Value, Vec<u8>) {
        let mut bin: Vec<u8> = Vec::new();
        let mut buffer_views = Vec::new();
        let mut accessors = Vec::new();
        let mut attributes = serde_json::Map::new();
        let mut primitive = serde_json::Map::new();

        let mut push_view = |bin: &mut Vec<u8>, bytes: &[u8]| {
            while bin.len() % 4 != 0 {
                bin.push(0);
            }
            let offset = bin.len();
            bin.extend_from_slice(bytes);
            buffer_views.push(json!({
                "buffer": 0,
                "byteOffset": offset,
                "byteLength": bytes.len(),
            }));
            buffer_views.len() - 1
        };

        if !self.omit_positions {
            let view = push_view(&mut bin, bytemuck::cast_slice(&self.positions));
            let mut accessor = json!({
                "bufferView": view,
                "componentType": FLOAT,
                "count": self.positions.len(),
                "type": "VEC3",
            });
            if self.declare_extents {
                let (min, max) = extents(&self.positions);
                accessor["min"] = json!(min);
                accessor["max"] = json!(max);
            }
            accessors.push(accessor);
            attributes.insert("POSITION".into(), json!(accessors.len() - 1));
        }

        if let Some(indices) = &self.indices {
            let view = push_view(&mut bin, bytemuck::cast_slice(indices));
            accessors.push(json!({
                "bufferView": view,
                "componentType": UNSIGNED_SHORT,
                "count": indices.len(),
                "type": "SCALAR",
            }));
            primitive.insert("indices".into(), json!(accessors.len() - 1));
        } else if let Some(indices) = &self.wide_indices {
            let view = push_view(&mut bin, bytemuck::cast_slice(indices));
            accessors.push(json!({
                "bufferView": view,
                "componentType": UNSIGNED_INT,
                "count": indices.len(),
                "type": "SCALAR",
            }));
            primitive.insert("indices".into(), json!(accessors.len() - 1));
        }

        if let Some(tex_coords) = &self.tex_coords {
            let view = push_view(&mut bin, bytemuck::cast_slice(tex_coords));
            accessors.push(json!({
                "bufferView": view,
                "componentType": FLOAT,
                "count": tex_coords.len(),
                "type": "VEC2",
            }));
            attributes.insert("TEXCOORD_0".into(), json!(accessors.len() - 1));
        }

        if let Some(normals) = &self.normals {
            let view = push_view(&mut bin, bytemuck::cast_slice(normals));
            accessors.push(json!({
                "bufferView": view,
                "componentType": FLOAT,
                "count": normals.len(),
                "type": "VEC3",
            }));
            attributes.insert("NORMAL".into(), json!(accessors.len() - 1));
        }

        let mut document = json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "nodes": [0] }],
            "nodes": [{ "mesh": 0 }],
        });

        if self.with_image {
            let view = push_view(&mut bin, &test_png());
            document["images"] = json!([{ "bufferView": view, "mimeType": "image/png" }]);
            document["textures"] = json!([{ "source": 0 }]);
            document["materials"] = json!([{
                "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } }
            }]);
            primitive.insert("material".into(), json!(0));
        }

        primitive.insert("attributes".into(), serde_json::Value::Object(attributes));
        primitive.insert("mode".into(), json!(4));
        let mesh = json!({ "primitives": [serde_json::Value::Object(primitive)] });
        document["meshes"] = json!(vec![mesh; self.mesh_count.max(1)]);
        document["bufferViews"] = json!(buffer_views);
        document["accessors"] = json!(accessors);

        (document, bin)
    }
}

fn extents(positions: &[[f32; 3]]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    for position in positions {
        for axis in 0..3 {
            min[axis] = min[axis].min(position[axis]);
            max[axis] = max[axis].max(position[axis]);
        }
    }
    (min, max)
}

/// A 2x2 checker PNG.
pub fn test_png() -> Vec<u8> {
    let mut image = image::RgbaImage::new(2, 2);
    image.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    image.put_pixel(1, 0, image::Rgba([0, 255, 0, 255]));
    image.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
    image.put_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("png encodes");
    bytes
}

/// A fresh scratch directory under the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let dir = std::env::temp_dir().join(format!(
        "mesh-layer-test-{}-{}-{}",
        std::process::id(),
        name,
        COUNTER.fetch_add(1, Ordering::Relaxed),
    ));
    std::fs::create_dir_all(&dir).expect("temp dir created");
    dir
}
