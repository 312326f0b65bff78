//! Byte layout of the single packed buffer a mesh lives in.
//!
//! One GPU buffer holds every attribute stream of a mesh back to back:
//! positions, then indices (when present), then texture coordinates, then
//! normals (when present). The layout is derived once from the parsed asset
//! and shared between the builder that fills the buffer and the renderer
//! that binds slices of it, so the offset arithmetic exists in one place.

use crate::data_structures::model::MeshAsset;

/// Segment starts must satisfy wgpu's vertex-buffer offset alignment.
const SEGMENT_ALIGN: u64 = wgpu::COPY_BUFFER_ALIGNMENT;

/// The attribute streams a packed buffer can contain, in packing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    Positions,
    Indices,
    TexCoords,
    Normals,
}

/// Ordered (segment, byte length) pairs with offsets derived once.
///
/// Offsets are stable for the life of the layout and deterministic per
/// asset: building the layout twice for the same asset yields identical
/// offsets, which the eviction/reload cycle depends on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedLayout {
    segments: Vec<(Segment, u64)>,
}

impl PackedLayout {
    /// Derive the layout for a parsed asset.
    pub fn for_asset(asset: &MeshAsset) -> Self {
        let mut segments = vec![(
            Segment::Positions,
            std::mem::size_of_val(asset.positions.as_slice()) as u64,
        )];
        if let Some(indices) = &asset.indices {
            segments.push((Segment::Indices, std::mem::size_of_val(indices.as_slice()) as u64));
        }
        segments.push((
            Segment::TexCoords,
            std::mem::size_of_val(asset.tex_coords.as_slice()) as u64,
        ));
        if let Some(normals) = &asset.normals {
            segments.push((Segment::Normals, std::mem::size_of_val(normals.as_slice()) as u64));
        }
        Self { segments }
    }

    /// Starting byte offset of a segment, `None` when the asset lacks it.
    pub fn offset(&self, segment: Segment) -> Option<u64> {
        let mut cursor = 0u64;
        for (kind, len) in &self.segments {
            cursor = align_up(cursor, SEGMENT_ALIGN);
            if *kind == segment {
                return Some(cursor);
            }
            cursor += len;
        }
        None
    }

    /// Byte length of a segment, `None` when the asset lacks it.
    pub fn len(&self, segment: Segment) -> Option<u64> {
        self.segments
            .iter()
            .find(|(kind, _)| *kind == segment)
            .map(|(_, len)| *len)
    }

    /// Byte range of a segment within the packed buffer.
    pub fn range(&self, segment: Segment) -> Option<std::ops::Range<u64>> {
        let offset = self.offset(segment)?;
        Some(offset..offset + self.len(segment)?)
    }

    /// Total packed size: the sum of all segment lengths plus any alignment
    /// padding between them.
    pub fn total_len(&self) -> u64 {
        let mut cursor = 0u64;
        for (_, len) in &self.segments {
            cursor = align_up(cursor, SEGMENT_ALIGN) + len;
        }
        cursor
    }

    /// Fill one contiguous byte vector according to the layout.
    ///
    /// Padding bytes between segments stay zero. The result is exactly
    /// `total_len` bytes and is what gets uploaded verbatim.
    pub fn pack(&self, asset: &MeshAsset) -> Vec<u8> {
        let mut bytes = vec![0u8; self.total_len() as usize];
        for (kind, _) in &self.segments {
            let range = self.range(*kind).expect("segment comes from this layout");
            let range = range.start as usize..range.end as usize;
            match kind {
                Segment::Positions => {
                    bytes[range].copy_from_slice(bytemuck::cast_slice(&asset.positions));
                }
                Segment::Indices => {
                    let indices = asset.indices.as_ref().expect("layout lists indices");
                    bytes[range].copy_from_slice(bytemuck::cast_slice(indices));
                }
                Segment::TexCoords => {
                    bytes[range].copy_from_slice(bytemuck::cast_slice(&asset.tex_coords));
                }
                Segment::Normals => {
                    let normals = asset.normals.as_ref().expect("layout lists normals");
                    bytes[range].copy_from_slice(bytemuck::cast_slice(normals));
                }
            }
        }
        bytes
    }
}

fn align_up(value: u64, align: u64) -> u64 {
    value.div_ceil(align) * align
}
