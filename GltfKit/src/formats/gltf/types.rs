//! Core glTF structure types.
//!
//! Only the tables the pipeline reads or rewrites are modelled. Every other
//! member is kept in a flattened `other` map so nothing is lost when the
//! asset is serialized again.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::material::Material;

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &usize) -> bool {
    *value == 0
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// Mesh primitive (geometry + material)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GltfPrimitive {
    #[serde(default)]
    pub attributes: IndexMap<String, usize>,
    /// Morph targets, each mapping a semantic to an accessor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<IndexMap<String, usize>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Mesh definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GltfMesh {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub primitives: Vec<GltfPrimitive>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Accessor for typed buffer data
///
/// `component_type` and `accessor_type` stay in their raw JSON form; they are
/// classified with [`ComponentType`](super::ComponentType) and
/// [`AccessorType`](super::AccessorType) only when the data is read, so an
/// unsupported value surfaces as an error naming the accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GltfAccessor {
    #[serde(rename = "bufferView")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_view: Option<usize>,
    #[serde(rename = "byteOffset")]
    #[serde(default, skip_serializing_if = "is_zero")]
    pub byte_offset: usize,
    #[serde(rename = "componentType")]
    pub component_type: u32,
    pub count: usize,
    #[serde(rename = "type")]
    pub accessor_type: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub normalized: bool,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Buffer view (slice of a buffer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GltfBufferView {
    pub buffer: usize,
    #[serde(rename = "byteOffset")]
    #[serde(default, skip_serializing_if = "is_zero")]
    pub byte_offset: usize,
    #[serde(rename = "byteLength")]
    pub byte_length: usize,
    #[serde(rename = "byteStride")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_stride: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Binary buffer
///
/// `data` holds the resolved bytes. Loading them from `uri` is the caller's
/// job; they are never written back into the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GltfBuffer {
    #[serde(rename = "byteLength")]
    pub byte_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl GltfBuffer {
    /// A buffer with no URI whose `byteLength` matches `data`.
    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            byte_length: data.len(),
            uri: None,
            other: Map::new(),
            data,
        }
    }
}

/// Complete glTF document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GltfAsset {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meshes: Vec<GltfMesh>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<GltfAccessor>,
    #[serde(rename = "bufferViews")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffer_views: Vec<GltfBufferView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffers: Vec<GltfBuffer>,
    /// `asset`, `scenes`, `nodes`, `textures`, `images` and anything else.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}
