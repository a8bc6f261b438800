//! Reading and extending a [`GltfAsset`].

use std::collections::HashSet;
use std::fmt;

use serde_json::Map;

use crate::error::{Error, Result};

use super::component::{AccessorType, ComponentType};
use super::types::{GltfAccessor, GltfAsset, GltfBuffer, GltfBufferView};

/// Largest buffer a binary container can address.
const MAX_ACCESSOR_BYTES: usize = u32::MAX as usize;

/// Where an attribute semantic was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticAccessor {
    pub accessor: usize,
    pub mesh: usize,
    pub primitive: usize,
    /// Morph target index, `None` for the primitive's own attributes.
    pub target: Option<usize>,
    pub semantic: String,
}

impl fmt::Display for SemanticAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh {} primitive {}", self.mesh, self.primitive)?;
        if let Some(target) = self.target {
            write!(f, " target {target}")?;
        }
        write!(f, " {}", self.semantic)
    }
}

impl GltfAsset {
    /// Parse an asset from glTF JSON. Buffer bytes are left empty.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a modelled field has the wrong shape.
    pub fn from_json_slice(json: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(json)?)
    }

    /// Serialize the asset back to compact glTF JSON.
    ///
    /// # Errors
    /// Returns an error if JSON serialization fails.
    pub fn to_json_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Accessors bound to attributes whose semantic starts with `semantic`.
    ///
    /// Walks every mesh primitive's attributes, then its morph targets. Each
    /// accessor is reported once, at its first use.
    #[must_use]
    pub fn accessors_with_semantic(&self, semantic: &str) -> Vec<SemanticAccessor> {
        let mut visited = HashSet::new();
        let mut found = Vec::new();

        for (mesh_idx, mesh) in self.meshes.iter().enumerate() {
            for (prim_idx, primitive) in mesh.primitives.iter().enumerate() {
                let targets = primitive.targets.iter().enumerate().map(|(i, t)| (Some(i), t));
                let own = std::iter::once((None, &primitive.attributes));
                for (target, attributes) in own.chain(targets) {
                    for (name, &accessor) in attributes {
                        if name.starts_with(semantic) && visited.insert(accessor) {
                            found.push(SemanticAccessor {
                                accessor,
                                mesh: mesh_idx,
                                primitive: prim_idx,
                                target,
                                semantic: name.clone(),
                            });
                        }
                    }
                }
            }
        }

        found
    }

    /// Append `bytes` as a new buffer and cover it with a new buffer view.
    ///
    /// Existing buffers and views are untouched. Returns the buffer view index.
    pub fn add_buffer(&mut self, bytes: Vec<u8>) -> usize {
        let byte_length = bytes.len();
        self.buffers.push(GltfBuffer::from_bytes(bytes));
        let buffer = self.buffers.len() - 1;

        self.buffer_views.push(GltfBufferView {
            buffer,
            byte_offset: 0,
            byte_length,
            byte_stride: None,
            target: None,
            other: Map::new(),
        });
        self.buffer_views.len() - 1
    }

    /// Look up an accessor by id.
    ///
    /// # Errors
    /// Returns [`Error::MissingAccessor`] naming `referenced_by`.
    pub fn accessor(
        &self,
        accessor: usize,
        referenced_by: &dyn fmt::Display,
    ) -> Result<&GltfAccessor> {
        self.accessors.get(accessor).ok_or_else(|| Error::MissingAccessor {
            accessor,
            referenced_by: referenced_by.to_string(),
        })
    }

    /// The resolved bytes a buffer view covers, on behalf of `accessor`.
    fn buffer_view_bytes(
        &self,
        accessor: usize,
        buffer_view: usize,
    ) -> Result<(&GltfBufferView, &[u8])> {
        let view = self
            .buffer_views
            .get(buffer_view)
            .ok_or(Error::MissingBufferView { accessor, buffer_view })?;
        let buffer = self.buffers.get(view.buffer).ok_or(Error::MissingBuffer {
            buffer_view,
            buffer: view.buffer,
        })?;

        let end = view.byte_offset.saturating_add(view.byte_length);
        let bytes = buffer.data.get(view.byte_offset..end).ok_or(Error::BufferViewOutOfBounds {
            buffer_view,
            buffer: view.buffer,
            required: end,
            available: buffer.data.len(),
        })?;
        Ok((view, bytes))
    }

    /// Classify an accessor's component and structural types.
    ///
    /// # Errors
    /// Returns an error if either is outside what the datatype primitive supports.
    pub fn accessor_layout(&self, accessor: usize) -> Result<(ComponentType, AccessorType)> {
        let acc = self.accessor(accessor, &"accessor layout")?;
        let component_type =
            ComponentType::from_gl(acc.component_type).ok_or(Error::UnsupportedComponentType {
                accessor,
                component_type: acc.component_type,
            })?;
        let accessor_type = AccessorType::from_name(&acc.accessor_type).ok_or_else(|| {
            Error::UnsupportedAccessorType {
                accessor,
                accessor_type: acc.accessor_type.clone(),
            }
        })?;
        Ok((component_type, accessor_type))
    }

    /// Read every component of an accessor into a flat, packed sequence.
    ///
    /// Honours the buffer view's `byteStride` and the accessor's `byteOffset`.
    /// Values are the raw component values; `normalized` does not rescale them.
    /// An accessor without a buffer view reads as zeros.
    ///
    /// # Errors
    /// Returns an error for dangling references, unsupported types, data that
    /// does not fit inside its buffer view, or a view-less accessor larger
    /// than any buffer could hold.
    pub fn read_accessor_packed(&self, accessor: usize) -> Result<Vec<f64>> {
        let (component_type, accessor_type) = self.accessor_layout(accessor)?;
        let acc = &self.accessors[accessor];
        let components = accessor_type.component_count();
        let element_size = components * component_type.size_in_bytes();

        let Some(buffer_view) = acc.buffer_view else {
            let fits = acc
                .count
                .checked_mul(element_size)
                .is_some_and(|len| len <= MAX_ACCESSOR_BYTES);
            if !fits {
                return Err(Error::AccessorTooLarge {
                    accessor,
                    count: acc.count,
                });
            }
            return Ok(vec![0.0; acc.count * components]);
        };
        let (view, bytes) = self.buffer_view_bytes(accessor, buffer_view)?;

        let stride = view.byte_stride.filter(|&s| s > 0).unwrap_or(element_size);

        if acc.count > 0 {
            // usize::MAX stands in for a span that does not even fit in memory
            let required = stride
                .checked_mul(acc.count - 1)
                .and_then(|span| span.checked_add(acc.byte_offset))
                .and_then(|span| span.checked_add(element_size))
                .unwrap_or(usize::MAX);
            if required > bytes.len() {
                return Err(Error::AccessorOutOfBounds {
                    accessor,
                    buffer_view,
                    required,
                    available: bytes.len(),
                });
            }
        }

        let mut values = Vec::with_capacity(acc.count * components);
        for i in 0..acc.count {
            let start = acc.byte_offset + i * stride;
            values.extend(component_type.decode(&bytes[start..start + element_size]));
        }
        Ok(values)
    }
}
