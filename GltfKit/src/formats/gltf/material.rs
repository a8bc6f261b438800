//! glTF material and texture-info views.
//!
//! Materials are kept as open JSON objects: the core PBR block, legacy
//! technique values and any number of extension schemas can sit side by side
//! on one material, and each of them nests texture-info records differently.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A material, as the field-named JSON object found in the asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Material {
    pub fields: Map<String, Value>,
}

impl Material {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, if it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Follow a chain of object members, e.g. `["extensions", "KHR_materials_specular"]`.
    ///
    /// Returns `None` as soon as a member is missing or a step is not an object.
    #[must_use]
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.fields.get(*first)?;
        for key in rest {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }

    /// The data of a named extension, if present and an object.
    #[must_use]
    pub fn extension(&self, name: &str) -> Option<&Map<String, Value>> {
        self.lookup(&["extensions", name]).and_then(Value::as_object)
    }
}

/// Borrowed view over a texture-info record.
///
/// Carries at least `index`; may carry `texCoord`, `scale`, `strength` or
/// extension-specific members, all reachable through [`get`](Self::get).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureInfo<'a> {
    record: &'a Map<String, Value>,
}

impl<'a> TextureInfo<'a> {
    #[must_use]
    pub fn new(record: &'a Map<String, Value>) -> Self {
        Self { record }
    }

    /// The texture index, when it is a non-negative integer.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.record
            .get("index")
            .and_then(Value::as_u64)
            .and_then(|index| usize::try_from(index).ok())
    }

    /// The texture coordinate set, defaulting to 0.
    #[must_use]
    pub fn tex_coord(&self) -> u64 {
        self.record
            .get("texCoord")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.record.get(key)
    }
}

/// Calls `handler` on each technique value of the material, in declaration
/// order, with the value and its parameter name.
///
/// Values come from `extensions.KHR_techniques_webgl.values` when that
/// extension is present, otherwise from the material's own `values` member.
/// Stops at the first `Break` and returns its payload.
pub fn for_each_material_value<'a, T, F>(material: &'a Material, mut handler: F) -> Option<T>
where
    F: FnMut(&'a Value, &'a str) -> ControlFlow<T>,
{
    let values = if let Some(techniques) = material.extension("KHR_techniques_webgl") {
        techniques.get("values")
    } else {
        material.fields.get("values")
    };

    let values = values.and_then(Value::as_object)?;
    for (name, value) in values {
        if let ControlFlow::Break(result) = handler(value, name) {
            return Some(result);
        }
    }
    None
}
