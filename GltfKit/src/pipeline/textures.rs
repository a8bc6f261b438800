//! Texture discovery across material schemas.
//!
//! A material can reference textures from its core PBR block, from several
//! extension blocks at once, from legacy technique values and from its
//! top-level slots. The places to look are listed in one ordered table so the
//! visiting order (and with it "first match" results) stays fixed.

use std::ops::ControlFlow;

use serde_json::Value;

use crate::formats::gltf::{GltfAsset, Material, TextureInfo, for_each_material_value};

/// One place a texture reference can live.
enum TextureRule {
    /// A texture-info object at a fixed path.
    Slot(&'static [&'static str]),
    /// A value at a fixed path that is a texture only when it is an object
    /// carrying `index`; plain colour values are skipped.
    IndexedValue(&'static [&'static str]),
    /// Technique values that are objects carrying `index`.
    TechniqueValues,
}

const TEXTURE_RULES: &[TextureRule] = &[
    TextureRule::Slot(&["pbrMetallicRoughness", "baseColorTexture"]),
    TextureRule::Slot(&["pbrMetallicRoughness", "metallicRoughnessTexture"]),
    TextureRule::Slot(&["extensions", "KHR_materials_pbrSpecularGlossiness", "diffuseTexture"]),
    TextureRule::Slot(&[
        "extensions",
        "KHR_materials_pbrSpecularGlossiness",
        "specularGlossinessTexture",
    ]),
    TextureRule::Slot(&["extensions", "KHR_materials_specular", "specularTexture"]),
    TextureRule::Slot(&["extensions", "KHR_materials_specular", "specularColorTexture"]),
    TextureRule::IndexedValue(&["extensions", "KHR_materials_common", "values", "diffuse"]),
    TextureRule::IndexedValue(&["extensions", "KHR_materials_common", "values", "ambient"]),
    TextureRule::IndexedValue(&["extensions", "KHR_materials_common", "values", "emission"]),
    TextureRule::IndexedValue(&["extensions", "KHR_materials_common", "values", "specular"]),
    TextureRule::TechniqueValues,
    TextureRule::Slot(&["emissiveTexture"]),
    TextureRule::Slot(&["normalTexture"]),
    TextureRule::Slot(&["occlusionTexture"]),
];

/// Calls `handler` on each texture referenced by `material`.
///
/// The handler receives the texture index and the texture-info record it was
/// found in. Returning `ControlFlow::Break(value)` stops the walk and makes
/// `Some(value)` the result; if every call continues, the result is `None`.
///
/// Order: `pbrMetallicRoughness` (base colour, metallic-roughness),
/// `KHR_materials_pbrSpecularGlossiness` (diffuse, specular-glossiness),
/// `KHR_materials_specular` (specular, specular colour),
/// `KHR_materials_common` values (diffuse, ambient, emission, specular),
/// technique values, then `emissiveTexture`, `normalTexture`,
/// `occlusionTexture`. Missing fields are skipped.
///
/// The handler is only called with a usable index. A slot that is present
/// but is not an object, or whose `index` is missing or not a non-negative
/// integer, is skipped with a warning. Extension and technique values that
/// carry no `index` are plain parameters and are skipped silently.
pub fn for_each_texture_in_material<'a, T, F>(material: &'a Material, mut handler: F) -> Option<T>
where
    F: FnMut(usize, TextureInfo<'a>) -> ControlFlow<T>,
{
    for rule in TEXTURE_RULES {
        let flow = match rule {
            TextureRule::Slot(path) => match material.lookup(path) {
                Some(value) => visit_texture_info(value, path, true, &mut handler),
                None => ControlFlow::Continue(()),
            },
            TextureRule::IndexedValue(path) => match material.lookup(path) {
                Some(value) => visit_texture_info(value, path, false, &mut handler),
                None => ControlFlow::Continue(()),
            },
            TextureRule::TechniqueValues => {
                match for_each_material_value(material, |value, name| {
                    visit_texture_info(value, &["values", name], false, &mut handler)
                }) {
                    Some(result) => ControlFlow::Break(result),
                    None => ControlFlow::Continue(()),
                }
            }
        };

        if let ControlFlow::Break(result) = flow {
            return Some(result);
        }
    }
    None
}

fn visit_texture_info<'a, T, F>(
    value: &'a Value,
    path: &[&str],
    is_slot: bool,
    handler: &mut F,
) -> ControlFlow<T>
where
    F: FnMut(usize, TextureInfo<'a>) -> ControlFlow<T>,
{
    let Some(record) = value.as_object() else {
        if is_slot && !value.is_null() {
            tracing::warn!("Skipping texture slot {} that is not an object", path.join("."));
        }
        return ControlFlow::Continue(());
    };

    let info = TextureInfo::new(record);
    if !is_slot && info.get("index").is_none_or(Value::is_null) {
        return ControlFlow::Continue(());
    }

    match info.index() {
        Some(index) => handler(index, info),
        None => {
            tracing::warn!("Skipping texture {} without a valid index", path.join("."));
            ControlFlow::Continue(())
        }
    }
}

/// Every texture index referenced by `material`, in visiting order.
///
/// A texture used by several slots appears once per slot.
#[must_use]
pub fn texture_indices_in_material(material: &Material) -> Vec<usize> {
    let mut indices = Vec::new();
    let _: Option<()> = for_each_texture_in_material(material, |index, _| {
        indices.push(index);
        ControlFlow::Continue(())
    });
    indices
}

impl GltfAsset {
    /// The first material (by index) that references `texture`.
    #[must_use]
    pub fn material_using_texture(&self, texture: usize) -> Option<usize> {
        self.materials.iter().position(|material| {
            for_each_texture_in_material(material, |index, _| {
                if index == texture {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .is_some()
        })
    }
}
