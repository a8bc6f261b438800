//! Asset transformation passes
//!
//! - [`textures`] - find every texture a material references
//! - [`accessors`] - normalize joint and weight accessor encodings

pub mod accessors;
pub mod textures;

pub use accessors::{
    AttributeRole, ComponentConversion, NormalizeReport, update_accessor_component_types,
    update_accessor_component_types_for,
};
pub use textures::{for_each_texture_in_material, texture_indices_in_material};
