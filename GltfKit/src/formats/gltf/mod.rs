//! glTF asset model.
//!
//! An in-memory view of the tables the pipeline works on: materials, meshes,
//! accessors, buffer views and buffers (with their resolved bytes).

mod asset;
pub mod component;
mod material;
mod types;

pub use asset::SemanticAccessor;
pub use component::{AccessorType, ComponentType};
pub use material::{Material, TextureInfo, for_each_material_value};
pub use types::{GltfAccessor, GltfAsset, GltfBuffer, GltfBufferView, GltfMesh, GltfPrimitive};
