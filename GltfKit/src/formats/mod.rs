//! File format handlers
//!
//! - [`gltf`] - the glTF asset model the pipeline reads and rewrites
//! - [`glb`] - the binary glTF container

pub mod glb;
pub mod gltf;

pub use glb::{BinaryGltf, GlbOptions, GlbResources, get_binary_gltf, parse_binary_gltf};
pub use gltf::{GltfAsset, Material};
