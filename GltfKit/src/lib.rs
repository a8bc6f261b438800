//! # GltfKit
//!
//! In-memory transformation passes for glTF assets.
//!
//! ## Features
//!
//! - **Texture discovery** - walk every texture reference on a material,
//!   across the core PBR block and the specular-glossiness, specular,
//!   materials-common and techniques extensions
//! - **Skinning accessor normalization** - re-encode `JOINTS_0` and
//!   `WEIGHTS_0` accessors into unsigned integer components
//! - **Binary glTF** - frame the scene JSON and its buffer, shaders and images
//!   into one version 1 container
//!
//! File and URI loading stay with the caller: buffers, shaders and images are
//! handed over as already-resolved bytes.
//!
//! ## Quick Start
//!
//! ```
//! use gltfkit::prelude::*;
//!
//! let json = br#"{
//!     "asset": { "version": "2.0" },
//!     "buffers": [{ "byteLength": 4 }]
//! }"#;
//! let mut asset = GltfAsset::from_json_slice(json)?;
//! asset.buffers[0].data = vec![0, 1, 2, 3];
//!
//! update_accessor_component_types(&mut asset)?;
//!
//! let resources = GlbResources::with_buffer(asset.buffers[0].data.clone());
//! let glb = asset.to_binary_gltf(&resources, GlbOptions::embed_all())?;
//! assert_eq!(&glb.header()[0..4], b"glTF");
//! # Ok::<(), gltfkit::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod formats;
pub mod pipeline;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{AccessorConfig, PipelineConfig};
    pub use crate::error::{Error, Result};
    pub use crate::formats::glb::{
        BinaryGltf, BinaryGltfView, BodyEntry, GlbOptions, GlbResources, NamedResource,
        ResourceKind, get_binary_gltf, parse_binary_gltf,
    };
    pub use crate::formats::gltf::{
        AccessorType, ComponentType, GltfAccessor, GltfAsset, GltfBuffer, GltfBufferView, Material,
        TextureInfo,
    };
    pub use crate::pipeline::{
        AttributeRole, NormalizeReport, for_each_texture_in_material, texture_indices_in_material,
        update_accessor_component_types,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
