//! Pipeline configuration
//!
//! Read from TOML; every key is optional.
//!
//! ```toml
//! [accessors]
//! joints = true
//! weights = true
//!
//! [glb]
//! embed_auxiliary = false
//! embed_images = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::formats::glb::{BinaryGltf, GlbOptions, GlbResources, get_binary_gltf};
use crate::formats::gltf::GltfAsset;
use crate::pipeline::{AttributeRole, NormalizeReport, update_accessor_component_types_for};

/// Which skinning attributes get their component types normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessorConfig {
    pub joints: bool,
    pub weights: bool,
}

impl Default for AccessorConfig {
    fn default() -> Self {
        Self {
            joints: true,
            weights: true,
        }
    }
}

impl AccessorConfig {
    /// Enabled roles, joints first.
    #[must_use]
    pub fn roles(&self) -> Vec<AttributeRole> {
        let mut roles = Vec::with_capacity(2);
        if self.joints {
            roles.push(AttributeRole::Joints);
        }
        if self.weights {
            roles.push(AttributeRole::Weights);
        }
        roles
    }
}

/// Settings for a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub accessors: AccessorConfig,
    pub glb: GlbOptions,
}

impl PipelineConfig {
    /// Parse a configuration from TOML.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the TOML is malformed.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Normalize skinning accessors for the enabled roles.
    ///
    /// # Errors
    /// See [`update_accessor_component_types`](crate::pipeline::update_accessor_component_types).
    pub fn normalize(&self, asset: &mut GltfAsset) -> Result<NormalizeReport> {
        update_accessor_component_types_for(asset, &self.accessors.roles())
    }

    /// Assemble a container with the configured embedding policy.
    ///
    /// # Errors
    /// See [`get_binary_gltf`].
    pub fn assemble<S: Serialize + ?Sized>(
        &self,
        scene: &S,
        resources: &GlbResources,
    ) -> Result<BinaryGltf> {
        get_binary_gltf(scene, resources, self.glb)
    }
}
