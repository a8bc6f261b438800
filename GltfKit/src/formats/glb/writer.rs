//! Binary glTF assembly

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::formats::gltf::GltfAsset;

use super::{
    BINARY_BUFFER_ID, BinaryGltf, BodyEntry, GLB_MAGIC, GLB_VERSION, GlbOptions, GlbResources,
    HEADER_SIZE, ResourceKind, SCENE_FORMAT_JSON,
};

/// Frame a scene description and its resources into one container.
///
/// The body holds the primary buffer, then the shaders when
/// `embed_auxiliary` is set, then the images when `embed_images` is set.
///
/// # Errors
/// Returns an error if the scene cannot be serialized or the container would
/// not fit the 32-bit length fields.
pub fn get_binary_gltf<S: Serialize + ?Sized>(
    scene: &S,
    resources: &GlbResources,
    options: GlbOptions,
) -> Result<BinaryGltf> {
    let scene = pad_scene(serde_json::to_vec(scene)?);

    let mut body = BodyBuilder::default();
    body.push(BINARY_BUFFER_ID, ResourceKind::Buffer, &resources.buffer);
    if options.embed_auxiliary {
        for shader in &resources.shaders {
            body.push(&shader.name, ResourceKind::Shader, &shader.data);
        }
    }
    if options.embed_images {
        for image in &resources.images {
            body.push(&image.name, ResourceKind::Image, &image.data);
        }
    }

    let total_len = HEADER_SIZE + scene.len() + body.data.len();
    let header = write_header(total_len, scene.len())?;

    tracing::debug!(
        "Assembled binary glTF: {} byte scene, {} byte body, {} entries",
        scene.len(),
        body.data.len(),
        body.entries.len()
    );

    Ok(BinaryGltf {
        header,
        scene,
        body: body.data,
        entries: body.entries,
    })
}

impl GltfAsset {
    /// Frame this asset as the scene of a binary glTF container.
    ///
    /// # Errors
    /// See [`get_binary_gltf`].
    pub fn to_binary_gltf(
        &self,
        resources: &GlbResources,
        options: GlbOptions,
    ) -> Result<BinaryGltf> {
        get_binary_gltf(self, resources, options)
    }
}

/// Right-pad JSON with spaces to the next multiple of 4.
fn pad_scene(mut json: Vec<u8>) -> Vec<u8> {
    let padding = (4 - (json.len() % 4)) % 4;
    json.extend(std::iter::repeat_n(b' ', padding));
    json
}

fn write_header(total_len: usize, scene_len: usize) -> Result<[u8; HEADER_SIZE]> {
    let total = u32::try_from(total_len).map_err(|_| Error::ContainerTooLarge {
        resource: "container".to_string(),
        length: total_len,
    })?;
    // Scene is part of the total, so it fits whenever the total does
    let scene = u32::try_from(scene_len).map_err(|_| Error::ContainerTooLarge {
        resource: "scene".to_string(),
        length: scene_len,
    })?;

    let mut header = [0u8; HEADER_SIZE];
    let mut writer = &mut header[..];
    writer.write_all(&GLB_MAGIC)?;
    writer.write_u32::<LittleEndian>(GLB_VERSION)?;
    writer.write_u32::<LittleEndian>(total)?;
    writer.write_u32::<LittleEndian>(scene)?;
    writer.write_u32::<LittleEndian>(SCENE_FORMAT_JSON)?;
    Ok(header)
}

#[derive(Default)]
struct BodyBuilder {
    data: Vec<u8>,
    entries: Vec<BodyEntry>,
}

impl BodyBuilder {
    fn push(&mut self, name: &str, kind: ResourceKind, bytes: &[u8]) {
        tracing::debug!(
            "Embedding {:?} '{}' ({} bytes) at {}",
            kind,
            name,
            bytes.len(),
            self.data.len()
        );
        self.entries.push(BodyEntry {
            name: name.to_string(),
            kind,
            byte_offset: self.data.len(),
            byte_length: bytes.len(),
        });
        self.data.extend_from_slice(bytes);
    }
}
