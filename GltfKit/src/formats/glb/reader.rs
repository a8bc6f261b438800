//! Binary glTF reading

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};

use super::{GLB_MAGIC, GLB_VERSION, HEADER_SIZE, SCENE_FORMAT_JSON};

/// A parsed container, borrowing from the input bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryGltfView<'a> {
    pub version: u32,
    /// Scene chunk including padding.
    pub scene: &'a [u8],
    pub body: &'a [u8],
}

impl<'a> BinaryGltfView<'a> {
    /// Scene JSON with the trailing space padding stripped.
    #[must_use]
    pub fn scene_json(&self) -> &'a [u8] {
        let end = self
            .scene
            .iter()
            .rposition(|&b| b != b' ')
            .map_or(0, |i| i + 1);
        &self.scene[..end]
    }

    /// Parse the scene chunk.
    ///
    /// # Errors
    /// Returns an error if the scene is not valid JSON.
    pub fn scene_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(self.scene_json())?)
    }
}

/// Parse a binary glTF container.
///
/// # Errors
///
/// Returns [`Error::InvalidGlbMagic`] if the data does not start with `glTF`.
/// Returns [`Error::UnsupportedGlbVersion`] for any version other than 1.
/// Returns [`Error::UnsupportedSceneFormat`] if the scene is not tagged as JSON.
/// Returns [`Error::GlbLengthMismatch`] if the header lengths disagree with the data.
///
/// [`Error::InvalidGlbMagic`]: crate::Error::InvalidGlbMagic
/// [`Error::UnsupportedGlbVersion`]: crate::Error::UnsupportedGlbVersion
/// [`Error::UnsupportedSceneFormat`]: crate::Error::UnsupportedSceneFormat
/// [`Error::GlbLengthMismatch`]: crate::Error::GlbLengthMismatch
pub fn parse_binary_gltf(data: &[u8]) -> Result<BinaryGltfView<'_>> {
    if data.len() < HEADER_SIZE {
        return Err(Error::GlbLengthMismatch {
            message: format!("{} bytes is shorter than the {HEADER_SIZE} byte header", data.len()),
        });
    }

    let mut cursor = Cursor::new(data);

    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    if magic != GLB_MAGIC {
        return Err(Error::InvalidGlbMagic(magic));
    }

    let version = cursor.read_u32::<LittleEndian>()?;
    if version != GLB_VERSION {
        return Err(Error::UnsupportedGlbVersion { version });
    }

    let total_len = cursor.read_u32::<LittleEndian>()? as usize;
    let scene_len = cursor.read_u32::<LittleEndian>()? as usize;
    let format = cursor.read_u32::<LittleEndian>()?;

    if format != SCENE_FORMAT_JSON {
        return Err(Error::UnsupportedSceneFormat { format });
    }
    if total_len != data.len() {
        return Err(Error::GlbLengthMismatch {
            message: format!("header says {total_len} bytes, data is {} bytes", data.len()),
        });
    }
    let scene_end = HEADER_SIZE + scene_len;
    if scene_end > total_len {
        return Err(Error::GlbLengthMismatch {
            message: format!(
                "scene chunk of {scene_len} bytes overruns {total_len} byte container"
            ),
        });
    }

    Ok(BinaryGltfView {
        version,
        scene: &data[HEADER_SIZE..scene_end],
        body: &data[scene_end..],
    })
}
