//! Binary glTF container (version 1, `KHR_binary_glTF` layout)
//!
//! ```text
//! +--------------------------------------+
//! | magic "glTF"        (u32)            |
//! | version = 1         (u32)            |
//! | total length        (u32)            |
//! | scene length        (u32)  padded    |
//! | scene format = 0    (u32)  JSON      |
//! +--------------------------------------+
//! | scene JSON, space-padded to 4 bytes  |
//! +--------------------------------------+
//! | body: buffer, shaders, images        |
//! +--------------------------------------+
//! ```
//!
//! All integers are little-endian. Only the scene chunk is padded; body
//! entries are packed back to back.

mod reader;
mod writer;

use serde::{Deserialize, Serialize};

pub use reader::{BinaryGltfView, parse_binary_gltf};
pub use writer::get_binary_gltf;

/// "glTF" magic at the start of every container
pub const GLB_MAGIC: [u8; 4] = *b"glTF";

/// The only container version produced and accepted
pub const GLB_VERSION: u32 = 1;

/// Fixed header size in bytes
pub const HEADER_SIZE: usize = 20;

/// Scene format tag meaning "the scene chunk is JSON text"
pub const SCENE_FORMAT_JSON: u32 = 0;

/// Id of the buffer that refers to the container body
pub const BINARY_BUFFER_ID: &str = "binary_glTF";

/// What a body entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Buffer,
    Shader,
    Image,
}

/// Raw bytes of a shader or image, already resolved by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedResource {
    pub name: String,
    pub data: Vec<u8>,
}

impl NamedResource {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Every resource that may end up in the container body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlbResources {
    /// The asset's primary binary buffer. Always embedded.
    pub buffer: Vec<u8>,
    /// Shaders in declaration order (fragment before vertex).
    pub shaders: Vec<NamedResource>,
    /// Images in declaration order.
    pub images: Vec<NamedResource>,
}

impl GlbResources {
    /// Resources holding only the primary buffer.
    #[must_use]
    pub fn with_buffer(buffer: Vec<u8>) -> Self {
        Self {
            buffer,
            ..Self::default()
        }
    }

    /// Add a shader after the ones already present.
    #[must_use]
    pub fn shader(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.shaders.push(NamedResource::new(name, data));
        self
    }

    /// Add an image after the ones already present.
    #[must_use]
    pub fn image(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.images.push(NamedResource::new(name, data));
        self
    }
}

/// Embedding policy.
///
/// Every combination is valid. Resources left out are omitted from the body
/// entirely; the scene must already point at their external location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlbOptions {
    /// Embed shaders.
    pub embed_auxiliary: bool,
    /// Embed images.
    pub embed_images: bool,
}

impl GlbOptions {
    #[must_use]
    pub fn new(embed_auxiliary: bool, embed_images: bool) -> Self {
        Self {
            embed_auxiliary,
            embed_images,
        }
    }

    /// Embed everything.
    #[must_use]
    pub fn embed_all() -> Self {
        Self::new(true, true)
    }
}

/// Where a resource landed inside the body chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyEntry {
    pub name: String,
    pub kind: ResourceKind,
    pub byte_offset: usize,
    pub byte_length: usize,
}

/// An assembled container. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryGltf {
    header: [u8; HEADER_SIZE],
    scene: Vec<u8>,
    body: Vec<u8>,
    entries: Vec<BodyEntry>,
}

impl BinaryGltf {
    /// The 20 byte header.
    #[must_use]
    pub fn header(&self) -> &[u8; HEADER_SIZE] {
        &self.header
    }

    /// The scene chunk, including its trailing space padding.
    #[must_use]
    pub fn scene(&self) -> &[u8] {
        &self.scene
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body layout, in body order.
    #[must_use]
    pub fn entries(&self) -> &[BodyEntry] {
        &self.entries
    }

    /// Find where a named resource was embedded.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&BodyEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    #[must_use]
    pub fn total_length(&self) -> usize {
        HEADER_SIZE + self.scene.len() + self.body.len()
    }

    /// Header, scene and body concatenated.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(self.total_length());
        output.extend_from_slice(&self.header);
        output.extend_from_slice(&self.scene);
        output.extend_from_slice(&self.body);
        output
    }

    /// Split into header, scene chunk and body chunk.
    #[must_use]
    pub fn into_parts(self) -> ([u8; HEADER_SIZE], Vec<u8>, Vec<u8>) {
        (self.header, self.scene, self.body)
    }
}
