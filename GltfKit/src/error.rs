//! Error types for `GltfKit`

use thiserror::Error;

/// The error type for `GltfKit` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error, raised while reading or writing binary containers.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Asset Reference Errors ====================
    /// An attribute or caller points at an accessor that does not exist.
    #[error("accessor {accessor} does not exist (referenced by {referenced_by})")]
    MissingAccessor {
        /// The accessor id that was looked up.
        accessor: usize,
        /// Where the reference came from, e.g. `mesh 0 primitive 1 JOINTS_0`.
        referenced_by: String,
    },

    /// An accessor points at a buffer view that does not exist.
    #[error("accessor {accessor} references missing buffer view {buffer_view}")]
    MissingBufferView {
        /// The accessor that holds the dangling reference.
        accessor: usize,
        /// The buffer view id that was looked up.
        buffer_view: usize,
    },

    /// A buffer view points at a buffer that does not exist.
    #[error("buffer view {buffer_view} references missing buffer {buffer}")]
    MissingBuffer {
        /// The buffer view that holds the dangling reference.
        buffer_view: usize,
        /// The buffer id that was looked up.
        buffer: usize,
    },

    /// The bytes described by an accessor do not fit inside its buffer view.
    #[error(
        "accessor {accessor} needs {required} bytes \
         but buffer view {buffer_view} is {available} bytes long"
    )]
    AccessorOutOfBounds {
        /// The offending accessor.
        accessor: usize,
        /// The buffer view it reads from.
        buffer_view: usize,
        /// Bytes required, including the accessor offset.
        required: usize,
        /// Length of the buffer view.
        available: usize,
    },

    /// An accessor without a buffer view declares more data than a buffer can hold.
    #[error("accessor {accessor} declares {count} elements, too many to materialize")]
    AccessorTooLarge {
        /// The offending accessor.
        accessor: usize,
        /// The declared element count.
        count: usize,
    },

    /// A buffer view range does not fit inside its resolved buffer bytes.
    #[error(
        "buffer view {buffer_view} spans {required} bytes but buffer {buffer} holds {available}"
    )]
    BufferViewOutOfBounds {
        /// The offending buffer view.
        buffer_view: usize,
        /// The buffer it slices.
        buffer: usize,
        /// End offset of the view.
        required: usize,
        /// Number of resolved bytes in the buffer.
        available: usize,
    },

    // ==================== Component Type Errors ====================
    /// The accessor uses a component type the datatype primitive cannot handle.
    #[error("accessor {accessor} has unsupported component type {component_type}")]
    UnsupportedComponentType {
        /// The offending accessor.
        accessor: usize,
        /// The raw GL enum found in the asset.
        component_type: u32,
    },

    /// The accessor uses a structural type outside SCALAR/VECn/MATn.
    #[error("accessor {accessor} has unsupported type {accessor_type:?}")]
    UnsupportedAccessorType {
        /// The offending accessor.
        accessor: usize,
        /// The type string found in the asset.
        accessor_type: String,
    },

    // ==================== Binary Container Errors ====================
    /// The data is not a binary glTF container (missing `glTF` magic).
    #[error("invalid binary glTF magic: expected glTF, found {0:?}")]
    InvalidGlbMagic([u8; 4]),

    /// The container version is not supported.
    #[error("unsupported binary glTF version: {version} (supported: 1)")]
    UnsupportedGlbVersion {
        /// The version number found in the header.
        version: u32,
    },

    /// The scene chunk is not tagged as JSON.
    #[error("unsupported binary glTF scene format: {format}")]
    UnsupportedSceneFormat {
        /// The scene format tag found in the header.
        format: u32,
    },

    /// Header lengths disagree with the container contents.
    #[error("binary glTF length mismatch: {message}")]
    GlbLengthMismatch {
        /// Which length was inconsistent.
        message: String,
    },

    /// A container or one of its chunks would not fit a 32-bit length field.
    #[error("binary glTF too large: {resource} is {length} bytes")]
    ContainerTooLarge {
        /// The resource or chunk that overflowed.
        resource: String,
        /// Its length in bytes.
        length: usize,
    },

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Pipeline configuration could not be parsed.
    #[error("invalid pipeline config: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

/// A specialized Result type for `GltfKit` operations.
pub type Result<T> = std::result::Result<T, Error>;
