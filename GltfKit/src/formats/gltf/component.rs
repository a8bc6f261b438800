//! Component datatypes and typed-array conversion
//!
//! Accessor data is a flat run of little-endian components. This module knows
//! how wide each component is and how to move between raw bytes and logical
//! values. Logical values are carried as `f64`, which represents every
//! component type below exactly.

#![allow(clippy::cast_possible_truncation)]

use byteorder::{ByteOrder, LittleEndian};

/// GL enum for `BYTE`.
pub const GL_BYTE: u32 = 5120;
/// GL enum for `UNSIGNED_BYTE`.
pub const GL_UNSIGNED_BYTE: u32 = 5121;
/// GL enum for `SHORT`.
pub const GL_SHORT: u32 = 5122;
/// GL enum for `UNSIGNED_SHORT`.
pub const GL_UNSIGNED_SHORT: u32 = 5123;
/// GL enum for `UNSIGNED_INT`.
pub const GL_UNSIGNED_INT: u32 = 5125;
/// GL enum for `FLOAT`.
pub const GL_FLOAT: u32 = 5126;

/// Numeric datatype of a single accessor component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    UnsignedInt,
    Float,
}

impl ComponentType {
    /// Look up a component type from its GL enum.
    #[must_use]
    pub fn from_gl(value: u32) -> Option<Self> {
        match value {
            GL_BYTE => Some(Self::Byte),
            GL_UNSIGNED_BYTE => Some(Self::UnsignedByte),
            GL_SHORT => Some(Self::Short),
            GL_UNSIGNED_SHORT => Some(Self::UnsignedShort),
            GL_UNSIGNED_INT => Some(Self::UnsignedInt),
            GL_FLOAT => Some(Self::Float),
            _ => None,
        }
    }

    /// The GL enum written to `componentType`.
    #[must_use]
    pub fn to_gl(self) -> u32 {
        match self {
            Self::Byte => GL_BYTE,
            Self::UnsignedByte => GL_UNSIGNED_BYTE,
            Self::Short => GL_SHORT,
            Self::UnsignedShort => GL_UNSIGNED_SHORT,
            Self::UnsignedInt => GL_UNSIGNED_INT,
            Self::Float => GL_FLOAT,
        }
    }

    #[must_use]
    pub fn size_in_bytes(self) -> usize {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort => 2,
            Self::UnsignedInt | Self::Float => 4,
        }
    }

    /// Read one component from the start of `bytes`.
    ///
    /// `bytes` must hold at least [`size_in_bytes`](Self::size_in_bytes) bytes.
    #[must_use]
    pub fn read_component(self, bytes: &[u8]) -> f64 {
        match self {
            Self::Byte => f64::from(bytes[0] as i8),
            Self::UnsignedByte => f64::from(bytes[0]),
            Self::Short => f64::from(LittleEndian::read_i16(bytes)),
            Self::UnsignedShort => f64::from(LittleEndian::read_u16(bytes)),
            Self::UnsignedInt => f64::from(LittleEndian::read_u32(bytes)),
            Self::Float => f64::from(LittleEndian::read_f32(bytes)),
        }
    }

    /// Write one component to the start of `out`.
    ///
    /// Out-of-range values follow typed-array conversion: integers are
    /// truncated toward zero and wrapped modulo their width, non-finite values
    /// become zero.
    pub fn write_component(self, out: &mut [u8], value: f64) {
        match self {
            Self::Byte => out[0] = wrap_to_bits(value, 8) as u8,
            Self::UnsignedByte => out[0] = wrap_to_bits(value, 8) as u8,
            Self::Short => LittleEndian::write_u16(out, wrap_to_bits(value, 16) as u16),
            Self::UnsignedShort => LittleEndian::write_u16(out, wrap_to_bits(value, 16) as u16),
            Self::UnsignedInt => LittleEndian::write_u32(out, wrap_to_bits(value, 32) as u32),
            Self::Float => LittleEndian::write_f32(out, value as f32),
        }
    }

    /// Decode a packed run of components. Trailing bytes that do not form a
    /// whole component are ignored.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Vec<f64> {
        bytes
            .chunks_exact(self.size_in_bytes())
            .map(|chunk| self.read_component(chunk))
            .collect()
    }

    /// Encode logical values into a packed run of components.
    #[must_use]
    pub fn encode(self, values: &[f64]) -> Vec<u8> {
        let size = self.size_in_bytes();
        let mut out = vec![0u8; values.len() * size];
        for (chunk, &value) in out.chunks_exact_mut(size).zip(values) {
            self.write_component(chunk, value);
        }
        out
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Byte => "BYTE",
            Self::UnsignedByte => "UNSIGNED_BYTE",
            Self::Short => "SHORT",
            Self::UnsignedShort => "UNSIGNED_SHORT",
            Self::UnsignedInt => "UNSIGNED_INT",
            Self::Float => "FLOAT",
        };
        f.write_str(name)
    }
}

/// Truncate toward zero and keep the low `bits` bits of the two's complement
/// representation. Reinterpreting the result at the target width yields the
/// signed or unsigned value.
fn wrap_to_bits(value: f64, bits: u32) -> u64 {
    if !value.is_finite() {
        return 0;
    }
    let modulus = 1i128 << bits;
    (value.trunc() as i128).rem_euclid(modulus) as u64
}

/// Structural type of an accessor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AccessorType {
    /// Parse the `type` string of an accessor.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SCALAR" => Some(Self::Scalar),
            "VEC2" => Some(Self::Vec2),
            "VEC3" => Some(Self::Vec3),
            "VEC4" => Some(Self::Vec4),
            "MAT2" => Some(Self::Mat2),
            "MAT3" => Some(Self::Mat3),
            "MAT4" => Some(Self::Mat4),
            _ => None,
        }
    }

    /// Number of components per element.
    #[must_use]
    pub fn component_count(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}
