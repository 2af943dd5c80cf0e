use core::fmt::Debug;

use bytemuck::Pod;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Unsigned integer sample stored in a plane.
///
/// Implemented for `u8` (8-bit clips) and `u16` (9 to 16-bit clips).
pub trait Sample: Pod + Default + Debug + Send + Sync + 'static {
    /// Storage size in bytes.
    const BYTES: usize;
    /// Largest bit depth the storage type can hold.
    const MAX_BITS: u8;

    fn to_u32(self) -> u32;

    /// Converts `v`, saturating at the storage maximum.
    fn from_u32_saturating(v: u32) -> Self;
}

impl Sample for u8 {
    const BYTES: usize = 1;
    const MAX_BITS: u8 = 8;

    #[inline]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_u32_saturating(v: u32) -> Self {
        v.min(u8::MAX as u32) as u8
    }
}

impl Sample for u16 {
    const BYTES: usize = 2;
    const MAX_BITS: u8 = 16;

    #[inline]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_u32_saturating(v: u32) -> Self {
        v.min(u16::MAX as u32) as u16
    }
}

/// Number of significant bits per sample.
///
/// A 10-bit clip stores `u16` samples but only `[0, 1023]` is valid, so
/// reconstructed values clamp to `max_value()` rather than to the storage
/// maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BitDepth(u8);

impl BitDepth {
    pub const U8: Self = Self(8);
    pub const U16: Self = Self(16);

    /// Validates `bits` against the storage size in bytes.
    pub fn new(bits: u8, sample_bytes: usize) -> Result<Self, Error> {
        let max_bits = match sample_bytes {
            1 => u8::MAX_BITS,
            2 => u16::MAX_BITS,
            _ => 0,
        };
        if bits == 0 || bits > max_bits {
            return Err(Error::UnsupportedBitDepth { bits, sample_bytes });
        }
        Ok(Self(bits))
    }

    /// Full range of the storage type.
    pub fn full<T: Sample>() -> Self {
        Self(T::MAX_BITS)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn max_value(self) -> u32 {
        (1u32 << self.0) - 1
    }

    /// Returns `true` if samples of type `T` can hold this depth.
    pub fn fits<T: Sample>(self) -> bool {
        self.0 <= T::MAX_BITS
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = Error;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::new(bits, if bits > 8 { 2 } else { 1 })
    }
}

impl From<BitDepth> for u8 {
    fn from(depth: BitDepth) -> Self {
        depth.0
    }
}
