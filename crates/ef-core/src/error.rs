use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("invalid stride")]
    InvalidStride,
    #[error("buffer is not aligned to {align} bytes")]
    Misaligned { align: usize },
    #[error("unsupported bit depth {bits} for {sample_bytes}-byte samples")]
    UnsupportedBitDepth { bits: u8, sample_bytes: usize },
}
