use ef_core::Axis;
use thiserror::Error;

use crate::format::PlaneKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixError {
    #[error("clip must be planar")]
    NotPlanar,
    #[error("{bytes}-byte samples are not supported; clips must be 8 to 16-bit integer")]
    UnsupportedSampleSize { bytes: usize },
    #[error("clip must contain U and V planes to process chroma")]
    MissingChroma,
    #[error("clips must have the same dimensions: {expected:?} vs {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("clips must have the same bit depth: {expected} vs {actual}")]
    BitDepthMismatch { expected: u8, actual: u8 },
    #[error("clips must use the same sample size: {expected} vs {actual} bytes")]
    SampleSizeMismatch { expected: usize, actual: usize },
    #[error("clips must be both RGB or both YUV")]
    ColorFamilyMismatch,
    #[error("clips must have the same subsampling to process chroma")]
    SubsamplingMismatch,
    #[error("{axis:?} borders request {requested} lines but at most {limit} fit")]
    BorderOverflow {
        axis: Axis,
        requested: usize,
        limit: usize,
    },
    #[error("cannot fix borders of an empty {width}x{height} plane")]
    EmptyPlane { width: usize, height: usize },
    #[error("{plane} plane: {source}")]
    Plane {
        plane: PlaneKind,
        #[source]
        source: Box<FixError>,
    },
    #[error("frame does not match clip format: {0}")]
    FrameLayout(String),
    #[error(transparent)]
    Allocation(#[from] ef_lsq::Error),
    #[error(transparent)]
    Core(#[from] ef_core::Error),
}

impl FixError {
    pub(crate) fn in_plane(self, plane: PlaneKind) -> Self {
        Self::Plane {
            plane,
            source: Box::new(self),
        }
    }
}
