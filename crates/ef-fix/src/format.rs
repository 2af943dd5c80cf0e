use core::fmt;

use ef_core::{BitDepth, Borders};
use serde::{Deserialize, Serialize};

use crate::config::FixConfig;
use crate::error::FixError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorFamily {
    /// Single luma plane.
    Gray,
    /// Luma plus two (possibly subsampled) chroma planes.
    Yuv,
    /// Three full-size planes.
    Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneKind {
    Y,
    U,
    V,
    R,
    G,
    B,
}

impl PlaneKind {
    pub fn is_chroma(self) -> bool {
        matches!(self, PlaneKind::U | PlaneKind::V)
    }
}

impl fmt::Display for PlaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaneKind::Y => "Y",
            PlaneKind::U => "U",
            PlaneKind::V => "V",
            PlaneKind::R => "R",
            PlaneKind::G => "G",
            PlaneKind::B => "B",
        };
        f.write_str(name)
    }
}

/// Description of the clip a fixer is built for.
///
/// `width`/`height` are luma dimensions. Chroma planes are
/// `width >> subsampling_w` by `height >> subsampling_h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipFormat {
    pub family: ColorFamily,
    pub planar: bool,
    pub bytes_per_sample: usize,
    pub bits_per_sample: u8,
    pub width: usize,
    pub height: usize,
    pub subsampling_w: u8,
    pub subsampling_h: u8,
}

impl ClipFormat {
    /// Planar format without subsampling.
    pub fn new(
        family: ColorFamily,
        width: usize,
        height: usize,
        bytes_per_sample: usize,
        bits_per_sample: u8,
    ) -> Self {
        Self {
            family,
            planar: true,
            bytes_per_sample,
            bits_per_sample,
            width,
            height,
            subsampling_w: 0,
            subsampling_h: 0,
        }
    }

    pub fn gray8(width: usize, height: usize) -> Self {
        Self::new(ColorFamily::Gray, width, height, 1, 8)
    }

    pub fn rgb8(width: usize, height: usize) -> Self {
        Self::new(ColorFamily::Rgb, width, height, 1, 8)
    }

    /// 8-bit 4:2:0.
    pub fn yuv420p8(width: usize, height: usize) -> Self {
        Self::new(ColorFamily::Yuv, width, height, 1, 8).with_subsampling(1, 1)
    }

    pub fn with_subsampling(mut self, log2_w: u8, log2_h: u8) -> Self {
        self.subsampling_w = log2_w;
        self.subsampling_h = log2_h;
        self
    }

    /// Planes present in a frame of this format, in frame order.
    pub fn planes(&self) -> &'static [PlaneKind] {
        match self.family {
            ColorFamily::Gray => &[PlaneKind::Y],
            ColorFamily::Yuv => &[PlaneKind::Y, PlaneKind::U, PlaneKind::V],
            ColorFamily::Rgb => &[PlaneKind::R, PlaneKind::G, PlaneKind::B],
        }
    }

    pub fn plane_index(&self, kind: PlaneKind) -> Option<usize> {
        self.planes().iter().position(|&p| p == kind)
    }

    pub fn plane_dims(&self, kind: PlaneKind) -> (usize, usize) {
        if kind.is_chroma() {
            (
                self.width >> self.subsampling_w,
                self.height >> self.subsampling_h,
            )
        } else {
            (self.width, self.height)
        }
    }

    pub fn has_chroma(&self) -> bool {
        self.family == ColorFamily::Yuv
    }

    /// Checks the parts of the format every fixer depends on.
    pub fn validate(&self) -> Result<BitDepth, FixError> {
        if !self.planar {
            return Err(FixError::NotPlanar);
        }
        if !matches!(self.bytes_per_sample, 1 | 2) {
            return Err(FixError::UnsupportedSampleSize {
                bytes: self.bytes_per_sample,
            });
        }
        Ok(BitDepth::new(self.bits_per_sample, self.bytes_per_sample)?)
    }
}

/// One plane a fixer will touch, resolved at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlanePlan {
    pub kind: PlaneKind,
    pub index: usize,
    pub width: usize,
    pub height: usize,
    pub borders: Borders,
}

/// Picks the planes to process.
///
/// Any chroma border selects Y, U and V. Otherwise YUV and gray clips only
/// get their luma fixed and RGB clips get all three planes.
pub(crate) fn plan_planes(
    format: &ClipFormat,
    config: &FixConfig,
) -> Result<Vec<PlanePlan>, FixError> {
    let kinds: &[PlaneKind] = if !config.chroma.is_empty() {
        if !format.has_chroma() {
            return Err(FixError::MissingChroma);
        }
        &[PlaneKind::Y, PlaneKind::U, PlaneKind::V]
    } else {
        match format.family {
            ColorFamily::Gray | ColorFamily::Yuv => &[PlaneKind::Y],
            ColorFamily::Rgb => &[PlaneKind::R, PlaneKind::G, PlaneKind::B],
        }
    };

    kinds
        .iter()
        .map(|&kind| {
            let index = format.plane_index(kind).ok_or_else(|| {
                FixError::FrameLayout(format!("{kind} plane is not part of the clip"))
            })?;
            let (width, height) = format.plane_dims(kind);
            Ok(PlanePlan {
                kind,
                index,
                width,
                height,
                borders: config.borders_for(kind),
            })
        })
        .collect()
}
