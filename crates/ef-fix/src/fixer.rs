use ef_core::BitDepth;
use ef_lsq::EdgeEstimator;
use log::debug;

use crate::config::FixConfig;
use crate::continuity::{check_continuity_borders, fix_borders_continuity};
use crate::error::FixError;
use crate::format::{ClipFormat, ColorFamily, PlaneKind, PlanePlan, plan_planes};
use crate::frame::{FrameMut, FrameRef, PlaneMut, PlaneRef};
use crate::reference::{check_reference_borders, fix_borders_reference};

/// Rebuilds clip borders from the adjacent interior lines.
#[derive(Debug, Clone)]
pub struct ContinuityFixer {
    format: ClipFormat,
    config: FixConfig,
    depth: BitDepth,
    plan: Vec<PlanePlan>,
}

impl ContinuityFixer {
    /// Validates `format` and `config` once for the whole clip.
    pub fn new(format: ClipFormat, config: FixConfig) -> Result<Self, FixError> {
        let depth = format.validate()?;
        let plan = plan_planes(&format, &config)?;
        for p in &plan {
            check_continuity_borders(p.width, p.height, &p.borders)
                .map_err(|e| e.in_plane(p.kind))?;
        }
        log_plan("continuity", &format, &config, &plan);

        Ok(Self {
            format,
            config,
            depth,
            plan,
        })
    }

    pub fn format(&self) -> &ClipFormat {
        &self.format
    }

    pub fn config(&self) -> &FixConfig {
        &self.config
    }

    /// Planes touched by [`Self::process_frame`], in frame order.
    pub fn planes(&self) -> impl Iterator<Item = PlaneKind> + '_ {
        self.plan.iter().map(|p| p.kind)
    }

    /// Fixes every selected plane of `frame` in place.
    pub fn process_frame(&self, frame: &mut FrameMut<'_>) -> Result<(), FixError> {
        check_frame_len(frame.len(), &self.format)?;
        let mut estimator = EdgeEstimator::try_new(scratch_len(&self.plan))?;
        let radius = self.config.radius;

        for p in &self.plan {
            let plane = frame
                .plane_mut(p.index)
                .ok_or_else(|| missing_plane(p))?;
            check_plane(p, plane.width(), plane.height(), plane.sample_bytes(), &self.format)?;

            match plane {
                PlaneMut::U8(view) => {
                    fix_borders_continuity(view, &p.borders, radius, self.depth, &mut estimator)
                }
                PlaneMut::U16(view) => {
                    fix_borders_continuity(view, &p.borders, radius, self.depth, &mut estimator)
                }
            }
            .map_err(|e| e.in_plane(p.kind))?;
        }
        Ok(())
    }
}

/// Rebuilds clip borders from a second, clean clip.
#[derive(Debug, Clone)]
pub struct ReferenceFixer {
    format: ClipFormat,
    reference: ClipFormat,
    config: FixConfig,
    depth: BitDepth,
    plan: Vec<PlanePlan>,
}

impl ReferenceFixer {
    /// Validates both clips and `config` once for the whole clip.
    pub fn new(
        format: ClipFormat,
        reference: ClipFormat,
        config: FixConfig,
    ) -> Result<Self, FixError> {
        let depth = format.validate()?;
        let ref_depth = reference.validate()?;

        if (format.width, format.height) != (reference.width, reference.height) {
            return Err(FixError::DimensionMismatch {
                expected: (format.width, format.height),
                actual: (reference.width, reference.height),
            });
        }
        if depth != ref_depth {
            return Err(FixError::BitDepthMismatch {
                expected: depth.bits(),
                actual: ref_depth.bits(),
            });
        }
        if format.bytes_per_sample != reference.bytes_per_sample {
            return Err(FixError::SampleSizeMismatch {
                expected: format.bytes_per_sample,
                actual: reference.bytes_per_sample,
            });
        }
        let is_rgb = |f: &ClipFormat| f.family == ColorFamily::Rgb;
        if is_rgb(&format) != is_rgb(&reference) {
            return Err(FixError::ColorFamilyMismatch);
        }

        let plan = plan_planes(&format, &config)?;
        if plan.iter().any(|p| p.kind.is_chroma()) {
            if !reference.has_chroma() {
                return Err(FixError::MissingChroma);
            }
            let sub = |f: &ClipFormat| (f.subsampling_w, f.subsampling_h);
            if sub(&format) != sub(&reference) {
                return Err(FixError::SubsamplingMismatch);
            }
        }
        for p in &plan {
            check_reference_borders(p.width, p.height, &p.borders)
                .map_err(|e| e.in_plane(p.kind))?;
        }
        log_plan("reference", &format, &config, &plan);

        Ok(Self {
            format,
            reference,
            config,
            depth,
            plan,
        })
    }

    pub fn format(&self) -> &ClipFormat {
        &self.format
    }

    pub fn reference_format(&self) -> &ClipFormat {
        &self.reference
    }

    pub fn config(&self) -> &FixConfig {
        &self.config
    }

    /// Planes touched by [`Self::process_frame`], in frame order.
    pub fn planes(&self) -> impl Iterator<Item = PlaneKind> + '_ {
        self.plan.iter().map(|p| p.kind)
    }

    /// Fixes every selected plane of `frame` from the matching plane of
    /// `reference`.
    pub fn process_frame(
        &self,
        frame: &mut FrameMut<'_>,
        reference: &FrameRef<'_>,
    ) -> Result<(), FixError> {
        check_frame_len(frame.len(), &self.format)?;
        check_frame_len(reference.len(), &self.reference)?;
        let mut estimator = EdgeEstimator::try_new(scratch_len(&self.plan))?;
        let radius = self.config.radius;

        for p in &self.plan {
            // Gray and YUV references are both laid out Y first.
            let ref_plan = PlanePlan {
                index: self.reference.plane_index(p.kind).unwrap_or(p.index),
                ..*p
            };
            let src = reference
                .plane(ref_plan.index)
                .ok_or_else(|| missing_plane(&ref_plan))?;
            check_plane(&ref_plan, src.width(), src.height(), src.sample_bytes(), &self.reference)?;

            let plane = frame
                .plane_mut(p.index)
                .ok_or_else(|| missing_plane(p))?;
            check_plane(p, plane.width(), plane.height(), plane.sample_bytes(), &self.format)?;

            match (plane, src) {
                (PlaneMut::U8(view), PlaneRef::U8(src)) => fix_borders_reference(
                    view,
                    src,
                    &p.borders,
                    radius,
                    self.depth,
                    &mut estimator,
                ),
                (PlaneMut::U16(view), PlaneRef::U16(src)) => fix_borders_reference(
                    view,
                    src,
                    &p.borders,
                    radius,
                    self.depth,
                    &mut estimator,
                ),
                _ => Err(FixError::FrameLayout(format!(
                    "{} plane sample type differs from reference",
                    p.kind
                ))),
            }
            .map_err(|e| e.in_plane(p.kind))?;
        }
        Ok(())
    }
}

fn scratch_len(plan: &[PlanePlan]) -> usize {
    plan.iter().map(|p| p.width.max(p.height)).max().unwrap_or(0)
}

fn check_frame_len(len: usize, format: &ClipFormat) -> Result<(), FixError> {
    let expected = format.planes().len();
    if len != expected {
        return Err(FixError::FrameLayout(format!(
            "expected {expected} planes, got {len}"
        )));
    }
    Ok(())
}

fn check_plane(
    p: &PlanePlan,
    width: usize,
    height: usize,
    sample_bytes: usize,
    format: &ClipFormat,
) -> Result<(), FixError> {
    if (width, height) != (p.width, p.height) {
        return Err(FixError::FrameLayout(format!(
            "{} plane is {width}x{height}, expected {}x{}",
            p.kind, p.width, p.height
        )));
    }
    if sample_bytes != format.bytes_per_sample {
        return Err(FixError::FrameLayout(format!(
            "{} plane has {sample_bytes}-byte samples, expected {}",
            p.kind, format.bytes_per_sample
        )));
    }
    Ok(())
}

fn missing_plane(p: &PlanePlan) -> FixError {
    FixError::FrameLayout(format!("{} plane missing at index {}", p.kind, p.index))
}

fn log_plan(variant: &str, format: &ClipFormat, config: &FixConfig, plan: &[PlanePlan]) {
    debug!(
        target: "ef_fix::fixer",
        "{variant} fixer for {:?} {}x{} at {} bits, radius {}",
        format.family,
        format.width,
        format.height,
        format.bits_per_sample,
        config.radius
    );
    let window = config.radius.saturating_mul(2).saturating_add(1);
    for p in plan {
        if config.radius > 0 && window >= p.width.max(p.height) {
            debug!(
                target: "ef_fix::fixer",
                "{} plane: radius {} covers whole lines",
                p.kind,
                config.radius
            );
        }
        debug!(
            target: "ef_fix::fixer",
            "{} plane {}x{}: borders {:?}",
            p.kind,
            p.width,
            p.height,
            p.borders
        );
    }
}
