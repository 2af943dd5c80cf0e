//! Border fixers for planar video frames.
//!
//! Two variants share one least-squares line estimator:
//!
//! - [`ContinuityFixer`] rebuilds each border line from the line next to it,
//!   walking outwards from the first untouched interior line.
//! - [`ReferenceFixer`] rebuilds each border line from the co-located line of
//!   a second, clean clip.
//!
//! Both validate a [`ClipFormat`] and a [`FixConfig`] once at construction and
//! then fix whole frames in place through [`FrameMut`]. The per-plane passes
//! ([`fix_borders_continuity`], [`fix_borders_reference`]) are public for
//! callers that manage their own planes and scratch.

mod config;
mod continuity;
mod error;
mod fixer;
mod format;
mod frame;
mod reference;

pub use config::FixConfig;
pub use continuity::{check_continuity_borders, fix_borders, fix_borders_continuity};
pub use error::FixError;
pub use fixer::{ContinuityFixer, ReferenceFixer};
pub use format::{ClipFormat, ColorFamily, PlaneKind};
pub use frame::{FrameMut, FrameRef, PlaneMut, PlaneRef};
pub use reference::{check_reference_borders, fix_borders_from, fix_borders_reference};
