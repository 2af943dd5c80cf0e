//! Foundational primitives for border reconstruction.
//!
//! ## Planes and Stride
//! Plane views use element stride (not byte stride). `stride` is the distance,
//! in elements, between adjacent row starts and may be greater than `width`.
//! Host buffers addressed in bytes are wrapped with
//! [`ImageView::from_bytes`] / [`ImageViewMut::from_bytes_mut`], which convert
//! the byte stride and check alignment.
//!
//! ## Lines
//! A [`Line`] is a strided 1-D view: rows have step 1, columns have step
//! `stride`. Border passes walk all four sides through the same line type.
//!
//! ## Samples
//! Samples are `u8` or `u16`. [`BitDepth`] carries the number of significant
//! bits so that a 10-bit clip stored in `u16` clamps to 1023.

mod border;
mod error;
mod image;
mod line;
mod sample;

pub use border::{Borders, Edge};
pub use error::Error;
pub use image::{Image, ImageView, ImageViewMut};
pub use line::{Axis, Line, LineMut};
pub use sample::{BitDepth, Sample};
