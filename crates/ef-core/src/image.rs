use crate::Error;
use crate::line::{Axis, Line, LineMut};
use crate::sample::Sample;

#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            stride: self.width,
            data: &self.data,
        }
    }

    pub fn as_view_mut(&mut self) -> ImageViewMut<'_, T> {
        ImageViewMut {
            width: self.width,
            height: self.height,
            stride: self.width,
            data: &mut self.data,
        }
    }
}

impl<T: Clone> Image<T> {
    pub fn new_fill(width: usize, height: usize, value: T) -> Self {
        let len = width.checked_mul(height).expect("image size overflow");
        Self {
            width,
            height,
            data: vec![value; len],
        }
    }
}

/// Read-only plane view. `stride` is in elements.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a [T],
}

impl<'a, T> ImageView<'a, T> {
    pub fn from_slice(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a [T],
    ) -> Result<Self, Error> {
        check_layout(width, height, stride, data.len())?;
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }
}

impl<'a, T: Sample> ImageView<'a, T> {
    /// Wraps a host buffer whose rows are `stride_bytes` apart.
    pub fn from_bytes(
        width: usize,
        height: usize,
        stride_bytes: usize,
        bytes: &'a [u8],
    ) -> Result<Self, Error> {
        let stride = element_stride::<T>(stride_bytes)?;
        let usable = bytes.len() - bytes.len() % T::BYTES;
        let data: &'a [T] = bytemuck::try_cast_slice(&bytes[..usable])
            .map_err(|_| Error::Misaligned { align: T::BYTES })?;
        Self::from_slice(width, height, stride, data)
    }

    /// Returns line `index` along `axis`.
    pub fn line(&self, axis: Axis, index: usize) -> Line<'a, T> {
        let (start, step, len) = line_geometry(axis, index, self.width, self.height, self.stride);
        Line::new(self.data, start, step, len)
    }
}

/// Mutable plane view. `stride` is in elements.
#[derive(Debug)]
pub struct ImageViewMut<'a, T> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a mut [T],
}

impl<'a, T> ImageViewMut<'a, T> {
    pub fn from_slice_mut(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a mut [T],
    ) -> Result<Self, Error> {
        check_layout(width, height, stride, data.len())?;
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }
}

impl<'a, T: Sample> ImageViewMut<'a, T> {
    /// Mutable counterpart of [`ImageView::from_bytes`].
    pub fn from_bytes_mut(
        width: usize,
        height: usize,
        stride_bytes: usize,
        bytes: &'a mut [u8],
    ) -> Result<Self, Error> {
        let stride = element_stride::<T>(stride_bytes)?;
        let usable = bytes.len() - bytes.len() % T::BYTES;
        let data: &'a mut [T] = bytemuck::try_cast_slice_mut(&mut bytes[..usable])
            .map_err(|_| Error::Misaligned { align: T::BYTES })?;
        Self::from_slice_mut(width, height, stride, data)
    }

    pub fn line(&self, axis: Axis, index: usize) -> Line<'_, T> {
        let (start, step, len) = line_geometry(axis, index, self.width, self.height, self.stride);
        Line::new(&*self.data, start, step, len)
    }

    pub fn line_mut(&mut self, axis: Axis, index: usize) -> LineMut<'_, T> {
        let (start, step, len) = line_geometry(axis, index, self.width, self.height, self.stride);
        LineMut::new(&mut *self.data, start, step, len)
    }
}

fn element_stride<T: Sample>(stride_bytes: usize) -> Result<usize, Error> {
    if stride_bytes % T::BYTES != 0 {
        return Err(Error::InvalidStride);
    }
    Ok(stride_bytes / T::BYTES)
}

fn check_layout(width: usize, height: usize, stride: usize, len: usize) -> Result<(), Error> {
    if stride < width {
        return Err(Error::InvalidStride);
    }

    let min_len = min_required_len(width, height, stride).ok_or(Error::SizeMismatch {
        expected: usize::MAX,
        actual: len,
    })?;

    if len < min_len {
        return Err(Error::SizeMismatch {
            expected: min_len,
            actual: len,
        });
    }
    Ok(())
}

/// The last row only needs `width` elements, so host buffers without
/// trailing padding are accepted.
fn min_required_len(width: usize, height: usize, stride: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }

    let rows_before_last = height.checked_sub(1)?;
    let base = rows_before_last.checked_mul(stride)?;
    base.checked_add(width)
}

fn line_geometry(
    axis: Axis,
    index: usize,
    width: usize,
    height: usize,
    stride: usize,
) -> (usize, usize, usize) {
    match axis {
        Axis::Row => {
            assert!(index < height, "row index out of bounds");
            (index * stride, 1, width)
        }
        Axis::Col => {
            assert!(index < width, "column index out of bounds");
            (index, stride, height)
        }
    }
}
