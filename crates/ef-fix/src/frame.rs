use ef_core::{ImageView, ImageViewMut};

use crate::error::FixError;

/// One writable plane of a host frame.
#[derive(Debug)]
pub enum PlaneMut<'a> {
    U8(ImageViewMut<'a, u8>),
    U16(ImageViewMut<'a, u16>),
}

impl<'a> PlaneMut<'a> {
    /// Wraps a host plane addressed in bytes.
    ///
    /// `bytes_per_sample` selects the storage type; 2-byte planes must be
    /// aligned for `u16`.
    pub fn from_bytes(
        bytes: &'a mut [u8],
        width: usize,
        height: usize,
        stride_bytes: usize,
        bytes_per_sample: usize,
    ) -> Result<Self, FixError> {
        match bytes_per_sample {
            1 => Ok(Self::U8(ImageViewMut::from_bytes_mut(
                width,
                height,
                stride_bytes,
                bytes,
            )?)),
            2 => Ok(Self::U16(ImageViewMut::from_bytes_mut(
                width,
                height,
                stride_bytes,
                bytes,
            )?)),
            bytes => Err(FixError::UnsupportedSampleSize { bytes }),
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Self::U8(v) => v.width(),
            Self::U16(v) => v.width(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Self::U8(v) => v.height(),
            Self::U16(v) => v.height(),
        }
    }

    pub fn sample_bytes(&self) -> usize {
        match self {
            Self::U8(_) => 1,
            Self::U16(_) => 2,
        }
    }
}

impl<'a> From<ImageViewMut<'a, u8>> for PlaneMut<'a> {
    fn from(view: ImageViewMut<'a, u8>) -> Self {
        Self::U8(view)
    }
}

impl<'a> From<ImageViewMut<'a, u16>> for PlaneMut<'a> {
    fn from(view: ImageViewMut<'a, u16>) -> Self {
        Self::U16(view)
    }
}

/// One read-only plane of a host frame.
#[derive(Debug, Clone, Copy)]
pub enum PlaneRef<'a> {
    U8(ImageView<'a, u8>),
    U16(ImageView<'a, u16>),
}

impl<'a> PlaneRef<'a> {
    pub fn from_bytes(
        bytes: &'a [u8],
        width: usize,
        height: usize,
        stride_bytes: usize,
        bytes_per_sample: usize,
    ) -> Result<Self, FixError> {
        match bytes_per_sample {
            1 => Ok(Self::U8(ImageView::from_bytes(width, height, stride_bytes, bytes)?)),
            2 => Ok(Self::U16(ImageView::from_bytes(width, height, stride_bytes, bytes)?)),
            bytes => Err(FixError::UnsupportedSampleSize { bytes }),
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Self::U8(v) => v.width(),
            Self::U16(v) => v.width(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Self::U8(v) => v.height(),
            Self::U16(v) => v.height(),
        }
    }

    pub fn sample_bytes(&self) -> usize {
        match self {
            Self::U8(_) => 1,
            Self::U16(_) => 2,
        }
    }
}

impl<'a> From<ImageView<'a, u8>> for PlaneRef<'a> {
    fn from(view: ImageView<'a, u8>) -> Self {
        Self::U8(view)
    }
}

impl<'a> From<ImageView<'a, u16>> for PlaneRef<'a> {
    fn from(view: ImageView<'a, u16>) -> Self {
        Self::U16(view)
    }
}

/// Planes of one frame in clip order (`Y, U, V` or `R, G, B`).
#[derive(Debug)]
pub struct FrameMut<'a> {
    planes: Vec<PlaneMut<'a>>,
}

impl<'a> FrameMut<'a> {
    pub fn new(planes: Vec<PlaneMut<'a>>) -> Self {
        Self { planes }
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn plane(&self, index: usize) -> Option<&PlaneMut<'a>> {
        self.planes.get(index)
    }

    pub fn plane_mut(&mut self, index: usize) -> Option<&mut PlaneMut<'a>> {
        self.planes.get_mut(index)
    }
}

#[derive(Debug, Clone)]
pub struct FrameRef<'a> {
    planes: Vec<PlaneRef<'a>>,
}

impl<'a> FrameRef<'a> {
    pub fn new(planes: Vec<PlaneRef<'a>>) -> Self {
        Self { planes }
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn plane(&self, index: usize) -> Option<&PlaneRef<'a>> {
        self.planes.get(index)
    }
}

#[cfg(test)]
mod tests {
    use ef_core::{Axis, Image};

    use super::{FrameMut, PlaneMut, PlaneRef};
    use crate::error::FixError;

    #[test]
    fn host_planes_keep_their_padding() {
        // 3x2 plane, 5-byte stride, no padding after the last row.
        let mut bytes = vec![1u8, 2, 3, 0xEE, 0xEE, 4, 5, 6];
        let plane = PlaneMut::from_bytes(&mut bytes, 3, 2, 5, 1).expect("valid plane");
        assert_eq!((plane.width(), plane.height(), plane.sample_bytes()), (3, 2, 1));

        let PlaneMut::U8(view) = plane else {
            panic!("expected 8-bit plane");
        };
        assert_eq!(view.line(Axis::Row, 1).iter().collect::<Vec<_>>(), vec![4, 5, 6]);
    }

    #[test]
    fn sixteen_bit_planes_need_even_strides() {
        let words = vec![0u16; 8];
        let bytes: &[u8] = bytemuck::cast_slice(&words);
        let plane = PlaneRef::from_bytes(bytes, 2, 2, 8, 2).expect("valid plane");
        assert_eq!((plane.width(), plane.sample_bytes()), (2, 2));

        assert!(matches!(
            PlaneRef::from_bytes(bytes, 2, 2, 5, 2),
            Err(FixError::Core(_))
        ));
        assert_eq!(
            PlaneRef::from_bytes(bytes, 2, 2, 8, 4).map(|p| p.width()),
            Err(FixError::UnsupportedSampleSize { bytes: 4 })
        );
    }

    #[test]
    fn frames_index_planes_in_order() {
        let mut y = Image::new_fill(4, 4, 0u8);
        let mut u = Image::new_fill(2, 2, 0u16);
        let mut frame = FrameMut::new(vec![y.as_view_mut().into(), u.as_view_mut().into()]);

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.plane(1).map(PlaneMut::sample_bytes), Some(2));
        assert!(frame.plane_mut(2).is_none());
    }
}
