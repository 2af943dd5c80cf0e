use ef_core::{Axis, BitDepth, Borders, Edge, ImageViewMut, Sample};
use ef_lsq::EdgeEstimator;
use log::trace;

use crate::error::FixError;

/// Checks that at least one untouched line survives on each axis.
pub fn check_continuity_borders(
    width: usize,
    height: usize,
    borders: &Borders,
) -> Result<(), FixError> {
    check_not_empty(width, height, borders)?;
    check_axis(Axis::Row, borders.vertical(), height)?;
    check_axis(Axis::Col, borders.horizontal(), width)
}

/// Lines of a plane with no rows or no columns have nothing to fit.
pub(crate) fn check_not_empty(
    width: usize,
    height: usize,
    borders: &Borders,
) -> Result<(), FixError> {
    if !borders.is_empty() && (width == 0 || height == 0) {
        return Err(FixError::EmptyPlane { width, height });
    }
    Ok(())
}

fn check_axis(axis: Axis, requested: usize, available: usize) -> Result<(), FixError> {
    if requested > 0 && requested >= available {
        return Err(FixError::BorderOverflow {
            axis,
            requested,
            limit: available.saturating_sub(1),
        });
    }
    Ok(())
}

/// Rebuilds each border of `plane` from the line next to it, walking from the
/// interior outwards.
///
/// The innermost bad line is fitted against the first untouched interior
/// line; every further line is fitted against the one fixed just before it.
/// Sides run in the order top, bottom, left, right, so corner samples end up
/// fitted along columns.
pub fn fix_borders_continuity<T: Sample>(
    plane: &mut ImageViewMut<'_, T>,
    borders: &Borders,
    radius: usize,
    depth: BitDepth,
    estimator: &mut EdgeEstimator,
) -> Result<(), FixError> {
    let (width, height) = (plane.width(), plane.height());
    check_continuity_borders(width, height, borders)?;
    debug_assert!(depth.fits::<T>());

    trace!(
        target: "ef_fix::continuity",
        "{width}x{height} plane, borders {borders:?}, radius {radius}"
    );

    for edge in Edge::ALL {
        let count = borders.get(edge);
        let axis = edge.axis();
        let extent = match axis {
            Axis::Row => height,
            Axis::Col => width,
        };
        // Innermost bad line first, so each fit reads an already fixed line.
        for i in 0..count {
            let good = edge.line_index(count - i, extent);
            let bad = edge.line_index(count - 1 - i, extent);
            fix_adjacent(plane, axis, bad, good, radius, depth, estimator);
        }
    }

    Ok(())
}

/// [`fix_borders_continuity`] with a scratch buffer owned by the call.
pub fn fix_borders<T: Sample>(
    plane: &mut ImageViewMut<'_, T>,
    borders: &Borders,
    radius: usize,
    depth: BitDepth,
) -> Result<(), FixError> {
    check_continuity_borders(plane.width(), plane.height(), borders)?;
    let mut estimator = EdgeEstimator::try_new(plane.width().max(plane.height()))?;
    fix_borders_continuity(plane, borders, radius, depth, &mut estimator)
}

#[inline]
fn fix_adjacent<T: Sample>(
    plane: &mut ImageViewMut<'_, T>,
    axis: Axis,
    bad: usize,
    good: usize,
    radius: usize,
    depth: BitDepth,
    estimator: &mut EdgeEstimator,
) {
    estimator.load_good(&plane.line(axis, good));
    estimator.apply(&mut plane.line_mut(axis, bad), radius, depth);
}

#[cfg(test)]
mod tests {
    use ef_core::{Axis, BitDepth, Borders, Image};

    use super::{check_continuity_borders, fix_borders};
    use crate::error::FixError;

    fn gradient_16x16() -> Image<u8> {
        let mut data = vec![0u8; 16 * 16];
        for y in 0..16 {
            for x in 0..16 {
                data[y * 16 + x] = (x * 17) as u8;
            }
        }
        Image::from_vec(16, 16, data).expect("valid image")
    }

    #[test]
    fn zero_borders_leave_plane_untouched() {
        let mut img = gradient_16x16();
        for (i, v) in img.data_mut().iter_mut().enumerate() {
            *v = (i * 31 % 251) as u8;
        }
        let before = img.clone();
        fix_borders(&mut img.as_view_mut(), &Borders::NONE, 3, BitDepth::U8)
            .expect("fix");
        assert_eq!(img, before);
    }

    #[test]
    fn darkened_top_rows_follow_interior_gradient() {
        let mut img = gradient_16x16();
        for y in 0..2 {
            for v in &mut img.data_mut()[y * 16..(y + 1) * 16] {
                *v /= 2;
            }
        }
        let darkened = img.clone();
        let reference_row: Vec<u8> = img.as_view().row(2).to_vec();

        let borders = Borders::new(0, 2, 0, 0);
        fix_borders(&mut img.as_view_mut(), &borders, 4, BitDepth::U8).expect("fix");

        let view = img.as_view();
        for y in 0..2 {
            for (x, (&got, &want)) in view.row(y).iter().zip(&reference_row).enumerate() {
                assert!(
                    (got as i32 - want as i32).abs() <= 2,
                    "row {y} col {x}: {got} vs {want}"
                );
            }
            assert_ne!(view.row(y), darkened.as_view().row(y));
        }
        for y in 2..16 {
            assert_eq!(view.row(y), darkened.as_view().row(y));
        }
    }

    #[test]
    fn left_and_right_columns_use_column_neighbours() {
        // Rows ramp top to bottom; the outer columns carry a gain error.
        let (w, h) = (12usize, 10usize);
        let mut data = vec![0u16; w * h];
        for y in 0..h {
            for x in 0..w {
                data[y * w + x] = (100 + 40 * y) as u16;
            }
        }
        for y in 0..h {
            data[y * w] /= 4;
            data[y * w + w - 1] = data[y * w + w - 1] * 3 / 2;
            data[y * w + w - 2] = data[y * w + w - 2] * 5 / 4;
        }
        let mut img = Image::from_vec(w, h, data).expect("valid image");
        let depth = BitDepth::new(12, 2).expect("12-bit");
        fix_borders(&mut img.as_view_mut(), &Borders::new(1, 0, 2, 0), 0, depth)
            .expect("fix");

        for y in 0..h {
            let want = (100 + 40 * y) as u16;
            let row = img.as_view().row(y).to_vec();
            assert_eq!(row[0], want, "left, row {y}");
            assert_eq!(row[w - 2], want, "right inner, row {y}");
            assert_eq!(row[w - 1], want, "right outer, row {y}");
        }
    }

    #[test]
    fn bottom_rows_use_rows_above() {
        let (w, h) = (8usize, 6usize);
        let mut data: Vec<u8> = (0..w * h).map(|i| (10 + (i % w) * 20) as u8).collect();
        for x in 0..w {
            data[(h - 1) * w + x] /= 2;
        }
        let mut img = Image::from_vec(w, h, data).expect("valid image");
        fix_borders(&mut img.as_view_mut(), &Borders::new(0, 0, 0, 1), 0, BitDepth::U8)
            .expect("fix");
        assert_eq!(img.as_view().row(h - 1), img.as_view().row(h - 2));
    }

    #[test]
    fn radius_wider_than_plane_stays_in_bounds() {
        let mut img = gradient_16x16();
        img.data_mut()[0] = 255;
        fix_borders(
            &mut img.as_view_mut(),
            &Borders::new(3, 3, 3, 3),
            1000,
            BitDepth::U8,
        )
        .expect("fix");

        let mut tiny = Image::from_vec(2, 2, vec![1u8, 2, 3, 4]).expect("valid image");
        fix_borders(&mut tiny.as_view_mut(), &Borders::new(1, 1, 0, 0), 1, BitDepth::U8)
            .expect("fix");
    }

    #[test]
    fn overlapping_borders_are_rejected_before_writing() {
        let mut img = gradient_16x16();
        let before = img.clone();
        let err = fix_borders(
            &mut img.as_view_mut(),
            &Borders::new(9, 0, 8, 0),
            2,
            BitDepth::U8,
        )
        .expect_err("left + right exceeds width");

        assert_eq!(
            err,
            FixError::BorderOverflow {
                axis: Axis::Col,
                requested: 17,
                limit: 15
            }
        );
        assert_eq!(img, before);

        assert!(check_continuity_borders(16, 16, &Borders::new(8, 0, 7, 0)).is_ok());
        assert!(check_continuity_borders(16, 16, &Borders::new(0, 16, 0, 0)).is_err());
        assert!(check_continuity_borders(0, 0, &Borders::NONE).is_ok());
        assert_eq!(
            check_continuity_borders(4, 0, &Borders::new(0, 0, 1, 0)),
            Err(FixError::EmptyPlane {
                width: 4,
                height: 0
            })
        );
    }
}
