use ef_core::{Axis, BitDepth, Borders, Edge, ImageView, ImageViewMut, Sample};
use ef_lsq::EdgeEstimator;
use log::trace;

use crate::continuity::check_not_empty;
use crate::error::FixError;

/// Checks that opposing borders do not overlap.
///
/// Lines are fitted against a separate reference plane, so the whole plane
/// may be covered.
pub fn check_reference_borders(
    width: usize,
    height: usize,
    borders: &Borders,
) -> Result<(), FixError> {
    check_not_empty(width, height, borders)?;
    if borders.vertical() > height {
        return Err(FixError::BorderOverflow {
            axis: Axis::Row,
            requested: borders.vertical(),
            limit: height,
        });
    }
    if borders.horizontal() > width {
        return Err(FixError::BorderOverflow {
            axis: Axis::Col,
            requested: borders.horizontal(),
            limit: width,
        });
    }
    Ok(())
}

/// Rebuilds each border line of `plane` from the co-located line of
/// `reference`.
///
/// Lines are independent of each other: row `i` of the top border only reads
/// row `i` of the reference, row `height - 1 - i` of the bottom border only
/// reads reference row `height - 1 - i`, and likewise for columns.
pub fn fix_borders_reference<T: Sample>(
    plane: &mut ImageViewMut<'_, T>,
    reference: &ImageView<'_, T>,
    borders: &Borders,
    radius: usize,
    depth: BitDepth,
    estimator: &mut EdgeEstimator,
) -> Result<(), FixError> {
    let (width, height) = (plane.width(), plane.height());
    if (reference.width(), reference.height()) != (width, height) {
        return Err(FixError::DimensionMismatch {
            expected: (width, height),
            actual: (reference.width(), reference.height()),
        });
    }
    check_reference_borders(width, height, borders)?;
    debug_assert!(depth.fits::<T>());

    trace!(
        target: "ef_fix::reference",
        "{width}x{height} plane, borders {borders:?}, radius {radius}"
    );

    for edge in Edge::ALL {
        let axis = edge.axis();
        let extent = match axis {
            Axis::Row => height,
            Axis::Col => width,
        };
        for i in 0..borders.get(edge) {
            let index = edge.line_index(i, extent);
            estimator.fix_line(
                &mut plane.line_mut(axis, index),
                &reference.line(axis, index),
                radius,
                depth,
            );
        }
    }

    Ok(())
}

/// [`fix_borders_reference`] with a scratch buffer owned by the call.
pub fn fix_borders_from<T: Sample>(
    plane: &mut ImageViewMut<'_, T>,
    reference: &ImageView<'_, T>,
    borders: &Borders,
    radius: usize,
    depth: BitDepth,
) -> Result<(), FixError> {
    check_reference_borders(plane.width(), plane.height(), borders)?;
    let mut estimator = EdgeEstimator::try_new(plane.width().max(plane.height()))?;
    fix_borders_reference(plane, reference, borders, radius, depth, &mut estimator)
}

#[cfg(test)]
mod tests {
    use ef_core::{Axis, BitDepth, Borders, Image};

    use super::fix_borders_from;
    use crate::error::FixError;

    fn noise(width: usize, height: usize, seed: usize) -> Image<u8> {
        let data = (0..width * height)
            .map(|i| ((i * 73 + seed * 151) % 241) as u8)
            .collect();
        Image::from_vec(width, height, data).expect("valid image")
    }

    #[test]
    fn constant_reference_is_copied_exactly() {
        let mut target = Image::new_fill(16, 16, 0u8);
        let reference = Image::new_fill(16, 16, 100u8);

        fix_borders_from(
            &mut target.as_view_mut(),
            &reference.as_view(),
            &Borders::new(3, 0, 0, 0),
            0,
            BitDepth::U8,
        )
        .expect("fix");

        let view = target.as_view();
        for y in 0..16 {
            assert_eq!(&view.row(y)[..3], &[100, 100, 100]);
            assert!(view.row(y)[3..].iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn shrinking_the_border_keeps_inner_lines() {
        let reference = noise(20, 14, 1);
        let mut damaged = noise(20, 14, 2);
        for v in damaged.data_mut() {
            *v /= 3;
        }

        let mut wide = damaged.clone();
        let mut narrow = damaged.clone();
        for (img, top) in [(&mut wide, 3usize), (&mut narrow, 2usize)] {
            fix_borders_from(
                &mut img.as_view_mut(),
                &reference.as_view(),
                &Borders::new(0, top, 0, 2),
                2,
                BitDepth::U8,
            )
            .expect("fix");
        }

        for y in 0..14 {
            if y == 2 {
                assert_ne!(wide.as_view().row(y), narrow.as_view().row(y));
                assert_eq!(narrow.as_view().row(y), damaged.as_view().row(y));
            } else {
                assert_eq!(wide.as_view().row(y), narrow.as_view().row(y), "row {y}");
            }
        }
    }

    #[test]
    fn right_and_bottom_use_mirrored_indices() {
        let (w, h) = (6usize, 5usize);
        let reference: Vec<u16> = (0..w * h).map(|i| (1000 + 37 * i) as u16).collect();
        let halved: Vec<u16> = reference.iter().map(|&v| v / 2).collect();
        let reference = Image::from_vec(w, h, reference).expect("valid image");

        let on_bottom = |i: usize| i / w == h - 1;
        let on_right = |i: usize| i % w == w - 1;
        let cases: [(Borders, &dyn Fn(usize) -> bool); 2] = [
            (Borders::new(0, 0, 0, 1), &on_bottom),
            (Borders::new(0, 0, 1, 0), &on_right),
        ];
        for (borders, on_border) in cases {
            let mut target = Image::from_vec(w, h, halved.clone()).expect("valid image");
            fix_borders_from(
                &mut target.as_view_mut(),
                &reference.as_view(),
                &borders,
                0,
                BitDepth::U16,
            )
            .expect("fix");

            for (i, &got) in target.data().iter().enumerate() {
                let want = if on_border(i) { reference.data()[i] } else { halved[i] };
                assert!(
                    (got as i32 - want as i32).abs() <= 1,
                    "{borders:?} sample {i}: {got} vs {want}"
                );
            }
        }
    }

    #[test]
    fn whole_plane_may_be_covered_but_not_exceeded() {
        let reference = noise(8, 8, 3);
        let mut target = noise(8, 8, 4);
        fix_borders_from(
            &mut target.as_view_mut(),
            &reference.as_view(),
            &Borders::new(4, 4, 4, 4),
            1,
            BitDepth::U8,
        )
        .expect("full cover is allowed");

        let err = fix_borders_from(
            &mut target.as_view_mut(),
            &reference.as_view(),
            &Borders::new(9, 0, 8, 0),
            1,
            BitDepth::U8,
        )
        .expect_err("overlap");
        assert_eq!(
            err,
            FixError::BorderOverflow {
                axis: Axis::Col,
                requested: 17,
                limit: 8
            }
        );
    }

    #[test]
    fn reference_must_match_dimensions() {
        let reference = noise(8, 9, 3);
        let mut target = noise(8, 8, 4);
        let err = fix_borders_from(
            &mut target.as_view_mut(),
            &reference.as_view(),
            &Borders::new(1, 0, 0, 0),
            0,
            BitDepth::U8,
        )
        .expect_err("size mismatch");
        assert_eq!(
            err,
            FixError::DimensionMismatch {
                expected: (8, 8),
                actual: (8, 9)
            }
        );
    }
}
