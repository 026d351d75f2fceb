use bmpfx_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use super::kernels;

/// Blur an image with a 3x3 box filter.
///
/// Each destination channel is the arithmetic mean of the channel values of
/// the neighborhood cells that lie inside the grid: neighbors outside the
/// bounds are excluded from both sum and count, so the divisor is 9 for
/// interior pixels, 6 on edges, 4 in corners and 1 for a 1x1 image. The mean
/// is rounded half away from zero.
///
/// Every output pixel is computed from `src` only, so `src` and `dst` must be
/// distinct buffers of the same size.
///
/// # Example
///
/// ```
/// use bmpfx_image::{Image, ImageSize};
/// use bmpfx_imgproc::filter::box_blur;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![10, 20],
/// )
/// .unwrap();
///
/// let mut blurred = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
/// box_blur(&image, &mut blurred).unwrap();
/// assert_eq!(blurred.as_slice(), &[15, 15]);
/// ```
pub fn box_blur<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let rows = src.rows();
    let cols = src.cols();
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(r, dst_row)| {
            dst_row
                .chunks_exact_mut(C)
                .enumerate()
                .for_each(|(c, dst_pixel)| {
                    let mut sum = [0u32; C];
                    let mut count = 0u32;
                    for (dr, dc) in kernels::NEIGHBORHOOD_3X3 {
                        let (Some(nr), Some(nc)) =
                            (r.checked_add_signed(dr), c.checked_add_signed(dc))
                        else {
                            continue;
                        };
                        if nr >= rows || nc >= cols {
                            continue;
                        }
                        let offset = (nr * cols + nc) * C;
                        for ch in 0..C {
                            sum[ch] += src_data[offset + ch] as u32;
                        }
                        count += 1;
                    }
                    for ch in 0..C {
                        dst_pixel[ch] = (sum[ch] as f32 / count as f32).round() as u8;
                    }
                });
        });

    Ok(())
}

/// Blur an image with a 3x3 box filter in place.
///
/// Allocates the working buffer the blur needs, blurs into it and copies the
/// result back. A refused allocation propagates
/// [`ImageError::AllocationFailed`] and leaves the image untouched.
pub fn box_blur_inplace<const C: usize>(img: &mut Image<u8, C>) -> Result<(), ImageError> {
    let mut tmp = Image::<u8, C>::try_from_size_val(img.size(), 0)?;
    box_blur(img, &mut tmp)?;
    img.as_slice_mut().copy_from_slice(tmp.as_slice());
    Ok(())
}

/// Compute the sobel gradient magnitude of an image.
///
/// Correlates each channel with the 3x3 kernel pair from
/// [`kernels::sobel_kernel_3x3`]; neighbors outside the grid contribute zero.
/// The magnitude `round(sqrt(gx^2 + gy^2))` is written to `dst`, which must
/// be a buffer distinct from `src` with the same size.
pub fn sobel_magnitude<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (kernel_x, kernel_y) = kernels::sobel_kernel_3x3();
    let rows = src.rows();
    let cols = src.cols();
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(r, dst_row)| {
            dst_row
                .chunks_exact_mut(C)
                .enumerate()
                .for_each(|(c, dst_pixel)| {
                    let mut sum_x = [0.0f32; C];
                    let mut sum_y = [0.0f32; C];
                    for (dr, dc) in kernels::NEIGHBORHOOD_3X3 {
                        // out-of-bounds neighbors contribute zero
                        let (Some(nr), Some(nc)) =
                            (r.checked_add_signed(dr), c.checked_add_signed(dc))
                        else {
                            continue;
                        };
                        if nr >= rows || nc >= cols {
                            continue;
                        }
                        let wx = kernel_x[(dr + 1) as usize][(dc + 1) as usize];
                        let wy = kernel_y[(dr + 1) as usize][(dc + 1) as usize];
                        let offset = (nr * cols + nc) * C;
                        for ch in 0..C {
                            let val = src_data[offset + ch];
                            sum_x[ch] += val * wx;
                            sum_y[ch] += val * wy;
                        }
                    }
                    for ch in 0..C {
                        dst_pixel[ch] =
                            (sum_x[ch] * sum_x[ch] + sum_y[ch] * sum_y[ch]).sqrt().round();
                    }
                });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmpfx_image::ImageSize;

    #[test]
    fn box_blur_uniform_invariant() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            77,
        )?;
        let mut blurred = Image::from_size_val(image.size(), 0)?;

        box_blur(&image, &mut blurred)?;
        assert_eq!(blurred.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn box_blur_single_pixel() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            vec![42, 128, 255],
        )?;
        let mut blurred = Image::from_size_val(image.size(), 0)?;

        box_blur(&image, &mut blurred)?;
        assert_eq!(blurred.as_slice(), &[42, 128, 255]);

        Ok(())
    }

    #[test]
    fn box_blur_neighbor_counts() -> Result<(), ImageError> {
        // 2x3 grid: corners average 4 cells, edge midpoints 6
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![
                0, 10, 20,
                30, 40, 50,
            ],
        )?;
        let mut blurred = Image::from_size_val(image.size(), 0)?;

        box_blur(&image, &mut blurred)?;

        #[rustfmt::skip]
        let expected = [
            20, 25, 30,
            20, 25, 30,
        ];
        assert_eq!(blurred.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn box_blur_rounds_half_away_from_zero() -> Result<(), ImageError> {
        // every 2x2 mean is 10 / 4 = 2.5 and must become 3, not 2
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1, 2, 3, 4],
        )?;
        let mut blurred = Image::from_size_val(image.size(), 0)?;

        box_blur(&image, &mut blurred)?;
        assert_eq!(blurred.as_slice(), &[3, 3, 3, 3]);

        Ok(())
    }

    #[test]
    fn box_blur_reads_source_only() -> Result<(), ImageError> {
        // a blurred neighbor must never feed the next pixel's average
        let mut image = Image::<u8, 1>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![90, 0, 0],
        )?;

        box_blur_inplace(&mut image)?;

        // (90+0)/2=45, (90+0+0)/3=30, (0+0)/2=0 from the original values
        assert_eq!(image.as_slice(), &[45, 30, 0]);

        Ok(())
    }

    #[test]
    fn box_blur_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;
        let mut blurred = Image::from_size_val(
            ImageSize {
                width: 2,
                height: 3,
            },
            0,
        )?;

        let res = box_blur(&image, &mut blurred);
        assert!(matches!(res, Err(ImageError::InvalidImageSize(..))));

        Ok(())
    }

    #[test]
    fn sobel_magnitude_regression() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            vec![
                0.0, 1.0, 2.0,
                3.0, 4.0, 5.0,
                6.0, 7.0, 8.0,
            ],
        )?;
        let mut magnitude = Image::from_size_val(image.size(), 0.0)?;

        sobel_magnitude(&image, &mut magnitude)?;

        // center: gx = 8, gy = 24, round(sqrt(640)) = 25
        assert_eq!(magnitude.get(1, 1), Some(&[25.0f32][..]));
        // top-left corner with the zero frame: gx = 6, gy = 10, round(sqrt(136)) = 12
        assert_eq!(magnitude.get(0, 0), Some(&[12.0f32][..]));

        Ok(())
    }

    #[test]
    fn boundary_policies_differ() -> Result<(), ImageError> {
        // the two neighborhood operators intentionally disagree at the border:
        // box blur excludes out-of-bounds cells, sobel treats them as zero
        let uniform = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            100,
        )?;

        let mut blurred = Image::from_size_val(uniform.size(), 0)?;
        box_blur(&uniform, &mut blurred)?;
        assert_eq!(blurred.as_slice(), uniform.as_slice());

        let mut magnitude = Image::from_size_val(uniform.size(), 0.0)?;
        sobel_magnitude(&uniform.cast::<f32>()?, &mut magnitude)?;

        // every corner sees gx = gy = 300 against the zero frame
        let expected = (300.0f32 * 300.0 * 2.0).sqrt().round();
        assert!(magnitude.as_slice().iter().all(|&m| m == expected));

        Ok(())
    }
}
