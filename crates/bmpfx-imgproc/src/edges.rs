use bmpfx_image::{Image, ImageError};

use crate::{color, filter, parallel};

/// White output value of the edge threshold.
const EDGE_ON: u8 = 255;
/// Black output value of the edge threshold.
const EDGE_OFF: u8 = 0;

/// Detect edges in a BGR image in place.
///
/// The transform is a fixed four-stage pipeline:
///
/// 1. The image is grayscaled with the flat channel average
///    ([`color::grayscale`]).
/// 2. The BT.601 luminance of the pixels captured *before* stage 1 replaces
///    the flat average in all three channels ([`color::luma_from_bgr`]).
/// 3. The sobel gradient magnitude of the luminance plane is computed into
///    its own buffer, with out-of-bounds neighbors contributing zero
///    ([`filter::sobel_magnitude`]).
/// 4. Each pixel whose magnitude exceeds its own luminance becomes white,
///    every other pixel black, and one box-blur pass softens the result.
///
/// The pipeline holds no state across calls. A refused working-buffer
/// allocation propagates [`ImageError::AllocationFailed`] immediately.
pub fn edges(img: &mut Image<u8, 3>) -> Result<(), ImageError> {
    let original = img.try_clone()?;

    // stage 1: flat average, superseded by the weighted luminance below
    color::grayscale(img);

    // stage 2: luminance of the original channels, not the grayscaled ones
    let mut luma = Image::<u8, 1>::try_from_size_val(original.size(), 0)?;
    color::luma_from_bgr(&original, &mut luma)?;
    parallel::par_iter_rows(&luma, img, |luma_pixel, dst_pixel| {
        dst_pixel.fill(luma_pixel[0]);
    });

    // stage 3: gradient magnitude of the luminance scalar field
    let luma_f32 = luma.cast::<f32>()?;
    let mut magnitude = Image::<f32, 1>::try_from_size_val(original.size(), 0.0)?;
    filter::sobel_magnitude(&luma_f32, &mut magnitude)?;

    // stage 4: threshold against the per-pixel luminance, then soften
    parallel::par_iter_rows_two(&magnitude, &luma, img, |mag_pixel, luma_pixel, dst_pixel| {
        let on = mag_pixel[0] > luma_pixel[0] as f32;
        dst_pixel.fill(if on { EDGE_ON } else { EDGE_OFF });
    });
    filter::box_blur_inplace(img)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use bmpfx_image::{Image, ImageError, ImageSize};

    #[test]
    fn edges_black_image() -> Result<(), ImageError> {
        // zero luminance gives zero gradient, and 0 > 0 is false
        for (width, height) in [(1, 1), (3, 3), (5, 2)] {
            let mut image = Image::<u8, 3>::from_size_val(ImageSize { width, height }, 0)?;

            super::edges(&mut image)?;
            assert!(
                image.as_slice().iter().all(|&v| v == 0),
                "width={width} height={height}"
            );
        }

        Ok(())
    }

    #[test]
    fn edges_uniform_interior_stays_black() -> Result<(), ImageError> {
        // a uniform image has zero gradient away from the border; the border
        // ring itself responds to the sobel zero frame
        let mut image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 5,
                height: 5,
            },
            100,
        )?;

        super::edges(&mut image)?;

        // center pixel and its full 3x3 neighborhood thresholded black
        assert_eq!(image.get(2, 2), Some(&[0u8, 0, 0][..]));
        // the corner thresholds white and blurs with one interior black cell
        assert_eq!(image.get(0, 0), Some(&[191u8, 191, 191][..]));

        Ok(())
    }

    #[test]
    fn edges_luma_uses_source_channels() -> Result<(), ImageError> {
        // pixel 0: saturated color whose flat average (80) differs from its
        // weighted luminance (128); pixel 1: achromatic 60.
        // the gradient magnitude at pixel 0 is 2 * 60 = 120, which exceeds 80
        // but not 128, so the threshold only stays black when the luminance
        // came from the original channels.
        let mut image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![10, 200, 30, 60, 60, 60],
        )?;

        super::edges(&mut image)?;

        // threshold: [black, white]; box blur: both round((0 + 255) / 2) = 128
        assert_eq!(image.as_slice(), &[128, 128, 128, 128, 128, 128]);

        Ok(())
    }

    #[test]
    fn edges_stateless_across_calls() -> Result<(), ImageError> {
        let data: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 7 % 256) as u8).collect();
        let size = ImageSize {
            width: 4,
            height: 3,
        };

        let mut first = Image::<u8, 3>::new(size, data.clone())?;
        let mut second = Image::<u8, 3>::new(size, data)?;

        super::edges(&mut first)?;
        super::edges(&mut second)?;

        assert_eq!(first.as_slice(), second.as_slice());

        Ok(())
    }
}
