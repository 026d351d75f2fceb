use crate::parallel;
use bmpfx_image::{Image, ImageError};

/// Define the RGB weights for the luminance conversion.
const RW: f64 = 0.299;
const GW: f64 = 0.587;
const BW: f64 = 0.114;

/// Divisor for the flat channel average.
const MEAN_DIVISOR: f64 = 3.0;

/// Convert a BGR image to grayscale in place using the flat channel average:
///
/// Y = round((B + G + R) / 3)
///
/// The average of three values in [0, 255] stays in [0, 255], so the result
/// needs no clamping. Rounding is half away from zero.
///
/// # Example
///
/// ```
/// use bmpfx_image::{Image, ImageSize};
/// use bmpfx_imgproc::color::grayscale;
///
/// let mut image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 1,
///         height: 1,
///     },
///     vec![10, 20, 30],
/// )
/// .unwrap();
///
/// grayscale(&mut image);
/// assert_eq!(image.as_slice(), &[20, 20, 20]);
/// ```
pub fn grayscale(img: &mut Image<u8, 3>) {
    parallel::par_iter_rows_mut(img, |pixel| {
        let sum = pixel[0] as f64 + pixel[1] as f64 + pixel[2] as f64;
        let mean = (sum / MEAN_DIVISOR).round() as u8;
        pixel.fill(mean);
    });
}

/// Compute the weighted luminance of a BGR image:
///
/// Y = round(0.299 * R + 0.587 * G + 0.114 * B)
///
/// # Arguments
///
/// * `src` - The input BGR image.
/// * `dst` - The output luminance image with one channel.
///
/// Precondition: the input and output images must have the same size.
pub fn luma_from_bgr(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let b = src_pixel[0] as f64;
        let g = src_pixel[1] as f64;
        let r = src_pixel[2] as f64;
        dst_pixel[0] = (RW * r + GW * g + BW * b).round() as u8;
    });

    Ok(())
}
