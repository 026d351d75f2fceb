use rayon::{iter::ParallelIterator, slice::ParallelSliceMut};

use bmpfx_image::Image;

/// Mirror the image horizontally in place.
///
/// For every row, pixel `j` is swapped with pixel `width - 1 - j`, all
/// channels together. Applying the flip twice restores the original image.
///
/// # Example
///
/// ```
/// use bmpfx_image::{Image, ImageSize};
/// use bmpfx_imgproc::flip::horizontal_flip;
///
/// let mut image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 3,
///         height: 1,
///     },
///     vec![1, 2, 3],
/// )
/// .unwrap();
///
/// horizontal_flip(&mut image);
/// assert_eq!(image.as_slice(), &[3, 2, 1]);
/// ```
pub fn horizontal_flip<T, const C: usize>(img: &mut Image<T, C>)
where
    T: Copy + Send + Sync,
{
    let cols = img.cols();
    img.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .for_each(|row| {
            let mut i = 0;
            let mut j = cols - 1;
            while i < j {
                for c in 0..C {
                    row.swap(i * C + c, j * C + c);
                }
                i += 1;
                j -= 1;
            }
        });
}

#[cfg(test)]
mod tests {
    use bmpfx_image::{Image, ImageError, ImageSize};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn hflip_row() -> Result<(), ImageError> {
        // one row of three pixels [P0, P1, P2] becomes [P2, P1, P0]
        #[rustfmt::skip]
        let mut image = Image::<u8, 3>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![
                1, 2, 3,
                4, 5, 6,
                7, 8, 9,
            ],
        )?;

        super::horizontal_flip(&mut image);

        #[rustfmt::skip]
        let expected = [
            7, 8, 9,
            4, 5, 6,
            1, 2, 3,
        ];
        assert_eq!(image.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn hflip_even_width() -> Result<(), ImageError> {
        let mut image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0, 1, 2, 3, 4, 5],
        )?;

        super::horizontal_flip(&mut image);
        assert_eq!(image.as_slice(), &[1, 0, 3, 2, 5, 4]);

        Ok(())
    }

    #[test]
    fn hflip_involution() -> Result<(), ImageError> {
        let mut rng = StdRng::seed_from_u64(17);

        for (width, height) in [(1, 1), (2, 3), (5, 4), (8, 2)] {
            let data: Vec<u8> = (0..width * height * 3).map(|_| rng.random()).collect();
            let mut image = Image::<u8, 3>::new(ImageSize { width, height }, data.clone())?;

            super::horizontal_flip(&mut image);
            super::horizontal_flip(&mut image);

            assert_eq!(image.as_slice(), &data[..], "width={width} height={height}");
        }

        Ok(())
    }
}
