use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use bmpfx_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

/// Represents an image with pixel data.
///
/// The pixel data is stored as a flat row-major buffer of length
/// `height * width * C`, where the element for `(row, col, channel)` lives at
/// `(row * width + col) * C + channel`.
#[derive(Clone)]
pub struct Image<T, const C: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const C: usize> Image<T, C> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use bmpfx_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        if data.len() != size.width * size.height * C {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.width * size.height * C,
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `val` - The default value of the pixel data.
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * C];
        Image::new(size, data)
    }

    /// Create a new image with the given size, reporting allocation failure.
    ///
    /// Unlike [`Image::from_size_val`], a refused allocation surfaces as
    /// [`ImageError::AllocationFailed`] instead of aborting the process.
    /// Transform working buffers are allocated through this path.
    pub fn try_from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let len = size.width * size.height * C;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| ImageError::AllocationFailed(len))?;
        data.resize(len, val);
        Image::new(size, data)
    }

    /// Clone the image, reporting allocation failure.
    ///
    /// The counterpart of [`Image::try_from_size_val`] for snapshot buffers.
    pub fn try_clone(&self) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let mut data = Vec::new();
        data.try_reserve_exact(self.data.len())
            .map_err(|_| ImageError::AllocationFailed(self.data.len()))?;
        data.extend_from_slice(&self.data);
        Image::new(self.size, data)
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// # Returns
    ///
    /// A new image with the pixel data cast to the given type.
    ///
    /// # Examples
    ///
    /// ```
    /// use bmpfx_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 1>::new(
    ///     ImageSize { width: 2, height: 1 },
    ///     vec![0u8, 255],
    /// ).unwrap();
    ///
    /// let image_f32 = image.cast::<f32>().unwrap();
    /// assert_eq!(image_f32.as_slice(), &[0.0, 255.0]);
    /// ```
    pub fn cast<U>(&self) -> Result<Image<U, C>, ImageError>
    where
        T: Copy + num_traits::NumCast,
        U: num_traits::NumCast,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| {
                U::from(x).ok_or_else(|| {
                    ImageError::CastError(std::any::type_name::<U>().to_string())
                })
            })
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, casted_data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        C
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a mutable flat slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get one pixel as a slice of its `C` channel values.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use bmpfx_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///     ImageSize { width: 2, height: 1 },
    ///     vec![0, 1, 2, 3, 4, 5],
    /// ).unwrap();
    ///
    /// assert_eq!(image.get(0, 1), Some(&[3u8, 4, 5][..]));
    /// assert_eq!(image.get(1, 0), None);
    /// ```
    pub fn get(&self, row: usize, col: usize) -> Option<&[T]> {
        if row >= self.size.height || col >= self.size.width {
            return None;
        }
        let offset = (row * self.size.width + col) * C;
        Some(&self.data[offset..offset + C])
    }

    /// Get one pixel as a mutable slice of its `C` channel values.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut [T]> {
        if row >= self.size.height || col >= self.size.width {
            return None;
        }
        let offset = (row * self.size.width + col) * C;
        Some(&mut self.data[offset..offset + C])
    }
}
