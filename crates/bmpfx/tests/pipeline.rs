use bmpfx::image::{Image, ImageSize};
use bmpfx::imgproc::{color, edges, filter, flip};
use bmpfx::io::bmp::Bmp;
use bmpfx::io::IoError;

fn gradient_bmp(width: usize, height: usize) -> Bmp {
    let data = (0..width * height * 3).map(|i| (i * 5 % 256) as u8).collect();
    Bmp::from_image(Image::new(ImageSize { width, height }, data).unwrap())
}

#[test]
fn identity_roundtrip_is_byte_exact() -> Result<(), IoError> {
    // width 3 forces a nonzero per-row padding
    let stream = gradient_bmp(3, 4).encode()?;

    let decoded = Bmp::decode(&stream)?;
    assert_eq!(decoded.encode()?, stream);

    Ok(())
}

#[test]
fn grayscale_pipeline() -> Result<(), IoError> {
    let mut bmp = Bmp::decode(&gradient_bmp(4, 3).encode()?)?;

    color::grayscale(&mut bmp.image);
    let stream = bmp.encode()?;

    let back = Bmp::decode(&stream)?;
    for pixel in back.image.as_slice().chunks_exact(3) {
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
    }

    Ok(())
}

#[test]
fn reflect_twice_restores_stream() -> Result<(), IoError> {
    let stream = gradient_bmp(5, 2).encode()?;

    let mut bmp = Bmp::decode(&stream)?;
    flip::horizontal_flip(&mut bmp.image);
    flip::horizontal_flip(&mut bmp.image);

    assert_eq!(bmp.encode()?, stream);

    Ok(())
}

#[test]
fn blur_keeps_uniform_stream() -> Result<(), IoError> {
    let uniform = Bmp::from_image(
        Image::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            200,
        )
        .unwrap(),
    );
    let stream = uniform.encode()?;

    let mut bmp = Bmp::decode(&stream)?;
    filter::box_blur_inplace(&mut bmp.image)?;

    assert_eq!(bmp.encode()?, stream);

    Ok(())
}

#[test]
fn edges_on_black_stays_black() -> Result<(), IoError> {
    let black = Bmp::from_image(
        Image::from_size_val(
            ImageSize {
                width: 6,
                height: 4,
            },
            0,
        )
        .unwrap(),
    );

    let mut bmp = Bmp::decode(&black.encode()?)?;
    edges::edges(&mut bmp.image)?;

    assert!(bmp.image.as_slice().iter().all(|&v| v == 0));

    Ok(())
}
