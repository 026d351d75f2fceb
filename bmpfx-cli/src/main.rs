use std::path::{Path, PathBuf};
use std::process::ExitCode;

use argh::FromArgs;

use bmpfx::image::Image;
use bmpfx::imgproc::{color, edges, filter, flip};
use bmpfx::io::bmp::{read_image_bmp, write_image_bmp};
use bmpfx::io::IoError;

// exit codes, one per failure class
const EXIT_USAGE: u8 = 1;
const EXIT_INPUT: u8 = 2;
const EXIT_FORMAT: u8 = 3;
const EXIT_TRANSFORM: u8 = 4;
const EXIT_OUTPUT: u8 = 5;

#[derive(FromArgs)]
/// Apply a pixel transform to an uncompressed 24-bit Windows bitmap.
struct Args {
    /// blur the image with a 3x3 box filter
    #[argh(switch, short = 'b')]
    blur: bool,

    /// detect edges with the sobel operator
    #[argh(switch, short = 'e')]
    edges: bool,

    /// convert the image to grayscale
    #[argh(switch, short = 'g')]
    grayscale: bool,

    /// mirror the image horizontally
    #[argh(switch, short = 'r')]
    reflect: bool,

    /// path to the input bitmap
    #[argh(positional)]
    input: PathBuf,

    /// path to write the transformed bitmap
    #[argh(positional)]
    output: PathBuf,
}

#[derive(Clone, Copy, Debug)]
enum Transform {
    Blur,
    Edges,
    Grayscale,
    Reflect,
}

impl Args {
    /// The selected transform, if exactly one switch was given.
    fn transform(&self) -> Option<Transform> {
        let switches = [
            (self.blur, Transform::Blur),
            (self.edges, Transform::Edges),
            (self.grayscale, Transform::Grayscale),
            (self.reflect, Transform::Reflect),
        ];
        let mut selected = switches.iter().filter(|(on, _)| *on).map(|(_, t)| *t);
        match (selected.next(), selected.next()) {
            (Some(transform), None) => Some(transform),
            _ => None,
        }
    }
}

fn apply(transform: Transform, image: &mut Image<u8, 3>) -> Result<(), bmpfx::image::ImageError> {
    match transform {
        Transform::Blur => filter::box_blur_inplace(image),
        Transform::Edges => edges::edges(image),
        Transform::Grayscale => {
            color::grayscale(image);
            Ok(())
        }
        Transform::Reflect => {
            flip::horizontal_flip(image);
            Ok(())
        }
    }
}

fn input_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::FileDoesNotExist(_) | IoError::FileError(_) => EXIT_INPUT,
        _ => EXIT_FORMAT,
    }
}

fn run(transform: Transform, input: &Path, output: &Path) -> Result<(), (u8, String)> {
    let mut bmp = read_image_bmp(input).map_err(|e| (input_exit_code(&e), e.to_string()))?;
    log::info!(
        "decoded {} ({} x {})",
        input.display(),
        bmp.image.width(),
        bmp.image.height()
    );

    apply(transform, &mut bmp.image).map_err(|e| (EXIT_TRANSFORM, e.to_string()))?;
    log::info!("applied {transform:?}");

    write_image_bmp(output, &bmp).map_err(|e| (EXIT_OUTPUT, e.to_string()))?;
    log::info!("wrote {}", output.display());

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Args = argh::from_env();
    let Some(transform) = args.transform() else {
        eprintln!("exactly one of -b, -e, -g, -r must be given");
        return ExitCode::from(EXIT_USAGE);
    };

    match run(transform, &args.input, &args.output) {
        Ok(()) => ExitCode::SUCCESS,
        Err((code, message)) => {
            eprintln!("error: {message}");
            ExitCode::from(code)
        }
    }
}
