//! Side-by-side composition of two rendered graphs

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Place `left` at x=0 and `right` directly after it on a white canvas.
///
/// Both images are stretched (not letterboxed) to the taller height; widths
/// are kept. The result is `(w1 + w2, max(h1, h2))`.
pub fn compose_side_by_side(left: &DynamicImage, right: &DynamicImage) -> RgbImage {
    let height = left.height().max(right.height());
    let left = stretch_to_height(left, height);
    let right = stretch_to_height(right, height);

    let mut canvas = RgbImage::from_pixel(left.width() + right.width(), height, BACKGROUND);
    imageops::replace(&mut canvas, &left, 0, 0);
    imageops::replace(&mut canvas, &right, i64::from(left.width()), 0);
    canvas
}

fn stretch_to_height(img: &DynamicImage, height: u32) -> RgbImage {
    if img.height() == height {
        img.to_rgb8()
    } else {
        img.resize_exact(img.width(), height, FilterType::CatmullRom)
            .to_rgb8()
    }
}

/// Open an image produced by the layout backend.
pub fn load_image(path: &Path) -> ApplicationResult<DynamicImage> {
    debug!("load_image: {}", path.display());
    image::open(path)
        .map_err(|e| ApplicationError::render_backend(format!("unreadable image {}", path.display()), e))
}

pub fn save_image(img: &RgbImage, path: &Path) -> ApplicationResult<()> {
    debug!("save_image: {} ({}x{})", path.display(), img.width(), img.height());
    img.save(path)
        .map_err(|e| ApplicationError::render_backend(format!("write image {}", path.display()), e))
}
