//! # Thumbnail Generation
//!
//! Thumbnails are always exactly the requested size. The source is scaled to
//! fit inside the canvas with its aspect ratio preserved, using
//! nearest-neighbour sampling and integer arithmetic throughout, then centred
//! on a solid white background.

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage, imageops};
use tracing::trace;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Computes the size of the content rectangle inside a `target_width` ×
/// `target_height` canvas.
///
/// When the source is relatively wider than the target, width binds:
/// `(target_width, src_height * target_width / src_width)`. Otherwise height
/// binds: `(src_width * target_height / src_height, target_height)`. Division
/// truncates, so a very thin source can yield a zero-sized side.
pub fn fit_dimensions(
    src_width: u32,
    src_height: u32,
    target_width: u32,
    target_height: u32,
) -> (u32, u32) {
    let (sw, sh) = (u64::from(src_width), u64::from(src_height));
    let (tw, th) = (u64::from(target_width), u64::from(target_height));

    if sw * th > sh * tw {
        (target_width, (sh * tw / sw) as u32)
    } else {
        ((sw * th / sh) as u32, target_height)
    }
}

/// Nearest-neighbour resize. Destination pixel `(x, y)` takes source pixel
/// `(x * src_width / width, y * src_height / height)`.
pub fn resize_nearest<I>(src: &I, width: u32, height: u32) -> RgbaImage
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (sw, sh) = src.dimensions();

    RgbaImage::from_fn(width, height, |x, y| {
        let sx = u64::from(x) * u64::from(sw) / u64::from(width);
        let sy = u64::from(y) * u64::from(sh) / u64::from(height);
        src.get_pixel(sx as u32, sy as u32)
    })
}

/// Produces a `width` × `height` letterboxed thumbnail of `src`.
///
/// The content offset is `((width - content_width) / 2, (height -
/// content_height) / 2)`, truncating towards the top-left for odd margins.
pub fn create_thumbnail(src: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);

    let (src_width, src_height) = src.dimensions();
    if src_width == 0 || src_height == 0 {
        return canvas;
    }

    let (content_width, content_height) = fit_dimensions(src_width, src_height, width, height);
    let content = resize_nearest(src, content_width, content_height);

    let offset_x = (width - content_width) / 2;
    let offset_y = (height - content_height) / 2;
    imageops::replace(
        &mut canvas,
        &content,
        i64::from(offset_x),
        i64::from(offset_y),
    );

    trace!(
        src_width,
        src_height,
        content_width,
        content_height,
        offset_x,
        offset_y,
        "Thumbnail composed"
    );
    canvas
}
