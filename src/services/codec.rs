//! # Image Format Codec
//!
//! Symmetric decode/encode for the three accepted raster formats. The format
//! is always the one settled on by the upload validator; nothing here
//! re-sniffs the bytes.

use std::io::Cursor;

use image::{
    DynamicImage, ImageError, ImageFormat, RgbaImage, codecs::jpeg::JpegEncoder,
};
use thiserror::Error;
use tracing::trace;

use crate::utils::constant::{JPEG_QUALITY, SNIFF_LEN};

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    pub const ALL: [ImageKind; 3] = [ImageKind::Jpeg, ImageKind::Png, ImageKind::Gif];

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Gif => "image/gif",
        }
    }

    /// File extension, including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => ".jpg",
            ImageKind::Png => ".png",
            ImageKind::Gif => ".gif",
        }
    }

    /// Classifies a declared content type. Parameters (`; charset=...`) are
    /// ignored and the comparison is case-insensitive.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        Self::ALL
            .into_iter()
            .find(|kind| essence.eq_ignore_ascii_case(kind.mime_type()))
    }

    /// Classifies the leading bytes of a file by content signature.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        let head = &data[..data.len().min(SNIFF_LEN)];
        let kind = match image::guess_format(head).ok()? {
            ImageFormat::Jpeg => ImageKind::Jpeg,
            ImageFormat::Png => ImageKind::Png,
            ImageFormat::Gif => ImageKind::Gif,
            _ => return None,
        };
        trace!(?kind, "Sniffed image kind");
        Some(kind)
    }

    fn format(self) -> ImageFormat {
        match self {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Gif => ImageFormat::Gif,
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    /// Input bytes are not a valid image of the declared format.
    #[error("failed to decode image: {0}")]
    Decode(#[source] ImageError),
    #[error("failed to encode image: {0}")]
    Encode(#[source] ImageError),
}

/// Decodes `data` as `kind`. GIF input yields its first frame.
pub fn decode(kind: ImageKind, data: &[u8]) -> Result<DynamicImage, CodecError> {
    image::load_from_memory_with_format(data, kind.format()).map_err(CodecError::Decode)
}

/// Encodes `image` as `kind`.
///
/// JPEG is written at a fixed quality of 80 with the alpha channel dropped,
/// PNG losslessly, GIF with the encoder's default palette quantisation.
pub fn encode(kind: ImageKind, image: RgbaImage) -> Result<Vec<u8>, CodecError> {
    let mut buffer = Vec::new();
    let image = DynamicImage::ImageRgba8(image);

    match kind {
        ImageKind::Jpeg => {
            let mut encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
            encoder
                .encode_image(&image.to_rgb8())
                .map_err(CodecError::Encode)?;
        }
        ImageKind::Png | ImageKind::Gif => {
            image
                .write_to(&mut Cursor::new(&mut buffer), kind.format())
                .map_err(CodecError::Encode)?;
        }
    }

    trace!(?kind, size = buffer.len(), "Image encoded");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use image::{GenericImageView, Rgba};

    use super::*;

    fn checkerboard(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    #[test]
    fn from_mime_accepts_only_the_three_formats() {
        assert_eq!(ImageKind::from_mime("image/jpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_mime("image/png"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_mime("image/gif"), Some(ImageKind::Gif));
        assert_eq!(
            ImageKind::from_mime("IMAGE/PNG; charset=binary"),
            Some(ImageKind::Png)
        );
        assert_eq!(ImageKind::from_mime("image/webp"), None);
        assert_eq!(ImageKind::from_mime("image/jpg"), None);
        assert_eq!(ImageKind::from_mime("text/plain"), None);
        assert_eq!(ImageKind::from_mime(""), None);
    }

    #[test]
    fn sniff_recognises_signatures() {
        assert_eq!(
            ImageKind::sniff(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]),
            Some(ImageKind::Jpeg)
        );
        assert_eq!(
            ImageKind::sniff(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"),
            Some(ImageKind::Png)
        );
        assert_eq!(ImageKind::sniff(b"GIF89a\x01\x00"), Some(ImageKind::Gif));
        assert_eq!(ImageKind::sniff(b"GIF87a\x01\x00"), Some(ImageKind::Gif));
        assert_eq!(ImageKind::sniff(b"BM\0\0\0\0\0\0\0\0\0\0"), None);
        assert_eq!(ImageKind::sniff(b"This is not an image"), None);
        assert_eq!(ImageKind::sniff(&[]), None);
    }

    #[test]
    fn encoded_output_decodes_with_same_dimensions() {
        for kind in ImageKind::ALL {
            let bytes = encode(kind, checkerboard(12, 7)).expect("encode");
            assert_eq!(ImageKind::sniff(&bytes), Some(kind));

            let decoded = decode(kind, &bytes).expect("decode");
            assert_eq!(decoded.dimensions(), (12, 7), "{kind:?}");
        }
    }

    #[test]
    fn png_encoding_is_lossless() {
        let source = checkerboard(5, 5);
        let bytes = encode(ImageKind::Png, source.clone()).unwrap();
        let decoded = decode(ImageKind::Png, &bytes).unwrap().to_rgba8();
        assert_eq!(decoded, source);
    }

    #[test]
    fn decode_rejects_mismatched_bytes() {
        assert!(matches!(
            decode(ImageKind::Png, b"This is not an image"),
            Err(CodecError::Decode(_))
        ));

        let png = encode(ImageKind::Png, checkerboard(2, 2)).unwrap();
        assert!(matches!(
            decode(ImageKind::Jpeg, &png),
            Err(CodecError::Decode(_))
        ));
    }
}
