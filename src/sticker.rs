//! Image to sticker conversion.
//!
//! Stickers are WebP images fitting a 512×512 box, with an alpha channel. The
//! conversion is CPU bound: run it with `tokio::task::spawn_blocking`.

use std::io::Cursor;

use anyhow::Context;
use image::{ImageFormat, imageops::FilterType};

use crate::session::Media;

/// Side of the box stickers are fitted in, in pixels.
pub const STICKER_SIZE: u32 = 512;

/// Converts an image (JPEG, PNG or WebP) into a sticker.
///
/// The aspect ratio is preserved: the longest side ends up at [`STICKER_SIZE`].
///
/// # Errors
///
/// Fails when the image cannot be decoded or encoded.
pub fn make_sticker(media: &Media) -> Result<Media, anyhow::Error> {
    let image = image::load_from_memory(&media.data)
        .with_context(|| format!("unable to decode {} image", media.mimetype))?;

    let resized = image.resize(STICKER_SIZE, STICKER_SIZE, FilterType::Lanczos3);
    let rgba = image::DynamicImage::ImageRgba8(resized.to_rgba8());

    let mut data = Vec::new();
    rgba.write_to(&mut Cursor::new(&mut data), ImageFormat::WebP)
        .context("unable to encode sticker")?;

    Ok(Media {
        mimetype: "image/webp".to_owned(),
        data,
    })
}
