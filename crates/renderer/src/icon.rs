//! Export of a [`RasterImage`] for the icon host.

use crate::raster::RasterImage;
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use std::{io::Cursor, path::Path};
use tray_core::{Result, TrayError};
use tray_theme::Color;

/// Convert to 8-bit RGBA.  Pixels equal to `transparent` get alpha `0`.
pub fn to_rgba(img: &RasterImage, transparent: Option<Color>) -> RgbaImage {
    RgbaImage::from_fn(img.side(), img.side(), |x, y| {
        let color = img.get(x, y).unwrap_or_default();
        let [r, g, b] = color.to_rgb8();
        let alpha = if Some(color) == transparent { 0 } else { u8::MAX };
        Rgba([r, g, b, alpha])
    })
}

/// Encode as PNG.
pub fn encode_png(rgba: RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(rgba)
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .map_err(|e| TrayError::Render(format!("PNG encoding failed: {e}")))?;
    Ok(buffer.into_inner())
}

/// Write `bytes` to `path` through a sibling temp file, so a reader never
/// sees a half-written icon.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("png.tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Render-side convenience: RGBA conversion, PNG encoding and atomic write.
pub fn export(img: &RasterImage, transparent: Option<Color>, path: &Path) -> Result<()> {
    let png = encode_png(to_rgba(img, transparent))?;
    write_atomic(path, &png)
}
