//! The pixel surface a banner is rendered into.
//!
//! A [`Surface`] wraps a premultiplied tiny-skia pixmap. The same surface
//! serves the in-memory preview and the PNG export.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{Color, Pixmap};

use crate::error::{Error, Result};

/// File name offered for exported banners.
pub const DEFAULT_EXPORT_NAME: &str = "banner.png";

/// A resizable RGBA drawing surface.
///
/// A new surface holds no pixels until the first render allocates it.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    pixmap: Option<Pixmap>,
}

impl Surface {
    /// Creates an unallocated surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transparent surface of the given size.
    pub fn with_size(width: u32, height: u32) -> Result<Self> {
        let mut surface = Self::new();
        surface.allocate(width, height)?;
        Ok(surface)
    }

    /// Resizes the surface if needed and clears it to transparent.
    ///
    /// Fails when the dimensions are zero or too large to allocate. On
    /// failure the previous contents are dropped.
    pub fn allocate(&mut self, width: u32, height: u32) -> Result<&mut Pixmap> {
        let reuse = matches!(&self.pixmap, Some(p) if p.width() == width && p.height() == height);
        if !reuse {
            self.pixmap = None;
            self.pixmap = Some(
                Pixmap::new(width, height).ok_or(Error::SurfaceAllocation { width, height })?,
            );
        }

        let pixmap = self
            .pixmap
            .as_mut()
            .ok_or(Error::SurfaceAllocation { width, height })?;
        pixmap.fill(Color::TRANSPARENT);
        Ok(pixmap)
    }

    pub fn is_allocated(&self) -> bool {
        self.pixmap.is_some()
    }

    pub fn width(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::width)
    }

    pub fn height(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::height)
    }

    /// The underlying premultiplied pixmap, if allocated.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Returns the straight-alpha RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let p = self.pixmap.as_ref()?.pixel(x, y)?;
        let (r, g, b, a) = unpremultiply(p.red(), p.green(), p.blue(), p.alpha());
        Some([r, g, b, a])
    }

    /// True if no pixel has any coverage. An unallocated surface is transparent.
    pub fn is_transparent(&self) -> bool {
        self.pixmap
            .as_ref()
            .is_none_or(|p| p.pixels().iter().all(|px| px.alpha() == 0))
    }

    /// Converts the surface to a straight-alpha `RgbaImage`.
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let pixmap = self.pixmap.as_ref().ok_or(Error::Unallocated)?;
        Ok(pixmap_to_rgba_image(pixmap))
    }

    /// Encodes the surface as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let img = self.to_rgba_image()?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Writes the surface to `path` as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let img = self.to_rgba_image()?;
        img.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

/// Converts a tiny-skia pixmap to an `image::RgbaImage`.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let mut img = RgbaImage::new(width, pixmap.height());

    for (i, px) in pixmap.pixels().iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        // tiny-skia stores premultiplied alpha
        let (r, g, b, a) = unpremultiply(px.red(), px.green(), px.blue(), px.alpha());
        img.put_pixel(x, y, Rgba([r, g, b, a]));
    }

    img
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_surface_is_unallocated() {
        let surface = Surface::new();
        assert!(!surface.is_allocated());
        assert_eq!((surface.width(), surface.height()), (0, 0));
        assert!(surface.is_transparent());
        assert!(matches!(surface.encode_png(), Err(Error::Unallocated)));
    }

    #[test]
    fn zero_size_fails_to_allocate() {
        let mut surface = Surface::new();
        let err = surface.allocate(0, 10).unwrap_err();
        assert!(matches!(err, Error::SurfaceAllocation { width: 0, height: 10 }));
        assert!(!surface.is_allocated());
    }

    #[test]
    fn reallocation_clears_and_resizes() {
        let mut surface = Surface::with_size(4, 4).unwrap();
        surface
            .allocate(4, 4)
            .unwrap()
            .fill(Color::from_rgba8(10, 20, 30, 255));
        assert_eq!(surface.pixel(1, 1), Some([10, 20, 30, 255]));

        // Same size: cleared in place
        surface.allocate(4, 4).unwrap();
        assert!(surface.is_transparent());

        // New size
        surface.allocate(8, 2).unwrap();
        assert_eq!((surface.width(), surface.height()), (8, 2));
        assert!(surface.is_transparent());
    }

    #[test]
    fn unpremultiplies_on_read() {
        let mut surface = Surface::new();
        surface
            .allocate(2, 2)
            .unwrap()
            .fill(Color::from_rgba8(200, 100, 0, 128));

        let [r, g, b, a] = surface.pixel(0, 0).unwrap();
        assert_eq!(a, 128);
        assert!((i32::from(r) - 200).abs() <= 2);
        assert!((i32::from(g) - 100).abs() <= 2);
        assert_eq!(b, 0);

        let img = surface.to_rgba_image().unwrap();
        assert_eq!(img.get_pixel(1, 1).0, [r, g, b, a]);
    }

    #[test]
    fn png_export_decodes_back() {
        let mut surface = Surface::new();
        surface
            .allocate(3, 2)
            .unwrap()
            .fill(Color::from_rgba8(0, 0, 255, 255));

        let bytes = surface.encode_png().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [0, 0, 255, 255]);
    }
}
