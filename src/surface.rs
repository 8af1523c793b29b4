// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use image::RgbaImage;

use crate::error::SurfaceError;
use crate::geometry::{Color, Size};

pub const BYTES_PER_PIXEL: usize = 4;

/// CPU side pixel buffer in SDL's ABGR8888 packed format.
///
/// ABGR8888 keeps red in the least significant byte of each packed pixel, so
/// on little-endian hosts the bytes of a pixel sit in memory as R, G, B, A.
/// That is the layout `image::RgbaImage` produces, which lets decoded bytes be
/// copied in verbatim. Rows are tightly packed (`pitch == width * 4`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Allocates a zeroed (fully transparent) surface.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let len = Self::byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    /// Adopts an existing RGBA byte buffer.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SurfaceError> {
        let expected = Self::byte_len(width, height)?;
        if pixels.len() != expected {
            return Err(SurfaceError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self, SurfaceError> {
        let mut surface = Self::new(width, height)?;
        surface.fill(color);
        Ok(surface)
    }

    // SDL stores both pitch and total size in a C int.
    fn byte_len(width: u32, height: u32) -> Result<usize, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroDimension { width, height });
        }
        let len = width as u64 * height as u64 * BYTES_PER_PIXEL as u64;
        if len > i32::MAX as u64 {
            return Err(SurfaceError::TooLarge { width, height });
        }
        Ok(len as usize)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Bytes per row.
    pub fn pitch(&self) -> u32 {
        self.width * BYTES_PER_PIXEL as u32
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Copies `bytes` verbatim over the pixel memory.
    pub fn copy_from(&mut self, bytes: &[u8]) -> Result<(), SurfaceError> {
        if bytes.len() != self.pixels.len() {
            return Err(SurfaceError::LengthMismatch {
                expected: self.pixels.len(),
                actual: bytes.len(),
            });
        }
        self.pixels.copy_from_slice(bytes);
        Ok(())
    }

    pub fn fill(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for pixel in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&bytes);
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let offset = self.offset(x, y)?;
        let p = &self.pixels[offset..offset + BYTES_PER_PIXEL];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    /// Writes one pixel; coordinates outside the surface are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(offset) = self.offset(x, y) {
            self.pixels[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&color.to_bytes());
        }
    }
}

impl TryFrom<RgbaImage> for Surface {
    type Error = SurfaceError;

    fn try_from(image: RgbaImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        Surface::from_rgba(width, height, image.into_raw())
    }
}

impl From<Surface> for RgbaImage {
    fn from(surface: Surface) -> Self {
        let (width, height) = (surface.width, surface.height);
        // Length is validated on construction.
        RgbaImage::from_raw(width, height, surface.pixels)
            .unwrap_or_else(|| RgbaImage::new(width, height))
    }
}
