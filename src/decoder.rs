// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use std::path::Path;

use image::{ImageError, ImageReader};

use crate::geometry::Size;

/// Raw RGBA8 pixels plus dimensions. `pixels.len()` is `width * height * 4`
/// for every decoder in this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Turns an encoded image file into raw pixels.
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ImageError>;
}

/// Default decoder, backed by the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngDecoder;

impl ImageDecoder for PngDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ImageError> {
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(DecodedImage {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }
}
