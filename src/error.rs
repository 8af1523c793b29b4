// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use thiserror::Error;

/// Failure to build a [`crate::Pixmap`]. Construction never leaves a partial
/// pixmap or a leaked texture behind.
#[derive(Debug, Error)]
pub enum ResourceCreationError {
    #[error("error while decoding image, file: {filename}, error: {reason}")]
    Decode { filename: String, reason: String },

    #[error(
        "error while creating {width}x{height} surface, file: {filename}, error: {reason}"
    )]
    SurfaceAllocation {
        filename: String,
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("error while creating texture from surface, file: {filename}, error: {reason}")]
    TextureUpload { filename: String, reason: String },
}

impl ResourceCreationError {
    /// Source file the failed pixmap was built from, empty for surfaces.
    pub fn filename(&self) -> &str {
        match self {
            ResourceCreationError::Decode { filename, .. }
            | ResourceCreationError::SurfaceAllocation { filename, .. }
            | ResourceCreationError::TextureUpload { filename, .. } => filename,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("surface dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("surface of {width}x{height} exceeds the addressable pixel buffer size")]
    TooLarge { width: u32, height: u32 },

    #[error("expected {expected} bytes of pixel data, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Backend failure reported by the strict draw calls.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    #[error("failed to set texture alpha modulation: {0}")]
    AlphaMod(String),

    #[error("failed to copy texture: {0}")]
    Copy(String),

    #[error("failed to draw debug outline: {0}")]
    Outline(String),
}
