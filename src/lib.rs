// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

//! Bitmap to texture wrapper.
//!
//! A [`Pixmap`] decodes an image file, or adopts a pixel [`Surface`], uploads
//! it to a [`Renderer`] and draws it with rotation, mirroring and alpha.

pub mod decoder;
pub mod error;
pub mod geometry;
pub mod pixmap;
pub mod render;
pub mod settings;
pub mod surface;
pub mod utils;

pub use decoder::{DecodedImage, ImageDecoder, PngDecoder};
pub use error::{DrawError, ResourceCreationError, SurfaceError};
pub use geometry::{Color, Point, Rect, Reflection, Size};
pub use pixmap::Pixmap;
pub use render::Renderer;
#[cfg(feature = "sdl")]
pub use render::sdl::SdlRenderer;
pub use render::software::{SoftwareRenderer, SoftwareTexture, TextureStats};
pub use settings::{DebugOverlaySettings, GraphicsSettings, SettingsError};
pub use surface::Surface;
