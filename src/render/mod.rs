// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

#[cfg(feature = "sdl")]
pub mod sdl;
pub mod software;

use crate::geometry::{Color, Rect, Reflection};
use crate::settings::GraphicsSettings;
use crate::surface::Surface;

/// Target of texture creation and draw commands.
///
/// Backends report failures as human readable strings, the same shape SDL
/// uses. Methods take `&self`: implementations keep their mutable render
/// state behind `RefCell`/`Cell`, which also keeps them single threaded.
pub trait Renderer {
    /// Owned texture handle. Dropping it releases the backend resource.
    type Texture<'r>
    where
        Self: 'r;

    /// Uploads `surface`. The surface is consumed and freed whether or not the
    /// upload succeeds.
    fn create_texture<'r>(&'r self, surface: Surface) -> Result<Self::Texture<'r>, String>;

    fn set_texture_alpha_mod<'r>(
        &'r self,
        texture: &mut Self::Texture<'r>,
        alpha: u8,
    ) -> Result<(), String>;

    /// Copies `source` (texture pixels) onto `destination`, mirrored per
    /// `reflection` and then rotated clockwise by `angle` degrees about the
    /// centre of `destination`.
    fn copy_ex<'r>(
        &'r self,
        texture: &Self::Texture<'r>,
        source: Rect,
        destination: Rect,
        angle: f64,
        reflection: Reflection,
    ) -> Result<(), String>;

    /// Strokes an unfilled one pixel rectangle.
    fn outline_rect(&self, rect: Rect, color: Color) -> Result<(), String>;

    fn settings(&self) -> &GraphicsSettings;
}
