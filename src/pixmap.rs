// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use std::path::Path;

use crate::decoder::{ImageDecoder, PngDecoder};
use crate::error::{DrawError, ResourceCreationError, SurfaceError};
use crate::geometry::{Rect, Reflection, Size};
use crate::render::Renderer;
use crate::surface::Surface;
use crate::utils::scope_timer::ScopeTimer;

/// A texture uploaded to `R`, with a logical size and draw operations.
///
/// The pixmap borrows the renderer that created its texture, so the renderer
/// always outlives it. The texture is released exactly once, when the pixmap
/// is dropped.
pub struct Pixmap<'r, R: Renderer + 'r> {
    renderer: &'r R,
    size: Size,
    texture: R::Texture<'r>,
    label: String,
}

impl<'r, R: Renderer + 'r> Pixmap<'r, R> {
    /// Decodes the image at `path` and uploads it.
    pub fn from_file(
        renderer: &'r R,
        path: impl AsRef<Path>,
    ) -> Result<Self, ResourceCreationError> {
        Self::from_file_with(renderer, path, &PngDecoder)
    }

    /// Like [`Pixmap::from_file`], with an explicit decoder.
    pub fn from_file_with<D>(
        renderer: &'r R,
        path: impl AsRef<Path>,
        decoder: &D,
    ) -> Result<Self, ResourceCreationError>
    where
        D: ImageDecoder + ?Sized,
    {
        let path = path.as_ref();
        let filename = path.display().to_string();
        let timer = ScopeTimer::new("pixmap load");

        let decoded = decoder
            .decode(path)
            .map_err(|e| ResourceCreationError::Decode {
                filename: filename.clone(),
                reason: e.to_string(),
            })?;
        let (width, height) = (decoded.width, decoded.height);

        let mut surface = Surface::new(width, height)
            .map_err(|e| surface_allocation_error(&filename, width, height, e))?;
        surface
            .copy_from(&decoded.pixels)
            .map_err(|e| surface_allocation_error(&filename, width, height, e))?;

        let texture = renderer
            .create_texture(surface)
            .map_err(|reason| ResourceCreationError::TextureUpload {
                filename: filename.clone(),
                reason,
            })?;

        log::info!("loaded {} in {} ms", filename, timer.elapsed_ms());

        Ok(Self {
            renderer,
            size: Size::new(width, height),
            texture,
            label: filename,
        })
    }

    /// Takes ownership of an already rasterized surface and uploads it.
    pub fn from_surface(
        renderer: &'r R,
        surface: Surface,
    ) -> Result<Self, ResourceCreationError> {
        let size = surface.size();
        let texture = renderer
            .create_texture(surface)
            .map_err(|reason| ResourceCreationError::TextureUpload {
                filename: String::new(),
                reason,
            })?;

        log::debug!("created {}x{} pixmap from surface", size.width, size.height);

        Ok(Self {
            renderer,
            size,
            texture,
            label: String::new(),
        })
    }

    /// Draws `source` (texture pixels) into `destination`, mirrored by
    /// `reflection` and rotated clockwise by `angle` degrees about the centre
    /// of `destination`. `alpha` replaces the texture's alpha modulation.
    ///
    /// Backend failures are ignored; use [`Pixmap::try_draw`] to observe them.
    pub fn draw(
        &mut self,
        source: Rect,
        destination: Rect,
        angle: f64,
        reflection: Reflection,
        alpha: u8,
    ) {
        self.draw_outlined(source, destination, angle, reflection, alpha, None);
    }

    /// Like [`Pixmap::draw`], but stops at and returns the first backend failure.
    pub fn try_draw(
        &mut self,
        source: Rect,
        destination: Rect,
        angle: f64,
        reflection: Reflection,
        alpha: u8,
    ) -> Result<(), DrawError> {
        self.try_draw_outlined(source, destination, angle, reflection, alpha, None)
    }

    /// [`Pixmap::draw`], then strokes `outline` when the renderer's debug
    /// overlay is enabled.
    pub fn draw_outlined(
        &mut self,
        source: Rect,
        destination: Rect,
        angle: f64,
        reflection: Reflection,
        alpha: u8,
        outline: Option<Rect>,
    ) {
        let renderer = self.renderer;
        let _ = renderer.set_texture_alpha_mod(&mut self.texture, alpha);
        let _ = renderer.copy_ex(&self.texture, source, destination, angle, reflection);

        let overlay = renderer.settings().debug_overlay;
        if let (true, Some(rect)) = (overlay.enabled, outline) {
            let _ = renderer.outline_rect(rect, overlay.color);
        }
    }

    /// Like [`Pixmap::draw_outlined`], but stops at and returns the first
    /// backend failure. The outline is not drawn if the copy failed.
    pub fn try_draw_outlined(
        &mut self,
        source: Rect,
        destination: Rect,
        angle: f64,
        reflection: Reflection,
        alpha: u8,
        outline: Option<Rect>,
    ) -> Result<(), DrawError> {
        let renderer = self.renderer;
        renderer
            .set_texture_alpha_mod(&mut self.texture, alpha)
            .map_err(DrawError::AlphaMod)?;
        renderer
            .copy_ex(&self.texture, source, destination, angle, reflection)
            .map_err(DrawError::Copy)?;

        let overlay = renderer.settings().debug_overlay;
        if let (true, Some(rect)) = (overlay.enabled, outline) {
            renderer
                .outline_rect(rect, overlay.color)
                .map_err(DrawError::Outline)?;
        }
        Ok(())
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Overrides the logical size, e.g. to the cell size of a sprite sheet.
    /// The texture itself is untouched.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Native texture, for drawing directly against the renderer.
    pub fn texture(&self) -> &R::Texture<'r> {
        &self.texture
    }

    pub fn texture_mut(&mut self) -> &mut R::Texture<'r> {
        &mut self.texture
    }

    /// Source filename, empty for pixmaps built from a surface.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<'r, R: Renderer + 'r> Drop for Pixmap<'r, R> {
    fn drop(&mut self) {
        log::debug!("destroyed {}", self.label);
    }
}

fn surface_allocation_error(
    filename: &str,
    width: u32,
    height: u32,
    error: SurfaceError,
) -> ResourceCreationError {
    ResourceCreationError::SurfaceAllocation {
        filename: filename.to_owned(),
        width,
        height,
        reason: error.to_string(),
    }
}
