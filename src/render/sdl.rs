// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use std::cell::RefCell;

use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, RenderTarget, Texture, TextureCreator};

use crate::geometry::{Color, Rect, Reflection};
use crate::render::Renderer;
use crate::settings::GraphicsSettings;
use crate::surface::Surface;

/// SDL2 accelerated (or software) renderer over a window or surface canvas.
pub struct SdlRenderer<T: RenderTarget> {
    canvas: RefCell<Canvas<T>>,
    creator: TextureCreator<T::Context>,
    settings: GraphicsSettings,
}

impl<T: RenderTarget> SdlRenderer<T> {
    pub fn new(canvas: Canvas<T>) -> Self {
        let creator = canvas.texture_creator();
        Self {
            canvas: RefCell::new(canvas),
            creator,
            settings: GraphicsSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GraphicsSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Runs `f` with the canvas, e.g. to clear or present a frame.
    pub fn with_canvas<F, O>(&self, f: F) -> Result<O, String>
    where
        F: FnOnce(&mut Canvas<T>) -> O,
    {
        let mut canvas = self.canvas.try_borrow_mut().map_err(|e| e.to_string())?;
        Ok(f(&mut canvas))
    }

    pub fn into_canvas(self) -> Canvas<T> {
        self.canvas.into_inner()
    }
}

impl<T: RenderTarget> Renderer for SdlRenderer<T> {
    type Texture<'r>
        = Texture<'r>
    where
        Self: 'r;

    fn create_texture<'r>(&'r self, surface: Surface) -> Result<Texture<'r>, String> {
        let (width, height, pitch) = (surface.width(), surface.height(), surface.pitch());
        let mut pixels = surface.into_pixels();
        let sdl_surface = sdl2::surface::Surface::from_data(
            &mut pixels,
            width,
            height,
            pitch,
            PixelFormatEnum::ABGR8888,
        )?;
        self.creator
            .create_texture_from_surface(&sdl_surface)
            .map_err(|e| e.to_string())
    }

    fn set_texture_alpha_mod<'r>(
        &'r self,
        texture: &mut Texture<'r>,
        alpha: u8,
    ) -> Result<(), String> {
        texture.set_alpha_mod(alpha);
        Ok(())
    }

    fn copy_ex<'r>(
        &'r self,
        texture: &Texture<'r>,
        source: Rect,
        destination: Rect,
        angle: f64,
        reflection: Reflection,
    ) -> Result<(), String> {
        let src: sdl2::rect::Rect = source.into();
        let dst: sdl2::rect::Rect = destination.into();
        let mut canvas = self.canvas.try_borrow_mut().map_err(|e| e.to_string())?;
        // No centre override: SDL rotates about the centre of `dst`.
        canvas.copy_ex(
            texture,
            src,
            dst,
            angle,
            None::<sdl2::rect::Point>,
            reflection.flips_horizontally(),
            reflection.flips_vertically(),
        )
    }

    fn outline_rect(&self, rect: Rect, color: Color) -> Result<(), String> {
        let mut canvas = self.canvas.try_borrow_mut().map_err(|e| e.to_string())?;
        canvas.set_draw_color(color);
        canvas.draw_rect(rect.into())
    }

    fn settings(&self) -> &GraphicsSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::pixmap::Pixmap;

    type SurfaceRenderer = SdlRenderer<sdl2::surface::Surface<'static>>;

    fn surface_renderer(width: u32, height: u32) -> SurfaceRenderer {
        let target =
            sdl2::surface::Surface::new(width, height, PixelFormatEnum::ABGR8888).unwrap();
        SdlRenderer::new(target.into_canvas().unwrap())
    }

    fn read_target(renderer: &SurfaceRenderer) -> Vec<u8> {
        renderer
            .with_canvas(|canvas| {
                canvas.read_pixels(None::<sdl2::rect::Rect>, PixelFormatEnum::ABGR8888)
            })
            .unwrap()
            .unwrap()
    }

    fn clear_black(renderer: &SurfaceRenderer) {
        renderer
            .with_canvas(|canvas| {
                canvas.set_draw_color(sdl2::pixels::Color::RGBA(0, 0, 0, 255));
                canvas.clear();
            })
            .unwrap();
    }

    fn pixel_at(pixels: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
        let offset = (y * width + x) * 4;
        [
            pixels[offset],
            pixels[offset + 1],
            pixels[offset + 2],
            pixels[offset + 3],
        ]
    }

    /// 2x2 texture: red, green on top; blue, white below.
    fn quadrants() -> Surface {
        let mut surface = Surface::new(2, 2).unwrap();
        surface.put_pixel(0, 0, Color::RED);
        surface.put_pixel(1, 0, Color::GREEN);
        surface.put_pixel(0, 1, Color::rgba(0, 0, 255, 255));
        surface.put_pixel(1, 1, Color::WHITE);
        surface
    }

    fn draw_quadrants(reflection: Reflection) -> Vec<u8> {
        let renderer = surface_renderer(2, 2);
        clear_black(&renderer);
        let texture = renderer.create_texture(quadrants()).unwrap();
        let full = Rect::new(0, 0, 2, 2);
        renderer
            .copy_ex(&texture, full, full, 0.0, reflection)
            .unwrap();
        read_target(&renderer)
    }

    #[test]
    fn horizontal_reflection_mirrors_columns() {
        let pixels = draw_quadrants(Reflection::Horizontal);
        assert_eq!(pixel_at(&pixels, 2, 0, 0), [0, 255, 0, 255]);
        assert_eq!(pixel_at(&pixels, 2, 1, 0), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&pixels, 2, 0, 1), [255, 255, 255, 255]);
        assert_eq!(pixel_at(&pixels, 2, 1, 1), [0, 0, 255, 255]);
    }

    #[test]
    fn vertical_reflection_mirrors_rows() {
        let pixels = draw_quadrants(Reflection::Vertical);
        assert_eq!(pixel_at(&pixels, 2, 0, 0), [0, 0, 255, 255]);
        assert_eq!(pixel_at(&pixels, 2, 1, 0), [255, 255, 255, 255]);
        assert_eq!(pixel_at(&pixels, 2, 0, 1), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&pixels, 2, 1, 1), [0, 255, 0, 255]);
    }

    #[test]
    fn unreflected_copy_keeps_layout() {
        let pixels = draw_quadrants(Reflection::None);
        assert_eq!(pixel_at(&pixels, 2, 0, 0), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&pixels, 2, 1, 0), [0, 255, 0, 255]);
        assert_eq!(pixel_at(&pixels, 2, 0, 1), [0, 0, 255, 255]);
        assert_eq!(pixel_at(&pixels, 2, 1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn pixmap_draws_through_sdl_renderer() {
        let renderer = surface_renderer(4, 4);
        clear_black(&renderer);

        let mut pixmap = Pixmap::from_surface(&renderer, quadrants()).unwrap();
        assert_eq!(pixmap.size(), Size::new(2, 2));
        assert_eq!(pixmap.label(), "");

        // Scale the 2x2 pixmap onto the right half of the canvas, mirrored.
        let source = Rect::from_size(pixmap.size());
        let destination = Rect::new(2, 0, 2, 4);
        let result = pixmap.try_draw(source, destination, 0.0, Reflection::Horizontal, 255);
        assert_eq!(result, Ok(()));

        let pixels = read_target(&renderer);
        assert_eq!(pixel_at(&pixels, 4, 0, 0), [0, 0, 0, 255]);
        assert_eq!(pixel_at(&pixels, 4, 2, 0), [0, 255, 0, 255]);
        assert_eq!(pixel_at(&pixels, 4, 3, 1), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&pixels, 4, 2, 3), [255, 255, 255, 255]);
        assert_eq!(pixel_at(&pixels, 4, 3, 2), [0, 0, 255, 255]);
    }

    #[test]
    fn uploads_and_copies_onto_surface_canvas() {
        let renderer = surface_renderer(2, 2);
        renderer
            .with_canvas(|canvas| {
                canvas.set_draw_color(sdl2::pixels::Color::RGBA(0, 0, 0, 255));
                canvas.clear();
            })
            .unwrap();

        let texture = renderer
            .create_texture(Surface::filled(2, 2, Color::RED).unwrap())
            .unwrap();
        assert_eq!(texture.query().width, 2);
        assert_eq!(texture.query().height, 2);

        renderer
            .copy_ex(
                &texture,
                Rect::new(0, 0, 2, 2),
                Rect::new(0, 0, 2, 2),
                0.0,
                Reflection::None,
            )
            .unwrap();

        let pixels = read_target(&renderer);
        assert_eq!(&pixels[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn outline_uses_requested_color() {
        let renderer = surface_renderer(3, 3);
        renderer
            .outline_rect(Rect::new(0, 0, 3, 3), Color::GREEN)
            .unwrap();

        let pixels = read_target(&renderer);
        assert_eq!(&pixels[0..4], &[0, 255, 0, 255]);
    }
}
