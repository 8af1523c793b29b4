// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

//! Headless CPU renderer.
//!
//! Draws into an `RgbaImage` with the same conventions as SDL's renderer:
//! nearest sampling, clockwise rotation about the destination centre, and
//! `SDL_BLENDMODE_BLEND` for textures. It also counts texture creation and
//! release, and can be told to reject uploads.

use std::cell::{Cell, Ref, RefCell};

use glam::{Mat2, Vec2};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;

use crate::geometry::{Color, Point, Rect, Reflection, Size};
use crate::render::Renderer;
use crate::settings::GraphicsSettings;
use crate::surface::Surface;

/// Largest texture edge accepted by default, matching common GPU limits.
pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 16_384;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TextureStats {
    pub created: usize,
    pub released: usize,
}

impl TextureStats {
    /// Textures created and not yet released.
    pub fn live(&self) -> usize {
        self.created - self.released
    }
}

pub struct SoftwareRenderer {
    target: RefCell<RgbaImage>,
    settings: GraphicsSettings,
    max_texture_size: u32,
    fail_uploads: Cell<bool>,
    created: Cell<usize>,
    released: Cell<usize>,
}

/// CPU copy of an uploaded surface.
pub struct SoftwareTexture<'r> {
    owner: &'r SoftwareRenderer,
    image: RgbaImage,
    alpha_mod: u8,
}

impl SoftwareTexture<'_> {
    pub fn size(&self) -> Size {
        let (width, height) = self.image.dimensions();
        Size::new(width, height)
    }

    pub fn alpha_mod(&self) -> u8 {
        self.alpha_mod
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(|p| Color::from(p.0))
    }
}

impl Drop for SoftwareTexture<'_> {
    fn drop(&mut self) {
        self.owner.released.set(self.owner.released.get() + 1);
    }
}

impl SoftwareRenderer {
    /// Renderer with a transparent black target of `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: RefCell::new(RgbaImage::new(width, height)),
            settings: GraphicsSettings::default(),
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
            fail_uploads: Cell::new(false),
            created: Cell::new(0),
            released: Cell::new(0),
        }
    }

    pub fn with_settings(mut self, settings: GraphicsSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_max_texture_size(mut self, max_texture_size: u32) -> Self {
        self.max_texture_size = max_texture_size;
        self
    }

    /// While set, every texture upload fails.
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.set(fail);
    }

    pub fn stats(&self) -> TextureStats {
        TextureStats {
            created: self.created.get(),
            released: self.released.get(),
        }
    }

    pub fn clear(&self, color: Color) {
        let mut target = self.target.borrow_mut();
        for pixel in target.pixels_mut() {
            *pixel = Rgba(color.to_bytes());
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.target
            .borrow()
            .get_pixel_checked(x, y)
            .map(|p| Color::from(p.0))
    }

    pub fn target(&self) -> Ref<'_, RgbaImage> {
        self.target.borrow()
    }
}

/// `SDL_BLENDMODE_BLEND`: `dstRGB = srcRGB * srcA + dstRGB * (1 - srcA)`,
/// `dstA = srcA + dstA * (1 - srcA)`, with `srcA` scaled by the alpha mod.
fn blend(src: [u8; 4], dst: [u8; 4], modulation: f32) -> [u8; 4] {
    let src_a = (src[3] as f32 / 255.0) * modulation;
    if src_a <= 0.0 {
        return dst;
    }

    let mix = |s: u8, d: u8| -> u8 {
        let out = s as f32 * src_a + d as f32 * (1.0 - src_a);
        out.round().clamp(0.0, 255.0) as u8
    };
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    [
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

impl Renderer for SoftwareRenderer {
    type Texture<'r>
        = SoftwareTexture<'r>
    where
        Self: 'r;

    fn create_texture<'r>(&'r self, surface: Surface) -> Result<SoftwareTexture<'r>, String> {
        if self.fail_uploads.get() {
            return Err(String::from("texture upload rejected by renderer"));
        }
        let max = self.max_texture_size;
        if surface.width() > max || surface.height() > max {
            return Err(format!("Texture dimensions are limited to {max}x{max}"));
        }

        let image = RgbaImage::from(surface);
        self.created.set(self.created.get() + 1);
        Ok(SoftwareTexture {
            owner: self,
            image,
            alpha_mod: u8::MAX,
        })
    }

    fn set_texture_alpha_mod<'r>(
        &'r self,
        texture: &mut SoftwareTexture<'r>,
        alpha: u8,
    ) -> Result<(), String> {
        texture.alpha_mod = alpha;
        Ok(())
    }

    fn copy_ex<'r>(
        &'r self,
        texture: &SoftwareTexture<'r>,
        source: Rect,
        destination: Rect,
        angle: f64,
        reflection: Reflection,
    ) -> Result<(), String> {
        if destination.is_empty() || texture.alpha_mod == 0 {
            return Ok(());
        }
        let texture_bounds = Rect::from_size(texture.size());
        if source.intersection(&texture_bounds).is_none() {
            return Ok(());
        }
        let mut target = self.target.try_borrow_mut().map_err(|e| e.to_string())?;
        let (target_width, target_height) = target.dimensions();

        let radians = (angle as f32).to_radians();
        let rotation = Mat2::from_angle(radians);
        let inverse = Mat2::from_angle(-radians);
        let center = destination.center();
        let extent = Vec2::new(destination.width as f32, destination.height as f32);
        let half = extent / 2.0;

        // Screen space bounds of the rotated destination.
        let corners = [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|corner| center + rotation * corner);
        let min = corners
            .iter()
            .fold(Vec2::splat(f32::INFINITY), |acc, c| acc.min(*c));
        let max = corners
            .iter()
            .fold(Vec2::splat(f32::NEG_INFINITY), |acc, c| acc.max(*c));

        let x_start = (min.x.floor() as i64).max(0);
        let x_end = (max.x.ceil() as i64).min(target_width as i64);
        let y_start = (min.y.floor() as i64).max(0);
        let y_end = (max.y.ceil() as i64).min(target_height as i64);

        let modulation = texture.alpha_mod as f32 / 255.0;
        // Source rects may span the whole i32/u32 range.
        let (source_width, source_height) = (source.width as i64, source.height as i64);

        for py in y_start..y_end {
            for px in x_start..x_end {
                let sample = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let local = inverse * (sample - center) + half;
                if local.x < 0.0 || local.y < 0.0 || local.x >= extent.x || local.y >= extent.y {
                    continue;
                }

                let mut u = local.x / extent.x;
                let mut v = local.y / extent.y;
                if reflection.flips_horizontally() {
                    u = 1.0 - u;
                }
                if reflection.flips_vertically() {
                    v = 1.0 - v;
                }

                let column = ((u as f64 * source_width as f64) as i64).clamp(0, source_width - 1);
                let row = ((v as f64 * source_height as f64) as i64).clamp(0, source_height - 1);
                let (Ok(x), Ok(y)) = (
                    i32::try_from(source.x as i64 + column),
                    i32::try_from(source.y as i64 + row),
                ) else {
                    continue;
                };
                let texel = Point::new(x, y);
                if !texture_bounds.contains_point(texel) {
                    continue;
                }

                let src = texture.image.get_pixel(texel.x as u32, texel.y as u32).0;
                let dst = target.get_pixel(px as u32, py as u32).0;
                target.put_pixel(px as u32, py as u32, Rgba(blend(src, dst, modulation)));
            }
        }

        Ok(())
    }

    fn outline_rect(&self, rect: Rect, color: Color) -> Result<(), String> {
        let mut target = self.target.try_borrow_mut().map_err(|e| e.to_string())?;
        // Keep a one pixel margin so edges outside the target stay outside.
        let margin = Rect::new(-1, -1, target.width() + 2, target.height() + 2);
        let Some(clipped) = rect.intersection(&margin) else {
            return Ok(());
        };
        draw_hollow_rect_mut(
            &mut *target,
            imageproc::rect::Rect::at(clipped.x, clipped.y).of_size(clipped.width, clipped.height),
            Rgba(color.to_bytes()),
        );
        Ok(())
    }

    fn settings(&self) -> &GraphicsSettings {
        &self.settings
    }
}
