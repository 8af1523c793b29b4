// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use image::{Rgba, RgbaImage};
use pixmap::{
    Color, GraphicsSettings, Pixmap, Rect, Reflection, ResourceCreationError, Size,
    SoftwareRenderer, Surface, TextureStats,
};
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// Writes a solid PNG and returns its path.
fn write_png(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 4]) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(width, height, Rgba(color))
        .save(&path)
        .expect("Failed to write test PNG");
    path
}

fn setup() -> TempDir {
    tempdir().expect("Failed to create temporary directory")
}

#[test]
fn red_png_draws_solid_red() {
    let dir = setup();
    let path = write_png(dir.path(), "red.png", 2, 2, [255, 0, 0, 255]);

    let renderer = SoftwareRenderer::new(2, 2);
    let mut pixmap = Pixmap::from_file(&renderer, &path).unwrap();
    assert_eq!(pixmap.size(), Size::new(2, 2));

    let rect = Rect::from_size(pixmap.size());
    pixmap.draw(rect, rect, 0.0, Reflection::None, 255);

    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(renderer.pixel(x, y), Some(Color::RED));
    }
}

#[test]
fn size_matches_png_dimensions() {
    let dir = setup();
    let renderer = SoftwareRenderer::new(1, 1);

    for (width, height) in [(1, 1), (7, 3), (16, 64)] {
        let path = write_png(
            dir.path(),
            &format!("{width}x{height}.png"),
            width,
            height,
            [0, 0, 255, 255],
        );
        let pixmap = Pixmap::from_file(&renderer, &path).unwrap();
        assert_eq!(pixmap.size(), Size::new(width, height));
        assert_eq!(pixmap.label(), path.display().to_string());
    }
    assert_eq!(renderer.stats().live(), 0);
}

#[test]
fn missing_file_fails_to_decode() {
    let dir = setup();
    let renderer = SoftwareRenderer::new(1, 1);
    let path = dir.path().join("missing.png");

    let err = Pixmap::from_file(&renderer, &path).err().unwrap();
    assert!(matches!(err, ResourceCreationError::Decode { .. }));
    assert_eq!(err.filename(), path.display().to_string());
    assert_eq!(renderer.stats(), TextureStats::default());
}

#[test]
fn upload_failure_leaks_nothing() {
    let dir = setup();
    let path = write_png(dir.path(), "big.png", 8, 8, [0, 255, 0, 255]);
    let renderer = SoftwareRenderer::new(1, 1).with_max_texture_size(4);

    let err = Pixmap::from_file(&renderer, &path).err().unwrap();
    assert!(matches!(err, ResourceCreationError::TextureUpload { .. }));
    assert!(err.to_string().contains("big.png"));
    assert_eq!(renderer.stats().live(), 0);
}

#[test]
fn alpha_zero_is_invisible_alpha_full_is_opaque() {
    let dir = setup();
    let path = write_png(dir.path(), "red.png", 2, 2, [255, 0, 0, 255]);
    let renderer = SoftwareRenderer::new(4, 4);
    renderer.clear(Color::BLACK);
    let mut pixmap = Pixmap::from_file(&renderer, &path).unwrap();
    let source = Rect::from_size(pixmap.size());

    pixmap.draw(source, Rect::new(0, 0, 2, 2), 0.0, Reflection::None, 0);
    assert!(renderer.target().pixels().all(|p| p.0 == [0, 0, 0, 255]));

    pixmap.draw(source, Rect::new(2, 2, 2, 2), 0.0, Reflection::None, 255);
    assert_eq!(renderer.pixel(3, 3), Some(Color::RED));
    assert_eq!(renderer.pixel(0, 0), Some(Color::BLACK));
}

#[test]
fn sprite_sheet_cells_by_logical_size() {
    // Two 2x2 cells side by side: red then blue.
    let dir = setup();
    let path = dir.path().join("sheet.png");
    let mut sheet = RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]));
    for y in 0..2 {
        for x in 2..4 {
            sheet.put_pixel(x, y, Rgba([0, 0, 255, 255]));
        }
    }
    sheet.save(&path).unwrap();

    let renderer = SoftwareRenderer::new(2, 2);
    let mut pixmap = Pixmap::from_file(&renderer, &path).unwrap();
    pixmap.set_size(Size::new(2, 2));

    let cell = pixmap.size();
    let second = Rect::new(cell.width as i32, 0, cell.width, cell.height);
    pixmap.draw(second, Rect::from_size(cell), 0.0, Reflection::None, 255);

    assert_eq!(renderer.pixel(0, 0), Some(Color::rgba(0, 0, 255, 255)));
    assert_eq!(pixmap.texture().size(), Size::new(4, 2));
}

#[test]
fn overlay_follows_settings() {
    let dir = setup();
    let path = write_png(dir.path(), "clear.png", 1, 1, [0, 0, 0, 0]);
    let settings = GraphicsSettings::load_or_create_in(dir.path()).unwrap();
    assert!(!settings.debug_overlay.enabled);

    let renderer = SoftwareRenderer::new(3, 3).with_settings(settings.with_debug_overlay(true));
    let mut pixmap = Pixmap::from_file(&renderer, &path).unwrap();
    let src = Rect::from_size(pixmap.size());
    let outline = Some(Rect::new(0, 0, 3, 3));
    pixmap
        .try_draw_outlined(src, src, 0.0, Reflection::None, 255, outline)
        .unwrap();

    assert_eq!(renderer.pixel(2, 2), Some(Color::GREEN));
    assert_eq!(renderer.pixel(1, 1), Some(Color::TRANSPARENT));
}

#[test]
fn surface_and_file_pixmaps_render_alike() {
    let dir = setup();
    let path = write_png(dir.path(), "white.png", 2, 2, [255, 255, 255, 255]);

    let from_file = SoftwareRenderer::new(2, 2);
    let mut a = Pixmap::from_file(&from_file, &path).unwrap();
    let rect = Rect::from_size(a.size());
    a.draw(rect, rect, 45.0, Reflection::Horizontal, 200);

    let from_surface = SoftwareRenderer::new(2, 2);
    let surface = Surface::filled(2, 2, Color::WHITE).unwrap();
    let mut b = Pixmap::from_surface(&from_surface, surface).unwrap();
    b.draw(rect, rect, 45.0, Reflection::Horizontal, 200);

    assert_eq!(*from_file.target(), *from_surface.target());
}
