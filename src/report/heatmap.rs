//! Confusion matrix heatmap
//!
//! Draws the matrix on a white canvas with a sequential blue colour scale,
//! per-cell counts, class names on both axes and a colour bar.

use ab_glyph::{FontVec, PxScale};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};

use crate::error::{EvalError, Result};
use crate::evaluation::ConfusionMatrix;

/// Canvas size (8x6 inches at 250 dpi)
pub const CANVAS_WIDTH: u32 = 2000;
pub const CANVAS_HEIGHT: u32 = 1500;

const TITLE_HEIGHT: u32 = 120;
const LEFT_MARGIN: u32 = 360;
const RIGHT_MARGIN: u32 = 300;
const BOTTOM_MARGIN: u32 = 380;
const TICK_GAP: i32 = 12;
const COLORBAR_GAP: u32 = 60;
const COLORBAR_WIDTH: u32 = 50;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Anchor colours of the "Blues" sequential scale, lightest first
const BLUES: [[u8; 3]; 9] = [
    [247, 251, 255],
    [222, 235, 247],
    [198, 219, 239],
    [158, 202, 225],
    [107, 174, 214],
    [66, 146, 198],
    [33, 113, 181],
    [8, 81, 156],
    [8, 48, 107],
];

/// Fonts tried when none is configured
const FONT_CANDIDATES: [&str; 7] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Interpolated colour at `t` in [0, 1]
pub fn blues(t: f32) -> Rgb<u8> {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let pos = t * (BLUES.len() - 1) as f32;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(BLUES.len() - 1);
    let frac = pos - lo as f32;

    let mut px = [0u8; 3];
    for c in 0..3 {
        let a = BLUES[lo][c] as f32;
        let b = BLUES[hi][c] as f32;
        px[c] = (a + (b - a) * frac).round() as u8;
    }
    Rgb(px)
}

/// White on dark cells (more than half the maximum), black otherwise
pub fn text_color(count: usize, max: usize) -> Rgb<u8> {
    if count as f64 > max as f64 / 2.0 {
        WHITE
    } else {
        BLACK
    }
}

fn cell_color(count: usize, max: usize) -> Rgb<u8> {
    if max == 0 {
        blues(0.0)
    } else {
        blues(count as f32 / max as f32)
    }
}

/// Load the configured font, or the first system candidate that parses.
///
/// A configured font that cannot be read is an error; missing candidates are not.
pub fn load_font(configured: Option<&Path>) -> Result<Option<FontVec>> {
    if let Some(path) = configured {
        let bytes = std::fs::read(path)?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| EvalError::Render {
            path: path.to_path_buf(),
            message: format!("invalid font: {}", e),
        })?;
        return Ok(Some(font));
    }

    for candidate in FONT_CANDIDATES {
        let path = PathBuf::from(candidate);
        if let Ok(bytes) = std::fs::read(&path) {
            if let Ok(font) = FontVec::try_from_vec(bytes) {
                tracing::debug!("Using font {}", path.display());
                return Ok(Some(font));
            }
        }
    }
    Ok(None)
}

/// Pixel geometry of the matrix area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub x0: u32,
    pub y0: u32,
    pub cell: u32,
    pub n: u32,
}

impl GridLayout {
    pub fn new(n: usize) -> Self {
        let avail_w = CANVAS_WIDTH - LEFT_MARGIN - RIGHT_MARGIN;
        let avail_h = CANVAS_HEIGHT - TITLE_HEIGHT - BOTTOM_MARGIN;
        let n = n.max(1) as u32;
        Self {
            x0: LEFT_MARGIN,
            y0: TITLE_HEIGHT,
            cell: avail_w.min(avail_h) / n,
            n,
        }
    }

    pub fn side(&self) -> u32 {
        self.cell * self.n
    }

    /// Centre of cell (row, col)
    pub fn cell_center(&self, row: u32, col: u32) -> (u32, u32) {
        (
            self.x0 + col * self.cell + self.cell / 2,
            self.y0 + row * self.cell + self.cell / 2,
        )
    }
}

/// Render the heatmap. Without a font the cells and colour bar are drawn
/// but no text.
pub fn render_confusion_heatmap(
    cm: &ConfusionMatrix,
    labels: &[String],
    title: &str,
    font: Option<&FontVec>,
) -> RgbImage {
    let mut img = RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, WHITE);
    let n = cm.num_classes();
    let grid = GridLayout::new(n);
    let max = cm.max();

    for row in 0..n {
        for col in 0..n {
            let rect = Rect::at(
                (grid.x0 + col as u32 * grid.cell) as i32,
                (grid.y0 + row as u32 * grid.cell) as i32,
            )
            .of_size(grid.cell, grid.cell);
            draw_filled_rect_mut(&mut img, rect, cell_color(cm.get(row, col), max));
        }
    }

    // colour bar, darkest at the top
    let bar_x = grid.x0 + grid.side() + COLORBAR_GAP;
    let bar_h = grid.side().max(1);
    for y in 0..bar_h {
        let t = 1.0 - y as f32 / (bar_h - 1).max(1) as f32;
        let rect = Rect::at(bar_x as i32, (grid.y0 + y) as i32).of_size(COLORBAR_WIDTH, 1);
        draw_filled_rect_mut(&mut img, rect, blues(t));
    }

    if let Some(font) = font {
        draw_labels(&mut img, cm, labels, title, font, &grid, bar_x);
    }
    img
}

fn draw_labels(
    img: &mut RgbImage,
    cm: &ConfusionMatrix,
    labels: &[String],
    title: &str,
    font: &FontVec,
    grid: &GridLayout,
    bar_x: u32,
) {
    let n = cm.num_classes();
    let max = cm.max();
    let count_scale = PxScale::from((grid.cell as f32 * 0.3).clamp(10.0, 40.0));
    let tick_scale = PxScale::from(32.0);
    let axis_scale = PxScale::from(40.0);
    let title_scale = PxScale::from(52.0);

    // counts
    for row in 0..n {
        for col in 0..n {
            let count = cm.get(row, col);
            let (cx, cy) = grid.cell_center(row as u32, col as u32);
            draw_centered(img, &count.to_string(), cx, cy, count_scale, font, text_color(count, max));
        }
    }

    // y ticks: right-aligned left of the grid
    for (row, label) in labels.iter().enumerate().take(n) {
        let (w, h) = text_size(tick_scale, font, label);
        let (_, cy) = grid.cell_center(row as u32, 0);
        let x = grid.x0 as i32 - TICK_GAP - w as i32;
        draw_text_mut(img, BLACK, x, cy as i32 - h as i32 / 2, tick_scale, font, label);
    }

    // x ticks: vertical, text ending at the grid
    let grid_bottom = grid.y0 + grid.side();
    for (col, label) in labels.iter().enumerate().take(n) {
        let rotated = rotated_text(label, tick_scale, font);
        let (cx, _) = grid.cell_center(0, col as u32);
        let x = cx as i64 - rotated.width() as i64 / 2;
        imageops::replace(img, &rotated, x, (grid_bottom as i32 + TICK_GAP) as i64);
    }

    // axis titles
    let grid_center_x = grid.x0 + grid.side() / 2;
    draw_centered(img, "Predicted", grid_center_x, CANVAS_HEIGHT - 50, axis_scale, font, BLACK);

    let true_label = rotated_text("True", axis_scale, font);
    let y = (grid.y0 + grid.side() / 2) as i64 - true_label.height() as i64 / 2;
    imageops::replace(img, &true_label, 20, y);

    draw_centered(img, title, grid_center_x, TITLE_HEIGHT / 2, title_scale, font, BLACK);

    // colour bar ticks
    let tick_x = (bar_x + COLORBAR_WIDTH) as i32 + TICK_GAP;
    for (value, y) in [(max, grid.y0), (max / 2, grid.y0 + grid.side() / 2), (0, grid_bottom)] {
        let text = value.to_string();
        let (_, h) = text_size(tick_scale, font, &text);
        draw_text_mut(img, BLACK, tick_x, y as i32 - h as i32 / 2, tick_scale, font, &text);
    }
}

fn draw_centered(
    img: &mut RgbImage,
    text: &str,
    cx: u32,
    cy: u32,
    scale: PxScale,
    font: &FontVec,
    color: Rgb<u8>,
) {
    let (w, h) = text_size(scale, font, text);
    draw_text_mut(
        img,
        color,
        cx as i32 - w as i32 / 2,
        cy as i32 - h as i32 / 2,
        scale,
        font,
        text,
    );
}

/// Black text on white, rotated to read bottom-to-top
fn rotated_text(text: &str, scale: PxScale, font: &FontVec) -> RgbImage {
    let (w, h) = text_size(scale, font, text);
    let mut tile = RgbImage::from_pixel(w + 4, h + 4, WHITE);
    draw_text_mut(&mut tile, BLACK, 2, 2, scale, font, text);
    imageops::rotate270(&tile)
}

/// Render and save as PNG
pub fn write_confusion_heatmap(
    path: &Path,
    cm: &ConfusionMatrix,
    labels: &[String],
    title: &str,
    font: Option<&FontVec>,
) -> Result<()> {
    let img = render_confusion_heatmap(cm, labels, title, font);
    img.save(path).map_err(|e| EvalError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("class {}", i)).collect()
    }

    #[test]
    fn test_blues_endpoints() {
        assert_eq!(blues(0.0), Rgb([247, 251, 255]));
        assert_eq!(blues(1.0), Rgb([8, 48, 107]));
        assert_eq!(blues(-1.0), blues(0.0));
        assert_eq!(blues(2.0), blues(1.0));
        assert_eq!(blues(f32::NAN), blues(0.0));
    }

    #[test]
    fn test_blues_is_darker_for_higher_values() {
        let lum = |c: Rgb<u8>| c.0.iter().map(|&v| v as u32).sum::<u32>();
        let mut prev = lum(blues(0.0));
        for i in 1..=10 {
            let cur = lum(blues(i as f32 / 10.0));
            assert!(cur <= prev);
            prev = cur;
        }
    }

    #[test]
    fn test_text_color_contrast() {
        assert_eq!(text_color(10, 10), WHITE);
        assert_eq!(text_color(6, 10), WHITE);
        assert_eq!(text_color(5, 10), BLACK);
        assert_eq!(text_color(0, 0), BLACK);
    }

    #[test]
    fn test_render_cell_colors_without_font() {
        let labels_vec: Vec<usize> = (0..10).collect();
        let cm = ConfusionMatrix::from_pairs(&labels_vec, &labels_vec, 10);
        let img = render_confusion_heatmap(&cm, &labels(10), "Confusion Matrix (Test)", None);

        assert_eq!(img.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        let grid = GridLayout::new(10);
        let (x, y) = grid.cell_center(0, 0);
        assert_eq!(*img.get_pixel(x, y), blues(1.0));
        let (x, y) = grid.cell_center(0, 1);
        assert_eq!(*img.get_pixel(x, y), blues(0.0));
        let (x, y) = grid.cell_center(9, 9);
        assert_eq!(*img.get_pixel(x, y), blues(1.0));
    }

    #[test]
    fn test_render_empty_matrix_is_lightest() {
        let cm = ConfusionMatrix::from_pairs(&[], &[], 3);
        let img = render_confusion_heatmap(&cm, &labels(3), "t", None);
        let grid = GridLayout::new(3);
        let (x, y) = grid.cell_center(1, 1);
        assert_eq!(*img.get_pixel(x, y), blues(0.0));
    }

    #[test]
    fn test_grid_fits_canvas() {
        let grid = GridLayout::new(10);
        assert!(grid.x0 + grid.side() + COLORBAR_GAP + COLORBAR_WIDTH < CANVAS_WIDTH);
        assert!(grid.y0 + grid.side() + BOTTOM_MARGIN <= CANVAS_HEIGHT);
    }

    #[test]
    fn test_write_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confusion_matrix.png");
        let cm = ConfusionMatrix::from_pairs(&[0, 1], &[1, 1], 2);
        write_confusion_heatmap(&path, &cm, &labels(2), "t", None).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), CANVAS_WIDTH);
        assert_eq!(img.height(), CANVAS_HEIGHT);
    }

    #[test]
    fn test_configured_font_must_be_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(matches!(
            load_font(Some(path.as_path())),
            Err(EvalError::Render { .. })
        ));
        assert!(matches!(
            load_font(Some(dir.path().join("absent.ttf").as_path())),
            Err(EvalError::Io(_))
        ));
    }

    #[test]
    fn test_render_with_system_font_when_available() {
        // Only exercised on machines that ship one of the candidate fonts
        if let Ok(Some(font)) = load_font(None) {
            let cm = ConfusionMatrix::from_pairs(&[0, 1, 1], &[0, 1, 0], 2);
            let img = render_confusion_heatmap(&cm, &labels(2), "Confusion Matrix (Test)", Some(&font));
            let title_band_has_ink = (0..CANVAS_WIDTH)
                .any(|x| (0..TITLE_HEIGHT).any(|y| *img.get_pixel(x, y) != WHITE));
            assert!(title_band_has_ink);
        }
    }
}
