use egui::{ColorImage, Pos2, pos2};
use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::color::HexColor;
use crate::geometry::{distance_to_line_segment, segment_bounds};
use crate::pen::{PenMode, PenSettings};
use crate::snapshot::{Snapshot, SnapshotError};

/// How new ink combines with existing pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Paint over existing pixels
    #[default]
    SourceOver,
    /// Clear existing pixels where the stroke covers them
    DestinationOut,
}

impl From<PenMode> for CompositeMode {
    fn from(mode: PenMode) -> Self {
        match mode {
            PenMode::Draw => Self::SourceOver,
            PenMode::Erase => Self::DestinationOut,
        }
    }
}

/// The stroke configuration a render target draws segments with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: HexColor,
    /// Line width in target pixels
    pub width: f32,
    pub composite: CompositeMode,
}

impl StrokeStyle {
    /// `scale` converts pen width (points) into target pixels
    pub fn from_pen(pen: &PenSettings, scale: f32) -> Self {
        Self {
            color: pen.color,
            width: pen.width * scale,
            composite: pen.mode.into(),
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: HexColor::BLACK,
            width: 1.0,
            composite: CompositeMode::SourceOver,
        }
    }
}

/// A surface the drawing engine paints on.
///
/// Coordinates are target pixels with the origin at the top-left corner.
pub trait RenderTarget {
    fn size(&self) -> [u32; 2];

    /// Changes the dimensions. Existing content is dropped.
    fn resize(&mut self, size: [u32; 2]);

    fn style(&self) -> StrokeStyle;

    fn set_style(&mut self, style: StrokeStyle);

    /// Stroke a round-capped segment with the current style
    fn draw_segment(&mut self, from: Pos2, to: Pos2);

    /// Make every pixel transparent
    fn clear(&mut self);

    fn capture(&self) -> Result<Snapshot, SnapshotError>;

    /// Replace the whole content with `image`, which already has the target's size
    fn restore(&mut self, image: &RgbaImage);
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    #[error("Invalid canvas dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),
}

/// Software raster render target backed by an RGBA buffer
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
    style: StrokeStyle,
    /// Bumped on every content change, used to skip redundant texture uploads
    revision: u64,
}

impl Canvas {
    pub fn new(size: [u32; 2]) -> Result<Self, CanvasError> {
        let [width, height] = size;
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidDimensions(width, height));
        }

        Ok(Self {
            pixels: RgbaImage::new(width, height),
            style: StrokeStyle::default(),
            revision: 0,
        })
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|pixel| pixel[3] == 0)
    }

    pub fn to_color_image(&self) -> ColorImage {
        let (width, height) = self.pixels.dimensions();
        ColorImage::from_rgba_unmultiplied([width as usize, height as usize], self.pixels.as_raw())
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn paint_over(dst: &mut Rgba<u8>, color: [u8; 3], coverage: f32) {
    let src_a = coverage;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return;
    }

    for channel in 0..3 {
        let src = color[channel] as f32;
        let old = dst[channel] as f32;
        let mixed = (src * src_a + old * dst_a * (1.0 - src_a)) / out_a;
        dst[channel] = mixed.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

fn erase(dst: &mut Rgba<u8>, coverage: f32) {
    let remaining = dst[3] as f32 * (1.0 - coverage);
    dst[3] = remaining.round() as u8;
}

impl RenderTarget for Canvas {
    fn size(&self) -> [u32; 2] {
        let (width, height) = self.pixels.dimensions();
        [width, height]
    }

    fn resize(&mut self, size: [u32; 2]) {
        let [width, height] = size;
        self.pixels = RgbaImage::new(width.max(1), height.max(1));
        self.touch();
    }

    fn style(&self) -> StrokeStyle {
        self.style
    }

    fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    fn draw_segment(&mut self, from: Pos2, to: Pos2) {
        let radius = (self.style.width / 2.0).max(0.5);
        let bounds = segment_bounds(from, to, radius + 1.0);
        let (width, height) = self.pixels.dimensions();

        let x0 = bounds.min.x.floor().max(0.0) as u32;
        let y0 = bounds.min.y.floor().max(0.0) as u32;
        let x1 = bounds.max.x.ceil().clamp(0.0, width as f32) as u32;
        let y1 = bounds.max.y.ceil().clamp(0.0, height as f32) as u32;

        let color = self.style.color.rgb();
        let composite = self.style.composite;

        for y in y0..y1 {
            for x in x0..x1 {
                let center = pos2(x as f32 + 0.5, y as f32 + 0.5);
                let distance = distance_to_line_segment(center, from, to);
                // One pixel of antialiasing on the edge
                let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }

                let pixel = self.pixels.get_pixel_mut(x, y);
                match composite {
                    CompositeMode::SourceOver => paint_over(pixel, color, coverage),
                    CompositeMode::DestinationOut => erase(pixel, coverage),
                }
            }
        }
        self.touch();
    }

    fn clear(&mut self) {
        self.pixels.pixels_mut().for_each(|pixel| *pixel = Rgba([0, 0, 0, 0]));
        self.touch();
    }

    fn capture(&self) -> Result<Snapshot, SnapshotError> {
        Snapshot::encode(&self.pixels)
    }

    fn restore(&mut self, image: &RgbaImage) {
        if image.dimensions() == self.pixels.dimensions() {
            self.pixels.copy_from_slice(image.as_raw());
        } else {
            let (width, height) = self.pixels.dimensions();
            self.pixels = image::imageops::resize(
                image,
                width,
                height,
                image::imageops::FilterType::Triangle,
            );
        }
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new([20, 20]).unwrap();
        canvas.set_style(StrokeStyle {
            color: HexColor::from_rgb(255, 0, 0),
            width: 4.0,
            composite: CompositeMode::SourceOver,
        });
        canvas
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(
            Canvas::new([0, 10]).unwrap_err(),
            CanvasError::InvalidDimensions(0, 10)
        );
    }

    #[test]
    fn test_segment_paints_along_line_only() {
        let mut canvas = canvas();
        canvas.draw_segment(pos2(2.0, 10.0), pos2(18.0, 10.0));

        assert_eq!(canvas.pixel(10, 9), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(canvas.pixel(10, 2).unwrap()[3], 0);
        assert!(!canvas.is_blank());
    }

    #[test]
    fn test_erase_clears_pixels() {
        let mut canvas = canvas();
        canvas.draw_segment(pos2(2.0, 10.0), pos2(18.0, 10.0));

        let mut style = canvas.style();
        style.composite = CompositeMode::DestinationOut;
        style.width = 8.0;
        canvas.set_style(style);
        canvas.draw_segment(pos2(0.0, 10.0), pos2(20.0, 10.0));

        assert!(canvas.is_blank());
    }

    #[test]
    fn test_offscreen_segment_is_clipped() {
        let mut canvas = canvas();
        canvas.draw_segment(pos2(-50.0, -50.0), pos2(-30.0, -30.0));
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_capture_and_restore() {
        let mut canvas = canvas();
        canvas.draw_segment(pos2(5.0, 5.0), pos2(15.0, 15.0));
        let snapshot = canvas.capture().unwrap();
        let drawn = canvas.pixels().clone();

        canvas.clear();
        assert!(canvas.is_blank());

        canvas.restore(&snapshot.decode(canvas.size()).unwrap());
        assert_eq!(canvas.pixels(), &drawn);
    }

    #[test]
    fn test_mutations_bump_revision() {
        let mut canvas = canvas();
        let start = canvas.revision();
        canvas.draw_segment(pos2(1.0, 1.0), pos2(2.0, 2.0));
        canvas.clear();
        canvas.resize([5, 5]);
        assert_eq!(canvas.revision(), start + 3);
        assert_eq!(canvas.size(), [5, 5]);
    }
}
