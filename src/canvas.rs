//! Square raster canvas with a small immediate-mode drawing API.
//!
//! Coordinates are in pixels with the origin at the top-left; `push`/`pop`,
//! `translate` and `rotate` manipulate a transform stack like a 2D canvas context.

use glam::Vec2;
use tiny_skia::{
    FillRule, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::error::{GalleryError, Result};
use crate::palette::Color;

/// Stroke color and width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ink {
    pub color: Color,
    pub weight: f32,
}

impl Ink {
    pub fn new(color: Color, weight: f32) -> Self {
        Self { color, weight }
    }

    /// Monochrome fallback stroke: white at `alpha` (0-255)
    pub fn white(alpha: f32, weight: f32) -> Self {
        Self::new(Color::WHITE.with_alpha(alpha), weight)
    }
}

/// Drawing surface backed by a premultiplied RGBA pixmap
pub struct Canvas {
    pixmap: Pixmap,
    transform: Transform,
    stack: Vec<Transform>,
    draw_calls: u64,
}

fn to_skia(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn allocate(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| GalleryError::Canvas(format!("cannot allocate {}x{} pixmap", width, height)))
}

impl Canvas {
    /// Square canvas of `size` pixels, cleared to transparent black
    pub fn new(size: u32) -> Result<Self> {
        Self::with_dimensions(size, size)
    }

    /// Rectangular canvas (used for composing whole gallery frames)
    pub fn with_dimensions(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            pixmap: allocate(width, height)?,
            transform: Transform::identity(),
            stack: Vec::new(),
            draw_calls: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Edge length of a square canvas as f32
    pub fn size(&self) -> f32 {
        self.pixmap.width() as f32
    }

    /// Reallocate to a new square size; contents are discarded
    pub fn resize(&mut self, size: u32) -> Result<()> {
        self.pixmap = allocate(size, size)?;
        self.reset_transform();
        Ok(())
    }

    /// Drop any transforms left over from the previous frame
    pub fn reset_transform(&mut self) {
        self.transform = Transform::identity();
        self.stack.clear();
    }

    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(to_skia(color));
        self.draw_calls += 1;
    }

    /// Black overlay at `alpha` (0-255); low values leave trails
    pub fn fade(&mut self, alpha: f32) {
        let (w, h) = (self.width() as f32, self.height() as f32);
        self.fill_rect(0.0, 0.0, w, h, Color::BLACK.with_alpha(alpha));
    }

    /// Axis-aligned rectangle in device space
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            self.pixmap
                .fill_rect(rect, &paint_for(color), Transform::identity(), None);
            self.draw_calls += 1;
        }
    }

    pub fn push(&mut self) {
        self.stack.push(self.transform);
    }

    pub fn pop(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.transform = transform;
        }
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.transform = self.transform.pre_translate(x, y);
    }

    /// Rotate subsequent drawing by `radians`
    pub fn rotate(&mut self, radians: f32) {
        self.transform = self.transform.pre_rotate(radians.to_degrees());
    }

    fn stroke_path(&mut self, builder: PathBuilder, ink: Ink) {
        if ink.color.a == 0 || ink.weight <= 0.0 {
            return;
        }
        if let Some(path) = builder.finish() {
            let stroke = Stroke {
                width: ink.weight,
                line_cap: LineCap::Round,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint_for(ink.color), &stroke, self.transform, None);
            self.draw_calls += 1;
        }
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, ink: Ink) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        self.stroke_path(pb, ink);
    }

    /// Round dot whose diameter is the stroke weight
    pub fn point(&mut self, at: Vec2, ink: Ink) {
        self.fill_circle(at, ink.weight.max(1.0), ink.color);
    }

    pub fn fill_circle(&mut self, center: Vec2, diameter: f32, color: Color) {
        if color.a == 0 || diameter <= 0.0 {
            return;
        }
        if let Some(path) = PathBuilder::from_circle(center.x, center.y, diameter / 2.0) {
            self.pixmap.fill_path(
                &path,
                &paint_for(color),
                FillRule::Winding,
                self.transform,
                None,
            );
            self.draw_calls += 1;
        }
    }

    pub fn stroke_circle(&mut self, center: Vec2, diameter: f32, ink: Ink) {
        if diameter <= 0.0 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.push_circle(center.x, center.y, diameter / 2.0);
        self.stroke_path(pb, ink);
    }

    /// Connected line segments; `closed` joins the last vertex back to the first
    pub fn polyline(&mut self, points: &[Vec2], closed: bool, ink: Ink) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        if closed {
            pb.close();
        }
        self.stroke_path(pb, ink);
    }

    /// Closed outline through `points`
    pub fn polygon(&mut self, points: &[Vec2], ink: Ink) {
        self.polyline(points, true, ink);
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`
    pub fn regular_polygon(&mut self, center: Vec2, radius: f32, sides: usize, ink: Ink) {
        if sides < 3 {
            return;
        }
        let step = std::f32::consts::TAU / sides as f32;
        let points: Vec<Vec2> = (0..sides)
            .map(|i| center + Vec2::from_angle(step * i as f32) * radius)
            .collect();
        self.polygon(&points, ink);
    }

    /// Copy another canvas onto this one at a device-space offset
    pub fn blit(&mut self, source: &Canvas, x: i32, y: i32) {
        self.pixmap.draw_pixmap(
            x,
            y,
            source.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        self.draw_calls += 1;
    }

    /// Straight-alpha color of a pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Color {
                r: c.red(),
                g: c.green(),
                b: c.blue(),
                a: c.alpha(),
            }
        })
    }

    /// Straight-alpha RGBA8 bytes, row-major
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixmap.data().len());
        for p in self.pixmap.pixels() {
            let c = p.demultiply();
            bytes.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        bytes
    }

    pub fn to_rgba_image(&self) -> Result<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width(), self.height(), self.to_rgba_bytes())
            .ok_or_else(|| GalleryError::Canvas("pixel buffer size mismatch".to_string()))
    }

    /// Number of primitives rasterized since creation
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }
}
