//! Drawing primitives on an abstract canvas.
//!
//! Everything here works in screen space. The canvas and the font belong to
//! the windowing layer; this module only decides which strokes, polygons and
//! glyph runs make up a line, an arrow, a circle, a caption or a support glyph.

use serde::{Deserialize, Serialize};

use crate::geometry::ScreenPoint;
use crate::model::{Support, YieldState};

/// RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Stroke settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    /// Stroke width in pixels.
    pub width: f64,
    /// Stroke color.
    pub color: Color,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: Color::WHITE,
        }
    }
}

/// Which point of a text block sits on the requested position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    /// Left edge of the last line's baseline.
    #[default]
    SouthWest,
    /// Middle of the last line's baseline.
    South,
    /// Middle of the first line's top.
    North,
}

/// How a glyph run is placed and colored by the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextStyle {
    /// Rotation in degrees, counter-clockwise on screen.
    pub angle: f64,
    /// Anchor of the block.
    pub anchor: Anchor,
    /// Failure classification of the value, for color selection.
    pub tone: YieldState,
}

/// Glyph metrics of the windowing layer.
pub trait Font {
    /// Position of every rune of `runes` when the block is laid out left and
    /// bottom aligned at `origin`; line breaks get a position too.
    fn layout(&self, runes: &[char], origin: ScreenPoint) -> Vec<ScreenPoint>;
}

/// Drawing surface of the windowing layer.
pub trait Canvas {
    /// Stroke an open polyline.
    fn draw_lines(&mut self, points: &[ScreenPoint], pen: &Pen);

    /// Stroke and fill a polygon.
    fn draw_polygon(&mut self, points: &[ScreenPoint], pen: &Pen, fill: Color);

    /// Draw glyphs at precomputed positions.
    fn draw_runes(&mut self, runes: &[char], offsets: &[ScreenPoint], style: &TextStyle);

    /// Mark the canvas as fully drawn.
    fn complete(&mut self);

    /// Free the resources held by the canvas.
    fn release(&mut self);
}

/// Straight segment from `start` to `end`.
pub fn line(canvas: &mut dyn Canvas, pen: &Pen, start: ScreenPoint, end: ScreenPoint) {
    canvas.draw_lines(&[start, end], pen);
}

/// Open polyline; fewer than two points draw nothing.
pub fn polyline(canvas: &mut dyn Canvas, pen: &Pen, points: &[ScreenPoint]) {
    if points.len() >= 2 {
        canvas.draw_lines(points, pen);
    }
}

/// Shaft from `tail` to `head` plus a two-stroke head.
///
/// The head strokes are `size` times the shaft long and open by `theta`
/// radians to either side of it.
pub fn arrow(
    canvas: &mut dyn Canvas,
    pen: &Pen,
    tail: ScreenPoint,
    head: ScreenPoint,
    size: f64,
    theta: f64,
) {
    line(canvas, pen, tail, head);
    for [first, second] in arrow_barbs(tail, head, size, theta) {
        line(canvas, pen, first, second);
    }
}

/// The two head strokes of an arrow, each starting at `head`.
#[must_use]
pub fn arrow_barbs(
    tail: ScreenPoint,
    head: ScreenPoint,
    size: f64,
    theta: f64,
) -> [[ScreenPoint; 2]; 2] {
    let c = size * theta.cos();
    let s = size * theta.sin();
    let dx = tail.x - head.x;
    let dy = tail.y - head.y;
    [
        [head, ScreenPoint::new(head.x + dx * c - dy * s, head.y + dx * s + dy * c)],
        [head, ScreenPoint::new(head.x + dx * c + dy * s, head.y - dx * s + dy * c)],
    ]
}

/// Vertices of a regular polygon inscribed in the circle.
fn circle_points(center: ScreenPoint, radius: f64, division: usize) -> Vec<ScreenPoint> {
    let division = division.max(3);
    let step = std::f64::consts::TAU / division as f64;
    (0..division)
        .map(|i| {
            let (sin, cos) = (step * i as f64).sin_cos();
            ScreenPoint::new(center.x + radius * cos, center.y + radius * sin)
        })
        .collect()
}

/// Circle outline approximated by `division` segments.
pub fn circle(canvas: &mut dyn Canvas, pen: &Pen, center: ScreenPoint, radius: f64, division: usize) {
    let mut points = circle_points(center, radius, division);
    if let Some(&first) = points.first() {
        points.push(first);
    }
    canvas.draw_lines(&points, pen);
}

/// Disc approximated by a `division`-gon filled with the pen color.
pub fn filled_circle(
    canvas: &mut dyn Canvas,
    pen: &Pen,
    center: ScreenPoint,
    radius: f64,
    division: usize,
) {
    let points = circle_points(center, radius, division);
    canvas.draw_polygon(&points, pen, pen.color);
}

/// Multi-line text laid out at `origin`.
///
/// Line breaks are dropped from the glyph stream; the remaining glyphs keep
/// the positions the font computed for the full block.
pub fn text(canvas: &mut dyn Canvas, font: &dyn Font, origin: ScreenPoint, content: &str, style: &TextStyle) {
    let runes: Vec<char> = content.chars().collect();
    let offsets = font.layout(&runes, origin);
    let (glyphs, positions): (Vec<char>, Vec<ScreenPoint>) = runes
        .iter()
        .zip(offsets)
        .filter(|(rune, _)| **rune != '\n')
        .map(|(rune, offset)| (*rune, offset))
        .unzip();
    if !glyphs.is_empty() {
        canvas.draw_runes(&glyphs, &positions, style);
    }
}

/// Boundary-condition glyph of height `size` hanging below `at`.
pub fn support(canvas: &mut dyn Canvas, pen: &Pen, at: ScreenPoint, kind: Support, size: f64) {
    let half = size / 3.0_f64.sqrt();
    match kind {
        Support::Pin => pin_triangle(canvas, pen, at, size),
        Support::XRoller | Support::YRoller | Support::XYRoller => {
            pin_triangle(canvas, pen, at, size);
            let y = at.y + 1.25 * size;
            line(canvas, pen, ScreenPoint::new(at.x - half, y), ScreenPoint::new(at.x + half, y));
        }
        Support::ZRoller => {
            let top = ScreenPoint::new(at.x - size, at.y - half);
            let bottom = ScreenPoint::new(at.x - size, at.y + half);
            canvas.draw_lines(&[at, top, bottom, at], pen);
            let x = at.x - 1.25 * size;
            line(canvas, pen, ScreenPoint::new(x, at.y - half), ScreenPoint::new(x, at.y + half));
        }
        Support::Fix => {
            line(canvas, pen, ScreenPoint::new(at.x - size, at.y), ScreenPoint::new(at.x + size, at.y));
            for step in [-1.0, 0.0, 1.0] {
                let x = at.x + step * size;
                line(
                    canvas,
                    pen,
                    ScreenPoint::new(x, at.y),
                    ScreenPoint::new(x - 0.5 * size, at.y + 0.5 * size),
                );
            }
        }
    }
}

/// Triangle with its apex on `at`.
fn pin_triangle(canvas: &mut dyn Canvas, pen: &Pen, at: ScreenPoint, size: f64) {
    let half = size / 3.0_f64.sqrt();
    let left = ScreenPoint::new(at.x - half, at.y + size);
    let right = ScreenPoint::new(at.x + half, at.y + size);
    canvas.draw_lines(&[at, left, right, at], pen);
}
