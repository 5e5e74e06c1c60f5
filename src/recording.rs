//! In-memory canvas, driver and font.
//!
//! [`RecordingCanvas`] keeps every primitive it receives so drawings can be
//! inspected or replayed into another format; [`MonospaceFont`] lays out text
//! on a fixed grid.

use crate::errors::RenderError;
use crate::geometry::ScreenPoint;
use crate::primitives::{Canvas, Color, Font, Pen, TextStyle};
use crate::viewer::Driver;

/// One primitive received by a [`RecordingCanvas`].
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Open polyline.
    Lines {
        /// Vertices in order.
        points: Vec<ScreenPoint>,
        /// Stroke settings.
        pen: Pen,
    },
    /// Filled polygon.
    Polygon {
        /// Vertices in order.
        points: Vec<ScreenPoint>,
        /// Stroke settings.
        pen: Pen,
        /// Fill color.
        fill: Color,
    },
    /// Glyph run.
    Runes {
        /// The glyphs.
        text: String,
        /// Position of each glyph.
        offsets: Vec<ScreenPoint>,
        /// Placement and tone.
        style: TextStyle,
    },
}

/// Canvas that records what is drawn on it.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// Drawn so far.
    primitives: Vec<Primitive>,
    /// Set by [`Canvas::complete`].
    completed: bool,
    /// Set by [`Canvas::release`].
    released: bool,
}

impl RecordingCanvas {
    /// Empty canvas of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Canvas width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Everything drawn so far, in order.
    #[must_use]
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Vertices of every stroked polyline, in order.
    #[must_use]
    pub fn strokes(&self) -> Vec<Vec<ScreenPoint>> {
        self.primitives
            .iter()
            .filter_map(|primitive| match primitive {
                Primitive::Lines { points, .. } => Some(points.clone()),
                _ => None,
            })
            .collect()
    }

    /// Vertices of every filled polygon, in order.
    #[must_use]
    pub fn polygons(&self) -> Vec<Vec<ScreenPoint>> {
        self.primitives
            .iter()
            .filter_map(|primitive| match primitive {
                Primitive::Polygon { points, .. } => Some(points.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every glyph run with its style, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<(&str, &TextStyle)> {
        self.primitives
            .iter()
            .filter_map(|primitive| match primitive {
                Primitive::Runes { text, style, .. } => Some((text.as_str(), style)),
                _ => None,
            })
            .collect()
    }

    /// Return `true` once [`Canvas::complete`] was called.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Return `true` once [`Canvas::release`] was called.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Canvas for RecordingCanvas {
    fn draw_lines(&mut self, points: &[ScreenPoint], pen: &Pen) {
        self.primitives.push(Primitive::Lines {
            points: points.to_vec(),
            pen: *pen,
        });
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], pen: &Pen, fill: Color) {
        self.primitives.push(Primitive::Polygon {
            points: points.to_vec(),
            pen: *pen,
            fill,
        });
    }

    fn draw_runes(&mut self, runes: &[char], offsets: &[ScreenPoint], style: &TextStyle) {
        self.primitives.push(Primitive::Runes {
            text: runes.iter().collect(),
            offsets: offsets.to_vec(),
            style: *style,
        });
    }

    fn complete(&mut self) {
        self.completed = true;
    }

    fn release(&mut self) {
        self.released = true;
        self.primitives.clear();
    }
}

/// Driver handing out [`RecordingCanvas`]es.
#[derive(Clone, Debug, Default)]
pub struct RecordingDriver {
    /// Refuse the next canvas request.
    pub fail_next: bool,
    /// Canvases handed out.
    created: usize,
}

impl RecordingDriver {
    /// Number of canvases handed out.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created
    }
}

impl Driver for RecordingDriver {
    type Canvas = RecordingCanvas;

    fn create_canvas(&mut self, width: u32, height: u32) -> Result<RecordingCanvas, RenderError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(RenderError::CanvasUnavailable {
                width,
                height,
                reason: "driver refused the request".to_string(),
            });
        }
        self.created += 1;
        Ok(RecordingCanvas::new(width, height))
    }
}

/// Font with a fixed advance and line height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceFont {
    /// Horizontal distance between glyphs.
    pub advance: f64,
    /// Vertical distance between baselines.
    pub line_height: f64,
}

impl Default for MonospaceFont {
    fn default() -> Self {
        Self {
            advance: 7.0,
            line_height: 12.0,
        }
    }
}

impl Font for MonospaceFont {
    fn layout(&self, runes: &[char], origin: ScreenPoint) -> Vec<ScreenPoint> {
        let lines = runes.iter().filter(|&&rune| rune == '\n').count() + 1;
        let mut row = 0;
        let mut column = 0;
        let mut offsets = Vec::with_capacity(runes.len());
        for &rune in runes {
            let rise = (lines - 1 - row) as f64 * self.line_height;
            offsets.push(ScreenPoint::new(
                origin.x + column as f64 * self.advance,
                origin.y - rise,
            ));
            if rune == '\n' {
                row += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::screen;

    #[test]
    fn monospace_layout_stacks_lines_upwards() {
        let font = MonospaceFont::default();
        let offsets = font.layout(&['a', '\n', 'b', 'c'], screen(0.0, 100.0));
        assert_eq!(
            offsets,
            vec![
                screen(0.0, 88.0),
                screen(7.0, 88.0),
                screen(0.0, 100.0),
                screen(7.0, 100.0)
            ]
        );
    }

    #[test]
    fn release_drops_recorded_primitives() {
        let mut canvas = RecordingCanvas::new(10, 10);
        canvas.draw_lines(&[screen(0.0, 0.0), screen(1.0, 1.0)], &Pen::default());
        canvas.complete();
        assert!(canvas.is_completed());
        canvas.release();
        assert!(canvas.is_released());
        assert!(canvas.primitives().is_empty());
    }

    #[test]
    fn driver_can_refuse_one_request() {
        let mut driver = RecordingDriver {
            fail_next: true,
            ..RecordingDriver::default()
        };
        assert!(driver.create_canvas(4, 3).is_err());
        let canvas = driver.create_canvas(4, 3).expect("second request succeeds");
        assert_eq!((canvas.width(), canvas.height()), (4, 3));
        assert_eq!(driver.created(), 1);
    }
}
