use framex::primitives::{Anchor, Canvas, Color, Pen, TextStyle};
use framex::{Driver, RenderError, ScreenPoint, YieldState};
use std::fmt::Write;

/// Canvas writing SVG elements into a string.
#[derive(Clone, Debug, Default)]
pub struct SvgCanvas {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// Elements drawn so far.
    body: String,
    /// Set once the drawing is complete.
    completed: bool,
}

impl SvgCanvas {
    /// Empty canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// The finished document on a black background.
    pub fn to_document(&self) -> String {
        let mut output = String::new();
        writeln!(
            &mut output,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{1}" viewBox="0 0 {0} {1}">"#,
            self.width, self.height
        )
        .expect("writing to string cannot fail");
        let background = Color::BLACK;
        writeln!(
            &mut output,
            r#"<rect width="100%" height="100%" fill="rgb({},{},{})"/>"#,
            background.r, background.g, background.b
        )
        .expect("writing to string cannot fail");
        output.push_str(&self.body);
        output.push_str("</svg>\n");
        if !self.completed {
            log::warn!("writing an SVG document that was never completed");
        }
        output
    }
}

/// Stroke attributes of a pen color.
fn stroke(color: Color) -> String {
    format!(
        r#"stroke="rgb({},{},{})" stroke-opacity="{:.3}""#,
        color.r,
        color.g,
        color.b,
        f64::from(color.a) / 255.0
    )
}

/// Coordinates in the `points` attribute format.
fn points_attribute(points: &[ScreenPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text color by failure classification.
fn tone_color(tone: YieldState) -> &'static str {
    match tone {
        YieldState::Nominal => "white",
        YieldState::Yielded => "magenta",
        YieldState::BrittleFailure => "red",
    }
}

/// Escape the characters SVG text cannot hold verbatim.
fn escape(rune: char) -> String {
    match rune {
        '&' => "&amp;".to_string(),
        '<' => "&lt;".to_string(),
        '>' => "&gt;".to_string(),
        other => other.to_string(),
    }
}

impl Canvas for SvgCanvas {
    fn draw_lines(&mut self, points: &[ScreenPoint], pen: &Pen) {
        writeln!(
            &mut self.body,
            r#"<polyline points="{}" fill="none" {} stroke-width="{}"/>"#,
            points_attribute(points),
            stroke(pen.color),
            pen.width
        )
        .expect("writing to string cannot fail");
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], pen: &Pen, fill: Color) {
        writeln!(
            &mut self.body,
            r#"<polygon points="{}" fill="rgb({},{},{})" {} stroke-width="{}"/>"#,
            points_attribute(points),
            fill.r,
            fill.g,
            fill.b,
            stroke(pen.color),
            pen.width
        )
        .expect("writing to string cannot fail");
    }

    fn draw_runes(&mut self, runes: &[char], offsets: &[ScreenPoint], style: &TextStyle) {
        let Some(origin) = offsets.first() else {
            return;
        };
        // Glyph positions come from the font; the anchor only decides how the
        // block hangs off its origin.
        let baseline = match style.anchor {
            Anchor::SouthWest | Anchor::South => "auto",
            Anchor::North => "hanging",
        };
        writeln!(
            &mut self.body,
            r#"<g transform="rotate({:.2} {:.2} {:.2})" fill="{}" font-family="monospace" font-size="11" dominant-baseline="{}">"#,
            -style.angle,
            origin.x,
            origin.y,
            tone_color(style.tone),
            baseline
        )
        .expect("writing to string cannot fail");
        for (rune, offset) in runes.iter().zip(offsets) {
            writeln!(
                &mut self.body,
                r#"<text x="{:.2}" y="{:.2}">{}</text>"#,
                offset.x,
                offset.y,
                escape(*rune)
            )
            .expect("writing to string cannot fail");
        }
        self.body.push_str("</g>\n");
    }

    fn complete(&mut self) {
        self.completed = true;
    }

    fn release(&mut self) {
        self.body.clear();
        self.completed = false;
    }
}

/// Driver handing out [`SvgCanvas`]es.
#[derive(Clone, Copy, Debug, Default)]
pub struct SvgDriver;

impl Driver for SvgDriver {
    type Canvas = SvgCanvas;

    fn create_canvas(&mut self, width: u32, height: u32) -> Result<SvgCanvas, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::CanvasUnavailable {
                width,
                height,
                reason: "an SVG document needs a positive size".to_string(),
            });
        }
        Ok(SvgCanvas::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framex::screen;

    #[test]
    fn polyline_lands_in_document() {
        let mut canvas = SvgCanvas::new(100, 50);
        canvas.draw_lines(&[screen(0.0, 0.0), screen(10.0, 5.0)], &Pen::default());
        canvas.complete();
        let document = canvas.to_document();
        assert!(document.starts_with("<svg"));
        assert!(document.contains(r#"<rect width="100%" height="100%" fill="rgb(0,0,0)"/>"#));
        assert!(document.contains(r#"points="0.00,0.00 10.00,5.00""#));
        assert!(document.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn zero_sized_canvas_is_refused() {
        assert!(SvgDriver.create_canvas(0, 10).is_err());
    }
}
