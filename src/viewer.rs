//! The surface offered to a windowing layer: pointer gestures, fit-to-canvas
//! and redraws that swap in a fresh canvas.

use crate::config::RenderConfig;
use crate::errors::RenderError;
use crate::geometry::{Bounds, Point, ScreenPoint};
use crate::model::Frame;
use crate::overlay::{Overlay, StandardOverlay};
use crate::primitives::{Canvas, Font};
use crate::render::{DrawContext, Renderer};
use crate::show::Show;
use crate::view::View;

/// Source of canvases, provided by the windowing layer.
pub trait Driver {
    /// Canvas type handed out.
    type Canvas: Canvas;

    /// Create an empty canvas of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::CanvasUnavailable`] when no canvas can be made.
    fn create_canvas(&mut self, width: u32, height: u32) -> Result<Self::Canvas, RenderError>;
}

/// Pointer buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    /// Primary button.
    Left,
    /// Middle button or wheel press; drives the camera.
    Middle,
    /// Secondary button.
    Right,
}

/// Keyboard modifiers held during a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift is held.
    pub shift: bool,
    /// Control is held.
    pub control: bool,
}

/// One open model with its camera, display settings and current canvas.
pub struct Viewer<D: Driver, F: Font> {
    /// Canvas source.
    driver: D,
    /// Font used for every caption.
    font: F,
    /// Hooks for optional overlays.
    overlay: Box<dyn Overlay>,
    /// The model being shown.
    frame: Frame,
    /// Camera of the model.
    pub view: View,
    /// Display configuration of the model.
    pub show: Show,
    /// Tuning constants.
    config: RenderConfig,
    /// Canvas width and height in pixels.
    canvas_size: (u32, u32),
    /// Never pan.
    pub fix_move: bool,
    /// Never rotate; plain drags pan.
    pub fix_rotate: bool,
    /// Button held down and where it went down.
    pressed: Option<(Button, ScreenPoint)>,
    /// Canvas of the latest successful redraw.
    canvas: Option<D::Canvas>,
}

impl<D: Driver, F: Font> Viewer<D, F> {
    /// Open `frame` on a canvas of the given size, centered and unfitted.
    #[must_use]
    pub fn new(driver: D, font: F, frame: Frame, width: u32, height: u32) -> Self {
        let mut show = Show::new();
        show.adopt_sections(frame.section_numbers());
        Self {
            driver,
            font,
            overlay: Box::new(StandardOverlay),
            frame,
            view: centered_view(width, height),
            show,
            config: RenderConfig::default(),
            canvas_size: (width, height),
            fix_move: false,
            fix_rotate: false,
            pressed: None,
            canvas: None,
        }
    }

    /// Replace the tuning constants.
    #[must_use]
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the overlay hooks.
    #[must_use]
    pub fn with_overlay<O: Overlay + 'static>(mut self, overlay: O) -> Self {
        self.overlay = Box::new(overlay);
        self
    }

    /// The model being shown.
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The model being shown, for edits between redraws.
    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    /// Tuning constants.
    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Canvas of the latest successful redraw.
    #[must_use]
    pub fn canvas(&self) -> Option<&D::Canvas> {
        self.canvas.as_ref()
    }

    /// Canvas width and height in pixels.
    #[must_use]
    pub fn canvas_size(&self) -> (u32, u32) {
        self.canvas_size
    }

    /// Record a new canvas size; applies from the next redraw.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.canvas_size = (width, height);
    }

    /// Screen position of a world point under the current view.
    #[must_use]
    pub fn project(&self, coord: Point) -> ScreenPoint {
        self.view.project(coord, &self.config)
    }

    /// Project every node with the current view.
    pub fn reproject_all(&mut self) {
        self.view
            .reproject_all(&mut self.frame, &self.show.period, self.show.dfact, &self.config);
    }

    /// Screen bounding box of the visible nodes.
    #[must_use]
    pub fn bbox(&self) -> Option<Bounds> {
        Bounds::enclosing(
            self.frame
                .node_indices()
                .filter(|&idx| !self.show.is_node_hidden(&self.frame, idx))
                .map(|idx| self.frame.node_at(idx).pcoord),
        )
    }

    /// Reproject, then scale and recenter so the visible nodes fill the
    /// canvas. Returns `false` when there is nothing with extent to fit.
    pub fn fit_to_canvas(&mut self) -> bool {
        self.reproject_all();
        let Some(bounds) = self.bbox() else {
            return false;
        };
        let (width, height) = self.canvas_size;
        self.view
            .fit(bounds, f64::from(width), f64::from(height), &self.config)
    }

    /// Make the centroid of all nodes the focus, then fit and redraw.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the canvas cannot be replaced.
    pub fn reset_focus(&mut self) -> Result<(), RenderError> {
        if let Some(centroid) = self.frame.centroid() {
            self.view.focus = centroid;
        }
        self.redraw_nodes()?;
        self.fit_to_canvas();
        self.redraw()
    }

    /// Replace the model, keeping the display configuration.
    ///
    /// Sections new to the display configuration become visible, and the
    /// camera starts over centered on the canvas.
    pub fn replace_frame(&mut self, frame: Frame) -> Frame {
        self.show.adopt_sections(frame.section_numbers());
        self.view = centered_view(self.canvas_size.0, self.canvas_size.1);
        log::debug!(
            "replacing frame: {} nodes, {} elements",
            frame.node_count(),
            frame.elem_count()
        );
        std::mem::replace(&mut self.frame, frame)
    }

    /// A button went down at `at`.
    pub fn press(&mut self, button: Button, at: ScreenPoint) {
        self.pressed = Some((button, at));
    }

    /// A button went up; the frame is redrawn in full.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the canvas cannot be replaced.
    pub fn release(&mut self) -> Result<(), RenderError> {
        self.pressed = None;
        self.redraw()
    }

    /// The pointer moved to `at`.
    ///
    /// While the middle button is held the camera pans (shift held or
    /// rotation locked) or rotates by the travel since the press, and the
    /// nodes are redrawn.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the canvas cannot be replaced.
    pub fn drag(&mut self, at: ScreenPoint, modifiers: Modifiers) -> Result<(), RenderError> {
        let Some((Button::Middle, start)) = self.pressed else {
            return Ok(());
        };
        let dx = at.x - start.x;
        let dy = at.y - start.y;
        if !self.fix_move && (modifiers.shift || self.fix_rotate) {
            self.view.pan(dx, dy, &self.config);
        } else if !self.fix_rotate {
            self.view.rotate(dx, dy, &self.config);
        }
        self.redraw_nodes()
    }

    /// The wheel turned by `delta` with the pointer at `at`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the canvas cannot be replaced.
    pub fn scroll(&mut self, delta: f64, at: ScreenPoint) -> Result<(), RenderError> {
        self.view.zoom(delta, at, &self.config);
        self.redraw()
    }

    /// A double click; the middle button resets the focus.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the canvas cannot be replaced.
    pub fn double_click(&mut self, button: Button) -> Result<(), RenderError> {
        match button {
            Button::Middle => self.reset_focus(),
            Button::Left | Button::Right => Ok(()),
        }
    }

    /// Redraw nodes and elements on a fresh canvas.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the canvas cannot be replaced.
    pub fn redraw(&mut self) -> Result<(), RenderError> {
        self.swap_canvas(true)
    }

    /// Redraw the nodes only on a fresh canvas.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the canvas cannot be replaced.
    pub fn redraw_nodes(&mut self) -> Result<(), RenderError> {
        self.swap_canvas(false)
    }

    /// Release the current canvas, draw on a new one and install it.
    fn swap_canvas(&mut self, with_elements: bool) -> Result<(), RenderError> {
        if let Some(mut previous) = self.canvas.take() {
            previous.release();
        }
        let (width, height) = self.canvas_size;
        let mut canvas = self
            .driver
            .create_canvas(width, height)
            .inspect_err(|err| log::warn!("redraw aborted: {err}"))?;
        self.reproject_all();
        let ctx = DrawContext::new(&self.frame, &self.show, &self.view, &self.config);
        let renderer = Renderer::new(ctx, &self.font, self.overlay.as_ref());
        if with_elements {
            renderer.render_frame(&mut canvas);
        } else {
            renderer.render_nodes(&mut canvas);
        }
        self.canvas = Some(canvas);
        Ok(())
    }
}

/// Default camera with its center on the middle of the canvas.
fn centered_view(width: u32, height: u32) -> View {
    View {
        center: ScreenPoint::new(0.5 * f64::from(width), 0.5 * f64::from(height)),
        ..View::default()
    }
}
