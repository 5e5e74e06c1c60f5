//! Camera state and the projection from model space to screen space.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::config::RenderConfig;
use crate::geometry::{Bounds, Point, ScreenPoint};
use crate::model::{Frame, Node};

/// Orthonormal camera axes derived from the view angles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    /// Unit vector from the focus towards the camera.
    pub eye: Vector3<f64>,
    /// Screen-right direction in world space.
    pub right: Vector3<f64>,
    /// Screen-up direction in world space.
    pub up: Vector3<f64>,
}

/// Camera state of one open model.
///
/// Angles are in degrees: `angle[0]` is the elevation of the camera above the
/// XY plane, `angle[1]` its azimuth about Z. `dists[0]` is the distance from
/// the focus to the camera and `dists[1]` the lens distance used as the
/// perspective scale; `gfact` is the orthographic scale in pixels per metre.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Orthographic scale.
    pub gfact: f64,
    /// World point the camera looks at.
    pub focus: Point,
    /// Elevation and azimuth in degrees.
    pub angle: [f64; 2],
    /// Camera distance and lens distance.
    pub dists: [f64; 2],
    /// Perspective instead of orthographic projection.
    pub perspective: bool,
    /// Screen position of the focus.
    pub center: ScreenPoint,
}

impl Default for View {
    fn default() -> Self {
        Self {
            gfact: 1.0,
            focus: Point::default(),
            angle: [20.0, 225.0],
            dists: [1000.0, 3000.0],
            perspective: true,
            center: ScreenPoint::default(),
        }
    }
}

impl View {
    /// Orthographic view with the given scale and screen center.
    ///
    /// # Examples
    /// ```
    /// use framex::{point, screen, RenderConfig, View};
    ///
    /// let mut view = View::orthographic(1.0, screen(50.0, 50.0));
    /// view.angle = [0.0, -90.0];
    /// let p = view.project(point(0.0, 0.0, 0.0), &RenderConfig::default());
    /// assert!((p.x - 50.0).abs() < 1.0e-9);
    /// ```
    #[must_use]
    pub fn orthographic(gfact: f64, center: ScreenPoint) -> Self {
        Self {
            gfact,
            perspective: false,
            center,
            ..Self::default()
        }
    }

    /// Camera axes for the current angles.
    #[must_use]
    pub fn basis(&self) -> Basis {
        let (sp, cp) = self.angle[0].to_radians().sin_cos();
        let (st, ct) = self.angle[1].to_radians().sin_cos();
        Basis {
            eye: Vector3::new(cp * ct, cp * st, sp),
            right: Vector3::new(-st, ct, 0.0),
            up: Vector3::new(-sp * ct, -sp * st, cp),
        }
    }

    /// Scale parameter adjusted by zoom and fit: `dists[1]` in perspective
    /// mode, `gfact` otherwise.
    #[must_use]
    pub fn scale(&self) -> f64 {
        if self.perspective {
            self.dists[1]
        } else {
            self.gfact
        }
    }

    fn scale_mut(&mut self) -> &mut f64 {
        if self.perspective {
            &mut self.dists[1]
        } else {
            &mut self.gfact
        }
    }

    /// Map a world point to the screen.
    ///
    /// In perspective mode the depth is clamped to `config.epsilon`, so points
    /// at or behind the camera never flip or divide by zero.
    #[must_use]
    pub fn project(&self, coord: Point, config: &RenderConfig) -> ScreenPoint {
        let basis = self.basis();
        let relative = coord.to_vector() - self.focus.to_vector();
        let u = relative.dot(&basis.right);
        let v = relative.dot(&basis.up);
        let factor = if self.perspective {
            let depth = (self.dists[0] - relative.dot(&basis.eye)).max(config.epsilon);
            self.dists[1].max(0.0) / depth
        } else {
            self.gfact
        };
        ScreenPoint::new(self.center.x + factor * u, self.center.y - factor * v)
    }

    /// Store the projected and deformed screen positions of `node`.
    pub fn project_node(&self, node: &mut Node, period: &str, dfact: f64, config: &RenderConfig) {
        node.pcoord = self.project(node.coord, config);
        node.dcoord = self.project(node.deformed(period, dfact), config);
    }

    /// Project every node of `frame`; must run before elements are drawn.
    pub fn reproject_all(&self, frame: &mut Frame, period: &str, dfact: f64, config: &RenderConfig) {
        for node in frame.nodes_mut() {
            self.project_node(node, period, dfact, config);
        }
    }

    /// Shift the screen center by the pointer travel.
    pub fn pan(&mut self, dx: f64, dy: f64, config: &RenderConfig) {
        self.center.x += dx * config.move_speed[0];
        self.center.y += dy * config.move_speed[1];
        log::debug!("pan to center ({:.1}, {:.1})", self.center.x, self.center.y);
    }

    /// Turn the camera: vertical travel changes the elevation, horizontal
    /// travel the azimuth (negated).
    pub fn rotate(&mut self, dx: f64, dy: f64, config: &RenderConfig) {
        self.angle[0] += dy * config.rotate_speed[0];
        self.angle[1] -= dx * config.rotate_speed[1];
        log::debug!("rotate to angles ({:.3}, {:.3})", self.angle[0], self.angle[1]);
    }

    /// Zoom by `2^(scroll / scale_speed)` keeping the screen point under
    /// `pointer` fixed.
    pub fn zoom(&mut self, scroll: f64, pointer: ScreenPoint, config: &RenderConfig) {
        let factor = 2.0_f64.powf(scroll / config.scale_speed);
        self.center.x += (factor - 1.0) * (self.center.x - pointer.x);
        self.center.y += (factor - 1.0) * (self.center.y - pointer.y);
        let scale = self.scale_mut();
        *scale = (*scale * factor).max(0.0);
        log::debug!("zoom by {factor:.4} around ({:.1}, {:.1})", pointer.x, pointer.y);
    }

    /// Scale and recenter so `bounds` fills the canvas with a margin.
    ///
    /// Returns `false` and leaves the view untouched when `bounds` has no
    /// extent.
    pub fn fit(&mut self, bounds: Bounds, width: f64, height: f64, config: &RenderConfig) -> bool {
        if bounds.width() == 0.0 && bounds.height() == 0.0 {
            return false;
        }
        let scale = config.fit_margin * (width / bounds.width()).min(height / bounds.height());
        let target = bounds.center();
        let parameter = self.scale_mut();
        *parameter = (*parameter * scale).max(0.0);
        self.center.x = 0.5 * width + scale * (self.center.x - target.x);
        self.center.y = 0.5 * height + scale * (self.center.y - target.y);
        log::debug!("fit scale {scale:.4}");
        true
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::{point, screen};

    fn side_view() -> View {
        let mut view = View::orthographic(1.0, screen(50.0, 50.0));
        view.angle = [0.0, -90.0];
        view.focus = point(5.0, 0.0, 0.0);
        view
    }

    #[test]
    fn orthographic_side_view_maps_x_to_screen_right() {
        let config = RenderConfig::default();
        let view = side_view();
        let start = view.project(point(0.0, 0.0, 0.0), &config);
        let end = view.project(point(10.0, 0.0, 0.0), &config);
        assert_abs_diff_eq!(start.x, 45.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(start.y, 50.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(end.x, 55.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(end.y, 50.0, epsilon = 1.0e-9);
        let up = view.project(point(5.0, 0.0, 2.0), &config);
        assert_abs_diff_eq!(up.y, 48.0, epsilon = 1.0e-9);
    }

    #[test]
    fn projection_is_deterministic() {
        let config = RenderConfig::default();
        let view = View::default();
        let p = point(1.5, -2.0, 7.25);
        assert_eq!(view.project(p, &config), view.project(p, &config));
    }

    #[test]
    fn perspective_shrinks_distant_points() {
        let config = RenderConfig::default();
        let mut view = side_view();
        view.perspective = true;
        view.dists = [100.0, 100.0];
        let near = view.project(point(5.0, -50.0, 1.0), &config);
        let far = view.project(point(5.0, 50.0, 1.0), &config);
        assert!((50.0 - near.y) > (50.0 - far.y));
    }

    #[test]
    fn perspective_depth_is_clamped_behind_camera() {
        let config = RenderConfig::default();
        let mut view = side_view();
        view.perspective = true;
        view.dists = [10.0, 100.0];
        // The camera sits at y = -10 looking along +y; this point is behind it.
        let p = view.project(point(6.0, -20.0, 0.0), &config);
        assert!(p.x.is_finite());
        assert!(p.x > 50.0);
    }

    #[test]
    fn zoom_keeps_point_under_pointer_fixed() {
        let config = RenderConfig::default();
        for perspective in [false, true] {
            let mut view = View::default();
            view.perspective = perspective;
            view.center = screen(400.0, 300.0);
            let p = point(3.0, -4.0, 2.0);
            let pointer = view.project(p, &config);
            view.zoom(120.0, pointer, &config);
            let after = view.project(p, &config);
            assert_abs_diff_eq!(after.x, pointer.x, epsilon = 1.0e-6);
            assert_abs_diff_eq!(after.y, pointer.y, epsilon = 1.0e-6);
        }
    }

    #[test]
    fn zoom_never_makes_scale_negative() {
        let config = RenderConfig::default();
        let mut view = side_view();
        view.gfact = -2.0;
        view.zoom(500.0, screen(0.0, 0.0), &config);
        assert_eq!(view.gfact, 0.0);
    }

    #[test]
    fn pan_and_rotate_follow_pointer_travel() {
        let config = RenderConfig::default();
        let mut view = side_view();
        view.pan(20.0, -10.0, &config);
        assert_abs_diff_eq!(view.center.x, 51.0, epsilon = 1.0e-12);
        assert_abs_diff_eq!(view.center.y, 49.5, epsilon = 1.0e-12);
        view.rotate(100.0, 200.0, &config);
        assert_abs_diff_eq!(view.angle[0], 2.0, epsilon = 1.0e-12);
        assert_abs_diff_eq!(view.angle[1], -91.0, epsilon = 1.0e-12);
    }

    #[test]
    fn fit_is_idempotent_and_skips_degenerate_bounds() {
        let config = RenderConfig::default();
        let mut view = View::default();
        let points = [point(0.0, 0.0, 0.0), point(12.0, 0.0, 0.0), point(12.0, 8.0, 6.0)];
        let bounds_of = |view: &View| {
            Bounds::enclosing(points.iter().map(|&p| view.project(p, &config))).expect("points")
        };
        assert!(view.fit(bounds_of(&view), 800.0, 600.0, &config));
        let scale = view.scale();
        let center = view.center;
        assert!(view.fit(bounds_of(&view), 800.0, 600.0, &config));
        assert_abs_diff_eq!(view.scale() / scale, 1.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(view.center.x, center.x, epsilon = 1.0e-6);
        assert_abs_diff_eq!(view.center.y, center.y, epsilon = 1.0e-6);

        let single = Bounds::enclosing([screen(3.0, 3.0)]).expect("point");
        let before = view.clone();
        assert!(!view.fit(single, 800.0, 600.0, &config));
        assert_eq!(view, before);
    }
}
