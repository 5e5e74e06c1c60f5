//! Extension hooks drawn on top of the annotated frame.
//!
//! The renderer calls these hooks at fixed points of the element and node
//! passes. [`NoOverlay`] leaves all of them empty; [`StandardOverlay`] draws
//! opening rectangles, panel and node normals and element axes.

use std::collections::BTreeSet;

use nalgebra::Vector3;
use petgraph::graph::NodeIndex;

use crate::geometry::{Point, ScreenPoint};
use crate::model::{Element, Frame};
use crate::primitives::{self, Canvas, Pen};
use crate::render::DrawContext;

/// Hooks for optional overlays.
pub trait Overlay {
    /// Cross-section silhouette of a line element.
    fn draw_section(&self, _ctx: &DrawContext<'_>, _canvas: &mut dyn Canvas, _pen: &Pen, _elem: &Element) {}

    /// Opening rectangle of a wall or slab.
    fn draw_wrect(&self, _ctx: &DrawContext<'_>, _canvas: &mut dyn Canvas, _pen: &Pen, _elem: &Element) {}

    /// Normal indicator of a wall or slab.
    fn draw_elem_normal(&self, _ctx: &DrawContext<'_>, _canvas: &mut dyn Canvas, _pen: &Pen, _elem: &Element) {}

    /// Local axes of a line element.
    fn draw_element_axis(&self, _ctx: &DrawContext<'_>, _canvas: &mut dyn Canvas, _pen: &Pen, _elem: &Element) {}

    /// Normal indicator of a node.
    fn draw_node_normal(&self, _ctx: &DrawContext<'_>, _canvas: &mut dyn Canvas, _pen: &Pen, _node: NodeIndex) {}
}

/// Overlay that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOverlay;

impl Overlay for NoOverlay {}

/// Overlay drawing opening rectangles, normals and local axes.
///
/// Section silhouettes need section dimensions the model does not carry, so
/// that hook stays empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardOverlay;

impl Overlay for StandardOverlay {
    fn draw_wrect(&self, ctx: &DrawContext<'_>, canvas: &mut dyn Canvas, pen: &Pen, elem: &Element) {
        let Some([width, height]) = elem.wrect else {
            return;
        };
        let Some(center) = mean_coord(ctx.frame, elem) else {
            return;
        };
        let Some(across) = first_edge(ctx.frame, elem) else {
            return;
        };
        let up = panel_normal(ctx.frame, elem)
            .and_then(|normal| normal.cross(&across).try_normalize(f64::EPSILON))
            .unwrap_or_else(Vector3::z);
        let center = center.to_vector();
        let corners: Vec<ScreenPoint> = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0)]
            .iter()
            .map(|&(a, b)| {
                let corner = center + across * (0.5 * a * width) + up * (0.5 * b * height);
                ctx.project(Point::from(corner))
            })
            .collect();
        primitives::polyline(canvas, pen, &corners);
    }

    fn draw_elem_normal(&self, ctx: &DrawContext<'_>, canvas: &mut dyn Canvas, pen: &Pen, elem: &Element) {
        if let (Some(origin), Some(normal)) = (mean_coord(ctx.frame, elem), panel_normal(ctx.frame, elem)) {
            indicator(ctx, canvas, pen, origin, normal);
        }
    }

    fn draw_element_axis(&self, ctx: &DrawContext<'_>, canvas: &mut dyn Canvas, pen: &Pen, elem: &Element) {
        let (Some((start, end)), Some(axes)) = (elem.ends(), elem.local_axes(ctx.frame)) else {
            return;
        };
        let origin = Point::from(
            (ctx.frame.node_at(start).coord.to_vector() + ctx.frame.node_at(end).coord.to_vector()) * 0.5,
        );
        for axis in axes {
            indicator(ctx, canvas, pen, origin, axis);
        }
    }

    fn draw_node_normal(&self, ctx: &DrawContext<'_>, canvas: &mut dyn Canvas, pen: &Pen, node: NodeIndex) {
        let panels: BTreeSet<usize> = ctx.frame.incident_elems(node).collect();
        let sum = panels
            .into_iter()
            .map(|pos| &ctx.frame.elems()[pos])
            .filter(|elem| !elem.etype.is_line())
            .filter_map(|elem| panel_normal(ctx.frame, elem))
            .fold(Vector3::zeros(), |acc, normal| acc + normal);
        if let Some(normal) = sum.try_normalize(f64::EPSILON) {
            indicator(ctx, canvas, pen, ctx.frame.node_at(node).coord, normal);
        }
    }
}

/// Arrow of `normal_size` pixels from `origin` along the screen image of
/// `direction`.
fn indicator(ctx: &DrawContext<'_>, canvas: &mut dyn Canvas, pen: &Pen, origin: Point, direction: Vector3<f64>) {
    let tail = ctx.project(origin);
    let tip = ctx.project(Point::from(origin.to_vector() + direction));
    let Some(unit) = (tip.to_vector() - tail.to_vector()).try_normalize(f64::EPSILON) else {
        return;
    };
    let head = ScreenPoint::from(tail.to_vector() + unit * ctx.config.normal_size);
    primitives::arrow(canvas, pen, tail, head, ctx.config.arrow_size, ctx.config.arrow_theta);
}

/// Mean world position of the element's nodes.
fn mean_coord(frame: &Frame, elem: &Element) -> Option<Point> {
    if elem.enod.is_empty() {
        return None;
    }
    let sum = elem
        .enod
        .iter()
        .fold(Vector3::zeros(), |acc, &idx| acc + frame.node_at(idx).coord.to_vector());
    Some(Point::from(sum / elem.enod.len() as f64))
}

/// Unit vector along the first edge.
fn first_edge(frame: &Frame, elem: &Element) -> Option<Vector3<f64>> {
    match elem.enod.as_slice() {
        [a, b, ..] => (frame.node_at(*b).coord.to_vector() - frame.node_at(*a).coord.to_vector())
            .try_normalize(f64::EPSILON),
        _ => None,
    }
}

/// Unit normal of a planar polygon by Newell's method.
fn panel_normal(frame: &Frame, elem: &Element) -> Option<Vector3<f64>> {
    if elem.enod.len() < 3 {
        return None;
    }
    let coords: Vec<Vector3<f64>> = elem
        .enod
        .iter()
        .map(|&idx| frame.node_at(idx).coord.to_vector())
        .collect();
    let mut normal = Vector3::zeros();
    for (i, current) in coords.iter().enumerate() {
        let next = coords[(i + 1) % coords.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal.try_normalize(f64::EPSILON)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::config::RenderConfig;
    use crate::geometry::{point, screen};
    use crate::model::{ElemType, Section};
    use crate::recording::RecordingCanvas;
    use crate::show::Show;
    use crate::view::View;

    fn slab_frame() -> Frame {
        let mut frame = Frame::new();
        frame.add_section(Section::new(501, "S15"));
        for (num, (x, y)) in [(1, (0.0, 0.0)), (2, (4.0, 0.0)), (3, (4.0, 4.0)), (4, (0.0, 4.0))] {
            frame.add_node(num, point(x, y, 3.0)).expect("node added");
        }
        frame
            .add_elem(1, ElemType::Slab, 501, &[1, 2, 3, 4])
            .expect("slab added");
        frame
    }

    #[test]
    fn slab_normal_points_up() {
        let frame = slab_frame();
        let elem = frame.elem(1).expect("slab exists");
        let normal = panel_normal(&frame, elem).expect("planar panel");
        assert_abs_diff_eq!(normal.z, 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn wrect_is_a_closed_rectangle_around_the_panel_center() {
        let mut frame = slab_frame();
        frame.elem_mut(1).expect("slab exists").wrect = Some([2.0, 1.0]);
        let show = Show::new();
        let mut view = View::orthographic(10.0, screen(0.0, 0.0));
        view.angle = [90.0, -90.0];
        let config = RenderConfig::default();
        let ctx = DrawContext::new(&frame, &show, &view, &config);
        let mut canvas = RecordingCanvas::new(200, 200);
        let elem = frame.elem(1).expect("slab exists");
        StandardOverlay.draw_wrect(&ctx, &mut canvas, &Pen::default(), elem);
        let strokes = canvas.strokes();
        assert_eq!(strokes.len(), 1);
        let corners = &strokes[0];
        assert_eq!(corners.len(), 5);
        assert_eq!(corners.first(), corners.last());
        let xs: Vec<f64> = corners.iter().map(|c| c.x).collect();
        let span = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - xs.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_abs_diff_eq!(span, 20.0, epsilon = 1.0e-9);
    }

    #[test]
    fn default_hooks_draw_nothing() {
        let frame = slab_frame();
        let show = Show::new();
        let view = View::default();
        let config = RenderConfig::default();
        let ctx = DrawContext::new(&frame, &show, &view, &config);
        let mut canvas = RecordingCanvas::new(10, 10);
        let elem = frame.elem(1).expect("slab exists");
        NoOverlay.draw_wrect(&ctx, &mut canvas, &Pen::default(), elem);
        NoOverlay.draw_elem_normal(&ctx, &mut canvas, &Pen::default(), elem);
        StandardOverlay.draw_section(&ctx, &mut canvas, &Pen::default(), elem);
        assert!(canvas.primitives().is_empty());
    }
}
