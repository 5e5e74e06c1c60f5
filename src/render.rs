//! Annotated drawing of nodes and elements.
//!
//! Captions are built by walking fixed, ordered rule tables: each rule has a
//! predicate on the display configuration and a producer that appends caption
//! lines and may draw geometry. The table order is the caption line order.

use nalgebra::Vector3;
use petgraph::graph::NodeIndex;

use crate::config::RenderConfig;
use crate::format::format_value;
use crate::geometry::{Point, ScreenPoint};
use crate::model::{Axis, BondState, Component, Element, Frame, Node, YieldState, RIGID_STIFFNESS};
use crate::overlay::Overlay;
use crate::primitives::{self, Anchor, Canvas, Font, Pen, TextStyle};
use crate::show::{ElemCaption, NodeCaption, Show, StressFlag};
use crate::view::View;

/// Fixed three-decimal format of weights, lengths and yield values.
const THREE_DECIMALS: &str = "%.3f";

/// Fixed one-decimal format of the z coordinate.
const ONE_DECIMAL: &str = "%.1f";

/// Text printed for a rigid lateral stiffness.
pub const INFINITY_GLYPH: &str = "∞";

/// Newline-joined caption text built line by line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Caption {
    /// Lines in order.
    lines: Vec<String>,
}

impl Caption {
    /// Append one line.
    pub fn push<S: Into<String>>(&mut self, line: S) {
        self.lines.push(line.into());
    }

    /// Return `true` when no line was appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines in append order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The lines joined by line breaks.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Everything a drawing step reads: the frame with current projections and
/// the display, camera and tuning settings.
#[derive(Clone, Copy, Debug)]
pub struct DrawContext<'a> {
    /// The frame, projected by the current view.
    pub frame: &'a Frame,
    /// Display configuration.
    pub show: &'a Show,
    /// Camera.
    pub view: &'a View,
    /// Tuning constants.
    pub config: &'a RenderConfig,
}

impl<'a> DrawContext<'a> {
    /// Bundle the inputs of one drawing pass.
    #[must_use]
    pub fn new(frame: &'a Frame, show: &'a Show, view: &'a View, config: &'a RenderConfig) -> Self {
        Self {
            frame,
            show,
            view,
            config,
        }
    }

    /// Project a world point with the current view.
    #[must_use]
    pub fn project(&self, coord: Point) -> ScreenPoint {
        self.view.project(coord, self.config)
    }
}

/// Appends caption lines for a node and may draw.
type NodeProducer = fn(&Renderer<'_>, &Node, &mut Caption, &mut dyn Canvas);

/// One step of the node pass.
struct NodeRule {
    /// Name used in trace logs.
    name: &'static str,
    /// Whether the rule runs at all.
    applies: fn(&Show) -> bool,
    /// Caption producer.
    produce: NodeProducer,
}

/// Node pass, in caption order.
const NODE_RULES: [NodeRule; 6] = [
    NodeRule {
        name: "number",
        applies: node_number_on,
        produce: node_number,
    },
    NodeRule {
        name: "weight",
        applies: node_weight_on,
        produce: node_weight,
    },
    NodeRule {
        name: "displacement",
        applies: node_displacement_on,
        produce: node_displacement,
    },
    NodeRule {
        name: "reaction",
        applies: node_reaction_on,
        produce: node_reaction,
    },
    NodeRule {
        name: "z coordinate",
        applies: node_zcoord_on,
        produce: node_zcoord,
    },
    NodeRule {
        name: "pile",
        applies: node_pile_on,
        produce: node_pile,
    },
];

fn node_number_on(show: &Show) -> bool {
    show.node_caption.contains(NodeCaption::NUM)
}

fn node_weight_on(show: &Show) -> bool {
    show.node_caption.contains(NodeCaption::WEIGHT)
}

fn node_displacement_on(show: &Show) -> bool {
    NodeCaption::DISPLACEMENTS
        .iter()
        .any(|&flag| show.node_caption.contains(flag))
}

fn node_reaction_on(show: &Show) -> bool {
    NodeCaption::REACTIONS
        .iter()
        .any(|&flag| show.node_caption.contains(flag))
}

fn node_zcoord_on(show: &Show) -> bool {
    show.node_caption.contains(NodeCaption::ZCOORD)
}

fn node_pile_on(show: &Show) -> bool {
    show.node_caption.contains(NodeCaption::PILE)
}

/// Node number.
fn node_number(_: &Renderer<'_>, node: &Node, caption: &mut Caption, _: &mut dyn Canvas) {
    caption.push(node.num.to_string());
}

/// A z-fixed node shows its weight only while the Rz reaction caption, which
/// then carries the weight, is off.
fn node_weight(renderer: &Renderer<'_>, node: &Node, caption: &mut Caption, _: &mut dyn Canvas) {
    let show = renderer.ctx.show;
    if !node.conf[2] || !show.node_caption.contains(NodeCaption::RZ) {
        caption.push(format_value(THREE_DECIMALS, node.weight[1] * show.unit.force));
    }
}

/// Free degrees of freedom only; translations in centimeters.
fn node_displacement(renderer: &Renderer<'_>, node: &Node, caption: &mut Caption, _: &mut dyn Canvas) {
    let show = renderer.ctx.show;
    for (dof, &flag) in NodeCaption::DISPLACEMENTS.iter().enumerate() {
        if !show.node_caption.contains(flag) || node.conf[dof] {
            continue;
        }
        let value = node.displacement(&show.period, dof);
        if dof < 3 {
            caption.push(show.format_value("DISP", value * 100.0));
        } else {
            caption.push(show.format_value("THETA", value));
        }
    }
}

/// Fixed degrees of freedom only, with an arrow for each force.
fn node_reaction(renderer: &Renderer<'_>, node: &Node, caption: &mut Caption, canvas: &mut dyn Canvas) {
    let show = renderer.ctx.show;
    for (dof, &flag) in NodeCaption::REACTIONS.iter().enumerate() {
        if !show.node_caption.contains(flag) || !node.conf[dof] {
            continue;
        }
        let mut value = node.reaction(&show.period, dof);
        if dof == 2 && show.node_caption.contains(NodeCaption::WEIGHT) {
            value += node.weight[1];
        }
        if dof < 3 {
            value *= show.unit.force;
            caption.push(show.format_value("REACTION", value));
            renderer.reaction_arrow(node, dof, value, canvas);
        } else {
            value *= show.unit.moment();
            caption.push(show.format_value("REACTION", value));
        }
    }
}

/// Elevation with one decimal.
fn node_zcoord(_: &Renderer<'_>, node: &Node, caption: &mut Caption, _: &mut dyn Canvas) {
    caption.push(format_value(ONE_DECIMAL, node.coord.z));
}

/// Pile number when one is attached.
fn node_pile(_: &Renderer<'_>, node: &Node, caption: &mut Caption, _: &mut dyn Canvas) {
    if let Some(pile) = node.pile {
        caption.push(pile.to_string());
    }
}

/// Appends caption lines for an element.
type ElemProducer = fn(&Renderer<'_>, &Element, &mut Caption);

/// One line of the element caption.
struct ElemRule {
    /// Name used in trace logs.
    name: &'static str,
    /// Selection bits enabling the rule.
    flag: ElemCaption,
    /// Caption producer.
    produce: ElemProducer,
}

/// Element caption lines, in order.
const ELEM_RULES: [ElemRule; 8] = [
    ElemRule {
        name: "number",
        flag: ElemCaption::NUM,
        produce: elem_number,
    },
    ElemRule {
        name: "section",
        flag: ElemCaption::SECT,
        produce: elem_section,
    },
    ElemRule {
        name: "width",
        flag: ElemCaption::WIDTH,
        produce: elem_width,
    },
    ElemRule {
        name: "height",
        flag: ElemCaption::HEIGHT,
        produce: elem_height,
    },
    ElemRule {
        name: "rate",
        flag: ElemCaption(ElemCaption::RATE_L.0 | ElemCaption::RATE_S.0),
        produce: elem_rate,
    },
    ElemRule {
        name: "prestress",
        flag: ElemCaption::PREST,
        produce: elem_prestress,
    },
    ElemRule {
        name: "stiffness x",
        flag: ElemCaption::STIFF_X,
        produce: elem_stiffness_x,
    },
    ElemRule {
        name: "stiffness y",
        flag: ElemCaption::STIFF_Y,
        produce: elem_stiffness_y,
    },
];

fn elem_number(_: &Renderer<'_>, elem: &Element, caption: &mut Caption) {
    caption.push(elem.num.to_string());
}

fn elem_section(renderer: &Renderer<'_>, elem: &Element, caption: &mut Caption) {
    caption.push(renderer.ctx.show.section_label(elem.sect));
}

fn elem_width(renderer: &Renderer<'_>, elem: &Element, caption: &mut Caption) {
    caption.push(format_value(THREE_DECIMALS, elem.width(renderer.ctx.frame)));
}

fn elem_height(renderer: &Renderer<'_>, elem: &Element, caption: &mut Caption) {
    caption.push(format_value(THREE_DECIMALS, elem.height(renderer.ctx.frame)));
}

fn elem_rate(renderer: &Renderer<'_>, elem: &Element, caption: &mut Caption) {
    let show = renderer.ctx.show;
    let long_term = show.elem_caption.contains(ElemCaption::RATE_L);
    let short_term = show.elem_caption.contains(ElemCaption::RATE_S);
    match elem.rate_max(renderer.ctx.frame, long_term, short_term) {
        Ok(rate) => caption.push(show.format_value("RATE", rate)),
        Err(err) => log::trace!("element {}: rate omitted: {err}", elem.num),
    }
}

fn elem_prestress(renderer: &Renderer<'_>, elem: &Element, caption: &mut Caption) {
    if elem.prestress != 0.0 {
        caption.push(format_value(
            THREE_DECIMALS,
            elem.prestress * renderer.ctx.show.unit.force,
        ));
    }
}

fn elem_stiffness_x(renderer: &Renderer<'_>, elem: &Element, caption: &mut Caption) {
    stiffness_line(renderer, elem, Axis::X, caption);
}

fn elem_stiffness_y(renderer: &Renderer<'_>, elem: &Element, caption: &mut Caption) {
    stiffness_line(renderer, elem, Axis::Y, caption);
}

/// Rigid reads as the infinity glyph; zero is left out.
fn stiffness_line(renderer: &Renderer<'_>, elem: &Element, axis: Axis, caption: &mut Caption) {
    let raw = elem.lateral_stiffness(axis);
    if raw == RIGID_STIFFNESS {
        caption.push(INFINITY_GLYPH);
        return;
    }
    let value = raw * renderer.ctx.show.unit.stiffness();
    if value != 0.0 {
        caption.push(format_value(THREE_DECIMALS, value));
    }
}

/// Draws one frame, or only its nodes, onto a canvas.
///
/// Node screen positions must be current: project the frame with the same
/// view before drawing (see [`render_frame`]).
pub struct Renderer<'a> {
    /// What to draw and how to project it.
    ctx: DrawContext<'a>,
    /// Caption font.
    font: &'a dyn Font,
    /// Optional overlays.
    overlay: &'a dyn Overlay,
    /// Pen for every stroke.
    pen: Pen,
}

impl<'a> Renderer<'a> {
    /// Renderer with the default pen.
    #[must_use]
    pub fn new(ctx: DrawContext<'a>, font: &'a dyn Font, overlay: &'a dyn Overlay) -> Self {
        Self {
            ctx,
            font,
            overlay,
            pen: Pen::default(),
        }
    }

    /// Draw every visible node, then every visible element, and complete the canvas.
    pub fn render_frame(&self, canvas: &mut dyn Canvas) {
        log::trace!(
            "drawing {} nodes and {} elements",
            self.ctx.frame.node_count(),
            self.ctx.frame.elem_count()
        );
        self.draw_nodes(canvas);
        for elem in self.ctx.frame.elems() {
            if self.ctx.show.is_elem_visible(elem) {
                self.draw_elem(elem, canvas);
            }
        }
        canvas.complete();
    }

    /// Draw every visible node and complete the canvas.
    pub fn render_nodes(&self, canvas: &mut dyn Canvas) {
        log::trace!("drawing {} nodes", self.ctx.frame.node_count());
        self.draw_nodes(canvas);
        canvas.complete();
    }

    /// Node pass over the visible nodes.
    fn draw_nodes(&self, canvas: &mut dyn Canvas) {
        for idx in self.ctx.frame.node_indices() {
            if !self.ctx.show.is_node_hidden(self.ctx.frame, idx) {
                self.draw_node(idx, canvas);
            }
        }
    }

    /// Caption, reaction arrows, normal and support glyph of one node.
    pub fn draw_node(&self, idx: NodeIndex, canvas: &mut dyn Canvas) {
        let node = self.ctx.frame.node_at(idx);
        let show = self.ctx.show;
        let mut caption = Caption::default();
        for rule in NODE_RULES.iter().filter(|rule| (rule.applies)(show)) {
            log::trace!("node {}: {}", node.num, rule.name);
            (rule.produce)(self, node, &mut caption, canvas);
        }
        if !caption.is_empty() {
            primitives::text(canvas, self.font, node.pcoord, &caption.text(), &TextStyle::default());
        }
        if show.node_normal {
            self.overlay.draw_node_normal(&self.ctx, canvas, &self.pen, idx);
        }
        if show.conf {
            if let Some(kind) = node.support() {
                primitives::support(canvas, &self.pen, node.pcoord, kind, show.conf_size);
            }
        }
    }

    /// Arrow of length `rfact * value` along `dof`, pointing at the node for a
    /// non-negative value and away from it otherwise.
    fn reaction_arrow(&self, node: &Node, dof: usize, value: f64, canvas: &mut dyn Canvas) {
        let rfact = self.ctx.show.rfact;
        let config = self.ctx.config;
        if value >= 0.0 {
            let tail = self.ctx.project(node.coord.offset_axis(dof, -rfact * value));
            primitives::arrow(canvas, &self.pen, tail, node.pcoord, config.arrow_size, config.arrow_theta);
        } else {
            let head = self.ctx.project(node.coord.offset_axis(dof, rfact * value));
            primitives::arrow(canvas, &self.pen, node.pcoord, head, config.arrow_size, config.arrow_theta);
        }
    }

    /// Caption text of an element, in rule order.
    #[must_use]
    pub fn elem_caption(&self, elem: &Element) -> Caption {
        let mut caption = Caption::default();
        let selected = self.ctx.show.elem_caption;
        for rule in ELEM_RULES.iter().filter(|rule| selected.intersects(rule.flag)) {
            log::trace!("element {}: {}", elem.num, rule.name);
            (rule.produce)(self, elem, &mut caption);
        }
        caption
    }

    /// Caption, geometry, diagrams and overlays of one element.
    pub fn draw_elem(&self, elem: &Element, canvas: &mut dyn Canvas) {
        let caption = self.elem_caption(elem);
        if !caption.is_empty() {
            if let Some(anchor) = self.caption_anchor(elem) {
                primitives::text(canvas, self.font, anchor, &caption.text(), &TextStyle::default());
            }
        }
        if elem.is_line_elem() {
            self.draw_line_elem(elem, canvas);
        } else {
            self.draw_area_elem(elem, canvas);
        }
    }

    /// Braces are captioned at the quarter point near their first node,
    /// everything else at the mean screen position of its nodes.
    fn caption_anchor(&self, elem: &Element) -> Option<ScreenPoint> {
        if elem.etype.is_brace() {
            return self.end_label_position(elem, 0);
        }
        if elem.enod.is_empty() {
            return None;
        }
        let sum = elem.enod.iter().fold(ScreenPoint::default(), |acc, &idx| {
            let p = self.ctx.frame.node_at(idx).pcoord;
            ScreenPoint::new(acc.x + p.x, acc.y + p.y)
        });
        let count = elem.enod.len() as f64;
        Some(ScreenPoint::new(sum.x / count, sum.y / count))
    }

    /// Screen positions of the element's nodes.
    fn pcoords(&self, elem: &Element) -> Vec<ScreenPoint> {
        elem.enod
            .iter()
            .map(|&idx| self.ctx.frame.node_at(idx).pcoord)
            .collect()
    }

    /// Shaft, markers, overlays, diagrams and end values of a line element.
    fn draw_line_elem(&self, elem: &Element, canvas: &mut dyn Canvas) {
        let Some((start, end)) = elem.ends() else {
            return;
        };
        let frame = self.ctx.frame;
        let show = self.ctx.show;
        let head = frame.node_at(start).pcoord;
        let tail = frame.node_at(end).pcoord;

        if elem.enod.len() == 2 {
            primitives::line(canvas, &self.pen, head, tail);
        } else {
            primitives::polyline(canvas, &self.pen, &self.pcoords(elem));
        }

        let pd = elem.pdirection(frame);
        let near_start = ScreenPoint::new(head.x + pd.x * show.bond_size, head.y + pd.y * show.bond_size);
        let near_end = ScreenPoint::new(tail.x - pd.x * show.bond_size, tail.y - pd.y * show.bond_size);
        let division = self.ctx.config.circle_division;

        if show.bond {
            let (at_start, at_end) = match elem.bond_state() {
                BondState::RigidRigid => (false, false),
                BondState::PinRigid => (true, false),
                BondState::RigidPin => (false, true),
                BondState::PinPin => (true, true),
            };
            if at_start {
                primitives::circle(canvas, &self.pen, near_start, show.bond_size, division);
            }
            if at_end {
                primitives::circle(canvas, &self.pen, near_end, show.bond_size, division);
            }
        }

        if show.phinge {
            if elem.hinge(&show.period, start) {
                primitives::filled_circle(canvas, &self.pen, near_start, show.bond_size, division);
            }
            if elem.hinge(&show.period, end) {
                primitives::filled_circle(canvas, &self.pen, near_end, show.bond_size, division);
            }
        }

        if show.element_axis {
            self.overlay.draw_element_axis(&self.ctx, canvas, &self.pen, elem);
        }

        if show.deformation {
            let deformed: Vec<ScreenPoint> = elem
                .enod
                .iter()
                .map(|&idx| frame.node_at(idx).dcoord)
                .collect();
            primitives::polyline(canvas, &self.pen, &deformed);
        }

        let flag = show.stress_flag(elem.sect, elem.etype);
        if !flag.is_empty() {
            self.draw_stress(elem, flag, canvas);
        }

        if show.yield_function {
            let result = elem.yield_function(frame, &show.period);
            for end_index in 0..2 {
                let text = format_value(THREE_DECIMALS, result.values[end_index]);
                self.end_label(elem, end_index, &text, result.states[end_index], canvas);
            }
        }

        if elem.etype.is_panel_brace() {
            if elem.eldest {
                if let Some(parent) = elem.parent.and_then(|pos| frame.elems().get(pos)) {
                    if parent.has_wrect() {
                        self.overlay.draw_wrect(&self.ctx, canvas, &self.pen, parent);
                    }
                }
            }
        } else if show.draws_section(elem.sect, elem.etype) {
            self.overlay.draw_section(&self.ctx, canvas, &self.pen, elem);
        }
    }

    /// End texts of the selected stress components plus bending diagrams.
    ///
    /// Axial force carries a single value, shown with the start block;
    /// shears, torsion and bending moments show both ends.
    fn draw_stress(&self, elem: &Element, flag: StressFlag, canvas: &mut dyn Canvas) {
        let show = self.ctx.show;
        let period = show.period.as_str();
        let mut blocks = [Caption::default(), Caption::default()];
        for component in Component::ALL {
            if !flag.contains(StressFlag::of(component)) {
                continue;
            }
            let unit = if component.is_moment() {
                show.unit.moment()
            } else {
                show.unit.force
            };
            let value = |end: usize| show.format_value("STRESS", elem.stress(period, end, component) * unit);
            match component {
                Component::Nz => blocks[0].push(value(0)),
                Component::Qx | Component::Qy | Component::Mz => {
                    blocks[0].push(value(0));
                    blocks[1].push(value(1));
                }
                Component::Mx | Component::My => {
                    if !show.no_moment_value {
                        blocks[0].push(value(0));
                        blocks[1].push(value(1));
                    }
                    self.draw_moment_diagram(elem, component, canvas);
                }
            }
        }
        for (end_index, block) in blocks.iter().enumerate() {
            if !block.is_empty() {
                self.end_label(elem, end_index, &block.text(), YieldState::Nominal, canvas);
            }
        }
        log::trace!("element {}: stress flag {:#x}", elem.num, flag.0);
    }

    /// Polyline from the start node through the diagram ordinates to the end node.
    fn draw_moment_diagram(&self, elem: &Element, component: Component, canvas: &mut dyn Canvas) {
        let Some((start, end)) = elem.ends() else {
            return;
        };
        let frame = self.ctx.frame;
        let show = self.ctx.show;
        let mut points = vec![frame.node_at(start).pcoord];
        points.extend(
            elem.moment_coord(frame, &show.period, component, show.mfact)
                .into_iter()
                .map(|coord| self.ctx.project(coord)),
        );
        points.push(frame.node_at(end).pcoord);
        primitives::polyline(canvas, &self.pen, &points);
    }

    /// World point three quarters of the way towards end `end_index`,
    /// projected.
    fn end_label_position(&self, elem: &Element, end_index: usize) -> Option<ScreenPoint> {
        let (start, end) = elem.ends()?;
        let frame = self.ctx.frame;
        let coord = [start, end]
            .iter()
            .enumerate()
            .fold(Vector3::zeros(), |acc, (i, &idx)| {
                let weight = 0.75 - 0.5 * (i as f64 - end_index as f64).abs();
                acc + frame.node_at(idx).coord.to_vector() * weight
            });
        Some(self.ctx.project(Point::from(coord)))
    }

    /// Text block at one end, rotated along the element.
    fn end_label(&self, elem: &Element, end_index: usize, text: &str, tone: YieldState, canvas: &mut dyn Canvas) {
        let Some(position) = self.end_label_position(elem, end_index) else {
            return;
        };
        let style = TextStyle {
            angle: label_angle(elem, self.ctx.frame),
            anchor: if end_index == 0 { Anchor::South } else { Anchor::North },
            tone,
        };
        primitives::text(canvas, self.font, position, text, &style);
    }

    /// Closed outline of a wall or slab with its overlays.
    fn draw_area_elem(&self, elem: &Element, canvas: &mut dyn Canvas) {
        let mut points = self.pcoords(elem);
        match points.len() {
            0 | 1 => return,
            2 => {
                primitives::line(canvas, &self.pen, points[0], points[1]);
                return;
            }
            _ => {}
        }
        points.push(points[0]);
        primitives::polyline(canvas, &self.pen, &points);
        if elem.has_wrect() {
            self.overlay.draw_wrect(&self.ctx, canvas, &self.pen, elem);
        }
        if self.ctx.show.elem_normal {
            self.overlay.draw_elem_normal(&self.ctx, canvas, &self.pen, elem);
        }
    }
}

/// On-screen angle of the element in degrees, folded into (-90, 90] so text
/// never reads upside down.
#[must_use]
pub fn label_angle(elem: &Element, frame: &Frame) -> f64 {
    let pd = elem.pdirection(frame);
    normalize_angle(pd.y.atan2(pd.x).to_degrees())
}

/// Fold an angle into (-90, 90] so text never reads upside down.
fn normalize_angle(degrees: f64) -> f64 {
    if degrees > 90.0 {
        degrees - 180.0
    } else if degrees <= -90.0 {
        degrees + 180.0
    } else {
        degrees
    }
}

/// Project `frame` with `view`, then draw it completely.
pub fn render_frame(
    frame: &mut Frame,
    show: &Show,
    view: &View,
    config: &RenderConfig,
    canvas: &mut dyn Canvas,
    font: &dyn Font,
    overlay: &dyn Overlay,
) {
    view.reproject_all(frame, &show.period, show.dfact, config);
    let ctx = DrawContext::new(frame, show, view, config);
    Renderer::new(ctx, font, overlay).render_frame(canvas);
}

/// Project `frame` with `view`, then draw its nodes only.
pub fn render_nodes(
    frame: &mut Frame,
    show: &Show,
    view: &View,
    config: &RenderConfig,
    canvas: &mut dyn Canvas,
    font: &dyn Font,
    overlay: &dyn Overlay,
) {
    view.reproject_all(frame, &show.period, show.dfact, config);
    let ctx = DrawContext::new(frame, show, view, config);
    Renderer::new(ctx, font, overlay).render_nodes(canvas);
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;
    use crate::geometry::{point, screen};
    use crate::model::{Allowable, Bond, ElemType, PlasticCapacity, Section, LONG_TERM};
    use crate::overlay::NoOverlay;
    use crate::recording::{MonospaceFont, Primitive, RecordingCanvas};

    fn side_view() -> View {
        let mut view = View::orthographic(10.0, screen(200.0, 200.0));
        view.angle = [0.0, -90.0];
        view
    }

    fn girder() -> Frame {
        let mut frame = Frame::new();
        let mut section = Section::new(201, "G1");
        section.allowable = Some(Allowable {
            axial: 100.0,
            moment_x: 20.0,
            moment_y: 10.0,
        });
        frame.add_section(section);
        frame.add_node(1, point(0.0, 0.0, 0.0)).expect("node added");
        frame.add_node(2, point(6.0, 0.0, 0.0)).expect("node added");
        frame
            .add_elem(7, ElemType::Girder, 201, &[1, 2])
            .expect("element added");
        frame
    }

    /// Column from (6, 0, 6) down to the origin; on screen it runs from
    /// (260, 140) to (200, 200).
    fn sloped(etype: ElemType, brittle: bool) -> Frame {
        let mut frame = Frame::new();
        let mut section = Section::new(301, "P1");
        section.plastic = Some(PlasticCapacity {
            axial: 10.0,
            moment_x: 10.0,
            moment_y: 10.0,
        });
        section.brittle = brittle;
        frame.add_section(section);
        frame.add_node(1, point(6.0, 0.0, 6.0)).expect("node added");
        frame.add_node(2, point(0.0, 0.0, 0.0)).expect("node added");
        frame.add_elem(9, etype, 301, &[1, 2]).expect("element added");
        frame
    }

    /// Wall panel through four corners in the XZ plane.
    fn wall_frame(nodes: &[u32]) -> Frame {
        let mut frame = Frame::new();
        frame.add_section(Section::new(601, "W18"));
        for (num, (x, z)) in [(1, (0.0, 0.0)), (2, (4.0, 0.0)), (3, (4.0, 3.0)), (4, (0.0, 3.0))] {
            frame.add_node(num, point(x, 0.0, z)).expect("node added");
        }
        frame.add_elem(1, ElemType::Wall, 601, nodes).expect("wall added");
        frame
    }

    /// Records which elements the wall-rectangle hook was called with.
    #[derive(Default)]
    struct WrectLog {
        calls: RefCell<Vec<u32>>,
    }

    impl Overlay for WrectLog {
        fn draw_wrect(&self, _ctx: &DrawContext<'_>, _canvas: &mut dyn Canvas, _pen: &Pen, elem: &Element) {
            self.calls.borrow_mut().push(elem.num);
        }
    }

    fn draw(frame: &mut Frame, show: &Show) -> RecordingCanvas {
        draw_with(frame, show, &NoOverlay)
    }

    fn draw_with(frame: &mut Frame, show: &Show, overlay: &dyn Overlay) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new(400, 400);
        render_frame(
            frame,
            show,
            &side_view(),
            &RenderConfig::default(),
            &mut canvas,
            &MonospaceFont::default(),
            overlay,
        );
        canvas
    }

    fn texts(canvas: &RecordingCanvas) -> Vec<String> {
        canvas.texts().into_iter().map(|(text, _)| text.to_string()).collect()
    }

    /// Every glyph run with the position of its first glyph.
    fn runs(canvas: &RecordingCanvas) -> Vec<(String, ScreenPoint, TextStyle)> {
        canvas
            .primitives()
            .iter()
            .filter_map(|primitive| match primitive {
                Primitive::Runes { text, offsets, style } => Some((text.clone(), offsets[0], *style)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn angles_fold_into_half_open_range() {
        assert_abs_diff_eq!(normalize_angle(135.0), -45.0);
        assert_abs_diff_eq!(normalize_angle(-135.0), 45.0);
        assert_abs_diff_eq!(normalize_angle(90.0), 90.0);
        assert_abs_diff_eq!(normalize_angle(-90.0), 90.0);
        assert_abs_diff_eq!(normalize_angle(180.0), 0.0);
    }

    #[test]
    fn node_caption_lines_follow_rule_order() {
        let mut frame = girder();
        frame.set_weight(1, [0.0, 2.5, 0.0]).expect("weight set");
        frame.set_pile(1, Some(44)).expect("pile set");
        let mut show = Show::new();
        show.node_caption = NodeCaption::PILE | NodeCaption::ZCOORD | NodeCaption::WEIGHT | NodeCaption::NUM;
        let canvas = draw(&mut frame, &show);
        // Glyph runs drop line breaks, so the caption shows up concatenated.
        assert_eq!(texts(&canvas)[0], "12.5000.044");
    }

    #[test]
    fn rate_error_omits_only_that_line() {
        let mut frame = girder();
        let mut show = Show::new();
        show.elem_caption = ElemCaption::NUM | ElemCaption::RATE_L | ElemCaption::SECT;
        show.section_aliases.insert(201, "G1".to_string());
        let renderer_input = frame.elem(7).expect("element exists").clone();
        let config = RenderConfig::default();
        let view = side_view();
        view.reproject_all(&mut frame, &show.period, show.dfact, &config);
        let font = MonospaceFont::default();
        let ctx = DrawContext::new(&frame, &show, &view, &config);
        let renderer = Renderer::new(ctx, &font, &NoOverlay);
        assert_eq!(renderer.elem_caption(&renderer_input).lines(), ["7", "G1"]);

        frame
            .set_stress(7, LONG_TERM, array![[10.0, 0.0, 0.0, 0.0, 2.0, 0.0], [0.0; 6]])
            .expect("stress stored");
        let ctx = DrawContext::new(&frame, &show, &view, &config);
        let renderer = Renderer::new(ctx, &font, &NoOverlay);
        let elem = frame.elem(7).expect("element exists");
        assert_eq!(renderer.elem_caption(elem).text(), "7\nG1\n0.200");
    }

    #[test]
    fn bending_diagram_and_end_texts() {
        let mut frame = girder();
        frame
            .set_stress(7, LONG_TERM, array![[0.0, 0.0, 0.0, 0.0, 2.0, 0.0], [0.0, 0.0, 0.0, 0.0, -2.0, 0.0]])
            .expect("stress stored");
        let mut show = Show::new();
        show.stress_by_type.insert(ElemType::Girder, StressFlag::MX);
        let canvas = draw(&mut frame, &show);
        let strokes = canvas.strokes();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[1].len(), 4);
        let labels = canvas.texts();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].0, "2.000");
        assert_eq!(labels[0].1.anchor, Anchor::South);
        assert_eq!(labels[1].0, "-2.000");
        assert_eq!(labels[1].1.anchor, Anchor::North);
        assert_abs_diff_eq!(labels[0].1.angle, 0.0);

        show.no_moment_value = true;
        let canvas = draw(&mut frame, &show);
        assert!(canvas.texts().is_empty());
        assert_eq!(canvas.strokes().len(), 2);
    }

    #[test]
    fn axial_force_goes_to_start_block_only() {
        let mut frame = girder();
        frame
            .set_stress(7, LONG_TERM, array![[5.0, 1.0, 0.0, 0.0, 0.0, 0.0], [-5.0, -1.0, 0.0, 0.0, 0.0, 0.0]])
            .expect("stress stored");
        let mut show = Show::new();
        show.stress_by_section.insert(201, StressFlag::NZ | StressFlag::QX);
        let canvas = draw(&mut frame, &show);
        assert_eq!(texts(&canvas), vec!["5.0001.000", "-1.000"]);
    }

    #[test]
    fn torsion_shows_both_ends() {
        let mut frame = girder();
        frame
            .set_stress(7, LONG_TERM, array![[0.0, 0.0, 0.0, 3.0, 0.0, 0.0], [0.0, 0.0, 0.0, -4.0, 0.0, 0.0]])
            .expect("stress stored");
        let mut show = Show::new();
        show.stress_by_section.insert(201, StressFlag::MZ);
        let canvas = draw(&mut frame, &show);
        assert_eq!(texts(&canvas), vec!["3.000", "-4.000"]);
        assert_eq!(canvas.strokes().len(), 1);
    }

    #[test]
    fn yield_values_sit_near_each_end() {
        let mut show = Show::new();
        show.yield_function = true;
        for (brittle, failed) in [(false, YieldState::Yielded), (true, YieldState::BrittleFailure)] {
            let mut frame = sloped(ElemType::Column, brittle);
            frame
                .set_stress(9, LONG_TERM, array![[5.0, 0.0, 0.0, 0.0, 0.0, 0.0], [10.0, 0.0, 0.0, 0.0, 0.0, 0.0]])
                .expect("stress stored");
            let canvas = draw(&mut frame, &show);
            let labels = runs(&canvas);
            assert_eq!(labels.len(), 2);

            let (text, at, style) = &labels[0];
            assert_eq!(text, "0.250");
            assert_abs_diff_eq!(at.x, 245.0, epsilon = 1.0e-9);
            assert_abs_diff_eq!(at.y, 155.0, epsilon = 1.0e-9);
            assert_eq!(style.anchor, Anchor::South);
            assert_eq!(style.tone, YieldState::Nominal);
            // 135 degrees on screen folds to -45
            assert_abs_diff_eq!(style.angle, -45.0, epsilon = 1.0e-9);

            let (text, at, style) = &labels[1];
            assert_eq!(text, "1.000");
            assert_abs_diff_eq!(at.x, 215.0, epsilon = 1.0e-9);
            assert_abs_diff_eq!(at.y, 185.0, epsilon = 1.0e-9);
            assert_eq!(style.anchor, Anchor::North);
            assert_eq!(style.tone, failed);
        }
    }

    #[test]
    fn brace_caption_sits_near_first_node() {
        let mut frame = sloped(ElemType::Brace, false);
        let mut show = Show::new();
        show.elem_caption = ElemCaption::NUM;
        let canvas = draw(&mut frame, &show);
        let labels = runs(&canvas);
        assert_eq!(labels.len(), 1);
        let (text, at, _) = &labels[0];
        assert_eq!(text, "9");
        // the screen midpoint would be (230, 170)
        assert_abs_diff_eq!(at.x, 245.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(at.y, 155.0, epsilon = 1.0e-9);
    }

    #[test]
    fn area_outline_closes_and_short_panels_degrade() {
        let mut frame = wall_frame(&[1, 2, 3, 4]);
        let canvas = draw(&mut frame, &Show::new());
        let strokes = canvas.strokes();
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].len(), 5);
        assert_eq!(strokes[0].first(), strokes[0].last());

        let mut frame = wall_frame(&[1, 2]);
        let canvas = draw(&mut frame, &Show::new());
        let strokes = canvas.strokes();
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].len(), 2);

        let mut frame = wall_frame(&[1]);
        let canvas = draw(&mut frame, &Show::new());
        assert!(canvas.primitives().is_empty());
    }

    #[test]
    fn support_glyph_only_for_known_patterns() {
        let mut frame = girder();
        frame
            .set_support(1, [true, true, true, false, false, false])
            .expect("node exists");
        frame
            .set_support(2, [true, false, false, true, false, false])
            .expect("node exists");
        let mut show = Show::new();
        show.conf = true;
        let canvas = draw(&mut frame, &show);
        let strokes = canvas.strokes();
        // pin triangle at node 1, nothing at node 2, then the shaft
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0].len(), 4);
        assert_abs_diff_eq!(strokes[0][0].x, 200.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(strokes[0][0].y, 200.0, epsilon = 1.0e-9);
        assert_eq!(strokes[1].len(), 2);
    }

    #[test]
    fn eldest_panel_brace_draws_parent_opening() {
        for (etype, eldest, expected) in [
            (ElemType::WBrace, true, vec![1_u32, 1]),
            (ElemType::SBrace, true, vec![1, 1]),
            (ElemType::WBrace, false, vec![1]),
        ] {
            let mut frame = wall_frame(&[1, 2, 3, 4]);
            frame.elem_mut(1).expect("wall exists").wrect = Some([1.0, 0.5]);
            frame.add_elem(2, etype, 601, &[1, 3]).expect("brace added");
            frame.set_parent(2, 1, eldest).expect("parent set");
            let log = WrectLog::default();
            draw_with(&mut frame, &Show::new(), &log);
            assert_eq!(log.calls.into_inner(), expected);
        }
    }

    #[test]
    fn bonds_hinges_and_deformation() {
        let mut frame = girder();
        frame.elem_mut(7).expect("element exists").bonds = [Bond::Pin, Bond::Pin];
        frame.set_hinge(7, LONG_TERM, 2, true).expect("hinge stored");
        frame
            .set_displacement(2, LONG_TERM, [0.0, 0.0, -0.01, 0.0, 0.0, 0.0])
            .expect("displacement stored");
        let mut show = Show::new();
        show.bond = true;
        show.phinge = true;
        show.deformation = true;
        let canvas = draw(&mut frame, &show);
        let strokes = canvas.strokes();
        // shaft, two bond circles, deformed shaft
        assert_eq!(strokes.len(), 4);
        assert_abs_diff_eq!(strokes[1][0].x, 200.0 + 3.0 + 3.0, epsilon = 1.0e-9);
        let disc = &canvas.polygons()[0];
        assert_abs_diff_eq!(disc[0].x, 260.0 - 3.0 + 3.0, epsilon = 1.0e-9);
        let deformed = &strokes[3];
        assert_abs_diff_eq!(deformed[1].y, 200.0 + 10.0, epsilon = 1.0e-9);
    }

    #[test]
    fn hidden_elements_are_skipped() {
        let mut frame = girder();
        let mut show = Show::new();
        show.sect.insert(201, false);
        let canvas = draw(&mut frame, &show);
        assert!(canvas.primitives().is_empty());
        assert!(canvas.is_completed());
    }
}
