//! Structural frame model: nodes, elements, sections and stored analysis results.
//!
//! The frame is produced by model loaders and solvers that live outside this
//! crate. It stores what they hand over and answers the per-entity queries the
//! renderer needs (stresses, reactions, utilization ratios, yield functions,
//! moment-diagram shapes).

use std::collections::{BTreeMap, HashMap};

use nalgebra::{Vector2, Vector3};
use ndarray::Array2;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::errors::{FrameEditError, QueryError};
use crate::geometry::{Point, ScreenPoint};

/// Label of the long-term load period.
pub const LONG_TERM: &str = "L";

/// Raw lateral stiffness value marking a rigid element.
pub const RIGID_STIFFNESS: f64 = 1.0e16;

/// Number of degrees of freedom per node (3 translations, 3 rotations).
pub const DOF: usize = 6;

/// Closed set of element types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElemType {
    /// Vertical line member.
    Column,
    /// Horizontal line member.
    Girder,
    /// Diagonal line member.
    Brace,
    /// Equivalent brace standing in for a wall.
    WBrace,
    /// Equivalent brace standing in for a slab.
    SBrace,
    /// Wall panel.
    Wall,
    /// Floor or roof plate.
    Slab,
}

impl ElemType {
    /// Return `true` for types drawn as line members.
    #[must_use]
    pub fn is_line(self) -> bool {
        !matches!(self, Self::Wall | Self::Slab)
    }

    /// Return `true` for brace-like types (`Brace`, `WBrace`, `SBrace`).
    #[must_use]
    pub fn is_brace(self) -> bool {
        matches!(self, Self::Brace | Self::WBrace | Self::SBrace)
    }

    /// Return `true` for equivalent braces that belong to a wall or slab.
    #[must_use]
    pub fn is_panel_brace(self) -> bool {
        matches!(self, Self::WBrace | Self::SBrace)
    }

    /// Minimum node count accepted for the type.
    #[must_use]
    pub fn min_nodes(self) -> usize {
        if self.is_line() {
            2
        } else {
            1
        }
    }
}

/// Recognized boundary-condition patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Support {
    /// All translations fixed, rotations free.
    Pin,
    /// Free to slide along X.
    XRoller,
    /// Free to slide along Y.
    YRoller,
    /// Free to slide in the XY plane.
    XYRoller,
    /// Free to move vertically.
    ZRoller,
    /// Every degree of freedom fixed.
    Fix,
}

impl Support {
    /// Classify a constraint pattern; `None` for combinations without a glyph.
    #[must_use]
    pub fn classify(conf: [bool; DOF]) -> Option<Self> {
        let [x, y, z, rx, ry, rz] = conf;
        if rx && ry && rz {
            return (x && y && z).then_some(Self::Fix);
        }
        if rx || ry || rz {
            return None;
        }
        match (x, y, z) {
            (true, true, true) => Some(Self::Pin),
            (false, true, true) => Some(Self::XRoller),
            (true, false, true) => Some(Self::YRoller),
            (false, false, true) => Some(Self::XYRoller),
            (true, true, false) => Some(Self::ZRoller),
            _ => None,
        }
    }
}

/// Connection condition at one element end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bond {
    /// Moment-resisting connection.
    #[default]
    Rigid,
    /// Moment-releasing connection.
    Pin,
}

/// Combined connection condition of both element ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BondState {
    /// Both ends rigid.
    RigidRigid,
    /// Start pinned, end rigid.
    PinRigid,
    /// Start rigid, end pinned.
    RigidPin,
    /// Both ends pinned.
    PinPin,
}

/// Stress resultant components, in the order they are stored and drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    /// Axial force.
    Nz,
    /// Shear along local x.
    Qx,
    /// Shear along local y.
    Qy,
    /// Torsion.
    Mz,
    /// Bending about local x.
    Mx,
    /// Bending about local y.
    My,
}

impl Component {
    /// All components in storage order.
    pub const ALL: [Self; 6] = [Self::Nz, Self::Qx, Self::Qy, Self::Mz, Self::Mx, Self::My];

    /// Column of the component in a stress tensor.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Return `true` for moment components (torsion and bending).
    #[must_use]
    pub fn is_moment(self) -> bool {
        matches!(self, Self::Mz | Self::Mx | Self::My)
    }

    /// Return `true` for the two bending components.
    #[must_use]
    pub fn is_bending(self) -> bool {
        matches!(self, Self::Mx | Self::My)
    }
}

/// Lateral direction used for stiffness captions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Global X.
    X,
    /// Global Y.
    Y,
}

/// Long-term allowable resultants of a section in tf and tf·m.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Allowable {
    /// Allowable axial force.
    pub axial: f64,
    /// Allowable bending moment about local x.
    pub moment_x: f64,
    /// Allowable bending moment about local y.
    pub moment_y: f64,
}

impl Allowable {
    /// Ratio of short-term to long-term allowables.
    pub const SHORT_TERM_FACTOR: f64 = 1.5;
}

/// Full plastic capacities of a section in tf and tf·m.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlasticCapacity {
    /// Squash load.
    pub axial: f64,
    /// Plastic moment about local x.
    pub moment_x: f64,
    /// Plastic moment about local y.
    pub moment_y: f64,
}

/// Cross-section record shared by elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section number.
    pub num: u32,
    /// Descriptive name.
    pub name: String,
    /// Allowables used for utilization ratios.
    pub allowable: Option<Allowable>,
    /// Capacities used for the yield function.
    pub plastic: Option<PlasticCapacity>,
    /// Whether reaching the yield surface means brittle failure.
    pub brittle: bool,
}

impl Section {
    /// Create a section with no capacities.
    #[must_use]
    pub fn new(num: u32, name: &str) -> Self {
        Self {
            num,
            name: name.to_string(),
            allowable: None,
            plastic: None,
            brittle: false,
        }
    }
}

/// Failure classification of a yield-function value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum YieldState {
    /// Inside the yield surface.
    #[default]
    Nominal,
    /// On or outside the yield surface.
    Yielded,
    /// On or outside the yield surface of a brittle section.
    BrittleFailure,
}

/// Per-end yield-function values and their classification.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct YieldFunction {
    /// Value at the start and the end.
    pub values: [f64; 2],
    /// Classification at the start and the end.
    pub states: [YieldState; 2],
}

/// A node of the frame.
#[derive(Clone, Debug)]
pub struct Node {
    /// Node number.
    pub num: u32,
    /// World coordinate.
    pub coord: Point,
    /// Screen coordinate from the latest projection.
    pub pcoord: ScreenPoint,
    /// Screen coordinate of the deformed position from the latest projection.
    pub dcoord: ScreenPoint,
    /// Fixed flag per degree of freedom.
    pub conf: [bool; DOF],
    /// Weights carried by the node per weight case; index 1 is the one captioned.
    pub weight: [f64; 3],
    /// Number of the pile under the node.
    pub pile: Option<u32>,
    /// Hidden by the user.
    pub hidden: bool,
    /// Displacements by period.
    displacement: HashMap<String, [f64; DOF]>,
    /// Reactions by period.
    reaction: HashMap<String, [f64; DOF]>,
}

impl Node {
    /// Create a free node at `coord`.
    #[must_use]
    pub fn new(num: u32, coord: Point) -> Self {
        Self {
            num,
            coord,
            pcoord: ScreenPoint::default(),
            dcoord: ScreenPoint::default(),
            conf: [false; DOF],
            weight: [0.0; 3],
            pile: None,
            hidden: false,
            displacement: HashMap::new(),
            reaction: HashMap::new(),
        }
    }

    /// Displacement (translations in m, rotations in rad) for `period` and `dof`.
    #[must_use]
    pub fn displacement(&self, period: &str, dof: usize) -> f64 {
        self.displacement
            .get(period)
            .and_then(|values| values.get(dof).copied())
            .unwrap_or(0.0)
    }

    /// Reaction (tf or tf·m) for `period` and `dof`.
    #[must_use]
    pub fn reaction(&self, period: &str, dof: usize) -> f64 {
        self.reaction
            .get(period)
            .and_then(|values| values.get(dof).copied())
            .unwrap_or(0.0)
    }

    /// World position displaced by `factor` times the translations of `period`.
    #[must_use]
    pub fn deformed(&self, period: &str, factor: f64) -> Point {
        Point::new(
            self.coord.x + factor * self.displacement(period, 0),
            self.coord.y + factor * self.displacement(period, 1),
            self.coord.z + factor * self.displacement(period, 2),
        )
    }

    /// Boundary-condition glyph for the node, if any.
    #[must_use]
    pub fn support(&self) -> Option<Support> {
        Support::classify(self.conf)
    }
}

/// An element of the frame.
#[derive(Clone, Debug)]
pub struct Element {
    /// Element number.
    pub num: u32,
    /// Element type.
    pub etype: ElemType,
    /// Section number.
    pub sect: u32,
    /// Nodes in order.
    pub enod: Vec<NodeIndex>,
    /// Code angle rotating the local axes about the chord, in radians.
    pub cang: f64,
    /// Connection condition at the start and the end.
    pub bonds: [Bond; 2],
    /// Prestress in tf.
    pub prestress: f64,
    /// Raw lateral stiffness along X and Y in tf/m.
    pub lateral_stiffness: [f64; 2],
    /// Opening rectangle (width, height) in metres.
    pub wrect: Option<[f64; 2]>,
    /// Position of the owning wall or slab in the element list.
    pub parent: Option<usize>,
    /// Whether this is the first equivalent brace of its parent.
    pub eldest: bool,
    /// End resultants by period, one row per end.
    stress: HashMap<String, Array2<f64>>,
    /// Plastic hinges by period and node.
    phinge: HashMap<String, HashMap<NodeIndex, bool>>,
}

impl Element {
    fn new(num: u32, etype: ElemType, sect: u32, enod: Vec<NodeIndex>) -> Self {
        Self {
            num,
            etype,
            sect,
            enod,
            cang: 0.0,
            bonds: [Bond::Rigid; 2],
            prestress: 0.0,
            lateral_stiffness: [0.0; 2],
            wrect: None,
            parent: None,
            eldest: false,
            stress: HashMap::new(),
            phinge: HashMap::new(),
        }
    }

    /// Return `true` when the element renders as a line member.
    #[must_use]
    pub fn is_line_elem(&self) -> bool {
        self.etype.is_line() && self.enod.len() >= 2
    }

    /// First and last node.
    #[must_use]
    pub fn ends(&self) -> Option<(NodeIndex, NodeIndex)> {
        match (self.enod.first(), self.enod.last()) {
            (Some(&start), Some(&end)) if self.enod.len() >= 2 => Some((start, end)),
            _ => None,
        }
    }

    /// Return `true` when the element carries an opening rectangle with a
    /// nonzero side.
    #[must_use]
    pub fn has_wrect(&self) -> bool {
        matches!(self.wrect, Some([width, height]) if width != 0.0 || height != 0.0)
    }

    /// Combined bond condition of both ends.
    #[must_use]
    pub fn bond_state(&self) -> BondState {
        match self.bonds {
            [Bond::Rigid, Bond::Rigid] => BondState::RigidRigid,
            [Bond::Pin, Bond::Rigid] => BondState::PinRigid,
            [Bond::Rigid, Bond::Pin] => BondState::RigidPin,
            [Bond::Pin, Bond::Pin] => BondState::PinPin,
        }
    }

    /// Stress resultant for `period` at end `end` (0 = start, 1 = end).
    #[must_use]
    pub fn stress(&self, period: &str, end: usize, component: Component) -> f64 {
        self.stress
            .get(period)
            .and_then(|tensor| tensor.get([end, component.index()]).copied())
            .unwrap_or(0.0)
    }

    /// Return `true` when a plastic hinge formed at `node` during `period`.
    #[must_use]
    pub fn hinge(&self, period: &str, node: NodeIndex) -> bool {
        self.phinge
            .get(period)
            .and_then(|hinges| hinges.get(&node).copied())
            .unwrap_or(false)
    }

    /// Raw lateral stiffness along `axis`.
    #[must_use]
    pub fn lateral_stiffness(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.lateral_stiffness[0],
            Axis::Y => self.lateral_stiffness[1],
        }
    }

    /// Vector from the first to the last node.
    #[must_use]
    pub fn chord(&self, frame: &Frame) -> Option<Vector3<f64>> {
        let (start, end) = self.ends()?;
        Some(frame.node_at(end).coord.to_vector() - frame.node_at(start).coord.to_vector())
    }

    /// Horizontal span between the first two nodes.
    #[must_use]
    pub fn width(&self, frame: &Frame) -> f64 {
        match self.enod.as_slice() {
            [a, b, ..] => {
                let delta = frame.node_at(*b).coord.to_vector() - frame.node_at(*a).coord.to_vector();
                delta.x.hypot(delta.y)
            }
            _ => 0.0,
        }
    }

    /// Vertical extent over all nodes.
    #[must_use]
    pub fn height(&self, frame: &Frame) -> f64 {
        let heights = self.enod.iter().map(|&idx| frame.node_at(idx).coord.z);
        let (low, high) = heights.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| {
            (lo.min(z), hi.max(z))
        });
        if high >= low {
            high - low
        } else {
            0.0
        }
    }

    /// Local axes: chord direction, then the two principal axes rotated by `cang`.
    #[must_use]
    pub fn local_axes(&self, frame: &Frame) -> Option<[Vector3<f64>; 3]> {
        let chord = self.chord(frame)?;
        let axial = chord.try_normalize(f64::EPSILON)?;
        let reference = if axial.z.abs() > 1.0 - 1.0e-6 {
            Vector3::x()
        } else {
            Vector3::z()
        };
        let strong = reference.cross(&axial).try_normalize(f64::EPSILON)?;
        let weak = axial.cross(&strong);
        let (sin, cos) = self.cang.sin_cos();
        Some([axial, strong * cos + weak * sin, weak * cos - strong * sin])
    }

    /// Unit direction of the projected chord on screen; zero when degenerate.
    #[must_use]
    pub fn pdirection(&self, frame: &Frame) -> Vector2<f64> {
        let Some((start, end)) = self.ends() else {
            return Vector2::zeros();
        };
        let delta = frame.node_at(end).pcoord.to_vector() - frame.node_at(start).pcoord.to_vector();
        delta.try_normalize(f64::EPSILON).unwrap_or_else(Vector2::zeros)
    }

    /// Worst utilization ratio over the selected periods.
    ///
    /// `long_term` selects the [`LONG_TERM`] period against long-term
    /// allowables, `short_term` every other stored period against short-term
    /// allowables.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::RateUndefined`] when the section has no usable
    /// allowables and [`QueryError::MissingResult`] when none of the selected
    /// periods has stresses.
    pub fn rate_max(
        &self,
        frame: &Frame,
        long_term: bool,
        short_term: bool,
    ) -> Result<f64, QueryError> {
        let section = frame
            .section(self.sect)
            .ok_or(QueryError::UnknownSection(self.sect))?;
        let allowable = section
            .allowable
            .filter(|a| a.axial > 0.0 && a.moment_x > 0.0 && a.moment_y > 0.0)
            .ok_or(QueryError::RateUndefined {
                section: self.sect,
            })?;
        let mut worst: Option<f64> = None;
        for (period, tensor) in &self.stress {
            let factor = if period == LONG_TERM {
                if !long_term {
                    continue;
                }
                1.0
            } else {
                if !short_term {
                    continue;
                }
                Allowable::SHORT_TERM_FACTOR
            };
            for row in tensor.rows() {
                let rate = row[Component::Nz.index()].abs() / (allowable.axial * factor)
                    + row[Component::Mx.index()].abs() / (allowable.moment_x * factor)
                    + row[Component::My.index()].abs() / (allowable.moment_y * factor);
                worst = Some(worst.map_or(rate, |w| w.max(rate)));
            }
        }
        worst.ok_or_else(|| QueryError::MissingResult {
            elem: self.num,
            period: if long_term { LONG_TERM.to_string() } else { "short-term".to_string() },
        })
    }

    /// Yield-function values at both ends for `period`.
    ///
    /// Sections without plastic capacities report zero and
    /// [`YieldState::Nominal`].
    #[must_use]
    pub fn yield_function(&self, frame: &Frame, period: &str) -> YieldFunction {
        let Some(section) = frame.section(self.sect) else {
            return YieldFunction::default();
        };
        let Some(plastic) = section.plastic else {
            return YieldFunction::default();
        };
        let ratio = |value: f64, capacity: f64| {
            if capacity > 0.0 {
                (value / capacity).powi(2)
            } else {
                0.0
            }
        };
        let mut result = YieldFunction::default();
        for end in 0..2 {
            let value = ratio(self.stress(period, end, Component::Nz), plastic.axial)
                + ratio(self.stress(period, end, Component::Mx), plastic.moment_x)
                + ratio(self.stress(period, end, Component::My), plastic.moment_y);
            result.values[end] = value;
            result.states[end] = match (value >= 1.0, section.brittle) {
                (false, _) => YieldState::Nominal,
                (true, false) => YieldState::Yielded,
                (true, true) => YieldState::BrittleFailure,
            };
        }
        result
    }

    /// World points of the bending-moment diagram for `component`.
    ///
    /// End ordinates are `mfact` times the end moments laid along the local
    /// axis perpendicular to the bending axis. A zero-crossing point is added
    /// when the end moments differ in sign. Callers prefix and suffix the end
    /// nodes themselves.
    #[must_use]
    pub fn moment_coord(
        &self,
        frame: &Frame,
        period: &str,
        component: Component,
        mfact: f64,
    ) -> Vec<Point> {
        let (Some((start, end)), Some(axes)) = (self.ends(), self.local_axes(frame)) else {
            return Vec::new();
        };
        let offset = match component {
            Component::Mx => axes[2],
            Component::My => axes[1],
            _ => return Vec::new(),
        };
        let head = frame.node_at(start).coord.to_vector();
        let tail = frame.node_at(end).coord.to_vector();
        let m0 = self.stress(period, 0, component);
        let m1 = -self.stress(period, 1, component);
        let mut coords = vec![Point::from(head + offset * (m0 * mfact))];
        if m0 * m1 < 0.0 {
            let t = m0 / (m0 - m1);
            coords.push(Point::from(head + (tail - head) * t));
        }
        coords.push(Point::from(tail + offset * (m1 * mfact)));
        coords
    }
}

/// Container for a structural frame model.
#[derive(Debug, Default)]
pub struct Frame {
    /// Nodes, connected by one edge per element side (edge weight = element position).
    graph: UnGraph<Node, usize>,
    /// Lookup from node number to graph index.
    node_numbers: HashMap<u32, NodeIndex>,
    /// Elements in drawing order.
    elems: Vec<Element>,
    /// Lookup from element number to position in `elems`.
    elem_numbers: HashMap<u32, usize>,
    /// Sections by number.
    sections: BTreeMap<u32, Section>,
}

impl Frame {
    /// Create an empty frame.
    ///
    /// # Examples
    /// ```
    /// use framex::Frame;
    ///
    /// let frame = Frame::new();
    /// assert_eq!(frame.node_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of elements.
    #[must_use]
    pub fn elem_count(&self) -> usize {
        self.elems.len()
    }

    /// Add a free node.
    ///
    /// # Errors
    ///
    /// Returns [`FrameEditError::DuplicateNode`] when `num` is taken.
    pub fn add_node(&mut self, num: u32, coord: Point) -> Result<NodeIndex, FrameEditError> {
        if self.node_numbers.contains_key(&num) {
            return Err(FrameEditError::DuplicateNode(num));
        }
        let idx = self.graph.add_node(Node::new(num, coord));
        self.node_numbers.insert(num, idx);
        Ok(idx)
    }

    /// Add or replace a section.
    pub fn add_section(&mut self, section: Section) {
        self.sections.insert(section.num, section);
    }

    /// Add an element through the nodes numbered `nodes`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameEditError::DuplicateElem`], [`FrameEditError::UnknownSection`],
    /// [`FrameEditError::UnknownNode`] or [`FrameEditError::TooFewNodes`].
    ///
    /// # Examples
    /// ```
    /// use framex::{point, ElemType, Frame, Section};
    ///
    /// let mut frame = Frame::new();
    /// frame.add_section(Section::new(101, "H-300x150"));
    /// frame.add_node(1, point(0.0, 0.0, 0.0)).unwrap();
    /// frame.add_node(2, point(6.0, 0.0, 0.0)).unwrap();
    /// let position = frame.add_elem(1, ElemType::Girder, 101, &[1, 2]).unwrap();
    /// assert_eq!(position, 0);
    /// ```
    pub fn add_elem(
        &mut self,
        num: u32,
        etype: ElemType,
        sect: u32,
        nodes: &[u32],
    ) -> Result<usize, FrameEditError> {
        if self.elem_numbers.contains_key(&num) {
            return Err(FrameEditError::DuplicateElem(num));
        }
        if !self.sections.contains_key(&sect) {
            return Err(FrameEditError::UnknownSection(sect));
        }
        if nodes.len() < etype.min_nodes() {
            return Err(FrameEditError::TooFewNodes {
                elem: num,
                needed: etype.min_nodes(),
                count: nodes.len(),
            });
        }
        let enod = nodes
            .iter()
            .map(|n| self.node_index(*n))
            .collect::<Result<Vec<_>, _>>()?;
        let position = self.elems.len();
        for pair in enod.windows(2) {
            self.graph.add_edge(pair[0], pair[1], position);
        }
        if !etype.is_line() && enod.len() > 2 {
            if let (Some(&first), Some(&last)) = (enod.first(), enod.last()) {
                self.graph.add_edge(last, first, position);
            }
        }
        self.elems.push(Element::new(num, etype, sect, enod));
        self.elem_numbers.insert(num, position);
        Ok(position)
    }

    /// Graph index of node `num`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameEditError::UnknownNode`] when `num` is not part of this frame.
    pub fn node_index(&self, num: u32) -> Result<NodeIndex, FrameEditError> {
        self.node_numbers
            .get(&num)
            .copied()
            .ok_or(FrameEditError::UnknownNode(num))
    }

    /// Node at a graph index obtained from this frame.
    ///
    /// # Panics
    ///
    /// Panics when `idx` does not belong to this frame.
    #[must_use]
    pub fn node_at(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    /// Node numbered `num`.
    #[must_use]
    pub fn node(&self, num: u32) -> Option<&Node> {
        self.node_numbers.get(&num).map(|&idx| &self.graph[idx])
    }

    /// Mutable node numbered `num`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameEditError::UnknownNode`] when `num` is not part of this frame.
    pub fn node_mut(&mut self, num: u32) -> Result<&mut Node, FrameEditError> {
        let idx = self.node_index(num)?;
        self.graph
            .node_weight_mut(idx)
            .ok_or(FrameEditError::UnknownNode(num))
    }

    /// Graph indices of all nodes.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// All nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// All nodes, mutably; used to store projected coordinates.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.graph.node_weights_mut()
    }

    /// All elements in drawing order.
    #[must_use]
    pub fn elems(&self) -> &[Element] {
        &self.elems
    }

    /// Element numbered `num`.
    #[must_use]
    pub fn elem(&self, num: u32) -> Option<&Element> {
        self.elem_numbers.get(&num).map(|&pos| &self.elems[pos])
    }

    /// Mutable element numbered `num`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameEditError::UnknownElem`] when `num` is not part of this frame.
    pub fn elem_mut(&mut self, num: u32) -> Result<&mut Element, FrameEditError> {
        let pos = *self
            .elem_numbers
            .get(&num)
            .ok_or(FrameEditError::UnknownElem(num))?;
        Ok(&mut self.elems[pos])
    }

    /// Section numbered `num`.
    #[must_use]
    pub fn section(&self, num: u32) -> Option<&Section> {
        self.sections.get(&num)
    }

    /// Section numbers in ascending order.
    pub fn section_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.sections.keys().copied()
    }

    /// Positions of the elements touching the node at `idx`.
    pub fn incident_elems(&self, idx: NodeIndex) -> impl Iterator<Item = usize> + '_ {
        self.graph.edges(idx).map(|edge| *edge.weight())
    }

    /// Mean world position of all nodes.
    #[must_use]
    pub fn centroid(&self) -> Option<Point> {
        let count = self.graph.node_count();
        if count == 0 {
            return None;
        }
        let sum = self
            .graph
            .node_weights()
            .fold(Vector3::zeros(), |acc, node| acc + node.coord.to_vector());
        Some(Point::from(sum / count as f64))
    }

    /// Set the fixed flags of node `num`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameEditError::UnknownNode`] when `num` is not part of this frame.
    pub fn set_support(&mut self, num: u32, conf: [bool; DOF]) -> Result<(), FrameEditError> {
        self.node_mut(num)?.conf = conf;
        Ok(())
    }

    /// Set the weights of node `num`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameEditError::UnknownNode`] when `num` is not part of this frame.
    pub fn set_weight(&mut self, num: u32, weight: [f64; 3]) -> Result<(), FrameEditError> {
        self.node_mut(num)?.weight = weight;
        Ok(())
    }

    /// Attach a pile to node `num`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameEditError::UnknownNode`] when `num` is not part of this frame.
    pub fn set_pile(&mut self, num: u32, pile: Option<u32>) -> Result<(), FrameEditError> {
        self.node_mut(num)?.pile = pile;
        Ok(())
    }

    /// Store the displacements of node `num` for `period`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameEditError::UnknownNode`] when `num` is not part of this frame.
    pub fn set_displacement(
        &mut self,
        num: u32,
        period: &str,
        values: [f64; DOF],
    ) -> Result<(), FrameEditError> {
        self.node_mut(num)?
            .displacement
            .insert(period.to_string(), values);
        Ok(())
    }

    /// Store the reactions of node `num` for `period`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameEditError::UnknownNode`] when `num` is not part of this frame.
    pub fn set_reaction(
        &mut self,
        num: u32,
        period: &str,
        values: [f64; DOF],
    ) -> Result<(), FrameEditError> {
        self.node_mut(num)?
            .reaction
            .insert(period.to_string(), values);
        Ok(())
    }

    /// Store the end stress resultants of element `num` for `period`.
    ///
    /// `tensor` holds one row per end (start, end) and one column per
    /// [`Component`].
    ///
    /// # Errors
    ///
    /// Returns [`FrameEditError::UnknownElem`] for an unknown element and
    /// [`FrameEditError::StressShape`] when `tensor` is not 2x6.
    pub fn set_stress(
        &mut self,
        num: u32,
        period: &str,
        tensor: Array2<f64>,
    ) -> Result<(), FrameEditError> {
        let (rows, cols) = tensor.dim();
        if rows != 2 || cols != Component::ALL.len() {
            return Err(FrameEditError::StressShape {
                elem: num,
                rows,
                cols,
            });
        }
        self.elem_mut(num)?.stress.insert(period.to_string(), tensor);
        Ok(())
    }

    /// Record whether a plastic hinge formed at node `node` of element `num`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameEditError::UnknownElem`] for an unknown element and
    /// [`FrameEditError::UnknownNode`] when the node is not one of its nodes.
    pub fn set_hinge(
        &mut self,
        num: u32,
        period: &str,
        node: u32,
        formed: bool,
    ) -> Result<(), FrameEditError> {
        let idx = self.node_index(node)?;
        let elem = self.elem_mut(num)?;
        if !elem.enod.contains(&idx) {
            return Err(FrameEditError::UnknownNode(node));
        }
        elem.phinge
            .entry(period.to_string())
            .or_default()
            .insert(idx, formed);
        Ok(())
    }

    /// Attach an equivalent brace to the wall or slab numbered `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameEditError::UnknownElem`] when either element is unknown.
    pub fn set_parent(&mut self, num: u32, parent: u32, eldest: bool) -> Result<(), FrameEditError> {
        let position = *self
            .elem_numbers
            .get(&parent)
            .ok_or(FrameEditError::UnknownElem(parent))?;
        let elem = self.elem_mut(num)?;
        elem.parent = Some(position);
        elem.eldest = eldest;
        Ok(())
    }
}
