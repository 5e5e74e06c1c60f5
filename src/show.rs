//! Display configuration: which captions, markers and diagrams to draw and
//! how to format their numbers.

use std::collections::HashMap;
use std::ops::{BitOr, BitOrAssign};
use std::path::Path;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::format::{format_value, has_conversion};
use crate::model::{Component, ElemType, Element, Frame};
use crate::units::{ForceUnit, LengthUnit, UnitScale};

/// Format used when a key has no entry in [`Show::formats`].
pub const DEFAULT_FORMAT: &str = "%.3f";

/// Declare a `u32` bitmask newtype with named single-bit constants.
macro_rules! bitmask {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$flag_meta:meta])* $flag:ident = $bit:expr;)* }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// No bit set.
            pub const NONE: Self = Self(0);
            $($(#[$flag_meta])* pub const $flag: Self = Self(1 << $bit);)*

            /// Return `true` when every bit of `other` is set.
            #[must_use]
            pub fn contains(self, other: Self) -> bool {
                other.0 != 0 && self.0 & other.0 == other.0
            }

            /// Return `true` when any bit of `other` is set.
            #[must_use]
            pub fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }

            /// Return `true` when no bit is set.
            #[must_use]
            pub fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// Set the bits of `other`.
            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            /// Clear the bits of `other`.
            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }

            /// Flip the bits of `other`.
            pub fn toggle(&mut self, other: Self) {
                self.0 ^= other.0;
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}

bitmask! {
    /// Node caption selection.
    NodeCaption {
        /// Node number.
        NUM = 0;
        /// Captioned weight.
        WEIGHT = 1;
        /// Displacement along X.
        DX = 2;
        /// Displacement along Y.
        DY = 3;
        /// Displacement along Z.
        DZ = 4;
        /// Rotation about X.
        TX = 5;
        /// Rotation about Y.
        TY = 6;
        /// Rotation about Z.
        TZ = 7;
        /// Reaction force along X.
        RX = 8;
        /// Reaction force along Y.
        RY = 9;
        /// Reaction force along Z.
        RZ = 10;
        /// Reaction moment about X.
        MX = 11;
        /// Reaction moment about Y.
        MY = 12;
        /// Reaction moment about Z.
        MZ = 13;
        /// Z coordinate.
        ZCOORD = 14;
        /// Pile number.
        PILE = 15;
    }
}

impl NodeCaption {
    /// Displacement channels in degree-of-freedom order.
    pub const DISPLACEMENTS: [Self; 6] = [Self::DX, Self::DY, Self::DZ, Self::TX, Self::TY, Self::TZ];
    /// Reaction channels in degree-of-freedom order.
    pub const REACTIONS: [Self; 6] = [Self::RX, Self::RY, Self::RZ, Self::MX, Self::MY, Self::MZ];
}

bitmask! {
    /// Element caption selection.
    ElemCaption {
        /// Element number.
        NUM = 0;
        /// Section number or alias.
        SECT = 1;
        /// Horizontal span.
        WIDTH = 2;
        /// Vertical extent.
        HEIGHT = 3;
        /// Long-term utilization ratio.
        RATE_L = 4;
        /// Short-term utilization ratio.
        RATE_S = 5;
        /// Prestress.
        PREST = 6;
        /// Lateral stiffness along X.
        STIFF_X = 7;
        /// Lateral stiffness along Y.
        STIFF_Y = 8;
    }
}

bitmask! {
    /// Stress components to annotate and diagram.
    StressFlag {
        /// Axial force.
        NZ = 0;
        /// Shear along local x.
        QX = 1;
        /// Shear along local y.
        QY = 2;
        /// Torsion.
        MZ = 3;
        /// Bending about local x.
        MX = 4;
        /// Bending about local y.
        MY = 5;
    }
}

impl StressFlag {
    /// Flag selecting `component`.
    #[must_use]
    pub fn of(component: Component) -> Self {
        Self(1 << component.index())
    }
}

/// The bundle of display flags and formatting rules controlling what is drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Show {
    /// Node captions to draw.
    pub node_caption: NodeCaption,
    /// Element captions to draw.
    pub elem_caption: ElemCaption,
    /// Active load period.
    pub period: String,
    /// Multipliers from stored to displayed units.
    pub unit: UnitScale,
    /// printf-style format strings by key (`DISP`, `THETA`, `REACTION`, `STRESS`, `RATE`).
    pub formats: HashMap<String, String>,
    /// Labels printed instead of section numbers.
    pub section_aliases: HashMap<u32, String>,
    /// Visibility per element type; absent means visible.
    pub etype: HashMap<ElemType, bool>,
    /// Visibility per section; absent means visible.
    pub sect: HashMap<u32, bool>,
    /// Section-silhouette switch per element type.
    pub draw_by_type: HashMap<ElemType, bool>,
    /// Section-silhouette switch per section.
    pub draw_by_section: HashMap<u32, bool>,
    /// Stress diagrams per element type.
    pub stress_by_type: HashMap<ElemType, StressFlag>,
    /// Stress diagrams per section.
    pub stress_by_section: HashMap<u32, StressFlag>,
    /// Draw boundary-condition glyphs.
    pub conf: bool,
    /// Glyph size in pixels.
    pub conf_size: f64,
    /// Draw pin-release circles.
    pub bond: bool,
    /// Bond and hinge circle radius in pixels.
    pub bond_size: f64,
    /// Draw plastic hinges.
    pub phinge: bool,
    /// Draw the deformed shape.
    pub deformation: bool,
    /// Displacement magnification for the deformed shape.
    pub dfact: f64,
    /// Annotate yield-function values.
    pub yield_function: bool,
    /// Reaction arrow length per displayed force unit, in metres.
    pub rfact: f64,
    /// Moment diagram ordinate per tf·m, in metres.
    pub mfact: f64,
    /// Draw bending diagrams without their end values.
    pub no_moment_value: bool,
    /// Draw element local axes.
    pub element_axis: bool,
    /// Draw node normals.
    pub node_normal: bool,
    /// Draw wall and slab normals.
    pub elem_normal: bool,
}

impl Default for Show {
    fn default() -> Self {
        let formats = [
            ("DISP", "%.3f"),
            ("THETA", "%.3e"),
            ("REACTION", "%.3f"),
            ("STRESS", "%.3f"),
            ("RATE", "%.3f"),
        ]
        .into_iter()
        .map(|(key, spec)| (key.to_string(), spec.to_string()))
        .collect();
        Self {
            node_caption: NodeCaption::NONE,
            elem_caption: ElemCaption::NONE,
            period: crate::model::LONG_TERM.to_string(),
            unit: UnitScale::default(),
            formats,
            section_aliases: HashMap::new(),
            etype: HashMap::new(),
            sect: HashMap::new(),
            draw_by_type: HashMap::new(),
            draw_by_section: HashMap::new(),
            stress_by_type: HashMap::new(),
            stress_by_section: HashMap::new(),
            conf: false,
            conf_size: 9.0,
            bond: false,
            bond_size: 3.0,
            phinge: false,
            deformation: false,
            dfact: 100.0,
            yield_function: false,
            rfact: 0.3,
            mfact: 0.05,
            no_moment_value: false,
            element_axis: false,
            node_normal: false,
            elem_normal: false,
        }
    }
}

impl Show {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed input.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize the configuration to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when serialization fails.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format string stored under `key`, or [`DEFAULT_FORMAT`].
    #[must_use]
    pub fn format(&self, key: &str) -> &str {
        match self.formats.get(key) {
            Some(spec) => spec.as_str(),
            None => {
                log::warn!("no format for {key:?}, using {DEFAULT_FORMAT:?}");
                DEFAULT_FORMAT
            }
        }
    }

    /// Format `value` with the format stored under `key`.
    #[must_use]
    pub fn format_value(&self, key: &str, value: f64) -> String {
        format_value(self.format(key), value)
    }

    /// Override the format stored under `key`.
    ///
    /// A spec without a value conversion is stored as given; captions using
    /// it show the literal text.
    pub fn set_format(&mut self, key: &str, spec: &str) {
        if !has_conversion(spec) {
            log::warn!("format {spec:?} for {key} shows no value");
        }
        self.formats.insert(key.to_string(), spec.to_string());
    }

    /// Switch the display units.
    pub fn set_units(&mut self, force: ForceUnit, length: LengthUnit) {
        self.unit = UnitScale::from_units(force, length);
    }

    /// Flip node caption bits.
    pub fn toggle_node_caption(&mut self, flag: NodeCaption) {
        self.node_caption.toggle(flag);
    }

    /// Flip element caption bits.
    pub fn toggle_elem_caption(&mut self, flag: ElemCaption) {
        self.elem_caption.toggle(flag);
    }

    /// Stress-diagram selection for an element; the section entry wins over
    /// the type entry and absence of both selects nothing.
    #[must_use]
    pub fn stress_flag(&self, sect: u32, etype: ElemType) -> StressFlag {
        self.stress_by_section
            .get(&sect)
            .or_else(|| self.stress_by_type.get(&etype))
            .copied()
            .unwrap_or_default()
    }

    /// Section-silhouette switch for an element; the section entry wins over
    /// the type entry.
    #[must_use]
    pub fn draws_section(&self, sect: u32, etype: ElemType) -> bool {
        self.draw_by_section
            .get(&sect)
            .or_else(|| self.draw_by_type.get(&etype))
            .copied()
            .unwrap_or(false)
    }

    /// Caption text for a section: its alias when one is configured.
    #[must_use]
    pub fn section_label(&self, sect: u32) -> String {
        self.section_aliases
            .get(&sect)
            .cloned()
            .unwrap_or_else(|| sect.to_string())
    }

    /// Return `true` unless the element's type or section is switched off.
    #[must_use]
    pub fn is_elem_visible(&self, elem: &Element) -> bool {
        self.etype.get(&elem.etype).copied().unwrap_or(true)
            && self.sect.get(&elem.sect).copied().unwrap_or(true)
    }

    /// Return `true` when the node is hidden by the user or every element
    /// touching it is invisible.
    #[must_use]
    pub fn is_node_hidden(&self, frame: &Frame, idx: NodeIndex) -> bool {
        if frame.node_at(idx).hidden {
            return true;
        }
        let mut incident = frame.incident_elems(idx).peekable();
        if incident.peek().is_none() {
            return false;
        }
        incident.all(|pos| !self.is_elem_visible(&frame.elems()[pos]))
    }

    /// Carry the configuration over to a new frame: every section not yet
    /// listed becomes visible, existing entries are kept.
    pub fn adopt_sections<I: IntoIterator<Item = u32>>(&mut self, sections: I) {
        for num in sections {
            self.sect.entry(num).or_insert(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point;
    use crate::model::Section;

    #[test]
    fn bitmask_operations() {
        let mut caption = NodeCaption::NUM | NodeCaption::WEIGHT;
        assert!(caption.contains(NodeCaption::NUM));
        assert!(!caption.contains(NodeCaption::PILE));
        assert!(!caption.contains(NodeCaption::NONE));
        caption.toggle(NodeCaption::NUM);
        assert!(!caption.contains(NodeCaption::NUM));
        caption.remove(NodeCaption::WEIGHT);
        assert!(caption.is_empty());
        assert!((ElemCaption::RATE_L | ElemCaption::PREST).intersects(ElemCaption::RATE_L));
        assert_eq!(StressFlag::of(Component::Mx), StressFlag::MX);
    }

    #[test]
    fn missing_format_falls_back() {
        let mut show = Show::new();
        show.formats.clear();
        assert_eq!(show.format("STRESS"), DEFAULT_FORMAT);
        show.set_format("STRESS", "%.1f");
        assert_eq!(show.format_value("STRESS", 2.345), "2.3");
    }

    #[test]
    fn format_without_conversion_is_kept_literal() {
        let mut show = Show::new();
        show.set_format("RATE", "n/a");
        assert_eq!(show.format("RATE"), "n/a");
        assert_eq!(show.format_value("RATE", 0.8), "n/a");
    }

    #[test]
    fn section_entries_override_type_entries() {
        let mut show = Show::new();
        show.stress_by_type.insert(ElemType::Girder, StressFlag::MX);
        show.stress_by_section.insert(201, StressFlag::NZ);
        assert_eq!(show.stress_flag(201, ElemType::Girder), StressFlag::NZ);
        assert_eq!(show.stress_flag(202, ElemType::Girder), StressFlag::MX);
        assert_eq!(show.stress_flag(202, ElemType::Column), StressFlag::NONE);

        show.draw_by_type.insert(ElemType::Column, true);
        show.draw_by_section.insert(101, false);
        assert!(!show.draws_section(101, ElemType::Column));
        assert!(show.draws_section(102, ElemType::Column));
        assert!(!show.draws_section(102, ElemType::Girder));
    }

    #[test]
    fn adopting_sections_keeps_existing_switches() {
        let mut show = Show::new();
        show.sect.insert(101, false);
        show.adopt_sections([101, 102]);
        assert_eq!(show.sect.get(&101), Some(&false));
        assert_eq!(show.sect.get(&102), Some(&true));
    }

    #[test]
    fn node_hidden_when_all_incident_elements_are() {
        let mut frame = Frame::new();
        frame.add_section(Section::new(101, "C"));
        frame.add_section(Section::new(201, "G"));
        frame.add_node(1, point(0.0, 0.0, 0.0)).expect("node added");
        frame.add_node(2, point(0.0, 0.0, 3.0)).expect("node added");
        frame.add_node(3, point(6.0, 0.0, 3.0)).expect("node added");
        frame.add_node(4, point(9.0, 0.0, 3.0)).expect("node added");
        frame
            .add_elem(1, ElemType::Column, 101, &[1, 2])
            .expect("element added");
        frame
            .add_elem(2, ElemType::Girder, 201, &[2, 3])
            .expect("element added");
        let mut show = Show::new();
        show.sect.insert(101, false);
        let idx = |num| frame.node_index(num).expect("node exists");
        assert!(show.is_node_hidden(&frame, idx(1)));
        assert!(!show.is_node_hidden(&frame, idx(2)));
        assert!(!show.is_node_hidden(&frame, idx(4)));
    }

    #[test]
    fn json_roundtrip_keeps_flags() {
        let mut show = Show::new();
        show.node_caption = NodeCaption::NUM | NodeCaption::RZ;
        show.stress_by_type.insert(ElemType::Girder, StressFlag::MX);
        show.section_aliases.insert(201, "G1".to_string());
        let text = show.to_json_string().expect("serializes");
        let back = Show::from_json_str(&text).expect("parses");
        assert_eq!(back, show);

        let partial = Show::from_json_str(r#"{"bond": true}"#).expect("parses");
        assert!(partial.bond);
        assert_eq!(partial.format("DISP"), "%.3f");
    }
}
