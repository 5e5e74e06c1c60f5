//! Error types produced while editing, querying or drawing frame models.

use thiserror::Error;

/// Error returned when an analysis-result query cannot produce a value.
///
/// The renderer treats every variant as "omit this caption line"; none of them
/// aborts a redraw.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum QueryError {
    /// Returned when the section carries no allowable stresses, so no
    /// utilization ratio can be formed.
    #[error("rate undefined for section {section}")]
    RateUndefined {
        /// Number of the section lacking allowables.
        section: u32,
    },
    /// Returned when an element has no stress results for any requested period.
    #[error("element {elem} has no results for period {period:?}")]
    MissingResult {
        /// Number of the queried element.
        elem: u32,
        /// Period label that was requested.
        period: String,
    },
    /// Returned when an element references a section missing from the frame.
    #[error("section {0} does not exist in this frame")]
    UnknownSection(u32),
}

/// Error returned when editing a [`Frame`](crate::Frame) with invalid input.
///
/// # Examples
///
/// ```
/// use framex::{point, Frame, FrameEditError};
///
/// let mut frame = Frame::new();
/// frame.add_node(1, point(0.0, 0.0, 0.0)).expect("first node is accepted");
/// let error = frame
///     .add_node(1, point(1.0, 0.0, 0.0))
///     .expect_err("duplicate number is rejected");
/// assert_eq!(error, FrameEditError::DuplicateNode(1));
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FrameEditError {
    /// Returned when a node number cannot be found in the frame.
    #[error("node {0} does not exist in this frame")]
    UnknownNode(u32),
    /// Returned when a node number is already taken.
    #[error("node {0} already exists in this frame")]
    DuplicateNode(u32),
    /// Returned when an element number cannot be found in the frame.
    #[error("element {0} does not exist in this frame")]
    UnknownElem(u32),
    /// Returned when an element number is already taken.
    #[error("element {0} already exists in this frame")]
    DuplicateElem(u32),
    /// Returned when a section number cannot be found in the frame.
    #[error("section {0} does not exist in this frame")]
    UnknownSection(u32),
    /// Returned when an element is created with fewer nodes than its type needs.
    #[error("element {elem} needs at least {needed} nodes (received {count})")]
    TooFewNodes {
        /// Number of the rejected element.
        elem: u32,
        /// Minimum node count for the element type.
        needed: usize,
        /// Node count that was supplied.
        count: usize,
    },
    /// Returned when a stress tensor does not have one row per element node and
    /// six components per row.
    #[error("stress tensor for element {elem} has shape {rows}x{cols}")]
    StressShape {
        /// Number of the affected element.
        elem: u32,
        /// Rows received.
        rows: usize,
        /// Columns received.
        cols: usize,
    },
}

/// Error returned when a redraw cannot obtain or install a canvas.
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    /// Returned when the windowing collaborator fails to create a canvas.
    #[error("canvas of size {width}x{height} could not be created: {reason}")]
    CanvasUnavailable {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
        /// Explanation supplied by the driver.
        reason: String,
    },
}

/// Error returned when reading configuration or display presets.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The contents were not valid JSON for the expected structure.
    #[error("could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
