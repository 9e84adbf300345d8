//! Editor entity model.
//!
//! Points carry identity as a numeric index parsed from a `<prefix><n>`
//! style name; identity is stable across operations. Lines reference their
//! endpoints by identity, never by position in the list, so points can
//! move without breaking connectivity.

use serde::{Deserialize, Serialize};

/// Stable numeric identity of a point.
pub type PointId = u32;

/// Parse the numeric identity from a `<prefix><n>` name, e.g. `fence12`.
pub fn parse_point_id(name: &str) -> Option<PointId> {
    let digits_at = name.len() - name.chars().rev().take_while(|c| c.is_ascii_digit()).count();
    if digits_at < name.len() {
        name[digits_at..].parse().ok()
    } else {
        None
    }
}

/// One vertex of a boundary or route, in [0,10000]² normalized units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointEntity {
    /// Stable numeric identity.
    pub id: PointId,
    /// X position in normalized units.
    pub x: f64,
    /// Y position in normalized units (increases downward).
    pub y: f64,
    /// Visual radius, used to inset connected line endpoints.
    pub radius: f64,
    /// Whether the point is in the current selection.
    pub selected: bool,
}

impl PointEntity {
    /// Create an unselected point.
    pub fn new(id: PointId, x: f64, y: f64, radius: f64) -> Self {
        Self {
            id,
            x,
            y,
            radius,
            selected: false,
        }
    }
}

/// A segment connecting two points by identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineEntity {
    /// Identity of the starting point.
    pub start: PointId,
    /// Identity of the finishing point.
    pub finish: PointId,
    /// Visible lines inset their endpoints by the points' radii;
    /// hidden/logical lines keep the raw segment.
    pub visible: bool,
    /// Rendered endpoint coordinates, maintained by the engine.
    pub x1: f64,
    /// Rendered start Y.
    pub y1: f64,
    /// Rendered finish X.
    pub x2: f64,
    /// Rendered finish Y.
    pub y2: f64,
}

impl LineEntity {
    /// Create a line between two point identities; endpoint coordinates
    /// are filled in by the first geometry pass.
    pub fn new(start: PointId, finish: PointId, visible: bool) -> Self {
        Self {
            start,
            finish,
            visible,
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
        }
    }

    /// Whether the line touches the given point.
    pub fn references(&self, id: PointId) -> bool {
        self.start == id || self.finish == id
    }
}

/// A text label anchored to a point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEntity {
    /// Identity of the anchoring point.
    pub anchor: PointId,
    /// Rendered X, maintained by the engine.
    pub x: f64,
    /// Rendered Y, maintained by the engine.
    pub y: f64,
    /// Displayed text.
    pub text: String,
}

/// The explicit registry of editor entities, in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointSet {
    points: Vec<PointEntity>,
    lines: Vec<LineEntity>,
    labels: Vec<LabelEntity>,
}

impl PointSet {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point at the end of the document order.
    pub fn add_point(&mut self, point: PointEntity) {
        self.points.push(point);
    }

    /// Add a connecting line.
    pub fn add_line(&mut self, line: LineEntity) {
        self.lines.push(line);
    }

    /// Add an anchored label.
    pub fn add_label(&mut self, label: LabelEntity) {
        self.labels.push(label);
    }

    /// All points in document order.
    pub fn points(&self) -> &[PointEntity] {
        &self.points
    }

    /// Mutable access to the points.
    pub(crate) fn points_mut(&mut self) -> &mut [PointEntity] {
        &mut self.points
    }

    /// All lines.
    pub fn lines(&self) -> &[LineEntity] {
        &self.lines
    }

    /// Mutable access to the lines.
    pub(crate) fn lines_mut(&mut self) -> &mut [LineEntity] {
        &mut self.lines
    }

    /// All labels.
    pub fn labels(&self) -> &[LabelEntity] {
        &self.labels
    }

    /// Mutable access to the labels.
    pub(crate) fn labels_mut(&mut self) -> &mut [LabelEntity] {
        &mut self.labels
    }

    /// Look up a point by identity.
    pub fn point(&self, id: PointId) -> Option<&PointEntity> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the registry holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Identities of the selected points, in document order.
    pub fn selected_ids(&self) -> Vec<PointId> {
        self.points
            .iter()
            .filter(|p| p.selected)
            .map(|p| p.id)
            .collect()
    }

    /// Number of selected points.
    pub fn selected_count(&self) -> usize {
        self.points.iter().filter(|p| p.selected).count()
    }
}
