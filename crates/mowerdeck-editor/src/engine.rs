//! Point editor engine.
//!
//! Selection, nudge/grow moves and the commit protocol over a [`PointSet`].
//! Moves are all-or-nothing: a batch commits only when every resulting
//! position stays inside the [0,10000]² editing area, otherwise nothing in
//! the selection moves. Committed positions are staged as keyed write
//! payloads for the debounced write queue; structural changes (insert,
//! delete) go to the server and come back through a geometry reload.

use crate::model::{LineEntity, PointEntity, PointId, PointSet};
use crate::transform;
use mowerdeck_core::{Capability, CapabilitySet};
use serde_json::json;
use std::collections::BTreeMap;

const DEFAULT_NUDGE_STEP: f64 = 50.0;
const DEFAULT_GROW_PERCENT: f64 = 5.0;

/// A staged point insertion for the server to create.
#[derive(Debug, Clone, PartialEq)]
pub struct PointInsertion {
    /// Identity of the new point: its predecessor's id + 1.
    pub id: PointId,
    /// Midpoint X in normalized units.
    pub x: f64,
    /// Midpoint Y in normalized units.
    pub y: f64,
    /// Wire payload in cartesian percent form.
    pub payload: String,
}

/// The interactive point editor.
pub struct PointEditor {
    /// Key prefix for staged writes, e.g. `fence`.
    prefix: String,
    set: PointSet,
    /// Last-selected point, the cyclic selection cursor.
    cursor: Option<PointId>,
    /// Point positions captured at selection time; grow operations move
    /// along the fixed centroid-to-capture rays rather than recomputing
    /// per step.
    scaffold: BTreeMap<PointId, (f64, f64)>,
    scaffold_centroid: Option<(f64, f64)>,
    pending: BTreeMap<String, String>,
    nudge_step: f64,
    grow_percent: f64,
}

impl PointEditor {
    /// Create an editor over a loaded point set.
    pub fn new(prefix: impl Into<String>, set: PointSet) -> Self {
        let mut editor = Self {
            prefix: prefix.into(),
            set,
            cursor: None,
            scaffold: BTreeMap::new(),
            scaffold_centroid: None,
            pending: BTreeMap::new(),
            nudge_step: DEFAULT_NUDGE_STEP,
            grow_percent: DEFAULT_GROW_PERCENT,
        };
        editor.refresh_geometry();
        editor
    }

    /// Override the nudge step and grow percentage.
    pub fn with_steps(mut self, nudge_step: f64, grow_percent: f64) -> Self {
        self.nudge_step = nudge_step;
        self.grow_percent = grow_percent;
        self
    }

    /// The underlying entity registry.
    pub fn set(&self) -> &PointSet {
        &self.set
    }

    /// Replace the whole registry after a server-side reload. Selection,
    /// scaffold and cursor reset; staged writes survive.
    pub fn reload(&mut self, set: PointSet) {
        self.set = set;
        self.cursor = None;
        self.scaffold.clear();
        self.scaffold_centroid = None;
        self.refresh_geometry();
    }

    // --- selection ---

    /// Select exactly one point. With an id, that point; without, the
    /// first point when nothing is selected, otherwise the next point
    /// cyclically after the last-selected one.
    pub fn select_one(&mut self, id: Option<PointId>) {
        if self.set.is_empty() {
            return;
        }
        let target = match id {
            Some(id) => id,
            None => {
                if self.set.selected_count() == 0 {
                    self.set.points()[0].id
                } else {
                    self.next_after(self.cursor)
                }
            }
        };
        for point in self.set.points_mut() {
            point.selected = point.id == target;
        }
        self.cursor = Some(target);
        self.sync_scaffold();
    }

    /// Extend the selection by the next point cyclically after the
    /// last-selected. No-op when everything is already selected.
    pub fn select_more(&mut self) {
        if self.set.is_empty() || self.set.selected_count() == self.set.len() {
            return;
        }
        if self.set.selected_count() == 0 {
            self.select_one(None);
            return;
        }
        let next = self.next_after(self.cursor);
        for point in self.set.points_mut() {
            if point.id == next {
                point.selected = true;
            }
        }
        self.cursor = Some(next);
        self.sync_scaffold();
    }

    /// Select every point.
    pub fn select_all(&mut self) {
        for point in self.set.points_mut() {
            point.selected = true;
        }
        self.cursor = self.set.points().last().map(|p| p.id);
        self.sync_scaffold();
    }

    /// Clear the selection.
    pub fn select_none(&mut self) {
        for point in self.set.points_mut() {
            point.selected = false;
        }
        self.cursor = None;
        self.sync_scaffold();
    }

    fn next_after(&self, cursor: Option<PointId>) -> PointId {
        let points = self.set.points();
        let from = cursor
            .and_then(|id| points.iter().position(|p| p.id == id))
            .map(|i| (i + 1) % points.len())
            .unwrap_or(0);
        points[from].id
    }

    // --- moves ---

    /// Nudge the selection one step in a direction. Fine control divides
    /// the step by 10. Returns whether the batch committed.
    pub fn nudge(&mut self, direction: Capability, fine: bool) -> bool {
        let step = self.nudge_step;
        let (dx, dy) = match direction {
            Capability::Up => (0.0, -step),
            Capability::Down => (0.0, step),
            Capability::Left => (-step, 0.0),
            Capability::Right => (step, 0.0),
            _ => return false,
        };
        self.move_by(dx, dy, fine)
    }

    /// Apply the same delta to every selected point. Fine control divides
    /// the delta by 10. The batch commits only if every resulting position
    /// stays in bounds; otherwise no point moves.
    pub fn move_by(&mut self, dx: f64, dy: f64, fine: bool) -> bool {
        let (dx, dy) = if fine { (dx / 10.0, dy / 10.0) } else { (dx, dy) };
        let moves: Vec<(PointId, f64, f64)> = self
            .set
            .points()
            .iter()
            .filter(|p| p.selected)
            .map(|p| (p.id, p.x + dx, p.y + dy))
            .collect();
        self.commit_moves(moves)
    }

    /// Move the selection outward along the scaffold rays.
    pub fn expand(&mut self, fine: bool) -> bool {
        self.scale(fine, true)
    }

    /// Move the selection inward along the scaffold rays.
    pub fn contract(&mut self, fine: bool) -> bool {
        self.scale(fine, false)
    }

    fn scale(&mut self, fine: bool, outward: bool) -> bool {
        if self.scaffold.is_empty() {
            self.sync_scaffold();
        }
        let Some((cx, cy)) = self.scaffold_centroid else {
            return false;
        };
        let pct = if fine {
            self.grow_percent / 25.0
        } else {
            self.grow_percent
        };
        let factor = 100.0 / pct;

        let moves: Vec<(PointId, f64, f64)> = self
            .set
            .points()
            .iter()
            .filter(|p| p.selected)
            .map(|p| {
                let (sx, sy) = self.scaffold.get(&p.id).copied().unwrap_or((p.x, p.y));
                let range_x = cx - sx;
                let range_y = cy - sy;
                if outward {
                    (p.id, p.x - range_x / factor, p.y - range_y / factor)
                } else {
                    (p.id, p.x + range_x / factor, p.y + range_y / factor)
                }
            })
            .collect();
        self.commit_moves(moves)
    }

    fn commit_moves(&mut self, moves: Vec<(PointId, f64, f64)>) -> bool {
        if moves.is_empty() {
            return false;
        }
        if moves.iter().any(|(_, x, y)| !in_bounds(*x, *y)) {
            // Expected interaction limit, not a fault; nothing moves.
            tracing::debug!("Batch move rejected at the editing-area boundary");
            return false;
        }
        let ids: Vec<PointId> = moves.iter().map(|(id, _, _)| *id).collect();
        for (id, x, y) in moves {
            if let Some(point) = self.set.points_mut().iter_mut().find(|p| p.id == id) {
                point.x = x;
                point.y = y;
            }
            self.stage_write(id, x, y);
        }
        self.reposition_connected(&ids);
        true
    }

    fn stage_write(&mut self, id: PointId, x: f64, y: f64) {
        let key = format!("{}{}", self.prefix, id);
        let payload = json!({
            "index": id,
            "x": x / 100.0,
            "y": 100.0 - y / 100.0,
        })
        .to_string();
        self.pending.insert(key, payload);
    }

    /// Drain the staged write payloads, keyed for the write queue.
    pub fn take_pending_updates(&mut self) -> Vec<(String, String)> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    /// Number of staged writes not yet drained.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    // --- structure ---

    /// Stage a new point at the midpoint of a line. The new identity is
    /// the line's starting point's id + 1; the server creates the point
    /// and the caller reloads the geometry afterwards.
    pub fn add_point_in_line(&mut self, line_index: usize) -> Option<PointInsertion> {
        let line = self.set.lines().get(line_index)?;
        let start = self.set.point(line.start)?;
        let finish = self.set.point(line.finish)?;
        let x = (start.x + finish.x) / 2.0;
        let y = (start.y + finish.y) / 2.0;
        let id = line.start + 1;
        let payload = json!({
            "index": id,
            "x": x / 100.0,
            "y": 100.0 - y / 100.0,
        })
        .to_string();
        Some(PointInsertion { id, x, y, payload })
    }

    /// The identities to delete server-side. Clears the local selection;
    /// the caller issues the deletes and reloads the geometry.
    pub fn delete_selected(&mut self) -> Vec<PointId> {
        let ids = self.set.selected_ids();
        for point in self.set.points_mut() {
            point.selected = false;
        }
        self.cursor = None;
        self.sync_scaffold();
        ids
    }

    // --- geometry ---

    /// Centroid of the current selection via the shoelace formula,
    /// treating the point list as closed.
    pub fn selection_centroid(&self) -> Option<(f64, f64)> {
        let positions: Vec<(f64, f64)> = self
            .set
            .points()
            .iter()
            .filter(|p| p.selected)
            .map(|p| (p.x, p.y))
            .collect();
        centroid_of(&positions)
    }

    /// Scaffold geometry is shown only while the full set is selected.
    pub fn scaffold_visible(&self) -> bool {
        !self.set.is_empty() && self.set.selected_count() == self.set.len()
    }

    /// The scaffold centroid and per-point captured positions. A renderer
    /// draws each construction ray from the centroid through the captured
    /// position, extended by the same distance again.
    pub fn scaffold(&self) -> (Option<(f64, f64)>, &BTreeMap<PointId, (f64, f64)>) {
        (self.scaffold_centroid, &self.scaffold)
    }

    /// Capture the construction geometry for the current selection: the
    /// centroid, and every point's position at capture time. Repeated
    /// grow steps measure against these, not the moved positions.
    fn sync_scaffold(&mut self) {
        self.scaffold.clear();
        self.scaffold_centroid = None;
        if !self.scaffold_visible() {
            return;
        }
        let Some((cx, cy)) = self.selection_centroid() else {
            return;
        };
        self.scaffold_centroid = Some((cx, cy));
        for point in self.set.points() {
            self.scaffold.insert(point.id, (point.x, point.y));
        }
    }

    /// First selected point's position in arena metres, to 3 decimals.
    pub fn node_info(&self, arena_w: f64, arena_l: f64) -> Option<String> {
        let id = self.set.selected_ids().into_iter().next()?;
        let point = self.set.point(id)?;
        let (x_m, y_m) = transform::normalized_to_metres(point.x, point.y, arena_w, arena_l);
        Some(format!("{}{}: {:.3}m, {:.3}m", self.prefix, id, x_m, y_m))
    }

    /// Reposition every line and label from current point positions.
    pub fn refresh_geometry(&mut self) {
        let ids: Vec<PointId> = self.set.points().iter().map(|p| p.id).collect();
        self.reposition_connected(&ids);
    }

    /// Reposition every line and label touching the given points. Visible
    /// lines inset each endpoint by that endpoint's radius along the
    /// segment; hidden lines keep the raw point-to-point segment.
    fn reposition_connected(&mut self, moved: &[PointId]) {
        let positions: BTreeMap<PointId, (f64, f64, f64)> = self
            .set
            .points()
            .iter()
            .map(|p| (p.id, (p.x, p.y, p.radius)))
            .collect();

        for line in self.set.lines_mut() {
            if !moved.iter().any(|id| line.references(*id)) {
                continue;
            }
            let (Some(&(x1, y1, r1)), Some(&(x2, y2, r2))) =
                (positions.get(&line.start), positions.get(&line.finish))
            else {
                continue;
            };
            let length = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
            if line.visible && length > 0.0 {
                let t1 = r1 / length;
                let t2 = (length - r2) / length;
                line.x1 = x1 + (x2 - x1) * t1;
                line.y1 = y1 + (y2 - y1) * t1;
                line.x2 = x1 + (x2 - x1) * t2;
                line.y2 = y1 + (y2 - y1) * t2;
            } else {
                line.x1 = x1;
                line.y1 = y1;
                line.x2 = x2;
                line.y2 = y2;
            }
        }

        for label in self.set.labels_mut() {
            if !moved.contains(&label.anchor) {
                continue;
            }
            if let Some(&(x, y, _)) = positions.get(&label.anchor) {
                label.x = x;
                label.y = y;
            }
        }
    }

    // --- capability enablement ---

    /// Which editor tools are live for the current selection cardinality.
    pub fn toolpane_mask(&self) -> CapabilitySet {
        let total = self.set.len();
        let selected = self.set.selected_count();
        let nudge = CapabilitySet::of(&[
            Capability::Up,
            Capability::Down,
            Capability::Left,
            Capability::Right,
        ]);
        let selectors = CapabilitySet::of(&[
            Capability::Select,
            Capability::SelectAll,
            Capability::Extend,
        ]);
        let base = CapabilitySet::from(Capability::Reset);

        if selected == 0 {
            base | selectors
        } else if selected == total {
            base | nudge | Capability::Expand | Capability::Contract | Capability::Clear
        } else if selected == 1 {
            let mask = base | nudge | selectors | Capability::AddPoint | Capability::Clear;
            if total > 3 {
                mask | Capability::DeletePoint
            } else {
                mask
            }
        } else {
            base | nudge | selectors | Capability::AddPoint | Capability::Clear
        }
    }
}

fn in_bounds(x: f64, y: f64) -> bool {
    (0.0..=transform::NORMALIZED_EXTENT).contains(&x)
        && (0.0..=transform::NORMALIZED_EXTENT).contains(&y)
}

/// Polygon centroid via the signed-area shoelace formula, the list treated
/// as closed. Degenerate inputs fall back to the arithmetic mean.
fn centroid_of(positions: &[(f64, f64)]) -> Option<(f64, f64)> {
    match positions.len() {
        0 => None,
        1 => Some(positions[0]),
        2 => Some((
            (positions[0].0 + positions[1].0) / 2.0,
            (positions[0].1 + positions[1].1) / 2.0,
        )),
        n => {
            // Translate by the first point to keep the products small.
            let (ox, oy) = positions[0];
            let mut area = 0.0;
            let mut cx = 0.0;
            let mut cy = 0.0;
            for i in 0..n {
                let (x1, y1) = (positions[i].0 - ox, positions[i].1 - oy);
                let (x2, y2) = (
                    positions[(i + 1) % n].0 - ox,
                    positions[(i + 1) % n].1 - oy,
                );
                let cross = x1 * y2 - x2 * y1;
                area += cross;
                cx += (x1 + x2) * cross;
                cy += (y1 + y2) * cross;
            }
            if area.abs() < f64::EPSILON {
                let (sx, sy) = positions
                    .iter()
                    .fold((0.0, 0.0), |(ax, ay), (x, y)| (ax + x, ay + y));
                Some((sx / n as f64, sy / n as f64))
            } else {
                Some((ox + cx / (3.0 * area), oy + cy / (3.0 * area)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_set() -> PointSet {
        let mut set = PointSet::new();
        set.add_point(PointEntity::new(1, 0.0, 0.0, 60.0));
        set.add_point(PointEntity::new(2, 100.0, 0.0, 60.0));
        set.add_point(PointEntity::new(3, 100.0, 100.0, 60.0));
        set.add_point(PointEntity::new(4, 0.0, 100.0, 60.0));
        set.add_line(LineEntity::new(1, 2, true));
        set.add_line(LineEntity::new(2, 3, true));
        set.add_line(LineEntity::new(3, 4, true));
        set.add_line(LineEntity::new(4, 1, true));
        set
    }

    fn editor() -> PointEditor {
        PointEditor::new("fence", square_set())
    }

    #[test]
    fn test_move_is_all_or_nothing() {
        let mut ed = editor();
        ed.select_all();

        // Moving left would push the left edge below 0: nothing moves.
        assert!(!ed.move_by(-50.0, 0.0, false));
        assert_eq!(ed.set().point(1).unwrap().x, 0.0);
        assert_eq!(ed.set().point(2).unwrap().x, 100.0);
        assert_eq!(ed.pending_count(), 0);

        // A legal batch commits together.
        assert!(ed.move_by(50.0, 25.0, false));
        assert_eq!(ed.set().point(1).unwrap().x, 50.0);
        assert_eq!(ed.set().point(3).unwrap().y, 125.0);
        assert_eq!(ed.pending_count(), 4);
    }

    #[test]
    fn test_fine_control_divides_delta() {
        let mut ed = editor();
        ed.select_one(Some(3));
        assert!(ed.move_by(100.0, 0.0, true));
        assert_eq!(ed.set().point(3).unwrap().x, 110.0);
    }

    #[test]
    fn test_cyclic_selection_cursor() {
        let mut ed = editor();
        let mut visited = Vec::new();
        for _ in 0..4 {
            ed.select_one(None);
            let ids = ed.set().selected_ids();
            assert_eq!(ids.len(), 1);
            visited.push(ids[0]);
        }
        // Each point exactly once before repeating.
        let mut unique = visited.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 4);

        ed.select_one(None);
        assert_eq!(ed.set().selected_ids(), vec![visited[0]]);
    }

    #[test]
    fn test_select_more_extends_cyclically() {
        let mut ed = editor();
        ed.select_one(Some(4));
        ed.select_more(); // wraps to 1
        assert_eq!(ed.set().selected_ids(), vec![1, 4]);

        ed.select_all();
        let before = ed.set().selected_ids();
        ed.select_more(); // no-op, everything selected
        assert_eq!(ed.set().selected_ids(), before);
    }

    #[test]
    fn test_shoelace_centroid_of_square() {
        let mut ed = editor();
        ed.select_all();
        let (cx, cy) = ed.selection_centroid().expect("centroid");
        assert!((cx - 50.0).abs() < 1e-9);
        assert!((cy - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_expand_and_contract_along_scaffold() {
        let mut set = PointSet::new();
        set.add_point(PointEntity::new(1, 1000.0, 1000.0, 60.0));
        set.add_point(PointEntity::new(2, 1100.0, 1000.0, 60.0));
        set.add_point(PointEntity::new(3, 1100.0, 1100.0, 60.0));
        set.add_point(PointEntity::new(4, 1000.0, 1100.0, 60.0));
        let mut ed = PointEditor::new("fence", set);
        ed.select_all();
        assert!(ed.scaffold_visible());

        // 5% growth away from the (1050,1050) centroid: each corner sits
        // 50 from the centroid per axis, so one step moves it out by
        // 50 / (100/5) = 2.5 on each axis.
        assert!(ed.expand(false));
        let p1 = ed.set().point(1).unwrap();
        assert!((p1.x - 997.5).abs() < 1e-9);
        assert!((p1.y - 997.5).abs() < 1e-9);

        // Contract along the same captured rays steps straight back.
        assert!(ed.contract(false));
        let p1 = ed.set().point(1).unwrap();
        assert!((p1.x - 1000.0).abs() < 1e-9);

        // Growing into the boundary rejects the whole batch.
        ed.select_all();
        while ed.expand(false) {}
        let snapshot: Vec<(f64, f64)> =
            ed.set().points().iter().map(|p| (p.x, p.y)).collect();
        assert!(!ed.expand(false));
        let after: Vec<(f64, f64)> = ed.set().points().iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn test_visible_line_insets_by_radius() {
        let mut set = PointSet::new();
        set.add_point(PointEntity::new(1, 0.0, 0.0, 10.0));
        set.add_point(PointEntity::new(2, 100.0, 0.0, 10.0));
        set.add_line(LineEntity::new(1, 2, true));
        set.add_line(LineEntity::new(1, 2, false));
        let ed = PointEditor::new("fence", set);

        let visible = &ed.set().lines()[0];
        assert!((visible.x1 - 10.0).abs() < 1e-9);
        assert!((visible.x2 - 90.0).abs() < 1e-9);

        let hidden = &ed.set().lines()[1];
        assert!((hidden.x1 - 0.0).abs() < 1e-9);
        assert!((hidden.x2 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_moving_a_point_repositions_connected_lines() {
        let mut ed = editor();
        ed.select_one(Some(2));
        assert!(ed.move_by(0.0, 50.0, false));

        // Both lines touching point 2 follow it; the opposite edge stays.
        let l12 = &ed.set().lines()[0];
        assert!(l12.y2 > 0.0);
        let l34 = &ed.set().lines()[2];
        assert!((l34.y1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_staged_write_payload_form() {
        let mut ed = editor();
        ed.select_one(Some(3));
        assert!(ed.move_by(1100.0, 3300.0, false));

        let updates = ed.take_pending_updates();
        assert_eq!(updates.len(), 1);
        let (key, payload) = &updates[0];
        assert_eq!(key, "fence3");

        let value: serde_json::Value = serde_json::from_str(payload).unwrap();
        assert_eq!(value["index"], 3);
        assert!((value["x"].as_f64().unwrap() - 12.0).abs() < 1e-9);
        assert!((value["y"].as_f64().unwrap() - 66.0).abs() < 1e-9);
        assert_eq!(ed.pending_count(), 0);
    }

    #[test]
    fn test_add_point_in_line_midpoint_identity() {
        let mut ed = editor();
        let insertion = ed.add_point_in_line(1).expect("line 2->3");
        assert_eq!(insertion.id, 3);
        assert!((insertion.x - 100.0).abs() < 1e-9);
        assert!((insertion.y - 50.0).abs() < 1e-9);

        let value: serde_json::Value = serde_json::from_str(&insertion.payload).unwrap();
        assert_eq!(value["index"], 3);
    }

    #[test]
    fn test_delete_selected_returns_ids_and_clears() {
        let mut ed = editor();
        ed.select_one(Some(2));
        ed.select_more();
        let ids = ed.delete_selected();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(ed.set().selected_count(), 0);
    }

    #[test]
    fn test_toolpane_mask_by_cardinality() {
        let mut ed = editor();

        // n = 0
        let mask = ed.toolpane_mask();
        assert!(mask.contains(Capability::Select));
        assert!(mask.contains(Capability::SelectAll));
        assert!(mask.contains(Capability::Extend));
        assert!(mask.contains(Capability::Reset));
        assert!(!mask.contains(Capability::Up));
        assert!(!mask.contains(Capability::DeletePoint));

        // n = 1 of 4: delete allowed since 4 > 3
        ed.select_one(Some(1));
        let mask = ed.toolpane_mask();
        assert!(mask.contains(Capability::Up));
        assert!(mask.contains(Capability::AddPoint));
        assert!(mask.contains(Capability::DeletePoint));
        assert!(mask.contains(Capability::Clear));
        assert!(!mask.contains(Capability::Expand));

        // 1 < n < N: no delete
        ed.select_more();
        let mask = ed.toolpane_mask();
        assert!(mask.contains(Capability::AddPoint));
        assert!(!mask.contains(Capability::DeletePoint));

        // n = N: grow tools, no selectors
        ed.select_all();
        let mask = ed.toolpane_mask();
        assert!(mask.contains(Capability::Expand));
        assert!(mask.contains(Capability::Contract));
        assert!(!mask.contains(Capability::Select));
        assert!(!mask.contains(Capability::AddPoint));
    }

    #[test]
    fn test_delete_disallowed_at_minimum_polygon() {
        let mut set = PointSet::new();
        set.add_point(PointEntity::new(1, 0.0, 0.0, 60.0));
        set.add_point(PointEntity::new(2, 100.0, 0.0, 60.0));
        set.add_point(PointEntity::new(3, 50.0, 100.0, 60.0));
        let mut ed = PointEditor::new("fence", set);
        ed.select_one(Some(1));
        assert!(!ed.toolpane_mask().contains(Capability::DeletePoint));
    }

    #[test]
    fn test_node_info_metres_3dp() {
        let mut ed = editor();
        ed.select_one(Some(2));
        // (100, 0) normalized in an 8 x 12 m arena.
        let info = ed.node_info(8.0, 12.0).expect("selection");
        assert_eq!(info, "fence2: 0.080m, 12.000m");
    }

    #[test]
    fn test_nudge_directions() {
        let mut ed = editor();
        ed.select_one(Some(3));
        assert!(ed.nudge(Capability::Up, false));
        assert_eq!(ed.set().point(3).unwrap().y, 50.0);
        assert!(ed.nudge(Capability::Right, true));
        assert_eq!(ed.set().point(3).unwrap().x, 105.0);
        assert!(!ed.nudge(Capability::Expand, false));
    }
}
