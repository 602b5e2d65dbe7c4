//! Snap/merge pass run when a dragged group is dropped.

use crate::grid::Grid;
use crate::group::{GroupId, GroupRegistry, MergeRecord};
use crate::matcher::{are_neighbors, correct_offset, should_snap};
use crate::scene::Scene;

/// Default snap tolerance in pixels.
pub const DEFAULT_SNAP_DISTANCE: f64 = 20.0;

/// Result of one drag-end pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragOutcome {
    /// Merges applied, in the order they happened.
    pub merges: Vec<MergeRecord>,
    /// Groups discarded after the pass.
    pub pruned: Vec<GroupId>,
    /// Whether this pass solved the puzzle.
    pub solved: bool,
}

impl DragOutcome {
    /// Check if any piece snapped.
    pub fn snapped(&self) -> bool {
        !self.merges.is_empty()
    }
}

/// Matches the pieces of a dropped group against their neighbors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEngine {
    snap_distance: f64,
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SNAP_DISTANCE)
    }
}

impl SnapEngine {
    pub fn new(snap_distance: f64) -> Self {
        Self { snap_distance }
    }

    pub fn snap_distance(&self) -> f64 {
        self.snap_distance
    }

    /// Snap every piece of `moved` that lies within tolerance of a neighbor.
    ///
    /// Members are taken as they were when the drop happened. Each moved piece
    /// is tested against its neighbors in ascending id order and membership is
    /// checked again before every merge, since an earlier merge in the same pass
    /// may already have joined the pair. Empty groups are pruned (and their
    /// containers removed) once all moved pieces were visited. Completion is
    /// left to the caller.
    pub fn on_drag_end<S: Scene + ?Sized>(
        &self,
        grid: &Grid,
        registry: &mut GroupRegistry,
        scene: &mut S,
        moved: GroupId,
    ) -> DragOutcome {
        let mut outcome = DragOutcome::default();
        let dropped = registry.members(moved).to_vec();

        for piece_id in dropped {
            let Some(piece) = grid.piece(piece_id) else {
                log::warn!("dropped group {} holds unknown {}", moved, piece_id);
                continue;
            };
            for &other_id in grid.neighbors_of(piece_id) {
                if registry.same_group(piece_id, other_id) {
                    continue;
                }
                let Some(other) = grid.piece(other_id) else {
                    continue;
                };
                debug_assert!(are_neighbors(piece, other));

                let offset = correct_offset(scene, piece, other);
                if !should_snap(offset, self.snap_distance) {
                    continue;
                }
                if let Some(record) = registry.merge(scene, piece_id, other_id, offset) {
                    scene.request_redraw();
                    outcome.merges.push(record);
                }
            }
        }

        outcome.pruned = registry.prune_empty();
        for &group in &outcome.pruned {
            scene.remove_container(group);
        }
        outcome
    }
}
