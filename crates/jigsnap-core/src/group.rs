//! Group registry: which pieces currently move together.
//!
//! Groups partition the full piece set. Every piece starts in its own group,
//! groups merge when pieces snap and never split. Membership is kept as an
//! arena of groups plus an index from piece id to group id.

use crate::error::{PuzzleError, Result};
use crate::grid::PieceId;
use crate::scene::Scene;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable group identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

/// A rigid cluster of pieces that are dragged as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    members: Vec<PieceId>,
    draggable: bool,
}

impl Group {
    fn singleton(id: GroupId, piece: PieceId) -> Self {
        Self {
            id,
            members: vec![piece],
            draggable: true,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Member pieces (order carries no meaning).
    pub fn members(&self) -> &[PieceId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Any group, fused or not, can be dragged.
    pub fn is_draggable(&self) -> bool {
        self.draggable
    }
}

/// Record of one applied merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeRecord {
    /// Moved piece that triggered the snap.
    pub piece: PieceId,
    /// Neighbor it snapped to.
    pub neighbor: PieceId,
    /// Group that was absorbed.
    pub source: GroupId,
    /// Group that absorbed it.
    pub target: GroupId,
    /// Correction applied to the source container.
    pub correction: Vec2,
    /// Number of pieces moved into the target.
    pub moved: usize,
}

/// Tracks group membership of every piece.
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: BTreeMap<GroupId, Group>,
    /// Group of each piece, indexed by piece id.
    group_of: Vec<GroupId>,
    next_id: u32,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a singleton group for the next piece.
    ///
    /// Pieces must be registered in id order.
    pub fn create_singleton(&mut self, piece: PieceId) -> Result<GroupId> {
        if piece.index() != self.group_of.len() {
            return Err(PuzzleError::UnknownPiece(piece));
        }
        let id = GroupId(self.next_id);
        self.next_id += 1;
        self.groups.insert(id, Group::singleton(id, piece));
        self.group_of.push(id);
        Ok(id)
    }

    /// Group currently holding a piece.
    pub fn group_of(&self, piece: PieceId) -> Option<GroupId> {
        self.group_of.get(piece.index()).copied()
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// Members of a group, empty for unknown groups.
    pub fn members(&self, id: GroupId) -> &[PieceId] {
        self.groups
            .get(&id)
            .map(Group::members)
            .unwrap_or(&[])
    }

    /// Check if both pieces resolve to the same group.
    pub fn same_group(&self, p1: PieceId, p2: PieceId) -> bool {
        match (self.group_of(p1), self.group_of(p2)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// All registered groups, including empty ones not yet pruned.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Number of registered groups, including empty ones not yet pruned.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups that still have members.
    pub fn live_count(&self) -> usize {
        self.groups.values().filter(|g| !g.is_empty()).count()
    }

    /// Number of registered pieces.
    pub fn piece_count(&self) -> usize {
        self.group_of.len()
    }

    /// Snap `source_piece`'s group onto `target_piece`'s group.
    ///
    /// The source container is first moved by `correction`, then the offset
    /// between the two containers is measured, then every source member is
    /// reparented into the target with that offset so nothing visibly jumps.
    /// The emptied source group stays registered until [`prune_empty`].
    ///
    /// Returns `None` without touching anything when both pieces already share
    /// a group (including a piece merged with itself).
    ///
    /// [`prune_empty`]: GroupRegistry::prune_empty
    pub fn merge<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        source_piece: PieceId,
        target_piece: PieceId,
        correction: Vec2,
    ) -> Option<MergeRecord> {
        if self.same_group(source_piece, target_piece) {
            return None;
        }
        let source = self.group_of(source_piece)?;
        let target = self.group_of(target_piece)?;
        if !self.groups.contains_key(&target) {
            return None;
        }
        debug_assert!(self.check_partition().is_ok(), "partition broken before merge");

        scene.move_container(source, correction);
        let delta = scene.container_position(source) - scene.container_position(target);

        let moved = std::mem::take(&mut self.groups.get_mut(&source)?.members);
        for &piece in &moved {
            scene.reparent(piece, source, target, delta);
            self.group_of[piece.index()] = target;
        }
        let count = moved.len();
        if let Some(group) = self.groups.get_mut(&target) {
            group.members.extend(moved);
        }

        debug_assert!(self.check_partition().is_ok(), "partition broken after merge");
        log::debug!(
            "merged {} into {} ({} -> {}, {} pieces, correction {:?})",
            source,
            target,
            source_piece,
            target_piece,
            count,
            correction
        );

        Some(MergeRecord {
            piece: source_piece,
            neighbor: target_piece,
            source,
            target,
            correction,
            moved: count,
        })
    }

    /// Remove every group without members, returning the removed ids.
    pub fn prune_empty(&mut self) -> Vec<GroupId> {
        let empty: Vec<GroupId> = self
            .groups
            .values()
            .filter(|g| g.members.is_empty())
            .map(Group::id)
            .collect();
        for id in &empty {
            self.groups.remove(id);
        }
        empty
    }

    /// Verify that the groups partition every registered piece.
    pub fn check_partition(&self) -> Result<()> {
        let mut seen = vec![false; self.group_of.len()];
        for group in self.groups.values() {
            for &piece in &group.members {
                let Some(slot) = seen.get_mut(piece.index()) else {
                    return Err(PuzzleError::BrokenPartition(format!(
                        "{} in {} is not registered",
                        piece, group.id
                    )));
                };
                if *slot {
                    return Err(PuzzleError::BrokenPartition(format!(
                        "{} appears in more than one group",
                        piece
                    )));
                }
                *slot = true;
                if self.group_of[piece.index()] != group.id {
                    return Err(PuzzleError::BrokenPartition(format!(
                        "{} is listed in {} but indexed to {}",
                        piece,
                        group.id,
                        self.group_of[piece.index()]
                    )));
                }
            }
        }
        if let Some(orphan) = seen.iter().position(|&s| !s) {
            return Err(PuzzleError::BrokenPartition(format!(
                "{} has no group",
                PieceId(orphan as u32)
            )));
        }
        Ok(())
    }
}
