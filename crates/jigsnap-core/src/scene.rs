//! Scene abstraction for the rendering collaborator.
//!
//! The core never draws anything. It reads piece positions and commands
//! container moves and reparenting through [`Scene`]. Each group owns exactly one
//! container, and a piece's absolute position is the layer origin plus its
//! container position plus its local position inside that container.

use crate::grid::PieceId;
use crate::group::GroupId;
use kurbo::{Point, Vec2};
use std::collections::HashMap;

/// Capabilities the core needs from the rendering layer.
pub trait Scene {
    /// Register a piece in a freshly created container for `group`, at absolute `position`.
    fn add_piece(&mut self, piece: PieceId, group: GroupId, position: Point);

    /// Current absolute position of a piece.
    fn absolute_position(&self, piece: PieceId) -> Point;

    /// Move a group's container (and every piece in it) by `delta`.
    fn move_container(&mut self, group: GroupId, delta: Vec2);

    /// Current position of a group's container.
    fn container_position(&self, group: GroupId) -> Point;

    /// Move `piece` from one container to another, shifting its local position by `adjust`.
    fn reparent(&mut self, piece: PieceId, from: GroupId, to: GroupId, adjust: Vec2);

    /// Raise a group's container above all others.
    fn bring_to_front(&mut self, group: GroupId);

    /// Ask the rendering layer to redraw.
    fn request_redraw(&mut self);

    /// Drop the container of a group that no longer has members.
    fn remove_container(&mut self, _group: GroupId) {}
}

/// One container in a [`MemoryScene`].
#[derive(Debug, Clone, Default)]
struct Container {
    position: Point,
    children: Vec<PieceId>,
}

/// In-memory scene for tests and headless sessions.
///
/// Containers start at the layer origin and pieces carry their scattered
/// position as a local offset, the same way a fresh draggable group holding a
/// single positioned image behaves.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    /// Offset of the layer holding every container.
    origin: Vec2,
    containers: HashMap<GroupId, Container>,
    /// Local position and owning container of each piece.
    locals: HashMap<PieceId, (GroupId, Point)>,
    /// Containers, back to front.
    z_order: Vec<GroupId>,
    redraws: usize,
}

impl MemoryScene {
    /// Create an empty scene with its layer at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene whose layer is offset by `origin`.
    pub fn with_origin(origin: Vec2) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// Place a group's container at a position in layer coordinates (drag helper).
    pub fn set_container_position(&mut self, group: GroupId, position: Point) {
        if let Some(container) = self.containers.get_mut(&group) {
            container.position = position;
        }
    }

    /// Local position of a piece inside its container.
    pub fn local_position(&self, piece: PieceId) -> Option<Point> {
        self.locals.get(&piece).map(|(_, local)| *local)
    }

    /// Container currently holding a piece.
    pub fn container_of(&self, piece: PieceId) -> Option<GroupId> {
        self.locals.get(&piece).map(|(group, _)| *group)
    }

    /// Pieces held by a container.
    pub fn children(&self, group: GroupId) -> &[PieceId] {
        self.containers
            .get(&group)
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }

    /// Containers in z-order (back to front).
    pub fn z_order(&self) -> &[GroupId] {
        &self.z_order
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Number of redraws requested so far.
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }
}

impl Scene for MemoryScene {
    fn add_piece(&mut self, piece: PieceId, group: GroupId, position: Point) {
        let container = self.containers.entry(group).or_default();
        container.children.push(piece);
        if !self.z_order.contains(&group) {
            self.z_order.push(group);
        }
        let local = position - self.origin - container.position.to_vec2();
        self.locals.insert(piece, (group, local));
    }

    fn absolute_position(&self, piece: PieceId) -> Point {
        match self.locals.get(&piece) {
            Some((group, local)) => {
                let container = self.container_position(*group);
                *local + container.to_vec2() + self.origin
            }
            None => {
                log::warn!("absolute_position of unknown {}", piece);
                Point::ZERO
            }
        }
    }

    fn move_container(&mut self, group: GroupId, delta: Vec2) {
        if let Some(container) = self.containers.get_mut(&group) {
            container.position += delta;
        }
    }

    fn container_position(&self, group: GroupId) -> Point {
        self.containers
            .get(&group)
            .map(|c| c.position)
            .unwrap_or(Point::ZERO)
    }

    fn reparent(&mut self, piece: PieceId, from: GroupId, to: GroupId, adjust: Vec2) {
        if let Some(source) = self.containers.get_mut(&from) {
            source.children.retain(|&child| child != piece);
        }
        self.containers.entry(to).or_default().children.push(piece);
        if let Some((group, local)) = self.locals.get_mut(&piece) {
            *group = to;
            *local += adjust;
        }
    }

    fn bring_to_front(&mut self, group: GroupId) {
        self.z_order.retain(|&id| id != group);
        self.z_order.push(group);
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn remove_container(&mut self, group: GroupId) {
        let empty = self
            .containers
            .get(&group)
            .is_some_and(|c| c.children.is_empty());
        if empty {
            self.containers.remove(&group);
            self.z_order.retain(|&id| id != group);
        }
    }
}
