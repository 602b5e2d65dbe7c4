//! Puzzle handle: owns the grid, the group registry and the scene, and routes drag events.

use crate::completion::CompletionDetector;
use crate::config::PuzzleOptions;
use crate::engine::{DragOutcome, SnapEngine};
use crate::error::{PuzzleError, Result};
use crate::events::{ListenerId, SolvedEvent, SolvedListeners};
use crate::grid::{Grid, GridCoord, GridSpec, Piece, PieceId};
use crate::group::{GroupId, GroupRegistry, MergeRecord};
use crate::matcher::correct_offset;
use crate::scatter::scatter_positions;
use crate::scene::Scene;
use crate::tile::RasterTile;
use kurbo::{Point, Size, Vec2};

/// A puzzle instance bound to a scene.
#[derive(Debug)]
pub struct Puzzle<S: Scene> {
    grid: Grid,
    registry: GroupRegistry,
    scene: S,
    engine: SnapEngine,
    completion: CompletionDetector,
    listeners: SolvedListeners,
    options: PuzzleOptions,
    /// Raster data per piece, indexed by piece id.
    tiles: Vec<Option<RasterTile>>,
    /// Group currently being dragged.
    dragging: Option<GroupId>,
    /// Drag-end events processed so far.
    drags: u32,
}

impl<S: Scene> Puzzle<S> {
    /// Create a puzzle with no pieces yet; pieces arrive through [`Puzzle::add_piece`].
    pub fn new(spec: GridSpec, options: PuzzleOptions, scene: S) -> Result<Self> {
        options.validate()?;
        if options.pieces.x != spec.columns || options.pieces.y != spec.rows {
            log::warn!(
                "options ask for {}x{} pieces but the grid is {}x{}, using the grid",
                options.pieces.x,
                options.pieces.y,
                spec.columns,
                spec.rows
            );
        }
        Ok(Self {
            grid: Grid::empty(spec),
            registry: GroupRegistry::new(),
            scene,
            engine: SnapEngine::new(options.snap_distance),
            completion: CompletionDetector::new(),
            listeners: SolvedListeners::new(),
            options,
            tiles: Vec::with_capacity(spec.piece_count()),
            dragging: None,
            drags: 0,
        })
    }

    /// Create a puzzle holding every piece of `spec`, placed at `positions` (slicing order).
    pub fn create(spec: GridSpec, options: PuzzleOptions, scene: S, positions: &[Point]) -> Result<Self> {
        if positions.len() != spec.piece_count() {
            return Err(PuzzleError::InvalidGrid(format!(
                "{} positions given for {} pieces",
                positions.len(),
                spec.piece_count()
            )));
        }
        let mut puzzle = Self::new(spec, options, scene)?;
        let coords: Vec<GridCoord> = spec.coords().collect();
        for (coord, &position) in coords.into_iter().zip(positions) {
            puzzle.add_piece(coord, spec.piece_width, spec.piece_height, None, position)?;
        }
        Ok(puzzle)
    }

    /// Create a puzzle with every piece scattered randomly over `board`.
    pub fn scattered(spec: GridSpec, options: PuzzleOptions, scene: S, board: Size, seed: u64) -> Result<Self> {
        let positions = scatter_positions(spec.piece_count(), board, spec.piece_size(), seed);
        Self::create(spec, options, scene, &positions)
    }

    /// Add one piece with a fresh singleton group, at absolute `position`.
    pub fn add_piece(
        &mut self,
        coord: GridCoord,
        tile_width: f64,
        tile_height: f64,
        tile: Option<RasterTile>,
        position: Point,
    ) -> Result<PieceId> {
        let spec = self.grid.spec();
        if tile_width != spec.piece_width || tile_height != spec.piece_height {
            return Err(PuzzleError::InvalidGrid(format!(
                "tile {}x{} does not match piece size {}x{}",
                tile_width, tile_height, spec.piece_width, spec.piece_height
            )));
        }
        let id = self.grid.insert(coord, tile_width, tile_height)?;
        let group = self.registry.create_singleton(id)?;
        self.scene.add_piece(id, group, position);
        self.tiles.push(tile);
        Ok(id)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable scene access, for the rendering layer to move containers during a drag.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn options(&self) -> &PuzzleOptions {
        &self.options
    }

    pub fn snap_distance(&self) -> f64 {
        self.engine.snap_distance()
    }

    pub fn piece(&self, id: PieceId) -> Result<&Piece> {
        self.grid.piece(id).ok_or(PuzzleError::UnknownPiece(id))
    }

    /// Raster tile of a piece, if one was supplied.
    pub fn tile(&self, id: PieceId) -> Option<&RasterTile> {
        self.tiles.get(id.index()).and_then(Option::as_ref)
    }

    /// Group currently holding a piece.
    pub fn group_of(&self, piece: PieceId) -> Result<GroupId> {
        self.registry
            .group_of(piece)
            .ok_or(PuzzleError::UnknownPiece(piece))
    }

    /// Number of groups that still have members.
    pub fn live_group_count(&self) -> usize {
        self.registry.live_count()
    }

    /// Whether the puzzle has been solved. Never resets.
    pub fn is_done(&self) -> bool {
        self.completion.is_done()
    }

    /// Drag-end events processed so far.
    pub fn drag_count(&self) -> u32 {
        self.drags
    }

    /// Group currently being dragged, if any.
    pub fn dragging(&self) -> Option<GroupId> {
        self.dragging
    }

    /// Register a listener invoked once, when the puzzle becomes solved.
    pub fn on_solved<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&SolvedEvent) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    /// Remove a solved listener.
    pub fn off_solved(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn ensure_group(&self, group: GroupId) -> Result<()> {
        match self.registry.group(group) {
            Some(g) if !g.is_empty() && g.is_draggable() => Ok(()),
            _ => Err(PuzzleError::UnknownGroup(group)),
        }
    }

    /// Start dragging a group: it is raised above every other group.
    pub fn begin_drag(&mut self, group: GroupId) -> Result<()> {
        self.ensure_group(group)?;
        self.scene.bring_to_front(group);
        self.dragging = Some(group);
        Ok(())
    }

    /// Move a group by `delta` (one pointer-move step of a drag).
    pub fn drag_by(&mut self, group: GroupId, delta: Vec2) -> Result<()> {
        self.ensure_group(group)?;
        self.scene.move_container(group, delta);
        Ok(())
    }

    /// Drop a group: snap its pieces to matching neighbors, prune, then check completion.
    pub fn end_drag(&mut self, group: GroupId) -> Result<DragOutcome> {
        self.ensure_group(group)?;
        self.dragging = None;
        self.drags = self.drags.saturating_add(1);

        let mut outcome = self
            .engine
            .on_drag_end(&self.grid, &mut self.registry, &mut self.scene, group);
        outcome.solved = self.evaluate_completion();
        Ok(outcome)
    }

    /// Begin, move and drop a group in one go.
    pub fn drop_group(&mut self, group: GroupId, delta: Vec2) -> Result<DragOutcome> {
        self.begin_drag(group)?;
        self.drag_by(group, delta)?;
        self.end_drag(group)
    }

    /// Snap `piece` onto `target` regardless of distance, as if dropped exactly in place.
    ///
    /// Returns `None` if both already share a group.
    pub fn snap_pieces(&mut self, piece: PieceId, target: PieceId) -> Result<Option<MergeRecord>> {
        let offset = {
            let p = self.piece(piece)?;
            let t = self.piece(target)?;
            correct_offset(&self.scene, p, t)
        };
        let record = self.registry.merge(&mut self.scene, piece, target, offset);
        if record.is_some() {
            self.scene.request_redraw();
        }
        for group in self.registry.prune_empty() {
            self.scene.remove_container(group);
        }
        self.evaluate_completion();
        Ok(record)
    }

    /// Re-evaluate completion. Returns whether the puzzle is done; listeners fire
    /// only on the first transition.
    pub fn check_done(&mut self) -> bool {
        self.evaluate_completion();
        self.completion.is_done()
    }

    /// Returns true only when this call solved the puzzle.
    fn evaluate_completion(&mut self) -> bool {
        if !self.grid.is_complete() {
            return false;
        }
        if !self.completion.check_done(self.registry.live_count()) {
            return false;
        }
        let event = SolvedEvent {
            pieces: self.grid.len(),
            drags: self.drags,
        };
        log::info!("puzzle solved: {} pieces in {} drags", event.pieces, event.drags);
        self.listeners.fire(&event);
        true
    }
}
