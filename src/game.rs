use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::grid::OccupancyGrid;
use crate::orientation::{Direction, Orientation};
use crate::piece::ActivePiece;
use crate::position::Position;
use crate::shape::VoxelShape;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Title,
    Playing,
    GameOver,
}

/// A discrete player request, applied at most once.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    MoveForward,
    MoveBack,
    RotateForwardCw,
    RotateForwardCcw,
    RotateUpCw,
    RotateUpCcw,
    Start,
}

impl Intent {
    /// Grid translation of a move intent.
    pub fn delta(self) -> Option<Position> {
        let direction = match self {
            Intent::MoveLeft => Direction::Left,
            Intent::MoveRight => Direction::Right,
            Intent::MoveForward => Direction::Forward,
            Intent::MoveBack => Direction::Back,
            _ => return None,
        };
        Some(direction.vector())
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Started,
    PieceSpawned,
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LayersCleared(u32),
    GameOver,
    ReturnedToTitle,
}

/// Where the active piece is and what it covers.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PiecePose {
    pub shape_name: String,
    pub anchor: Position,
    pub orientation: Orientation,
    pub min_pos: Position,
    pub max_pos: Position,
    pub voxels: Vec<Position>,
}

impl From<&ActivePiece> for PiecePose {
    fn from(piece: &ActivePiece) -> Self {
        Self {
            shape_name: piece.name().to_string(),
            anchor: piece.pos(),
            orientation: piece.orientation(),
            min_pos: piece.min_pos(),
            max_pos: piece.max_pos(),
            voxels: piece.voxels().collect(),
        }
    }
}

/// Everything a front end needs to draw one frame.
#[derive(Clone, Debug)]
pub struct Snapshot<'a> {
    pub mode: Mode,
    pub score: u32,
    pub grid: &'a OccupancyGrid,
    pub piece: Option<PiecePose>,
    pub next_shape: &'a VoxelShape,
    /// Layers removed by the most recent lock.
    pub last_clear: u32,
    pub layers_cleared: u32,
    pub game_over: bool,
}

// ============================================================================
// Shape Provider Trait
// ============================================================================

/// Chooses which template the next piece is built from.
pub trait ShapeProvider {
    /// Index into a template set of `count` shapes.
    fn next_shape(&mut self, count: usize) -> usize;
}

/// Uniform choice over the template set.
pub struct RandomShapeProvider {
    rng: StdRng,
}

impl RandomShapeProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomShapeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeProvider for RandomShapeProvider {
    fn next_shape(&mut self, count: usize) -> usize {
        self.rng.gen_range(0..count)
    }
}

/// Cycles through a fixed list of template indices.
pub struct SequenceShapeProvider {
    indices: Vec<usize>,
    index: usize,
}

impl SequenceShapeProvider {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, index: 0 }
    }
}

impl ShapeProvider for SequenceShapeProvider {
    fn next_shape(&mut self, count: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let shape = self.indices[self.index % self.indices.len()] % count;
        self.index += 1;
        shape
    }
}

// ============================================================================
// Session
// ============================================================================

/// The whole simulation, advanced only through [`GameSession::step`].
pub struct GameSession {
    pub grid: OccupancyGrid,
    pub score: u32,
    mode: Mode,
    piece: Option<ActivePiece>,
    shapes: Vec<Arc<VoxelShape>>,
    next: usize,
    provider: Box<dyn ShapeProvider>,
    spawn_anchor: Position,
    drop_interval: Duration,
    game_over_wait: Duration,
    layer_bonus: u32,
    layers_cleared: u32,
    last_clear: u32,
    drop_timer: Duration,
    game_over_timer: Duration,
    events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        Self::with_provider(config, Box::new(RandomShapeProvider::new()))
    }

    pub fn with_provider(
        config: &GameConfig,
        mut provider: Box<dyn ShapeProvider>,
    ) -> Result<Self, ConfigError> {
        let shapes = config.validate()?;
        let next = provider.next_shape(shapes.len()) % shapes.len();

        debug!(
            shapes = shapes.len(),
            grid = ?config.grid_size,
            "session created"
        );

        Ok(Self {
            grid: OccupancyGrid::new(config.grid_size),
            score: 0,
            mode: Mode::Title,
            piece: None,
            shapes,
            next,
            provider,
            spawn_anchor: config.spawn_anchor,
            drop_interval: config.drop_interval(),
            game_over_wait: config.game_over_wait(),
            layer_bonus: config.layer_bonus,
            layers_cleared: 0,
            last_clear: 0,
            drop_timer: Duration::ZERO,
            game_over_timer: Duration::ZERO,
            events: Vec::new(),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn piece(&self) -> Option<&ActivePiece> {
        self.piece.as_ref()
    }

    /// Swaps in a piece, e.g. one placed by hand.
    pub fn set_piece(&mut self, piece: ActivePiece) {
        self.piece = Some(piece);
    }

    pub fn next_shape(&self) -> &VoxelShape {
        &self.shapes[self.next]
    }

    pub fn shapes(&self) -> &[Arc<VoxelShape>] {
        &self.shapes
    }

    pub fn layers_cleared(&self) -> u32 {
        self.layers_cleared
    }

    pub fn is_game_over(&self) -> bool {
        self.mode == Mode::GameOver
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advances the simulation by `elapsed`, applying `intents` in order
    /// before gravity is evaluated.
    pub fn step(&mut self, elapsed: Duration, intents: &[Intent]) -> Snapshot<'_> {
        match self.mode {
            Mode::Title => {
                if intents.contains(&Intent::Start) {
                    self.start();
                }
            }
            Mode::Playing => self.step_playing(elapsed, intents),
            Mode::GameOver => {
                self.game_over_timer += elapsed;
                if self.game_over_timer >= self.game_over_wait {
                    self.mode = Mode::Title;
                    self.events.push(GameEvent::ReturnedToTitle);
                    info!(score = self.score, "back to title");
                }
            }
        }

        self.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            mode: self.mode,
            score: self.score,
            grid: &self.grid,
            piece: self.piece.as_ref().map(PiecePose::from),
            next_shape: self.next_shape(),
            last_clear: self.last_clear,
            layers_cleared: self.layers_cleared,
            game_over: self.is_game_over(),
        }
    }

    /// Leaves the title screen with an empty grid and zero score.
    /// Returns `false` outside [`Mode::Title`].
    pub fn start(&mut self) -> bool {
        if self.mode != Mode::Title {
            return false;
        }

        self.grid.clear();
        self.score = 0;
        self.layers_cleared = 0;
        self.last_clear = 0;
        self.mode = Mode::Playing;
        self.events.push(GameEvent::Started);
        info!("game started");

        self.spawn();
        true
    }

    /// Removes every full layer and scores it. Returns the number removed.
    pub fn clear_layers(&mut self) -> u32 {
        let cleared = self.grid.clear_full_layers();
        self.last_clear = cleared;

        if cleared > 0 {
            self.score = self
                .score
                .saturating_add(cleared.saturating_mul(self.layer_bonus));
            self.layers_cleared = self.layers_cleared.saturating_add(cleared);
            self.events.push(GameEvent::LayersCleared(cleared));
            info!(layers = cleared, score = self.score, "layers cleared");
        }

        cleared
    }

    fn step_playing(&mut self, elapsed: Duration, intents: &[Intent]) {
        if self.piece.is_none() {
            self.spawn();
        }

        for &intent in intents {
            self.apply_intent(intent);
        }

        self.drop_timer += elapsed;
        if self.drop_timer >= self.drop_interval {
            self.drop_timer = Duration::ZERO;
            if let Some(piece) = self.piece.as_mut() {
                if !piece.is_touching(&self.grid, Position::ZERO) {
                    piece.drop_one();
                    trace!(pos = ?piece.pos(), "piece dropped");
                }
            }
        }

        let touching = self
            .piece
            .as_ref()
            .is_some_and(|piece| piece.is_touching(&self.grid, Position::ZERO));
        if touching {
            self.lock_piece();
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        let Some(piece) = self.piece.as_mut() else {
            return;
        };

        let rotated = match intent {
            Intent::RotateForwardCcw => piece.rotate_forward(&self.grid, true),
            Intent::RotateForwardCw => piece.rotate_forward(&self.grid, false),
            Intent::RotateUpCcw => piece.rotate_up(&self.grid, true),
            Intent::RotateUpCw => piece.rotate_up(&self.grid, false),
            Intent::Start => return,
            _ => {
                if let Some(delta) = intent.delta() {
                    if piece.move_by(&self.grid, delta) {
                        self.events.push(GameEvent::PieceMoved);
                    }
                }
                return;
            }
        };

        if rotated {
            self.events.push(GameEvent::PieceRotated);
        } else {
            debug!(?intent, pos = ?piece.pos(), "rotation blocked");
        }
    }

    fn spawn(&mut self) {
        let shape = Arc::clone(&self.shapes[self.next]);
        self.next = self.provider.next_shape(self.shapes.len()) % self.shapes.len();

        let mut piece = ActivePiece::new(shape, self.spawn_anchor);
        piece.settle(&self.grid);
        debug!(shape = piece.name(), pos = ?piece.pos(), "piece spawned");

        self.piece = Some(piece);
        self.drop_timer = Duration::ZERO;
        self.events.push(GameEvent::PieceSpawned);
    }

    fn lock_piece(&mut self) {
        let Some(mut piece) = self.piece.take() else {
            return;
        };

        // Undo the drop that made contact.
        piece.raise_one();
        piece.fill_into(&mut self.grid, false);
        self.events.push(GameEvent::PieceLocked);
        debug!(shape = piece.name(), pos = ?piece.pos(), "piece locked");

        if piece.max_pos().y >= self.grid.size().y {
            self.mode = Mode::GameOver;
            self.game_over_timer = Duration::ZERO;
            self.events.push(GameEvent::GameOver);
            info!(score = self.score, "game over");
            return;
        }

        self.clear_layers();
        self.spawn();
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::shape::{MassType, ShapeTemplate};

    pub fn single_voxel() -> ShapeTemplate {
        ShapeTemplate::new("cube", ["o"])
    }

    /// Config with a 5x10x5 grid and the given templates.
    pub fn config_with(templates: Vec<ShapeTemplate>) -> GameConfig {
        GameConfig {
            templates,
            ..GameConfig::default()
        }
    }

    pub fn session_with(templates: Vec<ShapeTemplate>) -> GameSession {
        let provider = Box::new(SequenceShapeProvider::new(vec![0]));
        match GameSession::with_provider(&config_with(templates), provider) {
            Ok(session) => session,
            Err(err) => panic!("test config rejected: {err}"),
        }
    }

    pub fn fill_layer(grid: &mut OccupancyGrid, y: i32) {
        let size = grid.size();
        for z in 0..size.z {
            for x in 0..size.x {
                grid.set_cell(Position::new(x, y, z), MassType::Mass);
            }
        }
    }

    pub fn fill_layer_with_gap(grid: &mut OccupancyGrid, y: i32, gap_x: i32, gap_z: i32) {
        fill_layer(grid, y);
        grid.set_cell(Position::new(gap_x, y, gap_z), MassType::Empty);
    }
}
