//! Falling-block puzzle on a 3D voxel grid.
//!
//! Pieces are voxel shapes that fall through a fixed volume, slide along the
//! two horizontal axes, turn about their up or forward axis, and lock into
//! the grid on contact. Full horizontal layers are removed and everything
//! above falls by one.
//!
//! The crate is only the simulation. A front end owns a [`GameSession`],
//! feeds it elapsed time and [`Intent`]s through [`GameSession::step`], and
//! draws the returned [`Snapshot`].
//!
//! ```
//! use std::time::Duration;
//! use voxtris::{GameConfig, GameSession, Intent, Mode};
//!
//! let mut session = GameSession::new(&GameConfig::default()).unwrap();
//! let snapshot = session.step(Duration::ZERO, &[Intent::Start]);
//! assert_eq!(snapshot.mode, Mode::Playing);
//! assert!(snapshot.piece.is_some());
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod orientation;
pub mod piece;
pub mod position;
pub mod shape;
pub mod templates;

pub use config::GameConfig;
pub use error::{ConfigError, TemplateError};
pub use game::{
    GameEvent, GameSession, Intent, Mode, PiecePose, RandomShapeProvider, SequenceShapeProvider,
    ShapeProvider, Snapshot,
};
pub use grid::OccupancyGrid;
pub use orientation::{rotate, Direction, Orientation, Rotation};
pub use piece::ActivePiece;
pub use position::Position;
pub use shape::{MassType, OrientedShape, ShapeTemplate, VoxelShape};
