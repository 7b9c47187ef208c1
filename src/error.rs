use std::path::PathBuf;

use thiserror::Error;

use crate::position::Position;

/// A shape template that cannot become a [`VoxelShape`](crate::shape::VoxelShape).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template has no layers")]
    Empty,
    #[error("template has no anchor cell ('o')")]
    NoAnchor,
    #[error("template has {count} anchor cells, expected exactly one")]
    MultipleAnchors { count: usize },
}

/// Rejected session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive and addressable, got {0:?}")]
    InvalidGridSize(Position),
    #[error("drop interval must be a positive number of seconds, got {0}")]
    InvalidDropInterval(f64),
    #[error("game-over wait must be zero or more seconds, got {0}")]
    InvalidGameOverWait(f64),
    #[error("spawn anchor {anchor:?} is not inside or just above a grid of size {size:?}")]
    SpawnOutsideGrid { anchor: Position, size: Position },
    #[error("template set is empty")]
    NoTemplates,
    #[error("template '{name}' is malformed: {source}")]
    Template {
        name: String,
        #[source]
        source: TemplateError,
    },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
