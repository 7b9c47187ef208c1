use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::position::Position;
use crate::shape::{ShapeTemplate, VoxelShape};
use crate::templates::default_templates;

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV_VAR: &str = "VOXTRIS_CONFIG";

pub const DEFAULT_GRID_SIZE: Position = Position::new(5, 10, 5);
pub const DEFAULT_SPAWN_ANCHOR: Position = Position::new(2, 11, 2);
pub const DEFAULT_DROP_INTERVAL_SECS: f64 = 1.0;
pub const DEFAULT_GAME_OVER_WAIT_SECS: f64 = 3.0;
pub const DEFAULT_LAYER_BONUS: u32 = 100;

/// Session settings. Every field falls back to its default when absent from
/// the TOML source.
///
/// ```toml
/// grid_size = { x = 5, y = 10, z = 5 }
/// drop_interval_secs = 0.5
///
/// [[templates]]
/// name = "bar"
/// layers = ["#o##"]
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_size: Position,
    pub spawn_anchor: Position,
    pub drop_interval_secs: f64,
    pub game_over_wait_secs: f64,
    pub layer_bonus: u32,
    pub templates: Vec<ShapeTemplate>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            spawn_anchor: DEFAULT_SPAWN_ANCHOR,
            drop_interval_secs: DEFAULT_DROP_INTERVAL_SECS,
            game_over_wait_secs: DEFAULT_GAME_OVER_WAIT_SECS,
            layer_bonus: DEFAULT_LAYER_BONUS,
            templates: default_templates(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Loads the file named by `VOXTRIS_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Checks every setting and returns the parsed template set.
    pub fn validate(&self) -> Result<Vec<Arc<VoxelShape>>, ConfigError> {
        let size = self.grid_size;
        let cells = size
            .x
            .checked_mul(size.y)
            .and_then(|n| n.checked_mul(size.z));
        if size.x <= 0 || size.y <= 0 || size.z <= 0 || cells.is_none() {
            return Err(ConfigError::InvalidGridSize(size));
        }

        if !(self.drop_interval_secs.is_finite() && self.drop_interval_secs > 0.0) {
            return Err(ConfigError::InvalidDropInterval(self.drop_interval_secs));
        }

        if !(self.game_over_wait_secs.is_finite() && self.game_over_wait_secs >= 0.0) {
            return Err(ConfigError::InvalidGameOverWait(self.game_over_wait_secs));
        }

        if self.templates.is_empty() {
            return Err(ConfigError::NoTemplates);
        }

        let shapes = self
            .templates
            .iter()
            .map(|template| {
                template
                    .parse()
                    .map(Arc::new)
                    .map_err(|source| ConfigError::Template {
                        name: template.name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // A piece never reaches further than one shape extent past a wall, and
        // spawns at most that far above the grid.
        let reach = shapes
            .iter()
            .map(|shape| {
                let s = shape.size();
                s.x.max(s.y).max(s.z)
            })
            .max()
            .unwrap_or(0);
        let fits = |dim: i32| {
            reach
                .checked_mul(2)
                .and_then(|margin| dim.checked_add(margin))
                .is_some()
        };
        if !(fits(size.x) && fits(size.y) && fits(size.z)) {
            return Err(ConfigError::InvalidGridSize(size));
        }

        let anchor = self.spawn_anchor;
        let ceiling = size.y + reach;
        if !(0..size.x).contains(&anchor.x)
            || !(0..size.z).contains(&anchor.z)
            || !(0..=ceiling).contains(&anchor.y)
        {
            return Err(ConfigError::SpawnOutsideGrid { anchor, size });
        }

        Ok(shapes)
    }

    pub fn drop_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.drop_interval_secs).unwrap_or_default()
    }

    pub fn game_over_wait(&self) -> Duration {
        Duration::try_from_secs_f64(self.game_over_wait_secs).unwrap_or_default()
    }
}
