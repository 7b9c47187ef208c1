use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::orientation::{rotate, Direction, Orientation, Rotation};
use crate::position::Position;

/// Template character for an occupied cell.
pub const MASS_CELL: char = '#';
/// Template character for the occupied anchor cell.
pub const ANCHOR_CELL: char = 'o';

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum MassType {
    #[default]
    Empty,
    Mass,
}

// ============================================================================
// ShapeTemplate
// ============================================================================

/// Text description of a shape.
///
/// `layers[0]` is the bottom layer. Within a layer, each line is a row along
/// `z` and each character a cell along `x`. `#` is mass, `o` is mass and the
/// anchor, anything else is empty. Ragged rows and layers are padded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeTemplate {
    pub name: String,
    pub layers: Vec<String>,
}

impl ShapeTemplate {
    pub fn new<S: Into<String>>(name: impl Into<String>, layers: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            layers: layers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(&self) -> Result<VoxelShape, TemplateError> {
        VoxelShape::parse(self)
    }
}

// ============================================================================
// VoxelShape
// ============================================================================

/// Immutable voxel occupancy of a shape in its unrotated pose.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelShape {
    name: String,
    size: Position,
    origin: Position,
    cells: Vec<MassType>,
}

impl VoxelShape {
    pub fn parse(template: &ShapeTemplate) -> Result<Self, TemplateError> {
        if template.layers.is_empty() {
            return Err(TemplateError::Empty);
        }

        let layers: Vec<Vec<Vec<char>>> = template
            .layers
            .iter()
            .map(|layer| layer.lines().map(|row| row.chars().collect()).collect())
            .collect();

        let size = Position::new(
            layers
                .iter()
                .flat_map(|rows| rows.iter().map(Vec::len))
                .max()
                .unwrap_or(0) as i32,
            layers.len() as i32,
            layers.iter().map(Vec::len).max().unwrap_or(0) as i32,
        );

        let mut shape = VoxelShape {
            name: template.name.clone(),
            size,
            origin: Position::ZERO,
            cells: vec![MassType::Empty; (size.x * size.y * size.z) as usize],
        };

        let mut anchors = Vec::new();
        for (y, rows) in layers.iter().enumerate() {
            for (z, row) in rows.iter().enumerate() {
                for (x, &c) in row.iter().enumerate() {
                    let pos = Position::new(x as i32, y as i32, z as i32);
                    let mass = match c {
                        MASS_CELL => MassType::Mass,
                        ANCHOR_CELL => {
                            anchors.push(pos);
                            MassType::Mass
                        }
                        _ => MassType::Empty,
                    };
                    let idx = shape.index(pos);
                    shape.cells[idx] = mass;
                }
            }
        }

        shape.origin = match anchors.as_slice() {
            [] => return Err(TemplateError::NoAnchor),
            [origin] => *origin,
            many => return Err(TemplateError::MultipleAnchors { count: many.len() }),
        };

        Ok(shape)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Position {
        self.size
    }

    /// The anchor cell in local coordinates.
    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn contains(&self, local: Position) -> bool {
        (0..self.size.x).contains(&local.x)
            && (0..self.size.y).contains(&local.y)
            && (0..self.size.z).contains(&local.z)
    }

    /// Callers must check [`VoxelShape::contains`] first.
    pub fn cell(&self, local: Position) -> MassType {
        debug_assert!(self.contains(local), "{local:?} outside shape of size {:?}", self.size);
        self.cells[self.index(local)]
    }

    /// Local coordinates of every occupied cell.
    pub fn voxels(&self) -> impl Iterator<Item = Position> + '_ {
        let size = self.size;
        (0..size.y)
            .flat_map(move |y| (0..size.z).flat_map(move |z| (0..size.x).map(move |x| Position::new(x, y, z))))
            .filter(|&p| self.cell(p) == MassType::Mass)
    }

    pub fn voxel_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == MassType::Mass).count()
    }

    fn index(&self, p: Position) -> usize {
        (p.x + self.size.x * (p.z + self.size.z * p.y)) as usize
    }
}

// ============================================================================
// OrientedShape
// ============================================================================

/// A shared [`VoxelShape`] seen through the rotation a piece has accumulated.
///
/// `min_pos`/`max_pos` bound the shape relative to its anchor, upper bound
/// exclusive. The voxel data itself never changes.
#[derive(Clone, Debug)]
pub struct OrientedShape {
    shape: Arc<VoxelShape>,
    orientation: Orientation,
    rotation: Rotation,
    min_pos: Position,
    max_pos: Position,
}

impl OrientedShape {
    pub fn new(shape: Arc<VoxelShape>) -> Self {
        let origin = shape.origin();
        let size = shape.size();
        Self {
            shape,
            orientation: Orientation::default(),
            rotation: Rotation::IDENTITY,
            min_pos: -origin,
            max_pos: size - origin,
        }
    }

    pub fn shape(&self) -> &VoxelShape {
        &self.shape
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn min_pos(&self) -> Position {
        self.min_pos
    }

    pub fn max_pos(&self) -> Position {
        self.max_pos
    }

    pub fn extent(&self) -> Position {
        self.max_pos - self.min_pos
    }

    /// Offset of a local voxel from the anchor, in the current pose.
    pub fn to_world_offset(&self, local: Position) -> Position {
        self.rotation.apply(local - self.shape.origin())
    }

    /// Anchor-relative offsets of every occupied voxel in the current pose.
    pub fn offsets(&self) -> impl Iterator<Item = Position> + '_ {
        self.shape.voxels().map(|local| self.to_world_offset(local))
    }

    pub fn rotate_forward(&mut self, is_left: bool) {
        let axis = self.orientation.up();
        self.orientation = self.orientation.rotate_forward(is_left);
        self.turn(axis, Orientation::forward_turn_degrees(is_left));
    }

    pub fn rotate_up(&mut self, is_left: bool) {
        let axis = self.orientation.forward();
        self.orientation = self.orientation.rotate_up(is_left);
        self.turn(axis, Orientation::up_turn_degrees(is_left));
    }

    fn turn(&mut self, axis: Direction, degrees: f32) {
        let a = rotate(self.min_pos, degrees, axis);
        let b = rotate(self.max_pos - Position::ONE, degrees, axis);
        self.min_pos = a.min(b);
        self.max_pos = a.max(b) + Position::ONE;
        self.rotation = self.rotation.then(Rotation::about(axis, degrees));
    }
}
