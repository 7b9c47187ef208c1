use std::sync::Arc;

use crate::grid::OccupancyGrid;
use crate::orientation::Orientation;
use crate::position::Position;
use crate::shape::{MassType, OrientedShape, VoxelShape};

/// The falling piece: an oriented shape with its anchor at `pos` in grid
/// coordinates.
#[derive(Clone, Debug)]
pub struct ActivePiece {
    shape: OrientedShape,
    pos: Position,
}

impl ActivePiece {
    pub fn new(shape: Arc<VoxelShape>, pos: Position) -> Self {
        Self {
            shape: OrientedShape::new(shape),
            pos,
        }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn shape(&self) -> &OrientedShape {
        &self.shape
    }

    pub fn name(&self) -> &str {
        self.shape.shape().name()
    }

    pub fn orientation(&self) -> Orientation {
        self.shape.orientation()
    }

    /// Lower corner of the bounding box in grid coordinates.
    pub fn min_pos(&self) -> Position {
        self.pos + self.shape.min_pos()
    }

    /// Exclusive upper corner of the bounding box in grid coordinates.
    pub fn max_pos(&self) -> Position {
        self.pos + self.shape.max_pos()
    }

    /// Grid coordinates of every occupied voxel.
    pub fn voxels(&self) -> impl Iterator<Item = Position> + '_ {
        self.shape.offsets().map(move |offset| offset + self.pos)
    }

    /// Whether the piece shifted by `offset` would breach the floor or overlap
    /// settled mass. Voxels outside the grid never overlap anything.
    pub fn is_touching(&self, grid: &OccupancyGrid, offset: Position) -> bool {
        if self.min_pos().y + offset.y < 0 {
            return true;
        }
        self.voxels().any(|p| grid.is_mass(p + offset))
    }

    /// Moves by `delta`, shrunk so the bounding box stays inside the grid
    /// horizontally. A move that would overlap mass is rejected.
    /// Returns whether the anchor changed.
    pub fn move_by(&mut self, grid: &OccupancyGrid, delta: Position) -> bool {
        if self.is_touching(grid, delta) {
            return false;
        }

        let clamped = self.clamp_delta(grid, delta);
        if clamped != delta && self.is_touching(grid, clamped) {
            return false;
        }

        let size = grid.size();
        let mut pos = self.pos + clamped;
        pos.x = pos.x.clamp(0, size.x - 1);
        pos.z = pos.z.clamp(0, size.z - 1);

        let moved = pos != self.pos;
        self.pos = pos;
        moved
    }

    /// Lowers the anchor by one layer. The caller checks for contact first.
    pub fn drop_one(&mut self) {
        self.pos = self.pos.down(1);
    }

    pub fn raise_one(&mut self) {
        self.pos = self.pos.up(1);
    }

    /// Pulls the bounding box inside the grid horizontally, ignoring mass.
    pub fn settle(&mut self, grid: &OccupancyGrid) {
        self.pos += self.clamp_delta(grid, Position::ZERO);
    }

    /// Turns the piece about its up axis. Rolled back if the new pose
    /// collides; returns whether the turn was kept.
    pub fn rotate_forward(&mut self, grid: &OccupancyGrid, is_left: bool) -> bool {
        self.shape.rotate_forward(is_left);
        if self.settle_after_turn(grid) {
            return true;
        }
        self.shape.rotate_forward(!is_left);
        false
    }

    /// Turns the piece about its forward axis. Rolled back if the new pose
    /// collides; returns whether the turn was kept.
    pub fn rotate_up(&mut self, grid: &OccupancyGrid, is_left: bool) -> bool {
        self.shape.rotate_up(is_left);
        if self.settle_after_turn(grid) {
            return true;
        }
        self.shape.rotate_up(!is_left);
        false
    }

    /// Writes the piece's voxels into `grid` as mass, or as empty when
    /// `erase` is set. Voxels outside the grid are skipped.
    pub fn fill_into(&self, grid: &mut OccupancyGrid, erase: bool) {
        let value = if erase { MassType::Empty } else { MassType::Mass };
        for p in self.voxels() {
            if grid.contains(p) {
                grid.set_cell(p, value);
            }
        }
    }

    // A turn near a wall may push the box out sideways; shift it back in,
    // unless the shifted pose collides.
    fn settle_after_turn(&mut self, grid: &OccupancyGrid) -> bool {
        let kick = self.clamp_delta(grid, Position::ZERO);
        if self.is_touching(grid, kick) {
            return false;
        }
        self.pos += kick;
        true
    }

    fn clamp_delta(&self, grid: &OccupancyGrid, mut delta: Position) -> Position {
        let size = grid.size();
        let min = self.min_pos();
        let max = self.max_pos();

        if min.x + delta.x < 0 {
            delta.x = -min.x;
        }
        if min.z + delta.z < 0 {
            delta.z = -min.z;
        }
        if max.x + delta.x > size.x {
            delta.x = size.x - max.x;
        }
        if max.z + delta.z > size.z {
            delta.z = size.z - max.z;
        }
        delta
    }
}
