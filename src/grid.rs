use crate::position::Position;
use crate::shape::MassType;

/// Fixed-size volume of settled mass.
///
/// Cells are stored layer by layer so a horizontal layer is one contiguous
/// slice, which keeps fullness tests and layer shifts to slice operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    size: Position,
    cells: Vec<MassType>,
}

impl OccupancyGrid {
    /// Panics if any dimension is not positive; sessions validate sizes first.
    pub fn new(size: Position) -> Self {
        assert!(
            size.x > 0 && size.y > 0 && size.z > 0,
            "grid dimensions must be positive, got {size:?}"
        );
        Self {
            size,
            cells: vec![MassType::Empty; (size.x * size.y * size.z) as usize],
        }
    }

    pub fn size(&self) -> Position {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.size.x).contains(&pos.x)
            && (0..self.size.y).contains(&pos.y)
            && (0..self.size.z).contains(&pos.z)
    }

    /// Callers must check [`OccupancyGrid::contains`] first.
    pub fn cell(&self, pos: Position) -> MassType {
        debug_assert!(self.contains(pos), "{pos:?} outside grid of size {:?}", self.size);
        self.cells[self.index(pos)]
    }

    /// Callers must check [`OccupancyGrid::contains`] first.
    pub fn set_cell(&mut self, pos: Position, value: MassType) {
        debug_assert!(self.contains(pos), "{pos:?} outside grid of size {:?}", self.size);
        let idx = self.index(pos);
        self.cells[idx] = value;
    }

    /// Bounds-checked read, `None` outside the grid.
    pub fn get(&self, pos: Position) -> Option<MassType> {
        self.contains(pos).then(|| self.cells[self.index(pos)])
    }

    pub fn is_mass(&self, pos: Position) -> bool {
        self.get(pos) == Some(MassType::Mass)
    }

    pub fn is_layer_full(&self, y: i32) -> bool {
        match self.layer(y) {
            Some(cells) => cells.iter().all(|&c| c == MassType::Mass),
            None => false,
        }
    }

    /// Empties layer `y` and shifts every layer above it down by one.
    /// Returns `false` if `y` is outside the grid.
    pub fn remove_layer(&mut self, y: i32) -> bool {
        if !(0..self.size.y).contains(&y) {
            return false;
        }

        let layer_len = self.layer_len();
        let start = y as usize * layer_len;
        self.cells.copy_within(start + layer_len.., start);
        let top = self.cells.len() - layer_len;
        self.cells[top..].fill(MassType::Empty);
        true
    }

    /// Removes every full layer, bottom-up, and returns how many were removed.
    ///
    /// After a removal the same index is checked again, since the layer that
    /// fell into it may be full as well.
    pub fn clear_full_layers(&mut self) -> u32 {
        let mut removed = 0;
        let mut y = 0;
        while y < self.size.y {
            if self.is_layer_full(y) {
                self.remove_layer(y);
                removed += 1;
            } else {
                y += 1;
            }
        }
        removed
    }

    pub fn clear(&mut self) {
        self.cells.fill(MassType::Empty);
    }

    /// Cells of layer `y` in `z`-major order, `None` outside the grid.
    pub fn layer(&self, y: i32) -> Option<&[MassType]> {
        if !(0..self.size.y).contains(&y) {
            return None;
        }
        let layer_len = self.layer_len();
        let start = y as usize * layer_len;
        Some(&self.cells[start..start + layer_len])
    }

    pub fn filled_count_in_layer(&self, y: i32) -> usize {
        self.layer(y)
            .map(|cells| cells.iter().filter(|&&c| c == MassType::Mass).count())
            .unwrap_or(0)
    }

    pub fn total_filled_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c == MassType::Mass).count()
    }

    /// Height of the column at `(x, z)`: one above its highest mass, 0 if empty.
    pub fn column_height(&self, x: i32, z: i32) -> i32 {
        (0..self.size.y)
            .rev()
            .find(|&y| self.is_mass(Position::new(x, y, z)))
            .map_or(0, |y| y + 1)
    }

    fn layer_len(&self) -> usize {
        (self.size.x * self.size.z) as usize
    }

    fn index(&self, p: Position) -> usize {
        (p.x + self.size.x * (p.z + self.size.z * p.y)) as usize
    }
}
