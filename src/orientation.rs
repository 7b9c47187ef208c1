use crate::position::Position;

// ============================================================================
// Direction
// ============================================================================

/// One of the six face directions of a voxel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    Forward,
    Back,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
        Direction::Forward,
        Direction::Back,
    ];

    /// Unit vector of the face: x grows to the right, y grows up, z grows forward.
    pub const fn vector(self) -> Position {
        match self {
            Direction::Left => Position::new(-1, 0, 0),
            Direction::Right => Position::new(1, 0, 0),
            Direction::Up => Position::new(0, 1, 0),
            Direction::Down => Position::new(0, -1, 0),
            Direction::Forward => Position::new(0, 0, 1),
            Direction::Back => Position::new(0, 0, -1),
        }
    }

    pub const fn from_vector(v: Position) -> Option<Direction> {
        match (v.x, v.y, v.z) {
            (-1, 0, 0) => Some(Direction::Left),
            (1, 0, 0) => Some(Direction::Right),
            (0, 1, 0) => Some(Direction::Up),
            (0, -1, 0) => Some(Direction::Down),
            (0, 0, 1) => Some(Direction::Forward),
            (0, 0, -1) => Some(Direction::Back),
            _ => None,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Forward => Direction::Back,
            Direction::Back => Direction::Forward,
        }
    }

    /// Cross product of the two unit vectors, `None` when they are parallel.
    pub const fn cross(self, other: Direction) -> Option<Direction> {
        let a = self.vector();
        let b = other.vector();
        Direction::from_vector(Position::new(
            a.y * b.z - a.z * b.y,
            a.z * b.x - a.x * b.z,
            a.x * b.y - a.y * b.x,
        ))
    }

    pub fn is_perpendicular(self, other: Direction) -> bool {
        self != other && self != other.opposite()
    }

    const fn index(self) -> usize {
        self as usize
    }
}

// `CROSS[a][b]` is `a x b`. Parallel pairs never occur in a valid orientation
// and hold `a` as a filler.
const CROSS: [[Direction; 6]; 6] = cross_table();

const fn cross_table() -> [[Direction; 6]; 6] {
    let mut table = [[Direction::Left; 6]; 6];
    let mut a = 0;
    while a < 6 {
        let mut b = 0;
        while b < 6 {
            table[a][b] = match Direction::ALL[a].cross(Direction::ALL[b]) {
                Some(d) => d,
                None => Direction::ALL[a],
            };
            b += 1;
        }
        a += 1;
    }
    table
}

// ============================================================================
// Lattice rotation
// ============================================================================

/// Rotates `point` by `degrees` about the face axis `axis` and snaps the
/// result back onto the lattice.
///
/// Quarter turns are exact in theory; the snap only absorbs floating-point
/// error. Components are rounded half away from zero.
pub fn rotate(point: Position, degrees: f32, axis: Direction) -> Position {
    let k = axis.vector();
    let (kx, ky, kz) = (k.x as f64, k.y as f64, k.z as f64);
    let (vx, vy, vz) = (point.x as f64, point.y as f64, point.z as f64);
    let (sin, cos) = (degrees as f64).to_radians().sin_cos();

    // Rodrigues: v cos + (k x v) sin + k (k . v)(1 - cos)
    let dot = kx * vx + ky * vy + kz * vz;
    let (cx, cy, cz) = (ky * vz - kz * vy, kz * vx - kx * vz, kx * vy - ky * vx);
    let rx = vx * cos + cx * sin + kx * dot * (1.0 - cos);
    let ry = vy * cos + cy * sin + ky * dot * (1.0 - cos);
    let rz = vz * cos + cz * sin + kz * dot * (1.0 - cos);

    Position::new(snap(rx), snap(ry), snap(rz))
}

fn snap(v: f64) -> i32 {
    if v > 0.0 {
        (v + 0.5) as i32
    } else {
        (v - 0.5) as i32
    }
}

/// Integer rotation matrix built from quarter turns.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rotation {
    rows: [[i32; 3]; 3],
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        rows: [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
    };

    /// Matrix of a turn by `degrees` about `axis`.
    pub fn about(axis: Direction, degrees: f32) -> Rotation {
        let columns = [
            rotate(Position::new(1, 0, 0), degrees, axis).to_array(),
            rotate(Position::new(0, 1, 0), degrees, axis).to_array(),
            rotate(Position::new(0, 0, 1), degrees, axis).to_array(),
        ];
        let mut rows = [[0; 3]; 3];
        for (j, column) in columns.iter().enumerate() {
            for (i, value) in column.iter().enumerate() {
                rows[i][j] = *value;
            }
        }
        Rotation { rows }
    }

    /// `step` applied after `self`.
    pub fn then(self, step: Rotation) -> Rotation {
        let mut rows = [[0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (0..3).map(|k| step.rows[i][k] * self.rows[k][j]).sum();
            }
        }
        Rotation { rows }
    }

    pub fn apply(self, p: Position) -> Position {
        let v = p.to_array();
        let r = |i: usize| -> i32 { (0..3).map(|k| self.rows[i][k] * v[k]).sum() };
        Position::new(r(0), r(1), r(2))
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::IDENTITY
    }
}

// ============================================================================
// Orientation
// ============================================================================

/// The (forward, up) facing of a piece. The two axes are always perpendicular,
/// which leaves 24 reachable values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Orientation {
    forward: Direction,
    up: Direction,
}

impl Orientation {
    pub fn new(forward: Direction, up: Direction) -> Option<Self> {
        forward
            .is_perpendicular(up)
            .then_some(Orientation { forward, up })
    }

    pub fn forward(&self) -> Direction {
        self.forward
    }

    pub fn up(&self) -> Direction {
        self.up
    }

    /// Every valid orientation.
    pub fn all() -> impl Iterator<Item = Orientation> {
        Direction::ALL.into_iter().flat_map(|forward| {
            Direction::ALL
                .into_iter()
                .filter_map(move |up| Orientation::new(forward, up))
        })
    }

    /// Quarter turn of the piece about its `up` axis; `up` is unchanged.
    pub fn rotate_forward(self, is_left: bool) -> Orientation {
        let (f, u) = (self.forward.index(), self.up.index());
        let forward = if is_left { CROSS[f][u] } else { CROSS[u][f] };
        Orientation { forward, up: self.up }
    }

    /// Quarter turn of the piece about its `forward` axis; `forward` is unchanged.
    pub fn rotate_up(self, is_left: bool) -> Orientation {
        let (f, u) = (self.forward.index(), self.up.index());
        let up = if is_left { CROSS[f][u] } else { CROSS[u][f] };
        Orientation {
            forward: self.forward,
            up,
        }
    }

    /// Signed angle, about `up`, matching [`Orientation::rotate_forward`].
    pub const fn forward_turn_degrees(is_left: bool) -> f32 {
        if is_left {
            -90.0
        } else {
            90.0
        }
    }

    /// Signed angle, about `forward`, matching [`Orientation::rotate_up`].
    pub const fn up_turn_degrees(is_left: bool) -> f32 {
        if is_left {
            90.0
        } else {
            -90.0
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation {
            forward: Direction::Forward,
            up: Direction::Up,
        }
    }
}
