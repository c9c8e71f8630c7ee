use serde::{Deserialize, Serialize};

/// Single coordinate axis used for grid counts and positions.
pub type Coord = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// One of the eight compass moves; there is no "stay" direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    UpLeft,
    Up,
    UpRight,
    Left,
    Right,
    DownLeft,
    Down,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
        Direction::Left,
        Direction::Right,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ];

    pub const fn delta(self) -> (i8, i8) {
        use Direction::*;
        match self {
            UpLeft => (-1, -1),
            Up => (0, -1),
            UpRight => (1, -1),
            Left => (-1, 0),
            Right => (1, 0),
            DownLeft => (-1, 1),
            Down => (0, 1),
            DownRight => (1, 1),
        }
    }
}

/// Moves one axis by `delta`, saturating at `0` and `max`.
const fn clamp_axis(value: Coord, delta: i8, max: Coord) -> Coord {
    let moved = value.saturating_add_signed(delta as i16);
    if moved > max { max } else { moved }
}

/// Applies `direction` to `coords` and clamps each axis into `[0, grid_count - 1]`.
///
/// Movement absorbed by an edge is dropped rather than wrapped or reflected, so at a corner several
/// directions collapse onto `coords` itself.
pub const fn neighbor(coords: Coord2, direction: Direction, grid_count: Coord) -> Coord2 {
    let max = grid_count.saturating_sub(1);
    let (dx, dy) = direction.delta();
    (clamp_axis(coords.0, dx, max), clamp_axis(coords.1, dy, max))
}

pub const fn in_bounds(coords: Coord2, grid_count: Coord) -> bool {
    coords.0 < grid_count && coords.1 < grid_count
}
