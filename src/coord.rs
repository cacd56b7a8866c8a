use std::fmt;

use crate::ScreenSize;
use crate::WorldOffset;

/// Offsets of the Moore neighborhood, row by row, excluding the center.
const MOORE: [(WorldOffset, WorldOffset); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A cell on the infinite plane. `x` grows to the right, `y` grows downwards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: WorldOffset,
    pub y: WorldOffset,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub const fn new(x: WorldOffset, y: WorldOffset) -> Self {
        Self { x, y }
    }

    /// Shift by `(dx, dy)`, or `None` if the result leaves the representable plane.
    pub const fn checked_shift(self, dx: WorldOffset, dy: WorldOffset) -> Option<Self> {
        let Some(x) = self.x.checked_add(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add(dy) else {
            return None;
        };

        Some(Self { x, y })
    }

    /// Like `checked_shift`, but clamps at the edges of the representable plane.
    pub const fn saturating_shift(self, dx: WorldOffset, dy: WorldOffset) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// The (up to) 8 cells surrounding this one.
    ///
    /// Neighbors past `WorldOffset::MIN` or `WorldOffset::MAX` don't exist and are skipped, so
    /// cells on the very edge of the plane have fewer than 8 neighbors.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        MOORE
            .into_iter()
            .filter_map(move |(dx, dy)| self.checked_shift(dx, dy))
    }
}

impl From<(WorldOffset, WorldOffset)> for Coord {
    fn from((x, y): (WorldOffset, WorldOffset)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A cell position relative to the top-left corner of the viewport.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenPos {
    pub col: ScreenSize,
    pub row: ScreenSize,
}

impl ScreenPos {
    pub const fn new(col: ScreenSize, row: ScreenSize) -> Self {
        Self { col, row }
    }
}

/// Half-open rectangle of world cells, `[x0, x1) x [y0, y1)`.
///
/// Bounds are kept one bit wider than a coordinate so the last column and row of the plane can
/// still be inside a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    x0: i128,
    x1: i128,
    y0: i128,
    y1: i128,
}

impl Region {
    pub const fn new(x0: WorldOffset, x1: WorldOffset, y0: WorldOffset, y1: WorldOffset) -> Self {
        Self {
            x0: x0 as i128,
            x1: x1 as i128,
            y0: y0 as i128,
            y1: y1 as i128,
        }
    }

    /// The `width x height` cells whose top-left corner is `origin`.
    pub const fn from_origin(origin: Coord, width: u64, height: u64) -> Self {
        let (x0, y0) = (origin.x as i128, origin.y as i128);

        Self {
            x0,
            x1: x0 + width as i128,
            y0,
            y1: y0 + height as i128,
        }
    }

    pub const fn contains(&self, c: Coord) -> bool {
        let (x, y) = (c.x as i128, c.y as i128);

        self.x0 <= x && x < self.x1 && self.y0 <= y && y < self.y1
    }

    pub const fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Number of cells covered. Computed in `u128` since a region can span the whole plane.
    pub const fn area(&self) -> u128 {
        if self.is_empty() {
            return 0;
        }

        (self.x1 - self.x0) as u128 * (self.y1 - self.y0) as u128
    }

    /// Every cell of the region in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Coord> {
        let Region { x0, x1, y0, y1 } = self;

        // Both ends are clamped to the plane, so every value of the ranges is a valid coordinate
        let clamp = |v: i128| v.clamp(WorldOffset::MIN as i128, WorldOffset::MAX as i128 + 1);
        let (x0, x1, y0, y1) = (clamp(x0), clamp(x1), clamp(y0), clamp(y1));

        (y0..y1).flat_map(move |y| {
            (x0..x1).map(move |x| Coord {
                x: x as WorldOffset,
                y: y as WorldOffset,
            })
        })
    }
}
