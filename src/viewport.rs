use crate::ScreenSize;
use crate::WorldOffset;
use crate::coord::Coord;
use crate::coord::Region;
use crate::coord::ScreenPos;
use crate::events::Direction;

/// World coordinate under screen position `s`, when the screen's top-left cell sits at `offset`.
///
/// `None` if that cell would lie past the edge of the plane.
pub fn world_from_screen(s: ScreenPos, offset: Coord) -> Option<Coord> {
    offset.checked_shift(s.col as WorldOffset, s.row as WorldOffset)
}

/// Screen position of world coordinate `w`, when the screen's top-left cell sits at `offset`.
///
/// `None` if `w` lies above or left of the screen, or further away than any screen can be wide.
pub fn screen_from_world(w: Coord, offset: Coord) -> Option<ScreenPos> {
    let col = w.x.checked_sub(offset.x)?;
    let row = w.y.checked_sub(offset.y)?;

    let col = ScreenSize::try_from(col).ok()?;
    let row = ScreenSize::try_from(row).ok()?;

    Some(ScreenPos { col, row })
}

/// A window onto the infinite plane.
///
/// The viewport owns no cells. It only knows which world coordinate sits at the top-left corner
/// of the screen and how many cells the screen holds.
///
/// The offset is kept far enough from the right and bottom edges of the plane that every cell
/// on screen is a valid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    offset: Coord,

    /// Width in cells
    width: ScreenSize,

    /// Height in cells
    height: ScreenSize,
}

impl Viewport {
    pub fn new(width: ScreenSize, height: ScreenSize) -> Self {
        Self {
            offset: Coord::ORIGIN,
            width,
            height,
        }
    }

    pub fn with_offset(mut self, offset: Coord) -> Self {
        self.offset = offset;
        self.clamp_offset();
        self
    }

    pub fn offset(&self) -> Coord {
        self.offset
    }

    pub fn width(&self) -> ScreenSize {
        self.width
    }

    pub fn height(&self) -> ScreenSize {
        self.height
    }

    pub fn resize(&mut self, width: ScreenSize, height: ScreenSize) {
        self.width = width;
        self.height = height;
        self.clamp_offset();
    }

    /// Pan by `(dx, dy)` cells. Stops at the edges of the representable plane.
    pub fn shift(&mut self, dx: WorldOffset, dy: WorldOffset) {
        self.offset = self.offset.saturating_shift(dx, dy);
        self.clamp_offset();
    }

    /// Pull the offset back until the bottom-right cell of the screen is on the plane.
    fn clamp_offset(&mut self) {
        let max_x = WorldOffset::MAX - self.width.saturating_sub(1) as WorldOffset;
        let max_y = WorldOffset::MAX - self.height.saturating_sub(1) as WorldOffset;

        self.offset = Coord {
            x: self.offset.x.min(max_x),
            y: self.offset.y.min(max_y),
        };
    }

    pub fn pan(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.shift(0, -1),
            Direction::Down => self.shift(0, 1),
            Direction::Left => self.shift(-1, 0),
            Direction::Right => self.shift(1, 0),
        }
    }

    pub fn reset(&mut self) {
        self.offset = Coord::ORIGIN;
    }

    /// The world cells currently on screen
    pub fn region(&self) -> Region {
        Region::from_origin(self.offset, self.width as u64, self.height as u64)
    }

    /// Like [`world_from_screen`], but `None` past the right or bottom edge of the screen.
    pub fn world_from_screen(&self, s: ScreenPos) -> Option<Coord> {
        if s.col >= self.width || s.row >= self.height {
            return None;
        }

        world_from_screen(s, self.offset)
    }

    /// Like [`screen_from_world`], but also `None` past the right or bottom edge of the screen.
    pub fn screen_from_world(&self, w: Coord) -> Option<ScreenPos> {
        screen_from_world(w, self.offset).filter(|s| s.col < self.width && s.row < self.height)
    }
}
