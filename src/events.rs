use crate::ScreenSize;
use crate::coord::ScreenPos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Symbolic commands consumed by the [`Controller`](crate::controller::Controller). Key bindings
/// live in [`input`](crate::input).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Pan the viewport by one cell
    Move(Direction),

    /// Advance the board by one generation, paused or not
    Step,

    /// Timer driven step. Ignored while paused
    Tick,

    /// Flip the cell under this screen position
    ToggleCell(ScreenPos),

    /// Pause or resume ticking
    TogglePause,

    /// Bring the viewport back to the origin
    ResetView,

    /// The visible area changed. Sizes are in cells, not terminal characters
    Resize {
        width: ScreenSize,
        height: ScreenSize,
    },

    /// Exit the application
    Quit,
}
