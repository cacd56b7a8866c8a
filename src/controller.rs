use tracing::debug;
use tracing::info;

use crate::board::Board;
use crate::coord::ScreenPos;
use crate::events::Event;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,

    /// Terminal. No event is processed past this point
    Stopped,
}

/// Drives a [`Board`] from screen-relative events and reports what is visible through a
/// [`Viewport`].
#[derive(Debug, Clone)]
pub struct Controller {
    board: Board,
    viewport: Viewport,
    state: State,

    /// Whether `Tick` events are ignored
    paused: bool,

    /// Number of generations computed so far
    generation: u64,
}

impl Controller {
    pub fn new(board: Board, viewport: Viewport) -> Self {
        Self {
            board,
            viewport,
            state: State::Running,
            paused: false,
            generation: 0,
        }
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Process a single event, returning the state afterwards.
    pub fn handle(&mut self, event: Event) -> State {
        if self.state == State::Stopped {
            return self.state;
        }

        match event {
            Event::Move(direction) => {
                self.viewport.pan(direction);
                debug!(offset = %self.viewport.offset(), "moved viewport");
            }
            Event::Step => self.step(),
            Event::Tick => {
                if !self.paused {
                    self.step();
                }
            }
            Event::ToggleCell(s) => {
                let Some(w) = self.viewport.world_from_screen(s) else {
                    debug!(col = s.col, row = s.row, "ignored toggle outside the viewport");
                    return self.state;
                };

                let alive = self.board.toggle(w);
                debug!(cell = %w, alive, "toggled cell");
            }
            Event::TogglePause => {
                self.paused = !self.paused;
                info!(paused = self.paused, generation = self.generation, "toggled pause");
            }
            Event::ResetView => self.viewport.reset(),
            Event::Resize { width, height } => {
                self.viewport.resize(width, height);
                debug!(width, height, "resized viewport");
            }
            Event::Quit => {
                info!(
                    generation = self.generation,
                    population = self.board.population(),
                    "quitting"
                );
                self.state = State::Stopped;
            }
        }

        self.state
    }

    pub fn step(&mut self) {
        self.board.step();
        self.generation += 1;

        debug!(
            generation = self.generation,
            population = self.board.population(),
            "advanced generation"
        );
    }

    /// Screen positions of every live cell in view. All other positions are dead.
    pub fn visible_cells(&self) -> Vec<ScreenPos> {
        let region = self.viewport.region();

        self.board
            .alive_cells_in(&region)
            .into_iter()
            .filter_map(|w| self.viewport.screen_from_world(w))
            .collect()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::Controller;
    use super::State;
    use crate::board::Board;
    use crate::coord::Coord;
    use crate::coord::ScreenPos;
    use crate::events::Direction;
    use crate::events::Event;
    use crate::viewport::Viewport;

    fn blinker() -> Controller {
        let board = [(0, 1), (1, 1), (2, 1)]
            .into_iter()
            .map(Coord::from)
            .collect::<Board>();

        Controller::new(board, Viewport::new(5, 5))
    }

    #[test]
    fn starts_running() {
        let c = blinker();

        assert_eq!(c.state(), State::Running);
        assert!(!c.is_paused());
        assert_eq!(c.generation(), 0);
    }

    #[test]
    fn step_advances_board() {
        let mut c = blinker();

        assert_eq!(c.handle(Event::Step), State::Running);
        assert_eq!(c.generation(), 1);
        assert!(c.board().is_alive(Coord::new(1, 0)));
        assert!(c.board().is_alive(Coord::new(1, 2)));
        assert!(!c.board().is_alive(Coord::new(0, 1)));
    }

    #[test]
    fn pause_gates_ticks_but_not_steps() {
        let mut c = blinker().paused(true);

        c.handle(Event::Tick);
        assert_eq!(c.generation(), 0);

        c.handle(Event::Step);
        assert_eq!(c.generation(), 1);

        c.handle(Event::TogglePause);
        c.handle(Event::Tick);
        assert_eq!(c.generation(), 2);
    }

    #[test]
    fn toggle_uses_offset() {
        let mut c = blinker();
        c.handle(Event::Move(Direction::Left));
        c.handle(Event::Move(Direction::Up));

        c.handle(Event::ToggleCell(ScreenPos::new(0, 0)));
        assert!(c.board().is_alive(Coord::new(-1, -1)));

        c.handle(Event::ToggleCell(ScreenPos::new(0, 0)));
        assert!(!c.board().is_alive(Coord::new(-1, -1)));
    }

    #[test]
    fn visible_cells_are_screen_relative() {
        let mut c = blinker();
        assert_eq!(
            c.visible_cells(),
            vec![ScreenPos::new(0, 1), ScreenPos::new(1, 1), ScreenPos::new(2, 1)]
        );

        c.handle(Event::Move(Direction::Right));
        assert_eq!(
            c.visible_cells(),
            vec![ScreenPos::new(0, 1), ScreenPos::new(1, 1)]
        );

        c.handle(Event::ResetView);
        c.handle(Event::Resize { width: 2, height: 2 });
        assert_eq!(
            c.visible_cells(),
            vec![ScreenPos::new(0, 1), ScreenPos::new(1, 1)]
        );
    }

    #[test]
    fn toggle_outside_the_viewport_is_ignored() {
        let mut c = blinker();

        c.handle(Event::ToggleCell(ScreenPos::new(5, 0)));
        assert_eq!(c.board().population(), 3);
    }

    #[test]
    fn cells_on_the_edge_of_the_plane_are_visible() {
        let board = [(i64::MAX, 0)].into_iter().map(Coord::from).collect::<Board>();
        let viewport = Viewport::new(5, 1).with_offset(Coord::new(i64::MAX - 2, 0));
        let mut c = Controller::new(board, viewport);

        // the viewport parks against the edge, keeping the whole screen on the plane
        assert_eq!(c.viewport().offset(), Coord::new(i64::MAX - 4, 0));
        assert_eq!(c.visible_cells(), vec![ScreenPos::new(4, 0)]);

        c.handle(Event::Move(Direction::Right));
        assert_eq!(c.visible_cells(), vec![ScreenPos::new(4, 0)]);

        c.handle(Event::ToggleCell(ScreenPos::new(4, 0)));
        assert!(c.board().is_empty());
    }

    #[test]
    fn quit_is_terminal() {
        let mut c = blinker();

        assert_eq!(c.handle(Event::Quit), State::Stopped);
        assert!(!c.is_running());

        assert_eq!(c.handle(Event::Step), State::Stopped);
        assert_eq!(c.handle(Event::Move(Direction::Down)), State::Stopped);
        assert_eq!(c.generation(), 0);
        assert_eq!(c.viewport().offset(), Coord::ORIGIN);
    }
}
