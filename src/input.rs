use crossterm::event::Event as CtEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseButton;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use tracing::trace;

use crate::coord::ScreenPos;
use crate::events::Direction;
use crate::events::Event;
use crate::render::RenderMode;

/// Converts a crossterm event into a life event.
///
/// `mode` decides how terminal characters map onto cells, for mouse clicks and resizes. Events
/// without a binding produce `None`.
pub fn convert_event(event: CtEvent, mode: RenderMode) -> Option<Event> {
    let (cw, ch) = mode.cells_per_char();

    let res = match &event {
        CtEvent::Key(key_event) => convert_key(*key_event),
        CtEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => Some(Event::ToggleCell(ScreenPos {
            col: column.saturating_mul(cw),
            row: row.saturating_mul(ch),
        })),
        CtEvent::Resize(cols, rows) => Some(Event::Resize {
            width: cols.saturating_mul(cw),
            height: rows.saturating_mul(ch),
        }),
        _ => None,
    };

    trace!(?event, ?res, "converted terminal event");

    res
}

fn convert_key(key_event: KeyEvent) -> Option<Event> {
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    match key_event {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
        | KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            ..
        } => Some(Event::Quit),
        KeyEvent {
            code: KeyCode::Char('h') | KeyCode::Left,
            ..
        } => Some(Event::Move(Direction::Left)),
        KeyEvent {
            code: KeyCode::Char('j') | KeyCode::Down,
            ..
        } => Some(Event::Move(Direction::Down)),
        KeyEvent {
            code: KeyCode::Char('k') | KeyCode::Up,
            ..
        } => Some(Event::Move(Direction::Up)),
        KeyEvent {
            code: KeyCode::Char('l') | KeyCode::Right,
            ..
        } => Some(Event::Move(Direction::Right)),
        KeyEvent {
            code: KeyCode::Char('n' | '.'),
            ..
        } => Some(Event::Step),
        KeyEvent {
            code: KeyCode::Char(' ' | 'p'),
            ..
        } => Some(Event::TogglePause),
        KeyEvent {
            code: KeyCode::Char('0'),
            ..
        } => Some(Event::ResetView),
        _ => None,
    }
}
