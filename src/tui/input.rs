// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (e.g. selection
// movement, scrolling, filtering, scoring edits).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::data::directory::Position;
use crate::protocol::UserCommand;

/// The ordered list of positions for cycling with the `p` key.
///
/// None -> QB -> RB -> WR -> TE -> None
const POSITION_CYCLE: &[Position] = &[
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
];

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator (e.g. ViewPlayer, Quit). Returns `None` when the key
/// press was handled locally by mutating `ViewState` (e.g. selection
/// movement, scrolling, filtering).
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // Quit confirmation mode: only y/q confirm, n/Esc cancel, everything else blocked
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    // Filter mode: capture printable characters and special keys
    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    // Scoring edit mode: capture text for the active weight field
    if view_state.scoring_edit.is_some() {
        return handle_scoring_edit(key_event, view_state);
    }

    // Normal mode key dispatch
    match key_event.code {
        // Selection movement in the player list
        KeyCode::Up | KeyCode::Char('k') => {
            move_selection(view_state, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            move_selection(view_state, -(page_size() as isize));
            None
        }
        KeyCode::PageDown => {
            move_selection(view_state, page_size() as isize);
            None
        }

        // View request for whatever is highlighted. With no highlight this
        // carries the empty key, which resolves to "no selection".
        KeyCode::Enter => Some(UserCommand::ViewPlayer {
            key: view_state.selected_key(),
        }),

        // Season table scrolling
        KeyCode::Char('[') => {
            seasons_scroll_up(view_state, 1);
            None
        }
        KeyCode::Char(']') => {
            seasons_scroll_down(view_state, 1);
            None
        }

        // Filter mode entry
        KeyCode::Char('/') => {
            view_state.filter_mode = true;
            None
        }

        // Escape: clear both filters
        KeyCode::Esc => {
            view_state.filter_text.clear();
            view_state.position_filter = None;
            view_state.selected = None;
            None
        }

        // Position filter cycling
        KeyCode::Char('p') => {
            cycle_position_filter(view_state);
            None
        }

        // Scoring weight editing
        KeyCode::Char('s') => {
            if !view_state.scoring.is_empty() {
                view_state.scoring_edit = Some(0);
            }
            None
        }

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Handle key events while in quit confirmation mode.
///
/// In quit confirmation mode:
/// - `y` or `q` confirms quit (sends UserCommand::Quit)
/// - `n` or `Esc` cancels (returns to normal mode)
/// - All other keys are blocked (no-op)
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None, // Block all other input
    }
}

/// Handle key events while in filter mode.
///
/// In filter mode:
/// - Printable characters are appended to filter_text
/// - Backspace removes the last character
/// - Enter or Esc exits filter mode
///
/// Every text mutation drops the highlight, since the visible list it
/// indexed into just changed.
fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            // Clear filter text on Esc
            view_state.filter_text.clear();
            view_state.selected = None;
            None
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
            // Keep the filter text on Enter
            None
        }
        KeyCode::Backspace => {
            view_state.filter_text.pop();
            view_state.selected = None;
            None
        }
        KeyCode::Char(c) => {
            view_state.filter_text.push(c);
            view_state.selected = None;
            None
        }
        _ => None,
    }
}

/// Handle key events while editing scoring weights.
///
/// Values are free-form text and never validated here; nothing downstream
/// consumes them, so a stray letter costs nothing.
fn handle_scoring_edit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc | KeyCode::Enter => {
            view_state.scoring_edit = None;
            None
        }
        KeyCode::Tab | KeyCode::Down => {
            scoring_field_next(view_state);
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            scoring_field_prev(view_state);
            None
        }
        KeyCode::Backspace => {
            if let Some(input) = active_scoring_input(view_state) {
                input.value.pop();
            }
            None
        }
        KeyCode::Char(c) => {
            if let Some(input) = active_scoring_input(view_state) {
                input.value.push(c);
            }
            None
        }
        _ => None,
    }
}

/// Cycle the position filter through the defined positions.
///
/// None -> QB -> RB -> WR -> TE -> None
fn cycle_position_filter(view_state: &mut ViewState) {
    view_state.position_filter = match &view_state.position_filter {
        None => Some(POSITION_CYCLE[0]),
        Some(current) => {
            // Find the current position in the cycle
            let idx = POSITION_CYCLE.iter().position(|p| p == current);
            match idx {
                Some(i) if i + 1 < POSITION_CYCLE.len() => Some(POSITION_CYCLE[i + 1]),
                _ => None, // Last position or not found -> wrap to None
            }
        }
    };
    // The visible list just changed shape; the old index points elsewhere.
    view_state.selected = None;
}

/// Move the highlight within the visible (filtered) listings, clamped to
/// the list bounds. From no highlight, any movement lands on the first row.
fn move_selection(view_state: &mut ViewState, delta: isize) {
    let count = view_state.visible_listings().len();
    if count == 0 {
        view_state.selected = None;
        return;
    }
    let next = match view_state.selected {
        None => 0,
        Some(idx) => (idx as isize + delta).clamp(0, count as isize - 1) as usize,
    };
    view_state.selected = Some(next);
}

/// Advance the scoring edit cursor, wrapping past the last field.
fn scoring_field_next(view_state: &mut ViewState) {
    let count = view_state.scoring.len();
    if let Some(idx) = view_state.scoring_edit {
        if count > 0 {
            view_state.scoring_edit = Some((idx + 1) % count);
        }
    }
}

/// Move the scoring edit cursor back, wrapping before the first field.
fn scoring_field_prev(view_state: &mut ViewState) {
    let count = view_state.scoring.len();
    if let Some(idx) = view_state.scoring_edit {
        if count > 0 {
            view_state.scoring_edit = Some((idx + count - 1) % count);
        }
    }
}

fn active_scoring_input(view_state: &mut ViewState) -> Option<&mut super::ScoringInput> {
    let idx = view_state.scoring_edit?;
    view_state.scoring.get_mut(idx)
}

/// Scroll the season table up by the given number of rows.
fn seasons_scroll_up(view_state: &mut ViewState, lines: usize) {
    let offset = view_state
        .scroll_offset
        .entry("seasons".to_string())
        .or_insert(0);
    *offset = offset.saturating_sub(lines);
}

/// Scroll the season table down by the given number of rows.
fn seasons_scroll_down(view_state: &mut ViewState, lines: usize) {
    let offset = view_state
        .scroll_offset
        .entry("seasons".to_string())
        .or_insert(0);
    *offset = offset.saturating_add(lines);
}

/// Page size for PageUp/PageDown selection movement.
fn page_size() -> usize {
    10
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
