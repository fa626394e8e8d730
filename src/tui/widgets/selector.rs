// Player selector widget: scrollable, filterable list of roster players.
//
// The list renders `ViewState::visible_listings`, the same filtered view
// the input handler moves the highlight through, so the row under the
// cursor is always the row Enter will request.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use crate::data::directory::Position;
use crate::protocol::PlayerListing;
use crate::tui::ViewState;

/// Render the player selector into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let visible = state.visible_listings();
    let rows = (area.height as usize).saturating_sub(2);
    let offset = window_offset(state.selected, rows);

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(i, listing)| {
            let is_selected = state.selected == Some(i);
            ListItem::new(listing_line(listing, is_selected))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(build_title(state, visible.len())),
    );

    frame.render_widget(list, area);
}

/// One selector row: highlighted rows get the cursor treatment.
fn listing_line(listing: &PlayerListing, is_selected: bool) -> Line<'static> {
    let marker = if is_selected { ">> " } else { "   " };
    let name_style = if is_selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled(format!("{:<22}", listing.display_name), name_style),
        Span::styled(
            format!(" {:<3}", listing.team),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!(" {}", listing.position.abbr()),
            Style::default().fg(position_color(listing.position)),
        ),
    ])
}

/// First visible row index, chosen so the highlight stays on screen.
pub fn window_offset(selected: Option<usize>, visible_rows: usize) -> usize {
    match selected {
        Some(idx) => idx.saturating_sub(visible_rows.saturating_sub(1)),
        None => 0,
    }
}

/// Position accent colors for the selector and projection panels.
pub fn position_color(position: Position) -> Color {
    match position {
        Position::Quarterback => Color::Magenta,
        Position::RunningBack => Color::Green,
        Position::WideReceiver => Color::Cyan,
        Position::TightEnd => Color::Blue,
    }
}

/// Build the title with filter info and the visible count.
fn build_title(state: &ViewState, visible_count: usize) -> Line<'static> {
    let mut title = String::from("Players");
    if let Some(pos) = state.position_filter {
        title.push_str(&format!(" [{}]", pos.abbr()));
    }
    if state.filter_mode {
        title.push_str(&format!(" /{}_", state.filter_text));
    } else if !state.filter_text.is_empty() {
        title.push_str(&format!(" \"{}\"", state.filter_text));
    }
    title.push_str(&format!(" ({})", visible_count));
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
