// Season stats widget: one row per season, oldest first.
//
// Scrollable with [ and ]. Columns cover every stat family; positions
// that never touch a family just show zeroes, which mirrors the source
// data rather than guessing which columns matter.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::data::stats::SeasonStatRow;
use crate::resolve::SelectionOutcome;
use crate::tui::ViewState;

/// Render the season stats table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("Season Stats");

    let seasons: Option<&[SeasonStatRow]> = match &state.outcome {
        Some(SelectionOutcome::Player(model)) => Some(&model.seasons),
        _ => None,
    };

    let Some(seasons) = seasons else {
        let hint = Paragraph::new(" Stats appear once a player is loaded.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(hint, area);
        return;
    };

    if seasons.is_empty() {
        let empty = Paragraph::new(" No seasons on record in the configured range.")
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(
        ["Season", "PassYd", "PassTD", "Int", "RushYd", "RushTD", "Rec", "RecYd", "RecTD", "Fum"]
            .map(Cell::from),
    )
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let visible_rows = (area.height as usize).saturating_sub(3);
    let raw_offset = state.scroll_offset.get("seasons").copied().unwrap_or(0);
    let offset = clamped_offset(raw_offset, seasons.len(), visible_rows);

    let rows: Vec<Row> = seasons
        .iter()
        .skip(offset)
        .map(|row| Row::new(stat_cells(row).map(Cell::from)))
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(5),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

/// Format one season row for display, column order matching the header.
pub fn stat_cells(row: &SeasonStatRow) -> [String; 10] {
    [
        row.season.to_string(),
        format!("{:.0}", row.passing_yds),
        row.passing_tds.to_string(),
        row.interceptions.to_string(),
        format!("{:.0}", row.rushing_yds),
        row.rushing_tds.to_string(),
        row.receptions.to_string(),
        format!("{:.0}", row.receiving_yds),
        row.receiving_tds.to_string(),
        row.fumbles_lost.to_string(),
    ]
}

/// Clamp a scroll offset so the last page stays full.
pub fn clamped_offset(raw: usize, total: usize, visible_rows: usize) -> usize {
    raw.min(total.saturating_sub(visible_rows))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
