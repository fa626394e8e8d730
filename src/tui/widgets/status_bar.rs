// Status bar widget: data inventory and the current request stage.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::data::directory::Position;
use crate::tui::{Stage, ViewState};

/// Render the status bar into the given area.
///
/// Layout: [app name] [player count] [season span] [projection counts] [stage]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    spans.push(Span::styled(
        " Huddle ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));

    spans.push(Span::styled(
        format!(" {} players", state.listings.len()),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        format!(
            "Seasons {}-{} ({} rows)",
            state.seasons.0, state.seasons.1, state.stat_rows
        ),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        projection_summary(&state.projection_counts),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    let (label, color) = stage_indicator(state.stage);
    spans.push(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Compact projection inventory, e.g. "Proj: QB 32 RB 61 WR 83 TE 29".
pub fn projection_summary(counts: &[(Position, usize); 4]) -> String {
    let mut out = String::from("Proj:");
    for (position, count) in counts {
        out.push_str(&format!(" {} {}", position.abbr(), count));
    }
    out
}

/// Return the stage label and its color.
pub fn stage_indicator(stage: Stage) -> (&'static str, Color) {
    match stage {
        Stage::Idle => ("idle", Color::DarkGray),
        Stage::Fetching => ("fetching", Color::Yellow),
        Stage::NoSelection => ("no selection", Color::Yellow),
        Stage::Missed => ("no match", Color::Red),
        Stage::Resolved => ("ready", Color::Green),
        Stage::ImageFailed => ("image failed", Color::Yellow),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
