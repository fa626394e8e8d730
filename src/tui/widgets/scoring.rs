// Scoring weights bar: config-seeded inputs the user can retype.
//
// One horizontal line of label/value pairs. The values are free-form
// text and never feed back into resolution; the bar exists so a league's
// settings are visible and adjustable next to the projections.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::{ScoringInput, ViewState};

/// Render the scoring weight bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = build_line(&state.scoring, state.scoring_edit);
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Scoring Weights"),
    );
    frame.render_widget(paragraph, area);
}

/// Build the single bar line; the field under edit gets a cursor and the
/// highlight treatment.
pub fn build_line(scoring: &[ScoringInput], editing: Option<usize>) -> Line<'static> {
    if scoring.is_empty() {
        return Line::from(Span::styled(
            " no scoring weights configured",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut spans = Vec::new();
    for (i, input) in scoring.iter().enumerate() {
        spans.push(Span::styled(
            format!(" {}: ", input.label),
            Style::default().fg(Color::Gray),
        ));
        if editing == Some(i) {
            spans.push(Span::styled(
                format!("{}_", input.value),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                input.value.clone(),
                Style::default().fg(Color::White),
            ));
        }
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
