// Projection widget: the matched scraped row in canonical column order.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::data::projections::{ProjectionRow, PROJECTION_SITE};
use crate::resolve::SelectionOutcome;
use crate::tui::ViewState;

/// Render the projection panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(build_title(&state.week));

    let lines = match &state.outcome {
        Some(SelectionOutcome::Player(model)) => match &model.projection {
            Some(row) => projection_lines(row),
            None => vec![Line::from(Span::styled(
                format!(
                    " No {} row matched {}.",
                    PROJECTION_SITE, model.player.display_name
                ),
                Style::default().fg(Color::Yellow),
            ))],
        },
        _ => vec![Line::from(Span::styled(
            " Projections appear once a player is loaded.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Build the panel title, e.g. "FantasyPros Projections (week 3)".
pub fn build_title(week: &str) -> String {
    format!("{} Projections ({})", PROJECTION_SITE, week_label(week))
}

/// "draft" is a label of its own; numbers read as weeks.
pub fn week_label(week: &str) -> String {
    if week == "draft" {
        "draft".to_string()
    } else {
        format!("week {week}")
    }
}

/// One line per canonical column for the row's position.
pub fn projection_lines(row: &ProjectionRow) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        format!(" {}", row.player_text),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));

    for (label, value) in row.columns() {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {label:<16}"),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(format_stat(value), Style::default().fg(Color::Cyan)),
        ]));
    }

    lines
}

/// Projection numbers keep one decimal; absent cells render as a dash.
pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::directory::{composite_key, PlayerRecord, Position};
    use crate::resolve::{HeadshotView, RenderModel};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn wr_row() -> ProjectionRow {
        let mut row = ProjectionRow::new(Position::WideReceiver, "Justin Jefferson MIN");
        row.receptions = Some(7.2);
        row.receiving_yds = Some(101.9);
        row.receiving_tds = Some(0.6);
        row.rushing_yds = Some(1.4);
        row.fumbles = Some(0.1);
        row
    }

    #[test]
    fn week_label_passes_draft_through() {
        assert_eq!(week_label("draft"), "draft");
        assert_eq!(week_label("3"), "week 3");
    }

    #[test]
    fn title_names_the_source_site() {
        assert_eq!(build_title("draft"), "FantasyPros Projections (draft)");
        assert_eq!(build_title("14"), "FantasyPros Projections (week 14)");
    }

    #[test]
    fn format_stat_one_decimal_or_dash() {
        assert_eq!(format_stat(Some(101.9)), "101.9");
        assert_eq!(format_stat(Some(7.0)), "7.0");
        assert_eq!(format_stat(None), "-");
    }

    #[test]
    fn projection_lines_follow_canonical_order() {
        let lines = projection_lines(&wr_row());
        // Header line plus the six receiver columns.
        assert_eq!(lines.len(), 7);
        assert!(line_text(&lines[0]).contains("Justin Jefferson MIN"));
        assert!(line_text(&lines[1]).starts_with(" Receptions"));
        assert!(line_text(&lines[1]).ends_with("7.2"));
        assert!(line_text(&lines[2]).starts_with(" Receiving Yds"));
        assert!(line_text(&lines[4]).starts_with(" Rushing Yds"));
        assert!(line_text(&lines[6]).starts_with(" Fumbles"));
    }

    #[test]
    fn missing_cells_render_as_dashes() {
        let row = ProjectionRow::new(Position::TightEnd, "Travis Kelce KC");
        let lines = projection_lines(&row);
        assert_eq!(lines.len(), 5);
        assert!(line_text(&lines[1]).ends_with('-'));
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_a_projection() {
        let backend = ratatui::backend::TestBackend::new(80, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();

        let record = PlayerRecord {
            player_id: "00-0036322".to_string(),
            display_name: "Justin Jefferson".to_string(),
            team: "MIN".to_string(),
            position: Position::WideReceiver,
            headshot_url: None,
            composite_key: composite_key("Justin Jefferson", "MIN", Position::WideReceiver),
        };
        let mut state = ViewState::default();
        state.week = "draft".to_string();
        state.outcome = Some(SelectionOutcome::Player(Box::new(RenderModel {
            caption: "You entered: Justin Jefferson".to_string(),
            player: record,
            seasons: Vec::new(),
            projection: Some(wr_row()),
            headshot: HeadshotView::Missing,
        })));
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
