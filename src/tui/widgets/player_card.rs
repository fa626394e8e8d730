// Player card widget: identity, echo caption, and headshot status.
//
// Renders whatever the latest resolution produced. The failure texts
// arrive pre-built on the outcome; this widget only picks colors and
// placement.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::resolve::{HeadshotView, RenderModel, SelectionOutcome};
use crate::tui::{Stage, ViewState};

/// Render the player card into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(build_card_lines(state))
        .block(Block::default().borders(Borders::ALL).title("Player Card"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Build the card body for the current stage and outcome.
pub fn build_card_lines(state: &ViewState) -> Vec<Line<'static>> {
    if state.stage == Stage::Fetching {
        let key = state.pending_key.clone().unwrap_or_default();
        return vec![Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("Fetching {key} ..."),
                Style::default().fg(Color::Yellow),
            ),
        ])];
    }

    match &state.outcome {
        None => vec![Line::from(vec![
            Span::raw(" "),
            Span::styled(
                "Highlight a player and press Enter.",
                Style::default().fg(Color::DarkGray),
            ),
        ])],
        Some(SelectionOutcome::NoSelection) => vec![Line::from(vec![
            Span::raw(" "),
            Span::styled(
                "No Player Selected",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ])],
        Some(SelectionOutcome::Miss { key }) => vec![Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("No player found for \"{key}\"."),
                Style::default().fg(Color::Red),
            ),
        ])],
        Some(SelectionOutcome::Player(model)) => player_lines(model),
    }
}

fn player_lines(model: &RenderModel) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(
            format!(" {}", model.player.display_name),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} {}", model.player.team, model.player.position.abbr()),
            Style::default().fg(Color::Gray),
        ),
    ]));

    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(model.caption.clone(), Style::default().fg(Color::Gray)),
    ]));

    lines.extend(headshot_lines(&model.headshot));
    lines
}

/// Lines describing the headshot fetch result.
pub fn headshot_lines(headshot: &HeadshotView) -> Vec<Line<'static>> {
    match headshot {
        HeadshotView::Image {
            url,
            byte_len,
            info,
        } => {
            let summary = match info {
                Some(info) => format!(
                    " [{} {}x{}, {}]",
                    info.format,
                    info.width,
                    info.height,
                    format_bytes(*byte_len)
                ),
                None => format!(" [image, {}]", format_bytes(*byte_len)),
            };
            vec![
                Line::from(Span::styled(summary, Style::default().fg(Color::Green))),
                Line::from(Span::styled(
                    format!(" {url}"),
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        }
        HeadshotView::Missing => vec![Line::from(Span::styled(
            " No headshot on file.",
            Style::default().fg(Color::DarkGray),
        ))],
        HeadshotView::Failed { message } => vec![Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Red),
        ))],
    }
}

/// Human byte size, KB above 1024.
pub fn format_bytes(len: usize) -> String {
    if len < 1024 {
        format!("{len} B")
    } else {
        format!("{:.1} KB", len as f64 / 1024.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
