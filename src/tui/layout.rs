// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the player dashboard:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +----------------+---------------------------------+
// | Player List    | Player Card (7 rows)            |
// | (30%)          +---------------------------------+
// |                | Season Stats (fill)             |
// |                +---------------------------------+
// |                | Projections (6 rows)            |
// +----------------+---------------------------------+
// | Scoring Inputs (3 rows)                           |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: table counts, projection week, interaction stage.
    pub status_bar: Rect,
    /// Left column: filterable player list.
    pub selector: Rect,
    /// Right column top: selection echo and headshot summary.
    pub player_card: Rect,
    /// Right column middle: historical season stats table.
    pub season_table: Rect,
    /// Right column bottom: matched projection row.
    pub projection_table: Rect,
    /// Full-width row of scoring weight inputs.
    pub scoring_bar: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
///
/// Fixed heights for the status bar, scoring inputs, and help bar; the
/// remaining space splits into the player list and a right column whose
/// middle section absorbs extra rows.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | scoring(3) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // middle section (list + panels)
            Constraint::Length(3), // scoring inputs
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let scoring_bar = vertical[2];
    let help_bar = vertical[3];

    // Horizontal: player list (30%) | right column (70%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(middle);

    let selector = horizontal[0];
    let right = horizontal[1];

    // Right column: player card (7) | season stats (fill) | projections (6)
    let right_sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(5),
            Constraint::Length(6),
        ])
        .split(right);

    let player_card = right_sections[0];
    let season_table = right_sections[1];
    let projection_table = right_sections[2];

    AppLayout {
        status_bar,
        selector,
        player_card,
        season_table,
        projection_table,
        scoring_bar,
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// A reasonable terminal size for testing.
    fn test_area() -> Rect {
        Rect::new(0, 0, 160, 50)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("status_bar", layout.status_bar),
            ("selector", layout.selector),
            ("player_card", layout.player_card),
            ("season_table", layout.season_table),
            ("projection_table", layout.projection_table),
            ("scoring_bar", layout.scoring_bar),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn layout_status_bar_height_is_one() {
        let layout = build_layout(test_area());
        assert_eq!(
            layout.status_bar.height, 1,
            "Status bar should be exactly 1 row"
        );
    }

    #[test]
    fn layout_help_bar_height_is_one() {
        let layout = build_layout(test_area());
        assert_eq!(
            layout.help_bar.height, 1,
            "Help bar should be exactly 1 row"
        );
    }

    #[test]
    fn layout_scoring_bar_height_is_three() {
        let layout = build_layout(test_area());
        assert_eq!(
            layout.scoring_bar.height, 3,
            "Scoring bar should be exactly 3 rows"
        );
    }

    #[test]
    fn layout_right_column_wider_than_selector() {
        let layout = build_layout(test_area());
        assert!(
            layout.player_card.width > layout.selector.width,
            "Right column ({}) should be wider than the selector ({})",
            layout.player_card.width,
            layout.selector.width
        );
    }

    #[test]
    fn layout_right_sections_stack_vertically() {
        let layout = build_layout(test_area());
        assert!(
            layout.player_card.y < layout.season_table.y,
            "Player card should be above season stats"
        );
        assert!(
            layout.season_table.y < layout.projection_table.y,
            "Season stats should be above projections"
        );
    }

    #[test]
    fn layout_right_sections_same_width() {
        let layout = build_layout(test_area());
        assert_eq!(layout.player_card.width, layout.season_table.width);
        assert_eq!(layout.season_table.width, layout.projection_table.width);
    }

    #[test]
    fn layout_fits_within_area() {
        let area = test_area();
        let layout = build_layout(area);
        let all_rects = [
            layout.status_bar,
            layout.selector,
            layout.player_card,
            layout.season_table,
            layout.projection_table,
            layout.scoring_bar,
            layout.help_bar,
        ];
        for rect in &all_rects {
            assert!(
                rect.x + rect.width <= area.width,
                "Rect {:?} exceeds area width {}",
                rect,
                area.width
            );
            assert!(
                rect.y + rect.height <= area.height,
                "Rect {:?} exceeds area height {}",
                rect,
                area.height
            );
        }
    }

    #[test]
    fn layout_small_terminal_still_valid() {
        // Minimum viable terminal size
        let area = Rect::new(0, 0, 60, 24);
        let layout = build_layout(area);
        let rects = [
            layout.status_bar,
            layout.selector,
            layout.player_card,
            layout.season_table,
            layout.projection_table,
            layout.scoring_bar,
            layout.help_bar,
        ];
        for rect in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "Small terminal: rect {:?} has zero area",
                rect
            );
        }
    }
}
