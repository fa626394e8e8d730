// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors what the command loop has
// resolved. The app orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::data::directory::{Position, ALL_POSITIONS};
use crate::protocol::{DashboardSnapshot, PlayerListing, UiUpdate, UserCommand};
use crate::resolve::{HeadshotView, SelectionOutcome};

use layout::build_layout;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Where the current interaction stands. Advances only on a view request;
/// moving the highlight or editing the filter never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No view request yet.
    Idle,
    /// A request is in flight.
    Fetching,
    /// The request carried an empty key.
    NoSelection,
    /// The key matched no roster record.
    Missed,
    /// Player resolved, headshot fetch (if any) did not fail.
    Resolved,
    /// Player resolved but the headshot fetch failed.
    ImageFailed,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// One scoring weight input: a fixed label and whatever text the user has
/// typed. Values are never parsed or consumed downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringInput {
    pub label: String,
    pub value: String,
}

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the command loop.
/// The `render_frame` function reads this struct to draw the dashboard.
pub struct ViewState {
    /// All selectable players, roster order.
    pub listings: Vec<PlayerListing>,
    /// Total season stat rows loaded.
    pub stat_rows: usize,
    /// Inclusive season range the stats table covers.
    pub seasons: (u16, u16),
    /// Loaded projection rows per position.
    pub projection_counts: [(Position, usize); 4],
    /// Projection week label.
    pub week: String,
    /// Highlight index into the visible (filtered) listings. Starts empty,
    /// so a view request before any movement carries an empty key.
    pub selected: Option<usize>,
    /// Current filter/search text.
    pub filter_text: String,
    /// Whether the filter input is active.
    pub filter_mode: bool,
    /// Position filter for the player list.
    pub position_filter: Option<Position>,
    /// Current interaction stage.
    pub stage: Stage,
    /// Key of the in-flight request, shown while fetching.
    pub pending_key: Option<String>,
    /// Most recent resolution outcome.
    pub outcome: Option<SelectionOutcome>,
    /// Scoring weight inputs, seeded from config on the first snapshot.
    pub scoring: Vec<ScoringInput>,
    /// Index of the scoring input being edited.
    pub scoring_edit: Option<usize>,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            listings: Vec::new(),
            stat_rows: 0,
            seasons: (0, 0),
            projection_counts: ALL_POSITIONS.map(|p| (p, 0)),
            week: String::new(),
            selected: None,
            filter_text: String::new(),
            filter_mode: false,
            position_filter: None,
            stage: Stage::Idle,
            pending_key: None,
            outcome: None,
            scoring: Vec::new(),
            scoring_edit: None,
            confirm_quit: false,
            scroll_offset: HashMap::new(),
        }
    }
}

impl ViewState {
    /// Apply the table snapshot from the command loop.
    ///
    /// Scoring inputs are seeded only when still empty so a late snapshot
    /// cannot clobber values the user has typed.
    pub fn apply_snapshot(&mut self, snapshot: DashboardSnapshot) {
        self.listings = snapshot.listings;
        self.stat_rows = snapshot.stat_rows;
        self.seasons = snapshot.seasons;
        self.projection_counts = snapshot.projection_counts;
        self.week = snapshot.week;
        if self.scoring.is_empty() {
            self.scoring = snapshot
                .scoring
                .into_iter()
                .map(|(label, value)| ScoringInput {
                    label,
                    value: format_weight(value),
                })
                .collect();
        }
    }

    /// Listings that pass the position and text filters, in roster order.
    /// The highlight index and the selector rows both come from here.
    pub fn visible_listings(&self) -> Vec<&PlayerListing> {
        self.listings
            .iter()
            .filter(|l| self.position_filter.map_or(true, |p| l.position == p))
            .filter(|l| self.filter_text.is_empty() || listing_matches(l, &self.filter_text))
            .collect()
    }

    /// Composite key behind the current highlight, or the empty key when
    /// nothing is highlighted.
    pub fn selected_key(&self) -> String {
        let visible = self.visible_listings();
        self.selected
            .and_then(|idx| visible.get(idx))
            .map(|listing| listing.key.clone())
            .unwrap_or_default()
    }
}

/// Case-insensitive containment on name or team. Deliberately looser than
/// resolution, which goes through the exact composite key.
fn listing_matches(listing: &PlayerListing, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    listing.display_name.to_lowercase().contains(&needle)
        || listing.team.to_lowercase().contains(&needle)
}

/// Render a config weight the way a user would have typed it.
fn format_weight(value: f64) -> String {
    format!("{value}")
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::Fetching { key } => {
            state.stage = Stage::Fetching;
            state.pending_key = Some(key);
        }
        UiUpdate::Selection(outcome) => {
            state.pending_key = None;
            state.stage = match &outcome {
                SelectionOutcome::NoSelection => Stage::NoSelection,
                SelectionOutcome::Miss { .. } => Stage::Missed,
                SelectionOutcome::Player(model) => {
                    if matches!(model.headshot, HeadshotView::Failed { .. }) {
                        Stage::ImageFailed
                    } else {
                        Stage::Resolved
                    }
                }
            };
            state.outcome = Some(outcome);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::selector::render(frame, layout.selector, state);
    widgets::player_card::render(frame, layout.player_card, state);
    widgets::season_stats::render(frame, layout.season_table, state);
    widgets::projections::render(frame, layout.projection_table, state);
    widgets::scoring::render(frame, layout.scoring_bar, state);
    render_help_bar(frame, layout.help_bar, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

fn render_help_bar(frame: &mut Frame, area: ratatui::layout::Rect, state: &ViewState) {
    let text = if state.confirm_quit {
        " Quit? y:Yes | n:No"
    } else if state.filter_mode {
        " Filter: type to search | Enter:Apply | Esc:Clear"
    } else if state.scoring_edit.is_some() {
        " Scoring: type a value | Tab:Next field | Enter/Esc:Done"
    } else {
        " Enter:View | Up/Down:Move | /:Filter | p:Position | s:Scoring | [ ]:Scroll | q:Quit"
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Set panic hook to restore terminal on crash.
    //    We capture the original hook and chain ours before it.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create ViewState
    let mut view_state = ViewState::default();

    // 4. Create crossterm EventStream for async keyboard input
    let mut event_stream = EventStream::new();

    // 5. Create render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 6. Main loop
    loop {
        tokio::select! {
            // UI updates from the command loop
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: app is shutting down
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = matches!(cmd, UserCommand::Quit);
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse events, resize events, etc. -- ignore
                    }
                    Some(Err(_)) => {
                        // Input error -- break out
                        break;
                    }
                    None => {
                        // Stream ended
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    // 7. Restore terminal
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
