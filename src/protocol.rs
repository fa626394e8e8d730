// Shared message types between the app orchestrator and the TUI.

use crate::data::directory::{PlayerRecord, Position};
use crate::resolve::SelectionOutcome;

// ---------------------------------------------------------------------------
// Commands: TUI -> app loop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Resolve and display the player behind a composite key. An empty key
    /// means the trigger fired with nothing selected.
    ViewPlayer { key: String },
    /// Shut the command loop down.
    Quit,
}

// ---------------------------------------------------------------------------
// Updates: app loop -> TUI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// Summary of the loaded tables, sent once after startup.
    Snapshot(Box<DashboardSnapshot>),
    /// A view request was accepted and resolution is under way.
    Fetching { key: String },
    /// Resolution finished; render the outcome.
    Selection(SelectionOutcome),
}

/// Everything the selector and status line need about the loaded tables.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// One entry per directory record, in roster order.
    pub listings: Vec<PlayerListing>,
    pub stat_rows: usize,
    /// Inclusive season range the stats table covers.
    pub seasons: (u16, u16),
    pub projection_counts: [(Position, usize); 4],
    /// Projection week label from the config ("draft" or a week number).
    pub week: String,
    /// Labelled scoring weights from the config, seeding the editable bar.
    pub scoring: Vec<(String, f64)>,
}

/// One selectable row in the player list.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerListing {
    pub key: String,
    pub display_name: String,
    pub team: String,
    pub position: Position,
}

impl From<&PlayerRecord> for PlayerListing {
    fn from(record: &PlayerRecord) -> Self {
        PlayerListing {
            key: record.composite_key.clone(),
            display_name: record.display_name.clone(),
            team: record.team.clone(),
            position: record.position,
        }
    }
}
