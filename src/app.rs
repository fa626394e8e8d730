// Application state and orchestration logic.
//
// The command loop between the TUI and the resolver: it receives view
// requests, runs one resolution pass per request, and pushes render updates
// back to the TUI render loop.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::Config;
use crate::protocol::{DashboardSnapshot, PlayerListing, UiUpdate, UserCommand};
use crate::resolve::Resolver;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Everything the command loop owns: the loaded config and the resolver
/// with its read-only tables.
pub struct AppState {
    pub config: Config,
    pub resolver: Resolver,
}

impl AppState {
    pub fn new(config: Config, resolver: Resolver) -> Self {
        AppState { config, resolver }
    }

    /// Table summary for the selector and status line.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let directory = self.resolver.directory();
        let weights = &self.config.scoring;
        DashboardSnapshot {
            listings: directory.records().iter().map(PlayerListing::from).collect(),
            stat_rows: self.resolver.stats().len(),
            seasons: (self.config.seasons.first, self.config.seasons.last),
            projection_counts: self.resolver.projections().counts(),
            week: self.config.projections.week.clone(),
            scoring: vec![
                ("PPR".to_string(), weights.ppr),
                ("Pass TD".to_string(), weights.pass_td),
                ("Rush TD".to_string(), weights.rush_td),
                ("Rec TD".to_string(), weights.rec_td),
                ("Turnover".to_string(), weights.turnover),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Core application command loop.
///
/// Sends the table snapshot once at startup, then handles one command at a
/// time: a view request issued while a resolution is in flight waits in the
/// channel, so resolutions never interleave.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    state: AppState,
) -> anyhow::Result<()> {
    info!("Application command loop started");

    let _ = ui_tx
        .send(UiUpdate::Snapshot(Box::new(state.snapshot())))
        .await;

    loop {
        match cmd_rx.recv().await {
            Some(UserCommand::ViewPlayer { key }) => {
                debug!("view request for key {:?}", key);
                let _ = ui_tx.send(UiUpdate::Fetching { key: key.clone() }).await;
                let outcome = state.resolver.resolve(&key).await;
                if ui_tx.send(UiUpdate::Selection(outcome)).await.is_err() {
                    info!("UI channel closed, shutting down");
                    break;
                }
            }
            Some(UserCommand::Quit) => {
                info!("Quit command received, shutting down");
                break;
            }
            None => {
                info!("Command channel closed, shutting down");
                break;
            }
        }
    }

    info!("Application command loop exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
