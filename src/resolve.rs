// Selection resolution.
//
// One call per view request: look the composite key up in the directory,
// filter season stats by player id, match a projection row, fetch the
// headshot. Every failure along the way is folded into the outcome so a
// bad selection can never take the process down; the next request starts
// from scratch.

use tracing::{debug, warn};

use crate::data::directory::{PlayerDirectory, PlayerRecord};
use crate::data::projections::{NameMatcher, ProjectionRow, ProjectionTables};
use crate::data::stats::{SeasonStatRow, SeasonStats};
use crate::images::{self, HeadshotClient, HeadshotError, ImageInfo};

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Result of one view request. Never an error: every failure mode maps to
/// a renderable variant.
#[derive(Debug, Clone)]
pub enum SelectionOutcome {
    /// The view was requested with an empty key.
    NoSelection,
    /// The key matched no directory record. Defensive; the selector is
    /// populated from the same directory, so this should not happen.
    Miss { key: String },
    Player(Box<RenderModel>),
}

/// Everything the UI needs to render one resolved player.
#[derive(Debug, Clone)]
pub struct RenderModel {
    pub player: PlayerRecord,
    /// Echo line confirming what was looked up.
    pub caption: String,
    /// Season rows for this player, season ascending. Empty for rookies.
    pub seasons: Vec<SeasonStatRow>,
    /// Zero or one matched projection row.
    pub projection: Option<ProjectionRow>,
    pub headshot: HeadshotView,
}

/// What the headshot panel should show.
#[derive(Debug, Clone)]
pub enum HeadshotView {
    /// Bytes arrived. `info` is present when they decoded cleanly; bytes
    /// that are not a decodable image still count as retrieved.
    Image {
        url: String,
        byte_len: usize,
        info: Option<ImageInfo>,
    },
    /// No headshot URL is known for this player.
    Missing,
    /// The fetch failed; the message is ready for display.
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Owns the three read-only tables and the headshot client. Built once at
/// startup; `resolve` borrows immutably, so concurrent calls would be safe
/// even though the command loop serializes them.
pub struct Resolver {
    directory: PlayerDirectory,
    stats: SeasonStats,
    projections: ProjectionTables,
    headshots: HeadshotClient,
    matcher: Box<dyn NameMatcher>,
}

impl Resolver {
    pub fn new(
        directory: PlayerDirectory,
        stats: SeasonStats,
        projections: ProjectionTables,
        headshots: HeadshotClient,
        matcher: Box<dyn NameMatcher>,
    ) -> Self {
        Resolver {
            directory,
            stats,
            projections,
            headshots,
            matcher,
        }
    }

    pub fn directory(&self) -> &PlayerDirectory {
        &self.directory
    }

    pub fn stats(&self) -> &SeasonStats {
        &self.stats
    }

    pub fn projections(&self) -> &ProjectionTables {
        &self.projections
    }

    /// Resolve one selection key into a renderable outcome. Re-fetches the
    /// headshot every time; there is no cache keyed on the selection.
    pub async fn resolve(&self, key: &str) -> SelectionOutcome {
        if key.is_empty() {
            return SelectionOutcome::NoSelection;
        }
        let Some(record) = self.directory.find_by_key(key) else {
            warn!("selection key {:?} matched no roster record", key);
            return SelectionOutcome::Miss {
                key: key.to_string(),
            };
        };

        let seasons = self.stats.stats_for_player(&record.player_id);
        let projection = self
            .projections
            .projection_for(record, self.matcher.as_ref())
            .cloned();
        if projection.is_none() {
            debug!("no projection row matched {}", record.display_name);
        }
        let headshot = self.load_headshot(record).await;

        SelectionOutcome::Player(Box::new(RenderModel {
            caption: format!("You entered: {}", record.display_name),
            seasons,
            projection,
            headshot,
            player: record.clone(),
        }))
    }

    async fn load_headshot(&self, record: &PlayerRecord) -> HeadshotView {
        let url = match &record.headshot_url {
            Some(url) => url.clone(),
            None => match self.headshots.page_headshot_url(&record.display_name).await {
                Some(url) => url,
                None => return HeadshotView::Missing,
            },
        };
        match self.headshots.fetch(&url).await {
            Ok(shot) => {
                let info = images::inspect(&shot.bytes);
                if info.is_none() {
                    warn!(
                        "headshot bytes for {} did not decode as an image",
                        record.display_name
                    );
                }
                HeadshotView::Image {
                    url: shot.url,
                    byte_len: shot.bytes.len(),
                    info,
                }
            }
            Err(HeadshotError::NonSuccessStatus { status }) => HeadshotView::Failed {
                message: format!(
                    "Failed to retrieve the image for {}. Status code: {}",
                    record.display_name, status
                ),
            },
            Err(HeadshotError::Unreachable(e)) => HeadshotView::Failed {
                message: format!("An error occurred: {e}"),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
