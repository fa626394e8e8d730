// Season statistics loading and per-player lookup.
//
// Reads an nflverse-style seasonal stats CSV (one row per player per season)
// covering a fixed historical range. The `fumbles_lost` total is derived at
// load time from the three source fumble-loss columns.

use std::collections::HashMap;
use std::collections::HashSet;
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Aggregated totals for one player in one season.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonStatRow {
    pub player_id: String,
    pub season: u16,
    pub passing_yds: f64,
    pub passing_tds: u32,
    pub interceptions: u32,
    pub rushing_yds: f64,
    pub rushing_tds: u32,
    /// Sum of sack, rushing and receiving fumbles lost.
    pub fumbles_lost: u32,
    pub receiving_yds: f64,
    pub receiving_tds: u32,
    pub receptions: u32,
}

/// Immutable table of season rows for the configured historical range.
#[derive(Debug, Clone)]
pub struct SeasonStats {
    rows: Vec<SeasonStatRow>,
}

impl SeasonStats {
    pub fn new(rows: Vec<SeasonStatRow>) -> Self {
        SeasonStats { rows }
    }

    /// All seasons for one player, ordered by season ascending. The source
    /// does not guarantee row order, so the sort here is deliberate. Unknown
    /// players yield an empty vector, never an error.
    pub fn stats_for_player(&self, player_id: &str) -> Vec<SeasonStatRow> {
        let mut rows: Vec<SeasonStatRow> = self
            .rows
            .iter()
            .filter(|row| row.player_id == player_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.season);
        rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("failed to read stats file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private) — nflverse seasonal format
// ---------------------------------------------------------------------------

/// Seasonal stats CSV row. Numeric cells are optional floats: the export
/// leaves columns empty for stats a position never accrues, and writes
/// fractional-looking values ("4306.0") for integral totals.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RawSeasonRow {
    #[serde(default)]
    player_id: String,
    #[serde(default)]
    season: Option<f64>,
    #[serde(default)]
    passing_yards: Option<f64>,
    #[serde(default)]
    passing_tds: Option<f64>,
    #[serde(default)]
    interceptions: Option<f64>,
    #[serde(default)]
    rushing_yards: Option<f64>,
    #[serde(default)]
    rushing_tds: Option<f64>,
    #[serde(default)]
    sack_fumbles_lost: Option<f64>,
    #[serde(default)]
    rushing_fumbles_lost: Option<f64>,
    #[serde(default)]
    receiving_fumbles_lost: Option<f64>,
    #[serde(default)]
    receiving_yards: Option<f64>,
    #[serde(default)]
    receiving_tds: Option<f64>,
    #[serde(default)]
    receptions: Option<f64>,
    /// Absorb the dozens of extra columns the seasonal export includes.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

impl RawSeasonRow {
    /// All numeric cells, for the finiteness check.
    fn numeric_cells(&self) -> [Option<f64>; 12] {
        [
            self.season,
            self.passing_yards,
            self.passing_tds,
            self.interceptions,
            self.rushing_yards,
            self.rushing_tds,
            self.sack_fumbles_lost,
            self.rushing_fumbles_lost,
            self.receiving_fumbles_lost,
            self.receiving_yards,
            self.receiving_tds,
            self.receptions,
        ]
    }
}

fn count(value: Option<f64>) -> u32 {
    value.unwrap_or(0.0).round().max(0.0) as u32
}

fn yards(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_stats_from_reader<R: Read>(
    reader: R,
    seasons: RangeInclusive<u16>,
    source_label: &str,
) -> Result<SeasonStats, StatsError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    let mut seen: HashSet<(String, u16)> = HashSet::new();
    let mut skipped = 0usize;
    let mut out_of_range = 0usize;

    for row in rdr.deserialize::<RawSeasonRow>() {
        let raw = match row {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed stats row in {}: {}", source_label, e);
                skipped += 1;
                continue;
            }
        };

        let player_id = raw.player_id.trim().to_string();
        let Some(season_cell) = raw.season else {
            warn!("skipping stats row without a season in {}", source_label);
            skipped += 1;
            continue;
        };
        if player_id.is_empty() {
            warn!("skipping stats row without a player id in {}", source_label);
            skipped += 1;
            continue;
        }
        if raw
            .numeric_cells()
            .iter()
            .any(|cell| cell.is_some_and(|v| !v.is_finite()))
        {
            warn!(
                "skipping stats row with non-finite values for player {} in {}",
                player_id, source_label
            );
            skipped += 1;
            continue;
        }

        let season = season_cell.round() as u16;
        if !seasons.contains(&season) {
            out_of_range += 1;
            continue;
        }

        // One row per (player, season); keep the first observed.
        if !seen.insert((player_id.clone(), season)) {
            warn!(
                "duplicate season row for player {} season {} in {}, keeping first",
                player_id, season, source_label
            );
            continue;
        }

        let fumbles = yards(raw.sack_fumbles_lost)
            + yards(raw.rushing_fumbles_lost)
            + yards(raw.receiving_fumbles_lost);

        rows.push(SeasonStatRow {
            player_id,
            season,
            passing_yds: yards(raw.passing_yards),
            passing_tds: count(raw.passing_tds),
            interceptions: count(raw.interceptions),
            rushing_yds: yards(raw.rushing_yards),
            rushing_tds: count(raw.rushing_tds),
            fumbles_lost: fumbles.round().max(0.0) as u32,
            receiving_yds: yards(raw.receiving_yards),
            receiving_tds: count(raw.receiving_tds),
            receptions: count(raw.receptions),
        });
    }

    if rows.is_empty() {
        // Not fatal: every lookup then resolves to the empty-history case.
        warn!(
            "no season rows in range {}..={} loaded from {}",
            seasons.start(),
            seasons.end(),
            source_label
        );
    }

    debug!(
        kept = rows.len(),
        skipped, out_of_range, "season rows loaded from {}", source_label
    );

    Ok(SeasonStats::new(rows))
}

/// Load season stats from a CSV file, keeping only rows inside the
/// configured season range.
pub fn load_season_stats<P: AsRef<Path>>(
    path: P,
    seasons: RangeInclusive<u16>,
) -> Result<SeasonStats, StatsError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| StatsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_stats_from_reader(file, seasons, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
