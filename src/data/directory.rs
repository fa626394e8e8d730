// Player directory loading and lookup.
//
// Reads an nflverse-style roster CSV (one row per player) and builds the
// immutable in-memory directory the selector and resolver work from. Only
// active players at the four offensive skill positions are kept.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The four offensive skill positions the dashboard covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
}

/// All positions in display order, for filter cycling and table dispatch.
pub const ALL_POSITIONS: [Position; 4] = [
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
];

impl Position {
    /// Parse a roster abbreviation. Anything outside the four skill
    /// positions (K, DEF, OL, ...) returns None and is filtered out.
    pub fn from_abbr(abbr: &str) -> Option<Self> {
        match abbr.trim() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            _ => None,
        }
    }

    /// The roster abbreviation, also used in composite keys and URLs.
    pub fn abbr(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
        }
    }

    /// Lower-case page slug for the projections site.
    pub fn slug(&self) -> &'static str {
        match self {
            Position::Quarterback => "qb",
            Position::RunningBack => "rb",
            Position::WideReceiver => "wr",
            Position::TightEnd => "te",
        }
    }

}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.abbr())
    }
}

/// One active player as loaded from the roster source.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    /// Stable cross-dataset id (gsis), used to join season stats.
    pub player_id: String,
    pub display_name: String,
    /// Team abbreviation, e.g. "BUF".
    pub team: String,
    pub position: Position,
    /// Portrait URL. None when the roster row has an empty headshot cell.
    pub headshot_url: Option<String>,
    /// Selector identity: `display_name + " " + team + " " + position`.
    pub composite_key: String,
}

/// Build the composite selector key for a name/team/position triple.
pub fn composite_key(display_name: &str, team: &str, position: Position) -> String {
    format!("{} {} {}", display_name, team, position.abbr())
}

/// Immutable directory of active players with key-based lookup.
///
/// Duplicate composite keys collapse to the first record observed in source
/// order; later duplicates are dropped with a warning.
#[derive(Debug, Clone)]
pub struct PlayerDirectory {
    records: Vec<PlayerRecord>,
    by_key: HashMap<String, usize>,
}

impl PlayerDirectory {
    pub fn new(records: Vec<PlayerRecord>) -> Self {
        let mut kept: Vec<PlayerRecord> = Vec::with_capacity(records.len());
        let mut by_key: HashMap<String, usize> = HashMap::with_capacity(records.len());

        for record in records {
            match by_key.entry(record.composite_key.clone()) {
                std::collections::hash_map::Entry::Vacant(slot) => {
                    slot.insert(kept.len());
                    kept.push(record);
                }
                std::collections::hash_map::Entry::Occupied(_) => {
                    // First-write-wins: the source occasionally carries the
                    // same player twice; keep the first observed record.
                    warn!(
                        key = %record.composite_key,
                        "duplicate composite key in roster, keeping first record"
                    );
                }
            }
        }

        PlayerDirectory {
            records: kept,
            by_key,
        }
    }

    /// Look up the record behind a selector key. None means the key is not
    /// in the loaded snapshot ("no selection" to the caller, never fatal).
    pub fn find_by_key(&self, key: &str) -> Option<&PlayerRecord> {
        self.by_key.get(key).map(|&idx| &self.records[idx])
    }

    /// All records in source order, for populating the selector.
    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read roster file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private) — nflverse roster format
// ---------------------------------------------------------------------------

/// Roster CSV row. Everything is read as a string; filtering and conversion
/// happen afterwards so a malformed cell skips one row, not the file.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RawRosterRow {
    #[serde(default)]
    display_name: String,
    #[serde(default, alias = "team")]
    team_abbr: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    gsis_id: String,
    #[serde(default, alias = "headshot_url")]
    headshot: String,
    /// Absorb the many extra columns the roster export includes.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_directory_from_reader<R: Read>(
    reader: R,
    source_label: &str,
) -> Result<PlayerDirectory, DirectoryError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in rdr.deserialize::<RawRosterRow>() {
        let raw = match row {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed roster row in {}: {}", source_label, e);
                skipped += 1;
                continue;
            }
        };

        // Active players at the four skill positions only.
        if !raw.status.trim().eq_ignore_ascii_case("active") {
            continue;
        }
        let Some(position) = Position::from_abbr(&raw.position) else {
            continue;
        };

        let display_name = raw.display_name.trim().to_string();
        let team = raw.team_abbr.trim().to_string();
        let player_id = raw.gsis_id.trim().to_string();
        if display_name.is_empty() || team.is_empty() || player_id.is_empty() {
            warn!(
                "skipping roster row with missing identity fields in {} (name={:?}, team={:?}, id={:?})",
                source_label, raw.display_name, raw.team_abbr, raw.gsis_id
            );
            skipped += 1;
            continue;
        }

        let headshot = raw.headshot.trim();
        let headshot_url = if headshot.is_empty() {
            None
        } else {
            Some(headshot.to_string())
        };

        let key = composite_key(&display_name, &team, position);
        records.push(PlayerRecord {
            player_id,
            display_name,
            team,
            position,
            headshot_url,
            composite_key: key,
        });
    }

    if records.is_empty() {
        return Err(DirectoryError::Validation(format!(
            "no active skill-position players found in {}",
            source_label
        )));
    }

    debug!(
        kept = records.len(),
        skipped, "roster rows loaded from {}", source_label
    );

    Ok(PlayerDirectory::new(records))
}

/// Load the player directory from a roster CSV file.
pub fn load_directory<P: AsRef<Path>>(path: P) -> Result<PlayerDirectory, DirectoryError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| DirectoryError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_directory_from_reader(file, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER_CSV: &str = "\
display_name,team_abbr,position,status,gsis_id,headshot,college
Josh Allen,BUF,QB,active,00-0034857,https://static.example.com/allen.png,Wyoming
Saquon Barkley,PHI,RB,active,00-0034844,https://static.example.com/barkley.png,Penn State
Justin Jefferson,MIN,WR,active,00-0036322,,LSU
Travis Kelce,KC,TE,active,00-0030506,https://static.example.com/kelce.png,Cincinnati
Justin Tucker,BAL,K,active,00-0029597,https://static.example.com/tucker.png,Texas
Tom Brady,TB,QB,retired,00-0019596,https://static.example.com/brady.png,Michigan
";

    fn load(csv: &str) -> PlayerDirectory {
        load_directory_from_reader(csv.as_bytes(), "test").expect("roster should load")
    }

    fn sample_record(name: &str, team: &str, position: Position) -> PlayerRecord {
        PlayerRecord {
            player_id: format!("id-{name}"),
            display_name: name.to_string(),
            team: team.to_string(),
            position,
            headshot_url: None,
            composite_key: composite_key(name, team, position),
        }
    }

    // -- Position parsing --

    #[test]
    fn position_parses_the_four_skill_abbreviations() {
        assert_eq!(Position::from_abbr("QB"), Some(Position::Quarterback));
        assert_eq!(Position::from_abbr("RB"), Some(Position::RunningBack));
        assert_eq!(Position::from_abbr("WR"), Some(Position::WideReceiver));
        assert_eq!(Position::from_abbr("TE"), Some(Position::TightEnd));
    }

    #[test]
    fn position_rejects_everything_else() {
        for abbr in ["K", "DEF", "OL", "CB", "FB", "", "qb"] {
            assert_eq!(Position::from_abbr(abbr), None, "{abbr:?} should not parse");
        }
    }

    #[test]
    fn position_abbr_round_trips() {
        for pos in ALL_POSITIONS {
            assert_eq!(Position::from_abbr(pos.abbr()), Some(pos));
        }
    }

    #[test]
    fn position_display_matches_abbr() {
        assert_eq!(Position::Quarterback.to_string(), "QB");
        assert_eq!(Position::TightEnd.to_string(), "TE");
    }

    // -- Composite key --

    #[test]
    fn composite_key_concatenates_with_spaces() {
        assert_eq!(
            composite_key("Josh Allen", "BUF", Position::Quarterback),
            "Josh Allen BUF QB"
        );
    }

    // -- Loading and filtering --

    #[test]
    fn loads_only_active_skill_position_players() {
        let dir = load(ROSTER_CSV);
        // Tucker is a kicker, Brady is retired; both filtered out.
        assert_eq!(dir.len(), 4);
        assert!(dir.find_by_key("Justin Tucker BAL K").is_none());
        assert!(dir.find_by_key("Tom Brady TB QB").is_none());
    }

    #[test]
    fn find_by_key_round_trips_every_loaded_record() {
        let dir = load(ROSTER_CSV);
        for record in dir.records() {
            let found = dir
                .find_by_key(&record.composite_key)
                .expect("every composite key should resolve");
            assert_eq!(found.player_id, record.player_id);
            assert_eq!(found.display_name, record.display_name);
        }
    }

    #[test]
    fn empty_headshot_cell_becomes_none() {
        let dir = load(ROSTER_CSV);
        let jefferson = dir
            .find_by_key("Justin Jefferson MIN WR")
            .expect("Jefferson should be present");
        assert!(jefferson.headshot_url.is_none());

        let allen = dir.find_by_key("Josh Allen BUF QB").expect("Allen");
        assert_eq!(
            allen.headshot_url.as_deref(),
            Some("https://static.example.com/allen.png")
        );
    }

    #[test]
    fn find_by_key_misses_unknown_keys() {
        let dir = load(ROSTER_CSV);
        assert!(dir.find_by_key("Patrick Mahomes KC QB").is_none());
        assert!(dir.find_by_key("").is_none());
    }

    #[test]
    fn status_comparison_ignores_case() {
        let csv = "\
display_name,team_abbr,position,status,gsis_id,headshot
Josh Allen,BUF,QB,ACTIVE,00-0034857,
";
        let dir = load(csv);
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn missing_identity_fields_skip_the_row() {
        let csv = "\
display_name,team_abbr,position,status,gsis_id,headshot
,BUF,QB,active,00-0001,
Josh Allen,BUF,QB,active,,
Saquon Barkley,PHI,RB,active,00-0002,
";
        let dir = load(csv);
        assert_eq!(dir.len(), 1);
        assert!(dir.find_by_key("Saquon Barkley PHI RB").is_some());
    }

    #[test]
    fn zero_matching_rows_is_a_validation_error() {
        let csv = "\
display_name,team_abbr,position,status,gsis_id,headshot
Justin Tucker,BAL,K,active,00-0029597,
";
        let err = load_directory_from_reader(csv.as_bytes(), "test").unwrap_err();
        assert!(matches!(err, DirectoryError::Validation(_)));
    }

    #[test]
    fn extra_columns_are_tolerated() {
        let dir = load(ROSTER_CSV);
        // The `college` column is absorbed without error.
        assert_eq!(dir.len(), 4);
    }

    // -- Duplicate collapsing --

    #[test]
    fn duplicate_keys_keep_the_first_record() {
        let mut first = sample_record("Josh Allen", "BUF", Position::Quarterback);
        first.headshot_url = Some("https://static.example.com/first.png".into());
        let mut second = sample_record("Josh Allen", "BUF", Position::Quarterback);
        second.headshot_url = Some("https://static.example.com/second.png".into());

        let dir = PlayerDirectory::new(vec![first, second]);
        assert_eq!(dir.len(), 1);
        let kept = dir.find_by_key("Josh Allen BUF QB").expect("key resolves");
        assert_eq!(
            kept.headshot_url.as_deref(),
            Some("https://static.example.com/first.png")
        );
    }

    #[test]
    fn records_preserve_source_order() {
        let dir = load(ROSTER_CSV);
        let names: Vec<&str> = dir
            .records()
            .iter()
            .map(|r| r.display_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Josh Allen",
                "Saquon Barkley",
                "Justin Jefferson",
                "Travis Kelce"
            ]
        );
    }
}
