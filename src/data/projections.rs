// Weekly projection tables scraped from FantasyPros position pages.
//
// Each position page carries one HTML table (`table#data`) with a two-row
// header: the first row spans stat groups (PASSING, RUSHING, ...), the
// second row holds the real column names. Column names repeat across groups
// (YDS, TDS), so repeats get a positional suffix (YDS.1) before the
// per-position rename step maps them onto canonical stat fields.

use std::collections::HashMap;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::data::directory::{PlayerRecord, Position, ALL_POSITIONS};

/// Source site label, shown alongside the projection table.
pub const PROJECTION_SITE: &str = "FantasyPros";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One scraped projection row. Cells the page leaves blank stay `None`.
/// `player_text` is the raw text of the player cell, kept verbatim for
/// matching against directory records.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRow {
    pub position: Position,
    pub player_text: String,
    pub passing_yds: Option<f64>,
    pub passing_tds: Option<f64>,
    pub interceptions: Option<f64>,
    pub rushing_yds: Option<f64>,
    pub rushing_tds: Option<f64>,
    pub receptions: Option<f64>,
    pub receiving_yds: Option<f64>,
    pub receiving_tds: Option<f64>,
    pub fumbles: Option<f64>,
}

impl ProjectionRow {
    /// A row with every stat cell blank.
    pub fn new(position: Position, player_text: impl Into<String>) -> Self {
        ProjectionRow {
            position,
            player_text: player_text.into(),
            passing_yds: None,
            passing_tds: None,
            interceptions: None,
            rushing_yds: None,
            rushing_tds: None,
            receptions: None,
            receiving_yds: None,
            receiving_tds: None,
            fumbles: None,
        }
    }

    /// Display columns for this row's position, in table order. Quarterbacks
    /// lead with passing, backs with rushing, receivers and tight ends with
    /// receiving; tight ends carry no rushing columns at all.
    pub fn columns(&self) -> Vec<(&'static str, Option<f64>)> {
        match self.position {
            Position::Quarterback => vec![
                ("Passing Yds", self.passing_yds),
                ("Passing TDs", self.passing_tds),
                ("Interceptions", self.interceptions),
                ("Rushing Yds", self.rushing_yds),
                ("Rushing TDs", self.rushing_tds),
                ("Fumbles", self.fumbles),
            ],
            Position::RunningBack => vec![
                ("Rushing Yds", self.rushing_yds),
                ("Rushing TDs", self.rushing_tds),
                ("Receptions", self.receptions),
                ("Receiving Yds", self.receiving_yds),
                ("Receiving TDs", self.receiving_tds),
                ("Fumbles", self.fumbles),
            ],
            Position::WideReceiver => vec![
                ("Receptions", self.receptions),
                ("Receiving Yds", self.receiving_yds),
                ("Receiving TDs", self.receiving_tds),
                ("Rushing Yds", self.rushing_yds),
                ("Rushing TDs", self.rushing_tds),
                ("Fumbles", self.fumbles),
            ],
            Position::TightEnd => vec![
                ("Receptions", self.receptions),
                ("Receiving Yds", self.receiving_yds),
                ("Receiving TDs", self.receiving_tds),
                ("Fumbles", self.fumbles),
            ],
        }
    }
}

/// Decides whether a scraped row refers to a directory record. The site
/// renders player cells as free text ("Josh Allen BUF"), so matching is
/// heuristic and swappable.
pub trait NameMatcher: Send + Sync {
    fn matches(&self, row_text: &str, record: &PlayerRecord) -> bool;
}

/// Case-sensitive containment of both display name and team abbreviation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringMatcher;

impl NameMatcher for SubstringMatcher {
    fn matches(&self, row_text: &str, record: &PlayerRecord) -> bool {
        row_text.contains(&record.display_name) && row_text.contains(&record.team)
    }
}

/// One table per position, loaded once at startup.
#[derive(Debug, Default, Clone)]
pub struct ProjectionTables {
    qb: Vec<ProjectionRow>,
    rb: Vec<ProjectionRow>,
    wr: Vec<ProjectionRow>,
    te: Vec<ProjectionRow>,
}

impl ProjectionTables {
    pub fn table(&self, position: Position) -> &[ProjectionRow] {
        match position {
            Position::Quarterback => &self.qb,
            Position::RunningBack => &self.rb,
            Position::WideReceiver => &self.wr,
            Position::TightEnd => &self.te,
        }
    }

    /// Replace one position's table wholesale.
    pub fn set_table(&mut self, position: Position, rows: Vec<ProjectionRow>) {
        let slot = match position {
            Position::Quarterback => &mut self.qb,
            Position::RunningBack => &mut self.rb,
            Position::WideReceiver => &mut self.wr,
            Position::TightEnd => &mut self.te,
        };
        *slot = rows;
    }

    /// First row in the record's position table the matcher accepts, in
    /// page order. Misses are normal: depth players fall outside the
    /// scraped pages every week.
    pub fn projection_for(
        &self,
        record: &PlayerRecord,
        matcher: &dyn NameMatcher,
    ) -> Option<&ProjectionRow> {
        self.table(record.position)
            .iter()
            .find(|row| matcher.matches(&row.player_text, record))
    }

    pub fn counts(&self) -> [(Position, usize); 4] {
        [
            (Position::Quarterback, self.qb.len()),
            (Position::RunningBack, self.rb.len()),
            (Position::WideReceiver, self.wr.len()),
            (Position::TightEnd, self.te.len()),
        ]
    }

    pub fn len(&self) -> usize {
        self.qb.len() + self.rb.len() + self.wr.len() + self.te.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Error type and page source seam
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("failed to fetch projections page: {0}")]
    Fetch(String),

    #[error("failed to parse projections page: {0}")]
    Parse(String),
}

/// Supplies raw page HTML per position. The live implementation fetches
/// from the projection site; tests and offline runs read files instead.
#[async_trait]
pub trait ProjectionPages: Send + Sync {
    async fn page_for(&self, position: Position) -> Result<String, ProjectionError>;
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Canonical stat fields a raw column can map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    PassingYds,
    PassingTds,
    Interceptions,
    RushingYds,
    RushingTds,
    Receptions,
    ReceivingYds,
    ReceivingTds,
    Fumbles,
}

/// Per-position rename table over suffixed raw names. Returns `None` for
/// columns that are dropped (Player, attempt/completion counts, the site's
/// own fantasy-point totals) or unrecognized.
fn field_for(position: Position, header: &str) -> Option<Field> {
    use Field::*;
    match (position, header) {
        // QB pages: passing group first, then rushing.
        (Position::Quarterback, "YDS") => Some(PassingYds),
        (Position::Quarterback, "TDS") => Some(PassingTds),
        (Position::Quarterback, "INTS") => Some(Interceptions),
        (Position::Quarterback, "YDS.1") => Some(RushingYds),
        (Position::Quarterback, "TDS.1") => Some(RushingTds),
        // RB pages: rushing group first, then receiving.
        (Position::RunningBack, "YDS") => Some(RushingYds),
        (Position::RunningBack, "TDS") => Some(RushingTds),
        (Position::RunningBack, "REC") => Some(Receptions),
        (Position::RunningBack, "YDS.1") => Some(ReceivingYds),
        (Position::RunningBack, "TDS.1") => Some(ReceivingTds),
        // WR pages: receiving group first, then rushing.
        (Position::WideReceiver, "REC") => Some(Receptions),
        (Position::WideReceiver, "YDS") => Some(ReceivingYds),
        (Position::WideReceiver, "TDS") => Some(ReceivingTds),
        (Position::WideReceiver, "YDS.1") => Some(RushingYds),
        (Position::WideReceiver, "TDS.1") => Some(RushingTds),
        // TE pages: receiving only.
        (Position::TightEnd, "REC") => Some(Receptions),
        (Position::TightEnd, "YDS") => Some(ReceivingYds),
        (Position::TightEnd, "TDS") => Some(ReceivingTds),
        (_, "FL") => Some(Fumbles),
        _ => None,
    }
}

fn apply(row: &mut ProjectionRow, field: Field, value: Option<f64>) {
    match field {
        Field::PassingYds => row.passing_yds = value,
        Field::PassingTds => row.passing_tds = value,
        Field::Interceptions => row.interceptions = value,
        Field::RushingYds => row.rushing_yds = value,
        Field::RushingTds => row.rushing_tds = value,
        Field::Receptions => row.receptions = value,
        Field::ReceivingYds => row.receiving_yds = value,
        Field::ReceivingTds => row.receiving_tds = value,
        Field::Fumbles => row.fumbles = value,
    }
}

// ---------------------------------------------------------------------------
// Page parsing
// ---------------------------------------------------------------------------

fn selector(css: &str) -> Result<Selector, ProjectionError> {
    Selector::parse(css).map_err(|e| ProjectionError::Parse(format!("bad selector {css}: {e}")))
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Suffix repeated header names positionally: the second YDS becomes YDS.1,
/// a third would become YDS.2.
fn dedup_headers(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let n = seen.entry(name.clone()).or_insert(0);
            let out = if *n == 0 { name.clone() } else { format!("{name}.{n}") };
            *n += 1;
            out
        })
        .collect()
}

/// Numeric cell parse. Thousands separators are stripped; empty, dashed and
/// non-numeric cells come back as `None`.
fn parse_number(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse one position page into projection rows.
pub fn parse_position_page(
    html: &str,
    position: Position,
) -> Result<Vec<ProjectionRow>, ProjectionError> {
    let document = Html::parse_document(html);
    let table_sel = selector("table#data")?;
    let header_row_sel = selector("thead tr")?;
    let th_sel = selector("th")?;
    let body_row_sel = selector("tbody tr")?;
    let td_sel = selector("td")?;

    let table = document.select(&table_sel).next().ok_or_else(|| {
        ProjectionError::Parse(format!("no table#data element on the {position} page"))
    })?;

    let header_rows: Vec<ElementRef> = table.select(&header_row_sel).collect();
    if header_rows.len() < 2 {
        return Err(ProjectionError::Parse(format!(
            "expected a two-row header on the {} page, found {} row(s)",
            position,
            header_rows.len()
        )));
    }
    // The second header row carries the real column names.
    let headers = dedup_headers(header_rows[1].select(&th_sel).map(cell_text).collect());
    let player_idx = headers
        .iter()
        .position(|h| h == "Player")
        .ok_or_else(|| {
            ProjectionError::Parse(format!("no Player column on the {position} page"))
        })?;

    let mut rows = Vec::new();
    for body_row in table.select(&body_row_sel) {
        let cells: Vec<String> = body_row.select(&td_sel).map(cell_text).collect();
        if cells.len() != headers.len() {
            // Ad and banner rows inside tbody have a different cell count.
            debug!(
                "skipping {} projection row with {} cells (expected {})",
                position,
                cells.len(),
                headers.len()
            );
            continue;
        }
        let player_text = cells[player_idx].clone();
        if player_text.is_empty() {
            warn!("skipping {} projection row with an empty player cell", position);
            continue;
        }

        let mut row = ProjectionRow::new(position, player_text);
        for (idx, header) in headers.iter().enumerate() {
            if idx == player_idx {
                continue;
            }
            if let Some(field) = field_for(position, header) {
                apply(&mut row, field, parse_number(&cells[idx]));
            }
        }
        rows.push(row);
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Fetch and parse all four position tables. A position whose page cannot
/// be fetched or parsed ends up with an empty table rather than failing the
/// whole load; lookups against it simply miss.
pub async fn load_projections(source: &dyn ProjectionPages) -> ProjectionTables {
    let mut tables = ProjectionTables::default();
    for position in ALL_POSITIONS {
        match source.page_for(position).await {
            Ok(html) => match parse_position_page(&html, position) {
                Ok(rows) => {
                    info!("loaded {} {} projection rows", rows.len(), position);
                    tables.set_table(position, rows);
                }
                Err(e) => {
                    warn!("could not parse {} projections: {}", position, e);
                }
            },
            Err(e) => {
                warn!("could not fetch {} projections: {}", position, e);
            }
        }
    }
    tables
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::directory::composite_key;

    fn record(name: &str, team: &str, position: Position) -> PlayerRecord {
        PlayerRecord {
            player_id: "00-0000000".to_string(),
            display_name: name.to_string(),
            team: team.to_string(),
            position,
            headshot_url: None,
            composite_key: composite_key(name, team, position),
        }
    }

    const WR_PAGE: &str = r#"
<html><body>
<table id="data" class="table">
  <thead>
    <tr class="tablesorter-headerRow">
      <th></th><th colspan="3">RECEIVING</th><th colspan="3">RUSHING</th><th colspan="2">MISC</th>
    </tr>
    <tr>
      <th>Player</th><th>REC</th><th>YDS</th><th>TDS</th>
      <th>ATT</th><th>YDS</th><th>TDS</th><th>FL</th><th>FPTS</th>
    </tr>
  </thead>
  <tbody>
    <tr>
      <td class="player-label"><a href="/nfl/players/justin-jefferson.php">Justin Jefferson</a> MIN</td>
      <td>7.2</td><td>101.9</td><td>0.6</td>
      <td>0.1</td><td>0.5</td><td>0.0</td><td>0.1</td><td>17.4</td>
    </tr>
    <tr>
      <td class="player-label"><a href="/nfl/players/deebo-samuel.php">Deebo Samuel</a> SF</td>
      <td>5.8</td><td>74.3</td><td>0.4</td>
      <td>2.1</td><td>13.6</td><td>0.1</td><td>0.1</td><td>14.2</td>
    </tr>
  </tbody>
</table>
</body></html>
"#;

    const QB_PAGE: &str = r#"
<html><body>
<table id="data" class="table">
  <thead>
    <tr><th></th><th colspan="5">PASSING</th><th colspan="3">RUSHING</th><th colspan="2">MISC</th></tr>
    <tr>
      <th>Player</th><th>ATT</th><th>CMP</th><th>YDS</th><th>TDS</th><th>INTS</th>
      <th>ATT</th><th>YDS</th><th>TDS</th><th>FL</th><th>FPTS</th>
    </tr>
  </thead>
  <tbody>
    <tr>
      <td><a href="/nfl/players/josh-allen.php">Josh Allen</a> BUF</td>
      <td>34.5</td><td>22.1</td><td>1,024.7</td><td>1.9</td><td>0.8</td>
      <td>8.2</td><td>42.3</td><td>0.5</td><td>0.2</td><td>24.1</td>
    </tr>
  </tbody>
</table>
</body></html>
"#;

    const TE_PAGE: &str = r#"
<html><body>
<table id="data" class="table">
  <thead>
    <tr><th></th><th colspan="3">RECEIVING</th><th colspan="2">MISC</th></tr>
    <tr><th>Player</th><th>REC</th><th>YDS</th><th>TDS</th><th>FL</th><th>FPTS</th></tr>
  </thead>
  <tbody>
    <tr>
      <td><a href="/nfl/players/travis-kelce.php">Travis Kelce</a> KC</td>
      <td>6.1</td><td>64.8</td><td>0.5</td><td>0.0</td><td>12.9</td>
    </tr>
  </tbody>
</table>
</body></html>
"#;

    // -- Header handling --

    #[test]
    fn repeated_header_names_get_positional_suffixes() {
        let names = ["Player", "YDS", "TDS", "YDS", "TDS", "FL"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            dedup_headers(names),
            vec!["Player", "YDS", "TDS", "YDS.1", "TDS.1", "FL"]
        );
    }

    #[test]
    fn single_header_row_is_a_parse_error() {
        let html = r#"<table id="data"><thead><tr><th>Player</th></tr></thead><tbody></tbody></table>"#;
        let err = parse_position_page(html, Position::TightEnd).unwrap_err();
        assert!(matches!(err, ProjectionError::Parse(_)));
    }

    #[test]
    fn missing_table_is_a_parse_error() {
        let err = parse_position_page("<html><body><p>gone</p></body></html>", Position::Quarterback)
            .unwrap_err();
        assert!(matches!(err, ProjectionError::Parse(_)));
    }

    // -- Per-position mapping --

    #[test]
    fn wr_page_maps_receiving_before_rushing() {
        let rows = parse_position_page(WR_PAGE, Position::WideReceiver).unwrap();
        assert_eq!(rows.len(), 2);
        let jj = &rows[0];
        assert_eq!(jj.player_text, "Justin Jefferson MIN");
        assert_eq!(jj.receptions, Some(7.2));
        assert_eq!(jj.receiving_yds, Some(101.9));
        assert_eq!(jj.receiving_tds, Some(0.6));
        assert_eq!(jj.rushing_yds, Some(0.5));
        assert_eq!(jj.rushing_tds, Some(0.0));
        assert_eq!(jj.fumbles, Some(0.1));
        // Passing never appears on a receiver page.
        assert_eq!(jj.passing_yds, None);
    }

    #[test]
    fn qb_page_maps_passing_before_rushing() {
        let rows = parse_position_page(QB_PAGE, Position::Quarterback).unwrap();
        assert_eq!(rows.len(), 1);
        let allen = &rows[0];
        assert_eq!(allen.player_text, "Josh Allen BUF");
        assert_eq!(allen.passing_yds, Some(1024.7));
        assert_eq!(allen.passing_tds, Some(1.9));
        assert_eq!(allen.interceptions, Some(0.8));
        assert_eq!(allen.rushing_yds, Some(42.3));
        assert_eq!(allen.rushing_tds, Some(0.5));
        assert_eq!(allen.fumbles, Some(0.2));
        assert_eq!(allen.receptions, None);
    }

    #[test]
    fn te_page_has_no_rushing_columns() {
        let rows = parse_position_page(TE_PAGE, Position::TightEnd).unwrap();
        let kelce = &rows[0];
        assert_eq!(kelce.receptions, Some(6.1));
        assert_eq!(kelce.receiving_yds, Some(64.8));
        assert_eq!(kelce.rushing_yds, None);
        let labels: Vec<&str> = kelce.columns().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec!["Receptions", "Receiving Yds", "Receiving TDs", "Fumbles"]
        );
    }

    #[test]
    fn qb_columns_lead_with_passing() {
        let rows = parse_position_page(QB_PAGE, Position::Quarterback).unwrap();
        let labels: Vec<&str> = rows[0].columns().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec![
                "Passing Yds",
                "Passing TDs",
                "Interceptions",
                "Rushing Yds",
                "Rushing TDs",
                "Fumbles"
            ]
        );
    }

    // -- Cell parsing --

    #[test]
    fn thousands_separators_are_stripped() {
        assert_eq!(parse_number("1,024.7"), Some(1024.7));
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
    }

    #[test]
    fn blank_and_dashed_cells_are_none() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("  "), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("n/a"), None);
    }

    #[test]
    fn short_rows_are_skipped() {
        let html = r#"
<table id="data">
  <thead>
    <tr><th></th><th colspan="3">RECEIVING</th><th colspan="2">MISC</th></tr>
    <tr><th>Player</th><th>REC</th><th>YDS</th><th>TDS</th><th>FL</th><th>FPTS</th></tr>
  </thead>
  <tbody>
    <tr><td colspan="6">Advertisement</td></tr>
    <tr><td>Travis Kelce KC</td><td>6.1</td><td>64.8</td><td>0.5</td><td>0.0</td><td>12.9</td></tr>
  </tbody>
</table>
"#;
        let rows = parse_position_page(html, Position::TightEnd).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player_text, "Travis Kelce KC");
    }

    // -- Matching --

    #[test]
    fn substring_matcher_needs_name_and_team() {
        let matcher = SubstringMatcher;
        let jefferson = record("Justin Jefferson", "MIN", Position::WideReceiver);
        assert!(matcher.matches("Justin Jefferson MIN", &jefferson));
        assert!(!matcher.matches("Justin Jefferson JAX", &jefferson));
        assert!(!matcher.matches("Van Jefferson MIN", &jefferson));
    }

    #[test]
    fn substring_matcher_is_case_sensitive() {
        let matcher = SubstringMatcher;
        let jefferson = record("Justin Jefferson", "MIN", Position::WideReceiver);
        assert!(!matcher.matches("justin jefferson MIN", &jefferson));
    }

    #[test]
    fn projection_for_returns_the_first_match() {
        let mut tables = ProjectionTables::default();
        tables.set_table(
            Position::WideReceiver,
            parse_position_page(WR_PAGE, Position::WideReceiver).unwrap(),
        );

        let jefferson = record("Justin Jefferson", "MIN", Position::WideReceiver);
        let row = tables.projection_for(&jefferson, &SubstringMatcher).unwrap();
        assert_eq!(row.receiving_yds, Some(101.9));

        // Lookup only searches the record's own position table.
        let ghost = record("Justin Jefferson", "MIN", Position::TightEnd);
        assert!(tables.projection_for(&ghost, &SubstringMatcher).is_none());
    }

    #[test]
    fn first_of_two_matching_rows_wins() {
        let mut tables = ProjectionTables::default();
        let mut first = ProjectionRow::new(Position::WideReceiver, "Justin Jefferson MIN");
        first.receptions = Some(7.2);
        let mut second = ProjectionRow::new(Position::WideReceiver, "Justin Jefferson MIN (dup)");
        second.receptions = Some(1.0);
        tables.set_table(Position::WideReceiver, vec![first, second]);

        let jefferson = record("Justin Jefferson", "MIN", Position::WideReceiver);
        let row = tables.projection_for(&jefferson, &SubstringMatcher).unwrap();
        assert_eq!(row.receptions, Some(7.2));
    }

    // -- Loading over a page source --

    struct StaticPages {
        pages: HashMap<Position, String>,
    }

    #[async_trait]
    impl ProjectionPages for StaticPages {
        async fn page_for(&self, position: Position) -> Result<String, ProjectionError> {
            self.pages
                .get(&position)
                .cloned()
                .ok_or_else(|| ProjectionError::Fetch(format!("no page for {position}")))
        }
    }

    #[tokio::test]
    async fn failed_positions_load_as_empty_tables() {
        let mut pages = HashMap::new();
        pages.insert(Position::WideReceiver, WR_PAGE.to_string());
        pages.insert(Position::TightEnd, "<html><body>outage</body></html>".to_string());
        let source = StaticPages { pages };

        let tables = load_projections(&source).await;
        assert_eq!(tables.table(Position::WideReceiver).len(), 2);
        // Fetch failure (QB/RB) and parse failure (TE) both degrade to empty.
        assert!(tables.table(Position::Quarterback).is_empty());
        assert!(tables.table(Position::RunningBack).is_empty());
        assert!(tables.table(Position::TightEnd).is_empty());
        assert_eq!(tables.len(), 2);
    }
}
