// 📋 Source Rows - Flat row-sets from the relational export
//
// Every value arrives as text, exactly as the export wrote it. Numeric and
// boolean columns are parsed later by the core, never assumed pre-typed.
//
// The typed records below BORROW from the row-sets: decoding checks that the
// required columns exist, nothing more. Missing references are resolved
// (and tolerated) by the index builder and the transformer.

use crate::error::{MigrationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// TABLE
// ============================================================================

/// The six exported tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Profiles,
    Games,
    Expansions,
    GameScores,
    ScoreParticipants,
    SessionExpansions,
}

impl Table {
    /// Order the CLI loads and reports tables in
    pub const ALL: [Table; 6] = [
        Table::Profiles,
        Table::Games,
        Table::GameScores,
        Table::ScoreParticipants,
        Table::Expansions,
        Table::SessionExpansions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::Games => "games",
            Table::Expansions => "expansions",
            Table::GameScores => "game_scores",
            Table::ScoreParticipants => "score_participants",
            Table::SessionExpansions => "session_expansions",
        }
    }

    /// File name the export tool gives this table, e.g. `profiles_rows.csv`
    pub fn file_name(&self) -> String {
        format!("{}_rows.csv", self.as_str())
    }
}

// ============================================================================
// ROW / ROW SET
// ============================================================================

/// One exported record: column name → raw text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: HashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    /// Builder-style insert, handy for fixtures
    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: &str) {
        self.fields.insert(field.to_string(), value.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// All rows of one table, in the order the export supplied them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSet {
    pub table: Table,
    pub rows: Vec<Row>,
}

impl RowSet {
    pub fn new(table: Table) -> Self {
        RowSet {
            table,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(table: Table, rows: Vec<Row>) -> Self {
        RowSet { table, rows }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Decode every row with `decode`, stopping at the first structural failure
    pub fn decode<'a, T>(
        &'a self,
        decode: impl Fn(&RowView<'a>) -> Result<T>,
    ) -> Result<Vec<T>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                decode(&RowView {
                    table: self.table,
                    number: index + 1,
                    row,
                })
            })
            .collect()
    }
}

/// A row plus enough context to report where a structural failure happened
pub struct RowView<'a> {
    pub table: Table,
    /// 1-based data row number (header excluded)
    pub number: usize,
    pub row: &'a Row,
}

impl<'a> RowView<'a> {
    /// Field that must be present (an empty value is still present)
    pub fn required(&self, field: &str) -> Result<&'a str> {
        self.row
            .get(field)
            .ok_or_else(|| MigrationError::MissingField {
                table: self.table.as_str().to_string(),
                row: self.number,
                field: field.to_string(),
            })
    }

    /// Required integer column (`bgg_id`)
    pub fn catalog_id(&self, field: &str) -> Result<i64> {
        let raw = self.required(field)?;
        raw.trim()
            .parse::<i64>()
            .map_err(|_| MigrationError::InvalidCatalogId {
                table: self.table.as_str().to_string(),
                row: self.number,
                value: raw.to_string(),
            })
    }
}

// ============================================================================
// SOURCE TABLES
// ============================================================================

/// The complete export, fully loaded before the transform starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTables {
    pub profiles: RowSet,
    pub games: RowSet,
    pub expansions: RowSet,
    pub game_scores: RowSet,
    pub score_participants: RowSet,
    pub session_expansions: RowSet,
}

impl SourceTables {
    pub fn empty() -> Self {
        SourceTables {
            profiles: RowSet::new(Table::Profiles),
            games: RowSet::new(Table::Games),
            expansions: RowSet::new(Table::Expansions),
            game_scores: RowSet::new(Table::GameScores),
            score_participants: RowSet::new(Table::ScoreParticipants),
            session_expansions: RowSet::new(Table::SessionExpansions),
        }
    }

    pub fn get(&self, table: Table) -> &RowSet {
        match table {
            Table::Profiles => &self.profiles,
            Table::Games => &self.games,
            Table::Expansions => &self.expansions,
            Table::GameScores => &self.game_scores,
            Table::ScoreParticipants => &self.score_participants,
            Table::SessionExpansions => &self.session_expansions,
        }
    }

    pub fn get_mut(&mut self, table: Table) -> &mut RowSet {
        match table {
            Table::Profiles => &mut self.profiles,
            Table::Games => &mut self.games,
            Table::Expansions => &mut self.expansions,
            Table::GameScores => &mut self.game_scores,
            Table::ScoreParticipants => &mut self.score_participants,
            Table::SessionExpansions => &mut self.session_expansions,
        }
    }
}

// ============================================================================
// TYPED SOURCE RECORDS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecord<'a> {
    pub id: &'a str,
    pub username: &'a str,
}

impl<'a> ProfileRecord<'a> {
    pub fn decode(view: &RowView<'a>) -> Result<Self> {
        Ok(ProfileRecord {
            id: view.required("id")?,
            username: view.required("username")?,
        })
    }
}

/// A game or an expansion: both carry a catalog (BoardGameGeek) id
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord<'a> {
    pub id: &'a str,
    pub catalog_id: i64,
    pub name: &'a str,
}

impl<'a> CatalogRecord<'a> {
    pub fn decode(view: &RowView<'a>) -> Result<Self> {
        Ok(CatalogRecord {
            id: view.required("id")?,
            catalog_id: view.catalog_id("bgg_id")?,
            name: view.required("name")?,
        })
    }
}

/// A `game_scores` row: one play session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord<'a> {
    pub id: &'a str,
    pub game_id: &'a str,
    pub played_at: &'a str,
}

impl<'a> SessionRecord<'a> {
    pub fn decode(view: &RowView<'a>) -> Result<Self> {
        Ok(SessionRecord {
            id: view.required("id")?,
            game_id: view.required("game_id")?,
            played_at: view.required("played_at")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRecord<'a> {
    pub session_id: &'a str,
    pub profile_id: &'a str,
    pub raw_score: &'a str,
    pub raw_winner: &'a str,
}

impl<'a> ParticipantRecord<'a> {
    pub fn decode(view: &RowView<'a>) -> Result<Self> {
        Ok(ParticipantRecord {
            session_id: view.required("score_id")?,
            profile_id: view.required("player_id")?,
            raw_score: view.required("score")?,
            raw_winner: view.required("winner")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionExpansionRecord<'a> {
    pub session_id: &'a str,
    pub expansion_id: &'a str,
}

impl<'a> SessionExpansionRecord<'a> {
    pub fn decode(view: &RowView<'a>) -> Result<Self> {
        Ok(SessionExpansionRecord {
            session_id: view.required("score_id")?,
            expansion_id: view.required("expansion_id")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_file_names() {
        assert_eq!(Table::Profiles.file_name(), "profiles_rows.csv");
        assert_eq!(Table::GameScores.file_name(), "game_scores_rows.csv");
        assert_eq!(
            Table::SessionExpansions.file_name(),
            "session_expansions_rows.csv"
        );
    }

    #[test]
    fn test_decode_profiles() {
        let set = RowSet::with_rows(
            Table::Profiles,
            vec![
                Row::new().with("id", "p1").with("username", "Ann"),
                Row::new().with("id", "p2").with("username", "Bo").with("avatar", "x"),
            ],
        );

        let profiles = set.decode(ProfileRecord::decode).unwrap();

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].id, "p1");
        assert_eq!(profiles[1].username, "Bo");
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let set = RowSet::with_rows(
            Table::GameScores,
            vec![
                Row::new().with("id", "s1").with("game_id", "g1").with("played_at", ""),
                Row::new().with("game_id", "g1").with("played_at", ""),
            ],
        );

        let err = set.decode(SessionRecord::decode).unwrap_err();

        assert_eq!(
            err,
            MigrationError::MissingField {
                table: "game_scores".to_string(),
                row: 2,
                field: "id".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_value_counts_as_present() {
        let set = RowSet::with_rows(
            Table::ScoreParticipants,
            vec![Row::new()
                .with("score_id", "s1")
                .with("player_id", "p1")
                .with("score", "")
                .with("winner", "")],
        );

        let participants = set.decode(ParticipantRecord::decode).unwrap();
        assert_eq!(participants[0].raw_score, "");
        assert_eq!(participants[0].raw_winner, "");
    }

    #[test]
    fn test_catalog_id_parsing() {
        let set = RowSet::with_rows(
            Table::Games,
            vec![Row::new().with("id", "g1").with("bgg_id", " 13 ").with("name", "Catan")],
        );
        let games = set.decode(CatalogRecord::decode).unwrap();
        assert_eq!(games[0].catalog_id, 13);

        let bad = RowSet::with_rows(
            Table::Expansions,
            vec![Row::new().with("id", "e1").with("bgg_id", "13.5").with("name", "Seafarers")],
        );
        let err = bad.decode(CatalogRecord::decode).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidCatalogId { row: 1, .. }));
    }

    #[test]
    fn test_row_from_iterator() {
        let row: Row = vec![("id", "p1"), ("username", "Ann")].into_iter().collect();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("username"), Some("Ann"));
        assert_eq!(row.get("missing"), None);
    }
}
