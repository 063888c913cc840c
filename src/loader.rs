// 📂 Loader - CSV exports in, JSON documents out
//
// Thin I/O shell around the core. Each exported table lives in its own
// `<table>_rows.csv`; the header row names the fields, every value stays text.

use crate::rows::{Row, RowSet, SourceTables, Table};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const PLAYERS_FILE: &str = "players.json";
pub const SCORES_FILE: &str = "scores.json";

/// Load one exported table
pub fn load_row_set(csv_path: &Path, table: Table) -> Result<RowSet> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;

    let mut set = RowSet::new(table);

    for result in rdr.deserialize() {
        let record: HashMap<String, String> = result
            .with_context(|| format!("Failed to read {} row", table.as_str()))?;
        set.push(record.into_iter().collect::<Row>());
    }

    Ok(set)
}

/// Load all six tables from `dir`
pub fn load_tables(dir: &Path) -> Result<SourceTables> {
    let mut tables = SourceTables::empty();

    for table in Table::ALL {
        let path = dir.join(table.file_name());
        *tables.get_mut(table) = load_row_set(&path, table)?;
    }

    Ok(tables)
}

/// Compact JSON (no whitespace, non-ASCII kept as is)
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string(value).context("Failed to serialize JSON")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

/// Write `players.json` and `scores.json` into `dir`
pub fn write_documents<P: Serialize, S: Serialize>(
    dir: &Path,
    players: &[P],
    sessions: &[S],
) -> Result<(PathBuf, PathBuf)> {
    let players_path = dir.join(PLAYERS_FILE);
    let scores_path = dir.join(SCORES_FILE);

    write_json(&players_path, players)?;
    write_json(&scores_path, sessions)?;

    Ok((players_path, scores_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Player;
    use tempfile::TempDir;

    fn write_export(dir: &Path) {
        let files = [
            (Table::Profiles, "id,username,created_at\np1,Ann,2024-01-01\np2,\"Zoë, Jr\",2024-01-02\n"),
            (Table::Games, "id,bgg_id,name\ng1,13,Catan\n"),
            (Table::GameScores, "id,game_id,played_at\ns1,g1,2025-01-15 00:00:00+00\n"),
            (
                Table::ScoreParticipants,
                "score_id,player_id,score,winner\ns1,p1,10.00,true\ns1,p2,,false\n",
            ),
            (Table::Expansions, "id,bgg_id,name\n"),
            (Table::SessionExpansions, "score_id,expansion_id\n"),
        ];

        for (table, content) in files {
            fs::write(dir.join(table.file_name()), content).unwrap();
        }
    }

    #[test]
    fn test_load_tables() {
        let dir = TempDir::new().unwrap();
        write_export(dir.path());

        let tables = load_tables(dir.path()).unwrap();

        assert_eq!(tables.profiles.len(), 2);
        assert_eq!(tables.profiles.rows[1].get("username"), Some("Zoë, Jr"));
        assert_eq!(tables.profiles.rows[0].get("created_at"), Some("2024-01-01"));
        assert_eq!(tables.score_participants.rows[1].get("score"), Some(""));
        assert!(tables.expansions.is_empty());
        assert_eq!(tables.session_expansions.table, Table::SessionExpansions);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_row_set(&dir.path().join("profiles_rows.csv"), Table::Profiles).unwrap_err();
        assert!(err.to_string().contains("Failed to open CSV file"));
    }

    #[test]
    fn test_write_compact_json() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("data");
        let players = vec![Player {
            id: "39eWdE8hZJ".to_string(),
            name: "Zoë".to_string(),
            color: "#ef4444".to_string(),
        }];

        let (players_path, scores_path) =
            write_documents::<Player, Player>(&out_dir, &players, &[]).unwrap();

        assert_eq!(
            fs::read_to_string(players_path).unwrap(),
            r##"[{"id":"39eWdE8hZJ","name":"Zoë","color":"#ef4444"}]"##
        );
        assert_eq!(fs::read_to_string(scores_path).unwrap(), "[]");
    }
}
