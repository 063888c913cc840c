// 🗂️ Reference Index - Old relational keys → resolved output fragments
//
// Built in one pass over the six row-sets BEFORE any output record exists:
//
//   profiles            → profile id   → new player id
//   games               → game id      → { catalog id, name }
//   expansions          → expansion id → { catalog id, name }
//   session_expansions  → session id   → [ { catalog id, name } ]
//   score_participants  → session id   → [ participant rows ]
//
// Once built the index is read-only; the transformer only borrows it.

use crate::error::Result;
use crate::ids::{generate_id, RandomSource};
use crate::rows::{
    CatalogRecord, ParticipantRecord, ProfileRecord, SessionExpansionRecord, SourceTables,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

// ============================================================================
// RESOLVED FRAGMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRef {
    pub catalog_id: i64,
    pub name: String,
}

/// Expansion as embedded in an output session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionRef {
    #[serde(rename = "id")]
    pub catalog_id: i64,
    pub name: String,
}

/// Participant row kept as raw text; parsed by the transformer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRef {
    pub profile_id: String,
    pub raw_score: String,
    pub raw_winner: String,
}

/// Old profile id and the player id that replaces it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMapping {
    pub username: String,
    pub old_id: String,
    pub new_id: String,
}

// ============================================================================
// REFERENCE INDEX
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    player_ids: HashMap<String, String>,
    games: HashMap<String, GameRef>,
    expansions: HashMap<String, ExpansionRef>,
    session_expansions: HashMap<String, Vec<ExpansionRef>>,
    session_participants: HashMap<String, Vec<ParticipantRef>>,

    /// One entry per profile row, in source order. A repeated profile id
    /// still gets its own player, but only the last one is referenceable.
    player_mappings: Vec<PlayerMapping>,

    /// Join rows pointing at an unknown expansion
    dropped_expansion_links: usize,
}

impl ReferenceIndex {
    /// Build every lookup table; one new id per profile row
    ///
    /// Duplicate primary keys: the LAST row wins the lookup. A duplicated
    /// profile still gets its own id and player, so player ids stay unique.
    pub fn build<R: RandomSource + ?Sized>(tables: &SourceTables, rng: &mut R) -> Result<Self> {
        let mut index = ReferenceIndex::default();

        for profile in tables.profiles.decode(ProfileRecord::decode)? {
            let new_id = generate_id(rng);
            debug!(old_id = profile.id, %new_id, username = profile.username, "mapped profile");

            if index
                .player_ids
                .insert(profile.id.to_string(), new_id.clone())
                .is_some()
            {
                warn!(profile_id = profile.id, "duplicate profile id, last row wins lookups");
            }

            index.player_mappings.push(PlayerMapping {
                username: profile.username.to_string(),
                old_id: profile.id.to_string(),
                new_id,
            });
        }

        for game in tables.games.decode(CatalogRecord::decode)? {
            let game_ref = GameRef {
                catalog_id: game.catalog_id,
                name: game.name.to_string(),
            };
            if index.games.insert(game.id.to_string(), game_ref).is_some() {
                warn!(game_id = game.id, "duplicate game id, keeping last");
            }
        }

        for expansion in tables.expansions.decode(CatalogRecord::decode)? {
            let expansion_ref = ExpansionRef {
                catalog_id: expansion.catalog_id,
                name: expansion.name.to_string(),
            };
            if index
                .expansions
                .insert(expansion.id.to_string(), expansion_ref)
                .is_some()
            {
                warn!(expansion_id = expansion.id, "duplicate expansion id, keeping last");
            }
        }

        for link in tables
            .session_expansions
            .decode(SessionExpansionRecord::decode)?
        {
            let Some(expansion) = index.expansions.get(link.expansion_id) else {
                debug!(
                    session_id = link.session_id,
                    expansion_id = link.expansion_id,
                    "dropping link to unknown expansion"
                );
                index.dropped_expansion_links += 1;
                continue;
            };

            index
                .session_expansions
                .entry(link.session_id.to_string())
                .or_default()
                .push(expansion.clone());
        }

        for participant in tables
            .score_participants
            .decode(ParticipantRecord::decode)?
        {
            index
                .session_participants
                .entry(participant.session_id.to_string())
                .or_default()
                .push(ParticipantRef {
                    profile_id: participant.profile_id.to_string(),
                    raw_score: participant.raw_score.to_string(),
                    raw_winner: participant.raw_winner.to_string(),
                });
        }

        Ok(index)
    }

    pub fn player_id(&self, profile_id: &str) -> Option<&str> {
        self.player_ids.get(profile_id).map(String::as_str)
    }

    pub fn game(&self, game_id: &str) -> Option<&GameRef> {
        self.games.get(game_id)
    }

    pub fn expansion(&self, expansion_id: &str) -> Option<&ExpansionRef> {
        self.expansions.get(expansion_id)
    }

    /// Expansions played in a session, join-row order; empty when none
    pub fn session_expansions(&self, session_id: &str) -> &[ExpansionRef] {
        self.session_expansions
            .get(session_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Participants of a session, source order; empty when none
    pub fn participants(&self, session_id: &str) -> &[ParticipantRef] {
        self.session_participants
            .get(session_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn player_mappings(&self) -> &[PlayerMapping] {
        &self.player_mappings
    }

    pub fn dropped_expansion_links(&self) -> usize {
        self.dropped_expansion_links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MigrationError;
    use crate::rows::{Row, Table};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tables() -> SourceTables {
        let mut tables = SourceTables::empty();

        tables.profiles.push(Row::new().with("id", "p1").with("username", "Ann"));
        tables.profiles.push(Row::new().with("id", "p2").with("username", "Bo"));

        tables
            .games
            .push(Row::new().with("id", "g1").with("bgg_id", "13").with("name", "Catan"));

        tables.expansions.push(
            Row::new()
                .with("id", "e1")
                .with("bgg_id", "325")
                .with("name", "Seafarers"),
        );
        tables.expansions.push(
            Row::new()
                .with("id", "e2")
                .with("bgg_id", "926")
                .with("name", "Cities & Knights"),
        );

        for (session, expansion) in [("s1", "e2"), ("s1", "missing"), ("s1", "e1"), ("s2", "e1")] {
            tables.session_expansions.push(
                Row::new()
                    .with("score_id", session)
                    .with("expansion_id", expansion),
            );
        }

        for (session, player, score, winner) in
            [("s1", "p2", "8", "false"), ("s1", "p1", "10.00", "true"), ("s2", "p1", "", "")]
        {
            tables.score_participants.push(
                Row::new()
                    .with("score_id", session)
                    .with("player_id", player)
                    .with("score", score)
                    .with("winner", winner),
            );
        }

        tables
    }

    #[test]
    fn test_build_lookups() {
        let mut rng = StdRng::seed_from_u64(1);
        let index = ReferenceIndex::build(&tables(), &mut rng).unwrap();

        assert!(index.player_id("p1").is_some());
        assert!(index.player_id("p2").is_some());
        assert_ne!(index.player_id("p1"), index.player_id("p2"));
        assert!(index.player_id("p3").is_none());

        let catan = index.game("g1").unwrap();
        assert_eq!(catan.catalog_id, 13);
        assert_eq!(catan.name, "Catan");
        assert!(index.game("g2").is_none());

        assert_eq!(index.expansion("e2").unwrap().catalog_id, 926);
    }

    #[test]
    fn test_session_expansions_preserve_order_and_drop_unknown() {
        let mut rng = StdRng::seed_from_u64(1);
        let index = ReferenceIndex::build(&tables(), &mut rng).unwrap();

        let names: Vec<&str> = index
            .session_expansions("s1")
            .iter()
            .map(|e| e.name.as_str())
            .collect();

        assert_eq!(names, vec!["Cities & Knights", "Seafarers"]);
        assert_eq!(index.session_expansions("s2").len(), 1);
        assert!(index.session_expansions("s3").is_empty());
        assert_eq!(index.dropped_expansion_links(), 1);
    }

    #[test]
    fn test_participants_keep_raw_text_in_source_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let index = ReferenceIndex::build(&tables(), &mut rng).unwrap();

        let s1 = index.participants("s1");
        assert_eq!(s1.len(), 2);
        assert_eq!(s1[0].profile_id, "p2");
        assert_eq!(s1[1].profile_id, "p1");
        assert_eq!(s1[1].raw_score, "10.00");
        assert_eq!(s1[1].raw_winner, "true");

        assert!(index.participants("nope").is_empty());
    }

    #[test]
    fn test_player_mappings_follow_profile_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let index = ReferenceIndex::build(&tables(), &mut rng).unwrap();

        let mappings = index.player_mappings();
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].username, "Ann");
        assert_eq!(Some(mappings[0].new_id.as_str()), index.player_id("p1"));
        assert_eq!(mappings[1].old_id, "p2");
    }

    #[test]
    fn test_duplicate_profile_last_wins() {
        let mut tables = tables();
        tables.profiles.push(Row::new().with("id", "p1").with("username", "Ann again"));

        let mut rng = StdRng::seed_from_u64(1);
        let index = ReferenceIndex::build(&tables, &mut rng).unwrap();

        let mappings = index.player_mappings();
        assert_eq!(mappings.len(), 3);
        assert_ne!(mappings[0].new_id, mappings[2].new_id);
        assert_eq!(index.player_id("p1"), Some(mappings[2].new_id.as_str()));
    }

    #[test]
    fn test_duplicate_game_last_wins() {
        let mut tables = tables();
        tables.games.rows.insert(
            0,
            Row::new().with("id", "g1").with("bgg_id", "12").with("name", "Catan (old)"),
        );

        let mut rng = StdRng::seed_from_u64(1);
        let index = ReferenceIndex::build(&tables, &mut rng).unwrap();

        let catan = index.game("g1").unwrap();
        assert_eq!(catan.catalog_id, 13);
        assert_eq!(catan.name, "Catan");
    }

    #[test]
    fn test_duplicate_expansion_last_wins() {
        let mut tables = tables();
        tables.expansions.push(
            Row::new()
                .with("id", "e1")
                .with("bgg_id", "3250")
                .with("name", "Seafarers 5-6"),
        );

        let mut rng = StdRng::seed_from_u64(1);
        let index = ReferenceIndex::build(&tables, &mut rng).unwrap();

        assert_eq!(index.expansion("e1").unwrap().catalog_id, 3250);
        assert_eq!(index.session_expansions("s2")[0].name, "Seafarers 5-6");
    }

    #[test]
    fn test_bad_catalog_id_is_fatal() {
        let mut tables = tables();
        tables
            .games
            .push(Row::new().with("id", "g2").with("bgg_id", "n/a").with("name", "Azul"));

        let mut rng = StdRng::seed_from_u64(1);
        let err = ReferenceIndex::build(&tables, &mut rng).unwrap_err();

        assert_eq!(
            err,
            MigrationError::InvalidCatalogId {
                table: Table::Games.as_str().to_string(),
                row: 2,
                value: "n/a".to_string(),
            }
        );
    }
}
