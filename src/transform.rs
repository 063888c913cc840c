// 🔄 Record Transformer - Source rows → Player / Session documents
//
// Referential policy per session:
//   unknown game                 → skip session (counted)
//   no participant rows          → skip session (counted)
//   ANY participant unknown      → skip WHOLE session (counted)
//   unknown expansion            → already dropped by the index
//
// A skipped session never consumes a generated id.

use crate::colors::Palette;
use crate::error::Result;
use crate::ids::{generate_id, RandomSource};
use crate::index::{ExpansionRef, ReferenceIndex};
use crate::normalize::{parse_date, parse_score, parse_winner, Score};
use crate::rows::{SessionRecord, SourceTables};
use serde::{Deserialize, Serialize};
use tracing::warn;

// ============================================================================
// OUTPUT DOCUMENTS
// ============================================================================

/// Roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// `#rrggbb` from the palette
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPlayer {
    pub player_id: String,
    pub score: Option<Score>,
    pub is_winner: bool,
}

/// One play session ("score" in the app)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    /// `YYYY-MM-DD`, `None` when the export had no timestamp
    pub date: Option<String>,
    pub game_id: i64,
    pub game_name: String,
    pub expansions: Vec<ExpansionRef>,
    pub players: Vec<SessionPlayer>,
}

// ============================================================================
// SKIPS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnknownGame,
    NoParticipants,
    UnknownProfile,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::UnknownGame => "unknown game",
            SkipReason::NoParticipants => "no participants",
            SkipReason::UnknownProfile => "unknown profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSession {
    pub session_id: String,
    pub reason: SkipReason,
}

/// Result of transforming one `game_scores` row
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Emitted {
        session: Session,
        best_effort_date: bool,
    },
    Skipped(SkipReason),
}

/// All sessions, still in source order
#[derive(Debug, Clone, Default)]
pub struct TransformedSessions {
    pub sessions: Vec<Session>,
    pub skipped: Vec<SkippedSession>,
    pub best_effort_dates: usize,
}

// ============================================================================
// PLAYERS
// ============================================================================

/// One player per profile row, colors handed out in profile order
pub fn build_players<R: RandomSource + ?Sized>(
    index: &ReferenceIndex,
    palette: &Palette,
    rng: &mut R,
) -> Vec<Player> {
    let mappings = index.player_mappings();
    let colors = palette.assign(mappings.len(), rng);

    mappings
        .iter()
        .zip(colors)
        .map(|(mapping, color)| Player {
            id: mapping.new_id.clone(),
            name: mapping.username.clone(),
            color: color.hex,
        })
        .collect()
}

// ============================================================================
// SESSIONS
// ============================================================================

/// Borrows a finished index and turns session rows into documents
pub struct RecordTransformer<'a> {
    index: &'a ReferenceIndex,
}

impl<'a> RecordTransformer<'a> {
    pub fn new(index: &'a ReferenceIndex) -> Self {
        RecordTransformer { index }
    }

    /// Transform every `game_scores` row, in source order
    pub fn transform_all<R: RandomSource + ?Sized>(
        &self,
        tables: &SourceTables,
        rng: &mut R,
    ) -> Result<TransformedSessions> {
        let mut out = TransformedSessions::default();

        for record in tables.game_scores.decode(SessionRecord::decode)? {
            match self.transform(&record, rng) {
                SessionOutcome::Emitted {
                    session,
                    best_effort_date,
                } => {
                    if best_effort_date {
                        out.best_effort_dates += 1;
                    }
                    out.sessions.push(session);
                }
                SessionOutcome::Skipped(reason) => {
                    warn!(session_id = record.id, reason = reason.as_str(), "skipping session");
                    out.skipped.push(SkippedSession {
                        session_id: record.id.to_string(),
                        reason,
                    });
                }
            }
        }

        Ok(out)
    }

    pub fn transform<R: RandomSource + ?Sized>(
        &self,
        record: &SessionRecord<'_>,
        rng: &mut R,
    ) -> SessionOutcome {
        let Some(game) = self.index.game(record.game_id) else {
            return SessionOutcome::Skipped(SkipReason::UnknownGame);
        };

        let participants = self.index.participants(record.id);
        if participants.is_empty() {
            return SessionOutcome::Skipped(SkipReason::NoParticipants);
        }

        // All or nothing: one unknown profile drops the whole score sheet
        let mut players = Vec::with_capacity(participants.len());
        for participant in participants {
            let Some(player_id) = self.index.player_id(&participant.profile_id) else {
                warn!(
                    session_id = record.id,
                    profile_id = %participant.profile_id,
                    "participant references unknown profile"
                );
                return SessionOutcome::Skipped(SkipReason::UnknownProfile);
            };

            players.push(SessionPlayer {
                player_id: player_id.to_string(),
                score: parse_score(&participant.raw_score),
                is_winner: parse_winner(&participant.raw_winner),
            });
        }

        let date = parse_date(record.played_at);
        let best_effort_date = date.is_best_effort();

        SessionOutcome::Emitted {
            session: Session {
                id: generate_id(rng),
                date: date.into_value(),
                game_id: game.catalog_id,
                game_name: game.name.clone(),
                expansions: self.index.session_expansions(record.id).to_vec(),
                players,
            },
            best_effort_date,
        }
    }
}
