// 📊 Output Ordering & Reporting
//
// Sessions are ordered most recent first. Undated sessions sort as "" and
// so land at the end. The sort is stable: equal dates keep source order.

use crate::rows::{SourceTables, Table};
use crate::transform::{Player, Session, SkipReason, SkippedSession};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// ORDERING
// ============================================================================

/// Stable sort by date, descending
pub fn sort_sessions(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| date_key(b).cmp(date_key(a)));
}

fn date_key(session: &Session) -> &str {
    session.date.as_deref().unwrap_or("")
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    pub profiles: usize,
    pub games: usize,
    pub game_scores: usize,
    pub score_participants: usize,
    pub expansions: usize,
    pub session_expansions: usize,
}

impl SourceCounts {
    pub fn of(tables: &SourceTables) -> Self {
        SourceCounts {
            profiles: tables.get(Table::Profiles).len(),
            games: tables.get(Table::Games).len(),
            game_scores: tables.get(Table::GameScores).len(),
            score_participants: tables.get(Table::ScoreParticipants).len(),
            expansions: tables.get(Table::Expansions).len(),
            session_expansions: tables.get(Table::SessionExpansions).len(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    pub unknown_game: usize,
    pub no_participants: usize,
    pub unknown_profile: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.unknown_game + self.no_participants + self.unknown_profile
    }

    fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::UnknownGame => self.unknown_game += 1,
            SkipReason::NoParticipants => self.no_participants += 1,
            SkipReason::UnknownProfile => self.unknown_profile += 1,
        }
    }
}

/// What the migration produced, for the operator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationSummary {
    pub source: SourceCounts,
    pub players: usize,
    pub sessions: usize,
    pub skipped: SkipCounts,
    pub sessions_with_expansions: usize,
    pub unique_games: usize,
    pub dropped_expansion_links: usize,
    pub best_effort_dates: usize,
}

impl MigrationSummary {
    pub fn new(
        source: SourceCounts,
        players: &[Player],
        sessions: &[Session],
        skipped: &[SkippedSession],
        dropped_expansion_links: usize,
        best_effort_dates: usize,
    ) -> Self {
        let mut skip_counts = SkipCounts::default();
        for skip in skipped {
            skip_counts.record(skip.reason);
        }

        let unique_games: HashSet<i64> = sessions.iter().map(|s| s.game_id).collect();

        MigrationSummary {
            source,
            players: players.len(),
            sessions: sessions.len(),
            skipped: skip_counts,
            sessions_with_expansions: sessions.iter().filter(|s| !s.expansions.is_empty()).count(),
            unique_games: unique_games.len(),
            dropped_expansion_links,
            best_effort_dates,
        }
    }
}

impl fmt::Display for MigrationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Migration Summary")?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "Players: {}", self.players)?;
        writeln!(f, "Scores: {}", self.sessions)?;
        writeln!(f, "Scores with expansions: {}", self.sessions_with_expansions)?;
        writeln!(
            f,
            "Scores skipped: {} (unknown game: {}, no participants: {}, unknown profile: {})",
            self.skipped.total(),
            self.skipped.unknown_game,
            self.skipped.no_participants,
            self.skipped.unknown_profile
        )?;
        writeln!(f, "Unique games played: {}", self.unique_games)?;
        writeln!(f, "Expansion links dropped: {}", self.dropped_expansion_links)?;
        write!(f, "Dates kept verbatim: {}", self.best_effort_dates)
    }
}
