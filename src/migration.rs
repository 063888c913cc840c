// 🚚 Migration - The whole transform, start to finish
//
//   row-sets → ReferenceIndex → players + sessions → sorted → summary
//
// No I/O happens here. Rows come in fully loaded, documents go out.

use crate::colors::Palette;
use crate::error::Result;
use crate::ids::RandomSource;
use crate::index::{PlayerMapping, ReferenceIndex};
use crate::report::{sort_sessions, MigrationSummary, SourceCounts};
use crate::rows::SourceTables;
use crate::transform::{build_players, Player, RecordTransformer, Session, SkippedSession};
use tracing::info;

/// Everything a migration run produces
#[derive(Debug, Clone)]
pub struct MigrationOutput {
    pub players: Vec<Player>,
    /// Most recent first
    pub sessions: Vec<Session>,
    pub skipped: Vec<SkippedSession>,
    pub player_mappings: Vec<PlayerMapping>,
    pub summary: MigrationSummary,
}

/// Run the migration over a fully loaded export
///
/// Fails only when the export is structurally broken (missing columns,
/// unparseable catalog ids). Dangling references are skipped and counted.
pub fn migrate<R: RandomSource + ?Sized>(
    tables: &SourceTables,
    palette: &Palette,
    rng: &mut R,
) -> Result<MigrationOutput> {
    let source = SourceCounts::of(tables);
    info!(
        profiles = source.profiles,
        games = source.games,
        game_scores = source.game_scores,
        score_participants = source.score_participants,
        expansions = source.expansions,
        session_expansions = source.session_expansions,
        "building reference index"
    );

    let index = ReferenceIndex::build(tables, rng)?;

    let players = build_players(&index, palette, rng);
    info!(count = players.len(), "generated players");

    let mut transformed = RecordTransformer::new(&index).transform_all(tables, rng)?;
    sort_sessions(&mut transformed.sessions);
    info!(
        count = transformed.sessions.len(),
        skipped = transformed.skipped.len(),
        "generated scores"
    );

    let summary = MigrationSummary::new(
        source,
        &players,
        &transformed.sessions,
        &transformed.skipped,
        index.dropped_expansion_links(),
        transformed.best_effort_dates,
    );

    Ok(MigrationOutput {
        players,
        sessions: transformed.sessions,
        skipped: transformed.skipped,
        player_mappings: index.player_mappings().to_vec(),
        summary,
    })
}
