// BoardTally Migration - Core Library
// Relational export (six row-sets) → players.json + scores.json

pub mod error;
pub mod rows;
pub mod ids;            // Identifier Generator - base62 ids
pub mod index;          // Reference Index - old keys → resolved fragments
pub mod colors;         // Color Assignment - shuffled palette
pub mod normalize;      // Dates, scores, winner flags
pub mod transform;      // Record Transformer - Player / Session documents
pub mod report;         // Ordering + migration summary
pub mod migration;      // End-to-end transform
pub mod config;
pub mod loader;         // CSV in, JSON out

// Re-export commonly used types
pub use error::{MigrationError, Result};
pub use rows::{Row, RowSet, SourceTables, Table};
pub use ids::{encode_base62, generate_id, RandomSource};
pub use index::{ExpansionRef, PlayerMapping, ReferenceIndex};
pub use colors::{Palette, PaletteColor, PRESET_COLORS};
pub use normalize::{parse_date, parse_score, parse_winner, PlayedDate, Score};
pub use transform::{
    Player, RecordTransformer, Session, SessionPlayer, SkipReason, SkippedSession,
};
pub use report::{sort_sessions, MigrationSummary, SkipCounts, SourceCounts};
pub use migration::{migrate, MigrationOutput};
pub use config::MigrationConfig;
pub use loader::{load_tables, write_documents};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
