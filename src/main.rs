use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use boardtally_migrate::{load_tables, migrate, write_documents, MigrationConfig};

/// Migrate a relational export into BoardTally players.json / scores.json
#[derive(Parser, Debug)]
#[command(name = "boardtally-migrate")]
#[command(version)]
struct Args {
    /// Directory containing the *_rows.csv exports
    #[arg(short, long, default_value = ".", env = "BOARDTALLY_INPUT_DIR")]
    input_dir: PathBuf,

    /// Directory to write players.json and scores.json into
    #[arg(short, long, default_value = "data", env = "BOARDTALLY_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Seed for reproducible ids and colors
    #[arg(long, env = "BOARDTALLY_SEED")]
    seed: Option<u64>,

    /// Run the transform and print the summary without writing files
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boardtally_migrate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = MigrationConfig::new(args.input_dir, args.output_dir)
        .with_seed(args.seed)
        .with_dry_run(args.dry_run);

    run_migration(&config)
}

fn run_migration(config: &MigrationConfig) -> Result<()> {
    println!("🎲 BoardTally Migration - relational export → JSON");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load CSV exports
    println!("\n📂 Reading CSV files from {}...", config.input_dir.display());
    let tables = load_tables(&config.input_dir)?;
    for table in boardtally_migrate::Table::ALL {
        println!("  - {} {}", tables.get(table).len(), table.as_str());
    }

    // 2. Transform
    println!("\n🔄 Transforming...");
    let mut rng = config.rng();
    let output = migrate(&tables, &config.palette, &mut rng)
        .context("Export is structurally broken")?;
    println!(
        "✓ Generated {} scores ({} skipped)",
        output.sessions.len(),
        output.skipped.len()
    );

    // 3. Write documents
    if config.dry_run {
        println!("\n⏭️  Dry run: nothing written");
    } else {
        println!("\n💾 Writing output files...");
        let (players_path, scores_path) =
            write_documents(&config.output_dir, &output.players, &output.sessions)?;
        info!(players = %players_path.display(), scores = %scores_path.display(), "wrote documents");
        println!("✓ Wrote {}", players_path.display());
        println!("✓ Wrote {}", scores_path.display());
    }

    // 4. Report
    println!("\n{}", output.summary);

    println!("\nPlayer ID Mapping:");
    for mapping in &output.player_mappings {
        println!("  {:20} {} -> {}", mapping.username, mapping.old_id, mapping.new_id);
    }

    Ok(())
}
