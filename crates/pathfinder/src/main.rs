use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::Parser;
use starkstate_lib::{run, JsonFileSource};
use starkstate_storage::{JournalMode, Storage};

/// Applies StarkNet state diffs to a content-addressed commitment trie.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the sqlite database backing the trie.
    #[arg(long, env = "STARKSTATE_DATABASE", value_name = "PATH")]
    database: PathBuf,

    /// A single state-diff JSON file to apply. If omitted, the trie is
    /// opened (migrating the schema if needed) and the process exits.
    #[arg(value_name = "DIFF_FILE")]
    diff_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();

    let cli = Cli::parse();

    let storage = Storage::migrate(cli.database, JournalMode::WAL)?.create_pool(NonZeroU32::new(10).unwrap())?;
    let mut connection = storage.connection()?;

    let Some(diff_file) = cli.diff_file else {
        tracing::info!("no diff file given, database migrated and ready");
        return Ok(());
    };

    let mut source = JsonFileSource::from_path(&diff_file)?;
    run(&mut connection, &mut source)
}
