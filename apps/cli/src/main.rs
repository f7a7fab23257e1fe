use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use sqlcards_cli::play;

/// Terminal SQL card-matching game.
#[derive(Debug, Parser)]
#[command(name = "sqlcards", version, about)]
struct Args {
    /// Deck file to load instead of the bundled one.
    #[arg(long)]
    deck: Option<PathBuf>,

    /// Directory holding the deck library (index.json plus deck files).
    #[arg(long, default_value = "decks")]
    deck_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sqlcards=info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    if let Err(error) = play::run(args.deck, args.deck_dir).await {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
