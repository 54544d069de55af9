//! Conquest - headless runner
//!
//! Seeds a world (from GeoJSON or the built-in countries), starts a game
//! session and logs world events and day ticks until time runs out.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::runtime::Runtime;

use conquest_core::core::error::Result;
use conquest_core::core::types::Faction;
use conquest_core::world::{fallback_countries, load_countries_or_fallback};
use conquest_core::{GameConfig, GameSession};

/// Run a game session without a map
#[derive(Parser, Debug)]
#[command(name = "conquest")]
#[command(about = "Run the conquest simulation headless and log what happens")]
struct Args {
    /// TOML config file; defaults are used for anything it leaves out
    #[arg(long)]
    config: Option<PathBuf>,

    /// GeoJSON FeatureCollection of countries
    geojson: Option<PathBuf>,

    /// How long to run, in real seconds
    #[arg(long, default_value_t = 90)]
    seconds: u64,

    /// Seed for country seeding and world events
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("conquest_core=info,conquest=info")
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::new(),
    };
    if args.seed.is_some() {
        config.generator.seed = args.seed;
    }

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let countries = match &args.geojson {
        Some(path) => load_countries_or_fallback(path, &config.seeding, &mut rng),
        None => fallback_countries(),
    };

    let rt = Runtime::new()?;
    rt.block_on(run(config, countries, Duration::from_secs(args.seconds)))
}

async fn run(
    config: GameConfig,
    countries: Vec<conquest_core::state::Country>,
    run_for: Duration,
) -> Result<()> {
    let session = GameSession::new(config)?;
    session.seed_countries(countries);
    session.choose_faction(Faction::Alliance);

    let mut events = session.subscribe_events();
    let mut days = session.subscribe_day();
    session.start()?;
    tracing::info!(session = %session.id(), seconds = run_for.as_secs(), "Conquest running");

    let deadline = tokio::time::sleep(run_for);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            Some(event) = events.recv() => {
                tracing::info!(kind = event.kind(), "{}", event);
            }
            Ok(()) = days.changed() => {
                let day = *days.borrow_and_update();
                let player = session.player();
                tracing::info!(
                    day,
                    money = player.money(),
                    owned = player.owned_countries,
                    "day passed"
                );
            }
        }
    }

    session.stop();
    let player = session.player();
    tracing::info!(
        day = session.current_day(),
        money = player.money(),
        recent_events = session.recent_events().len(),
        "Conquest stopped"
    );
    Ok(())
}
