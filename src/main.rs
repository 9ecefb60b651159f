#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use battleship_targeting::{
    init_logging, ship_lengths, AiPlayer, Board, GameEngine, GuessResult, Player, RiskPosture,
    TargetingConfig, GRID_SIZE,
};

#[cfg(feature = "std")]
use clap::{Args, Parser};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use serde_json::json;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Play many bot games against random fleets and print a JSON summary.
    Simulate {
        #[arg(long, default_value_t = 100)]
        games: usize,
        #[command(flatten)]
        opts: EngineOpts,
    },
    /// Play a single game, printing the shot board and fit counts every turn.
    Watch {
        #[command(flatten)]
        opts: EngineOpts,
    },
}

#[derive(Args)]
#[cfg(feature = "std")]
struct EngineOpts {
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, value_enum)]
    risk: Option<RiskPosture>,
    #[arg(long)]
    region_rows: Option<usize>,
    #[arg(long)]
    region_cols: Option<usize>,
    #[arg(long, help = "JSON file with targeting settings; other flags override it")]
    config: Option<std::path::PathBuf>,
}

#[cfg(feature = "std")]
impl EngineOpts {
    fn targeting_config(&self) -> anyhow::Result<TargetingConfig> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => TargetingConfig::default(),
        };
        if let Some(risk) = self.risk {
            config.risk = risk;
        }
        config.region_rows = self.region_rows.unwrap_or(config.region_rows);
        config.region_cols = self.region_cols.unwrap_or(config.region_cols);
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            let mut seed_rng = rand::rng();
            rand::Rng::random(&mut seed_rng)
        })
    }
}

#[cfg(feature = "std")]
fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { games, opts } => {
            let config = opts.targeting_config()?;
            let seed = opts.seed();
            let mut shots = Vec::with_capacity(games);
            for game in 0..games {
                let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(game as u64));
                let (engine, _) = play_game(config, &mut rng, false)?;
                shots.push(engine.shots_fired());
            }
            let mean = if shots.is_empty() {
                0.0
            } else {
                shots.iter().sum::<usize>() as f64 / shots.len() as f64
            };
            let result = json!({
                "seed": seed,
                "config": config,
                "games": games,
                "shots": shots,
                "min": shots.iter().min(),
                "max": shots.iter().max(),
                "mean": mean,
            });
            println!("{}", serde_json::to_string(&result)?);
        }
        Commands::Watch { opts } => {
            let config = opts.targeting_config()?;
            let seed = opts.seed();
            println!("Using seed: {} (rerun with --seed to replay)", seed);
            let mut rng = SmallRng::seed_from_u64(seed);
            let (engine, player) = play_game(config, &mut rng, true)?;
            println!(
                "Fleet sunk after {} shots ({} remaining lengths)",
                engine.shots_fired(),
                player.targeting().remaining_lengths().len()
            );
        }
    }
    Ok(())
}

#[cfg(feature = "std")]
fn play_game(
    config: TargetingConfig,
    rng: &mut SmallRng,
    verbose: bool,
) -> anyhow::Result<(GameEngine, AiPlayer)> {
    let fleet = ship_lengths();
    let mut player = AiPlayer::new(config, &fleet).map_err(|e| anyhow::anyhow!(e))?;
    let mut engine = GameEngine::new(Board::new());
    player
        .place_ships(rng, engine.target_mut())
        .map_err(|e| anyhow::anyhow!(e))?;

    if !verbose {
        engine
            .play_out(&mut player, rng, GRID_SIZE * GRID_SIZE)
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok((engine, player));
    }

    while engine.status() == battleship_targeting::GameStatus::InProgress {
        let shot = engine
            .play_turn(&mut player, rng)
            .map_err(|e| anyhow::anyhow!(e))?;
        let outcome = match shot.result {
            GuessResult::Hit => "hit".to_string(),
            GuessResult::Miss => "miss".to_string(),
            GuessResult::Sink(ship) => format!("sunk {}", ship.name()),
        };
        println!(
            "\nShot {}: ({}, {}) {} [{:?}]",
            engine.shots_fired(),
            shot.row,
            shot.col,
            outcome,
            player.targeting().hunt_state()
        );
        println!("{}", player.targeting().shots());
        println!("{}", player.targeting().grid());
    }
    Ok((engine, player))
}
