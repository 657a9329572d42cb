use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::EnvFilter;

use brawl_app::game_loop::{run_match, LoopOptions};
use brawl_app::launch::{build_engine, LaunchOptions};
use brawl_core::config::CombatConfig;
use brawl_core::constants::TICK_RATE;
use brawl_core::enums::{CharacterKind, Difficulty, MatchMode};

#[derive(Parser, Debug)]
#[command(name = "brawl")]
#[command(about = "Headless two-fighter combat simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one round and print a JSON summary
    Run {
        #[arg(long, value_enum, default_value_t = CliMode::AiVsAi)]
        mode: CliMode,
        /// AI difficulty, 1 (easy) to 3 (hard, learned policy)
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=3))]
        difficulty: u8,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, value_enum, default_value_t = CliCharacter::Ryu)]
        p1: CliCharacter,
        #[arg(long, value_enum, default_value_t = CliCharacter::Ken)]
        p2: CliCharacter,
        /// Combat configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,
        /// Learned-policy weights JSON
        #[arg(long)]
        policy: Option<PathBuf>,
        #[arg(long, default_value_t = 100 * TICK_RATE as u64)]
        max_ticks: u64,
        /// Pace ticks at the simulation rate
        #[arg(long, default_value_t = false)]
        realtime: bool,
        /// Write every snapshot to this file as JSON lines
        #[arg(long)]
        snapshots: Option<PathBuf>,
    },
    /// Print the default combat configuration
    DumpConfig,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliMode {
    AiVsAi,
    VersusAi,
    Versus,
}

impl From<CliMode> for MatchMode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::AiVsAi => MatchMode::AiVsAi,
            CliMode::VersusAi => MatchMode::VersusAi,
            CliMode::Versus => MatchMode::Versus,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliCharacter {
    Ryu,
    Ken,
}

impl From<CliCharacter> for CharacterKind {
    fn from(value: CliCharacter) -> Self {
        match value {
            CliCharacter::Ryu => CharacterKind::Ryu,
            CliCharacter::Ken => CharacterKind::Ken,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Run {
            mode,
            difficulty,
            seed,
            p1,
            p2,
            config,
            policy,
            max_ticks,
            realtime,
            snapshots,
        } => {
            let launch = LaunchOptions {
                mode: mode.into(),
                difficulty: Difficulty::from_level(difficulty),
                seed,
                characters: [p1.into(), p2.into()],
                config,
                policy,
            };
            let mut engine = build_engine(&launch)?;

            let mut sink = match &snapshots {
                Some(path) => Some(BufWriter::new(File::create(path).with_context(|| {
                    format!("failed to create snapshot file: {}", path.display())
                })?)),
                None => None,
            };
            let summary = run_match(
                &mut engine,
                LoopOptions {
                    max_ticks,
                    realtime,
                },
                sink.as_mut().map(|w| w as &mut dyn Write),
            )?;

            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::DumpConfig => {
            println!("{}", CombatConfig::default().to_json_pretty()?);
        }
    }
    Ok(())
}
