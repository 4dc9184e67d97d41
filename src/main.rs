//! Pogoman command-line tool
//!
//! Headless access to the simulation: replay a run, verify a score
//! submission, list or export the built-in levels.
//!
//! Usage:
//!   pogoman levels
//!   pogoman simulate --level old1 --replay '[[0,120],[2,40]]'
//!   pogoman verify --level my_level.json --submission submission.json
//!   RUST_LOG=debug pogoman export --level old3

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::fs;
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result, anyhow};
    use clap::{Parser, Subcommand};

    use pogoman::leaderboard::{ScoreSubmission, format_time};
    use pogoman::levels::{self, BUILTIN_LEVELS};
    use pogoman::persistence::{MemoryStore, ScoreService, load_level, save_level};
    use pogoman::settings::Settings;
    use pogoman::sim::{Level, Replay, ReplayOutcome, simulate};

    #[derive(Parser)]
    #[command(name = "pogoman")]
    #[command(about = "Replay, verify and export pogo-stick platformer levels")]
    struct Args {
        /// Settings file (tick length, username)
        #[arg(long, global = true)]
        settings: Option<PathBuf>,

        /// Override milliseconds per tick
        #[arg(long, global = true)]
        mspt: Option<u32>,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        /// Replay recorded input on a level and report how it ends
        Simulate {
            /// Built-in level id or path to a level document
            #[arg(long)]
            level: String,
            /// Replay JSON, inline or as a file path
            #[arg(long)]
            replay: String,
        },
        /// Check a score submission the way the score service does
        Verify {
            #[arg(long)]
            level: String,
            /// Submission JSON file
            #[arg(long)]
            submission: PathBuf,
        },
        /// List built-in levels
        Levels,
        /// Print or save a built-in level document
        Export {
            #[arg(long)]
            level: String,
            /// Write to this file instead of stdout
            #[arg(long)]
            out: Option<PathBuf>,
        },
    }

    fn resolve_level(arg: &str) -> Result<Level> {
        if let Some(level) = levels::by_id(arg) {
            return Ok(level);
        }
        load_level(Path::new(arg)).with_context(|| format!("'{arg}' is neither a built-in level nor a level file"))
    }

    fn read_json_arg(arg: &str) -> Result<String> {
        let path = Path::new(arg);
        if path.is_file() {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        } else {
            Ok(arg.to_string())
        }
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();

        let mut settings = args
            .settings
            .as_deref()
            .map(Settings::load_from)
            .unwrap_or_default();
        if let Some(mspt) = args.mspt {
            settings = Settings {
                username: settings.username,
                leaderboard_rows: settings.leaderboard_rows,
                ..Settings::with_mspt(mspt)
            };
        }
        let config = settings.sim_config();

        match args.command {
            Command::Simulate { level, replay } => {
                let level = resolve_level(&level)?;
                let replay: Replay =
                    serde_json::from_str(&read_json_arg(&replay)?).context("invalid replay")?;
                let result = simulate(&level, &replay, &config);

                let outcome = match result.outcome {
                    ReplayOutcome::Ended(outcome) => format!("{outcome:?}"),
                    ReplayOutcome::Unfinished => "Unfinished".to_string(),
                };
                println!("Level:    {}", level.name);
                println!("Outcome:  {outcome}");
                println!("Ticks:    {} of {}", result.ticks, replay.tick_count());
                println!("Time:     {}s", format_time(result.elapsed_ms));
            }
            Command::Verify { level, submission } => {
                let level = resolve_level(&level)?;
                let json = fs::read_to_string(&submission)
                    .with_context(|| format!("failed to read {}", submission.display()))?;
                let submission: ScoreSubmission = serde_json::from_str(&json).context("invalid submission")?;

                let mut service = ScoreService::new(MemoryStore::new(), config);
                let result = service
                    .submit(&level, submission)
                    .map_err(|err| anyhow!("submission rejected: {err}"))?;
                println!("Accepted ({result:?})");
            }
            Command::Levels => {
                for builtin in BUILTIN_LEVELS {
                    match builtin.load() {
                        Some(level) => println!(
                            "{:<8} {:>3} obstacles  start ({}, {})",
                            builtin.id,
                            level.len(),
                            level.player_start().x,
                            level.player_start().y
                        ),
                        None => println!("{:<8} (malformed)", builtin.id),
                    }
                }
            }
            Command::Export { level, out } => {
                let level = levels::by_id(&level).ok_or_else(|| anyhow!("no built-in level named '{level}'"))?;
                match out {
                    Some(path) => save_level(&level, &path)?,
                    None => println!("{}", serde_json::to_string_pretty(&level.to_doc())?),
                }
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Pogoman CLI starting...");
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser shell drives the library directly
}
