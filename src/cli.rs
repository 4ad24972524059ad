use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use tracing::warn;

use crate::core::difficulty::{DifficultyConfig, Level};
use crate::core::session::GuessOutcome;
use crate::error::GameError;
use crate::runner::{self, GameRunner};
use crate::store::ScoreStore;
use crate::tui;

#[derive(Parser)]
#[command(name = "guessterm")]
#[command(about = "🎯 Number guessing in the terminal, with a persistent scoreboard")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play at the prompt
    Play {
        /// Preset level (skips the menu)
        #[arg(short, long, value_enum)]
        level: Option<LevelArg>,

        /// Upper limit for a custom level
        #[arg(long)]
        range: Option<u32>,

        /// Try budget for a custom level
        #[arg(long)]
        tries: Option<u32>,
    },
    /// Play in the full-screen interface
    Tui,
    /// Show the current high score
    Best {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the difficulty levels
    Levels,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LevelArg {
    Easy,
    Medium,
    Hard,
    Custom,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Easy => Level::Easy,
            LevelArg::Medium => Level::Medium,
            LevelArg::Hard => Level::Hard,
            LevelArg::Custom => Level::Custom,
        }
    }
}

pub async fn run_cli(store: &ScoreStore) -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Play { level, range, tries }) => {
            let preset = preset_from_args(level, range, tries)?;
            play_until_done(store, preset).await
        }
        Some(Commands::Tui) => tui::run(store).await,
        Some(Commands::Best { json }) => show_best(store, json).await,
        Some(Commands::Levels) => {
            print_levels();
            Ok(())
        }
        None => play_until_done(store, None).await,
    }
}

/// Resolve `play` flags into a fixed config, or `None` for the menu flow.
fn preset_from_args(
    level: Option<LevelArg>,
    range: Option<u32>,
    tries: Option<u32>,
) -> Result<Option<DifficultyConfig>> {
    let config = match level {
        Some(LevelArg::Custom) => Some(DifficultyConfig::resolve(Level::Custom, range, tries)?),
        Some(preset) => Some(DifficultyConfig::resolve(preset.into(), None, None)?),
        None if range.is_some() || tries.is_some() => {
            Some(DifficultyConfig::resolve(Level::Custom, range, tries)?)
        }
        None => None,
    };
    Ok(config)
}

async fn play_until_done(store: &ScoreStore, preset: Option<DifficultyConfig>) -> Result<()> {
    println!("🎯 Welcome to Number Guesser!");
    println!();

    loop {
        let config = match preset {
            Some(config) => config,
            None => select_level()?,
        };
        play_round(store, config).await?;

        println!();
        let again = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Play again?")
            .default(false)
            .interact()?;
        if !again {
            println!("👋 Thanks for playing!");
            return Ok(());
        }
        println!();
    }
}

fn select_level() -> Result<DifficultyConfig> {
    let items = [
        "Easy   — 1 to 100, unlimited tries",
        "Medium — 1 to 100, 10 tries",
        "Hard   — 1 to 100, 5 tries",
        "Custom — pick your own range and tries",
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("🎮 Choose a level")
        .items(&items)
        .default(0)
        .interact()?;

    let config = match selection {
        0 => DifficultyConfig::resolve(Level::Easy, None, None)?,
        1 => DifficultyConfig::resolve(Level::Medium, None, None)?,
        2 => DifficultyConfig::resolve(Level::Hard, None, None)?,
        3 => {
            let range = prompt_number("Upper limit", 100, 1, 1000)?;
            let tries = prompt_number("Maximum tries", 10, 1, 100)?;
            DifficultyConfig::resolve(Level::Custom, Some(range), Some(tries))?
        }
        _ => unreachable!(),
    };
    Ok(config)
}

fn prompt_number(prompt: &str, default: u32, min: u32, max: u32) -> Result<u32> {
    let value = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .validate_with(|n: &u32| -> Result<(), String> {
            if (min..=max).contains(n) {
                Ok(())
            } else {
                Err(format!("enter a number between {} and {}", min, max))
            }
        })
        .interact_text()?;
    Ok(value)
}

async fn play_round(store: &ScoreStore, config: DifficultyConfig) -> Result<()> {
    let mut runner = GameRunner::new(store, config);
    println!();
    println!(
        "🎲 I picked a number between 1 and {}. Tries: {}",
        config.upper_bound, config.max_tries
    );

    loop {
        let raw: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Your guess")
            .interact_text()?;

        let outcome = match runner.submit(&raw) {
            Ok(outcome) => outcome,
            Err(GameError::InvalidGuess { .. }) => {
                println!("Please enter a whole number.");
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        match outcome {
            GuessOutcome::Correct { tries_used } => {
                println!("🎉 Correct! You guessed it in {} tries.", tries_used);
                break;
            }
            GuessOutcome::TooLow {
                tries_remaining,
                game_over,
                ..
            } => {
                println!("📉 Too low! Tries left: {}", tries_remaining);
                if game_over {
                    break;
                }
            }
            GuessOutcome::TooHigh {
                tries_remaining,
                game_over,
                ..
            } => {
                println!("📈 Too high! Tries left: {}", tries_remaining);
                if game_over {
                    break;
                }
            }
        }
    }

    match runner.final_score() {
        Some(score) => {
            println!("Your score: {}", score);

            let (best, holder) = runner.best_score().await?;
            if score > best {
                println!("🏆 New high score! The previous best was {} by {}.", best, holder);
            } else {
                println!("🏆 Current best: {} by {}.", best, holder);
            }

            let username: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter your username to save your score")
                .interact_text()?;
            match runner.save_score(&username).await {
                Ok(_) => println!("💾 Score saved."),
                Err(err) => {
                    warn!(error = %err, "could not save score");
                    println!("⚠️  Could not save your score: {}", err);
                }
            }
        }
        None => {
            if let Some(secret) = runner.session().reveal() {
                println!("💀 Game over! The number was {}.", secret);
            }
        }
    }
    Ok(())
}

async fn show_best(store: &ScoreStore, json: bool) -> Result<()> {
    let best = store.highest_score().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&best)?);
        return Ok(());
    }
    match best {
        Some(record) => println!(
            "🏆 {} by {} (set {})",
            record.score, record.username, record.created_at
        ),
        None => {
            let (score, holder) = runner::DEFAULT_HIGH_SCORE;
            println!("🏆 {} by {} — no games recorded yet.", score, holder);
        }
    }
    Ok(())
}

fn print_levels() {
    println!("🎮 Difficulty levels:");
    println!();
    println!("  easy   — guess between 1 and 100, unlimited tries");
    println!("  medium — guess between 1 and 100, 10 tries");
    println!("  hard   — guess between 1 and 100, 5 tries");
    println!("  custom — your own upper limit (up to 1000) and tries (up to 100)");
}
