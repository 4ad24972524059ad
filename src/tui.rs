use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    DefaultTerminal, Frame,
};
use std::time::Duration;
use tracing::warn;

use crate::core::difficulty::{DifficultyConfig, Level};
use crate::core::session::GuessOutcome;
use crate::error::GameError;
use crate::runner::GameRunner;
use crate::store::ScoreStore;

const LEVEL_ITEMS: [&str; 4] = [
    "Easy   : 1 to 100, unlimited tries",
    "Medium : 1 to 100, 10 tries",
    "Hard   : 1 to 100, 5 tries",
    "Custom : pick your own range and tries",
];
const RANGE_MAX: u32 = 1000;
const TRIES_MAX: u32 = 100;

/// Full-screen front end. Runs until the player quits from the menu.
pub async fn run(store: &ScoreStore) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = App::new(store).run(&mut terminal).await;
    ratatui::restore();
    result
}

enum Screen {
    Menu,
    CustomRange,
    CustomTries { range: u32 },
    Playing,
    SaveScore { score: u32, best: u32, holder: String },
    GameOver { message: String },
}

struct App<'a> {
    store: &'a ScoreStore,
    screen: Screen,
    selected: usize,
    input: String,
    status: String,
    runner: Option<GameRunner<'a>>,
}

impl<'a> App<'a> {
    fn new(store: &'a ScoreStore) -> Self {
        Self {
            store,
            screen: Screen::Menu,
            selected: 0,
            input: String::new(),
            status: String::new(),
            runner: None,
        }
    }

    async fn run(mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if self.handle_key(key).await? {
                    return Ok(());
                }
            }
        }
    }

    /// Returns `true` when the player quits.
    async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.code == KeyCode::Esc {
            if matches!(self.screen, Screen::Menu) {
                return Ok(true);
            }
            self.back_to_menu();
            return Ok(false);
        }

        match self.screen {
            Screen::Menu => match key.code {
                KeyCode::Char('q') => return Ok(true),
                KeyCode::Up => self.selected = self.selected.saturating_sub(1),
                KeyCode::Down => self.selected = (self.selected + 1).min(LEVEL_ITEMS.len() - 1),
                KeyCode::Enter => match self.selected {
                    0 => self.start(DifficultyConfig::resolve(Level::Easy, None, None)?),
                    1 => self.start(DifficultyConfig::resolve(Level::Medium, None, None)?),
                    2 => self.start(DifficultyConfig::resolve(Level::Hard, None, None)?),
                    _ => {
                        self.input.clear();
                        self.status.clear();
                        self.screen = Screen::CustomRange;
                    }
                },
                _ => {}
            },

            Screen::CustomRange => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() && self.input.len() < 4 => {
                    self.input.push(c)
                }
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Enter => match self.input.parse::<u32>() {
                    Ok(range) if (1..=RANGE_MAX).contains(&range) => {
                        self.input.clear();
                        self.status.clear();
                        self.screen = Screen::CustomTries { range };
                    }
                    _ => self.status = format!("Enter a limit between 1 and {}.", RANGE_MAX),
                },
                _ => {}
            },

            Screen::CustomTries { range } => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() && self.input.len() < 3 => {
                    self.input.push(c)
                }
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Enter => match self.input.parse::<u32>() {
                    Ok(tries) if (1..=TRIES_MAX).contains(&tries) => {
                        let config =
                            DifficultyConfig::resolve(Level::Custom, Some(range), Some(tries))?;
                        self.start(config);
                    }
                    _ => self.status = format!("Enter a try budget between 1 and {}.", TRIES_MAX),
                },
                _ => {}
            },

            Screen::Playing => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() && self.input.len() < 10 => {
                    self.input.push(c)
                }
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Enter => self.submit_guess().await?,
                _ => {}
            },

            Screen::SaveScore { .. } => match key.code {
                KeyCode::Char(c) if !c.is_control() && self.input.len() < 24 => {
                    self.input.push(c)
                }
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Enter => self.save_score().await?,
                _ => {}
            },

            Screen::GameOver { .. } => {
                if key.code == KeyCode::Enter {
                    self.back_to_menu();
                }
            }
        }
        Ok(false)
    }

    fn start(&mut self, config: DifficultyConfig) {
        self.runner = Some(GameRunner::new(self.store, config));
        self.input.clear();
        self.status = format!("Guess a number between 1 and {}.", config.upper_bound);
        self.screen = Screen::Playing;
    }

    fn back_to_menu(&mut self) {
        self.runner = None;
        self.input.clear();
        self.status.clear();
        self.selected = 0;
        self.screen = Screen::Menu;
    }

    async fn submit_guess(&mut self) -> Result<()> {
        let Some(runner) = self.runner.as_mut() else {
            return Ok(());
        };
        match runner.submit(&self.input) {
            Err(GameError::InvalidGuess { .. }) => {
                self.status = "Type a number first.".to_string();
            }
            Err(err) => return Err(err.into()),
            Ok(GuessOutcome::Correct { tries_used }) => {
                let score = runner.final_score().unwrap_or(0);
                let (best, holder) = runner.best_score().await?;
                self.status = format!("Correct in {} tries!", tries_used);
                self.screen = Screen::SaveScore { score, best, holder };
            }
            Ok(GuessOutcome::TooLow {
                tries_remaining,
                game_over,
                ..
            }) => {
                if game_over {
                    self.finish_lost();
                } else {
                    self.status = format!("Too low! Tries left: {}", tries_remaining);
                }
            }
            Ok(GuessOutcome::TooHigh {
                tries_remaining,
                game_over,
                ..
            }) => {
                if game_over {
                    self.finish_lost();
                } else {
                    self.status = format!("Too high! Tries left: {}", tries_remaining);
                }
            }
        }
        self.input.clear();
        Ok(())
    }

    fn finish_lost(&mut self) {
        let message = match self.runner.as_ref().and_then(|r| r.session().reveal()) {
            Some(secret) => format!("Out of tries! The number was {}.", secret),
            None => "Out of tries!".to_string(),
        };
        self.runner = None;
        self.screen = Screen::GameOver { message };
    }

    async fn save_score(&mut self) -> Result<()> {
        if self.input.trim().is_empty() {
            self.status = "Enter a username to save your score.".to_string();
            return Ok(());
        }
        let Some(runner) = self.runner.as_ref() else {
            return Ok(());
        };
        let message = match runner.save_score(&self.input).await {
            Ok(Some(score)) => format!("Saved {} for {}.", score, self.input.trim()),
            Ok(None) => "Nothing to save.".to_string(),
            Err(err) => {
                warn!(error = %err, "could not save score");
                format!("Could not save your score: {}", err)
            }
        };
        self.runner = None;
        self.input.clear();
        self.screen = Screen::GameOver { message };
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        frame.render_widget(
            Paragraph::new(" NUMBER GUESSER ")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            chunks[0],
        );

        match &self.screen {
            Screen::Menu => {
                let items: Vec<ListItem> = LEVEL_ITEMS
                    .iter()
                    .enumerate()
                    .map(|(i, label)| {
                        let style = if i == self.selected {
                            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        ListItem::new(format!(" » {}", label)).style(style)
                    })
                    .collect();
                frame.render_widget(
                    List::new(items)
                        .block(Block::default().title(" CHOOSE A LEVEL ").borders(Borders::ALL)),
                    chunks[1],
                );
            }
            Screen::CustomRange => {
                frame.render_widget(
                    Paragraph::new(format!(
                        "Upper limit (1-{}):\n\n > {}\n\n{}",
                        RANGE_MAX, self.input, self.status
                    ))
                    .block(Block::default().title(" CUSTOM LEVEL ").borders(Borders::ALL)),
                    chunks[1],
                );
            }
            Screen::CustomTries { range } => {
                frame.render_widget(
                    Paragraph::new(format!(
                        "Range is 1 to {}.\nMaximum tries (1-{}):\n\n > {}\n\n{}",
                        range, TRIES_MAX, self.input, self.status
                    ))
                    .block(Block::default().title(" CUSTOM LEVEL ").borders(Borders::ALL)),
                    chunks[1],
                );
            }
            Screen::Playing => {
                let tries_line = match self.runner.as_ref() {
                    Some(runner) => {
                        let session = runner.session();
                        let used = session.tries_used();
                        format!(
                            "Tries used: {}   Tries left: {}",
                            used,
                            session.config().max_tries.remaining(used)
                        )
                    }
                    None => String::new(),
                };
                frame.render_widget(
                    Paragraph::new(format!(
                        "{}\n\n > {}\n\n{}",
                        self.status, self.input, tries_line
                    ))
                    .block(Block::default().title(" YOUR GUESS ").borders(Borders::ALL)),
                    chunks[1],
                );
            }
            Screen::SaveScore { score, best, holder } => {
                let best_line = if score > best {
                    format!("New high score! Previous best: {} by {}", best, holder)
                } else {
                    format!("Current best: {} by {}", best, holder)
                };
                frame.render_widget(
                    Paragraph::new(format!(
                        "{}\nYou scored {}.\n{}\n\nUsername:\n > {}",
                        self.status, score, best_line, self.input
                    ))
                    .block(Block::default().title(" SAVE YOUR SCORE ").borders(Borders::ALL)),
                    chunks[1],
                );
            }
            Screen::GameOver { message } => {
                frame.render_widget(
                    Paragraph::new(message.as_str())
                        .block(Block::default().title(" GAME OVER ").borders(Borders::ALL))
                        .alignment(Alignment::Center),
                    chunks[1],
                );
            }
        }

        let hints = match self.screen {
            Screen::Menu => "[↑/↓] Navigate  [Enter] Play  [Q/Esc] Quit",
            Screen::CustomRange | Screen::CustomTries { .. } => {
                "[0-9] Type  [Backspace] Erase  [Enter] Confirm  [Esc] Menu"
            }
            Screen::Playing => "[0-9] Type  [Backspace] Erase  [Enter] Guess  [Esc] Menu",
            Screen::SaveScore { .. } => "[Type] Username  [Enter] Save  [Esc] Skip",
            Screen::GameOver { .. } => "[Enter] Back to menu",
        };
        frame.render_widget(
            Paragraph::new(hints).alignment(Alignment::Center),
            chunks[2],
        );
    }
}
