//! App: terminal init, main loop, tick and key handling.

use crate::GameConfig;
use crate::game::{Game, Move, SessionState, StepOutcome};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use log::info;
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// Upper bound on the wait for input between frames (~60 FPS).
const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    game: Game,
    theme: Theme,
    /// Set while "start over?" is on screen; holds the state to return to on cancel.
    confirm_restart: Option<SessionState>,
    /// TachyonFX fade for the board once the game is over.
    game_over_effect: Option<Effect>,
    /// Last time we processed the game-over effect (for delta).
    game_over_effect_time: Option<Instant>,
}

impl App {
    pub fn new(config: &GameConfig, theme: Theme, start: bool) -> Self {
        let mut game = Game::new(config);
        if start {
            game.start(Instant::now());
        }
        Self {
            game,
            theme,
            confirm_restart: None,
            game_over_effect: None,
            game_over_effect_time: None,
        }
    }

    fn start(&mut self, now: Instant) {
        self.game.start(now);
        self.game_over_effect = None;
        self.game_over_effect_time = None;
    }

    /// Apply one input action. `S` always starts over (asking first mid-game); once the
    /// game is over only start and quit do anything.
    pub fn handle(&mut self, action: Action, now: Instant) -> Flow {
        if let Some(previous) = self.confirm_restart {
            match action {
                Action::Confirm | Action::Start => {
                    self.confirm_restart = None;
                    self.start(now);
                }
                Action::Cancel | Action::Quit => {
                    self.confirm_restart = None;
                    if previous == SessionState::Active {
                        self.game.resume(now);
                    }
                }
                _ => {}
            }
            return Flow::Continue;
        }

        match action {
            Action::Quit => return Flow::Quit,
            Action::Start => {
                if self.game.needs_confirmation() {
                    self.confirm_restart = Some(self.game.state());
                    self.game.pause();
                } else {
                    self.start(now);
                }
                return Flow::Continue;
            }
            _ => {}
        }

        match self.game.state() {
            SessionState::End | SessionState::Ready => {}
            SessionState::Paused => {
                if action == Action::Resume {
                    self.game.resume(now);
                }
            }
            SessionState::Active => match action {
                Action::MoveLeft => {
                    self.game.navigate(Move::Left);
                }
                Action::MoveRight => {
                    self.game.navigate(Move::Right);
                }
                Action::Rotate => {
                    self.game.navigate(Move::Rotate);
                }
                Action::SoftDrop => {
                    self.game.soft_drop(now);
                }
                Action::Pause => {
                    self.game.pause();
                }
                Action::Resume => {
                    self.game.resume(now);
                }
                _ => {}
            },
        }
        Flow::Continue
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    &self.game,
                    &self.theme,
                    self.confirm_restart.is_some(),
                    &mut self.game_over_effect,
                    &mut self.game_over_effect_time,
                    now,
                )
            })?;

            let timeout = self
                .game
                .time_until_tick(Instant::now())
                .map_or(FRAME, |t| t.min(FRAME));

            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if self.handle(key_to_action(key), Instant::now()) == Flow::Quit {
                            info!("quit with score {}", self.game.score());
                            return Ok(());
                        }
                    }
                }
            }

            if let StepOutcome::GameOver = self.game.tick(Instant::now()) {
                self.game_over_effect = None;
                self.game_over_effect_time = None;
            }
        }
    }
}
