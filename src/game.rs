//! Game session: falling block, stage, score, speed and the gravity tick.

use crate::GameConfig;
use crate::block::Block;
use crate::shape::{self, Shape};
use crate::stage::Stage;
use crate::ticker::Ticker;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Every this many points the tick interval shortens by one `SPEED_STEP`.
const SCORE_PER_LEVEL: u32 = 10;
const SPEED_STEP: Duration = Duration::from_millis(50);
/// Floor for the tick interval; without it the interval reaches zero at score 100.
pub const MIN_INTERVAL: Duration = Duration::from_millis(50);

/// A freshly spawned block does not fit on the stage.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("game over: spawned block does not fit")]
pub struct GameOver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Active,
    Paused,
    End,
}

impl SessionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::End => "end",
        }
    }
}

/// Player moves applied through `navigate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Rotate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing ran (not active, or no tick due).
    Idle,
    Fell,
    /// The block was committed; `cleared` rows were removed and a new block spawned.
    Landed { cleared: usize },
    GameOver,
}

/// Tick interval for a score: `base - floor(score / 10) * 50ms`, never below `MIN_INTERVAL`.
pub fn interval_for_score(base: Duration, score: u32) -> Duration {
    base.saturating_sub(SPEED_STEP * (score / SCORE_PER_LEVEL))
        .max(MIN_INTERVAL)
}

/// Speed level shown to the player; 1 at the base interval.
pub fn level_for_interval(base: Duration, interval: Duration) -> u32 {
    (base.saturating_sub(interval).as_millis() / SPEED_STEP.as_millis()) as u32 + 1
}

#[derive(Debug)]
pub struct Game {
    stage: Stage,
    block: Option<Block>,
    score: u32,
    base_interval: Duration,
    ticker: Ticker,
    state: SessionState,
    rng: StdRng,
}

impl Game {
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            stage: Stage::new(config.width, config.height),
            block: None,
            score: 0,
            base_interval: config.speed,
            ticker: Ticker::new(config.speed),
            state: SessionState::Ready,
            rng,
        }
    }

    #[inline]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The falling block; `None` until the first start.
    #[inline]
    pub fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.ticker.interval()
    }

    pub fn level(&self) -> u32 {
        level_for_interval(self.base_interval, self.interval())
    }

    /// Starting over mid-game throws away progress; the caller should ask first.
    pub fn needs_confirmation(&self) -> bool {
        !matches!(self.state, SessionState::Ready | SessionState::End)
    }

    /// Fresh stage, score 0, new block, ticking at the base interval.
    pub fn start(&mut self, now: Instant) {
        self.stage.reset();
        self.score = 0;
        self.ticker.set_interval(self.base_interval);
        info!(
            "new game on {}x{} stage",
            self.stage.width(),
            self.stage.height()
        );
        match self.spawn() {
            Ok(()) => self.run(now),
            Err(GameOver) => self.finish(),
        }
    }

    /// Stop ticking without touching the board.
    pub fn pause(&mut self) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        self.ticker.disarm();
        self.state = SessionState::Paused;
        true
    }

    /// (Re-)arm the tick at the current interval. A pending tick is replaced.
    pub fn resume(&mut self, now: Instant) -> bool {
        if !matches!(self.state, SessionState::Active | SessionState::Paused) {
            return false;
        }
        self.run(now);
        true
    }

    fn run(&mut self, now: Instant) {
        self.state = SessionState::Active;
        self.ticker.arm(now);
    }

    /// Move or rotate the block if the result fits; otherwise nothing changes.
    pub fn navigate(&mut self, mv: Move) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        let Some(block) = self.block else {
            return false;
        };
        let next = match mv {
            Move::Left => block.left(),
            Move::Right => block.right(),
            Move::Rotate => block.rotate(),
        };
        if next.ok(&self.stage) {
            self.block = Some(next);
            true
        } else {
            trace!("rejected {:?} at ({}, {})", mv, block.x, block.y);
            false
        }
    }

    /// One immediate gravity step, then a full period before the next tick.
    pub fn soft_drop(&mut self, now: Instant) -> StepOutcome {
        if self.state != SessionState::Active {
            return StepOutcome::Idle;
        }
        self.ticker.disarm();
        let outcome = self.step(now);
        if self.state == SessionState::Active {
            self.run(now);
        }
        outcome
    }

    /// Run the gravity step if the tick is due.
    pub fn tick(&mut self, now: Instant) -> StepOutcome {
        if self.state == SessionState::Active && self.ticker.fire(now) {
            self.step(now)
        } else {
            StepOutcome::Idle
        }
    }

    /// Delay until the next tick, `None` while not ticking.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.ticker.remaining(now)
    }

    /// Gravity step. A spawn that does not fit ends the session instead of failing.
    pub fn step(&mut self, now: Instant) -> StepOutcome {
        if self.state != SessionState::Active {
            return StepOutcome::Idle;
        }
        match self.advance(now) {
            Ok(outcome) => outcome,
            Err(GameOver) => {
                self.finish();
                StepOutcome::GameOver
            }
        }
    }

    fn advance(&mut self, now: Instant) -> Result<StepOutcome, GameOver> {
        let Some(block) = self.block else {
            return Ok(StepOutcome::Idle);
        };
        let next = block.fall();
        if next.ok(&self.stage) {
            self.block = Some(next);
            return Ok(StepOutcome::Fell);
        }

        block.put(&mut self.stage);
        if log::log_enabled!(log::Level::Debug) {
            let rows = self.stage.filled_lines();
            if !rows.is_empty() {
                debug!("clearing rows {:?}", rows);
            }
        }
        let cleared = self.stage.shrink();
        if cleared > 0 {
            self.set_score(self.score + cleared as u32, now);
        }
        if block.overflow() {
            return Err(GameOver);
        }
        self.spawn()?;
        Ok(StepOutcome::Landed { cleared })
    }

    fn set_score(&mut self, score: u32, now: Instant) {
        self.score = score;
        let interval = interval_for_score(self.base_interval, score);
        if interval != self.ticker.interval() {
            self.ticker.set_interval(interval);
            info!(
                "speed up: {}ms per tick, level {}",
                interval.as_millis(),
                self.level()
            );
            self.run(now);
        }
    }

    fn random_shape(&mut self) -> &'static Shape {
        let catalog = shape::catalog();
        &catalog[self.rng.gen_range(0..catalog.len())]
    }

    /// New block horizontally centred at the top; errors if it does not fit.
    fn spawn(&mut self) -> Result<(), GameOver> {
        let x = (self.stage.width() / 2) as i32 - 2;
        let block = Block::new(x, 0, 0, self.random_shape());
        self.block = Some(block);
        if block.ok(&self.stage) {
            Ok(())
        } else {
            Err(GameOver)
        }
    }

    fn finish(&mut self) {
        self.ticker.disarm();
        self.state = SessionState::End;
        info!("game over: score {}, level {}", self.score, self.level());
    }
}
