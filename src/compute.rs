/// Driver functions — everything the outer game loop does each frame.
///
/// The functions here mutate a `Level` in place, one sub-step at a time,
/// from a single caller. Rendering and raw input stay outside; steering
/// intent arrives as a `Controls` value.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SimConfig;
use crate::entities::{Status, Touch, Vector};
use crate::error::{GameError, GameResult};
use crate::level::Level;
use crate::parser::LevelParser;

// ── Player steering ──────────────────────────────────────────────────────────

/// Directions currently held by whoever controls the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Controls {
    /// Unit-per-axis direction; opposite keys cancel out.
    pub fn direction(self) -> Vector {
        let axis = |neg: bool, pos: bool| match (neg, pos) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        Vector::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Set the player's speed from `controls`.
pub fn steer_player(level: &mut Level, controls: Controls, speed: f64) {
    let Some(id) = level.player() else { return };
    if let Some(player) = level.actor_mut(id) {
        player.speed = controls.direction().times(speed);
    }
}

/// Move the player by its speed, one axis at a time. Terrain in the way
/// stops that axis and is reported through `player_touched`.
pub fn move_player(level: &mut Level, time: f64) {
    let Some(id) = level.player() else { return };
    let Some(player) = level.actor(id) else { return };
    let (mut pos, size, speed) = (player.pos, player.size, player.speed);

    for motion in [Vector::new(speed.x * time, 0.0), Vector::new(0.0, speed.y * time)] {
        if motion == Vector::ZERO {
            continue;
        }
        let next = pos.plus(motion);
        match level.obstacle_at(next, size) {
            Some(obstacle) => level.player_touched(Touch::Obstacle(obstacle), None),
            None => pos = next,
        }
    }

    if let Some(player) = level.actor_mut(id) {
        player.pos = pos;
    }
}

/// Resolve whatever actor the player currently overlaps.
pub fn resolve_player_contact(level: &mut Level) {
    let Some(player) = level.player() else { return };
    let Some(other) = level.occupant_at(player) else { return };
    if let Some(kind) = level.actor(other).map(|a| a.kind()) {
        level.player_touched(Touch::Actor(kind), Some(other));
    }
}

// ── Per-frame step ───────────────────────────────────────────────────────────

/// Advance the level by `time`, split into sub-steps of at most
/// `config.max_step`. Each sub-step moves the player, then every other
/// live actor in spawn order, checking the player for contact after each
/// move. Once the outcome is decided the finish delay counts down.
/// A non-finite `time` is ignored.
pub fn step(level: &mut Level, time: f64, controls: Controls, config: &SimConfig) -> Status {
    if !time.is_finite() {
        return level.status();
    }
    let max_step = config.step_length();
    let mut remaining = time;
    while remaining > 0.0 {
        let dt = remaining.min(max_step);

        let controls = if level.status().is_terminal() {
            Controls::default()
        } else {
            controls
        };
        steer_player(level, controls, config.player_speed);
        move_player(level, dt);
        resolve_player_contact(level);

        for id in level.actor_ids() {
            if Some(id) == level.player() {
                continue;
            }
            level.advance_actor(id, dt);
            resolve_player_contact(level);
        }

        level.tick_finish_delay(dt);
        remaining -= dt;
    }
    level.status()
}

// ── Session ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Playing,
    /// Every level has been won.
    Completed,
}

/// Plays a list of level schemas in order. A lost level restarts; a won
/// level moves on to the next one.
#[derive(Debug)]
pub struct Session {
    schemas: Vec<Vec<String>>,
    parser: LevelParser,
    config: SimConfig,
    rng: StdRng,
    index: usize,
    level: Level,
    state: SessionState,
}

impl Session {
    pub fn new(schemas: Vec<Vec<String>>, parser: LevelParser, config: SimConfig) -> GameResult<Self> {
        let first = schemas.first().ok_or(GameError::EmptyCampaign)?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let level = build_level(&parser, first, &config, &mut rng)?;
        Ok(Self {
            schemas,
            parser,
            config,
            rng,
            index: 0,
            level,
            state: SessionState::Playing,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_index(&self) -> usize {
        self.index
    }

    pub fn level_count(&self) -> usize {
        self.schemas.len()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run one frame and handle a finished level.
    pub fn update(&mut self, time: f64, controls: Controls) -> GameResult<SessionState> {
        if self.state == SessionState::Completed {
            return Ok(self.state);
        }

        step(&mut self.level, time, controls, &self.config);
        if !self.level.is_finished() {
            return Ok(self.state);
        }

        match self.level.status() {
            Status::Won if self.index + 1 < self.schemas.len() => {
                let next = self.index + 1;
                self.level = build_level(&self.parser, &self.schemas[next], &self.config, &mut self.rng)?;
                self.index = next;
                info!("advancing to level {}", self.index + 1);
            }
            Status::Won => {
                info!("all {} levels won", self.schemas.len());
                self.state = SessionState::Completed;
            }
            Status::Lost => {
                info!("retrying level {}", self.index + 1);
                self.reload()?;
            }
            Status::Running => {}
        }
        Ok(self.state)
    }

    fn reload(&mut self) -> GameResult<()> {
        self.level = build_level(&self.parser, &self.schemas[self.index], &self.config, &mut self.rng)?;
        Ok(())
    }
}

fn build_level(
    parser: &LevelParser,
    rows: &[String],
    config: &SimConfig,
    rng: &mut StdRng,
) -> GameResult<Level> {
    let level = parser
        .parse_with_rng(rows, rng)?
        .with_finish_delay(config.finish_delay);
    let Some(player) = level.player().and_then(|id| level.actor(id)) else {
        return Err(GameError::MissingPlayer);
    };
    // A box that already touches terrain can never move (e.g. `@` on the
    // top row sticks out above the grid).
    if let Some(obstacle) = level.obstacle_at(player.pos, player.size) {
        return Err(GameError::BlockedSpawn(obstacle));
    }
    Ok(level)
}
