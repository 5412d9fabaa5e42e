/// Simulation entities — vectors, actors and the small enums around them.

use std::f64::consts::TAU;
use std::fmt;
use std::ops::{Add, Mul};

use log::debug;
use rand::Rng;

use crate::error::{GameError, GameResult};
use crate::level::Level;

// ── Vector ───────────────────────────────────────────────────────────────────

/// Immutable 2D point or displacement, in grid cells.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Componentwise sum.
    pub fn plus(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }

    /// Componentwise scalar product.
    pub fn times(self, factor: f64) -> Vector {
        Vector::new(self.x * factor, self.y * factor)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        self.plus(other)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, factor: f64) -> Vector {
        self.times(factor)
    }
}

// ── Kinds ────────────────────────────────────────────────────────────────────

/// Terrain occupying a grid cell. An empty cell is `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Obstacle {
    Wall,
    Lava,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorKind {
    /// A plain actor with no behaviour of its own.
    Actor,
    Player,
    Fireball,
    Coin,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActorKind::Actor => "actor",
            ActorKind::Player => "player",
            ActorKind::Fireball => "fireball",
            ActorKind::Coin => "coin",
        };
        f.write_str(name)
    }
}

/// What the player ran into: a terrain cell or another actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Touch {
    Obstacle(Obstacle),
    Actor(ActorKind),
}

impl From<Obstacle> for Touch {
    fn from(obstacle: Obstacle) -> Self {
        Touch::Obstacle(obstacle)
    }
}

impl From<ActorKind> for Touch {
    fn from(kind: ActorKind) -> Self {
        Touch::Actor(kind)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Won,
    Lost,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        self != Status::Running
    }
}

// ── Behaviours ───────────────────────────────────────────────────────────────

/// How a fireball reacts when its next position is blocked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rebound {
    /// Invert the speed and stay put for this tick.
    Reverse,
    /// Jump back to the given spawn point, keeping the speed.
    Respawn(Vector),
}

/// Vertical bobbing of a coin around its anchor.
/// Presentation only: it never changes what the coin collides with in a
/// way that matters to the outcome of a level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    pub anchor: Vector,
    pub phase: f64,
}

impl Spring {
    /// Phase gained per time unit.
    pub const SPEED: f64 = 8.0;
    /// Peak vertical displacement, in cells.
    pub const DIST: f64 = 0.07;

    pub fn offset(&self) -> Vector {
        Vector::new(0.0, self.phase.sin() * Self::DIST)
    }
}

/// Per-variant behaviour, dispatched by `Actor::act`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Behavior {
    Inert,
    /// Moved by the driver from external input, never by itself.
    Player,
    Fireball(Rebound),
    Coin(Spring),
}

// ── Actor ────────────────────────────────────────────────────────────────────

/// Any rectangle that takes part in the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub pos: Vector,
    pub size: Vector,
    pub speed: Vector,
    pub behavior: Behavior,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            pos: Vector::ZERO,
            size: Vector::new(1.0, 1.0),
            speed: Vector::ZERO,
            behavior: Behavior::Inert,
        }
    }
}

impl Actor {
    /// Plain actor. Every coordinate must be finite.
    pub fn new(pos: Vector, size: Vector, speed: Vector) -> GameResult<Self> {
        for (name, v) in [("pos", pos), ("size", size), ("speed", speed)] {
            if !v.is_finite() {
                return Err(GameError::InvalidArgument(format!(
                    "{name} must be finite, got ({}, {})",
                    v.x, v.y
                )));
            }
        }
        Ok(Self {
            pos,
            size,
            speed,
            behavior: Behavior::Inert,
        })
    }

    /// Player spawned from a map cell; lifted half a cell so its 1.5-tall
    /// box stands on the cell's floor.
    pub fn player(pos: Vector) -> Self {
        Self {
            pos: pos.plus(Vector::new(0.0, -0.5)),
            size: Vector::new(0.8, 1.5),
            behavior: Behavior::Player,
            ..Self::default()
        }
    }

    pub fn fireball(pos: Vector, speed: Vector) -> Self {
        Self {
            pos,
            speed,
            behavior: Behavior::Fireball(Rebound::Reverse),
            ..Self::default()
        }
    }

    pub fn horizontal_fireball(pos: Vector) -> Self {
        Self::fireball(pos, Vector::new(2.0, 0.0))
    }

    pub fn vertical_fireball(pos: Vector) -> Self {
        Self::fireball(pos, Vector::new(0.0, 2.0))
    }

    /// Falls at 3 cells per time unit and restarts from `pos` on impact.
    pub fn fire_rain(pos: Vector) -> Self {
        Self {
            behavior: Behavior::Fireball(Rebound::Respawn(pos)),
            ..Self::fireball(pos, Vector::new(0.0, 3.0))
        }
    }

    /// Coin with a spring phase drawn uniformly from `[0, 2π)`.
    pub fn coin<R: Rng + ?Sized>(pos: Vector, rng: &mut R) -> Self {
        let phase = rng.gen::<f64>() * TAU;
        Self::coin_with_phase(pos, phase)
    }

    pub fn coin_with_phase(pos: Vector, phase: f64) -> Self {
        let anchor = pos.plus(Vector::new(0.2, 0.1));
        Self {
            pos: anchor,
            size: Vector::new(0.6, 0.6),
            behavior: Behavior::Coin(Spring { anchor, phase }),
            ..Self::default()
        }
    }

    pub fn kind(&self) -> ActorKind {
        match self.behavior {
            Behavior::Inert => ActorKind::Actor,
            Behavior::Player => ActorKind::Player,
            Behavior::Fireball(_) => ActorKind::Fireball,
            Behavior::Coin(_) => ActorKind::Coin,
        }
    }

    pub fn left(&self) -> f64 {
        self.pos.x
    }

    pub fn top(&self) -> f64 {
        self.pos.y
    }

    pub fn right(&self) -> f64 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f64 {
        self.pos.y + self.size.y
    }

    /// True when both boxes share a strictly positive area.
    /// Touching edges do not count, and an actor never overlaps itself.
    pub fn overlaps(&self, other: &Actor) -> bool {
        if std::ptr::eq(self, other) {
            return false;
        }
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Where a fireball would be after `time`; unchanged when standing still.
    pub fn next_position(&self, time: f64) -> Vector {
        if self.speed == Vector::ZERO {
            return self.pos;
        }
        self.pos.plus(self.speed.times(time))
    }

    /// Advance this actor by `time`. Call exactly once per tick: coins
    /// accumulate phase on every call.
    pub fn act(&mut self, time: f64, level: &Level) {
        match self.behavior {
            Behavior::Inert | Behavior::Player => {}
            Behavior::Fireball(rebound) => {
                let next = self.next_position(time);
                if level.obstacle_at(next, self.size).is_none() {
                    self.pos = next;
                    return;
                }
                match rebound {
                    Rebound::Reverse => {
                        self.speed = self.speed.times(-1.0);
                        debug!("fireball at ({}, {}) bounced", self.pos.x, self.pos.y);
                    }
                    Rebound::Respawn(spawn) => {
                        self.pos = spawn;
                        debug!("fire rain respawned at ({}, {})", spawn.x, spawn.y);
                    }
                }
            }
            Behavior::Coin(ref mut spring) => {
                spring.phase += Spring::SPEED * time;
                self.pos = spring.anchor.plus(spring.offset());
            }
        }
    }
}
