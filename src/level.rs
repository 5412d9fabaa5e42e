/// A level: the static terrain grid plus the live actors on it.

use std::fmt;

use log::{debug, info};

use crate::entities::{Actor, ActorKind, Obstacle, Status, Touch, Vector};
use crate::error::{GameError, GameResult};

/// Rows of cells; rows may differ in length.
pub type Grid = Vec<Vec<Option<Obstacle>>>;

/// Stable handle to an actor slot. Stays valid (and never reused) after
/// the actor it names is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(usize);

impl ActorId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Level {
    grid: Grid,
    /// Arena of actors in spawn order; removed actors leave a `None` slot.
    actors: Vec<Option<Actor>>,
    player: Option<ActorId>,
    status: Status,
    finish_delay: f64,
}

impl Level {
    pub const DEFAULT_FINISH_DELAY: f64 = 1.0;

    /// Build a level. At most one actor may be a player.
    pub fn new(grid: Grid, actors: Vec<Actor>) -> GameResult<Self> {
        let players: Vec<usize> = actors
            .iter()
            .enumerate()
            .filter(|(_, a)| a.kind() == ActorKind::Player)
            .map(|(i, _)| i)
            .collect();
        if players.len() > 1 {
            return Err(GameError::MultiplePlayers {
                count: players.len(),
            });
        }

        Ok(Self {
            grid,
            actors: actors.into_iter().map(Some).collect(),
            player: players.first().copied().map(ActorId),
            status: Status::Running,
            finish_delay: Self::DEFAULT_FINISH_DELAY,
        })
    }

    pub fn with_finish_delay(mut self, delay: f64) -> Self {
        self.finish_delay = delay;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn height(&self) -> usize {
        self.grid.len()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.grid.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Terrain at a cell; cells past the end of a short row are empty.
    pub fn cell(&self, col: usize, row: usize) -> Option<Obstacle> {
        self.grid.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn player(&self) -> Option<ActorId> {
        self.player
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn finish_delay(&self) -> f64 {
        self.finish_delay
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0).and_then(Option::as_ref)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Live actors in spawn order.
    pub fn actors(&self) -> impl Iterator<Item = (ActorId, &Actor)> + '_ {
        self.actors
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|a| (ActorId(i), a)))
    }

    /// Snapshot of live ids, safe to iterate while mutating the level.
    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.actors().map(|(id, _)| id).collect()
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// Terrain touched by the rectangle at `pos` with `size`.
    ///
    /// Anything left of, right of or above the grid is a wall; anything
    /// reaching the bottom is lava. Otherwise the covered cells are scanned
    /// row by row and the first occupied one wins.
    pub fn obstacle_at(&self, pos: Vector, size: Vector) -> Option<Obstacle> {
        let left = pos.x;
        let right = pos.x + size.x;
        let top = pos.y;
        let bottom = pos.y + size.y;

        if left < 0.0 || right >= self.width() as f64 || top < 0.0 {
            return Some(Obstacle::Wall);
        }
        if bottom >= self.height() as f64 {
            return Some(Obstacle::Lava);
        }

        let rows = top.floor() as usize..bottom.ceil() as usize;
        let cols = left.floor() as usize..right.ceil() as usize;
        rows.flat_map(|row| cols.clone().map(move |col| (col, row)))
            .find_map(|(col, row)| self.cell(col, row))
    }

    /// First live actor, other than `id` itself, overlapping actor `id`.
    pub fn occupant_at(&self, id: ActorId) -> Option<ActorId> {
        let actor = self.actor(id)?;
        self.actors()
            .find(|&(other, a)| other != id && actor.overlaps(a))
            .map(|(other, _)| other)
    }

    /// First live actor overlapping `query`, which need not belong to the level.
    pub fn actor_at(&self, query: &Actor) -> Option<ActorId> {
        self.actors()
            .find(|(_, a)| query.overlaps(a))
            .map(|(id, _)| id)
    }

    pub fn remaining(&self, kind: ActorKind) -> usize {
        self.actors().filter(|(_, a)| a.kind() == kind).count()
    }

    pub fn no_more_actors(&self, kind: ActorKind) -> bool {
        self.remaining(kind) == 0
    }

    /// Outcome decided and grace period over.
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal() && self.finish_delay < 0.0
    }

    // ── Mutation ─────────────────────────────────────────────────────────────

    /// Drop an actor. Unknown or already removed ids are ignored.
    pub fn remove_actor(&mut self, id: ActorId) -> Option<Actor> {
        let removed = self.actors.get_mut(id.0).and_then(Option::take);
        if let Some(actor) = &removed {
            debug!("removed {} {}", actor.kind(), id);
            if self.player == Some(id) {
                self.player = None;
            }
        }
        removed
    }

    /// Let actor `id` run its own behaviour for `time`.
    pub fn advance_actor(&mut self, id: ActorId, time: f64) {
        let Some(mut actor) = self.actors.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        actor.act(time, self);
        self.actors[id.0] = Some(actor);
    }

    /// React to the player touching something. No-op once the outcome is
    /// decided. Coins are only collected when `actor` really is a coin.
    pub fn player_touched(&mut self, touch: Touch, actor: Option<ActorId>) {
        if self.status.is_terminal() {
            return;
        }

        match touch {
            Touch::Obstacle(Obstacle::Lava) | Touch::Actor(ActorKind::Fireball) => {
                self.finish(Status::Lost);
            }
            Touch::Actor(ActorKind::Coin) => {
                let Some(id) = actor else { return };
                if self.actor(id).map(Actor::kind) != Some(ActorKind::Coin) {
                    return;
                }
                self.remove_actor(id);
                if self.no_more_actors(ActorKind::Coin) {
                    self.finish(Status::Won);
                }
            }
            _ => {}
        }
    }

    /// Count down the grace period; only runs once the outcome is decided.
    pub fn tick_finish_delay(&mut self, time: f64) {
        if self.status.is_terminal() {
            self.finish_delay -= time;
        }
    }

    fn finish(&mut self, status: Status) {
        info!("level {:?}", status);
        self.status = status;
    }
}
