/// Text maps → levels.
///
/// A map is a list of rows, one character per cell. Terrain symbols are
/// fixed (`x` wall, `!` lava); actor symbols come from a caller-supplied
/// `ActorTable`.
///
/// The player box is 1.5 cells tall and reaches half a cell above its
/// symbol, so `@` must not sit on the top row (a `Session` rejects such a
/// map with `BlockedSpawn`).

use std::collections::HashMap;
use std::fmt;

use rand::{thread_rng, RngCore};

use crate::entities::{Actor, Obstacle, Vector};
use crate::error::GameResult;
use crate::level::{Grid, Level};

/// Builds an actor spawned at a map cell. The RNG feeds presentation-only
/// randomness such as coin phases.
pub type ActorFactory = fn(Vector, &mut dyn RngCore) -> Actor;

/// Symbol → actor constructor mapping.
#[derive(Clone, Default)]
pub struct ActorTable {
    factories: HashMap<char, ActorFactory>,
}

impl ActorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// `@` player, `o` coin, `=` horizontal fireball, `|` vertical fireball,
    /// `v` fireball.
    pub fn standard() -> Self {
        Self::new()
            .with('@', |pos, _| Actor::player(pos))
            .with('o', |pos, rng| Actor::coin(pos, rng))
            .with('=', |pos, _| Actor::horizontal_fireball(pos))
            .with('|', |pos, _| Actor::vertical_fireball(pos))
            .with('v', |pos, _| Actor::fireball(pos, Vector::ZERO))
    }

    pub fn with(mut self, symbol: char, factory: ActorFactory) -> Self {
        self.insert(symbol, factory);
        self
    }

    pub fn insert(&mut self, symbol: char, factory: ActorFactory) {
        self.factories.insert(symbol, factory);
    }

    pub fn get(&self, symbol: char) -> Option<ActorFactory> {
        self.factories.get(&symbol).copied()
    }
}

impl fmt::Debug for ActorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut symbols: Vec<char> = self.factories.keys().copied().collect();
        symbols.sort_unstable();
        f.debug_struct("ActorTable").field("symbols", &symbols).finish()
    }
}

#[derive(Clone, Debug)]
pub struct LevelParser {
    actors: ActorTable,
}

impl LevelParser {
    pub fn new(actors: ActorTable) -> Self {
        Self { actors }
    }

    pub fn obstacle_from_symbol(&self, symbol: char) -> Option<Obstacle> {
        match symbol {
            'x' => Some(Obstacle::Wall),
            '!' => Some(Obstacle::Lava),
            _ => None,
        }
    }

    /// Blank symbols never name an actor.
    pub fn actor_from_symbol(&self, symbol: char) -> Option<ActorFactory> {
        if symbol.is_whitespace() {
            return None;
        }
        self.actors.get(symbol)
    }

    /// Terrain only; row lengths are kept as they are.
    pub fn create_grid<S: AsRef<str>>(&self, rows: &[S]) -> Grid {
        rows.iter()
            .map(|row| {
                row.as_ref()
                    .chars()
                    .map(|symbol| self.obstacle_from_symbol(symbol))
                    .collect()
            })
            .collect()
    }

    /// Actors in row-major order, each spawned at `(column, row)`.
    pub fn create_actors<S: AsRef<str>>(&self, rows: &[S], rng: &mut dyn RngCore) -> Vec<Actor> {
        let mut actors = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            for (j, symbol) in row.as_ref().chars().enumerate() {
                if let Some(factory) = self.actor_from_symbol(symbol) {
                    actors.push(factory(Vector::new(j as f64, i as f64), rng));
                }
            }
        }
        actors
    }

    pub fn parse<S: AsRef<str>>(&self, rows: &[S]) -> GameResult<Level> {
        self.parse_with_rng(rows, &mut thread_rng())
    }

    pub fn parse_with_rng<S: AsRef<str>>(
        &self,
        rows: &[S],
        rng: &mut dyn RngCore,
    ) -> GameResult<Level> {
        Level::new(self.create_grid(rows), self.create_actors(rows, rng))
    }
}

impl Default for LevelParser {
    fn default() -> Self {
        Self::new(ActorTable::standard())
    }
}

/// Decode a JSON array of levels, each an array of row strings.
pub fn load_schemas(json: &str) -> GameResult<Vec<Vec<String>>> {
    Ok(serde_json::from_str(json)?)
}
