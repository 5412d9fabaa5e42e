use crate::entities::Obstacle;

/// Alias for `Result<T, GameError>`.
pub type GameResult<T> = Result<T, GameError>;

/// Errors raised by the simulation core.
///
/// Lookups that simply find nothing (unknown symbol, free cell, no occupant)
/// are `None`, never an error.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// An argument was not a well-formed value (e.g. a NaN coordinate).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A level was built with more than one player actor.
    #[error("a level may hold at most one player, found {count}")]
    MultiplePlayers { count: usize },

    /// A level without a player was handed to the driver.
    #[error("level has no player actor")]
    MissingPlayer,

    /// The player's spawn box already touches terrain, so it could never move.
    #[error("player spawns inside terrain ({0:?})")]
    BlockedSpawn(Obstacle),

    /// A session was started without any level schemas.
    #[error("no levels to play")]
    EmptyCampaign,

    /// The level-schema document could not be decoded.
    #[error("malformed level schema: {0}")]
    Schema(#[from] serde_json::Error),
}
