/// Per-frame driver and level session.
pub mod compute;
/// Driver tunables.
pub mod config;
/// Vectors, actors and their behaviours.
pub mod entities;
/// Crate error type.
pub mod error;
/// Terrain grid, actor arena and touch resolution.
pub mod level;
/// Text maps to levels.
pub mod parser;
