// Data layer: player directory, season stats, weekly projections.

pub mod directory;
pub mod projections;
pub mod stats;
