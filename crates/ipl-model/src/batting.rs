//! Column names of the batting statistics schema.

/// Batter name.
pub const PLAYER: &str = "player";
/// Runs scored.
pub const RUNS: &str = "runs";
/// Balls faced.
pub const BALLS: &str = "balls";
/// Derived: runs per hundred balls.
pub const STRIKE_RATE: &str = "strike_rate";

/// Columns the transform stage cannot work without.
pub const REQUIRED_COLUMNS: [&str; 3] = [PLAYER, RUNS, BALLS];
