//! Assembles per-player-per-game esports export rows into teams, players,
//! matches and the two per-match fact tables.

pub mod assembly;
pub mod coerce;
pub mod diagnostics;
pub mod draft;
pub mod dragons;
pub mod export;
pub mod fields;
pub mod game;
pub mod grouper;
pub mod model;
pub mod objectives;
pub mod pipeline;
pub mod player_stats;
pub mod players;
pub mod role;
pub mod row;
pub mod series;
pub mod source;
pub mod summary;
pub mod teams;

pub use assembly::Assembly;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use game::{GameRecord, Side};
pub use model::{Match, MatchResult, MatchStatus, TeamMatchStats};
pub use pipeline::{PipelineConfig, PipelineError, run};
pub use player_stats::PlayerMatchStats;
pub use players::PlayerAggregate;
pub use role::Role;
pub use row::RawRow;
pub use teams::TeamAggregate;
