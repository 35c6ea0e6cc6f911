// Roast prompt engine: request model, prompt sections, narrative mode
// selection, prompt assembly, response decoding and batch coordination.

pub mod batch;
pub mod bracket;
pub mod directory;
pub mod error;
pub mod generator;
pub mod matchups;
pub mod model;
pub mod narrative;
pub mod prompt;
pub mod response;

pub use batch::{BatchCoordinator, DEFAULT_BATCH_SIZE};
pub use error::RoastError;
pub use generator::TextGenerator;
pub use model::{
    InsideJoke, LeagueContext, Personality, PlayerStat, PlayerSummary, PlayoffBracketEntry,
    RoastRequest, RoastResult, SeasonPhase, Team, WeeklyMatchup,
};
