pub mod environment;
pub mod outcome;
pub mod player;
pub mod result;
pub mod team;

pub use environment::{ParkGeometry, Weather, WeatherKind};
pub use outcome::{
    AtBatOutcome, AtBatRecord, Base, BaseMovement, BattedBallDescriptor, DefenseOutcome, Fielder,
    FlightSummary, HitResult, HitType,
};
pub use player::{PitcherRole, Player, PlayerId, PlayerRatings, Position, SituationalAbility};
pub use result::{GameEndReason, GameResult, LineScore, PlayRecord};
pub use team::{Side, TeamSheet, LINEUP_SIZE};
