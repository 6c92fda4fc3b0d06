pub mod advancement;
pub mod at_bat;
pub mod batted_ball;
pub mod defense;
pub mod game_loop;
pub mod inning;
pub mod physics_constants; // SI units, exit velocity in km/h
pub mod pitching;
pub mod probability;
pub mod rng;
pub mod stats;
pub mod trajectory;

pub use at_bat::{resolve, resolve_contact, AtBatContext, ContactResult};
pub use batted_ball::{BattedBallModel, SituationalContext};
pub use game_loop::{CommentaryHook, DescriptionKeys, GameEngine, GamePlan};
pub use inning::{GameState, Half, Runner, Transition};
pub use pitching::{ChangeReason, Checkpoint, PitchingChange, PitchingStaffManager};
pub use rng::{GameRng, RandomSource, ScriptedRng};
pub use stats::{deltas_for_play, BattingLine, PitchingLine, StatDelta, StatKind, StatLedger};
pub use trajectory::fly;
