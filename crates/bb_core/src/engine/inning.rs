//! Game state and the half-inning state machine.
//!
//! [`GameState`] is owned by the game loop and only changes through
//! [`GameState::apply`] and [`GameState::next_half_inning`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::player::PlayerId;
use crate::models::team::LINEUP_SIZE;
use crate::models::{AtBatOutcome, AtBatRecord, Base, BaseMovement, Side};

pub const OUTS_PER_HALF: u8 = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    pub fn batting(self) -> Side {
        match self {
            Half::Top => Side::Away,
            Half::Bottom => Side::Home,
        }
    }

    pub fn fielding(self) -> Side {
        self.batting().opponent()
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Half::Top => write!(f, "top"),
            Half::Bottom => write!(f, "bottom"),
        }
    }
}

/// A runner on base and the pitcher charged if the runner scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Runner {
    pub player: PlayerId,
    pub charged_to: PlayerId,
    /// False when the runner reached on an error.
    pub earned: bool,
}

/// What one plate appearance did to the state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transition {
    /// Runners who crossed the plate, in order.
    pub scored: Vec<Runner>,
    pub half_complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub inning: u8,
    pub half: Half,
    /// 0..=2 while the half is active; 3 once it is complete.
    pub outs: u8,
    pub runners: [Option<Runner>; 3],
    /// Runs by side, indexed with [`Side::index`].
    pub score: [u16; 2],
    /// Next lineup slot due up, per side.
    pub batter_slot: [usize; 2],
    /// Roster index of the pitcher in the game, per side.
    pub pitcher: [usize; 2],
    /// Pitches thrown by the current pitcher, per side.
    pub pitch_count: [u32; 2],
    /// Roster indices of every pitcher who has appeared, per side, in order.
    pub pitchers_used: [Vec<usize>; 2],
    /// Runs per inning, per side.
    pub line_score: [Vec<u16>; 2],
    pub half_complete: bool,
}

impl GameState {
    pub fn new(away_starter: usize, home_starter: usize) -> Self {
        Self {
            inning: 1,
            half: Half::Top,
            outs: 0,
            runners: [None; 3],
            score: [0, 0],
            batter_slot: [0, 0],
            pitcher: [away_starter, home_starter],
            pitch_count: [0, 0],
            pitchers_used: [vec![away_starter], vec![home_starter]],
            line_score: [vec![0], Vec::new()],
            half_complete: false,
        }
    }

    pub fn batting_side(&self) -> Side {
        self.half.batting()
    }

    pub fn fielding_side(&self) -> Side {
        self.half.fielding()
    }

    pub fn runs(&self, side: Side) -> u16 {
        self.score[side.index()]
    }

    /// Occupancy of first, second, third.
    pub fn occupied(&self) -> [bool; 3] {
        [self.runners[0].is_some(), self.runners[1].is_some(), self.runners[2].is_some()]
    }

    /// Batting team's runs minus fielding team's runs.
    pub fn score_differential(&self) -> i32 {
        i32::from(self.runs(self.batting_side())) - i32::from(self.runs(self.fielding_side()))
    }

    /// Home minus away.
    pub fn home_lead(&self) -> i32 {
        i32::from(self.runs(Side::Home)) - i32::from(self.runs(Side::Away))
    }

    /// Apply one plate appearance.
    ///
    /// `batter` is the hitter and `pitcher` the pitcher charged if the batter
    /// reaches and later scores.
    pub fn apply(&mut self, record: &AtBatRecord, batter: PlayerId, pitcher: PlayerId) -> Transition {
        debug_assert!(!self.half_complete, "at-bat applied to a completed half-inning");
        let mut transition = Transition::default();
        let batting = self.batting_side().index();

        for movement in &record.movements {
            match *movement {
                BaseMovement::Advance { from, to } => {
                    let runner = match from {
                        Base::Batter => Some(Runner {
                            player: batter,
                            charged_to: pitcher,
                            earned: record.outcome != AtBatOutcome::ReachedOnError,
                        }),
                        other => other.slot().and_then(|slot| self.runners[slot].take()),
                    };
                    let Some(runner) = runner else {
                        #[cfg(feature = "strict_contracts")]
                        panic!("advance from empty base {from:?} to {to:?}");
                        #[cfg(not(feature = "strict_contracts"))]
                        {
                            tracing::warn!(?from, ?to, "advance from an empty base ignored");
                            continue;
                        }
                    };
                    match to.slot() {
                        Some(slot) => self.runners[slot] = Some(runner),
                        None => transition.scored.push(runner),
                    }
                }
                BaseMovement::PutOut { from } => {
                    if let Some(slot) = from.slot() {
                        self.runners[slot] = None;
                    }
                    self.outs += 1;
                }
            }
        }

        let runs = transition.scored.len() as u16;
        self.score[batting] += runs;
        if let Some(inning_runs) = self.line_score[batting].last_mut() {
            *inning_runs += runs;
        }
        self.batter_slot[batting] = (self.batter_slot[batting] + 1) % LINEUP_SIZE;

        if self.outs >= OUTS_PER_HALF {
            self.outs = OUTS_PER_HALF;
            self.runners = [None; 3];
            self.half_complete = true;
        }
        transition.half_complete = self.half_complete;
        transition
    }

    /// Roll over to the next half-inning: outs and bases reset.
    pub fn next_half_inning(&mut self) {
        match self.half {
            Half::Top => self.half = Half::Bottom,
            Half::Bottom => {
                self.half = Half::Top;
                self.inning += 1;
            }
        }
        self.outs = 0;
        self.runners = [None; 3];
        self.half_complete = false;
        self.line_score[self.batting_side().index()].push(0);
    }

    /// Put a new pitcher in for `side`; the pitch count starts over.
    pub fn change_pitcher(&mut self, side: Side, roster_index: usize) {
        let i = side.index();
        self.pitcher[i] = roster_index;
        self.pitch_count[i] = 0;
        self.pitchers_used[i].push(roster_index);
    }
}
