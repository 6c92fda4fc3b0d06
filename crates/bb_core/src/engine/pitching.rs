//! Pitching staff policy: when to go to the bullpen and whom to bring in.

use serde::{Deserialize, Serialize};

use crate::config::BullpenPolicy;
use crate::engine::inning::Half;
use crate::engine::rng::RandomSource;
use crate::models::player::{PitcherRole, PlayerId};
use crate::models::{Side, TeamSheet};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    PitchCount,
    LateInnings,
    Closer,
}

/// A completed substitution and the outgoing pitcher's line for the stint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PitchingChange {
    pub side: Side,
    pub inning: u8,
    pub half: Half,
    pub outs_in_half: u8,
    pub outgoing: PlayerId,
    pub incoming: PlayerId,
    pub reason: ChangeReason,
    pub outgoing_outs: u32,
    pub outgoing_runs: u32,
    pub outgoing_pitches: u32,
}

/// When the check happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// Before the first pitch of a half-inning.
    HalfStart,
    /// Mid-inning, right after the pitch count crossed the threshold.
    PitchCountCrossed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchingStaffManager {
    policy: BullpenPolicy,
}

impl PitchingStaffManager {
    pub fn new(policy: BullpenPolicy) -> Self {
        Self { policy }
    }

    /// True when `before..after` crosses the pitch-count threshold.
    pub fn crossed_threshold(&self, before: u32, after: u32) -> bool {
        before < self.policy.pitch_count_threshold && after >= self.policy.pitch_count_threshold
    }

    /// Roll the substitution policy for the pitcher in the game.
    ///
    /// Rules are tried in order (pitch count, closer, late-inning reliever);
    /// each rule that applies consumes one draw.
    pub fn evaluate(
        &self,
        rng: &mut dyn RandomSource,
        checkpoint: Checkpoint,
        inning: u8,
        pitch_count: u32,
        role: PitcherRole,
    ) -> Option<ChangeReason> {
        let p = &self.policy;
        if pitch_count >= p.pitch_count_threshold && rng.chance(p.pitch_count_pull_probability) {
            return Some(ChangeReason::PitchCount);
        }
        if checkpoint == Checkpoint::PitchCountCrossed {
            return None;
        }
        if inning >= p.closer_inning && role != PitcherRole::Closer && rng.chance(p.closer_probability) {
            return Some(ChangeReason::Closer);
        }
        if inning >= p.reliever_from_inning
            && role == PitcherRole::Starter
            && rng.chance(p.reliever_probability)
        {
            return Some(ChangeReason::LateInnings);
        }
        None
    }

    /// Roster index of the reliever to bring in: a closer from the closer
    /// inning on, a reliever before that, any unused pitcher as a fallback.
    /// `None` when the bullpen is empty.
    pub fn pick_replacement(&self, team: &TeamSheet, used: &[usize], inning: u8) -> Option<usize> {
        let wanted = if inning >= self.policy.closer_inning {
            PitcherRole::Closer
        } else {
            PitcherRole::Reliever
        };
        unused(team, used)
            .find(|&i| team.players[i].role() == wanted)
            .or_else(|| unused(team, used).find(|&i| team.players[i].role() == PitcherRole::Reliever))
            .or_else(|| unused(team, used).next())
    }
}

fn unused<'t>(team: &'t TeamSheet, used: &'t [usize]) -> impl Iterator<Item = usize> + 't {
    team.pitcher_indices().filter(move |i| !used.contains(i))
}
