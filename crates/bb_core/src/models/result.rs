//! Final output of a simulated game.

use serde::{Deserialize, Serialize};

use crate::engine::inning::Half;
use crate::engine::pitching::PitchingChange;
use crate::engine::stats::{StatDelta, StatLedger};
use crate::models::outcome::AtBatRecord;
use crate::models::player::PlayerId;
use crate::models::team::Side;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameEndReason {
    /// Away side ahead after the bottom of the last regulation inning.
    Regulation,
    /// Away side ahead after the bottom of an extra inning.
    ExtraInnings,
    /// Home side took the lead in the bottom of a deciding inning.
    WalkOff,
    /// Home side ahead after the top of a deciding inning; the bottom is skipped.
    HomeTeamNotBatting,
    Mercy,
    /// Still tied after the bottom of the extra-innings cap.
    TieAtCap,
}

/// One plate appearance in game order, with the situation it started from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayRecord {
    pub inning: u8,
    pub half: Half,
    pub batter: PlayerId,
    pub pitcher: PlayerId,
    pub outs_before: u8,
    pub runners_before: [bool; 3],
    pub record: AtBatRecord,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineScore {
    pub away: Vec<u16>,
    pub home: Vec<u16>,
}

impl LineScore {
    pub fn runs(&self, side: Side) -> &[u16] {
        match side {
            Side::Away => &self.away,
            Side::Home => &self.home,
        }
    }

    pub fn total(&self, side: Side) -> u16 {
        self.runs(side).iter().sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameResult {
    pub seed: u64,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u16,
    pub away_score: u16,
    /// Last inning in which any half was played.
    pub innings: u8,
    pub line_score: LineScore,
    pub winner: Option<Side>,
    pub end_reason: GameEndReason,
    pub winning_pitcher: Option<PlayerId>,
    pub losing_pitcher: Option<PlayerId>,
    pub plays: Vec<PlayRecord>,
    pub pitching_changes: Vec<PitchingChange>,
    pub stat_deltas: Vec<StatDelta>,
    pub box_score: StatLedger,
    /// Random draws consumed; equal seeds and inputs give equal counts.
    pub rng_draws: u64,
}

impl GameResult {
    pub fn score(&self, side: Side) -> u16 {
        match side {
            Side::Away => self.away_score,
            Side::Home => self.home_score,
        }
    }

    /// `AWAY 3 - 2 HOME` style summary line.
    pub fn summary(&self) -> String {
        format!(
            "{} {} - {} {} ({:?}, {} inn.)",
            self.away_team, self.away_score, self.home_score, self.home_team, self.end_reason, self.innings
        )
    }
}
