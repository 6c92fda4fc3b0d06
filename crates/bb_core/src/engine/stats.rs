//! Per-player stat deltas and their aggregation into box-score lines.
//!
//! The engine never writes season records. Each play emits [`StatDelta`]s keyed
//! by player id; [`StatLedger`] folds them into per-game lines for the result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::inning::Runner;
use crate::models::player::PlayerId;
use crate::models::{AtBatOutcome, AtBatRecord};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    // batting
    PlateAppearance,
    AtBat,
    Hit,
    Double,
    Triple,
    HomeRun,
    Walk,
    HitByPitch,
    Strikeout,
    Run,
    RunBattedIn,
    SacrificeFly,
    SacrificeBunt,
    GroundedIntoDoublePlay,
    ReachedOnError,
    // pitching
    BattersFaced,
    OutsRecorded,
    HitsAllowed,
    HomeRunsAllowed,
    WalksAllowed,
    StrikeoutsPitched,
    RunsAllowed,
    EarnedRuns,
    PitchesThrown,
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatDelta {
    pub player: PlayerId,
    pub kind: StatKind,
    pub amount: u32,
}

impl StatDelta {
    pub fn new(player: PlayerId, kind: StatKind, amount: u32) -> Self {
        Self { player, kind, amount }
    }
}

/// Deltas produced by one plate appearance.
pub fn deltas_for_play(
    record: &AtBatRecord,
    batter: PlayerId,
    pitcher: PlayerId,
    scored: &[Runner],
) -> Vec<StatDelta> {
    let mut out = Vec::with_capacity(8);
    let mut push = |player, kind, amount: u32| {
        if amount > 0 {
            out.push(StatDelta::new(player, kind, amount));
        }
    };
    let outcome = record.outcome;

    push(batter, StatKind::PlateAppearance, 1);
    push(pitcher, StatKind::BattersFaced, 1);
    push(pitcher, StatKind::PitchesThrown, u32::from(record.pitch_count));
    push(pitcher, StatKind::OutsRecorded, u32::from(record.outs_recorded));
    if outcome.counts_as_at_bat() {
        push(batter, StatKind::AtBat, 1);
    }
    if outcome.is_hit() {
        push(batter, StatKind::Hit, 1);
        push(pitcher, StatKind::HitsAllowed, 1);
    }

    match outcome {
        AtBatOutcome::Double => push(batter, StatKind::Double, 1),
        AtBatOutcome::Triple => push(batter, StatKind::Triple, 1),
        AtBatOutcome::HomeRun => {
            push(batter, StatKind::HomeRun, 1);
            push(pitcher, StatKind::HomeRunsAllowed, 1);
        }
        AtBatOutcome::Walk => {
            push(batter, StatKind::Walk, 1);
            push(pitcher, StatKind::WalksAllowed, 1);
        }
        AtBatOutcome::HitByPitch => push(batter, StatKind::HitByPitch, 1),
        AtBatOutcome::StrikeoutSwinging | AtBatOutcome::StrikeoutLooking => {
            push(batter, StatKind::Strikeout, 1);
            push(pitcher, StatKind::StrikeoutsPitched, 1);
        }
        AtBatOutcome::SacrificeFly => push(batter, StatKind::SacrificeFly, 1),
        AtBatOutcome::SacrificeBunt => push(batter, StatKind::SacrificeBunt, 1),
        AtBatOutcome::DoublePlay => push(batter, StatKind::GroundedIntoDoublePlay, 1),
        AtBatOutcome::ReachedOnError => push(batter, StatKind::ReachedOnError, 1),
        _ => {}
    }

    let rbi_eligible = !matches!(outcome, AtBatOutcome::DoublePlay | AtBatOutcome::ReachedOnError);
    if rbi_eligible {
        push(batter, StatKind::RunBattedIn, scored.len() as u32);
    }
    for runner in scored {
        push(runner.player, StatKind::Run, 1);
        push(runner.charged_to, StatKind::RunsAllowed, 1);
        if runner.earned {
            push(runner.charged_to, StatKind::EarnedRuns, 1);
        }
    }
    out
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BattingLine {
    pub plate_appearances: u32,
    pub at_bats: u32,
    pub hits: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub walks: u32,
    pub hit_by_pitch: u32,
    pub strikeouts: u32,
    pub runs: u32,
    pub runs_batted_in: u32,
    pub sacrifice_flies: u32,
    pub sacrifice_bunts: u32,
    pub grounded_into_double_play: u32,
    pub reached_on_error: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PitchingLine {
    pub batters_faced: u32,
    pub outs_recorded: u32,
    pub hits_allowed: u32,
    pub home_runs_allowed: u32,
    pub walks_allowed: u32,
    pub strikeouts: u32,
    pub runs_allowed: u32,
    pub earned_runs: u32,
    pub pitches: u32,
    pub wins: u32,
    pub losses: u32,
}

impl PitchingLine {
    /// Innings pitched in scorebook notation, e.g. 6.2 for twenty outs.
    pub fn innings_pitched(&self) -> f32 {
        (self.outs_recorded / 3) as f32 + (self.outs_recorded % 3) as f32 / 10.0
    }
}

/// Per-game box-score lines keyed by player id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatLedger {
    pub batting: BTreeMap<PlayerId, BattingLine>,
    pub pitching: BTreeMap<PlayerId, PitchingLine>,
}

impl StatLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, delta: &StatDelta) {
        let n = delta.amount;
        match delta.kind {
            StatKind::PlateAppearance
            | StatKind::AtBat
            | StatKind::Hit
            | StatKind::Double
            | StatKind::Triple
            | StatKind::HomeRun
            | StatKind::Walk
            | StatKind::HitByPitch
            | StatKind::Strikeout
            | StatKind::Run
            | StatKind::RunBattedIn
            | StatKind::SacrificeFly
            | StatKind::SacrificeBunt
            | StatKind::GroundedIntoDoublePlay
            | StatKind::ReachedOnError => {
                let line = self.batting.entry(delta.player).or_default();
                let field = match delta.kind {
                    StatKind::PlateAppearance => &mut line.plate_appearances,
                    StatKind::AtBat => &mut line.at_bats,
                    StatKind::Hit => &mut line.hits,
                    StatKind::Double => &mut line.doubles,
                    StatKind::Triple => &mut line.triples,
                    StatKind::HomeRun => &mut line.home_runs,
                    StatKind::Walk => &mut line.walks,
                    StatKind::HitByPitch => &mut line.hit_by_pitch,
                    StatKind::Strikeout => &mut line.strikeouts,
                    StatKind::Run => &mut line.runs,
                    StatKind::RunBattedIn => &mut line.runs_batted_in,
                    StatKind::SacrificeFly => &mut line.sacrifice_flies,
                    StatKind::SacrificeBunt => &mut line.sacrifice_bunts,
                    StatKind::GroundedIntoDoublePlay => &mut line.grounded_into_double_play,
                    _ => &mut line.reached_on_error,
                };
                *field += n;
            }
            StatKind::BattersFaced
            | StatKind::OutsRecorded
            | StatKind::HitsAllowed
            | StatKind::HomeRunsAllowed
            | StatKind::WalksAllowed
            | StatKind::StrikeoutsPitched
            | StatKind::RunsAllowed
            | StatKind::EarnedRuns
            | StatKind::PitchesThrown
            | StatKind::Win
            | StatKind::Loss => {
                let line = self.pitching.entry(delta.player).or_default();
                let field = match delta.kind {
                    StatKind::BattersFaced => &mut line.batters_faced,
                    StatKind::OutsRecorded => &mut line.outs_recorded,
                    StatKind::HitsAllowed => &mut line.hits_allowed,
                    StatKind::HomeRunsAllowed => &mut line.home_runs_allowed,
                    StatKind::WalksAllowed => &mut line.walks_allowed,
                    StatKind::StrikeoutsPitched => &mut line.strikeouts,
                    StatKind::RunsAllowed => &mut line.runs_allowed,
                    StatKind::EarnedRuns => &mut line.earned_runs,
                    StatKind::PitchesThrown => &mut line.pitches,
                    StatKind::Win => &mut line.wins,
                    _ => &mut line.losses,
                };
                *field += n;
            }
        }
    }

    pub fn from_deltas<'a>(deltas: impl IntoIterator<Item = &'a StatDelta>) -> Self {
        let mut ledger = Self::new();
        for delta in deltas {
            ledger.record(delta);
        }
        ledger
    }

    pub fn batting_line(&self, player: PlayerId) -> Option<&BattingLine> {
        self.batting.get(&player)
    }

    pub fn pitching_line(&self, player: PlayerId) -> Option<&PitchingLine> {
        self.pitching.get(&player)
    }
}
