//! Baserunner advancement per outcome.
//!
//! Pure: the pre-play runner vector, outs and outcome tag fully determine the
//! movements, except for the speed rolls the resolver makes up front and passes
//! in as [`AdvanceRolls`].

use crate::models::{AtBatOutcome, Base, BaseMovement};

/// Pre-rolled optional advances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceRolls {
    /// Runner from second scores on a single (else stops at third).
    pub second_scores_on_single: bool,
    /// Runner from first scores on a double (else stops at third).
    pub first_scores_on_double: bool,
}

fn advance(from: Base, to: Base) -> BaseMovement {
    BaseMovement::Advance { from, to }
}

fn put_out(from: Base) -> BaseMovement {
    BaseMovement::PutOut { from }
}

fn next_base(base: Base) -> Base {
    match base {
        Base::Batter => Base::First,
        Base::First => Base::Second,
        Base::Second => Base::Third,
        Base::Third | Base::Home => Base::Home,
    }
}

/// Every occupied base moves up exactly `bases`, lead runner first.
fn everyone_moves(runners: [bool; 3], bases: usize, out: &mut Vec<BaseMovement>) {
    for slot in (0..3).rev() {
        if runners[slot] {
            let from = Base::from_slot(slot);
            let mut to = from;
            for _ in 0..bases {
                to = next_base(to);
            }
            out.push(advance(from, to));
        }
    }
}

/// Length of the force chain starting at first: 0 if first is open.
fn forced_chain(runners: [bool; 3]) -> usize {
    runners.iter().take_while(|&&occupied| occupied).count()
}

/// Batter to first, forced runners move up one, everyone else holds.
fn forced_only(runners: [bool; 3], out: &mut Vec<BaseMovement>) {
    let chain = forced_chain(runners);
    for slot in (0..chain).rev() {
        let from = Base::from_slot(slot);
        out.push(advance(from, next_base(from)));
    }
    out.push(advance(Base::Batter, Base::First));
}

/// Movements for one play, computed from the state before the pitch.
///
/// Runs that would cross the plate on a play that also makes the third out
/// are dropped.
pub fn movements(
    outcome: AtBatOutcome,
    runners: [bool; 3],
    outs_before: u8,
    rolls: AdvanceRolls,
) -> Vec<BaseMovement> {
    let mut out = Vec::with_capacity(4);
    let [on_first, on_second, on_third] = runners;

    match outcome {
        AtBatOutcome::HomeRun => {
            everyone_moves(runners, 3, &mut out);
            out.push(advance(Base::Batter, Base::Home));
        }
        AtBatOutcome::Triple => {
            everyone_moves(runners, 3, &mut out);
            out.push(advance(Base::Batter, Base::Third));
        }
        AtBatOutcome::Double => {
            if on_third {
                out.push(advance(Base::Third, Base::Home));
            }
            if on_second {
                out.push(advance(Base::Second, Base::Home));
            }
            if on_first {
                let to = if rolls.first_scores_on_double { Base::Home } else { Base::Third };
                out.push(advance(Base::First, to));
            }
            out.push(advance(Base::Batter, Base::Second));
        }
        AtBatOutcome::Single | AtBatOutcome::ReachedOnError => {
            let second_scores = outcome == AtBatOutcome::Single && rolls.second_scores_on_single;
            if on_third {
                out.push(advance(Base::Third, Base::Home));
            }
            if on_second {
                let to = if second_scores { Base::Home } else { Base::Third };
                out.push(advance(Base::Second, to));
            }
            if on_first {
                out.push(advance(Base::First, Base::Second));
            }
            out.push(advance(Base::Batter, Base::First));
        }
        AtBatOutcome::Walk
        | AtBatOutcome::HitByPitch
        | AtBatOutcome::InfieldSingle
        | AtBatOutcome::BuntHit => forced_only(runners, &mut out),
        AtBatOutcome::StrikeoutSwinging
        | AtBatOutcome::StrikeoutLooking
        | AtBatOutcome::Groundout
        | AtBatOutcome::Flyout
        | AtBatOutcome::Lineout
        | AtBatOutcome::Popout => out.push(put_out(Base::Batter)),
        AtBatOutcome::DoublePlay => {
            if on_first {
                out.push(put_out(Base::First));
            }
            out.push(put_out(Base::Batter));
        }
        AtBatOutcome::SacrificeFly => {
            if on_third {
                out.push(advance(Base::Third, Base::Home));
            }
            out.push(put_out(Base::Batter));
        }
        AtBatOutcome::SacrificeBunt => {
            everyone_moves(runners, 1, &mut out);
            out.push(put_out(Base::Batter));
        }
        AtBatOutcome::FieldersChoice => {
            let chain = forced_chain(runners);
            if chain == 0 {
                out.push(put_out(Base::Batter));
            } else {
                out.push(put_out(Base::from_slot(chain - 1)));
                for slot in (0..chain - 1).rev() {
                    let from = Base::from_slot(slot);
                    out.push(advance(from, next_base(from)));
                }
                out.push(advance(Base::Batter, Base::First));
            }
        }
    }

    let outs_on_play = out.iter().filter(|m| m.is_out()).count() as u8;
    if outs_before + outs_on_play >= 3 {
        out.retain(|m| !m.scores());
    }
    out
}
