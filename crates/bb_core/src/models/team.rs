use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::player::{Player, PlayerRatings, Position};
use crate::error::{GameError, Result};

/// Batting slots in a lineup.
pub const LINEUP_SIZE: usize = 9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Away,
    Home,
}

impl Side {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Away => 0,
            Side::Home => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Side::Away => Side::Home,
            Side::Home => Side::Away,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Away => write!(f, "away"),
            Side::Home => write!(f, "home"),
        }
    }
}

/// Roster, batting order and starting pitcher for one side.
///
/// `lineup` and `starting_pitcher` are indices into `players`. With a
/// designated hitter the starting pitcher does not appear in the lineup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSheet {
    pub name: String,
    pub players: Vec<Player>,
    pub lineup: Vec<usize>,
    pub starting_pitcher: usize,
}

impl TeamSheet {
    /// Reject sheets the engine cannot simulate with well-defined indices.
    pub fn validate(&self, side: Side) -> Result<()> {
        if self.lineup.len() != LINEUP_SIZE {
            return Err(GameError::InvalidLineupSize {
                side,
                expected: LINEUP_SIZE,
                found: self.lineup.len(),
            });
        }

        let mut seen = HashSet::with_capacity(LINEUP_SIZE);
        for (slot, &index) in self.lineup.iter().enumerate() {
            if index >= self.players.len() {
                return Err(GameError::LineupIndexOutOfRange {
                    side,
                    slot,
                    index,
                    roster: self.players.len(),
                });
            }
            if !seen.insert(index) {
                return Err(GameError::DuplicateLineupEntry { side, index });
            }
        }

        match self.players.get(self.starting_pitcher) {
            None => Err(GameError::NoEligiblePitcher {
                side,
                reason: format!(
                    "starting pitcher index {} outside roster of {}",
                    self.starting_pitcher,
                    self.players.len()
                ),
            }),
            Some(player) if !player.is_pitcher() => Err(GameError::NoEligiblePitcher {
                side,
                reason: format!("{} is listed as {}, not P", player.name, player.position),
            }),
            Some(_) => Ok(()),
        }
    }

    pub fn batter(&self, order: usize) -> &Player {
        &self.players[self.lineup[order % self.lineup.len()]]
    }

    /// Roster indices of every pitcher, in roster order.
    pub fn pitcher_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.players.iter().enumerate().filter(|(_, p)| p.is_pitcher()).map(|(i, _)| i)
    }

    /// LF/CF/RF ratings from the lineup; `None` where the slot is not filled.
    pub fn outfielders(&self) -> [Option<&PlayerRatings>; 3] {
        let find = |pos: Position| {
            self.lineup
                .iter()
                .filter_map(|&i| self.players.get(i))
                .find(|p| p.position == pos)
                .map(|p| &p.ratings)
        };
        [find(Position::LF), find(Position::CF), find(Position::RF)]
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::average_team;
    use super::*;

    #[test]
    fn average_team_is_valid() {
        assert!(average_team("Home", 100).validate(Side::Home).is_ok());
    }

    #[test]
    fn short_lineup_is_rejected() {
        let mut team = average_team("Home", 100);
        team.lineup.pop();
        let err = team.validate(Side::Home).unwrap_err();
        assert!(matches!(err, GameError::InvalidLineupSize { found: 8, .. }));
    }

    #[test]
    fn out_of_range_lineup_index_is_rejected() {
        let mut team = average_team("Away", 200);
        team.lineup[4] = 99;
        let err = team.validate(Side::Away).unwrap_err();
        assert!(matches!(err, GameError::LineupIndexOutOfRange { slot: 4, index: 99, .. }));
    }

    #[test]
    fn duplicate_lineup_entry_is_rejected() {
        let mut team = average_team("Away", 200);
        team.lineup[8] = 0;
        assert!(matches!(
            team.validate(Side::Away),
            Err(GameError::DuplicateLineupEntry { index: 0, .. })
        ));
    }

    #[test]
    fn position_player_cannot_start_on_the_mound() {
        let mut team = average_team("Home", 100);
        team.starting_pitcher = 0;
        assert!(matches!(team.validate(Side::Home), Err(GameError::NoEligiblePitcher { .. })));
    }

    #[test]
    fn outfielders_missing_slot_is_none() {
        let mut team = average_team("Home", 100);
        // swap the LF out of the lineup for the starter
        team.lineup[3] = 9;
        let [lf, cf, rf] = team.outfielders();
        assert!(lf.is_none());
        assert!(cf.is_some());
        assert!(rf.is_some());
    }

    #[test]
    fn batter_wraps_lineup() {
        let team = average_team("Home", 100);
        assert_eq!(team.batter(9).id, team.batter(0).id);
    }
}
