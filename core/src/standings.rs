//! League standings: the validated input of one elimination evaluation
//!
//! A `Standings` value holds the current win total of every team and the
//! symmetric matrix of games still to be played between each pair of teams.
//! Team 0 is the distinguished team whose elimination is being decided.
//! Every constructor validates shape, symmetry and arithmetic range, so the
//! rest of the crate can treat a `Standings` as well-formed.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Win count of a single team
pub type Wins = u64;

/// Position of a team inside a `Standings` value
pub type TeamIndex = usize;

/// Index of the team under evaluation
pub const DISTINGUISHED: TeamIndex = 0;

/// Rejected-input conditions detected before any network is built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StandingsError {
    #[error("at least two teams are required, found {found}")]
    TooFewTeams { found: usize },

    #[error("expected {expected} win totals, found {found}")]
    WinsLength { expected: usize, found: usize },

    #[error("remaining-games matrix must have {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("row {row} of the remaining-games matrix has {found} entries, expected {expected}")]
    RowLength { row: usize, expected: usize, found: usize },

    #[error("team {team} is scheduled to play itself {games} times")]
    NonZeroDiagonal { team: TeamIndex, games: u64 },

    #[error("asymmetric schedule: teams {first} and {second} have {forward} vs {backward} games remaining")]
    Asymmetric {
        first: TeamIndex,
        second: TeamIndex,
        forward: u64,
        backward: u64,
    },

    #[error("expected {expected} team names, found {found}")]
    NamesLength { expected: usize, found: usize },

    #[error("team {team} does not exist in a league of {teams} teams")]
    TeamOutOfRange { team: TeamIndex, teams: usize },

    #[error("win and game totals exceed the representable range")]
    Overflow,
}

/// Serialized shape of a standings table, validated on the way in
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawStandings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    names: Option<Vec<String>>,
    wins: Vec<Wins>,
    remaining: Vec<Vec<u64>>,
}

/// Validated team standings with team 0 as the distinguished team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStandings", into = "RawStandings")]
pub struct Standings {
    names: Option<Vec<String>>,
    wins: Vec<Wins>,
    remaining: Vec<Vec<u64>>,
}

impl Standings {
    /// Validate and wrap win totals and the remaining-games matrix
    pub fn new(wins: Vec<Wins>, remaining: Vec<Vec<u64>>) -> Result<Self, StandingsError> {
        let teams = remaining.len();
        if teams < 2 {
            return Err(StandingsError::TooFewTeams { found: teams });
        }
        if wins.len() != teams {
            return Err(StandingsError::WinsLength {
                expected: teams,
                found: wins.len(),
            });
        }

        for (row, games) in remaining.iter().enumerate() {
            if games.len() != teams {
                return Err(StandingsError::RowLength {
                    row,
                    expected: teams,
                    found: games.len(),
                });
            }
        }

        for first in 0..teams {
            if remaining[first][first] != 0 {
                return Err(StandingsError::NonZeroDiagonal {
                    team: first,
                    games: remaining[first][first],
                });
            }
            for second in (first + 1)..teams {
                let forward = remaining[first][second];
                let backward = remaining[second][first];
                if forward != backward {
                    return Err(StandingsError::Asymmetric {
                        first,
                        second,
                        forward,
                        backward,
                    });
                }
            }
        }

        Self::check_range(&wins, &remaining)?;

        Ok(Self {
            names: None,
            wins,
            remaining,
        })
    }

    /// Attach display names, one per team
    pub fn with_names(mut self, names: Vec<String>) -> Result<Self, StandingsError> {
        if names.len() != self.team_count() {
            return Err(StandingsError::NamesLength {
                expected: self.team_count(),
                found: names.len(),
            });
        }
        self.names = Some(names);
        Ok(self)
    }

    // Every total derived later (best final score, games among rivals,
    // source capacity + 1) is bounded by these sums.
    fn check_range(wins: &[Wins], remaining: &[Vec<u64>]) -> Result<(), StandingsError> {
        let mut grand_total: u64 = 0;
        for (team, row) in remaining.iter().enumerate() {
            let row_total = row
                .iter()
                .try_fold(0u64, |acc, &games| acc.checked_add(games))
                .ok_or(StandingsError::Overflow)?;
            wins[team]
                .checked_add(row_total)
                .ok_or(StandingsError::Overflow)?;
            grand_total = grand_total
                .checked_add(row_total)
                .ok_or(StandingsError::Overflow)?;
        }
        grand_total.checked_add(1).ok_or(StandingsError::Overflow)?;
        Ok(())
    }

    pub fn team_count(&self) -> usize {
        self.wins.len()
    }

    pub fn wins(&self, team: TeamIndex) -> Wins {
        self.wins[team]
    }

    pub fn all_wins(&self) -> &[Wins] {
        &self.wins
    }

    /// Games left between two teams
    pub fn games_between(&self, first: TeamIndex, second: TeamIndex) -> u64 {
        self.remaining[first][second]
    }

    pub fn schedule(&self) -> &[Vec<u64>] {
        &self.remaining
    }

    /// Total games a team still has to play
    pub fn remaining_games(&self, team: TeamIndex) -> u64 {
        self.remaining[team].iter().sum()
    }

    /// Best final win total the team can reach by winning every remaining game
    pub fn best_possible_wins(&self, team: TeamIndex) -> Wins {
        self.wins[team] + self.remaining_games(team)
    }

    /// Display label of a team, falling back to its index
    pub fn name(&self, team: TeamIndex) -> String {
        match &self.names {
            Some(names) => names[team].clone(),
            None => format!("team {}", team),
        }
    }

    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// Team order that puts `team` first and keeps the others in index order
    pub fn distinguished_order(&self, team: TeamIndex) -> Result<Vec<TeamIndex>, StandingsError> {
        if team >= self.team_count() {
            return Err(StandingsError::TeamOutOfRange {
                team,
                teams: self.team_count(),
            });
        }
        let mut order = Vec::with_capacity(self.team_count());
        order.push(team);
        order.extend((0..self.team_count()).filter(|&other| other != team));
        Ok(order)
    }

    /// Re-index the standings so that `team` becomes the distinguished team
    pub fn with_distinguished(&self, team: TeamIndex) -> Result<Self, StandingsError> {
        let order = self.distinguished_order(team)?;

        let wins = order.iter().map(|&t| self.wins[t]).collect();
        let remaining = order
            .iter()
            .map(|&row| order.iter().map(|&col| self.remaining[row][col]).collect())
            .collect();
        let names = self
            .names
            .as_ref()
            .map(|names| order.iter().map(|&t| names[t].clone()).collect());

        Ok(Self {
            names,
            wins,
            remaining,
        })
    }
}

impl TryFrom<RawStandings> for Standings {
    type Error = StandingsError;

    fn try_from(raw: RawStandings) -> Result<Self, Self::Error> {
        let standings = Standings::new(raw.wins, raw.remaining)?;
        match raw.names {
            Some(names) => standings.with_names(names),
            None => Ok(standings),
        }
    }
}

impl From<Standings> for RawStandings {
    fn from(standings: Standings) -> Self {
        Self {
            names: standings.names,
            wins: standings.wins,
            remaining: standings.remaining,
        }
    }
}
