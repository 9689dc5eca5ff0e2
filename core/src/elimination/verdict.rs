//! Elimination verdicts
//!
//! `evaluate` is a pure function from standings to a verdict plus the
//! numbers behind it. Nothing here prints; presentation belongs to callers.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::max_flow::{Flow, FlowError, MaxFlowSolver};
use crate::config::EvaluationConfig;
use crate::elimination::network::{Construction, NetworkBuilder};
use crate::standings::{Standings, StandingsError, TeamIndex, Wins, DISTINGUISHED};

/// Whether the distinguished team can still finish on top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Some outcome of the remaining games lets the team finish first or tied
    Contending,
    /// Mathematically eliminated
    Eliminated,
}

impl Verdict {
    fn from_alive(alive: bool) -> Self {
        if alive {
            Verdict::Contending
        } else {
            Verdict::Eliminated
        }
    }

    pub fn is_eliminated(self) -> bool {
        self == Verdict::Eliminated
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Contending => f.write_str("contending"),
            Verdict::Eliminated => f.write_str("eliminated"),
        }
    }
}

/// How the verdict was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EliminationReason {
    /// Two teams: the distinguished team must strictly exceed the rival
    Direct,
    /// A rival already has more wins than the distinguished team can reach
    RivalAhead { team: TeamIndex, deficit: Wins },
    /// Decided by comparing max flow with the games among rivals
    Flow,
}

/// Per-team numbers the verdict is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDiagnostics {
    pub team: TeamIndex,
    pub name: String,
    pub wins: Wins,
    pub remaining_games: u64,
    /// Extra wins a rival may take without passing the target score;
    /// negative when it already has. `None` for the distinguished team.
    pub allowance: Option<i64>,
}

/// Verdict for one distinguished team with its diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationReport {
    /// Index of the distinguished team in the caller's standings
    pub distinguished: TeamIndex,
    pub name: String,
    pub verdict: Verdict,
    pub reason: EliminationReason,
    /// Best possible final win total of the distinguished team
    pub target_score: Wins,
    /// Games among the other teams, each of which produces a winner
    pub required_wins: Wins,
    /// Value of the maximum flow, when the solver ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_flow: Option<Flow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub augmenting_paths: Option<usize>,
    pub teams: Vec<TeamDiagnostics>,
}

impl EliminationReport {
    pub fn is_eliminated(&self) -> bool {
        self.verdict.is_eliminated()
    }
}

/// Errors surfaced while evaluating standings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EliminationError {
    #[error("Invalid standings: {0}")]
    Standings(#[from] StandingsError),

    #[error("Max flow failed: {0}")]
    Flow(#[from] FlowError),
}

fn allowance(target_score: Wins, wins: Wins) -> i64 {
    let signed = i128::from(target_score) - i128::from(wins);
    signed.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

fn diagnostics(standings: &Standings, target_score: Wins) -> Vec<TeamDiagnostics> {
    (0..standings.team_count())
        .map(|team| TeamDiagnostics {
            team,
            name: standings.name(team),
            wins: standings.wins(team),
            remaining_games: standings.remaining_games(team),
            allowance: (team != DISTINGUISHED)
                .then(|| allowance(target_score, standings.wins(team))),
        })
        .collect()
}

/// Decide whether team 0 of `standings` is eliminated
pub fn evaluate(
    standings: &Standings,
    config: &EvaluationConfig,
) -> Result<EliminationReport, EliminationError> {
    let builder = NetworkBuilder::new(standings).game_capacity(config.game_capacity);
    let required_wins = builder.required_wins();

    let mut report = match builder.build() {
        Construction::Direct {
            target_score,
            rival_wins,
        } => EliminationReport {
            distinguished: DISTINGUISHED,
            name: standings.name(DISTINGUISHED),
            // A tie is not enough with a single rival.
            verdict: Verdict::from_alive(target_score > rival_wins),
            reason: EliminationReason::Direct,
            target_score,
            required_wins,
            max_flow: None,
            network_nodes: None,
            augmenting_paths: None,
            teams: Vec::new(),
        },
        Construction::RivalAhead {
            target_score,
            team,
            deficit,
        } => EliminationReport {
            distinguished: DISTINGUISHED,
            name: standings.name(DISTINGUISHED),
            verdict: Verdict::Eliminated,
            reason: EliminationReason::RivalAhead { team, deficit },
            target_score,
            required_wins,
            max_flow: None,
            network_nodes: None,
            augmenting_paths: None,
            teams: Vec::new(),
        },
        Construction::Network(elimination) => {
            let solver = MaxFlowSolver::with_search_order(config.search_order);
            let result = solver.solve(
                elimination.network(),
                elimination.source(),
                elimination.sink(),
            )?;
            EliminationReport {
                distinguished: DISTINGUISHED,
                name: standings.name(DISTINGUISHED),
                verdict: Verdict::from_alive(result.max_flow >= elimination.required_wins()),
                reason: EliminationReason::Flow,
                target_score: elimination.target_score(),
                required_wins: elimination.required_wins(),
                max_flow: Some(result.max_flow),
                network_nodes: Some(elimination.network().vertex_count()),
                augmenting_paths: Some(result.metrics.augmenting_paths),
                teams: Vec::new(),
            }
        }
    };

    report.teams = diagnostics(standings, report.target_score);
    info!(
        "{} is {} (target score {}, max flow {:?}, {} games among rivals)",
        report.name, report.verdict, report.target_score, report.max_flow, report.required_wins
    );
    Ok(report)
}

/// Decide whether `team` is eliminated, reporting indices of the given standings
pub fn evaluate_team(
    standings: &Standings,
    team: TeamIndex,
    config: &EvaluationConfig,
) -> Result<EliminationReport, EliminationError> {
    let order = standings.distinguished_order(team)?;
    let reordered = standings.with_distinguished(team)?;
    let mut report = evaluate(&reordered, config)?;

    // Fallback names ("team {i}") depend on position, so take them from the
    // caller's standings rather than the reordered copy.
    report.distinguished = team;
    report.name = standings.name(team);
    if let EliminationReason::RivalAhead { team: rival, .. } = &mut report.reason {
        *rival = order[*rival];
    }
    for diagnostics in &mut report.teams {
        diagnostics.team = order[diagnostics.team];
        diagnostics.name = standings.name(diagnostics.team);
    }
    report.teams.sort_by_key(|diagnostics| diagnostics.team);
    Ok(report)
}

/// Evaluate every team in turn as the distinguished team
pub fn evaluate_all(
    standings: &Standings,
    config: &EvaluationConfig,
) -> Result<Vec<EliminationReport>, EliminationError> {
    (0..standings.team_count())
        .map(|team| evaluate_team(standings, team, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::graph::max_flow::SearchOrder;
    use crate::config::UnboundedCapacity;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn teams4() -> Standings {
        Standings::new(
            vec![83, 80, 78, 77],
            vec![
                vec![0, 1, 6, 1],
                vec![1, 0, 0, 2],
                vec![6, 0, 0, 0],
                vec![1, 2, 0, 0],
            ],
        )
        .unwrap()
        .with_names(vec![
            "Atlanta".into(),
            "Philadelphia".into(),
            "New_York".into(),
            "Montreal".into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_two_teams_ahead() {
        init();
        let standings = Standings::new(vec![10, 8], vec![vec![0, 1], vec![1, 0]]).unwrap();
        let report = evaluate(&standings, &EvaluationConfig::default()).unwrap();
        assert_eq!(report.target_score, 11);
        assert_eq!(report.verdict, Verdict::Contending);
        assert_eq!(report.reason, EliminationReason::Direct);
        assert_eq!(report.max_flow, None);
    }

    #[test]
    fn test_two_teams_tie_is_elimination() {
        let standings = Standings::new(vec![10, 10], vec![vec![0, 0], vec![0, 0]]).unwrap();
        let report = evaluate(&standings, &EvaluationConfig::default()).unwrap();
        assert_eq!(report.target_score, 10);
        assert!(report.is_eliminated());
    }

    #[test]
    fn test_saturated_sink_edges() {
        let standings = Standings::new(
            vec![5, 5, 5],
            vec![vec![0, 0, 0], vec![0, 0, 1], vec![0, 1, 0]],
        )
        .unwrap();
        let report = evaluate(&standings, &EvaluationConfig::default()).unwrap();
        assert_eq!(report.max_flow, Some(0));
        assert_eq!(report.required_wins, 1);
        assert_eq!(report.reason, EliminationReason::Flow);
        assert!(report.is_eliminated());
    }

    #[test]
    fn test_three_teams_tie_allowed() {
        // Every rival may finish level with team 0 once it wins out.
        let standings = Standings::new(
            vec![5, 5, 5],
            vec![vec![0, 1, 0], vec![1, 0, 0], vec![0, 0, 0]],
        )
        .unwrap();
        let report = evaluate(&standings, &EvaluationConfig::default()).unwrap();
        assert_eq!(report.target_score, 6);
        assert_eq!(report.required_wins, 0);
        assert_eq!(report.verdict, Verdict::Contending);
    }

    #[test]
    fn test_textbook_league() {
        init();
        let standings = teams4();
        let reports = evaluate_all(&standings, &EvaluationConfig::default()).unwrap();
        let verdicts: Vec<_> = reports.iter().map(|r| (r.name.as_str(), r.verdict)).collect();
        assert_eq!(
            verdicts,
            vec![
                ("Atlanta", Verdict::Contending),
                ("Philadelphia", Verdict::Eliminated),
                ("New_York", Verdict::Contending),
                ("Montreal", Verdict::Eliminated),
            ]
        );

        let philadelphia = &reports[1];
        assert_eq!(philadelphia.reason, EliminationReason::Flow);
        assert_eq!(philadelphia.target_score, 83);
        assert_eq!(philadelphia.required_wins, 7);
        assert_eq!(philadelphia.max_flow, Some(6));

        let montreal = &reports[3];
        assert_eq!(montreal.distinguished, 3);
        assert_eq!(montreal.reason, EliminationReason::RivalAhead { team: 0, deficit: 3 });
        assert_eq!(montreal.max_flow, None);
    }

    #[test]
    fn test_diagnostics_use_caller_indices() {
        let report = evaluate_team(&teams4(), 2, &EvaluationConfig::default()).unwrap();
        assert_eq!(report.distinguished, 2);
        assert_eq!(report.name, "New_York");
        assert_eq!(report.target_score, 84);

        let teams: Vec<_> = report
            .teams
            .iter()
            .map(|t| (t.team, t.name.as_str(), t.remaining_games, t.allowance))
            .collect();
        assert_eq!(
            teams,
            vec![
                (0, "Atlanta", 8, Some(1)),
                (1, "Philadelphia", 3, Some(4)),
                (2, "New_York", 6, None),
                (3, "Montreal", 3, Some(7)),
            ]
        );
    }

    #[test]
    fn test_unnamed_standings_keep_caller_names() {
        init();
        let unnamed = Standings::new(teams4().all_wins().to_vec(), teams4().schedule().to_vec())
            .unwrap();

        let montreal = evaluate_team(&unnamed, 3, &EvaluationConfig::default()).unwrap();
        assert_eq!(montreal.name, "team 3");
        assert_eq!(montreal.reason, EliminationReason::RivalAhead { team: 0, deficit: 3 });
        let names: Vec<_> = montreal.teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["team 0", "team 1", "team 2", "team 3"]);

        let reports = evaluate_all(&unnamed, &EvaluationConfig::default()).unwrap();
        for (team, report) in reports.iter().enumerate() {
            assert_eq!(report.name, format!("team {}", team));
            for diagnostics in &report.teams {
                assert_eq!(diagnostics.name, format!("team {}", diagnostics.team));
            }
        }
    }

    #[test]
    fn test_negative_allowance_reported() {
        let report = evaluate_team(&teams4(), 3, &EvaluationConfig::default()).unwrap();
        assert_eq!(report.teams[0].allowance, Some(-3));
        assert_eq!(report.teams[1].allowance, Some(0));
    }

    #[test]
    fn test_team_out_of_range() {
        let err = evaluate_team(&teams4(), 4, &EvaluationConfig::default()).unwrap_err();
        assert_eq!(
            err,
            EliminationError::Standings(StandingsError::TeamOutOfRange { team: 4, teams: 4 })
        );
    }

    #[test]
    fn test_config_does_not_change_verdicts() {
        let config = EvaluationConfig {
            game_capacity: UnboundedCapacity::Fixed(10000),
            search_order: SearchOrder::Descending,
        };
        let reports = evaluate_all(&teams4(), &config).unwrap();
        let defaults = evaluate_all(&teams4(), &EvaluationConfig::default()).unwrap();
        for (configured, default) in reports.iter().zip(&defaults) {
            assert_eq!(configured.verdict, default.verdict);
            assert_eq!(configured.max_flow, default.max_flow);
        }
    }

    #[test]
    fn test_small_fixed_capacity_is_raised() {
        init();
        // Five games between two rivals who can each absorb all of them.
        let standings = Standings::new(
            vec![10, 0, 0],
            vec![vec![0, 0, 0], vec![0, 0, 5], vec![0, 5, 0]],
        )
        .unwrap();
        let config = EvaluationConfig {
            game_capacity: UnboundedCapacity::Fixed(1),
            ..EvaluationConfig::default()
        };
        let report = evaluate(&standings, &config).unwrap();
        assert_eq!(report.verdict, Verdict::Contending);
        assert_eq!(report.max_flow, Some(5));
    }

    #[test]
    fn test_report_serializes() {
        let report = evaluate_team(&teams4(), 3, &EvaluationConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["verdict"], "eliminated");
        assert_eq!(json["reason"]["kind"], "rival_ahead");
        assert!(json.get("max_flow").is_none());
    }
}
