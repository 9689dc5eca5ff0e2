//! Pennant core: baseball elimination through maximum flow
//!
//! Given every team's wins and the remaining head-to-head schedule, decide
//! whether a team can still finish with at least as many wins as everyone
//! else. The question reduces to a maximum-flow problem over a network of
//! games and teams, solved with Edmonds-Karp.
//!
//! ```
//! use pennant_core::{evaluate, EvaluationConfig, Standings, Verdict};
//!
//! let standings = Standings::new(vec![10, 8], vec![vec![0, 1], vec![1, 0]]).unwrap();
//! let report = evaluate(&standings, &EvaluationConfig::default()).unwrap();
//! assert_eq!(report.verdict, Verdict::Contending);
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod config;
pub mod elimination;
pub mod input;
pub mod standings;

pub use crate::config::{ConfigError, EvaluationConfig, UnboundedCapacity};
pub use crate::elimination::{
    evaluate, evaluate_all, evaluate_team, EliminationError, EliminationReason, EliminationReport,
    TeamDiagnostics, Verdict,
};
pub use crate::input::{read_standings, InputError, InputFormat};
pub use crate::standings::{Standings, StandingsError, TeamIndex, Wins};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
