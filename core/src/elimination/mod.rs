//! Baseball elimination through maximum flow
//!
//! `network` reduces the standings of a distinguished team to a flow network;
//! `verdict` solves it and turns the flow value into an elimination verdict.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod network;
pub mod verdict;

pub use self::network::{pair_count, Construction, EliminationNetwork, NetworkBuilder, NodeRole};
pub use self::verdict::{
    evaluate, evaluate_all, evaluate_team, EliminationError, EliminationReason, EliminationReport,
    TeamDiagnostics, Verdict,
};
