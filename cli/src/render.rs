//! Plain-text presentation of standings and reports
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::io::{self, Write};

use pennant_core::{EliminationReason, EliminationReport, Standings};

const RULE: &str = "--------------------------";

fn join<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The input as read: team count, wins and schedule
pub fn standings(out: &mut impl Write, standings: &Standings) -> io::Result<()> {
    writeln!(out, "Number of teams -> {}", standings.team_count())?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Wins:")?;
    writeln!(out, "{}", join(standings.all_wins()))?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Schedule:")?;
    for row in standings.schedule() {
        writeln!(out, "{}", join(row))?;
    }
    writeln!(out, "{RULE}")?;
    writeln!(
        out,
        "Remaining games: {}",
        join((0..standings.team_count()).map(|t| standings.remaining_games(t)))
    )?;
    writeln!(out, "{RULE}")
}

/// Diagnostics and YES/NO verdict for one team
pub fn report(out: &mut impl Write, report: &EliminationReport) -> io::Result<()> {
    writeln!(out, "Target score ({}): {}", report.name, report.target_score)?;
    writeln!(
        out,
        "Maximum additional rival wins: {}",
        join(report.teams.iter().filter_map(|t| t.allowance))
    )?;

    match report.reason {
        EliminationReason::Direct => {}
        EliminationReason::RivalAhead { team, deficit } => {
            let rival = report
                .teams
                .iter()
                .find(|t| t.team == team)
                .map_or_else(|| format!("team {team}"), |t| t.name.clone());
            writeln!(out, "{rival} already leads by {deficit} wins")?;
        }
        EliminationReason::Flow => {
            if let Some(max_flow) = report.max_flow {
                writeln!(out, "Maximum flow: {max_flow}")?;
            }
            writeln!(out, "Games among rivals: {}", report.required_wins)?;
        }
    }

    writeln!(out, "{}", if report.is_eliminated() { "NO" } else { "YES" })?;
    writeln!(out, "{RULE}")
}
