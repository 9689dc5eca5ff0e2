//! Standings input formats
//!
//! The text format is a whitespace-separated token stream: the team count
//! `n`, then `n` win totals, then the `n×n` remaining-games matrix row by
//! row. Line breaks carry no meaning. The JSON format is the serde form of
//! [`Standings`] and may additionally carry team names.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;

use crate::standings::{Standings, StandingsError};

/// Input parsing errors
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Input ended while reading {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("Token {position} ({token:?}) is not a non-negative integer")]
    InvalidToken { token: String, position: usize },

    #[error("Token {position} ({token:?}) is negative")]
    NegativeValue { token: String, position: usize },

    #[error("{count} unexpected tokens after the schedule")]
    TrailingTokens { count: usize },

    #[error("Unknown input format {0:?}, expected text or json")]
    UnknownFormat(String),

    #[error("Invalid JSON standings: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Standings(#[from] StandingsError),
}

/// Supported standings file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    #[default]
    Text,
    Json,
}

impl InputFormat {
    /// Guess the format from a file extension; anything but `.json` is text
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Text,
        }
    }
}

impl FromStr for InputFormat {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" | "txt" => Ok(InputFormat::Text),
            "json" => Ok(InputFormat::Json),
            other => Err(InputError::UnknownFormat(other.to_string())),
        }
    }
}

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
            position: 0,
        }
    }

    fn next_number(&mut self, expected: &'static str) -> Result<u64, InputError> {
        let token = self
            .inner
            .next()
            .ok_or(InputError::UnexpectedEnd { expected })?;
        self.position += 1;

        if let Ok(value) = token.parse::<u64>() {
            return Ok(value);
        }
        if token.parse::<i64>().is_ok() {
            return Err(InputError::NegativeValue {
                token: token.to_string(),
                position: self.position,
            });
        }
        Err(InputError::InvalidToken {
            token: token.to_string(),
            position: self.position,
        })
    }

    fn remaining(self) -> usize {
        self.inner.count()
    }
}

/// Parse the whitespace-separated text format
pub fn parse_text(text: &str) -> Result<Standings, InputError> {
    let mut tokens = Tokens::new(text);

    let teams = tokens.next_number("team count")?;
    let teams = usize::try_from(teams).map_err(|_| InputError::InvalidToken {
        token: teams.to_string(),
        position: 1,
    })?;
    if teams < 2 {
        return Err(StandingsError::TooFewTeams { found: teams }.into());
    }

    // No preallocation: the count is untrusted until the tokens exist.
    let mut wins = Vec::new();
    for _ in 0..teams {
        wins.push(tokens.next_number("win totals")?);
    }

    let mut remaining = Vec::new();
    for _ in 0..teams {
        let mut row = Vec::new();
        for _ in 0..teams {
            row.push(tokens.next_number("remaining-games matrix")?);
        }
        remaining.push(row);
    }

    let trailing = tokens.remaining();
    if trailing > 0 {
        return Err(InputError::TrailingTokens { count: trailing });
    }

    debug!("parsed text standings for {} teams", teams);
    Ok(Standings::new(wins, remaining)?)
}

/// Parse the JSON format
pub fn parse_json(json: &str) -> Result<Standings, InputError> {
    let standings: Standings = serde_json::from_str(json)?;
    debug!("parsed JSON standings for {} teams", standings.team_count());
    Ok(standings)
}

pub fn parse(contents: &str, format: InputFormat) -> Result<Standings, InputError> {
    match format {
        InputFormat::Text => parse_text(contents),
        InputFormat::Json => parse_json(contents),
    }
}

/// Read standings from a file, guessing the format from its extension when none is given
pub fn read_standings(
    path: impl AsRef<Path>,
    format: Option<InputFormat>,
) -> Result<Standings, InputError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, format.unwrap_or_else(|| InputFormat::from_path(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEAMS4: &str = "4\n83 80 78 77\n0 1 6 1\n1 0 0 2\n6 0 0 0\n1 2 0 0\n";

    #[test]
    fn test_parse_text() {
        let standings = parse_text(TEAMS4).unwrap();
        assert_eq!(standings.team_count(), 4);
        assert_eq!(standings.all_wins(), &[83, 80, 78, 77]);
        assert_eq!(standings.games_between(0, 2), 6);
        assert_eq!(standings.remaining_games(0), 8);
    }

    #[test]
    fn test_line_layout_is_irrelevant() {
        let flat = TEAMS4.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(parse_text(&flat).unwrap(), parse_text(TEAMS4).unwrap());
    }

    #[test]
    fn test_text_errors() {
        assert!(matches!(
            parse_text("2\n10 8\n0 1\n1"),
            Err(InputError::UnexpectedEnd {
                expected: "remaining-games matrix"
            })
        ));
        assert!(matches!(
            parse_text("2\n10 -8\n0 1\n1 0"),
            Err(InputError::NegativeValue { position: 3, .. })
        ));
        assert!(matches!(
            parse_text("2\n10 eight\n0 1\n1 0"),
            Err(InputError::InvalidToken { position: 3, .. })
        ));
        assert!(matches!(
            parse_text("2\n10 8\n0 1\n1 0\n7 7"),
            Err(InputError::TrailingTokens { count: 2 })
        ));
        assert!(matches!(
            parse_text("1\n10\n0"),
            Err(InputError::Standings(StandingsError::TooFewTeams { found: 1 }))
        ));
        assert!(matches!(
            parse_text("2\n10 8\n0 1\n2 0"),
            Err(InputError::Standings(StandingsError::Asymmetric { .. }))
        ));
        assert!(matches!(parse_text(""), Err(InputError::UnexpectedEnd { .. })));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "names": ["Atlanta", "Philadelphia"],
            "wins": [83, 80],
            "remaining": [[0, 1], [1, 0]]
        }"#;
        let standings = parse_json(json).unwrap();
        assert_eq!(standings.name(0), "Atlanta");
        assert_eq!(standings.wins(1), 80);

        assert!(matches!(
            parse_json(r#"{"wins": [1], "remaining": [[0]]}"#),
            Err(InputError::Json(_))
        ));
    }

    #[test]
    fn test_format_selection() {
        assert_eq!(InputFormat::from_path(Path::new("teams4.json")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("teams4.JSON")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("teams4.txt")), InputFormat::Text);
        assert_eq!(InputFormat::from_path(Path::new("teams4")), InputFormat::Text);
        assert_eq!("json".parse::<InputFormat>().unwrap(), InputFormat::Json);
        assert!("yaml".parse::<InputFormat>().is_err());
    }

    #[test]
    fn test_read_missing_file() {
        assert!(matches!(
            read_standings("/nonexistent/teams4.txt", None),
            Err(InputError::Io { .. })
        ));
    }
}
