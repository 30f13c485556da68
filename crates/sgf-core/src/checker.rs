//! Record checker — sanity checks on an extracted game record
//!
//! Checks run after extraction and accumulate diagnostics rather than
//! stopping at the first problem. Only the checks the caller asks for
//! (board size, presence of a result) produce errors; points placed off
//! a known board produce warnings.

use serde::{Deserialize, Serialize};

use crate::extractor::{parse_record, ExtractOptions, ParsedGame};
use crate::record::{Coord, GameRecord, Point};
use crate::{Error, Result};

/// What a record must satisfy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Required board size, both dimensions
    #[serde(default)]
    pub expected_board_size: Option<Coord>,
    /// Reject games whose result is unknown
    #[serde(default)]
    pub require_result: bool,
}

// ── Check Result Types ────────────────────────────────────

/// Result of checking a record — accumulates all diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no errors were found (warnings are OK)
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    fn add(&mut self, severity: Severity, kind: DiagnosticKind, message: String) {
        self.diagnostics.push(Diagnostic {
            severity,
            kind,
            message,
        });
    }
}

/// A single check diagnostic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{} [{}]: {}", prefix, self.kind, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Category of check issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    BoardSize,
    Result,
    OffBoard,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DiagnosticKind::BoardSize => write!(f, "board-size"),
            DiagnosticKind::Result => write!(f, "result"),
            DiagnosticKind::OffBoard => write!(f, "off-board"),
        }
    }
}

// ── Public API ────────────────────────────────────────────

/// Check a record against the requested constraints
pub fn check_record(record: &GameRecord, options: &CheckOptions) -> CheckResult {
    let mut result = CheckResult::new();

    if let Some(size) = options.expected_board_size {
        if record.board_width != size || record.board_height != size {
            result.add(
                Severity::Error,
                DiagnosticKind::BoardSize,
                format!(
                    "Unexpected board size: expected {0}*{0}, found {1}*{2}.",
                    size, record.board_width, record.board_height
                ),
            );
        }
    }

    if options.require_result && record.result == 0.0 {
        result.add(
            Severity::Error,
            DiagnosticKind::Result,
            "The game has an unknown result.".to_string(),
        );
    }

    check_on_board(record, &mut result);

    for d in &result.diagnostics {
        tracing::debug!(%d, "record check");
    }
    result
}

/// Parse, extract, and check in one step
///
/// The first error diagnostic becomes `Error::CheckError`; warnings are
/// dropped here, use [`check_record`] to see them.
pub fn parse_and_check(
    text: &str,
    extract: &ExtractOptions,
    check: &CheckOptions,
) -> Result<ParsedGame> {
    let game = parse_record(text, extract)?;
    let checked = check_record(&game.record, check);
    let first = checked.errors().next().cloned();
    match first {
        Some(d) => {
            tracing::warn!("SGF parser error: {}", d.message);
            Err(Error::CheckError(d.message))
        }
        None => Ok(game),
    }
}

fn check_on_board(record: &GameRecord, result: &mut CheckResult) {
    let mut off_board = |what: &str, p: Point| {
        if !record.on_board(p) {
            result.add(
                Severity::Warning,
                DiagnosticKind::OffBoard,
                format!(
                    "{} at {} is outside the {}*{} board",
                    what, p, record.board_width, record.board_height
                ),
            );
        }
    };

    for &p in &record.black_stones {
        off_board("black stone", p);
    }
    for &p in &record.white_stones {
        off_board("white stone", p);
    }
    for (i, m) in record.moves.iter().enumerate() {
        if let Some(p) = m.point {
            off_board(&format!("move #{} ({})", i + 1, m.color), p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Color, Move};

    fn record(size: Coord) -> GameRecord {
        GameRecord {
            board_width: size,
            board_height: size,
            ..GameRecord::default()
        }
    }

    #[test]
    fn test_no_constraints_is_valid() {
        let result = check_record(&GameRecord::default(), &CheckOptions::default());
        assert!(result.is_valid());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_board_size_match() {
        let options = CheckOptions {
            expected_board_size: Some(19),
            ..CheckOptions::default()
        };
        assert!(check_record(&record(19), &options).is_valid());

        let result = check_record(&record(9), &options);
        assert!(!result.is_valid());
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, DiagnosticKind::BoardSize);
        assert!(errors[0].message.contains("Unexpected board size"));
    }

    #[test]
    fn test_require_result() {
        let options = CheckOptions {
            require_result: true,
            ..CheckOptions::default()
        };
        let mut r = record(19);
        let result = check_record(&r, &options);
        assert!(!result.is_valid());
        assert!(result.diagnostics[0]
            .to_string()
            .contains("error [result]: The game has an unknown result"));

        r.result = -0.5;
        assert!(check_record(&r, &options).is_valid());
    }

    #[test]
    fn test_off_board_points_are_warnings() {
        let mut r = record(9);
        r.black_stones.push(Point::new(2, 2));
        r.white_stones.push(Point::new(9, 0));
        r.moves.push(Move::play(Color::Black, Point::new(18, 18)));
        r.moves.push(Move::pass(Color::White));

        let result = check_record(&r, &CheckOptions::default());
        assert!(result.is_valid());
        let warnings: Vec<String> = result.warnings().map(|d| d.to_string()).collect();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("white stone at [9,0]"));
        assert!(warnings[1].contains("move #1 (B) at [18,18]"));
    }

    #[test]
    fn test_unknown_board_size_skips_off_board_check() {
        let mut r = GameRecord::default();
        r.black_stones.push(Point::new(40, 40));
        assert!(check_record(&r, &CheckOptions::default()).diagnostics.is_empty());
    }

    #[test]
    fn test_parse_and_check() {
        let options = CheckOptions {
            expected_board_size: Some(19),
            require_result: true,
        };
        let game = parse_and_check(
            "(;SZ[19]RE[B+R];B[pd])",
            &ExtractOptions::default(),
            &options,
        )
        .unwrap();
        assert!(game.record.resigned);

        let err = parse_and_check("(;SZ[13]RE[B+R])", &ExtractOptions::default(), &options)
            .unwrap_err();
        assert!(matches!(err, Error::CheckError(_)));
        assert!(err.to_string().contains("Unexpected board size"));

        let err = parse_and_check("(;SZ[19])", &ExtractOptions::default(), &options).unwrap_err();
        assert!(err.to_string().contains("unknown result"));
    }

    #[test]
    fn test_parse_and_check_reports_first_error_only() {
        let options = CheckOptions {
            expected_board_size: Some(9),
            require_result: true,
        };
        let err = parse_and_check("(;SZ[19];B[pd])", &ExtractOptions::default(), &options)
            .unwrap_err();
        assert_eq!(err.messages().len(), 1);
        assert!(err.to_string().contains("Unexpected board size"));
    }
}
