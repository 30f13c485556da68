//! Record extractor — maps a parsed property tree onto a [`GameRecord`]
//!
//! # Pipeline
//!
//! `TreeCollection → select_main_path → fold properties → ParsedGame`
//!
//! Only the path to the deepest leaf is read: the leaf whose root path holds
//! the most nodes, the earliest such leaf in document order on ties. Every
//! property along that path is folded into the record in source order.
//! Identifiers outside the dispatch table are kept as [`UnparsedProperty`].

use serde::{Deserialize, Serialize};

use crate::parser::ast::{Property, TreeCollection, TreeId};
use crate::record::{Color, Coord, GameRecord, Move, Point, RESIGN_MARGIN};
use crate::{Error, Result};

/// Komi used when a lenient parse cannot read KM
pub const DEFAULT_KOMI: f32 = 6.5;

/// How unreadable TM and KM values are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberPolicy {
    /// Fail the whole extraction
    #[default]
    Strict,
    /// TM falls back to 0 and KM to [`DEFAULT_KOMI`], with a warning
    Lenient,
}

/// Extraction configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    #[serde(default)]
    pub numbers: NumberPolicy,
}

impl ExtractOptions {
    pub fn lenient() -> Self {
        ExtractOptions {
            numbers: NumberPolicy::Lenient,
        }
    }
}

/// A property the extractor does not interpret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnparsedProperty {
    /// Uppercased identifier
    pub id: String,
    /// Raw values joined with `,`
    pub value: String,
}

/// Output of a successful extraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedGame {
    pub record: GameRecord,
    pub unparsed: Vec<UnparsedProperty>,
    /// Values replaced by defaults under [`NumberPolicy::Lenient`]
    pub warnings: Vec<String>,
}

// ── Public API ─────────────────────────────────────────────

/// Parse SGF text straight into a game record
///
/// # Errors
/// Any structural error from the parser, `CollectionError` when the text
/// does not hold exactly one game tree, and `PropertyError` for a known
/// property with a bad arity or value.
pub fn parse_record(text: &str, options: &ExtractOptions) -> Result<ParsedGame> {
    let trees = crate::parser::parse_to_tree_collection(text)?;
    extract_record(&trees, options)
}

/// Fold the main path of a single-rooted collection into a record
pub fn extract_record(trees: &TreeCollection, options: &ExtractOptions) -> Result<ParsedGame> {
    let path = select_main_path(trees)?;

    path.iter()
        .flat_map(|&id| trees.tree(id).sequence.iter())
        .flat_map(|node| node.properties.iter())
        .try_fold(ParsedGame::default(), |game, prop| game.apply(prop, options))
        .inspect_err(|e| tracing::warn!("SGF parser error: {}", e))
}

/// Trees from the root down to the deepest leaf
///
/// Depth counts nodes along the root path. Trees are stored in document
/// order with parents before children, so one forward pass computes every
/// depth and the first maximum is the earliest leaf.
pub fn select_main_path(trees: &TreeCollection) -> Result<Vec<TreeId>> {
    match trees.roots() {
        [] => Err(collection_error("Empty tree collection.")),
        [_] => {
            let mut depths = vec![0usize; trees.len()];
            let mut best: Option<(TreeId, usize)> = None;

            for i in 0..trees.len() {
                let id = TreeId(i);
                let tree = trees.tree(id);
                let above = tree.parent.map_or(0, |p| depths[p.0]);
                depths[i] = above + tree.sequence.len();

                let is_deeper = best.map_or(true, |(_, d)| depths[i] > d);
                if tree.children.is_empty() && is_deeper {
                    best = Some((id, depths[i]));
                }
            }

            let (leaf, depth) = best.ok_or_else(|| collection_error("Empty tree collection."))?;
            let mut path: Vec<TreeId> = trees.ancestors(leaf).collect();
            path.reverse();
            tracing::debug!(leaf = leaf.0, depth, trees = path.len(), "selected main path");
            Ok(path)
        }
        _ => Err(collection_error("Multiple trees unsupported.")),
    }
}

// ── Property dispatch ──────────────────────────────────────

impl ParsedGame {
    fn apply(mut self, prop: &Property, options: &ExtractOptions) -> Result<Self> {
        let id = prop.id.to_ascii_uppercase();
        let record = &mut self.record;

        match id.as_str() {
            "SZ" => {
                let size: Coord = parse_number(&id, single_value(&id, prop)?)?;
                record.board_width = size;
                record.board_height = size;
            }
            "HA" => record.handicap = parse_number(&id, single_value(&id, prop)?)?,
            "TM" => {
                let value = single_value(&id, prop)?;
                record.timelimit = match parse_number(&id, value) {
                    Ok(tm) => tm,
                    Err(e) => fallback(&mut self.warnings, options, e, &id, value, 0)?,
                };
            }
            "KM" => {
                let value = single_value(&id, prop)?;
                record.komi = match parse_number(&id, value) {
                    Ok(km) => km,
                    Err(e) => fallback(&mut self.warnings, options, e, &id, value, DEFAULT_KOMI)?,
                };
            }
            "RU" => record.rule = single_value(&id, prop)?.to_string(),
            "PB" | "BT" => record.black_name = single_value(&id, prop)?.to_string(),
            "PW" | "WT" => record.white_name = single_value(&id, prop)?.to_string(),
            "BR" => record.black_rank = single_value(&id, prop)?.to_string(),
            "WR" => record.white_rank = single_value(&id, prop)?.to_string(),
            "DT" => record.date = single_value(&id, prop)?.to_string(),
            "RE" => {
                let (result, resigned) = decode_result(single_value(&id, prop)?)?;
                record.result = result;
                record.resigned = resigned;
            }
            "AB" | "AW" => {
                let stones = if id == "AB" {
                    &mut record.black_stones
                } else {
                    &mut record.white_stones
                };
                for value in &prop.values {
                    stones.push(decode_point(&id, value)?);
                }
            }
            "B" | "W" => {
                let color = if id == "B" { Color::Black } else { Color::White };
                for value in &prop.values {
                    let m = if value.is_empty() {
                        Move::pass(color)
                    } else {
                        Move::play(color, decode_point(&id, value)?)
                    };
                    record.moves.push(m);
                }
            }
            _ => self.unparsed.push(UnparsedProperty {
                id: id.clone(),
                value: prop.joined_values(),
            }),
        }

        Ok(self)
    }
}

fn single_value<'p>(id: &str, prop: &'p Property) -> Result<&'p str> {
    match prop.values.as_slice() {
        [value] => Ok(value.as_str()),
        values => Err(property_error(
            id,
            format!("expected exactly one value, found {}", values.len()),
        )),
    }
}

fn parse_number<T: std::str::FromStr>(id: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| property_error(id, format!("cannot parse value '{}'", value)))
}

/// Resolve an unreadable TM/KM value according to the number policy
fn fallback<T: std::fmt::Display>(
    warnings: &mut Vec<String>,
    options: &ExtractOptions,
    err: Error,
    id: &str,
    value: &str,
    default: T,
) -> Result<T> {
    match options.numbers {
        NumberPolicy::Strict => Err(err),
        NumberPolicy::Lenient => {
            let message = format!("Cannot parse {} value '{}', using {}", id, value, default);
            tracing::warn!("{}", message);
            warnings.push(message);
            Ok(default)
        }
    }
}

/// Decode an RE value into (result, resigned)
fn decode_result(value: &str) -> Result<(f32, bool)> {
    const WIN_WITHOUT_SCORE: [&str; 3] = ["R", "T", "F"];

    let re = value.trim().to_ascii_uppercase();
    let early_win = |color: &str| {
        WIN_WITHOUT_SCORE
            .iter()
            .any(|kind| re.starts_with(&format!("{}+{}", color, kind)))
    };

    if early_win("B") {
        return Ok((RESIGN_MARGIN, true));
    }
    if early_win("W") {
        return Ok((-RESIGN_MARGIN, true));
    }
    if re.len() < 3 {
        return Err(property_error("RE", "value too short"));
    }

    let score: f32 = re
        .get(2..)
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| property_error("RE", "failed in parsing score"))?;
    match re.as_bytes()[0] {
        b'B' => Ok((score, false)),
        b'W' => Ok((-score, false)),
        _ => Err(property_error("RE", "unknown color")),
    }
}

/// Decode a two-letter coordinate; `aa` is the top-left corner
fn decode_point(id: &str, value: &str) -> Result<Point> {
    let lower = value.to_ascii_lowercase();
    match lower.as_bytes() {
        [x, y] => Ok(Point::new(
            Coord::from(*x) - Coord::from(b'a'),
            Coord::from(*y) - Coord::from(b'a'),
        )),
        _ => Err(property_error(id, format!("Bad coordinate: '{}'", value))),
    }
}

fn property_error(id: &str, message: impl Into<String>) -> Error {
    Error::property(id, message)
}

fn collection_error(message: &str) -> Error {
    tracing::warn!("SGF parser error: {}", message);
    Error::CollectionError(message.to_string())
}
