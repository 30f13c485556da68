//! Typed Go game record
//!
//! The flattened view of one SGF game: board setup, moves, result, and
//! player metadata. Populated by [`crate::extractor`].

use serde::{Deserialize, Serialize};

/// A board coordinate
pub type Coord = i16;

/// Time limit value meaning "not recorded"
pub const UNKNOWN_TIME_LIMIT: i32 = -1;

/// Result value recorded for a win by resignation, timeout or forfeit
pub const RESIGN_MARGIN: f32 = 1.2;

/// Zero-based board position, `x` is the column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub fn new(x: Coord, y: Coord) -> Self {
        Point { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

/// Player color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Color::Black => write!(f, "B"),
            Color::White => write!(f, "W"),
        }
    }
}

/// One move; `point` is `None` for a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub color: Color,
    pub point: Option<Point>,
}

impl Move {
    pub fn play(color: Color, point: Point) -> Self {
        Move {
            color,
            point: Some(point),
        }
    }

    pub fn pass(color: Color) -> Self {
        Move { color, point: None }
    }

    pub fn is_pass(&self) -> bool {
        self.point.is_none()
    }
}

/// Parsed game record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub board_width: Coord,  // SZ
    pub board_height: Coord, // SZ
    pub komi: f32,           // KM
    pub handicap: i32,       // HA
    pub timelimit: i32,      // TM, seconds

    /// Pre-set stones, usually handicap stones
    pub black_stones: Vec<Point>,
    pub white_stones: Vec<Point>,
    pub moves: Vec<Move>,

    /// RE: positive when black wins, by this many points.
    /// On resignation it is `±RESIGN_MARGIN` and `resigned` is set.
    pub result: f32,
    pub resigned: bool,

    pub black_name: String, // PB or BT
    pub black_rank: String, // BR
    pub white_name: String, // PW or WT
    pub white_rank: String, // WR
    pub date: String,       // DT
    pub rule: String,       // RU
}

impl Default for GameRecord {
    fn default() -> Self {
        GameRecord {
            board_width: 0,
            board_height: 0,
            komi: 0.0,
            handicap: 0,
            timelimit: UNKNOWN_TIME_LIMIT,
            black_stones: Vec::new(),
            white_stones: Vec::new(),
            moves: Vec::new(),
            result: 0.0,
            resigned: false,
            black_name: String::new(),
            black_rank: String::new(),
            white_name: String::new(),
            white_rank: String::new(),
            date: String::new(),
            rule: String::new(),
        }
    }
}

impl GameRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all fields to default values
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Winner, if the result is known
    pub fn winner(&self) -> Option<Color> {
        if self.result > 0.0 {
            Some(Color::Black)
        } else if self.result < 0.0 {
            Some(Color::White)
        } else {
            None
        }
    }

    /// Whether a board point lies on the board; always true while the size is unknown
    pub fn on_board(&self, p: Point) -> bool {
        if self.board_width <= 0 || self.board_height <= 0 {
            return true;
        }
        (0..self.board_width).contains(&p.x) && (0..self.board_height).contains(&p.y)
    }
}

impl std::fmt::Display for GameRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Board Size: [{}*{}]  ", self.board_width, self.board_height)?;
        write!(f, "Komi: {}  ", self.komi)?;
        write!(f, "Handicap: {}  ", self.handicap)?;
        writeln!(f, "Time limit: {} seconds.", self.timelimit)?;
        write!(f, "Black: {} Rank: {}  ", self.black_name, self.black_rank)?;
        writeln!(f, "White: {} Rank: {}", self.white_name, self.white_rank)?;
        write!(f, "Date: {}  Rule: {}  ", self.date, self.rule)?;
        let leader = if self.result > 0.0 { "B" } else { "W" };
        write!(f, "Result: {} wins by ", leader)?;
        if self.resigned {
            writeln!(f, "resigned")?;
        } else {
            writeln!(f, "+{}", self.result.abs())?;
        }
        write_stones(f, "Black stones", &self.black_stones)?;
        write_stones(f, "White stones", &self.white_stones)?;
        write!(f, "Moves:")?;
        for (i, m) in self.moves.iter().enumerate() {
            f.write_str(if i == 0 { "\n" } else { " " })?;
            match m.point {
                None => write!(f, "{} passed ", m.color)?,
                Some(p) => write!(f, "{}{}", m.color, p)?,
            }
        }
        Ok(())
    }
}

fn write_stones(f: &mut std::fmt::Formatter, label: &str, stones: &[Point]) -> std::fmt::Result {
    if stones.is_empty() {
        return Ok(());
    }
    write!(f, "{}:", label)?;
    for p in stones {
        write!(f, " {}", p)?;
    }
    writeln!(f)
}
