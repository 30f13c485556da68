//! SGF Core - Smart Game Format parser for Go game records
//!
//! Parses SGF text into a generic property tree, and flattens the main line
//! of that tree into a typed [`GameRecord`].
//!
//! # Architecture
//!
//! ```text
//! SGF Text → Tree Builder (Scanner + Node Consumer) → TreeCollection
//!                              ↓
//!                        Record Extractor → GameRecord + unparsed properties
//!                              ↓
//!                         Record Checker → Diagnostics
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: Same input always produces identical output
//! - **Linear**: Every scanner step advances the cursor, so parsing ends in
//!   time bounded by the input length
//! - **No hidden state**: Every call works on its own buffers and outputs
//! - **No panics**: All failures are reported through [`Error`]

pub mod checker;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod record;

pub use checker::{check_record, parse_and_check, CheckOptions, CheckResult};
pub use error::{Error, Result};
pub use extractor::{parse_record, ExtractOptions, NumberPolicy, ParsedGame, UnparsedProperty};
pub use parser::ast::{GameNode, GameTree, Property, TreeCollection, TreeId};
pub use parser::parse_to_tree_collection;
pub use record::{Color, GameRecord, Move, Point};

/// Version of the sgf-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
