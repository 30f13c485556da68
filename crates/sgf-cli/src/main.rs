use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use sgf_core::checker::{check_record, CheckOptions, CheckResult};
use sgf_core::{parse_record, parse_to_tree_collection, ExtractOptions, ParsedGame};
use std::path::{Path, PathBuf};
use std::process;
use tracing::level_filters::LevelFilter;

/// sgf — Smart Game Format parser CLI
///
/// Parse SGF files into property trees or typed Go game records.
#[derive(Parser)]
#[command(name = "sgf", version, about, long_about = None)]
struct Cli {
    /// Suppress normal output; only errors are reported
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More log output on stderr (-v warn, -vv info, -vvv debug, -vvvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an SGF file and print its property tree
    Tree {
        /// Path to .sgf file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract the game record along the main line
    Record {
        /// Path to .sgf file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Replace unreadable TM/KM values with defaults instead of failing
        #[arg(long)]
        lenient: bool,
        /// Fail unless the board has this size
        #[arg(long, value_name = "N")]
        board_size: Option<i16>,
        /// Fail when the game has no result
        #[arg(long)]
        require_result: bool,
    },

    /// Show version information
    Version,
}

/// Exit codes: success, parse or check failure, I/O error
const EXIT_OK: i32 = 0;
const EXIT_INVALID: i32 = 1;
const EXIT_IO: i32 = 2;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let exit_code = match cli.command {
        Commands::Tree { file, json } => cmd_tree(&file, json, cli.quiet),
        Commands::Record {
            file,
            json,
            lenient,
            board_size,
            require_result,
        } => {
            let extract = if lenient {
                ExtractOptions::lenient()
            } else {
                ExtractOptions::default()
            };
            let check = CheckOptions {
                expected_board_size: board_size,
                require_result,
            };
            cmd_record(&file, json, cli.quiet, &extract, &check)
        }
        Commands::Version => {
            println!("sgf {} (sgf-core {})", env!("CARGO_PKG_VERSION"), sgf_core::VERSION);
            EXIT_OK
        }
    };

    process::exit(exit_code);
}

fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) | (false, 0) => LevelFilter::ERROR,
        (false, 1) => LevelFilter::WARN,
        (false, 2) => LevelFilter::INFO,
        (false, 3) => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ── Commands ──────────────────────────────────────────────

fn cmd_tree(file: &Path, json: bool, quiet: bool) -> i32 {
    let text = match read_sgf_file(file) {
        Ok(t) => t,
        Err(code) => return code,
    };

    match parse_to_tree_collection(&text) {
        Ok(trees) => {
            tracing::info!(file = %file.display(), trees = trees.len(), "parsed");
            if json {
                print_json(&serde_json::json!({ "ok": true, "trees": trees }));
            } else if !quiet {
                print!("{}", trees.dump());
            }
            EXIT_OK
        }
        Err(e) => report_failure(file, &e, json),
    }
}

fn cmd_record(
    file: &Path,
    json: bool,
    quiet: bool,
    extract: &ExtractOptions,
    check: &CheckOptions,
) -> i32 {
    let text = match read_sgf_file(file) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let game = match parse_record(&text, extract) {
        Ok(game) => game,
        Err(e) => return report_failure(file, &e, json),
    };
    let checked = check_record(&game.record, check);

    if json {
        print_json(&serde_json::json!({
            "ok": checked.is_valid(),
            "game": game,
            "diagnostics": checked.diagnostics,
        }));
    } else {
        if !quiet {
            print_game(&game, &checked);
        }
        for d in checked.errors() {
            eprintln!("{} {}: {}", "error:".red().bold(), file.display(), d.message);
        }
    }

    if checked.is_valid() {
        EXIT_OK
    } else {
        EXIT_INVALID
    }
}

// ── Output helpers ────────────────────────────────────────

fn print_game(game: &ParsedGame, checked: &CheckResult) {
    println!("{}", game.record);
    if !game.unparsed.is_empty() {
        println!("{}", "Unparsed properties:".bold());
        for p in &game.unparsed {
            println!("  {}: {}", p.id, p.value);
        }
    }
    for w in &game.warnings {
        println!("{} {}", "warning:".yellow().bold(), w);
    }
    for d in checked.warnings() {
        println!("{} {}", "warning:".yellow().bold(), d.message);
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} failed to serialize output: {}", "error:".red().bold(), e),
    }
}

fn report_failure(file: &Path, err: &sgf_core::Error, json: bool) -> i32 {
    if json {
        print_json(&serde_json::json!({ "ok": false, "errors": err.messages() }));
    } else {
        eprintln!("{} {}", "error:".red().bold(), file.display());
        for line in err.messages() {
            eprintln!("  {}", line);
        }
    }
    EXIT_INVALID
}

/// Read a whole SGF file with line endings normalized to `\n`
///
/// SGF files are often Latin-1 or GB2312 rather than UTF-8; bytes that are
/// not valid UTF-8 become U+FFFD instead of failing the read.
fn read_sgf_file(path: &Path) -> Result<String, i32> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(normalize_line_endings(&String::from_utf8_lossy(&bytes))),
        Err(e) => {
            eprintln!(
                "{} cannot read {}: {}",
                "error:".red().bold(),
                path.display(),
                e
            );
            Err(EXIT_IO)
        }
    }
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
