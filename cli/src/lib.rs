//! typdex CLI (made by FontLab https://www.fontlab.com/)

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use regex::Regex;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use typdex_core::config::Config;
use typdex_core::db::FontDatabase;
use typdex_core::output::{hits, write_json_pretty, write_ndjson};
use typdex_core::progress::{NoProgress, Progress};
use typdex_core::update::update;

const DEFAULT_DB: &str = "typdex-names.json";

/// CLI entrypoint for typdex.
#[derive(Debug, Parser)]
#[command(
    name = "typdex",
    about = "Font name database builder and resolver (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all log output
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rebuild or incrementally update the font name database
    Update(UpdateArgs),
    /// Resolve one font name to its file
    Lookup(LookupArgs),
    /// Search indexed faces by name regex
    Find(FindArgs),
    /// List every indexed face
    List(ListArgs),
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Discard the existing database and rescan everything
    #[arg(short = 'f', long = "force", action = ArgAction::SetTrue)]
    force: bool,

    /// Database file location
    #[arg(long = "db", value_hint = ValueHint::FilePath, default_value = DEFAULT_DB)]
    db: PathBuf,

    /// Disable the progress bar
    #[arg(long = "no-progress", action = ArgAction::SetTrue)]
    no_progress: bool,
}

#[derive(Debug, Args)]
struct LookupArgs {
    /// Full name, PostScript name, or "family subfamily"
    name: String,

    /// Database file location
    #[arg(long = "db", value_hint = ValueHint::FilePath, default_value = DEFAULT_DB)]
    db: PathBuf,

    /// Emit the matched face as JSON instead of the bare path
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Debug, Args)]
struct FindArgs {
    /// Regex patterns; a face matches when any pattern hits any of its names
    #[arg(required = true)]
    patterns: Vec<String>,

    /// Database file location
    #[arg(long = "db", value_hint = ValueHint::FilePath, default_value = DEFAULT_DB)]
    db: PathBuf,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Database file location
    #[arg(long = "db", value_hint = ValueHint::FilePath, default_value = DEFAULT_DB)]
    db: PathBuf,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Update(args) => run_update(args),
        Command::Lookup(args) => run_lookup(args),
        Command::Find(args) => run_find(args),
        Command::List(args) => run_list(args),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "off"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_update(args: UpdateArgs) -> Result<()> {
    let config = Config::from_env();
    let existing = load_database(&args.db)?;

    let mut progress: Box<dyn Progress> = if args.no_progress {
        Box::new(NoProgress)
    } else {
        Box::new(TermProgress::default())
    };

    let db = update(existing, args.force, &config, progress.as_mut());
    save_database(&db, &args.db)?;

    println!(
        "{} faces in {} families ({})",
        db.mappings.len(),
        db.families.len(),
        args.db.display()
    );
    Ok(())
}

fn run_lookup(args: LookupArgs) -> Result<()> {
    let db = require_database(&args.db)?;
    let (id, record) = db
        .resolve(&args.name)
        .ok_or_else(|| anyhow!("no face matches {:?}", args.name))?;

    if args.json {
        let entries = [(id, record)];
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_json_pretty(&hits(&entries), &mut handle)?;
        handle.write_all(b"\n")?;
    } else {
        println!("{}", record.filename);
    }
    Ok(())
}

fn run_find(args: FindArgs) -> Result<()> {
    let patterns = compile_patterns(&args.patterns)?;
    let db = require_database(&args.db)?;
    let matches = db.find(&patterns);
    write_results(&matches, args.json, args.ndjson)
}

fn run_list(args: ListArgs) -> Result<()> {
    let db = require_database(&args.db)?;
    let matches = db.all();
    write_results(&matches, args.json, args.ndjson)
}

fn write_results(
    matches: &[(u32, &typdex_core::extract::FaceRecord)],
    json: bool,
    ndjson: bool,
) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if ndjson {
        write_ndjson(&hits(matches), &mut handle)?;
    } else if json {
        write_json_pretty(&hits(matches), &mut handle)?;
        handle.write_all(b"\n")?;
    } else {
        for (id, record) in matches {
            let name = record
                .names
                .fullname
                .as_deref()
                .or(record.fullname.as_deref())
                .unwrap_or("<unnamed>");
            writeln!(handle, "{id}\t{name}\t{}", record.filename)?;
        }
    }
    Ok(())
}

fn compile_patterns(raw: &[String]) -> Result<Vec<Regex>> {
    raw.iter()
        .map(|p| Regex::new(p).with_context(|| format!("invalid pattern {p:?}")))
        .collect()
}

/// Load a previously persisted database. A missing file means a fresh start;
/// an unreadable one is treated the same, with a warning, since the update
/// pipeline can always rebuild from scratch.
fn load_database(path: &Path) -> Result<Option<FontDatabase>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading database {}", path.display()))?;
    match serde_json::from_str(&data) {
        Ok(db) => Ok(Some(db)),
        Err(err) => {
            warn!(path = %path.display(), %err, "database file unreadable, rebuilding");
            Ok(None)
        }
    }
}

fn require_database(path: &Path) -> Result<FontDatabase> {
    load_database(path)?
        .ok_or_else(|| anyhow!("no database at {} (run `typdex update` first)", path.display()))
}

fn save_database(db: &FontDatabase, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(db)?;
    fs::write(path, json).with_context(|| format!("writing database {}", path.display()))
}

/// Plain-text progress bar on stderr.
#[derive(Debug, Default)]
struct TermProgress;

impl Progress for TermProgress {
    fn update(&mut self, current: usize, total: usize) {
        if total == 0 {
            return;
        }
        const WIDTH: usize = 30;
        let filled = WIDTH * current.min(total) / total;
        eprint!(
            "\r[{}{}] {current}/{total}",
            "=".repeat(filled),
            " ".repeat(WIDTH - filled)
        );
        if current == total {
            eprintln!();
        }
    }
}
