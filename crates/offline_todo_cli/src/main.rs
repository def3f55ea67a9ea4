//! Terminal front end for the offline todo core.
//!
//! # Responsibility
//! - Resolve configuration from env and flags, then start logging.
//! - Run the interactive todo shell or the verse quiz.

mod shell;

use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use offline_todo_core::connectivity::{OFFLINE_PAGE_MESSAGE, OFFLINE_PAGE_TITLE};
use offline_todo_core::db::{open_db, open_db_in_memory};
use offline_todo_core::{
    init_from_config, Ayah, CoreConfig, ManualConnectivity, QuizDataset, QuizSelector,
    SqliteKvStore, TodoSession,
};
use shell::Shell;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Key-value store file (overrides OFFLINE_TODO_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Keep everything in memory; nothing survives the process.
    #[arg(long, global = true)]
    ephemeral: bool,

    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute log directory (overrides OFFLINE_TODO_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Start with the platform reporting offline.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Password-protected todo list (default).
    Shell,
    /// Pick a random verse from the selected juz or chapters.
    Quiz(QuizArgs),
    /// Print the page shown when the app cannot be reached offline.
    OfflinePage,
}

#[derive(Args, Debug)]
struct QuizArgs {
    /// Juz to draw from; repeat for several.
    #[arg(long = "juz", value_name = "N")]
    juz: Vec<u32>,

    /// Draw from every chapter touched by the selected juz.
    #[arg(long)]
    from_chapters: bool,

    /// Draw from these chapters instead; repeat for several.
    #[arg(long = "chapter", value_name = "N", conflicts_with = "juz")]
    chapters: Vec<u32>,

    #[arg(long, default_value_t = 1)]
    draws: u32,

    /// Seed for a reproducible draw.
    #[arg(long)]
    seed: Option<u64>,

    /// List juz and chapters instead of drawing.
    #[arg(long)]
    list: bool,

    /// Verse dataset (overrides OFFLINE_TODO_AYAHS).
    #[arg(long)]
    ayahs: Option<PathBuf>,

    /// Chapter metadata (overrides OFFLINE_TODO_QURAN_META).
    #[arg(long)]
    meta: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(&cli)?;
    match init_from_config(&config) {
        Ok(()) => info!(
            "event=config_resolved module=cli status=ok {}",
            config.log_fields()
        ),
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }

    match cli.command {
        None | Some(Command::Shell) => run_shell(&config, cli.ephemeral),
        Some(Command::Quiz(args)) => run_quiz(&config, &args),
        Some(Command::OfflinePage) => {
            println!("{OFFLINE_PAGE_TITLE}");
            println!("{OFFLINE_PAGE_MESSAGE}");
            Ok(())
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig, Box<dyn Error>> {
    let mut config = CoreConfig::from_env()?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = dir.clone();
    }
    if cli.offline {
        config.assume_online = false;
    }
    if let Some(Command::Quiz(args)) = &cli.command {
        if let Some(path) = &args.ayahs {
            config.ayahs_path = path.clone();
        }
        if let Some(path) = &args.meta {
            config.quran_meta_path = path.clone();
        }
    }
    Ok(config)
}

fn run_shell(config: &CoreConfig, ephemeral: bool) -> Result<(), Box<dyn Error>> {
    let conn = if ephemeral {
        open_db_in_memory()?
    } else {
        open_db(&config.db_path)?
    };
    let kv = SqliteKvStore::try_new(&conn)?;
    info!(
        "event=cli_shell module=cli status=ok ephemeral={} online={}",
        ephemeral, config.assume_online
    );

    let session = TodoSession::new(&kv);
    let platform = ManualConnectivity::new(config.assume_online);
    let stdin = io::stdin();
    let mut shell = Shell::new(session, platform, stdin.lock(), io::stdout());
    shell.run()?;
    Ok(())
}

fn run_quiz(config: &CoreConfig, args: &QuizArgs) -> Result<(), Box<dyn Error>> {
    let dataset = QuizDataset::load(&config.ayahs_path, &config.quran_meta_path)?;
    let mut out = io::stdout().lock();

    if args.list {
        let juz_ids = dataset
            .juz_ids()
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>();
        writeln!(out, "Juz: {}", juz_ids.join(" "))?;
        for surah in dataset.surahs() {
            writeln!(
                out,
                "{:>3}. {} ({}) - {} ayahs",
                surah.number, surah.english_name, surah.english_name_translation, surah.number_of_ayahs
            )?;
        }
        return Ok(());
    }

    let mut selector = match args.seed {
        Some(seed) => QuizSelector::seeded(&dataset, seed),
        None => QuizSelector::new(&dataset),
    };
    let by_chapter = !args.chapters.is_empty();
    if by_chapter {
        selector.select_chapters(args.chapters.iter().copied());
    } else {
        selector.select_groups(args.juz.iter().copied());
    }

    for _ in 0..args.draws {
        let pick = if by_chapter || args.from_chapters {
            selector.random_from_derived_chapters()
        } else {
            selector.random_from_groups()
        };
        match pick {
            Some(ayah) => print_ayah(&mut out, ayah)?,
            None => {
                warn!("event=quiz_pick module=cli status=empty");
                writeln!(out, "No verses match the selection.")?;
                break;
            }
        }
    }
    Ok(())
}

fn print_ayah(out: &mut impl Write, ayah: &Ayah) -> io::Result<()> {
    writeln!(
        out,
        "{} {} (juz {})",
        ayah.reference(),
        ayah.surah.english_name,
        ayah.juz
    )?;
    writeln!(out, "  {}", ayah.text)?;
    writeln!(out, "  {}", ayah.tanzil_url())
}
