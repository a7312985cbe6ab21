use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};

use tocnav::config::Config;
use tocnav::types::Format;
use tocnav::{format, outline, read, session, TocError};

/// Build a page outline and track its active entry.
#[derive(Parser)]
#[command(name = "tocnav", version, about)]
struct Cli {
    /// Config file. Defaults to ./tocnav.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Extra id already used elsewhere on the page. Repeatable.
    #[arg(long = "reserve", value_name = "ID", global = true)]
    reserve: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the outline of a page (markdown or JSON description).
    Outline {
        page: PathBuf,
        #[arg(long, value_enum)]
        format: Option<Format>,
    },
    /// Read resolution requests as JSON lines on stdin, print highlight events.
    Track { page: PathBuf },
    /// Print a shell completion script.
    Completions { shell: clap_complete::Shell },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tocnav: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TocError> {
    if let Command::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "tocnav", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Outline { page, format: requested } => {
            let built = load_outline(&page, &config, &cli.reserve)?;
            let chosen = requested.or(config.format).unwrap_or_default();
            print!("{}", format::render(&built, chosen));
            Ok(())
        }
        Command::Track { page } => {
            let built = load_outline(&page, &config, &cli.reserve)?;
            session::run(&built).map_err(|e| TocError::Io {
                path: PathBuf::from("<stdio>"),
                source: e,
            })
        }
        Command::Completions { .. } => Ok(()),
    }
}

fn load_outline(
    path: &std::path::Path,
    config: &Config,
    reserve: &[String],
) -> Result<outline::Outline, TocError> {
    let mut page = read::read_page(path)?;
    config.reserve(&mut page, reserve);
    let built = outline::build_page(page);
    log::info!("{}: {} outline entries", path.display(), built.len());
    Ok(built)
}
