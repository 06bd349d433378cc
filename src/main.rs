use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use owo_colors::OwoColorize;

use flapboard::board::{
    Board, BoardSpec, Clock, RandomPacer, SnapEngine, SystemClock, TimelineEngine, TweenEngine,
};
use flapboard::config::{BoardSettings, LineSettings};
use flapboard::logging::{init_logging, LoggingConfig};
use flapboard::ui::colors::rgb_of;
use flapboard::ui::tui::{App, BoardWidget, TerminalGuard};
use flapboard::Result;

/// Output format for headless rendering
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RenderFormat {
    /// Framed board as text
    #[default]
    Text,
    /// Line identities and texts as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "flapboard")]
#[command(version)]
#[command(about = "Retro split-flap text display for the terminal")]
struct Cli {
    /// Configuration file [default: ./flapboard.toml when present]
    #[arg(long, short, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Slots per line
    #[arg(long, global = true, value_name = "N")]
    line_length: Option<usize>,

    /// Characters the slots cycle through
    #[arg(long, global = true, value_name = "CHARS")]
    characters: Option<String>,

    /// Line to show, replacing configured lines (repeatable)
    #[arg(long = "line", global = true, value_name = "TEXT[:left|right[:PAD]]")]
    lines: Vec<String>,

    /// Draw the background grid
    #[arg(long, global = true)]
    grid: bool,

    /// Hide the Play and Blank controls
    #[arg(long, global = true)]
    no_controls: bool,

    /// Keep line text as written instead of lower-casing it
    #[arg(long, global = true)]
    keep_case: bool,

    /// Disable colors (also respects NO_COLOR environment variable)
    #[arg(long, global = true)]
    no_color: bool,

    /// Suppress all output except errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short, action = ArgAction::Count, conflicts_with = "quiet", global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show the board interactively (default behavior if no command given)
    Play {
        /// Land every flip immediately
        #[arg(long)]
        no_animation: bool,

        /// Seed for flip timing
        #[arg(long, value_name = "N")]
        seed: Option<u64>,

        /// Frames per second
        #[arg(long, default_value = "30")]
        fps: u32,
    },
    /// Print the settled board without a terminal UI
    Render {
        /// Blank every line after mounting
        #[arg(long)]
        blank: bool,

        /// Output format
        #[arg(long, short = 'f', default_value = "text", value_enum)]
        format: RenderFormat,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// Merge the configuration file with command-line overrides.
fn build_settings(cli: &Cli) -> Result<BoardSettings> {
    let mut settings = BoardSettings::discover(cli.config.as_deref())?;

    if let Some(line_length) = cli.line_length {
        settings.line_length = line_length;
    }
    if let Some(characters) = &cli.characters {
        settings.characters = characters.clone();
    }
    if !cli.lines.is_empty() {
        settings.lines = cli
            .lines
            .iter()
            .map(|l| LineSettings::parse_descriptor(l))
            .collect();
    }
    settings.show_grid |= cli.grid;
    settings.show_controls &= !cli.no_controls;
    settings.fold_case &= !cli.keep_case;

    settings.validate()?;
    Ok(settings)
}

fn use_color(cli: &Cli) -> bool {
    !cli.no_color && std::env::var("NO_COLOR").is_err()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let logging = LoggingConfig::from_flags(cli.quiet, cli.verbose).with_ansi(use_color(cli));

    match &cli.command {
        Some(Commands::Render { blank, format }) => {
            init_logging(logging);
            let spec = build_settings(cli)?.to_spec()?;
            render(spec, *blank, *format, use_color(cli))
        }
        Some(Commands::Config) => {
            init_logging(logging);
            let settings = build_settings(cli)?;
            print!("{}", toml::to_string_pretty(&settings)?);
            Ok(())
        }
        Some(Commands::Play {
            no_animation,
            seed,
            fps,
        }) => play(cli, logging, *no_animation, *seed, *fps),
        None => play(cli, logging, false, None, 30),
    }
}

/// Mount the board with an instant engine and print what it settles on.
fn render(spec: BoardSpec, blank: bool, format: RenderFormat, use_color: bool) -> Result<()> {
    let now = Duration::ZERO;
    let mut board = Board::mount(
        spec,
        Arc::new(SnapEngine::new()),
        Box::new(RandomPacer::new()),
        now,
    );
    if blank {
        board.blank_all(now);
    }
    tracing::info!(lines = board.lines().len(), blank, "rendering board");

    match format {
        RenderFormat::Text => {
            let text = BoardWidget::new(&board, now).render_string();
            if use_color && std::io::stdout().is_terminal() {
                println!("{}", colorize(&board, &text));
            } else {
                println!("{}", text);
            }
        }
        RenderFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&board.snapshot(now))?);
        }
    }
    Ok(())
}

/// Paint each board row in its line's color; the frame stays plain.
fn colorize(board: &Board, text: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, row)| {
            let color = i
                .checked_sub(1)
                .and_then(|line| board.lines().get(line))
                .and_then(|line| rgb_of(line.config().descriptor.color));
            match color {
                Some((r, g, b)) => row.truecolor(r, g, b).bold().to_string(),
                None => row.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run the interactive display until the user quits.
fn play(
    cli: &Cli,
    logging: LoggingConfig,
    no_animation: bool,
    seed: Option<u64>,
    fps: u32,
) -> Result<()> {
    // stderr shares the screen with the board
    let logging = if std::env::var("RUST_LOG").is_ok() {
        logging
    } else {
        logging.for_interactive()
    };
    init_logging(logging);

    let spec = build_settings(cli)?.to_spec()?;
    let engine: Arc<dyn TimelineEngine> = if no_animation {
        Arc::new(SnapEngine::new())
    } else {
        Arc::new(TweenEngine::new())
    };
    let pacer = match seed {
        Some(seed) => RandomPacer::seeded(seed),
        None => RandomPacer::new(),
    };

    let clock = SystemClock::new();
    let board = Board::mount(spec, engine, Box::new(pacer), clock.now());
    let mut app = App::with_system_clock(board, clock)
        .with_fps(fps)
        .with_color(use_color(cli));

    let mut guard = TerminalGuard::enter()?;
    app.run(guard.terminal())?;
    tracing::info!("board closed");
    Ok(())
}
