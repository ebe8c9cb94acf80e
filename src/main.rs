//! Binary entrypoint for the picword CLI.
//!
//! Commands:
//! - `init` - write a starter `picword.toml`
//! - `play [--mode daily|category|unlimited] [--category <name>] [--user <name>]` - play in the terminal
//! - `stats [--user <name>]` - show a player's profile
//! - `daily [--date YYYY-MM-DD]` - show which puzzle is the daily challenge
//! - `categories` - list puzzle categories
//! - `leaderboard <timeframe>` - show remote standings (`leaderboard-http` feature)
//!
//! See the library crate docs for module-level details: `picword::`.
use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use picword::config::Config;
use picword::events::GameEvent;
use picword::game::{GameSession, Presenter};
use picword::identity::{GuestIdentity, IdentityProvider, StaticIdentity};
use picword::leaderboard::{LoggingSink, PendingSubmissions, ScoreSink};
use picword::puzzle::{PuzzleCatalog, PuzzleSource};
use picword::render;
use picword::round::{Mode, RoundEngine, RoundTicker};
use picword::session::{
    JsonProfileStore, MemoryProfileStore, ProfileSnapshot, ProfileStore, SessionTracker,
    GUEST_USERNAME,
};

/// Environment variable holding the bearer token for leaderboard submission.
const TOKEN_ENV: &str = "PICWORD_TOKEN";

#[derive(Parser)]
#[command(name = "picword")]
#[command(about = "Four pictures, one word: a terminal word-guessing game")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "picword.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Daily,
    Category,
    Unlimited,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Play rounds in the terminal
    Play {
        #[arg(short, long, value_enum, default_value_t = ModeArg::Unlimited)]
        mode: ModeArg,
        /// Category for `--mode category`
        #[arg(long)]
        category: Option<String>,
        /// Profile name (token read from PICWORD_TOKEN)
        #[arg(short, long)]
        user: Option<String>,
        /// Fixed RNG seed for reproducible boards
        #[arg(long)]
        seed: Option<u64>,
        /// Keep the profile in memory only
        #[arg(long)]
        ephemeral: bool,
    },
    /// Show profile statistics and achievements
    Stats {
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Show the daily puzzle for a date (default: today, UTC)
    Daily {
        #[arg(long)]
        date: Option<String>,
    },
    /// List puzzle categories
    Categories,
    /// Show leaderboard standings (daily, weekly, allTime, category_<name>)
    #[cfg(feature = "leaderboard-http")]
    Leaderboard { timeframe: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        Config::create_default(&cli.config).await?;
        println!("Wrote default configuration to {}", cli.config);
        return Ok(());
    }

    let config = load_config(&cli.config).await?;
    let console = !matches!(cli.command, Commands::Play { .. }) || cli.verbose > 0;
    init_logging(&config, cli.verbose, console);

    match cli.command {
        Commands::Init => {}
        Commands::Play {
            mode,
            category,
            user,
            seed,
            ephemeral,
        } => {
            let mode = match (mode, category) {
                (ModeArg::Daily, _) => Mode::Daily,
                (ModeArg::Unlimited, _) => Mode::Unlimited,
                (ModeArg::Category, Some(name)) => Mode::Category(name),
                (ModeArg::Category, None) => {
                    return Err(anyhow!("--mode category requires --category <name>"))
                }
            };
            play(config, mode, user, seed, ephemeral).await?;
        }
        Commands::Stats { user } => {
            let store = JsonProfileStore::new(&config.storage.data_dir);
            let name = user.unwrap_or_else(|| GUEST_USERNAME.to_string());
            let profile = store
                .load(&name)
                .with_context(|| format!("reading profile '{}'", name))?
                .unwrap_or_else(|| ProfileSnapshot::new(name));
            print!("{}", render::render_stats(&profile));
        }
        Commands::Daily { date } => {
            let date = match date {
                Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                    .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", d))?,
                None => Utc::now().date_naive(),
            };
            let catalog = load_catalog(&config).await?;
            match catalog.daily_puzzle(date) {
                Some((category, puzzle)) => println!(
                    "{}: {} ({}, {} letters)",
                    date,
                    puzzle.id,
                    category,
                    puzzle.word_len()
                ),
                None => println!("{}: no puzzles available", date),
            }
        }
        Commands::Categories => {
            let catalog = load_catalog(&config).await?;
            print!("{}", render::render_categories(&catalog));
        }
        #[cfg(feature = "leaderboard-http")]
        Commands::Leaderboard { timeframe } => {
            let timeframe: picword::leaderboard::Timeframe =
                timeframe.parse().map_err(|e: String| anyhow!(e))?;
            if !config.leaderboard.enabled || config.leaderboard.api_base_url.is_empty() {
                println!("Leaderboard is not configured (see [leaderboard] in {})", cli.config);
                return Ok(());
            }
            let mut client = picword::leaderboard::LeaderboardClient::new(config.leaderboard.clone());
            let entries = client.fetch(&timeframe, true).await?;
            println!("{} leaderboard", timeframe);
            print!("{}", render::render_leaderboard(&entries));
        }
    }

    Ok(())
}

/// Config from `path`, or defaults when the file does not exist yet.
async fn load_config(path: &str) -> Result<Config> {
    if Path::new(path).exists() {
        Config::load(path).await
    } else {
        Ok(Config::default())
    }
}

async fn load_catalog(config: &Config) -> Result<PuzzleCatalog> {
    match &config.puzzles.file {
        Some(file) => {
            let catalog = PuzzleCatalog::load_json(file)
                .await
                .with_context(|| format!("loading puzzle catalog {}", file))?;
            info!("Loaded {} puzzles from {}", catalog.total_puzzles(), file);
            Ok(catalog)
        }
        None => Ok(PuzzleCatalog::builtin()),
    }
}

/// The sink for this run, plus the handle on its in-flight submissions.
fn score_sink(config: &Config) -> (Box<dyn ScoreSink>, PendingSubmissions) {
    #[cfg(feature = "leaderboard-http")]
    if config.leaderboard.enabled && !config.leaderboard.api_base_url.is_empty() {
        let client = picword::leaderboard::LeaderboardClient::new(config.leaderboard.clone());
        let sink = client.sink(tokio::runtime::Handle::current());
        let pending = sink.pending();
        return (Box::new(sink), pending);
    }
    #[cfg(not(feature = "leaderboard-http"))]
    if config.leaderboard.enabled {
        log::warn!("leaderboard enabled but built without the leaderboard-http feature");
    }
    (Box::new(LoggingSink), PendingSubmissions::new())
}

/// Player input in the terminal loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Select(usize),
    Hint,
    Skip,
    Next,
    Quit,
    Help,
}

fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "h" | "hint" => Some(Input::Hint),
        "s" | "skip" => Some(Input::Skip),
        "n" | "next" => Some(Input::Next),
        "q" | "quit" | "exit" => Some(Input::Quit),
        "?" | "help" => Some(Input::Help),
        other => other.parse::<usize>().ok().map(Input::Select),
    }
}

const HELP: &str = "Enter a bank number to pick a letter, h = hint, s = skip, n = next puzzle, q = quit";

/// Prints events and remembers what the prompt needs.
#[derive(Default)]
struct TerminalPresenter {
    elapsed_seconds: u64,
    hints_remaining: u32,
    session_score: u32,
}

impl Presenter for TerminalPresenter {
    fn present(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PuzzleLoaded(view) => {
                self.elapsed_seconds = 0;
                self.hints_remaining = view.hints_allowed;
            }
            GameEvent::TimerTick { elapsed_seconds } => self.elapsed_seconds = *elapsed_seconds,
            GameEvent::HintApplied { remaining, .. } => self.hints_remaining = *remaining,
            GameEvent::RoundComplete {
                result,
                session_score,
            } => {
                self.elapsed_seconds = result.time_taken_seconds;
                self.session_score = *session_score;
            }
            _ => {}
        }
        if let Some(text) = render::describe_event(event) {
            println!("{}", text);
        }
    }
}

impl TerminalPresenter {
    fn prompt(&self) -> String {
        // Leading carriage return redraws the prompt in place on each tick
        format!(
            "\r[{} | hints {} | score {}] > ",
            render::format_timer(self.elapsed_seconds),
            self.hints_remaining,
            self.session_score
        )
    }
}

async fn play(
    config: Config,
    mode: Mode,
    user: Option<String>,
    seed: Option<u64>,
    ephemeral: bool,
) -> Result<()> {
    let catalog = Arc::new(load_catalog(&config).await?);
    let store: Arc<dyn ProfileStore> = if ephemeral {
        Arc::new(MemoryProfileStore::new())
    } else {
        Arc::new(JsonProfileStore::new(&config.storage.data_dir))
    };
    let identity: Arc<dyn IdentityProvider> = match user {
        Some(name) => Arc::new(StaticIdentity::new(name, std::env::var(TOKEN_ENV).ok())),
        None => Arc::new(GuestIdentity),
    };
    let tracker = SessionTracker::new(store, identity, catalog.playable_categories());

    let mut engine = RoundEngine::new(config.game.clone(), catalog);
    if let Some(seed) = seed {
        engine = engine.with_seed(seed);
    }
    let (sink, pending) = score_sink(&config);
    let mut session = GameSession::new(engine, tracker, sink, TerminalPresenter::default());

    info!(
        "Starting {} mode for '{}'",
        mode,
        session.tracker().username()
    );
    println!("{}", HELP);
    session.start(mode)?;

    let mut ticker = RoundTicker::new(Duration::from_millis(config.game.tick_interval_ms));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        sync_ticker(&mut ticker, session.engine().clock_running(), config.game.timer_enabled);
        stdout.write_all(session.presenter().prompt().as_bytes()).await?;
        stdout.flush().await?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Some(Input::Select(i)) => { session.select_letter(i); }
                    Some(Input::Hint) => { session.use_hint(); }
                    Some(Input::Skip) => { session.skip(); }
                    Some(Input::Next) => {
                        // A failed load is reported through the presenter
                        let _ = session.next_puzzle();
                    }
                    Some(Input::Quit) => break,
                    Some(Input::Help) | None => println!("{}", HELP),
                }
            }
            _ = ticker.tick() => {
                session.tick();
            }
        }
    }

    ticker.stop();
    // Outstanding posts die with the runtime unless collected here
    let limit = Duration::from_secs(config.leaderboard.timeout_seconds + 1);
    let abandoned = pending.flush(limit).await;
    if abandoned > 0 {
        println!("{} leaderboard submission(s) could not be sent.", abandoned);
    }
    let stats = session.tracker().stats();
    println!(
        "Session over. Score {} | played {} won {} | streak {} (best {})",
        session.engine().session_score(),
        stats.games_played,
        stats.games_won,
        stats.current_streak,
        stats.best_streak
    );
    Ok(())
}

/// Keep the ticker running exactly while the round clock runs.
fn sync_ticker(ticker: &mut RoundTicker, clock_running: bool, timer_enabled: bool) {
    if clock_running && timer_enabled {
        if !ticker.is_running() {
            ticker.start();
        }
    } else if ticker.stop() {
        log::debug!("round clock stopped; ticker cancelled");
    }
}

fn init_logging(config: &Config, verbosity: u8, console: bool) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .logging
            .level
            .parse::<log::LevelFilter>()
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let file = config.logging.file.as_ref().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    let is_tty = atty::is(atty::Stream::Stdout);

    match file {
        Some(f) => {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                // Mirror to the console only when someone is watching and it won't garble the board
                if console && is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(move |fmt, record| {
                if !console {
                    return Ok(());
                }
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_parsing() {
        assert_eq!(parse_input(" 3 "), Some(Input::Select(3)));
        assert_eq!(parse_input("H"), Some(Input::Hint));
        assert_eq!(parse_input("skip"), Some(Input::Skip));
        assert_eq!(parse_input("q"), Some(Input::Quit));
        assert_eq!(parse_input("-1"), None);
        assert_eq!(parse_input("xyz"), None);
    }

    #[tokio::test]
    async fn ticker_follows_round_clock() {
        let mut ticker = RoundTicker::new(Duration::from_millis(100));
        sync_ticker(&mut ticker, true, true);
        assert!(ticker.is_running());
        sync_ticker(&mut ticker, false, true);
        assert!(!ticker.is_running());
        sync_ticker(&mut ticker, true, false);
        assert!(!ticker.is_running());
    }
}
