use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use guessr::{
    app::KeyOutcome,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    controller::SessionController,
    game::GameSession,
    leaderboard::LeaderboardStore,
    range::{Difficulty, RangeConfig},
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
    score::display_score,
    storage::{KvStore, MemoryStore, SqliteStore},
    timer::ElapsedTimer,
    App,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin, Write},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 100;

/// guess the secret number in as few steps and seconds as you can
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal number guessing game. Pick a range, chase the hidden number with higher/lower hints, and put your score on a local leaderboard."
)]
pub struct Cli {
    /// preset range to start playing on straight away (--min/--max take precedence)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// lower bound of a custom range
    #[clap(long, requires = "max", allow_negative_numbers = true)]
    min: Option<i64>,

    /// upper bound of a custom range
    #[clap(long, requires = "min", allow_negative_numbers = true)]
    max: Option<i64>,

    /// nickname used when saving a score without typing one
    #[clap(short = 'n', long)]
    nickname: Option<String>,

    /// leaderboard database file
    #[clap(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// print the leaderboard and exit
    #[clap(long, conflicts_with = "export")]
    leaderboard: bool,

    /// write the leaderboard as CSV to PATH and exit
    #[clap(long, value_name = "PATH")]
    export: Option<PathBuf>,
}

impl Cli {
    /// Range requested on the command line, if any
    fn range(&self) -> Option<guessr::Result<RangeConfig>> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(RangeConfig::new(min, max)),
            _ => self.difficulty.map(|d| Ok(d.range())),
        }
    }

    fn db_path(&self) -> Option<PathBuf> {
        self.db.clone().or_else(AppDirs::db_path)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let cli_range = match cli.range().transpose() {
        Ok(range) => range,
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    // stderr is still ours until the TUI starts
    if let Err(e) = init_logging(AppDirs::log_path().as_deref()) {
        eprintln!("guessr: logging disabled: {e}");
    }

    if cli.leaderboard || cli.export.is_some() {
        let path = cli.db_path().ok_or("could not resolve the leaderboard location")?;
        let board = LeaderboardStore::new(Box::new(SqliteStore::open(path)?));
        let standings = board.list()?;

        if let Some(out) = &cli.export {
            standings.export_csv(fs::File::create(out)?)?;
            info!(path = %out.display(), entries = standings.len(), "leaderboard exported");
        } else {
            print_standings(&standings, &mut io::stdout().lock())?;
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    if let Some(nickname) = &cli.nickname {
        config.nickname = nickname.clone();
    }

    let controller = SessionController::new(
        GameSession::new(config.range()),
        ElapsedTimer::new(),
        LeaderboardStore::new(open_store(cli.db_path().as_deref())),
    )
    .with_default_nickname(config.nickname.clone());

    let mut app = App::new(controller, config);
    if let Some(range) = cli_range {
        app.start_game(range);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if let Err(e) = config_store.save(&app.config) {
        warn!("failed to save config: {}", e);
    }

    result
}

/// Append-only log file; the terminal belongs to the TUI
fn init_logging(path: Option<&Path>) -> io::Result<()> {
    let path = path.ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "no state directory for the log file")
    })?;
    let file = open_log_file(path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("guessr=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// SQLite store at `path`, or an in-memory one when that is unavailable
fn open_store(path: Option<&Path>) -> Box<dyn KvStore> {
    match path.map(SqliteStore::open) {
        Some(Ok(store)) => Box::new(store),
        Some(Err(e)) => {
            warn!("leaderboard database unavailable, scores will not persist: {}", e);
            Box::new(MemoryStore::new())
        }
        None => {
            warn!("no leaderboard location, scores will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

fn print_standings<W: Write>(
    standings: &guessr::leaderboard::Standings,
    out: &mut W,
) -> io::Result<()> {
    if standings.is_empty() {
        return writeln!(out, "{}", guessr::ui::txt::EMPTY_LEADERBOARD);
    }
    for (place, entry) in standings.ranked() {
        writeln!(
            out,
            "{:>3}. {:<24} {:>8}",
            place,
            entry.name,
            display_score(entry.points)
        )?;
    }
    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui(app, f))?;
    loop {
        match runner.step() {
            GameEvent::Tick => app.on_tick(),
            GameEvent::Resize => {}
            GameEvent::Key(key) => {
                if app.on_key(key) == KeyOutcome::Quit {
                    break;
                }
            }
        }
        terminal.draw(|f| ui(app, f))?;
    }
    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["guessr"]);
        assert!(cli.range().is_none());
        assert!(!cli.leaderboard);
        assert!(cli.export.is_none());
    }

    #[test]
    fn test_cli_difficulty() {
        let cli = Cli::parse_from(["guessr", "-d", "hard"]);
        assert_eq!(cli.range().unwrap().unwrap(), Difficulty::Hard.range());
    }

    #[test]
    fn test_cli_custom_range_with_negative_bound() {
        let cli = Cli::parse_from(["guessr", "--min", "-50", "--max", "50"]);
        assert_eq!(
            cli.range().unwrap().unwrap(),
            RangeConfig::new(-50, 50).unwrap()
        );
    }

    #[test]
    fn test_cli_custom_range_overrides_difficulty() {
        let cli = Cli::parse_from(["guessr", "-d", "easy", "--min", "1", "--max", "5"]);
        assert_eq!(cli.range().unwrap().unwrap(), RangeConfig::new(1, 5).unwrap());
    }

    #[test]
    fn test_cli_out_of_order_range_is_rejected() {
        let cli = Cli::parse_from(["guessr", "--min", "9", "--max", "1"]);
        assert_matches!(cli.range(), Some(Err(guessr::Error::InvalidRange { .. })));
    }

    #[test]
    fn test_cli_bounds_must_come_together() {
        assert!(Cli::try_parse_from(["guessr", "--min", "1"]).is_err());
        assert!(Cli::try_parse_from(["guessr", "--max", "10"]).is_err());
        assert!(Cli::try_parse_from(["guessr", "--leaderboard", "--export", "x.csv"]).is_err());
    }

    #[test]
    fn test_print_standings() {
        let mut board = LeaderboardStore::new(Box::new(MemoryStore::new()));
        let mut out = Vec::new();
        print_standings(&board.list().unwrap(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "No scores yet");

        board.save("Ann", 99.6).unwrap();
        board.save("Bob", 120.0).unwrap();
        let mut out = Vec::new();
        print_standings(&board.list().unwrap(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("  1. Bob"));
        assert!(lines[0].ends_with("120"));
        assert!(lines[1].ends_with("100"));
    }

    #[test]
    fn test_log_file_failures_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, b"").unwrap();

        assert!(open_log_file(&blocker.join("guessr.log")).is_err());
        assert!(init_logging(None).is_err());

        let log = dir.path().join("state").join("guessr.log");
        open_log_file(&log).unwrap();
        assert!(log.exists());
    }

    #[test]
    fn test_open_store_falls_back_to_memory() {
        let mut store = open_store(None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
