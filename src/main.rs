//! Interval Trainer CLI
//!
//! Runs exercise/rest interval workouts in the terminal:
//! - A preparation countdown before the first exercise
//! - Exercise and rest intervals for every exercise and round
//! - Tones, spoken announcements and a journal of completed workouts

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use interval_trainer::cli::{spawn_stdin_reader, Cli, Commands, Display, RunArgs};
use interval_trainer::completion::WorkoutJournal;
use interval_trainer::config::AppConfig;
use interval_trainer::cue::SystemCueEmitter;
use interval_trainer::engine::{
    Capabilities, IntervalScheduler, SessionCommand, SessionOutcome, SessionRunner, TimerEngine,
    TimerEvent,
};
use interval_trainer::wakelock::ProcessWakeLock;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            let config = load_config(cli.config)?;
            run_workout(config, args).await?;
        }
        Some(Commands::Presets) => {
            let config = load_config(cli.config)?;
            Display::show_presets(&config.presets(), config.timer.skip_final_rest);
        }
        Some(Commands::History { month }) => {
            let config = load_config(cli.config)?;
            let path = config
                .journal_path()
                .context("ホームディレクトリが見つかりません")?;
            let month = month.unwrap_or_else(|| Local::now().date_naive());
            let entries = WorkoutJournal::new(path)
                .in_month(month)
                .context("トレーニング記録を読み込めません")?;
            Display::show_history(month, &entries);
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Loads the configuration from `path`, or from the default location.
fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    match path.or_else(AppConfig::default_path) {
        Some(path) => Ok(AppConfig::load(&path)?),
        None => Ok(AppConfig::default()),
    }
}

/// Runs one interactive workout until completion or quit.
async fn run_workout(mut config: AppConfig, args: RunArgs) -> Result<()> {
    let mut preset = config.select_preset(args.preset.as_deref())?;
    args.apply(&mut config, &mut preset);

    let (scheduler, tick_rx) = IntervalScheduler::new();
    let mut caps = Capabilities::new(scheduler).with_cues(SystemCueEmitter::new(
        config.sound,
        config.timer.voice_announcements,
    ));

    if config.wake_lock {
        match ProcessWakeLock::platform() {
            Ok(wake_lock) => caps = caps.with_wake_lock(wake_lock),
            Err(e) => warn!("Wake lock not available: {} ({})", e, e.suggestion()),
        }
    }

    let mut completed_today = false;
    match config.journal_path() {
        Some(path) => {
            let journal = WorkoutJournal::new(path);
            completed_today = journal
                .is_completed_on(Local::now().date_naive())
                .unwrap_or_else(|e| {
                    warn!("Could not read workout journal: {}", e);
                    false
                });
            caps = caps.with_sink(journal);
        }
        None => warn!("No home directory, workouts will not be recorded"),
    }

    Display::show_preset_header(&preset, config.timer.skip_final_rest, completed_today);
    Display::show_controls();

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(preset, config.timer.clone(), caps, event_tx);
    let mut runner = SessionRunner::new(engine, tick_rx);
    let renderer = tokio::spawn(render_events(event_rx));

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    if args.autostart {
        cmd_tx
            .send(SessionCommand::Start)
            .context("セッションを開始できません")?;
    }
    spawn_stdin_reader(cmd_tx).context("入力の読み込みを開始できません")?;

    let outcome = tokio::select! {
        result = runner.run(cmd_rx) => result?,
        _ = tokio::signal::ctrl_c() => SessionOutcome::Quit,
    };

    debug!(phase = runner.engine().phase().as_str(), ?outcome, "Session ended");

    // Dropping the engine closes the event channel and ends the renderer
    drop(runner);
    renderer.await.context("表示タスクが異常終了しました")?;

    if outcome == SessionOutcome::Quit {
        println!("終了しました");
    }
    Ok(())
}

/// Prints events until the engine goes away.
async fn render_events(mut events: mpsc::UnboundedReceiver<TimerEvent>) {
    while let Some(event) = events.recv().await {
        match &event {
            TimerEvent::Display(snapshot) => Display::show_snapshot(snapshot),
            other => Display::show_event(other),
        }
    }
    println!();
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
