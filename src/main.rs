use clap::Parser;
use color_eyre::Result;
use gc_pulse::{
    app::{App, Command},
    cli::Cli,
    config::{default_log_path, Config},
    logging::init_logging,
    runtime::{
        jcmd::GcTrigger,
        source::{ChildProcessSource, FileTailSource},
    },
    tui::{
        event,
        screens::monitor::MonitorScreen,
        terminal::{self, Tui},
    },
};
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let mut config = Config::load(cli.config_path().as_deref())?;
    if let Some(fps) = cli.fps {
        config.target_fps = fps;
    }
    if let Some(period) = cli.stabilization {
        config.stabilization_secs = period.as_secs_f64();
    }
    config.validate()?;
    cli.check_features(&config.features)?;

    let log_path = cli.debug_log_path().unwrap_or_else(default_log_path);
    init_logging(&log_path, cli.verbose)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), log = %log_path.display(), "starting");
    tracing::debug!(?config, "configuration loaded");

    let mut app = App::new(config);

    if app.config().features.gc_stats {
        if let Some(path) = cli.gc_log_path() {
            let source = FileTailSource::new(path).from_start(cli.from_start);
            app.listener_mut().enable(source).await;
        } else if let Some(source) = ChildProcessSource::from_command_line(&cli.command) {
            app.listener_mut().enable(source).await;
        } else {
            tracing::info!("no GC log source given; GC statistics stay empty");
        }
    } else {
        tracing::info!("GC statistics disabled");
    }

    let pid = cli.pid.or_else(|| app.listener().target_pid());
    app.set_gc_trigger(GcTrigger::locate(pid));

    terminal::install_panic_hook();
    let mut terminal = terminal::setup_terminal()?;

    let result = run(&mut terminal, &mut app).await;

    terminal::restore_terminal(&mut terminal)?;
    tracing::info!("stopped");
    result
}

/// Frame loop. The keyboard poll waits out whatever is left of the frame
/// budget, which caps the loop at the target frame rate.
async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let budget = app.config().frame_budget();

    while !app.should_quit {
        let frame_start = Instant::now();
        app.tick_at(frame_start);

        let snapshot = app.snapshot(frame_start);
        let render_start = Instant::now();
        terminal.draw(|frame| MonitorScreen::render(frame, app, &snapshot))?;
        app.record_render_time(render_start.elapsed());

        let remaining = budget.saturating_sub(frame_start.elapsed());
        let event = event::poll_event(remaining)?;
        if let Some(Command::ForceGc) = app.handle_event(event) {
            app.force_gc().await;
        }
    }

    Ok(())
}
