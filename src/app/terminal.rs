//! Terminal setup and the event loop.

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{error, info, warn};

use super::{ui, App, AppConfig, DEFAULT_TERMINAL_SIZE};
use crate::fullscreen::{select_backend, FullscreenChange, FullscreenController, TerminalEnv};
use crate::sound::{create_player, get_default_sound, CompletionCue, SoundSource};
use crate::tasks::{FileStore, TaskList};
use crate::timer::{TickSignal, TimerEngine, TimerEvent, TokioTickScheduler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Channels feeding the event loop.
struct Inbox {
    ticks: mpsc::UnboundedReceiver<TickSignal>,
    timer_events: mpsc::UnboundedReceiver<TimerEvent>,
    fullscreen: mpsc::UnboundedReceiver<FullscreenChange>,
}

/// Runs the TUI until the user quits.
pub async fn run(config: &AppConfig) -> Result<()> {
    let (tick_tx, ticks) = mpsc::unbounded_channel();
    let (event_tx, timer_events) = mpsc::unbounded_channel();
    let (fullscreen_tx, fullscreen) = mpsc::unbounded_channel();

    let engine = TimerEngine::new(
        config.durations,
        Box::new(TokioTickScheduler::new(tick_tx)),
        event_tx,
    )
    .with_cue(completion_cue(config));

    let tasks = TaskList::load(Box::new(FileStore::new(&config.data_dir)));

    let env = TerminalEnv::detect();
    let fullscreen_controller = FullscreenController::new(select_backend(&env, Some(fullscreen_tx)));

    let size = terminal::size().unwrap_or_else(|e| {
        warn!(error = %e, "Could not read terminal size, assuming {:?}", DEFAULT_TERMINAL_SIZE);
        DEFAULT_TERMINAL_SIZE
    });
    let mut app = App::new(engine, tasks, fullscreen_controller).with_terminal_size(size);
    let mut inbox = Inbox {
        ticks,
        timer_events,
        fullscreen,
    };

    info!(
        data_dir = %config.data_dir.display(),
        fullscreen = app.fullscreen().backend_name(),
        "Lockin starting"
    );

    setup_panic_hook();
    let mut terminal = setup_terminal()?;

    let result = event_loop(&mut terminal, &mut app, &mut inbox).await;

    app.shutdown();
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        error!(error = %e, "Event loop failed");
    }
    result
}

fn completion_cue(config: &AppConfig) -> CompletionCue {
    if !config.sound_enabled {
        return CompletionCue::silent();
    }

    let source = match &config.sound_path {
        Some(path) => SoundSource::from_path(path).unwrap_or_else(|e| {
            warn!(error = %e, "Sound file unusable, falling back to the chime");
            get_default_sound()
        }),
        None => get_default_sound(),
    };
    CompletionCue::new(create_player(true), source)
}

async fn event_loop(terminal: &mut Tui, app: &mut App, inbox: &mut Inbox) -> Result<()> {
    let mut events = EventStream::new();

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw frame")?;

        if app.should_quit() {
            info!("Quit requested");
            return Ok(());
        }

        let idle_deadline = app.idle_deadline();

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => app.handle_event(event, Instant::now()),
                Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                None => return Ok(()),
            },
            Some(signal) = inbox.ticks.recv() => app.handle_tick(signal),
            Some(event) = inbox.timer_events.recv() => app.on_timer_event(event),
            Some(change) = inbox.fullscreen.recv() => {
                app.on_fullscreen_change(change, Instant::now());
            }
            () = idle_timer(idle_deadline) => {
                app.poll_idle(Instant::now());
            }
        }
    }
}

/// Completes at `deadline`, or never when there is none.
async fn idle_timer(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            cursor::Show
        );

        error!(%panic_info, "Lockin panicked");
        original_hook(panic_info);
    }));
}
